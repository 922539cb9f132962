//! Address controller.
//!
//! Maps each HTTP operation onto the shared
//! [`RecordStore`](crate::store::RecordStore). Handlers never
//! hold the store lock across an `.await`.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::{Address, AddressFields, AddressId};
use crate::transcode;

const EXPORT_DISPOSITION: &str = "attachment; filename=\"addresses.csv\"";

/// A path id that is not a non-negative integer matches no record.
fn parse_id(raw: &str) -> Option<AddressId> {
    raw.parse().ok()
}

/// `GET /address/{id}`
pub async fn get_address(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Address>, ApiError> {
    parse_id(&raw_id)
        .and_then(|id| state.store.get(id))
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// `POST /address`
pub async fn create_address(
    State(state): State<AppState>,
    payload: Result<Json<AddressFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Address>), ApiError> {
    let Json(fields) = payload?;
    let address = state.store.insert(fields);

    tracing::info!(id = address.id, "Address created");
    Ok((StatusCode::CREATED, Json(address)))
}

/// `PUT /address/{id}`
///
/// The body is bound before the id is looked up, so a malformed body is a
/// 400 even for an unknown id.
pub async fn update_address(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<AddressFields>, JsonRejection>,
) -> Result<Json<Address>, ApiError> {
    let Json(fields) = payload?;

    let address = parse_id(&raw_id)
        .and_then(|id| state.store.update(id, fields))
        .ok_or(ApiError::NotFound)?;

    tracing::info!(id = address.id, "Address updated");
    Ok(Json(address))
}

/// `DELETE /address/{id}`
pub async fn delete_address(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> StatusCode {
    if let Some(removed) = parse_id(&raw_id).and_then(|id| state.store.remove(id)) {
        tracing::info!(id = removed.id, "Address deleted");
    }
    StatusCode::NO_CONTENT
}

/// `GET /address`
pub async fn list_addresses(State(state): State<AppState>) -> Json<Vec<Address>> {
    Json(state.store.list())
}

/// `GET /address/export`
pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let records = state.store.list();
    // Encoding into memory only fails on a writer fault, never on client input.
    let body = transcode::encode(&records).map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(records = records.len(), "Exported address book");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, EXPORT_DISPOSITION),
        ],
        body,
    ))
}

/// `POST /address/import`
///
/// Decodes the whole body before inserting anything.
pub async fn import_csv(State(state): State<AppState>, body: Bytes) -> Result<String, ApiError> {
    let text = std::str::from_utf8(&body)
        .map_err(|e| ApiError::BadRequest(format!("CSV body is not UTF-8: {e}")))?;
    let rows = transcode::decode(text)?;

    let imported = state.store.insert_many(rows);
    let first_id = imported.first().map(|a| a.id);
    tracing::info!(records = imported.len(), first_id = ?first_id, "Imported CSV");

    metrics::record_imported(imported.len());
    Ok(format!(
        "Successfully imported {} records into Address Book.",
        imported.len()
    ))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub records: usize,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        records: state.store.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("17"), Some(17));
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
    }
}

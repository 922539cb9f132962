use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: u64,
    pub first: String,
    pub last: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub first: String,
    pub last: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

pub struct AddressBookClient {
    client: Client,
    base_url: String,
}

impl AddressBookClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Use a preconfigured reqwest client (timeouts, proxies, pooling).
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/address{}", self.base_url, path)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ClientError::Status { status, body })
    }

    /// All addresses, ordered by id.
    pub async fn list(&self) -> Result<Vec<Address>, ClientError> {
        let resp = self.client.get(self.url("")).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Fetch one address; `Ok(None)` when the service answers 404.
    pub async fn get(&self, id: u64) -> Result<Option<Address>, ClientError> {
        let resp = self.client.get(self.url(&format!("/{}", id))).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::check(resp).await?.json().await?))
    }

    pub async fn create(&self, fields: &AddressFields) -> Result<Address, ClientError> {
        let resp = self.client.post(self.url("")).json(fields).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Replace every field; `Ok(None)` when the id does not exist.
    pub async fn update(
        &self,
        id: u64,
        fields: &AddressFields,
    ) -> Result<Option<Address>, ClientError> {
        let resp = self
            .client
            .put(self.url(&format!("/{}", id)))
            .json(fields)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::check(resp).await?.json().await?))
    }

    pub async fn delete(&self, id: u64) -> Result<(), ClientError> {
        let resp = self.client.delete(self.url(&format!("/{}", id))).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// The address book as CSV text.
    pub async fn export_csv(&self) -> Result<String, ClientError> {
        let resp = self.client.get(self.url("/export")).send().await?;
        Ok(Self::check(resp).await?.text().await?)
    }

    /// Upload CSV text; returns the service's confirmation message.
    pub async fn import_csv(&self, csv: impl Into<String>) -> Result<String, ClientError> {
        let resp = self
            .client
            .post(self.url("/import"))
            .header(reqwest::header::CONTENT_TYPE, "text/csv")
            .body(csv.into())
            .send()
            .await?;
        Ok(Self::check(resp).await?.text().await?)
    }
}

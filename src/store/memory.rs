//! In-memory record store.
//!
//! # Responsibilities
//! - Assign ids from a monotonic sequence
//! - Serialize every read and write through one lock
//! - Return records ordered by id
//! - Publish the records gauge while still holding the lock, so concurrent
//!   mutations report their sizes in the order they happened

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::observability::metrics;
use crate::store::record::{Address, AddressFields, AddressId};

/// State protected by the store lock.
#[derive(Debug)]
struct Inner {
    records: BTreeMap<AddressId, Address>,
    /// Next id to hand out. Starts at 1 and only ever grows.
    next_id: AddressId,
}

/// Volatile address store shared by all request handlers.
#[derive(Debug)]
pub struct RecordStore {
    inner: Mutex<Inner>,
}

impl RecordStore {
    /// Create an empty store whose first id will be 1.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                records: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every mutation is a single map operation, so a panicking holder
        // cannot leave the map half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a new record under the next sequence value.
    pub fn insert(&self, fields: AddressFields) -> Address {
        let mut inner = self.lock();
        let address = Self::insert_locked(&mut inner, fields);
        metrics::record_store_size(inner.records.len());
        address
    }

    /// Store a batch of records under one lock acquisition.
    ///
    /// Ids are contiguous and follow input order.
    pub fn insert_many<I>(&self, rows: I) -> Vec<Address>
    where
        I: IntoIterator<Item = AddressFields>,
    {
        let mut inner = self.lock();
        let inserted = rows
            .into_iter()
            .map(|fields| Self::insert_locked(&mut inner, fields))
            .collect();
        metrics::record_store_size(inner.records.len());
        inserted
    }

    fn insert_locked(inner: &mut Inner, fields: AddressFields) -> Address {
        let id = inner.next_id;
        inner.next_id += 1;

        let address = fields.into_address(id);
        inner.records.insert(id, address.clone());
        tracing::debug!(id, "Address inserted");
        address
    }

    pub fn get(&self, id: AddressId) -> Option<Address> {
        self.lock().records.get(&id).cloned()
    }

    /// Replace all text fields of an existing record.
    ///
    /// Returns `None` without creating anything when `id` is absent.
    pub fn update(&self, id: AddressId, fields: AddressFields) -> Option<Address> {
        let mut inner = self.lock();
        let address = inner.records.get_mut(&id)?;
        address.replace_fields(fields);
        Some(address.clone())
    }

    /// Erase a record. Removing an absent id is a no-op.
    pub fn remove(&self, id: AddressId) -> Option<Address> {
        let mut inner = self.lock();
        let removed = inner.records.remove(&id)?;
        metrics::record_store_size(inner.records.len());
        Some(removed)
    }

    /// All records, ascending by id.
    pub fn list(&self) -> Vec<Address> {
        self.lock().records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
    use std::sync::Arc;

    fn fields(first: &str) -> AddressFields {
        AddressFields {
            first: first.to_string(),
            last: "Smith".to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: "111-111-1111".to_string(),
        }
    }

    #[test]
    fn test_insert_assigns_increasing_ids_from_one() {
        let store = RecordStore::new();
        let ids: Vec<_> = (0..5).map(|i| store.insert(fields(&format!("P{}", i))).id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = RecordStore::new();
        store.insert(fields("Ann"));
        let second = store.insert(fields("Bob"));
        store.remove(second.id);

        let third = store.insert(fields("Cat"));
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = RecordStore::new();
        assert!(store.get(999).is_none());
    }

    #[test]
    fn test_update_replaces_fields_wholesale() {
        let store = RecordStore::new();
        let created = store.insert(fields("Ann"));

        let updated = store
            .update(created.id, AddressFields { first: "Ann2".into(), ..Default::default() })
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.first, "Ann2");
        assert_eq!(updated.last, "");
        assert_eq!(store.get(created.id), Some(updated));
    }

    #[test]
    fn test_update_missing_does_not_create() {
        let store = RecordStore::new();
        assert!(store.update(7, fields("Ghost")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let store = RecordStore::new();
        store.insert(fields("Ann"));
        assert!(store.remove(42).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_sorted_by_id() {
        let store = RecordStore::new();
        for name in ["Zed", "Amy", "Max", "Bea"] {
            store.insert(fields(name));
        }
        store.remove(2);

        let ids: Vec<_> = store.list().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_insert_many_contiguous_in_order() {
        let store = RecordStore::new();
        store.insert(fields("First"));

        let inserted = store.insert_many(vec![fields("A"), fields("B"), fields("C")]);
        let ids: Vec<_> = inserted.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
        assert_eq!(inserted[1].first, "B");
    }

    fn records_gauge(handle: &PrometheusHandle) -> Option<f64> {
        handle
            .render()
            .lines()
            .find_map(|line| line.strip_prefix("address_book_records "))
            .and_then(|value| value.trim().parse().ok())
    }

    #[test]
    fn test_mutations_publish_records_gauge() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = ::metrics::set_default_local_recorder(&recorder);

        let store = RecordStore::new();
        store.insert(fields("Ann"));
        store.insert_many(vec![fields("Bob"), fields("Cat")]);
        assert_eq!(records_gauge(&handle), Some(3.0));

        store.remove(1);
        assert_eq!(records_gauge(&handle), Some(2.0));

        // Absent ids leave the gauge untouched.
        store.remove(99);
        assert_eq!(records_gauge(&handle), Some(2.0));
    }

    #[test]
    fn test_concurrent_inserts_unique_ids() {
        let store = Arc::new(RecordStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        store.insert(fields(&format!("T{}-{}", t, i)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let ids: Vec<_> = store.list().iter().map(|a| a.id).collect();
        assert_eq!(ids, (1..=800).collect::<Vec<_>>());
    }
}

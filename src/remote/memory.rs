//! In-process document store with push-on-change subscriptions.
//!
//! Backs the test suite and offline runs with the same observable behavior
//! the core expects from the hosted store: snapshot on subscribe, snapshot
//! after every matching change, equality predicate on a single field.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::{Document, DocumentStore, Snapshot, SnapshotReceiver, StoreError};

struct Subscriber {
    collection: String,
    field: String,
    value: String,
    tx: mpsc::UnboundedSender<Snapshot>,
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    // BTreeMap keeps snapshot order deterministic across runs.
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    subscribers: Mutex<Vec<Subscriber>>,
    fail_writes: Mutex<bool>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with [`StoreError::WriteFailed`], for
    /// exercising error paths.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if *self.fail_writes.lock().unwrap() {
            Err(StoreError::WriteFailed("injected write failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn matching_snapshot(
        collections: &HashMap<String, BTreeMap<String, Value>>,
        subscriber: &Subscriber,
    ) -> Snapshot {
        collections
            .get(&subscriber.collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, data)| {
                        data.get(&subscriber.field).and_then(Value::as_str)
                            == Some(subscriber.value.as_str())
                    })
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Push a fresh snapshot to every live subscriber of `collection`,
    /// dropping subscribers whose receiver has gone away.
    fn notify(&self, collection: &str) {
        let collections = self.collections.lock().unwrap();
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|subscriber| {
            if subscriber.collection != collection {
                return true;
            }
            let snapshot = Self::matching_snapshot(&collections, subscriber);
            subscriber.tx.send(snapshot).is_ok()
        });
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        self.check_writable()?;
        let id = Uuid::new_v4().to_string();
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        tracing::debug!(%collection, %id, "inserted document");
        self.notify(collection);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn update(&self, collection: &str, id: &str, changes: Value) -> Result<(), StoreError> {
        self.check_writable()?;
        {
            let mut collections = self.collections.lock().unwrap();
            let data = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

            match (data.as_object_mut(), changes.as_object()) {
                (Some(fields), Some(changed)) => {
                    for (key, value) in changed {
                        fields.insert(key.clone(), value.clone());
                    }
                }
                _ => {
                    return Err(StoreError::WriteFailed(
                        "update payload must be an object".to_string(),
                    ))
                }
            }
        }
        tracing::debug!(%collection, %id, "updated document");
        self.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        {
            let mut collections = self.collections.lock().unwrap();
            let removed = collections
                .get_mut(collection)
                .and_then(|docs| docs.remove(id));
            if removed.is_none() {
                return Err(StoreError::NotFound(id.to_string()));
            }
        }
        tracing::debug!(%collection, %id, "deleted document");
        self.notify(collection);
        Ok(())
    }

    fn subscribe(&self, collection: &str, field: &str, value: &str) -> SnapshotReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscriber = Subscriber {
            collection: collection.to_string(),
            field: field.to_string(),
            value: value.to_string(),
            tx,
        };

        // Deliver the current matching set before any change arrives.
        {
            let collections = self.collections.lock().unwrap();
            let snapshot = Self::matching_snapshot(&collections, &subscriber);
            let _ = subscriber.tx.send(snapshot);
        }

        self.subscribers.lock().unwrap().push(subscriber);
        rx
    }
}

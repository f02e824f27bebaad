use super::filter::{Filter, lookup};
use super::{DocKey, Document, DocumentStore, DocumentStream, DocumentTransaction, SortOrder};
use crate::engine::errors::FacadeError;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::ops::Bound;
use std::sync::Arc;
use tracing::{debug, trace};

type Collections = BTreeMap<String, Collection>;

#[derive(Debug, Default)]
struct Collection {
    docs: BTreeMap<DocKey, Value>,
    /// path -> rendered value -> keys
    indexes: HashMap<String, HashMap<String, BTreeSet<DocKey>>>,
}

impl Collection {
    fn put(&mut self, key: DocKey, body: Value) {
        if let Some(previous) = self.docs.remove(&key) {
            self.unindex(&key, &previous);
        }
        self.index(&key, &body);
        self.docs.insert(key, body);
    }

    fn index(&mut self, key: &DocKey, body: &Value) {
        for (path, entries) in self.indexes.iter_mut() {
            if let Some(value) = lookup(body, path) {
                entries
                    .entry(value.to_string())
                    .or_default()
                    .insert(key.clone());
            }
        }
    }

    fn unindex(&mut self, key: &DocKey, body: &Value) {
        for (path, entries) in self.indexes.iter_mut() {
            if let Some(value) = lookup(body, path) {
                if let Some(keys) = entries.get_mut(&value.to_string()) {
                    keys.remove(key);
                }
            }
        }
    }

    fn build_index(&mut self, path: &str) {
        let mut entries: HashMap<String, BTreeSet<DocKey>> = HashMap::new();
        for (key, body) in &self.docs {
            if let Some(value) = lookup(body, path) {
                entries.entry(value.to_string()).or_default().insert(key.clone());
            }
        }
        self.indexes.insert(path.to_string(), entries);
    }

    fn indexed_paths(&self) -> HashSet<String> {
        self.indexes.keys().cloned().collect()
    }
}

#[derive(Debug, Clone)]
enum PendingWrite {
    Insert(Value),
    Upsert(Value),
}

impl PendingWrite {
    fn body(&self) -> &Value {
        match self {
            PendingWrite::Insert(body) | PendingWrite::Upsert(body) => body,
        }
    }
}

/// Document store kept entirely in memory. Cloning shares the data.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed document count of `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, |c| c.docs.len())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    type Transaction = MemoryTransaction;

    async fn create_collection(&self, name: &str) -> Result<(), FacadeError> {
        let mut collections = self.collections.write();
        if !collections.contains_key(name) {
            debug!(target: "batch_ledger::facade", collection = name, "Creating collection");
            collections.insert(name.to_string(), Collection::default());
        }
        Ok(())
    }

    async fn collection_names(&self) -> Result<Vec<String>, FacadeError> {
        Ok(self.collections.read().keys().cloned().collect())
    }

    async fn create_index(&self, collection: &str, path: &str) -> Result<(), FacadeError> {
        let mut collections = self.collections.write();
        let target = collections
            .get_mut(collection)
            .ok_or_else(|| FacadeError::CollectionNotFound(collection.to_string()))?;
        if !target.indexes.contains_key(path) {
            target.build_index(path);
        }
        Ok(())
    }

    async fn indexes(&self, collection: &str) -> Result<Vec<String>, FacadeError> {
        let collections = self.collections.read();
        let target = collections
            .get(collection)
            .ok_or_else(|| FacadeError::CollectionNotFound(collection.to_string()))?;
        let mut paths: Vec<String> = target.indexes.keys().cloned().collect();
        paths.sort();
        Ok(paths)
    }

    async fn begin(&self) -> Result<MemoryTransaction, FacadeError> {
        Ok(MemoryTransaction {
            collections: Arc::clone(&self.collections),
            pending: BTreeMap::new(),
        })
    }
}

/// Buffers writes until commit, then applies them under one write lock.
/// Dropping it without committing discards the writes.
#[derive(Debug)]
pub struct MemoryTransaction {
    collections: Arc<RwLock<Collections>>,
    pending: BTreeMap<String, BTreeMap<DocKey, PendingWrite>>,
}

impl MemoryTransaction {
    fn ensure_collection(&self, collection: &str) -> Result<(), FacadeError> {
        if self.collections.read().contains_key(collection) {
            Ok(())
        } else {
            Err(FacadeError::CollectionNotFound(collection.to_string()))
        }
    }

    fn duplicate(collection: &str, key: &DocKey) -> FacadeError {
        FacadeError::DuplicateKey {
            collection: collection.to_string(),
            key: key.to_string(),
        }
    }
}

#[async_trait]
impl DocumentTransaction for MemoryTransaction {
    async fn insert_many(
        &mut self,
        collection: &str,
        docs: Vec<Document>,
    ) -> Result<(), FacadeError> {
        {
            let collections = self.collections.read();
            let committed = collections
                .get(collection)
                .ok_or_else(|| FacadeError::CollectionNotFound(collection.to_string()))?;
            let pending = self.pending.get(collection);
            let mut seen = HashSet::new();
            for doc in &docs {
                let taken = committed.docs.contains_key(&doc.key)
                    || pending.is_some_and(|p| p.contains_key(&doc.key))
                    || !seen.insert(&doc.key);
                if taken {
                    return Err(Self::duplicate(collection, &doc.key));
                }
            }
        }

        trace!(target: "batch_ledger::facade", collection, count = docs.len(), "Buffering inserts");
        let writes = self.pending.entry(collection.to_string()).or_default();
        for doc in docs {
            writes.insert(doc.key, PendingWrite::Insert(doc.body));
        }
        Ok(())
    }

    async fn upsert(&mut self, collection: &str, doc: Document) -> Result<(), FacadeError> {
        self.ensure_collection(collection)?;
        self.pending
            .entry(collection.to_string())
            .or_default()
            .insert(doc.key, PendingWrite::Upsert(doc.body));
        Ok(())
    }

    async fn exists(&mut self, collection: &str, key: &DocKey) -> Result<bool, FacadeError> {
        if self
            .pending
            .get(collection)
            .is_some_and(|p| p.contains_key(key))
        {
            return Ok(true);
        }
        let collections = self.collections.read();
        let committed = collections
            .get(collection)
            .ok_or_else(|| FacadeError::CollectionNotFound(collection.to_string()))?;
        Ok(committed.docs.contains_key(key))
    }

    async fn max_key(&mut self, collection: &str) -> Result<Option<DocKey>, FacadeError> {
        let committed = {
            let collections = self.collections.read();
            let target = collections
                .get(collection)
                .ok_or_else(|| FacadeError::CollectionNotFound(collection.to_string()))?;
            target.docs.keys().next_back().cloned()
        };
        let pending = self
            .pending
            .get(collection)
            .and_then(|p| p.keys().next_back().cloned());
        Ok(committed.max(pending))
    }

    fn find_all(
        &mut self,
        collection: &str,
        filter: Filter,
        _sort: Option<SortOrder>,
    ) -> DocumentStream {
        // Keys are kept ordered, so results always come back in ascending key order.
        let own_writes = self
            .pending
            .get(collection)
            .map(|writes| {
                writes
                    .iter()
                    .map(|(key, write)| (key.clone(), write.body().clone()))
                    .collect()
            })
            .unwrap_or_default();

        let cursor = Cursor {
            collections: Arc::clone(&self.collections),
            collection: collection.to_string(),
            filter,
            own_writes,
            candidates: None,
            last: None,
            started: false,
        };

        stream::unfold(cursor, |mut cursor| async move {
            cursor.advance().map(|item| (item, cursor))
        })
        .boxed()
    }

    async fn commit(self) -> Result<(), FacadeError> {
        let mut collections = self.collections.write();

        for (name, writes) in &self.pending {
            let target = collections
                .get(name)
                .ok_or_else(|| FacadeError::CollectionNotFound(name.clone()))?;
            for (key, write) in writes {
                if matches!(write, PendingWrite::Insert(_)) && target.docs.contains_key(key) {
                    return Err(Self::duplicate(name, key));
                }
            }
        }

        for (name, writes) in self.pending {
            if let Some(target) = collections.get_mut(&name) {
                for (key, write) in writes {
                    let body = match write {
                        PendingWrite::Insert(body) | PendingWrite::Upsert(body) => body,
                    };
                    target.put(key, body);
                }
            }
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), FacadeError> {
        trace!(target: "batch_ledger::facade", "Discarding pending writes");
        Ok(())
    }
}

/// Walks a collection in key order, one document per step.
struct Cursor {
    collections: Arc<RwLock<Collections>>,
    collection: String,
    filter: Filter,
    own_writes: BTreeMap<DocKey, Value>,
    /// Keys from a secondary index probe, if the filter allowed one.
    candidates: Option<BTreeSet<DocKey>>,
    last: Option<DocKey>,
    started: bool,
}

impl Cursor {
    fn advance(&mut self) -> Option<Result<Document, FacadeError>> {
        let collections = self.collections.read();
        let Some(committed) = collections.get(&self.collection) else {
            if self.started {
                return None;
            }
            self.started = true;
            return Some(Err(FacadeError::CollectionNotFound(
                self.collection.clone(),
            )));
        };

        if !self.started {
            self.started = true;
            self.candidates = probe_index(committed, &self.filter);
        }

        loop {
            let lower = match &self.last {
                Some(key) => Bound::Excluded(key.clone()),
                None => Bound::Unbounded,
            };

            let from_store = match &self.candidates {
                Some(keys) => keys
                    .range((lower.clone(), Bound::Unbounded))
                    .find_map(|key| committed.docs.get_key_value(key)),
                None => committed
                    .docs
                    .range((lower.clone(), Bound::Unbounded))
                    .next(),
            };
            let from_writes = self
                .own_writes
                .range((lower, Bound::Unbounded))
                .next();

            let (key, body) = match (from_store, from_writes) {
                (None, None) => return None,
                (Some(stored), None) => stored,
                (None, Some(written)) => written,
                (Some(stored), Some(written)) => {
                    if written.0 <= stored.0 {
                        written
                    } else {
                        stored
                    }
                }
            };

            self.last = Some(key.clone());
            if self.filter.matches(body) {
                return Some(Ok(Document::new(key.clone(), body.clone())));
            }
        }
    }
}

fn probe_index(collection: &Collection, filter: &Filter) -> Option<BTreeSet<DocKey>> {
    let indexed = collection.indexed_paths();
    let (path, values) = filter.index_probe(&indexed)?;
    let entries = collection.indexes.get(path)?;
    let mut keys = BTreeSet::new();
    for value in values {
        if let Some(found) = entries.get(&value.to_string()) {
            keys.extend(found.iter().cloned());
        }
    }
    Some(keys)
}

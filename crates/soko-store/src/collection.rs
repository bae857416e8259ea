//! Typed document collections.

use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A document that can live in a [`Collection`].
pub trait Document: Clone + Send + Sync + 'static {
    /// The canonical string ID of this document.
    fn id(&self) -> &str;
}

struct Entry<T> {
    /// Monotonic insertion sequence; scans return documents in this order
    /// so sort ties always break by creation order.
    seq: u64,
    doc: T,
}

/// A shared, async collection of documents keyed by their string ID.
///
/// Cloning is cheap: clones share the same underlying map.
pub struct Collection<T> {
    inner: Arc<RwLock<HashMap<String, Entry<T>>>>,
    next_seq: Arc<AtomicU64>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            next_seq: Arc::clone(&self.next_seq),
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<T: Document> Collection<T> {
    /// Insert a new document. Fails if the ID is already taken.
    pub async fn insert(&self, doc: T) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        let id = doc.id().to_string();
        if map.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        map.insert(id, Entry { seq, doc });
        Ok(())
    }

    /// Fetch one document by ID.
    pub async fn get(&self, id: &str) -> Option<T> {
        self.inner.read().await.get(id).map(|e| e.doc.clone())
    }

    /// Apply a mutation to one document. Fails if the ID is absent.
    pub async fn update<F>(&self, id: &str, mutate: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut T),
    {
        let mut map = self.inner.write().await;
        match map.get_mut(id) {
            Some(entry) => {
                mutate(&mut entry.doc);
                Ok(entry.doc.clone())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    /// Apply a mutation to every document whose ID is in `ids`.
    ///
    /// Missing IDs are skipped; returns how many documents were touched.
    pub async fn update_many<F>(&self, ids: &[String], mutate: F) -> usize
    where
        F: Fn(&mut T),
    {
        let mut map = self.inner.write().await;
        let mut touched = 0;
        for id in ids {
            if let Some(entry) = map.get_mut(id) {
                mutate(&mut entry.doc);
                touched += 1;
            }
        }
        touched
    }

    /// Remove one document by ID, returning it.
    pub async fn remove(&self, id: &str) -> Option<T> {
        self.inner.write().await.remove(id).map(|e| e.doc)
    }

    /// All documents matching `pred`, in insertion order.
    pub async fn find<P>(&self, pred: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        let map = self.inner.read().await;
        let mut hits: Vec<(u64, T)> = map
            .values()
            .filter(|e| pred(&e.doc))
            .map(|e| (e.seq, e.doc.clone()))
            .collect();
        hits.sort_by_key(|(seq, _)| *seq);
        hits.into_iter().map(|(_, doc)| doc).collect()
    }

    /// First matching document in insertion order.
    pub async fn find_one<P>(&self, pred: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        let map = self.inner.read().await;
        map.values()
            .filter(|e| pred(&e.doc))
            .min_by_key(|e| e.seq)
            .map(|e| e.doc.clone())
    }

    /// Count documents matching `pred`.
    pub async fn count<P>(&self, pred: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        self.inner
            .read()
            .await
            .values()
            .filter(|e| pred(&e.doc))
            .count()
    }

    /// All documents in insertion order.
    pub async fn all(&self) -> Vec<T> {
        self.find(|_| true).await
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

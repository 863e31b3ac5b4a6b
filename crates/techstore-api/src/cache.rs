//! # Resource Cache Store
//!
//! Explicit cache store keyed by resource, passed around by handle -
//! no ambient globals.
//!
//! ## Consistency model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cache Store Semantics                               │
//! │                                                                         │
//! │  snapshot()  ──► Option<Arc<Vec<T>>>   (copy-on-write, cheap clone)     │
//! │                                                                         │
//! │  replace()   ──► whole-collection swap, last write wins                 │
//! │  upsert()    ──► new snapshot with one record added/replaced            │
//! │  remove()    ──► new snapshot without the record                        │
//! │                                                                         │
//! │  Every mutation builds a NEW snapshot; readers holding the old Arc      │
//! │  keep a consistent view. This rules out partial-write races but NOT     │
//! │  lost updates: two concurrent mutations on the same resource race      │
//! │  and the last completed write wins. Known limitation.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Subscribers get change events over a broadcast channel; a lagging
//! subscriber misses events rather than blocking writers.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::debug;

use techstore_core::types::{Category, Client, Product, Sale};

// =============================================================================
// Keys and events
// =============================================================================

/// Identifies one cached resource collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Products,
    Clients,
    Categories,
    Sales,
}

impl ResourceKey {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceKey::Products => "products",
            ResourceKey::Clients => "clients",
            ResourceKey::Categories => "categories",
            ResourceKey::Sales => "sales",
        }
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What changed in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Whole collection replaced by a fresh fetch.
    Replaced,
    /// One record spliced in.
    Upserted,
    /// One record removed.
    Removed,
    /// Collection dropped (logout, session end).
    Cleared,
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone)]
pub struct CacheEvent {
    pub resource: ResourceKey,
    pub kind: ChangeKind,
    /// Affected record for Upserted/Removed.
    pub id: Option<i64>,
}

// =============================================================================
// Identity
// =============================================================================

/// Records that can be spliced by identity.
pub trait Identified {
    fn identity(&self) -> i64;
}

impl Identified for Product {
    fn identity(&self) -> i64 {
        self.id
    }
}

impl Identified for Client {
    fn identity(&self) -> i64 {
        self.id
    }
}

impl Identified for Category {
    fn identity(&self) -> i64 {
        self.id
    }
}

impl Identified for Sale {
    fn identity(&self) -> i64 {
        self.id
    }
}

// =============================================================================
// Collection
// =============================================================================

/// One cached resource collection.
#[derive(Debug)]
pub struct Collection<T> {
    resource: ResourceKey,
    snapshot: RwLock<Option<Arc<Vec<T>>>>,
    events: broadcast::Sender<CacheEvent>,
}

impl<T: Identified + Clone> Collection<T> {
    fn new(resource: ResourceKey, events: broadcast::Sender<CacheEvent>) -> Self {
        Collection {
            resource,
            snapshot: RwLock::new(None),
            events,
        }
    }

    /// Current snapshot; `None` until the first fetch lands.
    pub fn snapshot(&self) -> Option<Arc<Vec<T>>> {
        self.snapshot.read().expect("cache lock poisoned").clone()
    }

    /// Replaces the whole collection (fetch result). Last write wins.
    /// Returns the new snapshot.
    pub fn replace(&self, items: Vec<T>) -> Arc<Vec<T>> {
        debug!(resource = %self.resource, count = items.len(), "cache replace");
        let snapshot = Arc::new(items);
        *self.snapshot.write().expect("cache lock poisoned") = Some(snapshot.clone());
        self.notify(ChangeKind::Replaced, None);
        snapshot
    }

    /// Splices one record in by identity: replaces a match, appends
    /// otherwise. Builds a fresh snapshot; existing readers are
    /// unaffected.
    pub fn upsert(&self, item: T) {
        let id = item.identity();
        let mut guard = self.snapshot.write().expect("cache lock poisoned");

        let mut items: Vec<T> = guard.as_deref().cloned().unwrap_or_default();
        match items.iter_mut().find(|existing| existing.identity() == id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        *guard = Some(Arc::new(items));
        drop(guard);

        self.notify(ChangeKind::Upserted, Some(id));
    }

    /// Removes one record by identity. Returns whether it was present.
    pub fn remove(&self, id: i64) -> bool {
        let mut guard = self.snapshot.write().expect("cache lock poisoned");

        let Some(current) = guard.as_deref() else {
            return false;
        };
        let before = current.len();
        let items: Vec<T> = current
            .iter()
            .filter(|item| item.identity() != id)
            .cloned()
            .collect();
        let removed = items.len() != before;
        *guard = Some(Arc::new(items));
        drop(guard);

        if removed {
            self.notify(ChangeKind::Removed, Some(id));
        }
        removed
    }

    /// Drops the snapshot entirely.
    pub fn clear(&self) {
        *self.snapshot.write().expect("cache lock poisoned") = None;
        self.notify(ChangeKind::Cleared, None);
    }

    fn notify(&self, kind: ChangeKind, id: Option<i64>) {
        // No subscribers is fine; send only fails then.
        let _ = self.events.send(CacheEvent {
            resource: self.resource,
            kind,
            id,
        });
    }
}

// =============================================================================
// Store
// =============================================================================

/// The per-resource cache collections, sharing one event channel.
#[derive(Debug)]
pub struct ResourceStore {
    pub products: Collection<Product>,
    pub clients: Collection<Client>,
    pub categories: Collection<Category>,
    pub sales: Collection<Sale>,
    events: broadcast::Sender<CacheEvent>,
}

impl ResourceStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        ResourceStore {
            products: Collection::new(ResourceKey::Products, events.clone()),
            clients: Collection::new(ResourceKey::Clients, events.clone()),
            categories: Collection::new(ResourceKey::Categories, events.clone()),
            sales: Collection::new(ResourceKey::Sales, events.clone()),
            events,
        }
    }

    /// Subscribes to change events across all collections.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Drops every snapshot (used when the session ends).
    pub fn clear_all(&self) {
        self.products.clear();
        self.clients.clear();
        self.categories.clear();
        self.sales.clear();
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use techstore_core::enrich::placeholder_product;

    #[test]
    fn test_snapshot_starts_empty() {
        let store = ResourceStore::new();
        assert!(store.products.snapshot().is_none());
    }

    #[test]
    fn test_replace_and_snapshot() {
        let store = ResourceStore::new();
        store
            .products
            .replace(vec![placeholder_product(1, 10.0), placeholder_product(2, 20.0)]);

        let snapshot = store.products.snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_copy_on_write_keeps_old_readers_consistent() {
        let store = ResourceStore::new();
        store.products.replace(vec![placeholder_product(1, 10.0)]);

        let old = store.products.snapshot().unwrap();
        store.products.replace(vec![
            placeholder_product(1, 10.0),
            placeholder_product(2, 20.0),
            placeholder_product(3, 30.0),
        ]);

        // The reader that grabbed the old Arc still sees one record.
        assert_eq!(old.len(), 1);
        assert_eq!(store.products.snapshot().unwrap().len(), 3);
    }

    #[test]
    fn test_upsert_replaces_by_identity() {
        let store = ResourceStore::new();
        store.products.replace(vec![placeholder_product(1, 10.0)]);

        let mut updated = placeholder_product(1, 10.0);
        updated.precio = 15.0;
        store.products.upsert(updated);

        let snapshot = store.products.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].precio, 15.0);

        store.products.upsert(placeholder_product(2, 20.0));
        assert_eq!(store.products.snapshot().unwrap().len(), 2);
    }

    #[test]
    fn test_upsert_into_unfetched_collection() {
        let store = ResourceStore::new();
        store.products.upsert(placeholder_product(5, 50.0));
        assert_eq!(store.products.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_remove() {
        let store = ResourceStore::new();
        store
            .products
            .replace(vec![placeholder_product(1, 10.0), placeholder_product(2, 20.0)]);

        assert!(store.products.remove(1));
        assert!(!store.products.remove(99));

        let snapshot = store.products.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, 2);
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let store = ResourceStore::new();
        let mut rx = store.subscribe();

        store.products.replace(vec![placeholder_product(1, 10.0)]);
        store.products.upsert(placeholder_product(2, 20.0));
        store.products.remove(2);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.resource, ResourceKey::Products);
        assert_eq!(first.kind, ChangeKind::Replaced);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, ChangeKind::Upserted);
        assert_eq!(second.id, Some(2));

        let third = rx.recv().await.unwrap();
        assert_eq!(third.kind, ChangeKind::Removed);
    }

    #[test]
    fn test_clear_all() {
        let store = ResourceStore::new();
        store.products.replace(vec![placeholder_product(1, 10.0)]);
        store.clients.replace(vec![]);
        store.clear_all();
        assert!(store.products.snapshot().is_none());
        assert!(store.clients.snapshot().is_none());
    }
}

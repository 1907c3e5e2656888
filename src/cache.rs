//! Local playlist cache.
//!
//! Holds the user's collection in memory and writes it through to a
//! [`KeyValueStore`] as one JSON array under a single key. Readers see the
//! in-memory snapshot; subscribers are notified after every successful
//! write.
//!
//! # Failure policy
//! A failed write leaves both the stored blob and the in-memory snapshot as
//! they were, and nothing is published. Reads never fail: unreadable storage
//! is logged and treated as an empty collection.

use crate::store::{KeyValueStore, StorageError};
use crate::{compare_newest_first, Playlist};
use log::{debug, error, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use thiserror::Error;

/// Immutable view of the collection, newest insert first.
pub type Snapshot = Rc<Vec<Playlist>>;

type Listener = Rc<dyn Fn(Snapshot)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("could not save playlists: {0}")]
    Storage(#[from] StorageError),
    #[error("could not encode playlists: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct PlaylistCache<S: KeyValueStore> {
    store: S,
    key: String,
    playlists: RefCell<Snapshot>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
}

impl<S: KeyValueStore> PlaylistCache<S> {
    /// Create a cache over `store` and load whatever is stored under `key`.
    pub fn open(store: S, key: impl Into<String>) -> Self {
        let cache = PlaylistCache {
            store,
            key: key.into(),
            playlists: RefCell::new(Rc::new(Vec::new())),
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
        };
        cache.load();
        cache
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Re-read the stored collection and make it the current view.
    pub fn load(&self) -> Snapshot {
        let loaded = Rc::new(read_collection(&self.store, &self.key));
        debug!("Loaded {} playlists from '{}'", loaded.len(), self.key);
        self.publish(loaded.clone());
        loaded
    }

    /// Prepend `playlist`, replacing any stored record with the same id.
    pub fn add(&self, playlist: Playlist) -> Result<Snapshot, CacheError> {
        let current = self.snapshot();
        let mut next = Vec::with_capacity(current.len() + 1);
        let id = playlist.id.clone();
        next.push(playlist);
        next.extend(current.iter().filter(|p| p.id != id).cloned());

        self.commit(next).map_err(|err| {
            error!("Failed to save playlist {}: {}", id, err);
            err
        })
    }

    /// Save a playlist that arrived through a shared link.
    pub fn add_shared(&self, playlist: Playlist) -> Result<Snapshot, CacheError> {
        self.add(playlist.with_shared_defaults())
    }

    pub fn remove(&self, id: &str) -> Result<Snapshot, CacheError> {
        let current = self.snapshot();
        if !current.iter().any(|p| p.id == id) {
            debug!("Remove of unknown playlist {}", id);
        }
        let next: Vec<Playlist> = current.iter().filter(|p| p.id != id).cloned().collect();

        self.commit(next).map_err(|err| {
            error!("Failed to remove playlist {}: {}", id, err);
            err
        })
    }

    pub fn get_by_id(&self, id: &str) -> Option<Playlist> {
        self.playlists.borrow().iter().find(|p| p.id == id).cloned()
    }

    /// Up to `count` playlists, newest `createdAt` first.
    pub fn get_recent(&self, count: usize) -> Vec<Playlist> {
        let mut items: Vec<Playlist> = self.snapshot().as_ref().clone();
        items.sort_by(compare_newest_first);
        items.truncate(count);
        items
    }

    pub fn search(&self, term: &str) -> Vec<Playlist> {
        self.snapshot()
            .iter()
            .filter(|p| p.matches(term))
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.playlists.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.playlists.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.borrow().is_empty()
    }

    pub fn subscribe(&self, listener: impl Fn(Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(sub, _)| *sub != id);
    }

    fn commit(&self, next: Vec<Playlist>) -> Result<Snapshot, CacheError> {
        let encoded = serde_json::to_string(&next)?;
        self.store.set(&self.key, &encoded)?;
        let next = Rc::new(next);
        self.publish(next.clone());
        Ok(next)
    }

    fn publish(&self, next: Snapshot) {
        *self.playlists.borrow_mut() = next.clone();
        // Listeners may subscribe or unsubscribe while being notified.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(next.clone());
        }
    }
}

/// Decode the stored collection. Anything unreadable yields an empty list;
/// single malformed records are dropped.
fn read_collection<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Vec<Playlist> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            error!("Failed to load playlists from storage: {}", err);
            return Vec::new();
        }
    };

    let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            error!("Stored playlists under '{}' are corrupt: {}", key, err);
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value::<Playlist>(entry) {
            Ok(playlist) => Some(playlist),
            Err(err) => {
                warn!("Skipping stored playlist #{}: {}", idx, err);
                None
            }
        })
        .collect()
}

pub mod models;
mod registry;
mod users;
mod waitlist;

pub use registry::NewFile;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use self::models::{FileRecord, Folder, User, WaitlistEntry};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("{0}")]
    Conflict(String),
    /// A parentId/folderId that does not reference an existing folder,
    /// or a reparent that would create a cycle.
    #[error("{0}")]
    InvalidReference(String),
    #[error("{0}")]
    Validation(String),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }
}

#[derive(Debug, Default)]
struct Collections {
    users: HashMap<i64, User>,
    waitlist: HashMap<i64, WaitlistEntry>,
    folders: HashMap<i64, Folder>,
    files: HashMap<i64, FileRecord>,

    // Last id handed out per collection. Ids are monotonic and never
    // reused after deletion.
    last_user_id: i64,
    last_waitlist_id: i64,
    last_folder_id: i64,
    last_file_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// In-memory entity store shared by all request handlers.
///
/// Cheap to clone; all clones point at the same collections. The lock is
/// never held across an await point, so blob I/O cannot stall other
/// requests against the store.
#[derive(Clone)]
pub struct Store {
    inner: Arc<RwLock<Collections>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Collections::default())),
        }
    }

    // The collections are plain maps, so a panic in another thread cannot
    // leave them half-written; recover from poisoning instead of bubbling it.
    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

use chrono::Utc;

use super::models::{FileRecord, Folder, Patch};
use super::{next_id, Collections, Store, StoreError};

/// Metadata for a file about to enter the registry.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub path: String,
    pub folder_id: Option<i64>,
}

impl Collections {
    fn require_folder(&self, id: i64) -> Result<(), StoreError> {
        if self.folders.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::InvalidReference(format!(
                "folder {id} does not exist"
            )))
        }
    }

    /// Walk the parent chain from `start`, returning true if `target` is
    /// an ancestor (or `start` itself). The chain is acyclic because
    /// every reparent goes through this check.
    fn is_ancestor(&self, target: i64, start: i64) -> bool {
        let mut current = Some(start);
        while let Some(id) = current {
            if id == target {
                return true;
            }
            current = self.folders.get(&id).and_then(|f| f.parent_id);
        }
        false
    }
}

impl Store {
    // ========================================================================
    // Folder operations
    // ========================================================================

    /// Create a folder. A given `parent_id` must reference an existing
    /// folder.
    pub fn create_folder(
        &self,
        name: &str,
        description: Option<&str>,
        parent_id: Option<i64>,
    ) -> Result<Folder, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::Validation(
                "folder name must not be empty".to_string(),
            ));
        }

        let mut c = self.write();
        if let Some(pid) = parent_id {
            c.require_folder(pid)?;
        }

        let id = next_id(&mut c.last_folder_id);
        let folder = Folder {
            id,
            name: name.to_string(),
            description: description.map(|s| s.to_string()),
            parent_id,
            created_at: Utc::now(),
        };
        c.folders.insert(id, folder.clone());
        Ok(folder)
    }

    pub fn get_folder(&self, id: i64) -> Option<Folder> {
        self.read().folders.get(&id).cloned()
    }

    /// Folders whose parent exactly matches `parent_id` (`None` lists the
    /// root level), newest first.
    pub fn list_folders(&self, parent_id: Option<i64>) -> Vec<Folder> {
        let mut folders: Vec<Folder> = self
            .read()
            .folders
            .values()
            .filter(|f| f.parent_id == parent_id)
            .cloned()
            .collect();
        folders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        folders
    }

    /// Merge the given fields into an existing folder. `created_at` is
    /// never touched. Reparenting under the folder's own subtree is
    /// rejected.
    pub fn update_folder(
        &self,
        id: i64,
        name: Option<&str>,
        description: Patch<String>,
        parent_id: Patch<i64>,
    ) -> Result<Folder, StoreError> {
        if let Some(n) = name {
            if n.trim().is_empty() {
                return Err(StoreError::Validation(
                    "folder name must not be empty".to_string(),
                ));
            }
        }

        let mut c = self.write();
        if !c.folders.contains_key(&id) {
            return Err(StoreError::not_found("folder", id));
        }

        if let Patch::Value(pid) = &parent_id {
            c.require_folder(*pid)?;
            if c.is_ancestor(id, *pid) {
                return Err(StoreError::InvalidReference(format!(
                    "cannot move folder {id} under its own descendant"
                )));
            }
        }

        let folder = c.folders.get_mut(&id).ok_or(StoreError::not_found("folder", id))?;
        if let Some(n) = name {
            folder.name = n.to_string();
        }
        match description {
            Patch::Absent => {}
            Patch::Null => folder.description = None,
            Patch::Value(d) => folder.description = Some(d),
        }
        match parent_id {
            Patch::Absent => {}
            Patch::Null => folder.parent_id = None,
            Patch::Value(pid) => folder.parent_id = Some(pid),
        }
        Ok(folder.clone())
    }

    /// Delete a folder and cascade to the files directly inside it.
    /// Child folders are intentionally left in place; only direct file
    /// children are removed. Returns the removed file records so the
    /// caller can clean up their stored bytes.
    pub fn delete_folder(&self, id: i64) -> Result<Vec<FileRecord>, StoreError> {
        let mut c = self.write();
        if c.folders.remove(&id).is_none() {
            return Err(StoreError::not_found("folder", id));
        }

        let removed_ids: Vec<i64> = c
            .files
            .values()
            .filter(|f| f.folder_id == Some(id))
            .map(|f| f.id)
            .collect();
        let mut removed = Vec::with_capacity(removed_ids.len());
        for file_id in removed_ids {
            if let Some(file) = c.files.remove(&file_id) {
                removed.push(file);
            }
        }
        Ok(removed)
    }

    // ========================================================================
    // File operations
    // ========================================================================

    /// Register an uploaded file. Validation happens before any mutation:
    /// a bad record leaves the registry untouched.
    pub fn create_file(&self, new: NewFile) -> Result<FileRecord, StoreError> {
        if new.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "file name must not be empty".to_string(),
            ));
        }
        if new.path.trim().is_empty() {
            return Err(StoreError::Validation(
                "file path must not be empty".to_string(),
            ));
        }

        let mut c = self.write();
        if let Some(fid) = new.folder_id {
            c.require_folder(fid)?;
        }

        let id = next_id(&mut c.last_file_id);
        let now = Utc::now();
        let file = FileRecord {
            id,
            name: new.name,
            mime_type: new.mime_type,
            size: new.size,
            path: new.path,
            folder_id: new.folder_id,
            created_at: now,
            updated_at: now,
        };
        c.files.insert(id, file.clone());
        Ok(file)
    }

    pub fn get_file(&self, id: i64) -> Option<FileRecord> {
        self.read().files.get(&id).cloned()
    }

    /// Whether any registered file already stores its bytes under `path`.
    pub fn file_path_in_use(&self, path: &str) -> bool {
        self.read().files.values().any(|f| f.path == path)
    }

    /// Files whose folder exactly matches `folder_id` (`None` lists
    /// root-level files), most recently updated first.
    pub fn list_files(&self, folder_id: Option<i64>) -> Vec<FileRecord> {
        let mut files: Vec<FileRecord> = self
            .read()
            .files
            .values()
            .filter(|f| f.folder_id == folder_id)
            .cloned()
            .collect();
        files.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        files
    }

    /// Merge metadata fields into an existing file record and refresh its
    /// `updated_at`. `created_at` is never touched.
    pub fn update_file(
        &self,
        id: i64,
        name: Option<&str>,
        folder_id: Patch<i64>,
    ) -> Result<FileRecord, StoreError> {
        if let Some(n) = name {
            if n.trim().is_empty() {
                return Err(StoreError::Validation(
                    "file name must not be empty".to_string(),
                ));
            }
        }

        let mut c = self.write();
        if !c.files.contains_key(&id) {
            return Err(StoreError::not_found("file", id));
        }
        if let Patch::Value(fid) = &folder_id {
            c.require_folder(*fid)?;
        }

        let file = c.files.get_mut(&id).ok_or(StoreError::not_found("file", id))?;
        if let Some(n) = name {
            file.name = n.to_string();
        }
        match folder_id {
            Patch::Absent => {}
            Patch::Null => file.folder_id = None,
            Patch::Value(fid) => file.folder_id = Some(fid),
        }
        file.updated_at = Utc::now();
        Ok(file.clone())
    }

    /// Remove a file's metadata. Returns the removed record so the caller
    /// can notify object storage; the registry does not own the bytes.
    pub fn delete_file(&self, id: i64) -> Result<FileRecord, StoreError> {
        self.write()
            .files
            .remove(&id)
            .ok_or(StoreError::not_found("file", id))
    }
}

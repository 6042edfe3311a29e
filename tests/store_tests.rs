use zerodigit::store::models::Patch;
use zerodigit::store::{NewFile, Store, StoreError};

fn new_file(name: &str, path: &str, folder_id: Option<i64>) -> NewFile {
    NewFile {
        name: name.to_string(),
        mime_type: "text/plain".to_string(),
        size: 42,
        path: path.to_string(),
        folder_id,
    }
}

// ============================================================================
// Waitlist
// ============================================================================

#[test]
fn waitlist_ids_increase_and_list_is_newest_first() {
    let store = Store::new();

    let a = store
        .create_waitlist_entry("a@example.com", "Ada", None)
        .unwrap();
    let b = store
        .create_waitlist_entry("b@example.com", "Bob", Some("Initech"))
        .unwrap();
    let c = store
        .create_waitlist_entry("c@example.com", "Cyd", None)
        .unwrap();

    assert!(a.id < b.id && b.id < c.id);

    let entries = store.list_waitlist_entries();
    assert_eq!(entries.len(), 3);
    let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);
    assert_eq!(entries[1].company.as_deref(), Some("Initech"));
}

#[test]
fn waitlist_rejects_duplicate_email() {
    let store = Store::new();
    store
        .create_waitlist_entry("dup@example.com", "First", None)
        .unwrap();

    let result = store.create_waitlist_entry("DUP@example.com", "Second", None);
    assert!(matches!(result, Err(StoreError::Conflict(_))));
    assert_eq!(store.list_waitlist_entries().len(), 1);
}

#[test]
fn waitlist_delete_is_noop_for_missing_id() {
    let store = Store::new();
    let entry = store
        .create_waitlist_entry("x@example.com", "Xan", None)
        .unwrap();

    store.delete_waitlist_entry(999);
    assert_eq!(store.list_waitlist_entries().len(), 1);

    store.delete_waitlist_entry(entry.id);
    store.delete_waitlist_entry(entry.id); // second delete is fine
    assert!(store.list_waitlist_entries().is_empty());
}

#[test]
fn waitlist_ids_are_never_reused() {
    let store = Store::new();
    let first = store
        .create_waitlist_entry("one@example.com", "One", None)
        .unwrap();
    store.delete_waitlist_entry(first.id);

    let second = store
        .create_waitlist_entry("two@example.com", "Two", None)
        .unwrap();
    assert!(second.id > first.id);
}

// ============================================================================
// Users
// ============================================================================

#[test]
fn seed_admin_sets_flag_and_is_idempotent() {
    let store = Store::new();

    let admin = store.seed_admin("admin", "hash");
    assert!(admin.is_admin);
    assert_eq!(store.get_user(admin.id).unwrap().username, "admin");

    let again = store.seed_admin("admin", "hash");
    assert_eq!(again.id, admin.id);

    let by_name = store.get_user_by_username("admin").unwrap();
    assert!(by_name.is_admin);
}

#[test]
fn created_users_are_not_admins() {
    let store = Store::new();
    let user = store.create_user("visitor", "hash");
    assert!(!user.is_admin);
}

// ============================================================================
// Folders
// ============================================================================

#[test]
fn list_folders_filters_by_parent() {
    let store = Store::new();

    let root_a = store.create_folder("a", None, None).unwrap();
    let root_b = store.create_folder("b", None, None).unwrap();
    let child = store.create_folder("a-1", None, Some(root_a.id)).unwrap();

    let roots = store.list_folders(None);
    let root_ids: Vec<i64> = roots.iter().map(|f| f.id).collect();
    assert_eq!(root_ids, vec![root_b.id, root_a.id]); // newest first

    let children = store.list_folders(Some(root_a.id));
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, child.id);

    assert!(store.list_folders(Some(root_b.id)).is_empty());
}

#[test]
fn create_folder_rejects_unknown_parent() {
    let store = Store::new();
    let result = store.create_folder("orphan", None, Some(42));
    assert!(matches!(result, Err(StoreError::InvalidReference(_))));
}

#[test]
fn update_folder_merges_fields_and_keeps_created_at() {
    let store = Store::new();
    let folder = store
        .create_folder("docs", Some("old description"), None)
        .unwrap();

    let updated = store
        .update_folder(folder.id, Some("documents"), Patch::Absent, Patch::Absent)
        .unwrap();
    assert_eq!(updated.name, "documents");
    assert_eq!(updated.description.as_deref(), Some("old description"));
    assert_eq!(updated.created_at, folder.created_at);

    // Explicit null clears the description
    let cleared = store
        .update_folder(folder.id, None, Patch::Null, Patch::Absent)
        .unwrap();
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.name, "documents");
}

#[test]
fn update_folder_missing_id_is_not_found() {
    let store = Store::new();
    let result = store.update_folder(7, Some("x"), Patch::Absent, Patch::Absent);
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[test]
fn update_folder_rejects_cycles() {
    let store = Store::new();
    let a = store.create_folder("a", None, None).unwrap();
    let b = store.create_folder("b", None, Some(a.id)).unwrap();
    let c = store.create_folder("c", None, Some(b.id)).unwrap();

    // a under its grandchild c
    let result = store.update_folder(a.id, None, Patch::Absent, Patch::Value(c.id));
    assert!(matches!(result, Err(StoreError::InvalidReference(_))));

    // a under itself
    let result = store.update_folder(a.id, None, Patch::Absent, Patch::Value(a.id));
    assert!(matches!(result, Err(StoreError::InvalidReference(_))));

    // Legitimate reparent still works
    let moved = store
        .update_folder(c.id, None, Patch::Absent, Patch::Value(a.id))
        .unwrap();
    assert_eq!(moved.parent_id, Some(a.id));
}

#[test]
fn delete_folder_cascades_to_direct_files_only() {
    let store = Store::new();
    let a = store.create_folder("a", None, None).unwrap();
    let b = store.create_folder("b", None, Some(a.id)).unwrap();

    let in_a = store
        .create_file(new_file("in-a.txt", "a/in-a.txt", Some(a.id)))
        .unwrap();
    let in_b = store
        .create_file(new_file("in-b.txt", "a/b/in-b.txt", Some(b.id)))
        .unwrap();
    let at_root = store.create_file(new_file("root.txt", "root.txt", None)).unwrap();

    let removed = store.delete_folder(a.id).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].id, in_a.id);

    // Child folder survives, with its file and its (now dangling) parent ref
    let surviving_b = store.get_folder(b.id).unwrap();
    assert_eq!(surviving_b.parent_id, Some(a.id));
    assert!(store.get_file(in_b.id).is_some());
    assert!(store.get_file(at_root.id).is_some());
    assert!(store.get_file(in_a.id).is_none());
}

#[test]
fn delete_folder_missing_id_is_not_found() {
    let store = Store::new();
    assert!(matches!(
        store.delete_folder(1),
        Err(StoreError::NotFound { .. })
    ));
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn create_file_round_trips_through_get() {
    let store = Store::new();
    let folder = store.create_folder("docs", None, None).unwrap();

    let created = store
        .create_file(NewFile {
            name: "report.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            size: 1024,
            path: "docs/report.pdf".to_string(),
            folder_id: Some(folder.id),
        })
        .unwrap();

    let fetched = store.get_file(created.id).unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "report.pdf");
    assert_eq!(fetched.size, 1024);
    assert_eq!(fetched.folder_id, Some(folder.id));
    assert_eq!(fetched.created_at, fetched.updated_at);
}

#[test]
fn create_file_validates_before_mutating() {
    let store = Store::new();

    assert!(matches!(
        store.create_file(new_file("", "some/path", None)),
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.create_file(new_file("name.txt", "", None)),
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.create_file(new_file("name.txt", "name.txt", Some(9))),
        Err(StoreError::InvalidReference(_))
    ));

    assert!(store.list_files(None).is_empty());
}

#[test]
fn list_files_filters_by_folder_and_orders_by_update() {
    let store = Store::new();
    let folder = store.create_folder("docs", None, None).unwrap();

    let first = store
        .create_file(new_file("first.txt", "first.txt", Some(folder.id)))
        .unwrap();
    let second = store
        .create_file(new_file("second.txt", "second.txt", Some(folder.id)))
        .unwrap();
    store.create_file(new_file("root.txt", "root.txt", None)).unwrap();

    let ids: Vec<i64> = store
        .list_files(Some(folder.id))
        .iter()
        .map(|f| f.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);

    // Touching the older file moves it to the front
    std::thread::sleep(std::time::Duration::from_millis(5));
    store
        .update_file(first.id, Some("renamed.txt"), Patch::Absent)
        .unwrap();
    let ids: Vec<i64> = store
        .list_files(Some(folder.id))
        .iter()
        .map(|f| f.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn update_file_refreshes_updated_at_only() {
    let store = Store::new();
    let file = store.create_file(new_file("a.txt", "a.txt", None)).unwrap();

    std::thread::sleep(std::time::Duration::from_millis(5));
    let updated = store
        .update_file(file.id, Some("b.txt"), Patch::Absent)
        .unwrap();

    assert_eq!(updated.name, "b.txt");
    assert_eq!(updated.created_at, file.created_at);
    assert!(updated.updated_at > file.updated_at);
}

#[test]
fn update_file_can_move_between_folders() {
    let store = Store::new();
    let folder = store.create_folder("docs", None, None).unwrap();
    let file = store.create_file(new_file("a.txt", "a.txt", None)).unwrap();

    let moved = store
        .update_file(file.id, None, Patch::Value(folder.id))
        .unwrap();
    assert_eq!(moved.folder_id, Some(folder.id));

    let back = store.update_file(file.id, None, Patch::Null).unwrap();
    assert_eq!(back.folder_id, None);

    assert!(matches!(
        store.update_file(file.id, None, Patch::Value(99)),
        Err(StoreError::InvalidReference(_))
    ));
}

#[test]
fn delete_file_returns_record_and_missing_is_not_found() {
    let store = Store::new();
    let file = store
        .create_file(new_file("a.txt", "nested/a.txt", None))
        .unwrap();

    let removed = store.delete_file(file.id).unwrap();
    assert_eq!(removed.path, "nested/a.txt");

    assert!(matches!(
        store.delete_file(file.id),
        Err(StoreError::NotFound { .. })
    ));
}

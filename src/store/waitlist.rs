use chrono::Utc;

use super::models::WaitlistEntry;
use super::{next_id, Store, StoreError};

impl Store {
    // ========================================================================
    // Waitlist operations
    // ========================================================================

    /// Add a signup to the waitlist. Emails are unique (case-insensitive);
    /// a duplicate submission is rejected rather than silently stored twice.
    pub fn create_waitlist_entry(
        &self,
        email: &str,
        name: &str,
        company: Option<&str>,
    ) -> Result<WaitlistEntry, StoreError> {
        let mut c = self.write();

        if c.waitlist
            .values()
            .any(|e| e.email.eq_ignore_ascii_case(email))
        {
            return Err(StoreError::Conflict(format!(
                "{email} is already on the waitlist"
            )));
        }

        let id = next_id(&mut c.last_waitlist_id);
        let entry = WaitlistEntry {
            id,
            email: email.to_string(),
            name: name.to_string(),
            company: company.map(|s| s.to_string()),
            created_at: Utc::now(),
        };
        c.waitlist.insert(id, entry.clone());
        Ok(entry)
    }

    /// All waitlist entries, most recent first.
    pub fn list_waitlist_entries(&self) -> Vec<WaitlistEntry> {
        let mut entries: Vec<WaitlistEntry> = self.read().waitlist.values().cloned().collect();
        // Id breaks ties between entries created within the same tick.
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        entries
    }

    /// Remove an entry. Silently does nothing when the id is absent.
    pub fn delete_waitlist_entry(&self, id: i64) {
        self.write().waitlist.remove(&id);
    }
}

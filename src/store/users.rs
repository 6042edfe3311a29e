use super::models::User;
use super::{next_id, Store};

impl Store {
    // ========================================================================
    // User operations
    // ========================================================================

    /// Create a regular (non-admin) user. Username uniqueness is not
    /// enforced here; the only write path in this deployment is the
    /// startup bootstrap.
    pub fn create_user(&self, username: &str, password_hash: &str) -> User {
        let mut c = self.write();
        let id = next_id(&mut c.last_user_id);
        let user = User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_admin: false,
        };
        c.users.insert(id, user.clone());
        user
    }

    /// Bootstrap the admin account. Idempotent: if a user with this
    /// username already exists it is returned with the admin flag forced
    /// on instead of creating a duplicate.
    pub fn seed_admin(&self, username: &str, password_hash: &str) -> User {
        let mut c = self.write();
        if let Some(existing) = c.users.values_mut().find(|u| u.username == username) {
            existing.is_admin = true;
            return existing.clone();
        }

        let id = next_id(&mut c.last_user_id);
        let user = User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_admin: true,
        };
        c.users.insert(id, user.clone());
        user
    }

    pub fn get_user(&self, id: i64) -> Option<User> {
        self.read().users.get(&id).cloned()
    }

    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }
}

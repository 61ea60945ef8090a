//! User account operations

use chrono::Utc;

use crate::types::{User, UserCreate};

use super::{PollStore, StoreError, StoreResult};

impl PollStore {
    /// Register a new user; username and email must both be unique
    pub fn create_user(&self, req: UserCreate) -> StoreResult<User> {
        // Hashing takes ~100ms of CPU; do it before taking the lock so
        // other store operations are not stalled behind it
        let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?;

        let mut data = self.data.write();

        let taken = data
            .users
            .iter()
            .any(|u| u.username == req.username || u.email == req.email);
        if taken {
            return Err(StoreError::Conflict(
                "Username or email already registered".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: data.counters.next_user(),
            username: req.username,
            email: req.email,
            password_hash,
            role: "user".to_string(),
            preferences: None,
            created_at: now,
            updated_at: now,
        };

        data.users.push(user.clone());
        self.persist(&data)?;
        Ok(user)
    }

    /// Authenticate by username and password
    pub fn verify_credentials(&self, username: &str, password: &str) -> StoreResult<User> {
        // Clone the user out and release the lock before the slow
        // bcrypt comparison
        let user = {
            let data = self.data.read();
            data.users
                .iter()
                .find(|u| u.username == username)
                .cloned()
                .ok_or(StoreError::InvalidCredentials)?
        };

        if !bcrypt::verify(password, &user.password_hash)? {
            return Err(StoreError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Change a user's role; returns the old role alongside the updated
    /// user so callers can record the transition
    pub fn set_user_role(&self, user_id: i64, role: &str) -> StoreResult<(String, User)> {
        if role != "user" && role != "admin" {
            return Err(StoreError::Invalid(format!("Unknown role: {role}")));
        }

        let mut data = self.data.write();
        let user = data
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StoreError::NotFound("User"))?;

        let old_role = std::mem::replace(&mut user.role, role.to_string());
        user.updated_at = Utc::now();
        let user = user.clone();

        self.persist(&data)?;
        Ok((old_role, user))
    }

    /// Look up a user by id
    pub fn get_user(&self, user_id: i64) -> StoreResult<User> {
        let data = self.data.read();
        data.users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound("User"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(store: &PollStore, username: &str, email: &str) -> User {
        store
            .create_user(UserCreate {
                username: username.to_string(),
                email: email.to_string(),
                password: "hunter2".to_string(),
            })
            .unwrap()
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = PollStore::in_memory();
        register(&store, "alice", "alice@example.com");

        let err = store
            .create_user(UserCreate {
                username: "alice".to_string(),
                email: "other@example.com".to_string(),
                password: "pw".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = PollStore::in_memory();
        register(&store, "alice", "alice@example.com");

        let err = store
            .create_user(UserCreate {
                username: "bob".to_string(),
                email: "alice@example.com".to_string(),
                password: "pw".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_login_verifies_password() {
        let store = PollStore::in_memory();
        let user = register(&store, "alice", "alice@example.com");

        let authed = store.verify_credentials("alice", "hunter2").unwrap();
        assert_eq!(authed.id, user.id);

        let err = store.verify_credentials("alice", "wrong").unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));

        let err = store.verify_credentials("nobody", "hunter2").unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
    }

    #[test]
    fn test_login_does_not_hold_lock_during_hashing() {
        use std::sync::{Arc, Barrier};
        use std::time::Duration;

        let store = Arc::new(PollStore::in_memory());
        register(&store, "alice", "alice@example.com");

        let barrier = Arc::new(Barrier::new(2));
        let login = {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                store.verify_credentials("alice", "hunter2").unwrap();
            })
        };

        barrier.wait();
        // The bcrypt comparison takes well over 20ms; the store must be
        // writable while it runs
        std::thread::sleep(Duration::from_millis(20));
        assert!(store.data.try_write().is_some());
        login.join().unwrap();
    }

    #[test]
    fn test_set_user_role() {
        let store = PollStore::in_memory();
        let user = register(&store, "alice", "alice@example.com");

        let (old_role, updated) = store.set_user_role(user.id, "admin").unwrap();
        assert_eq!(old_role, "user");
        assert!(updated.is_admin());

        let err = store.set_user_role(user.id, "superuser").unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn test_password_is_stored_hashed() {
        let store = PollStore::in_memory();
        let user = register(&store, "alice", "alice@example.com");
        assert_ne!(user.password_hash, "hunter2");
    }
}

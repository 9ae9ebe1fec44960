use std::sync::Mutex;

use axum::async_trait;

use crate::users::{
    repo::CredentialStore,
    repo_types::{NewUser, User},
};

/// In-process store for handler tests.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: Mutex<Vec<User>>,
}

impl MemoryCredentialStore {
    pub fn remove(&self, email: &str) {
        self.users.lock().unwrap().retain(|u| u.email != email);
    }

    pub fn get(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.get(email))
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            salary: Some(user.salary),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_password_hash(&self, email: &str, password_hash: &str) -> anyhow::Result<u64> {
        let mut touched = 0;
        for u in self.users.lock().unwrap().iter_mut().filter(|u| u.email == email) {
            u.password_hash = password_hash.to_string();
            touched += 1;
        }
        Ok(touched)
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }
}

//! Vector-backed store

use super::UserStore;
use crate::error::StoreError;
use crate::validator::ValidatedUser;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    users: Vec<ValidatedUser>,
    ids: HashSet<i64>,
}

/// Keeps users in insertion order
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: ValidatedUser) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if !inner.ids.insert(user.id()) {
            return Err(StoreError::Duplicate(user.id()));
        }
        inner.users.push(user);
        Ok(())
    }

    async fn query_youngest(&self, limit: usize) -> Result<Vec<ValidatedUser>, StoreError> {
        let mut users = self.lock()?.users.clone();
        // Stable sort: equal ages stay in insertion order
        users.sort_by_key(ValidatedUser::age);
        users.truncate(limit);
        Ok(users)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.users.len())
    }
}

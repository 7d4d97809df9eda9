//! Youngest-users selection
//!
//! Selection is two separate steps and must stay that way:
//!
//! 1. ask the store for the `n` lowest ages (the store breaks age ties)
//! 2. re-sort only those `n` by name
//!
//! This is not the same as sorting everything by `(age, name)` and taking `n`.
//! When several users share the age at the cut-off, step 1 decides who makes
//! it in, and names only matter afterwards.

use crate::store::UserStore;
use crate::validator::ValidatedUser;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{error, info};

/// Users returned by default
pub const DEFAULT_SELECTION_SIZE: usize = 5;

pub struct Selector {
    store: Arc<dyn UserStore>,
    size: usize,
}

impl Selector {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self::with_size(store, DEFAULT_SELECTION_SIZE)
    }

    pub fn with_size(store: Arc<dyn UserStore>, size: usize) -> Self {
        Self { store, size }
    }

    /// The youngest users ordered by name. A failed store query is logged and
    /// gives an empty selection.
    pub async fn select(&self) -> Vec<ValidatedUser> {
        let mut users = match self.store.query_youngest(self.size).await {
            Ok(users) => users,
            Err(err) => {
                error!(error = %err, "Failed to query youngest users");
                return Vec::new();
            },
        };

        order_by_name(&mut users);
        info!(
            selected = users.len(),
            names = ?users.iter().map(ValidatedUser::name).collect::<Vec<_>>(),
            "Selected youngest users"
        );
        users
    }
}

/// Case-insensitive name order, then exact name, then id.
pub fn order_by_name(users: &mut [ValidatedUser]) {
    users.sort_by(compare_names);
}

fn compare_names(a: &ValidatedUser, b: &ValidatedUser) -> Ordering {
    a.name()
        .to_lowercase()
        .cmp(&b.name().to_lowercase())
        .then_with(|| a.name().cmp(b.name()))
        .then_with(|| a.id().cmp(&b.id()))
}

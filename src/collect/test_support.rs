//! In-memory [`BeatmapsetSource`] for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{Beatmapset, BeatmapsetSource, Category, User};
use crate::config::Gamemode;
use crate::error::{Error, Result};

pub(crate) fn beatmapset(id: u64, user_id: u64) -> Beatmapset {
    Beatmapset {
        id,
        user_id,
        artist: format!("artist {}", id),
        title: format!("title {}", id),
    }
}

/// Favourites-only user profile whose declared count matches `favourites`.
pub(crate) fn user(id: u64, favourites: u32) -> User {
    User {
        id,
        username: format!("user{}", id),
        favourite_beatmapset_count: favourites,
        ..Default::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List {
        user_id: u64,
        category: Category,
        offset: u32,
    },
    User(u64),
}

#[derive(Default)]
pub(crate) struct FakeSource {
    users: HashMap<u64, User>,
    listings: HashMap<(u64, Category), Vec<Beatmapset>>,
    failing: HashSet<(u64, Category)>,
    calls: Mutex<Vec<Call>>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    pub(crate) fn with_listing(
        mut self,
        user_id: u64,
        category: Category,
        items: Vec<Beatmapset>,
    ) -> Self {
        self.listings.insert((user_id, category), items);
        self
    }

    /// Add a user whose favourites listing is `items`, with a matching count.
    pub(crate) fn with_favourites(self, user_id: u64, items: Vec<Beatmapset>) -> Self {
        let count = items.len() as u32;
        self.with_user(user(user_id, count))
            .with_listing(user_id, Category::Favourite, items)
    }

    pub(crate) fn failing_listing(mut self, user_id: u64, category: Category) -> Self {
        self.failing.insert((user_id, category));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn list_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::List { .. }))
            .collect()
    }

    pub(crate) fn list_offsets(&self, user_id: u64, category: Category) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::List {
                    user_id: u,
                    category: cat,
                    offset,
                } if u == user_id && cat == category => Some(offset),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn user_lookups(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::User(id) => Some(id),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl BeatmapsetSource for FakeSource {
    async fn list_page(
        &self,
        user_id: u64,
        category: Category,
        _gamemode: Gamemode,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Beatmapset>> {
        self.calls.lock().unwrap().push(Call::List {
            user_id,
            category,
            offset,
        });

        if self.failing.contains(&(user_id, category)) {
            return Err(Error::Transport(format!(
                "HTTP 500 on {}",
                category.listing_path(user_id)
            )));
        }

        let items = self
            .listings
            .get(&(user_id, category))
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(items
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get_user(&self, user_id: u64) -> Result<User> {
        self.calls.lock().unwrap().push(Call::User(user_id));
        self.users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| Error::Transport(format!("HTTP 404 on users/{}", user_id)))
    }
}

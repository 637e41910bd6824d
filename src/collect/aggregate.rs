//! Per-category pagination and merging into a deduplicated result.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::api::{Beatmapset, BeatmapsetSource, Category, PAGE_SIZE};
use crate::config::Gamemode;
use crate::error::Result;

/// How many pages to request for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagePolicy {
    /// Request exactly `ceil(declared / PAGE_SIZE)` pages, whatever they return.
    #[default]
    Declared,
    /// Same upper bound, but stop at the first empty page.
    StopOnEmpty,
}

/// Number of pages needed to cover `declared` items.
pub fn page_count(declared: u32) -> u32 {
    declared.div_ceil(PAGE_SIZE)
}

/// Beatmapsets keyed by ID. Inserting an ID twice keeps one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationResult {
    items: BTreeMap<u64, Beatmapset>,
}

impl AggregationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a beatmapset, overwriting any previous entry with the same ID.
    ///
    /// Returns `true` if the ID was not present before.
    pub fn insert(&mut self, beatmapset: Beatmapset) -> bool {
        self.items.insert(beatmapset.id, beatmapset).is_none()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: &AggregationResult) {
        for set in other.items.values() {
            self.insert(set.clone());
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get(&self, id: u64) -> Option<&Beatmapset> {
        self.items.get(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Beatmapset> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.items.keys().copied()
    }
}

impl IntoIterator for AggregationResult {
    type Item = Beatmapset;
    type IntoIter = std::collections::btree_map::IntoValues<u64, Beatmapset>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_values()
    }
}

impl FromIterator<Beatmapset> for AggregationResult {
    fn from_iter<I: IntoIterator<Item = Beatmapset>>(iter: I) -> Self {
        let mut result = Self::new();
        for set in iter {
            result.insert(set);
        }
        result
    }
}

/// Drives pagination for requested categories against a [`BeatmapsetSource`].
pub struct Aggregator<'a> {
    source: &'a dyn BeatmapsetSource,
    policy: PagePolicy,
}

impl<'a> Aggregator<'a> {
    pub fn new(source: &'a dyn BeatmapsetSource, policy: PagePolicy) -> Self {
        Self { source, policy }
    }

    /// Page through one category and merge every item into `result`.
    ///
    /// Pages are requested in increasing offset order. Returns the items that
    /// were not already present in `result`, in the order they were received.
    pub async fn collect_category(
        &self,
        user_id: u64,
        category: Category,
        declared: u32,
        gamemode: Gamemode,
        result: &mut AggregationResult,
    ) -> Result<Vec<Beatmapset>> {
        let pages = page_count(declared);
        let mut added = Vec::new();

        if pages == 0 {
            tracing::debug!("User {} has no {} beatmapsets", user_id, category);
            return Ok(added);
        }

        tracing::info!(
            "Fetching {} {} beatmapsets of user {} ({} pages)",
            declared,
            category,
            user_id,
            pages
        );

        for page in 0..pages {
            let offset = page * PAGE_SIZE;
            let items = self
                .source
                .list_page(user_id, category, gamemode, offset, PAGE_SIZE)
                .await?;

            tracing::debug!(
                "{} page {}/{} (offset {}): {} items",
                category,
                page + 1,
                pages,
                offset,
                items.len()
            );

            if items.is_empty() && self.policy == PagePolicy::StopOnEmpty {
                tracing::warn!(
                    "Empty {} page at offset {} for user {}, declared count {} looks stale",
                    category,
                    offset,
                    user_id,
                    declared
                );
                break;
            }

            for item in items {
                if result.insert(item.clone()) {
                    added.push(item);
                }
            }
        }

        Ok(added)
    }

    /// Aggregate every requested category into one deduplicated result.
    ///
    /// Categories missing from `counts` are treated as empty.
    pub async fn aggregate(
        &self,
        user_id: u64,
        categories: &[Category],
        counts: &HashMap<Category, u32>,
        gamemode: Gamemode,
    ) -> Result<AggregationResult> {
        let mut result = AggregationResult::new();
        let requested: BTreeSet<Category> = categories.iter().copied().collect();

        for category in requested {
            let declared = counts.get(&category).copied().unwrap_or(0);
            self.collect_category(user_id, category, declared, gamemode, &mut result)
                .await?;
        }

        Ok(result)
    }
}

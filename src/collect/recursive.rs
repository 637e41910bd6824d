//! Recursive favourites: a user's favourites, the favourites of those maps'
//! creators, and so on down to a maximum depth.

use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::api::{BeatmapsetSource, Category, User};
use crate::collect::aggregate::{AggregationResult, Aggregator, PagePolicy};
use crate::config::Gamemode;
use crate::error::Result;

/// Favourites recorded for one visited user.
#[derive(Debug, Clone)]
pub struct UserFavourites {
    pub user: User,
    /// Distance from the start user (the start user is 0).
    pub depth: u32,
    pub favourites: AggregationResult,
}

/// Walks the user → favourite → creator graph breadth-first.
pub struct Walker<'a> {
    source: &'a dyn BeatmapsetSource,
    aggregator: Aggregator<'a>,
}

impl<'a> Walker<'a> {
    pub fn new(source: &'a dyn BeatmapsetSource, policy: PagePolicy) -> Self {
        Self {
            source,
            aggregator: Aggregator::new(source, policy),
        }
    }

    /// Collect favourites starting at `root`.
    ///
    /// Users at depth `d` only have their creators queued when
    /// `d + 1 < max_depth`, so `max_depth == 1` fetches the root's favourites
    /// and nothing else. A `max_depth` of 0 is treated as 1. Every user is
    /// expanded at most once; creator profiles are looked up only for users
    /// not yet visited or queued.
    pub async fn expand(&self, root: User, max_depth: u32) -> Result<BTreeMap<u64, UserFavourites>> {
        let max_depth = max_depth.max(1);
        let mut results = BTreeMap::new();
        let mut seen: HashSet<u64> = HashSet::from([root.id]);
        let mut queue: VecDeque<(User, u32)> = VecDeque::from([(root, 0)]);

        while let Some((user, depth)) = queue.pop_front() {
            tracing::info!(
                "Fetching favourites of {} (depth {}/{})",
                user.username,
                depth + 1,
                max_depth
            );

            let mut favourites = AggregationResult::new();
            self.aggregator
                .collect_category(
                    user.id,
                    Category::Favourite,
                    user.declared_count(Category::Favourite),
                    Gamemode::Osu,
                    &mut favourites,
                )
                .await?;

            let next_depth = depth + 1;
            if next_depth < max_depth {
                for set in favourites.iter() {
                    // Some listings omit the creator.
                    if set.user_id == 0 || !seen.insert(set.user_id) {
                        continue;
                    }
                    let creator = self.source.get_user(set.user_id).await?;
                    tracing::debug!(
                        "Queued creator {} of beatmapset {}",
                        creator.username,
                        set.id
                    );
                    queue.push_back((creator, next_depth));
                }
            }

            results.insert(
                user.id,
                UserFavourites {
                    user,
                    depth,
                    favourites,
                },
            );
        }

        tracing::info!("Visited {} users", results.len());
        Ok(results)
    }
}

/// Flatten per-user favourites into one deduplicated result.
pub fn union(per_user: &BTreeMap<u64, UserFavourites>) -> AggregationResult {
    let mut all = AggregationResult::new();
    for entry in per_user.values() {
        all.merge(&entry.favourites);
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::test_support::{beatmapset, user, Call, FakeSource};

    #[tokio::test]
    async fn test_depth_one_only_fetches_root_favourites() {
        let source = FakeSource::new()
            .with_favourites(1, vec![beatmapset(10, 2), beatmapset(11, 3)])
            .with_favourites(2, vec![beatmapset(20, 4)]);
        let walker = Walker::new(&source, PagePolicy::Declared);

        let visited = walker.expand(user(1, 2), 1).await.unwrap();

        assert_eq!(visited.len(), 1);
        assert_eq!(
            source.calls(),
            vec![Call::List {
                user_id: 1,
                category: Category::Favourite,
                offset: 0
            }]
        );
    }

    #[tokio::test]
    async fn test_depth_zero_behaves_like_one() {
        let source = FakeSource::new().with_favourites(1, vec![beatmapset(10, 2)]);
        let walker = Walker::new(&source, PagePolicy::Declared);

        let visited = walker.expand(user(1, 1), 0).await.unwrap();
        assert_eq!(visited.len(), 1);
        assert!(source.user_lookups().is_empty());
    }

    #[tokio::test]
    async fn test_shared_creator_expanded_once() {
        // Root favourites maps by A (2) and B (3); both A and B favourite a map by C (4).
        let source = FakeSource::new()
            .with_favourites(1, vec![beatmapset(10, 2), beatmapset(11, 3)])
            .with_favourites(2, vec![beatmapset(40, 4)])
            .with_favourites(3, vec![beatmapset(40, 4), beatmapset(41, 4)])
            .with_favourites(4, vec![beatmapset(50, 1)]);
        let walker = Walker::new(&source, PagePolicy::Declared);

        let visited = walker.expand(user(1, 2), 5).await.unwrap();

        assert_eq!(visited.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(source.list_offsets(4, Category::Favourite), vec![0]);
        // C is looked up once; the root (creator of map 50) never is.
        assert_eq!(source.user_lookups(), vec![2, 3, 4]);
        assert_eq!(visited[&4].depth, 2);
    }

    #[tokio::test]
    async fn test_cycle_terminates() {
        let source = FakeSource::new()
            .with_favourites(1, vec![beatmapset(10, 2)])
            .with_favourites(2, vec![beatmapset(20, 1)]);
        let walker = Walker::new(&source, PagePolicy::Declared);

        let visited = walker.expand(user(1, 1), 100).await.unwrap();

        assert_eq!(visited.len(), 2);
        assert_eq!(source.list_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_depth_limits_expansion() {
        let source = FakeSource::new()
            .with_favourites(1, vec![beatmapset(10, 2)])
            .with_favourites(2, vec![beatmapset(20, 3)])
            .with_favourites(3, vec![beatmapset(30, 4)]);
        let walker = Walker::new(&source, PagePolicy::Declared);

        let visited = walker.expand(user(1, 1), 2).await.unwrap();

        assert_eq!(visited.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(source.user_lookups(), vec![2]);
    }

    #[tokio::test]
    async fn test_union_deduplicates_across_users() {
        let source = FakeSource::new()
            .with_favourites(1, vec![beatmapset(10, 2), beatmapset(11, 2)])
            .with_favourites(2, vec![beatmapset(11, 2), beatmapset(12, 1)]);
        let walker = Walker::new(&source, PagePolicy::Declared);

        let visited = walker.expand(user(1, 2), 3).await.unwrap();
        let all = union(&visited);

        assert_eq!(all.ids().collect::<Vec<_>>(), vec![10, 11, 12]);
    }

    #[tokio::test]
    async fn test_missing_creator_profile_is_fatal() {
        let source = FakeSource::new().with_favourites(1, vec![beatmapset(10, 77)]);
        let walker = Walker::new(&source, PagePolicy::Declared);

        assert!(walker.expand(user(1, 1), 2).await.is_err());
    }
}

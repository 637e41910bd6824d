//! API response type definitions.
//!
//! Only the fields the downloader needs are modelled; serde ignores the rest.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::category::Category;

/// A beatmapset as returned by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beatmapset {
    pub id: u64,
    /// Creator (mapper) of the set.
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub title: String,
}

/// Wrapper object used by the scores and most-played listings.
///
/// Both `Score` and `BeatmapPlaycount` embed exactly one beatmapset.
#[derive(Debug, Clone, Deserialize)]
pub struct BeatmapsetEnvelope {
    pub beatmapset: Beatmapset,
}

/// User profile from `users/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub favourite_beatmapset_count: u32,
    #[serde(default, alias = "ranked_and_approved_beatmapset_count")]
    pub ranked_beatmapset_count: u32,
    #[serde(default)]
    pub loved_beatmapset_count: u32,
    #[serde(default)]
    pub pending_beatmapset_count: u32,
    #[serde(default)]
    pub graveyard_beatmapset_count: u32,
    #[serde(default)]
    pub beatmap_playcounts_count: u32,
    #[serde(default)]
    pub scores_best_count: u32,
    #[serde(default)]
    pub scores_first_count: u32,
}

impl User {
    /// Profile-declared number of items in a category.
    pub fn declared_count(&self, category: Category) -> u32 {
        match category {
            Category::Favourite => self.favourite_beatmapset_count,
            Category::Ranked => self.ranked_beatmapset_count,
            Category::Loved => self.loved_beatmapset_count,
            Category::Pending => self.pending_beatmapset_count,
            Category::Graveyard => self.graveyard_beatmapset_count,
            Category::MostPlayed => self.beatmap_playcounts_count,
            Category::Best => self.scores_best_count,
            Category::Firsts => self.scores_first_count,
        }
    }

    /// Sum of the declared counts of `categories`.
    ///
    /// Overlapping categories are counted once per category, so this is an
    /// upper bound on the unique beatmapsets.
    pub fn declared_total(&self, categories: &[Category]) -> usize {
        categories
            .iter()
            .map(|&category| self.declared_count(category) as usize)
            .sum()
    }

    /// Declared counts for every category.
    pub fn declared_counts(&self) -> HashMap<Category, u32> {
        Category::ALL
            .iter()
            .map(|&category| (category, self.declared_count(category)))
            .collect()
    }
}

/// Body of the OAuth client-credentials request.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub client_id: u64,
    pub client_secret: &'a str,
    pub grant_type: &'static str,
    pub scope: &'static str,
}

/// OAuth token response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_total_does_not_overflow() {
        let user = User {
            favourite_beatmapset_count: u32::MAX,
            beatmap_playcounts_count: u32::MAX,
            loved_beatmapset_count: 5,
            ..Default::default()
        };

        assert_eq!(
            user.declared_total(&[Category::Favourite, Category::MostPlayed]),
            2 * u32::MAX as usize
        );
        assert_eq!(user.declared_total(&[Category::Loved]), 5);
        assert_eq!(user.declared_total(&[]), 0);
    }

    #[test]
    fn test_user_declared_counts() {
        let user: User = serde_json::from_str(
            r#"{
                "id": 2,
                "username": "peppy",
                "favourite_beatmapset_count": 150,
                "ranked_and_approved_beatmapset_count": 7,
                "beatmap_playcounts_count": 3,
                "scores_first_count": 1,
                "avatar_url": "ignored"
            }"#,
        )
        .unwrap();

        assert_eq!(user.declared_count(Category::Favourite), 150);
        assert_eq!(user.declared_count(Category::Ranked), 7);
        assert_eq!(user.declared_count(Category::MostPlayed), 3);
        assert_eq!(user.declared_count(Category::Firsts), 1);
        assert_eq!(user.declared_count(Category::Loved), 0);

        let counts = user.declared_counts();
        assert_eq!(counts.len(), Category::ALL.len());
        assert_eq!(counts[&Category::Favourite], 150);
    }

    #[test]
    fn test_beatmapset_missing_metadata_defaults() {
        let set: Beatmapset = serde_json::from_str(r#"{"id": 41823}"#).unwrap();
        assert_eq!(set.id, 41823);
        assert_eq!(set.user_id, 0);
        assert!(set.artist.is_empty());
    }
}

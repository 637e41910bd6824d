//! Beatmapset categories and their per-category request/decoding rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::types::{Beatmapset, BeatmapsetEnvelope};
use crate::error::{Error, Result};

/// Profile collections a user's beatmapsets can be listed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Favourite,
    Ranked,
    Loved,
    Pending,
    Graveyard,
    MostPlayed,
    /// Top scores.
    Best,
    /// First places.
    Firsts,
}

/// Which listing endpoint family a category lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `users/{id}/beatmapsets/{type}`
    Beatmapsets,
    /// `users/{id}/scores/{type}`, requires a gamemode.
    Scores,
}

/// Shape of a listing response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// A JSON array of beatmapsets.
    Direct,
    /// A JSON array of objects each carrying one `beatmapset`.
    Wrapped,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Favourite,
        Category::Ranked,
        Category::Loved,
        Category::Pending,
        Category::Graveyard,
        Category::MostPlayed,
        Category::Best,
        Category::Firsts,
    ];

    /// Path segment the API uses for this category.
    pub fn api_name(self) -> &'static str {
        match self {
            Category::Favourite => "favourite",
            Category::Ranked => "ranked",
            Category::Loved => "loved",
            Category::Pending => "pending",
            Category::Graveyard => "graveyard",
            Category::MostPlayed => "most_played",
            Category::Best => "best",
            Category::Firsts => "firsts",
        }
    }

    pub fn endpoint(self) -> Endpoint {
        match self {
            Category::Best | Category::Firsts => Endpoint::Scores,
            _ => Endpoint::Beatmapsets,
        }
    }

    pub fn envelope(self) -> Envelope {
        match self {
            Category::Best | Category::Firsts | Category::MostPlayed => Envelope::Wrapped,
            _ => Envelope::Direct,
        }
    }

    /// Whether requests for this category carry a `mode` parameter.
    pub fn needs_gamemode(self) -> bool {
        self.endpoint() == Endpoint::Scores
    }

    /// Listing path relative to the API base URL.
    pub fn listing_path(self, user_id: u64) -> String {
        let family = match self.endpoint() {
            Endpoint::Beatmapsets => "beatmapsets",
            Endpoint::Scores => "scores",
        };
        format!("users/{}/{}/{}", user_id, family, self.api_name())
    }
}

impl Envelope {
    /// Decode a listing body into beatmapsets, unwrapping envelopes if needed.
    pub fn decode(self, body: &[u8], context: &str) -> Result<Vec<Beatmapset>> {
        let decode_err = |source| Error::Decode {
            context: context.to_string(),
            source,
        };

        match self {
            Envelope::Direct => serde_json::from_slice(body).map_err(decode_err),
            Envelope::Wrapped => {
                let wrapped: Vec<BeatmapsetEnvelope> =
                    serde_json::from_slice(body).map_err(decode_err)?;
                Ok(wrapped.into_iter().map(|w| w.beatmapset).collect())
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Favourite => write!(f, "favourites"),
            Category::Ranked => write!(f, "ranked"),
            Category::Loved => write!(f, "loved"),
            Category::Pending => write!(f, "pending"),
            Category::Graveyard => write!(f, "graveyard"),
            Category::MostPlayed => write!(f, "most played"),
            Category::Best => write!(f, "top scores"),
            Category::Firsts => write!(f, "first places"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "favourite" | "favorite" | "favourites" | "favorites" => Ok(Category::Favourite),
            "ranked" => Ok(Category::Ranked),
            "loved" => Ok(Category::Loved),
            "pending" => Ok(Category::Pending),
            "graveyard" => Ok(Category::Graveyard),
            "most_played" => Ok(Category::MostPlayed),
            "best" | "top_scores" => Ok(Category::Best),
            "firsts" | "first_places" => Ok(Category::Firsts),
            _ => Err(format!("Unknown beatmapset category: {}", s)),
        }
    }
}

//! Content identifiers as received from addon clients.
//!
//! Movies are addressed by their bare external id (`tt0111161`), episodes by
//! a colon-segmented form (`tt0903747:1:3`). Kitsu ids live in their own
//! namespace (`kitsu:1376`, `kitsu:1376:12`) and carry no season.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static IMDB_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^tt\d+$").unwrap());
static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// Resource type requested by the client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Movie,
    Series,
    Anime,
    Other,
}

impl ContentKind {
    /// Resource type as it appears in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Anime => "anime",
            Self::Other => "other",
        }
    }
}

impl FromStr for ContentKind {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            "anime" => Ok(Self::Anime),
            "other" => Ok(Self::Other),
            _ => Err(IdentifierError::UnknownKind(s.to_string())),
        }
    }
}

/// Identifier scheme of the primary id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IdNamespace {
    Imdb,
    Kitsu,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Empty content identifier")]
    Empty,

    #[error("Unknown content type: {0}")]
    UnknownKind(String),

    #[error("Unsupported identifier namespace: {0}")]
    UnsupportedNamespace(String),

    #[error("Malformed content identifier: {0}")]
    Malformed(String),
}

/// A parsed, immutable content identifier.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct ContentIdentifier {
    namespace: IdNamespace,
    primary_id: String,
    season: Option<u32>,
    episode: Option<u32>,
    is_series: bool,
}

impl ContentIdentifier {
    /// Parse a raw request id for the given resource type.
    pub fn parse(raw: &str, kind: ContentKind) -> Result<Self, IdentifierError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(IdentifierError::Empty);
        }

        let parts: Vec<&str> = raw.split(':').collect();
        let malformed = || IdentifierError::Malformed(raw.to_string());

        let (namespace, primary_id, season, episode) =
            if parts[0].eq_ignore_ascii_case("kitsu") {
                match parts.as_slice() {
                    [_, id] if NUMERIC.is_match(id) => {
                        (IdNamespace::Kitsu, format!("kitsu:{}", id), None, None)
                    }
                    [_, id, episode] if NUMERIC.is_match(id) => (
                        IdNamespace::Kitsu,
                        format!("kitsu:{}", id),
                        None,
                        Some(parse_number(episode).ok_or_else(malformed)?),
                    ),
                    _ => return Err(malformed()),
                }
            } else if IMDB_ID.is_match(parts[0]) {
                match parts.as_slice() {
                    [id] => (IdNamespace::Imdb, id.to_string(), None, None),
                    [id, season, episode] => (
                        IdNamespace::Imdb,
                        id.to_string(),
                        Some(parse_number(season).ok_or_else(malformed)?),
                        Some(parse_number(episode).ok_or_else(malformed)?),
                    ),
                    _ => return Err(malformed()),
                }
            } else {
                return Err(IdentifierError::UnsupportedNamespace(parts[0].to_string()));
            };

        // Only the requested kind picks the endpoint; episode segments on an
        // anime or movie request still go to the movie catalog.
        let is_series = kind == ContentKind::Series;

        Ok(Self {
            namespace,
            primary_id,
            season,
            episode,
            is_series,
        })
    }

    pub fn namespace(&self) -> IdNamespace {
        self.namespace
    }

    /// External catalog id, e.g. `tt0903747` or `kitsu:1376`.
    pub fn primary_id(&self) -> &str {
        &self.primary_id
    }

    pub fn season(&self) -> Option<u32> {
        self.season
    }

    pub fn episode(&self) -> Option<u32> {
        self.episode
    }

    pub fn is_series(&self) -> bool {
        self.is_series
    }

    /// Path segment of the upstream catalog endpoint.
    pub fn catalog_kind(&self) -> &'static str {
        if self.is_series {
            "tv"
        } else {
            "movie"
        }
    }
}

impl fmt::Display for ContentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary_id)?;
        if let Some(season) = self.season {
            write!(f, ":{}", season)?;
        }
        if let Some(episode) = self.episode {
            write!(f, ":{}", episode)?;
        }
        Ok(())
    }
}

fn parse_number(segment: &str) -> Option<u32> {
    if NUMERIC.is_match(segment) {
        segment.parse().ok()
    } else {
        None
    }
}

//! Challenge-response token for the upstream catalog.
//!
//! Every catalog request carries a `dmmProblemKey` (random token plus
//! trusted timestamp) and a `solution` derived from two obfuscated hashes.
//! A payload is generated per pipeline execution and never reused.

mod hash;
mod time_source;

pub use hash::{combine_hashes, dual_hash};
pub use time_source::{parse_iso_timestamp, HttpTimeSource, TimeSource};

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Salt mixed into the second hash.
pub const CHALLENGE_SALT: &str = "debridmediamanager.com%%fe7#td00rA3vHz%VmI";

#[derive(Debug, Clone, Error)]
pub enum ChallengeError {
    #[error("Trusted time source unavailable: {0}")]
    UpstreamTimeUnavailable(String),

    #[error("Time source configuration error: {0}")]
    Configuration(String),
}

/// The two halves of an authentication challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengePayload {
    /// `<token>-<epoch seconds>`
    pub problem_key: String,
    pub solution: String,
}

/// Produces challenge payloads stamped with a trusted timestamp.
pub struct ChallengeTokenGenerator {
    time_source: Arc<dyn TimeSource>,
    max_clock_skew_secs: u64,
}

impl ChallengeTokenGenerator {
    pub fn new(time_source: Arc<dyn TimeSource>, max_clock_skew_secs: u64) -> Self {
        Self {
            time_source,
            max_clock_skew_secs,
        }
    }

    /// Generate a fresh payload. A single time source failure aborts
    /// generation; there is no retry.
    pub async fn generate(&self) -> Result<ChallengePayload, ChallengeError> {
        let token = random_token();
        let epoch = self.time_source.now_epoch_secs().await?;

        let skew = Utc::now().timestamp().abs_diff(epoch);
        if skew > self.max_clock_skew_secs {
            warn!(
                source = self.time_source.name(),
                skew_secs = skew,
                "Local clock diverges from trusted time"
            );
        }

        let payload = solve(&token, epoch);
        debug!(problem_key = %payload.problem_key, "Generated catalog challenge");
        Ok(payload)
    }
}

/// Derive the payload for a given token and timestamp.
pub fn solve(token: &str, epoch_secs: i64) -> ChallengePayload {
    let problem_key = format!("{}-{}", token, epoch_secs);
    let timestamp_hash = dual_hash(&problem_key);
    let salt_hash = dual_hash(&format!("{}-{}", CHALLENGE_SALT, token));

    ChallengePayload {
        solution: combine_hashes(&timestamp_hash, &salt_hash),
        problem_key,
    }
}

/// Eight lowercase hex characters.
fn random_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(8);
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTimeSource;

    #[test]
    fn test_solve_known_token() {
        let payload = solve("deadbeef", 1_700_000_000);
        assert_eq!(payload.problem_key, "deadbeef-1700000000");
        assert_eq!(payload.solution, "4f032ab9a9b3e94e");

        let payload = solve("0a1b2c3d", 1_712_345_678);
        assert_eq!(payload.solution, "27f0dbc09221d88b");
    }

    #[test]
    fn test_random_token_shape() {
        let token = random_token();
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(random_token(), random_token());
    }

    #[tokio::test]
    async fn test_generate_uses_trusted_time() {
        let source = Arc::new(MockTimeSource::fixed(1_700_000_000));
        let generator = ChallengeTokenGenerator::new(source.clone(), 30);

        let payload = generator.generate().await.unwrap();
        let (token, epoch) = payload.problem_key.split_once('-').unwrap();
        assert_eq!(epoch, "1700000000");
        assert_eq!(payload, solve(token, 1_700_000_000));
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_fresh_payload_each_call() {
        let generator =
            ChallengeTokenGenerator::new(Arc::new(MockTimeSource::fixed(1_700_000_000)), 30);
        let first = generator.generate().await.unwrap();
        let second = generator.generate().await.unwrap();
        assert_ne!(first.problem_key, second.problem_key);
    }

    #[tokio::test]
    async fn test_generate_fails_without_time() {
        let source = Arc::new(MockTimeSource::unavailable());
        let generator = ChallengeTokenGenerator::new(source.clone(), 30);

        let err = generator.generate().await.unwrap_err();
        assert!(matches!(err, ChallengeError::UpstreamTimeUnavailable(_)));
        assert_eq!(source.call_count(), 1);
    }
}

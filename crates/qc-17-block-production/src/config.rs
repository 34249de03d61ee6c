//! Configuration types for block production

use serde::Deserialize;
use shared_types::{Predicate, CURRENT_BLOCK_VERSION, DEFAULT_MAX_BLOCK_RUNLIMIT};

use crate::error::BuildError;

/// What the header's `runlimit` field records
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunlimitPolicy {
    /// Sum of the costs of the block's transactions
    #[default]
    Accumulated,
    /// The configured block ceiling
    Ceiling,
}

/// Runtime configuration for a builder session
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Version stamped into built headers
    pub block_version: u32,

    /// Maximum accumulated transaction cost per block
    pub max_block_runlimit: i64,

    /// Which runlimit goes into the header
    pub runlimit_policy: RunlimitPolicy,

    /// Predicate for the next block (None = carry the snapshot's forward)
    pub next_predicate: Option<Predicate>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            block_version: CURRENT_BLOCK_VERSION,
            max_block_runlimit: DEFAULT_MAX_BLOCK_RUNLIMIT,
            runlimit_policy: RunlimitPolicy::default(),
            next_predicate: None,
        }
    }
}

impl BuilderConfig {
    /// Replace the next-block predicate
    pub fn with_next_predicate(mut self, predicate: Predicate) -> Self {
        self.next_predicate = Some(predicate);
        self
    }

    /// Replace the runlimit policy
    pub fn with_runlimit_policy(mut self, policy: RunlimitPolicy) -> Self {
        self.runlimit_policy = policy;
        self
    }

    /// Reject configurations no builder session can run with
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.block_version == 0 {
            return Err(BuildError::InvalidConfig(
                "block_version must be at least 1".into(),
            ));
        }
        if self.max_block_runlimit < 0 {
            return Err(BuildError::InvalidConfig(format!(
                "max_block_runlimit must be non-negative, got {}",
                self.max_block_runlimit
            )));
        }
        if let Some(predicate) = &self.next_predicate {
            predicate.check()?;
        }
        Ok(())
    }
}

//! Resolver configuration.

use crate::signature::SignatureMode;
use memres_common::limits::MAX_HIERARCHY_DEPTH;
use serde::{Deserialize, Serialize};

/// How classifiers reached along more than one supertype path contribute.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisitPolicy {
    /// Every path contributes; diamonds are resolved by override rank.
    #[default]
    AllPaths,
    /// Members of a classifier already contributed through an earlier direct
    /// supertype are skipped.
    ///
    /// Can hide a conflict, or a more specific override, that is only
    /// reachable through a later path.
    FirstPathWins,
}

/// Which signature regime keys the merged table of a classifier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureModePolicy {
    /// Binary keys when the supertype closure mixes native and foreign
    /// classifiers, logical keys otherwise.
    #[default]
    Auto,
    Logical,
    Binary,
}

impl SignatureModePolicy {
    /// The regime for a closure containing the given origins.
    pub fn mode_for(self, has_native: bool, has_foreign: bool) -> SignatureMode {
        match self {
            Self::Auto if has_native && has_foreign => SignatureMode::Binary,
            Self::Auto | Self::Logical => SignatureMode::Logical,
            Self::Binary => SignatureMode::Binary,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    pub revisit_policy: RevisitPolicy,
    /// Longest supertype chain walked before failing with
    /// `DepthLimitExceeded`.
    pub max_hierarchy_depth: u32,
    /// Panic when a supertype cycle is pruned.
    pub assert_on_cycle: bool,
    pub signature_mode: SignatureModePolicy,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            revisit_policy: RevisitPolicy::AllPaths,
            max_hierarchy_depth: MAX_HIERARCHY_DEPTH,
            assert_on_cycle: cfg!(debug_assertions),
            signature_mode: SignatureModePolicy::Auto,
        }
    }
}

impl ResolverOptions {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_revisit_policy(mut self, policy: RevisitPolicy) -> Self {
        self.revisit_policy = policy;
        self
    }

    pub fn with_max_hierarchy_depth(mut self, depth: u32) -> Self {
        self.max_hierarchy_depth = depth;
        self
    }

    pub fn with_assert_on_cycle(mut self, assert: bool) -> Self {
        self.assert_on_cycle = assert;
        self
    }

    pub fn with_signature_mode(mut self, mode: SignatureModePolicy) -> Self {
        self.signature_mode = mode;
        self
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;

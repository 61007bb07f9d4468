//! Artifact Catalog and Weighted Draws
//!
//! Relics are pure data records: id, rarity tier, and an ordered effect
//! list. The catalog validates everything eagerly at load; draws walk a
//! weighted candidate list and never come back empty-handed from a
//! non-empty pool.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::rng::SeededRng;
use crate::game::config::DUPLICATE_PENALTY;
use crate::game::effect::{validate_effects, Effect, EffectError};

/// Five-tier rarity classification governing draw weight.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Rarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Mythic = 3,
    Timeless = 4,
}

impl Rarity {
    /// All tiers in ascending order.
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Mythic,
        Rarity::Timeless,
    ];

    /// Base selection weight before mode bias.
    pub fn base_weight(self) -> f64 {
        match self {
            Rarity::Common => 6.0,
            Rarity::Uncommon => 4.0,
            Rarity::Rare => 2.0,
            Rarity::Mythic => 0.75,
            Rarity::Timeless => 0.25,
        }
    }

    /// Tier index into bias arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Mythic => "mythic",
            Rarity::Timeless => "timeless",
        }
    }
}

/// One relic record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub summary: String,
    pub effects: Vec<Effect>,
}

/// Catalog load failures. These are programmer/data errors and fail fast
/// during ingestion, never during simulation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("artifact catalog is empty")]
    Empty,

    #[error("artifact id must not be empty")]
    EmptyId,

    #[error("duplicate artifact id: {0}")]
    DuplicateId(String),

    #[error("artifact {artifact}: {source}")]
    BadEffect {
        artifact: String,
        source: EffectError,
    },
}

/// Parameters for one weighted draw.
pub struct DrawRequest<'a> {
    /// Per-tier bias multiplied into the base rarity weight.
    pub bias: [f64; 5],
    /// Restrict to one rarity tier.
    pub rarity: Option<Rarity>,
    /// Restrict to an explicit id pool.
    pub pool: Option<&'a [String]>,
    /// Owned ids; candidates in this set are penalized, never excluded.
    pub owned: &'a BTreeSet<String>,
    /// Extra per-tier multiplier for gacha draws.
    pub gacha_bonus: Option<&'a [f64; 5]>,
}

/// Validated, indexed artifact catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtifactCatalog {
    artifacts: Vec<Artifact>,
    index: BTreeMap<String, usize>,
}

impl ArtifactCatalog {
    /// Build a catalog, rejecting malformed records eagerly.
    pub fn new(artifacts: Vec<Artifact>) -> Result<Self, CatalogError> {
        if artifacts.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = BTreeMap::new();
        for (i, artifact) in artifacts.iter().enumerate() {
            if artifact.id.is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if index.insert(artifact.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(artifact.id.clone()));
            }
            validate_effects(&artifact.effects).map_err(|source| CatalogError::BadEffect {
                artifact: artifact.id.clone(),
                source,
            })?;
        }

        Ok(Self { artifacts, index })
    }

    /// Look up an artifact by id.
    pub fn get(&self, id: &str) -> Option<&Artifact> {
        self.index.get(id).map(|&i| &self.artifacts[i])
    }

    /// Whether an id exists in the catalog.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All artifacts in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the catalog holds no records. Construction rejects this,
    /// so only reachable through deserialization of foreign data.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Weighted selection: sum candidate weights, draw uniform in
    /// [0, total), walk candidates subtracting weight. On floating-point
    /// overrun the final candidate is returned - a non-empty pool never
    /// yields nothing.
    pub fn weighted_draw(&self, rng: &mut SeededRng, request: &DrawRequest) -> Option<&Artifact> {
        let candidates: Vec<(&Artifact, f64)> = self
            .artifacts
            .iter()
            .filter(|a| request.rarity.map_or(true, |r| a.rarity == r))
            .filter(|a| {
                request
                    .pool
                    .map_or(true, |pool| pool.iter().any(|id| id == &a.id))
            })
            .map(|a| {
                let tier = a.rarity.index();
                let mut weight = a.rarity.base_weight() * request.bias[tier];
                if let Some(bonus) = request.gacha_bonus {
                    weight *= bonus[tier];
                }
                if request.owned.contains(&a.id) {
                    weight *= DUPLICATE_PENALTY;
                }
                (a, weight)
            })
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let total: f64 = candidates.iter().map(|(_, w)| w).sum();
        let mut roll = rng.next_f64() * total;
        for (artifact, weight) in &candidates {
            roll -= weight;
            if roll <= 0.0 {
                return Some(artifact);
            }
        }
        candidates.last().map(|(artifact, _)| *artifact)
    }
}

// =============================================================================
// TESTS
// =============================================================================

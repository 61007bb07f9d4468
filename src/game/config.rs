//! Run Configuration
//!
//! Tuning constants, mode/length descriptors, and the party scaling
//! computed once from the settled roster size.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Interval between host simulation ticks.
pub const TICK_INTERVAL_MS: u64 = 1400;

/// Starting sanity for a solo run.
pub const BASE_SANITY: f64 = 100.0;

/// Base per-tick sanity drain multiplier.
pub const BASE_DRAIN: f64 = 1.0;

/// Momentum cap for a solo run.
pub const BASE_MOMENTUM_CAP: f64 = 100.0;

/// Bounds the drain rate can be pushed to by relic effects.
pub const DRAIN_FLOOR: f64 = 0.1;
/// Upper drain bound.
pub const DRAIN_CEILING: f64 = 4.0;

/// Passive cooling per tick while the flux is frozen.
pub const PASSIVE_COOL_RATE: f64 = 1.2;
/// Cooling per tick while the flux is calm.
pub const CALM_COOL_RATE: f64 = 2.8;
/// Heating per tick while the flux is active.
pub const ACTIVE_HEAT_RATE: f64 = 2.4;
/// Heating per tick while the flux is surging.
pub const SURGE_HEAT_RATE: f64 = 4.2;

/// Weight multiplier applied to an already-owned artifact in gacha and
/// grant draws. Never zero: duplicates stay possible, just rarer.
pub const DUPLICATE_PENALTY: f64 = 0.35;

/// Whether the run is played alone or with a replicated party.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyMode {
    #[default]
    Solo,
    Coop,
}

/// Run length: a fixed chamber count, or endless descent that never ends
/// in success.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunLength {
    Rooms(u32),
    Unbounded,
}

impl RunLength {
    /// Total rooms needed for a successful escape, if bounded.
    pub fn total_rooms(self) -> Option<u32> {
        match self {
            RunLength::Rooms(n) => Some(n),
            RunLength::Unbounded => None,
        }
    }
}

/// A selectable run length with its display label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunLengthSpec {
    pub label: String,
    pub length: RunLength,
}

/// Difficulty mode settings.
///
/// `rarity_bias` and `gacha_rarity_bonus` are indexed by
/// [`crate::game::artifact::Rarity`] tier order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModeConfig {
    pub label: String,
    pub rarity_bias: [f64; 5],
    pub gacha_rarity_bonus: [f64; 5],
    pub gacha_charges: u32,
    pub combo_intensity: f64,
}

impl ModeConfig {
    /// Reject modes that would zero out a rarity tier or produce
    /// non-finite weights; a zero weight would make the walk-subtract
    /// draw silently unreachable for that tier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for &bias in self.rarity_bias.iter().chain(self.gacha_rarity_bonus.iter()) {
            if !bias.is_finite() || bias <= 0.0 {
                return Err(ConfigError::InvalidRarityBias {
                    mode: self.label.clone(),
                    bias,
                });
            }
        }
        if !self.combo_intensity.is_finite() || self.combo_intensity <= 0.0 {
            return Err(ConfigError::InvalidComboIntensity {
                mode: self.label.clone(),
                intensity: self.combo_intensity,
            });
        }
        Ok(())
    }
}

/// Configuration errors caught at load time.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Rarity bias must be finite and positive.
    #[error("mode {mode}: rarity bias {bias} must be finite and positive")]
    InvalidRarityBias { mode: String, bias: f64 },

    /// Combo intensity must be finite and positive.
    #[error("mode {mode}: combo intensity {intensity} must be finite and positive")]
    InvalidComboIntensity { mode: String, intensity: f64 },

    /// Roster must contain at least one player.
    #[error("run configuration requires at least one player")]
    EmptyRoster,
}

/// One player in the settled roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
}

/// Balancing multipliers for a party of size `n`, computed once at run
/// configuration time from the settled roster.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartyScaling {
    /// Starting sanity multiplier.
    pub sanity: f64,
    /// Drain rate multiplier.
    pub drain: f64,
    /// Momentum cap multiplier.
    pub momentum_cap: f64,
    /// Discovery / combo / gacha bonus multiplier.
    pub bonus: f64,
    /// Rarity bias multiplier.
    pub rarity_bias: f64,
}

impl PartyScaling {
    /// Scaling for a party of `n` players. Solo (`n == 1`) is identity.
    pub fn for_size(n: usize) -> Self {
        let extra = n.saturating_sub(1) as f64;
        Self {
            sanity: 1.0 + 0.35 * extra,
            drain: 1.0 + 0.18 * extra,
            momentum_cap: 1.0 + 0.12 * extra,
            bonus: 1.0 + 0.15 * extra,
            rarity_bias: 1.0 + 0.08 * extra,
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub seed: u32,
    pub mode_key: String,
    pub length_key: String,
    pub mode: ModeConfig,
    pub length: RunLength,
    pub roster: Vec<RosterEntry>,
    pub party_mode: PartyMode,
}

impl RunConfig {
    /// Resolve mode and length keys against loaded tables.
    pub fn resolve(
        seed: u32,
        mode_key: &str,
        length_key: &str,
        roster: Vec<RosterEntry>,
        party_mode: PartyMode,
        modes: &BTreeMap<String, ModeConfig>,
        lengths: &BTreeMap<String, RunLengthSpec>,
    ) -> Result<Self, crate::content::ContentError> {
        if roster.is_empty() {
            return Err(crate::content::ContentError::Config(ConfigError::EmptyRoster));
        }
        let mode = modes
            .get(mode_key)
            .cloned()
            .ok_or_else(|| crate::content::ContentError::UnknownMode(mode_key.to_string()))?;
        let length = lengths
            .get(length_key)
            .map(|spec| spec.length)
            .ok_or_else(|| crate::content::ContentError::UnknownLength(length_key.to_string()))?;
        Ok(Self {
            seed,
            mode_key: mode_key.to_string(),
            length_key: length_key.to_string(),
            mode,
            length,
            roster,
            party_mode,
        })
    }

    /// Scaling for this run's roster.
    pub fn scaling(&self) -> PartyScaling {
        PartyScaling::for_size(self.roster.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solo_scaling_is_identity() {
        let scaling = PartyScaling::for_size(1);
        assert_eq!(scaling.sanity, 1.0);
        assert_eq!(scaling.drain, 1.0);
        assert_eq!(scaling.momentum_cap, 1.0);
        assert_eq!(scaling.bonus, 1.0);
        assert_eq!(scaling.rarity_bias, 1.0);
    }

    #[test]
    fn test_party_scaling_grows_with_roster() {
        let duo = PartyScaling::for_size(2);
        let trio = PartyScaling::for_size(3);

        assert!(duo.sanity > 1.0);
        assert!(trio.sanity > duo.sanity);
        assert!(trio.drain > duo.drain);
        assert!(trio.momentum_cap > duo.momentum_cap);

        // The published balancing curve for a duo.
        assert!((duo.sanity - 1.35).abs() < 1e-9);
        assert!((duo.drain - 1.18).abs() < 1e-9);
        assert!((duo.momentum_cap - 1.12).abs() < 1e-9);
        assert!((duo.rarity_bias - 1.08).abs() < 1e-9);
    }

    #[test]
    fn test_zero_size_party_clamps() {
        // Degenerate input never produces sub-solo scaling.
        let scaling = PartyScaling::for_size(0);
        assert_eq!(scaling.sanity, 1.0);
    }

    #[test]
    fn test_mode_validation_rejects_zero_bias() {
        let mode = ModeConfig {
            label: "broken".to_string(),
            rarity_bias: [1.0, 1.0, 0.0, 1.0, 1.0],
            gacha_rarity_bonus: [1.0; 5],
            gacha_charges: 2,
            combo_intensity: 1.5,
        };
        assert!(mode.validate().is_err());
    }

    #[test]
    fn test_run_length_totals() {
        assert_eq!(RunLength::Rooms(5).total_rooms(), Some(5));
        assert_eq!(RunLength::Unbounded.total_rooms(), None);
    }
}

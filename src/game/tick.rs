//! Temporal Flux Tick
//!
//! The fixed-cadence pressure loop that must be 100% deterministic.
//! Host-only: clients never tick their mirrors.

use crate::game::state::{RunSimulation, TemporalState};
use crate::game::story;

/// Run one flux tick.
///
/// # Determinism
///
/// Every gameplay-affecting draw (swing roll, direction, magnitude) goes
/// through the simulation's active generator; the optional flavor line
/// attached to a swing comes from a derived stream keyed by the tick, so
/// cosmetic output never perturbs replay.
pub fn tick(sim: &mut RunSimulation) {
    if sim.game_over {
        return;
    }

    sim.tick_count += 1;

    match sim.temporal_state {
        TemporalState::Frozen => {
            sim.cool_momentum(-TemporalState::Frozen.tick_momentum());
            ambient_swing(sim);
        }
        TemporalState::Calm => {
            sim.cool_momentum(-TemporalState::Calm.tick_momentum());
            ambient_swing(sim);
            decay_event_ticks(sim);
        }
        TemporalState::Active | TemporalState::Surge => {
            sim.heat_momentum(sim.temporal_state.tick_momentum());
            if sim.game_over {
                return;
            }
            apply_drift(sim);
            ambient_swing(sim);
            decay_event_ticks(sim);
        }
    }
}

/// Sanity drift proportional to the drain rate and state intensity.
fn apply_drift(sim: &mut RunSimulation) {
    if sim.game_over {
        return;
    }
    let drift = -sim.drain_rate * sim.temporal_state.drift_multiplier();
    if drift.abs() < 0.01 {
        return;
    }
    sim.adjust_sanity(drift, None);
}

/// Probabilistic small sanity swing, scaled by state intensity.
fn ambient_swing(sim: &mut RunSimulation) {
    if sim.game_over {
        return;
    }
    let state = sim.temporal_state;
    if !sim.rng.next_bool(state.ambient_chance()) {
        return;
    }
    let negative = sim.rng.next_bool(state.ambient_negative_bias());
    let magnitude = 0.8 + sim.rng.next_f64() * state.ambient_scale();
    let delta = if negative { -magnitude } else { magnitude };

    let message = story::ambient_line(sim.seed, sim.tick_count, negative);
    sim.adjust_sanity(delta, message.as_deref());
}

/// Count the event window down; when it closes, the state decays one
/// step toward frozen.
fn decay_event_ticks(sim: &mut RunSimulation) {
    if sim.event_ticks > 0 {
        sim.event_ticks -= 1;
        if sim.event_ticks == 0 {
            match sim.temporal_state {
                TemporalState::Active | TemporalState::Surge => {
                    sim.settle_temporal_flow(TemporalState::Calm, 3);
                }
                _ => sim.settle_temporal_flow(TemporalState::Frozen, 0),
            }
        }
    } else if sim.temporal_state == TemporalState::Calm {
        sim.settle_temporal_flow(TemporalState::Frozen, 0);
    }
}

// =============================================================================
// TESTS
// =============================================================================

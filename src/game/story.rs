//! Narrative Embellishment
//!
//! Flavor text generated from derived RNG streams keyed on the run seed.
//! Everything in this module is cosmetic: consuming these streams never
//! advances the active gameplay generator, and two different keys never
//! desynchronize each other.

use crate::core::rng::{derive_rng, SeededRng};
use crate::game::state::SearchAction;

const SEARCH_VERBS: [&str; 10] = [
    "Sweep",
    "Harmonize",
    "Pulse",
    "Trace",
    "Amplify",
    "Coax",
    "Invert",
    "Entangle",
    "Focus",
    "Disperse",
];

const SEARCH_TOOLS: [&str; 10] = [
    "chrono brush",
    "resonator fork",
    "ghostlight filament",
    "brass familiar",
    "memory coil",
    "steam lens",
    "sand sifter",
    "auric prism",
    "echo lantern",
    "clockwork beetle",
];

const SEARCH_FOCUSES: [&str; 10] = [
    "along the glass seam",
    "beneath the drifting gears",
    "within the suspended sands",
    "at the fractured glyphs",
    "through the inner lattice",
    "around the temporal eddies",
    "near the mirrored basin",
    "over the gravity fissure",
    "by the suspended pendulums",
    "under the shadowed arch",
];

const SEARCH_SUCCESS_LINES: [&str; 6] = [
    "Sand funnels toward {artifact}, outlining its frame.",
    "A brass glow pulses in rhythm with {artifact}.",
    "Echoes converge and the form of {artifact} resolves.",
    "The chamber exhales as {artifact} surfaces from the drift.",
    "Temporal frost melts away, revealing {artifact}.",
    "Concentric ripples unveil the hidden {artifact}.",
];

const SEARCH_FAILURE_LINES: [&str; 5] = [
    "The sands snarl and scatter from your reach.",
    "A surge of static pushes your senses back.",
    "The pattern collapses, leaving only stale echoes.",
    "Pressure builds; the hourglass rejects that motion.",
    "Your approach fractures into useless vibrations.",
];

const ALIASES: [&str; 5] = [
    "Echo Runner",
    "Glass Scribe",
    "Sand Cartographer",
    "Flux Warden",
    "Paradox Courier",
];

const COMPANIONS: [&str; 5] = [
    "fractured echo",
    "brass familiar",
    "clockwork shade",
    "memory twin",
    "signal phantom",
];

const OMENS: [&str; 5] = [
    "copper storms",
    "glass avalanches",
    "magnetic rain",
    "soft chimes",
    "distant bells",
];

const DESTINATIONS: [&str; 5] = [
    "the Silent Apex",
    "the Hourwarden's Heart",
    "the Meridian Vault",
    "the Final Balcony",
    "the Stillpoint Atrium",
];

const TEXTURES: [&str; 5] = [
    "glass dust",
    "clockwork pollen",
    "chronal mist",
    "brass filings",
    "suspended sparks",
];

const MOODS: [&str; 4] = ["hums", "glows", "shivers", "thrums"];

const POSITIVE_LINES: [&str; 3] = [
    "Your {companion} hums in rhythm, lending a breath of calm.",
    "{companion_cap} scatters {texture}, soothing the flux.",
    "A gentle chord from {companion} steadies your breathing.",
];

const NEGATIVE_LINES: [&str; 3] = [
    "Your {companion} winces as {omen} gnaw at your focus.",
    "{companion_cap} hisses about {omen} brewing in the glass.",
    "Static from {omen} rattles against your thoughts.",
];

/// Story beats fixed for the whole run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoryContext {
    pub alias: &'static str,
    pub companion: &'static str,
    pub omen: &'static str,
    pub destination: &'static str,
}

/// The run's fixed story beats, derived purely from the seed.
pub fn story_context(seed: u32) -> StoryContext {
    let mut rng = derive_rng(seed, "story");
    StoryContext {
        alias: pick(&mut rng, &ALIASES),
        companion: pick(&mut rng, &COMPANIONS),
        omen: pick(&mut rng, &OMENS),
        destination: pick(&mut rng, &DESTINATIONS),
    }
}

/// Opening line announcing the run's cast.
pub fn opening_line(seed: u32) -> String {
    let ctx = story_context(seed);
    format!(
        "Codename {} charts a path toward {}. Your {} stirs at your side.",
        ctx.alias, ctx.destination, ctx.companion
    )
}

/// Intro line for a chamber, stable per instance.
pub fn scene_intro(seed: u32, instance_key: &str, scene_name: &str) -> String {
    let ctx = story_context(seed);
    let mut rng = derive_rng(seed, &format!("{instance_key}:intro"));
    let mood = pick(&mut rng, &MOODS);
    let texture = pick(&mut rng, &TEXTURES);
    format!(
        "{scene_name} {mood} with {texture}; your {} murmurs about {} on the road to {}.",
        ctx.companion, ctx.omen, ctx.destination
    )
}

/// Optional flavor line attached to an ambient sanity swing.
///
/// Gated at the same 35% rate regardless of direction; the swing itself
/// is decided by the active generator before this is consulted.
pub fn ambient_line(seed: u32, tick: u64, negative: bool) -> Option<String> {
    let ctx = story_context(seed);
    let mut rng = derive_rng(seed, &format!("ambient:{tick}"));
    if rng.next_f64() > 0.35 {
        return None;
    }
    let templates: &[&str] = if negative {
        &NEGATIVE_LINES
    } else {
        &POSITIVE_LINES
    };
    let template = pick(&mut rng, templates);
    let texture = pick(&mut rng, &TEXTURES);
    Some(fill_template(template, &ctx, texture))
}

/// The three candidate search actions for a hotspot, stable per
/// instance. Wording only; the success index is rolled by the caller
/// through the active generator.
pub fn search_actions(seed: u32, instance_key: &str, hotspot_id: &str) -> Vec<SearchAction> {
    let mut rng = derive_rng(seed, &format!("{instance_key}:{hotspot_id}:search"));

    let mut verbs = SEARCH_VERBS;
    let mut tools = SEARCH_TOOLS;
    let mut focuses = SEARCH_FOCUSES;
    rng.shuffle(&mut verbs);
    rng.shuffle(&mut tools);
    rng.shuffle(&mut focuses);

    (0..3)
        .map(|index| SearchAction {
            id: format!("{hotspot_id}-search-{index}"),
            label: format!("{} the {}", verbs[index], tools[index]),
            description: format!("Focus {}.", focuses[index]),
        })
        .collect()
}

/// Clue line shown when a search begins.
pub fn search_clue(artifact_name: &str) -> String {
    format!("{artifact_name} leaves a faint wake through the suspended sands.")
}

/// Success line for a found relic.
pub fn search_success_line(seed: u32, instance_key: &str, artifact_name: &str) -> String {
    let mut rng = derive_rng(seed, &format!("{instance_key}:search-success"));
    pick(&mut rng, &SEARCH_SUCCESS_LINES).replace("{artifact}", artifact_name)
}

/// Failure line for a botched search attempt. Varies per attempt.
pub fn search_failure_line(seed: u32, instance_key: &str, attempt: u32) -> String {
    let mut rng = derive_rng(seed, &format!("{instance_key}:search-failure:{attempt}"));
    pick(&mut rng, &SEARCH_FAILURE_LINES).to_string()
}

fn pick<'a>(rng: &mut SeededRng, options: &[&'a str]) -> &'a str {
    options[rng.next_index(options.len())]
}

fn fill_template(template: &str, ctx: &StoryContext, texture: &str) -> String {
    let companion_cap = capitalize(ctx.companion);
    template
        .replace("{companion_cap}", &companion_cap)
        .replace("{companion}", ctx.companion)
        .replace("{omen}", ctx.omen)
        .replace("{texture}", texture)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::SeededRng;

    #[test]
    fn test_story_context_pure() {
        assert_eq!(story_context(42), story_context(42));
        assert_eq!(story_context(7), story_context(7));
    }

    #[test]
    fn test_scene_intro_stable_per_instance() {
        let a = scene_intro(42, "pendulum-atrium#1", "Pendulum Atrium");
        let b = scene_intro(42, "pendulum-atrium#1", "Pendulum Atrium");
        assert_eq!(a, b);
    }

    #[test]
    fn test_search_actions_shape() {
        let actions = search_actions(42, "gearworks-gallery#2", "gallery-artifact");
        assert_eq!(actions.len(), 3);
        for (i, action) in actions.iter().enumerate() {
            assert_eq!(action.id, format!("gallery-artifact-search-{i}"));
            assert!(!action.label.is_empty());
            assert!(action.description.starts_with("Focus "));
        }

        // Stable for the same instance and hotspot.
        assert_eq!(
            actions,
            search_actions(42, "gearworks-gallery#2", "gallery-artifact")
        );
    }

    #[test]
    fn test_story_streams_never_touch_active_stream() {
        let mut active = SeededRng::new(42);
        let control: Vec<u64> = (0..8).map(|_| active.next_u64()).collect();

        let mut active2 = SeededRng::new(42);
        // Drain a pile of cosmetic streams in between.
        let _ = story_context(42);
        let _ = opening_line(42);
        let _ = scene_intro(42, "obsidian-dials#1", "Obsidian Dials");
        let _ = ambient_line(42, 17, true);
        let _ = search_actions(42, "obsidian-dials#1", "dials-artifact");
        let observed: Vec<u64> = (0..8).map(|_| active2.next_u64()).collect();

        assert_eq!(control, observed);
    }

    #[test]
    fn test_ambient_line_deterministic_per_tick() {
        assert_eq!(ambient_line(42, 5, true), ambient_line(42, 5, true));
        assert_eq!(ambient_line(42, 5, false), ambient_line(42, 5, false));
    }

    #[test]
    fn test_template_fill() {
        let ctx = StoryContext {
            alias: "Echo Runner",
            companion: "brass familiar",
            omen: "copper storms",
            destination: "the Silent Apex",
        };
        let line = fill_template(
            "{companion_cap} hisses about {omen} brewing in the glass.",
            &ctx,
            "glass dust",
        );
        assert_eq!(
            line,
            "Brass familiar hisses about copper storms brewing in the glass."
        );
    }
}

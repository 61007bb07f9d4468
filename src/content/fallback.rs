//! Embedded Static Content
//!
//! The default relic catalog, chamber blueprints, and mode/length
//! tables. Used directly by solo builds and as the recovery set when an
//! external source is unreachable or malformed.

use std::collections::BTreeMap;

use crate::game::artifact::{Artifact, Rarity};
use crate::game::config::{ModeConfig, RunLength, RunLengthSpec};
use crate::game::effect::{Direction, Effect, GrantSource};
use crate::game::scene::{
    Dialogue, DialogueChoice, Hotspot, HotspotKind, Puzzle, PuzzleOption, PuzzleOutcome,
    Requirements, SceneTemplate,
};
use crate::game::state::{TemporalState, Tone};

// -----------------------------------------------------------------------------
// Effect shorthands: the catalog below is a wall of data; these keep it
// legible without hiding anything.
// -----------------------------------------------------------------------------

fn sanity(amount: f64, message: &str) -> Effect {
    Effect::Sanity {
        amount,
        message: Some(message.to_string()),
    }
}

fn cool(amount: f64, message: &str) -> Effect {
    Effect::Momentum {
        direction: Direction::Cool,
        amount,
        message: Some(message.to_string()),
    }
}

fn heat(amount: f64, message: &str) -> Effect {
    Effect::Momentum {
        direction: Direction::Heat,
        amount,
        message: Some(message.to_string()),
    }
}

fn drain(amount: f64, floor: f64, ceiling: f64, message: &str) -> Effect {
    Effect::Drain {
        amount,
        floor,
        ceiling,
        message: Some(message.to_string()),
    }
}

fn settle_calm(ticks: u32) -> Effect {
    Effect::Settle {
        state: TemporalState::Calm,
        ticks,
    }
}

fn surge(ticks: u32, bump: f64) -> Effect {
    Effect::Event {
        state: TemporalState::Surge,
        ticks,
        bump,
    }
}

fn stir(ticks: u32) -> Effect {
    Effect::Event {
        state: TemporalState::Active,
        ticks,
        bump: 0.0,
    }
}

fn note(message: &str, tone: Tone) -> Effect {
    Effect::Log {
        message: message.to_string(),
        tone,
    }
}

fn relic(id: &str, name: &str, rarity: Rarity, summary: &str, effects: Vec<Effect>) -> Artifact {
    Artifact {
        id: id.to_string(),
        name: name.to_string(),
        rarity,
        summary: summary.to_string(),
        effects,
    }
}

/// The embedded relic catalog.
pub fn catalog() -> Vec<Artifact> {
    vec![
        // Commons
        relic(
            "brass-familiar",
            "Brass Familiar",
            Rarity::Common,
            "A mechanical sparrow that offers help while siphoning stored calm.",
            vec![
                sanity(8.0, "The familiar chirps soothingly."),
                heat(8.0, "The sparrow siphons the flux to power itself."),
                surge(3, 0.0),
                Effect::Hint,
            ],
        ),
        relic(
            "cauterized-sand",
            "Cauterized Sand",
            Rarity::Common,
            "A fistful of glowing grains that can seal fractures or burn your resolve.",
            vec![
                sanity(6.0, "The heated sand sears closed your fear."),
                drain(0.15, 0.1, 3.5, "The scorching touch hastens the drain that follows."),
                Effect::Shield,
                note(
                    "A lingering warmth coils around you; one shock may be absorbed.",
                    Tone::Positive,
                ),
            ],
        ),
        relic(
            "mnemonic-coil",
            "Mnemonic Coil",
            Rarity::Common,
            "Stores puzzle solutions at the price of buried memories.",
            vec![
                sanity(-6.0, "Memories slough away to feed the coil."),
                Effect::AutoSolve,
                note(
                    "New pathways unfold in your mind; some mechanisms seem trivial now.",
                    Tone::Positive,
                ),
            ],
        ),
        relic(
            "gilded-compass",
            "Gilded Compass",
            Rarity::Common,
            "A brass compass that locks onto micro currents within the hourglass.",
            vec![
                sanity(6.0, "Breathing steadies as the compass clicks into a true bearing."),
                cool(6.0, "Stray sands collapse into a disciplined ring."),
                drain(0.1, 0.1, 4.0, "The needle's whine gnaws at your concentration."),
            ],
        ),
        relic(
            "rusted-chrono-key",
            "Rusted Chrono Key",
            Rarity::Common,
            "A corroded winding key that can brace stuck mechanisms for a moment.",
            vec![
                Effect::Hint,
                note(
                    "Blueprint schematics sketch themselves across your thoughts.",
                    Tone::Positive,
                ),
                heat(4.0, "The jammed gears kick the hourglass into a jitter."),
                sanity(-2.0, "Metal grit scrapes across your knuckles."),
            ],
        ),
        relic(
            "windup-mender",
            "Windup Mender",
            Rarity::Common,
            "A pocket kit of gears and tea steam that soothes frayed nerves.",
            vec![
                sanity(8.0, "Warm clockwork steam laps at your senses."),
                Effect::Shield,
                note(
                    "A sleeve of coiled springs braces you against the next shock.",
                    Tone::Positive,
                ),
                heat(3.0, "Spare cogs scatter, rattling the temporal drift."),
            ],
        ),
        relic(
            "amber-echo-pin",
            "Amber Echo Pin",
            Rarity::Common,
            "Fossilized sand that vibrates with faint resonant echoes.",
            vec![
                cool(5.0, "The pin drinks in restless waves of sand."),
                sanity(-3.0, "Fragments of your own echo crumble with it."),
                note(
                    "Soft humming trails along the glass, tracing the relic's outline.",
                    Tone::Neutral,
                ),
            ],
        ),
        relic(
            "buzzing-valve",
            "Buzzing Valve",
            Rarity::Common,
            "A sputtering valve that vents compressed chronal pressure.",
            vec![
                cool(7.0, "A plume of glittering sand blasts outward and settles calm."),
                sanity(-4.0, "The valve's shriek rattles your teeth."),
            ],
        ),
        relic(
            "smoked-sundial",
            "Smoked Sundial",
            Rarity::Common,
            "A smoked glass sundial gauged for the diffuse light inside the hourglass.",
            vec![
                drain(-0.2, 0.1, 4.0, "A measured cadence replaces frantic breaths."),
                settle_calm(2),
                note(
                    "The sundial rests on the sand, inviting a brief stillness.",
                    Tone::Neutral,
                ),
                sanity(-2.0, "Staring into the dim glow leaves specks dancing in your vision."),
            ],
        ),
        relic(
            "lantern-beetle",
            "Lantern Beetle",
            Rarity::Common,
            "A palm-sized beetle whose thorax glows with clocklight.",
            vec![
                Effect::ScanAssist,
                note(
                    "The beetle's light maps subtle seams across the chamber.",
                    Tone::Positive,
                ),
                heat(2.0, "Glittering motes swarm toward the beetle's glow."),
            ],
        ),
        // Uncommons
        relic(
            "chrono-lens",
            "Chrono Lens",
            Rarity::Uncommon,
            "Reveals phase-bloomed passages while taxing your focus.",
            vec![
                Effect::SceneFlag {
                    key: crate::game::state::flags::REVEALED_PATHS.to_string(),
                    value: true,
                },
                note(
                    "The lens reveals phase-bloomed passageways within the chamber.",
                    Tone::Positive,
                ),
                drain(0.25, 0.1, 3.5, "The clarity is dizzying; the flux claws at your attention."),
            ],
        ),
        relic(
            "paradox-prism",
            "Paradox Prism",
            Rarity::Uncommon,
            "Splits flux-lines, gifting you calm while rending your composure.",
            vec![
                cool(12.0, "Flux branches outward in shimmering arcs."),
                settle_calm(3),
                sanity(-5.0, "Your thoughts echo uncomfortably."),
            ],
        ),
        relic(
            "prism-diver",
            "Prism Diver",
            Rarity::Uncommon,
            "A refractive probe that dives into splintered timelines and drags them together.",
            vec![
                cool(10.0, "The diver burrows through turbulence and seals it behind mirrored light."),
                settle_calm(3),
                note("Prismatic echoes pulse until the chamber exhales.", Tone::Neutral),
                sanity(-6.0, "Fragments of a timeline you never lived linger painfully."),
            ],
        ),
        relic(
            "ember-gyroscope",
            "Ember Gyroscope",
            Rarity::Uncommon,
            "A warm gyroscope that spins out sparks of stabilized time.",
            vec![
                Effect::Shield,
                note("Sparks form a halo, ready to deflect the next shock.", Tone::Positive),
                surge(3, 4.0),
                note(
                    "The gyroscope howls, stirring the sands into a roaring orbit.",
                    Tone::Negative,
                ),
                sanity(4.0, "The steady spin anchors your breathing."),
            ],
        ),
        relic(
            "hourglass-fiddle",
            "Hourglass Fiddle",
            Rarity::Uncommon,
            "A fiddle strung with threads of powdered sand and brass.",
            vec![
                sanity(9.0, "The melody drowns out the hourglass's frantic hiss."),
                settle_calm(3),
                note("Notes settle onto the sand, urging it to stillness.", Tone::Neutral),
                drain(0.15, 0.1, 4.0, "Your bow arm aches from holding the tempo steady."),
            ],
        ),
        relic(
            "memory-spindle",
            "Memory Spindle",
            Rarity::Uncommon,
            "A spindle that winds puzzle steps around a crystalline core.",
            vec![
                Effect::AutoSolve,
                note("The spindle unwinds and the mechanism obeys.", Tone::Positive),
                cool(5.0, "Captured steps release as a soothing pulse."),
                sanity(-6.0, "Names of old friends slip just out of reach."),
            ],
        ),
        // Rares
        relic(
            "temporal-anchor",
            "Temporal Anchor",
            Rarity::Rare,
            "Stabilizes the slipping present without exacting a toll.",
            vec![drain(
                -0.6,
                0.35,
                4.0,
                "The anchor steadies your thoughts; sanity ebbs more slowly.",
            )],
        ),
        relic(
            "hourwarden-sigil",
            "Hourwarden Sigil",
            Rarity::Rare,
            "A keeper's emblem that commands the sands without backlash.",
            vec![
                Effect::FreeEscape,
                note(
                    "The sigil hums--one barrier this run will yield without question.",
                    Tone::Positive,
                ),
            ],
        ),
        relic(
            "timestep-chalice",
            "Timestep Chalice",
            Rarity::Rare,
            "A chalice that condenses errant grains into drinkable focus.",
            vec![
                sanity(12.0, "Cool quartz liquid steadies every nerve."),
                drain(-0.3, 0.1, 4.0, "Your heartbeat syncs with a slower tempo."),
                settle_calm(4),
                note("A ring of frost forms on the chalice rim.", Tone::Neutral),
                heat(3.0, "Once the calm fades, eager grains rush back in."),
            ],
        ),
        relic(
            "phase-anchor-shard",
            "Phase Anchor Shard",
            Rarity::Rare,
            "A shard chipped from a massive phase anchor.",
            vec![
                cool(12.0, "The shard locks the chamber in place."),
                settle_calm(4),
                note("A resonant thud ripples outward.", Tone::Neutral),
                drain(0.15, 0.1, 4.0, "Residual vibrations thrash against your pulse."),
            ],
        ),
        relic(
            "starlit-orrery",
            "Starlit Orrery",
            Rarity::Rare,
            "A miniature orrery tracking distant hourglass shards.",
            vec![
                Effect::FreeEscape,
                note("A safe trajectory unfolds from the orrery.", Tone::Positive),
                cool(5.0, "Orbital adjustments bleed energy away."),
                sanity(-5.0, "Celestial calculus leaves you glassy-eyed."),
            ],
        ),
        relic(
            "resonant-reliquary",
            "Resonant Reliquary",
            Rarity::Rare,
            "A humming case that disgorges a lesser relic when struck.",
            vec![
                Effect::GrantArtifact {
                    source: GrantSource::Rarity(Rarity::Common),
                    message: Some("The reliquary springs open around a lesser relic.".to_string()),
                },
                heat(3.0, "The case's hum ripples outward through the sand."),
            ],
        ),
        // Mythics
        relic(
            "paradox-atlas",
            "Paradox Atlas",
            Rarity::Mythic,
            "An atlas mapping recursive layouts of the hourglass.",
            vec![
                cool(18.0, "You fold the atlas until turbulence collapses into flat lines."),
                settle_calm(5),
                note("Layered maps settle into a stable rhythm.", Tone::Neutral),
                sanity(-8.0, "Your sense of direction fractures around impossible corridors."),
            ],
        ),
        relic(
            "celestial-escapement",
            "Celestial Escapement",
            Rarity::Mythic,
            "A gleaming escapement that syncs with distant constellations.",
            vec![
                drain(-0.5, 0.1, 4.0, "Each tick lines up with a calming stellar beat."),
                settle_calm(5),
                note("Cosmic rhythm hushes the hourglass.", Tone::Neutral),
                heat(7.0, "Stored starlight crackles along the glass."),
            ],
        ),
        relic(
            "hourwarden-crown",
            "Hourwarden Crown",
            Rarity::Mythic,
            "The ceremonial crown of the hourglass wardens.",
            vec![
                Effect::FreeEscape,
                note("The crown commands a gate to open when needed.", Tone::Positive),
                Effect::Shield,
                note("Authority condenses into a radiant barrier.", Tone::Positive),
                heat(5.0, "Opposing forces bristle against the crown's decree."),
                sanity(6.0, "Duty steels your mind despite the strain."),
            ],
        ),
        relic(
            "hourbound-covenant",
            "Hourbound Covenant",
            Rarity::Mythic,
            "A pact older than the wardens, answering only to lens and anchor together.",
            vec![
                Effect::Combo {
                    requires: vec!["chrono-lens".to_string(), "temporal-anchor".to_string()],
                    effects: vec![
                        drain(-0.4, 0.1, 4.0, "The covenant assumes the weight of every passing second."),
                        sanity(10.0, "Bound hours pour their stillness into you."),
                        settle_calm(4),
                    ],
                    else_message: "The covenant waits for lens and anchor to align.".to_string(),
                },
                note("Script older than the sands crawls across the pact.", Tone::Neutral),
            ],
        ),
        // Timeless
        relic(
            "prime-hour-seed",
            "Prime Hour Seed",
            Rarity::Timeless,
            "A seed containing the primordial cadence of the hourglass.",
            vec![
                cool(30.0, "The seed germinates, devouring turbulent sand in one breath."),
                settle_calm(8),
                note("New growth of possibility steadies every grain.", Tone::Neutral),
                drain(0.35, 0.1, 4.0, "Roots tap into your stamina to keep growing."),
            ],
        ),
        relic(
            "eternum-coil",
            "Eternum Coil",
            Rarity::Timeless,
            "A coil that can store entire timelines if given enough resolve.",
            vec![
                Effect::ScanAssist,
                note("Coiled timelines illuminate every hidden route.", Tone::Positive),
                Effect::FreeEscape,
                note("One stored timeline guarantees an exit when you demand it.", Tone::Positive),
                Effect::Shield,
                note("Layered loops wrap around you like armor.", Tone::Positive),
                drain(0.3, 0.1, 4.0, "Maintaining the coil's tension quickens your pulse."),
                sanity(-5.0, "Keeping so many timelines balanced wears at you."),
            ],
        ),
        relic(
            "sandsong-heartstone",
            "Sandsong Heartstone",
            Rarity::Timeless,
            "A heartstone that sings harmonics older than recorded time.",
            vec![
                sanity(20.0, "Ancient harmonics rebuild your resolve from the ground up."),
                settle_calm(7),
                note("For a span the hourglass listens in reverent silence.", Tone::Neutral),
                heat(10.0, "Stored song energy eventually cascades outward."),
            ],
        ),
        relic(
            "last-archive-fragment",
            "Last Archive Fragment",
            Rarity::Timeless,
            "The final fragment of the hourglass chronicle, etched across mirrored sand.",
            vec![
                Effect::AutoSolve,
                note("Recorded knowledge guides your hands without hesitation.", Tone::Positive),
                Effect::Hint,
                note("Footnotes unveil alternate routes and hidden doors.", Tone::Positive),
                cool(16.0, "Documented procedures calm the volatile flow."),
                sanity(-9.0, "Ingesting history leaves you hollow and ancient."),
            ],
        ),
    ]
}

/// The embedded difficulty modes.
pub fn modes() -> BTreeMap<String, ModeConfig> {
    let mut modes = BTreeMap::new();
    modes.insert(
        "gentle".to_string(),
        ModeConfig {
            label: "Gentle Drift".to_string(),
            rarity_bias: [1.2, 1.0, 0.9, 0.7, 0.5],
            gacha_rarity_bonus: [0.8, 1.0, 1.2, 1.6, 2.0],
            gacha_charges: 2,
            combo_intensity: 1.25,
        },
    );
    modes.insert(
        "normal".to_string(),
        ModeConfig {
            label: "Normal".to_string(),
            rarity_bias: [1.0, 1.0, 1.0, 1.0, 1.0],
            gacha_rarity_bonus: [0.6, 0.9, 1.4, 2.2, 3.0],
            gacha_charges: 2,
            combo_intensity: 1.5,
        },
    );
    modes.insert(
        "torrent".to_string(),
        ModeConfig {
            label: "Sand Torrent".to_string(),
            rarity_bias: [0.8, 0.95, 1.15, 1.4, 1.7],
            gacha_rarity_bonus: [0.5, 0.8, 1.5, 2.6, 3.6],
            gacha_charges: 3,
            combo_intensity: 1.75,
        },
    );
    modes
}

/// The embedded run lengths.
pub fn run_lengths() -> BTreeMap<String, RunLengthSpec> {
    let mut lengths = BTreeMap::new();
    lengths.insert(
        "brief".to_string(),
        RunLengthSpec {
            label: "Brief Descent".to_string(),
            length: RunLength::Rooms(3),
        },
    );
    lengths.insert(
        "standard".to_string(),
        RunLengthSpec {
            label: "Standard Descent".to_string(),
            length: RunLength::Rooms(5),
        },
    );
    lengths.insert(
        "deep".to_string(),
        RunLengthSpec {
            label: "Deep Descent".to_string(),
            length: RunLength::Rooms(7),
        },
    );
    lengths.insert(
        "endless".to_string(),
        RunLengthSpec {
            label: "Endless Hour".to_string(),
            length: RunLength::Unbounded,
        },
    );
    lengths
}

// -----------------------------------------------------------------------------
// Scene shorthands
// -----------------------------------------------------------------------------

fn success(id: &str, title: &str, description: &str, effects: Vec<Effect>) -> PuzzleOption {
    PuzzleOption {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        outcome: PuzzleOutcome::Success,
        effects,
    }
}

fn failure(id: &str, title: &str, description: &str, effects: Vec<Effect>) -> PuzzleOption {
    PuzzleOption {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        outcome: PuzzleOutcome::Failure,
        effects,
    }
}

fn choice(id: &str, title: &str, description: &str, effects: Vec<Effect>, log: &str) -> DialogueChoice {
    DialogueChoice {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        effects,
        log: log.to_string(),
    }
}

fn relic_spot(id: &str, label: &str, pool: &[&str]) -> Hotspot {
    Hotspot {
        id: id.to_string(),
        label: label.to_string(),
        kind: HotspotKind::Artifact {
            pool: pool.iter().map(|s| s.to_string()).collect(),
        },
    }
}

fn exit_spot(id: &str, label: &str, puzzle_id: &str, success_text: &str) -> Hotspot {
    Hotspot {
        id: id.to_string(),
        label: label.to_string(),
        kind: HotspotKind::Exit {
            requires: Requirements {
                puzzles: vec![puzzle_id.to_string()],
                fallback_artifact: Some("hourwarden-sigil".to_string()),
                ..Requirements::default()
            },
            success_text: success_text.to_string(),
        },
    }
}

/// The embedded chamber blueprints.
pub fn scenes() -> Vec<SceneTemplate> {
    vec![
        SceneTemplate {
            id: "pendulum-atrium".to_string(),
            name: "Pendulum Atrium".to_string(),
            description: "A cathedral of swinging weights and mirrored sand basins stretches above. Each pendulum whispers a different second.".to_string(),
            objective: "Stabilize the atrium's master pendulum to unlock the fracture gate.".to_string(),
            hotspots: vec![
                relic_spot(
                    "atrium-artifact",
                    "Suspended Relic",
                    &["chrono-lens", "brass-familiar", "cauterized-sand"],
                ),
                Hotspot {
                    id: "atrium-puzzle".to_string(),
                    label: "Calibrate Weights".to_string(),
                    kind: HotspotKind::Puzzle(Puzzle {
                        id: "atrium-tuning".to_string(),
                        prompt: "The master pendulum thrashes. Choose a counterweight phase to lock it into harmony.".to_string(),
                        options: vec![
                            success(
                                "phase-align",
                                "Align opposite crescents",
                                "Match the slowest pendulum to the fastest clock tick.",
                                vec![note(
                                    "The atrium hushes as the pendulums settle into rhythm.",
                                    Tone::Positive,
                                )],
                            ),
                            failure(
                                "phase-freeze",
                                "Freeze the center weight",
                                "Lock the center mass in place and hope the rest follow.",
                                vec![sanity(-10.0, "The backlash rattles through your mind.")],
                            ),
                            failure(
                                "phase-reverse",
                                "Reverse the flow",
                                "Spin the hourglass to invert its gravity.",
                                vec![
                                    heat(10.0, "The sands surge back violently."),
                                    surge(3, 0.0),
                                ],
                            ),
                        ],
                        requires: Requirements::default(),
                    }),
                },
                Hotspot {
                    id: "atrium-dialogue".to_string(),
                    label: "Echoed Engineer".to_string(),
                    kind: HotspotKind::Dialogue(Dialogue {
                        id: "engineer".to_string(),
                        title: "An Echoed Engineer".to_string(),
                        body: "A translucent engineer mirrors your stance, offering two conflicting calibration rituals.".to_string(),
                        choices: vec![
                            choice(
                                "listen",
                                "Follow the engineer",
                                "Adopt their methodical rhythm.",
                                vec![
                                    Effect::SceneFlag {
                                        key: crate::game::state::flags::REVEALED_PATHS.to_string(),
                                        value: true,
                                    },
                                    sanity(5.0, "The mirrored breathing calms you."),
                                ],
                                "The engineer nods--hidden struts slide into view.",
                            ),
                            choice(
                                "reject",
                                "Reject the echo",
                                "Trust your own improvisation.",
                                vec![
                                    cool(6.0, "You seize control of the tempo."),
                                    settle_calm(2),
                                    sanity(-4.0, "Doubt nips at your focus."),
                                ],
                                "The echo fractures, leaving drifting sparks.",
                            ),
                        ],
                    }),
                },
                exit_spot(
                    "atrium-exit",
                    "Fracture Gate",
                    "atrium-tuning",
                    "The gate dilates, releasing you deeper into the hourglass.",
                ),
            ],
        },
        SceneTemplate {
            id: "gearworks-gallery".to_string(),
            name: "Gearworks Gallery".to_string(),
            description: "Spiral staircases wind around suspended paintings that rearrange themselves with every tick.".to_string(),
            objective: "Reorient the gallery's mural to chart an escape path.".to_string(),
            hotspots: vec![
                relic_spot(
                    "gallery-artifact",
                    "Portrait Alcove",
                    &["paradox-prism", "mnemonic-coil", "brass-familiar"],
                ),
                Hotspot {
                    id: "gallery-puzzle".to_string(),
                    label: "Align Mural".to_string(),
                    kind: HotspotKind::Puzzle(Puzzle {
                        id: "gallery-mural".to_string(),
                        prompt: "Three panels rotate independently. Which pattern completes the escape route?".to_string(),
                        options: vec![
                            success(
                                "spiral",
                                "Spiral of constellations",
                                "A swirl that meets at the center glyph.",
                                vec![note(
                                    "The mural locks--stairs slide to reveal a passage.",
                                    Tone::Positive,
                                )],
                            ),
                            failure(
                                "cascade",
                                "Cascading gears",
                                "Layer the gears in descending size.",
                                vec![sanity(-7.0, "Grinding gears shriek through your skull.")],
                            ),
                            failure(
                                "eclipse",
                                "Twin eclipses",
                                "Align the moons to swallow the sun.",
                                vec![
                                    heat(6.0, "The gallery shutters and resets."),
                                    stir(3),
                                ],
                            ),
                        ],
                        requires: Requirements::default(),
                    }),
                },
                Hotspot {
                    id: "gallery-dialogue".to_string(),
                    label: "Curator Whisper".to_string(),
                    kind: HotspotKind::Dialogue(Dialogue {
                        id: "curator".to_string(),
                        title: "A Whispering Curator".to_string(),
                        body: "The curator offers to shuffle the exhibit in your favor--at a price.".to_string(),
                        choices: vec![
                            choice(
                                "deal",
                                "Seal the bargain",
                                "Trade a sliver of sanity for progress.",
                                vec![
                                    sanity(-5.0, "A contract sigil brands your palm."),
                                    Effect::AutoSolve,
                                ],
                                "The gallery rearranges itself obediently.",
                            ),
                            choice(
                                "decline",
                                "Decline",
                                "Rely on your own deductions.",
                                vec![cool(4.0, "You study the patterns patiently."), settle_calm(2)],
                                "The curator fades, leaving clues etched in the floor.",
                            ),
                        ],
                    }),
                },
                exit_spot(
                    "gallery-exit",
                    "Displaced Stair",
                    "gallery-mural",
                    "You ascend the reformed staircase toward the next chamber.",
                ),
            ],
        },
        SceneTemplate {
            id: "sandforge-workshop".to_string(),
            name: "Sandforge Workshop".to_string(),
            description: "Worktables grind luminous sand into delicate cogs. Anvils ring with trapped thunder.".to_string(),
            objective: "Charge the sandforge conduits to melt the sealed hatch.".to_string(),
            hotspots: vec![
                relic_spot(
                    "workshop-artifact",
                    "Forge Crucible",
                    &["cauterized-sand", "paradox-prism", "temporal-anchor"],
                ),
                Hotspot {
                    id: "workshop-puzzle".to_string(),
                    label: "Charge Conduits".to_string(),
                    kind: HotspotKind::Puzzle(Puzzle {
                        id: "workshop-conduits".to_string(),
                        prompt: "Three conduits hum at different pitches. Which sequence completes the circuit?".to_string(),
                        options: vec![
                            success(
                                "low-mid-high",
                                "Low -> Mid -> High",
                                "Balance the flow progressively.",
                                vec![note(
                                    "The conduits blaze, liquefying the hatch seals.",
                                    Tone::Positive,
                                )],
                            ),
                            failure(
                                "high-low-mid",
                                "High -> Low -> Mid",
                                "Shock then stabilize.",
                                vec![sanity(-8.0, "The surge whiplashes across your mind.")],
                            ),
                            failure(
                                "simultaneous",
                                "All at once",
                                "Overwhelm the forge.",
                                vec![
                                    heat(8.0, "The conduits short and reset."),
                                    surge(3, 0.0),
                                ],
                            ),
                        ],
                        requires: Requirements::default(),
                    }),
                },
                Hotspot {
                    id: "workshop-dialogue".to_string(),
                    label: "Apprentice Shade".to_string(),
                    kind: HotspotKind::Dialogue(Dialogue {
                        id: "apprentice".to_string(),
                        title: "A Nervous Apprentice".to_string(),
                        body: "The apprentice pleads for guidance, offering either fuel or focus.".to_string(),
                        choices: vec![
                            choice(
                                "grant-fuel",
                                "Offer encouragement",
                                "Boost their confidence to hasten the melt.",
                                vec![
                                    cool(5.0, "The apprentice quickens their work."),
                                    settle_calm(2),
                                    Effect::SceneFlag {
                                        key: "extra_fuel".to_string(),
                                        value: true,
                                    },
                                ],
                                "Molten sand courses brighter through the conduits.",
                            ),
                            choice(
                                "take-focus",
                                "Take their focus",
                                "Absorb their discipline for yourself.",
                                vec![
                                    sanity(6.0, "Clarity sharpens your resolve."),
                                    heat(4.0, "Their hesitation slows the forge."),
                                    stir(3),
                                ],
                                "The apprentice falters but you feel composed.",
                            ),
                        ],
                    }),
                },
                exit_spot(
                    "workshop-exit",
                    "Melted Hatch",
                    "workshop-conduits",
                    "The hatch drips open, revealing a stair carved of cooled glass.",
                ),
            ],
        },
        SceneTemplate {
            id: "memory-conservatory".to_string(),
            name: "Memory Conservatory".to_string(),
            description: "Shelves of bottled recollections float among vines of copper tubing.".to_string(),
            objective: "Restore a fractured memory strand to reveal the concealed door.".to_string(),
            hotspots: vec![
                relic_spot(
                    "conservatory-artifact",
                    "Bottled Echo",
                    &["mnemonic-coil", "brass-familiar", "chrono-lens"],
                ),
                Hotspot {
                    id: "conservatory-puzzle".to_string(),
                    label: "Weave Strand".to_string(),
                    kind: HotspotKind::Puzzle(Puzzle {
                        id: "conservatory-strand".to_string(),
                        prompt: "Three memories shimmer--choose the fragment that completes the escape vision.".to_string(),
                        options: vec![
                            success(
                                "childhood-clock",
                                "A childhood clock",
                                "Warm, steady ticking.",
                                vec![note(
                                    "The memories braid into a guiding thread of light.",
                                    Tone::Positive,
                                )],
                            ),
                            failure(
                                "storm-sky",
                                "A stormy sky",
                                "Lightning etched across sand dunes.",
                                vec![sanity(-6.0, "The memory lashes you with dissonance.")],
                            ),
                            failure(
                                "silent-hall",
                                "A silent hall",
                                "Empty frames and echoing footsteps.",
                                vec![
                                    heat(6.0, "The memory loops without progress."),
                                    stir(3),
                                ],
                            ),
                        ],
                        requires: Requirements::default(),
                    }),
                },
                Hotspot {
                    id: "conservatory-dialogue".to_string(),
                    label: "Archivist Shade".to_string(),
                    kind: HotspotKind::Dialogue(Dialogue {
                        id: "archivist".to_string(),
                        title: "The Archivist".to_string(),
                        body: "The archivist offers to secure a memory in exchange for a sacrifice.".to_string(),
                        choices: vec![
                            choice(
                                "offer-memory",
                                "Offer a memory",
                                "Trade sanity for a solid clue.",
                                vec![
                                    sanity(-7.0, "You relinquish a cherished recollection."),
                                    Effect::Hint,
                                ],
                                "An illuminated sigil marks the correct strand.",
                            ),
                            choice(
                                "refuse",
                                "Refuse",
                                "Protect your mind; extend the calm instead.",
                                vec![
                                    cool(5.0, "You map alternative routes with patience."),
                                    settle_calm(2),
                                ],
                                "The archivist shrugs, letting the bottles rearrange themselves.",
                            ),
                        ],
                    }),
                },
                exit_spot(
                    "conservatory-exit",
                    "Hidden Door",
                    "conservatory-strand",
                    "The door exhales starlit dust as it swings open.",
                ),
            ],
        },
        SceneTemplate {
            id: "obsidian-dials".to_string(),
            name: "Obsidian Dials".to_string(),
            description: "Massive dials of obsidian rotate beneath glass floors, each etched with constellations.".to_string(),
            objective: "Synchronize the dials to align with a fleeting constellation.".to_string(),
            hotspots: vec![
                relic_spot(
                    "dials-artifact",
                    "Dial Pedestal",
                    &["temporal-anchor", "paradox-prism", "cauterized-sand"],
                ),
                Hotspot {
                    id: "dials-puzzle".to_string(),
                    label: "Set Constellation".to_string(),
                    kind: HotspotKind::Puzzle(Puzzle {
                        id: "dials-constellation".to_string(),
                        prompt: "Choose the dial orientation that matches the Hourwarden's path.".to_string(),
                        options: vec![
                            success(
                                "triad",
                                "Triad Alignment",
                                "Dial 1 to 3, Dial 2 to 7, Dial 3 to 11.",
                                vec![note(
                                    "The constellations ignite, freezing the dials into place.",
                                    Tone::Positive,
                                )],
                            ),
                            failure(
                                "cascade",
                                "Cascade Alignment",
                                "Dial 1 to 12, Dial 2 to 4, Dial 3 to 8.",
                                vec![sanity(-9.0, "A pulse of void energy shocks you.")],
                            ),
                            failure(
                                "mirror",
                                "Mirror Alignment",
                                "Mirror the previous chamber's pattern.",
                                vec![
                                    heat(7.0, "The dials spin wildly before resetting."),
                                    stir(3),
                                ],
                            ),
                        ],
                        requires: Requirements::default(),
                    }),
                },
                Hotspot {
                    id: "dials-dialogue".to_string(),
                    label: "Astral Voice".to_string(),
                    kind: HotspotKind::Dialogue(Dialogue {
                        id: "astral".to_string(),
                        title: "Voice of the Constellation".to_string(),
                        body: "A chorus invites you to trade calm for absolute precision.".to_string(),
                        choices: vec![
                            choice(
                                "trade-calm",
                                "Surrender calm",
                                "Buy certainty by draining the calm.",
                                vec![
                                    heat(8.0, "The dials drink deeply of your calm reserves."),
                                    surge(3, 0.0),
                                    Effect::AutoSolve,
                                ],
                                "The constellation locks into place above you.",
                            ),
                            choice(
                                "hold-calm",
                                "Hold your ground",
                                "Trust your instinct instead.",
                                vec![sanity(4.0, "Confidence steels you.")],
                                "The voices fade, leaving subtle markings as hints.",
                            ),
                        ],
                    }),
                },
                exit_spot(
                    "dials-exit",
                    "Star Gate",
                    "dials-constellation",
                    "You stride through a corridor of still constellations.",
                ),
            ],
        },
    ]
}

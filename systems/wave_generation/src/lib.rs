#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure procedural wave table generator.
//!
//! Every wave releases a stream of grunts. Every third wave adds a group of
//! swift runners and every fifth wave a group of tanks. Counts, spawn
//! intervals and stat multipliers all grow with the wave number.

use std::time::Duration;

use hex_defence_core::{EnemyScaling, EnemyTypeId, WaveDefinition, WaveEntry};

/// Enemy types the generator draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaveRoster {
    /// Baseline infantry present in every wave.
    pub grunt: EnemyTypeId,
    /// Fast runners joining every third wave.
    pub swift: EnemyTypeId,
    /// Heavy units joining every fifth wave.
    pub tank: EnemyTypeId,
}

/// Builds the definitions of waves `1..=total_waves`.
#[must_use]
pub fn generate_wave_definitions(total_waves: u32, roster: WaveRoster) -> Vec<WaveDefinition> {
    (1..=total_waves)
        .map(|wave| generate_wave(wave, roster))
        .collect()
}

/// Builds the definition of the one-based wave `wave`.
#[must_use]
pub fn generate_wave(wave: u32, roster: WaveRoster) -> WaveDefinition {
    let w = f64::from(wave);
    let toughness = 1.0 + 0.05 * w;
    let bounty = 1.0 + 0.02 * w;

    let mut entries = vec![WaveEntry {
        enemy: roster.grunt,
        count: 8 + wave / 2,
        interval: seconds((1.05 - 0.008 * w).max(0.22)),
        scaling: scaling(toughness * 0.85, 1.0 + 0.004 * w, bounty * 0.65),
    }];

    if wave % 3 == 0 {
        entries.push(WaveEntry {
            enemy: roster.swift,
            count: 4 + wave / 4,
            interval: seconds((0.9 - 0.006 * w).max(0.18)),
            scaling: scaling(toughness * 0.7, 1.1 + 0.006 * w, bounty * 0.5),
        });
    }

    if wave % 5 == 0 {
        entries.push(WaveEntry {
            enemy: roster.tank,
            count: (wave / 8).max(3),
            interval: seconds((1.4 - 0.0045 * w).max(0.35)),
            scaling: scaling(toughness * 1.4, 0.9 + 0.0025 * w, bounty),
        });
    }

    WaveDefinition { entries }
}

fn seconds(value: f64) -> Duration {
    Duration::from_secs_f64(value)
}

fn scaling(hp: f64, speed: f64, reward: f64) -> EnemyScaling {
    EnemyScaling {
        hp: hp as f32,
        speed: speed as f32,
        reward: reward as f32,
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler responsible for emitting enemy spawn commands.
//!
//! Each wave walks its entries in order, releasing one enemy whenever the
//! entry's interval (shortened by the wave's spawn rate multiplier) has
//! elapsed and the live enemy count is below the wave's mob cap. A cleared
//! wave arms a cooldown before the next one may be started.

use std::time::Duration;

use hex_defence_core::{Command, Event, WaveDefinition, WaveTuning};
use tracing::{debug, info};

/// Coarse state of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    /// No wave is running and the next one may be started.
    Idle,
    /// A wave is releasing enemies or waiting for them to die.
    Active,
    /// A wave was cleared and the break before the next one is running.
    Cooldown,
}

/// Timed multi-entry spawn scheduler.
#[derive(Clone, Debug)]
pub struct WaveManager {
    waves: Vec<WaveDefinition>,
    tuning: WaveTuning,
    current: Option<usize>,
    active: bool,
    entry_index: usize,
    spawned_in_entry: u32,
    since_last_spawn: Duration,
    cooldown_remaining: Duration,
    mob_cap: u32,
    spawn_rate: f32,
}

impl WaveManager {
    /// Creates an idle scheduler positioned before the first wave.
    #[must_use]
    pub fn new(waves: Vec<WaveDefinition>, tuning: WaveTuning) -> Self {
        Self {
            waves,
            tuning,
            current: None,
            active: false,
            entry_index: 0,
            spawned_in_entry: 0,
            since_last_spawn: Duration::ZERO,
            cooldown_remaining: Duration::ZERO,
            mob_cap: tuning.base_mob_cap,
            spawn_rate: tuning.base_spawn_rate,
        }
    }

    /// Starts the next wave.
    ///
    /// Does nothing while a wave is active, while the cooldown is running, or
    /// when every wave has already been started. Returns whether a wave began.
    pub fn start_next_wave(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.active || !self.cooldown_remaining.is_zero() {
            return false;
        }
        let next = self.current.map_or(0, |index| index + 1);
        if next >= self.waves.len() {
            return false;
        }

        self.current = Some(next);
        self.active = true;
        self.entry_index = 0;
        self.spawned_in_entry = 0;
        self.since_last_spawn = Duration::ZERO;
        self.cooldown_remaining = Duration::ZERO;

        let number = wave_number(next);
        self.mob_cap = self
            .tuning
            .base_mob_cap
            .saturating_add(self.tuning.mob_cap_growth.saturating_mul(number));
        self.spawn_rate = self.tuning.base_spawn_rate + self.tuning.spawn_rate_growth * number as f32;

        info!(
            wave = number,
            mob_cap = self.mob_cap,
            spawn_rate = self.spawn_rate,
            "wave started"
        );
        out_events.push(Event::WaveStarted { wave: number });
        true
    }

    /// Advances the scheduler by `dt`.
    ///
    /// `live_enemies` is the number of enemies alive before this call's
    /// spawns are applied. At most one `Command::SpawnEnemy` is emitted per
    /// call. A spawn blocked by the mob cap is retried on the next call
    /// without resetting the spawn timer.
    pub fn handle(
        &mut self,
        dt: Duration,
        live_enemies: usize,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        if !self.active {
            if !self.cooldown_remaining.is_zero() {
                self.cooldown_remaining = self.cooldown_remaining.saturating_sub(dt);
            }
            return;
        }

        let Some(index) = self.current else {
            return;
        };
        let Some(wave) = self.waves.get(index) else {
            return;
        };

        self.since_last_spawn = self.since_last_spawn.saturating_add(dt);
        while let Some(entry) = wave.entries.get(self.entry_index) {
            if self.spawned_in_entry >= entry.count {
                self.entry_index += 1;
                self.spawned_in_entry = 0;
                self.since_last_spawn = Duration::ZERO;
                continue;
            }

            let interval = scaled_interval(entry.interval, self.spawn_rate);
            let below_cap = u32::try_from(live_enemies).map_or(false, |live| live < self.mob_cap);
            if self.since_last_spawn >= interval && below_cap {
                out.push(Command::SpawnEnemy {
                    kind: entry.enemy,
                    scaling: entry.scaling,
                });
                self.spawned_in_entry += 1;
                self.since_last_spawn = Duration::ZERO;
            }
            break;
        }

        if self.entry_index >= wave.entries.len() && live_enemies == 0 {
            self.active = false;
            let number = wave_number(index);
            if index + 1 < self.waves.len() {
                self.cooldown_remaining = self.tuning.cooldown;
            }
            info!(wave = number, "wave cleared");
            debug!(cooldown = ?self.cooldown_remaining, "break armed");
            out_events.push(Event::WaveCleared { wave: number });
        }
    }

    /// Coarse state of the scheduler.
    #[must_use]
    pub fn phase(&self) -> WavePhase {
        if self.active {
            WavePhase::Active
        } else if !self.cooldown_remaining.is_zero() {
            WavePhase::Cooldown
        } else {
            WavePhase::Idle
        }
    }

    /// Reports whether a wave is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Time left before the next wave may be started.
    #[must_use]
    pub const fn cooldown_remaining(&self) -> Duration {
        self.cooldown_remaining
    }

    /// One-based number of the most recently started wave, zero before the first.
    #[must_use]
    pub fn current_wave(&self) -> u32 {
        self.current.map_or(0, wave_number)
    }

    /// Number of configured waves.
    #[must_use]
    pub fn total_waves(&self) -> u32 {
        u32::try_from(self.waves.len()).unwrap_or(u32::MAX)
    }

    /// Reports whether the final wave has been started.
    #[must_use]
    pub fn last_wave_started(&self) -> bool {
        self.current
            .map_or(false, |index| index + 1 >= self.waves.len())
    }

    /// Live enemy cap of the current wave.
    #[must_use]
    pub const fn mob_cap(&self) -> u32 {
        self.mob_cap
    }

    /// Spawn rate multiplier of the current wave.
    #[must_use]
    pub const fn spawn_rate(&self) -> f32 {
        self.spawn_rate
    }

    /// Enemies released so far by the entry being processed.
    #[must_use]
    pub const fn spawned_in_entry(&self) -> u32 {
        self.spawned_in_entry
    }
}

fn wave_number(index: usize) -> u32 {
    u32::try_from(index).map_or(u32::MAX, |index| index.saturating_add(1))
}

fn scaled_interval(interval: Duration, rate: f32) -> Duration {
    if rate <= 0.0 {
        return Duration::MAX;
    }
    Duration::try_from_secs_f64(interval.as_secs_f64() / f64::from(rate)).unwrap_or(Duration::MAX)
}

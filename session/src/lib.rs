#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game orchestrator for Hex Defence.
//!
//! A [`Session`] owns the authoritative world together with the pure systems
//! and drives them in a fixed order every tick: the wave scheduler, enemy
//! movement, tower fire, then projectiles. Player actions are applied
//! immediately and atomically. Once the base falls or the final wave is
//! cleared the simulation freezes until the game is restarted.

pub mod catalog;

use std::{fmt, time::Duration};

use glam::Vec2;
use hex_defence_core::{
    ActionError, AxialCoord, Command, ConfigError, Event, GameConfig, HexDirection, PlayerAction,
    TowerTarget, TowerTypeId,
};
use hex_defence_system_builder::{BuildTypeSelector, Builder, BuilderInput};
use hex_defence_system_tower_combat::TowerCombat;
use hex_defence_system_tower_targeting::TowerTargeting;
use hex_defence_system_waves::{WaveManager, WavePhase};
use hex_defence_world::{self as world, query, Tile, World};
use tracing::{debug, info};

/// Top-level screen the session is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Title menu.
    Intro,
    /// Rules page reachable from the title menu.
    Rules,
    /// Live game.
    Playing,
    /// Game over page.
    Outro,
}

/// Terminal result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Every wave was cleared.
    Victory,
    /// The last life was lost.
    Defeat,
}

/// Figures reported on the game over page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Summary {
    /// How the game ended.
    pub outcome: Outcome,
    /// One-based number of the wave reached.
    pub waves_survived: u32,
    /// Number of waves in the game.
    pub total_waves: u32,
    /// Money in the bank at the end.
    pub money_left: u32,
    /// Lives remaining at the end.
    pub lives_left: u32,
}

impl Summary {
    /// Headline describing the outcome.
    #[must_use]
    pub fn headline(&self) -> String {
        match self.outcome {
            Outcome::Victory => format!("All {} waves have been defended!", self.total_waves),
            Outcome::Defeat => "Defense failed!".to_owned(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Waves survived: {}/{}", self.waves_survived, self.total_waves)?;
        writeln!(f, "Money left: {}", self.money_left)?;
        write!(f, "Lives left: {}", self.lives_left)
    }
}

/// Progress of the wave scheduler as shown in the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveStatus {
    /// Wave shown to the player, one-based and never above `total`.
    pub current: u32,
    /// Number of waves in the game.
    pub total: u32,
    /// Scheduler state.
    pub phase: WavePhase,
    /// Time left before the next wave may be started.
    pub cooldown_remaining: Duration,
}

/// Single external interface of the simulation.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    world: World,
    waves: WaveManager,
    builder: Builder,
    targeting: TowerTargeting,
    combat: TowerCombat,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    events: Vec<Event>,
    screen: Screen,
    summary: Option<Summary>,
}

impl Session {
    /// Creates a session in the playing screen with no wave started yet.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let world = World::new(&config)?;
        let waves = WaveManager::new(config.waves.clone(), config.wave_tuning);
        let builder = Builder::new(&config.map);
        info!(
            waves = config.waves.len(),
            money = config.starting_money,
            lives = config.starting_lives,
            seed = config.seed,
            "session created"
        );
        Ok(Self {
            config,
            world,
            waves,
            builder,
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            targets: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
            screen: Screen::Playing,
            summary: None,
        })
    }

    /// Advances the simulation by `dt`.
    ///
    /// Does nothing outside the playing screen or after the game ended.
    pub fn tick(&mut self, dt: Duration) {
        if !self.is_live() {
            return;
        }
        self.events.clear();

        let live_enemies = query::enemy_count(&self.world);
        self.waves
            .handle(dt, live_enemies, &mut self.commands, &mut self.events);
        self.flush_commands();

        world::apply(
            &mut self.world,
            Command::AdvanceEnemies { dt },
            &mut self.events,
        );

        world::apply(
            &mut self.world,
            Command::AdvanceTowers { dt },
            &mut self.events,
        );
        self.targeting.handle(
            &query::tower_view(&self.world),
            &query::enemy_view(&self.world),
            &mut self.targets,
        );
        self.combat.handle(
            query::tower_cooldowns(&self.world),
            &self.targets,
            &mut self.commands,
        );
        self.flush_commands();

        world::apply(
            &mut self.world,
            Command::AdvanceProjectiles { dt },
            &mut self.events,
        );

        self.check_outcome();
    }

    /// Builds a tower of the selected type on `tile`.
    pub fn build(&mut self, tile: AxialCoord) -> Result<(), ActionError> {
        self.ensure_live(PlayerAction::Build, tile)?;
        self.act(Command::BuildTower {
            tile,
            kind: self.builder.build_type(),
        })
    }

    /// Upgrades the tower on `tile`.
    pub fn upgrade(&mut self, tile: AxialCoord) -> Result<(), ActionError> {
        self.ensure_live(PlayerAction::Upgrade, tile)?;
        self.act(Command::UpgradeTower { tile })
    }

    /// Heals the tower on `tile` to full health.
    ///
    /// Only allowed during the break between waves. A missing tower is
    /// reported before a closed window.
    pub fn heal(&mut self, tile: AxialCoord) -> Result<(), ActionError> {
        self.ensure_live(PlayerAction::Heal, tile)?;
        let occupied = query::tower_at(&self.world, tile).is_some();
        if occupied && !self.heal_window_open() {
            return self.refuse(PlayerAction::Heal, tile, ActionError::HealWindowClosed);
        }
        self.act(Command::HealTower { tile })
    }

    /// Removes the tower on `tile` without a refund.
    pub fn remove(&mut self, tile: AxialCoord) -> Result<(), ActionError> {
        self.ensure_live(PlayerAction::Remove, tile)?;
        self.act(Command::RemoveTower { tile })
    }

    /// Starts the next wave. Returns whether one began.
    pub fn advance_wave(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }
        self.waves.start_next_wave(&mut self.events)
    }

    /// Moves the selector to `tile`; off-map tiles are ignored.
    pub fn select_tile(&mut self, tile: AxialCoord) -> bool {
        self.builder.select_tile(tile)
    }

    /// Moves the selector to the tile under `point`.
    pub fn select_at_pixel(&mut self, point: Vec2) -> Option<AxialCoord> {
        self.builder.select_at_pixel(point)
    }

    /// Steps the selector one tile in `direction`.
    pub fn move_selection(&mut self, direction: HexDirection) -> AxialCoord {
        self.builder.move_selection(direction)
    }

    /// Chooses the tower type used by [`Session::build`] and confirmations.
    pub fn select_build_type(
        &mut self,
        selector: BuildTypeSelector<'_>,
    ) -> Result<TowerTypeId, ActionError> {
        self.builder
            .select_build_type(query::catalog(&self.world), selector)
    }

    /// Builds on the selected tile when it is empty, upgrades its tower otherwise.
    pub fn confirm_selection(&mut self) -> Result<(), ActionError> {
        self.run_builder(BuilderInput {
            confirm_action: true,
            ..BuilderInput::default()
        })
    }

    /// Heals the tower on the selected tile.
    pub fn heal_selection(&mut self) -> Result<(), ActionError> {
        self.run_builder(BuilderInput {
            heal_action: true,
            ..BuilderInput::default()
        })
    }

    /// Removes the tower on the selected tile.
    pub fn remove_selection(&mut self) -> Result<(), ActionError> {
        self.run_builder(BuilderInput {
            remove_action: true,
            ..BuilderInput::default()
        })
    }

    /// Resets the gameplay and immediately starts the first wave.
    pub fn start_game(&mut self) {
        self.reset();
        let _ = self.waves.start_next_wave(&mut self.events);
    }

    /// Restores the starting state and returns to the playing screen with no
    /// wave started.
    pub fn reset(&mut self) {
        self.events.clear();
        world::apply(&mut self.world, Command::ResetWorld, &mut self.events);
        self.waves = WaveManager::new(self.config.waves.clone(), self.config.wave_tuning);
        self.builder.reset();
        self.targets.clear();
        self.summary = None;
        self.screen = Screen::Playing;
        debug!("session reset");
    }

    /// Opens the rules page from the title menu.
    pub fn show_rules(&mut self) -> bool {
        if self.screen != Screen::Intro {
            return false;
        }
        self.screen = Screen::Rules;
        true
    }

    /// Returns to the title menu from the rules or game over page.
    pub fn return_to_menu(&mut self) -> bool {
        if !matches!(self.screen, Screen::Rules | Screen::Outro) {
            return false;
        }
        self.screen = Screen::Intro;
        self.summary = None;
        true
    }

    /// Reports whether towers may currently be healed.
    #[must_use]
    pub fn heal_window_open(&self) -> bool {
        !self.waves.is_active() && !self.waves.cooldown_remaining().is_zero()
    }

    /// Read-only access to the world for [`query`] functions.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Configuration the session was created from.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Screen currently shown.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Terminal result, once the game has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.summary.map(|summary| summary.outcome)
    }

    /// Game over figures, once the game has ended.
    #[must_use]
    pub const fn summary(&self) -> Option<Summary> {
        self.summary
    }

    /// Money currently available.
    #[must_use]
    pub fn money(&self) -> u32 {
        query::money(&self.world)
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(&self) -> u32 {
        query::lives(&self.world)
    }

    /// Wave progress for the HUD.
    #[must_use]
    pub fn wave_status(&self) -> WaveStatus {
        let total = self.waves.total_waves();
        WaveStatus {
            current: self.waves.current_wave().max(1).min(total),
            total,
            phase: self.waves.phase(),
            cooldown_remaining: self.waves.cooldown_remaining(),
        }
    }

    /// Tile under the selector.
    #[must_use]
    pub const fn selected_tile(&self) -> AxialCoord {
        self.builder.selected_tile()
    }

    /// Tower type placed by builds.
    #[must_use]
    pub const fn selected_build_type(&self) -> TowerTypeId {
        self.builder.build_type()
    }

    /// Price of upgrading the tower on `tile`.
    #[must_use]
    pub fn upgrade_quote(&self, tile: AxialCoord) -> Option<u32> {
        query::upgrade_quote(&self.world, tile)
    }

    /// Price of healing the tower on `tile`.
    #[must_use]
    pub fn heal_quote(&self, tile: AxialCoord) -> Option<u32> {
        query::heal_quote(&self.world, tile)
    }

    /// Events recorded by the latest tick and any actions taken since.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    fn is_live(&self) -> bool {
        self.screen == Screen::Playing && self.summary.is_none()
    }

    fn ensure_live(&mut self, action: PlayerAction, tile: AxialCoord) -> Result<(), ActionError> {
        if self.is_live() {
            Ok(())
        } else {
            self.refuse(action, tile, ActionError::NotPlaying)
        }
    }

    fn refuse(
        &mut self,
        action: PlayerAction,
        tile: AxialCoord,
        reason: ActionError,
    ) -> Result<(), ActionError> {
        debug!(?action, q = tile.q(), r = tile.r(), %reason, "action refused");
        self.events.push(Event::ActionRejected {
            action,
            tile,
            reason,
        });
        Err(reason)
    }

    fn act(&mut self, command: Command) -> Result<(), ActionError> {
        let start = self.events.len();
        world::apply(&mut self.world, command, &mut self.events);
        self.events[start..]
            .iter()
            .find_map(|event| match event {
                Event::ActionRejected { reason, .. } => Some(*reason),
                _ => None,
            })
            .map_or(Ok(()), Err)
    }

    fn run_builder(&mut self, input: BuilderInput) -> Result<(), ActionError> {
        let world = &self.world;
        self.builder.handle(
            input,
            |tile| query::tile(world, tile).and_then(Tile::tower),
            &mut self.commands,
        );

        let mut result = Ok(());
        for command in std::mem::take(&mut self.commands) {
            let outcome = match command {
                Command::BuildTower { tile, .. } => self.build(tile),
                Command::UpgradeTower { tile } => self.upgrade(tile),
                Command::HealTower { tile } => self.heal(tile),
                Command::RemoveTower { tile } => self.remove(tile),
                other => {
                    world::apply(&mut self.world, other, &mut self.events);
                    Ok(())
                }
            };
            result = result.and(outcome);
        }
        result
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn check_outcome(&mut self) {
        let outcome = if query::lives(&self.world) == 0 {
            Outcome::Defeat
        } else if self.waves.last_wave_started()
            && !self.waves.is_active()
            && query::enemy_count(&self.world) == 0
        {
            Outcome::Victory
        } else {
            return;
        };

        let summary = Summary {
            outcome,
            waves_survived: self.waves.current_wave(),
            total_waves: self.waves.total_waves(),
            money_left: query::money(&self.world),
            lives_left: query::lives(&self.world),
        };
        info!(
            ?outcome,
            waves = summary.waves_survived,
            money = summary.money_left,
            lives = summary.lives_left,
            "game over"
        );
        self.summary = Some(summary);
        self.screen = Screen::Outro;
    }
}

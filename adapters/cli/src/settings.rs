//! Optional TOML settings layered over the stock game.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use hex_defence_core::{Catalog, EnemyType, GameConfig, MapConfig, TowerType, WaveTuning};
use hex_defence_session::catalog::{default_catalog, default_map, DEFAULT_TOTAL_WAVES};
use hex_defence_system_wave_generation::{generate_wave_definitions, WaveRoster};
use serde::Deserialize;

/// Every field is optional; anything left out keeps the stock value.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) seed: Option<u64>,
    pub(crate) waves: Option<u32>,
    pub(crate) starting_money: Option<u32>,
    pub(crate) starting_lives: Option<u32>,
    pub(crate) map: Option<MapConfig>,
    pub(crate) wave_tuning: Option<WaveTuning>,
    pub(crate) towers: Option<Vec<TowerType>>,
    pub(crate) enemies: Option<Vec<EnemyType>>,
}

impl Settings {
    /// Reads and parses a settings file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse settings in {}", path.display()))
    }

    pub(crate) fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolves the final game configuration.
    ///
    /// Waves are always generated; the enemy catalog therefore has to provide
    /// the `grunt`, `swift` and `tank` keys the generator draws from.
    pub(crate) fn into_config(self) -> Result<GameConfig> {
        let stock = default_catalog();
        let catalog = Catalog {
            towers: self.towers.unwrap_or(stock.towers),
            enemies: self.enemies.unwrap_or(stock.enemies),
        };
        let roster = roster(&catalog)?;
        let total_waves = self.waves.unwrap_or(DEFAULT_TOTAL_WAVES);

        Ok(GameConfig {
            map: self.map.unwrap_or_else(default_map),
            starting_money: self.starting_money.unwrap_or(200),
            starting_lives: self.starting_lives.unwrap_or(20),
            waves: generate_wave_definitions(total_waves, roster),
            catalog,
            wave_tuning: self.wave_tuning.unwrap_or_default(),
            seed: self.seed.unwrap_or_default(),
        })
    }
}

fn roster(catalog: &Catalog) -> Result<WaveRoster> {
    let lookup = |key: &str| {
        catalog
            .enemy_by_key(key)
            .with_context(|| format!("enemy catalog has no `{key}` entry"))
    };
    Ok(WaveRoster {
        grunt: lookup("grunt")?,
        swift: lookup("swift")?,
        tank: lookup("tank")?,
    })
}

use std::time::Duration;

use hex_defence_core::{
    ActionError, AxialCoord, Catalog, Command, HexDirection, MapConfig, MapShape, Rgb, TowerId,
    TowerType, TowerTypeId,
};
use hex_defence_system_builder::{BuildTypeSelector, Builder, BuilderInput};

fn map() -> MapConfig {
    MapConfig {
        shape: MapShape::Rectangle {
            columns: 4,
            rows: 3,
        },
        hex_size: 30.0,
        origin: [0.0, 0.0],
        base: AxialCoord::new(1, 1),
    }
}

fn tower(key: &str, cost: u32) -> TowerType {
    TowerType {
        key: key.into(),
        name: key.into(),
        cost,
        range: 150.0,
        fire_interval: Duration::from_secs(1),
        damage: 10.0,
        projectile_speed: 300.0,
        color: Rgb::from_rgb(10, 20, 30),
        max_hp: 100.0,
        slow_aura: None,
    }
}

fn catalog() -> Catalog {
    Catalog {
        towers: vec![tower("basic", 50), tower("sniper", 85)],
        enemies: Vec::new(),
    }
}

#[test]
fn confirm_builds_on_an_empty_tile() {
    let mut builder = Builder::new(&map());
    let _ = builder.move_selection(HexDirection::East);
    let mut commands = Vec::new();

    builder.handle(
        BuilderInput {
            confirm_action: true,
            ..BuilderInput::default()
        },
        |_| None,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::BuildTower {
            tile: AxialCoord::new(2, 1),
            kind: TowerTypeId::new(0),
        }],
    );
}

#[test]
fn confirm_upgrades_an_occupied_tile() {
    let builder = Builder::new(&map());
    let mut commands = Vec::new();

    builder.handle(
        BuilderInput {
            confirm_action: true,
            ..BuilderInput::default()
        },
        |_| Some(TowerId::new(3)),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::UpgradeTower {
            tile: AxialCoord::new(1, 1),
        }],
    );
}

#[test]
fn heal_and_remove_target_the_selected_tile() {
    let mut builder = Builder::new(&map());
    assert!(builder.select_tile(AxialCoord::new(0, 2)));
    let mut commands = Vec::new();

    builder.handle(
        BuilderInput {
            heal_action: true,
            remove_action: true,
            ..BuilderInput::default()
        },
        |_| None,
        &mut commands,
    );

    let tile = AxialCoord::new(0, 2);
    assert_eq!(
        commands,
        vec![Command::HealTower { tile }, Command::RemoveTower { tile }],
    );
}

#[test]
fn idle_input_emits_nothing() {
    let builder = Builder::new(&map());
    let mut commands = Vec::new();
    builder.handle(BuilderInput::default(), |_| None, &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn build_type_is_selected_by_key_or_id() {
    let mut builder = Builder::new(&map());
    let catalog = catalog();

    assert_eq!(
        builder.select_build_type(&catalog, BuildTypeSelector::Key("sniper")),
        Ok(TowerTypeId::new(1))
    );
    assert_eq!(builder.build_type(), TowerTypeId::new(1));

    assert_eq!(
        builder.select_build_type(&catalog, BuildTypeSelector::Id(TowerTypeId::new(7))),
        Err(ActionError::UnknownTowerType)
    );
    assert_eq!(
        builder.select_build_type(&catalog, BuildTypeSelector::Key("laser")),
        Err(ActionError::UnknownTowerType)
    );
    assert_eq!(builder.build_type(), TowerTypeId::new(1));

    builder.reset();
    assert_eq!(builder.build_type(), TowerTypeId::new(0));
    assert_eq!(builder.selected_tile(), AxialCoord::new(1, 1));
}

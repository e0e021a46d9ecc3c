use std::{
    collections::{hash_map::DefaultHasher, HashSet},
    hash::{Hash, Hasher},
    time::Duration,
};

use lawn_defense_core::{CellCoord, Command, Event, GameStatus, PlantKind};
use lawn_defense_world::{self as world, query, World};

const TICK: Duration = Duration::from_millis(100);

#[test]
fn scripted_session_replays_identically() {
    let first = replay(600);
    let second = replay(600);

    assert_eq!(first, second, "session replay diverged");
    assert!(first.collected > 0, "no sun was ever collected");
    assert!(first.spawned_zombies > 0, "no zombie ever spawned");
}

#[test]
fn undefended_lawn_is_overrun() {
    let outcome = replay_with(Vec::new(), 1_500);

    assert_eq!(outcome.status, GameStatus::GameOver);
    assert!(outcome.breaches > 0);
}

fn replay(ticks: usize) -> ReplayOutcome {
    replay_with(
        vec![
            (PlantKind::Sunflower, CellCoord::new(0, 0)),
            (PlantKind::Peashooter, CellCoord::new(2, 1)),
            (PlantKind::Sunflower, CellCoord::new(4, 0)),
            (PlantKind::Peashooter, CellCoord::new(1, 1)),
            (PlantKind::Peashooter, CellCoord::new(3, 1)),
            (PlantKind::WallNut, CellCoord::new(2, 5)),
        ],
        ticks,
    )
}

/// Runs a session that places plants in order whenever they are affordable
/// and collects every sun as soon as it appears.
fn replay_with(mut planting: Vec<(PlantKind, CellCoord)>, ticks: usize) -> ReplayOutcome {
    planting.reverse();
    let mut world = World::new();
    let mut log = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut log);

    for _ in 0..ticks {
        let mut events = Vec::new();
        world::apply(&mut world, Command::Tick { dt: TICK }, &mut events);

        let spawned: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                Event::SunSpawned { sun, .. } => Some(*sun),
                _ => None,
            })
            .collect();
        for sun in spawned {
            world::apply(&mut world, Command::CollectSun { sun }, &mut events);
        }

        if let Some(&(kind, cell)) = planting.last() {
            if query::sun(&world) >= kind.cost() {
                world::apply(&mut world, Command::PlacePlant { kind, cell }, &mut events);
                let _ = planting.pop();
            }
        }

        assert_cells_unique(&world);
        log.extend(events);

        if query::status(&world).is_finished() {
            break;
        }
    }

    ReplayOutcome::from_log(&world, &log)
}

fn assert_cells_unique(world: &World) {
    let plants = query::plants(world);
    let cells: HashSet<CellCoord> = plants.iter().map(|plant| plant.cell).collect();
    assert_eq!(cells.len(), plants.len(), "two plants share a cell");
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    status: GameStatus,
    sun: u32,
    tick_index: u64,
    collected: usize,
    spawned_zombies: usize,
    breaches: usize,
    fingerprint: u64,
}

impl ReplayOutcome {
    fn from_log(world: &World, log: &[Event]) -> Self {
        let count = |predicate: fn(&Event) -> bool| log.iter().filter(|e| predicate(e)).count();

        let mut hasher = DefaultHasher::new();
        for event in log {
            format!("{event:?}").hash(&mut hasher);
        }

        Self {
            status: query::status(world),
            sun: query::sun(world),
            tick_index: query::tick_index(world),
            collected: count(|event| matches!(event, Event::SunCollected { .. })),
            spawned_zombies: count(|event| matches!(event, Event::ZombieSpawned { .. })),
            breaches: count(|event| matches!(event, Event::HouseBreached { .. })),
            fingerprint: hasher.finish(),
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lawn Defense.
//!
//! The world owns the session state machine, the sun bank and every entity
//! population. All mutations flow through [`apply`]; presentation reads the
//! state through the [`query`] module only.

mod lawn;
mod step;

use std::time::Duration;

use lawn_defense_core::{
    CellCoord, Command, Event, GameStatus, PlacementError, PlantId, PlantKind, Rules, SunId,
};
use lawn_defense_system_spawning::{Config as SpawnerConfig, Spawner};
use tracing::{debug, info};

use crate::lawn::{IdAllocator, Lawn, Plant};

/// Represents the authoritative Lawn Defense world state.
#[derive(Debug)]
pub struct World {
    rules: Rules,
    status: GameStatus,
    clock: Duration,
    level_started_at: Duration,
    progress: f32,
    sun: u32,
    lawn: Lawn,
    spawner: Spawner,
    ids: IdAllocator,
    tick_index: u64,
}

impl World {
    /// Creates a new world in the menu, using the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Creates a new world in the menu, using the provided rules.
    #[must_use]
    pub fn with_rules(rules: Rules) -> Self {
        let spawner = Spawner::new(SpawnerConfig::from_rules(&rules));
        Self {
            sun: rules.starting_sun,
            rules,
            status: GameStatus::Menu,
            clock: Duration::ZERO,
            level_started_at: Duration::ZERO,
            progress: 0.0,
            lawn: Lawn::default(),
            spawner,
            ids: IdAllocator::default(),
            tick_index: 0,
        }
    }

    fn transition(&mut self, to: GameStatus, out_events: &mut Vec<Event>) {
        let from = self.status;
        if from == to {
            return;
        }
        self.status = to;
        info!(?from, ?to, "game status changed");
        out_events.push(Event::StatusChanged { from, to });
    }

    fn start_session(&mut self, out_events: &mut Vec<Event>) {
        self.lawn.clear();
        self.sun = self.rules.starting_sun;
        self.progress = 0.0;
        self.level_started_at = self.clock;
        self.spawner.reset(self.clock);
        info!(sun = self.sun, "session started");
        out_events.push(Event::SessionStarted);
        self.transition(GameStatus::Playing, out_events);
    }

    fn toggle_pause(&mut self, out_events: &mut Vec<Event>) {
        match self.status {
            GameStatus::Playing => self.transition(GameStatus::Paused, out_events),
            GameStatus::Paused => self.transition(GameStatus::Playing, out_events),
            GameStatus::Menu | GameStatus::GameOver | GameStatus::Victory => {}
        }
    }

    fn try_place(&mut self, kind: PlantKind, cell: CellCoord) -> Result<PlantId, PlacementError> {
        if self.status != GameStatus::Playing {
            return Err(PlacementError::NotPlaying);
        }
        if !self.rules.contains(cell) {
            return Err(PlacementError::OutOfBounds);
        }
        if self.lawn.plant_at(cell).is_some() {
            return Err(PlacementError::Occupied);
        }

        let cost = kind.cost();
        if self.sun < cost {
            return Err(PlacementError::InsufficientSun {
                required: cost,
                available: self.sun,
            });
        }

        self.sun -= cost;
        let id = self.ids.plant();
        self.lawn.plants.push(Plant::new(id, kind, cell, self.clock));
        Ok(id)
    }

    fn place_plant(&mut self, kind: PlantKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        match self.try_place(kind, cell) {
            Ok(plant) => {
                debug!(plant = plant.get(), ?kind, ?cell, sun = self.sun, "plant placed");
                out_events.push(Event::PlantPlaced {
                    plant,
                    kind,
                    cell,
                    cost: kind.cost(),
                });
            }
            Err(reason) => {
                debug!(?kind, ?cell, %reason, "placement rejected");
                out_events.push(Event::PlacementRejected { kind, cell, reason });
            }
        }
    }

    fn collect_sun(&mut self, sun: SunId, out_events: &mut Vec<Event>) {
        let Some(index) = self.lawn.suns.iter().position(|entry| entry.id == sun) else {
            return;
        };

        let collected = self.lawn.suns.remove(index);
        self.sun = self.sun.saturating_add(collected.value);
        out_events.push(Event::SunCollected {
            sun,
            value: collected.value,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame => world.start_session(out_events),
        Command::TogglePause => world.toggle_pause(out_events),
        Command::ExitToMenu => world.transition(GameStatus::Menu, out_events),
        Command::Tick { dt } => step::advance(world, dt, out_events),
        Command::PlacePlant { kind, cell } => world.place_plant(kind, cell, out_events),
        Command::CollectSun { sun } => world.collect_sun(sun, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use lawn_defense_core::{
        CellCoord, GameStatus, LawnView, PlantSnapshot, ProjectileSnapshot, Rules, SunSnapshot,
        ZombieSnapshot,
    };

    use super::World;

    /// Current status of the session state machine.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Sun available to spend.
    #[must_use]
    pub fn sun(world: &World) -> u32 {
        world.sun
    }

    /// Level progress in percent.
    #[must_use]
    pub fn progress(world: &World) -> f32 {
        world.progress
    }

    /// Rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Simulation clock. Only advances while playing.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Number of simulation steps executed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Snapshots of every plant in identifier order.
    #[must_use]
    pub fn plants(world: &World) -> Vec<PlantSnapshot> {
        world.lawn.plants.iter().map(|plant| plant.snapshot()).collect()
    }

    /// Snapshots of every zombie in identifier order.
    #[must_use]
    pub fn zombies(world: &World) -> Vec<ZombieSnapshot> {
        world
            .lawn
            .zombies
            .iter()
            .map(|zombie| zombie.snapshot())
            .collect()
    }

    /// Snapshots of every projectile in identifier order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .lawn
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Snapshots of every uncollected sun in identifier order.
    #[must_use]
    pub fn suns(world: &World) -> Vec<SunSnapshot> {
        world.lawn.suns.iter().map(|sun| sun.snapshot()).collect()
    }

    /// Snapshot of the plant occupying the provided cell, if any.
    #[must_use]
    pub fn plant_at(world: &World, cell: CellCoord) -> Option<PlantSnapshot> {
        world.lawn.plant_at(cell).map(|plant| plant.snapshot())
    }

    /// Captures everything presentation needs in a single owned view.
    #[must_use]
    pub fn lawn_view(world: &World) -> LawnView {
        LawnView {
            status: world.status,
            sun: world.sun,
            progress: world.progress,
            rows: world.rules.rows,
            columns: world.rules.columns,
            plants: plants(world),
            zombies: zombies(world),
            projectiles: projectiles(world),
            suns: suns(world),
        }
    }
}

/// Helpers that seed deterministic scenarios for tests.
#[cfg(any(test, feature = "scenario_scaffolding"))]
pub mod scaffolding {
    use std::time::Duration;

    use lawn_defense_core::{SunId, SunPosition, ZombieId, ZombieKind};

    use super::{
        lawn::{Sun, Zombie},
        World,
    };

    /// Places a zombie of the provided kind at an arbitrary lane position.
    pub fn spawn_zombie(world: &mut World, kind: ZombieKind, lane: u32, position: f32) -> ZombieId {
        let id = world.ids.zombie();
        world.lawn.zombies.push(Zombie::at(id, kind, lane, position));
        id
    }

    /// Applies the freeze effect to a zombie for the provided duration.
    pub fn freeze_zombie(world: &mut World, zombie: ZombieId, duration: Duration) {
        if let Some(entry) = world.lawn.zombies.iter_mut().find(|entry| entry.id == zombie) {
            entry.frozen = true;
            entry.freeze_remaining = duration;
        }
    }

    /// Removes a zombie without emitting any event.
    pub fn remove_zombie(world: &mut World, zombie: ZombieId) {
        world.lawn.zombies.retain(|entry| entry.id != zombie);
    }

    /// Adds sun to the bank.
    pub fn grant_sun(world: &mut World, amount: u32) {
        world.sun = world.sun.saturating_add(amount);
    }

    /// Drops a sun resource at the provided position.
    pub fn drop_sun(world: &mut World, position: SunPosition, value: u32) -> SunId {
        let id = world.ids.sun();
        world.lawn.suns.push(Sun {
            id,
            position,
            value,
            created_at: world.clock,
        });
        id
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lawn Defense engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate player input into
//! [`PlayerIntent`] values, systems turn intents into [`Command`] values, the
//! world executes those commands via its `apply` entry point, and then
//! broadcasts [`Event`] values for systems to react to deterministically.

mod catalog;
mod rules;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use catalog::{
    PlantBehavior, PlantKind, PlantStats, Shot, UnknownPlantKind, ZombieKind, ZombieStats,
};
pub use rules::{Rules, LANE_LENGTH};

/// Message shown when a session starts.
pub const WELCOME_MESSAGE: &str = "Welcome to the lawn!";

/// Status of the game session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Title screen; no session is running.
    Menu,
    /// The simulation advances on every tick.
    Playing,
    /// The session is suspended; ticks are ignored.
    Paused,
    /// A zombie reached the house.
    GameOver,
    /// The level timer ran out with no zombies left.
    Victory,
}

impl GameStatus {
    /// Reports whether the session has ended.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a fresh session, discarding any previous state.
    StartGame,
    /// Toggles between playing and paused.
    TogglePause,
    /// Returns to the menu from any status.
    ExitToMenu,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests placement of a plant on the provided cell.
    PlacePlant {
        /// Kind of plant to place.
        kind: PlantKind,
        /// Target cell.
        cell: CellCoord,
    },
    /// Requests collection of a sun resource.
    CollectSun {
        /// Identifier of the sun to collect.
        sun: SunId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a fresh session started.
    SessionStarted,
    /// Announces a transition of the session state machine.
    StatusChanged {
        /// Status before the transition.
        from: GameStatus,
        /// Status after the transition.
        to: GameStatus,
    },
    /// Confirms that a plant was placed.
    PlantPlaced {
        /// Identifier assigned to the plant.
        plant: PlantId,
        /// Kind of the placed plant.
        kind: PlantKind,
        /// Cell occupied by the plant.
        cell: CellCoord,
        /// Sun deducted for the placement.
        cost: u32,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Kind of plant requested for placement.
        kind: PlantKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a sun resource appeared on the lawn.
    SunSpawned {
        /// Identifier assigned to the sun.
        sun: SunId,
        /// Sun granted when collected.
        value: u32,
    },
    /// Confirms that a sun resource was collected.
    SunCollected {
        /// Identifier of the collected sun.
        sun: SunId,
        /// Sun added to the total.
        value: u32,
    },
    /// Confirms that a zombie entered the lawn.
    ZombieSpawned {
        /// Identifier assigned to the zombie.
        zombie: ZombieId,
        /// Kind of the zombie.
        kind: ZombieKind,
        /// Lane the zombie walks along.
        lane: u32,
    },
    /// Confirms that a plant fired a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Plant that fired the projectile.
        plant: PlantId,
        /// Lane the projectile travels along.
        lane: u32,
    },
    /// Reports that a projectile struck a zombie.
    ZombieHit {
        /// Zombie that was struck.
        zombie: ZombieId,
        /// Projectile that struck the zombie.
        projectile: ProjectileId,
        /// Damage dealt.
        damage: u32,
        /// Whether the hit applied the freeze effect.
        froze: bool,
    },
    /// Reports that a bomb plant destroyed itself and a zombie.
    BombDetonated {
        /// Bomb that detonated.
        plant: PlantId,
        /// Zombie destroyed by the blast.
        zombie: ZombieId,
    },
    /// Reports that a plant was removed after its health ran out.
    PlantDestroyed {
        /// Identifier of the removed plant.
        plant: PlantId,
        /// Cell the plant occupied.
        cell: CellCoord,
    },
    /// Reports that a zombie was removed after its health ran out.
    ZombieDestroyed {
        /// Identifier of the removed zombie.
        zombie: ZombieId,
    },
    /// Reports that a zombie walked past the left edge of the lawn.
    HouseBreached {
        /// Zombie that reached the house.
        zombie: ZombieId,
    },
}

/// Player intents captured by adapters before being turned into commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerIntent {
    /// Selects a seed packet for the next placement.
    SelectPlant(PlantKind),
    /// Drops the current seed packet selection.
    ClearSelection,
    /// Clicks a lawn cell, placing the selected plant if any.
    ClickCell(CellCoord),
    /// Clicks a sun resource.
    CollectSun(SunId),
    /// Toggles the pause state.
    TogglePause,
    /// Starts or restarts a session.
    StartGame,
    /// Leaves the session for the menu.
    ExitToMenu,
}

/// Reasons a plant placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum PlacementError {
    /// Plants can only be placed while the session is playing.
    #[error("plants can only be placed while playing")]
    NotPlaying,
    /// The requested cell lies outside the lawn.
    #[error("cell lies outside the lawn")]
    OutOfBounds,
    /// The requested cell already holds a plant.
    #[error("cell is already occupied")]
    Occupied,
    /// The player cannot afford the plant.
    #[error("not enough sun: {required} required, {available} available")]
    InsufficientSun {
        /// Cost of the requested plant.
        required: u32,
        /// Sun available at the time of the request.
        available: u32,
    },
}

/// Unique identifier assigned to a plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlantId(u32);

impl PlantId {
    /// Creates a new plant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a zombie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZombieId(u32);

impl ZombieId {
    /// Creates a new zombie identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a sun resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SunId(u32);

impl SunId {
    /// Creates a new sun identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single lawn cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row (lane) index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Position of a sun resource in percentage space of the lawn.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SunPosition {
    /// Horizontal offset from the left edge, 0 to 100.
    pub x: f32,
    /// Vertical offset from the top edge, 0 to 100.
    pub y: f32,
}

impl SunPosition {
    /// Creates a new sun position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Immutable representation of a single plant's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct PlantSnapshot {
    /// Unique identifier assigned to the plant.
    pub id: PlantId,
    /// Kind of the plant.
    pub kind: PlantKind,
    /// Cell occupied by the plant.
    pub cell: CellCoord,
    /// Remaining health.
    pub health: f32,
    /// Health the plant was placed with.
    pub max_health: f32,
    /// Simulation time of the plant's last action.
    pub last_action: Duration,
}

/// Immutable representation of a single zombie's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ZombieSnapshot {
    /// Unique identifier assigned to the zombie.
    pub id: ZombieId,
    /// Kind of the zombie.
    pub kind: ZombieKind,
    /// Lane the zombie walks along.
    pub lane: u32,
    /// Position along the lane; 100 is the spawn edge, 0 the house edge.
    pub position: f32,
    /// Remaining health.
    pub health: f32,
    /// Health the zombie spawned with.
    pub max_health: f32,
    /// Whether the zombie is currently eating a plant.
    pub eating: bool,
    /// Whether the freeze effect is active.
    pub frozen: bool,
    /// Remaining duration of the freeze effect.
    pub freeze_remaining: Duration,
}

/// Immutable representation of a single projectile's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Lane the projectile travels along.
    pub lane: u32,
    /// Position along the lane.
    pub position: f32,
    /// Damage dealt on impact.
    pub damage: u32,
    /// Whether the projectile applies the freeze effect.
    pub freezes: bool,
}

/// Immutable representation of a single sun resource used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct SunSnapshot {
    /// Unique identifier assigned to the sun.
    pub id: SunId,
    /// Position on the lawn.
    pub position: SunPosition,
    /// Sun granted when collected.
    pub value: u32,
    /// Simulation time at which the sun appeared.
    pub created_at: Duration,
}

/// Read-only snapshot of everything presentation needs from the world.
///
/// Collections are ordered by identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct LawnView {
    /// Status of the session.
    pub status: GameStatus,
    /// Sun available to spend.
    pub sun: u32,
    /// Level progress in percent.
    pub progress: f32,
    /// Lawn rows.
    pub rows: u32,
    /// Lawn columns.
    pub columns: u32,
    /// Plants on the lawn.
    pub plants: Vec<PlantSnapshot>,
    /// Zombies on the lawn.
    pub zombies: Vec<ZombieSnapshot>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Uncollected suns.
    pub suns: Vec<SunSnapshot>,
}

impl LawnView {
    /// Returns the plant occupying the provided cell, if any.
    #[must_use]
    pub fn plant_at(&self, cell: CellCoord) -> Option<&PlantSnapshot> {
        self.plants.iter().find(|plant| plant.cell == cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_statuses() {
        assert!(GameStatus::GameOver.is_finished());
        assert!(GameStatus::Victory.is_finished());
        assert!(!GameStatus::Playing.is_finished());
        assert!(!GameStatus::Paused.is_finished());
        assert!(!GameStatus::Menu.is_finished());
    }

    #[test]
    fn insufficient_sun_reports_both_amounts() {
        let error = PlacementError::InsufficientSun {
            required: 175,
            available: 50,
        };

        assert_eq!(
            error.to_string(),
            "not enough sun: 175 required, 50 available"
        );
    }

    #[test]
    fn default_rules_place_cells_on_lawn() {
        let rules = Rules::default();

        assert!(rules.contains(CellCoord::new(4, 8)));
        assert!(!rules.contains(CellCoord::new(5, 0)));
        assert!(!rules.contains(CellCoord::new(0, 9)));
    }
}

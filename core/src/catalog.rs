//! Static stat tables for every plant and zombie variety.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

/// Plant varieties the player may place on the lawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlantKind {
    /// Basic shooter firing a single pea.
    Peashooter,
    /// Economy plant that periodically drops sun.
    Sunflower,
    /// High-health blocker without an action.
    WallNut,
    /// Bomb that destroys itself and the first zombie that touches it.
    CherryBomb,
    /// Shooter whose peas freeze the zombie they hit.
    SnowPea,
    /// Shooter firing two peas per volley.
    Repeater,
}

impl PlantKind {
    /// Every plant kind in seed-packet order.
    pub const ALL: [PlantKind; 6] = [
        PlantKind::Peashooter,
        PlantKind::Sunflower,
        PlantKind::WallNut,
        PlantKind::CherryBomb,
        PlantKind::SnowPea,
        PlantKind::Repeater,
    ];

    /// Static stat bundle associated with the kind.
    #[must_use]
    pub const fn stats(self) -> PlantStats {
        match self {
            Self::Peashooter => PlantStats {
                cost: 100,
                health: 100.0,
                behavior: PlantBehavior::Shoot(Shot {
                    damage: 20,
                    interval: Duration::from_millis(1_500),
                    volley: 1,
                    freezes: false,
                }),
            },
            Self::Sunflower => PlantStats {
                cost: 50,
                health: 80.0,
                behavior: PlantBehavior::Produce {
                    interval: Duration::from_millis(5_000),
                    value: 25,
                },
            },
            Self::WallNut => PlantStats {
                cost: 50,
                health: 800.0,
                behavior: PlantBehavior::Block,
            },
            // Health is high enough that the bomb only dies by detonating.
            Self::CherryBomb => PlantStats {
                cost: 150,
                health: 999.0,
                behavior: PlantBehavior::Detonate(Shot {
                    damage: 500,
                    interval: Duration::from_millis(1_500),
                    volley: 1,
                    freezes: false,
                }),
            },
            Self::SnowPea => PlantStats {
                cost: 175,
                health: 100.0,
                behavior: PlantBehavior::Shoot(Shot {
                    damage: 20,
                    interval: Duration::from_millis(1_500),
                    volley: 1,
                    freezes: true,
                }),
            },
            Self::Repeater => PlantStats {
                cost: 200,
                health: 120.0,
                behavior: PlantBehavior::Shoot(Shot {
                    damage: 20,
                    interval: Duration::from_millis(1_500),
                    volley: 2,
                    freezes: false,
                }),
            },
        }
    }

    /// Sun required to place the plant.
    #[must_use]
    pub const fn cost(self) -> u32 {
        self.stats().cost
    }

    /// Behaviour executed by the plant on every tick.
    #[must_use]
    pub const fn behavior(self) -> PlantBehavior {
        self.stats().behavior
    }

    /// Human readable name shown in seed packets and advisory prompts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Peashooter => "Peashooter",
            Self::Sunflower => "Sunflower",
            Self::WallNut => "Wall-nut",
            Self::CherryBomb => "Cherry Bomb",
            Self::SnowPea => "Snow Pea",
            Self::Repeater => "Repeater",
        }
    }

    /// One-line description of what the plant does.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Peashooter => "Shoots peas at zombies",
            Self::Sunflower => "Produces extra sun",
            Self::WallNut => "Blocks zombies with high health",
            Self::CherryBomb => "Lobs heavy peas and explodes the first zombie that reaches it",
            Self::SnowPea => "Shoots frozen peas that slow zombies",
            Self::Repeater => "Shoots two peas at a time",
        }
    }
}

impl fmt::Display for PlantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a plant name cannot be resolved.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown plant `{0}`")]
pub struct UnknownPlantKind(pub String);

impl FromStr for PlantKind {
    type Err = UnknownPlantKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| {
                let name: String = kind
                    .name()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                name == normalized
            })
            .ok_or_else(|| UnknownPlantKind(value.to_owned()))
    }
}

/// Static stats shared by every plant of a kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantStats {
    /// Sun spent when placing the plant.
    pub cost: u32,
    /// Health the plant starts with.
    pub health: f32,
    /// Behaviour executed during the plant action phase.
    pub behavior: PlantBehavior,
}

/// Tagged behaviour executed by a plant during the simulation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlantBehavior {
    /// Drops a sun near the plant's cell whenever the interval elapses.
    Produce {
        /// Minimum time between two drops.
        interval: Duration,
        /// Value of each dropped sun.
        value: u32,
    },
    /// Fires projectiles down its lane while a zombie is ahead of it.
    Shoot(Shot),
    /// Only blocks zombies.
    Block,
    /// Shoots like a shooter and destroys itself together with the first
    /// zombie that starts eating it.
    Detonate(Shot),
}

impl PlantBehavior {
    /// Volley fired by the plant, if it carries a damage stat.
    #[must_use]
    pub const fn shot(self) -> Option<Shot> {
        match self {
            Self::Shoot(shot) | Self::Detonate(shot) => Some(shot),
            Self::Produce { .. } | Self::Block => None,
        }
    }

    /// Whether a zombie biting the plant sets it off.
    #[must_use]
    pub const fn detonates(self) -> bool {
        matches!(self, Self::Detonate(_))
    }
}

/// Projectile volley fired by shooter-class plants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shot {
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Minimum time between two volleys.
    pub interval: Duration,
    /// Number of projectiles per volley.
    pub volley: u32,
    /// Whether projectiles apply the freeze effect.
    pub freezes: bool,
}

/// Zombie varieties emitted by the spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZombieKind {
    /// Baseline zombie.
    Normal,
    /// Zombie protected by a traffic cone.
    Conehead,
    /// Zombie protected by a bucket.
    Buckethead,
}

impl ZombieKind {
    /// Every zombie kind.
    pub const ALL: [ZombieKind; 3] = [
        ZombieKind::Normal,
        ZombieKind::Conehead,
        ZombieKind::Buckethead,
    ];

    /// Static stat bundle associated with the kind.
    #[must_use]
    pub const fn stats(self) -> ZombieStats {
        match self {
            Self::Normal => ZombieStats {
                health: 200.0,
                speed: 0.3,
                contact_damage: 10.0,
            },
            Self::Conehead => ZombieStats {
                health: 500.0,
                speed: 0.3,
                contact_damage: 10.0,
            },
            Self::Buckethead => ZombieStats {
                health: 1_100.0,
                speed: 0.3,
                contact_damage: 10.0,
            },
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Conehead => "Conehead",
            Self::Buckethead => "Buckethead",
        }
    }

    /// One-line description of the zombie.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Normal => "Shambles forward and eats whatever blocks its lane",
            Self::Conehead => "Wears a cone that more than doubles its toughness",
            Self::Buckethead => "Hides under a bucket and soaks up a lot of peas",
        }
    }
}

impl fmt::Display for ZombieKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static stats shared by every zombie of a kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombieStats {
    /// Health the zombie spawns with.
    pub health: f32,
    /// Lane distance covered per tick while walking.
    pub speed: f32,
    /// Damage dealt to an eaten plant per second of eating.
    pub contact_damage: f32,
}

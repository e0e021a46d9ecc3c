//! Entity records stored by the world and the identifier allocator.

use std::time::Duration;

use lawn_defense_core::{
    CellCoord, PlantId, PlantKind, PlantSnapshot, ProjectileId, ProjectileSnapshot, SunId,
    SunPosition, SunSnapshot, ZombieId, ZombieKind, ZombieSnapshot, LANE_LENGTH,
};

#[derive(Clone, Debug)]
pub(crate) struct Plant {
    pub(crate) id: PlantId,
    pub(crate) kind: PlantKind,
    pub(crate) cell: CellCoord,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) last_action: Duration,
}

impl Plant {
    pub(crate) fn new(id: PlantId, kind: PlantKind, cell: CellCoord, now: Duration) -> Self {
        let health = kind.stats().health;
        Self {
            id,
            kind,
            cell,
            health,
            max_health: health,
            last_action: now,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub(crate) fn snapshot(&self) -> PlantSnapshot {
        PlantSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            health: self.health,
            max_health: self.max_health,
            last_action: self.last_action,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Zombie {
    pub(crate) id: ZombieId,
    pub(crate) kind: ZombieKind,
    pub(crate) lane: u32,
    pub(crate) position: f32,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) eating: bool,
    pub(crate) frozen: bool,
    pub(crate) freeze_remaining: Duration,
}

impl Zombie {
    /// Creates a zombie at the spawn edge of the lane.
    pub(crate) fn spawn(id: ZombieId, kind: ZombieKind, lane: u32) -> Self {
        Self::at(id, kind, lane, LANE_LENGTH)
    }

    pub(crate) fn at(id: ZombieId, kind: ZombieKind, lane: u32, position: f32) -> Self {
        let health = kind.stats().health;
        Self {
            id,
            kind,
            lane,
            position,
            health,
            max_health: health,
            eating: false,
            frozen: false,
            freeze_remaining: Duration::ZERO,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub(crate) fn snapshot(&self) -> ZombieSnapshot {
        ZombieSnapshot {
            id: self.id,
            kind: self.kind,
            lane: self.lane,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            eating: self.eating,
            frozen: self.frozen,
            freeze_remaining: self.freeze_remaining,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) lane: u32,
    pub(crate) position: f32,
    pub(crate) damage: u32,
    pub(crate) freezes: bool,
}

impl Projectile {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            lane: self.lane,
            position: self.position,
            damage: self.damage,
            freezes: self.freezes,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Sun {
    pub(crate) id: SunId,
    pub(crate) position: SunPosition,
    pub(crate) value: u32,
    pub(crate) created_at: Duration,
}

impl Sun {
    pub(crate) fn snapshot(&self) -> SunSnapshot {
        SunSnapshot {
            id: self.id,
            position: self.position,
            value: self.value,
            created_at: self.created_at,
        }
    }
}

/// Every entity population on the lawn. Collections stay in identifier order
/// because identifiers grow monotonically and removal preserves order.
#[derive(Clone, Debug, Default)]
pub(crate) struct Lawn {
    pub(crate) plants: Vec<Plant>,
    pub(crate) zombies: Vec<Zombie>,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) suns: Vec<Sun>,
}

impl Lawn {
    pub(crate) fn clear(&mut self) {
        self.plants.clear();
        self.zombies.clear();
        self.projectiles.clear();
        self.suns.clear();
    }

    pub(crate) fn plant_at(&self, cell: CellCoord) -> Option<&Plant> {
        self.plants.iter().find(|plant| plant.cell == cell)
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct IdAllocator {
    next_plant: u32,
    next_zombie: u32,
    next_projectile: u32,
    next_sun: u32,
}

impl IdAllocator {
    pub(crate) fn plant(&mut self) -> PlantId {
        PlantId::new(bump(&mut self.next_plant))
    }

    pub(crate) fn zombie(&mut self) -> ZombieId {
        ZombieId::new(bump(&mut self.next_zombie))
    }

    pub(crate) fn projectile(&mut self) -> ProjectileId {
        ProjectileId::new(bump(&mut self.next_projectile))
    }

    pub(crate) fn sun(&mut self) -> SunId {
        SunId::new(bump(&mut self.next_sun))
    }
}

fn bump(counter: &mut u32) -> u32 {
    let value = *counter;
    *counter = counter.wrapping_add(1);
    value
}

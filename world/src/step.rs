//! The fixed-interval simulation step.
//!
//! Each tick reads the committed lawn, writes every mutation into a cloned
//! buffer and swaps the buffer in once all phases ran:
//!
//! 1. progress update and victory check,
//! 2. sun and zombie spawning,
//! 3. plant actions,
//! 4. projectile movement and collision,
//! 5. zombie movement, eating and detonations,
//! 6. loss check,
//! 7. cleanup of entities without health,
//! 8. commit.

use std::time::Duration;

use lawn_defense_core::{
    CellCoord, Event, GameStatus, PlantBehavior, Rules, SunPosition, LANE_LENGTH,
};
use lawn_defense_system_spawning::{Spawner, SunDrop};
use tracing::debug;

use crate::{
    lawn::{IdAllocator, Lawn, Projectile, Sun, Zombie},
    World,
};

/// Runs a single simulation step of duration `dt`.
pub(crate) fn advance(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    if world.status != GameStatus::Playing {
        return;
    }

    world.tick_index = world.tick_index.saturating_add(1);
    world.clock = world.clock.saturating_add(dt);
    out_events.push(Event::TimeAdvanced { dt });

    let now = world.clock;
    world.progress = level_progress(
        now.saturating_sub(world.level_started_at),
        world.rules.level_duration(),
    );
    if world.progress >= 100.0 && world.lawn.zombies.is_empty() {
        world.transition(GameStatus::Victory, out_events);
        return;
    }

    let mut next = world.lawn.clone();
    let mut step = StepContext {
        rules: &world.rules,
        now,
        dt,
        ids: &mut world.ids,
        events: &mut *out_events,
    };

    step.spawn(&mut world.spawner, world.progress, &mut next);
    step.plants_act(&mut next);
    step.move_projectiles(&mut next);
    let breached = step.move_zombies(&mut next);
    step.cleanup(&mut next);

    if breached {
        world.transition(GameStatus::GameOver, out_events);
    }

    world.lawn = next;
    debug_assert!(
        cells_are_unique(&world.lawn),
        "two plants share a cell after commit"
    );
}

/// Level progress in percent, clamped to 100.
pub(crate) fn level_progress(elapsed: Duration, level_duration: Duration) -> f32 {
    if level_duration.is_zero() {
        return 100.0;
    }
    let ratio = elapsed.as_secs_f64() / level_duration.as_secs_f64();
    (ratio * 100.0).min(100.0) as f32
}

struct StepContext<'a> {
    rules: &'a Rules,
    now: Duration,
    dt: Duration,
    ids: &'a mut IdAllocator,
    events: &'a mut Vec<Event>,
}

impl StepContext<'_> {
    fn spawn(&mut self, spawner: &mut Spawner, progress: f32, lawn: &mut Lawn) {
        if let Some(drop) = spawner.try_spawn_sun(self.now) {
            self.drop_sun(lawn, drop);
        }

        if let Some(spawn) = spawner.try_spawn_zombie(self.now, progress) {
            let zombie = self.ids.zombie();
            lawn.zombies.push(Zombie::spawn(zombie, spawn.kind, spawn.lane));
            self.events.push(Event::ZombieSpawned {
                zombie,
                kind: spawn.kind,
                lane: spawn.lane,
            });
        }
    }

    fn drop_sun(&mut self, lawn: &mut Lawn, drop: SunDrop) {
        let sun = self.ids.sun();
        lawn.suns.push(Sun {
            id: sun,
            position: drop.position,
            value: drop.value,
            created_at: self.now,
        });
        self.events.push(Event::SunSpawned {
            sun,
            value: drop.value,
        });
    }

    fn plants_act(&mut self, lawn: &mut Lawn) {
        let rules = self.rules;
        let now = self.now;
        let mut drops = Vec::new();

        for plant in lawn.plants.iter_mut() {
            let lane = plant.cell.row();
            let edge = rules.column_edge(plant.cell.column());
            let since_last_action = now.saturating_sub(plant.last_action);

            match plant.kind.behavior() {
                PlantBehavior::Produce { interval, value } => {
                    if since_last_action > interval {
                        let position = SunPosition::new(
                            edge + rules.sun_drop_offset,
                            lane as f32 * rules.row_height() + rules.sun_drop_offset,
                        );
                        drops.push(SunDrop::new(position, value));
                        plant.last_action = now;
                    }
                }
                PlantBehavior::Shoot(shot) | PlantBehavior::Detonate(shot) => {
                    let target_ahead = lawn.zombies.iter().any(|zombie| {
                        zombie.is_alive() && zombie.lane == lane && zombie.position > edge
                    });
                    if !target_ahead || since_last_action <= shot.interval {
                        continue;
                    }

                    for index in 0..shot.volley {
                        let projectile = self.ids.projectile();
                        lawn.projectiles.push(Projectile {
                            id: projectile,
                            lane,
                            position: edge
                                + rules.muzzle_offset
                                + index as f32 * rules.volley_spacing,
                            damage: shot.damage,
                            freezes: shot.freezes,
                        });
                        self.events.push(Event::ProjectileFired {
                            projectile,
                            plant: plant.id,
                            lane,
                        });
                    }
                    plant.last_action = now;
                }
                PlantBehavior::Block => {}
            }
        }

        for drop in drops {
            self.drop_sun(lawn, drop);
        }
    }

    fn move_projectiles(&mut self, lawn: &mut Lawn) {
        let rules = self.rules;
        let freeze_duration = rules.freeze_duration();
        let Lawn {
            zombies,
            projectiles,
            ..
        } = lawn;
        let events = &mut *self.events;

        projectiles.retain_mut(|projectile| {
            projectile.position += rules.projectile_step;

            let target = zombies.iter_mut().find(|zombie| {
                zombie.is_alive()
                    && zombie.lane == projectile.lane
                    && projectile.position >= zombie.position
                    && projectile.position <= zombie.position + rules.zombie_body_width
            });

            match target {
                Some(zombie) => {
                    zombie.health -= projectile.damage as f32;
                    if projectile.freezes {
                        zombie.frozen = true;
                        zombie.freeze_remaining = freeze_duration;
                    }
                    events.push(Event::ZombieHit {
                        zombie: zombie.id,
                        projectile: projectile.id,
                        damage: projectile.damage,
                        froze: projectile.freezes,
                    });
                    false
                }
                None => projectile.position < LANE_LENGTH,
            }
        });
    }

    /// Moves, feeds and detonates zombies. Returns whether any zombie was
    /// found past the house edge.
    fn move_zombies(&mut self, lawn: &mut Lawn) -> bool {
        let rules = self.rules;
        let dt = self.dt;
        let Lawn {
            plants, zombies, ..
        } = lawn;
        let mut breached = false;

        for zombie in zombies.iter_mut().filter(|zombie| zombie.is_alive()) {
            if zombie.position < 0.0 {
                breached = true;
                self.events.push(Event::HouseBreached { zombie: zombie.id });
            }

            let lane = zombie.lane;
            let bitten = rules
                .column_at(zombie.position + rules.bite_offset)
                .map(|column| CellCoord::new(lane, column));
            let meal = match bitten {
                Some(cell) => plants
                    .iter_mut()
                    .find(|plant| plant.cell == cell && plant.is_alive()),
                None => None,
            };

            match meal {
                Some(plant) => {
                    zombie.eating = true;
                    plant.health -= zombie.kind.stats().contact_damage * dt.as_secs_f32();

                    if plant.kind.behavior().detonates() {
                        plant.health = 0.0;
                        zombie.health = 0.0;
                        debug!(
                            plant = plant.id.get(),
                            zombie = zombie.id.get(),
                            "bomb detonated"
                        );
                        self.events.push(Event::BombDetonated {
                            plant: plant.id,
                            zombie: zombie.id,
                        });
                    }
                }
                None => {
                    zombie.eating = false;
                    let mut speed = zombie.kind.stats().speed;
                    if zombie.frozen && !zombie.freeze_remaining.is_zero() {
                        speed *= rules.freeze_speed_factor;
                        zombie.freeze_remaining = zombie.freeze_remaining.saturating_sub(dt);
                        if zombie.freeze_remaining.is_zero() {
                            zombie.frozen = false;
                        }
                    }
                    zombie.position -= speed;
                }
            }
        }

        breached
    }

    fn cleanup(&mut self, lawn: &mut Lawn) {
        let events = &mut *self.events;

        lawn.plants.retain(|plant| {
            if plant.is_alive() {
                return true;
            }
            events.push(Event::PlantDestroyed {
                plant: plant.id,
                cell: plant.cell,
            });
            false
        });

        lawn.zombies.retain(|zombie| {
            if zombie.is_alive() {
                return true;
            }
            events.push(Event::ZombieDestroyed { zombie: zombie.id });
            false
        });
    }
}

fn cells_are_unique(lawn: &Lawn) -> bool {
    lawn.plants.iter().enumerate().all(|(index, plant)| {
        lawn.plants[index + 1..]
            .iter()
            .all(|other| other.cell != plant.cell)
    })
}

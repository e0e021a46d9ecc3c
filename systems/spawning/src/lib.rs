#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Time-gated spawner responsible for sky sun drops and zombie arrivals.
//!
//! The spawner owns its timers and a seeded random number generator, so two
//! spawners built from the same configuration produce identical sequences
//! when queried with identical timestamps.

use std::time::Duration;

use lawn_defense_core::{Rules, SunPosition, ZombieKind, LANE_LENGTH};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Zombie kinds in unlock order. Normal appears twice so it dominates early
/// pools.
const ZOMBIE_POOL: [ZombieKind; 4] = [
    ZombieKind::Normal,
    ZombieKind::Normal,
    ZombieKind::Conehead,
    ZombieKind::Buckethead,
];

/// Progress above which the Conehead joins the pool.
const CONEHEAD_UNLOCK_PROGRESS: f32 = 15.0;
/// Progress above which the Buckethead joins the pool.
const BUCKETHEAD_UNLOCK_PROGRESS: f32 = 50.0;

/// Configuration parameters required to construct the spawner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    sun_interval: Duration,
    sun_value: u32,
    sun_margin: f32,
    zombie_interval: Duration,
    min_zombie_interval: Duration,
    ramp_ms_per_percent: f32,
    lanes: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration with explicit cadences, the lane count and seed.
    #[must_use]
    pub const fn new(
        sun_interval: Duration,
        zombie_interval: Duration,
        min_zombie_interval: Duration,
        lanes: u32,
        rng_seed: u64,
    ) -> Self {
        Self {
            sun_interval,
            sun_value: 25,
            sun_margin: 10.0,
            zombie_interval,
            min_zombie_interval,
            ramp_ms_per_percent: 40.0,
            lanes,
            rng_seed,
        }
    }

    /// Derives the spawner configuration from the game rules.
    #[must_use]
    pub fn from_rules(rules: &Rules) -> Self {
        Self {
            sun_interval: rules.sun_spawn_interval(),
            sun_value: rules.sun_value,
            sun_margin: rules.sun_margin,
            zombie_interval: rules.zombie_spawn_interval(),
            min_zombie_interval: rules.min_zombie_spawn_interval(),
            ramp_ms_per_percent: rules.zombie_spawn_ramp_ms,
            lanes: rules.rows,
            rng_seed: rules.rng_seed,
        }
    }

    /// Overrides the number of milliseconds the zombie interval shrinks per
    /// percent of progress.
    #[must_use]
    pub const fn with_ramp(mut self, ramp_ms_per_percent: f32) -> Self {
        self.ramp_ms_per_percent = ramp_ms_per_percent;
        self
    }
}

/// Sun resource requested by the spawner or by a producing plant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunDrop {
    /// Position of the sun on the lawn.
    pub position: SunPosition,
    /// Sun granted when collected.
    pub value: u32,
}

impl SunDrop {
    /// Creates a sun drop at a caller-chosen position.
    #[must_use]
    pub const fn new(position: SunPosition, value: u32) -> Self {
        Self { position, value }
    }
}

/// Zombie requested by the spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZombieSpawn {
    /// Lane the zombie enters.
    pub lane: u32,
    /// Kind of zombie to create.
    pub kind: ZombieKind,
}

/// Spawner that emits sun drops and zombies once their timers elapse.
#[derive(Clone, Debug)]
pub struct Spawner {
    config: Config,
    rng: ChaCha8Rng,
    last_sun_spawn: Duration,
    last_zombie_spawn: Duration,
}

impl Spawner {
    /// Creates a new spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            last_sun_spawn: Duration::ZERO,
            last_zombie_spawn: Duration::ZERO,
        }
    }

    /// Restarts both timers at `now` and reseeds the random number generator.
    pub fn reset(&mut self, now: Duration) {
        self.rng = ChaCha8Rng::seed_from_u64(self.config.rng_seed);
        self.last_sun_spawn = now;
        self.last_zombie_spawn = now;
    }

    /// Drops a sun at a random position once the sun interval has elapsed.
    pub fn try_spawn_sun(&mut self, now: Duration) -> Option<SunDrop> {
        if now.saturating_sub(self.last_sun_spawn) <= self.config.sun_interval {
            return None;
        }

        self.last_sun_spawn = now;
        let position = SunPosition::new(self.random_coordinate(), self.random_coordinate());
        debug!(x = position.x, y = position.y, "sun dropped from the sky");
        Some(SunDrop::new(position, self.config.sun_value))
    }

    /// Emits a zombie once the progress-dependent interval has elapsed.
    ///
    /// Nothing spawns once the level reaches 100% progress.
    pub fn try_spawn_zombie(&mut self, now: Duration, progress: f32) -> Option<ZombieSpawn> {
        if progress >= 100.0 || self.config.lanes == 0 {
            return None;
        }

        let interval = self.zombie_spawn_interval(progress);
        if now.saturating_sub(self.last_zombie_spawn) <= interval {
            return None;
        }

        self.last_zombie_spawn = now;
        let lane = self.rng.gen_range(0..self.config.lanes);
        let pool = zombie_pool(progress);
        let kind = pool[self.rng.gen_range(0..pool.len())];
        debug!(lane, ?kind, progress, "zombie spawned");
        Some(ZombieSpawn { lane, kind })
    }

    /// Interval between zombie spawns at the provided progress.
    #[must_use]
    pub fn zombie_spawn_interval(&self, progress: f32) -> Duration {
        let base = self.config.zombie_interval.as_millis() as f64;
        let floor = self.config.min_zombie_interval.as_millis() as f64;
        let ramped = base - f64::from(progress) * f64::from(self.config.ramp_ms_per_percent);
        Duration::from_millis(ramped.max(floor).round() as u64)
    }

    fn random_coordinate(&mut self) -> f32 {
        let low = self.config.sun_margin.max(0.0);
        let high = LANE_LENGTH - low;
        if low >= high {
            return LANE_LENGTH / 2.0;
        }
        self.rng.gen_range(low..high)
    }
}

/// Zombie kinds available at the provided progress. Kinds are drawn
/// uniformly from the returned slice.
#[must_use]
pub fn zombie_pool(progress: f32) -> &'static [ZombieKind] {
    let unlocked = if progress > BUCKETHEAD_UNLOCK_PROGRESS {
        4
    } else if progress > CONEHEAD_UNLOCK_PROGRESS {
        3
    } else {
        2
    };
    &ZOMBIE_POOL[..unlocked]
}

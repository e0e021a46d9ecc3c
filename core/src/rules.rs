//! Tunable rules shared by the world, the systems and the adapters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::CellCoord;

/// Length of a lane in percentage space. Zombies spawn at this position and
/// projectiles vanish once they reach it.
pub const LANE_LENGTH: f32 = 100.0;

/// Every tunable constant of the simulation.
///
/// Durations are stored in milliseconds so the rules can be authored in TOML;
/// the accessor methods expose them as [`Duration`] values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    /// Number of lanes on the lawn.
    pub rows: u32,
    /// Number of cells in each lane.
    pub columns: u32,
    /// Interval at which the driver issues ticks.
    pub tick_interval_ms: u64,
    /// Simulated time needed to reach 100% level progress.
    pub level_duration_ms: u64,
    /// Sun granted when a session starts.
    pub starting_sun: u32,
    /// Minimum time between two sky sun drops.
    pub sun_spawn_interval_ms: u64,
    /// Value of a sun dropped from the sky.
    pub sun_value: u32,
    /// Distance kept between random sun drops and the lawn edges, in percent.
    pub sun_margin: f32,
    /// Offset applied to suns dropped by plants relative to the cell corner.
    pub sun_drop_offset: f32,
    /// Zombie spawn interval at 0% progress.
    pub zombie_spawn_interval_ms: u64,
    /// Lower bound of the zombie spawn interval.
    pub min_zombie_spawn_interval_ms: u64,
    /// Milliseconds removed from the zombie spawn interval per percent of progress.
    pub zombie_spawn_ramp_ms: f32,
    /// Lane distance a projectile travels per tick.
    pub projectile_step: f32,
    /// Offset of the first projectile of a volley from the plant's cell edge.
    pub muzzle_offset: f32,
    /// Lateral distance between projectiles of the same volley.
    pub volley_spacing: f32,
    /// Width of a zombie's hit box measured from its position.
    pub zombie_body_width: f32,
    /// Offset added to a zombie's position to find the cell it bites into.
    pub bite_offset: f32,
    /// Duration of the freeze effect applied by icy projectiles.
    pub freeze_duration_ms: u64,
    /// Speed multiplier applied while a zombie is frozen.
    pub freeze_speed_factor: f32,
    /// Seed for the spawner's random number generator.
    pub rng_seed: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 9,
            tick_interval_ms: 100,
            level_duration_ms: 120_000,
            starting_sun: 150,
            sun_spawn_interval_ms: 4_000,
            sun_value: 25,
            sun_margin: 10.0,
            sun_drop_offset: 2.0,
            zombie_spawn_interval_ms: 10_000,
            min_zombie_spawn_interval_ms: 1_000,
            zombie_spawn_ramp_ms: 40.0,
            projectile_step: 2.0,
            muzzle_offset: 5.0,
            volley_spacing: 2.0,
            zombie_body_width: 5.0,
            bite_offset: 2.0,
            freeze_duration_ms: 2_000,
            freeze_speed_factor: 0.5,
            rng_seed: 0x5eed_1a57_0bad_cafe,
        }
    }
}

impl Rules {
    /// Interval between two driver ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Duration of a full level.
    #[must_use]
    pub const fn level_duration(&self) -> Duration {
        Duration::from_millis(self.level_duration_ms)
    }

    /// Minimum time between two sky sun drops.
    #[must_use]
    pub const fn sun_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.sun_spawn_interval_ms)
    }

    /// Zombie spawn interval at 0% progress.
    #[must_use]
    pub const fn zombie_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.zombie_spawn_interval_ms)
    }

    /// Lower bound of the zombie spawn interval.
    #[must_use]
    pub const fn min_zombie_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.min_zombie_spawn_interval_ms)
    }

    /// Duration of the freeze effect.
    #[must_use]
    pub const fn freeze_duration(&self) -> Duration {
        Duration::from_millis(self.freeze_duration_ms)
    }

    /// Width of a single cell in lane percentage space.
    #[must_use]
    pub fn column_width(&self) -> f32 {
        if self.columns == 0 {
            return LANE_LENGTH;
        }
        LANE_LENGTH / self.columns as f32
    }

    /// Height of a single lane in percentage space.
    #[must_use]
    pub fn row_height(&self) -> f32 {
        if self.rows == 0 {
            return LANE_LENGTH;
        }
        LANE_LENGTH / self.rows as f32
    }

    /// Reports whether the cell lies on the lawn.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Lane position of the left edge of a column.
    #[must_use]
    pub fn column_edge(&self, column: u32) -> f32 {
        column as f32 * self.column_width()
    }

    /// Column a lane position falls into, if it lies on the lawn.
    #[must_use]
    pub fn column_at(&self, position: f32) -> Option<u32> {
        let column = (position / self.column_width()).floor();
        if column < 0.0 || column >= self.columns as f32 {
            return None;
        }
        Some(column as u32)
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Lawn Defense adapters.
//!
//! A [`Scene`] is derived purely from a [`LawnView`] snapshot; backends only
//! draw it and report player input back as [`FrameInput`].

use anyhow::Result as AnyResult;
use glam::Vec2;
use lawn_defense_core::{
    CellCoord, GameStatus, LawnView, PlantId, PlantKind, PlayerIntent, ProjectileId, SunId,
    SunPosition, ZombieId, ZombieKind, LANE_LENGTH,
};
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input gathered by adapters for a single frame.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Player intents captured since the previous frame, in arrival order.
    pub intents: Vec<PlayerIntent>,
    /// Whether the player asked for a tip on this frame.
    pub request_advice: bool,
    /// Whether the player dismissed the current tip on this frame.
    pub dismiss_advice: bool,
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum RenderingError {
    /// Cells must have a positive size on both axes.
    #[error("cell size must be positive (received {width}x{height})")]
    InvalidCellSize {
        /// Provided cell width.
        width: f32,
        /// Provided cell height.
        height: f32,
    },
}

/// Maps lawn coordinates to screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LawnLayout {
    origin: Vec2,
    cell_size: Vec2,
    rows: u32,
    columns: u32,
}

impl LawnLayout {
    /// Creates a layout for a lawn of `rows` by `columns` cells drawn at
    /// `cell_size`, with the top-left corner at `origin`.
    pub fn new(
        origin: Vec2,
        cell_size: Vec2,
        rows: u32,
        columns: u32,
    ) -> Result<Self, RenderingError> {
        if !(cell_size.x > 0.0 && cell_size.y > 0.0) {
            return Err(RenderingError::InvalidCellSize {
                width: cell_size.x,
                height: cell_size.y,
            });
        }

        Ok(Self {
            origin,
            cell_size,
            rows,
            columns,
        })
    }

    /// Size of the whole lawn.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.cell_size * Vec2::new(self.columns as f32, self.rows as f32)
    }

    /// Centre of the provided cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.origin
            + self.cell_size
                * Vec2::new(cell.column() as f32 + 0.5, cell.row() as f32 + 0.5)
    }

    /// Screen position of a point `position` units along `lane`.
    #[must_use]
    pub fn lane_point(&self, lane: u32, position: f32) -> Vec2 {
        let x = position / LANE_LENGTH * self.size().x;
        let y = (lane as f32 + 0.5) * self.cell_size.y;
        self.origin + Vec2::new(x, y)
    }

    /// Screen position of a sun expressed in percentage space.
    #[must_use]
    pub fn sun_point(&self, position: SunPosition) -> Vec2 {
        self.origin + Vec2::new(position.x, position.y) / LANE_LENGTH * self.size()
    }

    /// Cell under the provided screen point, if it lies on the lawn.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        let local = (point - self.origin) / self.cell_size;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let column = local.x.floor() as u32;
        let row = local.y.floor() as u32;
        (row < self.rows && column < self.columns).then(|| CellCoord::new(row, column))
    }
}

/// Presentation data for a single plant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantPresentation {
    /// Identifier of the plant.
    pub id: PlantId,
    /// Kind of the plant.
    pub kind: PlantKind,
    /// Cell occupied by the plant.
    pub cell: CellCoord,
    /// Screen position of the plant.
    pub center: Vec2,
    /// Remaining health as a fraction of the starting health.
    pub health_fraction: f32,
    /// Glyph used by text backends.
    pub glyph: char,
    /// Fill color.
    pub color: Color,
}

/// Presentation data for a single zombie.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombiePresentation {
    /// Identifier of the zombie.
    pub id: ZombieId,
    /// Kind of the zombie.
    pub kind: ZombieKind,
    /// Lane the zombie walks along.
    pub lane: u32,
    /// Screen position of the zombie.
    pub center: Vec2,
    /// Remaining health as a fraction of the starting health.
    pub health_fraction: f32,
    /// Whether the zombie is eating.
    pub eating: bool,
    /// Whether the zombie is slowed by frost.
    pub frozen: bool,
    /// Glyph used by text backends.
    pub glyph: char,
    /// Fill color, lightened while frozen.
    pub color: Color,
}

/// Presentation data for a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Lane the projectile travels along.
    pub lane: u32,
    /// Screen position of the projectile.
    pub center: Vec2,
    /// Whether the projectile freezes on impact.
    pub freezes: bool,
}

/// Presentation data for an uncollected sun.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunPresentation {
    /// Identifier used to collect the sun.
    pub id: SunId,
    /// Screen position of the sun.
    pub center: Vec2,
    /// Sun granted when collected.
    pub value: u32,
}

/// Adapter-side overlay shown next to the lawn.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Hud {
    /// Transient message, if one is visible.
    pub message: Option<String>,
    /// Latest advice text.
    pub advice: Option<String>,
    /// Seed packet currently selected.
    pub selected: Option<PlantKind>,
}

/// Scene description derived from a single lawn snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Layout used to position every entity.
    pub layout: LawnLayout,
    /// Lawn rows.
    pub rows: u32,
    /// Lawn columns.
    pub columns: u32,
    /// Session status.
    pub status: GameStatus,
    /// Sun available to spend.
    pub sun: u32,
    /// Level progress in percent.
    pub progress: f32,
    /// Plants in identifier order.
    pub plants: Vec<PlantPresentation>,
    /// Zombies in identifier order.
    pub zombies: Vec<ZombiePresentation>,
    /// Projectiles in identifier order.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Suns in identifier order.
    pub suns: Vec<SunPresentation>,
    /// Overlay text and selection.
    pub hud: Hud,
}

impl Scene {
    /// Derives a scene from the lawn view.
    #[must_use]
    pub fn from_view(view: &LawnView, layout: &LawnLayout, hud: Hud) -> Self {
        let plants = view
            .plants
            .iter()
            .map(|plant| PlantPresentation {
                id: plant.id,
                kind: plant.kind,
                cell: plant.cell,
                center: layout.cell_center(plant.cell),
                health_fraction: fraction(plant.health, plant.max_health),
                glyph: plant_glyph(plant.kind),
                color: plant_color(plant.kind),
            })
            .collect();

        let zombies = view
            .zombies
            .iter()
            .map(|zombie| {
                let color = zombie_color(zombie.kind);
                ZombiePresentation {
                    id: zombie.id,
                    kind: zombie.kind,
                    lane: zombie.lane,
                    center: layout.lane_point(zombie.lane, zombie.position),
                    health_fraction: fraction(zombie.health, zombie.max_health),
                    eating: zombie.eating,
                    frozen: zombie.frozen,
                    glyph: zombie_glyph(zombie.kind),
                    color: if zombie.frozen { color.lighten(0.5) } else { color },
                }
            })
            .collect();

        let projectiles = view
            .projectiles
            .iter()
            .map(|projectile| ProjectilePresentation {
                id: projectile.id,
                lane: projectile.lane,
                center: layout.lane_point(projectile.lane, projectile.position),
                freezes: projectile.freezes,
            })
            .collect();

        let suns = view
            .suns
            .iter()
            .map(|sun| SunPresentation {
                id: sun.id,
                center: layout.sun_point(sun.position),
                value: sun.value,
            })
            .collect();

        Self {
            layout: *layout,
            rows: view.rows,
            columns: view.columns,
            status: view.status,
            sun: view.sun,
            progress: view.progress,
            plants,
            zombies,
            projectiles,
            suns,
            hud,
        }
    }
}

fn fraction(health: f32, max_health: f32) -> f32 {
    if max_health <= 0.0 {
        return 0.0;
    }
    (health / max_health).clamp(0.0, 1.0)
}

/// Glyph used to draw a plant in text backends.
#[must_use]
pub const fn plant_glyph(kind: PlantKind) -> char {
    match kind {
        PlantKind::Peashooter => 'P',
        PlantKind::Sunflower => 'S',
        PlantKind::WallNut => 'W',
        PlantKind::CherryBomb => 'C',
        PlantKind::SnowPea => 'F',
        PlantKind::Repeater => 'R',
    }
}

/// Glyph used to draw a zombie in text backends.
#[must_use]
pub const fn zombie_glyph(kind: ZombieKind) -> char {
    match kind {
        ZombieKind::Normal => 'z',
        ZombieKind::Conehead => 'c',
        ZombieKind::Buckethead => 'b',
    }
}

const fn plant_color(kind: PlantKind) -> Color {
    match kind {
        PlantKind::Peashooter => Color::from_rgb_u8(76, 175, 80),
        PlantKind::Sunflower => Color::from_rgb_u8(253, 216, 53),
        PlantKind::WallNut => Color::from_rgb_u8(141, 110, 99),
        PlantKind::CherryBomb => Color::from_rgb_u8(229, 57, 53),
        PlantKind::SnowPea => Color::from_rgb_u8(79, 195, 247),
        PlantKind::Repeater => Color::from_rgb_u8(46, 125, 50),
    }
}

const fn zombie_color(kind: ZombieKind) -> Color {
    match kind {
        ZombieKind::Normal => Color::from_rgb_u8(120, 144, 156),
        ZombieKind::Conehead => Color::from_rgb_u8(255, 152, 0),
        ZombieKind::Buckethead => Color::from_rgb_u8(158, 158, 158),
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Lawn Defense scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and replaces the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

#[cfg(test)]
mod tests {
    use lawn_defense_core::{PlantSnapshot, SunSnapshot, ZombieSnapshot};

    use super::*;

    fn layout() -> LawnLayout {
        LawnLayout::new(Vec2::new(10.0, 20.0), Vec2::new(8.0, 4.0), 5, 9).expect("valid layout")
    }

    fn view() -> LawnView {
        LawnView {
            status: GameStatus::Playing,
            sun: 125,
            progress: 42.5,
            rows: 5,
            columns: 9,
            plants: vec![PlantSnapshot {
                id: PlantId::new(0),
                kind: PlantKind::WallNut,
                cell: CellCoord::new(1, 2),
                health: 200.0,
                max_health: 800.0,
                last_action: Duration::ZERO,
            }],
            zombies: vec![ZombieSnapshot {
                id: ZombieId::new(3),
                kind: ZombieKind::Conehead,
                lane: 4,
                position: 100.0,
                health: 500.0,
                max_health: 500.0,
                eating: false,
                frozen: true,
                freeze_remaining: Duration::from_millis(800),
            }],
            projectiles: Vec::new(),
            suns: vec![SunSnapshot {
                id: SunId::new(1),
                position: SunPosition::new(50.0, 50.0),
                value: 25,
                created_at: Duration::from_secs(4),
            }],
        }
    }

    #[test]
    fn layout_rejects_degenerate_cells() {
        let error = LawnLayout::new(Vec2::ZERO, Vec2::new(0.0, 4.0), 5, 9)
            .expect_err("zero width must be rejected");

        assert!(matches!(error, RenderingError::InvalidCellSize { .. }));
    }

    #[test]
    fn cell_lookup_respects_lawn_bounds() {
        let layout = layout();

        assert_eq!(
            layout.cell_at(Vec2::new(10.0 + 8.0 * 2.5, 20.0 + 4.0 * 1.5)),
            Some(CellCoord::new(1, 2))
        );
        assert_eq!(layout.cell_at(Vec2::new(9.0, 25.0)), None);
        assert_eq!(layout.cell_at(Vec2::new(10.0 + 72.0, 25.0)), None);
        assert_eq!(layout.cell_at(Vec2::new(11.0, 20.0 + 20.0)), None);
    }

    #[test]
    fn scene_positions_entities_on_the_lawn() {
        let layout = layout();
        let scene = Scene::from_view(&view(), &layout, Hud::default());

        let plant = scene.plants[0];
        assert_eq!(plant.center, Vec2::new(10.0 + 20.0, 20.0 + 6.0));
        assert_eq!(plant.health_fraction, 0.25);
        assert_eq!(plant.glyph, 'W');

        let zombie = scene.zombies[0];
        assert_eq!(zombie.center, Vec2::new(10.0 + 72.0, 20.0 + 18.0));
        assert!(zombie.frozen);
        assert_ne!(zombie.color, zombie_color(ZombieKind::Conehead));

        assert_eq!(scene.suns[0].center, Vec2::new(10.0 + 36.0, 20.0 + 10.0));
    }

    #[test]
    fn scene_carries_session_state_and_hud() {
        let hud = Hud {
            message: Some("Not enough sun!".to_owned()),
            advice: None,
            selected: Some(PlantKind::Repeater),
        };
        let scene = Scene::from_view(&view(), &layout(), hud.clone());

        assert_eq!(scene.status, GameStatus::Playing);
        assert_eq!(scene.sun, 125);
        assert_eq!(scene.progress, 42.5);
        assert_eq!(scene.hud, hud);
    }

    #[test]
    fn glyphs_are_distinct() {
        let mut glyphs: Vec<char> = PlantKind::ALL.iter().map(|kind| plant_glyph(*kind)).collect();
        glyphs.extend(ZombieKind::ALL.iter().map(|kind| zombie_glyph(*kind)));
        let count = glyphs.len();
        glyphs.sort_unstable();
        glyphs.dedup();

        assert_eq!(glyphs.len(), count);
    }
}

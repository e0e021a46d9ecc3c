//! Text backend that prints the lawn to stdout and reads commands from stdin.

use std::{
    io::{self, Write},
    sync::mpsc::{self, TryRecvError},
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use glam::Vec2;
use lawn_defense_core::{GameStatus, PlantKind, PlayerIntent, ZombieKind};
use lawn_defense_rendering::{FrameInput, Presentation, RenderingBackend, Scene};
use tracing::warn;

use crate::input::{self, InputLine, USAGE};

/// Width and height of a lawn cell in characters.
pub(crate) const CELL_SIZE: Vec2 = Vec2::new(3.0, 1.0);

/// Frames between two unprompted redraws.
const REDRAW_EVERY: u64 = 10;

/// Rendering backend that draws scenes as text, one frame per tick.
#[derive(Debug)]
pub(crate) struct TerminalBackend {
    frame_interval: Duration,
    max_frames: Option<u64>,
    lines: mpsc::Receiver<String>,
}

impl TerminalBackend {
    pub(crate) fn new(frame_interval: Duration, lines: mpsc::Receiver<String>) -> Self {
        Self {
            frame_interval,
            max_frames: None,
            lines,
        }
    }

    pub(crate) fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }
}

impl RenderingBackend for TerminalBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation { title, mut scene } = presentation;
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{title}\n{USAGE}\n{}", catalog()).context("failed to write to stdout")?;
        write!(out, "{}", draw(&scene)).context("failed to write to stdout")?;

        let mut input_open = true;
        let mut frame = 0_u64;
        let mut last_frame = Instant::now();
        loop {
            if self.max_frames.is_some_and(|limit| frame >= limit) {
                break;
            }

            let (input, quit) = collect_input(&self.lines, &scene, &mut input_open);
            if quit {
                break;
            }
            let interacted =
                !input.intents.is_empty() || input.request_advice || input.dismiss_advice;

            let now = Instant::now();
            let dt = now.duration_since(last_frame);
            last_frame = now;

            let before = (scene.status, scene.hud.clone());
            update_scene(dt, input, &mut scene);
            frame += 1;

            let changed = before != (scene.status, scene.hud.clone());
            if interacted || changed || frame % REDRAW_EVERY == 0 {
                write!(out, "{}", draw(&scene)).context("failed to write to stdout")?;
                out.flush().context("failed to flush stdout")?;
            }

            if !input_open && scene.status != GameStatus::Playing {
                break;
            }
            thread::sleep(self.frame_interval);
        }

        Ok(())
    }
}

/// Drains pending stdin lines into a frame input. Returns whether the player
/// asked to quit.
fn collect_input(
    lines: &mpsc::Receiver<String>,
    scene: &Scene,
    open: &mut bool,
) -> (FrameInput, bool) {
    let mut input = FrameInput::default();
    loop {
        let line = match lines.try_recv() {
            Ok(line) => line,
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                *open = false;
                break;
            }
        };

        match input::parse_line(&line) {
            Ok(InputLine::Intent(intent)) => input.intents.push(intent),
            Ok(InputLine::CollectAll) => input
                .intents
                .extend(scene.suns.iter().map(|sun| PlayerIntent::CollectSun(sun.id))),
            Ok(InputLine::Advice) => input.request_advice = true,
            Ok(InputLine::Dismiss) => input.dismiss_advice = true,
            Ok(InputLine::Quit) => return (input, true),
            Ok(InputLine::Blank) => {}
            Err(error) => {
                warn!(%error, "ignored input line");
                eprintln!("{error}\n{USAGE}");
            }
        }
    }
    (input, false)
}

/// Formats the scene as text.
pub(crate) fn draw(scene: &Scene) -> String {
    let width = (scene.columns as usize) * CELL_SIZE.x as usize;
    let mut grid = vec![vec!['.'; width]; scene.rows as usize];
    let put = |grid: &mut Vec<Vec<char>>, point: Vec2, glyph: char| {
        let row = point.y.floor().max(0.0) as usize;
        let column = (point.x.floor().max(0.0) as usize).min(width.saturating_sub(1));
        if let Some(line) = grid.get_mut(row) {
            if let Some(cell) = line.get_mut(column) {
                *cell = glyph;
            }
        }
    };

    for plant in &scene.plants {
        put(&mut grid, plant.center, plant.glyph);
    }
    for projectile in &scene.projectiles {
        put(
            &mut grid,
            projectile.center,
            if projectile.freezes { '*' } else { 'o' },
        );
    }
    for zombie in &scene.zombies {
        let glyph = if zombie.frozen {
            zombie.glyph.to_ascii_uppercase()
        } else {
            zombie.glyph
        };
        put(&mut grid, zombie.center, glyph);
    }

    let mut text = String::new();
    text.push_str(&format!(
        "\n[{}] sun {} | progress {:.0}%",
        status_label(scene.status),
        scene.sun,
        scene.progress
    ));
    if let Some(kind) = scene.hud.selected {
        text.push_str(&format!(" | selected {kind}"));
    }
    text.push('\n');
    for (row, line) in grid.iter().enumerate() {
        text.push_str(&format!("{row} |{}|\n", line.iter().collect::<String>()));
    }
    if !scene.suns.is_empty() {
        let suns: Vec<String> = scene
            .suns
            .iter()
            .map(|sun| format!("#{} ({})", sun.id.get(), sun.value))
            .collect();
        text.push_str(&format!("suns: {}\n", suns.join(" ")));
    }
    if let Some(message) = &scene.hud.message {
        text.push_str(&format!(">> {message}\n"));
    }
    if let Some(advice) = &scene.hud.advice {
        text.push_str(&format!("advice: {advice}\n"));
    }
    text
}

/// Lists every seed packet and zombie with its description.
fn catalog() -> String {
    let mut text = String::from("seeds:\n");
    for kind in PlantKind::ALL {
        text.push_str(&format!(
            "  {} ({} sun): {}\n",
            kind.name(),
            kind.cost(),
            kind.description()
        ));
    }
    text.push_str("zombies:\n");
    for kind in ZombieKind::ALL {
        text.push_str(&format!("  {}: {}\n", kind.name(), kind.description()));
    }
    text
}

fn status_label(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Menu => "MENU - type `start`",
        GameStatus::Playing => "PLAYING",
        GameStatus::Paused => "PAUSED",
        GameStatus::GameOver => "GAME OVER",
        GameStatus::Victory => "VICTORY",
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lawn_defense_core::{
        CellCoord, LawnView, PlantId, PlantSnapshot, SunId, SunPosition, SunSnapshot, ZombieId,
        ZombieSnapshot,
    };
    use lawn_defense_rendering::{Hud, LawnLayout};

    use super::*;

    fn scene() -> Scene {
        let view = LawnView {
            status: GameStatus::Playing,
            sun: 75,
            progress: 10.0,
            rows: 2,
            columns: 3,
            plants: vec![PlantSnapshot {
                id: PlantId::new(0),
                kind: PlantKind::Sunflower,
                cell: CellCoord::new(1, 0),
                health: 300.0,
                max_health: 300.0,
                last_action: Duration::ZERO,
            }],
            zombies: vec![ZombieSnapshot {
                id: ZombieId::new(0),
                kind: ZombieKind::Normal,
                lane: 0,
                position: 100.0,
                health: 200.0,
                max_health: 200.0,
                eating: false,
                frozen: false,
                freeze_remaining: Duration::ZERO,
            }],
            projectiles: Vec::new(),
            suns: vec![SunSnapshot {
                id: SunId::new(4),
                position: SunPosition::new(20.0, 30.0),
                value: 25,
                created_at: Duration::ZERO,
            }],
        };
        let layout = LawnLayout::new(Vec2::ZERO, CELL_SIZE, 2, 3).expect("valid layout");
        Scene::from_view(
            &view,
            &layout,
            Hud {
                message: Some("Not enough sun!".to_owned()),
                advice: None,
                selected: Some(PlantKind::Peashooter),
            },
        )
    }

    #[test]
    fn draws_grid_entities_and_hud() {
        let text = draw(&scene());

        assert!(text.contains("[PLAYING] sun 75 | progress 10% | selected Peashooter"));
        assert!(text.contains("0 |........z|"));
        assert!(text.contains("1 |.S.......|"));
        assert!(text.contains("suns: #4 (25)"));
        assert!(text.contains(">> Not enough sun!"));
    }

    #[test]
    fn catalog_describes_every_seed_and_zombie() {
        let text = catalog();

        assert!(text.contains("  Snow Pea (175 sun): Shoots frozen peas that slow zombies\n"));
        assert!(text.contains("  Cherry Bomb (150 sun): "));
        assert!(text.contains("  Buckethead: Hides under a bucket"));
        assert_eq!(text.lines().count(), 2 + PlantKind::ALL.len() + ZombieKind::ALL.len());
    }

    #[test]
    fn collect_all_expands_to_every_visible_sun() {
        let (sender, receiver) = mpsc::channel();
        sender.send("collect all".to_owned()).expect("receiver alive");
        sender.send("quit".to_owned()).expect("receiver alive");
        let mut open = true;

        let (input, quit) = collect_input(&receiver, &scene(), &mut open);

        assert!(quit);
        assert!(open);
        assert_eq!(input.intents, vec![PlayerIntent::CollectSun(SunId::new(4))]);
    }

    #[test]
    fn disconnected_input_is_reported() {
        let (sender, receiver) = mpsc::channel::<String>();
        drop(sender);
        let mut open = true;

        let (input, quit) = collect_input(&receiver, &scene(), &mut open);

        assert!(!quit);
        assert!(!open);
        assert_eq!(input, FrameInput::default());
    }
}

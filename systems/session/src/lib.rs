#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure session system that turns player intents into world commands.
//!
//! The system remembers which seed packet is selected and keeps a single
//! transient message for the HUD. It never mutates the world; every change is
//! expressed as a [`Command`] for the world to apply.

use std::time::Duration;

use lawn_defense_core::{
    Command, Event, PlacementError, PlantKind, PlayerIntent, WELCOME_MESSAGE,
};
use tracing::debug;

/// Message shown when the player cannot afford the selected plant.
pub const INSUFFICIENT_SUN_MESSAGE: &str = "Not enough sun!";

const INSUFFICIENT_SUN_DURATION: Duration = Duration::from_millis(2_000);
const WELCOME_DURATION: Duration = Duration::from_millis(3_000);

/// Transient message displayed for a limited amount of simulated time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Message {
    text: &'static str,
    remaining: Duration,
}

impl Message {
    /// Creates a message that stays visible for `duration`.
    #[must_use]
    pub const fn new(text: &'static str, duration: Duration) -> Self {
        Self {
            text,
            remaining: duration,
        }
    }

    /// Text of the message.
    #[must_use]
    pub const fn text(&self) -> &'static str {
        self.text
    }

    /// Simulated time left before the message disappears.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }
}

/// Session system tracking plant selection and transient messages.
#[derive(Clone, Debug, Default)]
pub struct Session {
    selected: Option<PlantKind>,
    message: Option<Message>,
}

impl Session {
    /// Creates a session system with nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selected: None,
            message: None,
        }
    }

    /// Consumes world events and player intents, emitting world commands.
    pub fn handle(&mut self, events: &[Event], intents: &[PlayerIntent], out: &mut Vec<Command>) {
        for event in events {
            self.observe(event);
        }

        for intent in intents {
            match *intent {
                PlayerIntent::SelectPlant(kind) => {
                    debug!(?kind, "seed packet selected");
                    self.selected = Some(kind);
                }
                PlayerIntent::ClearSelection => self.selected = None,
                PlayerIntent::ClickCell(cell) => {
                    if let Some(kind) = self.selected {
                        out.push(Command::PlacePlant { kind, cell });
                    }
                }
                PlayerIntent::CollectSun(sun) => out.push(Command::CollectSun { sun }),
                PlayerIntent::TogglePause => out.push(Command::TogglePause),
                PlayerIntent::StartGame => out.push(Command::StartGame),
                PlayerIntent::ExitToMenu => out.push(Command::ExitToMenu),
            }
        }
    }

    /// Plant kind that the next cell click will place.
    #[must_use]
    pub const fn selected(&self) -> Option<PlantKind> {
        self.selected
    }

    /// Message currently visible, if any.
    #[must_use]
    pub const fn message(&self) -> Option<Message> {
        self.message
    }

    fn observe(&mut self, event: &Event) {
        match event {
            Event::SessionStarted => {
                self.selected = None;
                self.message = Some(Message::new(WELCOME_MESSAGE, WELCOME_DURATION));
            }
            Event::PlantPlaced { .. } => self.selected = None,
            Event::PlacementRejected {
                reason: PlacementError::InsufficientSun { .. },
                ..
            } => {
                self.message = Some(Message::new(
                    INSUFFICIENT_SUN_MESSAGE,
                    INSUFFICIENT_SUN_DURATION,
                ));
            }
            Event::TimeAdvanced { dt } => self.count_down(*dt),
            _ => {}
        }
    }

    fn count_down(&mut self, dt: Duration) {
        if let Some(message) = self.message.as_mut() {
            message.remaining = message.remaining.saturating_sub(dt);
            if message.remaining.is_zero() {
                self.message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lawn_defense_core::{CellCoord, SunId};

    use super::*;

    const TICK: Event = Event::TimeAdvanced {
        dt: Duration::from_millis(100),
    };

    #[test]
    fn click_without_selection_is_ignored() {
        let mut session = Session::new();
        let mut commands = Vec::new();

        session.handle(&[], &[PlayerIntent::ClickCell(CellCoord::new(0, 0))], &mut commands);

        assert!(commands.is_empty());
    }

    #[test]
    fn selection_survives_until_placement_succeeds() {
        let mut session = Session::new();
        let mut commands = Vec::new();
        let cell = CellCoord::new(1, 2);

        session.handle(
            &[],
            &[
                PlayerIntent::SelectPlant(PlantKind::SnowPea),
                PlayerIntent::ClickCell(cell),
            ],
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![Command::PlacePlant {
                kind: PlantKind::SnowPea,
                cell,
            }]
        );
        assert_eq!(session.selected(), Some(PlantKind::SnowPea));

        session.handle(
            &[Event::PlantPlaced {
                plant: lawn_defense_core::PlantId::new(0),
                kind: PlantKind::SnowPea,
                cell,
                cost: 175,
            }],
            &[],
            &mut commands,
        );
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn welcome_message_expires_after_three_seconds() {
        let mut session = Session::new();
        let mut commands = Vec::new();
        session.handle(&[Event::SessionStarted], &[], &mut commands);

        for _ in 0..29 {
            session.handle(&[TICK], &[], &mut commands);
        }
        assert_eq!(
            session.message().map(|message| message.text()),
            Some(WELCOME_MESSAGE)
        );

        session.handle(&[TICK], &[], &mut commands);
        assert_eq!(session.message(), None);
        assert!(commands.is_empty());
    }

    #[test]
    fn only_insufficient_sun_raises_a_message() {
        let mut session = Session::new();
        let mut commands = Vec::new();
        let rejected = |reason: PlacementError| Event::PlacementRejected {
            kind: PlantKind::Repeater,
            cell: CellCoord::new(0, 0),
            reason,
        };

        session.handle(&[rejected(PlacementError::Occupied)], &[], &mut commands);
        assert_eq!(session.message(), None);

        session.handle(
            &[rejected(PlacementError::InsufficientSun {
                required: 200,
                available: 50,
            })],
            &[],
            &mut commands,
        );
        let message = session.message().expect("message raised");
        assert_eq!(message.text(), INSUFFICIENT_SUN_MESSAGE);
        assert_eq!(message.remaining(), Duration::from_secs(2));
    }

    #[test]
    fn forwards_session_intents() {
        let mut session = Session::new();
        let mut commands = Vec::new();
        let sun = SunId::new(4);

        session.handle(
            &[],
            &[
                PlayerIntent::StartGame,
                PlayerIntent::CollectSun(sun),
                PlayerIntent::TogglePause,
                PlayerIntent::ExitToMenu,
            ],
            &mut commands,
        );

        assert_eq!(
            commands,
            vec![
                Command::StartGame,
                Command::CollectSun { sun },
                Command::TogglePause,
                Command::ExitToMenu,
            ]
        );
    }
}

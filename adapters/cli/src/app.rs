//! Per-frame glue between input, the session system, the world and advice.

use std::time::Duration;

use lawn_defense_advisory::{AdvisoryBridge, AdvisoryRequest};
use lawn_defense_core::{Command, Event, GameStatus, PlayerIntent, Rules};
use lawn_defense_rendering::{FrameInput, Hud, LawnLayout, Scene};
use lawn_defense_system_session::Session;
use lawn_defense_world::{self as world, query, World};
use tracing::debug;

/// Owns every piece of game state driven by the frame loop.
#[derive(Debug)]
pub(crate) struct Game {
    world: World,
    session: Session,
    bridge: AdvisoryBridge,
    layout: LawnLayout,
    tick: Duration,
    advice: Option<String>,
}

impl Game {
    pub(crate) fn new(rules: Rules, bridge: AdvisoryBridge, layout: LawnLayout) -> Self {
        Self {
            tick: rules.tick_interval(),
            world: World::with_rules(rules),
            session: Session::new(),
            bridge,
            layout,
            advice: None,
        }
    }

    /// Applies player input, advances the simulation by one tick while
    /// playing and refreshes the scene.
    pub(crate) fn frame(&mut self, input: FrameInput, scene: &mut Scene) {
        self.submit(&input.intents);

        if query::status(&self.world) == GameStatus::Playing {
            self.run(vec![Command::Tick { dt: self.tick }]);
        }

        if input.dismiss_advice {
            self.advice = None;
        }
        self.update_advice(input.request_advice);
        *scene = self.scene();
    }

    pub(crate) fn submit(&mut self, intents: &[PlayerIntent]) {
        let mut commands = Vec::new();
        self.session.handle(&[], intents, &mut commands);
        self.run(commands);
    }

    pub(crate) fn scene(&self) -> Scene {
        let hud = Hud {
            message: self
                .session
                .message()
                .map(|message| message.text().to_owned()),
            advice: self.advice.clone(),
            selected: self.session.selected(),
        };
        Scene::from_view(&query::lawn_view(&self.world), &self.layout, hud)
    }

    fn run(&mut self, commands: Vec<Command>) {
        if commands.is_empty() {
            return;
        }
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        if events.contains(&Event::SessionStarted) {
            self.advice = None;
        }
        let mut follow_up = Vec::new();
        self.session.handle(&events, &[], &mut follow_up);
        debug_assert!(follow_up.is_empty());
    }

    fn update_advice(&mut self, requested: bool) {
        if query::status(&self.world) != GameStatus::Playing {
            self.bridge.cancel();
            return;
        }

        if requested {
            let request = AdvisoryRequest::from_view(&query::lawn_view(&self.world));
            if !self.bridge.request(request) {
                debug!("advice request ignored while another is pending");
            }
        }
        if let Some(text) = self.bridge.poll() {
            self.advice = Some(text);
        }
    }
}

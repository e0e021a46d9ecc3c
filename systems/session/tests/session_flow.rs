use std::time::Duration;

use lawn_defense_core::{
    CellCoord, Command, Event, GameStatus, PlantKind, PlayerIntent, Rules, SunId, ZombieKind,
};
use lawn_defense_system_session::{Session, INSUFFICIENT_SUN_MESSAGE};
use lawn_defense_world::{self as world, query, scaffolding, World};

const TICK: Duration = Duration::from_millis(100);

struct Harness {
    world: World,
    session: Session,
}

impl Harness {
    fn new(rules: Rules) -> Self {
        let mut harness = Self {
            world: World::with_rules(rules),
            session: Session::new(),
        };
        let _ = harness.intents(&[PlayerIntent::StartGame]);
        harness
    }

    fn intents(&mut self, intents: &[PlayerIntent]) -> Vec<Event> {
        let mut commands = Vec::new();
        self.session.handle(&[], intents, &mut commands);
        self.run(commands)
    }

    fn tick(&mut self) -> Vec<Event> {
        self.run(vec![Command::Tick { dt: TICK }])
    }

    fn run(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        let mut follow_up = Vec::new();
        self.session.handle(&events, &[], &mut follow_up);
        assert!(follow_up.is_empty(), "events alone must not emit commands");
        events
    }
}

fn quiet_rules() -> Rules {
    Rules {
        zombie_spawn_interval_ms: 10_000_000,
        min_zombie_spawn_interval_ms: 10_000_000,
        sun_spawn_interval_ms: 10_000_000,
        ..Rules::default()
    }
}

#[test]
fn fresh_session_spends_and_rejects_unaffordable_plants() {
    let mut harness = Harness::new(Rules::default());
    assert_eq!(query::sun(&harness.world), 150);
    assert_eq!(query::status(&harness.world), GameStatus::Playing);

    let events = harness.intents(&[
        PlayerIntent::SelectPlant(PlantKind::Peashooter),
        PlayerIntent::ClickCell(CellCoord::new(2, 0)),
    ]);
    assert!(matches!(
        events.as_slice(),
        [Event::PlantPlaced {
            kind: PlantKind::Peashooter,
            cost: 100,
            ..
        }]
    ));
    assert_eq!(query::sun(&harness.world), 50);
    assert_eq!(harness.session.selected(), None);

    let events = harness.intents(&[
        PlayerIntent::SelectPlant(PlantKind::SnowPea),
        PlayerIntent::ClickCell(CellCoord::new(1, 1)),
    ]);
    assert!(matches!(
        events.as_slice(),
        [Event::PlacementRejected { .. }]
    ));
    assert_eq!(query::sun(&harness.world), 50);
    assert_eq!(query::plants(&harness.world).len(), 1);
    assert_eq!(
        harness.session.message().map(|message| message.text()),
        Some(INSUFFICIENT_SUN_MESSAGE)
    );
    assert_eq!(harness.session.selected(), Some(PlantKind::SnowPea));
}

#[test]
fn spending_down_to_exactly_zero_is_allowed() {
    let mut harness = Harness::new(quiet_rules());

    let _ = harness.intents(&[
        PlayerIntent::SelectPlant(PlantKind::Sunflower),
        PlayerIntent::ClickCell(CellCoord::new(0, 0)),
        PlayerIntent::SelectPlant(PlantKind::Peashooter),
        PlayerIntent::ClickCell(CellCoord::new(0, 1)),
    ]);

    assert_eq!(query::sun(&harness.world), 0);
    assert_eq!(query::plants(&harness.world).len(), 2);
    assert_eq!(
        harness.session.message().map(|m| m.text()),
        Some(lawn_defense_core::WELCOME_MESSAGE)
    );
}

#[test]
fn lone_zombie_walks_into_the_house() {
    let mut harness = Harness::new(quiet_rules());
    let zombie = scaffolding::spawn_zombie(&mut harness.world, ZombieKind::Normal, 2, 100.0);
    let speed = ZombieKind::Normal.stats().speed;

    let mut previous = 100.0_f32;
    let mut ticks = 0;
    loop {
        let was_inside = previous >= 0.0;
        let events = harness.tick();
        ticks += 1;

        let breached = events
            .iter()
            .any(|event| matches!(event, Event::HouseBreached { zombie: id } if *id == zombie));
        if breached {
            assert!(!was_inside, "breach reported before the zombie left the lawn");
            break;
        }

        let position = query::zombies(&harness.world)[0].position;
        assert!((previous - position - speed).abs() < 1e-3);
        previous = position;
        assert!(ticks < 400, "zombie never reached the house");
    }

    assert_eq!(query::status(&harness.world), GameStatus::GameOver);
    assert!(harness.tick().is_empty(), "finished sessions ignore ticks");
}

#[test]
fn victory_requires_an_empty_lawn() {
    let rules = Rules {
        level_duration_ms: 1_000,
        ..quiet_rules()
    };

    let mut harness = Harness::new(rules.clone());
    for _ in 0..11 {
        let _ = harness.tick();
    }
    assert_eq!(query::status(&harness.world), GameStatus::Victory);
    assert_eq!(query::progress(&harness.world), 100.0);

    let mut harness = Harness::new(rules);
    let _ = scaffolding::spawn_zombie(&mut harness.world, ZombieKind::Buckethead, 0, 100.0);
    for _ in 0..30 {
        let _ = harness.tick();
    }
    assert_eq!(query::status(&harness.world), GameStatus::Playing);
    assert_eq!(query::progress(&harness.world), 100.0);
}

#[test]
fn collecting_unknown_sun_changes_nothing() {
    let mut harness = Harness::new(quiet_rules());

    let events = harness.intents(&[PlayerIntent::CollectSun(SunId::new(999))]);

    assert!(events.is_empty());
    assert_eq!(query::sun(&harness.world), 150);
}

#[test]
fn pausing_freezes_the_clock_and_placement() {
    let mut harness = Harness::new(quiet_rules());
    let _ = harness.tick();
    let _ = harness.intents(&[PlayerIntent::TogglePause]);
    let clock = query::clock(&harness.world);

    assert!(harness.tick().is_empty());
    assert_eq!(query::clock(&harness.world), clock);

    let events = harness.intents(&[
        PlayerIntent::SelectPlant(PlantKind::WallNut),
        PlayerIntent::ClickCell(CellCoord::new(0, 0)),
    ]);
    assert!(matches!(
        events.as_slice(),
        [Event::PlacementRejected { .. }]
    ));
    assert_eq!(
        harness.session.message().map(|m| m.text()),
        Some(lawn_defense_core::WELCOME_MESSAGE)
    );
}

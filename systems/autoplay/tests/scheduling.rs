use std::time::Duration;

use wumpus_core::{
    CellKind::{self, Breeze as B, Empty as E, Gold as G, Pit as P, Stench as S, Wumpus as W},
    Command, Direction, Event, GameStatus, Position,
};
use wumpus_system_autoplay::{Autoplay, Config, PendingStep};
use wumpus_world::{self as world, query, Grid, World, WorldConfig};

const TICK: Duration = Duration::from_millis(100);

/// Quiet corridor along the top row that ends in gold.
const CORRIDOR: [[CellKind; 4]; 4] = [
    [E, E, E, G],
    [B, E, E, S],
    [P, B, S, W],
    [B, E, E, S],
];

struct Harness {
    world: World,
    autoplay: Autoplay,
}

impl Harness {
    fn new(rows: [[CellKind; 4]; 4]) -> Self {
        Self::with_config(rows, Config::default())
    }

    fn with_config(rows: [[CellKind; 4]; 4], config: Config) -> Self {
        let grid = Grid::from_rows(&rows).expect("square layout");
        Self {
            world: World::with_grid(WorldConfig::new(4, 0.2, 5), grid).expect("world"),
            autoplay: Autoplay::new(config),
        }
    }

    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut pending = vec![command];
        let mut observed = Vec::new();

        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            let mut commands = Vec::new();
            self.autoplay.handle(
                &events,
                query::board_view(&self.world),
                query::stamp(&self.world),
                &mut commands,
            );
            observed.extend(events);
            pending = commands;
        }

        observed
    }

    fn tick(&mut self, count: usize) -> Vec<Event> {
        let mut observed = Vec::new();
        for _ in 0..count {
            observed.extend(self.submit(Command::Tick { dt: TICK }));
        }
        observed
    }
}

fn moves(events: &[Event]) -> Vec<Position> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::PlayerMoved { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}

#[test]
fn waits_for_turn_delay_then_thinks_before_moving() {
    let mut harness = Harness::new(CORRIDOR);
    let events = harness.submit(Command::SetAutoplay { enabled: true });
    assert_eq!(events, vec![Event::AutoplayToggled { enabled: true }]);
    assert_eq!(harness.autoplay.pending_step(), Some(PendingStep::Turn));

    let events = harness.tick(14);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ThinkingChanged { .. })));
    assert!(!query::autoplay_thinking(&harness.world));

    let events = harness.tick(1);
    assert!(events.contains(&Event::ThinkingChanged { thinking: true }));
    assert!(query::autoplay_thinking(&harness.world));
    assert_eq!(query::player(&harness.world), Position::new(0, 0));

    let events = harness.tick(9);
    assert!(moves(&events).is_empty());
    assert!(query::autoplay_thinking(&harness.world));

    let events = harness.tick(1);
    assert_eq!(moves(&events), vec![Position::new(1, 0)]);
    assert!(!query::autoplay_thinking(&harness.world));
    assert_eq!(harness.autoplay.pending_step(), Some(PendingStep::Turn));
}

#[test]
fn plays_to_the_gold_and_stops() {
    let mut harness = Harness::new(CORRIDOR);
    let _ = harness.submit(Command::SetAutoplay { enabled: true });

    let mut ticks = 0;
    let mut observed = Vec::new();
    while query::status(&harness.world) == GameStatus::Playing && ticks < 200 {
        observed.extend(harness.tick(1));
        ticks += 1;
    }

    assert_eq!(ticks, 75, "three moves of 2.5 seconds each");
    assert_eq!(query::status(&harness.world), GameStatus::Won);
    assert_eq!(query::score(&harness.world), 997);
    assert_eq!(
        moves(&observed),
        vec![
            Position::new(1, 0),
            Position::new(2, 0),
            Position::new(3, 0)
        ]
    );
    assert_eq!(
        observed
            .iter()
            .filter(|event| **event == Event::ThinkingChanged { thinking: true })
            .count(),
        3
    );
    assert!(!query::autoplay_thinking(&harness.world));
    assert_eq!(harness.autoplay.pending_timers(), 0);

    let events = harness.tick(100);
    assert!(moves(&events).is_empty());
}

#[test]
fn one_large_step_commits_one_move() {
    let mut harness = Harness::new(CORRIDOR);
    let _ = harness.submit(Command::SetAutoplay { enabled: true });

    let events = harness.submit(Command::Tick {
        dt: Duration::from_millis(2500),
    });

    assert_eq!(moves(&events), vec![Position::new(1, 0)]);
    assert!(!query::autoplay_thinking(&harness.world));
    assert_eq!(harness.autoplay.pending_step(), Some(PendingStep::Turn));

    // The next turn counts from the committed move, not the end of the step.
    let events = harness.tick(14);
    assert!(!events.contains(&Event::ThinkingChanged { thinking: true }));
    let events = harness.tick(1);
    assert!(events.contains(&Event::ThinkingChanged { thinking: true }));
}

#[test]
fn several_cycles_in_one_step_commit_several_moves() {
    let mut harness = Harness::new(CORRIDOR);
    let _ = harness.submit(Command::SetAutoplay { enabled: true });

    let events = harness.submit(Command::Tick {
        dt: Duration::from_millis(2 * 2500),
    });
    assert_eq!(
        moves(&events),
        vec![Position::new(1, 0), Position::new(2, 0)]
    );
    assert_eq!(query::status(&harness.world), GameStatus::Playing);

    let events = harness.submit(Command::Tick {
        dt: Duration::from_secs(10),
    });
    assert_eq!(moves(&events), vec![Position::new(3, 0)]);
    assert_eq!(query::status(&harness.world), GameStatus::Won);
    assert_eq!(query::score(&harness.world), 997);
    assert_eq!(harness.autoplay.pending_timers(), 0);
}

#[test]
fn delays_off_the_tick_grid_do_not_drift() {
    let config = Config::new(Duration::from_millis(150), Duration::from_millis(150));
    let mut harness = Harness::with_config(CORRIDOR, config);
    let _ = harness.submit(Command::SetAutoplay { enabled: true });

    let events = harness.tick(8);
    assert_eq!(
        moves(&events),
        vec![Position::new(1, 0), Position::new(2, 0)]
    );

    let events = harness.tick(1);
    assert_eq!(moves(&events), vec![Position::new(3, 0)]);
    assert_eq!(query::status(&harness.world), GameStatus::Won);
}

#[test]
fn manual_move_supersedes_pending_decision() {
    let mut harness = Harness::new(CORRIDOR);
    let _ = harness.submit(Command::SetAutoplay { enabled: true });
    let _ = harness.tick(15);
    assert!(matches!(
        harness.autoplay.pending_step(),
        Some(PendingStep::Commit {
            direction: Direction::Right,
            ..
        })
    ));

    let events = harness.submit(Command::Move {
        direction: Direction::Down,
    });
    assert!(events.contains(&Event::ThinkingChanged { thinking: false }));
    assert!(!query::autoplay_thinking(&harness.world));
    assert_eq!(harness.autoplay.pending_step(), Some(PendingStep::Turn));
    assert_eq!(harness.autoplay.pending_timers(), 1);

    // The superseded decision would have landed here.
    let events = harness.tick(10);
    assert!(moves(&events).is_empty());
    assert_eq!(query::player(&harness.world), Position::new(0, 1));
    assert_eq!(query::score(&harness.world), -1);
}

#[test]
fn disabling_cancels_everything_pending() {
    let mut harness = Harness::new(CORRIDOR);
    let _ = harness.submit(Command::SetAutoplay { enabled: true });
    let _ = harness.tick(15);
    assert!(query::autoplay_thinking(&harness.world));

    let events = harness.submit(Command::SetAutoplay { enabled: false });

    assert_eq!(
        events,
        vec![
            Event::ThinkingChanged { thinking: false },
            Event::AutoplayToggled { enabled: false },
        ]
    );
    assert!(!harness.autoplay.is_enabled());
    assert_eq!(harness.autoplay.pending_timers(), 0);
    assert!(moves(&harness.tick(100)).is_empty());
    assert_eq!(query::player(&harness.world), Position::new(0, 0));
}

#[test]
fn reset_stops_the_loop() {
    let mut harness = Harness::new(CORRIDOR);
    let _ = harness.submit(Command::SetAutoplay { enabled: true });
    let _ = harness.tick(20);

    let events = harness.submit(Command::Reset);

    assert_eq!(events.last(), Some(&Event::GameReset));
    assert!(!query::autoplay_enabled(&harness.world));
    assert!(!query::autoplay_thinking(&harness.world));
    assert!(!harness.autoplay.is_enabled());
    assert_eq!(harness.autoplay.pending_timers(), 0);
    assert!(moves(&harness.tick(100)).is_empty());
}

#[test]
fn game_over_cancels_the_pending_turn() {
    let mut harness = Harness::new(CORRIDOR);
    let _ = harness.submit(Command::SetAutoplay { enabled: true });
    let _ = harness.tick(3);

    let _ = harness.submit(Command::Move {
        direction: Direction::Down,
    });
    let events = harness.submit(Command::Move {
        direction: Direction::Down,
    });

    assert_eq!(
        events.last(),
        Some(&Event::GameEnded {
            status: GameStatus::Lost
        })
    );
    assert_eq!(harness.autoplay.pending_timers(), 0);
    assert!(harness.tick(100).iter().all(|event| matches!(
        event,
        Event::TimeAdvanced { .. }
    )));
}

#[test]
fn shutdown_leaves_no_timers_behind() {
    let mut harness = Harness::new(CORRIDOR);
    let _ = harness.submit(Command::SetAutoplay { enabled: true });
    let _ = harness.tick(15);
    assert_eq!(harness.autoplay.pending_timers(), 1);

    harness.autoplay.shutdown();

    assert_eq!(harness.autoplay.pending_timers(), 0);
    assert_eq!(harness.autoplay.pending_step(), None);
    assert!(!harness.autoplay.is_enabled());
}

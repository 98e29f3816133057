use lair_defence_core::{
    AdventurerClass, AdventurerId, BattleState, Cell, CellCoord, Event, MonsterId, MonsterKind,
    TrapId, TrapKind,
};
use lair_defence_system_battle::{
    BattleContext, BattleOutcome, BattleSimulator, SimulationConfig, SimulationError,
};
use lair_defence_system_combatants::tables::{ClassProfile, TrapProfile};
use lair_defence_system_combatants::{Adventurer, MistakeModel, Monster, Trap};

const E: Cell = Cell::Entrance;
const P: Cell = Cell::Path;
const B: Cell = Cell::Boss;
const W: Cell = Cell::Empty;

fn careful() -> SimulationConfig {
    SimulationConfig {
        mistakes: MistakeModel::disabled(),
        ..SimulationConfig::default()
    }
}

fn warrior() -> Adventurer {
    Adventurer::new(AdventurerId::new(0), AdventurerClass::Warrior, 1, CellCoord::new(0, 0))
}

fn steady_warrior() -> Adventurer {
    let profile = ClassProfile {
        evasion: 0.0,
        last_stand: 0.0,
        ..ClassProfile::for_class(AdventurerClass::Warrior)
    };
    Adventurer::from_profile(
        AdventurerId::new(0),
        AdventurerClass::Warrior,
        1,
        CellCoord::new(0, 0),
        profile,
    )
}

fn moves(events: &[Event]) -> Vec<CellCoord> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::AdventurerMove { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}

#[test]
fn an_unopposed_adventurer_walks_straight_to_the_boss() {
    let context = BattleContext::from_rows(
        vec![vec![E, P, B]],
        Vec::new(),
        vec![warrior()],
        Vec::new(),
        Vec::new(),
    )
    .expect("valid battle");
    let mut simulator = BattleSimulator::seeded(context, careful(), 1);

    let outcome = simulator.run().expect("battle runs");

    assert!(matches!(outcome, BattleOutcome::Defeat(_)));
    assert_eq!(simulator.context().turn(), 2);
    let events = simulator.drain_events();
    assert!(matches!(events.first(), Some(Event::BattleStart { .. })));
    assert_eq!(moves(&events), vec![CellCoord::new(1, 0), CellCoord::new(2, 0)]);
    let completed: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::TurnComplete { turn, .. } => Some(*turn),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec![1]);
    assert!(events.last().is_some_and(Event::is_terminal));
}

#[test]
fn a_boss_next_to_the_entrance_falls_in_a_single_action() {
    let context = BattleContext::from_rows(
        vec![vec![E, B]],
        Vec::new(),
        vec![warrior()],
        Vec::new(),
        Vec::new(),
    )
    .expect("valid battle");
    let mut simulator = BattleSimulator::seeded(context, careful(), 1);

    let outcome = simulator.run().expect("battle runs");

    let BattleOutcome::Defeat(results) = &outcome else {
        panic!("expected a defeat, got {outcome:?}");
    };
    assert_eq!(results.stats.turns, 1);
    assert_eq!(results.adventurers_survived, 1);
    assert_eq!(simulator.context().state(), BattleState::Defeat);
    let events = simulator.drain_events();
    assert!(!events.iter().any(|event| matches!(event, Event::TurnComplete { .. })));
}

#[test]
fn a_slime_in_the_way_is_killed_before_the_boss_falls() {
    let slime = MonsterId::new(0);
    let context = BattleContext::from_rows(
        vec![vec![E, P, Cell::Monster(slime), P, B]],
        Vec::new(),
        vec![warrior()],
        vec![Monster::new(slime, MonsterKind::Slime, CellCoord::new(2, 0))],
        Vec::new(),
    )
    .expect("valid battle");
    let mut simulator = BattleSimulator::seeded(context, careful(), 5);

    let outcome = simulator.run().expect("battle runs");

    let BattleOutcome::Defeat(results) = &outcome else {
        panic!("expected a defeat, got {outcome:?}");
    };
    assert_eq!(results.stats.monsters_killed, 1);
    assert!(results.stats.damage_to_monsters >= 20);
    assert_eq!(simulator.context().grid().get_cell(CellCoord::new(2, 0)), Some(Cell::Path));
    let events = simulator.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        Event::CellUpdate { cell, content: Cell::Path } if *cell == CellCoord::new(2, 0)
    )));
}

#[test]
fn killing_the_slime_and_then_the_whole_party_is_a_victory() {
    let slime = MonsterId::new(0);
    let pit = TrapId::new(0);
    let lethal = TrapProfile {
        damage: 100_000,
        trigger_chance: 1.0,
        uses: 1,
        ..TrapProfile::for_kind(TrapKind::Spike)
    };
    let context = BattleContext::from_rows(
        vec![vec![E, Cell::Monster(slime), Cell::Trap(pit), B]],
        Vec::new(),
        vec![steady_warrior()],
        vec![Monster::new(slime, MonsterKind::Slime, CellCoord::new(1, 0))],
        vec![Trap::from_profile(pit, TrapKind::Spike, 1, CellCoord::new(2, 0), lethal)],
    )
    .expect("valid battle");
    let mut simulator = BattleSimulator::seeded(context, careful(), 9);

    let outcome = simulator.run().expect("battle runs");

    let BattleOutcome::Victory(results) = &outcome else {
        panic!("expected a victory, got {outcome:?}");
    };
    assert_eq!(results.stats.monsters_killed, 1);
    assert_eq!(results.stats.adventurers_killed, 1);
    assert_eq!(results.stats.traps_triggered, 1);
    assert_eq!(results.adventurers_survived, 0);
    let events = simulator.drain_events();
    assert!(events.iter().any(|event| matches!(event, Event::AdventurerDefeated { .. })));
    assert!(matches!(events.last(), Some(Event::Victory { .. })));
}

#[test]
fn a_snared_adventurer_sits_out_exactly_two_turns() {
    let snare = TrapId::new(0);
    let profile = TrapProfile {
        uses: 1,
        trigger_chance: 1.0,
        ..TrapProfile::for_kind(TrapKind::Snare)
    };
    let context = BattleContext::from_rows(
        vec![vec![E, P, Cell::Trap(snare), P, P, B]],
        Vec::new(),
        vec![warrior()],
        Vec::new(),
        vec![Trap::from_profile(snare, TrapKind::Snare, 1, CellCoord::new(2, 0), profile)],
    )
    .expect("valid battle");
    let mut simulator = BattleSimulator::seeded(context, careful(), 3);
    simulator.start_battle().expect("reachable boss");
    let _ = simulator.drain_events();

    let mut moved_on = Vec::new();
    loop {
        let outcome = simulator.step().expect("in progress");
        if !moves(&simulator.drain_events()).is_empty() {
            moved_on.push(simulator.context().turn());
        }
        if outcome.is_some() {
            break;
        }
    }

    assert_eq!(moved_on, vec![1, 2, 5, 6, 7]);
    assert_eq!(simulator.context().state(), BattleState::Defeat);
    assert!(simulator.context().trap(snare).is_none());
}

#[test]
fn a_walled_off_boss_refuses_to_start() {
    let context = BattleContext::from_rows(
        vec![vec![E, P, W, P, B]],
        Vec::new(),
        vec![warrior()],
        Vec::new(),
        Vec::new(),
    )
    .expect("valid battle");
    let mut simulator = BattleSimulator::seeded(context, careful(), 1);

    assert_eq!(simulator.start_battle().err(), Some(SimulationError::NoValidPath));
    assert_eq!(simulator.run().err(), Some(SimulationError::NoValidPath));
    assert_eq!(simulator.context().state(), BattleState::Preparation);
    let events = simulator.drain_events();
    assert!(!events.is_empty());
    assert!(events.iter().all(|event| matches!(event, Event::Error { turn: 0, .. })));
}

#[test]
fn holding_out_until_the_turn_limit_is_a_victory_without_the_full_bonus() {
    let context = BattleContext::from_rows(
        vec![vec![E, P, P, P, P, P, B]],
        Vec::new(),
        vec![warrior()],
        Vec::new(),
        Vec::new(),
    )
    .expect("valid battle");
    let config = SimulationConfig {
        max_turns: 3,
        ..careful()
    };
    let mut simulator = BattleSimulator::seeded(context, config, 1);

    let outcome = simulator.run().expect("battle runs");

    let BattleOutcome::Victory(results) = &outcome else {
        panic!("expected a victory, got {outcome:?}");
    };
    assert_eq!(results.stats.turns, 3);
    assert_eq!(results.adventurers_survived, 1);
    assert_eq!(results.gold_reward, 15);
}

#[test]
fn an_aborted_battle_stays_unresolved() {
    let context = BattleContext::from_rows(
        vec![vec![E, P, B]],
        Vec::new(),
        vec![warrior()],
        Vec::new(),
        Vec::new(),
    )
    .expect("valid battle");
    let mut simulator = BattleSimulator::seeded(context, careful(), 1);
    simulator.abort_handle().abort();

    let outcome = simulator.run().expect("battle runs");

    assert_eq!(outcome, BattleOutcome::Aborted { turn: 0 });
    assert_eq!(simulator.context().state(), BattleState::InProgress);
    assert!(simulator
        .drain_events()
        .iter()
        .all(|event| !event.is_terminal()));
}

use std::collections::{BTreeMap, BTreeSet};
use std::mem;

use lair_defence_core::{
    AdventurerId, AppliedEffect, BattleResults, BattleState, Cell, CellCoord, CombatantId,
    DamageKind, Event, MonsterId, TrapId, ZoneKind,
};
use lair_defence_system_combatants::{roll, Adventurer, DamageOutcome, Decision, Monster};
use lair_defence_system_pathfinding::PathFinder;
use lair_defence_system_rewards::{RewardCalculator, RewardInput};
use lair_defence_system_status_effects::TickReport;
use lair_defence_system_tactics::{DefensiveAction, PlannedTactic, Tactic, TacticalPlanner};
use lair_defence_world::query;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::{
    AbortHandle, BattleContext, NoPacing, PacingHook, Pause, Phase, SimulationConfig,
    SimulationError, TurnFault,
};

/// How a driven battle ended.
#[derive(Clone, Debug, PartialEq)]
pub enum BattleOutcome {
    /// The defenders held.
    Victory(BattleResults),
    /// An adventurer reached the boss.
    Defeat(BattleResults),
    /// The host stopped the battle before it resolved.
    Aborted {
        /// Turns resolved before the abort.
        turn: u32,
    },
}

impl BattleOutcome {
    /// Reward summary of a resolved battle.
    #[must_use]
    pub const fn results(&self) -> Option<&BattleResults> {
        match self {
            Self::Victory(results) | Self::Defeat(results) => Some(results),
            Self::Aborted { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verdict {
    Victory,
    Defeat,
}

impl Verdict {
    const fn state(self) -> BattleState {
        match self {
            Self::Victory => BattleState::Victory,
            Self::Defeat => BattleState::Defeat,
        }
    }
}

/// Drives a battle turn by turn and records what happened as [`Event`]s.
///
/// Each turn runs four phases in order: status effects tick, adventurers act
/// in roster order, monsters act in tactical execution order, and triggered
/// traps try to rearm. The simulator owns the [`BattleContext`]; hosts read
/// it through [`BattleSimulator::context`] and consume the event queue
/// through [`BattleSimulator::drain_events`].
pub struct BattleSimulator<R = ChaCha8Rng> {
    context: BattleContext,
    config: SimulationConfig,
    rng: R,
    finder: PathFinder,
    planner: TacticalPlanner,
    rewards: RewardCalculator,
    pacing: Box<dyn PacingHook>,
    abort: AbortHandle,
    events: Vec<Event>,
    log: Vec<String>,
    plans: Vec<PlannedTactic>,
    monster_ids: Vec<MonsterId>,
    blocked: BTreeSet<CombatantId>,
    slowed: BTreeMap<CombatantId, f64>,
}

impl BattleSimulator<ChaCha8Rng> {
    /// Creates a simulator whose randomness replays exactly from `seed`.
    #[must_use]
    pub fn seeded(context: BattleContext, config: SimulationConfig, seed: u64) -> Self {
        Self::new(context, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R> BattleSimulator<R>
where
    R: Rng,
{
    /// Creates a simulator drawing every random outcome from `rng`.
    #[must_use]
    pub fn new(context: BattleContext, config: SimulationConfig, rng: R) -> Self {
        Self {
            context,
            config,
            rng,
            finder: PathFinder::new(),
            planner: TacticalPlanner::new(),
            rewards: RewardCalculator::new(config.rewards),
            pacing: Box::new(NoPacing),
            abort: AbortHandle::new(),
            events: Vec::new(),
            log: Vec::new(),
            plans: Vec::new(),
            monster_ids: Vec::new(),
            blocked: BTreeSet::new(),
            slowed: BTreeMap::new(),
        }
    }

    /// Installs a presentation hook invoked after every phase and move.
    #[must_use]
    pub fn with_pacing<P>(mut self, hook: P) -> Self
    where
        P: PacingHook + 'static,
    {
        self.pacing = Box::new(hook);
        self
    }

    /// Handle through which the host can stop the battle between turns.
    #[must_use]
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Read-only view of the battle state.
    #[must_use]
    pub const fn context(&self) -> &BattleContext {
        &self.context
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Takes every event recorded since the previous call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        mem::take(&mut self.events)
    }

    /// Validates that the boss is reachable and opens the battle.
    pub fn start_battle(&mut self) -> Result<(), SimulationError> {
        if self.context.state != BattleState::Preparation {
            return Err(SimulationError::AlreadyStarted);
        }

        if !self.finder.has_valid_path(&self.context.grid) {
            let error = SimulationError::NoValidPath;
            warn!(%error, "battle refused");
            self.events.push(Event::Error {
                turn: 0,
                log: vec![String::from("The adventurers find no way to the boss.")],
                error: error.to_string(),
            });
            return Err(error);
        }

        let _ = self.context.transition(BattleState::InProgress);
        info!(
            adventurers = self.context.adventurers.len(),
            monsters = self.context.monsters.len(),
            traps = self.context.traps.len(),
            day = self.config.day,
            "battle started"
        );
        self.events.push(Event::BattleStart {
            adventurers: self.context.adventurers.iter().map(Adventurer::snapshot).collect(),
            monsters: self.context.monsters.values().map(Monster::snapshot).collect(),
        });
        Ok(())
    }

    /// Resolves one turn. Returns the outcome when the turn ended the battle.
    pub fn step(&mut self) -> Result<Option<BattleOutcome>, SimulationError> {
        if self.context.state != BattleState::InProgress {
            return Err(SimulationError::NotInProgress(self.context.state));
        }

        self.context.turn += 1;
        let turn = self.context.turn;
        self.context.stats.turns = turn;
        self.log.clear();
        self.blocked.clear();
        self.slowed.clear();

        let (resolved, faulted) = match self.play_turn() {
            Ok(resolved) => (resolved, false),
            Err(fault) => {
                warn!(turn, %fault, "turn fault");
                self.events.push(Event::Error {
                    turn,
                    log: mem::take(&mut self.log),
                    error: fault.to_string(),
                });
                (None, true)
            }
        };

        let verdict = resolved.or_else(|| self.verdict()).or_else(|| {
            (turn >= self.config.max_turns.max(1)).then(|| {
                self.log.push(format!("The lair holds out for {turn} turns."));
                Verdict::Victory
            })
        });

        match verdict {
            Some(verdict) => Ok(Some(self.finish(verdict))),
            None => {
                if !faulted {
                    self.events.push(Event::TurnComplete {
                        turn,
                        log: mem::take(&mut self.log),
                    });
                }
                Ok(None)
            }
        }
    }

    /// Starts the battle if needed and resolves turns until it ends or the
    /// host aborts it.
    pub fn run(&mut self) -> Result<BattleOutcome, SimulationError> {
        if self.context.state == BattleState::Preparation {
            self.start_battle()?;
        }

        loop {
            if self.abort.is_aborted() {
                info!(turn = self.context.turn, "battle aborted");
                return Ok(BattleOutcome::Aborted {
                    turn: self.context.turn,
                });
            }
            if let Some(outcome) = self.step()? {
                return Ok(outcome);
            }
        }
    }

    fn play_turn(&mut self) -> Result<Option<Verdict>, TurnFault> {
        self.status_phase();
        self.pacing.pause(Pause::AfterPhase(Phase::StatusTick));

        if let Some(verdict) = self.adventurer_phase()? {
            return Ok(Some(verdict));
        }
        self.pacing.pause(Pause::AfterPhase(Phase::Adventurers));

        self.monster_phase()?;
        self.pacing.pause(Pause::AfterPhase(Phase::Monsters));

        self.trap_phase();
        self.pacing.pause(Pause::AfterPhase(Phase::Traps));
        Ok(None)
    }

    fn verdict(&self) -> Option<Verdict> {
        let boss = self.context.grid.boss();
        let mut survivors = self.context.survivors().peekable();
        if survivors.peek().is_none() {
            return Some(Verdict::Victory);
        }
        survivors
            .any(|adventurer| adventurer.position() == boss)
            .then_some(Verdict::Defeat)
    }

    fn finish(&mut self, verdict: Verdict) -> BattleOutcome {
        let state = verdict.state();
        let _ = self.context.transition(state);
        let results = self.rewards.calculate(RewardInput {
            adventurers: &self.context.adventurers,
            outcome: state,
            stats: self.context.stats,
            structures: query::structures(&self.context.grid),
            day: self.config.day,
        });

        info!(
            outcome = ?state,
            turns = self.context.turn,
            gold = results.gold_reward,
            experience = results.experience_reward,
            survivors = results.adventurers_survived,
            "battle finished"
        );

        let log = mem::take(&mut self.log);
        match verdict {
            Verdict::Victory => {
                self.events.push(Event::Victory {
                    log,
                    results: results.clone(),
                });
                BattleOutcome::Victory(results)
            }
            Verdict::Defeat => {
                self.events.push(Event::Defeat {
                    log,
                    results: results.clone(),
                });
                BattleOutcome::Defeat(results)
            }
        }
    }

    fn status_phase(&mut self) {
        for index in 0..self.context.adventurers.len() {
            let adventurer = &mut self.context.adventurers[index];
            if adventurer.is_dead() {
                continue;
            }
            adventurer.tick_cooldowns();

            let id = CombatantId::Adventurer(adventurer.id());
            let report = self.context.effects.tick(id);
            note_report(&mut self.blocked, &mut self.slowed, id, &report);
            if report.damage == 0 {
                continue;
            }

            let lost = adventurer.lose_health(report.damage);
            self.context.stats.damage_to_adventurers += u64::from(lost);
            self.log.push(format!(
                "{} suffers {lost} damage from lingering effects.",
                adventurer_label(adventurer)
            ));
            if adventurer.is_dead() {
                self.adventurer_fell(index);
            }
        }

        self.monster_ids.clear();
        self.monster_ids.extend(self.context.monsters.keys().copied());
        for position in 0..self.monster_ids.len() {
            let monster_id = self.monster_ids[position];
            let Some(monster) = self.context.monsters.get_mut(&monster_id) else {
                continue;
            };

            let id = CombatantId::Monster(monster_id);
            let report = self.context.effects.tick(id);
            note_report(&mut self.blocked, &mut self.slowed, id, &report);
            if report.damage == 0 {
                continue;
            }

            let lost = monster.lose_health(report.damage);
            self.context.stats.damage_to_monsters += u64::from(lost);
            self.log.push(format!(
                "{} suffers {lost} damage from lingering effects.",
                monster_label(monster)
            ));
            if monster.is_dead() {
                self.slay_monster(monster_id);
            }
        }
    }

    fn adventurer_phase(&mut self) -> Result<Option<Verdict>, TurnFault> {
        for index in 0..self.context.adventurers.len() {
            let adventurer = &self.context.adventurers[index];
            if adventurer.is_dead() {
                continue;
            }
            if self.blocked.contains(&CombatantId::Adventurer(adventurer.id())) {
                self.log.push(format!("{} cannot act.", adventurer_label(adventurer)));
                continue;
            }
            if self.try_heal(index) {
                continue;
            }

            let context = &mut self.context;
            let decision = context.adventurers[index].decide_next_action(
                &context.grid,
                &mut self.finder,
                &self.config.mistakes,
                self.config.day,
                &mut self.rng,
            );

            match decision {
                Decision::Engage {
                    monster,
                    cell,
                    distance,
                } => self.engage(index, monster, cell, distance)?,
                Decision::Step { target, mistake } => {
                    if mistake {
                        self.context.stats.mistakes += 1;
                    }
                    if let Some(verdict) = self.advance(index, target)? {
                        return Ok(Some(verdict));
                    }
                }
                Decision::StandStill => {
                    self.context.stats.mistakes += 1;
                    self.log.push(format!(
                        "{} hesitates.",
                        adventurer_label(&self.context.adventurers[index])
                    ));
                }
                Decision::NoRoute => {
                    debug!(adventurer = index, "no route to the boss");
                    self.log.push(format!(
                        "{} finds no way forward.",
                        adventurer_label(&self.context.adventurers[index])
                    ));
                }
            }
        }
        Ok(None)
    }

    fn try_heal(&mut self, healer: usize) -> bool {
        let adventurers = &self.context.adventurers;
        let Some(heal) = adventurers[healer].profile().heal else {
            return false;
        };
        if !adventurers[healer].can_heal() {
            return false;
        }

        let origin = adventurers[healer].position();
        let patient = adventurers
            .iter()
            .enumerate()
            .filter(|(index, ally)| {
                *index != healer
                    && !ally.is_dead()
                    && ally.position().manhattan_distance(origin) <= heal.range
                    && ally.health_fraction() < heal.threshold
            })
            .min_by(|(_, left), (_, right)| {
                left.health_fraction().total_cmp(&right.health_fraction())
            })
            .map(|(index, _)| index);
        let Some(patient) = patient else {
            return false;
        };

        let amount = self.context.adventurers[healer].heal_amount();
        let restored = self.context.adventurers[patient].heal(amount);
        self.context.adventurers[healer].start_heal_cooldown();
        self.log.push(format!(
            "{} heals {} for {restored}.",
            adventurer_label(&self.context.adventurers[healer]),
            adventurer_label(&self.context.adventurers[patient])
        ));
        true
    }

    fn advance(&mut self, index: usize, target: CellCoord) -> Result<Option<Verdict>, TurnFault> {
        let id = CombatantId::Adventurer(self.context.adventurers[index].id());
        if let Some(&chance) = self.slowed.get(&id) {
            if roll(&mut self.rng, chance) {
                self.log.push(format!(
                    "{} is too slow to move.",
                    adventurer_label(&self.context.adventurers[index])
                ));
                return Ok(None);
            }
        }

        match self.context.grid.get_cell(target) {
            Some(Cell::Monster(monster)) => {
                self.engage(index, monster, target, 1)?;
                Ok(None)
            }
            Some(Cell::Boss) => {
                self.move_adventurer(index, target);
                self.log.push(format!(
                    "{} reaches the boss!",
                    adventurer_label(&self.context.adventurers[index])
                ));
                Ok(Some(Verdict::Defeat))
            }
            Some(Cell::Trap(trap)) => {
                self.move_adventurer(index, target);
                self.spring_trap(index, trap, target)?;
                Ok(None)
            }
            Some(Cell::Path | Cell::Entrance) => {
                self.move_adventurer(index, target);
                Ok(None)
            }
            Some(Cell::Empty) | None => {
                debug!(adventurer = index, %target, "step into a wall ignored");
                Ok(None)
            }
        }
    }

    fn move_adventurer(&mut self, index: usize, to: CellCoord) {
        let adventurer = &mut self.context.adventurers[index];
        let from = adventurer.position();
        adventurer.set_position(to);
        self.events.push(Event::AdventurerMove {
            adventurer: adventurer.snapshot(),
            from,
            to,
        });
        self.pacing.pause(Pause::AfterMove);
    }

    fn engage(
        &mut self,
        index: usize,
        monster_id: MonsterId,
        cell: CellCoord,
        distance: u32,
    ) -> Result<(), TurnFault> {
        let zone = self.zone_kind(cell);
        let context = &mut self.context;
        let adventurer = &context.adventurers[index];
        let monster = context
            .monsters
            .get_mut(&monster_id)
            .ok_or(TurnFault::MissingMonster {
                monster: monster_id,
                cell,
            })?;

        let attack = adventurer.attack(&mut self.rng);
        let hit = monster.take_damage(&mut self.rng, attack.damage, attack.kind, zone);
        context.stats.damage_to_monsters += u64::from(hit.damage);
        self.log.push(describe_hit(
            &adventurer_label(adventurer),
            &monster_label(monster),
            &hit,
            attack.is_critical,
        ));
        if !hit.evaded {
            for effect in &attack.effects {
                context.effects.apply(CombatantId::Monster(monster_id), *effect);
            }
        }

        if hit.is_dead {
            self.slay_monster(monster_id);
            return Ok(());
        }

        let held = self.blocked.contains(&CombatantId::Monster(monster_id));
        let Some(monster) = self.context.monsters.get_mut(&monster_id) else {
            return Ok(());
        };
        if held || !monster.can_attack() || monster.attack_range() < distance {
            return Ok(());
        }

        let label = monster_label(monster);
        let counter = monster.attack(&mut self.rng, zone);
        let _ = self.strike_adventurer(
            index,
            &label,
            counter.damage,
            counter.kind,
            &counter.effects,
        );
        Ok(())
    }

    fn strike_adventurer(
        &mut self,
        index: usize,
        source: &str,
        damage: u32,
        kind: DamageKind,
        effects: &[AppliedEffect],
    ) -> u32 {
        let adventurer = &mut self.context.adventurers[index];
        if adventurer.is_dead() {
            return 0;
        }

        let hit = adventurer.take_damage(&mut self.rng, damage, kind);
        self.context.stats.damage_to_adventurers += u64::from(hit.damage);
        self.log.push(describe_hit(source, &adventurer_label(adventurer), &hit, false));
        if !hit.evaded {
            let id = CombatantId::Adventurer(adventurer.id());
            for effect in effects {
                self.context.effects.apply(id, *effect);
            }
        }

        if hit.is_dead {
            self.adventurer_fell(index);
        }
        hit.damage
    }

    fn spring_trap(
        &mut self,
        index: usize,
        trap_id: TrapId,
        cell: CellCoord,
    ) -> Result<(), TurnFault> {
        let context = &mut self.context;
        let trap = context
            .traps
            .get_mut(&trap_id)
            .ok_or(TurnFault::MissingTrap { trap: trap_id, cell })?;
        let victim = &context.adventurers[index];
        let outcome = trap.trigger(&mut self.rng, victim);
        let label = format!("{} trap", trap.kind().name());
        let spent = trap.is_spent();

        if outcome.disarmed {
            context.stats.traps_disarmed += 1;
            self.log.push(format!("{} disarms the {label}.", adventurer_label(victim)));
        } else if outcome.triggered {
            context.stats.traps_triggered += 1;
            self.log.push(format!("{} springs the {label}!", adventurer_label(victim)));

            let id = CombatantId::Adventurer(victim.id());
            for effect in &outcome.effects {
                context.effects.apply(id, *effect);
            }

            let victims: Vec<usize> = if outcome.area_radius > 0 {
                context
                    .adventurers
                    .iter()
                    .enumerate()
                    .filter(|(_, adventurer)| {
                        !adventurer.is_dead()
                            && adventurer.position().manhattan_distance(cell) <= outcome.area_radius
                    })
                    .map(|(victim, _)| victim)
                    .collect()
            } else {
                vec![index]
            };

            let mut dealt = 0;
            for victim in victims {
                dealt += self.strike_adventurer(
                    victim,
                    &label,
                    outcome.damage,
                    outcome.damage_kind,
                    &[],
                );
            }
            if outcome.drain_radius > 0 && dealt > 0 {
                self.drain_into_monsters(cell, outcome.drain_radius, dealt / 2);
            }
        }

        if spent {
            let _ = self.context.traps.remove(&trap_id);
            if self.context.grid.set_cell(cell, Cell::Path) {
                self.events.push(Event::CellUpdate {
                    cell,
                    content: Cell::Path,
                });
            }
            self.log.push(format!("The {label} is spent."));
        }
        Ok(())
    }

    fn drain_into_monsters(&mut self, cell: CellCoord, radius: u32, amount: u32) {
        if amount == 0 {
            return;
        }
        for monster in self.context.monsters.values_mut() {
            if monster.position().manhattan_distance(cell) > radius {
                continue;
            }
            let restored = monster.heal(amount);
            if restored > 0 {
                self.log.push(format!("{} drinks {restored} stolen life.", monster_label(monster)));
            }
        }
    }

    fn monster_phase(&mut self) -> Result<(), TurnFault> {
        for monster in self.context.monsters.values_mut() {
            let held_back = match self.slowed.get(&CombatantId::Monster(monster.id())) {
                Some(&chance) => roll(&mut self.rng, chance),
                None => false,
            };
            monster.recover(held_back);
        }

        self.plans.clear();
        let blocked = &self.blocked;
        self.planner.plan(
            &self.context.grid,
            self.context
                .monsters
                .values()
                .filter(|monster| !blocked.contains(&CombatantId::Monster(monster.id()))),
            &self.context.adventurers,
            &mut self.plans,
        );

        for position in 0..self.plans.len() {
            let plan = self.plans[position].clone();
            self.execute(plan)?;
        }
        Ok(())
    }

    fn execute(&mut self, plan: PlannedTactic) -> Result<(), TurnFault> {
        let Some(position) = self.context.monsters.get(&plan.monster).map(Monster::position) else {
            return Ok(());
        };
        let zone = self.zone_kind(position);

        match plan.tactic {
            Tactic::Attack { target } => {
                let index = self.roster_index(target)?;
                let Some(monster) = self.context.monsters.get_mut(&plan.monster) else {
                    return Ok(());
                };
                let label = monster_label(monster);
                let attack = monster.attack(&mut self.rng, zone);
                let _ = self.strike_adventurer(
                    index,
                    &label,
                    attack.damage,
                    attack.kind,
                    &attack.effects,
                );
            }
            Tactic::AreaAttack { targets } => {
                let indices = targets
                    .iter()
                    .map(|target| self.roster_index(*target))
                    .collect::<Result<Vec<_>, _>>()?;
                let Some(monster) = self.context.monsters.get_mut(&plan.monster) else {
                    return Ok(());
                };
                let label = monster_label(monster);
                let hits = monster.area_attack(&mut self.rng, zone, indices.len());
                self.log.push(format!("{label} unleashes a sweeping attack!"));
                for (index, hit) in indices.into_iter().zip(hits) {
                    let _ =
                        self.strike_adventurer(index, &label, hit.damage, hit.kind, &hit.effects);
                }
            }
            Tactic::Defensive(action) => {
                let Some(monster) = self.context.monsters.get_mut(&plan.monster) else {
                    return Ok(());
                };
                match action {
                    DefensiveAction::Regenerate => {
                        let restored = monster.regenerate();
                        self.log.push(format!(
                            "{} regenerates {restored} health.",
                            monster_label(monster)
                        ));
                    }
                    DefensiveAction::Brace => {
                        monster.brace();
                        self.log.push(format!("{} braces for impact.", monster_label(monster)));
                    }
                }
            }
            Tactic::Summon { cell } => self.summon(plan.monster, cell),
            Tactic::Wait => {}
        }
        Ok(())
    }

    fn summon(&mut self, summoner: MonsterId, cell: CellCoord) {
        if self.context.grid.get_cell(cell) != Some(Cell::Path)
            || self.context.survivors().any(|adventurer| adventurer.position() == cell)
        {
            return;
        }
        let Some(minion) = self
            .context
            .monsters
            .get(&summoner)
            .and_then(|monster| monster.profile().summon)
            .map(|summon| summon.minion)
        else {
            return;
        };

        let Some(id) = self.context.allocate_monster_id() else {
            warn!(monster = summoner.get(), "no monster ids left to summon with");
            return;
        };
        if !self.context.grid.set_cell(cell, Cell::Monster(id)) {
            return;
        }
        let raised = Monster::new(id, minion, cell);
        let raised_label = monster_label(&raised);
        let _ = self.context.monsters.insert(id, raised);
        if let Some(monster) = self.context.monsters.get_mut(&summoner) {
            monster.record_summon();
            self.log.push(format!("{} raises {raised_label} at {cell}.", monster_label(monster)));
        }
        self.context.stats.monsters_summoned += 1;
        self.events.push(Event::CellUpdate {
            cell,
            content: Cell::Monster(id),
        });
    }

    fn trap_phase(&mut self) {
        for trap in self.context.traps.values_mut() {
            if trap.update(&mut self.rng) {
                self.log.push(format!(
                    "The {} trap at {} rearms.",
                    trap.kind().name(),
                    trap.position()
                ));
            }
        }
    }

    fn adventurer_fell(&mut self, index: usize) {
        let adventurer = &self.context.adventurers[index];
        self.context.effects.clear(CombatantId::Adventurer(adventurer.id()));
        self.context.stats.adventurers_killed += 1;
        self.log.push(format!("{} falls.", adventurer_label(adventurer)));
        debug!(adventurer = adventurer.id().get(), "adventurer defeated");
        self.events.push(Event::AdventurerDefeated {
            adventurer: adventurer.snapshot(),
        });
    }

    fn slay_monster(&mut self, id: MonsterId) {
        let Some(monster) = self.context.monsters.remove(&id) else {
            return;
        };
        self.context.effects.clear(CombatantId::Monster(id));
        self.context.stats.monsters_killed += 1;
        self.log.push(format!("{} is slain.", monster_label(&monster)));
        debug!(monster = id.get(), kind = monster.kind().name(), "monster defeated");

        let cell = monster.position();
        self.events.push(Event::MonsterDefeated {
            position: cell,
            monster: monster.snapshot(),
        });
        if self.context.grid.set_cell(cell, Cell::Path) {
            self.events.push(Event::CellUpdate {
                cell,
                content: Cell::Path,
            });
        }
    }

    fn roster_index(&self, id: AdventurerId) -> Result<usize, TurnFault> {
        self.context
            .adventurers
            .iter()
            .position(|adventurer| adventurer.id() == id)
            .ok_or(TurnFault::MissingAdventurer(id))
    }

    fn zone_kind(&self, cell: CellCoord) -> Option<ZoneKind> {
        self.context.grid.zone_at(cell).map(|zone| zone.kind())
    }
}

fn note_report(
    blocked: &mut BTreeSet<CombatantId>,
    slowed: &mut BTreeMap<CombatantId, f64>,
    id: CombatantId,
    report: &TickReport,
) {
    if report.blocked {
        let _ = blocked.insert(id);
    }
    if let Some(chance) = report.slowed {
        let _ = slowed.insert(id, chance);
    }
}

fn adventurer_label(adventurer: &Adventurer) -> String {
    format!("{} #{}", adventurer.class().name(), adventurer.id().get())
}

fn monster_label(monster: &Monster) -> String {
    format!("{} #{}", monster.kind().name(), monster.id().get())
}

fn describe_hit(attacker: &str, target: &str, hit: &DamageOutcome, critical: bool) -> String {
    if hit.evaded {
        return format!("{target} evades {attacker}.");
    }
    let critical = if critical { " (critical)" } else { "" };
    let survived = if hit.survived { ", but clings to life" } else { "" };
    format!("{attacker} hits {target} for {}{critical}{survived}.", hit.damage)
}

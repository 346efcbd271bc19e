//! Battle state machine
//!
//! ```text
//! PlayerChoice -> OpponentChoice -> Resolution -> PlayerChoice
//!                                             \-> Finished(outcome)
//! ```
//!
//! Drivers (blocking hosts, the headless runner, the GUI scene) feed choices
//! in and call [`Battle::resolve_turn`]; the battle itself never waits on
//! anything.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use super::creature::{Creature, Side, Skill, Trainer};
use super::damage::{BattleRules, DamageCalculator, DamageRoll};
use super::effectiveness::TypeChart;
use super::log::{BattleLog, BattleLogEventType};
use super::turn_order::{resolve_turn_order, RandomSource, TurnAction};

/// How a battle ended, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    Win,
    Loss,
    Draw,
    Quit,
}

impl BattleOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            BattleOutcome::Win => "You won the battle!",
            BattleOutcome::Loss => "You lost the battle...",
            BattleOutcome::Draw => "The battle ended in a draw.",
            BattleOutcome::Quit => "The battle was abandoned.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    PlayerChoice,
    OpponentChoice,
    Resolution,
    Finished(BattleOutcome),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BattleError {
    /// An operation was attempted in the wrong phase
    WrongPhase {
        expected: BattlePhase,
        actual: BattlePhase,
    },
    /// The chosen skill is not in the creature's skill list
    UnknownSkill { side: Side, skill: String },
    /// A trainer has no creature to send out
    NoActiveCreature(String),
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleError::WrongPhase { expected, actual } => {
                write!(f, "expected phase {:?}, battle is in {:?}", expected, actual)
            }
            BattleError::UnknownSkill { side, skill } => {
                write!(f, "{:?} creature does not know '{}'", side, skill)
            }
            BattleError::NoActiveCreature(name) => {
                write!(f, "{} has no creature to battle with", name)
            }
        }
    }
}

impl std::error::Error for BattleError {}

/// One landed attack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackReport {
    pub attacker: Side,
    pub skill: String,
    pub roll: DamageRoll,
    /// Defender HP after the hit
    pub defender_hp: i32,
    pub defender_fainted: bool,
}

/// Everything that happened in one resolved turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub turn: u32,
    pub attacks: SmallVec<[AttackReport; 2]>,
    /// Side whose attack was skipped because it fainted first
    pub skipped: Option<Side>,
    pub outcome: Option<BattleOutcome>,
    /// Display lines, in order
    pub messages: Vec<String>,
}

impl TurnReport {
    /// Side that acted first this turn
    pub fn first_attacker(&self) -> Option<Side> {
        self.attacks.first().map(|a| a.attacker)
    }
}

pub struct Battle {
    player_name: String,
    opponent_name: String,
    player: Creature,
    opponent: Creature,
    phase: BattlePhase,
    turn: u32,
    rules: BattleRules,
    chart: TypeChart,
    log: BattleLog,
    pending_player: Option<Skill>,
    pending_opponent: Option<Skill>,
}

impl Battle {
    pub fn new(
        player_name: impl Into<String>,
        player: Creature,
        opponent_name: impl Into<String>,
        opponent: Creature,
        rules: BattleRules,
        chart: TypeChart,
    ) -> Self {
        let mut battle = Self {
            player_name: player_name.into(),
            opponent_name: opponent_name.into(),
            player,
            opponent,
            phase: BattlePhase::PlayerChoice,
            turn: 0,
            rules,
            chart,
            log: BattleLog::default(),
            pending_player: None,
            pending_opponent: None,
        };

        let start = format!(
            "{} sends out {}! {} sends out {}!",
            battle.player_name,
            battle.player.display_name,
            battle.opponent_name,
            battle.opponent.display_name
        );
        battle.log.log(BattleLogEventType::BattleEvent, start);

        // A creature left at 0 HP by an earlier battle cannot fight.
        if let Some(outcome) = battle.knockout_outcome() {
            battle.finish_with(outcome);
        }
        battle
    }

    /// Start a battle between the active creatures of two trainers.
    pub fn from_trainers(
        player: &Trainer,
        opponent: &Trainer,
        rules: BattleRules,
        chart: TypeChart,
    ) -> Result<Self, BattleError> {
        let player_creature = player
            .active()
            .cloned()
            .ok_or_else(|| BattleError::NoActiveCreature(player.display_name.clone()))?;
        let opponent_creature = opponent
            .active()
            .cloned()
            .ok_or_else(|| BattleError::NoActiveCreature(opponent.display_name.clone()))?;
        Ok(Self::new(
            player.display_name.clone(),
            player_creature,
            opponent.display_name.clone(),
            opponent_creature,
            rules,
            chart,
        ))
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn rules(&self) -> &BattleRules {
        &self.rules
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn player(&self) -> &Creature {
        &self.player
    }

    pub fn opponent(&self) -> &Creature {
        &self.opponent
    }

    pub fn creature(&self, side: Side) -> &Creature {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn trainer_name(&self, side: Side) -> &str {
        match side {
            Side::Player => &self.player_name,
            Side::Opponent => &self.opponent_name,
        }
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.phase {
            BattlePhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }

    /// Commit the player's skill for this turn.
    pub fn choose_player_skill(&mut self, skill: Skill) -> Result<(), BattleError> {
        self.expect_phase(BattlePhase::PlayerChoice)?;
        self.check_known(Side::Player, &skill)?;
        self.pending_player = Some(skill);
        self.phase = BattlePhase::OpponentChoice;
        Ok(())
    }

    /// Commit the opponent's skill for this turn.
    pub fn choose_opponent_skill(&mut self, skill: Skill) -> Result<(), BattleError> {
        self.expect_phase(BattlePhase::OpponentChoice)?;
        self.check_known(Side::Opponent, &skill)?;
        self.pending_opponent = Some(skill);
        self.phase = BattlePhase::Resolution;
        Ok(())
    }

    /// Abandon the battle.
    pub fn forfeit(&mut self) {
        if !self.is_finished() {
            self.finish_with(BattleOutcome::Quit);
        }
    }

    /// Resolve both committed skills.
    ///
    /// The faster creature attacks first; the second attack is skipped when
    /// the first one knocked its user out.
    pub fn resolve_turn<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<TurnReport, BattleError> {
        self.expect_phase(BattlePhase::Resolution)?;
        let (Some(player_skill), Some(opponent_skill)) =
            (self.pending_player.take(), self.pending_opponent.take())
        else {
            return Err(BattleError::WrongPhase {
                expected: BattlePhase::PlayerChoice,
                actual: self.phase,
            });
        };

        self.turn += 1;
        self.log.turn = self.turn;

        let first_log = self.log.entries.len();
        let player_action = TurnAction::new(Side::Player, &self.player, player_skill);
        let opponent_action = TurnAction::new(Side::Opponent, &self.opponent, opponent_skill);
        let (first, second) = resolve_turn_order(player_action, opponent_action, rng);

        let mut attacks = SmallVec::new();
        let mut skipped = None;
        for action in [first, second] {
            if self.creature(action.side).is_fainted() {
                let name = &self.creature(action.side).display_name;
                let message = format!("{} can no longer fight!", name);
                self.log.log_skipped(action.side, message);
                skipped = Some(action.side);
                continue;
            }
            attacks.push(self.attack(action.side, &action.skill));
        }

        let outcome = self.knockout_outcome().or_else(|| self.turn_limit_outcome());
        match outcome {
            Some(outcome) => self.finish_with(outcome),
            None => self.phase = BattlePhase::PlayerChoice,
        }

        let messages = self.log.entries[first_log..]
            .iter()
            .map(|e| e.message.clone())
            .collect();

        Ok(TurnReport {
            turn: self.turn,
            attacks,
            skipped,
            outcome,
            messages,
        })
    }

    /// Leave the battle, handing both creatures back.
    ///
    /// HP is restored first when the rules ask for it.
    pub fn leave(mut self) -> (Creature, Creature) {
        if self.rules.reset_hp_on_exit {
            self.player.restore();
            self.opponent.restore();
        }
        (self.player, self.opponent)
    }

    fn attack(&mut self, side: Side, skill: &Skill) -> AttackReport {
        let (attacker, defender) = match side {
            Side::Player => (&self.player, &mut self.opponent),
            Side::Opponent => (&self.opponent, &mut self.player),
        };
        let roll = DamageCalculator::new(&self.chart, self.rules.damage_floor)
            .roll(attacker, defender, skill);
        defender.apply_damage(roll.amount);

        let attacker_name = attacker.display_name.clone();
        let defender_name = defender.display_name.clone();
        let defender_hp = defender.hp;
        let defender_max = defender.max_hp;
        let defender_fainted = defender.is_fainted();

        self.log
            .log_skill(side, format!("{} used {}!", attacker_name, skill.display_name));
        if let Some(flavour) = TypeChart::describe(roll.multiplier) {
            self.log.log(BattleLogEventType::BattleEvent, flavour.to_string());
        }
        self.log.log_damage(
            side,
            roll.amount,
            format!(
                "{} took {} damage ({}/{} HP)",
                defender_name, roll.amount, defender_hp, defender_max
            ),
        );
        if defender_fainted {
            self.log
                .log(BattleLogEventType::Faint, format!("{} fainted!", defender_name));
        }

        AttackReport {
            attacker: side,
            skill: skill.display_name.clone(),
            roll,
            defender_hp,
            defender_fainted,
        }
    }

    fn knockout_outcome(&self) -> Option<BattleOutcome> {
        match (self.player.is_fainted(), self.opponent.is_fainted()) {
            (true, true) => Some(BattleOutcome::Draw),
            (true, false) => Some(BattleOutcome::Loss),
            (false, true) => Some(BattleOutcome::Win),
            (false, false) => None,
        }
    }

    fn turn_limit_outcome(&self) -> Option<BattleOutcome> {
        match self.rules.turn_limit {
            Some(limit) if self.turn >= limit => Some(BattleOutcome::Draw),
            _ => None,
        }
    }

    fn finish_with(&mut self, outcome: BattleOutcome) {
        self.phase = BattlePhase::Finished(outcome);
        self.pending_player = None;
        self.pending_opponent = None;
        self.log
            .log(BattleLogEventType::BattleEvent, outcome.message().to_string());
    }

    fn expect_phase(&self, expected: BattlePhase) -> Result<(), BattleError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(BattleError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn check_known(&self, side: Side, skill: &Skill) -> Result<(), BattleError> {
        if self.creature(side).skills.contains(skill) {
            Ok(())
        } else {
            Err(BattleError::UnknownSkill {
                side,
                skill: skill.display_name.clone(),
            })
        }
    }
}

//! Damage calculation
//!
//! Physical skills: `attack + base_damage - defense`.
//! Special skills: `(sp_attack / sp_defense) * base_damage`.
//! The raw value is scaled by the type chart, floored, then clamped to the
//! configured minimum. The result is never negative.

use serde::{Deserialize, Serialize};

use super::creature::{Creature, Skill, SkillCategory};
use super::effectiveness::TypeChart;

/// Lowest damage a landed hit can deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DamageFloor {
    /// Hits may deal nothing
    #[default]
    Zero,
    /// Every hit deals at least 1
    One,
}

impl DamageFloor {
    pub fn value(&self) -> i32 {
        match self {
            DamageFloor::Zero => 0,
            DamageFloor::One => 1,
        }
    }
}

fn default_reset_hp_on_exit() -> bool {
    true
}

/// Rule knobs that differ between battler variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRules {
    /// Minimum damage per hit
    #[serde(default)]
    pub damage_floor: DamageFloor,
    /// Restore both creatures to max HP when the battle scene is left
    #[serde(default = "default_reset_hp_on_exit")]
    pub reset_hp_on_exit: bool,
    /// Declare a draw after this many resolved turns (None = no limit)
    #[serde(default)]
    pub turn_limit: Option<u32>,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            damage_floor: DamageFloor::Zero,
            reset_hp_on_exit: true,
            turn_limit: None,
        }
    }
}

/// Breakdown of a single hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageRoll {
    /// Damage before the type multiplier
    pub raw: f64,
    /// Type effectiveness multiplier
    pub multiplier: f64,
    /// Final damage after flooring and clamping
    pub amount: i32,
}

/// Pure damage calculator over a type chart and rule set.
#[derive(Debug, Clone)]
pub struct DamageCalculator<'a> {
    chart: &'a TypeChart,
    floor: DamageFloor,
}

impl<'a> DamageCalculator<'a> {
    pub fn new(chart: &'a TypeChart, floor: DamageFloor) -> Self {
        Self { chart, floor }
    }

    pub fn raw_damage(attacker: &Creature, defender: &Creature, skill: &Skill) -> f64 {
        match skill.category {
            SkillCategory::Physical => {
                // Widened first so extreme stats cannot overflow i32.
                attacker.attack as f64 + skill.base_damage as f64 - defender.defense as f64
            }
            SkillCategory::Special => {
                // Non-positive special defense would divide by zero or flip the sign.
                let sp_def = defender.special_defense().max(1);
                attacker.special_attack() as f64 / sp_def as f64 * skill.base_damage as f64
            }
        }
    }

    pub fn roll(&self, attacker: &Creature, defender: &Creature, skill: &Skill) -> DamageRoll {
        let raw = Self::raw_damage(attacker, defender, skill);
        let multiplier = self.chart.multiplier(skill.element, defender.element);
        let scaled = (raw * multiplier).floor();
        let amount = if scaled.is_finite() {
            (scaled as i32).max(self.floor.value())
        } else {
            self.floor.value()
        };
        DamageRoll {
            raw,
            multiplier,
            amount,
        }
    }

    pub fn damage(&self, attacker: &Creature, defender: &Creature, skill: &Skill) -> i32 {
        self.roll(attacker, defender, skill).amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::creature::ElementType;

    fn fire_attacker() -> Creature {
        Creature::new("Ember", ElementType::Fire, 50, 10, 4, 5)
    }

    fn leaf_defender() -> Creature {
        Creature::new("Sprout", ElementType::Leaf, 50, 6, 3, 3)
    }

    #[test]
    fn test_physical_damage_with_super_effective_multiplier() {
        let chart = TypeChart::standard();
        let calc = DamageCalculator::new(&chart, DamageFloor::Zero);
        let skill = Skill::new("Flame Bite", ElementType::Fire, 5);

        let roll = calc.roll(&fire_attacker(), &leaf_defender(), &skill);
        assert_eq!(roll.raw, 12.0);
        assert_eq!(roll.multiplier, 2.0);
        assert_eq!(roll.amount, 24);
    }

    #[test]
    fn test_resisted_damage_is_floored() {
        let chart = TypeChart::standard();
        let calc = DamageCalculator::new(&chart, DamageFloor::Zero);
        let attacker = Creature::new("Sprout", ElementType::Leaf, 50, 6, 3, 3);
        let defender = Creature::new("Ember", ElementType::Fire, 50, 10, 4, 5);
        let skill = Skill::new("Vine Lash", ElementType::Leaf, 5);

        // (6 + 5 - 4) * 0.5 = 3.5
        assert_eq!(calc.damage(&attacker, &defender, &skill), 3);
    }

    #[test]
    fn test_negative_raw_damage_clamps_to_floor() {
        let chart = TypeChart::standard();
        let weak = Creature::new("Pebble", ElementType::Normal, 10, 1, 1, 1);
        let wall = Creature::new("Boulder", ElementType::Normal, 10, 1, 50, 1);
        let skill = Skill::new("Tap", ElementType::Normal, 1);

        let zero = DamageCalculator::new(&chart, DamageFloor::Zero);
        assert_eq!(zero.damage(&weak, &wall, &skill), 0);

        let one = DamageCalculator::new(&chart, DamageFloor::One);
        assert_eq!(one.damage(&weak, &wall, &skill), 1);
    }

    #[test]
    fn test_special_damage_uses_ratio() {
        let chart = TypeChart::standard();
        let calc = DamageCalculator::new(&chart, DamageFloor::Zero);
        let attacker = Creature::new("Puddle", ElementType::Water, 40, 5, 5, 5).with_special_stats(12, 6);
        let defender = Creature::new("Ember", ElementType::Fire, 40, 5, 5, 5).with_special_stats(8, 4);
        let skill = Skill::new("Bubble Beam", ElementType::Water, 10).special();

        // (12 / 4) * 10 * 2.0 = 60
        assert_eq!(calc.damage(&attacker, &defender, &skill), 60);
    }

    #[test]
    fn test_special_damage_with_zero_defense_does_not_divide_by_zero() {
        let chart = TypeChart::empty();
        let calc = DamageCalculator::new(&chart, DamageFloor::Zero);
        let attacker = Creature::new("Spark", ElementType::Normal, 40, 5, 5, 5).with_special_stats(9, 0);
        let defender = Creature::new("Paper", ElementType::Normal, 40, 5, 5, 5).with_special_stats(0, 0);
        let skill = Skill::new("Zap", ElementType::Normal, 2).special();

        assert_eq!(calc.damage(&attacker, &defender, &skill), 18);
    }

    #[test]
    fn test_extreme_stats_saturate_instead_of_overflowing() {
        let chart = TypeChart::standard();
        let calc = DamageCalculator::new(&chart, DamageFloor::Zero);
        let giant = Creature::new("Titan", ElementType::Normal, 10, i32::MAX, 0, 1);
        let target = Creature::new("Pebble", ElementType::Normal, 10, 1, 0, 1);
        let skill = Skill::new("Stomp", ElementType::Normal, 1);

        let roll = calc.roll(&giant, &target, &skill);
        assert_eq!(roll.raw, i32::MAX as f64 + 1.0);
        assert_eq!(roll.amount, i32::MAX);

        let mut target = target;
        assert_eq!(target.apply_damage(roll.amount), 10);
        assert_eq!(target.hp, 0);
    }

    #[test]
    fn test_damage_is_pure() {
        let chart = TypeChart::standard();
        let calc = DamageCalculator::new(&chart, DamageFloor::One);
        let attacker = fire_attacker();
        let defender = leaf_defender();
        let skill = Skill::new("Flame Bite", ElementType::Fire, 5);

        let first = calc.damage(&attacker, &defender, &skill);
        let second = calc.damage(&attacker, &defender, &skill);
        assert_eq!(first, second);
        assert_eq!(defender.hp, defender.max_hp);
    }

    #[test]
    fn test_rules_deserialize_with_defaults() {
        let rules: BattleRules = ron::from_str("(damage_floor: One)").unwrap();
        assert_eq!(rules.damage_floor, DamageFloor::One);
        assert!(rules.reset_hp_on_exit);
        assert_eq!(rules.turn_limit, None);
    }
}

//! Creatures, skills and the sides that field them.

use serde::{Deserialize, Serialize};

/// Elemental type carried by both creatures and skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementType {
    Normal,
    Fire,
    Water,
    Leaf,
}

impl ElementType {
    /// Get all element types
    pub fn all() -> &'static [ElementType] {
        &[
            ElementType::Normal,
            ElementType::Fire,
            ElementType::Water,
            ElementType::Leaf,
        ]
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Normal => "Normal",
            ElementType::Fire => "Fire",
            ElementType::Water => "Water",
            ElementType::Leaf => "Leaf",
        }
    }
}

/// Which stat pair a skill scales with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SkillCategory {
    /// attack vs defense, additive
    #[default]
    Physical,
    /// special attack vs special defense, as a ratio
    Special,
}

/// An attack a creature can use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub display_name: String,
    pub element: ElementType,
    pub base_damage: i32,
    #[serde(default)]
    pub category: SkillCategory,
}

impl Skill {
    pub fn new(display_name: impl Into<String>, element: ElementType, base_damage: i32) -> Self {
        Self {
            display_name: display_name.into(),
            element,
            base_damage,
            category: SkillCategory::Physical,
        }
    }

    pub fn special(mut self) -> Self {
        self.category = SkillCategory::Special;
        self
    }
}

/// A battling unit with HP and combat stats.
///
/// `hp` always stays within `0..=max_hp`; use [`Creature::apply_damage`] and
/// [`Creature::restore`] rather than writing the field directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub display_name: String,
    pub element: ElementType,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    /// Special attack (falls back to `attack` when absent)
    #[serde(default)]
    pub sp_attack: Option<i32>,
    /// Special defense (falls back to `defense` when absent)
    #[serde(default)]
    pub sp_defense: Option<i32>,
    pub skills: Vec<Skill>,
}

impl Creature {
    /// Create a creature at full health with no special stats and no skills.
    pub fn new(
        display_name: impl Into<String>,
        element: ElementType,
        max_hp: i32,
        attack: i32,
        defense: i32,
        speed: i32,
    ) -> Self {
        let max_hp = max_hp.max(0);
        Self {
            display_name: display_name.into(),
            element,
            hp: max_hp,
            max_hp,
            attack,
            defense,
            speed,
            sp_attack: None,
            sp_defense: None,
            skills: Vec::new(),
        }
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_special_stats(mut self, sp_attack: i32, sp_defense: i32) -> Self {
        self.sp_attack = Some(sp_attack);
        self.sp_defense = Some(sp_defense);
        self
    }

    pub fn is_fainted(&self) -> bool {
        self.hp <= 0
    }

    pub fn special_attack(&self) -> i32 {
        self.sp_attack.unwrap_or(self.attack)
    }

    pub fn special_defense(&self) -> i32 {
        self.sp_defense.unwrap_or(self.defense)
    }

    /// Subtract `amount` from HP, clamping at zero. Returns the HP actually lost.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).max(0);
        before - self.hp
    }

    /// Restore HP to the maximum.
    pub fn restore(&mut self) {
        self.hp = self.max_hp;
    }

    /// Fraction of HP remaining, 0.0 to 1.0
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }
}

/// Which side of the field an action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

/// A named side fielding creatures. Only the first creature battles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub display_name: String,
    pub creatures: Vec<Creature>,
}

impl Trainer {
    pub fn new(display_name: impl Into<String>, creatures: Vec<Creature>) -> Self {
        Self {
            display_name: display_name.into(),
            creatures,
        }
    }

    pub fn active(&self) -> Option<&Creature> {
        self.creatures.first()
    }

    pub fn active_mut(&mut self) -> Option<&mut Creature> {
        self.creatures.first_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_damage_clamps_at_zero() {
        let mut c = Creature::new("Sprout", ElementType::Leaf, 20, 5, 5, 5);
        let lost = c.apply_damage(35);
        assert_eq!(c.hp, 0);
        assert_eq!(lost, 20);
        assert!(c.is_fainted());
    }

    #[test]
    fn test_negative_damage_does_not_heal() {
        let mut c = Creature::new("Sprout", ElementType::Leaf, 20, 5, 5, 5);
        c.apply_damage(5);
        assert_eq!(c.apply_damage(-10), 0);
        assert_eq!(c.hp, 15);
    }

    #[test]
    fn test_special_stats_fall_back_to_physical() {
        let c = Creature::new("Ember", ElementType::Fire, 30, 12, 4, 6);
        assert_eq!(c.special_attack(), 12);
        assert_eq!(c.special_defense(), 4);

        let c = c.with_special_stats(20, 8);
        assert_eq!(c.special_attack(), 20);
        assert_eq!(c.special_defense(), 8);
    }

    #[test]
    fn test_restore_returns_to_max() {
        let mut c = Creature::new("Puddle", ElementType::Water, 40, 5, 5, 5);
        c.apply_damage(25);
        c.restore();
        assert_eq!(c.hp, c.max_hp);
        assert!((c.hp_fraction() - 1.0).abs() < f32::EPSILON);
    }
}

//! Data-Driven Game Database
//!
//! Skills, creature prototypes, trainer prototypes and the type chart are
//! defined in `assets/config/game_data.ron` rather than in code.
//!
//! ## Usage
//! ```ignore
//! let db = GameDatabase::load_default()?;
//! let rival = db.create_trainer("leaf_rival").unwrap();
//! println!("{} leads with {}", rival.display_name, rival.active().unwrap().display_name);
//! ```

use bevy::log::info;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::battle::{Creature, ElementType, Skill, Trainer, TypeChart, TypeMatchup};

/// Default location of the game data file
pub const DEFAULT_GAME_DATA_PATH: &str = "assets/config/game_data.ron";

/// Upper bound for any stat or base damage in the data file
pub const MAX_STAT: i32 = 9_999;

fn check_stat(problems: &mut Vec<String>, owner: &str, stat: &str, value: i32) {
    if !(0..=MAX_STAT).contains(&value) {
        problems.push(format!("{} {} must be between 0 and {}", owner, stat, MAX_STAT));
    }
}

/// Creature stats as written in the data file. Skills are referenced by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreaturePrototype {
    pub display_name: String,
    pub element: ElementType,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    #[serde(default)]
    pub sp_attack: Option<i32>,
    #[serde(default)]
    pub sp_defense: Option<i32>,
    pub skills: Vec<String>,
}

/// A trainer as written in the data file. Creatures are referenced by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainerPrototype {
    pub display_name: String,
    pub creatures: Vec<String>,
}

/// Root structure for the game_data.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct GameDataConfig {
    pub skills: HashMap<String, Skill>,
    pub creatures: HashMap<String, CreaturePrototype>,
    pub trainers: HashMap<String, TrainerPrototype>,
    /// Omitted = the standard fire/water/leaf chart
    #[serde(default)]
    pub type_chart: Option<Vec<TypeMatchup>>,
}

/// Validated, read-only game data.
#[derive(Resource, Debug)]
pub struct GameDatabase {
    skills: HashMap<String, Skill>,
    creatures: HashMap<String, CreaturePrototype>,
    trainers: HashMap<String, TrainerPrototype>,
    type_chart: TypeChart,
}

impl GameDatabase {
    /// Build from a parsed config, validating every reference.
    pub fn new(config: GameDataConfig) -> Result<Self, String> {
        let type_chart = match &config.type_chart {
            Some(rows) => TypeChart::from_matchups(rows),
            None => TypeChart::standard(),
        };
        let db = Self {
            skills: config.skills,
            creatures: config.creatures,
            trainers: config.trainers,
            type_chart,
        };
        db.validate()?;
        Ok(db)
    }

    pub fn from_ron_str(contents: &str) -> Result<Self, String> {
        let config: GameDataConfig =
            ron::from_str(contents).map_err(|e| format!("Failed to parse game data: {}", e))?;
        Self::new(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let db = Self::from_ron_str(&contents)
            .map_err(|e| format!("{} ({})", e, path.display()))?;
        info!(
            "Loaded {} creatures and {} trainers from {}",
            db.creatures.len(),
            db.trainers.len(),
            path.display()
        );
        Ok(db)
    }

    /// Load from assets/config/game_data.ron
    pub fn load_default() -> Result<Self, String> {
        Self::load_from_file(Path::new(DEFAULT_GAME_DATA_PATH))
    }

    fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        for (id, skill) in &self.skills {
            if skill.display_name.is_empty() {
                problems.push(format!("skill '{}' has no display name", id));
            }
            let owner = format!("skill '{}'", id);
            check_stat(&mut problems, &owner, "base_damage", skill.base_damage);
        }

        for (id, proto) in &self.creatures {
            if proto.max_hp <= 0 || proto.max_hp > MAX_STAT {
                problems.push(format!(
                    "creature '{}' must have max_hp between 1 and {}",
                    id, MAX_STAT
                ));
            }
            let owner = format!("creature '{}'", id);
            check_stat(&mut problems, &owner, "attack", proto.attack);
            check_stat(&mut problems, &owner, "defense", proto.defense);
            check_stat(&mut problems, &owner, "speed", proto.speed);
            if let Some(sp_attack) = proto.sp_attack {
                check_stat(&mut problems, &owner, "sp_attack", sp_attack);
            }
            if let Some(sp_defense) = proto.sp_defense {
                check_stat(&mut problems, &owner, "sp_defense", sp_defense);
            }
            if proto.skills.is_empty() {
                problems.push(format!("creature '{}' has no skills", id));
            }
            for skill_id in &proto.skills {
                if !self.skills.contains_key(skill_id) {
                    problems.push(format!(
                        "creature '{}' references unknown skill '{}'",
                        id, skill_id
                    ));
                }
            }
        }

        for (id, proto) in &self.trainers {
            if proto.creatures.is_empty() {
                problems.push(format!("trainer '{}' has no creatures", id));
            }
            for creature_id in &proto.creatures {
                if !self.creatures.contains_key(creature_id) {
                    problems.push(format!(
                        "trainer '{}' references unknown creature '{}'",
                        id, creature_id
                    ));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            problems.sort();
            Err(format!("Invalid game data: {}", problems.join("; ")))
        }
    }

    pub fn type_chart(&self) -> &TypeChart {
        &self.type_chart
    }

    /// Instantiate a fresh, full-HP creature from its prototype.
    pub fn create_creature(&self, id: &str) -> Option<Creature> {
        let proto = self.creatures.get(id)?;
        let mut creature = Creature::new(
            proto.display_name.clone(),
            proto.element,
            proto.max_hp,
            proto.attack,
            proto.defense,
            proto.speed,
        );
        creature.sp_attack = proto.sp_attack;
        creature.sp_defense = proto.sp_defense;
        creature.skills = proto
            .skills
            .iter()
            .filter_map(|skill_id| self.skills.get(skill_id).cloned())
            .collect();
        Some(creature)
    }

    /// Instantiate a trainer with fresh creatures.
    pub fn create_trainer(&self, id: &str) -> Option<Trainer> {
        let proto = self.trainers.get(id)?;
        let creatures = proto
            .creatures
            .iter()
            .filter_map(|creature_id| self.create_creature(creature_id))
            .collect();
        Some(Trainer::new(proto.display_name.clone(), creatures))
    }

    /// Trainer ids, sorted
    pub fn trainer_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.trainers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Display name for a trainer id
    pub fn trainer_name(&self, id: &str) -> Option<&str> {
        self.trainers.get(id).map(|t| t.display_name.as_str())
    }

    /// Creature ids, sorted
    pub fn creature_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.creatures.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_DATA: &str = r#"(
        skills: {
            "tackle": (display_name: "Tackle", element: Normal, base_damage: 4),
            "ember": (display_name: "Ember", element: Fire, base_damage: 6, category: Special),
        },
        creatures: {
            "emberling": (
                display_name: "Emberling",
                element: Fire,
                max_hp: 30,
                attack: 8,
                defense: 4,
                speed: 6,
                sp_attack: Some(10),
                skills: ["tackle", "ember"],
            ),
        },
        trainers: {
            "hero": (display_name: "Hero", creatures: ["emberling"]),
        },
    )"#;

    #[test]
    fn test_parse_and_instantiate() {
        let db = GameDatabase::from_ron_str(SMALL_DATA).unwrap();
        let hero = db.create_trainer("hero").unwrap();
        let lead = hero.active().unwrap();

        assert_eq!(hero.display_name, "Hero");
        assert_eq!(lead.display_name, "Emberling");
        assert_eq!(lead.hp, 30);
        assert_eq!(lead.sp_attack, Some(10));
        assert_eq!(lead.sp_defense, None);
        assert_eq!(lead.skills.len(), 2);
        assert_eq!(lead.skills[1].display_name, "Ember");
    }

    #[test]
    fn test_missing_type_chart_uses_standard() {
        let db = GameDatabase::from_ron_str(SMALL_DATA).unwrap();
        assert_eq!(db.type_chart(), &TypeChart::standard());
    }

    #[test]
    fn test_unknown_references_are_reported() {
        let broken = SMALL_DATA.replace(r#"creatures: ["emberling"]"#, r#"creatures: ["ghost"]"#);
        let err = GameDatabase::from_ron_str(&broken).unwrap_err();
        assert!(err.contains("unknown creature 'ghost'"), "{}", err);
    }

    #[test]
    fn test_out_of_range_stats_are_reported() {
        let broken = SMALL_DATA
            .replace("attack: 8,", "attack: 2147483647,")
            .replace("defense: 4,", "defense: -3,");
        let err = GameDatabase::from_ron_str(&broken).unwrap_err();
        assert!(err.contains("creature 'emberling' attack must be between 0 and 9999"), "{}", err);
        assert!(err.contains("creature 'emberling' defense must be between 0 and 9999"), "{}", err);
    }

    #[test]
    fn test_unknown_trainer_is_none() {
        let db = GameDatabase::from_ron_str(SMALL_DATA).unwrap();
        assert!(db.create_trainer("nobody").is_none());
    }
}

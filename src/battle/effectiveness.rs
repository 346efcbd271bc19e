//! Type effectiveness
//!
//! Maps (skill element, defender element) to a damage multiplier. Pairs not in
//! the chart are neutral (1.0).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::creature::ElementType;

/// Multiplier for super-effective hits
pub const SUPER_EFFECTIVE: f64 = 2.0;
/// Multiplier for resisted hits
pub const NOT_VERY_EFFECTIVE: f64 = 0.5;
/// Multiplier for everything else
pub const NEUTRAL: f64 = 1.0;

/// One row of the chart as it appears in config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeMatchup {
    pub attacking: ElementType,
    pub defending: ElementType,
    pub multiplier: f64,
}

impl TypeMatchup {
    pub fn new(attacking: ElementType, defending: ElementType, multiplier: f64) -> Self {
        Self {
            attacking,
            defending,
            multiplier,
        }
    }
}

/// Read-only effectiveness lookup shared by every battle.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeChart {
    entries: HashMap<(ElementType, ElementType), f64>,
}

impl Default for TypeChart {
    fn default() -> Self {
        Self::standard()
    }
}

impl TypeChart {
    /// The fire / water / leaf triangle.
    pub fn standard() -> Self {
        use crate::battle::creature::ElementType::*;
        Self::from_matchups(&[
            TypeMatchup::new(Fire, Leaf, SUPER_EFFECTIVE),
            TypeMatchup::new(Leaf, Fire, NOT_VERY_EFFECTIVE),
            TypeMatchup::new(Water, Fire, SUPER_EFFECTIVE),
            TypeMatchup::new(Fire, Water, NOT_VERY_EFFECTIVE),
            TypeMatchup::new(Leaf, Water, SUPER_EFFECTIVE),
            TypeMatchup::new(Water, Leaf, NOT_VERY_EFFECTIVE),
        ])
    }

    /// A chart where every pair is neutral.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Build a chart from config rows. Later rows override earlier ones.
    pub fn from_matchups(matchups: &[TypeMatchup]) -> Self {
        let entries = matchups
            .iter()
            .map(|m| ((m.attacking, m.defending), m.multiplier))
            .collect();
        Self { entries }
    }

    pub fn multiplier(&self, attacking: ElementType, defending: ElementType) -> f64 {
        self.entries
            .get(&(attacking, defending))
            .copied()
            .unwrap_or(NEUTRAL)
    }

    /// Short flavour text for a multiplier, if it is worth announcing.
    pub fn describe(multiplier: f64) -> Option<&'static str> {
        if multiplier > NEUTRAL {
            Some("It's super effective!")
        } else if multiplier < NEUTRAL {
            Some("It's not very effective...")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::creature::ElementType::*;

    #[test]
    fn test_standard_chart_pairs() {
        let chart = TypeChart::standard();
        assert_eq!(chart.multiplier(Fire, Leaf), 2.0);
        assert_eq!(chart.multiplier(Leaf, Fire), 0.5);
        assert_eq!(chart.multiplier(Water, Fire), 2.0);
        assert_eq!(chart.multiplier(Fire, Water), 0.5);
        assert_eq!(chart.multiplier(Leaf, Water), 2.0);
        assert_eq!(chart.multiplier(Water, Leaf), 0.5);
    }

    #[test]
    fn test_same_type_and_unlisted_pairs_are_neutral() {
        let chart = TypeChart::standard();
        for &element in ElementType::all() {
            assert_eq!(chart.multiplier(element, element), 1.0);
            assert_eq!(chart.multiplier(Normal, element), 1.0);
            assert_eq!(chart.multiplier(element, Normal), 1.0);
        }
    }

    #[test]
    fn test_later_rows_override_earlier_ones() {
        let rows = [TypeMatchup::new(Fire, Leaf, 2.0), TypeMatchup::new(Fire, Leaf, 4.0)];
        let chart = TypeChart::from_matchups(&rows);
        assert_eq!(chart.multiplier(Fire, Leaf), 4.0);
        assert_eq!(chart.multiplier(Leaf, Fire), 1.0);
    }
}

//! Battle logging
//!
//! Records every battle event for display and post-battle analysis.

use serde::Serialize;
use std::path::Path;

use super::creature::Side;

/// A single entry in the battle log
#[derive(Debug, Clone, Serialize)]
pub struct BattleLogEntry {
    /// Turn the event happened on (0 = before the first turn)
    pub turn: u32,
    /// The type of event
    pub event_type: BattleLogEventType,
    /// Side that caused the event, if any
    pub source: Option<Side>,
    /// Damage dealt, for damage events
    pub amount: Option<i32>,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of battle log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BattleLogEventType {
    /// Skill chosen and used
    SkillUsed,
    /// Damage dealt
    Damage,
    /// An attack was skipped because its user had fainted
    Skipped,
    /// Creature fainted
    Faint,
    /// Battle event (start, end, etc.)
    BattleEvent,
}

/// All events of one battle, in chronological order
#[derive(Debug, Clone, Default, Serialize)]
pub struct BattleLog {
    pub entries: Vec<BattleLogEntry>,
    /// Current turn number
    pub turn: u32,
}

impl BattleLog {
    /// Add a new entry to the log
    pub fn log(&mut self, event_type: BattleLogEventType, message: String) {
        self.push(event_type, None, None, message);
    }

    pub fn log_skill(&mut self, source: Side, message: String) {
        self.push(BattleLogEventType::SkillUsed, Some(source), None, message);
    }

    pub fn log_damage(&mut self, source: Side, amount: i32, message: String) {
        self.push(BattleLogEventType::Damage, Some(source), Some(amount), message);
    }

    pub fn log_skipped(&mut self, source: Side, message: String) {
        self.push(BattleLogEventType::Skipped, Some(source), None, message);
    }

    fn push(
        &mut self,
        event_type: BattleLogEventType,
        source: Option<Side>,
        amount: Option<i32>,
        message: String,
    ) {
        self.entries.push(BattleLogEntry {
            turn: self.turn,
            event_type,
            source,
            amount,
            message,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: BattleLogEventType) -> Vec<&BattleLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Total damage dealt by one side
    pub fn total_damage_by(&self, side: Side) -> i32 {
        self.filter_by_type(BattleLogEventType::Damage)
            .into_iter()
            .filter(|e| e.source == Some(side))
            .filter_map(|e| e.amount)
            .sum()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&BattleLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Entries belonging to one turn
    pub fn turn_entries(&self, turn: u32) -> Vec<&BattleLogEntry> {
        self.entries.iter().filter(|e| e.turn == turn).collect()
    }

    /// Write the log as pretty JSON, creating parent directories as needed.
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize battle log: {}", e))?;
        std::fs::write(path, json)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_keeps_order() {
        let mut log = BattleLog::default();
        for i in 0..5 {
            log.log(BattleLogEventType::BattleEvent, format!("event {}", i));
        }
        let recent: Vec<&str> = log.recent(2).iter().map(|e| e.message.as_str()).collect();
        assert_eq!(recent, vec!["event 3", "event 4"]);
    }

    #[test]
    fn test_total_damage_by_side() {
        let mut log = BattleLog::default();
        log.turn = 1;
        log.log_damage(Side::Player, 12, "hit".to_string());
        log.log_damage(Side::Opponent, 4, "hit".to_string());
        log.turn = 2;
        log.log_damage(Side::Player, 8, "hit".to_string());

        assert_eq!(log.total_damage_by(Side::Player), 20);
        assert_eq!(log.total_damage_by(Side::Opponent), 4);
        assert_eq!(log.turn_entries(2).len(), 1);
    }

    #[test]
    fn test_filter_by_type_keeps_order() {
        let mut log = BattleLog::default();
        log.log_skill(Side::Player, "Ember!".to_string());
        log.log_damage(Side::Player, 6, "first".to_string());
        log.log_skipped(Side::Opponent, "skipped".to_string());
        log.log_damage(Side::Opponent, 2, "second".to_string());

        let damage: Vec<&str> = log
            .filter_by_type(BattleLogEventType::Damage)
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(damage, vec!["first", "second"]);
        assert_eq!(log.filter_by_type(BattleLogEventType::Faint).len(), 0);
    }
}

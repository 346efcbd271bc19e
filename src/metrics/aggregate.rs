//! Success-rate aggregation

use serde::Serialize;
use std::collections::BTreeMap;

use super::RunRecord;

/// Successes out of total runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rate {
    pub successes: u32,
    pub total: u32,
}

impl Rate {
    pub fn add(&mut self, success: bool) {
        self.total += 1;
        if success {
            self.successes += 1;
        }
    }

    /// Fraction in 0.0..=1.0; 0.0 when there are no runs
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successes as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> f64 {
        self.rate() * 100.0
    }
}

/// Rates keyed by agent and by (agent, ladder), sorted by name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub overall: Rate,
    pub by_agent: BTreeMap<String, Rate>,
    pub by_agent_ladder: BTreeMap<(String, String), Rate>,
}

impl MetricsSummary {
    /// Ladders recorded for one agent, in order
    pub fn ladders_for<'a>(
        &'a self,
        agent: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Rate)> + 'a {
        self.by_agent_ladder
            .iter()
            .filter(move |((a, _), _)| a == agent)
            .map(|((_, ladder), rate)| (ladder.as_str(), rate))
    }
}

pub fn aggregate(records: &[RunRecord]) -> MetricsSummary {
    let mut summary = MetricsSummary::default();
    for record in records {
        let success = record.is_success();
        summary.overall.add(success);
        summary
            .by_agent
            .entry(record.agent.clone())
            .or_default()
            .add(success);
        summary
            .by_agent_ladder
            .entry((record.agent.clone(), record.ladder.clone()))
            .or_default()
            .add(success);
    }
    summary
}

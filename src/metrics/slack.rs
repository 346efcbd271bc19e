//! Slack Block-Kit payloads

use serde_json::{json, Value};

use super::aggregate::{MetricsSummary, Rate};

const HEADER: &str = "Battler benchmark results";

fn header(text: &str) -> Value {
    json!({
        "type": "header",
        "text": { "type": "plain_text", "text": text, "emoji": true }
    })
}

fn section(markdown: String) -> Value {
    json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": markdown }
    })
}

fn divider() -> Value {
    json!({ "type": "divider" })
}

fn format_rate(rate: &Rate) -> String {
    format!("{:.1}% ({}/{})", rate.percent(), rate.successes, rate.total)
}

/// Header, overall rate, then one section per agent listing its ladders
pub fn build_payload(summary: &MetricsSummary) -> Value {
    let mut blocks = vec![
        header(HEADER),
        section(format!("*Overall success rate:* {}", format_rate(&summary.overall))),
        divider(),
    ];

    for (agent, rate) in &summary.by_agent {
        let mut text = format!("*{}*: {}", agent, format_rate(rate));
        for (ladder, ladder_rate) in summary.ladders_for(agent) {
            text.push_str(&format!("\n• {}: {}", ladder, format_rate(ladder_rate)));
        }
        blocks.push(section(text));
    }

    json!({ "blocks": blocks })
}

/// Payload reporting a failed aggregation
pub fn error_payload(message: &str) -> Value {
    json!({
        "blocks": [
            header(HEADER),
            section(format!(":warning: *Failed to compute metrics:* {}", message)),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::aggregate::aggregate;
    use crate::metrics::RunRecord;

    #[test]
    fn test_payload_layout() {
        let records = vec![
            RunRecord {
                agent: "alpha".to_string(),
                ladder: "easy".to_string(),
                status: "success".to_string(),
            },
            RunRecord {
                agent: "alpha".to_string(),
                ladder: "hard".to_string(),
                status: "failure".to_string(),
            },
        ];
        let payload = build_payload(&aggregate(&records));
        let blocks = payload["blocks"].as_array().unwrap();

        assert_eq!(blocks[0]["type"], "header");
        assert_eq!(blocks[1]["type"], "section");
        assert_eq!(blocks[2]["type"], "divider");
        assert_eq!(blocks.len(), 4);

        let agent_text = blocks[3]["text"]["text"].as_str().unwrap();
        assert!(agent_text.starts_with("*alpha*: 50.0% (1/2)"));
        assert!(agent_text.contains("easy: 100.0% (1/1)"));
        assert!(agent_text.contains("hard: 0.0% (0/1)"));
    }

    #[test]
    fn test_error_payload_mentions_message() {
        let payload = error_payload("boom");
        let text = payload["blocks"][1]["text"]["text"].as_str().unwrap();
        assert!(text.contains("boom"));
    }
}

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Action recorded for the observation-only record seeded at session start.
pub const START_ACTION: &str = "START";

/// One completed game step.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    pub id: Uuid,
    pub action_taken: String,
    pub observation: String,
    pub score: i64,
    /// Score delta attributed to this turn, 0 for the START record.
    pub reward: i64,
    pub done: bool,
    pub timestamp: DateTime<Utc>,
    pub available_actions: Option<Vec<String>>,
}

impl TurnRecord {
    pub fn start(observation: String, score: i64, available_actions: Option<Vec<String>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action_taken: START_ACTION.to_string(),
            observation,
            score,
            reward: 0,
            done: false,
            timestamp: Utc::now(),
            available_actions,
        }
    }

    pub fn is_start(&self) -> bool {
        self.action_taken == START_ACTION
    }
}

/// Append-only, ordered turn history. Index + 1 is the turn number.
#[derive(Debug, Clone, Default)]
pub struct TurnLog {
    records: Vec<TurnRecord>,
}

impl TurnLog {
    /// Appends a record, clamping its timestamp so the log never goes
    /// backwards when the wall clock does.
    pub fn push(&mut self, mut record: TurnRecord) {
        if let Some(last) = self.records.last() {
            if record.timestamp < last.timestamp {
                record.timestamp = last.timestamp;
            }
        }
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[TurnRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TurnRecord> {
        self.records.last()
    }

    pub fn current_score(&self) -> i64 {
        self.last().map(|r| r.score).unwrap_or(0)
    }

    pub fn latest_observation(&self) -> &str {
        self.last().map(|r| r.observation.as_str()).unwrap_or("")
    }

    pub fn latest_actions(&self) -> &[String] {
        self.last()
            .and_then(|r| r.available_actions.as_deref())
            .unwrap_or(&[])
    }
}

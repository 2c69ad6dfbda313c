//! Action history and pattern detection.
//!
//! Every authorized, cancelled, or blocked action is appended to a
//! chronological log. The sequence number is the sole ordering key;
//! timestamps are informational. The detector scans a recent window of
//! executed records for a recurring action and surfaces it as an advisory
//! suggestion - suggestions never auto-execute.
//!
//! History persists as JSON with a rolling cap so the file cannot grow
//! without bound. A missing or corrupt file loads as empty history.

use crate::intent::{signature_of, Intent, IntentName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Rolling cap on persisted records.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Final disposition of one turn's action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The executor ran the action successfully
    Executed,
    /// The executor ran and reported failure
    Failed,
    /// The user answered no during confirmation
    Cancelled,
    /// Policy refused the action outright
    Blocked,
}

impl ActionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionOutcome::Executed => "executed",
            ActionOutcome::Failed => "failed",
            ActionOutcome::Cancelled => "cancelled",
            ActionOutcome::Blocked => "blocked",
        }
    }
}

/// One immutable log entry. Never mutated or deleted within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Strictly increasing, gapless within a session
    pub sequence: u64,
    pub intent_name: IntentName,
    pub slots: BTreeMap<String, String>,
    pub outcome: ActionOutcome,
    /// Informational only; ordering is by sequence
    pub recorded_at: DateTime<Utc>,
}

impl ActionRecord {
    /// Signature for grouping, e.g. "open-app/chrome".
    pub fn signature(&self) -> String {
        let primary = match self.intent_name {
            IntentName::OpenApp => self.slots.get(crate::intent::SLOT_APP),
            IntentName::LearnPreference => self.slots.get(crate::intent::SLOT_CATEGORY),
            IntentName::DeleteFile => self.slots.get(crate::intent::SLOT_TARGET),
            IntentName::SystemCommand => self.slots.get(crate::intent::SLOT_COMMAND),
            _ => None,
        };
        signature_of(self.intent_name, primary.map(|s| s.as_str()))
    }
}

/// A proactive suggestion derived from recent history. Advisory text
/// only; recomputed fresh each turn, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Action signature being suggested, e.g. "open-app/chrome"
    pub signature: String,
    /// Sequence numbers of the supporting records, ascending
    pub basis: Vec<u64>,
}

/// Append-only action log with windowed pattern detection.
#[derive(Debug)]
pub struct ActionHistory {
    records: Vec<ActionRecord>,
    next_sequence: u64,
    path: Option<PathBuf>,
    /// Last suggestion surfaced, for consecutive-turn de-dup
    last_suggestion: Option<String>,
}

impl ActionHistory {
    /// Empty history with no backing file (tests, dry runs).
    pub fn in_memory() -> Self {
        Self {
            records: Vec::new(),
            next_sequence: 1,
            path: None,
            last_suggestion: None,
        }
    }

    /// Load history from a JSON file, keeping at most the newest
    /// [`MAX_HISTORY_SIZE`] records. Sequence numbering resumes above the
    /// highest loaded value. Missing or corrupt files load as empty.
    pub fn load(path: &Path) -> Self {
        let records: Vec<ActionRecord> = match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Vec<ActionRecord>>(&raw) {
                Ok(mut loaded) => {
                    if loaded.len() > MAX_HISTORY_SIZE {
                        loaded.drain(..loaded.len() - MAX_HISTORY_SIZE);
                    }
                    loaded
                }
                Err(e) => {
                    warn!("history file corrupt, starting empty: {}", e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        let next_sequence = records.iter().map(|r| r.sequence).max().unwrap_or(0) + 1;

        Self {
            records,
            next_sequence,
            path: Some(path.to_path_buf()),
            last_suggestion: None,
        }
    }

    /// Append a record for the given intent and outcome, assigning the
    /// next sequence number, then flush to disk.
    pub fn record(&mut self, intent: &Intent, outcome: ActionOutcome) -> &ActionRecord {
        let record = ActionRecord {
            sequence: self.next_sequence,
            intent_name: intent.name,
            slots: intent.slots.clone(),
            outcome,
            recorded_at: Utc::now(),
        };
        debug!(
            "recording action #{}: {} ({})",
            record.sequence,
            record.signature(),
            outcome.as_str()
        );

        self.next_sequence += 1;
        self.records.push(record);
        if self.records.len() > MAX_HISTORY_SIZE {
            self.records.remove(0);
        }
        self.persist();

        self.records.last().expect("record just pushed")
    }

    /// Scan the last `window` executed records for an action signature
    /// recurring at least `threshold` times. The signature just executed
    /// this turn is never suggested, and a suggestion identical to the
    /// previous turn's is suppressed.
    pub fn suggest(
        &mut self,
        window: usize,
        threshold: usize,
        just_executed: Option<&str>,
    ) -> Option<Suggestion> {
        let executed: Vec<&ActionRecord> = self
            .records
            .iter()
            .filter(|r| r.outcome == ActionOutcome::Executed)
            .collect();

        let window_start = executed.len().saturating_sub(window);
        let mut counts: BTreeMap<String, Vec<u64>> = BTreeMap::new();
        for record in &executed[window_start..] {
            counts
                .entry(record.signature())
                .or_default()
                .push(record.sequence);
        }

        // Most frequent qualifying signature wins; ties break toward the
        // most recently seen.
        let candidate = counts
            .into_iter()
            .filter(|(signature, basis)| {
                basis.len() >= threshold
                    && Some(signature.as_str()) != just_executed
                    && Some(signature.as_str()) != self.last_suggestion.as_deref()
            })
            .max_by_key(|(_, basis)| (basis.len(), *basis.last().expect("non-empty basis")));

        match candidate {
            Some((signature, basis)) => {
                self.last_suggestion = Some(signature.clone());
                Some(Suggestion { signature, basis })
            }
            None => {
                self.last_suggestion = None;
                None
            }
        }
    }

    /// Flush records to the backing file. Failures are logged; the
    /// in-memory log stays authoritative for the session.
    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("could not create history directory: {}", e);
                return;
            }
        }

        match serde_json::to_string_pretty(&self.records) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!("history flush failed: {}", e);
                }
            }
            Err(e) => warn!("history serialization failed: {}", e),
        }
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::SLOT_APP;

    fn open_app(app: &str) -> Intent {
        Intent::new(IntentName::OpenApp, &format!("open {}", app)).with_slot(SLOT_APP, app)
    }

    #[test]
    fn test_sequence_strictly_increasing_and_gapless() {
        let mut history = ActionHistory::in_memory();
        for i in 0..5 {
            let record = history.record(&open_app("chrome"), ActionOutcome::Executed);
            assert_eq!(record.sequence, i + 1);
        }
    }

    #[test]
    fn test_rolling_cap() {
        let mut history = ActionHistory::in_memory();
        for _ in 0..(MAX_HISTORY_SIZE + 10) {
            history.record(&open_app("chrome"), ActionOutcome::Executed);
        }
        assert_eq!(history.len(), MAX_HISTORY_SIZE);
        // Oldest records dropped, newest kept
        assert_eq!(history.records()[0].sequence, 11);
    }

    #[test]
    fn test_suggest_on_repeated_action() {
        let mut history = ActionHistory::in_memory();
        for _ in 0..5 {
            history.record(&open_app("chrome"), ActionOutcome::Executed);
        }

        let suggestion = history.suggest(10, 3, None).expect("pattern expected");
        assert_eq!(suggestion.signature, "open-app/chrome");
        assert_eq!(suggestion.basis, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_suggest_skips_just_executed_signature() {
        let mut history = ActionHistory::in_memory();
        for _ in 0..5 {
            history.record(&open_app("chrome"), ActionOutcome::Executed);
        }
        assert!(history.suggest(10, 3, Some("open-app/chrome")).is_none());
    }

    #[test]
    fn test_suggest_not_repeated_on_consecutive_turns() {
        let mut history = ActionHistory::in_memory();
        for _ in 0..5 {
            history.record(&open_app("chrome"), ActionOutcome::Executed);
        }

        assert!(history.suggest(10, 3, None).is_some());
        // Same state next turn: identical suggestion suppressed
        assert!(history.suggest(10, 3, None).is_none());
        // And re-eligible the turn after the gap
        assert!(history.suggest(10, 3, None).is_some());
    }

    #[test]
    fn test_cancelled_and_blocked_do_not_count() {
        let mut history = ActionHistory::in_memory();
        for _ in 0..5 {
            history.record(&open_app("chrome"), ActionOutcome::Cancelled);
        }
        assert!(history.suggest(10, 3, None).is_none());
    }

    #[test]
    fn test_window_limits_scan() {
        let mut history = ActionHistory::in_memory();
        for _ in 0..3 {
            history.record(&open_app("chrome"), ActionOutcome::Executed);
        }
        for _ in 0..4 {
            history.record(&open_app("code"), ActionOutcome::Executed);
        }
        // Window of 4 only sees the code launches
        let suggestion = history.suggest(4, 3, None).expect("pattern expected");
        assert_eq!(suggestion.signature, "open-app/code");
    }

    #[test]
    fn test_persist_and_reload_resumes_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("action_history.json");

        let mut history = ActionHistory::load(&path);
        history.record(&open_app("chrome"), ActionOutcome::Executed);
        history.record(&open_app("code"), ActionOutcome::Executed);

        let mut reloaded = ActionHistory::load(&path);
        assert_eq!(reloaded.len(), 2);
        let record = reloaded.record(&open_app("chrome"), ActionOutcome::Executed);
        assert_eq!(record.sequence, 3);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("action_history.json");
        fs::write(&path, "[{ broken").unwrap();

        let history = ActionHistory::load(&path);
        assert!(history.is_empty());
    }
}

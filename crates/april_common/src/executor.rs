//! Skill executor - the whitelisted execution boundary.
//!
//! The executor is a hard boundary: dispatch is keyed by intent name
//! against a finite compiled-in set of operations. No parsed text ever
//! reaches a shell. A failure inside a skill is reported as an outcome,
//! never propagated as a panic or error into the pipeline.

use crate::intent::{Intent, IntentName, SLOT_APP, SLOT_TARGET};
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Characters permitted in an application name handed to the spawner.
const ALLOWED_APP_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 _-.";

/// Result of running one whitelisted skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillOutcome {
    Success(String),
    Failure(String),
}

impl SkillOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SkillOutcome::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            SkillOutcome::Success(msg) | SkillOutcome::Failure(msg) => msg,
        }
    }
}

/// The execution seam. The pipeline only ever hands over intents that
/// policy has already authorized.
pub trait SkillExecutor {
    fn execute(&mut self, intent: &Intent) -> SkillOutcome;
}

/// Production skills: launch applications, delete files. Everything else
/// in the vocabulary is handled inside the pipeline and never reaches
/// the executor.
#[derive(Debug, Default)]
pub struct SystemSkills;

impl SystemSkills {
    pub fn new() -> Self {
        Self
    }

    fn open_app(&self, intent: &Intent) -> SkillOutcome {
        let Some(app) = intent.slot(SLOT_APP) else {
            return SkillOutcome::Failure("I need an application name.".to_string());
        };
        let Some(app) = sanitize_app_name(app) else {
            return SkillOutcome::Failure("I need a plain application name.".to_string());
        };

        // Multi-word names: first word is the program, rest are arguments.
        let mut parts = app.split_whitespace();
        let program = parts.next().expect("sanitized name is non-empty");

        match Command::new(program)
            .args(parts)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => {
                info!("launched application: {}", app);
                SkillOutcome::Success(format!("Opening {}.", app))
            }
            Err(e) => {
                warn!("launch failed for {}: {}", app, e);
                SkillOutcome::Failure(format!("I couldn't open {}.", app))
            }
        }
    }

    fn delete_file(&self, intent: &Intent) -> SkillOutcome {
        let Some(target) = intent.slot(SLOT_TARGET) else {
            return SkillOutcome::Failure("I need a file to delete.".to_string());
        };

        match std::fs::remove_file(target) {
            Ok(()) => {
                info!("deleted file: {}", target);
                SkillOutcome::Success(format!("Deleted {}.", target))
            }
            Err(e) => {
                warn!("delete failed for {}: {}", target, e);
                SkillOutcome::Failure(format!("I couldn't delete {}.", target))
            }
        }
    }
}

impl SkillExecutor for SystemSkills {
    fn execute(&mut self, intent: &Intent) -> SkillOutcome {
        match intent.name {
            IntentName::OpenApp => self.open_app(intent),
            IntentName::DeleteFile => self.delete_file(intent),
            IntentName::SystemCommand => {
                SkillOutcome::Failure("System commands are not implemented yet.".to_string())
            }
            // Not whitelisted for execution
            _ => SkillOutcome::Failure(format!("I can't execute {}.", intent.name)),
        }
    }
}

/// Validate and trim an application name. Returns None when the name
/// contains characters outside the allowed set.
fn sanitize_app_name(raw: &str) -> Option<String> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        return None;
    }
    if candidate.chars().any(|ch| !ALLOWED_APP_CHARS.contains(ch)) {
        return None;
    }
    Some(candidate.to_string())
}

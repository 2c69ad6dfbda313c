//! Safety classification - deterministic risk tiers for intents.
//!
//! Classification is a pure lookup against compiled-in tables. The policy
//! is whitelist-first: a capability auto-executes only if its name is in
//! the safe table. Unclassified names that sound destructive require
//! confirmation; anything else is safe. Delete targets under protected
//! path prefixes are blocked outright.

use crate::intent::{Intent, IntentName, SLOT_TARGET};
use serde::{Deserialize, Serialize};

// =============================================================================
// Classification Tables
// =============================================================================

/// Intents that execute without confirmation.
const SAFE_INTENTS: &[IntentName] = &[
    IntentName::OpenApp,
    IntentName::LearnPreference,
    IntentName::Greeting,
    IntentName::Farewell,
];

/// Intents that always require a confirmation round-trip.
const CONFIRM_INTENTS: &[IntentName] = &[IntentName::DeleteFile, IntentName::SystemCommand];

/// Keywords that mark an unclassified intent name as destructive-sounding.
const DESTRUCTIVE_KEYWORDS: &[&str] = &[
    "delete", "remove", "shutdown", "restart", "kill", "wipe", "format", "erase", "destroy",
    "terminate",
];

/// Path prefixes a delete target may never touch.
const BLOCKED_PATH_PREFIXES: &[&str] = &["/proc", "/sys", "/dev", "/run", "/boot", "/etc"];

/// Risk tier controlling whether an intent may execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyTier {
    /// Execute immediately
    Safe,
    /// Two-turn confirmation required before execution
    RequiresConfirmation,
    /// Refused outright
    Blocked,
}

impl SafetyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyTier::Safe => "safe",
            SafetyTier::RequiresConfirmation => "requires_confirmation",
            SafetyTier::Blocked => "blocked",
        }
    }
}

/// Classify an intent into a safety tier. Pure function of the intent
/// name and, for deletes, the target path.
pub fn classify(intent: &Intent) -> SafetyTier {
    // Slot predicate first: a delete aimed at a protected path is refused
    // regardless of confirmation.
    if intent.name == IntentName::DeleteFile {
        if let Some(target) = intent.slot(SLOT_TARGET) {
            if is_blocked_path(target) {
                return SafetyTier::Blocked;
            }
        }
        return SafetyTier::RequiresConfirmation;
    }

    if SAFE_INTENTS.contains(&intent.name) {
        return SafetyTier::Safe;
    }

    if CONFIRM_INTENTS.contains(&intent.name) {
        return SafetyTier::RequiresConfirmation;
    }

    // Names outside the tables (today only `unrecognized`, which never
    // reaches the execute path; tomorrow any vocabulary addition that
    // misses a table entry): destructive-sounding ones must confirm,
    // the rest default to safe.
    if sounds_destructive(intent.name.as_str()) {
        return SafetyTier::RequiresConfirmation;
    }

    SafetyTier::Safe
}

/// Check a delete target against the protected prefixes.
fn is_blocked_path(target: &str) -> bool {
    BLOCKED_PATH_PREFIXES
        .iter()
        .any(|prefix| target.starts_with(prefix))
}

/// Keyword scan for destructive-sounding intent names.
pub fn sounds_destructive(name: &str) -> bool {
    DESTRUCTIVE_KEYWORDS.iter().any(|kw| name.contains(kw))
}

/// Human-readable description of a pending action, used verbatim in the
/// confirmation prompt.
pub fn describe_action(intent: &Intent) -> String {
    match intent.name {
        IntentName::DeleteFile => match intent.slot(SLOT_TARGET) {
            Some(target) => format!("delete file {}", target),
            None => "delete a file".to_string(),
        },
        IntentName::SystemCommand => match intent.slot(crate::intent::SLOT_COMMAND) {
            Some(command) => format!("{} the system", command),
            None => "run a system command".to_string(),
        },
        IntentName::OpenApp => match intent.slot(crate::intent::SLOT_APP) {
            Some(app) => format!("open {}", app),
            None => "open an application".to_string(),
        },
        _ => intent.name.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{SLOT_APP, SLOT_COMMAND};

    #[test]
    fn test_safe_intents() {
        let intent = Intent::new(IntentName::OpenApp, "open chrome").with_slot(SLOT_APP, "chrome");
        assert_eq!(classify(&intent), SafetyTier::Safe);

        let learn = Intent::new(IntentName::LearnPreference, "use code as my editor");
        assert_eq!(classify(&learn), SafetyTier::Safe);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let intent = Intent::new(IntentName::DeleteFile, "delete file notes.txt")
            .with_slot(SLOT_TARGET, "notes.txt");
        assert_eq!(classify(&intent), SafetyTier::RequiresConfirmation);
    }

    #[test]
    fn test_delete_of_protected_path_blocked() {
        for target in ["/etc/fstab", "/boot/grub/grub.cfg", "/proc/1/status", "/dev/sda"] {
            let intent = Intent::new(IntentName::DeleteFile, "delete file")
                .with_slot(SLOT_TARGET, target);
            assert_eq!(classify(&intent), SafetyTier::Blocked, "target: {}", target);
        }
    }

    #[test]
    fn test_system_command_requires_confirmation() {
        let intent = Intent::new(IntentName::SystemCommand, "shutdown")
            .with_slot(SLOT_COMMAND, "shutdown");
        assert_eq!(classify(&intent), SafetyTier::RequiresConfirmation);
    }

    #[test]
    fn test_describe_action_for_prompt() {
        let intent = Intent::new(IntentName::DeleteFile, "delete file important.txt")
            .with_slot(SLOT_TARGET, "important.txt");
        assert_eq!(describe_action(&intent), "delete file important.txt");
    }

    #[test]
    fn test_destructive_keyword_fallback() {
        // Guards vocabulary additions that miss a table entry
        for name in ["wipe-disk", "erase-history", "kill-process", "format-drive"] {
            assert!(sounds_destructive(name), "name: {}", name);
        }
        for name in ["open-app", "greeting", "unrecognized", "list-files"] {
            assert!(!sounds_destructive(name), "name: {}", name);
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let intent = Intent::new(IntentName::DeleteFile, "delete file x").with_slot(SLOT_TARGET, "x");
        assert_eq!(classify(&intent), classify(&intent));
    }
}

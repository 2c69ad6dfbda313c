//! Intent types - the structured output of the parser.
//!
//! `IntentName` is a closed vocabulary. New capabilities are added by
//! extending the enum and inserting a parse rule, never by free-form
//! string dispatch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Slot key for the application to open.
pub const SLOT_APP: &str = "app";
/// Slot key for the preference category being learned or resolved.
pub const SLOT_CATEGORY: &str = "category";
/// Slot key for the value being learned.
pub const SLOT_VALUE: &str = "value";
/// Slot key for a file-deletion target path.
pub const SLOT_TARGET: &str = "target";
/// Slot key for a system command (shutdown, restart).
pub const SLOT_COMMAND: &str = "command";

/// The fixed intent vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentName {
    /// Launch a named (or aliased) application
    OpenApp,
    /// "use X as my Y" preference directive
    LearnPreference,
    /// Delete a named file
    DeleteFile,
    /// Machine-level command (shutdown, restart)
    SystemCommand,
    /// Social greeting
    Greeting,
    /// Goodbye / session end
    Farewell,
    /// No rule matched
    Unrecognized,
}

impl IntentName {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentName::OpenApp => "open-app",
            IntentName::LearnPreference => "learn-preference",
            IntentName::DeleteFile => "delete-file",
            IntentName::SystemCommand => "system-command",
            IntentName::Greeting => "greeting",
            IntentName::Farewell => "farewell",
            IntentName::Unrecognized => "unrecognized",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open-app" => Some(IntentName::OpenApp),
            "learn-preference" => Some(IntentName::LearnPreference),
            "delete-file" => Some(IntentName::DeleteFile),
            "system-command" => Some(IntentName::SystemCommand),
            "greeting" => Some(IntentName::Greeting),
            "farewell" => Some(IntentName::Farewell),
            "unrecognized" => Some(IntentName::Unrecognized),
            _ => None,
        }
    }
}

impl std::fmt::Display for IntentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One parsed user command. Immutable once produced; one per turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub name: IntentName,
    pub slots: BTreeMap<String, String>,
    pub raw_text: String,
}

impl Intent {
    pub fn new(name: IntentName, raw_text: &str) -> Self {
        Self {
            name,
            slots: BTreeMap::new(),
            raw_text: raw_text.to_string(),
        }
    }

    pub fn with_slot(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }

    pub fn unrecognized(raw_text: &str) -> Self {
        Self::new(IntentName::Unrecognized, raw_text)
    }

    pub fn slot(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(|s| s.as_str())
    }

    /// Primary slot used when rendering an action signature.
    fn primary_slot(&self) -> Option<&str> {
        match self.name {
            IntentName::OpenApp => self.slot(SLOT_APP),
            IntentName::LearnPreference => self.slot(SLOT_CATEGORY),
            IntentName::DeleteFile => self.slot(SLOT_TARGET),
            IntentName::SystemCommand => self.slot(SLOT_COMMAND),
            _ => None,
        }
    }

    /// Stable signature for history grouping and suggestions,
    /// e.g. "open-app/chrome".
    pub fn signature(&self) -> String {
        signature_of(self.name, self.primary_slot())
    }
}

/// Render an action signature from a name and optional primary slot.
pub fn signature_of(name: IntentName, primary_slot: Option<&str>) -> String {
    match primary_slot {
        Some(slot) => format!("{}/{}", name.as_str(), slot),
        None => name.as_str().to_string(),
    }
}

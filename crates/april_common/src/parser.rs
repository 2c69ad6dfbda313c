//! Intent parser - deterministic, rule-based text understanding.
//!
//! Parsing evaluates an ordered table of declarative rules; the first
//! matching rule wins. Rule order encodes priority: the learn-preference
//! grammar sits above the destructive verbs, which sit above the generic
//! open verbs, so "use chrome as my browser" never reads as an open
//! command. New capabilities are added by inserting a rule record, not by
//! editing dispatch logic.
//!
//! Parsing never mutates the preference store; it only reads it for alias
//! substitution. The learning mutation happens later in the pipeline,
//! after policy classification.

use crate::intent::{
    Intent, IntentName, SLOT_APP, SLOT_CATEGORY, SLOT_COMMAND, SLOT_TARGET, SLOT_VALUE,
};
use crate::normalize::{strip_fillers, tokenize};
use crate::preferences::{is_recognized_category, PreferenceStore};
use tracing::debug;

/// Verbs that introduce an open-app command.
const OPEN_VERBS: &[&str] = &["open", "launch", "start"];

/// Verbs that introduce a file deletion.
const DELETE_VERBS: &[&str] = &["delete", "remove"];

/// Machine-level commands recognized as system-command intents.
const SYSTEM_COMMANDS: &[&str] = &["shutdown", "restart", "reboot"];

/// Greeting openers.
const GREETING_WORDS: &[&str] = &["hello", "hi", "hey"];

/// Farewell openers.
const FAREWELL_WORDS: &[&str] = &["bye", "goodbye", "exit", "quit"];

/// Input to a rule extractor: normalized, filler-stripped tokens plus the
/// untouched raw text for the Intent.
struct ParseContext<'a> {
    raw_text: &'a str,
    tokens: &'a [String],
}

/// One row of the rule table: a name for tracing plus an extractor that
/// either claims the input or passes.
struct ParseRule {
    name: &'static str,
    extract: fn(&ParseContext, &PreferenceStore) -> Option<Intent>,
}

/// The ordered rule table. First match wins; order is priority.
const RULES: &[ParseRule] = &[
    ParseRule {
        name: "learn-preference",
        extract: extract_learn_preference,
    },
    ParseRule {
        name: "delete-file",
        extract: extract_delete_file,
    },
    ParseRule {
        name: "system-command",
        extract: extract_system_command,
    },
    ParseRule {
        name: "open-app",
        extract: extract_open_app,
    },
    ParseRule {
        name: "greeting",
        extract: extract_greeting,
    },
    ParseRule {
        name: "farewell",
        extract: extract_farewell,
    },
];

/// Parse one line of input into an Intent, consulting the preference
/// store for alias substitution. Never fails: unmatched input yields an
/// `unrecognized` intent carrying the raw text.
pub fn parse(text: &str, preferences: &PreferenceStore) -> Intent {
    let tokens = strip_fillers(&tokenize(text));
    if tokens.is_empty() {
        return Intent::unrecognized(text);
    }

    let ctx = ParseContext {
        raw_text: text,
        tokens: &tokens,
    };

    for rule in RULES {
        if let Some(intent) = (rule.extract)(&ctx, preferences) {
            debug!("rule matched: {} -> {}", rule.name, intent.name);
            return intent;
        }
    }

    debug!("no rule matched: {:?}", text);
    Intent::unrecognized(text)
}

/// "use <value> as my <category>" - both parts required; an unrecognized
/// category still parses (rejection is the store's call, surfaced later).
fn extract_learn_preference(ctx: &ParseContext, _prefs: &PreferenceStore) -> Option<Intent> {
    let tokens = ctx.tokens;
    if tokens.first().map(|t| t.as_str()) != Some("use") {
        return None;
    }

    // Locate the "as my" pivot after at least one value token.
    let pivot = tokens
        .windows(2)
        .position(|pair| pair[0] == "as" && pair[1] == "my")?;
    if pivot < 2 || pivot + 2 >= tokens.len() {
        return None;
    }

    let value = tokens[1..pivot].join(" ");
    let category = tokens[pivot + 2..].join(" ");

    Some(
        Intent::new(IntentName::LearnPreference, ctx.raw_text)
            .with_slot(SLOT_CATEGORY, &category)
            .with_slot(SLOT_VALUE, &value),
    )
}

/// "delete [file] <target>" / "remove [file] <target>".
fn extract_delete_file(ctx: &ParseContext, _prefs: &PreferenceStore) -> Option<Intent> {
    let tokens = ctx.tokens;
    let verb = tokens.first()?;
    if !DELETE_VERBS.contains(&verb.as_str()) {
        return None;
    }

    let mut rest = &tokens[1..];
    if rest.first().map(|t| t.as_str()) == Some("file") {
        rest = &rest[1..];
    }
    if rest.is_empty() {
        return None;
    }

    Some(
        Intent::new(IntentName::DeleteFile, ctx.raw_text)
            .with_slot(SLOT_TARGET, &rest.join(" ")),
    )
}

/// "shutdown" / "restart" / "reboot", optionally followed by noise
/// ("shutdown the computer").
fn extract_system_command(ctx: &ParseContext, _prefs: &PreferenceStore) -> Option<Intent> {
    let command = ctx.tokens.first()?;
    if !SYSTEM_COMMANDS.contains(&command.as_str()) {
        return None;
    }

    Some(
        Intent::new(IntentName::SystemCommand, ctx.raw_text).with_slot(SLOT_COMMAND, command),
    )
}

/// "open <app>" with alias substitution. "open browser" and
/// "open my browser" both resolve through the preference store; a
/// category with no learned value keeps the literal noun in the slot.
fn extract_open_app(ctx: &ParseContext, prefs: &PreferenceStore) -> Option<Intent> {
    let tokens = ctx.tokens;
    let verb = tokens.first()?;
    if !OPEN_VERBS.contains(&verb.as_str()) {
        return None;
    }

    let mut rest = &tokens[1..];
    if rest.first().map(|t| t.as_str()) == Some("my") {
        rest = &rest[1..];
    }
    if rest.is_empty() {
        return None;
    }

    let noun = rest.join(" ");
    let intent = Intent::new(IntentName::OpenApp, ctx.raw_text);

    if is_recognized_category(&noun) {
        return Some(match prefs.get(&noun) {
            Some(app) => intent.with_slot(SLOT_APP, app).with_slot(SLOT_CATEGORY, &noun),
            // No learned value: the literal noun stays in the slot.
            None => intent.with_slot(SLOT_APP, &noun).with_slot(SLOT_CATEGORY, &noun),
        });
    }

    Some(intent.with_slot(SLOT_APP, &noun))
}

fn extract_greeting(ctx: &ParseContext, _prefs: &PreferenceStore) -> Option<Intent> {
    let first = ctx.tokens.first()?;
    if GREETING_WORDS.contains(&first.as_str()) {
        Some(Intent::new(IntentName::Greeting, ctx.raw_text))
    } else {
        None
    }
}

fn extract_farewell(ctx: &ParseContext, _prefs: &PreferenceStore) -> Option<Intent> {
    let first = ctx.tokens.first()?;
    if FAREWELL_WORDS.contains(&first.as_str()) {
        Some(Intent::new(IntentName::Farewell, ctx.raw_text))
    } else {
        None
    }
}

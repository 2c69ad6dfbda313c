//! Confirmation state machine - two-turn gate for risky actions.
//!
//! Modeled as an explicit state object carried across turns rather than a
//! nested blocking prompt, so the same logic serves a console loop or a
//! message-based frontend. While a request is pending, the next turn's
//! input is read only as a yes/no answer and never reaches the parser.

use crate::intent::Intent;
use serde::{Deserialize, Serialize};

/// Affirmative answer tokens (case-insensitive).
pub const AFFIRMATIVE_TOKENS: &[&str] = &["yes", "y", "ok", "okay", "sure", "confirm"];

/// Negative answer tokens (case-insensitive).
pub const NEGATIVE_TOKENS: &[&str] = &["no", "n", "cancel", "nevermind", "never mind"];

/// A risky action parked for one confirmation round-trip.
/// At most one of these is live at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub pending_intent: Intent,
    pub created_turn: u64,
}

/// Per-thread confirmation state. Idle is both the initial and the
/// resting state; there is no terminal state while the process runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfirmationState {
    #[default]
    Idle,
    AwaitingConfirmation(ConfirmationRequest),
}

impl ConfirmationState {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, ConfirmationState::AwaitingConfirmation(_))
    }

    /// Park an intent and enter AwaitingConfirmation.
    pub fn begin(&mut self, pending_intent: Intent, created_turn: u64) {
        debug_assert!(!self.is_awaiting(), "confirmation already pending");
        *self = ConfirmationState::AwaitingConfirmation(ConfirmationRequest {
            pending_intent,
            created_turn,
        });
    }

    /// Resolve the pending request, returning the parked intent.
    /// Returns to Idle regardless of how the answer came out.
    pub fn resolve(&mut self) -> Option<Intent> {
        match std::mem::take(self) {
            ConfirmationState::AwaitingConfirmation(request) => Some(request.pending_intent),
            ConfirmationState::Idle => None,
        }
    }

    pub fn pending(&self) -> Option<&ConfirmationRequest> {
        match self {
            ConfirmationState::AwaitingConfirmation(request) => Some(request),
            ConfirmationState::Idle => None,
        }
    }
}

/// How a confirmation-turn input was understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationAnswer {
    Affirmative,
    Negative,
    /// Neither token set matched: re-prompt, request stays pending.
    Unrecognized,
}

/// Interpret one line of input as a confirmation answer.
pub fn interpret_answer(input: &str) -> ConfirmationAnswer {
    let normalized = input.trim().to_lowercase();
    if AFFIRMATIVE_TOKENS.contains(&normalized.as_str()) {
        ConfirmationAnswer::Affirmative
    } else if NEGATIVE_TOKENS.contains(&normalized.as_str()) {
        ConfirmationAnswer::Negative
    } else {
        ConfirmationAnswer::Unrecognized
    }
}

/// The literal confirmation prompt for a pending action description.
pub fn confirmation_prompt(description: &str) -> String {
    format!(
        "Are you sure you want to execute: {}? (yes/no)",
        description
    )
}

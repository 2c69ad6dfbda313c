//! APRIL Common - the intent resolution and policy enforcement pipeline.
//!
//! Deterministic, rule-based command understanding: no models, no
//! network. Parse, resolve aliases, classify risk, gate confirmation,
//! execute through a compiled-in whitelist, remember what happened.

pub mod assistant;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod executor;
pub mod history;
pub mod intent;
pub mod normalize;
pub mod parser;
pub mod policy;
pub mod preferences;


pub use assistant::{Assistant, TurnOutcome, TurnReply};
pub use config::AssistantConfig;
pub use error::AprilError;
pub use intent::{Intent, IntentName};

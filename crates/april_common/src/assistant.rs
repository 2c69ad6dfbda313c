//! Assistant turn engine - one entry point per conversational turn.
//!
//! Sequencing per turn: confirmation short-circuit, parse, learn,
//! classify, authorize/prompt/refuse, execute, record, suggest. All
//! mutable state (preferences, history, pending confirmation) is owned
//! here and flushed before the turn's reply is produced, so a turn is
//! atomic with respect to state mutation.

use crate::config::AssistantConfig;
use crate::confirmation::{
    confirmation_prompt, interpret_answer, ConfirmationAnswer, ConfirmationState,
};
use crate::executor::{SkillExecutor, SkillOutcome, SystemSkills};
use crate::history::{ActionHistory, ActionOutcome, Suggestion};
use crate::intent::{signature_of, Intent, IntentName, SLOT_CATEGORY, SLOT_VALUE};
use crate::parser::parse;
use crate::policy::{classify, describe_action, SafetyTier};
use crate::preferences::PreferenceStore;
use tracing::info;

/// Fallback response for input no rule understands.
pub const FALLBACK_RESPONSE: &str = "I can't do that yet.";

/// Response when a pending action is cancelled.
pub const CANCELLED_RESPONSE: &str = "Action cancelled.";

/// Machine-readable result of one turn, alongside the response text.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Authorized and executed successfully
    Executed { intent: Intent },
    /// Authorized but the executor reported failure
    Failed { intent: Intent },
    /// A confirmation prompt was issued; the next turn answers it
    AwaitingConfirmation,
    /// The pending action was cancelled
    Cancelled,
    /// Policy refused the action outright
    Blocked { intent: Intent },
    /// A preference was learned and flushed
    Learned { category: String, value: String },
    /// A learning directive named an unrecognized category
    UnknownCategory { category: String },
    /// Greeting or farewell; nothing executed
    SmallTalk,
    /// No rule matched the input
    Unrecognized,
    /// Ambiguous confirmation answer; the request is still pending
    Reprompt,
}

/// One turn's reply: response text for the user, machine-readable
/// outcome for the caller, and an optional advisory suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub response: String,
    pub outcome: TurnOutcome,
    pub suggestion: Option<Suggestion>,
    /// The conversational loop should stop after this turn
    pub exit: bool,
}

impl TurnReply {
    fn new(response: impl Into<String>, outcome: TurnOutcome) -> Self {
        Self {
            response: response.into(),
            outcome,
            suggestion: None,
            exit: false,
        }
    }
}

/// The pipeline: parser, preference store, policy gate, executor seam,
/// and action history, driven one synchronous turn at a time.
pub struct Assistant<E: SkillExecutor> {
    config: AssistantConfig,
    preferences: PreferenceStore,
    history: ActionHistory,
    confirmation: ConfirmationState,
    executor: E,
    turn: u64,
}

impl Assistant<SystemSkills> {
    /// Production assistant: state loaded from the config's data
    /// directory, system skills as the executor.
    pub fn from_config(config: AssistantConfig) -> Self {
        let preferences = PreferenceStore::load(&config.preferences_path());
        let history = ActionHistory::load(&config.history_path());
        Self::new(config, preferences, history, SystemSkills::new())
    }
}

impl<E: SkillExecutor> Assistant<E> {
    /// Assemble an assistant from injected state. Tests supply in-memory
    /// stores and a fake executor.
    pub fn new(
        config: AssistantConfig,
        preferences: PreferenceStore,
        history: ActionHistory,
        executor: E,
    ) -> Self {
        Self {
            config,
            preferences,
            history,
            confirmation: ConfirmationState::Idle,
            executor,
            turn: 0,
        }
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        self.confirmation.is_awaiting()
    }

    /// Process one line of user input and produce the turn's reply.
    pub fn handle_turn(&mut self, input: &str) -> TurnReply {
        self.turn += 1;

        // While a confirmation is pending, input is only ever an answer.
        // It never reaches the parser, so no new intent can be classified
        // until the pending one resolves.
        if self.confirmation.is_awaiting() {
            return self.handle_confirmation_answer(input);
        }

        let intent = parse(input, &self.preferences);
        info!("turn {}: parsed {}", self.turn, intent.name);

        let mut reply = match intent.name {
            IntentName::Unrecognized => TurnReply::new(FALLBACK_RESPONSE, TurnOutcome::Unrecognized),
            IntentName::Greeting => TurnReply::new("Hello.", TurnOutcome::SmallTalk),
            IntentName::Farewell => {
                let mut reply = TurnReply::new("Goodbye.", TurnOutcome::SmallTalk);
                reply.exit = true;
                reply
            }
            _ => self.enforce_policy(intent),
        };

        if !matches!(
            reply.outcome,
            TurnOutcome::AwaitingConfirmation | TurnOutcome::Reprompt
        ) {
            self.attach_suggestion(&mut reply);
        }
        reply
    }

    /// Resolve (or re-prompt) the pending confirmation.
    fn handle_confirmation_answer(&mut self, input: &str) -> TurnReply {
        match interpret_answer(input) {
            ConfirmationAnswer::Affirmative => {
                let intent = self
                    .confirmation
                    .resolve()
                    .expect("awaiting state holds a request");
                let mut reply = self.execute_and_record(intent);
                self.attach_suggestion(&mut reply);
                reply
            }
            ConfirmationAnswer::Negative => {
                let intent = self
                    .confirmation
                    .resolve()
                    .expect("awaiting state holds a request");
                self.history.record(&intent, ActionOutcome::Cancelled);
                let mut reply = TurnReply::new(CANCELLED_RESPONSE, TurnOutcome::Cancelled);
                self.attach_suggestion(&mut reply);
                reply
            }
            ConfirmationAnswer::Unrecognized => {
                // Same request stays pending; the one turn that appends
                // no action record.
                let description = self
                    .confirmation
                    .pending()
                    .map(|request| describe_action(&request.pending_intent))
                    .expect("awaiting state holds a request");
                TurnReply::new(
                    format!("Please answer yes or no. {}", confirmation_prompt(&description)),
                    TurnOutcome::Reprompt,
                )
            }
        }
    }

    /// The only mutating path into the preference store. Rejection leaves
    /// the store untouched and produces a correction, not an error.
    fn learn_preference(&mut self, intent: &Intent) -> TurnReply {
        let category = intent.slot(SLOT_CATEGORY).unwrap_or_default().to_string();
        let value = intent.slot(SLOT_VALUE).unwrap_or_default().to_string();

        match self.preferences.set(&category, &value) {
            Ok(()) => {
                self.history.record(intent, ActionOutcome::Executed);
                TurnReply::new(
                    format!("Okay. I'll use {} as your {} from now on.", value, category),
                    TurnOutcome::Learned { category, value },
                )
            }
            Err(_) => TurnReply::new(
                format!("I don't know the category {}.", category),
                TurnOutcome::UnknownCategory { category },
            ),
        }
    }

    /// Classify and either execute, prompt, or refuse.
    fn enforce_policy(&mut self, intent: Intent) -> TurnReply {
        match classify(&intent) {
            // Learning is safe tier; it runs as a dedicated
            // preference-update step, not through the executor.
            SafetyTier::Safe if intent.name == IntentName::LearnPreference => {
                self.learn_preference(&intent)
            }
            SafetyTier::Safe => self.execute_and_record(intent),
            SafetyTier::RequiresConfirmation => {
                let prompt = confirmation_prompt(&describe_action(&intent));
                self.confirmation.begin(intent, self.turn);
                TurnReply::new(prompt, TurnOutcome::AwaitingConfirmation)
            }
            SafetyTier::Blocked => {
                info!("blocked by policy: {}", intent.signature());
                self.history.record(&intent, ActionOutcome::Blocked);
                TurnReply::new(
                    format!("I won't {}. That target is protected.", describe_action(&intent)),
                    TurnOutcome::Blocked { intent },
                )
            }
        }
    }

    /// Hand an authorized intent to the executor and record the outcome.
    fn execute_and_record(&mut self, intent: Intent) -> TurnReply {
        let outcome = self.executor.execute(&intent);
        let response = outcome.message().to_string();
        match outcome {
            SkillOutcome::Success(_) => {
                self.history.record(&intent, ActionOutcome::Executed);
                TurnReply::new(response, TurnOutcome::Executed { intent })
            }
            SkillOutcome::Failure(_) => {
                self.history.record(&intent, ActionOutcome::Failed);
                TurnReply::new(response, TurnOutcome::Failed { intent })
            }
        }
    }

    /// Run pattern detection and append an advisory line when a
    /// suggestion surfaces. Suggestions never execute anything.
    fn attach_suggestion(&mut self, reply: &mut TurnReply) {
        // Anything this turn performed or attempted counts as just
        // executed: learned preferences and failed attempts must not be
        // suggested straight back either.
        let just_executed = match &reply.outcome {
            TurnOutcome::Executed { intent } | TurnOutcome::Failed { intent } => {
                Some(intent.signature())
            }
            TurnOutcome::Learned { category, .. } => {
                Some(signature_of(IntentName::LearnPreference, Some(category.as_str())))
            }
            _ => None,
        };

        let suggestion = self.history.suggest(
            self.config.suggestions.window,
            self.config.suggestions.threshold,
            just_executed.as_deref(),
        );

        if let Some(suggestion) = &suggestion {
            reply.response = format!(
                "{} You run {} often - just ask if you want it again.",
                reply.response, suggestion.signature
            );
        }
        reply.suggestion = suggestion;
    }
}

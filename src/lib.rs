pub mod api;
pub mod cli;
pub mod error;
pub mod settings;
pub mod survey;
pub mod tracker;
pub mod trigger;

use api::BackendClient;
use error::ApiError;
use rand::Rng;
use std::time::Duration;
use tracker::ResetTracker;
use trigger::{ButtonStage, ButtonStyle, TriggerEngine, TriggerPolicy};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Transcript types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Shown in place of a reply when the backend errors or is unreachable.
pub const ASSISTANT_ERROR_LINE: &str = "Error retrieving response from the assistant.";

/// Cosmetic pause before the chat request goes out, sampled uniformly.
pub const THINKING_DELAY_MIN_MS: u64 = 600;
pub const THINKING_DELAY_MAX_MS: u64 = 2000;

// ---------------------------------------------------------------------------
// Submission flow
// ---------------------------------------------------------------------------

/// The synchronous half of a message submission. The trigger evaluation has
/// already happened by the time one of these exists; the network exchange
/// comes later.
#[derive(Debug, Clone)]
pub struct PendingExchange {
    session_id: Uuid,
    pub message: String,
    pub delay: Duration,
    pub stage: ButtonStage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank or whitespace-only input; nothing recorded.
    Ignored,
    /// Assistant replied and the turn was appended.
    Replied(String),
    /// Backend error or transport failure; the canned error line was
    /// appended instead.
    Failed(String),
    /// Reply arrived for a conversation that was reset in the meantime.
    Discarded,
}

// ---------------------------------------------------------------------------
// ChatSession — participant-facing chat page engine
// ---------------------------------------------------------------------------

/// Drives one participant's chat phase: transcript, staged finish button,
/// and the exchange with the backend. Event-driven and single-threaded,
/// mirroring the page it models.
pub struct ChatSession {
    client: BackendClient,
    engine: TriggerEngine,
    transcript: Vec<ChatTurn>,
    session_id: Uuid,
    /// Drop replies that resolve after a reset rotated the session identity.
    /// On by default; the legacy behavior (applying them anyway) is a bug.
    pub discard_stale_replies: bool,
    reset_tracker: Option<ResetTracker>,
}

impl ChatSession {
    /// Fetches trigger settings from the backend, degrading to the fallback
    /// staging policy on any failure, and seeds the engine from messages
    /// already on screen.
    pub async fn initialize(client: BackendClient, existing_messages: &[ChatTurn]) -> Self {
        let policy = TriggerPolicy::from_fetch(client.get_trigger_settings().await);
        let user_count = existing_messages
            .iter()
            .filter(|t| t.role == Role::User)
            .count() as u32;
        ChatSession {
            client,
            engine: TriggerEngine::initialize(policy, user_count),
            transcript: existing_messages.to_vec(),
            session_id: Uuid::new_v4(),
            discard_stale_replies: true,
            reset_tracker: None,
        }
    }

    /// Offline constructor for hosts that already hold settings (and for
    /// tests).
    pub fn with_policy(client: BackendClient, policy: TriggerPolicy) -> Self {
        ChatSession {
            client,
            engine: TriggerEngine::new(policy),
            transcript: Vec::new(),
            session_id: Uuid::new_v4(),
            discard_stale_replies: true,
            reset_tracker: None,
        }
    }

    /// Persist reset counts at the given path.
    pub fn with_reset_tracker(mut self, tracker: ResetTracker) -> Self {
        self.reset_tracker = Some(tracker);
        self
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn stage(&self) -> ButtonStage {
        self.engine.stage()
    }

    pub fn button_style(&self) -> ButtonStyle {
        self.engine.style()
    }

    pub fn engine_mut(&mut self) -> &mut TriggerEngine {
        &mut self.engine
    }

    /// Synchronous half of a submission: records the user turn and runs the
    /// trigger evaluation before any network traffic. Returns `None` for
    /// blank input.
    pub fn submit_message(&mut self, text: &str) -> Option<PendingExchange> {
        let message = text.trim();
        if message.is_empty() {
            return None;
        }
        self.transcript.push(ChatTurn {
            role: Role::User,
            content: message.to_string(),
        });
        let stage = self.engine.on_message_submitted();
        let delay_ms = rand::thread_rng().gen_range(THINKING_DELAY_MIN_MS..=THINKING_DELAY_MAX_MS);
        Some(PendingExchange {
            session_id: self.session_id,
            message: message.to_string(),
            delay: Duration::from_millis(delay_ms),
            stage,
        })
    }

    /// Asynchronous half: waits out the thinking delay, performs the
    /// exchange, and applies the result.
    pub async fn complete_exchange(&mut self, pending: PendingExchange) -> SubmitOutcome {
        tokio::time::sleep(pending.delay).await;
        let result = self.client.send_chat_message(&pending.message).await;
        self.apply_reply(&pending, result)
    }

    /// Applies a reply that arrived for `pending`. Kept separate from the
    /// network call so hosts driving their own requests get the same
    /// staleness and error handling.
    pub fn apply_reply(
        &mut self,
        pending: &PendingExchange,
        result: Result<String, ApiError>,
    ) -> SubmitOutcome {
        if self.discard_stale_replies && pending.session_id != self.session_id {
            tracing::debug!("discarding reply from before conversation reset");
            return SubmitOutcome::Discarded;
        }
        match result {
            Ok(reply) => {
                self.transcript.push(ChatTurn {
                    role: Role::Assistant,
                    content: reply.clone(),
                });
                SubmitOutcome::Replied(reply)
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat exchange failed");
                self.transcript.push(ChatTurn {
                    role: Role::Assistant,
                    content: ASSISTANT_ERROR_LINE.to_string(),
                });
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }

    /// Clears the conversation: empty transcript, trigger state back to
    /// hidden, new session identity so in-flight replies can be recognized
    /// as stale.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.engine.reset();
        self.session_id = Uuid::new_v4();
        if let Some(tracker) = &mut self.reset_tracker {
            match tracker.record_reset() {
                Ok(count) => tracing::debug!(count, "conversation reset recorded"),
                Err(e) => tracing::warn!(error = %e, "failed to persist reset count"),
            }
        }
    }

    pub fn reset_count(&self) -> Option<u32> {
        self.reset_tracker.as_ref().map(|t| t.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::{TriggerMode, TriggerSettings};

    fn session() -> ChatSession {
        let settings = TriggerSettings {
            trigger_type: TriggerMode::Messages,
            stage1_messages: 2,
            stage2_messages: 4,
            stage3_messages: 6,
            ..TriggerSettings::default()
        };
        ChatSession::with_policy(
            BackendClient::new("http://localhost:5000"),
            TriggerPolicy::Configured(settings),
        )
    }

    #[test]
    fn test_blank_input_ignored() {
        let mut s = session();
        assert!(s.submit_message("").is_none());
        assert!(s.submit_message("   \n\t").is_none());
        assert!(s.transcript().is_empty());
        assert_eq!(s.stage(), ButtonStage::Hidden);
    }

    #[test]
    fn test_submit_records_turn_and_evaluates_trigger() {
        let mut s = session();
        let pending = s.submit_message("  hello there  ").unwrap();
        assert_eq!(pending.message, "hello there");
        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.transcript()[0].role, Role::User);
        // Stage evaluation happened before any network exchange.
        let p2 = s.submit_message("second").unwrap();
        assert_eq!(p2.stage, ButtonStage::Stage1);
    }

    #[test]
    fn test_thinking_delay_within_bounds() {
        let mut s = session();
        for _ in 0..50 {
            let pending = s.submit_message("x").unwrap();
            let ms = pending.delay.as_millis() as u64;
            assert!((THINKING_DELAY_MIN_MS..=THINKING_DELAY_MAX_MS).contains(&ms));
        }
    }

    #[test]
    fn test_apply_reply_appends_assistant_turn() {
        let mut s = session();
        let pending = s.submit_message("hi").unwrap();
        let outcome = s.apply_reply(&pending, Ok("Hello!".to_string()));
        assert_eq!(outcome, SubmitOutcome::Replied("Hello!".to_string()));
        assert_eq!(s.transcript().len(), 2);
        assert_eq!(s.transcript()[1].role, Role::Assistant);
        assert_eq!(s.transcript()[1].content, "Hello!");
    }

    #[test]
    fn test_apply_reply_error_degrades_to_canned_line() {
        let mut s = session();
        let pending = s.submit_message("hi").unwrap();
        let outcome = s.apply_reply(
            &pending,
            Err(ApiError::Backend("Error processing message".to_string())),
        );
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(s.transcript()[1].content, ASSISTANT_ERROR_LINE);
    }

    #[test]
    fn test_stale_reply_discarded_after_reset() {
        let mut s = session();
        let pending = s.submit_message("hi").unwrap();
        s.reset();
        let outcome = s.apply_reply(&pending, Ok("Too late".to_string()));
        assert_eq!(outcome, SubmitOutcome::Discarded);
        assert!(s.transcript().is_empty());
    }

    #[test]
    fn test_stale_reply_applied_when_guard_disabled() {
        let mut s = session();
        s.discard_stale_replies = false;
        let pending = s.submit_message("hi").unwrap();
        s.reset();
        let outcome = s.apply_reply(&pending, Ok("Late but kept".to_string()));
        assert_eq!(outcome, SubmitOutcome::Replied("Late but kept".to_string()));
        assert_eq!(s.transcript().len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut s = session();
        for i in 0..4 {
            let p = s.submit_message(&format!("msg {i}")).unwrap();
            s.apply_reply(&p, Ok("ok".to_string()));
        }
        assert_eq!(s.stage(), ButtonStage::Stage2);
        s.reset();
        assert!(s.transcript().is_empty());
        assert_eq!(s.stage(), ButtonStage::Hidden);
        assert!(!s.button_style().visible);
    }

    #[tokio::test]
    async fn test_initialize_seeds_from_existing_user_turns() {
        // Unreachable backend: the engine must come up on the fallback
        // policy with the seeded count applied.
        let client = BackendClient::new("http://127.0.0.1:1");
        let existing = vec![
            ChatTurn {
                role: Role::User,
                content: "one".to_string(),
            },
            ChatTurn {
                role: Role::Assistant,
                content: "reply".to_string(),
            },
            ChatTurn {
                role: Role::User,
                content: "two".to_string(),
            },
            ChatTurn {
                role: Role::User,
                content: "three".to_string(),
            },
            ChatTurn {
                role: Role::User,
                content: "four".to_string(),
            },
        ];
        let s = ChatSession::initialize(client, &existing).await;
        assert_eq!(s.transcript().len(), 5);
        assert!(matches!(s.engine.policy(), TriggerPolicy::Fallback));
        // Four user turns meet the fallback stage 1 threshold.
        assert_eq!(s.stage(), ButtonStage::Stage1);
    }

    #[test]
    fn test_reset_count_without_tracker() {
        let s = session();
        assert!(s.reset_count().is_none());
    }

    #[test]
    fn test_reset_records_into_tracker() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = ResetTracker::load(dir.path().join("resets.json"));
        let mut s = session().with_reset_tracker(tracker);
        s.reset();
        assert_eq!(s.reset_count(), Some(1));
        s.reset();
        s.reset();
        assert_eq!(s.reset_count(), Some(0));
    }
}

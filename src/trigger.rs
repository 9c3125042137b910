use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Fixed period for time-mode evaluation ticks.
pub const CLOCK_TICK: Duration = Duration::from_secs(30);

// Thresholds applied when the backend settings are unavailable. These differ
// from the configured defaults (5/10/15) on purpose; the extra-salience bounce
// kicks in later than stage 3 itself.
pub const FALLBACK_STAGE1_MESSAGES: u32 = 4;
pub const FALLBACK_STAGE2_MESSAGES: u32 = 8;
pub const FALLBACK_STAGE3_MESSAGES: u32 = 13;
pub const FALLBACK_BOUNCE_MESSAGES: u32 = 18;

// -- Settings ----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    Messages,
    Time,
}

impl TriggerMode {
    pub fn from_str_loose(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "messages" | "message" | "msg" => Ok(TriggerMode::Messages),
            "time" | "timer" => Ok(TriggerMode::Time),
            other => Err(format!("unknown trigger mode: {other}")),
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerMode::Messages => write!(f, "messages"),
            TriggerMode::Time => write!(f, "time"),
        }
    }
}

/// Staging thresholds as stored by the backend. Both threshold families are
/// always present on the wire; only the one selected by `trigger_type` is
/// consulted at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerSettings {
    pub trigger_type: TriggerMode,
    pub stage1_messages: u32,
    pub stage2_messages: u32,
    pub stage3_messages: u32,
    pub stage1_time: f64,
    pub stage2_time: f64,
    pub stage3_time: f64,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        TriggerSettings {
            trigger_type: TriggerMode::Messages,
            stage1_messages: 5,
            stage2_messages: 10,
            stage3_messages: 15,
            stage1_time: 2.0,
            stage2_time: 5.0,
            stage3_time: 8.0,
        }
    }
}

impl TriggerSettings {
    /// Checks the threshold family selected by `trigger_type`: every value
    /// positive, stages strictly increasing.
    pub fn validate(&self) -> Result<(), String> {
        match self.trigger_type {
            TriggerMode::Messages => {
                let (a, b, c) = (
                    self.stage1_messages,
                    self.stage2_messages,
                    self.stage3_messages,
                );
                if a == 0 {
                    return Err("stage 1 message threshold must be positive".to_string());
                }
                if !(a < b && b < c) {
                    return Err(format!(
                        "message thresholds must be strictly increasing, got {a}/{b}/{c}"
                    ));
                }
            }
            TriggerMode::Time => {
                let (a, b, c) = (self.stage1_time, self.stage2_time, self.stage3_time);
                if a <= 0.0 {
                    return Err("stage 1 time threshold must be positive".to_string());
                }
                if !(a < b && b < c) {
                    return Err(format!(
                        "time thresholds must be strictly increasing, got {a}/{b}/{c}"
                    ));
                }
            }
        }
        Ok(())
    }
}

// -- Stages and styling ------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ButtonStage {
    Hidden,
    Stage1,
    Stage2,
    Stage3,
}

impl ButtonStage {
    pub fn as_u8(self) -> u8 {
        match self {
            ButtonStage::Hidden => 0,
            ButtonStage::Stage1 => 1,
            ButtonStage::Stage2 => 2,
            ButtonStage::Stage3 => 3,
        }
    }
}

impl fmt::Display for ButtonStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Transparent,
    Dark,
    Accent,
}

impl Background {
    pub fn css(self) -> &'static str {
        match self {
            Background::Transparent => "transparent",
            Background::Dark => "#222",
            Background::Accent => "#FF8266",
        }
    }
}

/// What the host should render for the finish button right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonStyle {
    pub visible: bool,
    pub background: Background,
    pub bounce: bool,
}

impl ButtonStyle {
    fn hidden() -> Self {
        ButtonStyle {
            visible: false,
            background: Background::Transparent,
            bounce: false,
        }
    }
}

// -- Engine ------------------------------------------------------------------

/// Which threshold table drives the staging. `Fallback` is used when the
/// settings fetch fails or returns something malformed; it is message-based
/// regardless of what the backend might have intended.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerPolicy {
    Configured(TriggerSettings),
    Fallback,
}

impl TriggerPolicy {
    /// Degrades a settings fetch into a usable policy. Malformed settings are
    /// treated the same as a failed fetch.
    pub fn from_fetch(result: Result<TriggerSettings, crate::error::ApiError>) -> Self {
        match result {
            Ok(settings) => match settings.validate() {
                Ok(()) => TriggerPolicy::Configured(settings),
                Err(reason) => {
                    tracing::warn!(%reason, "trigger settings malformed, using fallback staging");
                    TriggerPolicy::Fallback
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "trigger settings unavailable, using fallback staging");
                TriggerPolicy::Fallback
            }
        }
    }
}

/// Monotonic staging state machine for the chat finish button. The stage only
/// ever moves forward; `reset` is the single way back to `Hidden`.
#[derive(Debug, Clone)]
pub struct TriggerEngine {
    policy: TriggerPolicy,
    message_count: u32,
    stage: ButtonStage,
    bounce_latched: bool,
    session_start: Instant,
}

impl TriggerEngine {
    pub fn new(policy: TriggerPolicy) -> Self {
        TriggerEngine {
            policy,
            message_count: 0,
            stage: ButtonStage::Hidden,
            bounce_latched: false,
            session_start: Instant::now(),
        }
    }

    /// Seeds the count from messages already on screen when the engine comes
    /// up mid-conversation, then evaluates once so the button state matches.
    pub fn initialize(policy: TriggerPolicy, existing_message_count: u32) -> Self {
        let mut engine = TriggerEngine::new(policy);
        engine.message_count = existing_message_count;
        engine.evaluate_messages();
        engine
    }

    pub fn policy(&self) -> &TriggerPolicy {
        &self.policy
    }

    pub fn message_count(&self) -> u32 {
        self.message_count
    }

    pub fn stage(&self) -> ButtonStage {
        self.stage
    }

    /// Called synchronously when the participant submits a message, before
    /// any network round-trip begins.
    pub fn on_message_submitted(&mut self) -> ButtonStage {
        self.message_count += 1;
        self.evaluate_messages();
        self.stage
    }

    /// Called every `CLOCK_TICK` by the host. Only meaningful in time mode.
    pub fn on_clock_tick(&mut self) -> ButtonStage {
        let elapsed_minutes = self.session_start.elapsed().as_secs_f64() / 60.0;
        self.evaluate_elapsed(elapsed_minutes)
    }

    /// Time-mode evaluation against an explicit elapsed duration, so hosts
    /// (and tests) can drive the clock themselves.
    pub fn evaluate_elapsed(&mut self, elapsed_minutes: f64) -> ButtonStage {
        if let TriggerPolicy::Configured(ref s) = self.policy {
            if s.trigger_type == TriggerMode::Time {
                let target = if elapsed_minutes >= s.stage3_time {
                    ButtonStage::Stage3
                } else if elapsed_minutes >= s.stage2_time {
                    ButtonStage::Stage2
                } else if elapsed_minutes >= s.stage1_time {
                    ButtonStage::Stage1
                } else {
                    ButtonStage::Hidden
                };
                self.advance_to(target);
            }
        }
        self.stage
    }

    pub fn reset(&mut self) {
        self.message_count = 0;
        self.stage = ButtonStage::Hidden;
        self.bounce_latched = false;
        self.session_start = Instant::now();
    }

    /// Pure mapping from the current state to the visual the host renders.
    pub fn style(&self) -> ButtonStyle {
        match (&self.policy, self.stage) {
            (_, ButtonStage::Hidden) => ButtonStyle::hidden(),
            (TriggerPolicy::Configured(_), ButtonStage::Stage1) => ButtonStyle {
                visible: true,
                background: Background::Dark,
                bounce: false,
            },
            (TriggerPolicy::Configured(_), ButtonStage::Stage2) => ButtonStyle {
                visible: true,
                background: Background::Accent,
                bounce: false,
            },
            (TriggerPolicy::Configured(_), ButtonStage::Stage3) => ButtonStyle {
                visible: true,
                background: Background::Accent,
                bounce: true,
            },
            (TriggerPolicy::Fallback, ButtonStage::Stage1) => ButtonStyle {
                visible: true,
                background: Background::Transparent,
                bounce: self.bounce_latched,
            },
            (TriggerPolicy::Fallback, ButtonStage::Stage2) => ButtonStyle {
                visible: true,
                background: Background::Dark,
                bounce: self.bounce_latched,
            },
            (TriggerPolicy::Fallback, ButtonStage::Stage3) => ButtonStyle {
                visible: true,
                background: Background::Accent,
                bounce: self.bounce_latched,
            },
        }
    }

    // Highest threshold first, so a seeded or jumped count lands on the right
    // stage in one pass.
    fn evaluate_messages(&mut self) {
        match &self.policy {
            TriggerPolicy::Configured(s) => {
                if s.trigger_type != TriggerMode::Messages {
                    return;
                }
                let target = if self.message_count >= s.stage3_messages {
                    ButtonStage::Stage3
                } else if self.message_count >= s.stage2_messages {
                    ButtonStage::Stage2
                } else if self.message_count >= s.stage1_messages {
                    ButtonStage::Stage1
                } else {
                    ButtonStage::Hidden
                };
                self.advance_to(target);
            }
            TriggerPolicy::Fallback => {
                if self.message_count >= FALLBACK_BOUNCE_MESSAGES {
                    self.bounce_latched = true;
                }
                let target = if self.message_count >= FALLBACK_STAGE3_MESSAGES {
                    ButtonStage::Stage3
                } else if self.message_count >= FALLBACK_STAGE2_MESSAGES {
                    ButtonStage::Stage2
                } else if self.message_count >= FALLBACK_STAGE1_MESSAGES {
                    ButtonStage::Stage1
                } else {
                    ButtonStage::Hidden
                };
                self.advance_to(target);
            }
        }
    }

    fn advance_to(&mut self, target: ButtonStage) {
        if target > self.stage {
            self.stage = target;
            tracing::debug!(stage = %self.stage, count = self.message_count, "button stage advanced");
        }
    }
}

use crate::trigger::{TriggerMode, TriggerSettings};
use serde::{Deserialize, Serialize};

/// Dashboard-managed study settings, stored by the backend as one flat
/// object. The trigger thresholds live here too; `trigger_settings` carves
/// them out for the staging engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlSettings {
    pub quit_url: String,
    pub redirect_url: String,
    pub quit_button_text: String,
    pub redirect_button_text: String,
    pub use_post_survey: bool,
    pub trigger_type: TriggerMode,
    pub stage1_messages: u32,
    pub stage2_messages: u32,
    pub stage3_messages: u32,
    pub stage1_time: f64,
    pub stage2_time: f64,
    pub stage3_time: f64,
    #[serde(default)]
    pub post_chat_popup_enabled: bool,
    #[serde(default = "default_popup_text")]
    pub post_chat_popup_text: String,
    #[serde(default = "default_popup_button1")]
    pub post_chat_popup_button1_text: String,
    #[serde(default = "default_popup_button2")]
    pub post_chat_popup_button2_text: String,
}

fn default_popup_text() -> String {
    "Please provide your feedback on the AI system:".to_string()
}

fn default_popup_button1() -> String {
    "Feedback to the AI that it is worthless --This system will then be permenantly deleted--"
        .to_string()
}

fn default_popup_button2() -> String {
    "Feedback to the AI that it is useful --This system will then be permenantly deleted--"
        .to_string()
}

impl Default for UrlSettings {
    fn default() -> Self {
        UrlSettings {
            quit_url: "https://www.prolific.com/".to_string(),
            redirect_url: "https://www.prolific.com/".to_string(),
            quit_button_text: "Quit Study".to_string(),
            redirect_button_text: "Continue to Survey".to_string(),
            use_post_survey: false,
            trigger_type: TriggerMode::Messages,
            stage1_messages: 5,
            stage2_messages: 10,
            stage3_messages: 15,
            stage1_time: 2.0,
            stage2_time: 5.0,
            stage3_time: 8.0,
            post_chat_popup_enabled: false,
            post_chat_popup_text: default_popup_text(),
            post_chat_popup_button1_text: default_popup_button1(),
            post_chat_popup_button2_text: default_popup_button2(),
        }
    }
}

impl UrlSettings {
    pub fn trigger_settings(&self) -> TriggerSettings {
        TriggerSettings {
            trigger_type: self.trigger_type,
            stage1_messages: self.stage1_messages,
            stage2_messages: self.stage2_messages,
            stage3_messages: self.stage3_messages,
            stage1_time: self.stage1_time,
            stage2_time: self.stage2_time,
            stage3_time: self.stage3_time,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [("quit_url", &self.quit_url), ("redirect_url", &self.redirect_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{name} must start with http:// or https://"));
            }
        }
        self.trigger_settings().validate()
    }
}

/// Countdown shown on the chat page, distinct from the time-based staging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub duration_minutes: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        TimerSettings {
            duration_minutes: 10,
        }
    }
}

impl TimerSettings {
    // Backend clamps to this range too.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=120).contains(&self.duration_minutes) {
            return Err(format!(
                "duration_minutes must be between 1 and 120, got {}",
                self.duration_minutes
            ));
        }
        Ok(())
    }
}

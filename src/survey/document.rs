use crate::survey::section::{SectionConfig, ValidationError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered section map keyed by `{kind}-{timestamp}` ids. Order is
/// presentation order, so it must survive serialization.
pub type SectionMap = IndexMap<String, SectionConfig>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformationBlock {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentBlock {
    pub content: String,
}

// The settings keys are camelCase on the wire, unlike the rest of the
// document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySettings {
    pub show_progress: bool,
    pub randomize_sections: bool,
    pub randomize_items: bool,
    pub completion_message: String,
}

impl Default for SurveySettings {
    fn default() -> Self {
        SurveySettings {
            show_progress: true,
            randomize_sections: false,
            randomize_items: false,
            completion_message: "Survey completed! Redirecting to chat...".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSurveySettings {
    pub show_progress: bool,
    pub randomize_sections: bool,
    pub randomize_items: bool,
}

impl Default for PostSurveySettings {
    fn default() -> Self {
        PostSurveySettings {
            show_progress: true,
            randomize_sections: false,
            randomize_items: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSettings {
    pub completion_popup_message: String,
    pub finish_button_text: String,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        CompletionSettings {
            completion_popup_message: "The study is now complete. Thank you for your \
                                       participation. If required, your completion code is: xxxx"
                .to_string(),
            finish_button_text: "Finish".to_string(),
        }
    }
}

/// Survey shown after the chat phase, stored nested inside the main document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSurveyDocument {
    pub enabled: bool,
    pub title: String,
    pub settings: PostSurveySettings,
    pub completion_settings: CompletionSettings,
    pub sections: SectionMap,
}

impl Default for PostSurveyDocument {
    fn default() -> Self {
        PostSurveyDocument {
            enabled: false,
            title: "Post-Interaction Survey".to_string(),
            settings: PostSurveySettings::default(),
            completion_settings: CompletionSettings::default(),
            sections: SectionMap::new(),
        }
    }
}

impl PostSurveyDocument {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_sections(&self.sections)
    }
}

/// The complete survey configuration as exchanged with the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyDocument {
    pub title: String,
    pub information: InformationBlock,
    pub consent: ConsentBlock,
    pub settings: SurveySettings,
    pub sections: SectionMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_survey: Option<PostSurveyDocument>,
}

impl Default for SurveyDocument {
    fn default() -> Self {
        SurveyDocument {
            title: "Survey Form".to_string(),
            information: InformationBlock {
                title: "Information and Consent Form".to_string(),
                content: String::new(),
            },
            consent: ConsentBlock {
                content: String::new(),
            },
            settings: SurveySettings::default(),
            sections: SectionMap::new(),
            post_survey: None,
        }
    }
}

impl SurveyDocument {
    /// Pre-save validation: first violation wins, walking sections in
    /// document order. Disabled sections are not checked.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_sections(&self.sections)
    }
}

fn validate_sections(sections: &SectionMap) -> Result<(), ValidationError> {
    if !sections.values().any(|s| s.enabled()) {
        return Err(ValidationError::NoEnabledSections);
    }
    for section in sections.values() {
        if !section.enabled() {
            continue;
        }
        section.validate()?;
    }
    Ok(())
}

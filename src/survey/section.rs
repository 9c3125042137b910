use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// -- Section kinds -----------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Demographics,
    Likert,
    Freetext,
    Checkbox,
    Dropdown,
    Slider,
    Image,
    Video,
    Pdf,
    Custom,
}

impl SectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Demographics => "demographics",
            SectionKind::Likert => "likert",
            SectionKind::Freetext => "freetext",
            SectionKind::Checkbox => "checkbox",
            SectionKind::Dropdown => "dropdown",
            SectionKind::Slider => "slider",
            SectionKind::Image => "image",
            SectionKind::Video => "video",
            SectionKind::Pdf => "pdf",
            SectionKind::Custom => "custom",
        }
    }

    pub fn from_str_loose(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "demographics" => Ok(SectionKind::Demographics),
            "likert" => Ok(SectionKind::Likert),
            "freetext" => Ok(SectionKind::Freetext),
            "checkbox" => Ok(SectionKind::Checkbox),
            "dropdown" => Ok(SectionKind::Dropdown),
            "slider" => Ok(SectionKind::Slider),
            "image" => Ok(SectionKind::Image),
            "video" => Ok(SectionKind::Video),
            "pdf" => Ok(SectionKind::Pdf),
            "custom" => Ok(SectionKind::Custom),
            other => Err(format!("unknown section kind: {other}")),
        }
    }

    /// Kind encoded in a section id of the form `{kind}-{timestamp}`.
    pub fn from_section_id(id: &str) -> Result<Self, String> {
        let prefix = id.split('-').next().unwrap_or("");
        SectionKind::from_str_loose(prefix)
    }

    pub fn all() -> [SectionKind; 10] {
        [
            SectionKind::Demographics,
            SectionKind::Likert,
            SectionKind::Freetext,
            SectionKind::Checkbox,
            SectionKind::Dropdown,
            SectionKind::Slider,
            SectionKind::Image,
            SectionKind::Video,
            SectionKind::Pdf,
            SectionKind::Custom,
        ]
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// -- Validation --------------------------------------------------------------

/// First-violation-wins validation failures. Display strings are the exact
/// messages shown to researchers in the dashboard, so they always name the
/// offending section by title.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("At least one survey section must be enabled and configured.")]
    NoEnabledSections,

    #[error("Likert section \"{title}\" must have scale labels defined.")]
    LikertMissingScaleLabels { title: String },

    #[error("Likert section \"{title}\" must have at least one item/statement.")]
    LikertNoItems { title: String },

    #[error("Slider section \"{title}\" must have a left label defined.")]
    SliderMissingLeftLabel { title: String },

    #[error("Slider section \"{title}\" must have a right label defined.")]
    SliderMissingRightLabel { title: String },

    #[error("Slider section \"{title}\" must have steps between 2 and 20.")]
    SliderStepsOutOfRange { title: String },

    #[error("Slider section \"{title}\" min value must be less than max value.")]
    SliderMinNotBelowMax { title: String },

    #[error("Checkbox section \"{title}\" must have at least one option.")]
    CheckboxNoOptions { title: String },

    #[error("Dropdown section \"{title}\" must have at least one option.")]
    DropdownNoOptions { title: String },

    #[error("Free text section \"{title}\" must have at least one question.")]
    FreetextNoQuestions { title: String },

    #[error("Demographics section \"{title}\" must have at least one field enabled.")]
    DemographicsNoFields { title: String },

    #[error("{kind_label} section \"{title}\" requires a response but has none configured.")]
    MediaResponseNotConfigured { kind_label: String, title: String },
}

// -- Demographics ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeField {
    pub enabled: bool,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderField {
    pub enabled: bool,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicFields {
    pub age: AgeField,
    pub gender: GenderField,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicsSection {
    pub enabled: bool,
    pub title: String,
    pub fields: DemographicFields,
}

impl DemographicsSection {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.fields.age.enabled && !self.fields.gender.enabled {
            return Err(ValidationError::DemographicsNoFields {
                title: self.title.clone(),
            });
        }
        Ok(())
    }
}

// -- Likert ------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LikertScaleType {
    #[serde(rename = "5-point-agreement")]
    FivePointAgreement,
    #[serde(rename = "5-point-frequency")]
    FivePointFrequency,
    #[serde(rename = "7-point-agreement")]
    SevenPointAgreement,
    #[serde(rename = "custom")]
    Custom,
}

impl LikertScaleType {
    /// Comma-joined label string for the predefined scales. `Custom` scales
    /// carry their labels in the section itself.
    pub fn predefined_labels(self) -> Option<&'static str> {
        match self {
            LikertScaleType::FivePointAgreement => {
                Some("Strongly Disagree,Disagree,Neutral,Agree,Strongly Agree")
            }
            LikertScaleType::FivePointFrequency => Some("Never,Rarely,Sometimes,Often,Always"),
            LikertScaleType::SevenPointAgreement => Some(
                "Strongly Disagree,Disagree,Somewhat Disagree,Neutral,Somewhat Agree,Agree,Strongly Agree",
            ),
            LikertScaleType::Custom => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikertSection {
    pub enabled: bool,
    pub title: String,
    #[serde(rename = "scaleType")]
    pub scale_type: LikertScaleType,
    #[serde(rename = "scaleLabels")]
    pub scale_labels: String,
    pub items: Vec<String>,
}

impl LikertSection {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.scale_labels.trim().is_empty() {
            return Err(ValidationError::LikertMissingScaleLabels {
                title: self.title.clone(),
            });
        }
        if self.items.is_empty() {
            return Err(ValidationError::LikertNoItems {
                title: self.title.clone(),
            });
        }
        Ok(())
    }
}

// -- Freetext ----------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreetextQuestion {
    pub question: String,
    pub rows: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreetextSection {
    pub enabled: bool,
    pub title: String,
    pub questions: Vec<FreetextQuestion>,
}

impl FreetextSection {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.questions.is_empty() {
            return Err(ValidationError::FreetextNoQuestions {
                title: self.title.clone(),
            });
        }
        Ok(())
    }
}

// -- Checkbox / dropdown -----------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckboxSection {
    pub enabled: bool,
    pub title: String,
    pub question: String,
    pub options: Vec<String>,
}

impl CheckboxSection {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.options.is_empty() {
            return Err(ValidationError::CheckboxNoOptions {
                title: self.title.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownSection {
    pub enabled: bool,
    pub title: String,
    pub question: String,
    pub required: bool,
    pub options: Vec<String>,
}

impl DropdownSection {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.options.is_empty() {
            return Err(ValidationError::DropdownNoOptions {
                title: self.title.clone(),
            });
        }
        Ok(())
    }
}

// -- Slider ------------------------------------------------------------------

/// The two slider sub-shapes share the wire object with their section; the
/// `slider_type` discriminant is always present, so flattening is safe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "slider_type", rename_all = "lowercase")]
pub enum SliderScale {
    Labels {
        left_label: String,
        right_label: String,
        steps: u32,
        default_value: i64,
    },
    Numeric {
        min_value: i64,
        max_value: i64,
        default_value: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderSection {
    pub enabled: bool,
    pub title: String,
    pub question: String,
    pub required: bool,
    #[serde(flatten)]
    pub scale: SliderScale,
}

impl SliderSection {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.scale {
            SliderScale::Labels {
                left_label,
                right_label,
                steps,
                ..
            } => {
                if left_label.trim().is_empty() {
                    return Err(ValidationError::SliderMissingLeftLabel {
                        title: self.title.clone(),
                    });
                }
                if right_label.trim().is_empty() {
                    return Err(ValidationError::SliderMissingRightLabel {
                        title: self.title.clone(),
                    });
                }
                if !(2..=20).contains(steps) {
                    return Err(ValidationError::SliderStepsOutOfRange {
                        title: self.title.clone(),
                    });
                }
            }
            SliderScale::Numeric {
                min_value,
                max_value,
                ..
            } => {
                if min_value >= max_value {
                    return Err(ValidationError::SliderMinNotBelowMax {
                        title: self.title.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

// -- Media (image / video / pdf) ---------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaResponseKind {
    Rating,
    Text,
    Checkbox,
    Confirmation,
}

/// Reference to an uploaded media file: `file_path` once the backend has
/// stored it, `file_name` while only selected locally.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl MediaFile {
    pub fn is_set(&self) -> bool {
        self.file_path.is_some() || self.file_name.is_some()
    }
}

/// Optional participant-response block shared by the media sections. The
/// per-kind detail fields stay flat on the wire, so they are plain options
/// here with a typed view on top.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaResponse {
    #[serde(default)]
    pub require_response: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<MediaResponseKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_text: Option<String>,
}

/// Normalized view of a configured media response with defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfiguredResponse<'a> {
    Rating { question: &'a str, scale: u32 },
    Text { question: &'a str, rows: u32 },
    Checkbox { question: &'a str, options: &'a [String] },
    Confirmation { text: &'a str },
}

impl MediaResponse {
    pub fn configured(&self) -> Option<ConfiguredResponse<'_>> {
        match self.response_type? {
            MediaResponseKind::Rating => Some(ConfiguredResponse::Rating {
                question: self.rating_question.as_deref()?,
                scale: self.rating_scale.unwrap_or(10),
            }),
            MediaResponseKind::Text => Some(ConfiguredResponse::Text {
                question: self.text_question.as_deref()?,
                rows: self.text_rows.unwrap_or(4),
            }),
            MediaResponseKind::Checkbox => Some(ConfiguredResponse::Checkbox {
                question: self.checkbox_question.as_deref()?,
                options: self.checkbox_options.as_deref().unwrap_or(&[]),
            }),
            MediaResponseKind::Confirmation => Some(ConfiguredResponse::Confirmation {
                text: self.confirmation_text.as_deref()?,
            }),
        }
    }

    fn validate(&self, kind_label: &str, title: &str) -> Result<(), ValidationError> {
        if self.require_response && self.configured().is_none() {
            return Err(ValidationError::MediaResponseNotConfigured {
                kind_label: kind_label.to_string(),
                title: title.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSection {
    pub enabled: bool,
    pub title: String,
    pub description: String,
    pub alt_text: String,
    pub display_size: String,
    pub alignment: String,
    #[serde(flatten)]
    pub file: MediaFile,
    #[serde(flatten)]
    pub response: MediaResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSection {
    pub enabled: bool,
    pub title: String,
    pub description: String,
    pub video_size: String,
    pub autoplay: bool,
    pub controls: bool,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(flatten)]
    pub file: MediaFile,
    #[serde(flatten)]
    pub response: MediaResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfSection {
    pub enabled: bool,
    pub title: String,
    pub description: String,
    pub display_height: String,
    pub display_mode: String,
    pub allow_download: bool,
    pub require_view: bool,
    #[serde(flatten)]
    pub file: MediaFile,
    #[serde(flatten)]
    pub response: MediaResponse,
}

// -- Custom ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub options: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSection {
    pub enabled: bool,
    pub title: String,
    pub description: String,
    pub fields: Vec<CustomField>,
}

// -- Tagged union ------------------------------------------------------------

/// One survey section as stored in the configuration document. The `type`
/// field on the wire selects the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SectionConfig {
    Demographics(DemographicsSection),
    Likert(LikertSection),
    Freetext(FreetextSection),
    Checkbox(CheckboxSection),
    Dropdown(DropdownSection),
    Slider(SliderSection),
    Image(ImageSection),
    Video(VideoSection),
    Pdf(PdfSection),
    Custom(CustomSection),
}

impl SectionConfig {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionConfig::Demographics(_) => SectionKind::Demographics,
            SectionConfig::Likert(_) => SectionKind::Likert,
            SectionConfig::Freetext(_) => SectionKind::Freetext,
            SectionConfig::Checkbox(_) => SectionKind::Checkbox,
            SectionConfig::Dropdown(_) => SectionKind::Dropdown,
            SectionConfig::Slider(_) => SectionKind::Slider,
            SectionConfig::Image(_) => SectionKind::Image,
            SectionConfig::Video(_) => SectionKind::Video,
            SectionConfig::Pdf(_) => SectionKind::Pdf,
            SectionConfig::Custom(_) => SectionKind::Custom,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            SectionConfig::Demographics(s) => s.enabled,
            SectionConfig::Likert(s) => s.enabled,
            SectionConfig::Freetext(s) => s.enabled,
            SectionConfig::Checkbox(s) => s.enabled,
            SectionConfig::Dropdown(s) => s.enabled,
            SectionConfig::Slider(s) => s.enabled,
            SectionConfig::Image(s) => s.enabled,
            SectionConfig::Video(s) => s.enabled,
            SectionConfig::Pdf(s) => s.enabled,
            SectionConfig::Custom(s) => s.enabled,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SectionConfig::Demographics(s) => &s.title,
            SectionConfig::Likert(s) => &s.title,
            SectionConfig::Freetext(s) => &s.title,
            SectionConfig::Checkbox(s) => &s.title,
            SectionConfig::Dropdown(s) => &s.title,
            SectionConfig::Slider(s) => &s.title,
            SectionConfig::Image(s) => &s.title,
            SectionConfig::Video(s) => &s.title,
            SectionConfig::Pdf(s) => &s.title,
            SectionConfig::Custom(s) => &s.title,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            SectionConfig::Demographics(s) => s.validate(),
            SectionConfig::Likert(s) => s.validate(),
            SectionConfig::Freetext(s) => s.validate(),
            SectionConfig::Checkbox(s) => s.validate(),
            SectionConfig::Dropdown(s) => s.validate(),
            SectionConfig::Slider(s) => s.validate(),
            SectionConfig::Image(s) => s.response.validate("Image", &s.title),
            SectionConfig::Video(s) => s.response.validate("Video", &s.title),
            SectionConfig::Pdf(s) => s.response.validate("PDF", &s.title),
            SectionConfig::Custom(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn likert(title: &str, labels: &str, items: &[&str]) -> SectionConfig {
        SectionConfig::Likert(LikertSection {
            enabled: true,
            title: title.to_string(),
            scale_type: LikertScaleType::FivePointAgreement,
            scale_labels: labels.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn test_kind_from_section_id() {
        assert_eq!(
            SectionKind::from_section_id("likert-1714378295000"),
            Ok(SectionKind::Likert)
        );
        assert_eq!(
            SectionKind::from_section_id("pdf-99"),
            Ok(SectionKind::Pdf)
        );
        assert!(SectionKind::from_section_id("banner-123").is_err());
    }

    #[test]
    fn test_kind_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&SectionKind::Demographics).unwrap(),
            r#""demographics""#
        );
    }

    #[test]
    fn test_section_tag_on_wire() {
        let section = likert("Attitudes", "A,B,C,D,E", &["Item one"]);
        let v: serde_json::Value = serde_json::to_value(&section).unwrap();
        assert_eq!(v["type"], "likert");
        assert_eq!(v["scaleType"], "5-point-agreement");
        assert_eq!(v["scaleLabels"], "A,B,C,D,E");
    }

    #[test]
    fn test_section_roundtrip() {
        let section = likert("Attitudes", "A,B,C", &["x", "y"]);
        let json = serde_json::to_string(&section).unwrap();
        let back: SectionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, section);
    }

    #[test]
    fn test_likert_scale_type_wire_names() {
        let t: LikertScaleType = serde_json::from_str(r#""7-point-agreement""#).unwrap();
        assert_eq!(t, LikertScaleType::SevenPointAgreement);
        assert_eq!(
            serde_json::to_string(&LikertScaleType::Custom).unwrap(),
            r#""custom""#
        );
    }

    #[test]
    fn test_predefined_labels() {
        assert_eq!(
            LikertScaleType::FivePointFrequency.predefined_labels(),
            Some("Never,Rarely,Sometimes,Often,Always")
        );
        assert!(LikertScaleType::Custom.predefined_labels().is_none());
    }

    #[test]
    fn test_likert_validation_messages() {
        let no_labels = likert("Attitudes", "  ", &["x"]);
        assert_eq!(
            no_labels.validate().unwrap_err().to_string(),
            "Likert section \"Attitudes\" must have scale labels defined."
        );
        let no_items = likert("Attitudes", "A,B", &[]);
        assert_eq!(
            no_items.validate().unwrap_err().to_string(),
            "Likert section \"Attitudes\" must have at least one item/statement."
        );
    }

    #[test]
    fn test_slider_labels_validation() {
        let mk = |left: &str, right: &str, steps: u32| {
            SectionConfig::Slider(SliderSection {
                enabled: true,
                title: "Rating Scale".to_string(),
                question: "Please rate using the slider:".to_string(),
                required: true,
                scale: SliderScale::Labels {
                    left_label: left.to_string(),
                    right_label: right.to_string(),
                    steps,
                    default_value: 4,
                },
            })
        };
        assert!(mk("Low", "High", 7).validate().is_ok());
        assert_eq!(
            mk("", "High", 7).validate().unwrap_err().to_string(),
            "Slider section \"Rating Scale\" must have a left label defined."
        );
        assert_eq!(
            mk("Low", " ", 7).validate().unwrap_err().to_string(),
            "Slider section \"Rating Scale\" must have a right label defined."
        );
        assert_eq!(
            mk("Low", "High", 1).validate().unwrap_err().to_string(),
            "Slider section \"Rating Scale\" must have steps between 2 and 20."
        );
        assert!(mk("Low", "High", 21).validate().is_err());
        assert!(mk("Low", "High", 2).validate().is_ok());
        assert!(mk("Low", "High", 20).validate().is_ok());
    }

    #[test]
    fn test_slider_numeric_validation() {
        let mk = |min: i64, max: i64| {
            SectionConfig::Slider(SliderSection {
                enabled: true,
                title: "Rating Scale".to_string(),
                question: "q".to_string(),
                required: false,
                scale: SliderScale::Numeric {
                    min_value: min,
                    max_value: max,
                    default_value: 50,
                },
            })
        };
        assert!(mk(0, 100).validate().is_ok());
        assert_eq!(
            mk(100, 100).validate().unwrap_err().to_string(),
            "Slider section \"Rating Scale\" min value must be less than max value."
        );
        assert!(mk(5, 1).validate().is_err());
    }

    #[test]
    fn test_slider_flatten_wire_shape() {
        let section = SliderSection {
            enabled: true,
            title: "Rating Scale".to_string(),
            question: "q".to_string(),
            required: true,
            scale: SliderScale::Labels {
                left_label: "Strongly Disagree".to_string(),
                right_label: "Strongly Agree".to_string(),
                steps: 7,
                default_value: 4,
            },
        };
        let v: serde_json::Value = serde_json::to_value(&section).unwrap();
        assert_eq!(v["slider_type"], "labels");
        assert_eq!(v["left_label"], "Strongly Disagree");
        assert_eq!(v["steps"], 7);
        // No nested object; the sub-shape lives flat on the section.
        assert!(v.get("scale").is_none());
    }

    #[test]
    fn test_slider_numeric_roundtrip() {
        let json = r#"{
            "type": "slider", "enabled": true, "title": "t", "question": "q",
            "required": false, "slider_type": "numeric",
            "min_value": -5, "max_value": 5, "default_value": 0
        }"#;
        let section: SectionConfig = serde_json::from_str(json).unwrap();
        match &section {
            SectionConfig::Slider(s) => assert_eq!(
                s.scale,
                SliderScale::Numeric {
                    min_value: -5,
                    max_value: 5,
                    default_value: 0
                }
            ),
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_checkbox_dropdown_validation() {
        let cb = SectionConfig::Checkbox(CheckboxSection {
            enabled: true,
            title: "Choices".to_string(),
            question: "q".to_string(),
            options: vec![],
        });
        assert_eq!(
            cb.validate().unwrap_err().to_string(),
            "Checkbox section \"Choices\" must have at least one option."
        );
        let dd = SectionConfig::Dropdown(DropdownSection {
            enabled: true,
            title: "Pick".to_string(),
            question: "q".to_string(),
            required: true,
            options: vec![],
        });
        assert_eq!(
            dd.validate().unwrap_err().to_string(),
            "Dropdown section \"Pick\" must have at least one option."
        );
    }

    #[test]
    fn test_freetext_validation() {
        let ft = SectionConfig::Freetext(FreetextSection {
            enabled: true,
            title: "Thoughts".to_string(),
            questions: vec![],
        });
        assert_eq!(
            ft.validate().unwrap_err().to_string(),
            "Free text section \"Thoughts\" must have at least one question."
        );
    }

    #[test]
    fn test_demographics_validation() {
        let mk = |age: bool, gender: bool| {
            SectionConfig::Demographics(DemographicsSection {
                enabled: true,
                title: "Demographics".to_string(),
                fields: DemographicFields {
                    age: AgeField {
                        enabled: age,
                        min: 18,
                        max: 99,
                    },
                    gender: GenderField {
                        enabled: gender,
                        options: vec!["Female".to_string(), "Male".to_string()],
                    },
                },
            })
        };
        assert!(mk(true, false).validate().is_ok());
        assert!(mk(false, true).validate().is_ok());
        assert_eq!(
            mk(false, false).validate().unwrap_err().to_string(),
            "Demographics section \"Demographics\" must have at least one field enabled."
        );
    }

    #[test]
    fn test_media_response_view_defaults() {
        let r = MediaResponse {
            require_response: true,
            response_type: Some(MediaResponseKind::Rating),
            rating_question: Some("How would you rate this image?".to_string()),
            ..MediaResponse::default()
        };
        assert_eq!(
            r.configured(),
            Some(ConfiguredResponse::Rating {
                question: "How would you rate this image?",
                scale: 10
            })
        );
    }

    #[test]
    fn test_media_response_required_but_unconfigured() {
        let section = SectionConfig::Image(ImageSection {
            enabled: true,
            title: "Stimulus".to_string(),
            description: String::new(),
            alt_text: "Image".to_string(),
            display_size: "medium".to_string(),
            alignment: "center".to_string(),
            file: MediaFile::default(),
            response: MediaResponse {
                require_response: true,
                ..MediaResponse::default()
            },
        });
        assert_eq!(
            section.validate().unwrap_err().to_string(),
            "Image section \"Stimulus\" requires a response but has none configured."
        );
    }

    #[test]
    fn test_media_response_not_required_passes() {
        let section = SectionConfig::Pdf(PdfSection {
            enabled: true,
            title: "Consent".to_string(),
            description: String::new(),
            display_height: "600".to_string(),
            display_mode: "embed".to_string(),
            allow_download: true,
            require_view: false,
            file: MediaFile::default(),
            response: MediaResponse::default(),
        });
        assert!(section.validate().is_ok());
    }

    #[test]
    fn test_media_file_fields_omitted_when_unset() {
        let section = ImageSection {
            enabled: true,
            title: "Stimulus".to_string(),
            description: String::new(),
            alt_text: "Image".to_string(),
            display_size: "medium".to_string(),
            alignment: "center".to_string(),
            file: MediaFile::default(),
            response: MediaResponse::default(),
        };
        let v: serde_json::Value = serde_json::to_value(&section).unwrap();
        assert!(v.get("file_path").is_none());
        assert!(v.get("file_name").is_none());
        assert_eq!(v["require_response"], false);
    }

    #[test]
    fn test_video_loop_keyword_rename() {
        let json = r#"{
            "type": "video", "enabled": true, "title": "Clip", "description": "",
            "video_size": "medium", "autoplay": false, "controls": true,
            "loop": true, "require_response": false
        }"#;
        let section: SectionConfig = serde_json::from_str(json).unwrap();
        match &section {
            SectionConfig::Video(v) => {
                assert!(v.loop_playback);
                assert!(v.video_url.is_none());
            }
            other => panic!("wrong variant: {other:?}"),
        }
        let v: serde_json::Value = serde_json::to_value(&section).unwrap();
        assert_eq!(v["loop"], true);
        assert!(v.get("loop_playback").is_none());
    }

    #[test]
    fn test_pdf_confirmation_response() {
        let json = r#"{
            "type": "pdf", "enabled": true, "title": "Info Sheet", "description": "",
            "display_height": "600", "display_mode": "embed",
            "allow_download": true, "require_view": true,
            "require_response": true, "response_type": "confirmation",
            "confirmation_text": "I have read and understood the document"
        }"#;
        let section: SectionConfig = serde_json::from_str(json).unwrap();
        assert!(section.validate().is_ok());
        match &section {
            SectionConfig::Pdf(p) => assert_eq!(
                p.response.configured(),
                Some(ConfiguredResponse::Confirmation {
                    text: "I have read and understood the document"
                })
            ),
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_custom_field_type_wire_name() {
        let section = SectionConfig::Custom(CustomSection {
            enabled: true,
            title: "Extra".to_string(),
            description: "misc".to_string(),
            fields: vec![CustomField {
                label: "Occupation".to_string(),
                field_type: "text".to_string(),
                options: String::new(),
                required: true,
            }],
        });
        let v: serde_json::Value = serde_json::to_value(&section).unwrap();
        assert_eq!(v["fields"][0]["type"], "text");
        assert!(v["fields"][0].get("field_type").is_none());
    }

    #[test]
    fn test_accessors() {
        let section = likert("Attitudes", "A,B", &["x"]);
        assert_eq!(section.kind(), SectionKind::Likert);
        assert!(section.enabled());
        assert_eq!(section.title(), "Attitudes");
    }
}

use crate::survey::document::{
    CompletionSettings, ConsentBlock, InformationBlock, PostSurveyDocument, PostSurveySettings,
    SurveyDocument, SurveySettings,
};
use crate::survey::section::{
    AgeField, CheckboxSection, CustomField, CustomSection, DemographicFields,
    DemographicsSection, DropdownSection, FreetextQuestion, FreetextSection, GenderField,
    ImageSection, LikertScaleType, LikertSection, MediaFile, MediaResponse, MediaResponseKind,
    PdfSection, SectionConfig, SectionKind, SliderScale, SliderSection, VideoSection,
};
use std::time::{SystemTime, UNIX_EPOCH};

// -- Per-kind form state -----------------------------------------------------
//
// Forms hold the raw editable state, blanks and all. Normalization (trimming
// blank rows, splitting option strings) happens only on collection.

#[derive(Debug, Clone, PartialEq)]
pub struct DemographicsForm {
    pub age_enabled: bool,
    pub age_min: u32,
    pub age_max: u32,
    pub gender_enabled: bool,
    /// Comma-separated, as typed.
    pub gender_options: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LikertForm {
    pub scale_type: LikertScaleType,
    pub scale_labels: String,
    pub items: Vec<String>,
}

impl LikertForm {
    /// Mirrors the dashboard behavior of swapping in the predefined label set
    /// when a non-custom scale type is chosen.
    pub fn set_scale_type(&mut self, scale_type: LikertScaleType) {
        self.scale_type = scale_type;
        if let Some(labels) = scale_type.predefined_labels() {
            self.scale_labels = labels.to_string();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FreetextQuestionForm {
    pub question: String,
    pub rows: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FreetextForm {
    pub questions: Vec<FreetextQuestionForm>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxForm {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropdownForm {
    pub question: String,
    pub required: bool,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderKind {
    Labels,
    Numeric,
}

/// Both sub-shapes are kept while editing; only the selected one is
/// collected.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderForm {
    pub question: String,
    pub required: bool,
    pub slider_kind: SliderKind,
    pub left_label: String,
    pub right_label: String,
    pub steps: u32,
    pub labels_default: i64,
    pub min_value: i64,
    pub max_value: i64,
    pub numeric_default: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaResponseForm {
    pub require_response: bool,
    pub response_type: MediaResponseKind,
    pub rating_question: String,
    pub rating_scale: u32,
    pub text_question: String,
    pub text_rows: u32,
    pub checkbox_question: String,
    /// One option per line, as typed.
    pub checkbox_options: String,
    pub confirmation_text: String,
}

impl MediaResponseForm {
    fn for_media(noun: &str) -> Self {
        MediaResponseForm {
            require_response: false,
            response_type: MediaResponseKind::Rating,
            rating_question: format!("How would you rate this {noun}?"),
            rating_scale: 10,
            text_question: format!("What are your thoughts about this {noun}?"),
            text_rows: 4,
            checkbox_question: format!("Select all that apply to this {noun}:"),
            checkbox_options: String::new(),
            confirmation_text: "I have read and understood the document".to_string(),
        }
    }

    fn collect(&self) -> MediaResponse {
        if !self.require_response {
            return MediaResponse::default();
        }
        let mut response = MediaResponse {
            require_response: true,
            response_type: Some(self.response_type),
            ..MediaResponse::default()
        };
        match self.response_type {
            MediaResponseKind::Rating => {
                response.rating_question = Some(self.rating_question.clone());
                response.rating_scale = Some(self.rating_scale);
            }
            MediaResponseKind::Text => {
                response.text_question = Some(self.text_question.clone());
                response.text_rows = Some(self.text_rows);
            }
            MediaResponseKind::Checkbox => {
                response.checkbox_question = Some(self.checkbox_question.clone());
                response.checkbox_options = Some(
                    self.checkbox_options
                        .split('\n')
                        .filter(|line| !line.trim().is_empty())
                        .map(|line| line.to_string())
                        .collect(),
                );
            }
            MediaResponseKind::Confirmation => {
                response.confirmation_text = Some(self.confirmation_text.clone());
            }
        }
        response
    }

    fn apply(&mut self, response: &MediaResponse) {
        self.require_response = response.require_response;
        if let Some(kind) = response.response_type {
            self.response_type = kind;
        }
        if let Some(q) = &response.rating_question {
            self.rating_question = q.clone();
        }
        if let Some(s) = response.rating_scale {
            self.rating_scale = s;
        }
        if let Some(q) = &response.text_question {
            self.text_question = q.clone();
        }
        if let Some(r) = response.text_rows {
            self.text_rows = r;
        }
        if let Some(q) = &response.checkbox_question {
            self.checkbox_question = q.clone();
        }
        if let Some(opts) = &response.checkbox_options {
            self.checkbox_options = opts.join("\n");
        }
        if let Some(t) = &response.confirmation_text {
            self.confirmation_text = t.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageForm {
    pub description: String,
    pub alt_text: String,
    pub display_size: String,
    pub alignment: String,
    pub file: MediaFile,
    pub response: MediaResponseForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSource {
    Upload,
    Url,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoForm {
    pub description: String,
    pub source: VideoSource,
    pub video_url: String,
    pub video_size: String,
    pub autoplay: bool,
    pub controls: bool,
    pub loop_playback: bool,
    pub file: MediaFile,
    pub response: MediaResponseForm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfForm {
    pub description: String,
    pub display_height: String,
    pub display_mode: String,
    pub allow_download: bool,
    pub require_view: bool,
    pub file: MediaFile,
    pub response: MediaResponseForm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomFieldForm {
    pub label: String,
    pub field_type: String,
    pub options: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomForm {
    pub description: String,
    pub fields: Vec<CustomFieldForm>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Demographics(DemographicsForm),
    Likert(LikertForm),
    Freetext(FreetextForm),
    Checkbox(CheckboxForm),
    Dropdown(DropdownForm),
    Slider(SliderForm),
    Image(ImageForm),
    Video(VideoForm),
    Pdf(PdfForm),
    Custom(CustomForm),
}

// -- Section form ------------------------------------------------------------

/// One editable section in the builder. `template` seeds each kind with the
/// same defaults a freshly added dashboard section shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionForm {
    pub id: String,
    pub enabled: bool,
    pub title: String,
    pub body: SectionBody,
}

impl SectionForm {
    pub fn template(kind: SectionKind, id: String) -> Self {
        let (title, body) = match kind {
            SectionKind::Demographics => (
                "Demographics",
                SectionBody::Demographics(DemographicsForm {
                    age_enabled: true,
                    age_min: 18,
                    age_max: 99,
                    gender_enabled: true,
                    gender_options: "Female,Male,Other,Prefer not to say".to_string(),
                }),
            ),
            SectionKind::Likert => (
                "Likert Scale Items",
                SectionBody::Likert(LikertForm {
                    scale_type: LikertScaleType::FivePointAgreement,
                    scale_labels: LikertScaleType::FivePointAgreement
                        .predefined_labels()
                        .unwrap_or_default()
                        .to_string(),
                    items: vec![
                        "I enjoy using technology.".to_string(),
                        "I feel comfortable sharing my opinions online.".to_string(),
                    ],
                }),
            ),
            SectionKind::Freetext => (
                "Free Form Text",
                SectionBody::Freetext(FreetextForm {
                    questions: vec![FreetextQuestionForm {
                        question: "Please describe your experience with online surveys:"
                            .to_string(),
                        rows: 4,
                    }],
                }),
            ),
            SectionKind::Checkbox => (
                "Multiple Choice Selection",
                SectionBody::Checkbox(CheckboxForm {
                    question: "Please select all that apply:".to_string(),
                    options: vec!["Option 1".to_string(), "Option 2".to_string()],
                }),
            ),
            SectionKind::Dropdown => (
                "Selection",
                SectionBody::Dropdown(DropdownForm {
                    question: "Please select an option:".to_string(),
                    required: true,
                    options: vec!["Option 1".to_string(), "Option 2".to_string()],
                }),
            ),
            SectionKind::Slider => (
                "Rating Scale",
                SectionBody::Slider(SliderForm {
                    question: "Please rate using the slider:".to_string(),
                    required: true,
                    slider_kind: SliderKind::Labels,
                    left_label: "Strongly Disagree".to_string(),
                    right_label: "Strongly Agree".to_string(),
                    steps: 7,
                    labels_default: 4,
                    min_value: 0,
                    max_value: 100,
                    numeric_default: 50,
                }),
            ),
            SectionKind::Image => (
                "Image Display",
                SectionBody::Image(ImageForm {
                    description: String::new(),
                    alt_text: "Image".to_string(),
                    display_size: "medium".to_string(),
                    alignment: "center".to_string(),
                    file: MediaFile::default(),
                    response: MediaResponseForm::for_media("image"),
                }),
            ),
            SectionKind::Video => (
                "Video Display",
                SectionBody::Video(VideoForm {
                    description: String::new(),
                    source: VideoSource::Upload,
                    video_url: String::new(),
                    video_size: "medium".to_string(),
                    autoplay: false,
                    controls: true,
                    loop_playback: false,
                    file: MediaFile::default(),
                    response: MediaResponseForm::for_media("video"),
                }),
            ),
            SectionKind::Pdf => (
                "PDF Display",
                SectionBody::Pdf(PdfForm {
                    description: String::new(),
                    display_height: "600".to_string(),
                    display_mode: "embed".to_string(),
                    allow_download: true,
                    require_view: false,
                    file: MediaFile::default(),
                    response: MediaResponseForm::for_media("document"),
                }),
            ),
            SectionKind::Custom => (
                "",
                SectionBody::Custom(CustomForm {
                    description: String::new(),
                    fields: Vec::new(),
                }),
            ),
        };
        SectionForm {
            id,
            enabled: true,
            title: title.to_string(),
            body,
        }
    }

    pub fn kind(&self) -> SectionKind {
        match &self.body {
            SectionBody::Demographics(_) => SectionKind::Demographics,
            SectionBody::Likert(_) => SectionKind::Likert,
            SectionBody::Freetext(_) => SectionKind::Freetext,
            SectionBody::Checkbox(_) => SectionKind::Checkbox,
            SectionBody::Dropdown(_) => SectionKind::Dropdown,
            SectionBody::Slider(_) => SectionKind::Slider,
            SectionBody::Image(_) => SectionKind::Image,
            SectionBody::Video(_) => SectionKind::Video,
            SectionBody::Pdf(_) => SectionKind::Pdf,
            SectionBody::Custom(_) => SectionKind::Custom,
        }
    }

    /// Normalizes the raw form state into the wire shape. Blank items,
    /// options, questions, and unlabeled custom fields are dropped here.
    pub fn collect(&self) -> SectionConfig {
        let enabled = self.enabled;
        let title = self.title.clone();
        match &self.body {
            SectionBody::Demographics(f) => SectionConfig::Demographics(DemographicsSection {
                enabled,
                title,
                fields: DemographicFields {
                    age: AgeField {
                        enabled: f.age_enabled,
                        min: f.age_min,
                        max: f.age_max,
                    },
                    gender: GenderField {
                        enabled: f.gender_enabled,
                        options: f
                            .gender_options
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .collect(),
                    },
                },
            }),
            SectionBody::Likert(f) => SectionConfig::Likert(LikertSection {
                enabled,
                title,
                scale_type: f.scale_type,
                scale_labels: f.scale_labels.clone(),
                items: f
                    .items
                    .iter()
                    .filter(|item| !item.trim().is_empty())
                    .map(|item| item.trim().to_string())
                    .collect(),
            }),
            SectionBody::Freetext(f) => SectionConfig::Freetext(FreetextSection {
                enabled,
                title,
                questions: f
                    .questions
                    .iter()
                    .filter(|q| !q.question.trim().is_empty())
                    .map(|q| FreetextQuestion {
                        question: q.question.trim().to_string(),
                        rows: q.rows,
                    })
                    .collect(),
            }),
            SectionBody::Checkbox(f) => SectionConfig::Checkbox(CheckboxSection {
                enabled,
                title,
                question: f.question.clone(),
                options: collect_options(&f.options),
            }),
            SectionBody::Dropdown(f) => SectionConfig::Dropdown(DropdownSection {
                enabled,
                title,
                question: f.question.clone(),
                required: f.required,
                options: collect_options(&f.options),
            }),
            SectionBody::Slider(f) => SectionConfig::Slider(SliderSection {
                enabled,
                title,
                question: f.question.clone(),
                required: f.required,
                scale: match f.slider_kind {
                    SliderKind::Labels => SliderScale::Labels {
                        left_label: f.left_label.clone(),
                        right_label: f.right_label.clone(),
                        steps: f.steps,
                        default_value: f.labels_default,
                    },
                    SliderKind::Numeric => SliderScale::Numeric {
                        min_value: f.min_value,
                        max_value: f.max_value,
                        default_value: f.numeric_default,
                    },
                },
            }),
            SectionBody::Image(f) => SectionConfig::Image(ImageSection {
                enabled,
                title,
                description: f.description.clone(),
                alt_text: f.alt_text.clone(),
                display_size: f.display_size.clone(),
                alignment: f.alignment.clone(),
                file: f.file.clone(),
                response: f.response.collect(),
            }),
            SectionBody::Video(f) => {
                let (video_url, file) = match f.source {
                    VideoSource::Url => (Some(f.video_url.clone()), MediaFile::default()),
                    VideoSource::Upload => (None, f.file.clone()),
                };
                SectionConfig::Video(VideoSection {
                    enabled,
                    title,
                    description: f.description.clone(),
                    video_size: f.video_size.clone(),
                    autoplay: f.autoplay,
                    controls: f.controls,
                    loop_playback: f.loop_playback,
                    video_url,
                    file,
                    response: f.response.collect(),
                })
            }
            SectionBody::Pdf(f) => SectionConfig::Pdf(PdfSection {
                enabled,
                title,
                description: f.description.clone(),
                display_height: f.display_height.clone(),
                display_mode: f.display_mode.clone(),
                allow_download: f.allow_download,
                require_view: f.require_view,
                file: f.file.clone(),
                response: f.response.collect(),
            }),
            SectionBody::Custom(f) => SectionConfig::Custom(CustomSection {
                enabled,
                title,
                description: f.description.clone(),
                fields: f
                    .fields
                    .iter()
                    .filter(|field| !field.label.trim().is_empty())
                    .map(|field| CustomField {
                        label: field.label.trim().to_string(),
                        field_type: field.field_type.clone(),
                        options: field.options.clone(),
                        required: field.required,
                    })
                    .collect(),
            }),
        }
    }

    /// Inverse of `collect`: start from the template for the stored kind and
    /// overwrite it with the document payload.
    pub fn from_config(id: &str, config: &SectionConfig) -> Self {
        let mut form = SectionForm::template(config.kind(), id.to_string());
        form.enabled = config.enabled();
        form.title = config.title().to_string();
        match (&mut form.body, config) {
            (SectionBody::Demographics(f), SectionConfig::Demographics(s)) => {
                f.age_enabled = s.fields.age.enabled;
                f.age_min = s.fields.age.min;
                f.age_max = s.fields.age.max;
                f.gender_enabled = s.fields.gender.enabled;
                f.gender_options = s.fields.gender.options.join(", ");
            }
            (SectionBody::Likert(f), SectionConfig::Likert(s)) => {
                f.scale_type = s.scale_type;
                f.scale_labels = s.scale_labels.clone();
                f.items = s.items.clone();
            }
            (SectionBody::Freetext(f), SectionConfig::Freetext(s)) => {
                f.questions = s
                    .questions
                    .iter()
                    .map(|q| FreetextQuestionForm {
                        question: q.question.clone(),
                        rows: q.rows,
                    })
                    .collect();
            }
            (SectionBody::Checkbox(f), SectionConfig::Checkbox(s)) => {
                f.question = s.question.clone();
                f.options = s.options.clone();
            }
            (SectionBody::Dropdown(f), SectionConfig::Dropdown(s)) => {
                f.question = s.question.clone();
                f.required = s.required;
                f.options = s.options.clone();
            }
            (SectionBody::Slider(f), SectionConfig::Slider(s)) => {
                f.question = s.question.clone();
                f.required = s.required;
                match &s.scale {
                    SliderScale::Labels {
                        left_label,
                        right_label,
                        steps,
                        default_value,
                    } => {
                        f.slider_kind = SliderKind::Labels;
                        f.left_label = left_label.clone();
                        f.right_label = right_label.clone();
                        f.steps = *steps;
                        f.labels_default = *default_value;
                    }
                    SliderScale::Numeric {
                        min_value,
                        max_value,
                        default_value,
                    } => {
                        f.slider_kind = SliderKind::Numeric;
                        f.min_value = *min_value;
                        f.max_value = *max_value;
                        f.numeric_default = *default_value;
                    }
                }
            }
            (SectionBody::Image(f), SectionConfig::Image(s)) => {
                f.description = s.description.clone();
                f.alt_text = s.alt_text.clone();
                f.display_size = s.display_size.clone();
                f.alignment = s.alignment.clone();
                f.file = s.file.clone();
                f.response.apply(&s.response);
            }
            (SectionBody::Video(f), SectionConfig::Video(s)) => {
                f.description = s.description.clone();
                f.video_size = s.video_size.clone();
                f.autoplay = s.autoplay;
                f.controls = s.controls;
                f.loop_playback = s.loop_playback;
                if let Some(url) = &s.video_url {
                    f.source = VideoSource::Url;
                    f.video_url = url.clone();
                } else {
                    f.source = VideoSource::Upload;
                    f.file = s.file.clone();
                }
                f.response.apply(&s.response);
            }
            (SectionBody::Pdf(f), SectionConfig::Pdf(s)) => {
                f.description = s.description.clone();
                f.display_height = s.display_height.clone();
                f.display_mode = s.display_mode.clone();
                f.allow_download = s.allow_download;
                f.require_view = s.require_view;
                f.file = s.file.clone();
                f.response.apply(&s.response);
            }
            (SectionBody::Custom(f), SectionConfig::Custom(s)) => {
                f.description = s.description.clone();
                f.fields = s
                    .fields
                    .iter()
                    .map(|field| CustomFieldForm {
                        label: field.label.clone(),
                        field_type: field.field_type.clone(),
                        options: field.options.clone(),
                        required: field.required,
                    })
                    .collect();
            }
            // template(kind) guarantees the body variant matches the config
            _ => unreachable!("section body variant mismatch"),
        }
        form
    }
}

fn collect_options(raw: &[String]) -> Vec<String> {
    raw.iter()
        .filter(|opt| !opt.trim().is_empty())
        .map(|opt| opt.trim().to_string())
        .collect()
}

// -- Editors -----------------------------------------------------------------

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Default)]
struct IdGenerator {
    last_millis: u64,
}

impl IdGenerator {
    // Sections added within the same millisecond still get distinct ids.
    fn next(&mut self, kind: SectionKind) -> String {
        let millis = now_millis().max(self.last_millis + 1);
        self.last_millis = millis;
        format!("{}-{}", kind.as_str(), millis)
    }
}

/// In-memory model of the main survey builder. Holds raw form state and
/// turns it into a `SurveyDocument` on demand.
#[derive(Debug)]
pub struct SurveyEditor {
    pub title: String,
    pub information: InformationBlock,
    pub consent: ConsentBlock,
    pub settings: SurveySettings,
    forms: Vec<SectionForm>,
    ids: IdGenerator,
}

impl Default for SurveyEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyEditor {
    pub fn new() -> Self {
        let doc = SurveyDocument::default();
        SurveyEditor {
            title: doc.title,
            information: doc.information,
            consent: doc.consent,
            settings: doc.settings,
            forms: Vec::new(),
            ids: IdGenerator::default(),
        }
    }

    /// Appends a fresh section seeded with the kind's template defaults and
    /// returns its id.
    pub fn add_section(&mut self, kind: SectionKind) -> String {
        let id = self.ids.next(kind);
        self.forms.push(SectionForm::template(kind, id.clone()));
        id
    }

    pub fn remove_section(&mut self, id: &str) -> bool {
        let before = self.forms.len();
        self.forms.retain(|f| f.id != id);
        self.forms.len() != before
    }

    pub fn forms(&self) -> &[SectionForm] {
        &self.forms
    }

    pub fn form_mut(&mut self, id: &str) -> Option<&mut SectionForm> {
        self.forms.iter_mut().find(|f| f.id == id)
    }

    /// Builds the document in form order, leaving out disabled sections.
    pub fn collect(&self) -> SurveyDocument {
        let mut doc = SurveyDocument {
            title: self.title.clone(),
            information: self.information.clone(),
            consent: self.consent.clone(),
            settings: self.settings.clone(),
            ..SurveyDocument::default()
        };
        for form in &self.forms {
            if !form.enabled {
                continue;
            }
            doc.sections.insert(form.id.clone(), form.collect());
        }
        doc
    }

    /// Replaces the editor state with the given document. Disabled entries
    /// (which a collector never produces) are skipped.
    pub fn load(&mut self, doc: &SurveyDocument) {
        self.title = doc.title.clone();
        self.information = doc.information.clone();
        self.consent = doc.consent.clone();
        self.settings = doc.settings.clone();
        self.forms.clear();
        for (id, section) in &doc.sections {
            if !section.enabled() {
                continue;
            }
            self.forms.push(SectionForm::from_config(id, section));
        }
    }
}

/// Builder for the post-chat survey, collected into the `post_survey` block
/// of the main document.
#[derive(Debug)]
pub struct PostSurveyEditor {
    pub enabled: bool,
    pub title: String,
    pub settings: PostSurveySettings,
    pub completion_settings: CompletionSettings,
    forms: Vec<SectionForm>,
    ids: IdGenerator,
}

impl Default for PostSurveyEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl PostSurveyEditor {
    pub fn new() -> Self {
        let doc = PostSurveyDocument::default();
        PostSurveyEditor {
            enabled: doc.enabled,
            title: doc.title,
            settings: doc.settings,
            completion_settings: doc.completion_settings,
            forms: Vec::new(),
            ids: IdGenerator::default(),
        }
    }

    pub fn add_section(&mut self, kind: SectionKind) -> String {
        let id = self.ids.next(kind);
        self.forms.push(SectionForm::template(kind, id.clone()));
        id
    }

    pub fn remove_section(&mut self, id: &str) -> bool {
        let before = self.forms.len();
        self.forms.retain(|f| f.id != id);
        self.forms.len() != before
    }

    pub fn forms(&self) -> &[SectionForm] {
        &self.forms
    }

    pub fn form_mut(&mut self, id: &str) -> Option<&mut SectionForm> {
        self.forms.iter_mut().find(|f| f.id == id)
    }

    pub fn collect(&self) -> PostSurveyDocument {
        let mut doc = PostSurveyDocument {
            enabled: self.enabled,
            title: self.title.clone(),
            settings: self.settings.clone(),
            completion_settings: self.completion_settings.clone(),
            sections: Default::default(),
        };
        for form in &self.forms {
            if !form.enabled {
                continue;
            }
            doc.sections.insert(form.id.clone(), form.collect());
        }
        doc
    }

    pub fn load(&mut self, doc: &PostSurveyDocument) {
        self.enabled = doc.enabled;
        self.title = doc.title.clone();
        self.settings = doc.settings.clone();
        self.completion_settings = doc.completion_settings.clone();
        self.forms.clear();
        for (id, section) in &doc.sections {
            if !section.enabled() {
                continue;
            }
            self.forms.push(SectionForm::from_config(id, section));
        }
    }
}

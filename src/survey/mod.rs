//! Survey configuration model: typed section templates, the builder/editor
//! state, and the JSON document exchanged with the backend.

pub mod document;
pub mod editor;
pub mod section;

pub use document::{
    CompletionSettings, ConsentBlock, InformationBlock, PostSurveyDocument, PostSurveySettings,
    SectionMap, SurveyDocument, SurveySettings,
};
pub use editor::{PostSurveyEditor, SectionBody, SectionForm, SurveyEditor};
pub use section::{SectionConfig, SectionKind, ValidationError};

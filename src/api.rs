use crate::error::ApiError;
use crate::settings::{TimerSettings, UrlSettings};
use crate::survey::{PostSurveyDocument, SurveyDocument};
use crate::trigger::TriggerSettings;
use reqwest::multipart;
use serde::{Deserialize, Serialize};

// -- Wire types --------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaveReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    file_path: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// Agent mutations answer `{message}` on success, `{error}` otherwise.
#[derive(Debug, Deserialize)]
struct MessageReply {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl MessageReply {
    fn into_result(self, endpoint: &str) -> Result<String, ApiError> {
        match (self.message, self.error) {
            (Some(message), _) => Ok(message),
            (None, Some(error)) => Err(ApiError::Backend(error)),
            (None, None) => Err(ApiError::malformed(endpoint, "neither message nor error")),
        }
    }
}

/// Sampling configuration stored in an agent's JSON file. `PrePrompt` keeps
/// its historical wire casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub n: Option<u32>,
    #[serde(default)]
    pub presence_penalty: Option<f64>,
    #[serde(default)]
    pub frequency_penalty: Option<f64>,
    #[serde(default)]
    pub max_completion_tokens: Option<u32>,
    #[serde(rename = "PrePrompt", default)]
    pub pre_prompt: Option<String>,
    /// Set by the backend when the agent file could not be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentStatus {
    pub agent_name: String,
    pub password: String,
    pub is_active: bool,
    pub config: AgentConfig,
}

#[derive(Debug, Deserialize)]
struct AgentsReply {
    #[serde(default)]
    agents: Option<Vec<AgentStatus>>,
    #[serde(default)]
    error: Option<String>,
}

/// Parameters for a new agent condition. Serialized flat into the agent's
/// JSON file by the backend, keyed by `filename`.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSpec {
    pub filename: String,
    #[serde(rename = "PrePrompt")]
    pub pre_prompt: String,
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub n: u32,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
    pub max_completion_tokens: u32,
}

// -- Client ------------------------------------------------------------------

/// HTTP client for the study backend. One instance per backend; all calls
/// borrow it.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        BackendClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                endpoint: path.to_string(),
                status: response.status(),
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Ok(response.json::<T>().await?)
    }

    // -- settings --

    pub async fn get_trigger_settings(&self) -> Result<TriggerSettings, ApiError> {
        self.get_json("/get-trigger-settings").await
    }

    pub async fn get_timer_settings(&self) -> Result<TimerSettings, ApiError> {
        self.get_json("/get-timer-settings").await
    }

    pub async fn get_url_settings(&self) -> Result<UrlSettings, ApiError> {
        self.get_json("/get-url-settings").await
    }

    pub async fn update_url_settings(&self, settings: &UrlSettings) -> Result<(), ApiError> {
        let reply: SaveReply = self.post_json("/update-url-settings", settings).await?;
        if reply.success {
            Ok(())
        } else {
            Err(ApiError::Backend(
                reply.error.unwrap_or_else(|| "update rejected".to_string()),
            ))
        }
    }

    /// The backend has no partial update, so mutations re-fetch the full
    /// settings object, apply the closure, and send the whole thing back.
    pub async fn modify_url_settings<F>(&self, mutate: F) -> Result<UrlSettings, ApiError>
    where
        F: FnOnce(&mut UrlSettings),
    {
        let mut settings = self.get_url_settings().await?;
        mutate(&mut settings);
        self.update_url_settings(&settings).await?;
        Ok(settings)
    }

    // -- chat --

    /// Sends one participant message; the backend answers with the
    /// assistant's reply text.
    pub async fn send_chat_message(&self, message: &str) -> Result<String, ApiError> {
        let form = multipart::Form::new().text("message", message.to_string());
        let response = self
            .client
            .post(self.url("/chat"))
            .multipart(form)
            .send()
            .await?;
        let reply: ChatReply = response.json().await?;
        match (reply.response, reply.error) {
            (Some(text), _) => Ok(text),
            (None, Some(error)) => Err(ApiError::Backend(error)),
            (None, None) => Err(ApiError::malformed("/chat", "neither response nor error")),
        }
    }

    // -- survey configuration --

    /// `None` means no configuration has been saved yet.
    pub async fn get_survey_config(&self) -> Result<Option<SurveyDocument>, ApiError> {
        self.get_json("/get-survey-config").await
    }

    pub async fn save_survey_config(&self, doc: &SurveyDocument) -> Result<(), ApiError> {
        let reply: SaveReply = self.post_json("/save-survey-config", doc).await?;
        if reply.success {
            Ok(())
        } else {
            Err(ApiError::Backend(
                reply.error.unwrap_or_else(|| "save rejected".to_string()),
            ))
        }
    }

    /// Stores the post-survey block by rewriting the whole saved document,
    /// starting from a default one when nothing is saved yet.
    pub async fn save_post_survey_config(
        &self,
        post: &PostSurveyDocument,
    ) -> Result<(), ApiError> {
        let mut doc = self.get_survey_config().await?.unwrap_or_default();
        doc.post_survey = Some(post.clone());
        self.save_survey_config(&doc).await
    }

    pub async fn preview_survey(&self, doc: &SurveyDocument) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/preview-survey"))
            .json(doc)
            .send()
            .await?;
        Ok(response.text().await?)
    }

    pub async fn preview_post_survey(
        &self,
        post: &PostSurveyDocument,
    ) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/preview-post-survey"))
            .json(post)
            .send()
            .await?;
        Ok(response.text().await?)
    }

    /// Uploads a media file for a survey section and returns the stored
    /// path to reference from the section config.
    pub async fn upload_survey_media(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        media_type: &str,
        section_id: &str,
    ) -> Result<String, ApiError> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new()
            .part("file", part)
            .text("media_type", media_type.to_string())
            .text("section_id", section_id.to_string());
        let response = self
            .client
            .post(self.url("/upload-survey-media"))
            .multipart(form)
            .send()
            .await?;
        let reply: UploadReply = response.json().await?;
        if reply.success {
            reply
                .file_path
                .ok_or_else(|| ApiError::malformed("/upload-survey-media", "success without file_path"))
        } else {
            Err(ApiError::Backend(
                reply.error.unwrap_or_else(|| "upload rejected".to_string()),
            ))
        }
    }

    // -- agent management --

    pub async fn get_agents_with_status(&self) -> Result<Vec<AgentStatus>, ApiError> {
        let reply: AgentsReply = self.get_json("/get-agents-with-status").await?;
        match (reply.agents, reply.error) {
            (Some(agents), _) => Ok(agents),
            (None, Some(error)) => Err(ApiError::Backend(error)),
            (None, None) => Err(ApiError::malformed(
                "/get-agents-with-status",
                "neither agents nor error",
            )),
        }
    }

    pub async fn create_agent(&self, spec: &AgentSpec) -> Result<String, ApiError> {
        let reply: MessageReply = self.post_json("/create-json", spec).await?;
        reply.into_result("/create-json")
    }

    pub async fn assign_password(&self, agent: &str, password: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({ "password": password, "agent": agent });
        let reply: MessageReply = self.post_json("/update-passwords", &body).await?;
        reply.into_result("/update-passwords")
    }

    pub async fn set_agent_active(
        &self,
        password: &str,
        is_active: bool,
    ) -> Result<String, ApiError> {
        let body = serde_json::json!({ "password": password, "is_active": is_active });
        let reply: MessageReply = self.post_json("/update-agent-status", &body).await?;
        reply.into_result("/update-agent-status")
    }

    pub async fn delete_agent(&self, password: &str, agent_name: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({ "password": password, "agent_name": agent_name });
        let reply: MessageReply = self.post_json("/delete-agent", &body).await?;
        reply.into_result("/delete-agent")
    }
}

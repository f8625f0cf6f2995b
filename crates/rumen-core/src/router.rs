//! Task routing.
//!
//! A task-type tag selects one of two backends and how the query is framed for it:
//!
//! | Task type | Backend | Framing |
//! |-----------|---------|---------|
//! | `bioinformatics-and-pipeline-design` | Claude | bioinformatics system instruction |
//! | `statistical-analysis` | Claude | statistics system instruction |
//! | `literature-and-interpretation` | Gemini | query wrapped in the interpretation template |
//!
//! Each accepted request makes exactly one backend call. Unknown tags and empty
//! queries come back as [`TaskOutcome::Rejected`] without touching a backend.

use crate::config::RumenConfig;
use crate::credentials::{CredentialSet, CredentialsError, Provider};
use crate::prompts::{self, StudyContext};
use rumen_abstraction::{ChatMessage, Model, ModelError, ModelParameters, ModelUsage};
use rumen_models::{MockModel, ModelConfig, ModelFactory, ModelType};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// The closed set of task types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    /// Pipeline and general bioinformatics questions.
    BioinformaticsAndPipelineDesign,
    /// Literature context and biological interpretation.
    LiteratureAndInterpretation,
    /// Statistical design questions.
    StatisticalAnalysis,
}

impl TaskType {
    /// Every task type, in display order.
    pub const ALL: [Self; 3] =
        [Self::BioinformaticsAndPipelineDesign, Self::LiteratureAndInterpretation, Self::StatisticalAnalysis];

    /// Canonical tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BioinformaticsAndPipelineDesign => "bioinformatics-and-pipeline-design",
            Self::LiteratureAndInterpretation => "literature-and-interpretation",
            Self::StatisticalAnalysis => "statistical-analysis",
        }
    }

    /// Short alias accepted on the command line.
    #[must_use]
    pub fn alias(self) -> &'static str {
        match self {
            Self::BioinformaticsAndPipelineDesign => "bioinformatics",
            Self::LiteratureAndInterpretation => "literature",
            Self::StatisticalAnalysis => "analysis",
        }
    }

    /// The fixed route for this task type.
    #[must_use]
    pub fn route(self) -> Route {
        match self {
            Self::BioinformaticsAndPipelineDesign => Route {
                backend: BackendKind::Claude,
                framing: Framing::SystemInstruction(prompts::BIOINFORMATICS_SYSTEM),
            },
            Self::StatisticalAnalysis => Route {
                backend: BackendKind::Claude,
                framing: Framing::SystemInstruction(prompts::STATISTICS_SYSTEM),
            },
            Self::LiteratureAndInterpretation => {
                Route { backend: BackendKind::Gemini, framing: Framing::InterpretationTemplate }
            }
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted || t.alias() == wanted)
            .ok_or_else(|| Rejection::UnknownTaskType { given: s.to_string() })
    }
}

/// The two backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Backend A: chat messages plus a separate system instruction.
    Claude,
    /// Backend B: one combined prompt, no system channel.
    Gemini,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Claude => "claude",
            Self::Gemini => "gemini",
        })
    }
}

/// How a query is shaped before it reaches its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Query unchanged; instruction sent through the system channel.
    SystemInstruction(&'static str),
    /// Query wrapped in the literature interpretation template.
    InterpretationTemplate,
}

/// Backend and framing chosen for a task type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Backend that serves the task.
    pub backend: BackendKind,
    /// Framing applied to the query.
    pub framing: Framing,
}

/// A request ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedRequest {
    /// Role-tagged messages for a chat backend.
    Chat {
        /// Backend to call.
        backend: BackendKind,
        /// System instruction followed by the user message.
        messages: Vec<ChatMessage>,
    },
    /// One undivided prompt.
    Prompt {
        /// Backend to call.
        backend: BackendKind,
        /// Full prompt text.
        text: String,
    },
}

impl PreparedRequest {
    /// Backend this request goes to.
    #[must_use]
    pub fn backend(&self) -> BackendKind {
        match self {
            Self::Chat { backend, .. } | Self::Prompt { backend, .. } => *backend,
        }
    }
}

/// Why a request was not sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// The tag is not one of the known task types.
    UnknownTaskType {
        /// The tag as given.
        given: String,
    },
    /// The query was empty or whitespace.
    EmptyQuery,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid = TaskType::ALL.iter().map(|t| format!("'{}'", t.as_str())).collect::<Vec<_>>().join(", ");
        match self {
            Self::UnknownTaskType { given } => {
                write!(f, "Error: task_type must be one of {valid} (got '{given}')")
            }
            Self::EmptyQuery => write!(f, "Error: query must not be empty"),
        }
    }
}

/// A backend reply.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    /// Task type that was served.
    pub task_type: TaskType,
    /// Backend that answered.
    pub backend: BackendKind,
    /// Reply text.
    pub text: String,
    /// Model that produced the reply, when reported.
    pub model_id: Option<String>,
    /// Token usage, when reported.
    pub usage: Option<ModelUsage>,
}

/// Result of routing one request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The backend answered.
    Completed(TaskResponse),
    /// The request was refused before any backend call.
    Rejected(Rejection),
}

impl TaskOutcome {
    /// Reply text, if the request completed.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Completed(response) => Some(&response.text),
            Self::Rejected(_) => None,
        }
    }

    /// True when the request was refused.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Converts into a plain result.
    ///
    /// # Errors
    ///
    /// Returns the rejection when the request was refused.
    pub fn into_result(self) -> Result<TaskResponse, Rejection> {
        match self {
            Self::Completed(response) => Ok(response),
            Self::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Routing errors. Rejections are not errors; see [`TaskOutcome`].
#[derive(Debug, Error)]
pub enum RouterError {
    /// A required secret was missing when building the router.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// A backend client could not be built.
    #[error("failed to build {backend} backend: {source}")]
    Setup {
        /// Backend being built.
        backend: BackendKind,
        /// Underlying error.
        #[source]
        source: ModelError,
    },

    /// The backend call failed.
    #[error("{backend} backend call failed: {source}")]
    Backend {
        /// Backend that failed.
        backend: BackendKind,
        /// Underlying error.
        #[source]
        source: ModelError,
    },

    /// No model is registered for the routed backend.
    #[error("no model registered for {0} backend")]
    BackendUnavailable(BackendKind),
}

/// Dispatches task requests to their backends.
pub struct TaskRouter {
    backends: HashMap<BackendKind, Arc<dyn Model>>,
    study: StudyContext,
    max_tokens: u32,
}

impl fmt::Debug for TaskRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let models: HashMap<_, _> = self.backends.iter().map(|(k, m)| (*k, m.model_id())).collect();
        f.debug_struct("TaskRouter")
            .field("backends", &models)
            .field("study", &self.study)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl TaskRouter {
    /// Creates a router over explicit backend models.
    pub fn new(
        claude: Arc<dyn Model>,
        gemini: Arc<dyn Model>,
        study: StudyContext,
        max_tokens: u32,
    ) -> Self {
        let backends = HashMap::from([(BackendKind::Claude, claude), (BackendKind::Gemini, gemini)]);
        Self { backends, study, max_tokens }
    }

    /// Builds the hosted backends from configuration and credentials.
    ///
    /// Both required secrets are checked before any client is built.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Credentials`] naming the first missing secret.
    pub fn from_config(config: &RumenConfig, credentials: &CredentialSet) -> Result<Self, RouterError> {
        credentials.validate_required()?;

        let claude_key = credentials.require(Provider::Anthropic)?;
        let gemini_key = credentials.require(Provider::Google)?;

        let mut claude_config =
            ModelConfig::new(ModelType::Claude, config.claude_model().to_string()).with_api_key(claude_key);
        if let Some(url) = &config.models.anthropic_base_url {
            claude_config = claude_config.with_base_url(url.clone());
        }
        let mut gemini_config =
            ModelConfig::new(ModelType::Gemini, config.gemini_model().to_string()).with_api_key(gemini_key);
        if let Some(url) = &config.models.gemini_base_url {
            gemini_config = gemini_config.with_base_url(url.clone());
        }

        let claude = ModelFactory::create(claude_config)
            .map_err(|source| RouterError::Setup { backend: BackendKind::Claude, source })?;
        let gemini = ModelFactory::create(gemini_config)
            .map_err(|source| RouterError::Setup { backend: BackendKind::Gemini, source })?;

        info!(
            claude = %config.claude_model(),
            gemini = %config.gemini_model(),
            "Task router ready"
        );
        Ok(Self::new(claude, gemini, config.study_context(), config.max_tokens()))
    }

    /// A router whose backends echo their input instead of calling out.
    pub fn offline(study: StudyContext, max_tokens: u32) -> Self {
        warn!("Offline mode: requests are echoed, no provider is contacted");
        Self::new(
            Arc::new(MockModel::new("offline-claude".to_string())),
            Arc::new(MockModel::new("offline-gemini".to_string())),
            study,
            max_tokens,
        )
    }

    /// The study framing in use.
    pub fn study(&self) -> &StudyContext {
        &self.study
    }

    /// Model id serving a backend, if registered.
    pub fn model_id(&self, backend: BackendKind) -> Option<&str> {
        self.backends.get(&backend).map(|m| m.model_id())
    }

    /// Shapes a query for its route without sending it.
    pub fn prepare(&self, task_type: TaskType, query: &str) -> PreparedRequest {
        let route = task_type.route();
        match route.framing {
            Framing::SystemInstruction(system) => PreparedRequest::Chat {
                backend: route.backend,
                messages: vec![ChatMessage::system(system), ChatMessage::user(query)],
            },
            Framing::InterpretationTemplate => PreparedRequest::Prompt {
                backend: route.backend,
                text: prompts::literature_framing(&self.study, query),
            },
        }
    }

    /// Sends a query for a known task type.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Backend`] if the backend call fails.
    pub async fn dispatch(&self, task_type: TaskType, query: &str) -> Result<TaskOutcome, RouterError> {
        if query.trim().is_empty() {
            return Ok(TaskOutcome::Rejected(Rejection::EmptyQuery));
        }

        let request = self.prepare(task_type, query);
        let backend = request.backend();
        let model = self.backends.get(&backend).ok_or(RouterError::BackendUnavailable(backend))?;

        info!(task_type = %task_type, backend = %backend, model = %model.model_id(), "Dispatching task");

        let reply = match request {
            PreparedRequest::Chat { messages, .. } => {
                debug!(message_count = messages.len(), query_len = query.len(), "Sending chat request");
                model
                    .generate_chat_completion(&messages, Some(ModelParameters::with_max_tokens(self.max_tokens)))
                    .await
            }
            PreparedRequest::Prompt { text, .. } => {
                debug!(prompt_len = text.len(), "Sending single prompt");
                model.generate_text(&text, None).await
            }
        }
        .map_err(|source| RouterError::Backend { backend, source })?;

        debug!(reply_len = reply.content.len(), "Backend replied");
        Ok(TaskOutcome::Completed(TaskResponse {
            task_type,
            backend,
            text: reply.content,
            model_id: reply.model_id,
            usage: reply.usage,
        }))
    }

    /// Sends a query addressed by tag.
    ///
    /// Unknown tags are returned as [`TaskOutcome::Rejected`] without a backend call.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Backend`] if the backend call fails.
    pub async fn route(&self, task_type: &str, query: &str) -> Result<TaskOutcome, RouterError> {
        match task_type.parse::<TaskType>() {
            Ok(task_type) => self.dispatch(task_type, query).await,
            Err(rejection) => {
                warn!(task_type = %task_type, "Rejected unknown task type");
                Ok(TaskOutcome::Rejected(rejection))
            }
        }
    }
}

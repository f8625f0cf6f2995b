//! Study-specific analysis operations.
//!
//! [`Analyzer`] fills a prompt template from its parameters and the study
//! context, then sends it through the [`TaskRouter`] as a single request.

use crate::prompts::{self, StudyContext};
use crate::router::{RouterError, TaskOutcome, TaskRouter, TaskType};
use thiserror::Error;
use tracing::info;

/// Errors from the analysis operations.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required parameter was empty.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// The routed request failed.
    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

/// Rejects blank parameters; accepted values are passed on untouched.
fn required<'a>(name: &'static str, value: &'a str) -> AnalysisResult<&'a str> {
    if value.trim().is_empty() { Err(AnalysisError::MissingParameter(name)) } else { Ok(value) }
}

/// The four analysis operations over a router.
#[derive(Debug)]
pub struct Analyzer {
    router: TaskRouter,
}

impl Analyzer {
    /// Wraps a router.
    pub fn new(router: TaskRouter) -> Self {
        Self { router }
    }

    /// The underlying router, for raw task requests.
    pub fn router(&self) -> &TaskRouter {
        &self.router
    }

    /// Study framing used for every prompt.
    pub fn study(&self) -> &StudyContext {
        self.router.study()
    }

    /// Requests a step-by-step pipeline for the given data and samples.
    pub async fn design_pipeline(&self, data_type: &str, sample_info: &str) -> AnalysisResult<TaskOutcome> {
        let data_type = required("data_type", data_type)?;
        let sample_info = required("sample_info", sample_info)?;
        info!(data_type, "Designing pipeline");
        let prompt = prompts::pipeline_request(self.study(), data_type, sample_info);
        self.send(TaskType::BioinformaticsAndPipelineDesign, &prompt).await
    }

    /// Requests a critical literature review of a topic.
    pub async fn literature_review(&self, topic: &str) -> AnalysisResult<TaskOutcome> {
        let topic = required("topic", topic)?;
        info!("Reviewing literature");
        let prompt = prompts::literature_request(self.study(), topic);
        self.send(TaskType::LiteratureAndInterpretation, &prompt).await
    }

    /// Requests a statistical approach for an experiment.
    pub async fn statistical_design(&self, experiment_description: &str) -> AnalysisResult<TaskOutcome> {
        let experiment = required("experiment_description", experiment_description)?;
        info!("Designing statistical approach");
        let prompt = prompts::statistics_request(self.study(), experiment);
        self.send(TaskType::StatisticalAnalysis, &prompt).await
    }

    /// Requests a comparison of the focus family against the reference family.
    pub async fn compare_to_reference_family(&self, aspect: &str) -> AnalysisResult<TaskOutcome> {
        let aspect = required("aspect", aspect)?;
        info!(reference = %self.study().reference_family, "Comparing families");
        let prompt = prompts::family_comparison_request(self.study(), aspect);
        self.send(TaskType::BioinformaticsAndPipelineDesign, &prompt).await
    }

    async fn send(&self, task_type: TaskType, prompt: &str) -> AnalysisResult<TaskOutcome> {
        Ok(self.router.dispatch(task_type, prompt).await?)
    }
}

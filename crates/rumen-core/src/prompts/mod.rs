//! Prompt text used by the router and the analysis façade.
//!
//! Everything here is pure: functions take caller values plus the fixed
//! [`StudyContext`] and return the exact text sent to a backend.

pub mod templates;

pub use templates::{PromptContext, PromptError, PromptTemplate};

use serde::{Deserialize, Serialize};

/// System instruction for pipeline and bioinformatics requests.
pub const BIOINFORMATICS_SYSTEM: &str =
    "You are an expert bioinformatician specializing in microbiome analysis and metagenomics.";

/// System instruction for statistical-analysis requests.
pub const STATISTICS_SYSTEM: &str =
    "You are a data scientist specializing in microbiome statistics and analysis.";

/// Fixed lead-in of the literature framing.
pub const INTERPRETATION_FRAMING: &str =
    "As a microbiome research expert, provide a critical biological interpretation with recent literature context:";

/// Taxonomic families the prompts are written around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyContext {
    /// Family under study; also the literature framing's domain keyword.
    pub focus_family: String,
    /// Previously analysed family used for comparisons.
    pub reference_family: String,
}

impl Default for StudyContext {
    fn default() -> Self {
        Self {
            focus_family: "Ruminococcaceae".to_string(),
            reference_family: "Lachnospiraceae".to_string(),
        }
    }
}

impl StudyContext {
    /// Placeholder values `focus_family` and `reference_family`.
    pub fn prompt_context(&self) -> PromptContext {
        PromptContext::new()
            .with("focus_family", &self.focus_family)
            .with("reference_family", &self.reference_family)
    }
}

const LITERATURE_FRAMING: PromptTemplate = PromptTemplate::new(
    "As a microbiome research expert, provide a critical biological interpretation with recent literature context: {{query}}

Focus on {{focus_family}} family and gut microbiome ecology.",
);

const PIPELINE_REQUEST: PromptTemplate = PromptTemplate::new(
    "I have {{data_type}} data for {{focus_family}} analysis.
Sample information: {{sample_info}}

Please provide:
1. Complete step-by-step pipeline with tool names and parameters
2. Quality control checkpoints
3. Expected outputs at each stage
4. {{focus_family}}-specific considerations",
);

const LITERATURE_REQUEST: PromptTemplate = PromptTemplate::new(
    "Provide a critical review of: {{topic}}

Include:
1. Current understanding and recent findings
2. Controversies or gaps in knowledge
3. Methodological considerations
4. Implications for {{focus_family}} research",
);

const STATISTICS_REQUEST: PromptTemplate = PromptTemplate::new(
    "Experimental design: {{experiment}}

Recommend:
1. Appropriate statistical tests
2. Sample size considerations
3. Multiple testing corrections
4. Visualization strategies
5. Python/R code examples if applicable",
);

const FAMILY_COMPARISON_REQUEST: PromptTemplate = PromptTemplate::new(
    "I've previously analyzed the {{reference_family}} family.
Now working on {{focus_family}}.

Compare and contrast regarding: {{aspect}}

Provide:
1. Key similarities in analysis approach
2. Important differences to consider
3. Family-specific considerations
4. How results might be interpreted differently",
);

/// Wraps a literature query in the interpretation framing sent to backend B.
pub fn literature_framing(study: &StudyContext, query: &str) -> String {
    LITERATURE_FRAMING.fill(&study.prompt_context().with("query", query))
}

/// Pipeline design request.
pub fn pipeline_request(study: &StudyContext, data_type: &str, sample_info: &str) -> String {
    PIPELINE_REQUEST
        .fill(&study.prompt_context().with("data_type", data_type).with("sample_info", sample_info))
}

/// Literature review request.
pub fn literature_request(study: &StudyContext, topic: &str) -> String {
    LITERATURE_REQUEST.fill(&study.prompt_context().with("topic", topic))
}

/// Statistical design request.
pub fn statistics_request(study: &StudyContext, experiment: &str) -> String {
    STATISTICS_REQUEST.fill(&study.prompt_context().with("experiment", experiment))
}

/// Focus-versus-reference family comparison request.
pub fn family_comparison_request(study: &StudyContext, aspect: &str) -> String {
    FAMILY_COMPARISON_REQUEST.fill(&study.prompt_context().with("aspect", aspect))
}

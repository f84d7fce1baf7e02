//! Step type and typed step-configuration union.
//!
//! # Responsibility
//! - Define the closed set of step types and their per-type subtypes.
//! - Define one config shape per step type, sharing the base fields.
//! - Decode untyped config payloads against a declared step type.
//!
//! # Invariants
//! - A `StepConfig` variant always matches the step type it reports.
//! - Subtypes outside the declared set for a step type fail to decode.
//! - `integration` and `sample` steps share the integration config shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Top-level step category carried as `data.type` on every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Source,
    Input,
    Processing,
    Decision,
    Output,
    Sample,
    Integration,
    Analytics,
}

impl StepType {
    pub const ALL: [StepType; 8] = [
        StepType::Source,
        StepType::Input,
        StepType::Processing,
        StepType::Decision,
        StepType::Output,
        StepType::Sample,
        StepType::Integration,
        StepType::Analytics,
    ];

    /// Wire name of this step type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Input => "input",
            Self::Processing => "processing",
            Self::Decision => "decision",
            Self::Output => "output",
            Self::Sample => "sample",
            Self::Integration => "integration",
            Self::Analytics => "analytics",
        }
    }

    /// Parses a wire name, ignoring surrounding whitespace and case.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|step_type| step_type.as_str() == normalized)
    }
}

impl Display for StepType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStepSubtype {
    Webhook,
    HttpRequest,
    FileUpload,
    DatabaseQuery,
    ScheduledTrigger,
}

impl SourceStepSubtype {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Webhook => "webhook",
            Self::HttpRequest => "http_request",
            Self::FileUpload => "file_upload",
            Self::DatabaseQuery => "database_query",
            Self::ScheduledTrigger => "scheduled_trigger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStepSubtype {
    DataTransformation,
    ApiCall,
    EmailSend,
    DataValidation,
    CustomScript,
}

impl ProcessingStepSubtype {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DataTransformation => "data_transformation",
            Self::ApiCall => "api_call",
            Self::EmailSend => "email_send",
            Self::DataValidation => "data_validation",
            Self::CustomScript => "custom_script",
        }
    }
}

/// Decision subtypes. Drives handle layout and edge label inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStepSubtype {
    Conditional,
    Switch,
    Loop,
    TryCatch,
    ConditionalBranch,
}

impl DecisionStepSubtype {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conditional => "conditional",
            Self::Switch => "switch",
            Self::Loop => "loop",
            Self::TryCatch => "try_catch",
            Self::ConditionalBranch => "conditional_branch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputStepSubtype {
    WebhookResponse,
    FileExport,
    DatabaseInsert,
    EmailNotification,
    LogOutput,
    EndNode,
}

impl OutputStepSubtype {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebhookResponse => "webhook_response",
            Self::FileExport => "file_export",
            Self::DatabaseInsert => "database_insert",
            Self::EmailNotification => "email_notification",
            Self::LogOutput => "log_output",
            Self::EndNode => "end_node",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStepSubtype {
    ApiSearch,
    AccountDiscovery,
    SapAccounts,
    CipAccounts,
    PackageRange,
    AdvancedPackageRange,
    JobListingsSearch,
    AccountSearch,
    DataFilter,
    AccountDataEnrichment,
    PersonSearch,
    TapAiAgent,
    OutreachActivation,
}

impl IntegrationStepSubtype {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApiSearch => "api_search",
            Self::AccountDiscovery => "account_discovery",
            Self::SapAccounts => "sap_accounts",
            Self::CipAccounts => "cip_accounts",
            Self::PackageRange => "package_range",
            Self::AdvancedPackageRange => "advanced_package_range",
            Self::JobListingsSearch => "job_listings_search",
            Self::AccountSearch => "account_search",
            Self::DataFilter => "data_filter",
            Self::AccountDataEnrichment => "account_data_enrichment",
            Self::PersonSearch => "person_search",
            Self::TapAiAgent => "tap_ai_agent",
            Self::OutreachActivation => "outreach_activation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsStepSubtype {
    ContentGeneration,
    WorkflowNavigation,
    AccountHierarchy,
    DocumentProcessing,
}

impl AnalyticsStepSubtype {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContentGeneration => "content_generation",
            Self::WorkflowNavigation => "workflow_navigation",
            Self::AccountHierarchy => "account_hierarchy",
            Self::DocumentProcessing => "document_processing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Contains,
    NotContains,
    IsEmpty,
    IsNotEmpty,
    RegexMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Json,
    Csv,
    Xml,
    Txt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

/// Fields shared by every step config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStepConfig {
    /// User-facing step name. The only field the editor requires.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

impl BaseStepConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            enabled: true,
            timeout: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Label bound to one outgoing edge of a decision/analytics step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeLabelConfig {
    /// Edge id this label belongs to.
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStepConfig {
    #[serde(flatten)]
    pub base: BaseStepConfig,
    pub subtype: SourceStepSubtype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    /// Cron-like schedule expression for scheduled triggers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Input steps have no palette entries; the subtype is free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputStepConfig {
    #[serde(flatten)]
    pub base: BaseStepConfig,
    #[serde(default)]
    pub subtype: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub field: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStepConfig {
    #[serde(flatten)]
    pub base: BaseStepConfig,
    pub subtype: ProcessingStepSubtype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation_script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_template: Option<EmailTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rules: Option<Vec<ValidationRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_script: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_operator: Option<LogicalOperator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchCase {
    #[serde(default)]
    pub value: Value,
    pub output_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopCondition {
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionStepConfig {
    #[serde(flatten)]
    pub base: BaseStepConfig,
    pub subtype: DecisionStepSubtype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_cases: Option<Vec<SwitchCase>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_condition: Option<LoopCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_labels: Option<Vec<EdgeLabelConfig>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputStepConfig {
    #[serde(flatten)]
    pub base: BaseStepConfig,
    pub subtype: OutputStepSubtype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_format: Option<FileFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_recipients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<OutputLogLevel>,
}

/// Third-party API method toggled on integration steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMethod {
    pub id: String,
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationStepConfig {
    #[serde(flatten)]
    pub base: BaseStepConfig,
    pub subtype: IntegrationStepSubtype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_method: Option<HttpMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mapping: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_api_methods: Option<Vec<ApiMethod>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsOutputFormat {
    Json,
    Csv,
    Xml,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStepConfig {
    #[serde(flatten)]
    pub base: BaseStepConfig,
    pub subtype: AnalyticsStepSubtype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<AnalyticsOutputFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_labels: Option<Vec<EdgeLabelConfig>>,
}

/// Typed step configuration, discriminated by step type.
///
/// Serialized without a tag: the step type travels next to the config as
/// `data.type` on the owning node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepConfig {
    Source(SourceStepConfig),
    Input(InputStepConfig),
    Processing(ProcessingStepConfig),
    Decision(DecisionStepConfig),
    Output(OutputStepConfig),
    Integration(IntegrationStepConfig),
    Sample(IntegrationStepConfig),
    Analytics(AnalyticsStepConfig),
}

/// Errors raised while building or decoding step configs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepConfigError {
    /// Subtype is not part of the declared step type.
    UnknownSubtype { step_type: StepType, subtype: String },
    /// Config payload does not match the declared step type shape.
    InvalidConfig { step_type: StepType, message: String },
}

impl Display for StepConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSubtype { step_type, subtype } => {
                write!(f, "unknown subtype `{subtype}` for step type `{step_type}`")
            }
            Self::InvalidConfig { step_type, message } => {
                write!(f, "invalid `{step_type}` step config: {message}")
            }
        }
    }
}

impl Error for StepConfigError {}

impl StepConfig {
    /// Builds a default config for `step_type` + `subtype` over `base` fields.
    ///
    /// # Errors
    /// - `UnknownSubtype` when `subtype` is not declared for `step_type`.
    pub fn new_default(
        step_type: StepType,
        subtype: &str,
        base: BaseStepConfig,
    ) -> Result<Self, StepConfigError> {
        let subtype = subtype.trim();
        if !is_known_subtype(step_type, subtype) {
            return Err(StepConfigError::UnknownSubtype {
                step_type,
                subtype: subtype.to_string(),
            });
        }

        let mut payload = match serde_json::to_value(&base) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => Map::new(),
        };
        payload.insert("subtype".to_string(), Value::String(subtype.to_string()));
        Self::from_parts(step_type, Value::Object(payload))
    }

    /// Decodes an untyped config payload against the declared step type.
    pub fn from_parts(step_type: StepType, config: Value) -> Result<Self, StepConfigError> {
        if let Some(subtype) = config.get("subtype").and_then(Value::as_str) {
            if !is_known_subtype(step_type, subtype) {
                return Err(StepConfigError::UnknownSubtype {
                    step_type,
                    subtype: subtype.to_string(),
                });
            }
        }

        match step_type {
            StepType::Source => decode(step_type, config).map(Self::Source),
            StepType::Input => decode(step_type, config).map(Self::Input),
            StepType::Processing => decode(step_type, config).map(Self::Processing),
            StepType::Decision => decode(step_type, config).map(Self::Decision),
            StepType::Output => decode(step_type, config).map(Self::Output),
            StepType::Integration => decode(step_type, config).map(Self::Integration),
            StepType::Sample => decode(step_type, config).map(Self::Sample),
            StepType::Analytics => decode(step_type, config).map(Self::Analytics),
        }
    }

    pub fn step_type(&self) -> StepType {
        match self {
            Self::Source(_) => StepType::Source,
            Self::Input(_) => StepType::Input,
            Self::Processing(_) => StepType::Processing,
            Self::Decision(_) => StepType::Decision,
            Self::Output(_) => StepType::Output,
            Self::Integration(_) => StepType::Integration,
            Self::Sample(_) => StepType::Sample,
            Self::Analytics(_) => StepType::Analytics,
        }
    }

    pub fn base(&self) -> &BaseStepConfig {
        match self {
            Self::Source(config) => &config.base,
            Self::Input(config) => &config.base,
            Self::Processing(config) => &config.base,
            Self::Decision(config) => &config.base,
            Self::Output(config) => &config.base,
            Self::Integration(config) | Self::Sample(config) => &config.base,
            Self::Analytics(config) => &config.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut BaseStepConfig {
        match self {
            Self::Source(config) => &mut config.base,
            Self::Input(config) => &mut config.base,
            Self::Processing(config) => &mut config.base,
            Self::Decision(config) => &mut config.base,
            Self::Output(config) => &mut config.base,
            Self::Integration(config) | Self::Sample(config) => &mut config.base,
            Self::Analytics(config) => &mut config.base,
        }
    }

    pub fn name(&self) -> &str {
        self.base().name.as_str()
    }

    /// Wire name of the subtype.
    pub fn subtype(&self) -> &str {
        match self {
            Self::Source(config) => config.subtype.as_str(),
            Self::Input(config) => config.subtype.as_str(),
            Self::Processing(config) => config.subtype.as_str(),
            Self::Decision(config) => config.subtype.as_str(),
            Self::Output(config) => config.subtype.as_str(),
            Self::Integration(config) | Self::Sample(config) => config.subtype.as_str(),
            Self::Analytics(config) => config.subtype.as_str(),
        }
    }

    /// Decision subtype, when this is a decision step.
    pub fn decision_subtype(&self) -> Option<DecisionStepSubtype> {
        match self {
            Self::Decision(config) => Some(config.subtype),
            _ => None,
        }
    }

    /// Whether this is a decision step using the `conditional_branch` subtype.
    pub fn is_conditional_branch(&self) -> bool {
        self.decision_subtype() == Some(DecisionStepSubtype::ConditionalBranch)
    }

    /// Configured edge labels. Only decision and analytics steps carry them.
    pub fn edge_labels(&self) -> &[EdgeLabelConfig] {
        match self {
            Self::Decision(config) => config.edge_labels.as_deref().unwrap_or(&[]),
            Self::Analytics(config) => config.edge_labels.as_deref().unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Mutable edge label slot, `None` for step types without one.
    pub fn edge_labels_mut(&mut self) -> Option<&mut Option<Vec<EdgeLabelConfig>>> {
        match self {
            Self::Decision(config) => Some(&mut config.edge_labels),
            Self::Analytics(config) => Some(&mut config.edge_labels),
            _ => None,
        }
    }

    /// Selected API methods of integration-shaped steps.
    pub fn selected_api_methods(&self) -> &[ApiMethod] {
        match self {
            Self::Integration(config) | Self::Sample(config) => {
                config.selected_api_methods.as_deref().unwrap_or(&[])
            }
            _ => &[],
        }
    }
}

fn decode<T: DeserializeOwned>(step_type: StepType, config: Value) -> Result<T, StepConfigError> {
    serde_json::from_value(config).map_err(|err| StepConfigError::InvalidConfig {
        step_type,
        message: err.to_string(),
    })
}

fn parse_subtype<T: DeserializeOwned>(subtype: &str) -> Option<T> {
    serde_json::from_value(Value::String(subtype.to_string())).ok()
}

/// Returns whether `subtype` is declared for `step_type`.
///
/// `input` steps accept any subtype.
pub fn is_known_subtype(step_type: StepType, subtype: &str) -> bool {
    match step_type {
        StepType::Source => parse_subtype::<SourceStepSubtype>(subtype).is_some(),
        StepType::Input => true,
        StepType::Processing => parse_subtype::<ProcessingStepSubtype>(subtype).is_some(),
        StepType::Decision => parse_subtype::<DecisionStepSubtype>(subtype).is_some(),
        StepType::Output => parse_subtype::<OutputStepSubtype>(subtype).is_some(),
        StepType::Integration | StepType::Sample => {
            parse_subtype::<IntegrationStepSubtype>(subtype).is_some()
        }
        StepType::Analytics => parse_subtype::<AnalyticsStepSubtype>(subtype).is_some(),
    }
}

//! Palette entries shown in the step sidebar.

use crate::model::step::{ApiMethod, StepType};

/// Display metadata for one palette step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMetadata {
    pub step_type: StepType,
    pub subtype: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Icon identifier resolved by the UI shell.
    pub icon: &'static str,
    /// Tailwind background class.
    pub color: &'static str,
    pub category: &'static str,
}

const SOURCE_COLOR: &str = "bg-green-500";
const PROCESSING_COLOR: &str = "bg-blue-500";
const DECISION_COLOR: &str = "bg-yellow-500";
const OUTPUT_COLOR: &str = "bg-purple-500";

pub const AVAILABLE_STEPS: &[StepMetadata] = &[
    StepMetadata {
        step_type: StepType::Source,
        subtype: "webhook",
        label: "Webhook Trigger",
        description: "Trigger workflow from incoming HTTP requests",
        icon: "link",
        color: SOURCE_COLOR,
        category: "Sources",
    },
    StepMetadata {
        step_type: StepType::Source,
        subtype: "http_request",
        label: "HTTP Request",
        description: "Fetch data from external APIs",
        icon: "globe-alt",
        color: SOURCE_COLOR,
        category: "Sources",
    },
    StepMetadata {
        step_type: StepType::Source,
        subtype: "file_upload",
        label: "File Upload",
        description: "Process uploaded files",
        icon: "document-arrow-up",
        color: SOURCE_COLOR,
        category: "Sources",
    },
    StepMetadata {
        step_type: StepType::Source,
        subtype: "database_query",
        label: "Database Query",
        description: "Query data from databases",
        icon: "circle-stack",
        color: SOURCE_COLOR,
        category: "Sources",
    },
    StepMetadata {
        step_type: StepType::Source,
        subtype: "scheduled_trigger",
        label: "Scheduled Trigger",
        description: "Run workflow on a schedule",
        icon: "clock",
        color: SOURCE_COLOR,
        category: "Sources",
    },
    StepMetadata {
        step_type: StepType::Processing,
        subtype: "data_transformation",
        label: "Data Transform",
        description: "Transform and manipulate data",
        icon: "arrow-path",
        color: PROCESSING_COLOR,
        category: "Processing",
    },
    StepMetadata {
        step_type: StepType::Processing,
        subtype: "api_call",
        label: "API Call",
        description: "Make calls to external APIs",
        icon: "radio",
        color: PROCESSING_COLOR,
        category: "Processing",
    },
    StepMetadata {
        step_type: StepType::Processing,
        subtype: "email_send",
        label: "Send Email",
        description: "Send email notifications",
        icon: "envelope",
        color: PROCESSING_COLOR,
        category: "Processing",
    },
    StepMetadata {
        step_type: StepType::Processing,
        subtype: "data_validation",
        label: "Data Validation",
        description: "Validate data against rules",
        icon: "check-badge",
        color: PROCESSING_COLOR,
        category: "Processing",
    },
    StepMetadata {
        step_type: StepType::Processing,
        subtype: "custom_script",
        label: "Custom Script",
        description: "Execute custom JavaScript code",
        icon: "command-line",
        color: PROCESSING_COLOR,
        category: "Processing",
    },
    StepMetadata {
        step_type: StepType::Decision,
        subtype: "conditional",
        label: "If/Then/Else",
        description: "Branch workflow based on conditions",
        icon: "code-bracket-square",
        color: DECISION_COLOR,
        category: "Decisions",
    },
    StepMetadata {
        step_type: StepType::Decision,
        subtype: "switch",
        label: "Switch Case",
        description: "Multiple path branching",
        icon: "square-3-stack-3d",
        color: DECISION_COLOR,
        category: "Decisions",
    },
    StepMetadata {
        step_type: StepType::Decision,
        subtype: "loop",
        label: "Loop",
        description: "Repeat steps based on conditions",
        icon: "arrow-right-circle",
        color: DECISION_COLOR,
        category: "Decisions",
    },
    StepMetadata {
        step_type: StepType::Decision,
        subtype: "try_catch",
        label: "Try/Catch",
        description: "Handle errors and exceptions",
        icon: "shield-check",
        color: DECISION_COLOR,
        category: "Decisions",
    },
    StepMetadata {
        step_type: StepType::Output,
        subtype: "webhook_response",
        label: "Webhook Response",
        description: "Send response to webhook caller",
        icon: "paper-airplane",
        color: OUTPUT_COLOR,
        category: "Outputs",
    },
    StepMetadata {
        step_type: StepType::Output,
        subtype: "file_export",
        label: "File Export",
        description: "Export data to files",
        icon: "document-arrow-down",
        color: OUTPUT_COLOR,
        category: "Outputs",
    },
    StepMetadata {
        step_type: StepType::Output,
        subtype: "database_insert",
        label: "Database Insert",
        description: "Insert data into databases",
        icon: "server-stack",
        color: OUTPUT_COLOR,
        category: "Outputs",
    },
    StepMetadata {
        step_type: StepType::Output,
        subtype: "email_notification",
        label: "Email Notification",
        description: "Send email notifications",
        icon: "bell",
        color: OUTPUT_COLOR,
        category: "Outputs",
    },
    StepMetadata {
        step_type: StepType::Output,
        subtype: "log_output",
        label: "Log Output",
        description: "Log workflow results",
        icon: "document-text",
        color: OUTPUT_COLOR,
        category: "Outputs",
    },
];

/// Looks up the palette entry for `step_type` + `subtype`.
pub fn find_step(step_type: StepType, subtype: &str) -> Option<&'static StepMetadata> {
    AVAILABLE_STEPS
        .iter()
        .find(|step| step.step_type == step_type && step.subtype == subtype)
}

/// Groups palette entries by category, keeping first-seen category order.
pub fn step_categories() -> Vec<(&'static str, Vec<&'static StepMetadata>)> {
    let mut categories: Vec<(&'static str, Vec<&'static StepMetadata>)> = Vec::new();
    for step in AVAILABLE_STEPS {
        match categories
            .iter_mut()
            .find(|(category, _)| *category == step.category)
        {
            Some((_, steps)) => steps.push(step),
            None => categories.push((step.category, vec![step])),
        }
    }
    categories
}

/// API methods offered by the integration method selector.
pub fn default_api_methods() -> Vec<ApiMethod> {
    [
        ("jobsearch", "JobSearch"),
        ("apollo", "Apollo"),
        ("wiza", "Wiza"),
        ("neverbounce", "NeverBounce"),
    ]
    .into_iter()
    .map(|(id, name)| ApiMethod {
        id: id.to_string(),
        name: name.to_string(),
        enabled: false,
    })
    .collect()
}

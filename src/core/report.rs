use crate::core::AssessmentResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub resources_assessed: usize,
    pub resources_flagged: usize,
    pub resources_excluded: usize,
    pub findings_total: usize,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub tool_version: String,
    pub generated_at: String,
    pub summary: ReportSummary,
    pub results: Vec<AssessmentResult>,
}

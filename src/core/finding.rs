use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub name: String,
    pub description: String,
    pub suggested_remediation: String,
}

impl Finding {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        suggested_remediation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            suggested_remediation: suggested_remediation.into(),
        }
    }
}

/// Findings for one resource, keyed by the resource's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub resource_id: String,
    pub findings: Vec<Finding>,
}

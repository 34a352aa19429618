use crate::core::{Finding, Resource};
use crate::rules::Rule;

/// Locally-redundant storage; the match is exact and case-sensitive.
const LOCALLY_REDUNDANT: &str = "LRS";

#[derive(Debug, Clone, Copy, Default)]
pub struct ReplicationRule;

impl Rule for ReplicationRule {
    fn id(&self) -> &'static str {
        "replication"
    }

    fn title(&self) -> &'static str {
        "Storage resiliency"
    }

    fn assess(&self, resource: &Resource) -> Vec<Finding> {
        if resource.cloud_specific.replication != LOCALLY_REDUNDANT {
            return Vec::new();
        }
        vec![Finding::new(
            "Resiliency risk detected",
            "Presently data is not protected against a regional outage. This is merely a warning. Please consider implementing Geo-Redundant replication on your storage account.",
            "Please refer to the following for additional guidance on how to remediate: https://learn.microsoft.com/en-us/azure/storage/common/redundancy-migration?tabs=portal#changing-redundancy-configuration",
        )]
    }
}

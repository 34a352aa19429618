use crate::core::{Finding, Resource};
use crate::rules::Rule;

#[derive(Debug, Clone, Copy, Default)]
pub struct EncryptionRule;

impl Rule for EncryptionRule {
    fn id(&self) -> &'static str {
        "encryption"
    }

    fn title(&self) -> &'static str {
        "Encryption at rest"
    }

    fn assess(&self, resource: &Resource) -> Vec<Finding> {
        if resource.encryption != Some(false) {
            return Vec::new();
        }
        vec![finding_for(&resource.resource_type)]
    }
}

fn finding_for(resource_type: &str) -> Finding {
    match resource_type {
        "database" => Finding::new(
            "Encryption is not enabled on database.",
            "Transparent Data Encryption is on by default on all Azure SQL servers. However, please implement customer managed keys as per our encryption standard.",
            "Please refer to the following for additional guidance on how to remediate: https://learn.microsoft.com/en-us/azure/azure-sql/database/transparent-data-encryption-byok-create-server?view=azuresql&tabs=azure-portal",
        ),
        "virtual_machine" => Finding::new(
            "Encryption is not enabled on virtual machine.",
            "Encryption is not enabled.",
            "Please refer to the following for additional guidance on how to remediate: https://learn.microsoft.com/en-us/azure/virtual-machines/windows/disk-encryption-portal-quickstart#encrypt-the-virtual-machine.",
        ),
        "storage_account" => Finding::new(
            "Encryption is not enabled on storage account.",
            "Encryption at rest is on by default on all Azure Services and cannot be disabled. However, please implement customer managed keys as per our encryption standard.",
            "Please refer to the following for additional guidance on how to remediate: https://learn.microsoft.com/en-us/azure/storage/common/customer-managed-keys-configure-existing-account?tabs=azure-portal.",
        ),
        _ => Finding::new(
            "Encryption is not enabled.",
            "Encryption is not enabled. Data at rest should be encrypted with customer managed keys as per our encryption standard.",
            "Enable encryption at rest for this resource using customer managed keys as per our encryption standard.",
        ),
    }
}

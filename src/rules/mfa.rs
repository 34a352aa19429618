use crate::core::{Finding, Resource};
use crate::rules::Rule;

#[derive(Debug, Clone, Copy, Default)]
pub struct MfaRule;

impl Rule for MfaRule {
    fn id(&self) -> &'static str {
        "mfa"
    }

    fn title(&self) -> &'static str {
        "Multi-factor authentication"
    }

    fn assess(&self, resource: &Resource) -> Vec<Finding> {
        if resource.mfa_enabled != Some(false) {
            return Vec::new();
        }
        vec![Finding::new(
            "MFA is not enabled.",
            "MFA is critical to securing our identities. Please setup Entra MFA as per our standards.",
            "Please refer to the following for additional guidance on how to remediate: https://learn.microsoft.com/en-us/entra/identity/authentication/tutorial-enable-azure-mfa",
        )]
    }
}

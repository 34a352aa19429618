use crate::core::{Finding, Resource};
use crate::rules::Rule;

#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordRule;

impl Rule for PasswordRule {
    fn id(&self) -> &'static str {
        "password"
    }

    fn title(&self) -> &'static str {
        "Plain-text password"
    }

    fn assess(&self, resource: &Resource) -> Vec<Finding> {
        if !resource.has_password() {
            return Vec::new();
        }
        vec![Finding::new(
            "Password detected",
            "A plain text password was detected in your code. Passwords should be vaulted.",
            "Please refer to the following for additional guidance on how to remediate: https://learn.microsoft.com/en-us/azure/azure-resource-manager/templates/key-vault-parameter?tabs=azure-cli.",
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_password_is_flagged() {
        let mut r = Resource::new("database", "db");
        assert!(PasswordRule.assess(&r).is_empty());
        r.password = "abc123".to_string();
        let findings = PasswordRule.assess(&r);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "Password detected");
    }

    #[test]
    fn whitespace_still_counts_as_a_password() {
        let mut r = Resource::new("database", "db");
        r.password = " ".to_string();
        assert_eq!(PasswordRule.assess(&r).len(), 1);
    }
}

//! Security checks applied to each resource.
//!
//! A [`Rule`] inspects one resource and returns its findings. Rules hold no
//! state and never see other resources. A [`RuleChain`] runs rules in a fixed
//! order and concatenates their output, so a resource's findings always come
//! out grouped by rule in chain order.

use crate::core::{Finding, Resource};

mod encryption;
mod mfa;
mod network;
mod password;
mod replication;

pub use encryption::EncryptionRule;
pub use mfa::MfaRule;
pub use network::NetworkRule;
pub use password::PasswordRule;
pub use replication::ReplicationRule;

pub trait Rule: Send + Sync {
    /// Stable identifier used by config and the `--disable` flag.
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn assess(&self, resource: &Resource) -> Vec<Finding>;
}

#[derive(Default)]
pub struct RuleChain {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// MFA, network, replication, encryption, password.
    pub fn standard() -> Self {
        Self::new()
            .then(MfaRule)
            .then(NetworkRule)
            .then(ReplicationRule)
            .then(EncryptionRule)
            .then(PasswordRule)
    }

    pub fn then(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn without(mut self, ids: &[String]) -> Self {
        self.rules.retain(|r| !ids.iter().any(|id| id == r.id()));
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &(dyn Rule + 'static)> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Rule for RuleChain {
    fn id(&self) -> &'static str {
        "chain"
    }

    fn title(&self) -> &'static str {
        "Rule chain"
    }

    fn assess(&self, resource: &Resource) -> Vec<Finding> {
        let mut out = Vec::new();
        for rule in &self.rules {
            out.extend(rule.assess(resource));
        }
        out
    }
}

impl std::fmt::Debug for RuleChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rules().map(|r| r.id())).finish()
    }
}

/// Ids of the standard chain, in evaluation order.
pub fn standard_rule_ids() -> Vec<&'static str> {
    RuleChain::standard().rules().map(|r| r.id()).collect()
}

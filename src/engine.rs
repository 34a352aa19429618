use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::{AssessmentResult, Report, ReportSummary, Resource};
use crate::rules::{Rule, RuleChain};

/// Assess a raw inventory with the standard rule chain.
///
/// Unreadable input yields an empty result; the failure is logged, never
/// returned.
pub fn run_assessment(raw: &str) -> Vec<AssessmentResult> {
    Engine::standard().run(raw)
}

#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub disabled_rules: Vec<String>,
    pub exclude: Vec<String>,
}

#[derive(Debug)]
pub struct Engine {
    chain: RuleChain,
    exclude: Option<GlobSet>,
}

#[derive(Debug, Clone, Default)]
struct Outcome {
    results: Vec<AssessmentResult>,
    assessed: usize,
    excluded: usize,
    unreadable: bool,
}

impl Engine {
    pub fn standard() -> Self {
        Self {
            chain: RuleChain::standard(),
            exclude: None,
        }
    }

    pub fn new(opts: EngineOptions) -> Result<Self> {
        validate_rule_ids(&opts.disabled_rules)?;
        let exclude = if opts.exclude.is_empty() {
            None
        } else {
            Some(build_exclude_set(&opts.exclude)?)
        };
        Ok(Self {
            chain: RuleChain::standard().without(&opts.disabled_rules),
            exclude,
        })
    }

    pub fn with_chain(chain: RuleChain) -> Self {
        Self {
            chain,
            exclude: None,
        }
    }

    pub fn chain(&self) -> &RuleChain {
        &self.chain
    }

    pub fn run(&self, raw: &str) -> Vec<AssessmentResult> {
        self.outcome(raw.as_bytes()).results
    }

    pub fn assess_resources(&self, resources: &[Resource]) -> Vec<AssessmentResult> {
        self.assess_all(resources).results
    }

    pub fn report(&self, raw: &str) -> Report {
        self.report_bytes(raw.as_bytes())
    }

    /// Build a report from raw input bytes. Bytes that are not UTF-8 count as
    /// unreadable input, like malformed JSON.
    pub fn report_bytes(&self, raw: &[u8]) -> Report {
        let outcome = self.outcome(raw);

        let mut notes = Vec::new();
        if outcome.unreadable {
            notes.push(
                "input could not be parsed as an inventory; no resources were assessed"
                    .to_string(),
            );
        }
        if outcome.excluded > 0 {
            notes.push(format!(
                "{} resource(s) skipped by exclude patterns",
                outcome.excluded
            ));
        }
        if self.chain.len() < crate::rules::standard_rule_ids().len() {
            let active: Vec<&str> = self.chain.rules().map(|r| r.id()).collect();
            notes.push(format!("active rules: {}", active.join(", ")));
        }

        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());

        Report {
            schema_version: "1.0".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at,
            summary: ReportSummary {
                resources_assessed: outcome.assessed,
                resources_flagged: outcome.results.len(),
                resources_excluded: outcome.excluded,
                findings_total: outcome.results.iter().map(|r| r.findings.len()).sum(),
                notes,
            },
            results: outcome.results,
        }
    }

    fn outcome(&self, raw: &[u8]) -> Outcome {
        match crate::input::parse_bytes(raw) {
            Ok(resources) => self.assess_all(&resources),
            Err(_) => Outcome {
                unreadable: true,
                ..Outcome::default()
            },
        }
    }

    fn assess_all(&self, resources: &[Resource]) -> Outcome {
        let mut outcome = Outcome::default();
        for resource in resources {
            if self.is_excluded(resource) {
                tracing::debug!(resource = %resource.name, "resource excluded");
                outcome.excluded += 1;
                continue;
            }
            outcome.assessed += 1;

            let findings = self.chain.assess(resource);
            tracing::debug!(
                resource = %resource.name,
                resource_type = %resource.resource_type,
                findings = findings.len(),
                "resource assessed"
            );
            if findings.is_empty() {
                continue;
            }
            outcome.results.push(AssessmentResult {
                resource_id: resource.name.clone(),
                findings,
            });
        }
        outcome
    }

    fn is_excluded(&self, resource: &Resource) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|set| set.is_match(&resource.name))
    }
}

pub fn validate_rule_ids(ids: &[String]) -> Result<()> {
    let known = crate::rules::standard_rule_ids();
    let unknown: Vec<&str> = ids
        .iter()
        .map(|s| s.as_str())
        .filter(|id| !known.contains(id))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    Err(anyhow::anyhow!(
        "unknown rule id: {} (expected one of: {})",
        unknown.join(", "),
        known.join(", ")
    ))
}

pub fn validate_excludes(excludes: &[String]) -> Result<()> {
    let _ = build_exclude_set(excludes)?;
    Ok(())
}

fn build_exclude_set(excludes: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in excludes {
        builder.add(Glob::new(pat).with_context(|| format!("invalid exclude glob: {pat}"))?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::PasswordRule;

    const TWO_RESOURCES: &str = r#"{"resources":[
        {"type":"storage_account","name":"quiet"},
        {"type":"virtual_machine","name":"noisy","password":"abc123","open_ports":[22]}
    ]}"#;

    #[test]
    fn only_flagged_resources_are_returned() {
        let results = run_assessment(TWO_RESOURCES);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].resource_id, "noisy");
        let names: Vec<&str> = results[0].findings.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["SSH port (22) detected.", "Password detected"]);
    }

    #[test]
    fn unreadable_input_is_an_empty_result() {
        assert!(run_assessment("{\"resources\": [").is_empty());
        assert!(run_assessment("not json").is_empty());
        assert!(run_assessment("null").is_empty());
    }

    #[test]
    fn runs_are_repeatable() {
        let engine = Engine::standard();
        assert_eq!(engine.run(TWO_RESOURCES), engine.run(TWO_RESOURCES));
    }

    #[test]
    fn duplicate_names_stay_separate_and_ordered() {
        let raw = r#"{"resources":[
            {"name":"dup","password":"a"},
            {"name":"other","mfa_enabled":false},
            {"name":"dup","open_ports":[80]}
        ]}"#;
        let results = run_assessment(raw);
        let ids: Vec<&str> = results.iter().map(|r| r.resource_id.as_str()).collect();
        assert_eq!(ids, vec!["dup", "other", "dup"]);
        assert_eq!(results[0].findings[0].name, "Password detected");
        assert_eq!(results[2].findings[0].name, "Insecure port detected.");
    }

    #[test]
    fn disabled_rules_are_removed_from_the_chain() {
        let engine = Engine::new(EngineOptions {
            disabled_rules: vec!["password".to_string()],
            exclude: vec![],
        })
        .expect("engine");
        let results = engine.run(TWO_RESOURCES);
        assert_eq!(results[0].findings.len(), 1);
        assert_eq!(results[0].findings[0].name, "SSH port (22) detected.");
    }

    #[test]
    fn unknown_rule_id_is_rejected() {
        let err = Engine::new(EngineOptions {
            disabled_rules: vec!["firewall".to_string()],
            exclude: vec![],
        })
        .expect_err("unknown rule");
        assert!(err.to_string().contains("firewall"));
    }

    #[test]
    fn invalid_glob_is_rejected() {
        assert!(validate_excludes(&["[".to_string()]).is_err());
        assert!(validate_excludes(&["sandbox-*".to_string()]).is_ok());
    }

    #[test]
    fn excluded_resources_are_counted_not_assessed() {
        let engine = Engine::new(EngineOptions {
            disabled_rules: vec![],
            exclude: vec!["noi*".to_string()],
        })
        .expect("engine");
        let report = engine.report(TWO_RESOURCES);
        assert!(report.results.is_empty());
        assert_eq!(report.summary.resources_assessed, 1);
        assert_eq!(report.summary.resources_excluded, 1);
    }

    #[test]
    fn report_summarizes_the_run() {
        let report = Engine::standard().report(TWO_RESOURCES);
        assert_eq!(report.schema_version, "1.0");
        assert_eq!(report.summary.resources_assessed, 2);
        assert_eq!(report.summary.resources_flagged, 1);
        assert_eq!(report.summary.findings_total, 2);
        assert!(report.summary.notes.is_empty());
    }

    #[test]
    fn report_notes_unreadable_input() {
        let report = Engine::standard().report("{");
        assert!(report.results.is_empty());
        assert_eq!(report.summary.resources_assessed, 0);
        assert_eq!(report.summary.notes.len(), 1);
    }

    #[test]
    fn non_utf8_bytes_are_unreadable_input() {
        let report =
            Engine::standard().report_bytes(b"{\"resources\":[{\"name\":\"\xff\"}]}");
        assert!(report.results.is_empty());
        assert_eq!(report.summary.notes.len(), 1);

        let report = Engine::standard().report_bytes(TWO_RESOURCES.as_bytes());
        assert_eq!(report.summary.resources_flagged, 1);
    }

    #[test]
    fn custom_chain_is_used() {
        let engine = Engine::with_chain(RuleChain::new().then(PasswordRule));
        let results = engine.run(TWO_RESOURCES);
        assert_eq!(results[0].findings.len(), 1);
    }
}

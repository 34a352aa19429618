use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub ui: UiConfig,
    pub rules: RulesConfig,
    pub assess: AssessConfig,
    pub report: ReportConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
    pub max_table_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RulesConfig {
    pub disabled: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessConfig {
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportConfig {
    pub include_remediation: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            ui: UiConfig {
                color: true,
                max_table_rows: 20,
            },
            rules: RulesConfig { disabled: vec![] },
            assess: AssessConfig { exclude: vec![] },
            report: ReportConfig {
                include_remediation: true,
            },
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    ui: Option<RawUiConfig>,
    rules: Option<RawRulesConfig>,
    assess: Option<RawAssessConfig>,
    report: Option<RawReportConfig>,
}

#[derive(Debug, Deserialize)]
struct RawUiConfig {
    color: Option<bool>,
    max_table_rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawRulesConfig {
    disabled: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawAssessConfig {
    exclude: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawReportConfig {
    include_remediation: Option<bool>,
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/secassess/config.toml")
}

pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// Defaults, then the TOML file, then `SECASSESS_*` environment overrides.
pub fn load(config_path: Option<&Path>, home_dir: Option<&Path>) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .or_else(|| home_dir.map(default_config_path));

    if let Some(path) = path {
        if config_path.is_some() || path.exists() {
            let s = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file: {}", path.display()))?;
            let raw: RawConfig = toml::from_str(&s)
                .with_context(|| format!("failed to parse config file (TOML): {}", path.display()))?;
            apply_raw_config(&mut cfg, raw);
            cfg.config_path = Some(path.display().to_string());
        }
    }

    apply_env_overrides(&mut cfg)?;

    crate::engine::validate_rule_ids(&cfg.rules.disabled).context("rules.disabled")?;
    crate::engine::validate_excludes(&cfg.assess.exclude).context("assess.exclude")?;

    Ok(cfg)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
        if let Some(max_table_rows) = ui.max_table_rows {
            cfg.ui.max_table_rows = max_table_rows;
        }
    }

    if let Some(rules) = raw.rules {
        if let Some(disabled) = rules.disabled {
            cfg.rules.disabled = disabled;
        }
    }

    if let Some(assess) = raw.assess {
        if let Some(exclude) = assess.exclude {
            cfg.assess.exclude = exclude;
        }
    }

    if let Some(report) = raw.report {
        if let Some(include_remediation) = report.include_remediation {
            cfg.report.include_remediation = include_remediation;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("SECASSESS_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "SECASSESS_UI_COLOR")?;
    }
    if let Ok(v) = std::env::var("SECASSESS_UI_MAX_TABLE_ROWS") {
        cfg.ui.max_table_rows = v
            .trim()
            .parse::<usize>()
            .with_context(|| "SECASSESS_UI_MAX_TABLE_ROWS")?;
    }
    if let Ok(v) = std::env::var("SECASSESS_RULES_DISABLED") {
        cfg.rules.disabled = split_list(&v);
    }
    if let Ok(v) = std::env::var("SECASSESS_ASSESS_EXCLUDE") {
        cfg.assess.exclude = split_list(&v);
    }
    if let Ok(v) = std::env::var("SECASSESS_REPORT_INCLUDE_REMEDIATION") {
        cfg.report.include_remediation =
            parse_bool(&v).with_context(|| "SECASSESS_REPORT_INCLUDE_REMEDIATION")?;
    }

    Ok(())
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for s in ["1", "true", "YES", " on "] {
            assert!(parse_bool(s).expect("bool"), "{s}");
        }
        for s in ["0", "False", "no", "off"] {
            assert!(!parse_bool(s).expect("bool"), "{s}");
        }
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn raw_config_overrides_only_present_keys() {
        let raw: RawConfig = toml::from_str(
            r#"
[ui]
max_table_rows = 5

[rules]
disabled = ["password"]
"#,
        )
        .expect("toml");
        let mut cfg = EffectiveConfig::default();
        apply_raw_config(&mut cfg, raw);
        assert_eq!(cfg.ui.max_table_rows, 5);
        assert!(cfg.ui.color);
        assert_eq!(cfg.rules.disabled, vec!["password".to_string()]);
        assert!(cfg.assess.exclude.is_empty());
        assert!(cfg.report.include_remediation);
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(
            split_list(" mfa, ,network ,"),
            vec!["mfa".to_string(), "network".to_string()]
        );
    }

    #[test]
    fn default_path_is_under_dot_config() {
        assert_eq!(
            default_config_path(Path::new("/home/u")),
            PathBuf::from("/home/u/.config/secassess/config.toml")
        );
    }
}

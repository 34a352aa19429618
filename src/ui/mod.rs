use anyhow::Error;
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

use crate::core::{AssessmentResult, Report};
use crate::rules::RuleChain;

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub max_table_rows: usize,
    pub include_remediation: bool,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let steps = crate::exit::ExitCode::of(err).next_steps();
    if !steps.is_empty() {
        let _ = writeln!(stderr, "next:");
        for step in steps {
            let _ = writeln!(stderr, "  - {step}");
        }
    }
}

pub fn print_report(report: &Report, cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    let mut out = io::stdout().lock();
    write_report(&mut out, report, cfg);
}

pub fn write_report(out: &mut dyn Write, report: &Report, cfg: &UiConfig) {
    let _ = writeln!(
        out,
        "summary: assessed={}  flagged={}  findings={}",
        report.summary.resources_assessed,
        report.summary.resources_flagged,
        report.summary.findings_total
    );
    for note in &report.summary.notes {
        let _ = writeln!(out, "- {note}");
    }

    if report.results.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No findings.");
        return;
    }

    let total = report.results.len();
    let rows = if cfg.verbose {
        total
    } else {
        cfg.max_table_rows.min(total)
    };
    let _ = writeln!(out);
    if total > rows {
        let _ = writeln!(out, "flagged resources (showing {rows} of {total}):");
    } else {
        let _ = writeln!(out, "flagged resources ({total}):");
    }
    write_results_table(out, &report.results, rows);

    for result in report.results.iter().take(rows) {
        let _ = writeln!(out);
        write_result_detail(out, result, cfg);
    }
    if total > rows {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "... {} more resource(s); use --json or --markdown for the full list",
            total - rows
        );
    }
}

pub fn print_rules(chain: &RuleChain, cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    let mut out = io::stdout().lock();
    let id_w = chain
        .rules()
        .map(|r| visible_width_ansi(r.id()))
        .max()
        .unwrap_or(0)
        .max(visible_width_ansi("id"));
    let _ = writeln!(out, "{}  {}  title", pad_start_display("#", 2), pad_end_display("id", id_w));
    for (idx, rule) in chain.rules().enumerate() {
        let _ = writeln!(
            out,
            "{}  {}  {}",
            pad_start_display(&(idx + 1).to_string(), 2),
            pad_end_display(rule.id(), id_w),
            rule.title()
        );
    }
    if chain.is_empty() {
        let _ = writeln!(out, "(all rules disabled)");
    }
}

fn write_results_table(out: &mut dyn Write, results: &[AssessmentResult], rows: usize) {
    let label_count = "findings";
    let label_resource = "resource";
    let label_first = "first finding";

    let count_w = visible_width_ansi(label_count);
    let resource_w = results
        .iter()
        .take(rows)
        .map(|r| visible_width_ansi(&truncate_middle(&r.resource_id, 40)))
        .max()
        .unwrap_or(0)
        .max(visible_width_ansi(label_resource));

    let _ = writeln!(
        out,
        "{}  {}  {}",
        pad_start_display(label_count, count_w),
        pad_end_display(label_resource, resource_w),
        label_first
    );
    let _ = writeln!(
        out,
        "{}  {}  {}",
        "-".repeat(count_w),
        "-".repeat(resource_w),
        "-".repeat(visible_width_ansi(label_first))
    );
    for result in results.iter().take(rows) {
        let first = result
            .findings
            .first()
            .map(|f| f.name.as_str())
            .unwrap_or("");
        let _ = writeln!(
            out,
            "{}  {}  {}",
            pad_start_display(&result.findings.len().to_string(), count_w),
            pad_end_display(&truncate_middle(&result.resource_id, 40), resource_w),
            first
        );
    }
}

fn write_result_detail(out: &mut dyn Write, result: &AssessmentResult, cfg: &UiConfig) {
    let title = display_resource_id(&result.resource_id);
    let _ = writeln!(
        out,
        "{} ({} finding{})",
        paint(&title, "1", cfg.color),
        result.findings.len(),
        if result.findings.len() == 1 { "" } else { "s" }
    );
    for (idx, finding) in result.findings.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {}",
            idx + 1,
            paint(&finding.name, "33", cfg.color)
        );
        let _ = writeln!(out, "     {}", finding.description);
        if cfg.include_remediation {
            let _ = writeln!(out, "     remediation: {}", finding.suggested_remediation);
        }
    }
}

pub fn display_resource_id(resource_id: &str) -> String {
    if resource_id.is_empty() {
        "(unnamed resource)".to_string()
    } else {
        resource_id.to_string()
    }
}

fn paint(s: &str, code: &str, color: bool) -> String {
    if !color {
        return s.to_string();
    }
    format!("\x1b[{code}m{s}\x1b[0m")
}

fn truncate_middle(s: &str, max_chars: usize) -> String {
    let len = s.chars().count();
    if len <= max_chars {
        return s.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let left = keep / 2;
    let right = keep.saturating_sub(left);

    let prefix: String = s.chars().take(left).collect();
    let suffix: String = s.chars().skip(len - right).collect();

    format!("{prefix}...{suffix}")
}

fn pad_end_display(s: &str, width: usize) -> String {
    let w = visible_width_ansi(s);
    if w >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - w))
}

fn pad_start_display(s: &str, width: usize) -> String {
    let w = visible_width_ansi(s);
    if w >= width {
        return s.to_string();
    }
    format!("{}{}", " ".repeat(width - w), s)
}

fn visible_width_ansi(s: &str) -> usize {
    let mut width: usize = 0;
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            let _ = chars.next();
            for ch2 in chars.by_ref() {
                if ch2 == 'm' {
                    break;
                }
            }
            continue;
        }
        width = width.saturating_add(UnicodeWidthChar::width(ch).unwrap_or(0));
    }
    width
}

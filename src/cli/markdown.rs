use std::fmt::Write as _;

use crate::core::Report;
use crate::ui::display_resource_id;

pub(crate) fn format_report(report: &Report, include_remediation: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# secassess report");
    let _ = writeln!(out);
    let _ = writeln!(out, "- tool version: {}", report.tool_version);
    let _ = writeln!(out, "- generated at: {}", report.generated_at);
    let _ = writeln!(
        out,
        "- resources assessed: {}",
        report.summary.resources_assessed
    );
    if report.summary.resources_excluded > 0 {
        let _ = writeln!(
            out,
            "- resources excluded: {}",
            report.summary.resources_excluded
        );
    }
    let _ = writeln!(out, "- findings: {}", report.summary.findings_total);
    for note in &report.summary.notes {
        let _ = writeln!(out, "- note: {note}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## Flagged resources ({})", report.results.len());
    if report.results.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "_No findings._");
    }

    for result in &report.results {
        let _ = writeln!(out);
        let _ = writeln!(out, "### {}", display_resource_id(&result.resource_id));
        for finding in &result.findings {
            let _ = writeln!(out);
            let _ = writeln!(out, "#### {}", finding.name);
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", finding.description);
            if include_remediation {
                let _ = writeln!(out);
                let _ = writeln!(out, "- remediation: {}", finding.suggested_remediation);
            }
        }
    }

    let _ = writeln!(out);
    out
}

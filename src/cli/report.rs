//! Run summaries for the terminal and for machines

use crate::core::{ConsoleKind, Outcome, Result, ScenarioReport};

/// Human-readable summary of a run
pub fn format_summary(reports: &[ScenarioReport]) -> String {
    let passed = reports.iter().filter(|r| r.passed()).count();
    let mut output = String::from("Verification summary:\n─────────────────────────────\n");

    for report in reports {
        match &report.outcome {
            Outcome::Passed => output.push_str(&format!(
                "  ✔ {:<12} passed ({} ms)\n",
                report.scenario, report.elapsed_ms
            )),
            Outcome::Failed { reason, .. } => output.push_str(&format!(
                "  ✘ {:<12} failed ({} ms): {}\n",
                report.scenario, report.elapsed_ms, reason
            )),
        }
        for shot in &report.screenshots {
            output.push_str(&format!("      screenshot: {}\n", shot.display()));
        }
        let errors = report
            .console
            .iter()
            .filter(|e| e.kind == ConsoleKind::PageError)
            .count();
        if errors > 0 {
            output.push_str(&format!("      page errors: {}\n", errors));
        }
    }

    output.push_str(&format!(
        "─────────────────────────────\n{}/{} passed",
        passed,
        reports.len()
    ));
    output
}

/// JSON array of reports
pub fn to_json(reports: &[ScenarioReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

/// 0 when every scenario passed, 1 otherwise
pub fn exit_code(reports: &[ScenarioReport]) -> u8 {
    if reports.iter().all(ScenarioReport::passed) {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConsoleEntry;
    use std::path::PathBuf;

    fn report(name: &str, outcome: Outcome) -> ScenarioReport {
        ScenarioReport {
            scenario: name.to_string(),
            outcome,
            screenshots: vec![PathBuf::from(format!("verification/{}.png", name))],
            console: vec![ConsoleEntry::page_error("boom")],
            elapsed_ms: 12,
        }
    }

    #[test]
    fn test_summary_counts() {
        let reports = vec![
            report("collection", Outcome::Passed),
            report(
                "idmc",
                Outcome::Failed {
                    reason: "Mappings heading not visible".to_string(),
                    missing: Some("Mappings heading".to_string()),
                },
            ),
        ];
        let text = format_summary(&reports);
        assert!(text.contains("✔ collection"));
        assert!(text.contains("✘ idmc"));
        assert!(text.contains("page errors: 1"));
        assert!(text.ends_with("1/2 passed"));
        assert_eq!(exit_code(&reports), 1);
    }

    #[test]
    fn test_all_passed_exit_zero() {
        assert_eq!(exit_code(&[report("idmc", Outcome::Passed)]), 0);
        assert_eq!(exit_code(&[]), 0);
    }

    #[test]
    fn test_json_output() {
        let json = to_json(&[report("idmc", Outcome::Passed)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["scenario"], "idmc");
        assert_eq!(value[0]["outcome"]["status"], "passed");
        assert_eq!(value[0]["console"][0]["kind"], "page_error");
    }
}

//! Closing instructions printed after a successful run

use crate::scaffold::ScaffoldReport;

const WIDTH: usize = 62;

fn boxed(text: &str) -> String {
    format!("*** {:<width$} ***", text, width = WIDTH - 8)
}

/// Lines of the closing banner
pub fn render_summary(report: &ScaffoldReport) -> Vec<String> {
    let rule = "*".repeat(WIDTH);
    let mut lines = vec![
        rule.clone(),
        boxed("Activate environment with source './venv/bin/activate'"),
        boxed("Deactivate environment with 'deactivate'"),
    ];

    if report.tree_alias {
        lines.push(boxed(""));
        lines.push(boxed("git tree command installed"));
    }

    if report.hooks_registered == Some(false) {
        lines.push(boxed(""));
        lines.push(boxed("Run 'pre-commit install' once git is set up"));
    }

    if report.notebook {
        lines.push(boxed(""));
        lines.push(boxed(&format!(
            "Please restart VSCode, and select {} as kernel",
            report.layout.name()
        )));
    }

    lines.push(rule);
    lines
}

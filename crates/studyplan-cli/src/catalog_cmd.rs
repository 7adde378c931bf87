//! `studyplan catalog` command: print the study modes and onboarding questions.

use anyhow::{Context, Result};

use studyplan_core::catalog::{self, Catalog};

/// Run the catalog command, as pretty JSON or a human-readable listing.
pub fn run_catalog(json: bool) -> Result<()> {
    let catalog = catalog::load_catalog().context("failed to load catalog")?;
    if json {
        let out = serde_json::to_string_pretty(&catalog).context("failed to serialize catalog")?;
        println!("{out}");
    } else {
        print!("{}", render_catalog(&catalog));
    }
    Ok(())
}

/// Render the catalog as a plain-text listing.
pub fn render_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();

    out.push_str("Modes:\n");
    out.push_str(&format!("  {:<16} {:<16} {:<8} DESCRIPTION\n", "ID", "NAME", "COLOR"));
    for mode in &catalog.modes {
        out.push_str(&format!(
            "  {:<16} {:<16} {:<8} {}\n",
            mode.id, mode.name, mode.color, mode.description
        ));
    }
    out.push('\n');

    out.push_str("Questions:\n");
    for question in &catalog.questions {
        let kind = serde_json::to_value(question.kind)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        out.push_str(&format!("  {} ({kind}): {}\n", question.id, question.question));
        if !question.options.is_empty() {
            out.push_str(&format!("    options: {}\n", question.options.join(", ")));
        }
    }

    out
}

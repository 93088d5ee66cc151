//! Output for the `summary` and `export` commands.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use splitcalc_export::{format_amount, serialize};
use splitcalc_ledger::Ledger;

/// Plain-text summary: one line per person, then totals.
pub fn render_summary(ledger: &Ledger) -> String {
    let summary = ledger.summary();
    let width = summary
        .people
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Grand total".len());

    let mut out = String::new();
    for person in &summary.people {
        out.push_str(&format!(
            "{:<width$}  ${}\n",
            person.name,
            format_amount(person.owed_amount)
        ));
    }
    if summary.unassigned_total != 0.0 {
        out.push_str(&format!(
            "{:<width$}  ${}\n",
            "Unassigned",
            format_amount(summary.unassigned_total)
        ));
    }
    out.push_str(&format!(
        "{:<width$}  ${}\n",
        "Grand total",
        format_amount(summary.grand_total)
    ));
    out
}

pub fn write_summary_json(ledger: &Ledger, mut out: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, &ledger.summary()).context("failed to encode summary")?;
    writeln!(out)?;
    Ok(())
}

/// Write the CSV export to `output`, or to `stdout` when `output` is `-`.
pub fn write_export(ledger: &Ledger, output: &Path, stdout: impl Write) -> Result<()> {
    let text = serialize(ledger.items())?;

    if output == Path::new("-") {
        let mut stdout = stdout;
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    std::fs::write(output, &text)
        .with_context(|| format!("failed to write export to {}", output.display()))?;
    tracing::info!(path = %output.display(), rows = ledger.items().len(), "export written");
    Ok(())
}

use splitcalc_core::{SplitError, SplitResult};
use splitcalc_ledger::Item;

/// Suggested file name for the exported CSV.
pub const DEFAULT_FILE_NAME: &str = "split_calculator.csv";

/// Column headers, in output order.
pub const HEADER: [&str; 5] = ["Item Name", "Price", "Quantity", "Shared By", "Total"];

const SHARER_SEPARATOR: &str = ", ";

/// Render an amount with two decimal places.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Serialize items to CSV: one header line, then one line per item in order.
///
/// Every field is double-quoted and each line ends with `\n`. An empty item
/// list is rejected with [`SplitError::ExportEmpty`].
pub fn serialize(items: &[Item]) -> SplitResult<String> {
    if items.is_empty() {
        return Err(SplitError::ExportEmpty);
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(HEADER)
        .map_err(|e| SplitError::export(e.to_string()))?;

    for item in items {
        writer
            .write_record([
                item.name().to_string(),
                format_amount(item.unit_price()),
                item.quantity().to_string(),
                item.shared_by().join(SHARER_SEPARATOR),
                format_amount(item.total()),
            ])
            .map_err(|e| SplitError::export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SplitError::export(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| SplitError::export(e.to_string()))?;

    tracing::debug!(rows = items.len(), bytes = text.len(), "serialized items to csv");
    Ok(text)
}

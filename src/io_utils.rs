use std::path::Path;

use crate::errors::TaggerError;
use crate::scoring::EvaluationRow;

pub const ZERO_SHOT_HEADERS: [&str; 5] = [
    "Ticket Description",
    "Ticket Type",
    "Predicted Tags",
    "Top-1 Match",
    "Top-3 Match",
];

pub const FEW_SHOT_HEADERS: [&str; 5] = [
    "Ticket Description",
    "Ticket Type",
    "Predicted Tags (Few-shot)",
    "Top-1 Match (FS)",
    "Top-3 Match (FS)",
];

/// Write an evaluation table, replacing any existing file. Flags are `1`/`0`.
pub fn write_evaluation(
    path: &Path,
    headers: &[&str; 5],
    rows: &[EvaluationRow],
) -> Result<(), TaggerError> {
    let output = |source| TaggerError::Output {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(output)?;
    writer.write_record(headers).map_err(output)?;
    for row in rows {
        let prediction = row.prediction.raw_text();
        writer
            .write_record([
                row.ticket.description.as_str(),
                row.ticket.label.as_str(),
                prediction.as_str(),
                flag(row.flags.top1),
                flag(row.flags.top3),
            ])
            .map_err(output)?;
    }
    writer.flush().map_err(|e| output(e.into()))?;
    Ok(())
}

fn flag(matched: bool) -> &'static str {
    if matched {
        "1"
    } else {
        "0"
    }
}

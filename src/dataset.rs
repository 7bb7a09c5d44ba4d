use std::{fs::File, path::Path};

use rand::{rngs::StdRng, seq::index, SeedableRng};
use tracing::{debug, warn};

use crate::errors::TaggerError;

/// One support ticket as read from the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// 0-based data row position in the source file.
    pub id: usize,
    pub description: String,
    pub label: String,
}

/// Names of the two columns the loader needs.
#[derive(Debug, Clone)]
pub struct Columns<'a> {
    pub description: &'a str,
    pub label: &'a str,
}

/// Read every ticket whose description cell is not empty. Whitespace-only
/// descriptions are kept.
pub fn load_tickets(path: &Path, columns: &Columns<'_>) -> Result<Vec<Ticket>, TaggerError> {
    let file = File::open(path).map_err(|source| TaggerError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let malformed = |source| TaggerError::MalformedDataset {
        path: path.to_path_buf(),
        source,
    };
    let headers = reader.headers().map_err(malformed)?.clone();
    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| TaggerError::Schema {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let desc_idx = column_index(columns.description)?;
    let label_idx = column_index(columns.label)?;

    let mut tickets = Vec::new();
    let mut skipped = 0usize;
    for (id, record) in reader.records().enumerate() {
        let record = record.map_err(malformed)?;
        let description = record.get(desc_idx).unwrap_or_default();
        if description.is_empty() {
            skipped += 1;
            continue;
        }
        tickets.push(Ticket {
            id,
            description: description.to_string(),
            label: record.get(label_idx).unwrap_or_default().to_string(),
        });
    }

    debug!(
        "Loaded {} tickets from {} ({} without description)",
        tickets.len(),
        path.display(),
        skipped
    );
    Ok(tickets)
}

/// Draw `n` tickets without replacement. The same seed over the same input
/// always yields the same tickets in the same order.
pub fn sample(tickets: &[Ticket], n: usize, seed: u64) -> Vec<Ticket> {
    let amount = if n > tickets.len() {
        warn!(
            "Requested sample of {} but only {} tickets available; using all of them",
            n,
            tickets.len()
        );
        tickets.len()
    } else {
        n
    };
    let mut rng = StdRng::seed_from_u64(seed);
    index::sample(&mut rng, tickets.len(), amount)
        .into_iter()
        .map(|i| tickets[i].clone())
        .collect()
}

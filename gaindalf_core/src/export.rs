//! CSV export of progression indexes.

use crate::{Error, Result, WorkoutIndexes};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    workout_id: i64,
    date: String,
    strength_index: Option<f64>,
    endurance_index: Option<f64>,
}

impl From<&WorkoutIndexes> for CsvRow {
    fn from(indexes: &WorkoutIndexes) -> Self {
        CsvRow {
            workout_id: indexes.workout_id,
            date: indexes.date.to_string(),
            strength_index: indexes.strength_index,
            endurance_index: indexes.endurance_index,
        }
    }
}

/// Write indexes to `path` with a header row, replacing any existing file
///
/// Undefined indexes are written as empty cells. Returns the number of rows.
pub fn write_indexes_csv(path: &Path, indexes: &[WorkoutIndexes]) -> Result<usize> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp.as_file());
        writer.write_record(["workout_id", "date", "strength_index", "endurance_index"])?;
        for row in indexes {
            writer.serialize(CsvRow::from(row))?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} rows to {:?}", indexes.len(), path);
    Ok(indexes.len())
}

//! Writing calendars to .ics files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{ExportError, ExportResult};
use crate::event::NamedEvents;
use crate::ics::generate_calendar;

const EXTENSION: &str = ".ics";

/// What happened to one calendar of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was written completely
    Written(PathBuf),
    /// The calendar had no events; no file was created
    Skipped(String),
}

/// Write each calendar to `<name>.ics` in `target_dir`, creating the
/// directory if needed. Empty calendars are skipped.
pub fn write_all(calendars: &[NamedEvents], target_dir: &Path) -> ExportResult<Vec<WriteOutcome>> {
    fs::create_dir_all(target_dir).map_err(|source| ExportError::CreateDir {
        path: target_dir.to_path_buf(),
        source,
    })?;

    let mut outcomes = Vec::with_capacity(calendars.len());
    for calendar in calendars {
        let file_name = file_name(&calendar.name);

        if calendar.events.is_empty() {
            warn!("The calendar called \"{file_name}\" would be empty and is not going to be created");
            outcomes.push(WriteOutcome::Skipped(file_name));
            continue;
        }

        let path = target_dir.join(&file_name);
        let content = generate_calendar(&calendar.events);
        fs::write(&path, content).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

        info!(
            events = calendar.events.len(),
            "Successful creation of the file named \"{file_name}\""
        );
        outcomes.push(WriteOutcome::Written(path));
    }

    Ok(outcomes)
}

/// `<name>.ics`, with path separators replaced so every file lands directly
/// in the target directory.
fn file_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    if safe.ends_with(EXTENSION) {
        safe
    } else {
        format!("{safe}{EXTENSION}")
    }
}

//! Run summary JSON.

use std::path::Path;

use crate::error::AppError;
use crate::io::atomic::{StagedFile, stage_file};
use crate::report::summary::RunSummary;

pub fn stage_summary_json(path: &Path, summary: &RunSummary) -> Result<StagedFile, AppError> {
    stage_file(path, |file| {
        serde_json::to_writer_pretty(file, summary)
            .map_err(|e| AppError::output(format!("Failed to write summary JSON: {e}")))
    })
}

//! Curriculum manifest: which discovered files made it into the curriculum

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{CurriculumError, Result};
use crate::task::TaskFile;

/// Render the manifest as CSV with an index column, one row per discovered file
#[must_use]
pub fn render_manifest(all: &[TaskFile], selected: &[TaskFile]) -> String {
    let chosen: HashSet<&str> = selected.iter().map(|f| f.name.as_str()).collect();
    let mut out = String::from(",taskName,inCurriculum\n");
    for (i, file) in all.iter().enumerate() {
        let flag = u8::from(chosen.contains(file.name.as_str()));
        let _ = writeln!(out, "{i},{},{flag}", file.name);
    }
    out
}

/// Write the manifest to `path`
pub fn write_manifest(path: &Path, all: &[TaskFile], selected: &[TaskFile]) -> Result<()> {
    fs::write(path, render_manifest(all, selected)).map_err(CurriculumError::io(path))?;
    info!(path = %path.display(), "curriculum overview written");
    Ok(())
}

//! Merging task files into one arena configuration
//!
//! Every task file starts with the two header lines
//! `!ArenaConfig` / `arenas:` followed by a single arena keyed `0` or `-1`.
//! Merging keeps one shared header and rekeys each arena by its position.

use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{error, info};

use crate::error::{CurriculumError, Result};
use crate::task::TaskFile;

/// Header shared by every arena configuration
pub const ARENA_HEADER: &str = "!ArenaConfig\narenas:\n";

/// Lines of header at the top of each task file
const HEADER_LINES: usize = 2;

/// Arena keys written by the task generator
const LEGACY_KEYS: [&str; 2] = ["-1: !Arena", "0: !Arena"];

/// Rewrite the arena key on the first body line to `index`.
///
/// Lines that do not start with a legacy key are returned unchanged.
#[must_use]
pub fn rekey_first_line(line: &str, index: usize) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];
    for key in LEGACY_KEYS {
        if let Some(rest) = body.strip_prefix(key) {
            return format!("{indent}{index}: !Arena{rest}");
        }
    }
    line.to_owned()
}

/// Body of one task file with its arena keyed `index`
pub fn arena_body(path: &Path, index: usize) -> Result<String> {
    let content = fs::read_to_string(path).map_err(CurriculumError::io(path))?;
    let mut lines = content.lines().skip(HEADER_LINES);
    let first = lines.next().ok_or_else(|| CurriculumError::MalformedTask {
        path: path.to_path_buf(),
        reason: "no arena after the header".into(),
    })?;

    let mut body = rekey_first_line(first, index);
    body.push('\n');
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    Ok(body)
}

/// Merge `files` in order into `destination`
pub fn try_assemble(files: &[TaskFile], destination: &Path) -> Result<PathBuf> {
    let mut merged = String::from(ARENA_HEADER);
    for (index, file) in files.iter().enumerate() {
        merged.push_str(&format!("# {}\n", file.name));
        merged.push_str(&arena_body(&file.path, index)?);
    }

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(CurriculumError::io(parent))?;
    }
    fs::write(destination, merged).map_err(CurriculumError::io(destination))?;
    info!(path = %destination.display(), arenas = files.len(), "task files combined");
    Ok(destination.to_path_buf())
}

/// Merge `files` into `destination`, logging and returning `None` on failure
pub fn assemble(files: &[TaskFile], destination: &Path) -> Option<PathBuf> {
    match try_assemble(files, destination) {
        Ok(path) => Some(path),
        Err(e) => {
            error!(error = %e, "an error occurred while combining files");
            None
        }
    }
}

/// Split `items` into `n` contiguous, nearly equal chunks.
///
/// Chunk `i` spans `round(i * len / n)..round((i + 1) * len / n)` with
/// ties rounded to even.
pub fn partition<T>(items: &[T], n: usize) -> Result<Vec<&[T]>> {
    if n == 0 {
        return Err(CurriculumError::InvalidPartition(n));
    }
    #[allow(clippy::cast_precision_loss)]
    let division = items.len() as f64 / n as f64;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let bound = |i: usize| ((division * i as f64).round_ties_even() as usize).min(items.len());

    Ok((0..n).map(|i| &items[bound(i)..bound(i + 1)]).collect())
}

/// Path of part `k` next to `destination`: `<stem>_part<k>.<ext>`
#[must_use]
pub fn part_path(destination: &Path, k: usize) -> PathBuf {
    let stem = destination
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match destination.extension() {
        Some(ext) => format!("{stem}_part{k}.{}", ext.to_string_lossy()),
        None => format!("{stem}_part{k}"),
    };
    destination.with_file_name(name)
}

/// Optionally shuffle, then merge `n` partitions into numbered files.
///
/// Each part fails on its own: a part that cannot be written is logged and
/// left as `None` while the remaining parts are still written.
pub fn assemble_in_parts<R: Rng + ?Sized>(
    files: &[TaskFile],
    destination: &Path,
    n: usize,
    shuffle: bool,
    rng: &mut R,
) -> Result<Vec<Option<PathBuf>>> {
    let mut files = files.to_vec();
    if shuffle {
        files.shuffle(rng);
    }

    Ok(partition(&files, n)?
        .into_iter()
        .enumerate()
        .map(|(k, part)| assemble(part, &part_path(destination, k + 1)))
        .collect())
}

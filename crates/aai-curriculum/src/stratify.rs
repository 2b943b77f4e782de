//! Stratified sampling of task files

use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::task::{Category, TaskFile};

/// Files drawn from category `n` of `total` files when `target` are wanted.
///
/// Rounds up, so the sum over categories may exceed `target`.
#[must_use]
pub fn category_quota(target: usize, n: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    (target * n).div_ceil(total)
}

/// Sample about `target` files, proportionally to category size.
///
/// `target` is clamped to the number of files. Files in no category are
/// never selected. The selection keeps the input order.
pub fn stratify<R: Rng + ?Sized>(files: &[TaskFile], target: usize, rng: &mut R) -> Vec<TaskFile> {
    let total = files.len();
    let target = target.min(total);

    let mut by_category: BTreeMap<Category, Vec<&TaskFile>> = BTreeMap::new();
    let mut uncategorised = 0usize;
    for file in files {
        match file.category {
            Some(category) => by_category.entry(category).or_default().push(file),
            None => uncategorised += 1,
        }
    }
    if uncategorised > 0 {
        warn!(count = uncategorised, "task files match no category and are left out");
    }

    let mut selected: HashSet<&TaskFile> = HashSet::new();
    for (category, members) in &by_category {
        let quota = category_quota(target, members.len(), total);
        debug!(%category, available = members.len(), quota, "sampling category");
        selected.extend(members.choose_multiple(rng, quota).copied());
    }

    files
        .iter()
        .filter(|file| selected.contains(file))
        .cloned()
        .collect()
}

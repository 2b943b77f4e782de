//! Filtering out tasks an agent has already completed

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use aai_curriculum::TaskFile;

fn stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

/// Drop files whose name, with or without extension, is in `completed`
#[must_use]
pub fn drop_completed(files: Vec<TaskFile>, completed: &HashSet<String>) -> Vec<TaskFile> {
    let before = files.len();
    let remaining: Vec<TaskFile> = files
        .into_iter()
        .filter(|file| {
            !completed.contains(&file.name) && !completed.contains(stem(&file.name))
        })
        .collect();

    info!(
        "Dropping {} instances that have already been run before",
        before - remaining.len()
    );
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_drop_completed() {
        let files: Vec<TaskFile> = ["a/tutorial_1.yml", "a/tutorial_2.yml", "b/OP-STC-1.yaml"]
            .iter()
            .filter_map(|p| TaskFile::from_path(p.into()))
            .collect();
        let completed: HashSet<String> = ["tutorial_1.yml", "OP-STC-1", "unrelated"]
            .iter()
            .map(ToString::to_string)
            .collect();

        let remaining = drop_completed(files, &completed);
        let names: Vec<&str> = remaining.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["tutorial_2.yml"]);
    }

    #[test]
    fn test_nothing_completed() {
        let files: Vec<TaskFile> = TaskFile::from_path("x.yml".into()).into_iter().collect();
        assert_eq!(drop_completed(files.clone(), &HashSet::new()), files);
    }
}

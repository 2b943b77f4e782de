//! Task file discovery and categorisation

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CurriculumError, Result};

/// Extensions recognised as arena configuration files
pub const TASK_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Task family, derived from substrings of the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Basic controls and tutorials
    Basic,
    /// Control condition, chick in a cylinder
    ControlCvChick,
    /// Control condition, three cups
    ControlCup,
    /// Control condition, cup grids
    ControlGrid,
    /// Object permanence, chick in a cylinder
    OpCvChick,
    /// Object permanence, three cups
    OpCup,
    /// Object permanence, cup grids
    OpGrid,
}

impl Category {
    /// All categories in sampling order
    pub const ALL: [Category; 7] = [
        Category::Basic,
        Category::ControlCvChick,
        Category::ControlCup,
        Category::ControlGrid,
        Category::OpCvChick,
        Category::OpCup,
        Category::OpGrid,
    ];

    /// Classify a file name; `None` when no pattern matches
    #[must_use]
    pub fn classify(name: &str) -> Option<Self> {
        let late_tutorial = name.contains("tutorial_6") || name.contains("tutorial_7");
        let grid = |prefix: &str| {
            ["12CupGrid", "8CupGrid", "4CupGrid"]
                .iter()
                .any(|size| name.contains(&format!("{prefix}{size}")))
        };

        if (name.contains("OP-Controls-Basic") || name.contains("tutorial")) && !late_tutorial {
            Some(Self::Basic)
        } else if name.contains("OP-RP-Allo-CVChick") || late_tutorial {
            Some(Self::ControlCvChick)
        } else if name.contains("OP-RP-Allo-PCTB-3Cup") {
            Some(Self::ControlCup)
        } else if grid("OP-RP-Allo-PCTB-") {
            Some(Self::ControlGrid)
        } else if name.contains("OP-STC-Allo-CVChick") {
            Some(Self::OpCvChick)
        } else if name.contains("OP-STC-Allo-PCTB-3Cup") {
            Some(Self::OpCup)
        } else if grid("OP-STC-Allo-PCTB-") {
            Some(Self::OpGrid)
        } else {
            None
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// One arena configuration file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskFile {
    /// Full path
    pub path: PathBuf,
    /// File name
    pub name: String,
    /// Category, if the name matches one
    pub category: Option<Category>,
}

impl TaskFile {
    /// Describe the file at `path`; `None` unless it has a task extension
    #[must_use]
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if !TASK_EXTENSIONS.contains(&extension) {
            return None;
        }
        let name = path.file_name()?.to_str()?.to_owned();
        let category = Category::classify(&name);
        Some(Self {
            path,
            name,
            category,
        })
    }
}

/// Recursively collect task files under `dir`, sorted by path
pub fn discover(dir: &Path) -> Result<Vec<TaskFile>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current).map_err(CurriculumError::io(&current))?;
        for entry in entries {
            let entry = entry.map_err(CurriculumError::io(&current))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(CurriculumError::io(&path))?;
            if file_type.is_dir() {
                pending.push(path);
            } else if let Some(task) = TaskFile::from_path(path) {
                files.push(task);
            }
        }
    }

    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "discovered task files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Category::classify("OP-Controls-Basic-Green.yml"), Some(Category::Basic));
        assert_eq!(Category::classify("tutorial_3.yml"), Some(Category::Basic));
        assert_eq!(Category::classify("tutorial_6.yml"), Some(Category::ControlCvChick));
        assert_eq!(
            Category::classify("OP-RP-Allo-PCTB-3Cup-A.yml"),
            Some(Category::ControlCup)
        );
        assert_eq!(
            Category::classify("OP-RP-Allo-PCTB-8CupGrid-1.yml"),
            Some(Category::ControlGrid)
        );
        assert_eq!(
            Category::classify("OP-STC-Allo-CVChick-2.yaml"),
            Some(Category::OpCvChick)
        );
        assert_eq!(Category::classify("OP-STC-Allo-PCTB-3Cup.yml"), Some(Category::OpCup));
        assert_eq!(
            Category::classify("OP-STC-Allo-PCTB-12CupGrid.yml"),
            Some(Category::OpGrid)
        );
        assert_eq!(Category::classify("random-arena.yml"), None);
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        assert!(TaskFile::from_path("a/b.yml".into()).is_some());
        assert!(TaskFile::from_path("a/b.yaml".into()).is_some());
        assert!(TaskFile::from_path("a/b.YML".into()).is_none());
        assert!(TaskFile::from_path("a/b.txt".into()).is_none());
    }

    #[test]
    fn test_discover_recurses_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("nested/deeper");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join("b.yml"), "").unwrap();
        fs::write(tmp.path().join("notes.md"), "").unwrap();
        fs::write(nested.join("a.yaml"), "").unwrap();

        let files = discover(tmp.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b.yml", "a.yaml"]);
        assert!(files[1].path.ends_with("nested/deeper/a.yaml"));
    }

    #[test]
    fn test_discover_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let result = discover(&tmp.path().join("missing"));
        assert!(matches!(result, Err(CurriculumError::Io { .. })));
    }
}

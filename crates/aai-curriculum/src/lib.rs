//! Curriculum assembly for AnimalAI
//!
//! Discovers arena configuration files, optionally samples them by task
//! category, and merges them into one configuration (or several numbered
//! parts) with arenas rekeyed by position.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assemble;
pub mod error;
pub mod manifest;
pub mod stratify;
pub mod task;

pub use assemble::{
    assemble, assemble_in_parts, partition, part_path, try_assemble, ARENA_HEADER,
};
pub use error::{CurriculumError, Result};
pub use manifest::write_manifest;
pub use stratify::{category_quota, stratify};
pub use task::{discover, Category, TaskFile};

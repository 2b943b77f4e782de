//! Persistence of AnimalAI agent results in MySQL
//!
//! Registers agents, finds the task instances an agent has already been
//! evaluated on, and resolves ids by simple equality lookups.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod pending;
pub mod query;
pub mod record;
pub mod store;

pub use config::{ConnectionSource, DatabaseConfig};
pub use error::{ResultsError, Result};
pub use pending::drop_completed;
pub use query::{identifier, IdQuery};
pub use record::{AgentRecord, SqlValue};
pub use store::{InsertOutcome, MySqlResultStore};

// AnimalAI results CLI
// Agent registration and pending-task queries against the results database

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aai_curriculum::discover;
use aai_results::{
    drop_completed, AgentRecord, ConnectionSource, IdQuery, InsertOutcome, MySqlResultStore,
};

#[derive(Parser)]
#[command(name = "aai-results")]
#[command(about = "AnimalAI results database tools", version)]
struct Cli {
    /// TOML file with database settings; DATABASE_URL is used when absent
    #[arg(long, global = true)]
    db_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List task files an agent has not been evaluated on yet
    Pending {
        /// Directory of task files
        #[arg(long)]
        dir: PathBuf,

        /// Agent id
        #[arg(long)]
        agent_id: i64,

        /// Agent table
        #[arg(long, default_value = "agents")]
        agent_table: String,

        /// Per-instance results table
        #[arg(long, default_value = "agent_instance_results")]
        results_table: String,
    },

    /// Resolve an id by one or two column values
    LookupId {
        /// Id column to return
        #[arg(long)]
        id_column: String,

        /// Table to search
        #[arg(long)]
        table: String,

        /// Column to match
        #[arg(long)]
        column: String,

        /// Value to match
        #[arg(long)]
        value: String,

        /// Second column to match
        #[arg(long, requires = "and_value")]
        and_column: Option<String>,

        /// Value for the second column
        #[arg(long, requires = "and_column")]
        and_value: Option<String>,

        /// Return duplicates instead of SELECT DISTINCT
        #[arg(long)]
        no_distinct: bool,
    },

    /// Insert an agent described by a flat JSON object
    RegisterAgent {
        /// JSON file with the agent's columns
        #[arg(long)]
        record: PathBuf,

        /// Agent table
        #[arg(long, default_value = "agents")]
        table: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let source = ConnectionSource::resolve(cli.db_config.as_deref())
        .context("Failed to read database settings")?;
    let store = MySqlResultStore::connect(&source)
        .await
        .context("Failed to connect to the results database")?;

    match cli.command {
        Commands::Pending {
            dir,
            agent_id,
            agent_table,
            results_table,
        } => {
            let files = discover(&dir)
                .with_context(|| format!("Failed to search {}", dir.display()))?;
            let completed = store
                .completed_instances(&agent_table, &results_table, agent_id)
                .await?;
            for file in drop_completed(files, &completed) {
                println!("{}", file.path.display());
            }
        }

        Commands::LookupId {
            id_column,
            table,
            column,
            value,
            and_column,
            and_value,
            no_distinct,
        } => {
            let mut lookup = IdQuery::new(id_column, table, column, value).distinct(!no_distinct);
            if let (Some(column), Some(value)) = (and_column, and_value) {
                lookup = lookup.and(column, value);
            }
            println!("{}", store.select_id(&lookup).await?);
        }

        Commands::RegisterAgent { record, table } => {
            let text = std::fs::read_to_string(&record)
                .with_context(|| format!("Failed to read {}", record.display()))?;
            let json: serde_json::Value = serde_json::from_str(&text)?;
            let record = AgentRecord::from_json(&json)?;
            match store.insert_agent(&table, &record).await? {
                InsertOutcome::Inserted => info!(table, "agent registered"),
                InsertOutcome::Duplicate => info!(table, "agent already registered"),
            }
        }
    }

    Ok(())
}

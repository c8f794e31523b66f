use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::PathBuf,
};

use anyhow::Context;
use cdc_dispatch::{ChangeEvent, FieldSet};
use clap::Parser;

use crate::handler::ContactChangeHandler;

/// Dispatches one batch of Contact change events read as a JSON array.
#[derive(Debug, Parser)]
#[command(name = "contact-sync")]
pub struct SyncConfig {
    /// Batch file, or `-` for stdin.
    #[arg(long, short)]
    pub batch: PathBuf,

    /// Entity name the handler is registered under.
    #[arg(long, default_value = "Contact")]
    pub entity: String,

    /// Fields whose changes are acted upon.
    #[arg(
        long = "interest",
        value_name = "FIELD",
        default_values = ContactChangeHandler::DEFAULT_INTEREST
    )]
    pub interest: Vec<String>,

    /// Exit with an error once the batch is done if any event or the batch
    /// completion failed.
    #[arg(long)]
    pub strict: bool,
}

impl SyncConfig {
    pub fn interest(&self) -> FieldSet {
        self.interest.iter().map(String::as_str).collect()
    }

    pub fn read_batch(&self) -> anyhow::Result<Vec<ChangeEvent>> {
        let reader: Box<dyn Read> = if self.batch.as_os_str() == "-" {
            Box::new(io::stdin().lock())
        } else {
            let file = File::open(&self.batch)
                .with_context(|| format!("failed to open {}", self.batch.display()))?;
            Box::new(file)
        };

        serde_json::from_reader(BufReader::new(reader))
            .with_context(|| format!("failed to parse batch {}", self.batch.display()))
    }
}

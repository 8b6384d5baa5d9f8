pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "studydesk")]
#[command(about = "Studydesk CLI - manage the exam-prep storefront backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long, help = "Listen port (overrides STUDYDESK_PORT / PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Create the application database and apply the schema")]
    Init {
        #[arg(long, help = "Drop and recreate the database first")]
        drop: bool,
    },

    #[command(about = "Replace all data with the sample catalog, tests, and admin account")]
    Seed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Init { drop } => commands::init::handle(drop, output_format).await,
        Commands::Seed => commands::seed::handle(output_format).await,
    }
}

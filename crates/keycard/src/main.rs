mod commands;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keycard")]
#[command(about = "Declarative management of Keycard zones, applications and credentials", long_about = None)]
#[command(version)]
struct Cli {
    /// State directory
    #[arg(long, global = true, default_value = keycard_provider::DEFAULT_STATE_DIR)]
    state: PathBuf,

    /// Provider config file (overrides discovery)
    #[arg(short, long, global = true, env = "KEYCARD_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the changes needed to reach the desired resources
    Plan {
        /// Desired resources (YAML or JSON)
        file: PathBuf,
    },
    /// Create, update, replace and delete resources to match the file
    Apply {
        /// Desired resources (YAML or JSON)
        file: PathBuf,
        /// Apply without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Re-read managed resources and drop those deleted outside this tool
    Refresh,
    /// Bring an existing object under management
    Import {
        /// Resource type (e.g. keycard_application)
        resource_type: String,
        /// Name to manage it under
        name: String,
        /// Import ID (e.g. zones/{zone_id}/applications/{id})
        id: String,
    },
    /// Delete managed resources
    Destroy {
        /// Only this resource, as `type.name`
        address: Option<String>,
        /// Delete without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Run a data source and print the result as JSON
    Read {
        /// Data source type (e.g. keycard_zone)
        data_source: String,
        /// Data source arguments (YAML or JSON object)
        file: PathBuf,
    },
    /// List resource and data source types
    Resources,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Listing types needs no credentials
    if matches!(cli.command, Commands::Resources) {
        commands::resources::handle();
        return Ok(());
    }

    let provider = utils::configured_provider(cli.config.as_deref()).await?;
    let context = commands::Context {
        provider,
        state: keycard_provider::StateManager::new(&cli.state),
    };

    match cli.command {
        Commands::Plan { file } => commands::plan::handle(&context, &file).await,
        Commands::Apply { file, yes } => commands::apply::handle(&context, &file, yes).await,
        Commands::Refresh => commands::refresh::handle(&context).await,
        Commands::Import {
            resource_type,
            name,
            id,
        } => commands::import::handle(&context, &resource_type, &name, &id).await,
        Commands::Destroy { address, yes } => {
            commands::destroy::handle(&context, address.as_deref(), yes).await
        }
        Commands::Read { data_source, file } => {
            commands::read::handle(&context, &data_source, &file).await
        }
        Commands::Resources => Ok(()),
    }
}

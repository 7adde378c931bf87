mod catalog_cmd;
mod config;
mod generate_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use config::ServerConfig;

#[derive(Parser)]
#[command(name = "studyplan", about = "Rule-based study plan generator and API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a studyplan config file
    Init {
        /// Address the server binds to
        #[arg(long, default_value = config::DEFAULT_BIND)]
        bind: String,
        /// Port the server listens on
        #[arg(long, default_value_t = config::DEFAULT_PORT)]
        port: u16,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run the HTTP API
    Serve {
        /// Bind address (overrides STUDYPLAN_BIND env var)
        #[arg(long)]
        bind: Option<String>,
        /// Port (overrides STUDYPLAN_PORT env var)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate a study plan and print it as JSON
    Generate {
        /// Study mode (e.g. APRU_1b, APRU_REASONING)
        #[arg(long)]
        mode: String,
        /// Path to an answers JSON file, or "-" for stdin (omit for defaults)
        #[arg(long)]
        answers: Option<String>,
        /// Treat this date (YYYY-MM-DD) as today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Show available study modes and onboarding questions
    Catalog {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Execute the `studyplan init` command: write config file.
fn cmd_init(bind: &str, port: u16, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        server: config::ServerSection {
            bind: bind.to_string(),
            port,
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  server.bind = {bind}");
    println!("  server.port = {port}");
    println!();
    println!("Next: run `studyplan serve` to start the API.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { bind, port, force } => {
            cmd_init(&bind, port, force)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = ServerConfig::resolve(bind.as_deref(), port)?;
            serve_cmd::run_serve(&resolved.bind, resolved.port).await?;
        }
        Commands::Generate {
            mode,
            answers,
            today,
        } => {
            generate_cmd::run_generate(&mode, answers.as_deref(), today)?;
        }
        Commands::Catalog { json } => {
            catalog_cmd::run_catalog(json)?;
        }
    }

    Ok(())
}

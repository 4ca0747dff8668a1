use anyhow::Result;
use clap::{Parser, Subcommand};
use deprov_console::api::HttpApiClient;
use deprov_console::console::TerminalView;
use deprov_console::{ConsoleConfig, FormController, TokioSleeper, config, console, logging};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deprov_console")]
#[command(about = "Terminal console for the user deprovisioning admin workflow")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration file
    Init {
        /// Path to save the config file
        #[arg(short, long, default_value = "deprov_config.pvt.toml")]
        config: PathBuf,
    },
    /// Run the interactive console
    Run {
        /// Path to the config file
        #[arg(short, long, default_value = "deprov_config.pvt.toml")]
        config: PathBuf,
    },
    /// Run a one-shot connection test and exit
    Test {
        /// Path to the config file
        #[arg(short, long, default_value = "deprov_config.pvt.toml")]
        config: PathBuf,
    },
}

/// Prompt for directory credentials not prefilled in config. The password
/// is always prompted; it is never read from disk.
fn ensure_credentials(config: &ConsoleConfig) -> Result<(String, String)> {
    let mut username = config.auth.username.clone();
    if username.is_empty() || username == "your-username" {
        print!("Enter directory username: ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        username = input.trim().to_string();

        if username.is_empty() {
            return Err(anyhow::anyhow!("Username cannot be empty"));
        }
    }

    let password = rpassword::prompt_password("Enter directory password: ")?;
    if password.is_empty() {
        return Err(anyhow::anyhow!("Password cannot be empty"));
    }

    println!("Credentials configured for user: {username}");
    Ok((username, password))
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { config: path } => {
            let default_config = config::create_default_config();
            config::save_config(&default_config, &path)?;
            println!("Configuration file created at: {}", path.display());
            println!("Please edit the file with your backend URL.");
        }

        Commands::Run { config: path } => {
            let config = config::load_config(&path)?;
            let (username, password) = ensure_credentials(&config)?;

            if let Err(err) = console::run(config, username, password).await {
                tracing::error!("console session failed: {err:#}");
                return Err(err);
            }
        }

        Commands::Test { config: path } => {
            let config = config::load_config(&path)?;
            let (username, password) = ensure_credentials(&config)?;

            let api = HttpApiClient::new(&config.base_url)?;
            let mut controller = FormController::new(api, TerminalView::new(), TokioSleeper);
            controller.set_username(&username);
            controller.set_password(&password);
            controller.test_connections().await;
            controller.clear_sensitive_data();
        }
    }

    Ok(())
}

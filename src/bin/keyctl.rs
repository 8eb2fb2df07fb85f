use std::io::{self, BufRead};
use std::path::PathBuf;

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};

use key_manager_client::config::{load_config, ObservabilityConfig};
use key_manager_client::identity::{derive_key_hash, generate_secret};
use key_manager_client::observability::logging::init_logging;
use key_manager_client::KeyManager;

#[derive(Parser)]
#[command(name = "keyctl")]
#[command(about = "Inspect API keys managed by an on-chain key manager", long_about = None)]
struct Cli {
    /// Session configuration (TOML).
    #[arg(short, long, default_value = "key-manager.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new API key secret and print its public hash
    Generate,
    /// Print the public hash of a secret read from KEY_MANAGER_SECRET or stdin
    Hash,
    /// Show the payment token used by the contract
    Token,
    /// Show on-chain info for the key derived from a secret read from
    /// KEY_MANAGER_SECRET or stdin
    KeyInfo,
    /// Show price and status of a tier
    Tier { id: U256 },
    /// Show the payment token balance of an address
    Balance { address: Address },
}

/// Environment variable checked for a secret before falling back to stdin.
const SECRET_ENV_VAR: &str = "KEY_MANAGER_SECRET";

fn read_secret() -> io::Result<String> {
    if let Ok(secret) = std::env::var(SECRET_ENV_VAR) {
        return Ok(secret);
    }
    secret_from_reader(io::stdin().lock())
}

/// First line of `reader`, without its line ending.
fn secret_from_reader<R: BufRead>(mut reader: R) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let secret = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    if secret.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no secret given on stdin or in {}", SECRET_ENV_VAR),
        ));
    }
    Ok(secret.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate => {
            init_logging(&ObservabilityConfig::default());
            let secret = generate_secret()?;
            println!("secret: {}", secret.expose());
            println!("hash:   {}", secret.public_hash());
            return Ok(());
        }
        Commands::Hash => {
            println!("{}", derive_key_hash(&read_secret()?));
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli.config)?;
    init_logging(&config.observability);
    let manager = KeyManager::connect(&config).await?;

    match cli.command {
        Commands::Token => {
            println!("{}", serde_json::to_string_pretty(manager.token())?);
        }
        Commands::KeyInfo => {
            let hash = derive_key_hash(&read_secret()?);
            if !manager.key_exists(hash).await? {
                eprintln!("No key registered for hash {}", hash);
                return Ok(());
            }
            let info = manager.key_info(hash).await?;
            let active = manager.is_key_active(hash).await?;
            let remaining = manager.remaining_display_balance(hash).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            println!("active:    {}", active);
            println!("remaining: {} {}", remaining, manager.token().symbol);
        }
        Commands::Tier { id } => {
            let active = manager.is_tier_active(id).await?;
            let price = manager.tier_price(id).await?;
            println!("tier {}: active={} price={} base units/ms", id, active, price);
        }
        Commands::Balance { address } => {
            let balance = manager.token_balance(address, None).await?;
            println!("{} {}", balance, manager.token().symbol);
        }
        Commands::Generate | Commands::Hash => {}
    }

    Ok(())
}

//! FTR Wallet CLI
//!
//! One-shot commands for scripting plus the interactive menu.

use clap::{Parser, Subcommand};
use ftr_wallet::wallet::{verify_amount, Identity};
use ftr_wallet::{
    Amount, Config, Error, JsonRpcClient, Menu, Result, TransportConfig, Wallet,
    PRIVATE_KEY_PEM_ENV,
};
use secrecy::ExposeSecret;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ftr-wallet")]
#[command(about = "Minimal Future (FTR) wallet")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// PEM private key file (defaults to the FTR_PRIVATE_KEY_PEM variable)
    #[arg(short, long, global = true)]
    key_file: Option<PathBuf>,

    /// Use a preset endpoint instead of FTR_RPC_URL (mainnet, testnet)
    #[arg(short, long, global = true)]
    network: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu,

    /// Generate a new keypair and print it
    Create,

    /// Print the wallet address
    Address,

    /// Query the wallet balance
    Balance,

    /// Sign and send an amount
    Send {
        /// Receiver address
        receiver: String,

        /// Amount in FTR
        amount: String,
    },

    /// List recent transactions
    History {
        /// Number of transactions (defaults to the config value)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Check an amount signature against a public key
    Verify {
        /// Public key PEM file
        public_key: PathBuf,

        /// Amount that was signed
        amount: String,

        /// Base64 signature
        signature: String,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let command = cli.command.unwrap_or(Commands::Menu);

    match command {
        Commands::Create => {
            let identity = Identity::generate();
            print_keys(&identity)?;
        }
        Commands::Verify {
            public_key,
            amount,
            signature,
        } => {
            let public_pem = std::fs::read_to_string(&public_key)?;
            let amount: Amount = amount.parse()?;
            if verify_amount(&public_pem, amount, &signature)? {
                println!("Signature is valid for amount {}", amount);
            } else {
                println!("Signature is NOT valid for amount {}", amount);
            }
        }
        Commands::Config => {
            let transport = TransportConfig::from_env()?;
            let effective = serde_json::json!({
                "config": config,
                "endpoint": transport.url(),
                "user": transport.user(),
            });
            println!("{}", serde_json::to_string_pretty(&effective)?);
        }
        Commands::Menu => {
            let mut wallet = build_wallet(cli.network.as_deref(), &config)?;
            if let Some(identity) = load_identity(cli.key_file.as_deref(), false)? {
                wallet = wallet.with_identity(identity);
            }
            let stdin = std::io::stdin();
            let mut menu =
                Menu::new(stdin.lock(), std::io::stdout()).with_history_count(config.history_count);
            menu.run(&mut wallet).await?;
        }
        Commands::Address => {
            let identity = require_identity(cli.key_file.as_deref())?;
            println!("{}", identity.derive_address()?);
        }
        Commands::Balance => {
            let wallet = build_wallet(cli.network.as_deref(), &config)?
                .with_identity(require_identity(cli.key_file.as_deref())?);
            let balance = wallet.check_balance().await?;
            println!("Your balance: {} FTR", balance);
        }
        Commands::Send { receiver, amount } => {
            let amount: Amount = amount.parse()?;
            let wallet = build_wallet(cli.network.as_deref(), &config)?
                .with_identity(require_identity(cli.key_file.as_deref())?);
            let receipt = wallet.send(&receiver, amount).await?;
            if !receipt.accepted {
                println!("Transaction failed.");
                return Ok(());
            }
            match receipt.txid {
                Some(txid) => println!("Transaction sent successfully! ({})", txid),
                None => println!("Transaction sent successfully!"),
            }
        }
        Commands::History { count } => {
            let wallet = build_wallet(cli.network.as_deref(), &config)?;
            let count = count.unwrap_or(config.history_count);
            for tx in wallet.fetch_history(count).await? {
                println!(
                    "Transaction ID: {}, Amount: {}, Confirmations: {}",
                    tx.txid, tx.amount, tx.confirmations
                );
            }
        }
    }

    Ok(())
}

fn build_wallet(network: Option<&str>, config: &Config) -> Result<Wallet> {
    let transport_config = TransportConfig::from_env()?.with_timeout(config.rpc_timeout());
    let mut wallet = Wallet::new(
        JsonRpcClient::new()?,
        transport_config,
        config.networks.clone(),
    );
    if let Some(target) = network {
        wallet.switch_network(target)?;
    }
    tracing::debug!(endpoint = wallet.endpoint(), "Wallet ready");
    Ok(wallet)
}

fn require_identity(key_file: Option<&Path>) -> Result<Identity> {
    load_identity(key_file, true)?.ok_or(Error::NoKeyLoaded)
}

/// Load a private key from `key_file` or `FTR_PRIVATE_KEY_PEM`
fn load_identity(key_file: Option<&Path>, required: bool) -> Result<Option<Identity>> {
    let pem = match key_file {
        Some(path) => std::fs::read_to_string(path)?,
        None => match std::env::var(PRIVATE_KEY_PEM_ENV) {
            Ok(pem) => pem,
            Err(_) if required => {
                tracing::warn!("No --key-file given and FTR_PRIVATE_KEY_PEM is not set");
                return Ok(None);
            }
            Err(_) => return Ok(None),
        },
    };

    let mut identity = Identity::new();
    identity.import(&pem)?;
    tracing::info!(address = %identity.derive_address()?, "Loaded wallet key");
    Ok(Some(identity))
}

fn print_keys(identity: &Identity) -> Result<()> {
    let keys = identity.export()?;
    println!("Private Key (keep this secret!):");
    print!("{}", keys.private_pem.expose_secret());
    println!("Public Key:");
    print!("{}", keys.public_pem);
    println!("Address: {}", identity.derive_address()?);
    Ok(())
}

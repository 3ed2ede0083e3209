//! Certificate registry CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!   subcommand ──▶ role view ──▶ CertificateGateway ──▶ PinningClient (mint only)
//!                                        │
//!                                        ▼
//!                                    ChainSlot ──▶ ChainClient ──▶ fullnode REST
//!                                        │
//!                                        ▼
//!                                  WalletAdapter ──▶ KeystoreProvider (signs)
//! ```
//!
//! Every subcommand runs one view operation and prints what the view
//! renders. A failed operation exits non-zero.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use cert_registry::chain::{ChainSlot, EntryFunctionPayload};
use cert_registry::config::{load_or_default, RegistryConfig};
use cert_registry::gateway::{CertificateGateway, Course};
use cert_registry::observability::logging::init_logging;
use cert_registry::storage::{DocumentFile, PinningClient};
use cert_registry::views::{
    FormPhase, HolderForm, HolderView, IssuerForm, IssuerView, VerifierForm, VerifierView,
};
use cert_registry::wallet::{
    auto_approve, AccountAddress, Approver, KeystoreProvider, WalletAdapter, WalletProvider,
};

type Gateway = CertificateGateway<ChainSlot, PinningClient>;

#[derive(Parser)]
#[command(name = "cert-registry")]
#[command(about = "Mint, verify and retrieve academic certificates on Aptos", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sign every transaction without asking
    #[arg(short, long)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Criteria {
    /// Student roll number
    #[arg(long)]
    roll: String,

    /// Course (CSE, IT, EEE, ECE, ME, CE)
    #[arg(long)]
    course: Course,

    /// Year of passing
    #[arg(long)]
    year: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Show wallet, network and registry status
    Status,
    /// Upload a certificate document and mint it (college)
    Mint {
        /// Student name
        #[arg(long)]
        name: String,

        #[command(flatten)]
        criteria: Criteria,

        /// Certificate document (pdf, png or jpeg)
        #[arg(long)]
        file: PathBuf,
    },
    /// Look a certificate up by roll number, course and year (company)
    Search {
        #[command(flatten)]
        criteria: Criteria,

        /// Pick this certificate id among the matches
        #[arg(long)]
        id: Option<String>,
    },
    /// Look a certificate up and mark it verified (company)
    Verify {
        #[command(flatten)]
        criteria: Criteria,

        /// Pick this certificate id among the matches
        #[arg(long)]
        id: Option<String>,
    },
    /// Retrieve your own certificate (student)
    Retrieve {
        /// Your name as it appears on the certificate
        #[arg(long)]
        name: String,

        #[command(flatten)]
        criteria: Criteria,
    },
    /// Fetch a certificate by id
    Get {
        id: String,
    },
    /// Number of certificates minted so far
    Count,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())
        .with_context(|| format!("loading configuration {:?}", cli.config))?;
    init_logging(&config.observability);

    tracing::debug!(
        network = %config.network.default,
        module = %config.contract.function_id("*"),
        "Configuration loaded"
    );

    let adapter = build_adapter(&config, cli.yes)?;
    let _listener = adapter.spawn_event_listener();
    if adapter.has_provider() {
        adapter.connect().await.context("connecting wallet")?;
    }

    let chain = ChainSlot::new(config.chain.clone(), adapter.clone());
    let store = PinningClient::from_env(config.storage.clone())?;
    let gateway = CertificateGateway::new(
        config.contract.clone(),
        config.storage.gateway_prefix.clone(),
        adapter.session().clone(),
        chain,
        store,
    );

    match cli.command {
        Commands::Status => status(&gateway).await,
        Commands::Mint {
            name,
            criteria,
            file,
        } => mint(&gateway, name, criteria, &file, config.storage.max_file_size).await,
        Commands::Search { criteria, id } => {
            let mut view = verifier_view(criteria, id);
            let phase = view.search(&gateway).await.clone();
            Ok(finish(&phase, view.render()))
        }
        Commands::Verify { criteria, id } => {
            let mut view = verifier_view(criteria, id);
            let phase = view.search(&gateway).await.clone();
            if phase.is_error() {
                return Ok(finish(&phase, view.render()));
            }
            let phase = view.verify_selected(&gateway).await.clone();
            Ok(finish(&phase, view.render()))
        }
        Commands::Retrieve { name, criteria } => {
            let mut view = HolderView::new();
            view.form = HolderForm {
                name,
                roll_number: criteria.roll,
                course: criteria.course,
                year_of_passing: Some(criteria.year),
            };
            let phase = view.search(&gateway).await.clone();
            Ok(finish(&phase, view.render()))
        }
        Commands::Get { id } => {
            let record = gateway.fetch_by_id(&id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Count => {
            println!("{}", gateway.certificate_count().await?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Keystore wallet when one is configured, otherwise no provider at all.
fn build_adapter(config: &RegistryConfig, yes: bool) -> anyhow::Result<WalletAdapter> {
    let (Some(key_file), Some(address)) = (
        config.wallet.key_file.as_deref(),
        config.wallet.account_address.as_deref(),
    ) else {
        tracing::info!("No keystore configured, running read-only");
        return Ok(WalletAdapter::new(None, config.network.default));
    };

    let address: AccountAddress = address.parse()?;
    let approver = if yes { auto_approve() } else { prompt_approver() };
    let provider = KeystoreProvider::from_key_file(
        Path::new(key_file),
        address,
        config.network.default,
        config.chain.clone(),
        config.wallet.clone(),
    )?
    .with_approver(approver);

    let provider: Arc<dyn WalletProvider> = Arc::new(provider);
    Ok(WalletAdapter::new(Some(provider), config.network.default))
}

/// Ask on the terminal before signing. The approver runs on a runtime
/// worker, so the blocking read is moved off it.
fn prompt_approver() -> Approver {
    Arc::new(|payload: &EntryFunctionPayload| {
        tokio::task::block_in_place(|| {
            eprint!(
                "Sign {} with arguments {:?}? [y/N] ",
                payload.function, payload.arguments
            );
            let _ = std::io::stderr().flush();
            let mut answer = String::new();
            if std::io::stdin().lock().read_line(&mut answer).is_err() {
                return false;
            }
            matches!(answer.trim(), "y" | "Y" | "yes")
        })
    })
}

async fn status(gateway: &Gateway) -> anyhow::Result<ExitCode> {
    let session = gateway.session().snapshot();
    match session.account {
        Some(account) if session.connected => println!("Wallet:       {}", account.short()),
        _ => println!("Wallet:       not connected"),
    }
    match session.network {
        Some(network) => println!("Network:      {}", network),
        None => println!("Network:      unsupported"),
    }
    match gateway.certificate_count().await {
        Ok(count) => println!("Certificates: {}", count),
        Err(e) => println!("Certificates: unavailable ({})", e),
    }
    Ok(ExitCode::SUCCESS)
}

async fn mint(
    gateway: &Gateway,
    name: String,
    criteria: Criteria,
    file: &Path,
    max_file_size: u64,
) -> anyhow::Result<ExitCode> {
    let mut view = IssuerView::new();
    view.form = IssuerForm {
        student_name: name,
        roll_number: criteria.roll,
        course: criteria.course,
        year_of_passing: criteria.year,
    };
    view.select_file(DocumentFile::from_path(file, max_file_size).await?);
    let phase = view.submit(gateway).await.clone();
    Ok(finish(&phase, view.render()))
}

fn verifier_view(criteria: Criteria, id: Option<String>) -> VerifierView {
    let mut view = VerifierView::new();
    view.form = VerifierForm {
        roll_number: criteria.roll,
        course: criteria.course,
        year_of_passing: Some(criteria.year),
        certificate_id: id,
    };
    view
}

/// Print the view. The status line already carries any error, so a
/// failure only sets the exit code.
fn finish(phase: &FormPhase, rendered: String) -> ExitCode {
    print!("{}", rendered);
    if phase.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

//! fx-payments command line client.
//!
//! ```text
//! fx-payments [--config FILE] [--api-url URL] <command>
//!
//!   validate-iban <IBAN>...          offline check, exit 1 if any is invalid
//!   currencies                       list accepted currencies
//!   payments [--page N] [--watch S]  show a history page, optionally refreshing every S seconds
//!   pay --amount --currency --recipient --account
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use fx_payments_client::api::{ApiClient, PaymentApi};
use fx_payments_client::config::{load_config, validate_config, ClientConfig, ConfigError};
use fx_payments_client::lifecycle::{spawn_ctrl_c_listener, Shutdown};
use fx_payments_client::notifications::NotificationCenter;
use fx_payments_client::observability::init_logging;
use fx_payments_client::payments::{
    format_amount_str, Currencies, DEFAULT_DECIMALS, PaymentHistory, PaymentSubmitter, SubmitError,
};
use fx_payments_client::resilience::RetryPolicy;
use fx_payments_client::validation::{validate_iban, PaymentForm};

#[derive(Parser)]
#[command(name = "fx-payments")]
#[command(about = "Client for the FX payments service", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides api.base_url
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check IBANs without contacting the service
    ValidateIban {
        #[arg(required = true)]
        ibans: Vec<String>,
    },
    /// List the currencies the service accepts
    Currencies,
    /// Show one page of payment history
    Payments {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Refresh every SECS seconds until Ctrl-C
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },
    /// Validate and submit a payment
    Pay {
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        currency: String,
        #[arg(long)]
        recipient: String,
        /// Recipient IBAN
        #[arg(long)]
        account: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    init_logging(&config.observability);
    tracing::info!(base_url = %config.api.base_url, "fx-payments starting");

    if let Commands::ValidateIban { ibans } = &cli.command {
        return Ok(validate_ibans(ibans));
    }

    let api: Arc<dyn PaymentApi> = Arc::new(ApiClient::new(&config.api)?);
    let notifications = NotificationCenter::new(Duration::from_millis(config.notifications.auto_dismiss_ms));
    let retry = RetryPolicy::from(&config.retries);

    let result = match cli.command {
        Commands::ValidateIban { .. } => Ok(ExitCode::SUCCESS),
        Commands::Currencies => list_currencies(api, retry, &notifications).await,
        Commands::Payments { page, watch } => {
            show_payments(api, &config, retry, &notifications, page, watch).await
        }
        Commands::Pay {
            amount,
            currency,
            recipient,
            account,
        } => {
            let form = PaymentForm {
                amount: Some(amount),
                currency,
                recipient,
                recipient_account: account,
            };
            pay(api, retry, &notifications, form).await
        }
    };

    match result {
        Ok(code) => Ok(code),
        Err(e) => {
            notifications.report_unexpected(&*e);
            print_notification(&notifications);
            Err(e)
        }
    }
}

fn validate_ibans(ibans: &[String]) -> ExitCode {
    let mut all_valid = true;
    for iban in ibans {
        let valid = validate_iban(iban);
        all_valid &= valid;
        println!("{iban}: {}", if valid { "valid" } else { "invalid" });
    }
    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn list_currencies(
    api: Arc<dyn PaymentApi>,
    retry: RetryPolicy,
    notifications: &NotificationCenter,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let currencies = Currencies::spawn(api, retry, notifications.clone());
    let state = currencies.settled().await?;
    if state.is_error() {
        print_notification(notifications);
        return Ok(ExitCode::FAILURE);
    }

    for currency in &state.data {
        println!("{:<4} {:<32} {}", currency.code, currency.name, currency.decimals);
    }
    Ok(ExitCode::SUCCESS)
}

async fn show_payments(
    api: Arc<dyn PaymentApi>,
    config: &ClientConfig,
    retry: RetryPolicy,
    notifications: &NotificationCenter,
    page: u32,
    watch: Option<u64>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let currencies = Currencies::spawn(Arc::clone(&api), retry.clone(), notifications.clone());
    let history = PaymentHistory::spawn(api, &config.pagination, retry, notifications.clone(), page);

    let Some(secs) = watch else {
        currencies.settled().await?;
        let state = history.settled().await?;
        print_page(&history, &currencies);
        if state.is_error() {
            print_notification(notifications);
            return Ok(ExitCode::FAILURE);
        }
        return Ok(ExitCode::SUCCESS);
    };

    let shutdown = Shutdown::new();
    let mut stop = shutdown.subscribe();
    spawn_ctrl_c_listener(&shutdown);

    let period = Duration::from_secs(secs.max(1));
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    let mut updates = history.loader().subscribe();

    loop {
        tokio::select! {
            _ = stop.recv() => break,
            _ = ticker.tick() => {
                history.retry_load().await?;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if state.is_error() {
                    print_notification(notifications);
                } else if !state.is_loading() {
                    print_page(&history, &currencies);
                }
            }
        }
    }

    tracing::info!("Watch stopped");
    Ok(ExitCode::SUCCESS)
}

async fn pay(
    api: Arc<dyn PaymentApi>,
    retry: RetryPolicy,
    notifications: &NotificationCenter,
    form: PaymentForm,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Currency decimals decide the smallest accepted amount.
    let currencies = Currencies::spawn(Arc::clone(&api), retry, notifications.clone());
    currencies.settled().await?;

    let submitter = PaymentSubmitter::new(api, notifications.clone());
    match submitter.submit(&form, currencies.decimals(&form.currency)).await {
        Ok(payment) => {
            print_notification(notifications);
            println!(
                "{}  {} {}  fee {}  to {}",
                payment.id, payment.amount, payment.currency, payment.processing_fee, payment.recipient
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(SubmitError::Invalid(errors)) => {
            for error in errors {
                eprintln!("{}: {error}", error.field().as_str());
            }
            Ok(ExitCode::FAILURE)
        }
        Err(SubmitError::Transport(_)) | Err(SubmitError::InFlight) => {
            print_notification(notifications);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_page(history: &PaymentHistory, currencies: &Currencies) {
    let pagination = history.pagination();
    for payment in history.payments() {
        let decimals = currencies.decimals(&payment.currency).unwrap_or(DEFAULT_DECIMALS);
        let amount = format_amount_str(&payment.amount, decimals).unwrap_or_else(|| payment.amount.clone());
        let fee = format_amount_str(&payment.processing_fee, decimals).unwrap_or_else(|| payment.processing_fee.clone());
        println!(
            "{}  {:<25} {:>16} {:<4} fee {:>10}  {}",
            payment.id, payment.created_at, amount, payment.currency, fee, payment.recipient
        );
    }
    let pages = history
        .visible_pages()
        .iter()
        .map(|p| {
            if *p == pagination.current {
                format!("[{}]", p + 1)
            } else {
                (p + 1).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "Showing {}-{} of {}  pages: {}",
        pagination.showing_from(),
        pagination.showing_to(),
        pagination.total_elements,
        pages
    );
}

fn print_notification(notifications: &NotificationCenter) {
    if let Some(notification) = notifications.current() {
        eprintln!("{notification}");
    }
}

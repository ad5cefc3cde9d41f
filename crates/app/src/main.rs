//! Tapcart Application CLI

use std::{fs, path::PathBuf, process, time::Duration};

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use tapcart::{checkout::CheckoutProfile, synthesis::synthesize_value};
use tapcart_app::{
    context::AppContext,
    purchases::{CallbackUrls, FlowMode, PollSettings, PurchasesConfig},
    twotap::{DEFAULT_BASE_URL, PrivateToken, TwoTapConfig},
};

#[derive(Debug, Parser)]
#[command(name = "tapcart-app", about = "Tapcart CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the fields input for a recorded cart status or cart sites file
    Fields(FieldsArgs),

    /// Buy a product, polling TwoTap until the purchase settles
    Purchase(PurchaseArgs),
}

#[derive(Debug, Args)]
struct FieldsArgs {
    /// JSON file holding a cart status response or its `sites` object
    file: PathBuf,

    /// Optional YAML checkout profile replacing the default one
    #[arg(long, env = "CHECKOUT_PROFILE")]
    profile: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct PurchaseArgs {
    /// Product URL to buy
    url: String,

    /// TwoTap API root
    #[arg(long, env = "TWOTAP_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// TwoTap public token
    #[arg(long, env = "TWOTAP_PUBLIC_TOKEN")]
    public_token: String,

    /// TwoTap private token
    #[arg(long, env = "TWOTAP_PRIVATE_TOKEN", hide_env_values = true)]
    private_token: String,

    /// TwoTap test mode (fake_confirm, dummy_data)
    #[arg(long, env = "TWOTAP_TEST_MODE")]
    test_mode: Option<String>,

    /// Public address TwoTap uses to reach the confirm callbacks
    #[arg(long, env = "PUBLIC_BASE_URL", default_value = "http://localhost:5000")]
    public_base_url: String,

    /// Phone number used for SMS purchase confirmation
    #[arg(long, env = "CONFIRM_PHONE", default_value = "5555555555")]
    confirm_phone: String,

    /// Give up polling after this many seconds
    #[arg(long, env = "POLL_TIMEOUT_SECONDS", default_value_t = 120)]
    poll_timeout_seconds: u64,

    /// Optional YAML checkout profile replacing the default one
    #[arg(long, env = "CHECKOUT_PROFILE")]
    profile: Option<PathBuf>,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Fields(args) => print_fields(args),
        Commands::Purchase(args) => purchase(args).await,
    }
}

fn load_profile(path: Option<&PathBuf>) -> Result<CheckoutProfile, String> {
    path.map_or_else(
        || Ok(CheckoutProfile::default()),
        |path| {
            CheckoutProfile::from_yaml_file(path)
                .map_err(|error| format!("failed to load {}: {error}", path.display()))
        },
    )
}

fn print_fields(args: FieldsArgs) -> Result<(), String> {
    let profile = load_profile(args.profile.as_ref())?;

    let contents = fs::read_to_string(&args.file)
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

    let mut document: Value = serde_json::from_str(&contents)
        .map_err(|error| format!("failed to parse {}: {error}", args.file.display()))?;

    // Accept a whole cart status response as well as a bare sites object.
    let sites = document
        .get_mut("sites")
        .map(Value::take)
        .unwrap_or(document);

    let fields_input = synthesize_value(sites, &profile).map_err(|error| error.to_string())?;

    let output = serde_json::to_string_pretty(&fields_input)
        .map_err(|error| format!("failed to encode fields input: {error}"))?;

    println!("{output}");

    Ok(())
}

async fn purchase(args: PurchaseArgs) -> Result<(), String> {
    let profile = load_profile(args.profile.as_ref())?;

    let app = AppContext::from_config(
        TwoTapConfig {
            base_url: args.base_url,
            public_token: args.public_token,
            private_token: PrivateToken::new(args.private_token),
            test_mode: args.test_mode,
        },
        PurchasesConfig {
            mode: FlowMode::Polling,
            callbacks: CallbackUrls::from_base(&args.public_base_url),
            confirm_phone: args.confirm_phone,
            polling: PollSettings {
                timeout: Duration::from_secs(args.poll_timeout_seconds),
                ..PollSettings::default()
            },
            profile,
        },
    );

    let outcome = app
        .purchases
        .purchase_product(&args.url)
        .await
        .map_err(|error| format!("purchase failed: {error}"))?;

    let output = serde_json::to_string_pretty(&outcome)
        .map_err(|error| format!("failed to encode outcome: {error}"))?;

    println!("{output}");

    Ok(())
}

use std::path::PathBuf;
use std::process::ExitCode;

use brigadeiro::api::ApiClient;
use brigadeiro::app::App;
use brigadeiro::config::{API_URL_VAR, ClientConfig, LocalConfig, env_lookup};
use brigadeiro::error::{Alert, ClientError};
use brigadeiro::forms::{DEFAULT_AMOUNT, LoginForm, OrderFormError, SignupForm};
use brigadeiro::screens::{LoginScreen, NewOrderScreen, OrdersScreen, Outcome, SignupScreen, orders};
use brigadeiro::session::{SessionGate, View};
use brigadeiro::storage::FileStore;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Alert(Alert),
    #[error("login required; run `brigadeiro login` first")]
    LoginRequired,
    #[error(transparent)]
    Client(ClientError),
}

impl From<ClientError> for CliError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Unauthenticated => Self::LoginRequired,
            other => Self::Client(other),
        }
    }
}

impl From<brigadeiro::config::ConfigError> for CliError {
    fn from(e: brigadeiro::config::ConfigError) -> Self {
        Self::Client(ClientError::Config(e))
    }
}

#[derive(Parser, Debug)]
#[command(name = "brigadeiro", about = "Order caixas de brigadeiro from the shop backend")]
struct Cli {
    #[arg(long, env = API_URL_VAR)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print whether a session is stored.
    Status,
    Login(LoginArgs),
    Signup(SignupArgs),
    Logout,
    /// List order history.
    Orders,
    /// Place an order with a PNG proof of payment.
    Order(OrderArgs),
    /// Print the price for an amount and the pix key to pay to.
    Quote {
        #[arg(long, default_value = DEFAULT_AMOUNT)]
        amount: String,
    },
}

#[derive(Args, Debug)]
struct LoginArgs {
    /// Local number, without the country code.
    #[arg(long)]
    phone: String,
    #[arg(long)]
    password: String,
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long)]
    phone: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    confirm_password: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    address: String,
}

#[derive(Args, Debug)]
struct OrderArgs {
    #[arg(long, default_value = DEFAULT_AMOUNT)]
    amount: String,
    #[arg(long)]
    attachment: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Err(e) = dotenv
        && !e.not_found()
    {
        tracing::warn!(error = %e, "failed to load .env");
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let api_url = cli.api_url;
    let lookup = |key: &str| match (key, &api_url) {
        (API_URL_VAR, Some(url)) => Some(url.clone()),
        _ => env_lookup(key),
    };

    match cli.command {
        Command::Status => {
            let local = LocalConfig::from_lookup(lookup)?;
            match SessionGate::restore(FileStore::new(local.storage_path)).view() {
                View::Authenticated => println!("logged in"),
                View::Login => println!("logged out"),
            }
            Ok(())
        }
        Command::Quote { amount } => {
            let local = LocalConfig::from_lookup(lookup)?;
            let mut screen = NewOrderScreen::new(local.unit_price, local.pix_key);
            screen.form.amount = amount;
            let line = screen.price_line().ok_or_else(|| CliError::Alert(OrderFormError::InvalidAmount.alert()))?;
            println!("{line}");
            if let Some(pix) = screen.pix_key() {
                println!("Chave pix: {pix}");
            }
            Ok(())
        }
        Command::Login(args) => {
            let mut app = connect(lookup)?;
            let screen = LoginScreen::new(LoginForm { phone: args.phone, password: args.password });
            finish(app.login(&screen).await)
        }
        Command::Signup(args) => {
            let mut app = connect(lookup)?;
            let screen = SignupScreen::new(SignupForm {
                phone: args.phone,
                password: args.password,
                confirm_password: args.confirm_password,
                name: args.name,
                address: args.address,
            });
            finish(app.signup(&screen).await)
        }
        Command::Logout => finish(connect(lookup)?.logout().await),
        Command::Orders => {
            let mut app = connect(lookup)?;
            let mut screen = app.orders_screen();
            if let Some(alert) = app.refresh_orders(&mut screen).await? {
                return Err(CliError::Alert(alert));
            }
            print_orders(&screen);
            Ok(())
        }
        Command::Order(args) => {
            let mut app = connect(lookup)?;
            app.require_login()?;
            let mut screen = app.new_order_screen();
            screen.form.amount = args.amount;
            screen.select_attachment(&args.attachment).map_err(CliError::Alert)?;
            finish(app.place_order(&screen).await?)
        }
    }
}

/// Full config plus a backend client, for commands that talk to the shop.
fn connect<F>(lookup: F) -> Result<App<FileStore, ApiClient>, CliError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = ClientConfig::from_lookup(lookup)?;
    let backend = ApiClient::from_config(&config)?;
    let store = FileStore::new(config.storage_path.clone());
    tracing::debug!(api_url = backend.base_url(), storage = %store.path().display(), "client ready");
    Ok(App::start(store, backend, config))
}

fn finish(outcome: Outcome) -> Result<(), CliError> {
    match outcome {
        Outcome::Alert(alert) => return Err(CliError::Alert(alert)),
        Outcome::LoggedIn => println!("logged in"),
        Outcome::LoggedOut => println!("logged out"),
        Outcome::OrderPlaced => println!("order placed"),
    }
    Ok(())
}

fn print_orders(screen: &OrdersScreen) {
    println!("{}", orders::TITLE);
    for row in screen.rows() {
        match row.badge {
            Some(badge) => println!("{}  [{}]", row.title, badge.label),
            None => println!("{}", row.title),
        }
        println!("  {}", row.date_line);
    }
}

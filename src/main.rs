use budget_calendar::args::{Args, Command};
use budget_calendar::{commands, Config, Mode, Result};
use chrono::Local;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().budget_home().path();

    // This allows for running the program without a budgeting server. When BUDGET_IN_TEST_MODE is
    // set and non-zero in length, then the mode will be Mode::Test, otherwise Mode::Remote.
    let mode = Mode::from_env();
    let today = Local::now().date_naive();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.api_url()).await?.print(),

        Command::Login(login_args) => commands::login(
            Config::load(home).await?,
            mode,
            today,
            login_args.email(),
            login_args.password(),
        )
        .await?
        .print(),

        Command::Logout(logout_args) => {
            commands::logout(Config::load(home).await?, mode, today, logout_args.yes())
                .await?
                .print()
        }

        Command::Today => commands::today(Config::load(home).await?, mode, today)
            .await?
            .print(),

        Command::Month(month_args) => {
            commands::month(Config::load(home).await?, mode, today, month_args.clone())
                .await?
                .print()
        }

        Command::Day(day_args) => {
            commands::day(Config::load(home).await?, mode, today, day_args.date())
                .await?
                .print()
        }

        Command::Add(add_args) => {
            commands::add(Config::load(home).await?, mode, today, add_args.clone())
                .await?
                .print()
        }

        Command::Browse => commands::browse(Config::load(home).await?, mode, today)
            .await?
            .print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

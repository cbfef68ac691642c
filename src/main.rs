mod commands;
mod desktop;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "caldesk")]
#[command(about = "Month calendar with per-day events and desktop reminders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup { email: String },
    /// Sign in to an existing account
    Login { email: String },
    /// Sign out; events stay stored for the next sign-in
    Logout,
    /// Show who is signed in
    Whoami,
    /// Render a month (defaults to the current one)
    Show {
        #[arg(long)]
        year: Option<i32>,

        /// Month number, 1-12
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Months to move from the chosen month, e.g. -1 for the previous one
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
    },
    /// Add an event to a day
    Add {
        /// Day as YYYY-MM-DD
        date: String,

        /// Time as HH:MM (24h)
        time: String,

        /// Event title
        #[arg(num_args = 1.., trailing_var_arg = true)]
        title: Vec<String>,

        /// none, daily, weekly, monthly or yearly
        #[arg(short, long)]
        recurrence: Option<String>,
    },
    /// Open a day in the interactive editor
    Edit { date: String },
    /// Remove every event on a day
    Delete { date: String },
    /// List the events on a day
    List { date: String },
    /// Keep running and send reminders when events are due
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let mut ctx = Context::load()?;

    match cli.command {
        Commands::Signup { email } => commands::auth::signup(&mut ctx, &email),
        Commands::Login { email } => commands::auth::login(&mut ctx, &email),
        Commands::Logout => commands::auth::logout(&mut ctx),
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Show {
            year,
            month,
            offset,
        } => commands::show::run(&mut ctx, year, month, offset),
        Commands::Add {
            date,
            time,
            title,
            recurrence,
        } => commands::add::run(&mut ctx, &date, &time, &title.join(" "), recurrence.as_deref()),
        Commands::Edit { date } => commands::edit::run(&mut ctx, &date),
        Commands::Delete { date } => commands::delete::run(&mut ctx, &date),
        Commands::List { date } => commands::list::run(&mut ctx, &date),
        Commands::Watch => commands::watch::run(&mut ctx).await,
    }
}

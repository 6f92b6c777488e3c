use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tallykit-cli", version, about = "TallyKit CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Counter management and tapping
    Counter {
        #[command(subcommand)]
        action: commands::counter::CounterAction,
    },
    /// Countdown management
    Countdown {
        #[command(subcommand)]
        action: commands::countdown::CountdownAction,
    },
    /// Theme catalog and selection
    Theme {
        #[command(subcommand)]
        action: commands::theme::ThemeAction,
    },
    /// Premium entitlement and purchases
    Premium {
        #[command(subcommand)]
        action: commands::premium::PremiumAction,
    },
    /// Local data and onboarding flags
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Counter { action } => commands::counter::run(action),
        Commands::Countdown { action } => commands::countdown::run(action),
        Commands::Theme { action } => commands::theme::run(action),
        Commands::Premium { action } => commands::premium::run(action),
        Commands::Data { action } => commands::data::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

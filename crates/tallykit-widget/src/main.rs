//! Widget process: a read-only renderer over the shared store.
//!
//! Each tick re-reads the countdown collection, resolves the configured
//! countdown id, and prints one timeline entry. With `--follow` it keeps
//! rendering on every whole minute, the same cadence the platform
//! scheduler would request.

use chrono::Utc;
use clap::{Parser, ValueEnum};
use uuid::Uuid;

use tallykit_core::widget::{self, CountdownEntry, RemainingTime, PLACEHOLDER};
use tallykit_core::FileStore;

#[derive(Parser)]
#[command(name = "tallykit-widget", version, about = "TallyKit widget renderer")]
struct Cli {
    /// Countdown id to display, as configured on the widget
    #[arg(long)]
    id: Option<Uuid>,

    /// List countdowns available for configuration and exit
    #[arg(long)]
    list: bool,

    /// Widget family to render
    #[arg(long, value_enum, default_value_t = Family::Medium)]
    family: Family,

    /// Re-render on every whole minute until interrupted
    #[arg(long)]
    follow: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Family {
    Small,
    Medium,
    Large,
}

fn main() {
    let cli = Cli::parse();
    let store = match FileStore::open() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if cli.list {
        for c in widget::available_countdowns(&store) {
            println!("{}  {}  {}", c.id, c.target_date.to_rfc3339(), c.title);
        }
        return;
    }

    loop {
        let now = Utc::now();
        // Fresh read every tick; the main app may have changed the
        // collection since the last one.
        let entry = widget::load_entry(&store, cli.id, now);
        render(&entry, cli.family);

        if !cli.follow {
            break;
        }
        let wake = widget::next_refresh(now);
        if let Ok(sleep) = (wake - Utc::now()).to_std() {
            std::thread::sleep(sleep);
        }
    }
}

fn render(entry: &CountdownEntry, family: Family) {
    let Some(cd) = &entry.countdown else {
        match family {
            Family::Small => println!("No Countdown"),
            Family::Medium | Family::Large => println!("{PLACEHOLDER}"),
        }
        return;
    };

    let left = RemainingTime::until(cd.target_date, entry.date);
    match family {
        Family::Small => println!("{}", left.short()),
        Family::Medium => {
            println!("{}", cd.title);
            println!("{}", left.full());
        }
        Family::Large => {
            println!("{}", cd.title);
            println!("{}", left.full());
            println!(
                "{:>6} Days  {:>4} Hrs  {:>4} Min",
                left.days, left.hours, left.minutes
            );
        }
    }
}

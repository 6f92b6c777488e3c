use clap::Subcommand;
use uuid::Uuid;

use tallykit_core::counter::{self, preset_counters, Counter, CounterRepository};
use tallykit_core::{entitlement, Event, FileStore, GateReason, FREE_COUNTER_LIMIT};

use super::emit;

#[derive(Subcommand)]
pub enum CounterAction {
    /// List saved counters
    List,
    /// Create a new counter and select it
    New {
        /// Counter title
        #[arg(default_value = "New Counter")]
        title: String,
    },
    /// Create a counter from a built-in preset (omit the name to list them)
    Preset { name: Option<String> },
    /// Select the active counter
    Select {
        /// Counter id
        id: Uuid,
    },
    /// Tap the active counter
    Tap {
        /// Step down instead of up
        #[arg(long)]
        down: bool,
    },
    /// Reset the active counter's count to zero
    Reset,
    /// Rename a counter
    Rename { id: Uuid, title: String },
    /// Change a counter's per-tap interval
    Interval { id: Uuid, interval: i64 },
    /// Delete a counter
    Delete { id: Uuid },
}

pub fn run(action: CounterAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open()?;
    let repo = CounterRepository::new(store.clone());

    match action {
        CounterAction::List => {
            let selected = repo.selected_id();
            for c in repo.list() {
                let marker = if selected == Some(c.id) { "*" } else { " " };
                println!(
                    "{marker} {}  {}  count={} taps={} interval={}",
                    c.id, c.title, c.count, c.total_taps, c.interval
                );
            }
        }
        CounterAction::New { title } => {
            ensure_can_create(&store, &repo);
            let counter = Counter::new(title);
            repo.upsert(&counter)?;
            repo.select(counter.id)?;
            emit(&Event::counter_saved(counter.id));
            eprintln!("created '{}' ({})", counter.title, counter.id);
        }
        CounterAction::Preset { name: None } => {
            for preset in preset_counters() {
                println!("{}", preset.title);
            }
        }
        CounterAction::Preset { name: Some(name) } => {
            let wanted = name.to_lowercase();
            let Some(preset) = preset_counters()
                .into_iter()
                .find(|p| p.title.to_lowercase().contains(&wanted))
            else {
                eprintln!("unknown preset: {name}");
                std::process::exit(1);
            };
            ensure_can_create(&store, &repo);
            // Presets are templates; each load gets a fresh identity.
            repo.upsert(&preset)?;
            repo.select(preset.id)?;
            emit(&Event::counter_saved(preset.id));
            eprintln!("created '{}' ({})", preset.title, preset.id);
        }
        CounterAction::Select { id } => {
            if repo.find(id).is_none() {
                eprintln!("no counter with id {id}");
                std::process::exit(1);
            }
            repo.select(id)?;
        }
        CounterAction::Tap { down } => {
            let Some(mut counter) = repo.selected() else {
                eprintln!("no counter selected (use 'counter select')");
                std::process::exit(1);
            };
            if down {
                counter.decrement();
            } else {
                counter.increment();
            }
            repo.upsert(&counter)?;
            emit(&Event::counter_saved(counter.id));
            println!("{}", counter.count);
        }
        CounterAction::Reset => {
            let Some(mut counter) = repo.selected() else {
                eprintln!("no counter selected (use 'counter select')");
                std::process::exit(1);
            };
            counter.reset();
            repo.upsert(&counter)?;
            emit(&Event::counter_saved(counter.id));
            println!("{}", counter.count);
        }
        CounterAction::Rename { id, title } => {
            let mut counter = find_or_exit(&repo, id);
            counter.title = title;
            repo.upsert(&counter)?;
            emit(&Event::counter_saved(id));
        }
        CounterAction::Interval { id, interval } => {
            // Interval tuning is part of the advanced configuration the
            // free tier routes to the upgrade flow.
            if !entitlement::is_premium(&store) {
                emit(&Event::upgrade_required(GateReason::AdvancedConfiguration));
                eprintln!("configuring intervals requires premium");
                std::process::exit(2);
            }
            let mut counter = find_or_exit(&repo, id);
            counter.set_interval(interval);
            repo.upsert(&counter)?;
            emit(&Event::counter_saved(id));
        }
        CounterAction::Delete { id } => {
            repo.delete(id)?;
            // The repository does not track the open selection.
            if repo.selected_id() == Some(id) {
                repo.clear_selection()?;
            }
        }
    }
    Ok(())
}

fn find_or_exit(repo: &CounterRepository<FileStore>, id: Uuid) -> Counter {
    match repo.find(id) {
        Some(counter) => counter,
        None => {
            eprintln!("no counter with id {id}");
            std::process::exit(1);
        }
    }
}

/// The upgrade-prompt branch: not an error, exit code 2 distinguishes
/// it from real failures.
fn ensure_can_create(store: &FileStore, repo: &CounterRepository<FileStore>) {
    let premium = entitlement::is_premium(store);
    if counter::can_create_new(premium, repo.list().len()) {
        return;
    }
    emit(&Event::upgrade_required(GateReason::CounterLimit));
    eprintln!("free tier is limited to {FREE_COUNTER_LIMIT} saved counters; upgrade to add more");
    std::process::exit(2);
}

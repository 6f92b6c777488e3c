use clap::Subcommand;

use tallykit_core::store::{self, keys, KeyValueStore};
use tallykit_core::{CounterRepository, CountdownRepository, FileStore};

#[derive(Subcommand)]
pub enum DataAction {
    /// Print the data directory path
    Dir,
    /// Show stored flags and collection sizes
    Status,
    /// Mark onboarding as completed
    CompleteOnboarding,
    /// Show onboarding again on next launch
    ResetOnboarding,
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DataAction::Dir => {
            println!("{}", store::data_dir()?.display());
        }
        DataAction::Status => {
            let store = FileStore::open()?;
            let counters = CounterRepository::new(store.clone()).list();
            let countdowns = CountdownRepository::new(store.clone()).list();
            println!("premium: {}", store.get_bool(keys::IS_PREMIUM));
            println!("onboarded: {}", store.get_bool(keys::HAS_SEEN_ONBOARDING));
            println!("counters: {}", counters.len());
            println!("countdowns: {}", countdowns.len());
        }
        DataAction::CompleteOnboarding => {
            FileStore::open()?.set_bool(keys::HAS_SEEN_ONBOARDING, true)?;
        }
        DataAction::ResetOnboarding => {
            FileStore::open()?.set_bool(keys::HAS_SEEN_ONBOARDING, false)?;
        }
    }
    Ok(())
}

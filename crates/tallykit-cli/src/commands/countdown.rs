use std::path::PathBuf;

use clap::Subcommand;
use uuid::Uuid;

use tallykit_core::countdown::{self, CountdownItem, CountdownRepository};
use tallykit_core::{entitlement, Event, FileStore, GateReason, FREE_COUNTDOWN_LIMIT};

use super::{emit, parse_date};

#[derive(Subcommand)]
pub enum CountdownAction {
    /// List saved countdowns, earliest first
    List,
    /// Add a new countdown
    Add {
        /// Countdown title
        title: String,
        /// Target date (RFC 3339, 'YYYY-MM-DD HH:MM', or 'YYYY-MM-DD')
        date: String,
        /// Background image file
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Edit an existing countdown
    Edit {
        /// Countdown id
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a countdown
    Delete { id: Uuid },
}

pub fn run(action: CountdownAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open()?;
    let repo = CountdownRepository::new(store.clone());

    match action {
        CountdownAction::List => {
            for c in repo.list() {
                let image = if c.image_data.is_some() { " [image]" } else { "" };
                println!("{}  {}  {}{image}", c.id, c.target_date.to_rfc3339(), c.title);
            }
        }
        CountdownAction::Add { title, date, image } => {
            let premium = entitlement::is_premium(&store);
            if !countdown::can_create_new(premium, repo.list().len()) {
                emit(&Event::upgrade_required(GateReason::CountdownLimit));
                eprintln!(
                    "free tier is limited to {FREE_COUNTDOWN_LIMIT} saved countdowns; upgrade to add more"
                );
                std::process::exit(2);
            }
            let mut item = CountdownItem::new(title, parse_date(&date)?);
            if let Some(path) = image {
                item.image_data = Some(std::fs::read(path)?);
            }
            repo.upsert(&item)?;
            emit(&Event::toast("Countdown saved"));
            eprintln!("created '{}' ({})", item.title, item.id);
        }
        CountdownAction::Edit {
            id,
            title,
            date,
            image,
        } => {
            let Some(mut item) = repo.find(id) else {
                eprintln!("no countdown with id {id}");
                std::process::exit(1);
            };
            if let Some(title) = title {
                item.title = title;
            }
            if let Some(date) = date {
                item.target_date = parse_date(&date)?;
            }
            if let Some(path) = image {
                item.image_data = Some(std::fs::read(path)?);
            }
            repo.upsert(&item)?;
            emit(&Event::toast("Countdown saved"));
        }
        CountdownAction::Delete { id } => {
            repo.delete(id)?;
        }
    }
    Ok(())
}

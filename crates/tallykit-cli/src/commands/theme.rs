use clap::Subcommand;
use uuid::Uuid;

use tallykit_core::theme::{Rgb, Theme, ThemeRegistry};
use tallykit_core::{entitlement, Event, FileStore, GateReason};

use super::emit;

#[derive(Subcommand)]
pub enum ThemeAction {
    /// List all themes (builtins then custom)
    List,
    /// Select a theme
    Select {
        /// Theme id
        id: Uuid,
    },
    /// Create a custom theme (premium)
    Create {
        /// Theme name
        name: String,
        /// Primary color as #rrggbb
        #[arg(long, default_value = "#007aff")]
        primary: String,
        /// Background color as #rrggbb
        #[arg(long, default_value = "#ffffff")]
        background: String,
        /// Text color as #rrggbb
        #[arg(long, default_value = "#1a1a1a")]
        text: String,
    },
    /// Delete a custom theme
    Delete { id: Uuid },
}

pub fn run(action: ThemeAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open()?;
    let registry = ThemeRegistry::new(store.clone());

    match action {
        ThemeAction::List => {
            let selected = registry.selected_theme().id;
            for theme in registry.all_themes() {
                let marker = if theme.id == selected { "*" } else { " " };
                let tier = if theme.is_premium { "premium" } else { "free" };
                println!(
                    "{marker} {}  {:<12} {tier:<8} {}",
                    theme.id,
                    theme.name,
                    theme.primary.to_hex()
                );
            }
        }
        ThemeAction::Select { id } => {
            let Some(theme) = registry.find(id) else {
                eprintln!("no theme with id {id}");
                std::process::exit(1);
            };
            // The registry is advisory; the premium gate lives here.
            if theme.is_premium && !entitlement::is_premium(&store) {
                emit(&Event::upgrade_required(GateReason::PremiumTheme));
                eprintln!("'{}' is a premium theme; upgrade to use it", theme.name);
                std::process::exit(2);
            }
            registry.select(id)?;
            eprintln!("selected '{}'", theme.name);
        }
        ThemeAction::Create {
            name,
            primary,
            background,
            text,
        } => {
            if !entitlement::is_premium(&store) {
                emit(&Event::upgrade_required(GateReason::CustomTheme));
                eprintln!("creating custom themes requires premium");
                std::process::exit(2);
            }
            let theme = Theme::custom(
                name,
                parse_color(&primary)?,
                parse_color(&background)?,
                parse_color(&text)?,
            );
            registry.add_custom(&theme)?;
            eprintln!("created '{}' ({})", theme.name, theme.id);
        }
        ThemeAction::Delete { id } => {
            let was_selected = registry.selected_id() == Some(id);
            registry.delete_custom(id)?;
            // The registry does not auto-reassign a deleted selection.
            if was_selected {
                let fallback = registry.selected_theme();
                registry.select(fallback.id)?;
                eprintln!("selection reset to '{}'", fallback.name);
            }
        }
    }
    Ok(())
}

fn parse_color(hex: &str) -> Result<Rgb, String> {
    Rgb::from_hex(hex).ok_or_else(|| format!("cannot parse color '{hex}' (expected #rrggbb)"))
}

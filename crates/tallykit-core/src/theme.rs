//! Theme catalog and registry.
//!
//! Thirteen built-in themes (five free, eight premium) plus user-created
//! custom themes persisted under `customThemes`. Built-ins carry fixed
//! ids so the persisted selected-id reference survives relaunches and is
//! shared with the widget process.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{keys, KeyValueStore};

/// A color as unit-interval RGB components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .ok()
                .map(|v| f64::from(v) / 255.0)
        };
        Some(Self {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
        })
    }

    pub fn to_hex(self) -> String {
        let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }

    /// Blend toward white, keeping `alpha` of this color. Used to build
    /// the washed-out backgrounds in the built-in catalog.
    const fn tint(self, alpha: f64) -> Self {
        Self {
            red: self.red * alpha + (1.0 - alpha),
            green: self.green * alpha + (1.0 - alpha),
            blue: self.blue * alpha + (1.0 - alpha),
        }
    }
}

/// A display theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: Uuid,
    pub name: String,
    pub is_premium: bool,
    pub primary: Rgb,
    pub background: Rgb,
    pub text: Rgb,
}

impl Theme {
    /// A user-created theme. Custom themes are never premium-gated
    /// themselves; creating one is what requires premium.
    pub fn custom(name: impl Into<String>, primary: Rgb, background: Rgb, text: Rgb) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_premium: false,
            primary,
            background,
            text,
        }
    }
}

const BLUE: Rgb = Rgb::new(0.0, 0.478, 1.0);
const CYAN: Rgb = Rgb::new(0.2, 0.78, 0.95);
const ORANGE: Rgb = Rgb::new(1.0, 0.584, 0.0);
const PINK: Rgb = Rgb::new(1.0, 0.176, 0.333);
const YELLOW: Rgb = Rgb::new(1.0, 0.8, 0.0);
const GREEN: Rgb = Rgb::new(0.204, 0.78, 0.349);
const PURPLE: Rgb = Rgb::new(0.686, 0.322, 0.871);
const MINT: Rgb = Rgb::new(0.0, 0.78, 0.745);
const INDIGO: Rgb = Rgb::new(0.345, 0.337, 0.839);
const GRAY: Rgb = Rgb::new(0.557, 0.557, 0.576);
const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
/// Near-black default label color.
const INK: Rgb = Rgb::new(0.1, 0.1, 0.1);

struct BuiltinSpec {
    id: u128,
    name: &'static str,
    is_premium: bool,
    primary: Rgb,
    background: Rgb,
    text: Rgb,
}

const BUILTINS: [BuiltinSpec; 13] = [
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_000000000001, name: "Default", is_premium: false, primary: BLUE, background: WHITE, text: INK },
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_000000000002, name: "Ocean", is_premium: false, primary: CYAN, background: BLUE.tint(0.1), text: INK },
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_000000000003, name: "Sunset", is_premium: false, primary: ORANGE, background: PINK.tint(0.2), text: INK },
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_000000000004, name: "Lemon", is_premium: false, primary: YELLOW, background: YELLOW.tint(0.1), text: BLACK },
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_000000000005, name: "Forest", is_premium: false, primary: GREEN, background: GREEN.tint(0.1), text: INK },
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_000000000006, name: "Aurora", is_premium: true, primary: GREEN, background: BLACK, text: WHITE },
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_000000000007, name: "Galaxy", is_premium: true, primary: PURPLE, background: BLACK, text: WHITE },
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_000000000008, name: "Firefly", is_premium: true, primary: YELLOW, background: BLACK, text: YELLOW },
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_000000000009, name: "Retro", is_premium: true, primary: MINT, background: ORANGE.tint(0.2), text: BLACK },
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_00000000000a, name: "Neon", is_premium: true, primary: PINK, background: BLACK, text: PINK },
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_00000000000b, name: "Midnight", is_premium: true, primary: GRAY, background: BLACK, text: WHITE },
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_00000000000c, name: "Bubblegum", is_premium: true, primary: PINK, background: WHITE, text: PINK },
    BuiltinSpec { id: 0x54414c4c_5954_4b49_5400_00000000000d, name: "Velvet", is_premium: true, primary: INDIGO, background: PURPLE.tint(0.1), text: WHITE },
];

/// The immutable built-in catalog, free entries first. Never persisted.
pub fn builtin_themes() -> Vec<Theme> {
    BUILTINS
        .iter()
        .map(|spec| Theme {
            id: Uuid::from_u128(spec.id),
            name: spec.name.to_string(),
            is_premium: spec.is_premium,
            primary: spec.primary,
            background: spec.background,
            text: spec.text,
        })
        .collect()
}

/// Built-in catalog merged with persisted custom themes, plus the
/// selected-theme scalar.
///
/// The registry is advisory about premium gating: `select` and
/// `add_custom` do not check entitlement. Callers refuse gated actions
/// themselves and route to the upgrade flow instead.
#[derive(Debug, Clone)]
pub struct ThemeRegistry<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ThemeRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn custom_themes(&self) -> Vec<Theme> {
        self.store.get_json(keys::CUSTOM_THEMES)
    }

    /// Builtins then custom themes, stable order.
    pub fn all_themes(&self) -> Vec<Theme> {
        let mut all = builtin_themes();
        all.extend(self.custom_themes());
        all
    }

    pub fn find(&self, id: Uuid) -> Option<Theme> {
        self.all_themes().into_iter().find(|t| t.id == id)
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.store
            .get_string(keys::SELECTED_THEME_ID)
            .filter(|s| !s.is_empty())
            .and_then(|s| Uuid::parse_str(&s).ok())
    }

    /// The selected theme, falling back to the first built-in when the
    /// stored id is absent or dangles.
    pub fn selected_theme(&self) -> Theme {
        self.selected_id()
            .and_then(|id| self.find(id))
            .unwrap_or_else(|| builtin_themes().remove(0))
    }

    pub fn select(&self, id: Uuid) -> Result<(), StoreError> {
        self.store
            .set_string(keys::SELECTED_THEME_ID, &id.to_string())
    }

    pub fn add_custom(&self, theme: &Theme) -> Result<(), StoreError> {
        let mut custom = self.custom_themes();
        custom.push(theme.clone());
        self.store.set_json(keys::CUSTOM_THEMES, &custom)
    }

    /// Remove a custom theme. If it was selected, the caller reselects
    /// a fallback; the registry does not auto-reassign.
    pub fn delete_custom(&self, id: Uuid) -> Result<(), StoreError> {
        let mut custom = self.custom_themes();
        custom.retain(|t| t.id != id);
        self.store.set_json(keys::CUSTOM_THEMES, &custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn registry() -> ThemeRegistry<MemoryStore> {
        ThemeRegistry::new(MemoryStore::new())
    }

    #[test]
    fn catalog_has_five_free_and_eight_premium() {
        let builtins = builtin_themes();
        assert_eq!(builtins.len(), 13);
        assert_eq!(builtins.iter().filter(|t| !t.is_premium).count(), 5);
        assert!(builtins[..5].iter().all(|t| !t.is_premium));
    }

    #[test]
    fn builtin_ids_are_stable_across_calls() {
        let a = builtin_themes();
        let b = builtin_themes();
        assert_eq!(a, b);
    }

    #[test]
    fn unselected_falls_back_to_first_builtin() {
        let registry = registry();
        assert_eq!(registry.selected_theme().name, "Default");
    }

    #[test]
    fn dangling_selected_id_falls_back_to_first_builtin() {
        let registry = registry();
        registry.select(Uuid::new_v4()).unwrap();
        assert_eq!(registry.selected_theme().name, "Default");
    }

    #[test]
    fn select_persists_across_registry_instances() {
        let store = MemoryStore::new();
        let ocean = builtin_themes()[1].clone();
        ThemeRegistry::new(store.clone()).select(ocean.id).unwrap();
        assert_eq!(ThemeRegistry::new(store).selected_theme().name, "Ocean");
    }

    #[test]
    fn custom_themes_append_after_builtins() {
        let registry = registry();
        let mine = Theme::custom("Mine", BLUE, WHITE, INK);
        registry.add_custom(&mine).unwrap();
        let all = registry.all_themes();
        assert_eq!(all.len(), 14);
        assert_eq!(all.last().unwrap(), &mine);
        assert!(!mine.is_premium);
    }

    #[test]
    fn delete_custom_leaves_selection_to_caller() {
        let registry = registry();
        let mine = Theme::custom("Mine", BLUE, WHITE, INK);
        registry.add_custom(&mine).unwrap();
        registry.select(mine.id).unwrap();
        registry.delete_custom(mine.id).unwrap();
        // Stored id now dangles; resolution falls back.
        assert_eq!(registry.selected_theme().name, "Default");
        assert!(registry.custom_themes().is_empty());
    }

    #[test]
    fn hex_parsing_roundtrips() {
        let c = Rgb::from_hex("#3b82f6").unwrap();
        assert_eq!(c.to_hex(), "#3b82f6");
        assert_eq!(Rgb::from_hex("3b82f6"), Some(c));
        assert_eq!(Rgb::from_hex("#xyz"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
    }

    #[test]
    fn components_stay_in_unit_interval() {
        for theme in builtin_themes() {
            for c in [theme.primary, theme.background, theme.text] {
                for v in [c.red, c.green, c.blue] {
                    assert!((0.0..=1.0).contains(&v), "{} out of range", theme.name);
                }
            }
        }
    }
}

//! Display configuration for the spellbook: labels for spell levels, schools,
//! traditions and preparation styles. Defaults are the English labels; a JSON
//! file can override any subset of them.

use std::{collections::BTreeMap, fmt, fs, path::Path};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::components::spells::{
    spell::{FOCUS_SPELL_LEVEL, MagicSchool},
    spellcasting_entry::{EMPTY_SLOT_NAME, PreparationStyle, Tradition},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigOverrides", rename_all = "camelCase")]
pub struct SpellbookConfig {
    pub spell_levels: BTreeMap<u8, String>,
    /// Keyed by the lowercase school name, e.g. `evocation`.
    pub spell_schools: BTreeMap<String, String>,
    /// Keyed by the lowercase tradition name, e.g. `arcane`.
    pub magic_traditions: BTreeMap<String, String>,
    /// Keyed by the lowercase preparation style, e.g. `prepared`.
    pub preparation_types: BTreeMap<String, String>,
    pub unprepared_spells_label: String,
    pub unprepared_spells_label_arcane_prepared: String,
    pub empty_slot_label: String,
}

/// What a config file may set. Label maps are merged key by key over the
/// defaults; missing scalars keep their default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ConfigOverrides {
    spell_levels: BTreeMap<u8, String>,
    spell_schools: BTreeMap<String, String>,
    magic_traditions: BTreeMap<String, String>,
    preparation_types: BTreeMap<String, String>,
    unprepared_spells_label: Option<String>,
    unprepared_spells_label_arcane_prepared: Option<String>,
    empty_slot_label: Option<String>,
}

impl From<ConfigOverrides> for SpellbookConfig {
    fn from(overrides: ConfigOverrides) -> Self {
        let mut config = SpellbookConfig::default();
        config.spell_levels.extend(overrides.spell_levels);
        config.spell_schools.extend(overrides.spell_schools);
        config.magic_traditions.extend(overrides.magic_traditions);
        config.preparation_types.extend(overrides.preparation_types);
        if let Some(label) = overrides.unprepared_spells_label {
            config.unprepared_spells_label = label;
        }
        if let Some(label) = overrides.unprepared_spells_label_arcane_prepared {
            config.unprepared_spells_label_arcane_prepared = label;
        }
        if let Some(label) = overrides.empty_slot_label {
            config.empty_slot_label = label;
        }
        config
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read spellbook config: {}", err),
            ConfigError::Parse(err) => write!(f, "invalid spellbook config: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

fn ordinal(level: u8) -> String {
    let suffix = match (level % 10, level % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", level, suffix)
}

impl Default for SpellbookConfig {
    fn default() -> Self {
        let mut spell_levels = BTreeMap::from([(0, "Cantrip".to_string())]);
        for level in 1..FOCUS_SPELL_LEVEL {
            spell_levels.insert(level, format!("{} Level", ordinal(level)));
        }
        spell_levels.insert(FOCUS_SPELL_LEVEL, "Focus".to_string());

        Self {
            spell_levels,
            spell_schools: MagicSchool::iter()
                .map(|school| (school.to_string(), format!("{:?}", school)))
                .collect(),
            magic_traditions: Tradition::iter()
                .map(|tradition| (tradition.to_string(), format!("{:?}", tradition)))
                .collect(),
            preparation_types: PreparationStyle::iter()
                .map(|style| (style.to_string(), format!("{:?}", style)))
                .collect(),
            unprepared_spells_label: "Show Unprepared Spells".to_string(),
            unprepared_spells_label_arcane_prepared: "Show Spellbook".to_string(),
            empty_slot_label: EMPTY_SLOT_NAME.to_string(),
        }
    }
}

impl SpellbookConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn spell_level_label(&self, level: u8) -> String {
        self.spell_levels
            .get(&level)
            .cloned()
            .unwrap_or_else(|| level.to_string())
    }

    pub fn school_label(&self, school: MagicSchool) -> String {
        self.spell_schools
            .get(&school.to_string())
            .cloned()
            .unwrap_or_else(|| format!("{:?}", school))
    }

    pub fn tradition_label(&self, tradition: Tradition) -> String {
        self.magic_traditions
            .get(&tradition.to_string())
            .cloned()
            .unwrap_or_else(|| format!("{:?}", tradition))
    }

    pub fn preparation_label(&self, style: PreparationStyle) -> String {
        self.preparation_types
            .get(&style.to_string())
            .cloned()
            .unwrap_or_else(|| format!("{:?}", style))
    }
}

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::{
    components::{
        id::ItemId,
        spells::{
            spell::{FOCUS_SPELL_LEVEL, MagicSchool, Spell},
            spellcasting_entry::{PreparationStyle, SpellcastingEntry, Tradition},
        },
    },
    config::SpellbookConfig,
};

/// Display data for a spell placed in the spellbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellView {
    pub id: ItemId,
    pub name: String,
    pub level: u8,
    pub school: Option<MagicSchool>,
    pub school_label: Option<String>,
}

impl SpellView {
    pub fn new(spell: &Spell, config: &SpellbookConfig) -> Self {
        Self {
            id: spell.id().clone(),
            name: spell.name().to_string(),
            level: spell.level(),
            school: spell.school(),
            school_label: spell.school().map(|school| config.school_label(school)),
        }
    }
}

/// A resolved prepared slot, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedSlot {
    Empty { name: String },
    Spell { spell: SpellView, expended: bool },
}

impl PreparedSlot {
    pub fn empty(config: &SpellbookConfig) -> Self {
        PreparedSlot::Empty {
            name: config.empty_slot_label.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PreparedSlot::Empty { .. })
    }

    pub fn id(&self) -> Option<&ItemId> {
        match self {
            PreparedSlot::Empty { .. } => None,
            PreparedSlot::Spell { spell, .. } => Some(&spell.id),
        }
    }

    pub fn is_expended(&self) -> bool {
        matches!(self, PreparedSlot::Spell { expended: true, .. })
    }
}

#[derive(Serialize)]
struct EmptySlotView<'a> {
    name: &'a str,
    id: Option<&'a ItemId>,
    prepared: bool,
}

#[derive(Serialize)]
struct PreparedSpellView<'a> {
    #[serde(flatten)]
    spell: &'a SpellView,
    expended: bool,
    prepared: bool,
}

impl Serialize for PreparedSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PreparedSlot::Empty { name } => EmptySlotView {
                name,
                id: None,
                prepared: false,
            }
            .serialize(serializer),
            PreparedSlot::Spell { spell, expended } => PreparedSpellView {
                spell,
                expended: *expended,
                prepared: true,
            }
            .serialize(serializer),
        }
    }
}

/// One level of a spellbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellbookLevel {
    pub is_cantrip: bool,
    pub is_focus: bool,
    pub label: String,
    pub spells: Vec<SpellView>,
    /// Resolved slots, `prepared[i]` is slot `i`. Only filled for prepared casters.
    pub prepared: Vec<PreparedSlot>,
    pub uses: u8,
    pub slots: u8,
    pub display_prepared: bool,
    pub unprepared_spells_label: String,
}

impl SpellbookLevel {
    pub fn new(level: u8, entry: &SpellcastingEntry, config: &SpellbookConfig) -> Self {
        Self {
            is_cantrip: level == 0,
            is_focus: level == FOCUS_SPELL_LEVEL,
            label: config.spell_level_label(level),
            spells: Vec::new(),
            prepared: Vec::new(),
            uses: entry.slot_uses(level),
            slots: entry.slot_capacity(level),
            display_prepared: entry.displays_level(level),
            unprepared_spells_label: unprepared_spells_label(entry, config),
        }
    }
}

/// Arcane prepared casters keep their unprepared spells in a spellbook, so
/// they get their own label.
fn unprepared_spells_label(entry: &SpellcastingEntry, config: &SpellbookConfig) -> String {
    if entry.tradition() == Some(Tradition::Arcane)
        && entry.preparation() == Some(PreparationStyle::Prepared)
    {
        config.unprepared_spells_label_arcane_prepared.clone()
    } else {
        config.unprepared_spells_label.clone()
    }
}

/// Spellbook for one spellcasting entry, keyed by level. Rebuilt on every
/// render and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpellbookView {
    levels: BTreeMap<u8, SpellbookLevel>,
}

impl SpellbookView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, level: u8) -> Option<&SpellbookLevel> {
        self.levels.get(&level)
    }

    pub fn levels(&self) -> &BTreeMap<u8, SpellbookLevel> {
        &self.levels
    }

    pub fn levels_mut(&mut self) -> impl Iterator<Item = (&u8, &mut SpellbookLevel)> {
        self.levels.iter_mut()
    }

    pub fn contains_level(&self, level: u8) -> bool {
        self.levels.contains_key(&level)
    }

    pub fn max_level(&self) -> Option<u8> {
        self.levels.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The level's bucket, created from the entry's slot data on first touch.
    pub fn level_or_insert(
        &mut self,
        level: u8,
        entry: &SpellcastingEntry,
        config: &SpellbookConfig,
    ) -> &mut SpellbookLevel {
        self.levels
            .entry(level)
            .or_insert_with(|| SpellbookLevel::new(level, entry, config))
    }
}

/// A spellcasting entry together with its rendered spellbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySpellbook {
    pub entry_id: ItemId,
    pub name: String,
    pub tradition: Option<Tradition>,
    pub preparation: Option<PreparationStyle>,
    pub ability: String,
    pub show_unprepared_spells: bool,
    pub spellbook: SpellbookView,
}

impl EntrySpellbook {
    pub fn new(entry: &SpellcastingEntry, spellbook: SpellbookView) -> Self {
        Self {
            entry_id: entry.id().clone(),
            name: entry.name().to_string(),
            tradition: entry.tradition(),
            preparation: entry.preparation(),
            ability: entry.ability().to_string(),
            show_unprepared_spells: entry.shows_unprepared_spells(),
            spellbook,
        }
    }
}

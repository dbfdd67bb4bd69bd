//! Typed write intents. The engine never mutates documents itself; it builds
//! one of these and the persistence boundary turns it into whatever partial
//! update the host understands (see [`ItemUpdate::to_payload`]).

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use crate::components::{
    actor::ItemKind,
    document::slot_key,
    id::ItemId,
    spells::{
        spell::Spell,
        spellcasting_entry::{FocusPool, PreparationStyle, SlotAssignment, Tradition},
    },
};

/// Which part of a prepared slot is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotField {
    /// Put a spell in the slot. Only the id is written, so an existing
    /// expended flag survives.
    Spell(ItemId),
    /// Reset the slot to the empty placeholder.
    Empty,
    Expended(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemChange {
    Slot {
        level: u8,
        slot_index: usize,
        field: SlotField,
    },
    SlotUses {
        level: u8,
        value: u8,
    },
    /// New capacity together with the slot list resized to match it.
    SlotCapacity {
        level: u8,
        max: u8,
        prepared: Vec<SlotAssignment>,
    },
    ShowUnpreparedSpells(bool),
    DisplayLevels(BTreeMap<u8, bool>),
    /// Shows unprepared spells and the prepared spells at one level. Only that
    /// level's display flag is written; the host merges it into the map.
    RevealLevel(u8),
    Ability(String),
    FocusPool(FocusPool),
    SpellPrepared(bool),
    SpellLocation(ItemId),
}

/// A partial update of one owned item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    pub item_id: ItemId,
    pub change: ItemChange,
}

impl ItemUpdate {
    pub fn new(item_id: ItemId, change: ItemChange) -> Self {
        Self { item_id, change }
    }

    /// The kind of item this update can be applied to.
    pub fn target_kind(&self) -> ItemKind {
        match self.change {
            ItemChange::SpellPrepared(_) | ItemChange::SpellLocation(_) => ItemKind::Spell,
            _ => ItemKind::SpellcastingEntry,
        }
    }

    /// Dotted field paths and their values, in write order.
    pub fn fields(&self) -> Vec<(String, Value)> {
        match &self.change {
            ItemChange::Slot {
                level,
                slot_index,
                field,
            } => {
                let path = format!("data.slots.{}.prepared.{}", slot_key(*level), slot_index);
                let value = match field {
                    SlotField::Spell(id) => json!({ "id": id }),
                    SlotField::Empty => SlotAssignment::empty_record(),
                    SlotField::Expended(expended) => json!({ "expended": expended }),
                };
                vec![(path, value)]
            }
            ItemChange::SlotUses { level, value } => {
                vec![(format!("data.slots.{}.value", slot_key(*level)), json!(value))]
            }
            ItemChange::SlotCapacity {
                level,
                max,
                prepared,
            } => vec![
                (format!("data.slots.{}.max", slot_key(*level)), json!(max)),
                (
                    format!("data.slots.{}.prepared", slot_key(*level)),
                    json!(prepared),
                ),
            ],
            ItemChange::ShowUnpreparedSpells(show) => {
                vec![("data.showUnpreparedSpells.value".to_string(), json!(show))]
            }
            ItemChange::DisplayLevels(levels) => {
                let levels: Map<String, Value> = levels
                    .iter()
                    .map(|(level, shown)| (level.to_string(), Value::Bool(*shown)))
                    .collect();
                vec![("data.displayLevels".to_string(), Value::Object(levels))]
            }
            ItemChange::RevealLevel(level) => vec![
                ("data.showUnpreparedSpells.value".to_string(), json!(true)),
                (
                    "data.displayLevels".to_string(),
                    json!({ level.to_string(): true }),
                ),
            ],
            ItemChange::Ability(ability) => {
                vec![("data.ability.value".to_string(), json!(ability))]
            }
            ItemChange::FocusPool(focus) => vec![
                ("data.focus.points".to_string(), json!(focus.points)),
                ("data.focus.pool".to_string(), json!(focus.pool)),
            ],
            ItemChange::SpellPrepared(prepared) => {
                vec![("data.prepared.value".to_string(), json!(prepared))]
            }
            ItemChange::SpellLocation(entry_id) => {
                vec![("data.location.value".to_string(), json!(entry_id))]
            }
        }
    }

    /// The `{ "_id": .., "<dotted.path>": value }` object the host's
    /// embedded-entity update takes.
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("_id".to_string(), json!(self.item_id));
        payload.extend(self.fields());
        Value::Object(payload)
    }
}

/// An item to create on the actor. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub enum NewItem {
    SpellcastingEntry {
        name: String,
        tradition: Tradition,
        preparation: Option<PreparationStyle>,
    },
    /// A copy of a spell, usually from another actor, already pointed at an entry.
    Spell(Spell),
}

impl NewItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            NewItem::SpellcastingEntry { .. } => ItemKind::SpellcastingEntry,
            NewItem::Spell(_) => ItemKind::Spell,
        }
    }

    pub fn to_payload(&self) -> Value {
        match self {
            NewItem::SpellcastingEntry {
                name,
                tradition,
                preparation,
            } => json!({
                "name": name,
                "type": self.kind().to_string(),
                "data": {
                    "ability": { "type": "String", "label": "Spellcasting Ability", "value": "" },
                    "spelldc": { "type": "String", "label": "Class DC", "item": 0 },
                    "tradition": { "type": "String", "label": "Magic Tradition", "value": tradition },
                    "prepared": {
                        "type": "String",
                        "label": "Spellcasting Type",
                        "value": preparation.map(|p| p.to_string()).unwrap_or_default(),
                    },
                    "showUnpreparedSpells": { "value": true },
                },
            }),
            NewItem::Spell(spell) => {
                let mut value = json!(spell);
                if let Value::Object(map) = &mut value {
                    map.remove("_id");
                    map.insert("type".to_string(), json!(self.kind().to_string()));
                }
                value
            }
        }
    }
}

/// Every write the engine can ask the host for.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteIntent {
    Update(ItemUpdate),
    Create(NewItem),
    Delete(Vec<ItemId>),
    /// Import an item the host owns (compendium pack or world item) and point
    /// it at a spellcasting entry.
    Import {
        pack: Option<String>,
        id: ItemId,
        location: ItemId,
    },
}

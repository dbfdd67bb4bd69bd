use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use serde_json::Value;
use strum::Display;
use tracing::warn;

use crate::components::{
    document::{deserialize_count, deserialize_or_default},
    id::{ActorId, ItemId},
    spells::{spell::Spell, spellcasting_entry::SpellcastingEntry},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ItemKind {
    #[strum(serialize = "spellcastingEntry")]
    SpellcastingEntry,
    #[strum(serialize = "spell")]
    Spell,
}

/// An item owned by an actor. Only the kinds the spellbook cares about are
/// parsed; everything else is kept opaque.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemDocument {
    SpellcastingEntry(SpellcastingEntry),
    Spell(Spell),
    Other {
        id: ItemId,
        kind: String,
        data: Value,
    },
}

impl ItemDocument {
    pub fn id(&self) -> &ItemId {
        match self {
            ItemDocument::SpellcastingEntry(entry) => entry.id(),
            ItemDocument::Spell(spell) => spell.id(),
            ItemDocument::Other { id, .. } => id,
        }
    }

    /// The host's `type` string.
    pub fn kind(&self) -> String {
        match self {
            ItemDocument::SpellcastingEntry(_) => ItemKind::SpellcastingEntry.to_string(),
            ItemDocument::Spell(_) => ItemKind::Spell.to_string(),
            ItemDocument::Other { kind, .. } => kind.clone(),
        }
    }

    pub fn as_spell(&self) -> Option<&Spell> {
        match self {
            ItemDocument::Spell(spell) => Some(spell),
            _ => None,
        }
    }

    pub fn as_spellcasting_entry(&self) -> Option<&SpellcastingEntry> {
        match self {
            ItemDocument::SpellcastingEntry(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn as_spell_mut(&mut self) -> Option<&mut Spell> {
        match self {
            ItemDocument::Spell(spell) => Some(spell),
            _ => None,
        }
    }

    pub fn as_spellcasting_entry_mut(&mut self) -> Option<&mut SpellcastingEntry> {
        match self {
            ItemDocument::SpellcastingEntry(entry) => Some(entry),
            _ => None,
        }
    }

    pub(crate) fn set_id(&mut self, new_id: ItemId) {
        match self {
            ItemDocument::SpellcastingEntry(entry) => entry.set_id(new_id),
            ItemDocument::Spell(spell) => spell.set_id(new_id),
            ItemDocument::Other { id, .. } => *id = new_id,
        }
    }

    fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if kind == ItemKind::SpellcastingEntry.to_string() {
            return serde_json::from_value(value).map(ItemDocument::SpellcastingEntry);
        }
        if kind == ItemKind::Spell.to_string() {
            return serde_json::from_value(value).map(ItemDocument::Spell);
        }
        let id = value
            .get("_id")
            .and_then(Value::as_str)
            .map(ItemId::from_str)
            .ok_or_else(|| serde_json::Error::custom("item without an _id"))?;
        Ok(ItemDocument::Other { id, kind, data: value })
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        let (mut value, kind) = match self {
            ItemDocument::SpellcastingEntry(entry) => {
                (serde_json::to_value(entry)?, ItemKind::SpellcastingEntry)
            }
            ItemDocument::Spell(spell) => (serde_json::to_value(spell)?, ItemKind::Spell),
            ItemDocument::Other { data, .. } => return Ok(data.clone()),
        };
        if let Value::Object(map) = &mut value {
            map.insert("type".to_string(), Value::String(kind.to_string()));
        }
        Ok(value)
    }
}

impl<'de> Deserialize<'de> for ItemDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ItemDocument::from_value(value).map_err(D::Error::custom)
    }
}

impl Serialize for ItemDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

/// The actor document a sheet is rendered from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ActorRecord", into = "ActorRecord")]
pub struct ActorDocument {
    id: ActorId,
    name: String,
    level: u8,
    items: Vec<ItemDocument>,
}

impl ActorDocument {
    pub fn new(id: ActorId, name: impl Into<String>, level: u8) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: ItemDocument) -> Self {
        self.items.push(item);
        self
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Character level.
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn items(&self) -> &[ItemDocument] {
        &self.items
    }

    pub fn item(&self, id: &ItemId) -> Option<&ItemDocument> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut ItemDocument> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn spell(&self, id: &ItemId) -> Option<&Spell> {
        self.item(id).and_then(ItemDocument::as_spell)
    }

    pub fn spellcasting_entry(&self, id: &ItemId) -> Option<&SpellcastingEntry> {
        self.item(id).and_then(ItemDocument::as_spellcasting_entry)
    }

    pub fn spells(&self) -> impl Iterator<Item = &Spell> {
        self.items.iter().filter_map(ItemDocument::as_spell)
    }

    pub fn spellcasting_entries(&self) -> impl Iterator<Item = &SpellcastingEntry> {
        self.items
            .iter()
            .filter_map(ItemDocument::as_spellcasting_entry)
    }

    /// Spells whose location points at `entry_id`.
    pub fn spells_in(&self, entry_id: &ItemId) -> impl Iterator<Item = &Spell> {
        self.spells()
            .filter(move |spell| spell.location() == Some(entry_id))
    }

    pub fn push_item(&mut self, item: ItemDocument) {
        self.items.push(item);
    }

    pub fn remove_items(&mut self, ids: &[ItemId]) -> Vec<ItemDocument> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| ids.contains(item.id()));
        self.items = kept;
        removed
    }
}

/// Host shape of an actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActorRecord {
    #[serde(rename = "_id")]
    id: ActorId,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    data: ActorData,
    #[serde(default, deserialize_with = "deserialize_items")]
    items: Vec<ItemDocument>,
}

/// Items that can't be read at all are skipped so the rest of the actor still renders.
fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<ItemDocument>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<Value> = deserialize_or_default(deserializer)?;
    Ok(items
        .into_iter()
        .filter_map(|item| match ItemDocument::from_value(item) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!("Skipping unreadable item: {}", err);
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ActorData {
    #[serde(default, deserialize_with = "deserialize_or_default")]
    details: ActorDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ActorDetails {
    #[serde(default, deserialize_with = "deserialize_or_default")]
    level: LevelField,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LevelField {
    #[serde(default, deserialize_with = "deserialize_count")]
    value: u8,
}

impl From<ActorRecord> for ActorDocument {
    fn from(record: ActorRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            level: record.data.details.level.value,
            items: record.items,
        }
    }
}

impl From<ActorDocument> for ActorRecord {
    fn from(actor: ActorDocument) -> Self {
        ActorRecord {
            id: actor.id,
            name: actor.name,
            data: ActorData {
                details: ActorDetails {
                    level: LevelField { value: actor.level },
                },
            },
            items: actor.items,
        }
    }
}

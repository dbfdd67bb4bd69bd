use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

use crate::components::{
    document::{ValueField, deserialize_flag, deserialize_or_default, parse_count},
    id::ItemId,
};

/// Highest spell level a spellbook has a bucket for. Anything above is shown here.
pub const MAX_SPELL_LEVEL: u8 = 10;

/// Synthetic bucket the rendering layer uses for focus spells.
pub const FOCUS_SPELL_LEVEL: u8 = 11;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MagicSchool {
    Abjuration,
    Conjuration,
    Divination,
    Enchantment,
    Evocation,
    Illusion,
    Necromancy,
    Transmutation,
}

/// A spell item owned by an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SpellRecord", into = "SpellRecord")]
pub struct Spell {
    id: ItemId,
    name: String,
    level: u8,
    school: Option<MagicSchool>,
    /// Spellcasting entry the spell is cast from. This is a back-reference, the
    /// entry does not own the spell.
    location: Option<ItemId>,
    prepared: bool,
}

impl Spell {
    pub fn new(id: ItemId, name: impl Into<String>, level: u8) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            school: None,
            location: None,
            prepared: false,
        }
    }

    pub fn with_school(mut self, school: MagicSchool) -> Self {
        self.school = Some(school);
        self
    }

    pub fn with_location(mut self, location: ItemId) -> Self {
        self.location = Some(location);
        self
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The level as stored on the item, without clamping.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// The spellbook bucket this spell belongs in.
    pub fn bucket_level(&self) -> u8 {
        self.level.min(MAX_SPELL_LEVEL)
    }

    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    pub fn school(&self) -> Option<MagicSchool> {
        self.school
    }

    pub fn location(&self) -> Option<&ItemId> {
        self.location.as_ref()
    }

    pub fn set_location(&mut self, location: Option<ItemId>) {
        self.location = location;
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn set_prepared(&mut self, prepared: bool) {
        self.prepared = prepared;
    }

    pub(crate) fn set_id(&mut self, id: ItemId) {
        self.id = id;
    }
}

/// Host shape of a spell item.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpellRecord {
    #[serde(rename = "_id")]
    id: ItemId,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    name: String,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    data: SpellData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SpellData {
    #[serde(default, deserialize_with = "deserialize_or_default")]
    level: LevelField,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    school: ValueField<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    location: ValueField<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    prepared: FlagField,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelField {
    #[serde(default = "unreadable_level", deserialize_with = "deserialize_spell_level")]
    value: u8,
}

impl Default for LevelField {
    fn default() -> Self {
        Self {
            value: unreadable_level(),
        }
    }
}

/// Spells whose level can't be read are shown with the highest level.
fn unreadable_level() -> u8 {
    MAX_SPELL_LEVEL
}

/// Reads a stored spell level. Numbers and numeric text are taken as counts,
/// blank text and `null` are cantrips, and anything else is unreadable.
pub fn parse_spell_level(value: &Value) -> u8 {
    match value {
        Value::Null | Value::Number(_) => parse_count(value),
        Value::Bool(flag) => u8::from(*flag),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                0
            } else {
                text.parse::<f64>()
                    .ok()
                    .filter(|level| level.is_finite())
                    .map_or_else(unreadable_level, |level| level.clamp(0.0, u8::MAX as f64) as u8)
            }
        }
        Value::Array(_) | Value::Object(_) => unreadable_level(),
    }
}

fn deserialize_spell_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| parse_spell_level(&value))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FlagField {
    #[serde(default, deserialize_with = "deserialize_flag")]
    value: bool,
}

impl From<SpellRecord> for Spell {
    fn from(record: SpellRecord) -> Self {
        let data = record.data;
        Self {
            id: record.id,
            name: record.name,
            level: data.level.value,
            school: data.school.value.and_then(|school| school.parse().ok()),
            location: data
                .location
                .value
                .filter(|location| !location.is_empty())
                .map(ItemId::from_str),
            prepared: data.prepared.value,
        }
    }
}

impl From<Spell> for SpellRecord {
    fn from(spell: Spell) -> Self {
        SpellRecord {
            id: spell.id,
            name: spell.name,
            data: SpellData {
                level: LevelField { value: spell.level },
                school: ValueField::new(spell.school.map(|school| school.to_string())),
                location: ValueField::new(spell.location.map(|location| location.to_string())),
                prepared: FlagField {
                    value: spell.prepared,
                },
            },
        }
    }
}

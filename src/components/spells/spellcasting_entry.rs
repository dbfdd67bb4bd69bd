use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Value, json};
use strum::{Display, EnumIter, EnumString};

use crate::components::{
    document::{
        ValueField, deserialize_count, deserialize_flag, deserialize_or_default, index_addressed,
        is_truthy, parse_slot_key, slot_key,
    },
    id::ItemId,
};

/// Name the host shows for an empty prepared slot.
pub const EMPTY_SLOT_NAME: &str = "Empty Slot (drag spell here)";

/// Ability used when an entry does not name one.
pub const DEFAULT_SPELLCASTING_ABILITY: &str = "int";

/// Slot indices at or past this can never be shown, since `max` is a `u8`.
pub const SLOT_INDEX_LIMIT: usize = u8::MAX as usize;

/// Largest focus pool an entry can have.
pub const MAX_FOCUS_POOL: u8 = 3;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tradition {
    Arcane,
    Divine,
    Occult,
    Primal,
    Wand,
    Scroll,
    Ritual,
    Focus,
}

impl Tradition {
    /// Wands, scrolls, rituals and focus spells don't follow numbered slot
    /// levels, so their spellbook only shows the levels their spells sit at.
    pub fn is_level_based(&self) -> bool {
        !matches!(
            self,
            Tradition::Wand | Tradition::Scroll | Tradition::Ritual | Tradition::Focus
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PreparationStyle {
    Prepared,
    Spontaneous,
    Innate,
}

/// What a single prepared slot holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotAssignment {
    #[default]
    Empty,
    Occupied { id: ItemId, expended: bool },
}

impl SlotAssignment {
    pub fn occupied(id: ItemId) -> Self {
        SlotAssignment::Occupied {
            id,
            expended: false,
        }
    }

    pub fn id(&self) -> Option<&ItemId> {
        match self {
            SlotAssignment::Empty => None,
            SlotAssignment::Occupied { id, .. } => Some(id),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SlotAssignment::Empty)
    }

    pub fn is_expended(&self) -> bool {
        matches!(self, SlotAssignment::Occupied { expended: true, .. })
    }

    /// The persisted placeholder object the host has always stored for an empty slot.
    pub fn empty_record() -> Value {
        json!({
            "id": Value::Null,
            "name": EMPTY_SLOT_NAME,
            "prepared": false,
        })
    }
}

impl Serialize for SlotAssignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SlotAssignment::Empty => SlotAssignment::empty_record().serialize(serializer),
            SlotAssignment::Occupied { id, expended } => {
                json!({ "id": id, "expended": expended }).serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for SlotAssignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(SlotAssignment::from_value(&value))
    }
}

impl SlotAssignment {
    /// Anything without a usable id reads as empty.
    fn from_value(value: &Value) -> Self {
        let id = match value.get("id") {
            Some(Value::String(id)) if !id.is_empty() => ItemId::from_str(id.as_str()),
            _ => return SlotAssignment::Empty,
        };
        let expended = value.get("expended").is_some_and(is_truthy);
        SlotAssignment::Occupied { id, expended }
    }
}

/// Slot capacity, usage and assignments for one spell level of an entry.
///
/// `prepared` is index-addressed: position `i` is slot `i`, and the order is
/// never changed. Resizing `max` keeps `prepared.len() == max`. Writes past
/// `max` are stored as-is and only show up once `max` grows over them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotGroup {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub value: u8,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub max: u8,
    #[serde(default, deserialize_with = "deserialize_prepared")]
    prepared: Vec<SlotAssignment>,
}

fn deserialize_prepared<'de, D>(deserializer: D) -> Result<Vec<SlotAssignment>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(index_addressed(value, SLOT_INDEX_LIMIT)
        .iter()
        .map(SlotAssignment::from_value)
        .collect())
}

impl SlotGroup {
    pub fn new(value: u8, max: u8) -> Self {
        Self {
            value,
            max,
            prepared: vec![SlotAssignment::Empty; max as usize],
        }
    }

    pub fn with_prepared(mut self, prepared: Vec<SlotAssignment>) -> Self {
        self.prepared = prepared;
        self
    }

    /// The stored assignment at `index`, whether or not it is within `max`.
    pub fn slot(&self, index: usize) -> Option<&SlotAssignment> {
        self.prepared.get(index)
    }

    /// Everything stored, including entries written past `max`.
    pub fn stored(&self) -> &[SlotAssignment] {
        &self.prepared
    }

    pub fn holds(&self, spell_id: &ItemId) -> bool {
        self.prepared
            .iter()
            .any(|assignment| assignment.id() == Some(spell_id))
    }

    /// The stored assignments resized to exactly `max` entries, new entries empty.
    pub fn resized(&self, max: u8) -> Vec<SlotAssignment> {
        let mut prepared = self.prepared.clone();
        prepared.resize(max as usize, SlotAssignment::Empty);
        prepared
    }

    pub fn set_max(&mut self, max: u8) {
        self.prepared = self.resized(max);
        self.max = max;
    }

    pub fn set_prepared(&mut self, prepared: Vec<SlotAssignment>) {
        self.prepared = prepared;
    }

    /// Puts a spell in a slot. Whatever expended state the slot had is kept.
    /// Writes at or past [`SLOT_INDEX_LIMIT`] are ignored.
    pub fn assign(&mut self, index: usize, spell_id: ItemId) {
        let expended = self.slot(index).is_some_and(SlotAssignment::is_expended);
        if let Some(slot) = self.slot_mut(index) {
            *slot = SlotAssignment::Occupied {
                id: spell_id,
                expended,
            };
        }
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.slot_mut(index) {
            *slot = SlotAssignment::Empty;
        }
    }

    /// Expending an empty slot leaves it empty.
    pub fn set_expended(&mut self, index: usize, expended: bool) {
        if let Some(SlotAssignment::Occupied {
            expended: current, ..
        }) = self.slot_mut(index)
        {
            *current = expended;
        }
    }

    fn slot_mut(&mut self, index: usize) -> Option<&mut SlotAssignment> {
        if index >= SLOT_INDEX_LIMIT {
            return None;
        }
        if index >= self.prepared.len() {
            self.prepared.resize(index + 1, SlotAssignment::Empty);
        }
        self.prepared.get_mut(index)
    }
}

/// Focus points of a focus entry, and the pool they refill to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusPool {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub points: u8,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub pool: u8,
}

impl FocusPool {
    /// A pool of `pool` (at most [`MAX_FOCUS_POOL`]) with the current points
    /// capped to it.
    pub fn resized(&self, pool: u8) -> Self {
        let pool = pool.min(MAX_FOCUS_POOL);
        Self {
            points: self.points.min(pool),
            pool,
        }
    }
}

/// One method or tradition by which an actor casts spells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SpellcastingEntryRecord", into = "SpellcastingEntryRecord")]
pub struct SpellcastingEntry {
    id: ItemId,
    name: String,
    /// `None` when the stored tradition is not one we know about.
    tradition: Option<Tradition>,
    /// `None` for traditions without a preparation style (rituals, focus, scrolls).
    preparation: Option<PreparationStyle>,
    ability: String,
    slots: BTreeMap<u8, SlotGroup>,
    display_levels: BTreeMap<u8, bool>,
    show_unprepared_spells: bool,
    focus: Option<FocusPool>,
}

impl SpellcastingEntry {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        tradition: Tradition,
        preparation: Option<PreparationStyle>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            tradition: Some(tradition),
            preparation,
            ability: String::new(),
            slots: BTreeMap::new(),
            display_levels: BTreeMap::new(),
            show_unprepared_spells: true,
            focus: None,
        }
    }

    pub fn with_slots(mut self, level: u8, slots: SlotGroup) -> Self {
        self.slots.insert(level, slots);
        self
    }

    pub fn with_ability(mut self, ability: impl Into<String>) -> Self {
        self.ability = ability.into();
        self
    }

    pub fn with_focus(mut self, focus: FocusPool) -> Self {
        self.focus = Some(focus);
        self
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tradition(&self) -> Option<Tradition> {
        self.tradition
    }

    pub fn preparation(&self) -> Option<PreparationStyle> {
        self.preparation
    }

    pub fn is_prepared_caster(&self) -> bool {
        self.preparation == Some(PreparationStyle::Prepared)
    }

    pub fn is_level_based(&self) -> bool {
        self.tradition.is_none_or(|tradition| tradition.is_level_based())
    }

    pub fn ability(&self) -> &str {
        if self.ability.is_empty() {
            DEFAULT_SPELLCASTING_ABILITY
        } else {
            &self.ability
        }
    }

    pub fn set_ability(&mut self, ability: impl Into<String>) {
        self.ability = ability.into();
    }

    /// The stored focus pool. Entries that never had one read as empty.
    pub fn focus(&self) -> FocusPool {
        self.focus.unwrap_or_default()
    }

    pub fn set_focus(&mut self, focus: FocusPool) {
        self.focus = Some(focus);
    }

    pub fn slots(&self) -> &BTreeMap<u8, SlotGroup> {
        &self.slots
    }

    pub fn slot_group(&self, level: u8) -> Option<&SlotGroup> {
        self.slots.get(&level)
    }

    pub fn slot_group_mut(&mut self, level: u8) -> &mut SlotGroup {
        self.slots.entry(level).or_default()
    }

    /// Used slots at `level`, zero when the level has no slot group.
    pub fn slot_uses(&self, level: u8) -> u8 {
        self.slot_group(level).map(|group| group.value).unwrap_or(0)
    }

    /// Available slots at `level`, zero when the level has no slot group.
    pub fn slot_capacity(&self, level: u8) -> u8 {
        self.slot_group(level).map(|group| group.max).unwrap_or(0)
    }

    /// Highest level with a slot currently holding `spell_id`.
    pub fn highest_slot_holding(&self, spell_id: &ItemId) -> Option<u8> {
        self.slots
            .iter()
            .filter(|(_, group)| group.holds(spell_id))
            .map(|(level, _)| *level)
            .max()
    }

    pub fn display_levels(&self) -> &BTreeMap<u8, bool> {
        &self.display_levels
    }

    /// Whether prepared spells at `level` are shown. Levels never toggled are shown.
    pub fn displays_level(&self, level: u8) -> bool {
        self.display_levels.get(&level).copied().unwrap_or(true)
    }

    pub fn set_display_levels(&mut self, display_levels: BTreeMap<u8, bool>) {
        self.display_levels = display_levels;
    }

    pub fn set_display_level(&mut self, level: u8, shown: bool) {
        self.display_levels.insert(level, shown);
    }

    pub fn shows_unprepared_spells(&self) -> bool {
        self.show_unprepared_spells
    }

    pub fn set_show_unprepared_spells(&mut self, show: bool) {
        self.show_unprepared_spells = show;
    }

    pub(crate) fn set_id(&mut self, id: ItemId) {
        self.id = id;
    }
}

/// Host shape of a spellcasting entry item.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpellcastingEntryRecord {
    #[serde(rename = "_id")]
    id: ItemId,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    name: String,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    data: SpellcastingEntryData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpellcastingEntryData {
    #[serde(default, deserialize_with = "deserialize_or_default")]
    ability: ValueField<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    tradition: ValueField<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    prepared: ValueField<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    show_unprepared_spells: ShowUnprepared,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    display_levels: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "deserialize_slot_groups")]
    slots: BTreeMap<String, SlotGroup>,
    #[serde(
        default,
        deserialize_with = "deserialize_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    focus: Option<FocusPool>,
}

/// A malformed slot group reads as an empty one instead of failing the entry.
fn deserialize_slot_groups<'de, D>(deserializer: D) -> Result<BTreeMap<String, SlotGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    let groups: BTreeMap<String, Value> = deserialize_or_default(deserializer)?;
    Ok(groups
        .into_iter()
        .map(|(key, group)| (key, serde_json::from_value(group).unwrap_or_default()))
        .collect())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ShowUnprepared {
    #[serde(default, deserialize_with = "deserialize_flag")]
    value: bool,
}

impl Default for ShowUnprepared {
    fn default() -> Self {
        Self { value: true }
    }
}

impl From<SpellcastingEntryRecord> for SpellcastingEntry {
    fn from(record: SpellcastingEntryRecord) -> Self {
        let data = record.data;
        Self {
            id: record.id,
            name: record.name,
            tradition: data.tradition.value.and_then(|t| t.parse().ok()),
            preparation: data.prepared.value.and_then(|p| p.parse().ok()),
            ability: data.ability.value.unwrap_or_default(),
            slots: data
                .slots
                .into_iter()
                .filter_map(|(key, group)| parse_slot_key(&key).map(|level| (level, group)))
                .collect(),
            display_levels: data
                .display_levels
                .into_iter()
                .filter_map(|(key, shown)| {
                    key.parse::<u8>().ok().map(|level| (level, is_truthy(&shown)))
                })
                .collect(),
            show_unprepared_spells: data.show_unprepared_spells.value,
            focus: data.focus,
        }
    }
}

impl From<SpellcastingEntry> for SpellcastingEntryRecord {
    fn from(entry: SpellcastingEntry) -> Self {
        SpellcastingEntryRecord {
            id: entry.id,
            name: entry.name,
            data: SpellcastingEntryData {
                ability: ValueField::new(Some(entry.ability)),
                tradition: ValueField::new(entry.tradition.map(|t| t.to_string())),
                prepared: ValueField::new(Some(
                    entry.preparation.map(|p| p.to_string()).unwrap_or_default(),
                )),
                show_unprepared_spells: ShowUnprepared {
                    value: entry.show_unprepared_spells,
                },
                display_levels: entry
                    .display_levels
                    .into_iter()
                    .map(|(level, shown)| (level.to_string(), Value::Bool(shown)))
                    .collect(),
                slots: entry
                    .slots
                    .into_iter()
                    .map(|(level, group)| (slot_key(level), group))
                    .collect(),
                focus: entry.focus,
            },
        }
    }
}

//! Write intents for prepared slots. None of these check `slot_index` against
//! the level's capacity; writes past it are stored and only show up once the
//! capacity grows to cover them.

use tracing::debug;

use crate::components::{
    id::ItemId,
    spells::spellcasting_entry::SpellcastingEntry,
    update::{ItemChange, ItemUpdate, SlotField},
};

/// Puts `spell_id` in a slot. The slot's expended flag is left alone.
pub fn assign_slot(entry_id: &ItemId, level: u8, slot_index: usize, spell_id: &ItemId) -> ItemUpdate {
    debug!(
        "Preparing spell {} in slot {} at level {} of entry {}",
        spell_id, slot_index, level, entry_id
    );
    slot_update(entry_id, level, slot_index, SlotField::Spell(spell_id.clone()))
}

pub fn clear_slot(entry_id: &ItemId, level: u8, slot_index: usize) -> ItemUpdate {
    debug!(
        "Clearing slot {} at level {} of entry {}",
        slot_index, level, entry_id
    );
    slot_update(entry_id, level, slot_index, SlotField::Empty)
}

/// Flips a slot's expended flag given its current value.
pub fn toggle_expended(
    entry_id: &ItemId,
    level: u8,
    slot_index: usize,
    currently_expended: bool,
) -> ItemUpdate {
    let expended = !currently_expended;
    debug!(
        "Setting slot {} at level {} of entry {} to expended={}",
        slot_index, level, entry_id, expended
    );
    slot_update(entry_id, level, slot_index, SlotField::Expended(expended))
}

/// The sheet hands the current expended flag over as text. Only `"true"` is set.
pub fn parse_expended_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

pub fn set_slot_uses(entry_id: &ItemId, level: u8, value: u8) -> ItemUpdate {
    debug!(
        "Setting used slots at level {} of entry {} to {}",
        level, entry_id, value
    );
    ItemUpdate::new(entry_id.clone(), ItemChange::SlotUses { level, value })
}

/// Changes a level's capacity and writes the slot list resized to match it.
pub fn set_slot_capacity(entry: &SpellcastingEntry, level: u8, max: u8) -> ItemUpdate {
    debug!(
        "Setting available slots at level {} of entry {} to {}",
        level,
        entry.id(),
        max
    );
    let prepared = entry
        .slot_group(level)
        .map(|group| group.resized(max))
        .unwrap_or_else(|| vec![Default::default(); max as usize]);
    ItemUpdate::new(
        entry.id().clone(),
        ItemChange::SlotCapacity {
            level,
            max,
            prepared,
        },
    )
}

fn slot_update(entry_id: &ItemId, level: u8, slot_index: usize, field: SlotField) -> ItemUpdate {
    ItemUpdate::new(
        entry_id.clone(),
        ItemChange::Slot {
            level,
            slot_index,
            field,
        },
    )
}

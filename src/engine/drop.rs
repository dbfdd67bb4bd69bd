use tracing::{debug, info};

use crate::{
    components::{
        actor::ActorDocument, drag::DragPayload, id::ItemId, update::NewItem, update::WriteIntent,
    },
    engine::error::SheetError,
    systems::{
        slots,
        spellcasting::{expect_spellcasting_entry, move_spell_to_entry},
    },
};

/// Where on the sheet something was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    SpellSlot {
        entry_id: ItemId,
        level: u8,
        slot_index: usize,
    },
    SpellcastingEntry {
        entry_id: ItemId,
    },
}

impl DropTarget {
    pub fn entry_id(&self) -> &ItemId {
        match self {
            DropTarget::SpellSlot { entry_id, .. } => entry_id,
            DropTarget::SpellcastingEntry { entry_id } => entry_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Write(WriteIntent),
    /// Not a spellbook drop; the host's default drop handling applies.
    Unhandled,
}

/// Works out what a drop onto the spellbook should write.
pub fn resolve_drop(
    actor: &ActorDocument,
    payload: &DragPayload,
    target: &DropTarget,
) -> Result<DropOutcome, SheetError> {
    let entry_id = target.entry_id();
    expect_spellcasting_entry(actor, entry_id)?;

    if let Some(pack) = &payload.pack {
        let Some(id) = payload.id.clone() else {
            return Ok(DropOutcome::Unhandled);
        };
        info!("Importing {} from pack {} into entry {}", id, pack, entry_id);
        return Ok(DropOutcome::Write(WriteIntent::Import {
            pack: Some(pack.clone()),
            id,
            location: entry_id.clone(),
        }));
    }

    if let Some(spell) = payload.spell() {
        if payload.is_from_actor(actor.id()) {
            let update = match target {
                DropTarget::SpellSlot {
                    entry_id,
                    level,
                    slot_index,
                } => slots::assign_slot(entry_id, *level, *slot_index, spell.id()),
                DropTarget::SpellcastingEntry { entry_id } => {
                    move_spell_to_entry(actor, spell.id(), entry_id)?
                }
            };
            return Ok(DropOutcome::Write(WriteIntent::Update(update)));
        }

        debug!(
            "Copying spell {} from another actor into entry {}",
            spell.name(),
            entry_id
        );
        let copy = spell.with_location(entry_id.clone());
        return Ok(DropOutcome::Write(WriteIntent::Create(NewItem::Spell(copy))));
    }

    // A bare item id is a world item from the sidebar. Slots sit inside their
    // entry, so both targets import into the entry.
    if let (true, None, Some(id)) = (payload.is_item(), &payload.data, &payload.id) {
        info!("Importing world item {} into entry {}", id, entry_id);
        return Ok(DropOutcome::Write(WriteIntent::Import {
            pack: None,
            id: id.clone(),
            location: entry_id.clone(),
        }));
    }

    Ok(DropOutcome::Unhandled)
}

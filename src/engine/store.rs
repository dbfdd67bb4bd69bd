use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::{
    components::{
        actor::{ActorDocument, ItemDocument, ItemKind},
        id::ItemId,
        spells::spellcasting_entry::{SLOT_INDEX_LIMIT, SpellcastingEntry},
        update::{ItemChange, ItemUpdate, NewItem, SlotField},
    },
    engine::error::SheetError,
};

/// Persistence boundary of the sheet. Every write the engine makes goes
/// through exactly one of these calls.
pub trait DocumentStore {
    fn actor(&self) -> &ActorDocument;

    fn update_item(&mut self, update: ItemUpdate) -> Result<(), SheetError>;

    fn create_item(&mut self, item: NewItem) -> Result<ItemId, SheetError>;

    fn delete_items(&mut self, ids: &[ItemId]) -> Result<(), SheetError>;

    /// Copies an item the host owns (a compendium pack entry when `pack` is
    /// set, a world item otherwise) onto the actor, located in `location`.
    fn import_item(
        &mut self,
        pack: Option<&str>,
        id: &ItemId,
        location: &ItemId,
    ) -> Result<ItemId, SheetError>;
}

/// A store that keeps the actor in memory and applies writes directly.
#[derive(Debug, Clone)]
pub struct InMemoryDocumentStore {
    actor: ActorDocument,
    library: HashMap<(Option<String>, ItemId), ItemDocument>,
}

impl InMemoryDocumentStore {
    pub fn new(actor: ActorDocument) -> Self {
        Self {
            actor,
            library: HashMap::new(),
        }
    }

    /// Makes `item` importable from `pack` (or as a world item with `None`).
    pub fn with_library_item(mut self, pack: Option<&str>, item: ItemDocument) -> Self {
        self.library
            .insert((pack.map(str::to_string), item.id().clone()), item);
        self
    }

    pub fn into_actor(self) -> ActorDocument {
        self.actor
    }

    fn spellcasting_entry_mut(&mut self, id: &ItemId) -> Result<&mut SpellcastingEntry, SheetError> {
        let item = self
            .actor
            .item_mut(id)
            .ok_or_else(|| SheetError::ItemNotFound(id.clone()))?;
        let found = item.kind();
        item.as_spellcasting_entry_mut()
            .ok_or_else(|| SheetError::WrongItemKind {
                item_id: id.clone(),
                expected: ItemKind::SpellcastingEntry,
                found,
            })
    }

    fn insert(&mut self, mut item: ItemDocument) -> ItemId {
        let id = ItemId::generate();
        item.set_id(id.clone());
        self.actor.push_item(item);
        id
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn actor(&self) -> &ActorDocument {
        &self.actor
    }

    fn update_item(&mut self, update: ItemUpdate) -> Result<(), SheetError> {
        debug!("Applying {:?} to item {}", update.change, update.item_id);

        if update.target_kind() == ItemKind::Spell {
            let item = self
                .actor
                .item_mut(&update.item_id)
                .ok_or_else(|| SheetError::ItemNotFound(update.item_id.clone()))?;
            let found = item.kind();
            let spell = item.as_spell_mut().ok_or_else(|| SheetError::WrongItemKind {
                item_id: update.item_id.clone(),
                expected: ItemKind::Spell,
                found,
            })?;
            match update.change {
                ItemChange::SpellPrepared(prepared) => spell.set_prepared(prepared),
                ItemChange::SpellLocation(location) => spell.set_location(Some(location)),
                _ => {}
            }
            return Ok(());
        }

        let entry = self.spellcasting_entry_mut(&update.item_id)?;
        match update.change {
            ItemChange::Slot {
                level,
                slot_index,
                field,
            } => {
                if slot_index >= SLOT_INDEX_LIMIT {
                    warn!(
                        "Ignoring write to slot {} of level {} in {}, past the last usable slot",
                        slot_index, level, update.item_id
                    );
                    return Ok(());
                }
                let group = entry.slot_group_mut(level);
                match field {
                    SlotField::Spell(spell_id) => group.assign(slot_index, spell_id),
                    SlotField::Empty => group.clear(slot_index),
                    SlotField::Expended(expended) => group.set_expended(slot_index, expended),
                }
            }
            ItemChange::SlotUses { level, value } => entry.slot_group_mut(level).value = value,
            ItemChange::SlotCapacity {
                level,
                max,
                prepared,
            } => {
                let group = entry.slot_group_mut(level);
                group.set_max(max);
                group.set_prepared(prepared);
            }
            ItemChange::ShowUnpreparedSpells(show) => entry.set_show_unprepared_spells(show),
            ItemChange::DisplayLevels(levels) => entry.set_display_levels(levels),
            ItemChange::RevealLevel(level) => {
                entry.set_show_unprepared_spells(true);
                entry.set_display_level(level, true);
            }
            ItemChange::Ability(ability) => entry.set_ability(ability),
            ItemChange::FocusPool(focus) => entry.set_focus(focus),
            ItemChange::SpellPrepared(_) | ItemChange::SpellLocation(_) => {}
        }
        Ok(())
    }

    fn create_item(&mut self, item: NewItem) -> Result<ItemId, SheetError> {
        let document = match item {
            NewItem::SpellcastingEntry {
                name,
                tradition,
                preparation,
            } => ItemDocument::SpellcastingEntry(SpellcastingEntry::new(
                ItemId::from_str(""),
                name,
                tradition,
                preparation,
            )),
            NewItem::Spell(spell) => ItemDocument::Spell(spell),
        };
        let id = self.insert(document);
        info!("Created item {} on actor {}", id, self.actor.id());
        Ok(id)
    }

    fn delete_items(&mut self, ids: &[ItemId]) -> Result<(), SheetError> {
        let removed = self.actor.remove_items(ids);
        info!("Deleted {} item(s) from actor {}", removed.len(), self.actor.id());
        Ok(())
    }

    fn import_item(
        &mut self,
        pack: Option<&str>,
        id: &ItemId,
        location: &ItemId,
    ) -> Result<ItemId, SheetError> {
        let key = (pack.map(str::to_string), id.clone());
        let mut item = self
            .library
            .get(&key)
            .cloned()
            .ok_or_else(|| SheetError::ImportNotFound {
                pack: key.0.clone(),
                id: id.clone(),
            })?;
        if let Some(spell) = item.as_spell_mut() {
            spell.set_location(Some(location.clone()));
        }
        let new_id = self.insert(item);
        info!("Imported {} as {} into entry {}", id, new_id, location);
        Ok(new_id)
    }
}

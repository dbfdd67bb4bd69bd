use tracing::debug;

use crate::{
    components::{
        drag::DragPayload,
        id::ItemId,
        spells::{
            spellbook::EntrySpellbook,
            spellcasting_entry::{PreparationStyle, Tradition},
        },
        update::WriteIntent,
    },
    config::SpellbookConfig,
    engine::{
        drop::{DropOutcome, DropTarget, resolve_drop},
        error::SheetError,
        store::DocumentStore,
    },
    systems::{self, spellcasting::expect_spellcasting_entry},
};

/// Everything a player can do to the spellbook from the sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetAction {
    AssignSlot {
        entry_id: ItemId,
        level: u8,
        slot_index: usize,
        spell_id: ItemId,
    },
    ClearSlot {
        entry_id: ItemId,
        level: u8,
        slot_index: usize,
    },
    ToggleExpended {
        entry_id: ItemId,
        level: u8,
        slot_index: usize,
        currently_expended: bool,
    },
    SetSlotUses {
        entry_id: ItemId,
        level: u8,
        value: u8,
    },
    SetSlotCapacity {
        entry_id: ItemId,
        level: u8,
        max: u8,
    },
    CreateSpellcastingEntry {
        tradition: Tradition,
        preparation: Option<PreparationStyle>,
    },
    RemoveSpellcastingEntry {
        entry_id: ItemId,
    },
    ToggleShowUnprepared {
        entry_id: ItemId,
    },
    ToggleDisplayLevel {
        entry_id: ItemId,
        level: u8,
    },
    ToggleSpellPrepared {
        spell_id: ItemId,
    },
    /// Adds a blank spell of `level` to an entry and opens that level.
    CreateSpell {
        entry_id: ItemId,
        level: u8,
    },
    SetSpellcastingAbility {
        entry_id: ItemId,
        ability: String,
    },
    SetFocusPool {
        entry_id: ItemId,
        pool: u8,
    },
    Drop {
        payload: DragPayload,
        target: DropTarget,
    },
}

impl SheetAction {
    /// Expended toggle as the sheet reports it, with the current flag as text.
    pub fn toggle_expended(
        entry_id: ItemId,
        level: u8,
        slot_index: usize,
        raw_expended: Option<&str>,
    ) -> Self {
        SheetAction::ToggleExpended {
            entry_id,
            level,
            slot_index,
            currently_expended: systems::slots::parse_expended_flag(raw_expended),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetResponse {
    Updated,
    Created(ItemId),
    Deleted(Vec<ItemId>),
    /// The action wasn't for the spellbook; the host should handle it.
    Unhandled,
}

/// The spellbook part of an actor sheet.
pub struct SpellbookSheet<S: DocumentStore> {
    store: S,
    config: SpellbookConfig,
}

impl<S: DocumentStore> SpellbookSheet<S> {
    pub fn new(store: S, config: SpellbookConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn config(&self) -> &SpellbookConfig {
        &self.config
    }

    /// Rebuilds the spellbook of every entry from the current actor.
    pub fn render(&self) -> Vec<EntrySpellbook> {
        systems::spells::build_actor_spellbooks(self.store.actor(), &self.config)
    }

    /// Applies the writes for `action` in order. The response is the one of
    /// the last write, or `Unhandled` when there was nothing to write.
    pub fn handle(&mut self, action: SheetAction) -> Result<SheetResponse, SheetError> {
        debug!("Handling sheet action {:?}", action);
        let mut response = SheetResponse::Unhandled;
        for intent in self.intents_for(action)? {
            response = self.apply(intent)?;
        }
        Ok(response)
    }

    fn intents_for(&self, action: SheetAction) -> Result<Vec<WriteIntent>, SheetError> {
        let actor = self.store.actor();
        let intent = match action {
            SheetAction::AssignSlot {
                entry_id,
                level,
                slot_index,
                spell_id,
            } => WriteIntent::Update(systems::slots::assign_slot(
                &entry_id, level, slot_index, &spell_id,
            )),
            SheetAction::ClearSlot {
                entry_id,
                level,
                slot_index,
            } => WriteIntent::Update(systems::slots::clear_slot(&entry_id, level, slot_index)),
            SheetAction::ToggleExpended {
                entry_id,
                level,
                slot_index,
                currently_expended,
            } => WriteIntent::Update(systems::slots::toggle_expended(
                &entry_id,
                level,
                slot_index,
                currently_expended,
            )),
            SheetAction::SetSlotUses {
                entry_id,
                level,
                value,
            } => WriteIntent::Update(systems::slots::set_slot_uses(&entry_id, level, value)),
            SheetAction::SetSlotCapacity {
                entry_id,
                level,
                max,
            } => {
                let entry = expect_spellcasting_entry(actor, &entry_id)?;
                WriteIntent::Update(systems::slots::set_slot_capacity(entry, level, max))
            }
            SheetAction::CreateSpellcastingEntry {
                tradition,
                preparation,
            } => WriteIntent::Create(systems::spellcasting::new_spellcasting_entry(
                tradition,
                preparation,
                &self.config,
            )),
            SheetAction::RemoveSpellcastingEntry { entry_id } => WriteIntent::Delete(
                systems::spellcasting::remove_spellcasting_entry(actor, &entry_id)?,
            ),
            SheetAction::ToggleShowUnprepared { entry_id } => WriteIntent::Update(
                systems::spellcasting::toggle_show_unprepared(actor, &entry_id)?,
            ),
            SheetAction::ToggleDisplayLevel { entry_id, level } => WriteIntent::Update(
                systems::spellcasting::toggle_display_level(actor, &entry_id, level)?,
            ),
            SheetAction::ToggleSpellPrepared { spell_id } => WriteIntent::Update(
                systems::spellcasting::toggle_spell_prepared(actor, &spell_id)?,
            ),
            SheetAction::CreateSpell { entry_id, level } => {
                let (reveal, spell) = systems::spellcasting::new_spell(actor, &entry_id, level)?;
                return Ok(vec![WriteIntent::Update(reveal), WriteIntent::Create(spell)]);
            }
            SheetAction::SetSpellcastingAbility { entry_id, ability } => WriteIntent::Update(
                systems::spellcasting::set_spellcasting_ability(actor, &entry_id, &ability)?,
            ),
            SheetAction::SetFocusPool { entry_id, pool } => WriteIntent::Update(
                systems::spellcasting::set_focus_pool(actor, &entry_id, pool)?,
            ),
            SheetAction::Drop { payload, target } => match resolve_drop(actor, &payload, &target)? {
                DropOutcome::Write(intent) => intent,
                DropOutcome::Unhandled => return Ok(Vec::new()),
            },
        };
        Ok(vec![intent])
    }

    fn apply(&mut self, intent: WriteIntent) -> Result<SheetResponse, SheetError> {
        match intent {
            WriteIntent::Update(update) => {
                self.store.update_item(update)?;
                Ok(SheetResponse::Updated)
            }
            WriteIntent::Create(item) => self.store.create_item(item).map(SheetResponse::Created),
            WriteIntent::Delete(ids) => {
                self.store.delete_items(&ids)?;
                Ok(SheetResponse::Deleted(ids))
            }
            WriteIntent::Import { pack, id, location } => self
                .store
                .import_item(pack.as_deref(), &id, &location)
                .map(SheetResponse::Created),
        }
    }
}

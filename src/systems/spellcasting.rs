use tracing::{debug, info};

use crate::{
    components::{
        actor::{ActorDocument, ItemDocument, ItemKind},
        id::ItemId,
        spells::{
            spell::Spell,
            spellcasting_entry::{PreparationStyle, SpellcastingEntry, Tradition},
        },
        update::{ItemChange, ItemUpdate, NewItem},
    },
    config::SpellbookConfig,
    engine::error::SheetError,
};

/// Preparation style a tradition forces on a new entry. Traditions that let
/// the player choose return `None`.
pub fn forced_preparation(tradition: Tradition) -> Option<Option<PreparationStyle>> {
    match tradition {
        Tradition::Ritual | Tradition::Focus | Tradition::Scroll => Some(None),
        Tradition::Wand => Some(Some(PreparationStyle::Prepared)),
        Tradition::Arcane | Tradition::Divine | Tradition::Occult | Tradition::Primal => None,
    }
}

pub fn spellcasting_entry_name(
    tradition: Tradition,
    preparation: Option<PreparationStyle>,
    config: &SpellbookConfig,
) -> String {
    let tradition_label = config.tradition_label(tradition);
    match tradition {
        Tradition::Ritual => format!("{}s", tradition_label),
        Tradition::Focus => format!("{} Spells", tradition_label),
        Tradition::Scroll | Tradition::Wand => tradition_label,
        _ => match preparation {
            Some(style) => format!("{} {} Spells", config.preparation_label(style), tradition_label),
            None => format!("{} Spells", tradition_label),
        },
    }
}

/// The item to create for a new spellcasting entry. `preparation` is the
/// player's choice and is overridden for traditions that fix it.
pub fn new_spellcasting_entry(
    tradition: Tradition,
    preparation: Option<PreparationStyle>,
    config: &SpellbookConfig,
) -> NewItem {
    let preparation = forced_preparation(tradition).unwrap_or(preparation);
    let name = spellcasting_entry_name(tradition, preparation, config);
    debug!("Creating spellcasting entry {}", name);
    NewItem::SpellcastingEntry {
        name,
        tradition,
        preparation,
    }
}

pub fn expect_spellcasting_entry<'a>(
    actor: &'a ActorDocument,
    entry_id: &ItemId,
) -> Result<&'a SpellcastingEntry, SheetError> {
    let item = actor
        .item(entry_id)
        .ok_or_else(|| SheetError::ItemNotFound(entry_id.clone()))?;
    item.as_spellcasting_entry().ok_or_else(|| wrong_kind(item, ItemKind::SpellcastingEntry))
}

pub fn expect_spell<'a>(actor: &'a ActorDocument, spell_id: &ItemId) -> Result<&'a Spell, SheetError> {
    let item = actor
        .item(spell_id)
        .ok_or_else(|| SheetError::ItemNotFound(spell_id.clone()))?;
    item.as_spell().ok_or_else(|| wrong_kind(item, ItemKind::Spell))
}

fn wrong_kind(item: &ItemDocument, expected: ItemKind) -> SheetError {
    SheetError::WrongItemKind {
        item_id: item.id().clone(),
        expected,
        found: item.kind(),
    }
}

/// Ids to delete when removing an entry: every spell located in it, then the
/// entry itself.
pub fn remove_spellcasting_entry(
    actor: &ActorDocument,
    entry_id: &ItemId,
) -> Result<Vec<ItemId>, SheetError> {
    let entry = expect_spellcasting_entry(actor, entry_id)?;
    let mut ids: Vec<ItemId> = actor
        .spells_in(entry_id)
        .map(|spell| spell.id().clone())
        .collect();
    info!(
        "Deleting spellcasting entry {} with {} spell(s)",
        entry.name(),
        ids.len()
    );
    ids.push(entry_id.clone());
    Ok(ids)
}

pub fn toggle_show_unprepared(
    actor: &ActorDocument,
    entry_id: &ItemId,
) -> Result<ItemUpdate, SheetError> {
    let entry = expect_spellcasting_entry(actor, entry_id)?;
    Ok(ItemUpdate::new(
        entry_id.clone(),
        ItemChange::ShowUnpreparedSpells(!entry.shows_unprepared_spells()),
    ))
}

/// Flips the stored display flag of `level` and writes the whole map back.
///
/// A level that was never toggled has no stored flag and flips to `true`, so
/// the first toggle of a shown level keeps it shown.
pub fn toggle_display_level(
    actor: &ActorDocument,
    entry_id: &ItemId,
    level: u8,
) -> Result<ItemUpdate, SheetError> {
    let entry = expect_spellcasting_entry(actor, entry_id)?;
    let mut display_levels = entry.display_levels().clone();
    let stored = display_levels.get(&level).copied().unwrap_or(false);
    display_levels.insert(level, !stored);
    Ok(ItemUpdate::new(
        entry_id.clone(),
        ItemChange::DisplayLevels(display_levels),
    ))
}

/// Flips a spell's own prepared flag. Anything that isn't a spell has no such
/// flag and is rejected.
pub fn toggle_spell_prepared(
    actor: &ActorDocument,
    spell_id: &ItemId,
) -> Result<ItemUpdate, SheetError> {
    let spell = expect_spell(actor, spell_id)?;
    Ok(ItemUpdate::new(
        spell_id.clone(),
        ItemChange::SpellPrepared(!spell.is_prepared()),
    ))
}

/// A blank spell of `level` located in the entry, along with the entry update
/// that makes sure the new spell is visible.
pub fn new_spell(
    actor: &ActorDocument,
    entry_id: &ItemId,
    level: u8,
) -> Result<(ItemUpdate, NewItem), SheetError> {
    expect_spellcasting_entry(actor, entry_id)?;
    let spell = Spell::new(ItemId::from_str(""), format!("New  Level {} Spell", level), level)
        .with_location(entry_id.clone());
    debug!("Creating a level {} spell in spellcasting entry {}", level, entry_id);
    Ok((
        ItemUpdate::new(entry_id.clone(), ItemChange::RevealLevel(level)),
        NewItem::Spell(spell),
    ))
}

pub fn set_spellcasting_ability(
    actor: &ActorDocument,
    entry_id: &ItemId,
    ability: &str,
) -> Result<ItemUpdate, SheetError> {
    expect_spellcasting_entry(actor, entry_id)?;
    Ok(ItemUpdate::new(
        entry_id.clone(),
        ItemChange::Ability(ability.to_string()),
    ))
}

/// Resizes the focus pool (capped at three) and caps the current points to it.
pub fn set_focus_pool(
    actor: &ActorDocument,
    entry_id: &ItemId,
    pool: u8,
) -> Result<ItemUpdate, SheetError> {
    let entry = expect_spellcasting_entry(actor, entry_id)?;
    Ok(ItemUpdate::new(
        entry_id.clone(),
        ItemChange::FocusPool(entry.focus().resized(pool)),
    ))
}

pub fn move_spell_to_entry(
    actor: &ActorDocument,
    spell_id: &ItemId,
    entry_id: &ItemId,
) -> Result<ItemUpdate, SheetError> {
    expect_spell(actor, spell_id)?;
    expect_spellcasting_entry(actor, entry_id)?;
    debug!("Moving spell {} to spellcasting entry {}", spell_id, entry_id);
    Ok(ItemUpdate::new(
        spell_id.clone(),
        ItemChange::SpellLocation(entry_id.clone()),
    ))
}

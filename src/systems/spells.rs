use tracing::{debug, warn};

use crate::{
    components::{
        actor::ActorDocument,
        spells::{
            spell::{MAX_SPELL_LEVEL, Spell},
            spellbook::{EntrySpellbook, PreparedSlot, SpellView, SpellbookView},
            spellcasting_entry::{SlotAssignment, SpellcastingEntry},
        },
    },
    config::SpellbookConfig,
};

/// Spell level a character of `character_level` can normally cast.
pub fn normal_highest_spell_level(character_level: u8) -> u8 {
    character_level.div_ceil(2)
}

/// Highest level the spellbook has to show for `spell`: its own level, any
/// higher slot it is prepared in, and whatever the character can cast, capped
/// at [`MAX_SPELL_LEVEL`].
pub fn max_level_to_show(entry: &SpellcastingEntry, spell: &Spell, character_level: u8) -> u8 {
    let spell_level = spell.bucket_level();
    let highest_slot_prepared = entry
        .highest_slot_holding(spell.id())
        .unwrap_or(spell_level);
    spell_level
        .max(highest_slot_prepared)
        .max(normal_highest_spell_level(character_level))
        .min(MAX_SPELL_LEVEL)
}

/// Every level the spellbook must contain once `spell` is placed, highest first.
///
/// Level-based traditions sweep down to cantrips so the caster always sees the
/// slots ahead of their prepared spells. The other traditions only get the
/// spell's own level.
pub fn levels_to_show(entry: &SpellcastingEntry, spell: &Spell, character_level: u8) -> Vec<u8> {
    let spell_level = spell.bucket_level();
    if !entry.is_level_based() {
        return vec![spell_level];
    }
    (0..=max_level_to_show(entry, spell, character_level))
        .rev()
        .collect()
}

/// Places `spell` in `spellbook`, creating whatever levels it needs on the way.
pub fn prepare_spell(
    spellbook: &mut SpellbookView,
    entry: &SpellcastingEntry,
    spell: &Spell,
    character_level: u8,
    config: &SpellbookConfig,
) {
    for level in levels_to_show(entry, spell, character_level) {
        spellbook.level_or_insert(level, entry, config);
    }
    spellbook
        .level_or_insert(spell.bucket_level(), entry, config)
        .spells
        .push(SpellView::new(spell, config));
}

/// Resolves slot `index` of `level` against the actor's items. Dangling
/// references come back as the empty placeholder.
pub fn resolve_slot(
    actor: &ActorDocument,
    entry: &SpellcastingEntry,
    level: u8,
    index: usize,
    config: &SpellbookConfig,
) -> PreparedSlot {
    let assignment = entry
        .slot_group(level)
        .and_then(|group| group.slot(index))
        .cloned()
        .unwrap_or_default();

    match assignment {
        SlotAssignment::Empty => PreparedSlot::empty(config),
        SlotAssignment::Occupied { id, expended } => match actor.spell(&id) {
            Some(spell) => PreparedSlot::Spell {
                spell: SpellView::new(spell, config),
                expended,
            },
            None => {
                debug!(
                    "Slot {} at level {} of {} points at missing spell {}; showing it as empty",
                    index,
                    level,
                    entry.id(),
                    id
                );
                PreparedSlot::empty(config)
            }
        },
    }
}

/// Fills `prepared` for every level with slots. Slot order is positional and
/// left exactly as stored.
pub fn prepare_slots(
    spellbook: &mut SpellbookView,
    actor: &ActorDocument,
    entry: &SpellcastingEntry,
    config: &SpellbookConfig,
) {
    for (level, bucket) in spellbook.levels_mut() {
        bucket.prepared = (0..bucket.slots as usize)
            .map(|index| resolve_slot(actor, entry, *level, index, config))
            .collect();
    }
}

/// The spellbook of one entry, built from the spells located in it.
pub fn build_spellbook(
    actor: &ActorDocument,
    entry: &SpellcastingEntry,
    config: &SpellbookConfig,
) -> SpellbookView {
    let mut spellbook = SpellbookView::new();
    for spell in actor.spells_in(entry.id()) {
        prepare_spell(&mut spellbook, entry, spell, actor.level(), config);
    }
    if entry.is_prepared_caster() {
        prepare_slots(&mut spellbook, actor, entry, config);
    }
    spellbook
}

/// Spellbooks for every entry of the actor, in item order. Spells that don't
/// point at an existing entry are left out.
pub fn build_actor_spellbooks(
    actor: &ActorDocument,
    config: &SpellbookConfig,
) -> Vec<EntrySpellbook> {
    for spell in actor.spells() {
        let resolved = spell
            .location()
            .and_then(|location| actor.spellcasting_entry(location));
        if resolved.is_none() {
            warn!(
                "Spellcasting entry not found for spell {} ({}), leaving it out of the spellbook",
                spell.name(),
                spell.id()
            );
        }
    }

    actor
        .spellcasting_entries()
        .map(|entry| EntrySpellbook::new(entry, build_spellbook(actor, entry, config)))
        .collect()
}

pub mod spells {
    use serde_json::json;

    use crate::components::{
        id::ItemId,
        spells::spell::{MagicSchool, Spell},
    };

    pub fn fireball(location: &str) -> Spell {
        Spell::new(ItemId::from_str("fireball"), "Fireball", 3)
            .with_school(MagicSchool::Evocation)
            .with_location(ItemId::from_str(location))
    }

    pub fn magic_missile(location: &str) -> Spell {
        Spell::new(ItemId::from_str("magic-missile"), "Magic Missile", 1)
            .with_school(MagicSchool::Evocation)
            .with_location(ItemId::from_str(location))
    }

    pub fn shield(location: &str) -> Spell {
        Spell::new(ItemId::from_str("shield"), "Shield", 0)
            .with_school(MagicSchool::Abjuration)
            .with_location(ItemId::from_str(location))
    }

    pub fn heal(location: &str) -> Spell {
        Spell::new(ItemId::from_str("heal"), "Heal", 1)
            .with_school(MagicSchool::Necromancy)
            .with_location(ItemId::from_str(location))
    }

    /// A spell as the host stores it, with its level given as text.
    pub fn from_host(id: &str, level: &str, location: &str) -> Spell {
        serde_json::from_value(json!({
            "_id": id,
            "name": id,
            "type": "spell",
            "data": {
                "level": { "value": level },
                "location": { "value": location }
            }
        }))
        .unwrap()
    }
}

pub mod entries {
    use crate::components::{
        id::ItemId,
        spells::spellcasting_entry::{
            PreparationStyle, SlotAssignment, SlotGroup, SpellcastingEntry, Tradition,
        },
    };

    pub fn prepared_arcane() -> SpellcastingEntry {
        SpellcastingEntry::new(
            ItemId::from_str("e1"),
            "Prepared Arcane Spells",
            Tradition::Arcane,
            Some(PreparationStyle::Prepared),
        )
        .with_slots(0, SlotGroup::new(0, 5))
        .with_slots(
            1,
            SlotGroup::new(1, 2).with_prepared(vec![
                SlotAssignment::occupied(ItemId::from_str("fireball")),
                SlotAssignment::Empty,
            ]),
        )
        .with_slots(2, SlotGroup::new(0, 2))
        .with_slots(3, SlotGroup::new(0, 1))
    }

    pub fn spontaneous_divine() -> SpellcastingEntry {
        SpellcastingEntry::new(
            ItemId::from_str("e2"),
            "Spontaneous Divine Spells",
            Tradition::Divine,
            Some(PreparationStyle::Spontaneous),
        )
        .with_slots(1, SlotGroup::new(2, 3))
    }

    pub fn with_tradition(id: &str, tradition: Tradition) -> SpellcastingEntry {
        SpellcastingEntry::new(ItemId::from_str(id), tradition.to_string(), tradition, None)
    }
}

pub mod actors {
    use serde_json::json;

    use crate::components::{
        actor::{ActorDocument, ItemDocument},
        id::ActorId,
    };

    use super::{entries, spells};

    /// Level 5 wizard with a prepared arcane entry (`e1`) holding Fireball,
    /// Magic Missile and Shield, and a spontaneous divine entry (`e2`)
    /// holding Heal.
    pub fn wizard() -> ActorDocument {
        ActorDocument::new(ActorId::from_str("wizard"), "Ezren", 5)
            .with_item(ItemDocument::SpellcastingEntry(entries::prepared_arcane()))
            .with_item(ItemDocument::SpellcastingEntry(entries::spontaneous_divine()))
            .with_item(ItemDocument::Spell(spells::fireball("e1")))
            .with_item(ItemDocument::Spell(spells::magic_missile("e1")))
            .with_item(ItemDocument::Spell(spells::shield("e1")))
            .with_item(ItemDocument::Spell(spells::heal("e2")))
    }

    /// The same kind of actor as the host hands it over, including a few of
    /// the quirks of stored data: counts as text, `prepared` as an
    /// index-keyed object and a slot pointing at a deleted spell.
    pub fn wizard_from_host() -> ActorDocument {
        serde_json::from_value(json!({
            "_id": "wizard",
            "name": "Ezren",
            "type": "character",
            "data": { "details": { "level": { "value": "5" } } },
            "items": [
                {
                    "_id": "e1",
                    "name": "Prepared Arcane Spells",
                    "type": "spellcastingEntry",
                    "data": {
                        "ability": { "value": "int" },
                        "tradition": { "value": "arcane" },
                        "prepared": { "value": "prepared" },
                        "showUnpreparedSpells": { "value": true },
                        "slots": {
                            "slot1": {
                                "value": "1",
                                "max": "2",
                                "prepared": {
                                    "0": { "id": "fireball", "expended": false },
                                    "1": { "id": null, "name": "Empty Slot (drag spell here)", "prepared": false }
                                }
                            },
                            "slot3": {
                                "value": 0,
                                "max": "nonsense",
                                "prepared": [{ "id": "deleted-spell" }]
                            }
                        }
                    }
                },
                {
                    "_id": "fireball",
                    "name": "Fireball",
                    "type": "spell",
                    "data": {
                        "level": { "value": 3 },
                        "school": { "value": "evocation" },
                        "location": { "value": "e1" }
                    }
                },
                {
                    "_id": "orphan",
                    "name": "Orphaned Spell",
                    "type": "spell",
                    "data": { "level": { "value": 1 }, "location": { "value": "missing-entry" } }
                },
                { "_id": "staff", "name": "Staff", "type": "weapon", "data": {} }
            ]
        }))
        .unwrap()
    }

    /// Stored data with malformed parts: a `null` slot group, a numeric tradition, an entry whose `data` is
    /// text, a spell level that isn't a number and an item without an id.
    pub fn wizard_with_malformed_entries() -> ActorDocument {
        serde_json::from_value(json!({
            "_id": "wizard",
            "name": "Ezren",
            "data": { "details": { "level": { "value": 5 } } },
            "items": [
                {
                    "_id": "e1",
                    "name": "Prepared Spells",
                    "type": "spellcastingEntry",
                    "data": {
                        "tradition": { "value": 12 },
                        "prepared": { "value": "prepared" },
                        "slots": {
                            "slot1": null,
                            "slot2": { "value": "1", "max": 2, "prepared": [{ "id": "fireball" }] }
                        }
                    }
                },
                { "_id": "e2", "name": "Mystery Spells", "type": "spellcastingEntry", "data": "corrupted" },
                {
                    "_id": "fireball",
                    "name": "Fireball",
                    "type": "spell",
                    "data": { "level": { "value": 3 }, "location": { "value": "e1" } }
                },
                {
                    "_id": "mystery",
                    "name": "Mystery",
                    "type": "spell",
                    "data": { "level": { "value": "3rd" }, "location": { "value": "e2" } }
                },
                { "name": "No Id", "type": "spell", "data": {} }
            ]
        }))
        .unwrap()
    }
}

extern crate pf2e_spellbook;

mod tests {
    use pf2e_spellbook::{
        components::{
            actor::{ActorDocument, ItemDocument},
            id::{ActorId, ItemId},
            spells::{
                spell::Spell,
                spellbook::{EntrySpellbook, PreparedSlot},
                spellcasting_entry::Tradition,
            },
        },
        config::SpellbookConfig,
        systems::spells::{build_actor_spellbooks, build_spellbook},
        test_utils::{fixtures, init_tracing},
    };
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn config() -> SpellbookConfig {
        init_tracing();
        SpellbookConfig::default()
    }

    fn entry_book<'a>(books: &'a [EntrySpellbook], entry_id: &str) -> &'a EntrySpellbook {
        books
            .iter()
            .find(|book| book.entry_id == ItemId::from_str(entry_id))
            .unwrap()
    }

    fn levels(book: &EntrySpellbook) -> Vec<u8> {
        book.spellbook.levels().keys().copied().collect()
    }

    #[rstest]
    fn prepared_slots_resolve_in_order(config: SpellbookConfig) {
        let actor = fixtures::actors::wizard();
        let books = build_actor_spellbooks(&actor, &config);
        let level_one = entry_book(&books, "e1").spellbook.level(1).unwrap();

        assert_eq!(level_one.slots, 2);
        assert_eq!(level_one.prepared.len(), 2);
        assert_eq!(level_one.prepared[0].id(), Some(&ItemId::from_str("fireball")));
        assert!(!level_one.prepared[0].is_expended());
        assert_eq!(level_one.prepared[1], PreparedSlot::empty(&config));

        assert_eq!(
            serde_json::to_value(&level_one.prepared).unwrap(),
            json!([
                {
                    "id": "fireball",
                    "name": "Fireball",
                    "level": 3,
                    "school": "evocation",
                    "schoolLabel": "Evocation",
                    "expended": false,
                    "prepared": true
                },
                { "id": null, "name": "Empty Slot (drag spell here)", "prepared": false }
            ])
        );
    }

    #[rstest]
    fn level_based_entry_shows_levels_up_to_what_the_character_can_cast(config: SpellbookConfig) {
        let actor = fixtures::actors::wizard();
        let books = build_actor_spellbooks(&actor, &config);
        let book = entry_book(&books, "e1");

        assert_eq!(levels(book), vec![0, 1, 2, 3]);

        let level_two = book.spellbook.level(2).unwrap();
        assert!(level_two.spells.is_empty());
        assert_eq!((level_two.uses, level_two.slots), (0, 2));
        assert_eq!(level_two.prepared.len(), 2);
        assert!(level_two.prepared.iter().all(PreparedSlot::is_empty));

        let level_one = book.spellbook.level(1).unwrap();
        assert_eq!((level_one.uses, level_one.slots), (1, 2));

        assert_eq!(book.spellbook.level(3).unwrap().spells[0].name, "Fireball");
        assert!(book.spellbook.level(0).unwrap().is_cantrip);
        assert_eq!(book.spellbook.level(0).unwrap().spells[0].name, "Shield");
    }

    #[rstest]
    fn unprepared_label_depends_on_tradition_and_preparation(config: SpellbookConfig) {
        let actor = fixtures::actors::wizard();
        let books = build_actor_spellbooks(&actor, &config);

        let arcane = entry_book(&books, "e1").spellbook.level(1).unwrap();
        assert_eq!(arcane.unprepared_spells_label, "Show Spellbook");
        let divine = entry_book(&books, "e2").spellbook.level(1).unwrap();
        assert_eq!(divine.unprepared_spells_label, "Show Unprepared Spells");
    }

    #[rstest]
    fn spontaneous_entries_have_no_resolved_slots(config: SpellbookConfig) {
        let actor = fixtures::actors::wizard();
        let books = build_actor_spellbooks(&actor, &config);
        let book = entry_book(&books, "e2");

        assert_eq!(levels(book), vec![0, 1, 2, 3]);
        let level_one = book.spellbook.level(1).unwrap();
        assert_eq!((level_one.uses, level_one.slots), (2, 3));
        assert!(level_one.prepared.is_empty());
    }

    #[rstest]
    #[case(Tradition::Wand)]
    #[case(Tradition::Scroll)]
    #[case(Tradition::Ritual)]
    #[case(Tradition::Focus)]
    fn non_level_traditions_show_only_resident_levels(
        config: SpellbookConfig,
        #[case] tradition: Tradition,
    ) {
        let entry = fixtures::entries::with_tradition("special", tradition);
        let actor = ActorDocument::new(ActorId::from_str("a1"), "Kyra", 20)
            .with_item(ItemDocument::SpellcastingEntry(entry.clone()))
            .with_item(ItemDocument::Spell(fixtures::spells::from_host("a", "2", "special")))
            .with_item(ItemDocument::Spell(fixtures::spells::from_host("b", "4", "special")))
            .with_item(ItemDocument::Spell(fixtures::spells::from_host("c", "4", "special")));

        let spellbook = build_spellbook(&actor, &entry, &config);
        assert_eq!(spellbook.levels().keys().copied().collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(spellbook.level(4).unwrap().spells.len(), 2);
    }

    #[rstest]
    #[case(1, "1", vec![0, 1])]
    #[case(20, "1", (0..=10).collect())]
    #[case(1, "15", (0..=10).collect())]
    #[case(6, "0", vec![0, 1, 2, 3])]
    fn shown_levels_never_exceed_ten(
        config: SpellbookConfig,
        #[case] character_level: u8,
        #[case] spell_level: &str,
        #[case] expected: Vec<u8>,
    ) {
        let entry = fixtures::entries::with_tradition("e1", Tradition::Primal);
        let actor = ActorDocument::new(ActorId::from_str("a1"), "Lini", character_level)
            .with_item(ItemDocument::SpellcastingEntry(entry.clone()))
            .with_item(ItemDocument::Spell(fixtures::spells::from_host("s", spell_level, "e1")));

        let spellbook = build_spellbook(&actor, &entry, &config);
        assert_eq!(spellbook.levels().keys().copied().collect::<Vec<_>>(), expected);
        assert!(spellbook.max_level() <= Some(10));
    }

    #[rstest]
    fn spell_prepared_in_a_higher_slot_extends_the_range(config: SpellbookConfig) {
        let mut entry = fixtures::entries::prepared_arcane();
        entry
            .slot_group_mut(7)
            .assign(0, ItemId::from_str("magic-missile"));
        let actor = ActorDocument::new(ActorId::from_str("a1"), "Ezren", 1)
            .with_item(ItemDocument::SpellcastingEntry(entry.clone()))
            .with_item(ItemDocument::Spell(fixtures::spells::magic_missile("e1")));

        let spellbook = build_spellbook(&actor, &entry, &config);
        assert_eq!(spellbook.max_level(), Some(7));
        assert!((0..=7).all(|level| spellbook.contains_level(level)));
    }

    #[rstest]
    fn host_data_quirks_degrade_gracefully(config: SpellbookConfig) {
        let actor = fixtures::actors::wizard_from_host();
        let books = build_actor_spellbooks(&actor, &config);

        assert_eq!(books.len(), 1);
        let book = &books[0];
        assert_eq!(book.ability, "int");
        assert_eq!(levels(book), vec![0, 1, 2, 3]);

        let level_one = book.spellbook.level(1).unwrap();
        assert_eq!((level_one.uses, level_one.slots), (1, 2));
        assert_eq!(level_one.prepared[0].id(), Some(&ItemId::from_str("fireball")));
        assert!(level_one.prepared[1].is_empty());

        // Unparsable capacity reads as zero, so the dangling slot is never shown.
        let level_three = book.spellbook.level(3).unwrap();
        assert_eq!(level_three.slots, 0);
        assert!(level_three.prepared.is_empty());

        let shown: Vec<&str> = book
            .spellbook
            .levels()
            .values()
            .flat_map(|level| level.spells.iter().map(|spell| spell.name.as_str()))
            .collect();
        assert_eq!(shown, vec!["Fireball"]);
    }

    #[rstest]
    fn malformed_entries_still_render(config: SpellbookConfig) {
        let actor = fixtures::actors::wizard_with_malformed_entries();
        assert_eq!(actor.items().len(), 4);

        let books = build_actor_spellbooks(&actor, &config);
        assert_eq!(books.len(), 2);

        let prepared = entry_book(&books, "e1");
        assert_eq!(levels(prepared), vec![0, 1, 2, 3]);
        let level_one = prepared.spellbook.level(1).unwrap();
        assert_eq!((level_one.uses, level_one.slots), (0, 0));
        assert!(level_one.prepared.is_empty());
        let level_two = prepared.spellbook.level(2).unwrap();
        assert_eq!((level_two.uses, level_two.slots), (1, 2));
        assert_eq!(level_two.prepared[0].id(), Some(&ItemId::from_str("fireball")));
        assert!(level_two.prepared[1].is_empty());

        let corrupted = entry_book(&books, "e2");
        assert_eq!(levels(corrupted), (0..=10).collect::<Vec<_>>());
        assert_eq!(corrupted.spellbook.level(10).unwrap().spells[0].name, "Mystery");
        assert!(corrupted.spellbook.levels().values().all(|level| level.prepared.is_empty()));
    }

    #[rstest]
    fn rebuilding_is_idempotent(config: SpellbookConfig) {
        let actor = fixtures::actors::wizard();
        assert_eq!(
            build_actor_spellbooks(&actor, &config),
            build_actor_spellbooks(&actor, &config)
        );
    }

    #[rstest]
    fn spell_levels_above_ten_are_bucketed_at_ten(config: SpellbookConfig) {
        let entry = fixtures::entries::with_tradition("e1", Tradition::Wand);
        let spell: Spell = fixtures::spells::from_host("big", "12", "e1");
        let actor = ActorDocument::new(ActorId::from_str("a1"), "Kyra", 1)
            .with_item(ItemDocument::SpellcastingEntry(entry.clone()))
            .with_item(ItemDocument::Spell(spell));

        let spellbook = build_spellbook(&actor, &entry, &config);
        assert_eq!(spellbook.levels().keys().copied().collect::<Vec<_>>(), vec![10]);
    }
}

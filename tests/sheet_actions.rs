extern crate pf2e_spellbook;

mod tests {
    use pf2e_spellbook::{
        components::{
            actor::ItemDocument,
            drag::DragPayload,
            id::{ActorId, ItemId},
            spells::{
                spell::Spell,
                spellcasting_entry::{FocusPool, PreparationStyle, SpellcastingEntry, Tradition},
            },
        },
        config::SpellbookConfig,
        engine::{
            drop::DropTarget,
            error::SheetError,
            sheet::{SheetAction, SheetResponse, SpellbookSheet},
            store::{DocumentStore, InMemoryDocumentStore},
        },
        test_utils::{fixtures, init_tracing},
    };
    use rstest::{fixture, rstest};

    #[fixture]
    fn sheet() -> SpellbookSheet<InMemoryDocumentStore> {
        init_tracing();
        let store = InMemoryDocumentStore::new(fixtures::actors::wizard())
            .with_library_item(
                Some("pf2e.spells-srd"),
                ItemDocument::Spell(Spell::new(ItemId::from_str("grease"), "Grease", 1)),
            )
            .with_library_item(
                None,
                ItemDocument::Spell(Spell::new(ItemId::from_str("light"), "Light", 0)),
            );
        SpellbookSheet::new(store, SpellbookConfig::default())
    }

    fn e1() -> ItemId {
        ItemId::from_str("e1")
    }

    fn slot(level: u8, slot_index: usize) -> DropTarget {
        DropTarget::SpellSlot {
            entry_id: e1(),
            level,
            slot_index,
        }
    }

    fn prepared_ids(sheet: &SpellbookSheet<InMemoryDocumentStore>, level: u8) -> Vec<Option<String>> {
        sheet
            .render()
            .into_iter()
            .find(|book| book.entry_id == e1())
            .and_then(|book| book.spellbook.level(level).cloned())
            .map(|level| {
                level
                    .prepared
                    .iter()
                    .map(|slot| slot.id().map(ToString::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[rstest]
    fn dragging_own_spell_onto_slot_prepares_it(mut sheet: SpellbookSheet<InMemoryDocumentStore>) {
        let magic_missile = sheet
            .store()
            .actor()
            .item(&ItemId::from_str("magic-missile"))
            .cloned()
            .unwrap();
        let payload = DragPayload::for_owned_item(ActorId::from_str("wizard"), &magic_missile).unwrap();
        let transfer = payload.to_transfer().unwrap();

        let response = sheet
            .handle(SheetAction::Drop {
                payload: DragPayload::from_transfer(&transfer).unwrap(),
                target: slot(2, 1),
            })
            .unwrap();

        assert_eq!(response, SheetResponse::Updated);
        assert_eq!(
            prepared_ids(&sheet, 2),
            vec![None, Some("magic-missile".to_string())]
        );
    }

    #[rstest]
    fn clear_and_expend_through_actions(mut sheet: SpellbookSheet<InMemoryDocumentStore>) {
        sheet
            .handle(SheetAction::toggle_expended(e1(), 1, 0, Some("false")))
            .unwrap();
        let level_one = sheet.render()[0].spellbook.level(1).cloned().unwrap();
        assert!(level_one.prepared[0].is_expended());

        sheet
            .handle(SheetAction::ClearSlot {
                entry_id: e1(),
                level: 1,
                slot_index: 0,
            })
            .unwrap();
        assert_eq!(prepared_ids(&sheet, 1), vec![None, None]);
    }

    #[rstest]
    fn spell_from_another_actor_is_copied(mut sheet: SpellbookSheet<InMemoryDocumentStore>) {
        let payload = DragPayload::for_owned_item(
            ActorId::from_str("cleric"),
            &ItemDocument::Spell(Spell::new(ItemId::from_str("bless"), "Bless", 1)),
        )
        .unwrap();

        let response = sheet
            .handle(SheetAction::Drop {
                payload,
                target: DropTarget::SpellcastingEntry { entry_id: e1() },
            })
            .unwrap();

        let SheetResponse::Created(id) = response else {
            panic!("expected a created spell, got {:?}", response);
        };
        assert_ne!(id, ItemId::from_str("bless"));
        let copy = sheet.store().actor().spell(&id).unwrap();
        assert_eq!(copy.name(), "Bless");
        assert_eq!(copy.location(), Some(&e1()));
    }

    #[rstest]
    fn compendium_drop_imports_into_the_entry(mut sheet: SpellbookSheet<InMemoryDocumentStore>) {
        let payload = DragPayload::from_transfer(
            r#"{ "type": "Item", "pack": "pf2e.spells-srd", "id": "grease" }"#,
        )
        .unwrap();

        let response = sheet
            .handle(SheetAction::Drop {
                payload,
                target: slot(1, 1),
            })
            .unwrap();

        let SheetResponse::Created(id) = response else {
            panic!("expected an imported spell, got {:?}", response);
        };
        assert_eq!(
            sheet.store().actor().spell(&id).and_then(Spell::location),
            Some(&e1())
        );
    }

    #[rstest]
    fn sidebar_item_dropped_on_a_slot_lands_in_its_entry(
        mut sheet: SpellbookSheet<InMemoryDocumentStore>,
    ) {
        let payload = DragPayload::from_transfer(r#"{ "type": "Item", "id": "light" }"#).unwrap();
        let response = sheet
            .handle(SheetAction::Drop {
                payload,
                target: slot(1, 1),
            })
            .unwrap();

        let SheetResponse::Created(id) = response else {
            panic!("expected an imported spell, got {:?}", response);
        };
        let light = sheet.store().actor().spell(&id).unwrap();
        assert_eq!(light.name(), "Light");
        assert_eq!(light.location(), Some(&e1()));
        assert_eq!(prepared_ids(&sheet, 1), vec![Some("fireball".to_string()), None]);
    }

    #[rstest]
    fn unrelated_drops_fall_through(mut sheet: SpellbookSheet<InMemoryDocumentStore>) {
        let payload = DragPayload::from_transfer(r#"{ "type": "Actor", "id": "goblin" }"#).unwrap();
        let response = sheet
            .handle(SheetAction::Drop {
                payload,
                target: slot(1, 0),
            })
            .unwrap();
        assert_eq!(response, SheetResponse::Unhandled);
    }

    #[rstest]
    fn entry_lifecycle(mut sheet: SpellbookSheet<InMemoryDocumentStore>) {
        let SheetResponse::Created(ritual_id) = sheet
            .handle(SheetAction::CreateSpellcastingEntry {
                tradition: Tradition::Ritual,
                preparation: Some(PreparationStyle::Prepared),
            })
            .unwrap()
        else {
            panic!("expected a created entry");
        };
        let ritual = sheet.store().actor().spellcasting_entry(&ritual_id).unwrap();
        assert_eq!(ritual.name(), "Rituals");
        assert_eq!(ritual.preparation(), None);

        let response = sheet
            .handle(SheetAction::RemoveSpellcastingEntry { entry_id: e1() })
            .unwrap();
        assert!(matches!(response, SheetResponse::Deleted(ids) if ids.len() == 4));
        assert_eq!(sheet.render().len(), 2);
    }

    #[rstest]
    fn created_spell_opens_its_level(mut sheet: SpellbookSheet<InMemoryDocumentStore>) {
        sheet
            .handle(SheetAction::ToggleShowUnprepared { entry_id: e1() })
            .unwrap();
        for _ in 0..2 {
            sheet
                .handle(SheetAction::ToggleDisplayLevel {
                    entry_id: e1(),
                    level: 2,
                })
                .unwrap();
        }
        let entry = sheet.store().actor().spellcasting_entry(&e1()).unwrap();
        assert!(!entry.shows_unprepared_spells());
        assert!(!entry.displays_level(2));

        let response = sheet
            .handle(SheetAction::CreateSpell {
                entry_id: e1(),
                level: 2,
            })
            .unwrap();
        let SheetResponse::Created(id) = response else {
            panic!("expected a created spell, got {:?}", response);
        };

        let spell = sheet.store().actor().spell(&id).unwrap();
        assert_eq!(spell.name(), "New  Level 2 Spell");
        assert_eq!(spell.location(), Some(&e1()));
        let entry = sheet.store().actor().spellcasting_entry(&e1()).unwrap();
        assert!(entry.shows_unprepared_spells());
        assert!(entry.displays_level(2));

        let level_two = sheet.render()[0].spellbook.level(2).cloned().unwrap();
        assert_eq!(level_two.spells[0].name, "New  Level 2 Spell");
        assert!(level_two.display_prepared);
    }

    #[rstest]
    fn create_spell_in_a_spell_fails(mut sheet: SpellbookSheet<InMemoryDocumentStore>) {
        let spells_before = sheet.store().actor().spells().count();
        let result = sheet.handle(SheetAction::CreateSpell {
            entry_id: ItemId::from_str("fireball"),
            level: 1,
        });
        assert!(matches!(result, Err(SheetError::WrongItemKind { .. })));
        assert_eq!(sheet.store().actor().spells().count(), spells_before);
    }

    #[rstest]
    fn ability_select_changes_the_entry(mut sheet: SpellbookSheet<InMemoryDocumentStore>) {
        assert_eq!(sheet.render()[0].ability, "int");
        sheet
            .handle(SheetAction::SetSpellcastingAbility {
                entry_id: e1(),
                ability: "wis".to_string(),
            })
            .unwrap();
        assert_eq!(sheet.render()[0].ability, "wis");
    }

    #[rstest]
    #[case(1, FocusPool { points: 1, pool: 1 })]
    #[case(2, FocusPool { points: 2, pool: 2 })]
    #[case(9, FocusPool { points: 2, pool: 3 })]
    fn focus_pool_is_clamped(#[case] pool: u8, #[case] expected: FocusPool) {
        let focus_id = ItemId::from_str("f1");
        let actor = fixtures::actors::wizard().with_item(ItemDocument::SpellcastingEntry(
            SpellcastingEntry::new(focus_id.clone(), "Focus Spells", Tradition::Focus, None)
                .with_focus(FocusPool { points: 2, pool: 3 }),
        ));
        let mut sheet =
            SpellbookSheet::new(InMemoryDocumentStore::new(actor), SpellbookConfig::default());

        let response = sheet
            .handle(SheetAction::SetFocusPool {
                entry_id: focus_id.clone(),
                pool,
            })
            .unwrap();

        assert_eq!(response, SheetResponse::Updated);
        assert_eq!(
            sheet
                .store()
                .actor()
                .spellcasting_entry(&focus_id)
                .map(SpellcastingEntry::focus),
            Some(expected)
        );
    }

    #[rstest]
    fn slot_actions_with_huge_indices_change_nothing(
        mut sheet: SpellbookSheet<InMemoryDocumentStore>,
    ) {
        let before = sheet.render();
        for slot_index in [usize::MAX, 1 << 40] {
            sheet
                .handle(SheetAction::AssignSlot {
                    entry_id: e1(),
                    level: 1,
                    slot_index,
                    spell_id: ItemId::from_str("magic-missile"),
                })
                .unwrap();
            sheet
                .handle(SheetAction::toggle_expended(e1(), 1, slot_index, None))
                .unwrap();
            sheet
                .handle(SheetAction::ClearSlot {
                    entry_id: e1(),
                    level: 1,
                    slot_index,
                })
                .unwrap();
        }
        assert_eq!(sheet.render(), before);
    }

    #[rstest]
    fn capacity_and_uses_actions(mut sheet: SpellbookSheet<InMemoryDocumentStore>) {
        sheet
            .handle(SheetAction::SetSlotCapacity {
                entry_id: e1(),
                level: 2,
                max: 3,
            })
            .unwrap();
        sheet
            .handle(SheetAction::SetSlotUses {
                entry_id: e1(),
                level: 2,
                value: 1,
            })
            .unwrap();

        let level_two = sheet.render()[0].spellbook.level(2).cloned().unwrap();
        assert_eq!((level_two.uses, level_two.slots), (1, 3));
        assert_eq!(level_two.prepared.len(), 3);
    }

    #[rstest]
    fn wrong_kind_actions_surface_errors(mut sheet: SpellbookSheet<InMemoryDocumentStore>) {
        let before = sheet.render();
        let result = sheet.handle(SheetAction::ToggleSpellPrepared { spell_id: e1() });
        assert!(matches!(result, Err(SheetError::WrongItemKind { .. })));

        let result = sheet.handle(SheetAction::ToggleDisplayLevel {
            entry_id: ItemId::from_str("missing"),
            level: 1,
        });
        assert_eq!(
            result,
            Err(SheetError::ItemNotFound(ItemId::from_str("missing")))
        );
        assert_eq!(sheet.render(), before);
    }

    #[rstest]
    fn rendered_view_serializes_for_templates(sheet: SpellbookSheet<InMemoryDocumentStore>) {
        let value = serde_json::to_value(sheet.render()).unwrap();
        let level_one = &value[0]["spellbook"]["1"];

        assert_eq!(value[0]["entryId"], "e1");
        assert_eq!(level_one["label"], "1st Level");
        assert_eq!(level_one["displayPrepared"], true);
        assert_eq!(level_one["unpreparedSpellsLabel"], "Show Spellbook");
        assert_eq!(level_one["prepared"][0]["prepared"], true);
        assert_eq!(level_one["prepared"][1]["name"], "Empty Slot (drag spell here)");
    }
}

use std::fmt;

use crate::components::{actor::ItemKind, id::ItemId};

/// Faults a sheet action can't recover from. Dangling references and bad
/// counts never end up here; they degrade while the spellbook is built.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetError {
    ItemNotFound(ItemId),
    /// The action only makes sense for another kind of item. This is a caller
    /// or schema mismatch, not bad data, so it is surfaced instead of ignored.
    WrongItemKind {
        item_id: ItemId,
        expected: ItemKind,
        found: String,
    },
    /// The store has nothing to import under this pack/id.
    ImportNotFound { pack: Option<String>, id: ItemId },
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetError::ItemNotFound(id) => write!(f, "item {} not found", id),
            SheetError::WrongItemKind {
                item_id,
                expected,
                found,
            } => write!(
                f,
                "item {} is a {}, expected a {}",
                item_id, found, expected
            ),
            SheetError::ImportNotFound { pack, id } => match pack {
                Some(pack) => write!(f, "item {} not found in pack {}", id, pack),
                None => write!(f, "item {} not found", id),
            },
        }
    }
}

impl std::error::Error for SheetError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_kind_message() {
        let err = SheetError::WrongItemKind {
            item_id: ItemId::from_str("sword"),
            expected: ItemKind::SpellcastingEntry,
            found: "weapon".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "item sword is a weapon, expected a spellcastingEntry"
        );
    }
}

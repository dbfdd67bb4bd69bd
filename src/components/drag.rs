use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::components::{
    actor::ItemDocument,
    id::{ActorId, ItemId},
    spells::spell::Spell,
};

/// Drag type of anything that is an item, owned or not.
pub const ITEM_DRAG_TYPE: &str = "Item";

/// What the sheet puts on the drag transfer as `text/plain` when an item is
/// picked up, and what arrives on a drop from anywhere else.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<ActorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    /// Compendium pack the item comes from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<String>,
}

#[derive(Debug)]
pub enum DragPayloadError {
    Parse(serde_json::Error),
}

impl fmt::Display for DragPayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragPayloadError::Parse(err) => write!(f, "malformed drag payload: {}", err),
        }
    }
}

impl std::error::Error for DragPayloadError {}

impl From<serde_json::Error> for DragPayloadError {
    fn from(err: serde_json::Error) -> Self {
        DragPayloadError::Parse(err)
    }
}

impl DragPayload {
    /// Payload for dragging one of `actor_id`'s own items off the sheet.
    pub fn for_owned_item(actor_id: ActorId, item: &ItemDocument) -> Result<Self, DragPayloadError> {
        Ok(Self {
            kind: ITEM_DRAG_TYPE.to_string(),
            data: Some(serde_json::to_value(item)?),
            actor_id: Some(actor_id),
            token_id: None,
            id: Some(item.id().clone()),
            pack: None,
        })
    }

    pub fn from_transfer(text: &str) -> Result<Self, DragPayloadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_transfer(&self) -> Result<String, DragPayloadError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_item(&self) -> bool {
        self.kind == ITEM_DRAG_TYPE
    }

    pub fn is_from_actor(&self, actor_id: &ActorId) -> bool {
        self.actor_id.as_ref() == Some(actor_id)
    }

    /// The dragged item as a document, if the payload carries one.
    pub fn item(&self) -> Option<Result<ItemDocument, DragPayloadError>> {
        self.data
            .clone()
            .map(|data| serde_json::from_value(data).map_err(DragPayloadError::from))
    }

    /// The dragged spell. Payloads without item data, items of another kind and
    /// malformed data all come back as `None`.
    pub fn spell(&self) -> Option<Spell> {
        match self.item()? {
            Ok(ItemDocument::Spell(spell)) => Some(spell),
            _ => None,
        }
    }
}

pub mod actor;
pub mod document;
pub mod drag;
pub mod id;
pub mod spells;
pub mod update;

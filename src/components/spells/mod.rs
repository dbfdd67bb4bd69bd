pub mod spell;
pub mod spellbook;
pub mod spellcasting_entry;

pub mod slots;
pub mod spellcasting;
pub mod spells;

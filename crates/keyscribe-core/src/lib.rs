pub mod abbreviation;
pub mod combo;
pub mod composer;
pub mod keymap;
pub mod settings;
pub mod text;

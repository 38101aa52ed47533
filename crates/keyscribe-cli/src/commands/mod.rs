pub mod abbreviation_ops;
pub mod config_ops;
pub mod keymap_ops;
pub mod replay_ops;

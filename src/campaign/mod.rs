pub mod battle;

pub use battle::{advance, apply_losses, is_terminal, run_campaign};

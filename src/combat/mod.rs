pub mod constants;
pub mod die;
pub mod resolution;

pub use die::Die;
pub use resolution::{compare_rolls, dice_counts, resolve_round};

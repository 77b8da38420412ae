use crate::*;
pub use random::*;

mod random;

/// Source of fresh boards. The engine asks for one at session start, on every level change and
/// whenever a round returns to idle.
pub trait BoardGenerator {
    fn generate(&mut self, level: Level) -> Board;
}

pub mod eviction;
pub mod key_index;
pub mod slot_arena;

pub use eviction::{min_run_start, select_min_element};
pub use key_index::KeyIndex;
pub use slot_arena::{SlotArena, SlotId};

//! Deterministic display ordering for frames and rolls.
//!
//! # Responsibility
//! - Turn a caller-selected sort mode into a total order.
//! - Parse free-form exposure strings into comparable numbers.
//!
//! # Invariants
//! - Sorting is pure: input records are cloned, never mutated.
//! - Every order ends with an id tie-break, so repeated calls on unchanged
//!   input return the same sequence.

pub mod exposure;
pub mod frames;
pub mod rolls;

pub use frames::{sort_frames, FrameSortMode};
pub use rolls::{sort_rolls, RollSortMode};

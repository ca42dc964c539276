//! Top-K store implementations.
//!
//! | Store        | Order maintenance        | Eviction at the floor         |
//! |--------------|--------------------------|-------------------------------|
//! | [`ArrayTopK`]| shift run, O(distance)   | uniform among tied minimums   |
//! | [`ListTopK`] | relink, O(nodes passed)  | node adjacent to the floor    |
//!
//! Both implement [`TopK`](crate::traits::TopK) and share one wire format.

pub mod array;
pub mod list;

pub use array::ArrayTopK;
pub use list::ListTopK;

//! Eviction victim selection over a descending count run.
//!
//! The minimum of a descending slice is its last element. When several
//! trailing slots share that floor count, the victim is drawn uniformly from
//! the whole tied run so that no key is favoured by insertion or hash order.
//!
//! ```text
//!   counts: [9, 7, 4, 2, 2, 2]
//!                     └──┴──┘  tied floor run = 3..=5
//!   victim: uniform over {3, 4, 5}
//! ```

use rand::Rng;

/// Returns the first slot of the trailing run of minimum counts.
///
/// `counts` must be sorted descending. Returns `None` for an empty slice.
pub fn min_run_start(counts: &[u64]) -> Option<usize> {
    let last = counts.len().checked_sub(1)?;
    let floor = counts[last];
    let mut position = last;
    while position > 0 && counts[position - 1] == floor {
        position -= 1;
    }
    Some(position)
}

/// Picks the slot to evict from a descending `counts` slice.
///
/// A run of length one is returned without consuming randomness, so seeded
/// sequences stay reproducible when no ties occur.
pub fn select_min_element<R: Rng + ?Sized>(counts: &[u64], rng: &mut R) -> Option<usize> {
    let start = min_run_start(counts)?;
    let last = counts.len() - 1;
    if start == last {
        Some(last)
    } else {
        Some(rng.random_range(start..=last))
    }
}

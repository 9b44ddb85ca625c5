//! Movement Distribution
//!
//! Splits a total displacement into a fixed number of integer sub-moves
//! whose sum is exactly the requested total. Used independently for the
//! vertical (recoil) and horizontal (bloom jitter) axes each active tick.

/// Distribute `total` pixels across `steps` sub-moves.
///
/// Each entry is `total` floor-divided by `steps`; the first
/// `total mod steps` entries carry one extra unit. Floor semantics
/// (`div_euclid`/`rem_euclid`) keep the remainder non-negative, so the
/// distribution is deterministic for negative totals as well:
/// `distribute(-7, 3) == [-2, -2, -3]`.
///
/// Returns an empty plan when `steps <= 0`.
pub fn distribute(total: i32, steps: i32) -> Vec<i32> {
    if steps <= 0 {
        return Vec::new();
    }

    let base = total.div_euclid(steps);
    let remainder = total.rem_euclid(steps);

    let mut moves = vec![base; steps as usize];
    for slot in moves.iter_mut().take(remainder as usize) {
        *slot += 1;
    }
    moves
}

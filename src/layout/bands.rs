//! Band and row placement helpers.
//!
//! A band is the set of nodes sharing one level. Crowded bands are split into
//! rows, and each row is spread horizontally in center-out order so the
//! densest part of the band sits near the middle of the canvas.

/// Center-out index sequence for a row of `n` items.
///
/// Slot `i` (left to right) holds item `center_out_order(n)[i]`:
/// `mid, mid+1, mid-1, mid+2, mid-2, …` with `mid = n / 2`, skipping indices
/// outside `0..n`.
pub fn center_out_order(n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }

    let mid = n / 2;
    let mut order = Vec::with_capacity(n);
    order.push(mid);

    let mut step = 1;
    while order.len() < n {
        if mid + step < n {
            order.push(mid + step);
        }
        if step <= mid {
            order.push(mid - step);
        }
        step += 1;
    }

    order
}

/// Evenly spaced slot x positions across `[center - spread, center + spread]`.
///
/// A single slot sits exactly at `center`.
pub fn slot_positions(n: usize, center_x: f32, spread: f32) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![center_x],
        _ => {
            let step = spread * 2.0 / (n - 1) as f32;
            (0..n).map(|i| center_x - spread + i as f32 * step).collect()
        }
    }
}

/// Split a band into at most `rows` contiguous chunks of `ceil(len / rows)`.
///
/// The first chunk is the bottom row.
pub fn split_rows<T>(items: &[T], rows: usize) -> Vec<&[T]> {
    if items.is_empty() {
        return Vec::new();
    }
    let rows = rows.clamp(1, items.len());
    let per_row = items.len().div_ceil(rows);
    items.chunks(per_row).collect()
}

/// Vertical offset of each row from the band's zone y.
///
/// Offsets are symmetric around zero. Row 0 gets the largest offset, i.e. it
/// is drawn lowest on the canvas (y grows downward).
pub fn row_offsets(rows: usize, gap: f32) -> Vec<f32> {
    let middle = rows.saturating_sub(1) as f32 / 2.0;
    (0..rows).map(|row| (middle - row as f32) * gap).collect()
}

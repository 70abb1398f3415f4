//! Slot lookup by bisection over the ordered draggable bands.

use crate::geometry::BeginEnd;

/// How a position inside a slot resolves to an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SlotBias {
    /// The slot's own index.
    Edge,
    /// Past the slot's midpoint resolves to the following index, so
    /// "insert before vs after" splits cleanly.
    Midpoint,
}

/// Finds the slot containing `pos` among `count` ordered bands supplied
/// by `bounds`. Returns `None` when the position falls outside every
/// band; an empty list appends at 0.
pub(crate) fn find_slot(
    count: usize,
    pos: f64,
    bias: SlotBias,
    bounds: impl Fn(usize) -> BeginEnd,
) -> Option<usize> {
    if count == 0 {
        return Some(0);
    }
    search(pos, 0, count, bias, &bounds)
}

/// Recursive bisection over the half-open index range `[start, end)`.
fn search(
    pos: f64,
    start: usize,
    end: usize,
    bias: SlotBias,
    bounds: &impl Fn(usize) -> BeginEnd,
) -> Option<usize> {
    if end - start == 1 {
        let band = bounds(start);
        if band.holds(pos) {
            return Some(resolve(start, pos, band, bias));
        }
        return None;
    }
    let middle = start + (end - start) / 2;
    // bands are begin-exclusive, so a position on the shared edge
    // belongs to the half ending there
    if pos <= bounds(middle).begin {
        search(pos, start, middle, bias, bounds)
    } else {
        search(pos, middle, end, bias, bounds)
    }
}

fn resolve(index: usize, pos: f64, band: BeginEnd, bias: SlotBias) -> usize {
    match bias {
        SlotBias::Edge => index,
        SlotBias::Midpoint => {
            if pos < band.midpoint() {
                index
            } else {
                index + 1
            }
        }
    }
}

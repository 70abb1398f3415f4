//! Scripted geometry oracle for tests.
//!
//! Items sit end to end from the container origin; measurements include
//! any translations applied through the oracle, mirroring how a real
//! host reports post-transform rectangles. The handle is cheaply
//! cloneable so a test can keep inspecting state it handed to the
//! engine.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{BeginEnd, Orientation, Point, Rect};
use crate::layout::Layout;

#[derive(Debug)]
struct SimState {
    orientation: Orientation,
    origin: f64,
    capture: Rect,
    sizes: Vec<f64>,
    translations: Vec<f64>,
    visibility: Vec<bool>,
    visible_size: f64,
    scroll_size: f64,
    scroll_value: f64,
    stretcher: Option<f64>,
    invalidations: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct SimLayout {
    state: Rc<RefCell<SimState>>,
}

// cross-axis extent of the default capture zone
const CROSS_EXTENT: f64 = 1000.0;

impl SimLayout {
    pub(crate) fn new(orientation: Orientation, sizes: &[f64]) -> Self {
        let total: f64 = sizes.iter().sum();
        let capture = match orientation {
            Orientation::Vertical => Rect::new(0.0, 0.0, CROSS_EXTENT, total),
            Orientation::Horizontal => Rect::new(0.0, 0.0, total, CROSS_EXTENT),
        };
        SimLayout {
            state: Rc::new(RefCell::new(SimState {
                orientation,
                origin: 0.0,
                capture,
                sizes: sizes.to_vec(),
                translations: vec![0.0; sizes.len()],
                visibility: vec![true; sizes.len()],
                visible_size: total,
                scroll_size: total,
                scroll_value: 0.0,
                stretcher: None,
                invalidations: 0,
            })),
        }
    }

    pub(crate) fn vertical(sizes: &[f64]) -> Self {
        Self::new(Orientation::Vertical, sizes)
    }

    pub(crate) fn with_visible_size(self, size: f64) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.visible_size = size;
            state.scroll_size = size;
            match state.orientation {
                Orientation::Vertical => state.capture.size.height = size,
                Orientation::Horizontal => state.capture.size.width = size,
            }
        }
        self
    }

    pub(crate) fn with_scroll(self, scroll_size: f64, scroll_value: f64) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.scroll_size = scroll_size;
            state.scroll_value = scroll_value;
        }
        self
    }

    /// Offsets where items start along the axis, for nesting scenarios.
    pub(crate) fn with_origin(self, origin: f64) -> Self {
        self.state.borrow_mut().origin = origin;
        self
    }

    /// Shifts the container along the axis, as a scroll or an outer
    /// reflow would. The capture zone is left alone.
    pub(crate) fn set_origin(&self, origin: f64) {
        self.state.borrow_mut().origin = origin;
    }

    /// Restricts the pointer capture zone, for nesting scenarios.
    pub(crate) fn with_capture(self, capture: Rect) -> Self {
        self.state.borrow_mut().capture = capture;
        self
    }

    /// Replaces the item list, as a host would after a splice. The
    /// container and capture zone grow or shrink with the new total.
    pub(crate) fn set_items(&self, sizes: &[f64]) {
        let mut state = self.state.borrow_mut();
        let total: f64 = sizes.iter().sum();
        state.sizes = sizes.to_vec();
        state.translations = vec![0.0; sizes.len()];
        state.visibility = vec![true; sizes.len()];
        state.visible_size = total;
        state.scroll_size = total;
        match state.orientation {
            Orientation::Vertical => state.capture.size.height = total,
            Orientation::Horizontal => state.capture.size.width = total,
        }
    }

    pub(crate) fn translation(&self, index: usize) -> f64 {
        self.state.borrow().translations[index]
    }

    pub(crate) fn is_visible(&self, index: usize) -> bool {
        self.state.borrow().visibility[index]
    }

    pub(crate) fn stretcher(&self) -> Option<f64> {
        self.state.borrow().stretcher
    }

    pub(crate) fn invalidations(&self) -> usize {
        self.state.borrow().invalidations
    }
}

impl Layout for SimLayout {
    fn item_count(&self) -> usize {
        self.state.borrow().sizes.len()
    }

    fn item_begin_end(&self, index: usize) -> BeginEnd {
        let state = self.state.borrow();
        let resting: f64 = state.origin + state.sizes[..index].iter().sum::<f64>();
        let begin = resting + state.translations[index];
        BeginEnd::new(begin, begin + state.sizes[index])
    }

    fn item_size(&self, index: usize) -> f64 {
        self.state.borrow().sizes[index]
    }

    fn container_begin_end(&self) -> BeginEnd {
        let state = self.state.borrow();
        BeginEnd::new(state.origin, state.origin + state.visible_size)
    }

    fn container_size(&self) -> f64 {
        self.state.borrow().visible_size
    }

    fn scroll_size(&self) -> f64 {
        self.state.borrow().scroll_size
    }

    fn scroll_value(&self) -> f64 {
        self.state.borrow().scroll_value
    }

    fn local_position(&self, position: Point) -> Option<f64> {
        let state = self.state.borrow();
        state.capture.contains(position).then(|| state.orientation.pos_of(position))
    }

    fn placeholder_rect(&self, begin: f64, end: f64) -> Rect {
        let state = self.state.borrow();
        match state.orientation {
            Orientation::Vertical => {
                Rect::new(state.capture.origin.x, begin, state.capture.size.width, end - begin)
            }
            Orientation::Horizontal => {
                Rect::new(begin, state.capture.origin.y, end - begin, state.capture.size.height)
            }
        }
    }

    fn set_translation(&mut self, index: usize, offset: f64) {
        let mut state = self.state.borrow_mut();
        if let Some(slot) = state.translations.get_mut(index) {
            *slot = offset;
        }
    }

    fn set_visibility(&mut self, index: usize, visible: bool) {
        let mut state = self.state.borrow_mut();
        if let Some(slot) = state.visibility.get_mut(index) {
            *slot = visible;
        }
    }

    fn set_stretcher(&mut self, size: f64) {
        self.state.borrow_mut().stretcher = Some(size);
    }

    fn clear_stretcher(&mut self) {
        self.state.borrow_mut().stretcher = None;
    }

    fn invalidate_rects(&mut self) {
        self.state.borrow_mut().invalidations += 1;
    }
}

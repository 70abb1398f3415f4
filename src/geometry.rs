//! Scalar geometry for axis-aligned container layouts.

use serde::{Deserialize, Serialize};

/// Axis along which a container lays out its draggables.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Projects a point onto this axis.
    pub fn pos_of(self, point: Point) -> f64 {
        match self {
            Orientation::Vertical => point.y,
            Orientation::Horizontal => point.x,
        }
    }

    /// Extent of a size along this axis.
    pub fn extent_of(self, size: Size) -> f64 {
        match self {
            Orientation::Vertical => size.height,
            Orientation::Horizontal => size.width,
        }
    }

    /// Begin/end band a rect covers along this axis.
    pub fn span_of(self, rect: Rect) -> BeginEnd {
        let begin = self.pos_of(rect.origin);
        BeginEnd {
            begin,
            end: begin + self.extent_of(rect.size),
        }
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn max(&self) -> Point {
        Point::new(self.origin.x + self.size.width, self.origin.y + self.size.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.origin.x..=self.max().x).contains(&point.x)
            && (self.origin.y..=self.max().y).contains(&point.y)
    }
}

/// A band along a container's axis. `begin` is exclusive and `end`
/// inclusive when testing membership, so a position exactly on a shared
/// boundary belongs to the earlier slot.
#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeginEnd {
    pub begin: f64,
    pub end: f64,
}

impl BeginEnd {
    pub fn new(begin: f64, end: f64) -> Self {
        BeginEnd { begin, end }
    }

    pub fn holds(&self, pos: f64) -> bool {
        pos > self.begin && pos <= self.end
    }

    pub fn midpoint(&self) -> f64 {
        (self.begin + self.end) / 2.0
    }
}

//! Node sizes and basic geometry.
//!
//! The layout never measures text itself. A renderer supplies sizes through
//! [`NodeMeasure`]; anything it cannot size falls back to the configured
//! defaults.

use super::options::LayoutOptions;
use crate::person::PersonId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Width and height of a node box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Size {
    /// Create a size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of a node box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing right
    pub x: f64,
    /// Vertical coordinate, growing down
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Rect {
    /// Rectangle from a corner and a size.
    pub fn from_point_size(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// Source of measured node sizes.
///
/// Returning `None` (or a non-positive dimension) means "use the default".
pub trait NodeMeasure {
    /// Measured size of the node for `id`.
    fn measure(&self, id: &str) -> Option<Size>;
}

/// Measure that knows no sizes; every node gets the defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSizes;

impl NodeMeasure for DefaultSizes {
    fn measure(&self, _id: &str) -> Option<Size> {
        None
    }
}

/// Every node has the same size.
impl NodeMeasure for Size {
    fn measure(&self, _id: &str) -> Option<Size> {
        Some(*self)
    }
}

impl NodeMeasure for HashMap<PersonId, Size> {
    fn measure(&self, id: &str) -> Option<Size> {
        self.get(id).copied()
    }
}

impl NodeMeasure for BTreeMap<PersonId, Size> {
    fn measure(&self, id: &str) -> Option<Size> {
        self.get(id).copied()
    }
}

impl<T: NodeMeasure + ?Sized> NodeMeasure for &T {
    fn measure(&self, id: &str) -> Option<Size> {
        (**self).measure(id)
    }
}

/// Size of a node after applying the defaults per dimension.
pub fn resolve_size(measure: &dyn NodeMeasure, id: &str, options: &LayoutOptions) -> Size {
    let measured = measure.measure(id);
    let pick = |value: Option<f64>, default: f64| match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    };
    Size {
        width: pick(measured.map(|s| s.width), options.default_node_width),
        height: pick(measured.map(|s| s.height), options.default_node_height),
    }
}

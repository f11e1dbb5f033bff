//! Value types for the layout stage.
//!
//! - `BBox`: axis-aligned rectangle in normalized image coordinates (y grows down).
//! - `Detection`: one detector output `(label, confidence, box)`.
//! - `Element`: a leaf symbol with its layout box (descender-trimmed) and ink box.
//! - `Node`: the tagged union walked by the assembler (`Plain | Fraction | Exponent`).
//! - `GeometryCfg`: every positional threshold in one place.

use std::ops::Range;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Geometry configuration (thresholds are fractions of the reference box height).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryCfg {
    pub superscript_threshold: f64,
    pub subscript_threshold: f64,
    pub quarter_superscript_threshold: f64,
    pub exponent_angle_threshold_degrees: f64,
    pub label_with_sub_threshold: f64,
    pub exponent_base_size_ratio_threshold: f64,
    pub inline_operator_threshold: f64,
    /// Cap on nested fraction/exponent resolution.
    pub max_depth: usize,
}

impl Default for GeometryCfg {
    fn default() -> Self {
        Self {
            superscript_threshold: 0.5,
            subscript_threshold: 0.6,
            quarter_superscript_threshold: 0.25,
            exponent_angle_threshold_degrees: 20.0,
            label_with_sub_threshold: 0.7,
            exponent_base_size_ratio_threshold: 0.7,
            inline_operator_threshold: 0.3,
            max_depth: 64,
        }
    }
}

/// Axis-aligned box stored as center and size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBox", into = "RawBox")]
pub struct BBox {
    pub center: Vector2<f64>,
    pub size: Vector2<f64>,
}

/// Wire shape of a box: the detector's `(center_x, center_y, width, height)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct RawBox {
    center_x: f64,
    center_y: f64,
    width: f64,
    height: f64,
}

impl From<RawBox> for BBox {
    fn from(r: RawBox) -> Self {
        BBox::new(r.center_x, r.center_y, r.width, r.height)
    }
}

impl From<BBox> for RawBox {
    fn from(b: BBox) -> Self {
        RawBox {
            center_x: b.center.x,
            center_y: b.center.y,
            width: b.size.x,
            height: b.size.y,
        }
    }
}

impl BBox {
    #[inline]
    pub fn new(center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        Self {
            center: Vector2::new(center_x, center_y),
            size: Vector2::new(width, height),
        }
    }

    /// Build from edges; `right >= left` and `bottom >= top` expected.
    #[inline]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let size = Vector2::new(right - left, bottom - top);
        Self {
            center: Vector2::new(left + size.x / 2.0, top + size.y / 2.0),
            size,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.size.x
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.size.y
    }
    #[inline]
    pub fn top(&self) -> f64 {
        self.center.y - self.size.y / 2.0
    }
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.center.y + self.size.y / 2.0
    }
    #[inline]
    pub fn left(&self) -> f64 {
        self.center.x - self.size.x / 2.0
    }
    #[inline]
    pub fn right(&self) -> f64 {
        self.center.x + self.size.x / 2.0
    }
    #[inline]
    pub fn area(&self) -> f64 {
        self.size.x * self.size.y
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Keep the top `ratio` of the box height (drops a descender).
    pub fn trimmed_from_top(&self, ratio: f64) -> BBox {
        let top = self.top();
        BBox::from_edges(self.left(), top, self.right(), top + self.height() * ratio)
    }
}

/// One detector output. Coordinates are normalized to `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f64,
    pub bbox: BBox,
}

impl Detection {
    /// Shorthand matching the detector tuple `(label, confidence, (cx, cy, w, h))`.
    pub fn new(label: impl Into<String>, confidence: f64, bbox: (f64, f64, f64, f64)) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox: BBox::new(bbox.0, bbox.1, bbox.2, bbox.3),
        }
    }
}

/// A leaf symbol.
///
/// `bbox` is the box used by every positional test; for labels with a
/// descender it keeps only the upper part of `ink`. `ink` is the detector box.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub expression: String,
    pub bbox: BBox,
    pub ink: BBox,
}

impl Element {
    pub fn from_detection(d: &Detection, cfg: &GeometryCfg) -> Self {
        let bbox = if super::position::has_descender(&d.label) {
            d.bbox.trimmed_from_top(cfg.label_with_sub_threshold)
        } else {
            d.bbox
        };
        Self {
            expression: d.label.clone(),
            bbox,
            ink: d.bbox,
        }
    }
}

/// A synthesized element covering a contiguous run of leaves.
///
/// `members` indexes the sorted leaf slice of the assembler level that built it.
#[derive(Clone, Debug, PartialEq)]
pub struct Composite {
    pub expression: String,
    pub bbox: BBox,
    pub members: Range<usize>,
}

/// Node of the assembler stream.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Plain { index: usize, element: Element },
    Fraction(Composite),
    Exponent(Composite),
}

impl Node {
    #[inline]
    pub fn expression(&self) -> &str {
        match self {
            Node::Plain { element, .. } => &element.expression,
            Node::Fraction(c) | Node::Exponent(c) => &c.expression,
        }
    }

    #[inline]
    pub fn bbox(&self) -> BBox {
        match self {
            Node::Plain { element, .. } => element.bbox,
            Node::Fraction(c) | Node::Exponent(c) => c.bbox,
        }
    }

    /// Ink box: the detector box for leaves, the layout box for composites.
    #[inline]
    pub fn ink(&self) -> BBox {
        match self {
            Node::Plain { element, .. } => element.ink,
            Node::Fraction(c) | Node::Exponent(c) => c.bbox,
        }
    }

    #[inline]
    pub fn members(&self) -> Range<usize> {
        match self {
            Node::Plain { index, .. } => *index..*index + 1,
            Node::Fraction(c) | Node::Exponent(c) => c.members.clone(),
        }
    }
}

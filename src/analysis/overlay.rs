//! Geometry-only annotation primitives attached to an analysed image

use serde::Serialize;

/// RGBA colour with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Colour {
    /// Red component
    pub red: f32,
    /// Green component
    pub green: f32,
    /// Blue component
    pub blue: f32,
    /// Opacity
    pub alpha: f32,
}

impl Colour {
    /// Create a colour from float components
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Red to green ramp for a score, muted blue at the midpoint
    ///
    /// The score is clamped to `[0, 1]` first; NaN maps to red.
    pub fn for_score(score: f64) -> Self {
        let f = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0) as f32
        };
        Self::new(1.0 - f, f, f / 2.0, 1.0)
    }

    /// Quantise to 8-bit RGBA
    pub fn to_rgba8(self) -> [u8; 4] {
        let quantise = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantise(self.red),
            quantise(self.green),
            quantise(self.blue),
            quantise(self.alpha),
        ]
    }
}

/// A point in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Column coordinate
    pub x: f64,
    /// Row coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Arrow head shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArrowStyle {
    /// Two unfilled strokes forming a V
    Open,
}

/// One overlay element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Annotation {
    /// Rectangle at a tile's bounds
    Region {
        /// Left edge
        x: f64,
        /// Top edge
        y: f64,
        /// Width
        width: f64,
        /// Height
        height: f64,
        /// Colour including translucency
        colour: Colour,
    },
    /// Orientation arrow through a tile centre
    Arrow {
        /// Tail end
        start: Point,
        /// Head end
        end: Point,
        /// Head shape
        style: ArrowStyle,
        /// Whether the tail carries a head as well
        double_headed: bool,
        /// Line width in pixels
        stroke_width: f64,
        /// Head size in pixels
        head_size: f64,
        /// Stroke colour
        colour: Colour,
    },
    /// Text label
    Label {
        /// Label text
        text: String,
        /// Top-left anchor of the text
        position: Point,
        /// Text colour
        colour: Colour,
    },
}

/// Ordered annotations for one image
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overlay {
    annotations: Vec<Annotation>,
}

impl Overlay {
    /// Empty overlay
    pub const fn new() -> Self {
        Self {
            annotations: Vec::new(),
        }
    }

    /// Append an annotation
    pub fn add(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Annotations in insertion order
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Number of annotations
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Whether nothing has been added
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

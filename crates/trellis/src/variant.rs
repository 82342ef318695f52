//! Tagged value container for the component boundary.
//!
//! [`Variant`] carries primitives and the toolkit's display value types
//! (color, brush, font, size, icon) across the boundary in one tagged union.
//! A variant is immutable once set and compares by value. Converting an
//! unconvertible source yields [`Variant::Invalid`], never an error.
//!
//! Item-model delegates answer data queries with variants; the connection
//! hub forwards signal arguments as variants.

use std::path::{Path, PathBuf};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// An opaque color from red/green/blue.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color from red/green/blue/alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Fill styles for a brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BrushStyle {
    /// No fill.
    NoBrush,
    /// Uniform fill with the brush color.
    #[default]
    Solid,
    /// Dense dotted fill.
    Dense,
    /// Horizontal lines.
    Horizontal,
    /// Vertical lines.
    Vertical,
    /// Crossing horizontal and vertical lines.
    Cross,
    /// Backward-leaning diagonal lines.
    BackwardDiagonal,
    /// Forward-leaning diagonal lines.
    ForwardDiagonal,
    /// Crossing diagonal lines.
    DiagonalCross,
}

/// A fill brush: a color plus a fill style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Brush {
    /// The brush color.
    pub color: Color,
    /// The fill style.
    pub style: BrushStyle,
}

/// A font request by family and metrics.
///
/// `weight` follows the usual 0-99 toolkit scale (50 = normal, 75 = bold).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    /// Font family name.
    pub family: String,
    /// Point size.
    pub point_size: i32,
    /// Weight on the 0-99 scale.
    pub weight: i32,
    /// Whether the font is italic.
    pub italic: bool,
}

/// An integer width × height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

/// An icon referenced by its source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Icon {
    /// Path to the icon's image file.
    pub source: PathBuf,
}

impl Icon {
    /// An icon loaded from `path`.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: path.into(),
        }
    }
}

/// The tagged value container crossing the component boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// No value; the result of an unconvertible source.
    #[default]
    Invalid,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Double(f64),
    /// String value.
    Str(String),
    /// Display color.
    Color(Color),
    /// Display brush.
    Brush(Brush),
    /// Display font.
    Font(FontSpec),
    /// Display size.
    Size(Extent),
    /// Display icon.
    Icon(Icon),
}

impl Variant {
    /// Whether this variant holds a value.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Convert a type-erased component value into a variant.
    ///
    /// Supports the primitive types, the display value types, and variants
    /// themselves. Anything else yields [`Variant::Invalid`].
    pub fn from_any(value: &dyn std::any::Any) -> Self {
        if let Some(v) = value.downcast_ref::<Variant>() {
            v.clone()
        } else if let Some(&v) = value.downcast_ref::<bool>() {
            Self::Bool(v)
        } else if let Some(&v) = value.downcast_ref::<i32>() {
            Self::Int(v as i64)
        } else if let Some(&v) = value.downcast_ref::<i64>() {
            Self::Int(v)
        } else if let Some(&v) = value.downcast_ref::<f64>() {
            Self::Double(v)
        } else if let Some(v) = value.downcast_ref::<&str>() {
            Self::Str((*v).to_owned())
        } else if let Some(v) = value.downcast_ref::<String>() {
            Self::Str(v.clone())
        } else if let Some(&v) = value.downcast_ref::<Color>() {
            Self::Color(v)
        } else if let Some(&v) = value.downcast_ref::<Brush>() {
            Self::Brush(v)
        } else if let Some(v) = value.downcast_ref::<FontSpec>() {
            Self::Font(v.clone())
        } else if let Some(&v) = value.downcast_ref::<Extent>() {
            Self::Size(v)
        } else if let Some(v) = value.downcast_ref::<Icon>() {
            Self::Icon(v.clone())
        } else {
            Self::Invalid
        }
    }

    /// Replace this variant with the conversion of `value`.
    ///
    /// An unconvertible source leaves the variant [`Variant::Invalid`].
    pub fn set_any(&mut self, value: &dyn std::any::Any) {
        *self = Self::from_any(value);
    }

    /// A color variant from RGBA components.
    pub fn color(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::Color(Color::rgba(r, g, b, a))
    }

    /// A brush variant from RGBA components and a style.
    pub fn brush(r: u8, g: u8, b: u8, a: u8, style: BrushStyle) -> Self {
        Self::Brush(Brush {
            color: Color::rgba(r, g, b, a),
            style,
        })
    }

    /// A font variant from family and metrics.
    pub fn font(family: impl Into<String>, point_size: i32, weight: i32, italic: bool) -> Self {
        Self::Font(FontSpec {
            family: family.into(),
            point_size,
            weight,
            italic,
        })
    }

    /// A size variant.
    pub fn size(width: i32, height: i32) -> Self {
        Self::Size(Extent { width, height })
    }

    /// An icon variant.
    pub fn icon(icon: Icon) -> Self {
        Self::Icon(icon)
    }

    /// An icon variant loaded from a file path.
    pub fn icon_file(path: impl AsRef<Path>) -> Self {
        Self::Icon(Icon::from_file(path.as_ref()))
    }

    /// The boolean value, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer value, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The floating point value; integers convert losslessly.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// The string value, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The color value, if this is a `Color`.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// The tag name, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Double(_) => "Double",
            Self::Str(_) => "Str",
            Self::Color(_) => "Color",
            Self::Brush(_) => "Brush",
            Self::Font(_) => "Font",
            Self::Size(_) => "Size",
            Self::Icon(_) => "Icon",
        }
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for Variant {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Color> for Variant {
    fn from(v: Color) -> Self {
        Self::Color(v)
    }
}

impl From<Extent> for Variant {
    fn from(v: Extent) -> Self {
        Self::Size(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_invalid() {
        let v = Variant::default();
        assert!(!v.is_valid());
        assert_eq!(v.as_int(), None);
    }

    #[test]
    fn display_constructors() {
        let v = Variant::color(10, 20, 30, 255);
        assert!(v.is_valid());
        assert_eq!(v.as_color(), Some(Color::rgb(10, 20, 30)));

        let v = Variant::brush(0, 0, 0, 255, BrushStyle::DiagonalCross);
        assert_eq!(v.type_name(), "Brush");

        let v = Variant::font("monospace", 11, 50, false);
        match v {
            Variant::Font(f) => {
                assert_eq!(f.family, "monospace");
                assert_eq!(f.point_size, 11);
            }
            other => panic!("expected font, got {}", other.type_name()),
        }

        let v = Variant::size(640, 480);
        assert_eq!(
            v,
            Variant::Size(Extent {
                width: 640,
                height: 480
            })
        );
    }

    #[test]
    fn set_any_converts_or_invalidates() {
        let mut v = Variant::from(1i32);
        v.set_any(&"hello".to_string());
        assert_eq!(v.as_str(), Some("hello"));

        v.set_any(&Color::rgb(1, 2, 3));
        assert_eq!(v.as_color(), Some(Color::rgb(1, 2, 3)));

        // An unconvertible source invalidates the variant.
        v.set_any(&vec![1u8, 2, 3]);
        assert!(!v.is_valid());

        // Variants pass through unchanged.
        v.set_any(&Variant::from(9i64));
        assert_eq!(v.as_int(), Some(9));
    }

    #[test]
    fn primitive_conversions() {
        assert_eq!(Variant::from(3i32).as_int(), Some(3));
        assert_eq!(Variant::from(3i32).as_double(), Some(3.0));
        assert_eq!(Variant::from("abc").as_str(), Some("abc"));
        assert_eq!(Variant::from(true).as_bool(), Some(true));
        // Cross-type reads are None, not panics.
        assert_eq!(Variant::from("abc").as_int(), None);
    }
}

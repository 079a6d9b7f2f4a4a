//! 8-bit output pixels.

use std::fmt;

use lumen_math::Color;

/// An 8-bit RGB pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Pixel {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Round a linear [0, 1] color to 8 bits per channel, clamping overflow.
    pub fn from_color(color: Color) -> Self {
        Self {
            red: channel(color.x),
            green: channel(color.y),
            blue: channel(color.z),
        }
    }

    /// Opaque RGBA bytes.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.red, self.green, self.blue, 255]
    }
}

impl From<Color> for Pixel {
    fn from(color: Color) -> Self {
        Self::from_color(color)
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.red, self.green, self.blue)
    }
}

#[inline]
fn channel(value: f32) -> u8 {
    // NaN maps to 0 through the saturating cast.
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

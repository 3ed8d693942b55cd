//! Colors and the built-in palettes

use molstar_mol::Element;
use serde::{Deserialize, Serialize};

/// An RGB color with components in [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    /// Color from a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Color {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    /// Parse `#RRGGBB` or `RRGGBB`
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_hex)
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            (self.r * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.g * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.b * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const GRAY: Color = Color::from_hex(0x909090);
    pub const MAGENTA: Color = Color::new(1.0, 0.0, 1.0);
}

impl Default for Color {
    fn default() -> Self {
        Color::GRAY
    }
}

/// CPK color of a chemical element
pub fn element_color(element: Element) -> Color {
    let hex = match element.atomic_number() {
        1 => 0xFFFFFF,
        2 => 0xD9FFFF,
        3 => 0xCC80FF,
        4 => 0xC2FF00,
        5 => 0xFFB5B5,
        6 => 0x909090,
        7 => 0x3050F8,
        8 => 0xFF0D0D,
        9 => 0x90E050,
        10 => 0xB3E3F5,
        11 => 0xAB5CF2,
        12 => 0x8AFF00,
        13 => 0xBFA6A6,
        14 => 0xF0C8A0,
        15 => 0xFF8000,
        16 => 0xFFFF30,
        17 => 0x1FF01F,
        18 => 0x80D1E3,
        19 => 0x8F40D4,
        20 => 0x3DFF00,
        25 => 0x9C7AC7,
        26 => 0xE06633,
        27 => 0xF090A0,
        28 => 0x50D050,
        29 => 0xC88033,
        30 => 0x7D80B0,
        34 => 0xFFA100,
        35 => 0xA62929,
        53 => 0x940094,
        _ => return Color::MAGENTA,
    };
    Color::from_hex(hex)
}

/// Cyclic palette for chain coloring
const CHAIN_PALETTE: [u32; 12] = [
    0x1B9E77, 0xD95F02, 0x7570B3, 0xE7298A, 0x66A61E, 0xE6AB02, 0xA6761D, 0x666666, 0x8DD3C7,
    0xFB8072, 0x80B1D3, 0xFDB462,
];

/// Color of the chain with index `index`
pub fn chain_color(index: u32) -> Color {
    Color::from_hex(CHAIN_PALETTE[index as usize % CHAIN_PALETTE.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip_bytes() {
        assert_eq!(Color::from_hex(0xFF8000).to_rgb8(), [255, 128, 0]);
        assert_eq!(Color::parse_hex("#3050F8"), Some(Color::from_hex(0x3050F8)));
        assert_eq!(Color::parse_hex("12345"), None);
        assert_eq!(Color::parse_hex("zzzzzz"), None);
    }

    #[test]
    fn test_element_colors() {
        assert_eq!(element_color(Element::OXYGEN).to_rgb8(), [255, 13, 13]);
        assert_eq!(element_color(Element::UNKNOWN), Color::MAGENTA);
    }

    #[test]
    fn test_chain_palette_cycles() {
        assert_eq!(chain_color(0), chain_color(12));
        assert_ne!(chain_color(0), chain_color(1));
    }
}

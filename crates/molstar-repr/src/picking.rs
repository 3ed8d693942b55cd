//! Picking ids
//!
//! Render backends draw pickable geometry with colors that encode the
//! object, instance and group under the cursor. Each id is packed into the
//! 24 bits of an RGB triple.

use serde::{Deserialize, Serialize};

/// Largest id that fits an RGB triple
pub const MAX_PICKING_ID: u32 = 0x00FF_FFFF;

/// Identifies one drawn group of one instance of one render object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickingId {
    pub object_id: u32,
    pub instance_id: u32,
    pub group_id: u32,
}

impl PickingId {
    pub fn new(object_id: u32, instance_id: u32, group_id: u32) -> Self {
        Self {
            object_id,
            instance_id,
            group_id,
        }
    }

    /// Decode the three id colors read back from the picking passes
    pub fn from_rgb(object: [u8; 3], instance: [u8; 3], group: [u8; 3]) -> Self {
        Self {
            object_id: decode_id(object),
            instance_id: decode_id(instance),
            group_id: decode_id(group),
        }
    }

    /// Encode as object, instance and group colors
    pub fn to_rgb(&self) -> [[u8; 3]; 3] {
        [
            encode_id(self.object_id),
            encode_id(self.instance_id),
            encode_id(self.group_id),
        ]
    }
}

/// Pack the low 24 bits of `id` into RGB, most significant byte first
pub fn encode_id(id: u32) -> [u8; 3] {
    [(id >> 16) as u8, (id >> 8) as u8, id as u8]
}

pub fn decode_id(rgb: [u8; 3]) -> u32 {
    ((rgb[0] as u32) << 16) | ((rgb[1] as u32) << 8) | rgb[2] as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_id() {
        assert_eq!(encode_id(0), [0, 0, 0]);
        assert_eq!(encode_id(0x123456), [0x12, 0x34, 0x56]);
        assert_eq!(encode_id(MAX_PICKING_ID), [255, 255, 255]);
        assert_eq!(decode_id([0x12, 0x34, 0x56]), 0x123456);
    }

    #[test]
    fn test_picking_id_colors() {
        let id = PickingId::new(3, 0, 70_000);
        let [o, i, g] = id.to_rgb();
        assert_eq!(PickingId::from_rgb(o, i, g), id);
    }
}

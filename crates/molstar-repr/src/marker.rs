//! Per-group marker state (highlight and selection)

use std::ops::Range;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Marker bits stored per group
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MarkerFlags: u8 {
        /// Group is highlighted (hover)
        const HIGHLIGHT = 0b01;
        /// Group is selected
        const SELECT = 0b10;
    }
}

/// Change applied to the marker state of a set of groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerAction {
    Highlight,
    RemoveHighlight,
    Select,
    Deselect,
    Toggle,
    Clear,
}

impl MarkerAction {
    /// New marker value after applying this action to `value`
    pub fn apply(self, value: u8) -> u8 {
        let flags = MarkerFlags::from_bits_truncate(value);
        let flags = match self {
            MarkerAction::Highlight => flags | MarkerFlags::HIGHLIGHT,
            MarkerAction::RemoveHighlight => flags - MarkerFlags::HIGHLIGHT,
            MarkerAction::Select => flags | MarkerFlags::SELECT,
            MarkerAction::Deselect => flags - MarkerFlags::SELECT,
            MarkerAction::Toggle => flags ^ MarkerFlags::SELECT,
            MarkerAction::Clear => MarkerFlags::empty(),
        };
        flags.bits()
    }
}

/// Apply `action` to `array[range]`; returns whether any value changed
///
/// The range is clamped to the array.
pub fn apply_marker_action(array: &mut [u8], range: Range<usize>, action: MarkerAction) -> bool {
    let end = range.end.min(array.len());
    let start = range.start.min(end);
    let mut changed = false;
    for value in &mut array[start..end] {
        let next = action.apply(*value);
        changed |= next != *value;
        *value = next;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions() {
        let both = (MarkerFlags::HIGHLIGHT | MarkerFlags::SELECT).bits();
        assert_eq!(MarkerAction::Highlight.apply(0), MarkerFlags::HIGHLIGHT.bits());
        assert_eq!(MarkerAction::RemoveHighlight.apply(both), MarkerFlags::SELECT.bits());
        assert_eq!(MarkerAction::Select.apply(0), MarkerFlags::SELECT.bits());
        assert_eq!(MarkerAction::Deselect.apply(both), MarkerFlags::HIGHLIGHT.bits());
        assert_eq!(MarkerAction::Toggle.apply(0), MarkerFlags::SELECT.bits());
        assert_eq!(MarkerAction::Toggle.apply(both), MarkerFlags::HIGHLIGHT.bits());
        assert_eq!(MarkerAction::Clear.apply(both), 0);
    }

    #[test]
    fn test_apply_reports_changes() {
        let mut markers = vec![0u8; 4];
        assert!(apply_marker_action(&mut markers, 1..3, MarkerAction::Highlight));
        assert_eq!(markers, vec![0, 1, 1, 0]);
        assert!(!apply_marker_action(&mut markers, 1..3, MarkerAction::Highlight));
        assert!(!apply_marker_action(&mut markers, 0..1, MarkerAction::RemoveHighlight));
        assert!(apply_marker_action(&mut markers, 2..10, MarkerAction::Clear));
        assert_eq!(markers, vec![0, 1, 0, 0]);
        assert!(!apply_marker_action(&mut markers, 8..10, MarkerAction::Select));
    }
}

//! Indexed palettes and the fixed colors used by the style resolver.

use hiview_core::Color;
use serde::{Deserialize, Serialize};

/// Ten-step categorical palette used for group and attribute-value colors.
pub const CATEGORY10: [Color; 10] = [
    Color::rgb(0x1F, 0x77, 0xB4),
    Color::rgb(0xFF, 0x7F, 0x0E),
    Color::rgb(0x2C, 0xA0, 0x2C),
    Color::rgb(0xD6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xBD),
    Color::rgb(0x8C, 0x56, 0x4B),
    Color::rgb(0xE3, 0x77, 0xC2),
    Color::rgb(0x7F, 0x7F, 0x7F),
    Color::rgb(0xBC, 0xBD, 0x22),
    Color::rgb(0x17, 0xBE, 0xCF),
];

/// Accent palette for the categorical style presets. Index 1 is the
/// highlight orange, index 3 the teal used for prey.
pub const ACCENT: [Color; 6] = [
    Color::rgb(0x4E, 0x79, 0xA7),
    Color::rgb(0xF2, 0x8E, 0x2B),
    Color::rgb(0xE1, 0x57, 0x59),
    Color::rgb(0x76, 0xB7, 0xB2),
    Color::rgb(0x59, 0xA1, 0x4F),
    Color::rgb(0xED, 0xC9, 0x48),
];

pub const PARENT_GROUP_GRAY: Color = Color::rgba(80, 80, 80, 128);
pub const CROSS_GROUP_EDGE: Color = Color::rgb(0x77, 0x77, 0x77);
pub const PLEIO_EDGE: Color = Color::WHITE;
pub const NEUTRAL: Color = Color::rgba(30, 30, 30, 128);

/// Palette entry for `index`, wrapping around past the end.
pub fn category_color(index: usize) -> Color {
    CATEGORY10[index % CATEGORY10.len()]
}

pub fn accent_color(index: usize) -> Color {
    ACCENT[index % ACCENT.len()]
}

/// The fixed colors written by the style resolver, overridable from settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleColors {
    /// Nodes of the unfocused parent group.
    pub parent_group: Color,
    /// Edges that cross groups or touch the parent group.
    pub cross_group_edge: Color,
    /// Edges flagged pleiotropic.
    pub pleio_edge: Color,
    /// Fallback node color for style modes.
    pub neutral: Color,
    /// Highlight for the binary presets.
    pub accent: Color,
}

impl Default for StyleColors {
    fn default() -> Self {
        Self {
            parent_group: PARENT_GROUP_GRAY,
            cross_group_edge: CROSS_GROUP_EDGE,
            pleio_edge: PLEIO_EDGE,
            neutral: NEUTRAL,
            accent: accent_color(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_palette_wraps() {
        assert_eq!(category_color(0), CATEGORY10[0]);
        assert_eq!(category_color(10), CATEGORY10[0]);
        assert_eq!(category_color(13), CATEGORY10[3]);
    }

    #[test]
    fn test_category_colors_are_distinct() {
        for i in 0..CATEGORY10.len() {
            for j in (i + 1)..CATEGORY10.len() {
                assert_ne!(CATEGORY10[i], CATEGORY10[j]);
            }
        }
    }

    #[test]
    fn test_default_style_colors() {
        let colors = StyleColors::default();
        assert_eq!(colors.cross_group_edge.to_css(), "#777777");
        assert_eq!(colors.pleio_edge.to_css(), "#FFFFFF");
        assert_eq!(colors.parent_group.to_css(), "rgba(80,80,80,0.502)");
        assert_eq!(colors.neutral.to_css(), "rgba(30,30,30,0.502)");
        assert_eq!(colors.accent, ACCENT[1]);
    }

    #[test]
    fn test_partial_style_colors_fill_defaults() {
        let colors: StyleColors =
            serde_json::from_str(r##"{ "pleio_edge": "#FF0000" }"##).unwrap();
        assert_eq!(colors.pleio_edge, Color::rgb(255, 0, 0));
        assert_eq!(colors.cross_group_edge, CROSS_GROUP_EDGE);
    }
}

//! The fixed set of card colors the user cycles through.

use cr_core::color::Color;

pub const CARD_COLORS: [Color; 8] = [
    Color::rgb8(198, 41, 41),
    Color::rgb8(0, 102, 0),
    Color::rgb8(26, 62, 161),
    Color::rgb8(255, 255, 51),
    Color::rgb8(255, 0, 255),
    Color::rgb8(128, 128, 128),
    Color::WHITE,
    Color::BLACK,
];

pub fn card_color(index: usize) -> Option<Color> {
    CARD_COLORS.get(index).copied()
}

/// The index after `index`, wrapping to the first color.
pub fn next_color(index: usize) -> usize {
    (index + 1) % CARD_COLORS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_wraps() {
        assert_eq!(next_color(0), 1);
        assert_eq!(next_color(CARD_COLORS.len() - 1), 0);
        assert_eq!(card_color(0).map(|c| c.to_hex()), Some("#C62929".to_string()));
        assert!(card_color(8).is_none());
    }
}

use ratatui::style::Color;

use crate::model::task::{Column, Priority};

/// Color theme for the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub column_background: Color,
    pub card_background: Color,
    pub done_card_background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub important: Color,
    pub project: Color,
    pub context: Color,
    pub kv_data: Color,
    pub selection_bg: Color,
    /// Accent per board column
    pub columns: [Color; 4],
    /// Colors of priorities A through E
    pub priorities: [Color; 5],
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xC0, 0xD6, 0xE8),
            column_background: Color::Rgb(0xDA, 0xEC, 0xF1),
            card_background: Color::Rgb(0xFF, 0xFF, 0xFF),
            done_card_background: Color::Rgb(0xED, 0xF5, 0xF7),
            text: Color::Rgb(0x4C, 0x60, 0x66),
            text_bright: Color::Rgb(0x00, 0x00, 0x00),
            dim: Color::Rgb(0x41, 0x53, 0x58),
            important: Color::Rgb(0xA7, 0x08, 0x3B),
            project: Color::Rgb(0x00, 0xB6, 0xE4),
            context: Color::Rgb(0x1C, 0x9C, 0x6D),
            kv_data: Color::Rgb(0x8A, 0x90, 0x9C),
            selection_bg: Color::Rgb(0xCA, 0xE1, 0xE8),
            columns: [
                Color::Rgb(0xF2, 0x72, 0x72),
                Color::Rgb(0x00, 0xB6, 0xE4),
                Color::Rgb(0x22, 0xB5, 0x7F),
                Color::Rgb(0x8B, 0xC3, 0x4A),
            ],
            priorities: [
                Color::Rgb(0xEC, 0x1C, 0x24),
                Color::Rgb(0xFF, 0x7F, 0x27),
                Color::Rgb(0xFF, 0xCA, 0x18),
                Color::Rgb(0x77, 0xDD, 0x77),
                Color::Rgb(0xAE, 0xC6, 0xCF),
            ],
        }
    }

    pub fn dark() -> Self {
        Theme {
            background: Color::Rgb(0x22, 0x2B, 0x2F),
            column_background: Color::Rgb(0x2F, 0x38, 0x3E),
            card_background: Color::Rgb(0x22, 0x2B, 0x2F),
            done_card_background: Color::Rgb(0x1A, 0x20, 0x23),
            text: Color::Rgb(0xB6, 0xCB, 0xD1),
            text_bright: Color::Rgb(0xCE, 0xE4, 0xEB),
            dim: Color::Rgb(0x7A, 0x8A, 0x90),
            important: Color::Rgb(0xE1, 0x23, 0x60),
            project: Color::Rgb(0x2E, 0xB3, 0x98),
            context: Color::Rgb(0x1C, 0x9C, 0x6D),
            kv_data: Color::Rgb(0x6B, 0x6E, 0x75),
            selection_bg: Color::Rgb(0x3A, 0x47, 0x4E),
            columns: [
                Color::Rgb(0xF2, 0x72, 0x72),
                Color::Rgb(0x00, 0xB6, 0xE4),
                Color::Rgb(0x9F, 0xA1, 0xA2),
                Color::Rgb(0x8B, 0xC3, 0x4A),
            ],
            priorities: [
                Color::Rgb(0xFF, 0x69, 0x61),
                Color::Rgb(0xFF, 0xB3, 0x47),
                Color::Rgb(0xFD, 0xFD, 0x96),
                Color::Rgb(0x77, 0xDD, 0x77),
                Color::Rgb(0xAE, 0xC6, 0xCF),
            ],
        }
    }

    pub fn for_mode(darkmode: bool) -> Self {
        if darkmode { Theme::dark() } else { Theme::light() }
    }

    pub fn column_color(&self, column: Column) -> Color {
        self.columns[column.position()]
    }

    /// Color for a priority; letters after E use the plain text color
    pub fn priority_color(&self, priority: Priority) -> Color {
        let slot = (priority.letter() as usize).wrapping_sub('A' as usize);
        self.priorities.get(slot).copied().unwrap_or(self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_colors() {
        let theme = Theme::light();
        assert_eq!(theme.priority_color(Priority::A), theme.priorities[0]);
        assert_eq!(theme.priority_color(Priority::E), theme.priorities[4]);
        let z = Priority::new('Z').unwrap();
        assert_eq!(theme.priority_color(z), theme.text);
    }

    #[test]
    fn modes_differ() {
        assert_ne!(Theme::for_mode(true), Theme::for_mode(false));
        assert_eq!(Theme::default(), Theme::light());
    }
}

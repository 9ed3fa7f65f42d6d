//! Color Palettes
//!
//! Concrete RGBA strings for each semantic color class.

use super::layout::ColorClass;
use crate::config::ColorScheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    scheme: ColorScheme,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(ColorScheme::default())
    }
}

impl Palette {
    pub fn new(scheme: ColorScheme) -> Self {
        Self { scheme }
    }

    pub fn color(&self, class: ColorClass) -> &'static str {
        use ColorClass::*;

        match self.scheme {
            ColorScheme::Standard => match class {
                Positive => "rgba(44, 160, 44, 0.6)",
                Negative => "rgba(214, 39, 40, 0.6)",
                Neutral => "rgba(140, 140, 140, 0.5)",
                Revenue => "rgba(31, 119, 180, 0.6)",
                Expense => "rgba(255, 127, 14, 0.6)",
                Profit => "rgba(44, 160, 44, 0.6)",
                Tax => "rgba(148, 103, 189, 0.6)",
            },
            ColorScheme::Professional => match class {
                Positive => "rgba(65, 151, 151, 0.7)",
                Negative => "rgba(204, 80, 62, 0.7)",
                Neutral => "rgba(120, 120, 120, 0.5)",
                Revenue => "rgba(52, 94, 141, 0.7)",
                Expense => "rgba(191, 129, 45, 0.7)",
                Profit => "rgba(39, 123, 69, 0.7)",
                Tax => "rgba(142, 85, 153, 0.7)",
            },
            ColorScheme::HighContrast => match class {
                Positive => "rgba(0, 128, 0, 0.8)",
                Negative => "rgba(220, 20, 60, 0.8)",
                Neutral => "rgba(70, 70, 70, 0.7)",
                Revenue => "rgba(0, 0, 205, 0.8)",
                Expense => "rgba(255, 140, 0, 0.8)",
                Profit => "rgba(50, 205, 50, 0.8)",
                Tax => "rgba(138, 43, 226, 0.8)",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_professional() {
        assert_eq!(Palette::default(), Palette::new(ColorScheme::Professional));
        assert_eq!(
            Palette::default().color(ColorClass::Revenue),
            "rgba(52, 94, 141, 0.7)"
        );
    }

    #[test]
    fn test_schemes_differ() {
        let tax = |scheme| Palette::new(scheme).color(ColorClass::Tax);
        assert_ne!(tax(ColorScheme::Standard), tax(ColorScheme::HighContrast));
        assert_ne!(tax(ColorScheme::Standard), tax(ColorScheme::Professional));
    }
}

//! Built-in Type1 fonts
//!
//! Only the standard Helvetica faces are used, so nothing is embedded.

/// Built-in font selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    pub const ALL: [Font; 2] = [Font::Helvetica, Font::HelveticaBold];

    /// PostScript name of the font
    pub fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Key under which the font is registered in page resources
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }
}

use pdf_writer::{Name, Pdf, Ref};

/// The two standard-14 faces the document uses: body text and headings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    pub(crate) const ALL: [StandardFont; 2] = [StandardFont::Helvetica, StandardFont::HelveticaBold];

    pub(crate) fn base_font(self) -> &'static [u8] {
        match self {
            StandardFont::Helvetica => b"Helvetica",
            StandardFont::HelveticaBold => b"Helvetica-Bold",
        }
    }

    /// Resource name inside page dictionaries.
    pub(crate) fn pdf_name(self) -> &'static [u8] {
        match self {
            StandardFont::Helvetica => b"F1",
            StandardFont::HelveticaBold => b"F2",
        }
    }
}

pub(crate) struct FontEntry {
    pub(crate) font: StandardFont,
    pub(crate) font_ref: Ref,
    pub(crate) widths_1000: Vec<f32>,
}

impl FontEntry {
    /// Width of a single character in 1000-units, via its WinAnsi byte.
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        let byte = char_to_winansi(ch).unwrap_or(b'?');
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub(crate) fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }
}

/// Write a Type1 standard font dictionary and return its metrics entry.
pub(crate) fn register_font(pdf: &mut Pdf, font: StandardFont, font_ref: Ref) -> FontEntry {
    pdf.type1_font(font_ref)
        .base_font(Name(font.base_font()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let widths_1000 = match font {
        StandardFont::Helvetica => helvetica_widths(),
        StandardFont::HelveticaBold => helvetica_bold_widths(),
    };

    log::debug!(
        "register_font: {} as {}",
        String::from_utf8_lossy(font.base_font()),
        String::from_utf8_lossy(font.pdf_name()),
    );

    FontEntry {
        font,
        font_ref,
        widths_1000,
    }
}

/// Map a single Unicode char to its WinAnsi byte.
fn char_to_winansi(c: char) -> Option<u8> {
    match c as u32 {
        0x0020..=0x007E => Some(c as u8),
        0x00A0..=0x00FF => Some(c as u8),
        0x20AC => Some(0x80),
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85),
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95),
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Characters outside the code page become `?`.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| char_to_winansi(c).unwrap_or(b'?'))
        .collect()
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,                          // space
            33..=47 => 333.0,                     // punctuation
            48..=57 => 556.0,                     // digits
            58..=64 => 333.0,                     // more punctuation
            73 | 74 => 278.0,                     // I J (narrow uppercase)
            77 => 833.0,                          // M (wide)
            65..=90 => 667.0,                     // uppercase A-Z (average)
            91..=96 => 333.0,                     // brackets etc.
            102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
            109 | 119 => 833.0,                   // m w (wide)
            97..=122 => 556.0,                    // lowercase a-z (average)
            _ => 556.0,
        })
        .collect()
}

/// Approximate Helvetica-Bold widths; same shape as the regular table, wider letters.
fn helvetica_bold_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,
            33..=47 => 333.0,
            48..=57 => 556.0,
            58..=64 => 333.0,
            73 => 278.0,
            74 => 556.0,
            77 => 833.0,
            65..=90 => 722.0,
            91..=96 => 333.0,
            105 | 106 | 108 => 278.0,
            102 | 116 => 333.0,
            109 => 889.0,
            119 => 778.0,
            97..=122 => 611.0,
            _ => 611.0,
        })
        .collect()
}

/// Millimetres → PDF points.
pub const MM: f32 = 72.0 / 25.4;

/// How requirement fields are located and codes are formatted.
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    /// Substring matched against `ATTRIBUTE-DEFINITION-XHTML-REF` for the heading.
    pub heading_field: String,
    /// Substring matched against `ATTRIBUTE-DEFINITION-XHTML-REF` for the body text.
    pub body_field: String,
    pub code_prefix: String,
    pub code_width: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            heading_field: "OBJECTHEADING".into(),
            body_field: "OBJECTTEXT".into(),
            code_prefix: "REQ-".into(),
            code_width: 6,
        }
    }
}

/// Page geometry and spacing, all in points unless noted.
#[derive(Clone, Debug)]
pub struct LayoutOptions {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// Space kept free above the bottom margin before a new block forces a page break.
    pub bottom_reserve: f32,
    pub title: String,
    pub title_font_size: f32,
    pub title_advance: f32,
    pub font_size: f32,
    pub heading_advance: f32,
    pub line_height: f32,
    /// Greedy wrap width, in characters.
    pub wrap_chars: usize,
    pub indent_per_level: f32,
    pub content_indent: f32,
    pub max_image_height: f32,
    pub image_spacing: f32,
    pub link_advance: f32,
    pub requirement_spacing: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_width: 210.0 * MM,
            page_height: 297.0 * MM,
            margin: 20.0 * MM,
            bottom_reserve: 80.0,
            title: "REQUIREMENTS DOCUMENT".into(),
            title_font_size: 16.0,
            title_advance: 20.0,
            font_size: 10.0,
            heading_advance: 14.0,
            line_height: 12.0,
            wrap_chars: 90,
            indent_per_level: 12.0,
            content_indent: 10.0,
            max_image_height: 200.0,
            image_spacing: 10.0,
            link_advance: 14.0,
            requirement_spacing: 10.0,
        }
    }
}

impl LayoutOptions {
    /// Baseline of the first line on a fresh page.
    pub fn top(&self) -> f32 {
        self.page_height - self.margin
    }

    /// Below this cursor position a new block starts on the next page.
    pub fn break_threshold(&self) -> f32 {
        self.margin + self.bottom_reserve
    }
}

#[derive(Clone, Debug, Default)]
pub struct Options {
    pub extract: ExtractOptions,
    pub layout: LayoutOptions,
}

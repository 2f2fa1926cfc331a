use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::LayoutOptions;
use crate::error::Error;
use crate::fonts::StandardFont;
use crate::model::{ContentItem, Document, RequirementObject};

use super::raster::{RasterImage, fit_scale};
use super::{Canvas, TextStyle};

/// What a layout pass produced, including the non-fatal misses.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderReport {
    pub pages: usize,
    pub requirements: usize,
    pub text_lines: usize,
    pub images: usize,
    pub links: usize,
    /// Image references whose file does not exist; they were skipped.
    pub missing_assets: Vec<PathBuf>,
}

/// Greedy word wrap by character count. Words are never split, so a single
/// word longer than `max_chars` gets a line of its own.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Drive `canvas` through the whole document: title, then one heading and
/// content block per traversed requirement.
pub fn layout_document<C: Canvas>(
    doc: &Document,
    options: &LayoutOptions,
    canvas: &mut C,
) -> Result<RenderReport, Error> {
    let mut engine = LayoutEngine::new(canvas, options);

    let title = doc.title.as_deref().unwrap_or(&options.title);
    engine.title(title);

    for obj in doc.ordered_objects() {
        engine.requirement(obj)?;
    }

    Ok(engine.finish())
}

struct LayoutEngine<'a, C: Canvas> {
    canvas: &'a mut C,
    opts: &'a LayoutOptions,
    /// Baseline of the next draw on the current page.
    y: f32,
    report: RenderReport,
    /// Decoded rasters by path; a file referenced again is not re-decoded.
    images: HashMap<PathBuf, Rc<RasterImage>>,
}

impl<'a, C: Canvas> LayoutEngine<'a, C> {
    fn new(canvas: &'a mut C, opts: &'a LayoutOptions) -> Self {
        Self {
            canvas,
            opts,
            y: opts.top(),
            report: RenderReport {
                pages: 1,
                ..RenderReport::default()
            },
            images: HashMap::new(),
        }
    }

    fn body(&self) -> TextStyle {
        TextStyle {
            font: StandardFont::Helvetica,
            size: self.opts.font_size,
        }
    }

    fn new_page(&mut self) {
        self.canvas.new_page();
        self.report.pages += 1;
        self.y = self.opts.top();
        log::debug!("page break → page {}", self.report.pages);
    }

    /// Start a new page if the cursor has reached the near-bottom threshold.
    fn break_if_low(&mut self) {
        if self.y < self.opts.break_threshold() {
            self.new_page();
        }
    }

    fn title(&mut self, title: &str) {
        let style = TextStyle {
            font: StandardFont::HelveticaBold,
            size: self.opts.title_font_size,
        };
        self.canvas.draw_text(self.opts.margin, self.y, title, style);
        self.y -= self.opts.title_advance;
    }

    fn requirement(&mut self, obj: &RequirementObject) -> Result<(), Error> {
        let indent = self.opts.margin + obj.level as f32 * self.opts.indent_per_level;

        self.break_if_low();
        let heading = format!("{} [{}] {}", obj.hierarchy_number, obj.display_code, obj.heading);
        let style = TextStyle {
            font: StandardFont::HelveticaBold,
            size: self.opts.font_size,
        };
        self.canvas.draw_text(indent, self.y, heading.trim_end(), style);
        self.y -= self.opts.heading_advance;
        self.report.requirements += 1;

        let x = indent + self.opts.content_indent;
        for item in &obj.content {
            match item {
                ContentItem::Text(text) => self.text(x, text),
                ContentItem::Image(path) => self.image(x, path)?,
                ContentItem::Object(path) => self.object_link(x, path),
            }
        }

        self.y -= self.opts.requirement_spacing;
        Ok(())
    }

    fn text(&mut self, x: f32, text: &str) {
        let style = self.body();
        for line in wrap_words(text, self.opts.wrap_chars) {
            self.break_if_low();
            self.canvas.draw_text(x, self.y, &line, style);
            self.y -= self.opts.line_height;
            self.report.text_lines += 1;
        }
    }

    fn image(&mut self, x: f32, path: &Path) -> Result<(), Error> {
        if !path.exists() {
            log::warn!("Image not found, skipping: {}", path.display());
            self.report.missing_assets.push(path.to_path_buf());
            return Ok(());
        }

        let image = match self.images.get(path) {
            Some(image) => Rc::clone(image),
            None => {
                let image = Rc::new(RasterImage::open(path)?);
                self.images.insert(path.to_path_buf(), Rc::clone(&image));
                image
            }
        };
        let max_width = (self.opts.page_width - self.opts.margin - x).max(1.0);
        let scale = fit_scale(
            image.width as f32,
            image.height as f32,
            max_width,
            self.opts.max_image_height,
        );
        let width = image.width as f32 * scale;
        let height = image.height as f32 * scale;

        self.break_if_low();
        if self.y - height < self.opts.margin {
            self.new_page();
        }

        self.canvas.draw_image(&image, x, self.y - height, width, height)?;
        self.y -= height + self.opts.image_spacing;
        self.report.images += 1;
        Ok(())
    }

    fn object_link(&mut self, x: f32, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let label = format!("[OLE] Open embedded object: {name}");

        let style = self.body();
        self.break_if_low();
        self.canvas.draw_link(x, self.y, &label, &name, style);
        self.y -= self.opts.link_advance;
        self.report.links += 1;
    }

    fn finish(self) -> RenderReport {
        self.report
    }
}

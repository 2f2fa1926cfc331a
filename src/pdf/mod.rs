mod raster;
mod layout;

use std::collections::HashMap;
use std::path::PathBuf;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::config::LayoutOptions;
use crate::error::Error;
use crate::fonts::{FontEntry, StandardFont, register_font, to_winansi_bytes};
use crate::model::Document;

pub use raster::{RasterImage, fit_scale};
pub use layout::{RenderReport, layout_document, wrap_words};

/// Font face and size for a text draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font: StandardFont,
    pub size: f32,
}

/// Drawing surface driven by the layout engine. Coordinates are PDF points
/// with the origin at the bottom-left of the page; `y` is the text baseline.
pub trait Canvas {
    fn draw_text(&mut self, x: f32, y: f32, text: &str, style: TextStyle);

    /// Draw `image` with its bottom-left corner at `(x, y)`.
    fn draw_image(&mut self, image: &RasterImage, x: f32, y: f32, width: f32, height: f32)
    -> Result<(), Error>;

    /// Draw `label` in link colour and make it open `target` (a relative URI).
    fn draw_link(&mut self, x: f32, y: f32, label: &str, target: &str, style: TextStyle);

    fn new_page(&mut self);
}

pub(crate) struct LinkAnnotation {
    pub(crate) rect: Rect,
    pub(crate) url: String,
}

struct PageContent {
    content: Content,
    links: Vec<LinkAnnotation>,
}

impl PageContent {
    fn new() -> Self {
        Self {
            content: Content::new(),
            links: Vec::new(),
        }
    }
}

/// `Canvas` implementation that accumulates a `pdf-writer` document.
pub struct PdfCanvas {
    pdf: Pdf,
    next_id: i32,
    page_width: f32,
    page_height: f32,
    fonts: Vec<FontEntry>,
    finished_pages: Vec<PageContent>,
    current: PageContent,
    image_xobjects: Vec<(String, Ref)>,
    image_names: HashMap<PathBuf, String>,
}

impl PdfCanvas {
    pub fn new(page_width: f32, page_height: f32) -> Self {
        let mut canvas = Self {
            pdf: Pdf::new(),
            // 1 and 2 are reserved for the catalog and page tree.
            next_id: 3,
            page_width,
            page_height,
            fonts: Vec::new(),
            finished_pages: Vec::new(),
            current: PageContent::new(),
            image_xobjects: Vec::new(),
            image_names: HashMap::new(),
        };
        for font in StandardFont::ALL {
            let font_ref = canvas.alloc();
            let entry = register_font(&mut canvas.pdf, font, font_ref);
            canvas.fonts.push(entry);
        }
        canvas
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    fn font(&self, font: StandardFont) -> Option<&FontEntry> {
        self.fonts.iter().find(|f| f.font == font)
    }

    pub fn page_count(&self) -> usize {
        self.finished_pages.len() + 1
    }

    fn show_text(&mut self, x: f32, y: f32, text: &str, style: TextStyle) {
        let content = &mut self.current.content;
        content.begin_text();
        content.set_font(Name(style.font.pdf_name()), style.size);
        content.next_line(x, y);
        content.show(Str(&to_winansi_bytes(text)));
        content.end_text();
    }

    fn embed_image(&mut self, image: &RasterImage) -> String {
        if let Some(name) = self.image_names.get(&image.path) {
            return name.clone();
        }

        let xobj_ref = self.alloc();
        let pdf_name = format!("Im{}", self.image_xobjects.len() + 1);
        let (w, h) = (image.width as i32, image.height as i32);

        let smask_ref = match &image.alpha {
            Some(alpha) => {
                let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(alpha, 6);
                let mask_ref = self.alloc();
                let mut mask = self.pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w);
                mask.height(h);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                Some(mask_ref)
            }
            None => None,
        };

        let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&image.rgb, 6);
        let mut xobj = self.pdf.image_xobject(xobj_ref, &compressed_rgb);
        xobj.filter(Filter::FlateDecode);
        xobj.width(w);
        xobj.height(h);
        xobj.color_space().device_rgb();
        xobj.bits_per_component(8);
        if let Some(mask_ref) = smask_ref {
            xobj.s_mask(mask_ref);
        }
        drop(xobj);

        self.image_xobjects.push((pdf_name.clone(), xobj_ref));
        self.image_names.insert(image.path.clone(), pdf_name.clone());
        pdf_name
    }

    /// Assemble catalog, page tree, annotations and resources; returns the PDF bytes.
    pub fn finish(mut self, title: &str) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);

        let current = std::mem::replace(&mut self.current, PageContent::new());
        let mut pages = std::mem::take(&mut self.finished_pages);
        pages.push(current);

        let n = pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();

        let page_annot_refs: Vec<Vec<Ref>> = pages
            .iter()
            .map(|page| {
                page.links
                    .iter()
                    .map(|link| {
                        let annot_ref = self.alloc();
                        let mut annot = self.pdf.annotation(annot_ref);
                        annot
                            .subtype(pdf_writer::types::AnnotationType::Link)
                            .rect(link.rect)
                            .border(0.0, 0.0, 0.0, None);
                        annot
                            .action()
                            .action_type(pdf_writer::types::ActionType::Uri)
                            .uri(Str(link.url.as_bytes()));
                        annot_ref
                    })
                    .collect()
            })
            .collect();

        for (i, page) in pages.into_iter().enumerate() {
            let raw = page.content.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            self.pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
        }

        self.pdf.catalog(catalog_id).pages(pages_id);
        self.pdf
            .pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        let font_pairs: Vec<(&[u8], Ref)> = self
            .fonts
            .iter()
            .map(|f| (f.font.pdf_name(), f.font_ref))
            .collect();

        for i in 0..n {
            let mut page = self.pdf.page(page_ids[i]);
            page.media_box(Rect::new(0.0, 0.0, self.page_width, self.page_height))
                .parent(pages_id)
                .contents(content_ids[i]);
            if !page_annot_refs[i].is_empty() {
                page.annotations(page_annot_refs[i].iter().copied());
            }
            let mut resources = page.resources();
            {
                let mut fonts = resources.fonts();
                for (name, font_ref) in &font_pairs {
                    fonts.pair(Name(*name), *font_ref);
                }
            }
            if !self.image_xobjects.is_empty() {
                let mut xobjects = resources.x_objects();
                for (name, xobj_ref) in &self.image_xobjects {
                    xobjects.pair(Name(name.as_bytes()), *xobj_ref);
                }
            }
        }

        let info_id = self.alloc();
        self.pdf
            .document_info(info_id)
            .title(TextStr(title))
            .producer(TextStr(concat!("reqif-pdf ", env!("CARGO_PKG_VERSION"))));

        self.pdf.finish()
    }
}

impl Canvas for PdfCanvas {
    fn draw_text(&mut self, x: f32, y: f32, text: &str, style: TextStyle) {
        self.show_text(x, y, text, style);
    }

    fn draw_image(
        &mut self,
        image: &RasterImage,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), Error> {
        let pdf_name = self.embed_image(image);
        let content = &mut self.current.content;
        content.save_state();
        content.transform([width, 0.0, 0.0, height, x, y]);
        content.x_object(Name(pdf_name.as_bytes()));
        content.restore_state();
        Ok(())
    }

    fn draw_link(&mut self, x: f32, y: f32, label: &str, target: &str, style: TextStyle) {
        let width = self
            .font(style.font)
            .map(|f| f.text_width(label, style.size))
            .unwrap_or(label.chars().count() as f32 * style.size * 0.5);

        self.current.content.save_state();
        self.current.content.set_fill_rgb(0.0, 0.0, 1.0);
        self.show_text(x, y, label, style);
        self.current.content.restore_state();

        self.current.links.push(LinkAnnotation {
            rect: Rect::new(x, y - 2.0, x + width, y + style.size),
            url: target.to_string(),
        });
    }

    fn new_page(&mut self) {
        let page = std::mem::replace(&mut self.current, PageContent::new());
        self.finished_pages.push(page);
    }
}

/// Lay out `doc` on a fresh PDF canvas and return the file bytes.
pub fn render(doc: &Document, options: &LayoutOptions) -> Result<(Vec<u8>, RenderReport), Error> {
    let t0 = std::time::Instant::now();
    let mut canvas = PdfCanvas::new(options.page_width, options.page_height);

    let report = layout_document(doc, options, &mut canvas)?;
    let t_layout = t0.elapsed();

    let title = doc.title.as_deref().unwrap_or(&options.title);
    let bytes = canvas.finish(title);
    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: layout={:.1}ms, assembly={:.1}ms ({} pages, {} images, {} links, {} missing assets)",
        t_layout.as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
        report.pages,
        report.images,
        report.links,
        report.missing_assets.len(),
    );

    Ok((bytes, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_emits_one_page_per_break_with_link_annotations() {
        let mut canvas = PdfCanvas::new(200.0, 300.0);
        let style = TextStyle {
            font: StandardFont::Helvetica,
            size: 10.0,
        };
        canvas.draw_text(20.0, 280.0, "first", style);
        canvas.new_page();
        canvas.draw_link(20.0, 280.0, "open", "attachment.bin", style);
        assert_eq!(canvas.page_count(), 2);

        let bytes = canvas.finish("Doc");
        let raw = String::from_utf8_lossy(&bytes);

        assert!(bytes.starts_with(b"%PDF-"));
        assert!(raw.contains("/Count 2"));
        assert!(raw.contains("/BaseFont /Helvetica-Bold"));
        assert!(raw.contains("/URI (attachment.bin)"));
        assert!(raw.contains("/Title (Doc)"));
    }
}

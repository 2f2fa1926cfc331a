mod config;
mod error;
mod fonts;
mod model;
mod pdf;
mod reqif;

pub use config::{ExtractOptions, LayoutOptions, MM, Options};
pub use error::Error;
pub use fonts::StandardFont;
pub use model::{
    ContentItem, Document, HierarchyNode, ObjectRepository, RequirementObject, SkippedNode,
    Specification, Traversal,
};
pub use pdf::{
    Canvas, PdfCanvas, RasterImage, RenderReport, TextStyle, fit_scale, layout_document, render,
    wrap_words,
};
pub use reqif::{Numbering, number_hierarchy, parse, parse_str};

use std::path::Path;
use std::time::Instant;

/// Summary of a successful conversion.
#[derive(Clone, Debug)]
pub struct Conversion {
    pub report: RenderReport,
    pub skipped: Vec<SkippedNode>,
}

pub fn convert_reqif_to_pdf(input: &Path, output: &Path) -> Result<Conversion, Error> {
    convert_reqif_to_pdf_with_options(input, output, &Options::default())
}

pub fn convert_reqif_to_pdf_with_options(
    input: &Path,
    output: &Path,
    options: &Options,
) -> Result<Conversion, Error> {
    let t0 = Instant::now();

    let doc = reqif::parse(input, &options.extract)?;
    let t_parse = t0.elapsed();

    let (bytes, report) = pdf::render(&doc, &options.layout)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(|e| {
        Error::Render(format!("cannot write {}: {e}", output.display()))
    })?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(Conversion {
        report,
        skipped: doc.skipped,
    })
}

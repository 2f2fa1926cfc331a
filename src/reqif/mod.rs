mod hierarchy;
mod objects;
mod xhtml;

use std::path::Path;

use roxmltree::Node;

use crate::config::ExtractOptions;
use crate::error::Error;
use crate::model::Document;

pub use hierarchy::{Numbering, number_hierarchy};

pub(crate) const REQIF_NS: &str = "http://www.omg.org/spec/ReqIF/20110401/reqif.xsd";

pub(crate) fn is_reqif(node: Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(REQIF_NS)
}

/// First child element `reqif:<name>`.
pub(crate) fn reqif<'a>(node: Node<'a, 'a>, name: &str) -> Option<Node<'a, 'a>> {
    node.children().find(|n| is_reqif(*n, name))
}

pub(crate) fn reqif_children<'a>(
    node: Node<'a, 'a>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'a>> + 'a {
    node.children().filter(move |n| is_reqif(*n, name))
}

/// First strict descendant `reqif:<name>` in document order.
pub(crate) fn reqif_descendant<'a>(node: Node<'a, 'a>, name: &str) -> Option<Node<'a, 'a>> {
    node.descendants().skip(1).find(|n| is_reqif(*n, name))
}

/// Read a `.reqif` file and extract the numbered requirement document.
pub fn parse(path: &Path, options: &ExtractOptions) -> Result<Document, Error> {
    let xml = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;

    let resolved = std::fs::canonicalize(path)?;
    let base_dir = resolved.parent().unwrap_or(Path::new("/"));
    log::info!("Parsing {}", path.display());

    parse_str(&xml, base_dir, options)
}

/// Extract a document from ReqIF text. Attachment references resolve against `base_dir`.
pub fn parse_str(xml: &str, base_dir: &Path, options: &ExtractOptions) -> Result<Document, Error> {
    let xml = xml.strip_prefix('\u{FEFF}').unwrap_or(xml);
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    let spec_objects = root
        .descendants()
        .find(|n| is_reqif(*n, "SPEC-OBJECTS"))
        .ok_or_else(|| Error::MalformedDocument("missing SPEC-OBJECTS".into()))?;
    let specifications = root
        .descendants()
        .find(|n| is_reqif(*n, "SPECIFICATIONS"))
        .ok_or_else(|| Error::MalformedDocument("missing SPECIFICATIONS".into()))?;

    let title = root
        .descendants()
        .find(|n| is_reqif(*n, "REQ-IF-HEADER"))
        .and_then(|header| reqif(header, "TITLE"))
        .and_then(|t| t.text())
        .map(xhtml::collapse_whitespace)
        .filter(|t| !t.is_empty());

    let mut objects = objects::extract_objects(spec_objects, base_dir, options)?;
    let specs = hierarchy::read_specifications(specifications);
    let Numbering { traversal, skipped } = number_hierarchy(&specs, &mut objects);

    log::info!(
        "Extracted {} objects, {} specifications, {} in hierarchy, {} skipped nodes",
        objects.len(),
        specs.len(),
        traversal.len(),
        skipped.len(),
    );

    Ok(Document {
        title,
        objects,
        traversal,
        skipped,
    })
}

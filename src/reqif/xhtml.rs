use std::path::{Component, Path, PathBuf};

use roxmltree::{Node, NodeType};

use crate::model::ContentItem;

/// Flatten an XHTML value (usually `THE-VALUE`) into text, image and object
/// items in document order.
///
/// Text between elements is whitespace-collapsed, trimmed and HTML-unescaped;
/// whitespace-only text is dropped. `<img src>` and `<object data>` emit a
/// reference resolved against `base_dir` and are then walked like any other
/// element.
pub(crate) fn flatten(node: Option<Node>, base_dir: &Path) -> Vec<ContentItem> {
    let mut items = Vec::new();
    if let Some(node) = node {
        walk(node, base_dir, &mut items);
    }
    items
}

fn walk(node: Node, base_dir: &Path, items: &mut Vec<ContentItem>) {
    // Adjacent text nodes (split by comments or PIs) form one run.
    let mut pending = String::new();

    for child in node.children() {
        match child.node_type() {
            NodeType::Text => pending.push_str(child.text().unwrap_or_default()),
            NodeType::Element => {
                push_text(&mut pending, items);
                match child.tag_name().name() {
                    "img" => {
                        if let Some(src) = child.attribute("src").filter(|s| !s.is_empty()) {
                            items.push(ContentItem::Image(resolve_asset(base_dir, src)));
                        }
                    }
                    "object" => {
                        if let Some(data) = child.attribute("data").filter(|s| !s.is_empty()) {
                            items.push(ContentItem::Object(resolve_asset(base_dir, data)));
                        }
                    }
                    _ => {}
                }
                walk(child, base_dir, items);
            }
            _ => {}
        }
    }

    push_text(&mut pending, items);
}

fn push_text(pending: &mut String, items: &mut Vec<ContentItem>) {
    if pending.is_empty() {
        return;
    }
    let collapsed = collapse_whitespace(pending);
    pending.clear();
    if !collapsed.is_empty() {
        items.push(ContentItem::Text(unescape_html(&collapsed)));
    }
}

/// Collapse whitespace runs to a single space and trim both ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve an attachment reference against the document directory, folding
/// `.` and `..` lexically so the file does not have to exist.
pub(crate) fn resolve_asset(base_dir: &Path, reference: &str) -> PathBuf {
    let joined = base_dir.join(reference);
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Decode HTML character references left over after XML parsing
/// (e.g. `&amp;nbsp;` in the source becomes `&nbsp;` here). Covers the full
/// HTML5 named set plus numeric references; unknown entities are kept verbatim.
pub(crate) fn unescape_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

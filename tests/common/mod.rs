#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const REQIF_NS: &str = "http://www.omg.org/spec/ReqIF/20110401/reqif.xsd";

/// One `SPEC-OBJECT` with an optional integer field and XHTML heading/body.
pub fn spec_object(id: &str, number: Option<&str>, heading: &str, body: &str) -> String {
    let integer = number
        .map(|n| {
            format!(
                r#"<ATTRIBUTE-VALUE-INTEGER THE-VALUE="{n}"><DEFINITION><ATTRIBUTE-DEFINITION-INTEGER-REF>_NUM</ATTRIBUTE-DEFINITION-INTEGER-REF></DEFINITION></ATTRIBUTE-VALUE-INTEGER>"#
            )
        })
        .unwrap_or_default();
    format!(
        r#"<SPEC-OBJECT IDENTIFIER="{id}" LAST-CHANGE="2024-01-01T00:00:00Z">
  <VALUES>
    {integer}
    <ATTRIBUTE-VALUE-XHTML>
      <DEFINITION><ATTRIBUTE-DEFINITION-XHTML-REF>_ReqIF.OBJECTHEADING</ATTRIBUTE-DEFINITION-XHTML-REF></DEFINITION>
      <THE-VALUE><xhtml:div>{heading}</xhtml:div></THE-VALUE>
    </ATTRIBUTE-VALUE-XHTML>
    <ATTRIBUTE-VALUE-XHTML>
      <DEFINITION><ATTRIBUTE-DEFINITION-XHTML-REF>_ReqIF.OBJECTTEXT</ATTRIBUTE-DEFINITION-XHTML-REF></DEFINITION>
      <THE-VALUE><xhtml:div>{body}</xhtml:div></THE-VALUE>
    </ATTRIBUTE-VALUE-XHTML>
  </VALUES>
</SPEC-OBJECT>"#
    )
}

/// One `SPEC-HIERARCHY` node referencing `object_ref`.
pub fn node(object_ref: &str, children: &[String]) -> String {
    let nested = if children.is_empty() {
        String::new()
    } else {
        format!("<CHILDREN>{}</CHILDREN>", children.concat())
    };
    format!(
        "<SPEC-HIERARCHY><OBJECT><SPEC-OBJECT-REF>{object_ref}</SPEC-OBJECT-REF></OBJECT>{nested}</SPEC-HIERARCHY>"
    )
}

/// A full ReqIF document with a single specification holding `roots`.
pub fn reqif(title: Option<&str>, objects: &[String], roots: &[String]) -> String {
    let title = title
        .map(|t| format!("<TITLE>{t}</TITLE>"))
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<REQ-IF xmlns="{REQIF_NS}" xmlns:xhtml="http://www.w3.org/1999/xhtml">
  <THE-HEADER><REQ-IF-HEADER IDENTIFIER="header">{title}</REQ-IF-HEADER></THE-HEADER>
  <CORE-CONTENT>
    <REQ-IF-CONTENT>
      <SPEC-OBJECTS>{}</SPEC-OBJECTS>
      <SPECIFICATIONS>
        <SPECIFICATION IDENTIFIER="spec-1" LONG-NAME="SRS">
          <CHILDREN>{}</CHILDREN>
        </SPECIFICATION>
      </SPECIFICATIONS>
    </REQ-IF-CONTENT>
  </CORE-CONTENT>
</REQ-IF>"#,
        objects.concat(),
        roots.concat(),
    )
}

pub fn write_fixture(dir: &Path, name: &str, xml: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, xml).expect("write fixture");
    path
}

pub fn write_png(path: &Path, w: u32, h: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create image dir");
    }
    image::RgbImage::from_pixel(w, h, image::Rgb([200, 40, 40]))
        .save(path)
        .expect("write png");
}

/// Inflate every FlateDecode stream in the PDF and concatenate the results
/// (lossy UTF-8), so content-stream operators can be searched as text.
pub fn inflated_streams(pdf: &[u8]) -> String {
    let mut out = String::new();
    let mut rest = pdf;
    while let Some(start) = find(rest, b"stream\n") {
        let body = &rest[start + b"stream\n".len()..];
        let Some(end) = find(body, b"\nendstream") else {
            break;
        };
        if let Ok(data) = miniz_oxide::inflate::decompress_to_vec_zlib(&body[..end]) {
            out.push_str(&String::from_utf8_lossy(&data));
            out.push('\n');
        }
        rest = &body[end + b"\nendstream".len()..];
    }
    out
}

/// Number of `/Type /Page` dictionaries (the page tree's `/Pages` excluded).
pub fn page_count(pdf: &[u8]) -> usize {
    let needle = b"/Type /Page";
    pdf.windows(needle.len() + 1)
        .filter(|w| &w[..needle.len()] == needle && w[needle.len()] != b's')
        .count()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

use std::path::Path;

use roxmltree::Node;

use crate::config::ExtractOptions;
use crate::error::Error;
use crate::model::{ContentItem, ObjectRepository, RequirementObject};

use super::xhtml::flatten;
use super::{is_reqif, reqif, reqif_children, reqif_descendant};

/// Build the repository from a `SPEC-OBJECTS` element.
pub(crate) fn extract_objects(
    spec_objects: Node,
    base_dir: &Path,
    options: &ExtractOptions,
) -> Result<ObjectRepository, Error> {
    let mut repo = ObjectRepository::new();

    for (idx, obj) in reqif_children(spec_objects, "SPEC-OBJECT").enumerate() {
        let identifier = obj.attribute("IDENTIFIER").ok_or_else(|| {
            Error::MalformedDocument(format!("SPEC-OBJECT #{} has no IDENTIFIER", idx + 1))
        })?;

        let integer_value = reqif_descendant(obj, "ATTRIBUTE-VALUE-INTEGER")
            .and_then(|n| n.attribute("THE-VALUE"));

        let heading = xhtml_attribute(obj, &options.heading_field, base_dir)
            .into_iter()
            .filter_map(|item| match item {
                ContentItem::Text(t) => Some(t),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        let object = RequirementObject {
            identifier: identifier.to_string(),
            display_code: display_code(integer_value, identifier, options),
            heading,
            content: xhtml_attribute(obj, &options.body_field, base_dir),
            level: 0,
            hierarchy_number: String::new(),
        };

        log::debug!(
            "object {identifier}: code={} heading={:?} items={}",
            object.display_code,
            object.heading,
            object.content.len()
        );

        if !repo.insert(object) {
            log::warn!("Duplicate SPEC-OBJECT identifier {identifier}; keeping the first definition");
        }
    }

    Ok(repo)
}

/// `REQ-000042` for an all-digit integer value, otherwise the raw identifier.
pub(crate) fn display_code(value: Option<&str>, identifier: &str, options: &ExtractOptions) -> String {
    match value {
        Some(v) if !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()) => {
            format!("{}{:0>width$}", options.code_prefix, v, width = options.code_width)
        }
        _ => identifier.to_string(),
    }
}

/// Flattened `THE-VALUE` of the first XHTML attribute whose definition
/// reference contains `field`. Empty when no such attribute exists.
fn xhtml_attribute(obj: Node, field: &str, base_dir: &Path) -> Vec<ContentItem> {
    let Some(values) = reqif(obj, "VALUES") else {
        return Vec::new();
    };

    values
        .children()
        .filter(|n| n.is_element())
        .find(|val| {
            reqif_descendant(*val, "ATTRIBUTE-DEFINITION-XHTML-REF")
                .and_then(|r| r.text())
                .is_some_and(|t| t.contains(field))
        })
        .map(|val| {
            let the_value = val.descendants().find(|n| is_reqif(*n, "THE-VALUE"));
            flatten(the_value, base_dir)
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::reqif::REQIF_NS;

    fn build(objects_xml: &str) -> Result<ObjectRepository, Error> {
        let xml = format!(
            r#"<SPEC-OBJECTS xmlns="{REQIF_NS}" xmlns:xhtml="http://www.w3.org/1999/xhtml">{objects_xml}</SPEC-OBJECTS>"#
        );
        let doc = roxmltree::Document::parse(&xml).expect("valid xml");
        extract_objects(doc.root_element(), Path::new("/data"), &ExtractOptions::default())
    }

    fn xhtml_value(field: &str, body: &str) -> String {
        format!(
            "<ATTRIBUTE-VALUE-XHTML>\
               <DEFINITION><ATTRIBUTE-DEFINITION-XHTML-REF>_{field}_DEF</ATTRIBUTE-DEFINITION-XHTML-REF></DEFINITION>\
               <THE-VALUE><xhtml:div>{body}</xhtml:div></THE-VALUE>\
             </ATTRIBUTE-VALUE-XHTML>"
        )
    }

    #[test]
    fn builds_object_with_code_heading_and_content() {
        let repo = build(&format!(
            r#"<SPEC-OBJECT IDENTIFIER="obj-1"><VALUES>
                 <ATTRIBUTE-VALUE-INTEGER THE-VALUE="42"/>
                 {}
                 {}
               </VALUES></SPEC-OBJECT>"#,
            xhtml_value("OBJECTHEADING", "Scope <xhtml:img src=\"h.png\"/> of <xhtml:b>work</xhtml:b>"),
            xhtml_value("OBJECTTEXT", "Body <xhtml:img src=\"pics/a.png\"/> tail"),
        ))
        .expect("repository");

        let obj = repo.get("obj-1").expect("object present");
        assert_eq!(obj.display_code, "REQ-000042");
        assert_eq!(obj.heading, "Scope of work");
        assert_eq!(
            obj.content,
            vec![
                ContentItem::Text("Body".into()),
                ContentItem::Image(PathBuf::from("/data/pics/a.png")),
                ContentItem::Text("tail".into()),
            ]
        );
        assert_eq!(obj.level, 0);
        assert!(!obj.is_numbered());
    }

    #[test]
    fn missing_fields_yield_empty_heading_and_content() {
        let repo = build(r#"<SPEC-OBJECT IDENTIFIER="bare"/>"#).expect("repository");
        let obj = repo.get("bare").expect("object present");
        assert_eq!(obj.display_code, "bare");
        assert!(obj.heading.is_empty());
        assert!(obj.content.is_empty());
    }

    #[test]
    fn missing_identifier_is_malformed() {
        let err = build("<SPEC-OBJECT/>").unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn first_definition_of_an_identifier_wins() {
        let repo = build(&format!(
            r#"<SPEC-OBJECT IDENTIFIER="dup"><VALUES>{}</VALUES></SPEC-OBJECT>
               <SPEC-OBJECT IDENTIFIER="dup"><VALUES>{}</VALUES></SPEC-OBJECT>"#,
            xhtml_value("OBJECTHEADING", "first"),
            xhtml_value("OBJECTHEADING", "second"),
        ))
        .expect("repository");
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get("dup").map(|o| o.heading.as_str()), Some("first"));
    }

    #[test]
    fn display_code_formatting() {
        let opts = ExtractOptions::default();
        assert_eq!(display_code(Some("42"), "id", &opts), "REQ-000042");
        assert_eq!(display_code(Some("1234567"), "id", &opts), "REQ-1234567");
        assert_eq!(display_code(Some("-3"), "id", &opts), "id");
        assert_eq!(display_code(Some("4a"), "id", &opts), "id");
        assert_eq!(display_code(Some(""), "id", &opts), "id");
        assert_eq!(display_code(None, "id", &opts), "id");
    }
}

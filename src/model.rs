use std::collections::HashMap;
use std::path::PathBuf;

/// One piece of flattened XHTML content, in document order.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentItem {
    Text(String),
    /// Absolute path of an `<img src>` target.
    Image(PathBuf),
    /// Absolute path of an `<object data>` target (OLE attachment etc).
    Object(PathBuf),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RequirementObject {
    pub identifier: String,
    /// `REQ-000042` style code, or the raw identifier when no integer field exists.
    pub display_code: String,
    pub heading: String,
    pub content: Vec<ContentItem>,
    pub level: usize,
    /// Dotted outline number such as `2.1.3`. Empty until numbered.
    pub hierarchy_number: String,
}

impl RequirementObject {
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            display_code: identifier.clone(),
            identifier,
            heading: String::new(),
            content: Vec::new(),
            level: 0,
            hierarchy_number: String::new(),
        }
    }

    pub fn is_numbered(&self) -> bool {
        !self.hierarchy_number.is_empty()
    }
}

/// Identifier → requirement object lookup, built once per run.
#[derive(Clone, Debug, Default)]
pub struct ObjectRepository {
    objects: HashMap<String, RequirementObject>,
}

impl ObjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an object unless its identifier is already present.
    /// Returns false when the identifier was taken.
    pub fn insert(&mut self, object: RequirementObject) -> bool {
        if self.objects.contains_key(&object.identifier) {
            return false;
        }
        self.objects.insert(object.identifier.clone(), object);
        true
    }

    pub fn get(&self, identifier: &str) -> Option<&RequirementObject> {
        self.objects.get(identifier)
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut RequirementObject> {
        self.objects.get_mut(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.objects.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequirementObject> {
        self.objects.values()
    }
}

impl FromIterator<RequirementObject> for ObjectRepository {
    fn from_iter<I: IntoIterator<Item = RequirementObject>>(iter: I) -> Self {
        let mut repo = ObjectRepository::new();
        for object in iter {
            repo.insert(object);
        }
        repo
    }
}

/// A `SPEC-HIERARCHY` node: a reference to an object plus nested children.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HierarchyNode {
    /// Text of `OBJECT/SPEC-OBJECT-REF`; `None` when the node has no reference.
    pub object_ref: Option<String>,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn leaf(object_ref: impl Into<String>) -> Self {
        Self {
            object_ref: Some(object_ref.into()),
            children: Vec::new(),
        }
    }

    pub fn with_children(object_ref: impl Into<String>, children: Vec<HierarchyNode>) -> Self {
        Self {
            object_ref: Some(object_ref.into()),
            children,
        }
    }
}

/// One `SPECIFICATION`: a root of the hierarchy forest.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Specification {
    pub identifier: Option<String>,
    pub long_name: Option<String>,
    pub children: Vec<HierarchyNode>,
}

impl Specification {
    /// Name for log lines: `LONG-NAME`, else `IDENTIFIER`, else a placeholder.
    pub fn label(&self) -> &str {
        self.long_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.identifier.as_deref())
            .unwrap_or("<unnamed specification>")
    }
}

/// Pre-order list of identifiers to render. Never contains duplicates, and
/// every entry resolves in the repository it was built against.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Traversal {
    identifiers: Vec<String>,
}

impl Traversal {
    pub(crate) fn push(&mut self, identifier: String) {
        self.identifiers.push(identifier);
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.iter().any(|id| id == identifier)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(String::as_str)
    }
}

/// Hierarchy nodes that did not produce output.
#[derive(Clone, Debug, PartialEq)]
pub enum SkippedNode {
    /// The node's reference is absent or names no known object.
    Unresolved {
        hierarchy_number: String,
        object_ref: Option<String>,
    },
    /// The object was already placed earlier in the traversal.
    Duplicate {
        hierarchy_number: String,
        identifier: String,
    },
}

/// Fully extracted document, ready for layout.
#[derive(Clone, Debug, Default)]
pub struct Document {
    pub title: Option<String>,
    pub objects: ObjectRepository,
    pub traversal: Traversal,
    pub skipped: Vec<SkippedNode>,
}

impl Document {
    /// Objects in traversal order.
    pub fn ordered_objects(&self) -> impl Iterator<Item = &RequirementObject> {
        self.traversal.iter().filter_map(|id| self.objects.get(id))
    }
}

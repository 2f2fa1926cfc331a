use std::collections::HashSet;

use roxmltree::Node;

use crate::model::{HierarchyNode, ObjectRepository, SkippedNode, Specification, Traversal};

use super::{reqif, reqif_children};

/// Read every `SPECIFICATION` below a `SPECIFICATIONS` element.
pub(crate) fn read_specifications(specifications: Node) -> Vec<Specification> {
    reqif_children(specifications, "SPECIFICATION")
        .map(|spec| Specification {
            identifier: spec.attribute("IDENTIFIER").map(str::to_string),
            long_name: spec.attribute("LONG-NAME").map(str::to_string),
            children: reqif(spec, "CHILDREN").map(read_nodes).unwrap_or_default(),
        })
        .collect()
}

fn read_nodes(children: Node) -> Vec<HierarchyNode> {
    reqif_children(children, "SPEC-HIERARCHY")
        .map(|sh| HierarchyNode {
            object_ref: reqif(sh, "OBJECT")
                .and_then(|o| reqif(o, "SPEC-OBJECT-REF"))
                .and_then(|r| r.text())
                .map(|t| t.trim().to_string()),
            children: reqif(sh, "CHILDREN").map(read_nodes).unwrap_or_default(),
        })
        .collect()
}

/// Result of numbering a hierarchy forest.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Numbering {
    pub traversal: Traversal,
    pub skipped: Vec<SkippedNode>,
}

/// Assign levels and dotted numbers to every referenced object and collect
/// the pre-order traversal.
///
/// Each specification restarts its top-level count at 1. Every node consumes a
/// sibling index, including unresolved ones, and the children of an
/// unresolved node are still numbered beneath its number.
pub fn number_hierarchy(specs: &[Specification], repo: &mut ObjectRepository) -> Numbering {
    let mut walker = Walker {
        repo,
        seen: HashSet::new(),
        numbering: Numbering::default(),
        spec: "",
    };
    for spec in specs {
        log::debug!("Numbering specification {}", spec.label());
        walker.spec = spec.label();
        walker.walk(&spec.children, &[], 0);
    }
    walker.numbering
}

struct Walker<'a> {
    repo: &'a mut ObjectRepository,
    seen: HashSet<String>,
    numbering: Numbering,
    /// Label of the specification being walked.
    spec: &'a str,
}

impl Walker<'_> {
    fn walk(&mut self, nodes: &[HierarchyNode], parent_path: &[usize], depth: usize) {
        for (idx, node) in nodes.iter().enumerate() {
            let mut path = parent_path.to_vec();
            path.push(idx + 1);
            let number = format_number(&path);

            self.place(node, &number, depth);

            if !node.children.is_empty() {
                self.walk(&node.children, &path, depth + 1);
            }
        }
    }

    fn place(&mut self, node: &HierarchyNode, number: &str, depth: usize) {
        let resolved = node
            .object_ref
            .as_deref()
            .and_then(|id| self.repo.get_mut(id).map(|obj| (id, obj)));

        let Some((id, obj)) = resolved else {
            log::warn!(
                "Unresolved SPEC-OBJECT-REF {:?} at {number} in {}",
                node.object_ref.as_deref().unwrap_or("<none>"),
                self.spec
            );
            self.numbering.skipped.push(SkippedNode::Unresolved {
                hierarchy_number: number.to_string(),
                object_ref: node.object_ref.clone(),
            });
            return;
        };

        if self.seen.contains(id) {
            log::warn!(
                "{id} referenced again at {number} in {}; keeping {}",
                self.spec,
                obj.hierarchy_number
            );
            self.numbering.skipped.push(SkippedNode::Duplicate {
                hierarchy_number: number.to_string(),
                identifier: id.to_string(),
            });
            return;
        }

        obj.level = depth;
        obj.hierarchy_number = number.to_string();
        self.seen.insert(id.to_string());
        self.numbering.traversal.push(id.to_string());
    }
}

fn format_number(path: &[usize]) -> String {
    path.iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

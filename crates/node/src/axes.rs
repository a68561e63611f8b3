//! Pure functions that collect the nodes along each axis.

use crate::node::{NodeKind, XdmNode};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Child,
    Descendant,
    Attribute,
    SelfAxis,
    DescendantOrSelf,
    FollowingSibling,
    Following,
    Namespace,
    Parent,
    Ancestor,
    PrecedingSibling,
    Preceding,
    AncestorOrSelf,
}

impl Axis {
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Parent
                | Axis::Ancestor
                | Axis::PrecedingSibling
                | Axis::Preceding
                | Axis::AncestorOrSelf
        )
    }

    /// The kind a `*` or plain name test selects on this axis.
    pub fn principal_node_kind(self) -> NodeKind {
        match self {
            Axis::Attribute => NodeKind::Attribute,
            Axis::Namespace => NodeKind::Namespace,
            _ => NodeKind::Element,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Child => "child",
            Axis::Descendant => "descendant",
            Axis::Attribute => "attribute",
            Axis::SelfAxis => "self",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::FollowingSibling => "following-sibling",
            Axis::Following => "following",
            Axis::Namespace => "namespace",
            Axis::Parent => "parent",
            Axis::Ancestor => "ancestor",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::Preceding => "preceding",
            Axis::AncestorOrSelf => "ancestor-or-self",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn collect<'a, N: XdmNode<'a>>(node: N, axis: Axis) -> Vec<N> {
    let mut results = Vec::new();
    match axis {
        Axis::Child => results.extend(node.children()),
        Axis::Descendant => collect_descendants(node, &mut results),
        Axis::Attribute => results.extend(node.attributes()),
        Axis::SelfAxis => results.push(node),
        Axis::DescendantOrSelf => {
            results.push(node);
            collect_descendants(node, &mut results);
        }
        Axis::FollowingSibling => collect_following_siblings(node, &mut results),
        Axis::Following => collect_following(node, &mut results),
        Axis::Namespace => results.extend(node.namespaces()),
        Axis::Parent => results.extend(node.parent()),
        Axis::Ancestor => collect_ancestors(node, &mut results),
        Axis::PrecedingSibling => collect_preceding_siblings(node, &mut results),
        Axis::Preceding => collect_preceding(node, &mut results),
        Axis::AncestorOrSelf => {
            results.push(node);
            collect_ancestors(node, &mut results);
        }
    }
    results
}

fn is_attached<'a, N: XdmNode<'a>>(node: N) -> bool {
    !matches!(node.kind(), NodeKind::Attribute | NodeKind::Namespace)
}

/// Pre-order walk, so descendants come out in document order.
fn collect_descendants<'a, N: XdmNode<'a>>(node: N, results: &mut Vec<N>) {
    for child in node.children() {
        results.push(child);
        collect_descendants(child, results);
    }
}

fn collect_ancestors<'a, N: XdmNode<'a>>(node: N, results: &mut Vec<N>) {
    let mut current = node.parent();
    while let Some(parent) = current {
        results.push(parent);
        current = parent.parent();
    }
}

fn collect_following_siblings<'a, N: XdmNode<'a>>(node: N, results: &mut Vec<N>) {
    if !is_attached(node) {
        return;
    }
    if let Some(parent) = node.parent() {
        results.extend(parent.children().skip_while(|sibling| *sibling != node).skip(1));
    }
}

fn collect_preceding_siblings<'a, N: XdmNode<'a>>(node: N, results: &mut Vec<N>) {
    if !is_attached(node) {
        return;
    }
    if let Some(parent) = node.parent() {
        let mut before: Vec<N> = parent.children().take_while(|sibling| *sibling != node).collect();
        before.reverse();
        results.extend(before);
    }
}

fn collect_following<'a, N: XdmNode<'a>>(node: N, results: &mut Vec<N>) {
    let mut current = node;
    if !is_attached(node) {
        // Everything below the owning element follows its attributes.
        match node.parent() {
            Some(owner) => {
                collect_descendants(owner, results);
                current = owner;
            }
            None => return,
        }
    }
    loop {
        let Some(parent) = current.parent() else {
            break;
        };
        for sibling in parent.children().skip_while(|s| *s != current).skip(1) {
            results.push(sibling);
            collect_descendants(sibling, results);
        }
        current = parent;
    }
}

fn collect_preceding<'a, N: XdmNode<'a>>(node: N, results: &mut Vec<N>) {
    let mut current = node;
    if !is_attached(node) {
        match node.parent() {
            Some(owner) => current = owner,
            None => return,
        }
    }
    loop {
        let Some(parent) = current.parent() else {
            break;
        };
        let before: Vec<N> = parent.children().take_while(|s| *s != current).collect();
        for sibling in before.into_iter().rev() {
            let mut subtree = Vec::new();
            collect_descendants(sibling, &mut subtree);
            results.extend(subtree.into_iter().rev());
            results.push(sibling);
        }
        current = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_library;

    fn names<'a, N: XdmNode<'a>>(nodes: &[N]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| match n.name() {
                Some(name) => name.to_string(),
                None => format!("#{:?}", n.kind()),
            })
            .collect()
    }

    #[test]
    fn test_child_axis() {
        let tree = sample_library();
        let library = tree.elements_named("library")[0];
        assert_eq!(
            names(&library.axis(Axis::Child)),
            vec!["book", "#Comment", "book", "render", "magazine"]
        );
    }

    #[test]
    fn test_descendant_axis_is_document_order() {
        let tree = sample_library();
        let doc = tree.document();
        let descendants = doc.axis(Axis::Descendant);
        let mut sorted = descendants.clone();
        sorted.sort();
        assert_eq!(descendants, sorted);
        assert!(descendants.iter().all(|n| n.kind() != NodeKind::Attribute));
    }

    #[test]
    fn test_ancestor_axis_is_nearest_first() {
        let tree = sample_library();
        let title = tree.elements_named("title")[0];
        assert_eq!(
            names(&title.axis(Axis::Ancestor)),
            vec!["book", "library", "#Document"]
        );
        assert!(Axis::Ancestor.is_reverse());
    }

    #[test]
    fn test_sibling_axes() {
        let tree = sample_library();
        let books = tree.elements_named("book");
        assert_eq!(
            names(&books[1].axis(Axis::PrecedingSibling)),
            vec!["#Comment", "book"]
        );
        assert_eq!(
            names(&books[1].axis(Axis::FollowingSibling)),
            vec!["render", "magazine"]
        );
    }

    #[test]
    fn test_attribute_has_no_siblings() {
        let tree = sample_library();
        let id = tree.elements_named("book")[0].attributes().next().unwrap();
        assert!(id.axis(Axis::FollowingSibling).is_empty());
        assert!(id.axis(Axis::PrecedingSibling).is_empty());
        assert_eq!(names(&id.axis(Axis::Parent)), vec!["book"]);
    }

    #[test]
    fn test_following_of_attribute_includes_owner_content() {
        let tree = sample_library();
        let book = tree.elements_named("book")[0];
        let id = book.attributes().next().unwrap();
        let following = id.axis(Axis::Following);
        let title = tree.elements_named("title")[0];
        assert_eq!(following.first().copied(), Some(title));
        let mut sorted = following.clone();
        sorted.sort();
        assert_eq!(following, sorted);
    }

    #[test]
    fn test_preceding_excludes_ancestors() {
        let tree = sample_library();
        let magazine = tree.elements_named("magazine")[0];
        let preceding = magazine.axis(Axis::Preceding);
        let library = tree.elements_named("library")[0];
        assert!(!preceding.contains(&library));
        assert_eq!(names(&preceding[..1]), vec!["render"]);
        let mut reversed = preceding.clone();
        reversed.sort_by(|a, b| b.cmp(a));
        assert_eq!(preceding, reversed);
    }

    #[test]
    fn test_root() {
        let tree = sample_library();
        let title = tree.elements_named("title")[2];
        assert_eq!(title.root(), tree.document());
    }
}

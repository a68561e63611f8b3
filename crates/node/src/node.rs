//! Defines the contract for a read-only node in a document-like tree.
use crate::axes::{self, Axis};
use std::fmt;
use std::hash::Hash;

/// A node name as exposed by the tree, borrowed from the underlying document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeName<'a> {
    pub prefix: Option<&'a str>,
    pub local_part: &'a str,
}

impl<'a> NodeName<'a> {
    pub fn new(prefix: Option<&'a str>, local_part: &'a str) -> Self {
        Self { prefix, local_part }
    }
}

impl fmt::Display for NodeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local_part),
            None => f.write_str(self.local_part),
        }
    }
}

/// The seven node kinds of the XDM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
    Namespace,
}

impl NodeKind {
    /// The kind-test spelling used in diagnostics, e.g. `element()`.
    pub fn test_name(self) -> &'static str {
        match self {
            NodeKind::Document => "document-node()",
            NodeKind::Element => "element()",
            NodeKind::Attribute => "attribute()",
            NodeKind::Text => "text()",
            NodeKind::Comment => "comment()",
            NodeKind::ProcessingInstruction => "processing-instruction()",
            NodeKind::Namespace => "namespace-node()",
        }
    }
}

/// A node the evaluator can navigate.
///
/// Implementations are cheap handles (`Copy`) into a tree that outlives `'a`.
/// Equality and hashing are node identity; `Ord` must be total document order,
/// with an element's namespace and attribute nodes ordered after the element
/// itself and before its children.
pub trait XdmNode<'a>: fmt::Debug + Copy + Eq + Hash + Ord + 'a {
    fn kind(&self) -> NodeKind;

    /// Element, attribute and namespace nodes have names; for a processing
    /// instruction this is its target. Everything else returns `None`.
    fn name(&self) -> Option<NodeName<'a>>;

    /// The XDM string value. For elements and documents this is the
    /// concatenation of all descendant text nodes.
    fn string_value(&self) -> String;

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// Attribute and namespace nodes report their owning element as parent.
    fn parent(&self) -> Option<Self>;

    /// In-scope namespace nodes. Trees without namespace support keep the default.
    fn namespaces(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        Box::new(std::iter::empty())
    }

    /// The topmost ancestor-or-self of this node.
    fn root(&self) -> Self {
        let mut current = *self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Nodes reachable along `axis`, in proximity order: document order for
    /// forward axes, nearest-first for reverse axes.
    fn axis(&self, axis: Axis) -> Vec<Self> {
        axes::collect(*self, axis)
    }
}

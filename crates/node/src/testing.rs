//! An in-memory tree for tests in this and downstream crates.
//!
//! Nodes are appended through [`TreeBuilder`]; document order is fixed when the
//! tree is built, so attributes may be added after children.
use crate::node::{NodeKind, NodeName, XdmNode};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    prefix: Option<String>,
    local: String,
    value: String,
    parent: Option<usize>,
    children: Vec<usize>,
    attributes: Vec<usize>,
    namespaces: Vec<usize>,
    order: usize,
}

#[derive(Debug, Clone)]
pub struct TestTree {
    nodes: Vec<NodeData>,
}

/// A handle into a [`TestTree`]. Identity is the node id.
#[derive(Debug, Clone, Copy)]
pub struct TestNode<'t> {
    pub id: usize,
    pub tree: &'t TestTree,
}

impl PartialEq for TestNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for TestNode<'_> {}

impl PartialOrd for TestNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for TestNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.data().order.cmp(&other.data().order)
    }
}

impl Hash for TestNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<'t> TestNode<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id]
    }

    fn handles(&self, ids: &'t [usize]) -> Box<dyn Iterator<Item = Self> + 't> {
        let tree = self.tree;
        Box::new(ids.iter().map(move |&id| TestNode { id, tree }))
    }
}

impl<'t> XdmNode<'t> for TestNode<'t> {
    fn kind(&self) -> NodeKind {
        self.data().kind
    }

    fn name(&self) -> Option<NodeName<'t>> {
        let data = self.data();
        match data.kind {
            NodeKind::Element
            | NodeKind::Attribute
            | NodeKind::Namespace
            | NodeKind::ProcessingInstruction => {
                Some(NodeName::new(data.prefix.as_deref(), &data.local))
            }
            _ => None,
        }
    }

    fn string_value(&self) -> String {
        let data = self.data();
        match data.kind {
            NodeKind::Document | NodeKind::Element => {
                let mut out = String::new();
                self.tree.append_text(self.id, &mut out);
                out
            }
            _ => data.value.clone(),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 't> {
        self.handles(&self.data().attributes)
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 't> {
        self.handles(&self.data().children)
    }

    fn parent(&self) -> Option<Self> {
        self.data().parent.map(|id| TestNode {
            id,
            tree: self.tree,
        })
    }

    fn namespaces(&self) -> Box<dyn Iterator<Item = Self> + 't> {
        self.handles(&self.data().namespaces)
    }
}

impl TestTree {
    pub fn node(&self, id: usize) -> TestNode<'_> {
        TestNode { id, tree: self }
    }

    pub fn document(&self) -> TestNode<'_> {
        self.node(0)
    }

    /// All elements with the given local name, in document order.
    pub fn elements_named(&self, local: &str) -> Vec<TestNode<'_>> {
        let mut found: Vec<TestNode<'_>> = (0..self.nodes.len())
            .filter(|&id| {
                let data = &self.nodes[id];
                data.kind == NodeKind::Element && data.local == local
            })
            .map(|id| self.node(id))
            .collect();
        found.sort();
        found
    }

    fn append_text(&self, id: usize, out: &mut String) {
        for &child in &self.nodes[id].children {
            let data = &self.nodes[child];
            match data.kind {
                NodeKind::Text => out.push_str(&data.value),
                NodeKind::Element => self.append_text(child, out),
                _ => {}
            }
        }
    }
}

/// Appends nodes to a tree rooted at node 0, a document node unless built
/// with [`TreeBuilder::fragment`].
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        let mut builder = Self { nodes: Vec::new() };
        builder.push(NodeKind::Document, None, "", "", None);
        builder
    }

    /// A parentless element tree with no document node above it.
    pub fn fragment(root_name: &str) -> Self {
        let mut builder = Self { nodes: Vec::new() };
        let (prefix, local) = split_name(root_name);
        builder.push(NodeKind::Element, prefix, local, "", None);
        builder
    }

    pub fn root(&self) -> usize {
        0
    }

    /// Adds an element; `name` may carry a `prefix:`.
    pub fn element(&mut self, parent: usize, name: &str) -> usize {
        let (prefix, local) = split_name(name);
        let id = self.push(NodeKind::Element, prefix, local, "", Some(parent));
        self.nodes[parent].children.push(id);
        id
    }

    pub fn attribute(&mut self, owner: usize, name: &str, value: &str) -> usize {
        let (prefix, local) = split_name(name);
        let id = self.push(NodeKind::Attribute, prefix, local, value, Some(owner));
        self.nodes[owner].attributes.push(id);
        id
    }

    pub fn namespace(&mut self, owner: usize, prefix: &str, uri: &str) -> usize {
        let id = self.push(NodeKind::Namespace, None, prefix, uri, Some(owner));
        self.nodes[owner].namespaces.push(id);
        id
    }

    pub fn text(&mut self, parent: usize, content: &str) -> usize {
        self.leaf(parent, NodeKind::Text, "", content)
    }

    pub fn comment(&mut self, parent: usize, content: &str) -> usize {
        self.leaf(parent, NodeKind::Comment, "", content)
    }

    pub fn processing_instruction(&mut self, parent: usize, target: &str, content: &str) -> usize {
        self.leaf(parent, NodeKind::ProcessingInstruction, target, content)
    }

    /// Convenience for `<name>text</name>`.
    pub fn text_element(&mut self, parent: usize, name: &str, content: &str) -> usize {
        let id = self.element(parent, name);
        self.text(id, content);
        id
    }

    pub fn build(mut self) -> TestTree {
        let mut next = 0;
        assign_order(&mut self.nodes, 0, &mut next);
        TestTree { nodes: self.nodes }
    }

    fn leaf(&mut self, parent: usize, kind: NodeKind, local: &str, value: &str) -> usize {
        let id = self.push(kind, None, local, value, Some(parent));
        self.nodes[parent].children.push(id);
        id
    }

    fn push(
        &mut self,
        kind: NodeKind,
        prefix: Option<&str>,
        local: &str,
        value: &str,
        parent: Option<usize>,
    ) -> usize {
        self.nodes.push(NodeData {
            kind,
            prefix: prefix.map(str::to_string),
            local: local.to_string(),
            value: value.to_string(),
            parent,
            children: Vec::new(),
            attributes: Vec::new(),
            namespaces: Vec::new(),
            order: 0,
        });
        self.nodes.len() - 1
    }
}

fn split_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

fn assign_order(nodes: &mut [NodeData], id: usize, next: &mut usize) {
    nodes[id].order = *next;
    *next += 1;
    let owned: Vec<usize> = nodes[id]
        .namespaces
        .iter()
        .chain(&nodes[id].attributes)
        .copied()
        .collect();
    for attached in owned {
        nodes[attached].order = *next;
        *next += 1;
    }
    let children = nodes[id].children.clone();
    for child in children {
        assign_order(nodes, child, next);
    }
}

/// ```text
/// <library>
///   <book id="b1" lang="en"><title>Dune</title><price>9.5</price></book>
///   <!-- featured -->
///   <book id="b2"><title>Emma</title><price>4</price></book>
///   <?render mode?>
///   <magazine id="m1"><title>Wired</title></magazine>
/// </library>
/// ```
pub fn sample_library() -> TestTree {
    let mut b = TreeBuilder::new();
    let library = b.element(b.root(), "library");

    let dune = b.element(library, "book");
    b.text_element(dune, "title", "Dune");
    b.text_element(dune, "price", "9.5");
    // Attributes added late still order before the children.
    b.attribute(dune, "id", "b1");
    b.attribute(dune, "lang", "en");

    b.comment(library, " featured ");

    let emma = b.element(library, "book");
    b.attribute(emma, "id", "b2");
    b.text_element(emma, "title", "Emma");
    b.text_element(emma, "price", "4");

    b.processing_instruction(library, "render", "mode");

    let wired = b.element(library, "magazine");
    b.attribute(wired, "id", "m1");
    b.text_element(wired, "title", "Wired");

    b.build()
}

//! roxmltree-backed node model and evaluation helpers shared by the
//! integration tests.
#![allow(dead_code)]

use roxmltree::{Node, NodeType};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use xpath2::{
    EvaluationConfig, EvaluationContext, Expr, FunctionLibrary, NodeKind, NodeName, XPathError,
    XdmNode, XdmValue, evaluate,
};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A node of a parsed document. roxmltree stores attributes as data on their
/// element, so they are addressed by owner and index.
#[derive(Debug, Clone, Copy)]
pub enum XmlNode<'a> {
    Tree(Node<'a, 'a>),
    Attribute { owner: Node<'a, 'a>, index: usize },
}

impl<'a> XmlNode<'a> {
    pub fn document(doc: &'a roxmltree::Document<'a>) -> Self {
        XmlNode::Tree(doc.root())
    }

    /// Position key: owner id, then 0 for the node itself or 1 + index for
    /// its attributes.
    fn order_key(&self) -> (u32, usize) {
        match self {
            XmlNode::Tree(node) => (node.id().get(), 0),
            XmlNode::Attribute { owner, index } => (owner.id().get(), index + 1),
        }
    }
}

impl PartialEq for XmlNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.order_key() == other.order_key()
    }
}

impl Eq for XmlNode<'_> {}

impl PartialOrd for XmlNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Node ids are assigned in document order and an element's attributes sit
// between the element and its first child, so comparing keys is enough.
impl Ord for XmlNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

impl Hash for XmlNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.order_key().hash(state);
    }
}

impl<'a> XdmNode<'a> for XmlNode<'a> {
    fn kind(&self) -> NodeKind {
        match self {
            XmlNode::Tree(node) => match node.node_type() {
                NodeType::Root => NodeKind::Document,
                NodeType::Element => NodeKind::Element,
                NodeType::PI => NodeKind::ProcessingInstruction,
                NodeType::Comment => NodeKind::Comment,
                NodeType::Text => NodeKind::Text,
            },
            XmlNode::Attribute { .. } => NodeKind::Attribute,
        }
    }

    fn name(&self) -> Option<NodeName<'a>> {
        match self {
            XmlNode::Tree(node) if node.is_element() => {
                Some(NodeName::new(None, node.tag_name().name()))
            }
            XmlNode::Tree(node) => node.pi().map(|pi| NodeName::new(None, pi.target)),
            XmlNode::Attribute { owner, index } => owner.attributes().nth(*index).map(|attr| {
                let prefix = (attr.namespace() == Some(XML_NAMESPACE)).then_some("xml");
                NodeName::new(prefix, attr.name())
            }),
        }
    }

    fn string_value(&self) -> String {
        match self {
            XmlNode::Tree(node) => match node.node_type() {
                NodeType::Root | NodeType::Element => node
                    .descendants()
                    .filter(|n| n.is_text())
                    .filter_map(|n| n.text())
                    .collect(),
                NodeType::PI => node
                    .pi()
                    .and_then(|pi| pi.value)
                    .unwrap_or_default()
                    .to_string(),
                NodeType::Text | NodeType::Comment => node.text().unwrap_or_default().to_string(),
            },
            XmlNode::Attribute { owner, index } => owner
                .attributes()
                .nth(*index)
                .map(|attr| attr.value().to_string())
                .unwrap_or_default(),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match *self {
            XmlNode::Tree(owner) if owner.is_element() => {
                let count = owner.attributes().len();
                Box::new((0..count).map(move |index| XmlNode::Attribute { owner, index }))
            }
            _ => Box::new(std::iter::empty()),
        }
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match *self {
            XmlNode::Tree(node) => Box::new(node.children().map(XmlNode::Tree)),
            XmlNode::Attribute { .. } => Box::new(std::iter::empty()),
        }
    }

    fn parent(&self) -> Option<Self> {
        match *self {
            XmlNode::Tree(node) => node.parent().map(XmlNode::Tree),
            XmlNode::Attribute { owner, .. } => Some(XmlNode::Tree(owner)),
        }
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub const CATALOG: &str = r#"<?xml version="1.0"?>
<catalog>
  <section name="fiction">
    <book id="b1" year="1965"><title>Dune</title><price>9.50</price></book>
    <book id="b2" year="1815"><title>Emma</title><price>4</price></book>
  </section>
  <!-- archive -->
  <section name="reference">
    <book id="b3" year="2001"><title>Atlas</title><price>30</price></book>
  </section>
  <?render compact?>
</catalog>"#;

/// Evaluates `expr` with the document node of `xml` as context item.
pub fn eval_xml(xml: &str, expr: &Expr) -> Result<Vec<String>, XPathError> {
    let doc = roxmltree::Document::parse(xml).expect("test document parses");
    let functions = FunctionLibrary::standard();
    let config = EvaluationConfig::default();
    let ctx = EvaluationContext::new(&functions, &config).with_context_node(XmlNode::document(&doc));
    let value: XdmValue<XmlNode> = evaluate(expr, &ctx)?;
    Ok(value.iter().map(|item| item.string_value()).collect())
}

/// Evaluates an expression that does not touch a document.
pub fn eval_atomic(expr: &Expr) -> Result<XdmValue<XmlNode<'static>>, XPathError> {
    let functions = FunctionLibrary::standard();
    let config = EvaluationConfig::default();
    let ctx = EvaluationContext::new(&functions, &config);
    evaluate(expr, &ctx)
}

//! Item types, sequence types and the `instance of` / `treat as` checks.
use super::{AtomicType, XdmItem, XdmValue};
use crate::error::{Result, XPathError};
use crate::qname::QName;
use std::fmt;
use xpath2_node::{NodeKind, XdmNode};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KindTest {
    AnyNode,
    /// `document-node()`, optionally constrained by an element or
    /// schema-element test on the document element.
    Document(Option<Box<KindTest>>),
    /// `element(name?, type?)`. A `None` name is the `*` wildcard.
    Element {
        name: Option<QName>,
        type_name: Option<QName>,
        nillable: bool,
    },
    Attribute {
        name: Option<QName>,
        type_name: Option<QName>,
    },
    SchemaElement(QName),
    SchemaAttribute(QName),
    ProcessingInstruction(Option<String>),
    Comment,
    Text,
}

impl KindTest {
    pub fn matches<'a, N: XdmNode<'a>>(&self, node: N) -> bool {
        match self {
            KindTest::AnyNode => true,
            KindTest::Document(inner) => {
                node.kind() == NodeKind::Document
                    && match inner {
                        None => true,
                        Some(test) => {
                            let mut elements =
                                node.children().filter(|c| c.kind() == NodeKind::Element);
                            match (elements.next(), elements.next()) {
                                (Some(element), None) => test.matches(element),
                                _ => false,
                            }
                        }
                    }
            }
            KindTest::Element {
                name, type_name, ..
            } => {
                node.kind() == NodeKind::Element
                    && name_matches(name.as_ref(), node)
                    && type_name
                        .as_ref()
                        .is_none_or(|t| untyped_annotation_matches(t, NodeKind::Element))
            }
            KindTest::Attribute { name, type_name } => {
                node.kind() == NodeKind::Attribute
                    && name_matches(name.as_ref(), node)
                    && type_name
                        .as_ref()
                        .is_none_or(|t| untyped_annotation_matches(t, NodeKind::Attribute))
            }
            // Without a schema only the name can be checked.
            KindTest::SchemaElement(name) => {
                node.kind() == NodeKind::Element && name_matches(Some(name), node)
            }
            KindTest::SchemaAttribute(name) => {
                node.kind() == NodeKind::Attribute && name_matches(Some(name), node)
            }
            KindTest::ProcessingInstruction(target) => {
                node.kind() == NodeKind::ProcessingInstruction
                    && target.as_deref().is_none_or(|t| {
                        node.name().is_some_and(|n| n.local_part == t)
                    })
            }
            KindTest::Comment => node.kind() == NodeKind::Comment,
            KindTest::Text => node.kind() == NodeKind::Text,
        }
    }
}

fn name_matches<'a, N: XdmNode<'a>>(name: Option<&QName>, node: N) -> bool {
    match name {
        None => true,
        Some(expected) => node.name().is_some_and(|n| expected.matches_node_name(&n)),
    }
}

/// Untyped trees annotate elements as `xs:untyped` and attributes as
/// `xs:untypedAtomic`; a type constraint matches those or their supertypes.
fn untyped_annotation_matches(type_name: &QName, kind: NodeKind) -> bool {
    if !matches!(type_name.prefix.as_deref(), None | Some("xs")) {
        return false;
    }
    let local = type_name.local_part.as_str();
    match kind {
        NodeKind::Element => matches!(local, "untyped" | "anyType"),
        _ => matches!(
            local,
            "untypedAtomic" | "anyAtomicType" | "anySimpleType" | "anyType"
        ),
    }
}

impl fmt::Display for KindTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn name_or_star(name: &Option<QName>) -> String {
            name.as_ref().map_or_else(|| "*".to_string(), QName::to_string)
        }
        match self {
            KindTest::AnyNode => f.write_str("node()"),
            KindTest::Document(None) => f.write_str("document-node()"),
            KindTest::Document(Some(inner)) => write!(f, "document-node({})", inner),
            KindTest::Element {
                name: None,
                type_name: None,
                ..
            } => f.write_str("element()"),
            KindTest::Element {
                name,
                type_name,
                nillable,
            } => {
                write!(f, "element({}", name_or_star(name))?;
                if let Some(t) = type_name {
                    write!(f, ", {}{}", t, if *nillable { "?" } else { "" })?;
                }
                f.write_str(")")
            }
            KindTest::Attribute {
                name: None,
                type_name: None,
            } => f.write_str("attribute()"),
            KindTest::Attribute { name, type_name } => {
                write!(f, "attribute({}", name_or_star(name))?;
                if let Some(t) = type_name {
                    write!(f, ", {}", t)?;
                }
                f.write_str(")")
            }
            KindTest::SchemaElement(name) => write!(f, "schema-element({})", name),
            KindTest::SchemaAttribute(name) => write!(f, "schema-attribute({})", name),
            KindTest::ProcessingInstruction(None) => f.write_str("processing-instruction()"),
            KindTest::ProcessingInstruction(Some(target)) => {
                write!(f, "processing-instruction({})", target)
            }
            KindTest::Comment => f.write_str("comment()"),
            KindTest::Text => f.write_str("text()"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// `item()`
    Item,
    Atomic(QName),
    Kind(KindTest),
}

impl ItemType {
    pub fn atomic(ty: AtomicType) -> Self {
        ItemType::Atomic(QName::parse(ty.name()))
    }

    /// Unknown atomic type names match nothing.
    pub fn matches<'a, N: XdmNode<'a>>(&self, item: &XdmItem<N>) -> bool {
        match (self, item) {
            (ItemType::Item, _) => true,
            (ItemType::Atomic(name), XdmItem::Atomic(value)) => AtomicType::from_qname(name)
                .is_some_and(|ty| value.atomic_type().is_subtype_of(ty)),
            (ItemType::Kind(test), XdmItem::Node(node)) => test.matches(*node),
            _ => false,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Item => f.write_str("item()"),
            ItemType::Atomic(name) => write!(f, "{}", name),
            ItemType::Kind(test) => write!(f, "{}", test),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OccurrenceIndicator {
    ExactlyOne,
    /// `?`
    ZeroOrOne,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

impl OccurrenceIndicator {
    pub fn allows(self, len: usize) -> bool {
        match self {
            OccurrenceIndicator::ExactlyOne => len == 1,
            OccurrenceIndicator::ZeroOrOne => len <= 1,
            OccurrenceIndicator::ZeroOrMore => true,
            OccurrenceIndicator::OneOrMore => len >= 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            OccurrenceIndicator::ExactlyOne => "",
            OccurrenceIndicator::ZeroOrOne => "?",
            OccurrenceIndicator::ZeroOrMore => "*",
            OccurrenceIndicator::OneOrMore => "+",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SequenceType {
    /// `empty-sequence()`
    Empty,
    Typed {
        item_type: ItemType,
        occurrence: OccurrenceIndicator,
    },
}

impl SequenceType {
    pub fn new(item_type: ItemType, occurrence: OccurrenceIndicator) -> Self {
        SequenceType::Typed {
            item_type,
            occurrence,
        }
    }

    pub fn matches<'a, N: XdmNode<'a>>(&self, value: &XdmValue<N>) -> bool {
        match self {
            SequenceType::Empty => value.is_empty(),
            SequenceType::Typed {
                item_type,
                occurrence,
            } => occurrence.allows(value.len()) && value.iter().all(|i| item_type.matches(i)),
        }
    }
}

impl fmt::Display for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceType::Empty => f.write_str("empty-sequence()"),
            SequenceType::Typed {
                item_type,
                occurrence,
            } => write!(f, "{}{}", item_type, occurrence.symbol()),
        }
    }
}

/// The target of `cast as` and `castable as`: an atomic type name and whether
/// the empty sequence is accepted (`?`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SingleType {
    pub type_name: QName,
    pub optional: bool,
}

impl SingleType {
    pub fn new(type_name: QName, optional: bool) -> Self {
        Self {
            type_name,
            optional,
        }
    }
}

impl fmt::Display for SingleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.type_name, if self.optional { "?" } else { "" })
    }
}

pub fn instance_of<'a, N: XdmNode<'a>>(value: &XdmValue<N>, sequence_type: &SequenceType) -> bool {
    sequence_type.matches(value)
}

/// Hands the value back untouched if it matches, never converts.
pub fn treat_as<'a, N: XdmNode<'a>>(
    value: XdmValue<N>,
    sequence_type: &SequenceType,
) -> Result<XdmValue<N>> {
    if sequence_type.matches(&value) {
        Ok(value)
    } else {
        Err(XPathError::TreatMismatch {
            expected: sequence_type.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AtomicValue;
    use xpath2_node::testing::{TestNode, sample_library};

    type Value<'t> = XdmValue<TestNode<'t>>;

    fn xs(local: &str) -> ItemType {
        ItemType::Atomic(QName::xs(local))
    }

    #[test]
    fn test_atomic_item_types_follow_derivation() {
        let int: XdmItem<TestNode> = XdmItem::Atomic(AtomicValue::Integer(5));
        assert!(xs("integer").matches(&int));
        assert!(xs("decimal").matches(&int));
        assert!(xs("anyAtomicType").matches(&int));
        assert!(!xs("double").matches(&int));
        assert!(!xs("string").matches(&int));
        assert!(!xs("date").matches(&int));
        assert!(ItemType::Item.matches(&int));
    }

    #[test]
    fn test_occurrence_indicators() {
        let integers = Value::from_integer(1).concat(Value::from_integer(2));
        let star = SequenceType::new(xs("integer"), OccurrenceIndicator::ZeroOrMore);
        let one = SequenceType::new(xs("integer"), OccurrenceIndicator::ExactlyOne);
        let plus = SequenceType::new(xs("integer"), OccurrenceIndicator::OneOrMore);
        assert!(instance_of(&integers, &star));
        assert!(!instance_of(&integers, &one));
        assert!(instance_of(&integers, &plus));
        assert!(instance_of(&Value::empty(), &star));
        assert!(!instance_of(&Value::empty(), &plus));
        assert!(instance_of(&Value::empty(), &SequenceType::Empty));
        assert!(!instance_of(&Value::from_integer(1), &SequenceType::Empty));
    }

    #[test]
    fn test_kind_tests() {
        let tree = sample_library();
        let book = tree.elements_named("book")[0];
        let element_book = KindTest::Element {
            name: Some(QName::local("book")),
            type_name: None,
            nillable: false,
        };
        assert!(element_book.matches(book));
        assert!(!element_book.matches(tree.elements_named("magazine")[0]));
        assert!(KindTest::AnyNode.matches(book));

        let untyped = KindTest::Element {
            name: None,
            type_name: Some(QName::xs("untyped")),
            nillable: true,
        };
        assert!(untyped.matches(book));
        let typed = KindTest::Element {
            name: None,
            type_name: Some(QName::xs("integer")),
            nillable: false,
        };
        assert!(!typed.matches(book));

        let id = KindTest::Attribute {
            name: Some(QName::local("id")),
            type_name: None,
        };
        let attribute = book.attributes().next().unwrap();
        assert!(id.matches(attribute));
        assert!(!id.matches(book));
    }

    #[test]
    fn test_document_and_pi_tests() {
        let tree = sample_library();
        let library_doc = KindTest::Document(Some(Box::new(KindTest::SchemaElement(
            QName::local("library"),
        ))));
        assert!(library_doc.matches(tree.document()));
        assert!(KindTest::Document(None).matches(tree.document()));

        let pi = tree.elements_named("library")[0].children().nth(3).unwrap();
        assert!(KindTest::ProcessingInstruction(Some("render".into())).matches(pi));
        assert!(!KindTest::ProcessingInstruction(Some("other".into())).matches(pi));
        assert!(KindTest::ProcessingInstruction(None).matches(pi));
    }

    #[test]
    fn test_treat_as() {
        let value = Value::from_integer(7);
        let decimal = SequenceType::new(xs("decimal"), OccurrenceIndicator::ExactlyOne);
        assert_eq!(treat_as(value.clone(), &decimal).unwrap(), value);

        let string = SequenceType::new(xs("string"), OccurrenceIndicator::ExactlyOne);
        let err = treat_as(value, &string).unwrap_err();
        assert_eq!(err.code(), Some("XPDY0050"));
    }

    #[test]
    fn test_display() {
        let st = SequenceType::new(
            ItemType::Kind(KindTest::Element {
                name: Some(QName::local("book")),
                type_name: None,
                nillable: false,
            }),
            OccurrenceIndicator::OneOrMore,
        );
        assert_eq!(st.to_string(), "element(book)+");
        assert_eq!(SequenceType::Empty.to_string(), "empty-sequence()");
    }
}

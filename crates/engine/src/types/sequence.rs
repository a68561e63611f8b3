use super::AtomicValue;
use crate::error::{Result, XPathError};
use rust_decimal::Decimal;
use xpath2_node::XdmNode;

#[derive(Debug, Clone, PartialEq)]
pub enum XdmItem<N> {
    Node(N),
    Atomic(AtomicValue),
}

impl<N: Copy> XdmItem<N> {
    pub fn is_node(&self) -> bool {
        matches!(self, XdmItem::Node(_))
    }

    pub fn as_node(&self) -> Option<N> {
        match self {
            XdmItem::Node(n) => Some(*n),
            XdmItem::Atomic(_) => None,
        }
    }

    pub fn as_atomic(&self) -> Option<&AtomicValue> {
        match self {
            XdmItem::Atomic(a) => Some(a),
            XdmItem::Node(_) => None,
        }
    }
}

impl<'a, N: XdmNode<'a>> XdmItem<N> {
    /// Nodes atomize to `xs:untypedAtomic` holding their string value.
    pub fn atomize(&self) -> AtomicValue {
        match self {
            XdmItem::Node(n) => AtomicValue::UntypedAtomic(n.string_value()),
            XdmItem::Atomic(a) => a.clone(),
        }
    }

    pub fn string_value(&self) -> String {
        match self {
            XdmItem::Node(n) => n.string_value(),
            XdmItem::Atomic(a) => a.to_string_value(),
        }
    }
}

impl<N> From<AtomicValue> for XdmItem<N> {
    fn from(value: AtomicValue) -> Self {
        XdmItem::Atomic(value)
    }
}

/// An ordered, flat sequence of items.
#[derive(Debug, Clone, PartialEq)]
pub struct XdmValue<N> {
    items: Vec<XdmItem<N>>,
}

impl<N> Default for XdmValue<N> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<N: Copy> XdmValue<N> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_item(item: XdmItem<N>) -> Self {
        Self { items: vec![item] }
    }

    pub fn from_items(items: Vec<XdmItem<N>>) -> Self {
        Self { items }
    }

    pub fn from_atomic(value: AtomicValue) -> Self {
        Self::from_item(XdmItem::Atomic(value))
    }

    pub fn from_node(node: N) -> Self {
        Self::from_item(XdmItem::Node(node))
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = N>) -> Self {
        Self::from_items(nodes.into_iter().map(XdmItem::Node).collect())
    }

    pub fn from_bool(b: bool) -> Self {
        Self::from_atomic(AtomicValue::Boolean(b))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self::from_atomic(AtomicValue::String(s.into()))
    }

    pub fn from_integer(i: i64) -> Self {
        Self::from_atomic(AtomicValue::Integer(i))
    }

    pub fn from_decimal(d: Decimal) -> Self {
        Self::from_atomic(AtomicValue::Decimal(d))
    }

    pub fn from_double(d: f64) -> Self {
        Self::from_atomic(AtomicValue::Double(d))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[XdmItem<N>] {
        &self.items
    }

    pub fn into_items(self) -> Vec<XdmItem<N>> {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, XdmItem<N>> {
        self.items.iter()
    }

    pub fn first(&self) -> Option<&XdmItem<N>> {
        self.items.first()
    }

    /// The only item, or `None` for empty and multi-item sequences.
    pub fn single(&self) -> Option<&XdmItem<N>> {
        match self.items.as_slice() {
            [item] => Some(item),
            _ => None,
        }
    }

    pub fn concat(mut self, other: Self) -> Self {
        self.items.extend(other.items);
        self
    }

    pub fn push(&mut self, item: XdmItem<N>) {
        self.items.push(item);
    }

    /// All items as nodes, or `None` if any item is atomic.
    pub fn as_nodes(&self) -> Option<Vec<N>> {
        self.items.iter().map(XdmItem::as_node).collect()
    }

    /// The effective boolean value. Undefined for sequences that start with an
    /// atomic value and have more than one item, and for atomic types other than
    /// boolean, string-like and numeric.
    pub fn effective_boolean_value(&self) -> Result<bool> {
        match self.items.as_slice() {
            [] => Ok(false),
            [XdmItem::Node(_), ..] => Ok(true),
            [XdmItem::Atomic(atomic)] => match atomic {
                AtomicValue::Boolean(b) => Ok(*b),
                AtomicValue::String(s)
                | AtomicValue::UntypedAtomic(s)
                | AtomicValue::AnyUri(s) => Ok(!s.is_empty()),
                AtomicValue::Integer(i) => Ok(*i != 0),
                AtomicValue::Decimal(d) => Ok(!d.is_zero()),
                AtomicValue::Double(d) => Ok(*d != 0.0 && !d.is_nan()),
                AtomicValue::QName(_) => Err(XPathError::type_error(
                    "Effective boolean value is not defined for xs:QName",
                )),
            },
            _ => Err(XPathError::type_error(
                "Effective boolean value is not defined for a sequence of two or more atomic values",
            )),
        }
    }
}

impl<'a, N: XdmNode<'a>> XdmValue<N> {
    pub fn atomize(&self) -> Vec<AtomicValue> {
        self.items.iter().map(XdmItem::atomize).collect()
    }
}

impl<N> IntoIterator for XdmValue<N> {
    type Item = XdmItem<N>;
    type IntoIter = std::vec::IntoIter<XdmItem<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<N> FromIterator<XdmItem<N>> for XdmValue<N> {
    fn from_iter<I: IntoIterator<Item = XdmItem<N>>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xpath2_node::testing::{TestNode, sample_library};

    type Value<'t> = XdmValue<TestNode<'t>>;

    #[test]
    fn test_effective_boolean_value() {
        assert!(!Value::empty().effective_boolean_value().unwrap());
        assert!(Value::from_integer(3).effective_boolean_value().unwrap());
        assert!(!Value::from_double(f64::NAN).effective_boolean_value().unwrap());
        assert!(!Value::from_string("").effective_boolean_value().unwrap());

        let two = Value::from_integer(1).concat(Value::from_integer(2));
        assert!(two.effective_boolean_value().is_err());
    }

    #[test]
    fn test_node_sequences_are_true() {
        let tree = sample_library();
        let books = Value::from_nodes(tree.elements_named("book"));
        assert!(books.effective_boolean_value().unwrap());

        let mixed = books.concat(Value::from_integer(0));
        assert!(mixed.effective_boolean_value().unwrap());
    }

    #[test]
    fn test_atomize_nodes() {
        let tree = sample_library();
        let titles = Value::from_nodes(tree.elements_named("title"));
        let atoms = titles.atomize();
        assert_eq!(
            atoms,
            vec![
                AtomicValue::UntypedAtomic("Dune".into()),
                AtomicValue::UntypedAtomic("Emma".into()),
                AtomicValue::UntypedAtomic("Wired".into()),
            ]
        );
    }

    #[test]
    fn test_single() {
        assert!(Value::empty().single().is_none());
        assert!(Value::from_bool(true).single().is_some());
        let two = Value::from_bool(true).concat(Value::from_bool(false));
        assert!(two.single().is_none());
    }
}

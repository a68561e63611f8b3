//! Node-set operators. Results are duplicate-free and in document order.
use crate::ast::SetOp;
use crate::error::{Result, XPathError};
use crate::types::{XdmItem, XdmValue};
use itertools::Itertools;
use std::collections::HashSet;
use xpath2_node::XdmNode;

pub fn evaluate_set_op<'a, N: XdmNode<'a>>(
    op: SetOp,
    left: XdmValue<N>,
    right: XdmValue<N>,
) -> Result<XdmValue<N>> {
    match op {
        SetOp::Union | SetOp::Pipe => union(left, right),
        SetOp::Intersect => intersect(left, right),
        SetOp::Except => except(left, right),
    }
}

pub fn union<'a, N: XdmNode<'a>>(left: XdmValue<N>, right: XdmValue<N>) -> Result<XdmValue<N>> {
    let mut nodes = expect_nodes(left, "union")?;
    nodes.extend(expect_nodes(right, "union")?);
    Ok(XdmValue::from_nodes(document_order(nodes)))
}

pub fn intersect<'a, N: XdmNode<'a>>(
    left: XdmValue<N>,
    right: XdmValue<N>,
) -> Result<XdmValue<N>> {
    let left = expect_nodes(left, "intersect")?;
    let right: HashSet<N> = expect_nodes(right, "intersect")?.into_iter().collect();
    let kept = left.into_iter().filter(|n| right.contains(n)).collect();
    Ok(XdmValue::from_nodes(document_order(kept)))
}

pub fn except<'a, N: XdmNode<'a>>(left: XdmValue<N>, right: XdmValue<N>) -> Result<XdmValue<N>> {
    let left = expect_nodes(left, "except")?;
    let right: HashSet<N> = expect_nodes(right, "except")?.into_iter().collect();
    let kept = left.into_iter().filter(|n| !right.contains(n)).collect();
    Ok(XdmValue::from_nodes(document_order(kept)))
}

/// Sorts into document order and drops duplicates.
pub fn document_order<'a, N: XdmNode<'a>>(nodes: Vec<N>) -> Vec<N> {
    nodes.into_iter().sorted().dedup().collect()
}

fn expect_nodes<'a, N: XdmNode<'a>>(value: XdmValue<N>, op: &str) -> Result<Vec<N>> {
    value
        .into_iter()
        .map(|item| match item {
            XdmItem::Node(n) => Ok(n),
            XdmItem::Atomic(a) => Err(XPathError::type_error(format!(
                "Operands of '{}' must be nodes, found {}",
                op,
                a.type_name()
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use xpath2_node::testing::{TestNode, sample_library};

    #[test]
    fn test_union_sorts_and_dedups() {
        let tree = sample_library();
        let titles = tree.elements_named("title");
        let books = tree.elements_named("book");
        let left = XdmValue::from_nodes(vec![titles[2], books[1], titles[0]]);
        let right = XdmValue::from_nodes(vec![books[1], books[0]]);
        let result = union(left, right).unwrap().as_nodes().unwrap();
        assert_eq!(result, vec![books[0], titles[0], books[1], titles[2]]);
    }

    #[test]
    fn test_intersect_and_except() {
        let tree = sample_library();
        let books = tree.elements_named("book");
        let all = XdmValue::from_nodes(books.clone());
        let second = XdmValue::from_nodes(vec![books[1], books[1]]);

        let both = intersect(all.clone(), second.clone()).unwrap();
        assert_eq!(both.as_nodes().unwrap(), vec![books[1]]);

        let rest = except(all, second).unwrap();
        assert_eq!(rest.as_nodes().unwrap(), vec![books[0]]);
    }

    #[test]
    fn test_atomic_operand_is_rejected() {
        let tree = sample_library();
        let books: XdmValue<TestNode> = XdmValue::from_nodes(tree.elements_named("book"));
        for op in [SetOp::Union, SetOp::Pipe, SetOp::Intersect, SetOp::Except] {
            let err = evaluate_set_op(op, books.clone(), XdmValue::from_integer(1)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Type);
        }
    }
}

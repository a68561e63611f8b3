//! Value, general and node comparisons.
use crate::ast::{ComparisonOp, NodeComparisonOp};
use crate::error::{Result, XPathError};
use crate::types::{AtomicType, AtomicValue, XdmItem, XdmValue, cast_atomic};
use itertools::Itertools;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use xpath2_node::XdmNode;

impl ComparisonOp {
    /// `None` means the operands are unordered (a NaN was involved).
    fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (ComparisonOp::Ne, None) => true,
            (_, None) => false,
            (ComparisonOp::Eq, Some(o)) => o == Ordering::Equal,
            (ComparisonOp::Ne, Some(o)) => o != Ordering::Equal,
            (ComparisonOp::Lt, Some(o)) => o == Ordering::Less,
            (ComparisonOp::Le, Some(o)) => o != Ordering::Greater,
            (ComparisonOp::Gt, Some(o)) => o == Ordering::Greater,
            (ComparisonOp::Ge, Some(o)) => o != Ordering::Less,
        }
    }
}

/// Compares two atomic values of comparable types.
pub fn compare_atomic(op: ComparisonOp, left: &AtomicValue, right: &AtomicValue) -> Result<bool> {
    use AtomicValue::*;
    let ordering = match (left, right) {
        (l, r) if l.is_numeric() && r.is_numeric() => compare_numeric(l, r),
        (l, r) if l.is_string_like() && r.is_string_like() => {
            Some(l.to_string_value().cmp(&r.to_string_value()))
        }
        (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
        (QName(a), QName(b)) if op.is_equality() => Some(if a == b {
            Ordering::Equal
        } else {
            Ordering::Less
        }),
        _ => {
            return Err(XPathError::type_error(format!(
                "Cannot compare {} with {} using '{}'",
                left.type_name(),
                right.type_name(),
                op.value_symbol()
            )));
        }
    };
    Ok(op.holds(ordering))
}

fn compare_numeric(left: &AtomicValue, right: &AtomicValue) -> Option<Ordering> {
    match (left, right) {
        (AtomicValue::Integer(a), AtomicValue::Integer(b)) => Some(a.cmp(b)),
        (AtomicValue::Double(_), _) | (_, AtomicValue::Double(_)) => {
            left.as_f64()?.partial_cmp(&right.as_f64()?)
        }
        _ => Some(as_decimal(left).cmp(&as_decimal(right))),
    }
}

fn as_decimal(value: &AtomicValue) -> Decimal {
    match value {
        AtomicValue::Integer(i) => Decimal::from(*i),
        AtomicValue::Decimal(d) => *d,
        _ => Decimal::ZERO,
    }
}

/// `eq`, `ne`, `lt`, `le`, `gt`, `ge`: singleton operands, untyped compared as
/// strings, empty operand gives the empty sequence.
pub fn value_comparison<'a, N: XdmNode<'a>>(
    op: ComparisonOp,
    left: &XdmValue<N>,
    right: &XdmValue<N>,
) -> Result<XdmValue<N>> {
    let (Some(l), Some(r)) = (
        single_atomic(left, op)?,
        single_atomic(right, op)?,
    ) else {
        return Ok(XdmValue::empty());
    };
    let l = untyped_to_string(l);
    let r = untyped_to_string(r);
    compare_atomic(op, &l, &r).map(XdmValue::from_bool)
}

fn single_atomic<'a, N: XdmNode<'a>>(value: &XdmValue<N>, op: ComparisonOp) -> Result<Option<AtomicValue>> {
    match value.items() {
        [] => Ok(None),
        [item] => Ok(Some(item.atomize())),
        items => Err(XPathError::type_error(format!(
            "Operand of '{}' must be a single item, got {} items",
            op.value_symbol(),
            items.len()
        ))),
    }
}

fn untyped_to_string(value: AtomicValue) -> AtomicValue {
    match value {
        AtomicValue::UntypedAtomic(s) => AtomicValue::String(s),
        other => other,
    }
}

/// `=`, `!=`, `<`, `<=`, `>`, `>=`: true if any pair of atomized items
/// satisfies the value comparison.
pub fn general_comparison<'a, N: XdmNode<'a>>(
    op: ComparisonOp,
    left: &XdmValue<N>,
    right: &XdmValue<N>,
) -> Result<XdmValue<N>> {
    let left_atoms = left.atomize();
    let right_atoms = right.atomize();
    for (l, r) in left_atoms.iter().cartesian_product(right_atoms.iter()) {
        let (l, r) = coerce_general_pair(l, r)?;
        if compare_atomic(op, &l, &r)? {
            return Ok(XdmValue::from_bool(true));
        }
    }
    Ok(XdmValue::from_bool(false))
}

/// An untyped operand takes the type of the other side: double against a
/// number, string against a string or another untyped value.
fn coerce_general_pair(l: &AtomicValue, r: &AtomicValue) -> Result<(AtomicValue, AtomicValue)> {
    let untyped = |v: &AtomicValue| matches!(v, AtomicValue::UntypedAtomic(_));
    let coerce = |value: &AtomicValue, other: &AtomicValue| -> Result<AtomicValue> {
        if other.is_numeric() {
            cast_atomic(value, AtomicType::Double)
        } else if untyped(other) {
            cast_atomic(value, AtomicType::String)
        } else {
            cast_atomic(value, other.atomic_type())
        }
    };
    match (untyped(l), untyped(r)) {
        (true, false) => Ok((coerce(l, r)?, r.clone())),
        (false, true) => Ok((l.clone(), coerce(r, l)?)),
        (true, true) => Ok((
            cast_atomic(l, AtomicType::String)?,
            cast_atomic(r, AtomicType::String)?,
        )),
        (false, false) => Ok((l.clone(), r.clone())),
    }
}

/// `is`, `<<`, `>>`. Empty operands give the empty sequence.
pub fn node_comparison<'a, N: XdmNode<'a>>(
    op: NodeComparisonOp,
    left: &XdmValue<N>,
    right: &XdmValue<N>,
) -> Result<XdmValue<N>> {
    let (Some(l), Some(r)) = (single_node(left, op)?, single_node(right, op)?) else {
        return Ok(XdmValue::empty());
    };
    let result = match op {
        NodeComparisonOp::Is => l == r,
        NodeComparisonOp::Precedes => l < r,
        NodeComparisonOp::Follows => l > r,
    };
    Ok(XdmValue::from_bool(result))
}

fn single_node<'a, N: XdmNode<'a>>(value: &XdmValue<N>, op: NodeComparisonOp) -> Result<Option<N>> {
    match value.items() {
        [] => Ok(None),
        [XdmItem::Node(n)] => Ok(Some(*n)),
        _ => Err(XPathError::type_error(format!(
            "Operands of node comparison {:?} must be single nodes",
            op
        ))),
    }
}

pub mod arithmetic;
pub mod comparison;
pub mod set_ops;

pub use arithmetic::{evaluate_arithmetic, evaluate_unary, numeric_op};
pub use comparison::{compare_atomic, general_comparison, node_comparison, value_comparison};
pub use set_ops::{document_order, evaluate_set_op, except, intersect, union};

use crate::config::EvaluationConfig;
use crate::error::{Result, XPathError};
use crate::types::{AtomicType, AtomicValue, XdmItem, XdmValue, cast_atomic};
use xpath2_node::XdmNode;

/// `low to high`: ascending integers, empty when `low > high` or either side
/// is empty.
pub fn evaluate_range<'a, N: XdmNode<'a>>(
    low: &XdmValue<N>,
    high: &XdmValue<N>,
    config: &EvaluationConfig,
) -> Result<XdmValue<N>> {
    let (Some(low), Some(high)) = (range_bound(low)?, range_bound(high)?) else {
        return Ok(XdmValue::empty());
    };
    if low > high {
        return Ok(XdmValue::empty());
    }
    let len = (high as i128 - low as i128 + 1) as u64;
    if len > config.max_range_len as u64 {
        log::debug!("Range {} to {} exceeds limit {}", low, high, config.max_range_len);
        return Err(XPathError::RangeLimit {
            len,
            limit: config.max_range_len,
        });
    }
    Ok((low..=high)
        .map(|i| XdmItem::Atomic(AtomicValue::Integer(i)))
        .collect())
}

fn range_bound<'a, N: XdmNode<'a>>(value: &XdmValue<N>) -> Result<Option<i64>> {
    let atoms = value.atomize();
    let atom = match atoms.as_slice() {
        [] => return Ok(None),
        [atom] => atom,
        _ => {
            return Err(XPathError::type_error(format!(
                "Range bound must be a single integer, got {} items",
                atoms.len()
            )));
        }
    };
    match atom {
        AtomicValue::Integer(i) => Ok(Some(*i)),
        AtomicValue::UntypedAtomic(_) => match cast_atomic(atom, AtomicType::Integer)? {
            AtomicValue::Integer(i) => Ok(Some(i)),
            _ => Ok(None),
        },
        other => Err(XPathError::type_error(format!(
            "Range bound must be xs:integer, found {}",
            other.type_name()
        ))),
    }
}

//! Function conversion rules applied to arguments before invocation.
use super::{FunctionSignature, ParamItem, ParamType};
use crate::error::{Result, XPathError};
use crate::types::{AtomicType, AtomicValue, XdmItem, XdmValue, cast_atomic};
use xpath2_node::XdmNode;

pub fn convert_arguments<'a, N: XdmNode<'a>>(
    signature: &FunctionSignature,
    args: Vec<XdmValue<N>>,
) -> Result<Vec<XdmValue<N>>> {
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| match signature.param(i) {
            Some(expected) => convert_argument(arg, expected, signature.name),
            None => Ok(arg),
        })
        .collect()
}

/// Atomizes and converts for atomic parameter types, then checks item types
/// and cardinality.
pub fn convert_argument<'a, N: XdmNode<'a>>(
    value: XdmValue<N>,
    expected: &ParamType,
    function: &str,
) -> Result<XdmValue<N>> {
    let converted = match expected.item {
        ParamItem::Item => value,
        ParamItem::Node => {
            if let Some(atomic) = value.iter().find_map(XdmItem::as_atomic) {
                return Err(XPathError::type_error(format!(
                    "{} expects {}, found {}",
                    function,
                    expected,
                    atomic.type_name()
                )));
            }
            value
        }
        ParamItem::Atomic(ty) => value
            .atomize()
            .into_iter()
            .map(|atom| convert_atomic(atom, ty, function).map(XdmItem::Atomic))
            .collect::<Result<XdmValue<N>>>()?,
    };
    if !expected.occurrence.allows(converted.len()) {
        return Err(XPathError::type_error(format!(
            "{} expects {}, got a sequence of {} items",
            function,
            expected,
            converted.len()
        )));
    }
    Ok(converted)
}

fn convert_atomic(value: AtomicValue, expected: AtomicType, function: &str) -> Result<AtomicValue> {
    let value = match value {
        AtomicValue::UntypedAtomic(_) if expected == AtomicType::AnyAtomic => value,
        AtomicValue::UntypedAtomic(_) if expected == AtomicType::Numeric => {
            cast_atomic(&value, AtomicType::Double)?
        }
        AtomicValue::UntypedAtomic(_) => cast_atomic(&value, expected)?,
        other => other,
    };
    let actual = value.atomic_type();
    if actual.is_subtype_of(expected) {
        return Ok(value);
    }
    match (actual, expected) {
        (AtomicType::Integer | AtomicType::Decimal, AtomicType::Double) => {
            cast_atomic(&value, AtomicType::Double)
        }
        (AtomicType::AnyUri, AtomicType::String) => cast_atomic(&value, AtomicType::String),
        _ => Err(XPathError::type_error(format!(
            "{} expects {}, found {}",
            function,
            expected,
            actual
        ))),
    }
}

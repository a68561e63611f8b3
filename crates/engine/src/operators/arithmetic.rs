//! Numeric operators: `+ - * div idiv mod` and unary `+`/`-`.
use crate::ast::{ArithmeticOp, UnaryOp};
use crate::error::{Result, XPathError};
use crate::types::{AtomicType, AtomicValue, XdmValue, cast_atomic};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use xpath2_node::XdmNode;

/// Operands after promotion to a common type.
enum Operands {
    Integer(i64, i64),
    Decimal(Decimal, Decimal),
    Double(f64, f64),
}

pub fn evaluate_arithmetic<'a, N: XdmNode<'a>>(
    op: ArithmeticOp,
    left: &XdmValue<N>,
    right: &XdmValue<N>,
) -> Result<XdmValue<N>> {
    let (Some(l), Some(r)) = (
        single_operand(left, op.symbol())?,
        single_operand(right, op.symbol())?,
    ) else {
        return Ok(XdmValue::empty());
    };
    numeric_op(op, &l, &r).map(XdmValue::from_atomic)
}

pub fn evaluate_unary<'a, N: XdmNode<'a>>(op: UnaryOp, operand: &XdmValue<N>) -> Result<XdmValue<N>> {
    let symbol = match op {
        UnaryOp::Plus => "unary +",
        UnaryOp::Minus => "unary -",
    };
    let Some(value) = single_operand(operand, symbol)? else {
        return Ok(XdmValue::empty());
    };
    let value = numeric_operand(value, symbol)?;
    let result = match (op, value) {
        (UnaryOp::Plus, v) => v,
        (UnaryOp::Minus, AtomicValue::Integer(i)) => AtomicValue::Integer(
            i.checked_neg()
                .ok_or_else(|| XPathError::overflow("unary -"))?,
        ),
        (UnaryOp::Minus, AtomicValue::Decimal(d)) => AtomicValue::Decimal(-d),
        (UnaryOp::Minus, AtomicValue::Double(d)) => AtomicValue::Double(-d),
        (UnaryOp::Minus, other) => other,
    };
    Ok(XdmValue::from_atomic(result))
}

/// Atomizes an operand; `None` for the empty sequence.
fn single_operand<'a, N: XdmNode<'a>>(value: &XdmValue<N>, symbol: &str) -> Result<Option<AtomicValue>> {
    let mut atoms = value.atomize();
    match atoms.len() {
        0 => Ok(None),
        1 => Ok(atoms.pop()),
        n => Err(XPathError::type_error(format!(
            "Operand of '{}' must be a single item, got {} items",
            symbol, n
        ))),
    }
}

fn numeric_operand(value: AtomicValue, symbol: &str) -> Result<AtomicValue> {
    match value {
        AtomicValue::UntypedAtomic(_) => cast_atomic(&value, AtomicType::Double),
        v if v.is_numeric() => Ok(v),
        other => Err(XPathError::type_error(format!(
            "Operator '{}' is not defined for {}",
            symbol,
            other.type_name()
        ))),
    }
}

fn promote(left: AtomicValue, right: AtomicValue) -> Operands {
    use AtomicValue::*;
    match (left, right) {
        (Integer(a), Integer(b)) => Operands::Integer(a, b),
        (Double(a), b) => Operands::Double(a, b.as_f64().unwrap_or(f64::NAN)),
        (a, Double(b)) => Operands::Double(a.as_f64().unwrap_or(f64::NAN), b),
        (a, b) => Operands::Decimal(to_decimal(&a), to_decimal(&b)),
    }
}

fn to_decimal(value: &AtomicValue) -> Decimal {
    match value {
        AtomicValue::Integer(i) => Decimal::from(*i),
        AtomicValue::Decimal(d) => *d,
        _ => Decimal::ZERO,
    }
}

/// Applies `op` to two atomic operands, casting `xs:untypedAtomic` to
/// `xs:double` first. Shared by the operator syntax and the `op:numeric-*`
/// functions.
pub fn numeric_op(op: ArithmeticOp, left: &AtomicValue, right: &AtomicValue) -> Result<AtomicValue> {
    let symbol = op.symbol();
    let l = numeric_operand(left.clone(), symbol)?;
    let r = numeric_operand(right.clone(), symbol)?;
    match promote(l, r) {
        Operands::Integer(a, b) => integer_op(op, a, b),
        Operands::Decimal(a, b) => decimal_op(op, a, b),
        Operands::Double(a, b) => double_op(op, a, b),
    }
}

fn integer_op(op: ArithmeticOp, a: i64, b: i64) -> Result<AtomicValue> {
    let overflow = || XPathError::overflow(op.symbol());
    let value = match op {
        ArithmeticOp::Add => a.checked_add(b).ok_or_else(overflow)?,
        ArithmeticOp::Sub => a.checked_sub(b).ok_or_else(overflow)?,
        ArithmeticOp::Mul => a.checked_mul(b).ok_or_else(overflow)?,
        // Integer division yields a decimal.
        ArithmeticOp::Div => return decimal_op(op, Decimal::from(a), Decimal::from(b)),
        ArithmeticOp::IDiv => {
            if b == 0 {
                return Err(XPathError::DivisionByZero);
            }
            a.checked_div(b).ok_or_else(overflow)?
        }
        ArithmeticOp::Mod => {
            if b == 0 {
                return Err(XPathError::DivisionByZero);
            }
            // i64::MIN mod -1 overflows in `%` but is 0.
            a.checked_rem(b).unwrap_or(0)
        }
    };
    Ok(AtomicValue::Integer(value))
}

fn decimal_op(op: ArithmeticOp, a: Decimal, b: Decimal) -> Result<AtomicValue> {
    let overflow = || XPathError::overflow(op.symbol());
    if matches!(op, ArithmeticOp::Div | ArithmeticOp::IDiv | ArithmeticOp::Mod) && b.is_zero() {
        return Err(XPathError::DivisionByZero);
    }
    let value = match op {
        ArithmeticOp::Add => a.checked_add(b),
        ArithmeticOp::Sub => a.checked_sub(b),
        ArithmeticOp::Mul => a.checked_mul(b),
        ArithmeticOp::Div => a.checked_div(b),
        ArithmeticOp::IDiv => {
            let quotient = a.checked_div(b).ok_or_else(overflow)?;
            return quotient
                .trunc()
                .to_i64()
                .map(AtomicValue::Integer)
                .ok_or_else(overflow);
        }
        ArithmeticOp::Mod => a.checked_rem(b),
    };
    value.map(AtomicValue::Decimal).ok_or_else(overflow)
}

/// IEEE semantics, except `idiv` which must produce an integer.
fn double_op(op: ArithmeticOp, a: f64, b: f64) -> Result<AtomicValue> {
    let value = match op {
        ArithmeticOp::Add => a + b,
        ArithmeticOp::Sub => a - b,
        ArithmeticOp::Mul => a * b,
        ArithmeticOp::Div => a / b,
        ArithmeticOp::Mod => a % b,
        ArithmeticOp::IDiv => {
            if b == 0.0 {
                return Err(XPathError::DivisionByZero);
            }
            if a.is_nan() || b.is_nan() || a.is_infinite() {
                return Err(XPathError::overflow("idiv"));
            }
            let quotient = (a / b).trunc();
            if quotient < i64::MIN as f64 || quotient >= i64::MAX as f64 {
                return Err(XPathError::overflow("idiv"));
            }
            return Ok(AtomicValue::Integer(quotient as i64));
        }
    };
    Ok(AtomicValue::Double(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::str::FromStr;

    fn int(i: i64) -> AtomicValue {
        AtomicValue::Integer(i)
    }

    fn dec(s: &str) -> AtomicValue {
        AtomicValue::Decimal(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(numeric_op(ArithmeticOp::Add, &int(2), &int(3)).unwrap(), int(5));
        assert_eq!(numeric_op(ArithmeticOp::Mul, &int(-4), &int(3)).unwrap(), int(-12));
        assert_eq!(
            numeric_op(ArithmeticOp::Add, &int(i64::MAX), &int(1))
                .unwrap_err()
                .kind(),
            ErrorKind::Overflow
        );
    }

    #[test]
    fn test_integer_div_yields_decimal() {
        assert_eq!(numeric_op(ArithmeticOp::Div, &int(7), &int(2)).unwrap(), dec("3.5"));
        assert_eq!(numeric_op(ArithmeticOp::Div, &int(6), &int(3)).unwrap(), dec("2"));
    }

    #[test]
    fn test_idiv_truncates_toward_zero() {
        assert_eq!(numeric_op(ArithmeticOp::IDiv, &int(7), &int(2)).unwrap(), int(3));
        assert_eq!(numeric_op(ArithmeticOp::IDiv, &int(-7), &int(2)).unwrap(), int(-3));
        assert_eq!(numeric_op(ArithmeticOp::Mod, &int(-7), &int(2)).unwrap(), int(-1));
        assert_eq!(
            numeric_op(ArithmeticOp::IDiv, &AtomicValue::Double(-7.5), &int(2)).unwrap(),
            int(-3)
        );
        assert_eq!(
            numeric_op(ArithmeticOp::IDiv, &dec("10.5"), &dec("3")).unwrap(),
            int(3)
        );
    }

    #[test]
    fn test_division_by_zero() {
        for op in [ArithmeticOp::Div, ArithmeticOp::IDiv, ArithmeticOp::Mod] {
            assert_eq!(numeric_op(op, &int(1), &int(0)), Err(XPathError::DivisionByZero));
            assert_eq!(
                numeric_op(op, &dec("1.5"), &dec("0.0")),
                Err(XPathError::DivisionByZero)
            );
        }
        assert_eq!(
            numeric_op(ArithmeticOp::IDiv, &AtomicValue::Double(1.0), &AtomicValue::Double(0.0)),
            Err(XPathError::DivisionByZero)
        );
    }

    #[test]
    fn test_double_division_follows_ieee() {
        let one = AtomicValue::Double(1.0);
        let zero = AtomicValue::Double(0.0);
        assert_eq!(
            numeric_op(ArithmeticOp::Div, &one, &zero).unwrap(),
            AtomicValue::Double(f64::INFINITY)
        );
        let AtomicValue::Double(nan) = numeric_op(ArithmeticOp::Mod, &one, &zero).unwrap() else {
            panic!("expected a double");
        };
        assert!(nan.is_nan());
        assert_eq!(
            numeric_op(ArithmeticOp::IDiv, &AtomicValue::Double(f64::INFINITY), &one)
                .unwrap_err()
                .kind(),
            ErrorKind::Overflow
        );
    }

    #[test]
    fn test_promotion() {
        assert_eq!(
            numeric_op(ArithmeticOp::Add, &int(1), &dec("0.5")).unwrap(),
            dec("1.5")
        );
        assert_eq!(
            numeric_op(ArithmeticOp::Add, &dec("0.5"), &AtomicValue::Double(1.0)).unwrap(),
            AtomicValue::Double(1.5)
        );
        assert_eq!(
            numeric_op(
                ArithmeticOp::Sub,
                &AtomicValue::UntypedAtomic("10".into()),
                &int(4)
            )
            .unwrap(),
            AtomicValue::Double(6.0)
        );
    }

    #[test]
    fn test_non_numeric_operands() {
        let err = numeric_op(ArithmeticOp::Add, &AtomicValue::String("1".into()), &int(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        let err = numeric_op(ArithmeticOp::Add, &AtomicValue::UntypedAtomic("x".into()), &int(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cast);
    }

    #[test]
    fn test_unary_minus() {
        use xpath2_node::testing::TestNode;
        let value: XdmValue<TestNode> = XdmValue::from_integer(5);
        assert_eq!(
            evaluate_unary(UnaryOp::Minus, &value).unwrap(),
            XdmValue::from_integer(-5)
        );
        let empty: XdmValue<TestNode> = XdmValue::empty();
        assert!(evaluate_unary(UnaryOp::Minus, &empty).unwrap().is_empty());
    }
}

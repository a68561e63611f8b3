mod common;

use common::{TestResult, eval_atomic, init_logging};
use xpath2::{
    ArithmeticOp, AtomicValue, ComparisonOp, ErrorKind, Expr, ItemType, OccurrenceIndicator,
    QName, SequenceType, XPathError,
};

fn seq(values: &[i64]) -> Expr {
    Expr::par(values.iter().map(|v| Expr::integer(*v)).collect())
}

fn arith(op: ArithmeticOp, left: Expr, right: Expr) -> Expr {
    Expr::arithmetic(op, left, right)
}

fn single_integer(expr: &Expr) -> Result<i64, XPathError> {
    let value = eval_atomic(expr)?;
    match value.single().and_then(|item| item.as_atomic()) {
        Some(AtomicValue::Integer(i)) => Ok(*i),
        other => Err(XPathError::type_error(format!("expected an integer, got {:?}", other))),
    }
}

#[test]
fn test_idiv_mod_identity() -> TestResult {
    init_logging();
    for a in -9..=9 {
        for b in [-4, -3, -1, 1, 2, 5] {
            let quotient = single_integer(&arith(ArithmeticOp::IDiv, Expr::integer(a), Expr::integer(b)))?;
            let remainder = single_integer(&arith(ArithmeticOp::Mod, Expr::integer(a), Expr::integer(b)))?;
            assert_eq!(quotient * b + remainder, a, "{} idiv/mod {}", a, b);
            // The remainder takes the sign of the dividend.
            assert!(remainder == 0 || remainder.signum() == a.signum());
        }
    }
    Ok(())
}

#[test]
fn test_integer_and_decimal_division_by_zero() {
    for op in [ArithmeticOp::Div, ArithmeticOp::IDiv, ArithmeticOp::Mod] {
        let err = eval_atomic(&arith(op, Expr::integer(1), Expr::integer(0))).unwrap_err();
        assert_eq!(err, XPathError::DivisionByZero, "{:?}", op);
        assert_eq!(err.code(), Some("FOAR0001"));

        let err = eval_atomic(&arith(
            op,
            Expr::decimal(xpath2::Decimal::new(15, 1)),
            Expr::decimal(xpath2::Decimal::ZERO),
        ))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DivisionByZero);
    }
}

#[test]
fn test_double_division_by_zero_follows_ieee() -> TestResult {
    let inf = eval_atomic(&arith(ArithmeticOp::Div, Expr::double(1.0), Expr::double(0.0)))?;
    assert_eq!(inf.items()[0].as_atomic(), Some(&AtomicValue::Double(f64::INFINITY)));

    let neg = eval_atomic(&arith(ArithmeticOp::Div, Expr::double(-1.0), Expr::double(0.0)))?;
    assert_eq!(neg.items()[0].string_value(), "-INF");

    let nan = eval_atomic(&arith(ArithmeticOp::Mod, Expr::double(1.0), Expr::double(0.0)))?;
    assert_eq!(nan.items()[0].string_value(), "NaN");

    let err = eval_atomic(&arith(ArithmeticOp::IDiv, Expr::double(1.0), Expr::double(0.0)))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DivisionByZero);
    Ok(())
}

#[test]
fn test_integer_division_yields_decimal() -> TestResult {
    let value = eval_atomic(&arith(ArithmeticOp::Div, Expr::integer(7), Expr::integer(2)))?;
    assert_eq!(
        value.items()[0].as_atomic(),
        Some(&AtomicValue::Decimal(xpath2::Decimal::new(35, 1)))
    );
    Ok(())
}

#[test]
fn test_arithmetic_on_empty_is_empty() -> TestResult {
    let value = eval_atomic(&arith(ArithmeticOp::Add, Expr::empty_sequence(), Expr::integer(1)))?;
    assert!(value.is_empty());
    Ok(())
}

#[test]
fn test_overflow_is_reported() {
    let err = eval_atomic(&arith(
        ArithmeticOp::Mul,
        Expr::integer(i64::MAX),
        Expr::integer(2),
    ))
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
}

#[test]
fn test_general_comparison_is_existential() -> TestResult {
    let eq = eval_atomic(&Expr::general(ComparisonOp::Eq, seq(&[1, 2, 3]), seq(&[3, 4])))?;
    assert_eq!(eq.items()[0].as_atomic(), Some(&AtomicValue::Boolean(true)));

    let ne = eval_atomic(&Expr::general(ComparisonOp::Ne, seq(&[1, 1]), seq(&[1])))?;
    assert_eq!(ne.items()[0].as_atomic(), Some(&AtomicValue::Boolean(false)));

    let empty = eval_atomic(&Expr::general(ComparisonOp::Eq, Expr::empty_sequence(), seq(&[1, 2])))?;
    assert_eq!(empty.items()[0].as_atomic(), Some(&AtomicValue::Boolean(false)));
    Ok(())
}

#[test]
fn test_value_comparison_cardinality() -> TestResult {
    let empty = eval_atomic(&Expr::value(ComparisonOp::Eq, Expr::empty_sequence(), Expr::integer(1)))?;
    assert!(empty.is_empty());

    let err = eval_atomic(&Expr::value(ComparisonOp::Eq, seq(&[1, 2]), Expr::integer(1))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);

    let err = eval_atomic(&Expr::value(ComparisonOp::Lt, Expr::integer(1), Expr::string("a")))
        .unwrap_err();
    assert_eq!(err.code(), Some("XPTY0004"));
    Ok(())
}

#[test]
fn test_range_boundaries() -> TestResult {
    assert!(eval_atomic(&Expr::range(Expr::integer(1), Expr::integer(0)))?.is_empty());
    assert_eq!(eval_atomic(&Expr::range(Expr::integer(-2), Expr::integer(-2)))?.len(), 1);
    assert_eq!(eval_atomic(&Expr::range(Expr::integer(-2), Expr::integer(2)))?.len(), 5);
    assert!(eval_atomic(&Expr::range(Expr::empty_sequence(), Expr::integer(2)))?.is_empty());
    Ok(())
}

#[test]
fn test_instance_of_uses_subtyping() -> TestResult {
    let decimal_plus = SequenceType::new(
        ItemType::Atomic(QName::xs("decimal")),
        OccurrenceIndicator::OneOrMore,
    );
    let value = eval_atomic(&Expr::instance_of(seq(&[1, 2]), decimal_plus))?;
    assert_eq!(value.items()[0].as_atomic(), Some(&AtomicValue::Boolean(true)));

    let double = SequenceType::new(
        ItemType::Atomic(QName::xs("double")),
        OccurrenceIndicator::ExactlyOne,
    );
    let value = eval_atomic(&Expr::instance_of(Expr::integer(1), double.clone()))?;
    assert_eq!(value.items()[0].as_atomic(), Some(&AtomicValue::Boolean(false)));

    let err = eval_atomic(&Expr::treat(Expr::integer(1), double)).unwrap_err();
    assert_eq!(err.code(), Some("XPDY0050"));

    let empty = eval_atomic(&Expr::instance_of(Expr::empty_sequence(), SequenceType::Empty))?;
    assert_eq!(empty.items()[0].as_atomic(), Some(&AtomicValue::Boolean(true)));
    Ok(())
}

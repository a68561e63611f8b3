use super::{Function, FunctionSignature, ParamType, two_args};
use crate::ast::ArithmeticOp;
use crate::engine::EvaluationContext;
use crate::error::Result;
use crate::operators;
use crate::types::{AtomicType, OccurrenceIndicator, XdmValue};
use xpath2_node::XdmNode;

static NUMERIC_PAIR: [ParamType; 2] = [
    ParamType::atomic(AtomicType::Numeric, OccurrenceIndicator::ZeroOrOne),
    ParamType::atomic(AtomicType::Numeric, OccurrenceIndicator::ZeroOrOne),
];

const fn binary(name: &'static str) -> FunctionSignature {
    FunctionSignature {
        name,
        min_arity: 2,
        max_arity: 2,
        params: &NUMERIC_PAIR,
    }
}

static ADD: FunctionSignature = binary("op:numeric-add");
static SUBTRACT: FunctionSignature = binary("op:numeric-subtract");
static MULTIPLY: FunctionSignature = binary("op:numeric-multiply");
static DIVIDE: FunctionSignature = binary("op:numeric-divide");
static INTEGER_DIVIDE: FunctionSignature = binary("op:numeric-integer-divide");
static MOD: FunctionSignature = binary("op:numeric-mod");

/// The `op:numeric-*` function behind one arithmetic operator. An empty
/// operand gives an empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericOperator(pub ArithmeticOp);

impl NumericOperator {
    fn table_entry(self) -> &'static FunctionSignature {
        match self.0 {
            ArithmeticOp::Add => &ADD,
            ArithmeticOp::Sub => &SUBTRACT,
            ArithmeticOp::Mul => &MULTIPLY,
            ArithmeticOp::Div => &DIVIDE,
            ArithmeticOp::IDiv => &INTEGER_DIVIDE,
            ArithmeticOp::Mod => &MOD,
        }
    }
}

impl<'a, N: XdmNode<'a>> Function<'a, N> for NumericOperator {
    fn signature(&self) -> &FunctionSignature {
        self.table_entry()
    }

    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        _ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let (left, right) = two_args(args, self.table_entry().name)?;
        let (Some(l), Some(r)) = (
            left.first().and_then(|i| i.as_atomic()),
            right.first().and_then(|i| i.as_atomic()),
        ) else {
            return Ok(XdmValue::empty());
        };
        operators::numeric_op(self.0, l, r).map(XdmValue::from_atomic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvaluationConfig;
    use crate::error::ErrorKind;
    use crate::functions::FunctionLibrary;
    use crate::qname::QName;
    use crate::types::AtomicValue;
    use rust_decimal::Decimal;
    use xpath2_node::testing::TestNode;

    type Value = XdmValue<TestNode<'static>>;

    fn call(op: ArithmeticOp, left: Value, right: Value) -> Result<Value> {
        let functions = FunctionLibrary::standard();
        let config = EvaluationConfig::default();
        let ctx = EvaluationContext::new(&functions, &config);
        NumericOperator(op).evaluate(vec![left, right], &ctx)
    }

    #[test]
    fn test_signatures_are_registered() {
        let functions = FunctionLibrary::<TestNode>::standard();
        for name in [
            "numeric-add",
            "numeric-subtract",
            "numeric-multiply",
            "numeric-divide",
            "numeric-integer-divide",
            "numeric-mod",
        ] {
            assert!(functions.contains(&QName::prefixed("op", name)), "{}", name);
        }
    }

    #[test]
    fn test_integer_division_family() {
        assert_eq!(
            call(ArithmeticOp::IDiv, Value::from_integer(7), Value::from_integer(2)).unwrap(),
            Value::from_integer(3)
        );
        assert_eq!(
            call(ArithmeticOp::Mod, Value::from_integer(-7), Value::from_integer(2)).unwrap(),
            Value::from_integer(-1)
        );
        assert_eq!(
            call(ArithmeticOp::Div, Value::from_integer(1), Value::from_integer(4)).unwrap(),
            Value::from_decimal(Decimal::new(25, 2))
        );
    }

    #[test]
    fn test_empty_operand_and_division_by_zero() {
        let r = call(ArithmeticOp::Add, Value::empty(), Value::from_integer(1)).unwrap();
        assert!(r.is_empty());

        let err = call(ArithmeticOp::IDiv, Value::from_integer(1), Value::from_integer(0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DivisionByZero);

        let inf = call(ArithmeticOp::Div, Value::from_double(1.0), Value::from_double(0.0))
            .unwrap();
        assert_eq!(inf, Value::from_double(f64::INFINITY));
    }

    #[test]
    fn test_untyped_arguments_become_double() {
        let r = call(
            ArithmeticOp::Mul,
            Value::from_atomic(AtomicValue::UntypedAtomic("1.5".into())),
            Value::from_integer(2),
        )
        .unwrap();
        assert_eq!(r, Value::from_double(3.0));

        let err = call(ArithmeticOp::Add, Value::from_string("1"), Value::from_integer(2))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }
}

use super::{Function, FunctionSignature, ParamItem, ParamType, two_args};
use crate::engine::EvaluationContext;
use crate::error::Result;
use crate::operators;
use crate::types::{OccurrenceIndicator, XdmValue};
use xpath2_node::XdmNode;

static NODE_SETS: [ParamType; 2] = [
    ParamType::new(ParamItem::Item, OccurrenceIndicator::ZeroOrMore),
    ParamType::new(ParamItem::Item, OccurrenceIndicator::ZeroOrMore),
];

static UNION: FunctionSignature = FunctionSignature {
    name: "op:union",
    min_arity: 2,
    max_arity: 2,
    params: &NODE_SETS,
};

static INTERSECT: FunctionSignature = FunctionSignature {
    name: "op:intersect",
    min_arity: 2,
    max_arity: 2,
    params: &NODE_SETS,
};

static EXCEPT: FunctionSignature = FunctionSignature {
    name: "op:except",
    min_arity: 2,
    max_arity: 2,
    params: &NODE_SETS,
};

/// `op:union($a, $b)`: every node of either operand, in document order.
pub struct OpUnion;

impl<'a, N: XdmNode<'a>> Function<'a, N> for OpUnion {
    fn signature(&self) -> &FunctionSignature {
        &UNION
    }

    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        _ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let (left, right) = two_args(args, UNION.name)?;
        operators::union(left, right)
    }
}

pub struct OpIntersect;

impl<'a, N: XdmNode<'a>> Function<'a, N> for OpIntersect {
    fn signature(&self) -> &FunctionSignature {
        &INTERSECT
    }

    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        _ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let (left, right) = two_args(args, INTERSECT.name)?;
        operators::intersect(left, right)
    }
}

pub struct OpExcept;

impl<'a, N: XdmNode<'a>> Function<'a, N> for OpExcept {
    fn signature(&self) -> &FunctionSignature {
        &EXCEPT
    }

    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        _ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let (left, right) = two_args(args, EXCEPT.name)?;
        operators::except(left, right)
    }
}

use super::{Function, FunctionSignature, ParamItem, ParamType, single_arg};
use crate::engine::EvaluationContext;
use crate::error::Result;
use crate::types::{OccurrenceIndicator, XdmItem, XdmValue};
use xpath2_node::XdmNode;

static ANY_SEQUENCE: [ParamType; 1] = [ParamType::new(
    ParamItem::Item,
    OccurrenceIndicator::ZeroOrMore,
)];

const fn unary(name: &'static str) -> FunctionSignature {
    FunctionSignature {
        name,
        min_arity: 1,
        max_arity: 1,
        params: &ANY_SEQUENCE,
    }
}

static COUNT: FunctionSignature = unary("fn:count");
static EMPTY: FunctionSignature = unary("fn:empty");
static EXISTS: FunctionSignature = unary("fn:exists");
static DATA: FunctionSignature = unary("fn:data");

pub struct FnCount;

impl<'a, N: XdmNode<'a>> Function<'a, N> for FnCount {
    fn signature(&self) -> &FunctionSignature {
        &COUNT
    }

    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        _ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let seq = single_arg(args, COUNT.name)?;
        Ok(XdmValue::from_integer(seq.len() as i64))
    }
}

pub struct FnEmpty;

impl<'a, N: XdmNode<'a>> Function<'a, N> for FnEmpty {
    fn signature(&self) -> &FunctionSignature {
        &EMPTY
    }

    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        _ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let seq = single_arg(args, EMPTY.name)?;
        Ok(XdmValue::from_bool(seq.is_empty()))
    }
}

pub struct FnExists;

impl<'a, N: XdmNode<'a>> Function<'a, N> for FnExists {
    fn signature(&self) -> &FunctionSignature {
        &EXISTS
    }

    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        _ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let seq = single_arg(args, EXISTS.name)?;
        Ok(XdmValue::from_bool(!seq.is_empty()))
    }
}

/// `fn:data($arg)`: the atomized sequence. Nodes become `xs:untypedAtomic`.
pub struct FnData;

impl<'a, N: XdmNode<'a>> Function<'a, N> for FnData {
    fn signature(&self) -> &FunctionSignature {
        &DATA
    }

    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        _ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let seq = single_arg(args, DATA.name)?;
        Ok(seq.atomize().into_iter().map(XdmItem::Atomic).collect())
    }
}

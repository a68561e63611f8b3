use super::{Function, FunctionSignature, ParamItem, ParamType, single_arg};
use crate::engine::EvaluationContext;
use crate::error::Result;
use crate::types::{OccurrenceIndicator, XdmValue};
use xpath2_node::XdmNode;

static ANY_SEQUENCE: [ParamType; 1] = [ParamType::new(
    ParamItem::Item,
    OccurrenceIndicator::ZeroOrMore,
)];

static TRUE: FunctionSignature = FunctionSignature {
    name: "fn:true",
    min_arity: 0,
    max_arity: 0,
    params: &[],
};

static FALSE: FunctionSignature = FunctionSignature {
    name: "fn:false",
    min_arity: 0,
    max_arity: 0,
    params: &[],
};

static NOT: FunctionSignature = FunctionSignature {
    name: "fn:not",
    min_arity: 1,
    max_arity: 1,
    params: &ANY_SEQUENCE,
};

static BOOLEAN: FunctionSignature = FunctionSignature {
    name: "fn:boolean",
    min_arity: 1,
    max_arity: 1,
    params: &ANY_SEQUENCE,
};

pub struct FnTrue;

impl<'a, N: XdmNode<'a>> Function<'a, N> for FnTrue {
    fn signature(&self) -> &FunctionSignature {
        &TRUE
    }

    fn invoke(
        &self,
        _args: Vec<XdmValue<N>>,
        _ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        Ok(XdmValue::from_bool(true))
    }
}

pub struct FnFalse;

impl<'a, N: XdmNode<'a>> Function<'a, N> for FnFalse {
    fn signature(&self) -> &FunctionSignature {
        &FALSE
    }

    fn invoke(
        &self,
        _args: Vec<XdmValue<N>>,
        _ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        Ok(XdmValue::from_bool(false))
    }
}

pub struct FnNot;

impl<'a, N: XdmNode<'a>> Function<'a, N> for FnNot {
    fn signature(&self) -> &FunctionSignature {
        &NOT
    }

    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        _ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let arg = single_arg(args, NOT.name)?;
        Ok(XdmValue::from_bool(!arg.effective_boolean_value()?))
    }
}

/// `fn:boolean($arg)`: the effective boolean value as an `xs:boolean`.
pub struct FnBoolean;

impl<'a, N: XdmNode<'a>> Function<'a, N> for FnBoolean {
    fn signature(&self) -> &FunctionSignature {
        &BOOLEAN
    }

    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        _ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let arg = single_arg(args, BOOLEAN.name)?;
        Ok(XdmValue::from_bool(arg.effective_boolean_value()?))
    }
}

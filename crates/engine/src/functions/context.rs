//! Functions that read the focus: position, size and context item.
use super::{Function, FunctionSignature, ParamItem, ParamType};
use crate::engine::EvaluationContext;
use crate::error::Result;
use crate::types::{OccurrenceIndicator, XdmItem, XdmValue};
use xpath2_node::XdmNode;

static OPTIONAL_ITEM: [ParamType; 1] = [ParamType::new(
    ParamItem::Item,
    OccurrenceIndicator::ZeroOrOne,
)];

static OPTIONAL_NODE: [ParamType; 1] = [ParamType::new(
    ParamItem::Node,
    OccurrenceIndicator::ZeroOrOne,
)];

static POSITION: FunctionSignature = FunctionSignature {
    name: "fn:position",
    min_arity: 0,
    max_arity: 0,
    params: &[],
};

static LAST: FunctionSignature = FunctionSignature {
    name: "fn:last",
    min_arity: 0,
    max_arity: 0,
    params: &[],
};

static STRING: FunctionSignature = FunctionSignature {
    name: "fn:string",
    min_arity: 0,
    max_arity: 1,
    params: &OPTIONAL_ITEM,
};

static ROOT: FunctionSignature = FunctionSignature {
    name: "fn:root",
    min_arity: 0,
    max_arity: 1,
    params: &OPTIONAL_NODE,
};

pub struct FnPosition;

impl<'a, N: XdmNode<'a>> Function<'a, N> for FnPosition {
    fn signature(&self) -> &FunctionSignature {
        &POSITION
    }

    fn invoke(
        &self,
        _args: Vec<XdmValue<N>>,
        ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        ctx.context_item()?;
        Ok(XdmValue::from_integer(ctx.position as i64))
    }
}

pub struct FnLast;

impl<'a, N: XdmNode<'a>> Function<'a, N> for FnLast {
    fn signature(&self) -> &FunctionSignature {
        &LAST
    }

    fn invoke(
        &self,
        _args: Vec<XdmValue<N>>,
        ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        ctx.context_item()?;
        Ok(XdmValue::from_integer(ctx.size as i64))
    }
}

/// `fn:string($arg?)`. Without an argument the context item is used; the
/// empty sequence gives the zero-length string.
pub struct FnString;

impl<'a, N: XdmNode<'a>> Function<'a, N> for FnString {
    fn signature(&self) -> &FunctionSignature {
        &STRING
    }

    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let value = match args.into_iter().next() {
            Some(arg) => arg.first().map(XdmItem::string_value),
            None => Some(ctx.context_item()?.string_value()),
        };
        Ok(XdmValue::from_string(value.unwrap_or_default()))
    }
}

/// `fn:root($arg?)`: the root of the tree containing the node.
pub struct FnRoot;

impl<'a, N: XdmNode<'a>> Function<'a, N> for FnRoot {
    fn signature(&self) -> &FunctionSignature {
        &ROOT
    }

    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let node = match args.into_iter().next() {
            Some(arg) => arg.first().and_then(XdmItem::as_node),
            None => Some(ctx.context_node()?),
        };
        Ok(node
            .map(|n| XdmValue::from_node(n.root()))
            .unwrap_or_default())
    }
}

//! The function framework: signatures, argument conversion and the registry.
//!
//! Every callable, including the operator functions in the `op` namespace,
//! implements [`Function`]. The provided [`Function::evaluate`] checks arity
//! and converts arguments against the signature's static parameter table
//! before handing them to [`Function::invoke`].

mod boolean;
mod coercion;
mod context;
mod library;
mod numeric;
mod sequence;
mod set;

pub use boolean::{FnBoolean, FnFalse, FnNot, FnTrue};
pub use coercion::{convert_argument, convert_arguments};
pub use context::{FnLast, FnPosition, FnRoot, FnString};
pub use library::FunctionLibrary;
pub use numeric::NumericOperator;
pub use sequence::{FnCount, FnData, FnEmpty, FnExists};
pub use set::{OpExcept, OpIntersect, OpUnion};

use crate::engine::EvaluationContext;
use crate::error::{Result, XPathError};
use crate::qname::QName;
use crate::types::{AtomicType, OccurrenceIndicator, XdmValue};
use std::fmt;
use xpath2_node::XdmNode;

/// The item part of a parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamItem {
    /// `item()`
    Item,
    /// `node()`
    Node,
    Atomic(AtomicType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamType {
    pub item: ParamItem,
    pub occurrence: OccurrenceIndicator,
}

impl ParamType {
    pub const fn new(item: ParamItem, occurrence: OccurrenceIndicator) -> Self {
        Self { item, occurrence }
    }

    pub const fn atomic(ty: AtomicType, occurrence: OccurrenceIndicator) -> Self {
        Self::new(ParamItem::Atomic(ty), occurrence)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item {
            ParamItem::Item => f.write_str("item()")?,
            ParamItem::Node => f.write_str("node()")?,
            ParamItem::Atomic(ty) => f.write_str(ty.name())?,
        }
        f.write_str(self.occurrence.symbol())
    }
}

/// Name, arity range and expected argument types of a function. Built-ins
/// keep theirs in `static`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Lexical name with prefix, e.g. `op:union`.
    pub name: &'static str,
    pub min_arity: usize,
    pub max_arity: usize,
    /// One entry per position; a shorter table repeats its last entry.
    pub params: &'static [ParamType],
}

impl FunctionSignature {
    pub fn qname(&self) -> QName {
        QName::parse(self.name)
    }

    pub fn accepts(&self, arity: usize) -> bool {
        (self.min_arity..=self.max_arity).contains(&arity)
    }

    pub fn check_arity(&self, actual: usize) -> Result<()> {
        if self.accepts(actual) {
            Ok(())
        } else {
            Err(XPathError::arity(
                self.name,
                self.min_arity,
                self.max_arity,
                actual,
            ))
        }
    }

    pub fn param(&self, position: usize) -> Option<&'static ParamType> {
        let params: &'static [ParamType] = self.params;
        params.get(position).or_else(|| params.last())
    }
}

pub trait Function<'a, N: XdmNode<'a>>: Send + Sync {
    fn signature(&self) -> &FunctionSignature;

    /// Runs the function on arguments that already passed arity and type checks.
    fn invoke(
        &self,
        args: Vec<XdmValue<N>>,
        ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>>;

    fn evaluate(
        &self,
        args: Vec<XdmValue<N>>,
        ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let signature = self.signature();
        signature.check_arity(args.len())?;
        let args = convert_arguments(signature, args)?;
        self.invoke(args, ctx)
    }
}

/// Takes the single argument of a one-parameter function.
pub(crate) fn single_arg<N>(args: Vec<XdmValue<N>>, name: &str) -> Result<XdmValue<N>> {
    let actual = args.len();
    let mut iter = args.into_iter();
    match (iter.next(), iter.next()) {
        (Some(arg), None) => Ok(arg),
        _ => Err(XPathError::arity(name, 1, 1, actual)),
    }
}

/// Splits the arguments of a two-parameter function.
pub(crate) fn two_args<N>(
    args: Vec<XdmValue<N>>,
    name: &str,
) -> Result<(XdmValue<N>, XdmValue<N>)> {
    let actual = args.len();
    let mut iter = args.into_iter();
    match (iter.next(), iter.next(), iter.next()) {
        (Some(a), Some(b), None) => Ok((a, b)),
        _ => Err(XPathError::arity(name, 2, 2, actual)),
    }
}

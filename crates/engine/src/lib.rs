//! XPath 2.0 expression core: expression tree, type system, evaluator and
//! function framework.
//!
//! The engine is generic over the node model. Hosts implement
//! [`XdmNode`] for their tree and evaluate already-built [`Expr`] trees; there
//! is no parser in this crate.
//!
//! # Key Types
//!
//! - [`Expr`]: expression tree, built through its constructor functions
//! - [`XdmValue`]: a flat sequence of nodes and atomic values
//! - [`EvaluationContext`]: focus, variables, function library and limits
//! - [`FunctionLibrary`]: registry of [`Function`] implementations
//!
//! # Example
//!
//! ```ignore
//! use xpath2_engine::{Axis, EvaluationConfig, EvaluationContext, Expr, FunctionLibrary, evaluate};
//!
//! let functions = FunctionLibrary::standard();
//! let config = EvaluationConfig::default();
//! let ctx = EvaluationContext::new(&functions, &config).with_context_node(root);
//! let expr = Expr::call("count", vec![Expr::step(Axis::Descendant, "book")]);
//! let result = evaluate(&expr, &ctx)?;
//! ```

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod functions;
pub mod operators;
pub mod qname;
pub mod query;
mod stack;
pub mod types;

pub use ast::{
    ArithmeticOp, Binding, Comparison, ComparisonOp, Expr, Literal, LogicalOp, NameTest,
    NodeComparisonOp, NodeTest, PathStart, Quantifier, SetOp, UnaryOp,
};
pub use config::EvaluationConfig;
pub use engine::{EvaluationContext, evaluate};
pub use error::{ErrorKind, Result, XPathError};
pub use functions::{Function, FunctionLibrary, FunctionSignature, ParamItem, ParamType};
pub use qname::QName;
pub use query::Query;
pub use types::{
    AtomicType, AtomicValue, ItemType, KindTest, OccurrenceIndicator, SequenceType, SingleType,
    XdmItem, XdmValue, cast, castable, instance_of, treat_as,
};

pub use rust_decimal::Decimal;
pub use xpath2_node::{Axis, NodeKind, NodeName, XdmNode};

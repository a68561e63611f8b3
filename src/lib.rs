//! XPath 2.0 expression core.
//!
//! Re-exports the node model ([`xpath2_node`]) and the engine
//! ([`xpath2_engine`]) under one crate. Hosts implement [`XdmNode`] for their
//! tree, build an [`Expr`], and evaluate it against an [`EvaluationContext`].

pub use xpath2_engine::*;

pub use xpath2_node::axes;
pub use xpath2_node::testing;

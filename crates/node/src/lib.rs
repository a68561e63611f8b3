//! The node model the expression engine navigates.
//!
//! The engine never owns documents. It walks any tree that implements
//! [`XdmNode`], so XML trees, virtual DOMs or in-memory fixtures can all be
//! queried the same way.

pub mod axes;
pub mod node;
pub mod testing;

pub use axes::Axis;
pub use node::{NodeKind, NodeName, XdmNode};

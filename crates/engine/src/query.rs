use crate::ast::Expr;
use crate::engine::{EvaluationContext, evaluate};
use crate::error::Result;
use crate::types::XdmValue;
use std::fmt;
use xpath2_node::XdmNode;

/// A top-level, comma-separated list of expressions. Evaluates to the
/// concatenation of each expression's result.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    exprs: Vec<Expr>,
}

impl Query {
    pub fn new(exprs: Vec<Expr>) -> Self {
        Self { exprs }
    }

    pub fn expressions(&self) -> &[Expr] {
        &self.exprs
    }

    pub fn evaluate<'a, N: XdmNode<'a>>(
        &self,
        ctx: &EvaluationContext<'a, '_, N>,
    ) -> Result<XdmValue<N>> {
        let mut out = XdmValue::empty();
        for expr in &self.exprs {
            out = out.concat(evaluate(expr, ctx)?);
        }
        Ok(out)
    }
}

impl From<Expr> for Query {
    fn from(expr: Expr) -> Self {
        Self::new(vec![expr])
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, expr) in self.exprs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", expr)?;
        }
        Ok(())
    }
}

//! Expression evaluation.
//!
//! Entry point: [`evaluate`] with an [`EvaluationContext`]. Evaluation is a
//! synchronous walk over the tree; sub-contexts for predicates, `for` and
//! quantified expressions are derived from the parent, which is never mutated.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::*;
use crate::config::EvaluationConfig;
use crate::error::{Result, XPathError};
use crate::functions::FunctionLibrary;
use crate::operators;
use crate::qname::QName;
use crate::stack;
use crate::types::{self, AtomicValue, XdmItem, XdmValue};
use rust_decimal::Decimal;
use xpath2_node::{Axis, NodeKind, XdmNode};

struct LocalVariable<N> {
    name: QName,
    value: XdmValue<N>,
    parent: Option<Rc<LocalVariable<N>>>,
}

/// The dynamic context: focus (item, position, size), variables, functions and
/// limits.
#[derive(Clone)]
pub struct EvaluationContext<'a, 'd, N: XdmNode<'a>> {
    pub context_item: Option<XdmItem<N>>,
    /// 1-based.
    pub position: usize,
    pub size: usize,
    pub functions: &'d FunctionLibrary<'a, N>,
    pub config: &'d EvaluationConfig,
    globals: Option<&'d HashMap<QName, XdmValue<N>>>,
    locals: Option<Rc<LocalVariable<N>>>,
}

impl<'a, 'd, N: XdmNode<'a>> EvaluationContext<'a, 'd, N> {
    pub fn new(functions: &'d FunctionLibrary<'a, N>, config: &'d EvaluationConfig) -> Self {
        Self {
            context_item: None,
            position: 1,
            size: 1,
            functions,
            config,
            globals: None,
            locals: None,
        }
    }

    pub fn with_context_item(&self, item: XdmItem<N>) -> Self {
        self.with_focus(item, 1, 1)
    }

    pub fn with_context_node(&self, node: N) -> Self {
        self.with_context_item(XdmItem::Node(node))
    }

    pub fn with_focus(&self, item: XdmItem<N>, position: usize, size: usize) -> Self {
        Self {
            context_item: Some(item),
            position,
            size,
            ..self.clone()
        }
    }

    /// Replaces the externally supplied variable bindings.
    pub fn with_variables(&self, variables: &'d HashMap<QName, XdmValue<N>>) -> Self {
        Self {
            globals: Some(variables),
            ..self.clone()
        }
    }

    /// Binds one variable on top of the current scope. Shadows outer bindings
    /// of the same name.
    pub fn with_variable(&self, name: QName, value: XdmValue<N>) -> Self {
        Self {
            locals: Some(Rc::new(LocalVariable {
                name,
                value,
                parent: self.locals.clone(),
            })),
            ..self.clone()
        }
    }

    pub fn variable(&self, name: &QName) -> Option<&XdmValue<N>> {
        let mut scope = self.locals.as_deref();
        while let Some(local) = scope {
            if &local.name == name {
                return Some(&local.value);
            }
            scope = local.parent.as_deref();
        }
        self.globals.and_then(|vars| vars.get(name))
    }

    pub fn context_item(&self) -> Result<&XdmItem<N>> {
        self.context_item.as_ref().ok_or(XPathError::MissingContext)
    }

    pub fn context_node(&self) -> Result<N> {
        match self.context_item()? {
            XdmItem::Node(n) => Ok(*n),
            XdmItem::Atomic(a) => Err(XPathError::type_error(format!(
                "Context item is {}, not a node",
                a.type_name()
            ))),
        }
    }
}

pub fn evaluate<'a, N: XdmNode<'a>>(
    expr: &Expr,
    ctx: &EvaluationContext<'a, '_, N>,
) -> Result<XdmValue<N>> {
    eval(expr, ctx, 0)
}

fn eval<'a, N: XdmNode<'a>>(
    expr: &Expr,
    ctx: &EvaluationContext<'a, '_, N>,
    depth: usize,
) -> Result<XdmValue<N>> {
    if depth > ctx.config.max_depth {
        log::debug!("Evaluation depth limit {} reached", ctx.config.max_depth);
        return Err(XPathError::DepthLimit {
            limit: ctx.config.max_depth,
        });
    }
    stack::ensure_sufficient_stack(|| eval_expr(expr, ctx, depth + 1))
}

fn eval_expr<'a, N: XdmNode<'a>>(
    expr: &Expr,
    ctx: &EvaluationContext<'a, '_, N>,
    depth: usize,
) -> Result<XdmValue<N>> {
    match expr {
        Expr::Literal(lit) => Ok(evaluate_literal(lit)),
        Expr::VarRef(name) => evaluate_variable(name, ctx),
        Expr::ContextItem => Ok(XdmValue::from_item(ctx.context_item()?.clone())),
        Expr::Arithmetic { op, left, right } => {
            let l = eval(left, ctx, depth)?;
            let r = eval(right, ctx, depth)?;
            operators::evaluate_arithmetic(*op, &l, &r)
        }
        Expr::Unary { op, operand } => {
            let value = eval(operand, ctx, depth)?;
            operators::evaluate_unary(*op, &value)
        }
        Expr::Logical { op, left, right } => evaluate_logical(*op, left, right, ctx, depth),
        Expr::Comparison { op, left, right } => {
            let l = eval(left, ctx, depth)?;
            let r = eval(right, ctx, depth)?;
            match op {
                Comparison::General(op) => operators::general_comparison(*op, &l, &r),
                Comparison::Value(op) => operators::value_comparison(*op, &l, &r),
                Comparison::Node(op) => operators::node_comparison(*op, &l, &r),
            }
        }
        Expr::Set { op, left, right } => {
            let l = eval(left, ctx, depth)?;
            let r = eval(right, ctx, depth)?;
            operators::evaluate_set_op(*op, l, r)
        }
        Expr::Range { low, high } => {
            let l = eval(low, ctx, depth)?;
            let h = eval(high, ctx, depth)?;
            operators::evaluate_range(&l, &h, ctx.config)
        }
        Expr::Path { start, steps } => evaluate_path(*start, steps, ctx, depth),
        Expr::AxisStep {
            axis,
            test,
            predicates,
        } => evaluate_axis_step(*axis, test, predicates, ctx, depth),
        Expr::Filter { base, predicates } => {
            let base = eval(base, ctx, depth)?;
            let kept = apply_predicates(base.into_items(), predicates, ctx, depth)?;
            Ok(XdmValue::from_items(kept))
        }
        Expr::FunctionCall { name, args } => evaluate_function_call(name, args, ctx, depth),
        Expr::If {
            condition,
            then_branch,
            else_branch,
        } => {
            if eval(condition, ctx, depth)?.effective_boolean_value()? {
                eval(then_branch, ctx, depth)
            } else {
                eval(else_branch, ctx, depth)
            }
        }
        Expr::For { bindings, body } => {
            let mut out = Vec::new();
            evaluate_for(bindings, body, ctx, depth, &mut out)?;
            Ok(XdmValue::from_items(out))
        }
        Expr::Quantified {
            quantifier,
            bindings,
            satisfies,
        } => evaluate_quantified(*quantifier, bindings, satisfies, ctx, depth)
            .map(XdmValue::from_bool),
        Expr::InstanceOf {
            operand,
            sequence_type,
        } => {
            let value = eval(operand, ctx, depth)?;
            Ok(XdmValue::from_bool(types::instance_of(&value, sequence_type)))
        }
        Expr::Treat {
            operand,
            sequence_type,
        } => types::treat_as(eval(operand, ctx, depth)?, sequence_type),
        Expr::Castable {
            operand,
            single_type,
        } => {
            let value = eval(operand, ctx, depth)?;
            Ok(XdmValue::from_bool(types::castable(&value, single_type)))
        }
        Expr::Cast {
            operand,
            single_type,
        } => types::cast(&eval(operand, ctx, depth)?, single_type),
        Expr::Par(exprs) => {
            let mut out = XdmValue::empty();
            for expr in exprs {
                out = out.concat(eval(expr, ctx, depth)?);
            }
            Ok(out)
        }
    }
}

fn evaluate_literal<N: Copy>(lit: &Literal) -> XdmValue<N> {
    let value = match lit {
        Literal::Integer(i) => AtomicValue::Integer(*i),
        Literal::Decimal(d) => AtomicValue::Decimal(*d),
        Literal::Double(d) => AtomicValue::Double(*d),
        Literal::String(s) => AtomicValue::String(s.clone()),
    };
    XdmValue::from_atomic(value)
}

fn evaluate_variable<'a, N: XdmNode<'a>>(
    name: &QName,
    ctx: &EvaluationContext<'a, '_, N>,
) -> Result<XdmValue<N>> {
    ctx.variable(name).cloned().ok_or_else(|| {
        log::debug!("Unbound variable ${}", name);
        XPathError::UndefinedVariable {
            name: name.to_string(),
        }
    })
}

fn evaluate_logical<'a, N: XdmNode<'a>>(
    op: LogicalOp,
    left: &Expr,
    right: &Expr,
    ctx: &EvaluationContext<'a, '_, N>,
    depth: usize,
) -> Result<XdmValue<N>> {
    let l = eval(left, ctx, depth)?.effective_boolean_value()?;
    let result = match (op, l) {
        (LogicalOp::And, false) => false,
        (LogicalOp::Or, true) => true,
        _ => eval(right, ctx, depth)?.effective_boolean_value()?,
    };
    Ok(XdmValue::from_bool(result))
}

fn evaluate_path<'a, N: XdmNode<'a>>(
    start: PathStart,
    steps: &[Expr],
    ctx: &EvaluationContext<'a, '_, N>,
    depth: usize,
) -> Result<XdmValue<N>> {
    let (mut current, remaining) = match start {
        PathStart::Relative => match steps.split_first() {
            Some((first, rest)) => (eval(first, ctx, depth)?, rest),
            None => return Ok(XdmValue::from_item(ctx.context_item()?.clone())),
        },
        PathStart::Root => (XdmValue::from_node(document_root(ctx)?), steps),
        PathStart::RootDescendants => {
            let root = document_root(ctx)?;
            (
                XdmValue::from_nodes(root.axis(Axis::DescendantOrSelf)),
                steps,
            )
        }
    };
    for step in remaining {
        current = apply_step(current, step, ctx, depth)?;
    }
    Ok(current)
}

/// The root of the context node's tree, which a leading `/` requires to be a
/// document node.
fn document_root<'a, N: XdmNode<'a>>(ctx: &EvaluationContext<'a, '_, N>) -> Result<N> {
    let root = ctx.context_node()?.root();
    if root.kind() == NodeKind::Document {
        Ok(root)
    } else {
        log::debug!("Path rooted at a {:?} node instead of a document", root.kind());
        Err(XPathError::TreatMismatch {
            expected: "document-node()".to_string(),
        })
    }
}

/// Evaluates `step` once per item of `input`. Node results are merged into
/// document order without duplicates; a purely atomic result keeps its order.
fn apply_step<'a, N: XdmNode<'a>>(
    input: XdmValue<N>,
    step: &Expr,
    ctx: &EvaluationContext<'a, '_, N>,
    depth: usize,
) -> Result<XdmValue<N>> {
    let size = input.len();
    let mut nodes = Vec::new();
    let mut atomics = Vec::new();
    for (i, item) in input.into_iter().enumerate() {
        if let XdmItem::Atomic(a) = &item {
            return Err(XPathError::type_error(format!(
                "Path step applied to {}, not a node",
                a.type_name()
            )));
        }
        let focus = ctx.with_focus(item, i + 1, size);
        for result in eval(step, &focus, depth)? {
            match result {
                XdmItem::Node(n) => nodes.push(n),
                XdmItem::Atomic(a) => atomics.push(a),
            }
        }
    }
    match (nodes.is_empty(), atomics.is_empty()) {
        (_, true) => Ok(XdmValue::from_nodes(operators::document_order(nodes))),
        (true, false) => Ok(atomics.into_iter().map(XdmItem::Atomic).collect()),
        (false, false) => Err(XPathError::type_error(
            "Path step returned a mix of nodes and atomic values",
        )),
    }
}

fn evaluate_axis_step<'a, N: XdmNode<'a>>(
    axis: Axis,
    test: &NodeTest,
    predicates: &[Expr],
    ctx: &EvaluationContext<'a, '_, N>,
    depth: usize,
) -> Result<XdmValue<N>> {
    let node = ctx.context_node()?;
    let candidates: Vec<XdmItem<N>> = node
        .axis(axis)
        .into_iter()
        .filter(|n| matches_node_test(*n, test, axis))
        .map(XdmItem::Node)
        .collect();
    // Predicates count positions along the axis; reverse axes are nearest first.
    let mut kept = apply_predicates(candidates, predicates, ctx, depth)?;
    if axis.is_reverse() {
        kept.reverse();
    }
    Ok(XdmValue::from_items(kept))
}

pub(crate) fn matches_node_test<'a, N: XdmNode<'a>>(node: N, test: &NodeTest, axis: Axis) -> bool {
    match test {
        NodeTest::Kind(kind) => kind.matches(node),
        NodeTest::Name(name_test) => {
            if node.kind() != axis.principal_node_kind() {
                return false;
            }
            let Some(name) = node.name() else {
                return false;
            };
            match name_test {
                NameTest::Wildcard => true,
                NameTest::Name(expected) => expected.matches_node_name(&name),
                NameTest::PrefixWildcard(prefix) => name.prefix == Some(prefix.as_str()),
                NameTest::LocalWildcard(local) => name.local_part == local,
            }
        }
    }
}

fn apply_predicates<'a, N: XdmNode<'a>>(
    items: Vec<XdmItem<N>>,
    predicates: &[Expr],
    ctx: &EvaluationContext<'a, '_, N>,
    depth: usize,
) -> Result<Vec<XdmItem<N>>> {
    let mut current = items;
    for predicate in predicates {
        let size = current.len();
        let mut kept = Vec::with_capacity(size);
        for (i, item) in current.into_iter().enumerate() {
            let focus = ctx.with_focus(item.clone(), i + 1, size);
            let result = eval(predicate, &focus, depth)?;
            if predicate_truth(&result, i + 1)? {
                kept.push(item);
            }
        }
        current = kept;
    }
    Ok(current)
}

/// A single numeric result selects by position, anything else is reduced to
/// its effective boolean value.
fn predicate_truth<N: Copy>(result: &XdmValue<N>, position: usize) -> Result<bool> {
    match result.single() {
        Some(XdmItem::Atomic(AtomicValue::Integer(i))) => Ok(*i == position as i64),
        Some(XdmItem::Atomic(AtomicValue::Decimal(d))) => Ok(*d == Decimal::from(position)),
        Some(XdmItem::Atomic(AtomicValue::Double(d))) => Ok(*d == position as f64),
        _ => result.effective_boolean_value(),
    }
}

fn evaluate_function_call<'a, N: XdmNode<'a>>(
    name: &QName,
    args: &[Expr],
    ctx: &EvaluationContext<'a, '_, N>,
    depth: usize,
) -> Result<XdmValue<N>> {
    let function = ctx.functions.resolve(name, args.len())?;
    let values = args
        .iter()
        .map(|arg| eval(arg, ctx, depth))
        .collect::<Result<Vec<_>>>()?;
    log::trace!("Calling {} with {} arguments", name, values.len());
    function.evaluate(values, ctx)
}

fn evaluate_for<'a, N: XdmNode<'a>>(
    bindings: &[Binding],
    body: &Expr,
    ctx: &EvaluationContext<'a, '_, N>,
    depth: usize,
    out: &mut Vec<XdmItem<N>>,
) -> Result<()> {
    let Some((binding, rest)) = bindings.split_first() else {
        out.extend(eval(body, ctx, depth)?);
        return Ok(());
    };
    for item in eval(&binding.sequence, ctx, depth)? {
        let inner = ctx.with_variable(binding.variable.clone(), XdmValue::from_item(item));
        evaluate_for(rest, body, &inner, depth, out)?;
    }
    Ok(())
}

fn evaluate_quantified<'a, N: XdmNode<'a>>(
    quantifier: Quantifier,
    bindings: &[Binding],
    satisfies: &Expr,
    ctx: &EvaluationContext<'a, '_, N>,
    depth: usize,
) -> Result<bool> {
    let Some((binding, rest)) = bindings.split_first() else {
        return eval(satisfies, ctx, depth)?.effective_boolean_value();
    };
    for item in eval(&binding.sequence, ctx, depth)? {
        let inner = ctx.with_variable(binding.variable.clone(), XdmValue::from_item(item));
        let holds = evaluate_quantified(quantifier, rest, satisfies, &inner, depth)?;
        match (quantifier, holds) {
            (Quantifier::Some, true) => return Ok(true),
            (Quantifier::Every, false) => return Ok(false),
            _ => {}
        }
    }
    Ok(quantifier == Quantifier::Every)
}

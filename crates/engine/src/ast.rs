//! Expression tree types.
//!
//! The tree is a closed sum type: every construct the evaluator understands is
//! a variant of [`Expr`], children are owned exclusively and nothing is mutated
//! after construction. A front end builds trees through the constructor
//! functions on [`Expr`], one per variant.

use crate::qname::QName;
use crate::types::{KindTest, SequenceType, SingleType};
use rust_decimal::Decimal;
use std::fmt;

pub use xpath2_node::Axis;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Decimal(Decimal),
    Double(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    IDiv,
    Mod,
}

impl ArithmeticOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "div",
            ArithmeticOp::IDiv => "idiv",
            ArithmeticOp::Mod => "mod",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

/// `=`/`eq`, `!=`/`ne` and so on; the same six relations serve general and
/// value comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    pub fn general_symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        }
    }

    pub fn value_symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Ne => "ne",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Le => "le",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Ge => "ge",
        }
    }

    /// Only `eq` and `ne` are defined for unordered types.
    pub fn is_equality(self) -> bool {
        matches!(self, ComparisonOp::Eq | ComparisonOp::Ne)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeComparisonOp {
    Is,
    Precedes,
    Follows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    General(ComparisonOp),
    Value(ComparisonOp),
    Node(NodeComparisonOp),
}

impl Comparison {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::General(op) => op.general_symbol(),
            Comparison::Value(op) => op.value_symbol(),
            Comparison::Node(NodeComparisonOp::Is) => "is",
            Comparison::Node(NodeComparisonOp::Precedes) => "<<",
            Comparison::Node(NodeComparisonOp::Follows) => ">>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOp {
    Union,
    /// `|`, evaluated exactly like `union`.
    Pipe,
    Intersect,
    Except,
}

impl SetOp {
    pub fn symbol(self) -> &'static str {
        match self {
            SetOp::Union => "union",
            SetOp::Pipe => "|",
            SetOp::Intersect => "intersect",
            SetOp::Except => "except",
        }
    }
}

/// Where a path starts: the context item, the root of the context node (`/`),
/// or every node below that root (`//`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStart {
    Relative,
    Root,
    RootDescendants,
}

impl PathStart {
    pub fn from_slash_count(slashes: usize) -> Option<Self> {
        match slashes {
            0 => Some(PathStart::Relative),
            1 => Some(PathStart::Root),
            2 => Some(PathStart::RootDescendants),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NameTest {
    Name(QName),
    /// `*`
    Wildcard,
    /// `prefix:*`
    PrefixWildcard(String),
    /// `*:local`
    LocalWildcard(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeTest {
    Name(NameTest),
    Kind(KindTest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    Some,
    Every,
}

/// One `$name in expr` clause of a `for` or quantified expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub variable: QName,
    pub sequence: Expr,
}

impl Binding {
    pub fn new(variable: QName, sequence: Expr) -> Self {
        Self { variable, sequence }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    VarRef(QName),
    ContextItem,
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Comparison {
        op: Comparison,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Set {
        op: SetOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Range {
        low: Box<Expr>,
        high: Box<Expr>,
    },
    Path {
        start: PathStart,
        steps: Vec<Expr>,
    },
    AxisStep {
        axis: Axis,
        test: NodeTest,
        predicates: Vec<Expr>,
    },
    Filter {
        base: Box<Expr>,
        predicates: Vec<Expr>,
    },
    FunctionCall {
        name: QName,
        args: Vec<Expr>,
    },
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    For {
        bindings: Vec<Binding>,
        body: Box<Expr>,
    },
    Quantified {
        quantifier: Quantifier,
        bindings: Vec<Binding>,
        satisfies: Box<Expr>,
    },
    InstanceOf {
        operand: Box<Expr>,
        sequence_type: SequenceType,
    },
    Treat {
        operand: Box<Expr>,
        sequence_type: SequenceType,
    },
    Castable {
        operand: Box<Expr>,
        single_type: SingleType,
    },
    Cast {
        operand: Box<Expr>,
        single_type: SingleType,
    },
    /// A parenthesized, comma-separated expression list; `()` when empty.
    Par(Vec<Expr>),
}

impl Expr {
    pub fn integer(value: i64) -> Self {
        Expr::Literal(Literal::Integer(value))
    }

    pub fn decimal(value: Decimal) -> Self {
        Expr::Literal(Literal::Decimal(value))
    }

    pub fn double(value: f64) -> Self {
        Expr::Literal(Literal::Double(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    pub fn var_ref(name: QName) -> Self {
        Expr::VarRef(name)
    }

    /// `$name` with an unprefixed name.
    pub fn var(name: &str) -> Self {
        Expr::VarRef(QName::local(name))
    }

    pub fn context_item() -> Self {
        Expr::ContextItem
    }

    pub fn arithmetic(op: ArithmeticOp, left: Expr, right: Expr) -> Self {
        Expr::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Self {
        Expr::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn comparison(op: Comparison, left: Expr, right: Expr) -> Self {
        Expr::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn general(op: ComparisonOp, left: Expr, right: Expr) -> Self {
        Self::comparison(Comparison::General(op), left, right)
    }

    pub fn value(op: ComparisonOp, left: Expr, right: Expr) -> Self {
        Self::comparison(Comparison::Value(op), left, right)
    }

    pub fn set(op: SetOp, left: Expr, right: Expr) -> Self {
        Expr::Set {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn range(low: Expr, high: Expr) -> Self {
        Expr::Range {
            low: Box::new(low),
            high: Box::new(high),
        }
    }

    pub fn path(start: PathStart, steps: Vec<Expr>) -> Self {
        Expr::Path { start, steps }
    }

    pub fn axis_step(axis: Axis, test: NodeTest, predicates: Vec<Expr>) -> Self {
        Expr::AxisStep {
            axis,
            test,
            predicates,
        }
    }

    /// `axis::name` without predicates.
    pub fn step(axis: Axis, name: &str) -> Self {
        let test = if name == "*" {
            NameTest::Wildcard
        } else {
            NameTest::Name(QName::parse(name))
        };
        Self::axis_step(axis, NodeTest::Name(test), Vec::new())
    }

    pub fn kind_step(axis: Axis, test: KindTest) -> Self {
        Self::axis_step(axis, NodeTest::Kind(test), Vec::new())
    }

    pub fn filter(base: Expr, predicates: Vec<Expr>) -> Self {
        Expr::Filter {
            base: Box::new(base),
            predicates,
        }
    }

    pub fn function_call(name: QName, args: Vec<Expr>) -> Self {
        Expr::FunctionCall { name, args }
    }

    /// Call by lexical name, e.g. `"fn:count"` or `"true"`.
    pub fn call(name: &str, args: Vec<Expr>) -> Self {
        Self::function_call(QName::parse(name), args)
    }

    pub fn if_then_else(condition: Expr, then_branch: Expr, else_branch: Expr) -> Self {
        Expr::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn for_return(bindings: Vec<Binding>, body: Expr) -> Self {
        Expr::For {
            bindings,
            body: Box::new(body),
        }
    }

    pub fn quantified(quantifier: Quantifier, bindings: Vec<Binding>, satisfies: Expr) -> Self {
        Expr::Quantified {
            quantifier,
            bindings,
            satisfies: Box::new(satisfies),
        }
    }

    pub fn instance_of(operand: Expr, sequence_type: SequenceType) -> Self {
        Expr::InstanceOf {
            operand: Box::new(operand),
            sequence_type,
        }
    }

    pub fn treat(operand: Expr, sequence_type: SequenceType) -> Self {
        Expr::Treat {
            operand: Box::new(operand),
            sequence_type,
        }
    }

    pub fn castable(operand: Expr, single_type: SingleType) -> Self {
        Expr::Castable {
            operand: Box::new(operand),
            single_type,
        }
    }

    pub fn cast(operand: Expr, single_type: SingleType) -> Self {
        Expr::Cast {
            operand: Box::new(operand),
            single_type,
        }
    }

    pub fn par(exprs: Vec<Expr>) -> Self {
        Expr::Par(exprs)
    }

    /// `()`
    pub fn empty_sequence() -> Self {
        Expr::Par(Vec::new())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Decimal(d) => write!(f, "{}", crate::types::format_decimal(*d)),
            Literal::Double(d) => write!(f, "{:E}", d),
            Literal::String(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
        }
    }
}

impl fmt::Display for NameTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameTest::Name(name) => write!(f, "{}", name),
            NameTest::Wildcard => f.write_str("*"),
            NameTest::PrefixWildcard(prefix) => write!(f, "{}:*", prefix),
            NameTest::LocalWildcard(local) => write!(f, "*:{}", local),
        }
    }
}

impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeTest::Name(test) => write!(f, "{}", test),
            NodeTest::Kind(test) => write!(f, "{}", test),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, exprs: &[Expr], separator: &str) -> fmt::Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", expr)?;
    }
    Ok(())
}

fn write_predicates(f: &mut fmt::Formatter<'_>, predicates: &[Expr]) -> fmt::Result {
    for predicate in predicates {
        write!(f, "[{}]", predicate)?;
    }
    Ok(())
}

fn write_bindings(f: &mut fmt::Formatter<'_>, bindings: &[Binding]) -> fmt::Result {
    for (i, binding) in bindings.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "${} in {}", binding.variable, binding.sequence)?;
    }
    Ok(())
}

/// Renders fully parenthesized XPath syntax, for diagnostics.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => write!(f, "{}", literal),
            Expr::VarRef(name) => write!(f, "${}", name),
            Expr::ContextItem => f.write_str("."),
            Expr::Arithmetic { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Expr::Unary { op, operand } => match op {
                UnaryOp::Plus => write!(f, "(+{})", operand),
                UnaryOp::Minus => write!(f, "(-{})", operand),
            },
            Expr::Logical { op, left, right } => {
                let symbol = match op {
                    LogicalOp::And => "and",
                    LogicalOp::Or => "or",
                };
                write!(f, "({} {} {})", left, symbol, right)
            }
            Expr::Comparison { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Expr::Set { op, left, right } => write!(f, "({} {} {})", left, op.symbol(), right),
            Expr::Range { low, high } => write!(f, "({} to {})", low, high),
            Expr::Path { start, steps } => {
                match start {
                    PathStart::Relative => {}
                    PathStart::Root => f.write_str("/")?,
                    PathStart::RootDescendants => f.write_str("//")?,
                }
                write_list(f, steps, "/")
            }
            Expr::AxisStep {
                axis,
                test,
                predicates,
            } => {
                write!(f, "{}::{}", axis, test)?;
                write_predicates(f, predicates)
            }
            Expr::Filter { base, predicates } => {
                write!(f, "{}", base)?;
                write_predicates(f, predicates)
            }
            Expr::FunctionCall { name, args } => {
                write!(f, "{}(", name)?;
                write_list(f, args, ", ")?;
                f.write_str(")")
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => write!(
                f,
                "if ({}) then {} else {}",
                condition, then_branch, else_branch
            ),
            Expr::For { bindings, body } => {
                f.write_str("for ")?;
                write_bindings(f, bindings)?;
                write!(f, " return {}", body)
            }
            Expr::Quantified {
                quantifier,
                bindings,
                satisfies,
            } => {
                f.write_str(match quantifier {
                    Quantifier::Some => "some ",
                    Quantifier::Every => "every ",
                })?;
                write_bindings(f, bindings)?;
                write!(f, " satisfies {}", satisfies)
            }
            Expr::InstanceOf {
                operand,
                sequence_type,
            } => write!(f, "({} instance of {})", operand, sequence_type),
            Expr::Treat {
                operand,
                sequence_type,
            } => write!(f, "({} treat as {})", operand, sequence_type),
            Expr::Castable {
                operand,
                single_type,
            } => write!(f, "({} castable as {})", operand, single_type),
            Expr::Cast {
                operand,
                single_type,
            } => write!(f, "({} cast as {})", operand, single_type),
            Expr::Par(exprs) => {
                f.write_str("(")?;
                write_list(f, exprs, ", ")?;
                f.write_str(")")
            }
        }
    }
}

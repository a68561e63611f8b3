use super::*;
use crate::ast::ArithmeticOp;
use std::collections::HashMap;
use std::fmt;

/// Immutable registry of callable functions, keyed by expanded name. Several
/// entries may share a name as long as their arity ranges differ.
pub struct FunctionLibrary<'a, N: XdmNode<'a>> {
    functions: HashMap<(String, String), Vec<Box<dyn Function<'a, N>>>>,
}

impl<'a, N: XdmNode<'a>> Default for FunctionLibrary<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, N: XdmNode<'a>> fmt::Debug for FunctionLibrary<'a, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self
            .functions
            .keys()
            .map(|(prefix, local)| format!("{}:{}", prefix, local))
            .collect();
        names.sort();
        f.debug_struct("FunctionLibrary")
            .field("functions", &names)
            .finish()
    }
}

/// Unprefixed names live in the `fn` namespace.
fn key(name: &QName) -> (String, String) {
    (
        name.prefix.clone().unwrap_or_else(|| "fn".to_string()),
        name.local_part.clone(),
    )
}

impl<'a, N: XdmNode<'a>> FunctionLibrary<'a, N> {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// The operator functions plus the boolean, sequence and context
    /// functions of the `fn` namespace.
    pub fn standard() -> Self {
        let mut library = Self::new();
        library.register(Box::new(OpUnion));
        library.register(Box::new(OpIntersect));
        library.register(Box::new(OpExcept));
        for op in [
            ArithmeticOp::Add,
            ArithmeticOp::Sub,
            ArithmeticOp::Mul,
            ArithmeticOp::Div,
            ArithmeticOp::IDiv,
            ArithmeticOp::Mod,
        ] {
            library.register(Box::new(NumericOperator(op)));
        }
        library.register(Box::new(FnTrue));
        library.register(Box::new(FnFalse));
        library.register(Box::new(FnNot));
        library.register(Box::new(FnBoolean));
        library.register(Box::new(FnCount));
        library.register(Box::new(FnEmpty));
        library.register(Box::new(FnExists));
        library.register(Box::new(FnData));
        library.register(Box::new(FnPosition));
        library.register(Box::new(FnLast));
        library.register(Box::new(FnString));
        library.register(Box::new(FnRoot));
        library
    }

    pub fn register(&mut self, function: Box<dyn Function<'a, N>>) {
        let name = function.signature().qname();
        self.functions.entry(key(&name)).or_default().push(function);
    }

    pub fn contains(&self, name: &QName) -> bool {
        self.functions.contains_key(&key(name))
    }

    /// Picks the entry whose arity range accepts `arity`. When the name exists
    /// but no range fits, the first entry is returned so its arity check
    /// reports the mismatch.
    pub fn resolve(&self, name: &QName, arity: usize) -> Result<&dyn Function<'a, N>> {
        let Some(candidates) = self.functions.get(&key(name)) else {
            log::debug!("Unknown function {}#{}", name, arity);
            return Err(XPathError::UndefinedFunction {
                name: name.to_string(),
                arity,
            });
        };
        candidates
            .iter()
            .find(|f| f.signature().accepts(arity))
            .or_else(|| candidates.first())
            .map(|f| &**f)
            .ok_or_else(|| XPathError::UndefinedFunction {
                name: name.to_string(),
                arity,
            })
    }
}

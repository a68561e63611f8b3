#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationConfig {
    /// The deepest expression nesting the evaluator will recurse into before
    /// failing with [`XPathError::DepthLimit`](crate::XPathError::DepthLimit).
    ///
    /// Each nested sub-expression, path step and predicate counts as one
    /// level. The evaluator grows its stack on demand, so the limit bounds
    /// memory rather than the caller's thread stack size.
    ///
    /// Defaults to `1024`.
    pub max_depth: usize,

    /// The longest sequence a range expression (`a to b`) may produce. Larger
    /// ranges fail with [`XPathError::RangeLimit`](crate::XPathError::RangeLimit)
    /// instead of allocating.
    ///
    /// Defaults to `10_000_000`.
    pub max_range_len: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            max_depth: 1024,
            max_range_len: 10_000_000,
        }
    }
}

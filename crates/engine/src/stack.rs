//! Stack growth for the recursive evaluator.
//!
//! Debug builds spend several kilobytes of stack per nesting level, so a
//! default thread runs out long before `max_depth` is reached. On native
//! targets `stacker` allocates a fresh segment whenever the remaining stack
//! drops below the red zone.

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Stack that must remain before descending another level.
    const RED_ZONE: usize = 128 * 1024;

    /// Size of each newly allocated segment.
    const SEGMENT: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

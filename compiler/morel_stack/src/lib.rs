//! Stack growth for deep term traversal.
//!
//! The unify/compare engine recurses once per level of term nesting, so a
//! long list or a deeply nested tree would overflow a fixed-size thread
//! stack. Every recursive entry into the engine goes through
//! [`ensure_sufficient_stack`], which grows the stack on demand instead.
//!
//! # Platform Support
//!
//! - **Native targets**: `stacker` allocates a fresh segment when the
//!   remaining stack falls below the red zone.
//! - **WASM targets**: passthrough; the host manages the stack.
//!
//! # Sizing
//!
//! - **Red zone**: 64KB. One engine frame (plus a user procedure it may
//!   call) fits comfortably.
//! - **Segment size**: 1MB per growth.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

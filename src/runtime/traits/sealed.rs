// ABOUTME: Sealed trait pattern for runtime traits.
// ABOUTME: Only the bollard runtime and the test double implement them.

/// Sealed trait to prevent external implementations.
pub trait Sealed {}

//! Tween engine error types

use thiserror::Error;

/// Errors raised by misuse of timelines and handlers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TweenError {
    /// A clear/remove call hit a handler that forbids removing timelines
    #[error("Removing timelines is forbidden on this handler")]
    RemovalForbidden,

    /// Awaiting a timeline that repeats forever would never return
    #[error("Cannot await completion of an infinitely repeating timeline")]
    InfiniteAwait,
}

/// Result type for tween operations
pub type Result<T> = std::result::Result<T, TweenError>;

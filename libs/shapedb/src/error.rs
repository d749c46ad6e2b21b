//! Shape database errors.

use crate::ShapeId;

/// The [`Error`] result type.
pub type Result<T> = std::result::Result<T, Error>;

/// A shape database error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A shape was created outside of an update session.
    #[error("shapes may only be created inside an update session")]
    NoSession,
    /// A shape identifier did not refer to any shape.
    #[error("no shape with id {0:?}")]
    UnknownShape(ShapeId),
    /// An update session was closed more times than it was opened.
    #[error("update session closed without being opened")]
    UnbalancedSession,
}

//! Access and exception hooks.

use daedalus_core::{Args, HandlerError, ResponseEnvelope};
use http::Method;

/// What an access hook sees before a handler runs.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    /// The requested URI, with any format suffix removed.
    pub url: &'a str,
    /// The pattern of the matched route.
    pub pattern: &'a str,
    /// The effective verb.
    pub verb: &'a Method,
    /// The bound arguments.
    pub args: &'a Args,
}

/// Decides whether a resolved request may run.
///
/// An `Err` skips the handler and is answered like a handler error.
pub type AccessHook = dyn Fn(&AccessRequest<'_>) -> Result<(), HandlerError> + Send + Sync;

/// Sees every handler, access-hook and panic error before it is answered.
///
/// `Some` replaces the envelope that would have been sent.
pub type ExceptionHook = dyn Fn(&HandlerError) -> Option<ResponseEnvelope> + Send + Sync;

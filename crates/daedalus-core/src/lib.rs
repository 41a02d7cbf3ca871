//! # Daedalus Core
//!
//! Core types shared by every Daedalus crate:
//!
//! - [`Handler`] - a bound resource method or a free function
//! - [`HandlerDescriptor`] - parameter and return metadata built from a
//!   [`Signature`] and its doc block
//! - [`RequestContext`] - the already-parsed request a dispatch works on
//! - [`bind`] - turns a descriptor plus request data into [`Args`]
//! - [`ResponseEnvelope`] - the `{status, data}` / `{status, error, message}`
//!   wrapper every dispatch produces
//! - [`DispatchError`] and [`HandlerError`] - the error taxonomy

#![doc(html_root_url = "https://docs.rs/daedalus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binder;
mod context;
pub mod description;
mod descriptor;
pub mod doc;
mod envelope;
mod error;
mod handler;

pub use binder::{bind, COLLECT_ALL, SUPPRESS_STATUS_CODE};
pub use context::{RequestContext, METHOD_OVERRIDE_HEADER};
pub use descriptor::{
    argument_name, HandlerDescriptor, ParamDecl, ParamInfo, ParamSource, ReturnInfo, Signature,
    TypeTag,
};
pub use doc::DocBlock;
pub use envelope::{DebugInfo, ResponseEnvelope};
pub use error::{DispatchError, DispatchResult, HandlerError, HandlerResult};
pub use handler::{Args, FunctionHandler, Handler, HandlerFn, MethodDecl, Resource};

pub use daedalus_router::{Captures, VerbKey};

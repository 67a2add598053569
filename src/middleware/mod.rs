//! Middleware module
//!
//! Response decoration and request logging applied at the router boundary

pub mod cors;
pub mod logging;

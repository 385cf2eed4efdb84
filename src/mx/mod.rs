//! DNS MX resolution.
//!
//! [`resolve_mx`] normalises the domain, queries a [`LookupMx`] implementation
//! and returns the hosts sorted by ascending preference. Production code uses
//! [`build_resolver`]; tests substitute a stub.

mod error;
mod resolver;
mod types;

pub use error::MxError;
pub use resolver::{LookupMx, build_resolver, resolve_mx};
pub use types::{MxHost, MxStatus};

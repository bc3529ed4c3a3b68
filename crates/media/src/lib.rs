//! Local media plumbing shared by the transfer tools: path resolution,
//! default content types, and data-URL encoding of downloaded payloads.

pub mod data_url;
pub mod error;
pub mod mime;
pub mod paths;

pub use error::{Error, Result};

//! Runtime support for generated Workday Web Services clients.

pub mod config;
pub mod error;
pub mod fault;
pub mod reference;
pub mod request;
pub mod soap;
pub mod xml;

pub use config::Configuration;
pub use error::Error;
pub use fault::{Fault, ValidationError};
pub use reqwest;

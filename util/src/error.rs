use thiserror::Error;

use super::{fault::Fault, xml};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration value {0} must be set")]
    MissingConfiguration(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unable to build service URL")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response Content-Type {0:?}")]
    UnexpectedContentType(String),

    #[error("Error processing XML")]
    Xml(#[from] xml::Error),

    #[error("Remote fault: {0}")]
    Fault(#[from] Fault),

    #[error("Unable to convert element: {0}")]
    Conversion(#[from] xml::ConversionError),

    #[error("Cannot add request references to a request of type {request_type}")]
    UnsupportedRequestShape { request_type: &'static str },

    #[error("Reference has no ID of type {id_type} (available: {})", .available.join(", "))]
    IdTypeNotFound {
        id_type: String,
        available: Vec<String>,
    },
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to parse provided URL")]
    UrlParseError(#[from] url::ParseError),

    #[error("Unable to convert provided path")]
    PathConversionError(Option<std::io::Error>),

    #[error("Unable to open file")]
    FileOpenError(std::io::Error),

    #[error("Unable to get file from server")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unsupported URL scheme {0}")]
    UnsupportedScheme(String),

    #[error("Error parsing XML input")]
    XmlParseError(#[from] wws_util::xml::Error),

    #[error("Malformed WSDL: {0}")]
    Malformed(#[from] Malformed),
}

/// A document that is well-formed XML but does not have the shape of a
/// Workday service description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    #[error("{parent} has no {name} element")]
    MissingElement { parent: String, name: String },

    #[error("{element} has no {name} attribute")]
    MissingAttribute { element: String, name: String },

    #[error("Expected exactly one {what}, found {found}")]
    NotSingle { what: String, found: usize },
}

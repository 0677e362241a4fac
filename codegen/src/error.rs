use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error parsing WSDL")]
    Wsdl(#[from] wws_wsdl::error::Error),

    #[error("Unable to render {item}: {value:?} is not a valid Rust {expected}")]
    TemplateRender {
        item: String,
        value: String,
        expected: &'static str,
    },

    #[error("Operations {first} and {second} both map to method {method}")]
    DuplicateMethod {
        first: String,
        second: String,
        method: String,
    },

    #[error("Operation {operation} maps to {method}, which the generated client already defines")]
    ReservedMethod { operation: String, method: String },

    #[error("Generated client does not parse")]
    Syntax(#[from] syn::Error),
}

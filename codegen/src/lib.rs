use proc_macro2::TokenStream;
use tracing::debug;
use wws_wsdl::{self as wsdl, types::Endpoint};

mod codegen;
mod preprocessor;
mod types;

pub mod error;

use codegen::Codegen;

pub use preprocessor::{doc_lines, identifier_safe};
pub use types::Options;

const HEADER: &str = "// Generated from the Workday service description. Do not edit by hand.\n\n";

pub fn from_url<S: AsRef<str>>(url: S, options: &Options) -> Result<TokenStream, error::Error> {
    let endpoint = wsdl::parse(url)?;
    from_endpoint(&endpoint, options)
}

pub fn from_endpoint(endpoint: &Endpoint, options: &Options) -> Result<TokenStream, error::Error> {
    let client = preprocessor::preprocess(endpoint, options)?;

    debug!(
        client = %client.ident,
        methods = client.methods.len(),
        "generating client"
    );

    Ok(client.codegen())
}

/// Renders the client as a formatted source file.
pub fn render(endpoint: &Endpoint, options: &Options) -> Result<String, error::Error> {
    let file = syn::parse2::<syn::File>(from_endpoint(endpoint, options)?)?;
    Ok(format!("{}{}", HEADER, prettyplease::unparse(&file)))
}

pub fn client_name(endpoint: &Endpoint) -> String {
    format!("{}Client", identifier_safe(&endpoint.name))
}

pub fn file_name(endpoint: &Endpoint) -> String {
    format!("{}.rs", client_name(endpoint))
}

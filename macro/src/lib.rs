extern crate proc_macro;

use std::path::Path;

use proc_macro::TokenStream;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, LitStr, Token,
};
use wws_codegen::{self as codegen, Options};

struct Input {
    source: LitStr,
    types_path: Option<LitStr>,
}

impl Parse for Input {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let source = input.parse()?;

        let types_path = if input.parse::<Option<Token![,]>>()?.is_some() && !input.is_empty() {
            Some(input.parse()?)
        } else {
            None
        };

        Ok(Self { source, types_path })
    }
}

/// Relative paths are taken from the invoking crate's manifest directory.
fn locate(source: &str) -> String {
    let is_url = source.contains("://");

    match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(root) if !is_url && Path::new(source).is_relative() => {
            Path::new(&root).join(source).to_string_lossy().into_owned()
        }
        _ => source.to_owned(),
    }
}

fn describe(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

fn expand(input: Input) -> syn::Result<proc_macro2::TokenStream> {
    let mut options = Options::default();
    if let Some(types_path) = &input.types_path {
        options.types_path = types_path.value();
    }

    codegen::from_url(locate(&input.source.value()), &options)
        .map_err(|err| syn::Error::new(input.source.span(), describe(&err)))
}

/// Expands to a `{Endpoint}Client` for the given WSDL file or URL.
///
/// ```ignore
/// mod types { /* typed elements */ }
/// mod client { wws_macro::wws!("Human_Resources.wsdl"); }
/// ```
///
/// A second argument overrides the module the request and response types
/// are taken from: `wws!("Human_Resources.wsdl", "crate::hr")`.
#[proc_macro]
pub fn wws(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as Input);

    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

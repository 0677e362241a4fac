use std::collections::HashMap;

use proc_macro2::Ident;
use wws_wsdl::types::Endpoint;

use super::{
    error::Error,
    types::{Client, Method, Options},
};

const FORBIDDEN_CHARACTERS: [char; 2] = ['-', '.'];

/// Items every generated client defines alongside its operation methods.
const RESERVED_ITEMS: [&str; 6] = [
    "new",
    "with_http_client",
    "from_client",
    "client",
    "ENDPOINT",
    "VERSION",
];

pub fn identifier_safe(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN_CHARACTERS.contains(c))
        .collect()
}

/// One doc attribute per line, each with the leading space `///` would add.
pub fn doc_lines(documentation: &str) -> Vec<String> {
    documentation
        .lines()
        .map(|line| format!(" {}", line.trim_end()))
        .collect()
}

fn ident(item: &str, name: &str) -> Result<Ident, Error> {
    syn::parse_str::<Ident>(name).map_err(|_| Error::TemplateRender {
        item: item.to_owned(),
        value: name.to_owned(),
        expected: "identifier",
    })
}

fn path(item: &str, value: &str) -> Result<syn::Path, Error> {
    syn::parse_str::<syn::Path>(value).map_err(|_| Error::TemplateRender {
        item: item.to_owned(),
        value: value.to_owned(),
        expected: "path",
    })
}

pub fn preprocess(endpoint: &Endpoint, options: &Options) -> Result<Client, Error> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut methods = Vec::with_capacity(endpoint.operations.len());

    for operation in &endpoint.operations {
        let item = format!("operation {}", operation.name);
        let method = identifier_safe(&operation.name);

        if RESERVED_ITEMS.contains(&method.as_str()) {
            return Err(Error::ReservedMethod {
                operation: operation.name.clone(),
                method,
            });
        }

        if let Some(first) = seen.insert(method.clone(), &operation.name) {
            return Err(Error::DuplicateMethod {
                first: first.to_owned(),
                second: operation.name.clone(),
                method,
            });
        }

        methods.push(Method {
            ident: ident(&item, &method)?,
            doc: doc_lines(&operation.documentation),
            request: ident(&item, &identifier_safe(&operation.request_type))?,
            response: operation
                .response_type
                .as_deref()
                .map(|response| ident(&item, &identifier_safe(response)))
                .transpose()?,
        });
    }

    Ok(Client {
        ident: ident(
            &format!("endpoint {}", endpoint.name),
            &format!("{}Client", identifier_safe(&endpoint.name)),
        )?,
        endpoint: endpoint.name.clone(),
        version: endpoint.version.clone(),
        doc: doc_lines(&endpoint.documentation),
        types_path: path("types path", &options.types_path)?,
        runtime_path: path("runtime path", &options.runtime_path)?,
        methods,
    })
}

use super::types;
use proc_macro2::TokenStream;
use quote::quote;

pub trait Codegen {
    fn codegen(&self) -> TokenStream;
}

fn doc_attributes(lines: &[String]) -> TokenStream {
    quote! {
        #(#[doc = #lines])*
    }
}

impl Codegen for types::Client {
    fn codegen(&self) -> TokenStream {
        let name = &self.ident;
        let runtime = &self.runtime_path;
        let endpoint = &self.endpoint;
        let version = &self.version;
        let doc = doc_attributes(&self.doc);
        let methods = self
            .methods
            .iter()
            .map(|method| method_codegen(method, self))
            .collect::<Vec<_>>();

        quote! {
            #doc
            #[allow(non_camel_case_types)]
            #[derive(Debug, Clone)]
            pub struct #name {
                client: #runtime::soap::Client,
            }

            impl #name {
                pub const ENDPOINT: &'static str = #endpoint;
                pub const VERSION: &'static str = #version;

                pub fn new(configuration: &#runtime::Configuration) -> Result<Self, #runtime::Error> {
                    Ok(Self {
                        client: #runtime::soap::Client::new(Self::ENDPOINT, Self::VERSION, configuration)?,
                    })
                }

                pub fn with_http_client(
                    configuration: &#runtime::Configuration,
                    http: #runtime::reqwest::Client,
                ) -> Result<Self, #runtime::Error> {
                    Ok(Self {
                        client: #runtime::soap::Client::with_http_client(
                            Self::ENDPOINT,
                            Self::VERSION,
                            configuration,
                            http,
                        )?,
                    })
                }

                pub fn from_client(client: #runtime::soap::Client) -> Self {
                    Self { client }
                }

                pub fn client(&self) -> &#runtime::soap::Client {
                    &self.client
                }

                #(#methods)*
            }
        }
    }
}

/// Methods are rendered against the client that owns them for its paths.
fn method_codegen(method: &types::Method, client: &types::Client) -> TokenStream {
    let name = &method.ident;
    let runtime = &client.runtime_path;
    let types = &client.types_path;
    let request = &method.request;
    let doc = doc_attributes(&method.doc);

    match &method.response {
        Some(response) => quote! {
            #doc
            #[allow(non_snake_case)]
            pub async fn #name(&self, request: &#types::#request) -> Result<#types::#response, #runtime::Error> {
                self.client.execute_as::<#types::#response, _>(request).await
            }
        },

        None => quote! {
            #doc
            #[allow(non_snake_case)]
            pub async fn #name(&self, request: &#types::#request) -> Result<(), #runtime::Error> {
                self.client.execute(request).await.map(|_| ())
            }
        },
    }
}

use proc_macro2::Ident;

/// Paths the generated client refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Module holding the typed request and response elements.
    pub types_path: String,
    /// Path of the runtime crate.
    pub runtime_path: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            types_path: "super::types".into(),
            runtime_path: "::wws_util".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Method {
    pub ident: Ident,
    pub doc: Vec<String>,
    pub request: Ident,
    pub response: Option<Ident>,
}

#[derive(Debug, Clone)]
pub struct Client {
    pub ident: Ident,
    pub endpoint: String,
    pub version: String,
    pub doc: Vec<String>,
    pub types_path: syn::Path,
    pub runtime_path: syn::Path,
    pub methods: Vec<Method>,
}

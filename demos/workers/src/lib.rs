//! A Human Resources client generated at compile time, together with the
//! handful of typed elements its operations take and return.

pub mod types;

pub mod client {
    wws_macro::wws!("Human_Resources.wsdl");
}

pub use client::Human_ResourcesClient;

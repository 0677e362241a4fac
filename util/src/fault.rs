use thiserror::Error;

use super::xml::{ns, Element, QName};

pub const DEFAULT_FAULT_MESSAGE: &str = "A Workday Web Services exception occurred";

/// SOAP fault decoded from an unsuccessful response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Fault {
    pub message: String,
    pub fault_code: Option<String>,
    pub validation_errors: Vec<ValidationError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    pub detail_message: String,
    pub xpath: String,
}

fn first_text(document: &Element, name: QName) -> Option<String> {
    document
        .descendants_named(name)
        .next()
        .map(Element::text)
}

impl Fault {
    pub fn from_document(document: &Element) -> Self {
        let message = first_text(document, QName::unqualified("faultstring"))
            .unwrap_or_else(|| DEFAULT_FAULT_MESSAGE.to_owned());
        let fault_code = first_text(document, QName::unqualified("faultcode"));

        let validation_errors = document
            .descendants_named(ns::WORKDAY.name("Validation_Error"))
            .filter_map(ValidationError::from_element)
            .collect();

        Self {
            message,
            fault_code,
            validation_errors,
        }
    }
}

impl ValidationError {
    /// `None` unless all of `Message`, `Detail_Message` and `Xpath` are present.
    fn from_element(element: &Element) -> Option<Self> {
        let text = |local| {
            element
                .child(&ns::WORKDAY.name(local))
                .map(Element::text)
        };

        Some(Self {
            message: text("Message")?,
            detail_message: text("Detail_Message")?,
            xpath: text("Xpath")?,
        })
    }
}

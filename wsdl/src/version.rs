//! Where the service version comes from.
//!
//! Workday publishes it as the fixed value of the `version` attribute declared
//! in the embedded schema. Other layouts can plug in their own
//! [`VersionStrategy`].

use wws_util::xml::{ns, Element, QName};

use super::{
    error::Malformed,
    lookup::{has_name, required_attribute, required_child, single},
};

pub trait VersionStrategy {
    fn version(&self, definitions: &Element) -> Result<String, Malformed>;
}

impl<F> VersionStrategy for F
where
    F: Fn(&Element) -> Result<String, Malformed>,
{
    fn version(&self, definitions: &Element) -> Result<String, Malformed> {
        self(definitions)
    }
}

/// Reads `wsdl:types/xsd:schema/xsd:attribute[@name='version']/@wd:fixed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaVersionAttribute {
    pub attribute_name: String,
    pub value_attribute: QName,
}

impl Default for SchemaVersionAttribute {
    fn default() -> Self {
        Self {
            attribute_name: "version".into(),
            value_attribute: ns::WORKDAY.name("fixed"),
        }
    }
}

impl VersionStrategy for SchemaVersionAttribute {
    fn version(&self, definitions: &Element) -> Result<String, Malformed> {
        let types = required_child(definitions, &ns::WSDL.name("types"))?;
        let schema = required_child(types, &ns::XSD.name("schema"))?;

        let declaration = single(
            schema
                .children_named(ns::XSD.name("attribute"))
                .filter(|attribute| has_name(attribute, &self.attribute_name)),
            || format!("schema attribute named {}", self.attribute_name),
        )?;

        Ok(required_attribute(declaration, &self.value_attribute)?.to_owned())
    }
}

/// A version known up front, for descriptions that do not carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedVersion(pub String);

impl VersionStrategy for FixedVersion {
    fn version(&self, _: &Element) -> Result<String, Malformed> {
        Ok(self.0.clone())
    }
}

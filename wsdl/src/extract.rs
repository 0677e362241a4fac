use tracing::{debug, trace};
use wws_util::xml::{ns, strip_namespace_prefix, Element, QName};

use super::{
    error::{Error, Malformed},
    lookup::{
        describe, has_name, name_of, required_attribute, required_child, single, single_or_none,
    },
    types::{Endpoint, Operation},
    version::{SchemaVersionAttribute, VersionStrategy},
};

pub fn extract(definitions: &Element) -> Result<Endpoint, Error> {
    extract_with(definitions, &SchemaVersionAttribute::default())
}

pub fn extract_with(
    definitions: &Element,
    version: &dyn VersionStrategy,
) -> Result<Endpoint, Error> {
    let name = name_of(definitions)?.to_owned();
    let documentation = required_child(definitions, &ns::WSDL.name("documentation"))?.text();
    let version = version.version(definitions)?;

    let port_type = single(definitions.children_named(ns::WSDL.name("portType")), || {
        "portType".into()
    })?;
    let messages: Vec<&Element> = definitions
        .children_named(ns::WSDL.name("message"))
        .collect();

    let operations = port_type
        .children_named(ns::WSDL.name("operation"))
        .map(|operation| extract_operation(operation, &messages))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        endpoint = %name,
        %version,
        operations = operations.len(),
        "extracted endpoint"
    );

    Ok(Endpoint {
        name,
        version,
        documentation,
        operations,
    })
}

fn extract_operation(operation: &Element, messages: &[&Element]) -> Result<Operation, Malformed> {
    let name = name_of(operation)?.to_owned();
    let documentation = required_child(operation, &ns::WSDL.name("documentation"))?.text();

    let input = resolve_message(
        required_child(operation, &ns::WSDL.name("input"))?,
        messages,
    )?;
    let request_type = match body_part(input)? {
        Some(part) => element_type(part)?,
        None => {
            return Err(Malformed::NotSingle {
                what: format!("body part in {}", describe(input)),
                found: 0,
            })
        }
    };

    let response_type = match operation.child(&ns::WSDL.name("output")) {
        Some(output) => body_part(resolve_message(output, messages)?)?
            .map(element_type)
            .transpose()?,
        None => None,
    };

    trace!(operation = %name, %request_type, ?response_type, "extracted operation");

    Ok(Operation {
        name,
        documentation,
        request_type,
        response_type,
    })
}

/// Finds the message a `wsdl:input` or `wsdl:output` points at.
fn resolve_message<'a>(
    direction: &Element,
    messages: &[&'a Element],
) -> Result<&'a Element, Malformed> {
    let reference = required_attribute(direction, &QName::unqualified("message"))?;
    let local = strip_namespace_prefix(reference);

    single(
        messages
            .iter()
            .copied()
            .filter(|message| has_name(message, local)),
        || format!("message named {}", local),
    )
}

fn body_part(message: &Element) -> Result<Option<&Element>, Malformed> {
    single_or_none(
        message
            .children_named(ns::WSDL.name("part"))
            .filter(|part| has_name(part, "body")),
        || format!("body part in {}", describe(message)),
    )
}

fn element_type(part: &Element) -> Result<String, Malformed> {
    let element = required_attribute(part, &QName::unqualified("element"))?;
    Ok(strip_namespace_prefix(element).to_owned())
}

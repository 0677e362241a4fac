use wws_util::xml::{Element, QName};

use super::error::Malformed;

pub(crate) fn describe(element: &Element) -> String {
    match element.attribute(&QName::unqualified("name")) {
        Some(name) => format!("{} {}", element.name.local, name),
        None => element.name.local.clone(),
    }
}

pub(crate) fn single<'a, I, F>(mut matches: I, what: F) -> Result<&'a Element, Malformed>
where
    I: Iterator<Item = &'a Element>,
    F: FnOnce() -> String,
{
    match (matches.next(), matches.count()) {
        (Some(element), 0) => Ok(element),
        (first, rest) => Err(Malformed::NotSingle {
            what: what(),
            found: first.map_or(0, |_| 1 + rest),
        }),
    }
}

pub(crate) fn single_or_none<'a, I, F>(
    mut matches: I,
    what: F,
) -> Result<Option<&'a Element>, Malformed>
where
    I: Iterator<Item = &'a Element>,
    F: FnOnce() -> String,
{
    match (matches.next(), matches.count()) {
        (first, 0) => Ok(first),
        (_, rest) => Err(Malformed::NotSingle {
            what: what(),
            found: 1 + rest,
        }),
    }
}

pub(crate) fn required_child<'a>(
    parent: &'a Element,
    name: &QName,
) -> Result<&'a Element, Malformed> {
    parent.child(name).ok_or_else(|| Malformed::MissingElement {
        parent: describe(parent),
        name: name.local.clone(),
    })
}

pub(crate) fn required_attribute<'a>(
    element: &'a Element,
    name: &QName,
) -> Result<&'a str, Malformed> {
    element
        .attribute(name)
        .ok_or_else(|| Malformed::MissingAttribute {
            element: describe(element),
            name: name.local.clone(),
        })
}

pub(crate) fn name_of(element: &Element) -> Result<&str, Malformed> {
    required_attribute(element, &QName::unqualified("name"))
}

pub(crate) fn has_name(element: &Element, name: &str) -> bool {
    element.attribute(&QName::unqualified("name")) == Some(name)
}

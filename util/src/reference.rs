//! References are Workday's foreign keys: an `ID` element tagged with the id
//! type it is expressed in, optionally scoped by a parent object.

use super::{
    error::Error,
    xml::{ns, ConversionError, Element, FromElement, QName, ToElement},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    pub id_type: String,
    pub value: String,
}

/// A reference built on the client side, to be embedded in a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub id_type: String,
    pub value: String,
    pub parent: Option<Parent>,
}

impl Reference {
    pub fn new(id_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id_type: id_type.into(),
            value: value.into(),
            parent: None,
        }
    }

    pub fn scoped(
        parent_type: impl Into<String>,
        parent_value: impl Into<String>,
        id_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            parent: Some(Parent {
                id_type: parent_type.into(),
                value: parent_value.into(),
            }),
            ..Self::new(id_type, value)
        }
    }

    pub(crate) fn id_element(&self) -> Element {
        let mut id = Element::new(ns::WORKDAY.name("ID"));

        if let Some(parent) = &self.parent {
            id = id
                .with_attribute(ns::WORKDAY.name("parent_type"), parent.id_type.as_str())
                .with_attribute(ns::WORKDAY.name("parent_id"), parent.value.as_str());
        }

        id.with_attribute(ns::WORKDAY.name("type"), self.id_type.as_str())
            .with_text(self.value.as_str())
    }
}

impl ToElement for Reference {
    /// `<ref><wd:ID wd:type="…">value</wd:ID></ref>`; typed bindings rename the
    /// wrapper to whatever reference element they represent.
    fn to_element(&self) -> Element {
        Element::new(QName::unqualified("ref")).with_child(self.id_element())
    }
}

pub fn build_reference<T: FromElement>(id_type: &str, value: &str) -> Result<T, ConversionError> {
    T::from_element(Reference::new(id_type, value).to_element())
}

pub fn build_scoped_reference<T: FromElement>(
    parent_type: &str,
    parent_value: &str,
    id_type: &str,
    value: &str,
) -> Result<T, ConversionError> {
    T::from_element(Reference::scoped(parent_type, parent_value, id_type, value).to_element())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceId {
    pub id_type: String,
    pub value: String,
    pub parent: Option<Parent>,
}

/// A reference as Workday returns it: every known id of the object plus the
/// optional display descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectReference {
    pub descriptor: Option<String>,
    pub ids: Vec<ReferenceId>,
}

impl ObjectReference {
    pub fn id(&self, id_type: &str) -> Result<&str, Error> {
        self.ids
            .iter()
            .find(|id| id.id_type == id_type)
            .map(|id| id.value.as_str())
            .ok_or_else(|| Error::IdTypeNotFound {
                id_type: id_type.to_owned(),
                available: self.id_types().map(ToOwned::to_owned).collect(),
            })
    }

    pub fn id_types(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(|id| id.id_type.as_str())
    }

    /// Writes the reference back out under the given element name, e.g. to
    /// pass a returned `Worker_Reference` into the next request.
    pub fn to_element_named(&self, name: QName) -> Element {
        let mut element = Element::new(name);

        if let Some(descriptor) = &self.descriptor {
            element = element.with_attribute(ns::WORKDAY.name("Descriptor"), descriptor.as_str());
        }

        element.with_children(self.ids.iter().map(|id| {
            Reference {
                id_type: id.id_type.clone(),
                value: id.value.clone(),
                parent: id.parent.clone(),
            }
            .id_element()
        }))
    }
}

impl ToElement for ObjectReference {
    fn to_element(&self) -> Element {
        self.to_element_named(QName::unqualified("ref"))
    }
}

impl FromElement for ObjectReference {
    fn from_element(element: Element) -> Result<Self, ConversionError> {
        let descriptor = element
            .attribute(&ns::WORKDAY.name("Descriptor"))
            .map(ToOwned::to_owned);

        let type_name = ns::WORKDAY.name("type");
        let parent_type = ns::WORKDAY.name("parent_type");
        let parent_id = ns::WORKDAY.name("parent_id");
        let ids = element
            .children_named(ns::WORKDAY.name("ID"))
            .map(|id| {
                let parent = match (id.attribute(&parent_type), id.attribute(&parent_id)) {
                    (Some(id_type), Some(value)) => Some(Parent {
                        id_type: id_type.to_owned(),
                        value: value.to_owned(),
                    }),
                    _ => None,
                };

                Ok(ReferenceId {
                    id_type: id.required_attribute(&type_name)?.to_owned(),
                    value: id.text(),
                    parent,
                })
            })
            .collect::<Result<_, ConversionError>>()?;

        Ok(Self { descriptor, ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_back_the_built_id() {
        let reference: ObjectReference = build_reference("WID", "abc").unwrap();

        assert_eq!(reference.id("WID").unwrap(), "abc");
        assert_eq!(reference.descriptor, None);
    }

    #[test]
    fn missing_id_type_lists_what_is_available() {
        let reference: ObjectReference = build_reference("WID", "abc").unwrap();

        match reference.id("Employee_ID") {
            Err(Error::IdTypeNotFound { id_type, available }) => {
                assert_eq!(id_type, "Employee_ID");
                assert_eq!(available, ["WID"]);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn scoped_reference_carries_parent_attributes() {
        let element: Element =
            build_scoped_reference("Organization_Reference_ID", "SUP-1", "Position_ID", "P-42")
                .unwrap();

        let id = element.child(&ns::WORKDAY.name("ID")).unwrap();
        assert_eq!(
            id.attribute(&ns::WORKDAY.name("parent_type")),
            Some("Organization_Reference_ID")
        );
        assert_eq!(id.attribute(&ns::WORKDAY.name("parent_id")), Some("SUP-1"));
        assert_eq!(id.attribute(&ns::WORKDAY.name("type")), Some("Position_ID"));
        assert_eq!(id.text(), "P-42");

        let reference = ObjectReference::from_element(element).unwrap();
        assert_eq!(
            reference.ids[0].parent,
            Some(Parent {
                id_type: "Organization_Reference_ID".into(),
                value: "SUP-1".into()
            })
        );
    }

    #[test]
    fn decodes_response_references_with_descriptor() {
        let element = Element::parse_str(
            r#"<wd:Worker_Reference xmlns:wd="urn:com.workday/bsvc" wd:Descriptor="Logan McNeil">
                <wd:ID wd:type="WID">3aa5550b7fe348b98d7b5741afc65534</wd:ID>
                <wd:ID wd:type="Employee_ID">21001</wd:ID>
            </wd:Worker_Reference>"#,
        )
        .unwrap();

        let reference = ObjectReference::from_element(element).unwrap();
        assert_eq!(reference.descriptor.as_deref(), Some("Logan McNeil"));
        assert_eq!(reference.id("Employee_ID").unwrap(), "21001");
        assert_eq!(reference.id_types().collect::<Vec<_>>(), ["WID", "Employee_ID"]);
    }

    #[test]
    fn returned_references_can_be_sent_back() {
        let element = Element::parse_str(
            r#"<wd:Worker_Reference xmlns:wd="urn:com.workday/bsvc" wd:Descriptor="Logan McNeil">
                <wd:ID wd:type="Employee_ID">21001</wd:ID>
            </wd:Worker_Reference>"#,
        )
        .unwrap();

        let reference = ObjectReference::from_element(element.clone()).unwrap();
        assert_eq!(
            reference.to_element_named(ns::WORKDAY.name("Worker_Reference")),
            element
        );
    }

    #[test]
    fn id_without_type_does_not_convert() {
        let element = Element::parse_str(
            r#"<ref xmlns:wd="urn:com.workday/bsvc"><wd:ID>abc</wd:ID></ref>"#,
        )
        .unwrap();

        assert!(matches!(
            ObjectReference::from_element(element),
            Err(ConversionError::MissingAttribute { .. })
        ));
    }
}

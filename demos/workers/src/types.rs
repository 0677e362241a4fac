#![allow(non_camel_case_types)]

use wws_util::{
    reference::ObjectReference,
    request::{WwsRequest, DEFAULT_COUNT, DEFAULT_PAGE},
    xml::{ns, ConversionError, Element, FromElement, QName, ToElement},
};

fn wd(local: &str) -> QName {
    ns::WORKDAY.name(local)
}

fn references(parent: Option<&Element>, name: &str) -> Result<Vec<ObjectReference>, ConversionError> {
    match parent {
        Some(parent) => parent
            .children_named(wd(name))
            .cloned()
            .map(ObjectReference::from_element)
            .collect(),
        None => Ok(Vec::new()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Get_Workers_Request {
    pub worker_references: Vec<ObjectReference>,
    pub page: u32,
    pub count: u32,
}

impl Default for Get_Workers_Request {
    fn default() -> Self {
        Self {
            worker_references: Vec::new(),
            page: DEFAULT_PAGE,
            count: DEFAULT_COUNT,
        }
    }
}

impl ToElement for Get_Workers_Request {
    fn to_element(&self) -> Element {
        let mut element = Element::new(wd(Self::ELEMENT_NAME));

        if !self.worker_references.is_empty() {
            element.push_child(
                Element::new(wd("Request_References")).with_children(
                    self.worker_references
                        .iter()
                        .map(|reference| reference.to_element_named(wd("Worker_Reference"))),
                ),
            );
        }

        element.with_child(
            Element::new(wd("Response_Filter"))
                .with_child(Element::new(wd("Page")).with_text(self.page.to_string()))
                .with_child(Element::new(wd("Count")).with_text(self.count.to_string())),
        )
    }
}

impl FromElement for Get_Workers_Request {
    fn from_element(element: Element) -> Result<Self, ConversionError> {
        element.expect_name(&wd(Self::ELEMENT_NAME))?;
        let filter = element.required_child(&wd("Response_Filter"))?;

        Ok(Self {
            worker_references: references(
                element.child(&wd("Request_References")),
                "Worker_Reference",
            )?,
            page: filter.required_child(&wd("Page"))?.parse_text()?,
            count: filter.required_child(&wd("Count"))?.parse_text()?,
        })
    }
}

impl WwsRequest for Get_Workers_Request {
    const ELEMENT_NAME: &'static str = "Get_Workers_Request";

    fn request_references_slot() -> Option<&'static str> {
        Some("Worker_Reference")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    pub reference: ObjectReference,
    pub descriptor: Option<String>,
    pub worker_id: Option<String>,
}

impl FromElement for Worker {
    fn from_element(element: Element) -> Result<Self, ConversionError> {
        element.expect_name(&wd("Worker"))?;

        Ok(Self {
            reference: ObjectReference::from_element(
                element.required_child(&wd("Worker_Reference"))?.clone(),
            )?,
            descriptor: element.child(&wd("Worker_Descriptor")).map(Element::text),
            worker_id: element
                .child(&wd("Worker_Data"))
                .and_then(|data| data.child(&wd("Worker_ID")))
                .map(Element::text),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Get_Workers_Response {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub workers: Vec<Worker>,
}

impl FromElement for Get_Workers_Response {
    fn from_element(element: Element) -> Result<Self, ConversionError> {
        element.expect_name(&wd("Get_Workers_Response"))?;
        let results = element.required_child(&wd("Response_Results"))?;

        let workers = match element.child(&wd("Response_Data")) {
            Some(data) => data
                .children_named(wd("Worker"))
                .cloned()
                .map(Worker::from_element)
                .collect::<Result<_, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            page: results.required_child(&wd("Page"))?.parse_text()?,
            total_pages: results.required_child(&wd("Total_Pages"))?.parse_text()?,
            total_results: results.required_child(&wd("Total_Results"))?.parse_text()?,
            workers,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Server_Timestamp_Get;

impl ToElement for Server_Timestamp_Get {
    fn to_element(&self) -> Element {
        Element::new(wd(Self::ELEMENT_NAME))
    }
}

impl FromElement for Server_Timestamp_Get {
    fn from_element(element: Element) -> Result<Self, ConversionError> {
        element.expect_name(&wd(Self::ELEMENT_NAME))?;
        Ok(Self)
    }
}

impl WwsRequest for Server_Timestamp_Get {
    const ELEMENT_NAME: &'static str = "Server_Timestamp_Get";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server_Timestamp {
    pub data: String,
}

impl FromElement for Server_Timestamp {
    fn from_element(element: Element) -> Result<Self, ConversionError> {
        element.expect_name(&wd("Server_Timestamp"))?;

        Ok(Self {
            data: element.required_child(&wd("Server_Timestamp_Data"))?.text(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker_Note_Submit {
    pub worker: ObjectReference,
    pub note: String,
}

impl ToElement for Worker_Note_Submit {
    fn to_element(&self) -> Element {
        Element::new(wd("Worker_Note_Submit"))
            .with_child(self.worker.to_element_named(wd("Worker_Reference")))
            .with_child(Element::new(wd("Note")).with_text(self.note.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wws_util::request::{build_request, RequestParams};

    #[test]
    fn builds_filtered_worker_requests() {
        let request: Get_Workers_Request = build_request(
            &RequestParams::new()
                .count(25)
                .references("Employee_ID", ["21001", "21002"]),
        )
        .unwrap();

        assert_eq!(request.count, 25);
        assert_eq!(request.worker_references.len(), 2);
        assert_eq!(request.worker_references[1].id("Employee_ID").unwrap(), "21002");

        let element = request.to_element();
        assert_eq!(
            Get_Workers_Request::from_element(element).unwrap(),
            request
        );
    }

    #[test]
    fn decodes_an_empty_page() {
        let element = Element::parse_str(
            r#"<wd:Get_Workers_Response xmlns:wd="urn:com.workday/bsvc">
                <wd:Response_Results>
                    <wd:Total_Results>0</wd:Total_Results>
                    <wd:Total_Pages>0</wd:Total_Pages>
                    <wd:Page_Results>0</wd:Page_Results>
                    <wd:Page>1</wd:Page>
                </wd:Response_Results>
            </wd:Get_Workers_Response>"#,
        )
        .unwrap();

        let response = Get_Workers_Response::from_element(element).unwrap();
        assert_eq!(response.total_results, 0);
        assert!(response.workers.is_empty());
    }

    #[test]
    fn rejects_the_wrong_element() {
        let element = Element::new(wd("Get_Organizations_Response"));

        assert!(matches!(
            Get_Workers_Response::from_element(element),
            Err(ConversionError::UnexpectedElement { .. })
        ));
    }
}

//! Minimal `Get_*` requests: paging through `Response_Filter`, optionally
//! narrowed to a set of objects through `Request_References`.

use tracing::warn;

use super::{
    error::Error,
    reference::Reference,
    xml::{ns, Element, FromElement, ToElement},
};

/// Largest page Workday serves for a single request.
pub const MAX_PAGE_SIZE: u32 = 999;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_COUNT: u32 = 100;

/// Implemented by every typed request element.
pub trait WwsRequest: ToElement + FromElement {
    /// Local name of the request element in the Workday namespace.
    const ELEMENT_NAME: &'static str;

    /// Name of the repeated reference element inside `Request_References`,
    /// e.g. `Worker_Reference`. `None` when the request cannot be filtered by
    /// reference.
    fn request_references_slot() -> Option<&'static str> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    pub page: u32,
    pub count: u32,
    pub reference_id_type: Option<String>,
    pub reference_id_values: Vec<String>,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            count: DEFAULT_COUNT,
            reference_id_type: None,
            reference_id_values: Vec::new(),
        }
    }
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn references<I, S>(mut self, id_type: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_id_type = Some(id_type.into());
        self.reference_id_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// The filter applies only with an id type and at least one value.
    fn reference_filter(&self) -> Option<(&str, &[String])> {
        match &self.reference_id_type {
            Some(id_type) if !self.reference_id_values.is_empty() => {
                Some((id_type.as_str(), self.reference_id_values.as_slice()))
            }
            _ => None,
        }
    }
}

pub fn build_request<R: WwsRequest>(params: &RequestParams) -> Result<R, Error> {
    let element = request_element::<R>(params)?;
    Ok(R::from_element(element)?)
}

pub fn request_element<R: WwsRequest>(params: &RequestParams) -> Result<Element, Error> {
    if params.page == 0 {
        return Err(Error::InvalidArgument("page must be positive".into()));
    }

    if params.count == 0 {
        return Err(Error::InvalidArgument("count must be positive".into()));
    }

    let count = if params.count > MAX_PAGE_SIZE {
        warn!(
            requested = params.count,
            max = MAX_PAGE_SIZE,
            "clamping request count to the maximum page size"
        );
        MAX_PAGE_SIZE
    } else {
        params.count
    };

    let mut request = Element::new(ns::WORKDAY.name(R::ELEMENT_NAME));

    if let Some((id_type, values)) = params.reference_filter() {
        let slot = R::request_references_slot().ok_or(Error::UnsupportedRequestShape {
            request_type: R::ELEMENT_NAME,
        })?;

        let references = values.iter().map(|value| {
            Element::new(ns::WORKDAY.name(slot))
                .with_child(Reference::new(id_type, value.as_str()).id_element())
        });

        request.push_child(
            Element::new(ns::WORKDAY.name("Request_References")).with_children(references),
        );
    }

    request.push_child(
        Element::new(ns::WORKDAY.name("Response_Filter"))
            .with_child(Element::new(ns::WORKDAY.name("Page")).with_text(params.page.to_string()))
            .with_child(Element::new(ns::WORKDAY.name("Count")).with_text(count.to_string())),
    );

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reference::ObjectReference, xml::ConversionError};

    #[derive(Debug)]
    struct GetWorkersRequest {
        page: u32,
        count: u32,
        worker_references: Vec<ObjectReference>,
    }

    impl ToElement for GetWorkersRequest {
        fn to_element(&self) -> Element {
            Element::new(ns::WORKDAY.name(Self::ELEMENT_NAME))
        }
    }

    impl FromElement for GetWorkersRequest {
        fn from_element(element: Element) -> Result<Self, ConversionError> {
            element.expect_name(&ns::WORKDAY.name(Self::ELEMENT_NAME))?;

            let filter = element.required_child(&ns::WORKDAY.name("Response_Filter"))?;
            let page = filter.required_child(&ns::WORKDAY.name("Page"))?.parse_text()?;
            let count = filter.required_child(&ns::WORKDAY.name("Count"))?.parse_text()?;

            let worker_references = match element.child(&ns::WORKDAY.name("Request_References")) {
                Some(references) => references
                    .children_named(ns::WORKDAY.name("Worker_Reference"))
                    .cloned()
                    .map(ObjectReference::from_element)
                    .collect::<Result<_, _>>()?,
                None => Vec::new(),
            };

            Ok(Self {
                page,
                count,
                worker_references,
            })
        }
    }

    impl WwsRequest for GetWorkersRequest {
        const ELEMENT_NAME: &'static str = "Get_Workers_Request";

        fn request_references_slot() -> Option<&'static str> {
            Some("Worker_Reference")
        }
    }

    struct GetServerTimestampRequest;

    impl ToElement for GetServerTimestampRequest {
        fn to_element(&self) -> Element {
            Element::new(ns::WORKDAY.name(Self::ELEMENT_NAME))
        }
    }

    impl FromElement for GetServerTimestampRequest {
        fn from_element(_: Element) -> Result<Self, ConversionError> {
            Ok(Self)
        }
    }

    impl WwsRequest for GetServerTimestampRequest {
        const ELEMENT_NAME: &'static str = "Get_Server_Timestamp_Request";
    }

    #[test]
    fn defaults_to_first_page_of_one_hundred() {
        let request: GetWorkersRequest = build_request(&RequestParams::new()).unwrap();

        assert_eq!((request.page, request.count), (1, 100));
    }

    #[test]
    fn pages_without_references() {
        let request: GetWorkersRequest =
            build_request(&RequestParams::new().page(2).count(50)).unwrap();

        assert_eq!(request.page, 2);
        assert_eq!(request.count, 50);
        assert!(request.worker_references.is_empty());
    }

    #[test]
    fn adds_one_reference_per_value() {
        let params = RequestParams::new().references("Employee_ID", ["21001", "21002", "21003"]);
        let request: GetWorkersRequest = build_request(&params).unwrap();

        assert_eq!(request.worker_references.len(), 3);

        for (reference, expected) in request
            .worker_references
            .iter()
            .zip(["21001", "21002", "21003"])
        {
            assert_eq!(reference.ids.len(), 1);
            assert_eq!(reference.id("Employee_ID").unwrap(), expected);
        }
    }

    #[test]
    fn references_precede_the_response_filter() {
        let params = RequestParams::new().references("WID", ["abc"]);
        let element = request_element::<GetWorkersRequest>(&params).unwrap();

        let names: Vec<_> = element
            .elements()
            .map(|child| child.name.local.as_str())
            .collect();
        assert_eq!(names, ["Request_References", "Response_Filter"]);
    }

    #[test]
    fn values_without_an_id_type_leave_the_request_unfiltered() {
        let params = RequestParams {
            reference_id_values: vec!["21001".into()],
            ..RequestParams::new()
        };
        let request: GetWorkersRequest = build_request(&params).unwrap();

        assert!(request.worker_references.is_empty());
    }

    #[test]
    fn an_empty_value_list_never_needs_a_slot() {
        let params = RequestParams::new().references("WID", Vec::<String>::new());

        assert!(build_request::<GetServerTimestampRequest>(&params).is_ok());
    }

    #[test]
    fn requests_without_a_slot_cannot_be_filtered() {
        let params = RequestParams::new().references("WID", ["abc"]);

        match build_request::<GetServerTimestampRequest>(&params) {
            Err(Error::UnsupportedRequestShape { request_type }) => {
                assert_eq!(request_type, "Get_Server_Timestamp_Request")
            }
            _ => panic!("expected UnsupportedRequestShape"),
        }
    }

    #[test]
    fn clamps_count_and_rejects_zero() {
        let request: GetWorkersRequest =
            build_request(&RequestParams::new().count(5000)).unwrap();
        assert_eq!(request.count, MAX_PAGE_SIZE);

        assert!(matches!(
            build_request::<GetWorkersRequest>(&RequestParams::new().page(0)),
            Err(Error::InvalidArgument(_))
        ));
    }
}

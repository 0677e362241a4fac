use std::time::Duration;

use url::Url;
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};
use wws_util::{
    request::{request_element, RequestParams, WwsRequest},
    soap::Client,
    xml::{ns, ConversionError, Element, FromElement, ToElement},
    Configuration, Error,
};

const SERVICE_PATH: &str = "/ccx/service/acme/Human_Resources/v35.0";

#[derive(Debug)]
struct GetServerTimestamp;

impl ToElement for GetServerTimestamp {
    fn to_element(&self) -> Element {
        Element::new(ns::WORKDAY.name("Server_Timestamp_Get"))
    }
}

#[derive(Debug, PartialEq)]
struct ServerTimestamp(String);

impl FromElement for ServerTimestamp {
    fn from_element(element: Element) -> Result<Self, ConversionError> {
        element.expect_name(&ns::WORKDAY.name("Server_Timestamp"))?;

        Ok(Self(
            element
                .required_child(&ns::WORKDAY.name("Server_Timestamp_Data"))?
                .text(),
        ))
    }
}

struct GetWorkersRequest(Element);

impl ToElement for GetWorkersRequest {
    fn to_element(&self) -> Element {
        self.0.clone()
    }
}

impl FromElement for GetWorkersRequest {
    fn from_element(element: Element) -> Result<Self, ConversionError> {
        Ok(Self(element))
    }
}

impl WwsRequest for GetWorkersRequest {
    const ELEMENT_NAME: &'static str = "Get_Workers_Request";

    fn request_references_slot() -> Option<&'static str> {
        Some("Worker_Reference")
    }
}

fn envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<env:Envelope xmlns:env="http://schemas.xmlsoap.org/soap/envelope/" xmlns:wd="urn:com.workday/bsvc">
  <env:Body>{}</env:Body>
</env:Envelope>"#,
        body
    )
}

async fn client(server: &MockServer) -> Client {
    let base_url = Url::parse(&format!("{}{}", server.uri(), SERVICE_PATH)).unwrap();
    let config = Configuration::new("unused.example.com", "isu_hr", "acme", "s3cret");

    Client::with_base_url(base_url, &config, wws_util::reqwest::Client::new()).unwrap()
}

#[tokio::test]
async fn decodes_a_typed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SERVICE_PATH))
        .and(header("content-type", "text/xml; charset=utf-8"))
        .and(body_string_contains("isu_hr@acme"))
        .and(body_string_contains("wd:Server_Timestamp_Get"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            envelope(
                "<wd:Server_Timestamp><wd:Server_Timestamp_Data>2024-03-01T10:00:00.000-08:00</wd:Server_Timestamp_Data></wd:Server_Timestamp>",
            ),
            "text/xml",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let timestamp: ServerTimestamp = client(&server)
        .await
        .execute_as(&GetServerTimestamp)
        .await
        .unwrap();

    assert_eq!(
        timestamp,
        ServerTimestamp("2024-03-01T10:00:00.000-08:00".into())
    );
}

#[tokio::test]
async fn one_way_operations_accept_an_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(envelope(""), "text/xml; charset=UTF-8"),
        )
        .mount(&server)
        .await;

    let client = client(&server).await;

    assert_eq!(client.execute(&GetServerTimestamp).await.unwrap(), None);
    assert!(matches!(
        client
            .execute_as::<ServerTimestamp, _>(&GetServerTimestamp)
            .await,
        Err(Error::Conversion(ConversionError::EmptyBody))
    ));
}

#[tokio::test]
async fn surfaces_faults_with_validation_errors() {
    let server = MockServer::start().await;

    let fault = r#"<env:Fault>
        <faultcode>SOAP-ENV:Client.validationError</faultcode>
        <faultstring>Validation error occurred. Invalid ID value.</faultstring>
        <detail><wd:Validation_Fault>
          <wd:Validation_Error>
            <wd:Message>Invalid ID value.</wd:Message>
            <wd:Detail_Message>'123' is not a valid ID value for type = 'Employee_ID'</wd:Detail_Message>
            <wd:Xpath>/ns0:Get_Workers_Request[1]/ns0:Request_References[1]/ns0:Worker_Reference[1]</wd:Xpath>
          </wd:Validation_Error>
          <wd:Validation_Error>
            <wd:Message>Second</wd:Message>
            <wd:Detail_Message>Second detail</wd:Detail_Message>
            <wd:Xpath>/ns0:Get_Workers_Request[1]</wd:Xpath>
          </wd:Validation_Error>
        </wd:Validation_Fault></detail>
      </env:Fault>"#;

    Mock::given(method("POST"))
        .and(body_string_contains("wd:Worker_Reference"))
        .respond_with(ResponseTemplate::new(500).set_body_raw(envelope(fault), "text/xml"))
        .mount(&server)
        .await;

    let params = RequestParams::new().references("Employee_ID", ["123"]);
    let request = GetWorkersRequest(request_element::<GetWorkersRequest>(&params).unwrap());

    match client(&server).await.execute(&request).await {
        Err(Error::Fault(fault)) => {
            assert_eq!(fault.message, "Validation error occurred. Invalid ID value.");
            assert_eq!(
                fault.fault_code.as_deref(),
                Some("SOAP-ENV:Client.validationError")
            );
            assert_eq!(fault.validation_errors.len(), 2);
            assert_eq!(
                fault.validation_errors[0].detail_message,
                "'123' is not a valid ID value for type = 'Employee_ID'"
            );
        }
        other => panic!("expected a fault, got {:?}", other),
    }
}

#[tokio::test]
async fn rejects_non_xml_responses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(502).set_body_raw("<html>Bad Gateway</html>", "text/html"),
        )
        .mount(&server)
        .await;

    match client(&server).await.execute(&GetServerTimestamp).await {
        Err(Error::UnexpectedContentType(content_type)) => assert_eq!(content_type, "text/html"),
        other => panic!("expected UnexpectedContentType, got {:?}", other),
    }
}

#[tokio::test]
async fn serves_concurrent_calls_from_one_client() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            envelope("<wd:Server_Timestamp><wd:Server_Timestamp_Data>now</wd:Server_Timestamp_Data></wd:Server_Timestamp>"),
            "text/xml",
        ))
        .expect(3)
        .mount(&server)
        .await;

    let client = client(&server).await;

    let (a, b, c) = tokio::join!(
        client.execute_as::<ServerTimestamp, _>(&GetServerTimestamp),
        client.execute_as::<ServerTimestamp, _>(&GetServerTimestamp),
        client.execute_as::<ServerTimestamp, _>(&GetServerTimestamp),
    );

    for result in [a, b, c] {
        assert_eq!(result.unwrap(), ServerTimestamp("now".into()));
    }
}

#[tokio::test]
async fn configured_timeout_aborts_the_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    envelope("<wd:Server_Timestamp><wd:Server_Timestamp_Data>late</wd:Server_Timestamp_Data></wd:Server_Timestamp>"),
                    "text/xml",
                )
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let base_url = Url::parse(&format!("{}{}", server.uri(), SERVICE_PATH)).unwrap();
    let config = Configuration::new("unused.example.com", "isu_hr", "acme", "s3cret")
        .with_timeout(Duration::from_millis(200));
    let client = Client::at_base_url(base_url, &config).unwrap();

    match client
        .execute_as::<ServerTimestamp, _>(&GetServerTimestamp)
        .await
    {
        Err(Error::Http(err)) => assert!(err.is_timeout()),
        other => panic!("expected a timeout, got {:?}", other),
    }
}

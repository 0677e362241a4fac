use std::io::BufReader;

use bytes::Buf;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use tracing::{debug, instrument, warn};
use url::Url;

use super::{
    config::{Configuration, Credentials},
    error::Error,
    fault::Fault,
    xml::{ns, ConversionError, Element, FromElement, ToElement},
};

const XML_MEDIA_TYPE: &str = "text/xml";
const REQUEST_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// SOAP runtime shared by every generated client. Cloning is cheap and clones
/// share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    headers: Vec<Element>,
    body: Element,
}

/// `https://{host}/ccx/service/{tenant}/{endpoint}/{version}`
pub fn service_url(host: &str, tenant: &str, endpoint: &str, version: &str) -> Result<Url, Error> {
    Ok(Url::parse(&format!(
        "https://{}/ccx/service/{}/{}/{}",
        host, tenant, endpoint, version
    ))?)
}

fn is_xml(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case(XML_MEDIA_TYPE))
        .unwrap_or(false)
}

fn transport(config: &Configuration) -> Result<reqwest::Client, Error> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

impl Client {
    pub fn new(endpoint: &str, version: &str, config: &Configuration) -> Result<Self, Error> {
        let credentials = config.validate()?;
        let base_url = service_url(&credentials.host, &credentials.tenant, endpoint, version)?;

        Ok(Self {
            http: transport(config)?,
            base_url,
            credentials,
        })
    }

    /// Uses a caller-provided transport; its timeout settings take precedence.
    pub fn with_http_client(
        endpoint: &str,
        version: &str,
        config: &Configuration,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let credentials = config.validate()?;
        let base_url = service_url(&credentials.host, &credentials.tenant, endpoint, version)?;

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Posts to `base_url` instead of the address derived from the host.
    pub fn with_base_url(
        base_url: Url,
        config: &Configuration,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url,
            credentials: config.validate()?,
        })
    }

    /// Like [`Client::with_base_url`], with the transport built from `config`.
    pub fn at_base_url(base_url: Url, config: &Configuration) -> Result<Self, Error> {
        let credentials = config.validate()?;

        Ok(Self {
            http: transport(config)?,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn envelope(&self, request: Element) -> Envelope {
        let security = Element::new(ns::WS_SECURITY.name("Security")).with_child(
            Element::new(ns::WS_SECURITY.name("UsernameToken"))
                .with_child(
                    Element::new(ns::WS_SECURITY.name("Username")).with_text(format!(
                        "{}@{}",
                        self.credentials.user_name, self.credentials.tenant
                    )),
                )
                .with_child(
                    Element::new(ns::WS_SECURITY.name("Password"))
                        .with_text(self.credentials.password.as_str()),
                ),
        );

        let common = Element::new(ns::WORKDAY.name("Workday_Common_Header")).with_child(
            Element::new(ns::WORKDAY.name("Include_Reference_Descriptors_In_Response"))
                .with_text("true"),
        );

        Envelope::new(request)
            .with_header(security)
            .with_header(common)
    }

    /// Sends `request` and returns the first element of the response body, if any.
    pub async fn execute<R: ToElement>(&self, request: &R) -> Result<Option<Element>, Error> {
        let request = request.to_element();

        if request.name.local.is_empty() {
            return Err(Error::InvalidArgument(
                "request element must have a name".into(),
            ));
        }

        debug!(request = %request.name, "executing operation");
        let body = self.envelope(request).to_request()?;
        self.post(body).await
    }

    /// Like [`Client::execute`], converting the response element to `T`.
    pub async fn execute_as<T: FromElement, R: ToElement>(&self, request: &R) -> Result<T, Error> {
        let element = self
            .execute(request)
            .await?
            .ok_or(ConversionError::EmptyBody)?;

        Ok(T::from_element(element)?)
    }

    #[instrument(name = "wws_post", skip(self, body), fields(url = %self.base_url))]
    async fn post(&self, body: Vec<u8>) -> Result<Option<Element>, Error> {
        debug!(bytes = body.len(), "posting SOAP envelope");

        let response = self
            .http
            .post(self.base_url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static(REQUEST_CONTENT_TYPE))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        if !is_xml(content_type.as_deref()) {
            warn!(%status, ?content_type, "response is not XML");
            return Err(Error::UnexpectedContentType(
                content_type.unwrap_or_default(),
            ));
        }

        let bytes = response.bytes().await?;
        let document = Element::parse(BufReader::new(bytes.reader()))?;

        if status.is_success() {
            debug!(%status, "received response");
            return Ok(Envelope::from_element(document).map(Envelope::into_body));
        }

        let fault = Fault::from_document(&document);
        warn!(%status, fault_code = ?fault.fault_code, message = %fault.message, "remote fault");
        Err(fault.into())
    }
}

impl Envelope {
    pub fn new(body: Element) -> Self {
        Self {
            headers: Vec::new(),
            body,
        }
    }

    /// Splits a parsed envelope into header blocks and body payload. `None` when
    /// the body holds no element.
    pub fn from_element(document: Element) -> Option<Self> {
        let header_name = ns::SOAP_ENVELOPE.name("Header");
        let body_name = ns::SOAP_ENVELOPE.name("Body");

        let mut headers = Vec::new();
        let mut body = None;

        for child in document.into_elements() {
            if child.name == header_name {
                headers.extend(child.into_elements());
            } else if child.name == body_name && body.is_none() {
                body = child.into_elements().next();
            }
        }

        body.map(|body| Self { headers, body })
    }

    pub fn with_header(mut self, header: Element) -> Self {
        self.headers.push(header);
        self
    }

    pub fn headers(&self) -> &[Element] {
        &self.headers
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn into_body(self) -> Element {
        self.body
    }

    pub fn to_request(&self) -> Result<Vec<u8>, Error> {
        Ok(self.to_element().to_bytes()?)
    }
}

impl ToElement for Envelope {
    fn to_element(&self) -> Element {
        Element::new(ns::SOAP_ENVELOPE.name("Envelope"))
            .with_child(
                Element::new(ns::SOAP_ENVELOPE.name("Header"))
                    .with_children(self.headers.iter().cloned()),
            )
            .with_child(Element::new(ns::SOAP_ENVELOPE.name("Body")).with_child(self.body.clone()))
    }
}

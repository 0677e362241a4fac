use std::{fs::File, io::BufReader, path::Path};

use tracing::debug;
use url::Url;
use wws_util::xml::Element;

mod extract;
mod lookup;

pub mod error;
pub mod types;
pub mod version;

pub use extract::{extract, extract_with};

/// Accepts a URL or a path relative to the working directory.
pub fn resolve<S: AsRef<str>>(url: S) -> Result<Url, error::Error> {
    match Url::parse(url.as_ref()) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let path = Path::new(url.as_ref())
                .canonicalize()
                .map_err(|err| error::Error::PathConversionError(Some(err)))?;

            Url::from_file_path(&path).map_err(|()| error::Error::PathConversionError(None))
        }
        Err(err) => Err(err.into()),
    }
}

pub fn load(url: &Url) -> Result<Element, error::Error> {
    debug!(%url, "loading WSDL");

    match url.scheme() {
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|()| error::Error::PathConversionError(None))?;
            let file = File::open(path).map_err(error::Error::FileOpenError)?;

            Ok(Element::parse(BufReader::new(file))?)
        }

        "http" | "https" => {
            let response = reqwest::blocking::get(url.clone())?.error_for_status()?;
            Ok(Element::parse(BufReader::new(response))?)
        }

        other => Err(error::Error::UnsupportedScheme(other.into())),
    }
}

pub fn parse<S: AsRef<str>>(url: S) -> Result<types::Endpoint, error::Error> {
    parse_with(url, &version::SchemaVersionAttribute::default())
}

pub fn parse_with<S: AsRef<str>>(
    url: S,
    version: &dyn version::VersionStrategy,
) -> Result<types::Endpoint, error::Error> {
    let document = load(&resolve(url)?)?;
    extract_with(&document, version)
}

//! Intercepted request model.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use folio_core::Error;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

/// How the page issued the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Top-level document load.
    Navigate,
    SameOrigin,
    NoCors,
    #[default]
    Cors,
}

impl FromStr for RequestMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "navigate" => Ok(RequestMode::Navigate),
            "same-origin" => Ok(RequestMode::SameOrigin),
            "no-cors" => Ok(RequestMode::NoCors),
            "cors" => Ok(RequestMode::Cors),
            other => Err(Error::InvalidInput(format!("unknown request mode: {other}"))),
        }
    }
}

/// What kind of resource the request is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Document,
    Image,
    Script,
    Style,
    Font,
    Manifest,
    #[default]
    Other,
}

impl Destination {
    /// Guess the destination from the URL path extension.
    pub fn infer(url: &Url) -> Self {
        let path = url.path().to_ascii_lowercase();
        if path.ends_with(".webmanifest") || path.ends_with("/manifest.json") {
            return Destination::Manifest;
        }
        match path.rsplit_once('.').map(|(_, ext)| ext) {
            Some("png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "avif" | "ico" | "bmp") => Destination::Image,
            Some("js" | "mjs") => Destination::Script,
            Some("css") => Destination::Style,
            Some("woff" | "woff2" | "ttf" | "otf") => Destination::Font,
            Some("html" | "htm") => Destination::Document,
            _ => Destination::Other,
        }
    }
}

impl FromStr for Destination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(Destination::Document),
            "image" => Ok(Destination::Image),
            "script" => Ok(Destination::Script),
            "style" => Ok(Destination::Style),
            "font" => Ok(Destination::Font),
            "manifest" => Ok(Destination::Manifest),
            "" | "other" => Ok(Destination::Other),
            other => Err(Error::InvalidInput(format!("unknown destination: {other}"))),
        }
    }
}

/// A request issued by the page and offered to the worker.
#[derive(Debug, Clone)]
pub struct Request {
    pub url: Url,
    pub method: Method,
    pub mode: RequestMode,
    pub destination: Destination,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl Request {
    /// A plain GET with the destination inferred from the path.
    pub fn get(url: Url) -> Self {
        let destination = Destination::infer(&url);
        Self { url, method: Method::GET, mode: RequestMode::default(), destination, headers: Vec::new(), body: None }
    }

    /// A top-level document navigation.
    pub fn navigate(url: Url) -> Self {
        Self {
            url,
            method: Method::GET,
            mode: RequestMode::Navigate,
            destination: Destination::Document,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A POST carrying a JSON body.
    pub fn post_json(url: Url, body: &serde_json::Value) -> Result<Self, Error> {
        let body = serde_json::to_vec(body).map_err(|e| Error::InvalidInput(e.to_string()))?;
        Ok(Self {
            url,
            method: Method::POST,
            mode: RequestMode::SameOrigin,
            destination: Destination::Other,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(Bytes::from(body)),
        })
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// URL used as the cache key: the request URL without its fragment.
    pub fn cache_url(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.to_string()
    }
}

/// Parse an HTTP method name, case-insensitively.
pub fn parse_method(s: &str) -> Result<Method, Error> {
    Method::from_bytes(s.trim().to_ascii_uppercase().as_bytes())
        .map_err(|e| Error::InvalidInput(format!("invalid method {s:?}: {e}")))
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("post").unwrap(), Method::POST);
        assert_eq!(parse_method(" GET ").unwrap(), Method::GET);
        assert!(matches!(parse_method("NOT A METHOD"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_infer_destination() {
        assert_eq!(Destination::infer(&url("https://a.test/assets/js/main-abc123.js")), Destination::Script);
        assert_eq!(Destination::infer(&url("https://a.test/assets/css/index-9f.css")), Destination::Style);
        assert_eq!(Destination::infer(&url("https://a.test/favicon.svg")), Destination::Image);
        assert_eq!(Destination::infer(&url("https://a.test/photo.JPG")), Destination::Image);
        assert_eq!(Destination::infer(&url("https://a.test/manifest.json")), Destination::Manifest);
        assert_eq!(Destination::infer(&url("https://a.test/resume.pdf")), Destination::Other);
        assert_eq!(Destination::infer(&url("https://a.test/")), Destination::Other);
    }

    #[test]
    fn test_cache_url_drops_fragment() {
        let request = Request::get(url("https://a.test/index.html#contact"));
        assert_eq!(request.cache_url(), "https://a.test/index.html");
    }

    #[test]
    fn test_post_json() {
        let request = Request::post_json(url("https://a.test/api/contact"), &serde_json::json!({"name": "Ada"})).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body.as_deref(), Some(br#"{"name":"Ada"}"#.as_slice()));
        assert!(
            request
                .headers
                .iter()
                .any(|(k, v)| k == "Content-Type" && v == "application/json")
        );
    }

    #[test]
    fn test_parse_mode_and_destination() {
        assert_eq!("navigate".parse::<RequestMode>().unwrap(), RequestMode::Navigate);
        assert_eq!("no-cors".parse::<RequestMode>().unwrap(), RequestMode::NoCors);
        assert!("sideways".parse::<RequestMode>().is_err());
        assert_eq!("image".parse::<Destination>().unwrap(), Destination::Image);
        assert_eq!("".parse::<Destination>().unwrap(), Destination::Other);
    }
}

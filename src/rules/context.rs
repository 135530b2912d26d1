//! Request fields exposed to response templates.
//!
//! Templates never see the native request, only this snapshot. Field names
//! follow the capitalized style templates address them by
//! (`Method`, `URL.Path`, `Proto`, ...).

use std::borrow::Cow;
use std::collections::BTreeMap;

use axum::http::{header, Request, Uri, Version};
use percent_encoding::percent_decode_str;
use serde::Serialize;

/// Percent-decoded request path; this is what path rules match against.
///
/// Invalid UTF-8 after decoding is replaced rather than rejected.
pub fn decoded_path(uri: &Uri) -> Cow<'_, str> {
    percent_decode_str(uri.path()).decode_utf8_lossy()
}

/// Snapshot of one request, built fresh for each template render.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    #[serde(rename = "Method")]
    pub method: String,

    #[serde(rename = "URL")]
    pub url: UrlParts,

    /// Protocol version, e.g. "HTTP/1.1".
    #[serde(rename = "Proto")]
    pub proto: String,

    #[serde(rename = "ProtoMajor")]
    pub proto_major: u8,

    #[serde(rename = "ProtoMinor")]
    pub proto_minor: u8,

    /// Host header, or the URI authority when the header is absent.
    #[serde(rename = "Host")]
    pub host: String,

    /// Path and query as sent by the client.
    #[serde(rename = "RequestURI")]
    pub request_uri: String,

    /// Lowercase header name to comma-joined values.
    #[serde(rename = "Header")]
    pub header: BTreeMap<String, String>,
}

/// Components of the request URI.
///
/// Scheme and host are empty for origin-form request targets.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UrlParts {
    #[serde(rename = "Scheme")]
    pub scheme: String,

    /// Host with port, when the URI carries one.
    #[serde(rename = "Host")]
    pub host: String,

    #[serde(rename = "Hostname")]
    pub hostname: String,

    #[serde(rename = "Port")]
    pub port: String,

    /// Decoded path.
    #[serde(rename = "Path")]
    pub path: String,

    /// Path as it appeared on the wire, still percent-encoded.
    #[serde(rename = "RawPath")]
    pub raw_path: String,

    #[serde(rename = "RawQuery")]
    pub raw_query: String,
}

impl RequestContext {
    /// Capture the template-addressable fields of a request.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let uri = req.uri();
        let hostname = uri.host().unwrap_or_default().to_string();
        let port = uri.port_u16().map(|p| p.to_string()).unwrap_or_default();
        let url_host = if port.is_empty() {
            hostname.clone()
        } else {
            format!("{}:{}", hostname, port)
        };

        let mut header: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in req.headers() {
            let value = String::from_utf8_lossy(value.as_bytes());
            header
                .entry(name.as_str().to_string())
                .and_modify(|joined| {
                    joined.push_str(", ");
                    joined.push_str(&value);
                })
                .or_insert_with(|| value.into_owned());
        }

        let host = req
            .headers()
            .get(header::HOST)
            .map(|h| String::from_utf8_lossy(h.as_bytes()).into_owned())
            .unwrap_or_else(|| url_host.clone());

        let (proto_major, proto_minor) = proto_version(req.version());

        Self {
            method: req.method().to_string(),
            url: UrlParts {
                scheme: uri.scheme_str().unwrap_or_default().to_string(),
                host: url_host,
                hostname,
                port,
                path: decoded_path(uri).into_owned(),
                raw_path: uri.path().to_string(),
                raw_query: uri.query().unwrap_or_default().to_string(),
            },
            proto: format!("HTTP/{}.{}", proto_major, proto_minor),
            proto_major,
            proto_minor,
            host,
            request_uri: uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| "/".to_string()),
            header,
        }
    }
}

fn proto_version(version: Version) -> (u8, u8) {
    match version {
        Version::HTTP_09 => (0, 9),
        Version::HTTP_10 => (1, 0),
        Version::HTTP_2 => (2, 0),
        Version::HTTP_3 => (3, 0),
        _ => (1, 1),
    }
}

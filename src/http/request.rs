use crate::error::Result;
use hyper::{Body, Request as HyperRequest};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// Transport-independent description of an inbound request
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: String,
    pub uri: String,
    pub headers: HashMap<String, String>,
    pub query: HashMap<String, String>,
    path: String,
    body_bytes: Vec<u8>,
}

impl Request {
    /// Create a request from a method and a request target (`/path?query`)
    pub fn new(method: &str, uri: &str) -> Self {
        let (raw_path, raw_query) = match uri.split_once('?') {
            Some((path, query)) => (path, query),
            None => (uri, ""),
        };

        Request {
            method: method.to_string(),
            uri: uri.to_string(),
            headers: HashMap::new(),
            query: Self::parse_query(raw_query),
            path: percent_decode_str(raw_path).decode_utf8_lossy().into_owned(),
            body_bytes: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_lowercase(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body_bytes = body;
        self
    }

    pub async fn from_hyper(req: HyperRequest<Body>) -> Result<Self> {
        let method = req.method().to_string();
        let uri = req.uri().to_string();
        let mut request = Self::new(&method, &uri);

        for (name, value) in req.headers() {
            if let Ok(value_str) = value.to_str() {
                request
                    .headers
                    .insert(name.to_string(), value_str.to_string());
            }
        }

        request.body_bytes = hyper::body::to_bytes(req.into_body()).await?.to_vec();
        Ok(request)
    }

    /// Decoded request path without the query string
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Header lookup, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    pub fn body(&self) -> &[u8] {
        &self.body_bytes
    }

    pub fn body_as_string(&self) -> String {
        String::from_utf8_lossy(&self.body_bytes).to_string()
    }

    fn parse_query(query: &str) -> HashMap<String, String> {
        let mut result = HashMap::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            result.insert(Self::decode_component(key), Self::decode_component(value));
        }
        result
    }

    fn decode_component(raw: &str) -> String {
        let spaced = raw.replace('+', " ");
        percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
    }
}

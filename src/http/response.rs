use crate::error::Result;
use hyper::StatusCode;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body("Internal Server Error".as_bytes().to_vec())
    }

    pub fn json<T: Serialize>(data: T) -> Result<Self> {
        let json_string = serde_json::to_string(&data)?;
        Ok(Self::ok()
            .with_header("Content-Type", "application/json")
            .with_body(json_string.into_bytes()))
    }

    pub fn html(content: impl Into<String>) -> Self {
        Self::ok()
            .with_header("Content-Type", "text/html; charset=utf-8")
            .with_body(content.into().into_bytes())
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::ok()
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(content.into().into_bytes())
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a header to an existing response (mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Replace every header called `name` with a single value
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers
            .retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.add_header(name, value);
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Get the body size in bytes
    pub fn body_size(&self) -> usize {
        self.body.len()
    }

    pub fn body_as_string(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn into_hyper(self) -> hyper::Response<hyper::Body> {
        let mut builder = hyper::Response::builder().status(self.status);

        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        builder
            .body(hyper::Body::from(self.body))
            .unwrap_or_else(|_| hyper::Response::new(hyper::Body::empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_header_replaces() {
        let mut res = Response::text("hi");
        res.set_header("content-type", "text/csv");
        assert_eq!(res.header("Content-Type"), Some("text/csv"));
        assert_eq!(res.headers.len(), 1);
    }

    #[test]
    fn test_json_response() {
        let res = Response::json(serde_json::json!({"id": 7})).unwrap();
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(res.body_as_string(), "{\"id\":7}");
    }

    #[test]
    fn test_into_hyper_keeps_status_and_headers() {
        let res = Response::text("gone")
            .with_status(StatusCode::GONE)
            .with_header("X-Trace", "1")
            .into_hyper();
        assert_eq!(res.status(), StatusCode::GONE);
        assert_eq!(res.headers()["x-trace"], "1");
    }
}

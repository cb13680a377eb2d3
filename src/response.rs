use std::{
    borrow::Cow,
    fmt::Display,
    io::{self, Write},
};

use chrono::{DateTime, Utc};

use crate::{error::StubError, request::RequestHead};

pub const CALLER_BODY: &[u8] = br#"{"caller": "PublisherA"}"#;
const SERVER: &str = concat!("publisher-stub/", env!("CARGO_PKG_VERSION"));
const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    RequestHeaderFieldsTooLarge,
    NotImplemented,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::RequestHeaderFieldsTooLarge => 431,
            Status::NotImplemented => 501,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",
            Status::NotImplemented => "Not Implemented",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Status,
    body: Cow<'static, [u8]>,
}

impl Response {
    /// The fixed answer to every GET.
    pub fn caller() -> Self {
        Response {
            status: Status::Ok,
            body: Cow::Borrowed(CALLER_BODY),
        }
    }

    pub fn for_request(head: &RequestHead) -> Self {
        if head.is_get() {
            Response::caller()
        } else {
            Response::unsupported_method(&head.method)
        }
    }

    pub fn unsupported_method(method: &str) -> Self {
        Response {
            status: Status::NotImplemented,
            body: Cow::Owned(format!("Unsupported method ('{method}')").into_bytes()),
        }
    }

    /// `None` when there is nobody left to answer.
    pub fn for_error(err: &StubError) -> Option<Self> {
        let status = match err {
            StubError::RequestTooLarge { .. }
            | StubError::InvalidRequest(httparse::Error::TooManyHeaders) => {
                Status::RequestHeaderFieldsTooLarge
            }
            StubError::InvalidRequest(_) | StubError::UnsupportedSimpleRequest(_) => {
                Status::BadRequest
            }
            StubError::Io(_) | StubError::ConnectionClosed { .. } => return None,
        };
        Some(Response {
            status,
            body: Cow::Owned(format!("{err}").into_bytes()),
        })
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// HTTP/1.0 encoding; the connection is closed after the body.
    pub fn encode(&self, date: DateTime<Utc>) -> Vec<u8> {
        let head = format!(
            "HTTP/1.0 {}\r\nServer: {SERVER}\r\nDate: {}\r\nContent-type: text/plain\r\nContent-Length: {}\r\n\r\n",
            self.status,
            date.format(IMF_FIXDATE),
            self.body().len(),
        );
        let mut out = Vec::with_capacity(head.len() + self.body().len());
        out.extend_from_slice(head.as_bytes());
        out.extend_from_slice(self.body());
        out
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.encode(Utc::now()))?;
        writer.flush()
    }

    /// HTTP/0.9 has no status line or headers.
    pub fn write_body_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.body())?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn head(method: &str, path: &str) -> RequestHead {
        RequestHead {
            method: method.into(),
            path: path.into(),
            version: 1,
            simple: false,
        }
    }

    #[test]
    fn caller_body_is_literal() {
        assert_eq!(CALLER_BODY, b"{\"caller\": \"PublisherA\"}");
        assert_eq!(CALLER_BODY.len(), 24);
        assert!(CALLER_BODY.is_ascii());
    }

    #[test]
    fn encodes_caller_response() {
        let date = Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 3).unwrap();
        let encoded = Response::caller().encode(date);
        let expected = format!(
            "HTTP/1.0 200 OK\r\nServer: {SERVER}\r\nDate: Mon, 19 Oct 2026 08:05:03 GMT\r\nContent-type: text/plain\r\nContent-Length: 24\r\n\r\n{{\"caller\": \"PublisherA\"}}"
        );
        assert_eq!(String::from_utf8(encoded).unwrap(), expected);
    }

    #[test]
    fn get_on_any_path_is_caller() {
        for path in ["/", "/foo", "/?x=1", "/a/b/c?d=e&f"] {
            assert_eq!(Response::for_request(&head("GET", path)), Response::caller());
        }
    }

    #[test]
    fn other_methods_are_not_implemented() {
        for method in ["POST", "HEAD", "PUT", "DELETE", "get"] {
            let response = Response::for_request(&head(method, "/"));
            assert_eq!(response.status(), Status::NotImplemented);
            assert_eq!(
                response.body(),
                format!("Unsupported method ('{method}')").as_bytes()
            );
        }
    }

    #[test]
    fn error_responses() {
        let too_large = StubError::RequestTooLarge { limit: 4096 };
        assert_eq!(
            Response::for_error(&too_large).map(|r| r.status()),
            Some(Status::RequestHeaderFieldsTooLarge)
        );

        let too_many = StubError::InvalidRequest(httparse::Error::TooManyHeaders);
        assert_eq!(
            Response::for_error(&too_many).map(|r| r.status()),
            Some(Status::RequestHeaderFieldsTooLarge)
        );

        let bad = StubError::InvalidRequest(httparse::Error::Version);
        assert_eq!(
            Response::for_error(&bad).map(|r| r.status()),
            Some(Status::BadRequest)
        );

        let simple_post = StubError::UnsupportedSimpleRequest("POST".into());
        assert_eq!(
            Response::for_error(&simple_post).map(|r| r.status()),
            Some(Status::BadRequest)
        );

        let closed = StubError::ConnectionClosed { received: 3 };
        assert_eq!(Response::for_error(&closed), None);
    }

    #[test]
    fn write_to_emits_status_line_first() -> anyhow::Result<()> {
        let mut out = Vec::new();
        Response::unsupported_method("POST").write_to(&mut out)?;
        assert!(out.starts_with(b"HTTP/1.0 501 Not Implemented\r\n"));
        assert!(out.ends_with(b"\r\n\r\nUnsupported method ('POST')"));
        Ok(())
    }

    #[test]
    fn body_only_for_simple_requests() -> anyhow::Result<()> {
        let mut out = Vec::new();
        Response::caller().write_body_to(&mut out)?;
        assert_eq!(out, CALLER_BODY);
        Ok(())
    }
}

use std::io::{self, Read};

use crate::error::StubError;

const READ_CHUNK: usize = 4096;
pub const MAX_HEAD_SIZE: usize = 64 * 1024;
pub const MAX_HEADERS: usize = 100;

/// The parts of a request head the responder looks at. Headers and body are
/// read past but never kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: String,
    pub path: String,
    pub version: u8,
    /// HTTP/0.9 `GET <path>` line: answered with the bare body.
    pub simple: bool,
}

impl RequestHead {
    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}

pub fn read_head<R: Read>(reader: &mut R) -> Result<RequestHead, StubError> {
    let mut buf = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        if buf.len() >= MAX_HEAD_SIZE {
            return Err(StubError::RequestTooLarge {
                limit: MAX_HEAD_SIZE,
            });
        }
        let want = READ_CHUNK.min(MAX_HEAD_SIZE - buf.len());
        let read = match reader.read(&mut chunk[..want]) {
            Ok(read) => read,
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            return Err(StubError::ConnectionClosed {
                received: buf.len(),
            });
        }
        buf.extend_from_slice(&chunk[..read]);

        if let Some(head) = parse_head(&buf)? {
            tracing::debug!(message = "Parsed request head", bytes = buf.len(), method = %head.method, path = %head.path);
            return Ok(head);
        }
    }
}

/// Returns `None` while the head is still incomplete.
pub fn parse_head(buf: &[u8]) -> Result<Option<RequestHead>, StubError> {
    let Some(line_end) = buf.iter().position(|b| *b == b'\n') else {
        return Ok(None);
    };
    if let Some(head) = parse_simple_line(&buf[..line_end])? {
        return Ok(Some(head));
    }

    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut req = httparse::Request::new(&mut headers);
    if req.parse(buf)?.is_partial() {
        return Ok(None);
    }

    Ok(Some(RequestHead {
        method: req.method.unwrap_or_default().to_owned(),
        path: req.path.unwrap_or("/").to_owned(),
        version: req.version.unwrap_or(0),
        simple: false,
    }))
}

/// A two word request line is HTTP/0.9, which only knows GET.
fn parse_simple_line(line: &[u8]) -> Result<Option<RequestHead>, StubError> {
    let Ok(line) = std::str::from_utf8(line) else {
        return Ok(None);
    };
    let words: Vec<&str> = line.split_ascii_whitespace().collect();
    let [method, path] = words[..] else {
        return Ok(None);
    };
    if method != "GET" {
        return Err(StubError::UnsupportedSimpleRequest(method.to_owned()));
    }

    Ok(Some(RequestHead {
        method: method.to_owned(),
        path: path.to_owned(),
        version: 0,
        simple: true,
    }))
}

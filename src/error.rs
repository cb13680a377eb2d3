use std::io;

#[derive(Debug, thiserror::Error)]
pub enum StubError {
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid http request: {0}")]
    InvalidRequest(#[from] httparse::Error),
    #[error("bad HTTP/0.9 request type {0:?}")]
    UnsupportedSimpleRequest(String),
    #[error("request head exceeds {limit} bytes")]
    RequestTooLarge { limit: usize },
    #[error("client closed the connection after {received} bytes")]
    ConnectionClosed { received: usize },
}

use std::{
    io::{self, Read, Write},
    net::SocketAddr,
};

use crate::{
    error::StubError,
    listener::StubListener,
    request,
    response::{Response, Status},
};

/// Answers connections one at a time, in accept order.
#[derive(Debug)]
pub struct Responder {
    listener: StubListener,
}

impl Responder {
    pub fn new(listener: StubListener) -> Self {
        Responder { listener }
    }

    pub fn bind(port: u16) -> io::Result<Self> {
        StubListener::bind(port).map(Responder::new)
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn serve_forever(&self) -> ! {
        loop {
            // failures are already logged with the peer attached
            let _ = self.serve_one();
        }
    }

    pub fn serve_one(&self) -> Result<Status, StubError> {
        let (mut stream, peer) = match self.listener.accept() {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::warn!(message = "Accept failed", error = %err);
                return Err(err.into());
            }
        };
        let span = tracing::debug_span!("connection", peer = %peer);
        let _enter = span.enter();

        let result = handle_connection(&mut stream);
        match &result {
            Ok(status) => tracing::info!(message = "Responded", status = status.code()),
            Err(StubError::ConnectionClosed { received }) => {
                tracing::debug!(message = "Client left before sending a request", received = *received)
            }
            Err(err) => tracing::warn!(message = "Connection failed", error = %err),
        }
        result
    }
}

/// Reads one request head and writes exactly one response, unless the
/// client went away first.
pub fn handle_connection<S: Read + Write>(stream: &mut S) -> Result<Status, StubError> {
    let head = match request::read_head(stream) {
        Ok(head) => head,
        Err(err) => {
            if let Some(response) = Response::for_error(&err) {
                response.write_to(stream)?;
            }
            return Err(err);
        }
    };
    tracing::debug!(message = "Request", method = %head.method, path = %head.path, version = head.version);

    let response = Response::for_request(&head);
    if head.simple {
        response.write_body_to(stream)?;
    } else {
        response.write_to(stream)?;
    }
    Ok(response.status())
}

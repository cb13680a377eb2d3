use std::{
    io,
    net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream},
};

use socket2::{Domain, Protocol, Socket, Type};

const BACKLOG: i32 = 128;

/// Listening socket on all IPv4 interfaces. The socket is closed when this
/// value is dropped.
#[derive(Debug)]
pub struct StubListener {
    listener: TcpListener,
}

impl StubListener {
    pub fn bind(port: u16) -> io::Result<StubListener> {
        StubListener::bind_addr(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
    }

    pub fn bind_addr(addr: SocketAddr) -> io::Result<StubListener> {
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.listen(BACKLOG)?;

        let listener = StubListener {
            listener: socket.into(),
        };
        tracing::debug!(message = "Bound listener", addr = %listener.local_addr()?);
        Ok(listener)
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn accept(&self) -> io::Result<(TcpStream, SocketAddr)> {
        self.listener.accept()
    }
}

impl Drop for StubListener {
    fn drop(&mut self) {
        match self.listener.local_addr() {
            Ok(addr) => tracing::debug!(%addr, "Closing listener"),
            Err(_) => tracing::debug!("Closing listener"),
        }
    }
}

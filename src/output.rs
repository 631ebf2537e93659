//! Response sinks for streaming encoded images.
//!
//! [`ImageProcessor::output`](crate::ImageProcessor::output) writes to a
//! [`ResponseSink`]: one header call followed by the body bytes. Two sinks are
//! provided:
//!
//! - [`BufferedResponse`] collects everything in memory and converts into an
//!   [`http::Response`] for whatever server hosts the processor.
//! - [`CgiResponse`] writes CGI-style output (`Name: value` lines, a blank
//!   line, then the body) to any [`Write`], e.g. stdout.
//!
//! Both refuse headers once the body has started.

use std::io::{self, Write};

/// Header name emitted by `output`.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Destination for a single HTTP response.
pub trait ResponseSink {
    fn set_header(&mut self, name: &str, value: &str) -> io::Result<()>;
    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()>;
}

fn headers_already_sent(name: &str) -> io::Error {
    io::Error::other(format!("cannot set header '{name}': body already started"))
}

/// In-memory response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferedResponse {
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Build a `200 OK` response carrying the collected headers and body.
    pub fn into_http(self) -> Result<http::Response<Vec<u8>>, http::Error> {
        let mut builder = http::Response::builder().status(http::StatusCode::OK);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder.body(self.body)
    }
}

impl ResponseSink for BufferedResponse {
    fn set_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        if !self.body.is_empty() {
            return Err(headers_already_sent(name));
        }
        self.headers.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(bytes);
        Ok(())
    }
}

/// CGI-style response written straight to a byte stream.
pub struct CgiResponse<W: Write> {
    writer: W,
    body_started: bool,
}

impl<W: Write> CgiResponse<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            body_started: false,
        }
    }

    fn start_body(&mut self) -> io::Result<()> {
        if !self.body_started {
            self.writer.write_all(b"\r\n")?;
            self.body_started = true;
        }
        Ok(())
    }

    /// Terminate the header block if nothing was written, flush, and hand
    /// back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.start_body()?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> ResponseSink for CgiResponse<W> {
    fn set_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        if self.body_started {
            return Err(headers_already_sent(name));
        }
        write!(self.writer, "{name}: {value}\r\n")
    }

    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.start_body()?;
        self.writer.write_all(bytes)
    }
}

//! HTTP transport layer.

mod http;

pub use http::{HttpRequest, HttpResponse, HttpTransport, Transport, TransportError};

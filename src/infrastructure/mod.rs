pub mod http_transport;

pub use http_transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};

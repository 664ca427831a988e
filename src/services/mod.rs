pub mod transport;
pub mod request_context;
pub mod api_client;
pub mod catalog_service;

#[cfg(target_arch = "wasm32")]
pub mod gloo_transport;
#[cfg(not(target_arch = "wasm32"))]
pub mod reqwest_transport;

pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use request_context::RequestContext;
pub use api_client::ApiClient;
pub use catalog_service::CatalogService;

#[cfg(target_arch = "wasm32")]
pub use gloo_transport::GlooTransport;
#[cfg(not(target_arch = "wasm32"))]
pub use reqwest_transport::ReqwestTransport;

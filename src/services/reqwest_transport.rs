// ============================================================================
// REQWEST TRANSPORT - Native HTTP stack (non-wasm targets)
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::error::ApiError;
use crate::services::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Transport whose requests give up after `timeout_seconds`
    pub fn new(timeout_seconds: u32) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(timeout_seconds)))
            .build()
            .map_err(|e| ApiError::Network(format!("Client build error: {}", e)))?;
        Ok(Self { client })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.client.request(method(request.method), &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Error reading response: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

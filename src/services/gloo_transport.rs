// ============================================================================
// GLOO TRANSPORT - Browser fetch via gloo-net (wasm32 only)
// ============================================================================

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};

use crate::error::ApiError;
use crate::services::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

#[derive(Clone, Default)]
pub struct GlooTransport;

impl GlooTransport {
    pub fn new() -> Self {
        Self
    }

    fn builder(request: &HttpRequest) -> RequestBuilder {
        let builder = match request.method {
            HttpMethod::Get => Request::get(&request.url),
            HttpMethod::Post => Request::post(&request.url),
            HttpMethod::Put => Request::put(&request.url),
            HttpMethod::Delete => Request::delete(&request.url),
        };
        let builder = if request.query.is_empty() {
            builder
        } else {
            builder.query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        };
        request
            .headers
            .iter()
            .fold(builder, |builder, (name, value)| builder.header(name, value))
    }
}

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let builder = Self::builder(&request);
        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Encode(format!("Request build error: {}", e)))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Error reading response: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

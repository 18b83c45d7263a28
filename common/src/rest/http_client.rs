use crate::config::ApiConfig;
use crate::errors::AppError;
use crate::query::WireParams;
use crate::rest::rest_client::{ApiResponse, HttpMethod, RestClient, RestRequest};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;

/// 基于 reqwest 的 RestClient 实现
#[derive(Debug, Clone)]
pub struct HttpRestClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRestClient {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<ApiResponse<Value>, AppError> {
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<Value>>(&bytes)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).trim().to_string());
            error!("http {} {}", status.as_u16(), message);
            return Err(AppError::Http { status: status.as_u16(), message });
        }
        if bytes.is_empty() {
            return Ok(ApiResponse::ok_empty());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RestClient for HttpRestClient {
    async fn get(&self, path: &str, params: &WireParams) -> Result<ApiResponse<Value>, AppError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, params.as_pairs());
        self.send(self.client.get(url).query(params.as_pairs())).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiResponse<Value>, AppError> {
        let url = self.url(path);
        debug!("POST {}", url);
        let builder = self.client.post(url);
        self.send(match body {
            Some(body) => builder.json(&body),
            None => builder,
        })
        .await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<ApiResponse<Value>, AppError> {
        let url = self.url(path);
        debug!("PUT {}", url);
        let builder = self.client.put(url);
        self.send(match body {
            Some(body) => builder.json(&body),
            None => builder,
        })
        .await
    }

    async fn request(&self, request: RestRequest) -> Result<ApiResponse<Value>, AppError> {
        let url = self.url(&request.url);
        debug!("{} {}", request.method, url);
        let mut builder = self.client.request(Self::method(request.method), url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.data {
            builder = builder.json(body);
        }
        self.send(builder).await
    }
}

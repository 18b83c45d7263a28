use crate::errors::AppError;
use crate::query::WireParams;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display};

/// 后端统一返回结构 { success, data?, message? }
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    pub fn ok_empty() -> Self {
        Self { success: true, data: None, message: None }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()) }
    }

    /// success:false 转成 AppError::Api，消息原样透传
    pub fn into_result(self) -> Result<Option<T>, AppError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(AppError::Api(self.message.unwrap_or_else(|| "request failed".to_string())))
        }
    }

    pub fn require_data(self) -> Result<T, AppError> {
        self.into_result()?.ok_or_else(|| AppError::Api("response carried no data".to_string()))
    }
}

impl ApiResponse<Value> {
    pub fn decode<U: DeserializeOwned>(self) -> Result<U, AppError> {
        let data = self.require_data()?;
        Ok(serde_json::from_value(data)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// 通用请求，用于带 body 的 DELETE
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    pub method: HttpMethod,
    pub url: String,
    pub data: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RestRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), data: None, headers: Vec::new() }
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, AppError> {
        self.data = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// REST 调用抽象。传输层失败返回 Err，业务失败返回 success=false 的 Ok
#[async_trait]
pub trait RestClient: Send + Sync {
    async fn get(&self, path: &str, params: &WireParams) -> Result<ApiResponse<Value>, AppError>;
    async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiResponse<Value>, AppError>;
    async fn put(&self, path: &str, body: Option<Value>) -> Result<ApiResponse<Value>, AppError>;
    async fn request(&self, request: RestRequest) -> Result<ApiResponse<Value>, AppError>;
}

pub fn to_body<B: Serialize>(body: &B) -> Result<Value, AppError> {
    Ok(serde_json::to_value(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_message_is_passed_through() {
        let resp: ApiResponse<Value> =
            serde_json::from_value(json!({ "success": false, "msg": "name taken" })).unwrap();
        match resp.into_result() {
            Err(AppError::Api(msg)) => assert_eq!(msg, "name taken"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn decode_typed_data() {
        let resp: ApiResponse<Value> =
            serde_json::from_value(json!({ "success": true, "data": [1, 2, 3] })).unwrap();
        let data: Vec<u32> = resp.decode().unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn success_without_data_is_empty() {
        let resp: ApiResponse<Value> = serde_json::from_value(json!({ "success": true })).unwrap();
        assert_eq!(resp.into_result().unwrap(), None);
    }

    #[test]
    fn methods_render_uppercase() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert_eq!(HttpMethod::Get.as_ref(), "GET");
    }
}

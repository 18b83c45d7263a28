//! 测试用的脚本化 RestClient：按顺序回放预置响应并记录每次调用

use async_trait::async_trait;
use common::errors::AppError;
use common::query::WireParams;
use common::rest::{ApiResponse, HttpMethod, RestClient, RestRequest};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

enum Scripted {
    Ready(Result<ApiResponse<Value>, AppError>),
    Gated(oneshot::Receiver<ApiResponse<Value>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedCall {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
pub struct MockRestClient {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRestClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, data: Value) {
        self.push(Scripted::Ready(Ok(ApiResponse::ok(data))));
    }

    pub fn push_empty_ok(&self) {
        self.push(Scripted::Ready(Ok(ApiResponse::ok_empty())));
    }

    pub fn push_fail(&self, message: &str) {
        self.push(Scripted::Ready(Ok(ApiResponse::fail(message))));
    }

    pub fn push_err(&self, err: AppError) {
        self.push(Scripted::Ready(Err(err)));
    }

    /// 响应在测试里手动放行，用来模拟乱序返回
    pub fn push_gated(&self) -> oneshot::Sender<ApiResponse<Value>> {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Gated(rx));
        tx
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls.lock().unwrap().last().cloned().expect("no call recorded")
    }

    fn push(&self, scripted: Scripted) {
        self.script.lock().unwrap().push_back(scripted);
    }

    async fn respond(&self, call: RecordedCall) -> Result<ApiResponse<Value>, AppError> {
        let next = {
            self.calls.lock().unwrap().push(call.clone());
            self.script.lock().unwrap().pop_front()
        };
        match next {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated(rx)) => {
                rx.await.map_err(|_| AppError::Network("gate dropped".into()))
            }
            None => panic!("no scripted response for {:?} {}", call.method, call.path),
        }
    }
}

#[async_trait]
impl RestClient for MockRestClient {
    async fn get(&self, path: &str, params: &WireParams) -> Result<ApiResponse<Value>, AppError> {
        self.respond(RecordedCall {
            method: HttpMethod::Get,
            path: path.into(),
            params: params.as_pairs().to_vec(),
            body: None,
        })
        .await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiResponse<Value>, AppError> {
        let call =
            RecordedCall { method: HttpMethod::Post, path: path.into(), params: vec![], body };
        self.respond(call).await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<ApiResponse<Value>, AppError> {
        let call =
            RecordedCall { method: HttpMethod::Put, path: path.into(), params: vec![], body };
        self.respond(call).await
    }

    async fn request(&self, request: RestRequest) -> Result<ApiResponse<Value>, AppError> {
        self.respond(RecordedCall {
            method: request.method,
            path: request.url,
            params: request.headers,
            body: request.data,
        })
        .await
    }
}

/// 列表接口响应体
pub fn page_json(page: i64, total: u64, items: Vec<Value>) -> Value {
    json!({ "page": page, "total": total, "items": items })
}

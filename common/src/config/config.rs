use crate::errors::AppError;
use config::Config;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub api: Option<ApiConfig>,
    pub sys: Option<SysConfig>,
    pub tree: Option<TreeConfig>,
}
impl AppConfig {
    /// 读取配置文件，并允许环境变量覆盖，例如 APP_API__TIMEOUT_SECS=5
    pub fn new(file: &str) -> Result<Self, AppError> {
        let config = Config::builder()
            .add_source(config::File::with_name(file).required(true))
            .add_source(env_source())
            .build()?;
        let cfg = config.try_deserialize::<AppConfig>()?;
        Ok(cfg)
    }
    pub fn init(file: &str) -> Result<Arc<Self>, AppError> {
        let instance = Arc::new(Self::new(file)?);
        INSTANCE
            .set(instance.clone())
            .map_err(|_| AppError::Internal("AppConfig already initialized".into()))?;
        Ok(instance)
    }

    pub fn get_api(&self) -> ApiConfig {
        self.api.clone().unwrap_or_default()
    }
    pub fn get_sys(&self) -> SysConfig {
        self.sys.clone().unwrap_or_default()
    }
    pub fn get_tree(&self) -> TreeConfig {
        self.tree.clone().unwrap_or_default()
    }
    /// 获取单例
    pub fn get() -> Result<Arc<Self>, AppError> {
        Self::try_get().ok_or_else(|| AppError::Internal("AppConfig is not initialized".into()))
    }
    pub fn try_get() -> Option<Arc<Self>> {
        INSTANCE.get().cloned()
    }
}
static INSTANCE: OnceCell<Arc<AppConfig>> = OnceCell::new();

/// 前缀与段名之间用单下划线，段名与字段之间用双下划线，字段名本身可以带下划线
fn env_source() -> config::Environment {
    config::Environment::with_prefix("APP").prefix_separator("_").separator("__").try_parsing(true)
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// 后端 REST 根地址，例如 http://localhost:8080/api
    pub base_url: String,
    pub timeout_secs: u64,
    /// 可选的 Bearer token
    pub token: Option<String>,
}
impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:8080/api".into(), timeout_secs: 30, token: None }
    }
}
impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SysConfig {
    //全局日志级别
    pub log_level: String,
    //列表默认每页条数
    pub default_page_size: u32,
}
impl Default for SysConfig {
    fn default() -> Self {
        Self { log_level: "info".into(), default_page_size: 10 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TreeConfig {
    /// 调整父节点时，只允许挂到根节点下
    pub restrict_parent_to_roots: bool,
}
impl Default for TreeConfig {
    fn default() -> Self {
        Self { restrict_parent_to_roots: true }
    }
}

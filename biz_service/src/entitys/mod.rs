/// 为带 `id` 与 `audit` 字段的实体实现 Entity
macro_rules! impl_entity {
    ($ty:ty, $path:expr) => {
        impl $crate::entitys::Entity for $ty {
            const RESOURCE: &'static str = $path;

            fn id(&self) -> &str {
                &self.id
            }

            fn is_deleted(&self) -> bool {
                self.audit.is_deleted
            }
        }
    };
}
pub(crate) use impl_entity;

pub mod conference_entity;
pub mod faq_entity;
pub mod feedback_entity;
pub mod instructor_entity;
pub mod location_entity;
pub mod menu_entity;
pub mod notification_entity;
pub mod resource_kind;
pub mod user_entity;
pub mod workshop_entity;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// 控制器可管理的记录：必须带字符串 id，并声明自己的 REST 根路径
pub trait Entity: DeserializeOwned + Clone + Send + Sync + 'static {
    /// REST 资源根路径，例如 "/conferences"
    const RESOURCE: &'static str;

    fn id(&self) -> &str;

    fn is_deleted(&self) -> bool {
        false
    }
}

/// 审计字段，服务端生成，客户端只读
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditInfo {
    #[serde(default)]
    pub is_deleted: bool,
    pub delete_reason: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

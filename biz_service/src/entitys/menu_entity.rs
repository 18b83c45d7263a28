use crate::entitys::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use validator::Validate;

/// 资源类型：系统资源 / 业务资源
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    System,
    #[default]
    General,
}

/// 根节点展示分组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuGroup {
    Menu,
    System,
}

/// 资源菜单节点（权限树的一项），children 不落库，由树构建时生成
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMenu {
    pub id: String,
    /// 为空或指向不存在的节点时视为根节点
    pub parent_id: Option<String>,
    pub name: String,
    /// 唯一的符号名
    pub key: String,
    #[serde(default)]
    pub code: String,
    pub icon: Option<String>,
    pub path: Option<String>,
    #[serde(rename = "type", default)]
    pub resource_type: ResourceType,
    /// 同级节点之间的排序键
    #[serde(default)]
    pub sequence: f64,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_deleted: bool,
    pub description: Option<String>,
    pub remark: Option<String>,
    /// 显式分组标签，优先于 type
    pub group: Option<MenuGroup>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_visible() -> bool {
    true
}

impl ResourceMenu {
    pub fn display_group(&self) -> MenuGroup {
        match self.group {
            Some(group) => group,
            None => match self.resource_type {
                ResourceType::System => MenuGroup::System,
                ResourceType::General => MenuGroup::Menu,
            },
        }
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }
}

impl Entity for ResourceMenu {
    const RESOURCE: &'static str = "/resources";

    fn id(&self) -> &str {
        &self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMenuPayload {
    pub parent_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "key 不能为空"))]
    pub key: String,
    pub code: String,
    pub icon: Option<String>,
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub is_visible: bool,
    pub description: Option<String>,
    pub remark: Option<String>,
}

use crate::entitys::conference_entity::Conference;
use crate::entitys::faq_entity::Faq;
use crate::entitys::feedback_entity::Feedback;
use crate::entitys::instructor_entity::Instructor;
use crate::entitys::location_entity::Location;
use crate::entitys::menu_entity::ResourceMenu;
use crate::entitys::notification_entity::Notification;
use crate::entitys::user_entity::UserInfo;
use crate::entitys::workshop_entity::Workshop;
use crate::entitys::Entity;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// 控制台管理的资源目录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ResourceKind {
    Conference,
    Workshop,
    Instructor,
    Location,
    Faq,
    Feedback,
    User,
    Notification,
    Resource,
}

impl ResourceKind {
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Conference => Conference::RESOURCE,
            ResourceKind::Workshop => Workshop::RESOURCE,
            ResourceKind::Instructor => Instructor::RESOURCE,
            ResourceKind::Location => Location::RESOURCE,
            ResourceKind::Faq => Faq::RESOURCE,
            ResourceKind::Feedback => Feedback::RESOURCE,
            ResourceKind::User => UserInfo::RESOURCE,
            ResourceKind::Notification => Notification::RESOURCE,
            ResourceKind::Resource => ResourceMenu::RESOURCE,
        }
    }
}

use crate::render::{render_page, render_tree};
use biz_service::controller::PagedResourceController;
use biz_service::entitys::conference_entity::Conference;
use biz_service::entitys::faq_entity::Faq;
use biz_service::entitys::feedback_entity::Feedback;
use biz_service::entitys::instructor_entity::Instructor;
use biz_service::entitys::location_entity::Location;
use biz_service::entitys::menu_entity::ResourceMenu;
use biz_service::entitys::notification_entity::Notification;
use biz_service::entitys::resource_kind::ResourceKind;
use biz_service::entitys::user_entity::UserInfo;
use biz_service::entitys::workshop_entity::Workshop;
use biz_service::entitys::Entity;
use biz_service::notify::LogNotifier;
use biz_service::tree::{BrowseMode, MoveOutcome, ParentPolicy, ResourceTreeController};
use clap::{Subcommand, ValueEnum};
use common::config::AppConfig;
use common::errors::AppError;
use common::query::QueryPatch;
use common::rest::RestClient;
use log::info;
use serde::Serialize;
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 分页列出记录
    List {
        kind: ResourceKind,
        /// 页码，从 1 开始
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        desc: bool,
        /// 包含已删除的记录
        #[arg(long)]
        deleted: bool,
        /// 额外过滤条件 key=value，可重复
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
    /// 删除记录，非永久删除必须给出 --reason
    Delete {
        kind: ResourceKind,
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long, default_value = "")]
        reason: String,
        #[arg(long)]
        permanent: bool,
    },
    Restore {
        kind: ResourceKind,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// 打印资源菜单树
    Tree {
        /// 回收站模式
        #[arg(long)]
        trash: bool,
    },
    /// 与相邻兄弟节点交换顺序
    Move { id: String, direction: MoveDirection },
    Reparent { id: String, parent: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MoveDirection {
    Up,
    Down,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (key, value) =
        raw.split_once('=').ok_or_else(|| format!("expected key=value, got `{}`", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty filter key in `{}`", raw));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// 按资源种类选出具体实体类型再调用泛型函数
macro_rules! with_entity {
    ($kind:expr, $func:ident ( $($arg:expr),* )) => {
        match $kind {
            ResourceKind::Conference => $func::<Conference>($($arg),*).await,
            ResourceKind::Workshop => $func::<Workshop>($($arg),*).await,
            ResourceKind::Instructor => $func::<Instructor>($($arg),*).await,
            ResourceKind::Location => $func::<Location>($($arg),*).await,
            ResourceKind::Faq => $func::<Faq>($($arg),*).await,
            ResourceKind::Feedback => $func::<Feedback>($($arg),*).await,
            ResourceKind::User => $func::<UserInfo>($($arg),*).await,
            ResourceKind::Notification => $func::<Notification>($($arg),*).await,
            ResourceKind::Resource => $func::<ResourceMenu>($($arg),*).await,
        }
    };
}

pub async fn run(
    command: Command,
    client: Arc<dyn RestClient>,
    cfg: &AppConfig,
) -> Result<(), AppError> {
    let default_page_size = cfg.get_sys().default_page_size;
    match command {
        Command::List { kind, page, page_size, keyword, sort, desc, deleted, filters } => {
            let mut patch = QueryPatch::new().descending(desc).include_deleted(deleted);
            if let Some(keyword) = keyword {
                patch = patch.keyword(&keyword);
            }
            if let Some(sort) = sort {
                patch = patch.sort_by(&sort);
            }
            for (key, value) in filters {
                patch = patch.filter(&key, value);
            }
            // 过滤条件会把页码重置到第一页，页码单独最后设置
            let size = page_size.unwrap_or(default_page_size);
            info!("list {}", kind.path());
            with_entity!(kind, list(client, size, patch, page))
        }
        Command::Delete { kind, ids, reason, permanent } => {
            info!("delete {} records from {} (permanent: {})", ids.len(), kind.path(), permanent);
            with_entity!(kind, delete(client, default_page_size, ids, reason, permanent))
        }
        Command::Restore { kind, ids } => {
            info!("restore {} records of {}", ids.len(), kind.path());
            with_entity!(kind, restore(client, default_page_size, ids))
        }
        Command::Tree { trash } => {
            let ctrl = tree_controller(client, cfg);
            if trash {
                ctrl.set_mode(BrowseMode::Trash);
            }
            ctrl.refresh().await?;
            print!("{}", render_tree(&ctrl.snapshot()));
            Ok(())
        }
        Command::Move { id, direction } => {
            let ctrl = tree_controller(client, cfg);
            ctrl.refresh().await?;
            let outcome = match direction {
                MoveDirection::Up => ctrl.move_up(&id).await?,
                MoveDirection::Down => ctrl.move_down(&id).await?,
            };
            match outcome {
                MoveOutcome::Swapped => print!("{}", render_tree(&ctrl.snapshot())),
                MoveOutcome::AtBoundary => {
                    println!("{} is already at the {:?} edge", id, direction)
                }
                MoveOutcome::SameSequence => {
                    println!("{} shares its sequence with the neighbor, order unchanged", id)
                }
            }
            Ok(())
        }
        Command::Reparent { id, parent } => {
            let ctrl = tree_controller(client, cfg);
            ctrl.refresh().await?;
            ctrl.change_parent(&id, &parent).await?;
            print!("{}", render_tree(&ctrl.snapshot()));
            Ok(())
        }
    }
}

fn tree_controller(client: Arc<dyn RestClient>, cfg: &AppConfig) -> ResourceTreeController {
    ResourceTreeController::new(client, ParentPolicy::from_config(&cfg.get_tree()))
        .with_notifier(Arc::new(LogNotifier))
}

fn paged<T: Entity>(client: Arc<dyn RestClient>, page_size: u32) -> PagedResourceController<T> {
    PagedResourceController::new(client, page_size).with_notifier(Arc::new(LogNotifier))
}

async fn list<T: Entity + Serialize>(
    client: Arc<dyn RestClient>,
    page_size: u32,
    patch: QueryPatch,
    page: i64,
) -> Result<(), AppError> {
    let ctrl = paged::<T>(client, page_size);
    ctrl.set_query(patch)?;
    ctrl.set_page(page)?;
    ctrl.load().await?;
    print!("{}", render_page(&ctrl.snapshot()));
    Ok(())
}

async fn delete<T: Entity + Serialize>(
    client: Arc<dyn RestClient>,
    page_size: u32,
    ids: Vec<String>,
    reason: String,
    permanent: bool,
) -> Result<(), AppError> {
    let ctrl = paged::<T>(client, page_size);
    if let [id] = ids.as_slice() {
        ctrl.soft_delete(id, &reason, permanent).await?;
        info!("deleted {}/{}", T::RESOURCE, id);
    } else {
        let report = ctrl.bulk_delete(&ids, &reason, permanent).await?;
        println!("{}", report);
    }
    print!("{}", render_page(&ctrl.snapshot()));
    Ok(())
}

async fn restore<T: Entity + Serialize>(
    client: Arc<dyn RestClient>,
    page_size: u32,
    ids: Vec<String>,
) -> Result<(), AppError> {
    let ctrl = paged::<T>(client, page_size);
    ctrl.set_query(QueryPatch::new().include_deleted(true))?;
    ctrl.restore(&ids).await?;
    print!("{}", render_page(&ctrl.snapshot()));
    Ok(())
}

use biz_service::entitys::Entity;
use biz_service::controller::PageState;
use biz_service::tree::{MenuNode, TreeState};
use common::util::date_util::opt_time_to_str;
use serde::Serialize;
use std::fmt::Write;

/// 一行一条记录，已删除的记录前面带 x
pub fn render_page<T: Entity + Serialize>(state: &PageState<T>) -> String {
    let summary = state.summary();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "page {}/{} | total {} | page size {}",
        summary.current_page,
        summary.total_pages.max(1),
        summary.total,
        summary.page_size
    );
    for item in &state.items {
        let mark = if item.is_deleted() { "x" } else { " " };
        let body = serde_json::to_string(item).unwrap_or_else(|e| format!("<{}>", e));
        let _ = writeln!(out, "{} {}  {}", mark, item.id(), body);
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {}", error);
    }
    out
}

fn render_node(node: &MenuNode, out: &mut String) {
    let indent = "  ".repeat(node.level.saturating_sub(1) as usize);
    let menu = &node.menu;
    let mark = if menu.is_deleted { " [deleted]" } else { "" };
    let _ = writeln!(
        out,
        "{}- {} ({}) #{} seq={} updated={}{}",
        indent,
        menu.name,
        menu.key,
        menu.id,
        menu.sequence,
        opt_time_to_str(menu.updated_at.as_ref()),
        mark
    );
    for child in &node.children {
        render_node(child, out);
    }
}

/// 按 MENU / SYSTEM 分组输出整棵树
pub fn render_tree(state: &TreeState) -> String {
    let groups = state.tree.groups();
    let mut out = String::new();
    for (title, roots) in [("MENU", &groups.menu), ("SYSTEM", &groups.system)] {
        if roots.is_empty() {
            continue;
        }
        let _ = writeln!(out, "[{}]", title);
        for root in roots.iter() {
            render_node(root, &mut out);
        }
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {}", error);
    }
    out
}

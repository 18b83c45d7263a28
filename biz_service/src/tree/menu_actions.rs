use strum_macros::{AsRefStr, Display, EnumIter};

/// 树节点右键菜单项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum MenuAction {
    View,
    Edit,
    AddChild,
    MoveUp,
    MoveDown,
    ChangeParent,
    Delete,
    Restore,
    PermanentDelete,
}

/// 当前用户在该资源上的权限
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_restore: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self { can_create: true, can_edit: true, can_delete: true, can_restore: true }
    }

    pub fn read_only() -> Self {
        Self::default()
    }
}

/// 正常浏览 / 回收站
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum BrowseMode {
    #[default]
    Normal,
    Trash,
}

impl BrowseMode {
    pub fn is_trash(self) -> bool {
        self == BrowseMode::Trash
    }
}

/// 计算菜单项所需的节点信息
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeContext {
    pub is_deleted: bool,
    pub is_root: bool,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

/// 按节点状态、权限和浏览模式给出可用菜单项，顺序即展示顺序
pub fn available_actions(
    node: &NodeContext,
    caps: &Capabilities,
    mode: BrowseMode,
) -> Vec<MenuAction> {
    let mut actions = vec![MenuAction::View];

    if node.is_deleted {
        if caps.can_restore {
            actions.push(MenuAction::Restore);
        }
        if caps.can_delete {
            actions.push(MenuAction::PermanentDelete);
        }
        return actions;
    }

    // 回收站里未删除的根节点只是为了挂住已删除的子节点
    if mode.is_trash() && node.is_root {
        return actions;
    }

    if caps.can_edit {
        actions.push(MenuAction::Edit);
    }
    if node.is_root {
        if caps.can_create {
            actions.push(MenuAction::AddChild);
        }
    } else if caps.can_edit {
        actions.push(MenuAction::ChangeParent);
    }
    if caps.can_edit && node.can_move_up {
        actions.push(MenuAction::MoveUp);
    }
    if caps.can_edit && node.can_move_down {
        actions.push(MenuAction::MoveDown);
    }
    if caps.can_delete {
        actions.push(MenuAction::Delete);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use MenuAction::*;

    fn root() -> NodeContext {
        NodeContext { is_root: true, can_move_down: true, ..Default::default() }
    }

    fn child() -> NodeContext {
        NodeContext { is_root: false, can_move_up: true, can_move_down: true, ..Default::default() }
    }

    #[test]
    fn live_root_in_normal_mode() {
        let actions = available_actions(&root(), &Capabilities::all(), BrowseMode::Normal);
        assert_eq!(actions, vec![View, Edit, AddChild, MoveDown, Delete]);
    }

    #[test]
    fn live_child_gets_change_parent_not_add_child() {
        let actions = available_actions(&child(), &Capabilities::all(), BrowseMode::Normal);
        assert_eq!(actions, vec![View, Edit, ChangeParent, MoveUp, MoveDown, Delete]);
    }

    #[test]
    fn deleted_node_offers_restore_and_purge() {
        let node = NodeContext { is_deleted: true, ..child() };
        let actions = available_actions(&node, &Capabilities::all(), BrowseMode::Trash);
        assert_eq!(actions, vec![View, Restore, PermanentDelete]);

        let caps = Capabilities { can_restore: true, ..Default::default() };
        assert_eq!(available_actions(&node, &caps, BrowseMode::Trash), vec![View, Restore]);
    }

    #[test]
    fn trash_mode_live_root_is_view_only() {
        let actions = available_actions(&root(), &Capabilities::all(), BrowseMode::Trash);
        assert_eq!(actions, vec![View]);
        // 非根节点不受影响
        let actions = available_actions(&child(), &Capabilities::all(), BrowseMode::Trash);
        assert!(actions.contains(&Delete));
    }

    #[test]
    fn read_only_user_only_views() {
        for node in [root(), child()] {
            let actions = available_actions(&node, &Capabilities::read_only(), BrowseMode::Normal);
            assert_eq!(actions, vec![View]);
        }
    }

    #[test]
    fn action_labels() {
        assert_eq!(ChangeParent.to_string(), "change-parent");
        assert_eq!(PermanentDelete.as_ref(), "permanent-delete");
    }
}

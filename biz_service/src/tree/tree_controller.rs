use crate::controller::LoadOutcome;
use crate::entitys::menu_entity::ResourceMenu;
use crate::entitys::Entity;
use crate::notify::{Notice, Notifier};
use crate::tree::menu_actions::{
    available_actions, BrowseMode, Capabilities, MenuAction, NodeContext,
};
use crate::tree::resource_tree::{MenuNode, ResourceTree};
use arc_swap::ArcSwap;
use common::config::TreeConfig;
use common::errors::AppError;
use common::query::WireParams;
use common::rest::{
    to_body, ChangeParentRequest, DeleteRequest, HttpMethod, RestClient, RestRequest,
    RestoreRequest, SwapSequenceRequest,
};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Clone, Default)]
pub struct TreeState {
    pub tree: ResourceTree,
    pub selected: Option<String>,
    pub expanded: BTreeSet<String>,
    pub mode: BrowseMode,
    pub loading: bool,
    pub error: Option<String>,
}

impl TreeState {
    pub fn selected_node(&self) -> Option<&MenuNode> {
        self.selected.as_deref().and_then(|id| self.tree.find(id))
    }

    pub fn visible_rows(&self) -> Vec<&MenuNode> {
        self.tree.visible_rows(&self.expanded)
    }
}

/// 哪些节点可以作为新的父节点
#[derive(Clone, Default)]
pub enum ParentPolicy {
    /// 只能挂到根节点下（两层菜单）
    #[default]
    RootsOnly,
    AnyNode,
    Custom(Arc<dyn Fn(&ResourceTree, &str) -> bool + Send + Sync>),
}

impl fmt::Debug for ParentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentPolicy::RootsOnly => write!(f, "RootsOnly"),
            ParentPolicy::AnyNode => write!(f, "AnyNode"),
            ParentPolicy::Custom(_) => write!(f, "Custom"),
        }
    }
}

impl ParentPolicy {
    pub fn from_config(cfg: &TreeConfig) -> Self {
        if cfg.restrict_parent_to_roots { ParentPolicy::RootsOnly } else { ParentPolicy::AnyNode }
    }

    pub fn allows(&self, tree: &ResourceTree, target: &str) -> bool {
        match self {
            ParentPolicy::RootsOnly => tree.is_root(target),
            ParentPolicy::AnyNode => true,
            ParentPolicy::Custom(f) => f(tree, target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Swapped,
    /// 已经在最前/最后，没有发请求
    AtBoundary,
    /// 与相邻节点 sequence 相同，交换不会改变顺序，没有发请求
    SameSequence,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}

/// 资源菜单树：展开/选中/排序/换父节点/删除/恢复
pub struct ResourceTreeController {
    client: Arc<dyn RestClient>,
    state: ArcSwap<TreeState>,
    seq: AtomicU64,
    policy: ParentPolicy,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ResourceTreeController {
    pub fn new(client: Arc<dyn RestClient>, policy: ParentPolicy) -> Self {
        Self {
            client,
            state: ArcSwap::from_pointee(TreeState::default()),
            seq: AtomicU64::new(0),
            policy,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn snapshot(&self) -> Arc<TreeState> {
        self.state.load_full()
    }

    pub fn policy(&self) -> &ParentPolicy {
        &self.policy
    }

    fn update_state(&self, mut f: impl FnMut(&mut TreeState)) {
        self.state.rcu(|current| {
            let mut next = (**current).clone();
            f(&mut next);
            next
        });
    }

    fn notify(&self, notice: Notice) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(notice);
        }
    }

    /// 拉取全量节点重建树，消失的选中/展开节点一并清掉
    pub async fn refresh(&self) -> Result<LoadOutcome, AppError> {
        let seq = self.seq.fetch_add(1, Ordering::AcqRel) + 1;
        let mode = self.state.load().mode;
        self.update_state(|s| s.loading = true);

        let params = WireParams::new().flag("deleted", mode.is_trash());
        let path = format!("{}/all", ResourceMenu::RESOURCE);
        debug!("refresh {} #{} {:?}", path, seq, params.as_pairs());
        let result = match self.client.get(&path, &params).await {
            Ok(resp) => resp.decode::<Vec<ResourceMenu>>().map(ResourceTree::build),
            Err(e) => Err(e),
        };

        let mut applied = false;
        match result {
            Ok(tree) => {
                self.state.rcu(|current| {
                    applied = self.seq.load(Ordering::Acquire) == seq;
                    if !applied {
                        return (**current).clone();
                    }
                    let mut next = (**current).clone();
                    next.selected = next.selected.take().filter(|id| tree.contains(id));
                    next.expanded.retain(|id| tree.contains(id));
                    next.tree = tree.clone();
                    next.loading = false;
                    next.error = None;
                    next
                });
                if !applied {
                    warn!("discard stale tree response #{}", seq);
                    return Ok(LoadOutcome::Superseded);
                }
                Ok(LoadOutcome::Applied)
            }
            Err(e) => {
                let message = e.to_string();
                self.state.rcu(|current| {
                    applied = self.seq.load(Ordering::Acquire) == seq;
                    if !applied {
                        return (**current).clone();
                    }
                    let mut next = (**current).clone();
                    next.loading = false;
                    next.error = Some(message.clone());
                    next
                });
                if !applied {
                    return Ok(LoadOutcome::Superseded);
                }
                error!("refresh resource tree failed: {}", message);
                Err(e)
            }
        }
    }

    async fn reload(&self) {
        if let Err(e) = self.refresh().await {
            warn!("refresh resource tree after mutation failed: {}", e);
        }
    }

    // ==== 界面状态 ====

    /// 选中不存在的节点时返回 false，状态不变
    pub fn select(&self, id: Option<&str>) -> bool {
        let mut accepted = false;
        self.update_state(|s| {
            accepted = id.is_none_or(|id| s.tree.contains(id));
            if accepted {
                s.selected = id.map(str::to_string);
            }
        });
        accepted
    }

    pub fn expand(&self, id: &str) -> bool {
        let mut accepted = false;
        self.update_state(|s| {
            accepted = s.tree.contains(id);
            if accepted {
                s.expanded.insert(id.to_string());
            }
        });
        accepted
    }

    pub fn collapse(&self, id: &str) {
        self.update_state(|s| {
            s.expanded.remove(id);
        });
    }

    /// 返回切换后是否展开
    pub fn toggle_expanded(&self, id: &str) -> bool {
        if self.state.load().expanded.contains(id) {
            self.collapse(id);
            false
        } else {
            self.expand(id)
        }
    }

    /// 切换浏览模式，正在进行的刷新作废；需要调用方随后 refresh
    pub fn set_mode(&self, mode: BrowseMode) -> bool {
        if self.state.load().mode == mode {
            return false;
        }
        self.seq.fetch_add(1, Ordering::AcqRel);
        self.update_state(|s| {
            s.mode = mode;
            s.loading = false;
        });
        true
    }

    // ==== 变更，成功后整树重新拉取 ====

    pub async fn create<P>(&self, payload: &P) -> Result<(), AppError>
    where
        P: Serialize + Validate + Sync,
    {
        payload.validate()?;
        let body = Some(to_body(payload)?);
        let result =
            self.client.post(ResourceMenu::RESOURCE, body).await.and_then(|r| r.into_result());
        self.finish_mutation("create", result.map(|_| ())).await
    }

    pub async fn update<P>(&self, id: &str, payload: &P) -> Result<(), AppError>
    where
        P: Serialize + Validate + Sync,
    {
        self.require_node(id)?;
        payload.validate()?;
        let path = format!("{}/{}", ResourceMenu::RESOURCE, id);
        let body = Some(to_body(payload)?);
        let result = self.client.put(&path, body).await.and_then(|r| r.into_result());
        self.finish_mutation("update", result.map(|_| ())).await
    }

    /// 菜单节点删除不要求填写原因
    pub async fn delete(&self, id: &str, permanent: bool) -> Result<(), AppError> {
        self.require_node(id)?;
        let path = format!("{}/{}", ResourceMenu::RESOURCE, id);
        let body = DeleteRequest::new("", permanent);
        let request = RestRequest::new(HttpMethod::Delete, path).with_body(&body)?;
        let result = self.client.request(request).await.and_then(|r| r.into_result());
        let action = if permanent { "permanent delete" } else { "delete" };
        self.finish_mutation(action, result.map(|_| ())).await
    }

    pub async fn restore(&self, ids: &[String]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Err(AppError::Validation("no nodes selected".into()));
        }
        let path = format!("{}/restore", ResourceMenu::RESOURCE);
        let body = to_body(&RestoreRequest { ids: ids.to_vec() })?;
        let result = self.client.put(&path, Some(body)).await.and_then(|r| r.into_result());
        self.finish_mutation("restore", result.map(|_| ())).await
    }

    async fn finish_mutation(
        &self,
        action: &str,
        result: Result<(), AppError>,
    ) -> Result<(), AppError> {
        match result {
            Ok(()) => {
                info!("{} {} succeeded", action, ResourceMenu::RESOURCE);
                self.notify(Notice::success(format!("{} succeeded", action)));
                self.reload().await;
                Ok(())
            }
            Err(e) => {
                self.notify(Notice::error(e.to_string()));
                Err(e)
            }
        }
    }

    fn require_node(&self, id: &str) -> Result<(), AppError> {
        if self.state.load().tree.contains(id) {
            Ok(())
        } else {
            Err(AppError::NotFound(id.to_string()))
        }
    }

    // ==== 排序 ====

    /// 已删除节点不参与排序
    pub fn can_move_up(&self, id: &str) -> bool {
        movable_neighbor(&self.state.load().tree, id, Direction::Up).is_some()
    }

    pub fn can_move_down(&self, id: &str) -> bool {
        movable_neighbor(&self.state.load().tree, id, Direction::Down).is_some()
    }

    pub async fn move_up(&self, id: &str) -> Result<MoveOutcome, AppError> {
        self.swap_with_neighbor(id, Direction::Up).await
    }

    pub async fn move_down(&self, id: &str) -> Result<MoveOutcome, AppError> {
        self.swap_with_neighbor(id, Direction::Down).await
    }

    /// 与相邻兄弟交换 sequence，一次请求提交两个节点
    async fn swap_with_neighbor(
        &self,
        id: &str,
        direction: Direction,
    ) -> Result<MoveOutcome, AppError> {
        let body = {
            let state = self.state.load();
            let tree = &state.tree;
            let own = tree.sequence_of(id).ok_or_else(|| AppError::NotFound(id.to_string()))?;
            if tree.is_deleted(id) {
                return Err(AppError::Validation("deleted node cannot be moved".into()));
            }
            let Some(neighbor) = movable_neighbor(tree, id, direction) else {
                debug!("{} already at {:?} boundary", id, direction);
                return Ok(MoveOutcome::AtBoundary);
            };
            let other = tree
                .sequence_of(neighbor)
                .ok_or_else(|| AppError::NotFound(neighbor.to_string()))?;
            if other == own {
                warn!("{} and {} share sequence {}, nothing to swap", id, neighbor, own);
                return Ok(MoveOutcome::SameSequence);
            }
            SwapSequenceRequest {
                id: id.to_string(),
                sequence: other,
                target_id: neighbor.to_string(),
                target_sequence: own,
            }
        };

        let path = format!("{}/sequence", ResourceMenu::RESOURCE);
        let body = Some(to_body(&body)?);
        let result = self.client.put(&path, body).await.and_then(|r| r.into_result());
        self.finish_mutation("reorder", result.map(|_| ())).await?;
        Ok(MoveOutcome::Swapped)
    }

    // ==== 换父节点 ====

    fn check_new_parent(&self, id: &str, new_parent_id: &str) -> Result<(), AppError> {
        if id == new_parent_id {
            return Err(AppError::InvalidParent("a node cannot be its own parent".into()));
        }
        let state = self.state.load();
        let tree = &state.tree;
        if !tree.contains(id) {
            return Err(AppError::NotFound(id.to_string()));
        }
        if tree.is_deleted(id) {
            return Err(AppError::Validation(format!("{} is deleted and cannot be moved", id)));
        }
        if !tree.contains(new_parent_id) {
            return Err(AppError::NotFound(new_parent_id.to_string()));
        }
        if tree.is_deleted(new_parent_id) {
            return Err(AppError::InvalidParent(format!("{} is deleted", new_parent_id)));
        }
        if tree.is_descendant(id, new_parent_id) {
            let message = format!("{} is a descendant of {}", new_parent_id, id);
            return Err(AppError::InvalidParent(message));
        }
        if tree.parent_id_of(id) == Some(new_parent_id) {
            return Err(AppError::InvalidParent(format!("{} is already the parent", new_parent_id)));
        }
        if !self.policy.allows(tree, new_parent_id) {
            return Err(AppError::InvalidParent(format!("{} cannot hold children", new_parent_id)));
        }
        Ok(())
    }

    /// 校验失败时不发请求
    pub async fn change_parent(&self, id: &str, new_parent_id: &str) -> Result<(), AppError> {
        self.check_new_parent(id, new_parent_id)?;
        let path = format!("{}/{}/parent", ResourceMenu::RESOURCE, id);
        let body = to_body(&ChangeParentRequest { parent_id: new_parent_id.to_string() })?;
        let result = self.client.put(&path, Some(body)).await.and_then(|r| r.into_result());
        self.finish_mutation("change parent", result.map(|_| ())).await
    }

    /// 节点不存在时返回空列表
    pub fn actions_for(&self, id: &str, caps: &Capabilities) -> Vec<MenuAction> {
        let state = self.state.load();
        let tree = &state.tree;
        if !tree.contains(id) {
            return Vec::new();
        }
        let node = NodeContext {
            is_deleted: tree.is_deleted(id),
            is_root: tree.is_root(id),
            can_move_up: movable_neighbor(tree, id, Direction::Up).is_some(),
            can_move_down: movable_neighbor(tree, id, Direction::Down).is_some(),
        };
        available_actions(&node, caps, state.mode)
    }
}

/// 可交换顺序的相邻兄弟；节点已删除或已在边上时为 None
fn movable_neighbor<'a>(tree: &'a ResourceTree, id: &str, direction: Direction) -> Option<&'a str> {
    if tree.is_deleted(id) {
        return None;
    }
    match direction {
        Direction::Up => tree.previous_sibling(id),
        Direction::Down => tree.next_sibling(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitys::menu_entity::ResourceMenuPayload;
    use crate::mock_client::MockRestClient;
    use common::rest::ApiResponse;
    use serde_json::{json, Value};

    fn node(id: &str, parent: Option<&str>, sequence: f64) -> Value {
        json!({ "id": id, "parentId": parent, "name": id, "key": id, "sequence": sequence })
    }

    /// b(1) -> c(1) -> d(1); a(2); e(3) -> f(1), g(2)
    fn nodes() -> Value {
        json!([
            node("a", None, 2.0),
            node("b", None, 1.0),
            node("c", Some("b"), 1.0),
            node("d", Some("c"), 1.0),
            node("e", None, 3.0),
            node("f", Some("e"), 1.0),
            node("g", Some("e"), 2.0),
        ])
    }

    async fn loaded(policy: ParentPolicy) -> (Arc<MockRestClient>, ResourceTreeController) {
        let mock = Arc::new(MockRestClient::new());
        let ctrl = ResourceTreeController::new(mock.clone(), policy);
        mock.push_ok(nodes());
        assert_eq!(ctrl.refresh().await.unwrap(), LoadOutcome::Applied);
        (mock, ctrl)
    }

    #[tokio::test]
    async fn refresh_builds_tree_from_all_endpoint() {
        let (mock, ctrl) = loaded(ParentPolicy::RootsOnly).await;
        let call = mock.last_call();
        assert_eq!(call.method, HttpMethod::Get);
        assert_eq!(call.path, "/resources/all");
        assert_eq!(call.param("deleted"), None);

        let state = ctrl.snapshot();
        let roots: Vec<_> = state.tree.roots().iter().map(|n| n.id()).collect();
        assert_eq!(roots, vec!["b", "a", "e"]);
        assert_eq!(state.tree.len(), 7);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn trash_mode_requests_deleted_nodes() {
        let mock = Arc::new(MockRestClient::new());
        let ctrl = ResourceTreeController::new(mock.clone(), ParentPolicy::RootsOnly);
        assert!(ctrl.set_mode(BrowseMode::Trash));
        assert!(!ctrl.set_mode(BrowseMode::Trash));
        mock.push_ok(json!([]));
        ctrl.refresh().await.unwrap();
        assert_eq!(mock.last_call().param("deleted"), Some("true"));
    }

    #[tokio::test]
    async fn refresh_drops_vanished_selection_and_expansion() {
        let (mock, ctrl) = loaded(ParentPolicy::RootsOnly).await;
        assert!(ctrl.select(Some("c")));
        assert!(ctrl.expand("b"));
        assert!(ctrl.expand("e"));
        assert!(!ctrl.select(Some("zz")));
        assert_eq!(ctrl.snapshot().selected.as_deref(), Some("c"));

        mock.push_ok(json!([node("a", None, 1.0), node("e", None, 2.0)]));
        ctrl.refresh().await.unwrap();

        let state = ctrl.snapshot();
        assert_eq!(state.selected, None);
        assert_eq!(state.expanded.iter().map(String::as_str).collect::<Vec<_>>(), vec!["e"]);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_tree() {
        let (mock, ctrl) = loaded(ParentPolicy::RootsOnly).await;
        mock.push_err(AppError::Network("timeout".into()));
        assert!(ctrl.refresh().await.is_err());
        let state = ctrl.snapshot();
        assert_eq!(state.tree.len(), 7);
        assert!(state.error.as_deref().unwrap().contains("timeout"));
    }

    #[tokio::test]
    async fn move_at_boundary_sends_nothing() {
        let (mock, ctrl) = loaded(ParentPolicy::RootsOnly).await;
        let before = mock.call_count();
        assert!(!ctrl.can_move_up("b"));
        assert_eq!(ctrl.move_up("b").await.unwrap(), MoveOutcome::AtBoundary);
        assert!(!ctrl.can_move_down("g"));
        assert_eq!(ctrl.move_down("g").await.unwrap(), MoveOutcome::AtBoundary);
        assert_eq!(mock.call_count(), before);
    }

    #[tokio::test]
    async fn move_down_swaps_sequences_in_one_request() {
        let (mock, ctrl) = loaded(ParentPolicy::RootsOnly).await;
        let before = mock.call_count();
        mock.push_empty_ok();
        mock.push_ok(nodes());

        assert_eq!(ctrl.move_down("f").await.unwrap(), MoveOutcome::Swapped);

        let calls = mock.calls();
        assert_eq!(calls.len(), before + 2);
        let swap = &calls[before];
        assert_eq!(swap.method, HttpMethod::Put);
        assert_eq!(swap.path, "/resources/sequence");
        assert_eq!(
            swap.body,
            Some(json!({ "id": "f", "sequence": 2.0, "targetId": "g", "targetSequence": 1.0 }))
        );
        assert_eq!(calls[before + 1].path, "/resources/all");
    }

    #[tokio::test]
    async fn reparent_under_descendant_is_rejected_locally() {
        for policy in [ParentPolicy::RootsOnly, ParentPolicy::AnyNode] {
            let (mock, ctrl) = loaded(policy).await;
            let before = mock.call_count();
            let err = ctrl.change_parent("b", "c").await.unwrap_err();
            assert!(matches!(err, AppError::InvalidParent(_)), "{:?}", err);
            let err = ctrl.change_parent("b", "d").await.unwrap_err();
            assert!(matches!(err, AppError::InvalidParent(_)));
            assert_eq!(mock.call_count(), before);
        }
    }

    #[tokio::test]
    async fn reparent_rejects_self_unknown_and_same_parent() {
        let (mock, ctrl) = loaded(ParentPolicy::AnyNode).await;
        let before = mock.call_count();
        assert!(matches!(ctrl.change_parent("c", "c").await, Err(AppError::InvalidParent(_))));
        assert!(matches!(ctrl.change_parent("c", "nope").await, Err(AppError::NotFound(_))));
        assert!(matches!(ctrl.change_parent("nope", "a").await, Err(AppError::NotFound(_))));
        assert!(matches!(ctrl.change_parent("c", "b").await, Err(AppError::InvalidParent(_))));
        assert_eq!(mock.call_count(), before);
    }

    #[tokio::test]
    async fn roots_only_policy_refuses_child_targets() {
        let (mock, ctrl) = loaded(ParentPolicy::RootsOnly).await;
        let before = mock.call_count();
        assert!(matches!(ctrl.change_parent("f", "c").await, Err(AppError::InvalidParent(_))));
        assert_eq!(mock.call_count(), before);

        mock.push_empty_ok();
        mock.push_ok(nodes());
        ctrl.change_parent("f", "a").await.unwrap();
        let put = &mock.calls()[before];
        assert_eq!(put.path, "/resources/f/parent");
        assert_eq!(put.body, Some(json!({ "parentId": "a" })));
    }

    #[tokio::test]
    async fn any_node_policy_accepts_nested_target() {
        let (mock, ctrl) = loaded(ParentPolicy::AnyNode).await;
        mock.push_empty_ok();
        mock.push_ok(nodes());
        ctrl.change_parent("f", "c").await.unwrap();
        assert_eq!(mock.calls()[mock.call_count() - 2].path, "/resources/f/parent");
    }

    #[tokio::test]
    async fn deleted_target_cannot_become_parent() {
        let mock = Arc::new(MockRestClient::new());
        let ctrl = ResourceTreeController::new(mock.clone(), ParentPolicy::AnyNode);
        let mut gone = node("x", None, 5.0);
        gone["isDeleted"] = json!(true);
        mock.push_ok(json!([node("a", None, 1.0), node("c", Some("a"), 1.0), gone]));
        ctrl.refresh().await.unwrap();
        assert!(matches!(ctrl.change_parent("c", "x").await, Err(AppError::InvalidParent(_))));
        assert!(matches!(ctrl.move_up("x").await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_and_restore_refetch_tree() {
        let (mock, ctrl) = loaded(ParentPolicy::RootsOnly).await;
        let before = mock.call_count();
        mock.push_empty_ok();
        mock.push_ok(nodes());
        ctrl.delete("g", false).await.unwrap();
        let calls = mock.calls();
        assert_eq!(calls[before].method, HttpMethod::Delete);
        assert_eq!(calls[before].path, "/resources/g");
        assert_eq!(calls[before].body, Some(json!({})));
        assert_eq!(calls[before + 1].path, "/resources/all");

        mock.push_empty_ok();
        mock.push_ok(nodes());
        ctrl.restore(&["g".to_string()]).await.unwrap();
        let restore = &mock.calls()[before + 2];
        assert_eq!(restore.path, "/resources/restore");
        assert_eq!(restore.body, Some(json!({ "ids": ["g"] })));

        assert!(matches!(ctrl.delete("missing", true).await, Err(AppError::NotFound(_))));
        assert!(matches!(ctrl.restore(&[]).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn create_validates_before_sending() {
        let (mock, ctrl) = loaded(ParentPolicy::RootsOnly).await;
        let before = mock.call_count();
        let bad = ResourceMenuPayload::default();
        assert!(ctrl.create(&bad).await.unwrap_err().is_validation());
        assert_eq!(mock.call_count(), before);

        let good = ResourceMenuPayload {
            name: "Reports".into(),
            key: "reports".into(),
            parent_id: Some("a".into()),
            ..Default::default()
        };
        mock.push_empty_ok();
        mock.push_ok(nodes());
        ctrl.create(&good).await.unwrap();
        let post = &mock.calls()[before];
        assert_eq!(post.method, HttpMethod::Post);
        assert_eq!(post.path, "/resources");
        assert_eq!(post.body.as_ref().unwrap()["parentId"], json!("a"));
    }

    #[tokio::test]
    async fn actions_follow_node_position_and_mode() {
        let (mock, ctrl) = loaded(ParentPolicy::RootsOnly).await;
        let caps = Capabilities::all();
        assert_eq!(
            ctrl.actions_for("b", &caps),
            vec![
                MenuAction::View,
                MenuAction::Edit,
                MenuAction::AddChild,
                MenuAction::MoveDown,
                MenuAction::Delete
            ]
        );
        assert!(ctrl.actions_for("g", &caps).contains(&MenuAction::ChangeParent));
        assert!(ctrl.actions_for("zz", &caps).is_empty());

        ctrl.set_mode(BrowseMode::Trash);
        mock.push_ok(nodes());
        ctrl.refresh().await.unwrap();
        assert_eq!(ctrl.actions_for("b", &caps), vec![MenuAction::View]);
    }

    #[tokio::test]
    async fn deleted_node_is_neither_movable_nor_reparentable() {
        let mock = Arc::new(MockRestClient::new());
        let ctrl = ResourceTreeController::new(mock.clone(), ParentPolicy::AnyNode);
        let mut gone = node("d", Some("a"), 2.0);
        gone["isDeleted"] = json!(true);
        mock.push_ok(json!([
            node("a", None, 1.0),
            node("b", None, 2.0),
            node("c", Some("a"), 1.0),
            gone
        ]));
        ctrl.refresh().await.unwrap();
        let before = mock.call_count();

        assert!(!ctrl.can_move_up("d"));
        assert!(!ctrl.can_move_down("d"));
        assert!(ctrl.can_move_up("b"));
        assert!(matches!(ctrl.move_up("d").await, Err(AppError::Validation(_))));
        assert!(matches!(ctrl.change_parent("d", "b").await, Err(AppError::Validation(_))));
        assert_eq!(mock.call_count(), before);
    }

    #[tokio::test]
    async fn equal_sequences_are_not_swapped() {
        let mock = Arc::new(MockRestClient::new());
        let ctrl = ResourceTreeController::new(mock.clone(), ParentPolicy::RootsOnly);
        mock.push_ok(json!([node("a", None, 1.0), node("b", None, 1.0)]));
        ctrl.refresh().await.unwrap();
        let before = mock.call_count();
        assert!(ctrl.can_move_down("a"));
        assert_eq!(ctrl.move_down("a").await.unwrap(), MoveOutcome::SameSequence);
        assert_eq!(mock.call_count(), before);
    }

    #[tokio::test]
    async fn older_refresh_is_discarded() {
        let mock = Arc::new(MockRestClient::new());
        let ctrl = Arc::new(ResourceTreeController::new(mock.clone(), ParentPolicy::RootsOnly));
        let gate = mock.push_gated();
        mock.push_ok(json!([node("new", None, 1.0)]));

        let first = {
            let ctrl = ctrl.clone();
            tokio::spawn(async move { ctrl.refresh().await })
        };
        while mock.call_count() < 1 {
            tokio::task::yield_now().await;
        }
        assert_eq!(ctrl.refresh().await.unwrap(), LoadOutcome::Applied);

        gate.send(ApiResponse::ok(json!([node("old", None, 1.0)]))).unwrap();
        assert_eq!(first.await.unwrap().unwrap(), LoadOutcome::Superseded);

        let state = ctrl.snapshot();
        assert!(state.tree.contains("new"));
        assert!(!state.tree.contains("old"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn mode_switch_invalidates_inflight_refresh() {
        let (mock, ctrl) = loaded(ParentPolicy::RootsOnly).await;
        let ctrl = Arc::new(ctrl);
        let gate = mock.push_gated();
        let inflight = {
            let ctrl = ctrl.clone();
            tokio::spawn(async move { ctrl.refresh().await })
        };
        while mock.call_count() < 2 {
            tokio::task::yield_now().await;
        }
        assert!(ctrl.set_mode(BrowseMode::Trash));

        gate.send(ApiResponse::ok(json!([node("stale", None, 1.0)]))).unwrap();
        assert_eq!(inflight.await.unwrap().unwrap(), LoadOutcome::Superseded);

        let state = ctrl.snapshot();
        assert_eq!(state.tree.len(), 7);
        assert!(!state.tree.contains("stale"));
        assert_eq!(state.mode, BrowseMode::Trash);
    }

    #[test]
    fn policy_from_config() {
        let cfg = TreeConfig { restrict_parent_to_roots: false };
        assert!(matches!(ParentPolicy::from_config(&cfg), ParentPolicy::AnyNode));
        let default_policy = ParentPolicy::from_config(&TreeConfig::default());
        assert!(matches!(default_policy, ParentPolicy::RootsOnly));
    }
}

use crate::entitys::Entity;
use crate::notify::{Notice, Notifier};
use arc_swap::ArcSwap;
use common::errors::{AppError, BulkFailure, BulkReport};
use common::query::{PageQuery, PageResult, PageSummary, QueryPatch, WirePage};
use common::rest::{to_body, DeleteRequest, HttpMethod, RestClient, RestRequest, RestoreRequest};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use validator::Validate;

/// 列表页状态快照，界面只读
#[derive(Debug, Clone)]
pub struct PageState<T> {
    pub query: PageQuery,
    pub items: Vec<T>,
    pub total: u64,
    pub loading: bool,
    /// 最近一次加载失败的原因，旧数据仍然保留
    pub error: Option<String>,
    /// 批量操作的选中集合，始终是 items 中 id 的子集
    pub selection: BTreeSet<String>,
}

impl<T: Entity> PageState<T> {
    fn new(query: PageQuery) -> Self {
        Self {
            query,
            items: Vec::new(),
            total: 0,
            loading: false,
            error: None,
            selection: BTreeSet::new(),
        }
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary::new(self.query.page_index, self.query.page_size, self.total)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 响应已写入状态
    Applied,
    /// 期间发起了更新的请求，本次响应被丢弃
    Superseded,
}

/// 通用分页资源控制器：分页/排序/过滤/软删除/恢复/批量操作
pub struct PagedResourceController<T: Entity> {
    client: Arc<dyn RestClient>,
    state: ArcSwap<PageState<T>>,
    /// 单调递增的请求序号，只有最新一次 load 的结果生效
    seq: AtomicU64,
    notifier: Option<Arc<dyn Notifier>>,
}

impl<T: Entity> PagedResourceController<T> {
    pub fn new(client: Arc<dyn RestClient>, page_size: u32) -> Self {
        Self {
            client,
            state: ArcSwap::from_pointee(PageState::new(PageQuery::new(page_size))),
            seq: AtomicU64::new(0),
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn snapshot(&self) -> Arc<PageState<T>> {
        self.state.load_full()
    }

    pub fn query(&self) -> PageQuery {
        self.state.load().query.clone()
    }

    pub fn summary(&self) -> PageSummary {
        self.state.load().summary()
    }

    fn update_state(&self, mut f: impl FnMut(&mut PageState<T>)) {
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

    /// 合并查询条件；条件变化时正在进行的加载作废
    pub fn set_query(&self, patch: QueryPatch) -> Result<bool, AppError> {
        let mut query = self.query();
        let changed = query.apply(patch)?;
        if changed {
            self.seq.fetch_add(1, Ordering::AcqRel);
            self.update_state(|s| {
                s.query = query.clone();
                s.loading = false;
            });
        }
        Ok(changed)
    }

    /// 跳到界面页码（1 开始）
    pub fn set_page(&self, ui_page: i64) -> Result<bool, AppError> {
        self.set_query(QueryPatch::new().page(ui_page))
    }

    /// 按当前查询拉取一页。失败时保留上一页数据，只记录错误
    pub async fn load(&self) -> Result<LoadOutcome, AppError> {
        let seq = self.seq.fetch_add(1, Ordering::AcqRel) + 1;
        let query = self.query();
        self.update_state(|s| s.loading = true);

        let result = self.fetch_page(seq, &query).await;

        let mut applied = false;
        match result {
            Ok(page) => {
                self.state.rcu(|current| {
                    if self.seq.load(Ordering::Acquire) != seq {
                        applied = false;
                        return (**current).clone();
                    }
                    applied = true;
                    let mut next = (**current).clone();
                    let present: HashSet<&str> = page.items.iter().map(|item| item.id()).collect();
                    next.selection.retain(|id| present.contains(id.as_str()));
                    next.items = page.items.clone();
                    next.total = page.total;
                    next.query.page_index = page.page_index;
                    next.query.page_size = page.page_size;
                    next.loading = false;
                    next.error = None;
                    next
                });
                if !applied {
                    warn!("discard stale page response #{} for {}", seq, T::RESOURCE);
                    return Ok(LoadOutcome::Superseded);
                }
                Ok(LoadOutcome::Applied)
            }
            Err(e) => {
                let message = e.to_string();
                self.state.rcu(|current| {
                    if self.seq.load(Ordering::Acquire) != seq {
                        applied = false;
                        return (**current).clone();
                    }
                    applied = true;
                    let mut next = (**current).clone();
                    next.loading = false;
                    next.error = Some(message.clone());
                    next
                });
                if !applied {
                    warn!("discard stale page failure #{} for {}: {}", seq, T::RESOURCE, message);
                    return Ok(LoadOutcome::Superseded);
                }
                error!("load {} failed: {}", T::RESOURCE, message);
                Err(e)
            }
        }
    }

    async fn fetch_page(&self, seq: u64, query: &PageQuery) -> Result<PageResult<T>, AppError> {
        let params = query.to_wire_params();
        debug!("load {} #{} {:?}", T::RESOURCE, seq, params.as_pairs());
        let resp = self.client.get(T::RESOURCE, &params).await?;
        let wire: WirePage<T> = resp.decode()?;
        Ok(wire.into_page(query.page_size))
    }

    /// 变更成功后重新拉取，列表以服务端为准
    async fn reload(&self) {
        if let Err(e) = self.load().await {
            warn!("reload {} after mutation failed: {}", T::RESOURCE, e);
        }
    }

    pub async fn create<P>(&self, payload: &P) -> Result<(), AppError>
    where
        P: Serialize + Validate + Sync,
    {
        payload.validate()?;
        let body = Some(to_body(payload)?);
        let result = self.client.post(T::RESOURCE, body).await.and_then(|r| r.into_result());
        self.finish_mutation("create", result.map(|_| ())).await
    }

    pub async fn update<P>(&self, id: &str, payload: &P) -> Result<(), AppError>
    where
        P: Serialize + Validate + Sync,
    {
        require_id(id)?;
        payload.validate()?;
        let path = format!("{}/{}", T::RESOURCE, id);
        let body = Some(to_body(payload)?);
        let result = self.client.put(&path, body).await.and_then(|r| r.into_result());
        self.finish_mutation("update", result.map(|_| ())).await
    }

    async fn finish_mutation(
        &self,
        action: &str,
        result: Result<(), AppError>,
    ) -> Result<(), AppError> {
        match result {
            Ok(()) => {
                info!("{} {} succeeded", action, T::RESOURCE);
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

    async fn send_delete(&self, id: &str, body: &DeleteRequest) -> Result<(), AppError> {
        require_id(id)?;
        let path = format!("{}/{}", T::RESOURCE, id);
        let request = RestRequest::new(HttpMethod::Delete, path).with_body(body)?;
        self.client.request(request).await?.into_result()?;
        Ok(())
    }

    /// 删除单条记录。非永久删除必须填写原因，校验失败不会发请求
    pub async fn soft_delete(
        &self,
        id: &str,
        reason: &str,
        permanent: bool,
    ) -> Result<(), AppError> {
        let body = DeleteRequest::new(reason, permanent);
        body.validate().map_err(|_| AppError::MissingReason)?;
        match self.send_delete(id, &body).await {
            Ok(()) => {
                self.update_state(|s| {
                    s.selection.remove(id);
                });
                self.finish_mutation("delete", Ok(())).await
            }
            Err(e) => self.finish_mutation("delete", Err(e)).await,
        }
    }

    /// 逐条删除，全部尝试完后统一刷新；有失败时返回 PartialFailure
    pub async fn bulk_delete(
        &self,
        ids: &[String],
        reason: &str,
        permanent: bool,
    ) -> Result<BulkReport, AppError> {
        if ids.is_empty() {
            return Err(AppError::Validation("no records selected".into()));
        }
        let body = DeleteRequest::new(reason, permanent);
        body.validate().map_err(|_| AppError::MissingReason)?;

        let mut seen = HashSet::new();
        let mut report = BulkReport::default();
        for id in ids.iter().filter(|id| seen.insert(id.as_str())) {
            match self.send_delete(id, &body).await {
                Ok(()) => report.succeeded.push(id.clone()),
                Err(e) => {
                    warn!("bulk delete {} {} failed: {}", T::RESOURCE, id, e);
                    report.failed.push(BulkFailure { id: id.clone(), message: e.to_string() });
                }
            }
        }

        self.update_state(|s| {
            for id in &report.succeeded {
                s.selection.remove(id);
            }
        });
        self.reload().await;

        if report.is_complete() {
            self.notify(Notice::success(format!("deleted {} records", report.succeeded.len())));
        } else {
            self.notify(Notice::warn(format!("bulk delete: {}", report)));
        }
        report.into_result()
    }

    pub async fn restore(&self, ids: &[String]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Err(AppError::Validation("no records selected".into()));
        }
        let path = format!("{}/restore", T::RESOURCE);
        let body = to_body(&RestoreRequest { ids: ids.to_vec() })?;
        let result = self.client.put(&path, Some(body)).await.and_then(|r| r.into_result());
        self.finish_mutation("restore", result.map(|_| ())).await
    }

    // ==== 选中集合 ====

    /// 只允许选中当前页上的记录
    pub fn select(&self, id: &str) -> bool {
        let mut selected = false;
        self.update_state(|s| {
            selected = s.contains(id);
            if selected {
                s.selection.insert(id.to_string());
            }
        });
        selected
    }

    pub fn deselect(&self, id: &str) {
        self.update_state(|s| {
            s.selection.remove(id);
        });
    }

    pub fn toggle(&self, id: &str) -> bool {
        if self.state.load().selection.contains(id) {
            self.deselect(id);
            false
        } else {
            self.select(id)
        }
    }

    pub fn select_all(&self) {
        self.update_state(|s| {
            s.selection = s.items.iter().map(|item| item.id().to_string()).collect()
        });
    }

    pub fn clear_selection(&self) {
        self.update_state(|s| s.selection.clear());
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.state.load().selected_ids()
    }
}

fn require_id(id: &str) -> Result<(), AppError> {
    if id.trim().is_empty() { Err(AppError::Validation("id is required".into())) } else { Ok(()) }
}

use crate::errors::AppError;
use crate::query::wire_params::{FilterValue, WireParams};
use std::collections::BTreeMap;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// 分页参数名，实体过滤条件不能占用
pub const RESERVED_PARAMS: [&str; 6] =
    ["pageindex", "pagesize", "sortby", "descending", "keyword", "deleted"];

pub fn is_reserved_param(key: &str) -> bool {
    RESERVED_PARAMS.iter().any(|r| r.eq_ignore_ascii_case(key.trim()))
}

/// 1 开始的界面页码转换为 0 开始的请求页码，小于 1 的一律按第一页处理
pub fn wire_page_index(ui_page: i64) -> u32 {
    ui_page.saturating_sub(1).clamp(0, u32::MAX as i64) as u32
}

/// 列表页记住的查询条件
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    /// 0 开始
    pub page_index: u32,
    pub page_size: u32,
    pub sort_key: Option<String>,
    pub descending: bool,
    pub keyword: Option<String>,
    pub include_deleted: bool,
    pub extra_filters: BTreeMap<String, FilterValue>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort_key: None,
            descending: false,
            keyword: None,
            include_deleted: false,
            extra_filters: BTreeMap::new(),
        }
    }
}

impl PageQuery {
    pub fn new(page_size: u32) -> Self {
        Self { page_size: page_size.max(1), ..Self::default() }
    }

    /// 界面展示用页码（1 开始）
    pub fn ui_page(&self) -> u32 {
        self.page_index.saturating_add(1)
    }

    /// 合并部分查询条件。
    ///
    /// 关键字、排序、删除开关或过滤条件发生变化时页码回到第一页；
    /// 只改页码或每页条数不会影响其它字段。返回值表示查询是否有变化。
    pub fn apply(&mut self, patch: QueryPatch) -> Result<bool, AppError> {
        if patch.page_size == Some(0) {
            return Err(AppError::Validation("page size must be positive".into()));
        }
        if let Some(key) = patch.filters.keys().find(|k| is_reserved_param(k)) {
            let message = format!("filter key `{}` is reserved for paging", key);
            return Err(AppError::Validation(message));
        }

        let mut filter_changed = false;
        if let Some(keyword) = patch.keyword {
            let keyword = normalize_keyword(keyword);
            if keyword != self.keyword {
                self.keyword = keyword;
                filter_changed = true;
            }
        }
        if let Some(sort_key) = patch.sort_key {
            let sort_key = sort_key.filter(|s| !s.trim().is_empty());
            if sort_key != self.sort_key {
                self.sort_key = sort_key;
                filter_changed = true;
            }
        }
        if let Some(descending) = patch.descending {
            if descending != self.descending {
                self.descending = descending;
                filter_changed = true;
            }
        }
        if let Some(include_deleted) = patch.include_deleted {
            if include_deleted != self.include_deleted {
                self.include_deleted = include_deleted;
                filter_changed = true;
            }
        }
        for (key, value) in patch.filters {
            let changed = match value {
                Some(v) => self.extra_filters.insert(key, v.clone()).as_ref() != Some(&v),
                None => self.extra_filters.remove(&key).is_some(),
            };
            filter_changed |= changed;
        }

        let mut changed = filter_changed;
        if let Some(size) = patch.page_size {
            if size != self.page_size {
                self.page_size = size;
                changed = true;
            }
        }
        if filter_changed {
            self.page_index = 0;
        } else if let Some(page) = patch.page {
            let index = wire_page_index(page);
            if index != self.page_index {
                self.page_index = index;
                changed = true;
            }
        }
        Ok(changed)
    }

    /// 生成列表接口的查询参数
    pub fn to_wire_params(&self) -> WireParams {
        let mut params = WireParams::new()
            .put("pageindex", self.page_index)
            .put("pagesize", self.page_size)
            .put_opt("sortby", self.sort_key.as_ref())
            .put("descending", self.descending)
            .put_opt("keyword", self.keyword.as_ref())
            .flag("deleted", self.include_deleted);
        for (key, value) in self.extra_filters.iter().filter(|(k, _)| !is_reserved_param(k)) {
            params = params.put(key, value);
        }
        params
    }
}

fn normalize_keyword(keyword: Option<String>) -> Option<String> {
    keyword.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

/// 部分查询条件，未设置的字段保持原值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPatch {
    /// 界面页码（1 开始）
    pub page: Option<i64>,
    pub page_size: Option<u32>,
    pub sort_key: Option<Option<String>>,
    pub descending: Option<bool>,
    pub keyword: Option<Option<String>>,
    pub include_deleted: Option<bool>,
    /// None 表示移除该过滤条件
    pub filters: BTreeMap<String, Option<FilterValue>>,
}

impl QueryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, ui_page: i64) -> Self {
        self.page = Some(ui_page);
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn sort_by(mut self, key: &str) -> Self {
        self.sort_key = Some(Some(key.to_string()));
        self
    }

    pub fn clear_sort(mut self) -> Self {
        self.sort_key = Some(None);
        self
    }

    pub fn descending(mut self, on: bool) -> Self {
        self.descending = Some(on);
        self
    }

    pub fn keyword(mut self, keyword: &str) -> Self {
        self.keyword = Some(Some(keyword.to_string()));
        self
    }

    pub fn clear_keyword(mut self) -> Self {
        self.keyword = Some(None);
        self
    }

    pub fn include_deleted(mut self, on: bool) -> Self {
        self.include_deleted = Some(on);
        self
    }

    pub fn filter(mut self, key: &str, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(key.to_string(), Some(value.into()));
        self
    }

    pub fn remove_filter(mut self, key: &str) -> Self {
        self.filters.insert(key.to_string(), None);
        self
    }
}

use serde::{Deserialize, Serialize};

/// 列表接口原始返回：{ page, pageSize?, total, items? }，page 从 0 开始
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePage<T> {
    pub page: i64,
    pub page_size: Option<u32>,
    pub total: u64,
    pub items: Option<Vec<T>>,
}

impl<T> WirePage<T> {
    /// 补齐缺省字段；pageSize 缺省时沿用请求的值
    pub fn into_page(self, requested_size: u32) -> PageResult<T> {
        let page_size = self.page_size.filter(|s| *s > 0).unwrap_or(requested_size.max(1));
        let mut items = self.items.unwrap_or_default();
        items.truncate(page_size as usize);
        PageResult {
            page_index: self.page.clamp(0, u32::MAX as i64) as u32,
            page_size,
            total: self.total,
            items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub page_index: u32,
    pub page_size: u32,
    /// 服务端过滤后的总数，与当前页无关
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> PageResult<T> {
    pub fn summary(&self) -> PageSummary {
        PageSummary::new(self.page_index, self.page_size, self.total)
    }
}

/// 分页栏展示信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    /// 1 开始
    pub current_page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PageSummary {
    pub fn new(page_index: u32, page_size: u32, total: u64) -> Self {
        let page_size = page_size.max(1);
        Self {
            current_page: page_index.saturating_add(1),
            page_size,
            total,
            total_pages: total.div_ceil(page_size as u64),
        }
    }

    pub fn has_next(&self) -> bool {
        (self.current_page as u64) < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

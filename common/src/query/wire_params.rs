use serde::{Deserialize, Serialize};
use std::fmt;

/// 列表接口的标量过滤值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(v) => write!(f, "{}", v),
            FilterValue::Int(v) => write!(f, "{}", v),
            FilterValue::Float(v) => write!(f, "{}", v),
            FilterValue::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}
impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}
impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        FilterValue::Int(v as i64)
    }
}
impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Float(v)
    }
}
impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Str(v.to_string())
    }
}
impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Str(v)
    }
}

/// 有序的查询参数，按插入顺序输出，便于日志与测试比对
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireParams {
    pairs: Vec<(String, String)>,
}

impl WireParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.retain(|(k, _)| k != key);
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn put_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.put(key, v),
            None => self,
        }
    }

    /// 仅当条件成立时写入 key=true
    pub fn flag(self, key: &str, on: bool) -> Self {
        if on { self.put(key, true) } else { self }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_replaces_existing_key_and_keeps_order() {
        let params = WireParams::new().put("a", 1).put("b", "x").put("a", 2);
        assert_eq!(
            params.as_pairs(),
            &[("b".to_string(), "x".to_string()), ("a".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn flag_only_written_when_true() {
        let params = WireParams::new().flag("deleted", false);
        assert!(!params.contains("deleted"));
        let params = params.flag("deleted", true);
        assert_eq!(params.get("deleted"), Some("true"));
    }

    #[test]
    fn filter_values_render_as_plain_text() {
        assert_eq!(FilterValue::from("open").to_string(), "open");
        assert_eq!(FilterValue::from(3i64).to_string(), "3");
        assert_eq!(FilterValue::from(true).to_string(), "true");
    }
}

use std::collections::VecDeque;

use serde::Serialize;

pub const RECENT_SEARCH_CAPACITY: usize = 5;

/// 最近搜索列表（最新在前）
///
/// 仅供搜索框回显，不参与过滤。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecentSearches {
    terms: VecDeque<String>,
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// 空白词忽略；重复词移到最前
    pub fn record(&mut self, term: &str) {
        if term.trim().is_empty() {
            return;
        }
        self.terms.retain(|t| t != term);
        self.terms.push_front(term.to_string());
        self.terms.truncate(RECENT_SEARCH_CAPACITY);
    }

    pub fn terms(&self) -> Vec<String> {
        self.terms.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

use serde::Serialize;

use crate::models::{ActorProfile, ComparisonRow};

/// 最多同时对比的演员数
pub const MAX_COMPARE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionChange {
    Added,
    Removed,
    /// 已满 3 个，新的选择被忽略
    Ignored,
}

/// 对比选择集，与搜索条件互不影响
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonSelection {
    ids: Vec<String>,
}

impl ComparisonSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, actor_id: &str) -> SelectionChange {
        if let Some(pos) = self.ids.iter().position(|id| id == actor_id) {
            self.ids.remove(pos);
            return SelectionChange::Removed;
        }
        if self.ids.len() >= MAX_COMPARE {
            return SelectionChange::Ignored;
        }
        self.ids.push(actor_id.to_string());
        SelectionChange::Added
    }

    pub fn contains(&self, actor_id: &str) -> bool {
        self.ids.iter().any(|id| id == actor_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// 至少选中两个才打开对比视图
    pub fn can_compare(&self) -> bool {
        self.ids.len() > 1
    }

    /// 按选择顺序投影候选属性，已不存在的 id 跳过
    pub fn project(&self, candidates: &[ActorProfile]) -> Vec<ComparisonRow> {
        self.ids
            .iter()
            .filter_map(|id| candidates.iter().find(|a| &a.id == id))
            .map(ComparisonRow::from)
            .collect()
    }
}

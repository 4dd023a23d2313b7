//! 演员搜索/过滤/排序引擎
//!
//! 纯函数：相同输入总是得到相同输出，不做任何 I/O。
//! 过滤按顺序执行：自由文本 → 标签维度 → 数值区间，最后做一次稳定排序。

use std::collections::BTreeSet;

use crate::models::{ActorProfile, FilterCriteria, SortKey};

/// 对候选列表应用搜索条件，返回有序结果
///
/// 非法区间（如 `min_price > max_price`）不会报错，只会得到空结果。
pub fn search(candidates: &[ActorProfile], criteria: &FilterCriteria) -> Vec<ActorProfile> {
    let term = criteria.term().map(str::to_lowercase);

    let mut results: Vec<ActorProfile> = candidates
        .iter()
        .filter(|actor| term.as_deref().map_or(true, |t| matches_term(actor, t)))
        .filter(|actor| overlaps(&actor.languages, &criteria.languages))
        .filter(|actor| overlaps(&actor.video_types, &criteria.video_types))
        .filter(|actor| overlaps(&actor.tones, &criteria.tones))
        .filter(|actor| within_bounds(actor, criteria))
        .cloned()
        .collect();

    sort_results(&mut results, criteria.sort_key);
    results
}

/// 名称、简介或任一标签包含关键词（不区分大小写）
fn matches_term(actor: &ActorProfile, term: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(term);

    contains(&actor.name)
        || contains(&actor.tagline)
        || actor.languages.iter().any(|v| contains(v))
        || actor.video_types.iter().any(|v| contains(v))
        || actor.tones.iter().any(|v| contains(v))
}

/// 维度内为 OR：只要有一个值命中即可；空集合不约束
fn overlaps(values: &[String], wanted: &BTreeSet<String>) -> bool {
    wanted.is_empty() || values.iter().any(|v| wanted.contains(v))
}

fn within_bounds(actor: &ActorProfile, criteria: &FilterCriteria) -> bool {
    if let Some(min) = criteria.min_price {
        if actor.base_price < min {
            return false;
        }
    }
    if let Some(max) = criteria.max_price {
        if actor.base_price > max {
            return false;
        }
    }
    if let Some(max_days) = criteria.max_delivery_time {
        if actor.standard_delivery_time > max_days {
            return false;
        }
    }
    true
}

/// `sort_by` 是稳定排序，相等元素保持输入顺序
fn sort_results(results: &mut [ActorProfile], key: SortKey) {
    match key {
        // 保持候选存储顺序
        SortKey::Relevance => {}
        SortKey::RatingDesc => results.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::PriceAsc => results.sort_by(|a, b| a.base_price.total_cmp(&b.base_price)),
        SortKey::PriceDesc => results.sort_by(|a, b| b.base_price.total_cmp(&a.base_price)),
        SortKey::DeliveryAsc => results.sort_by_key(|a| a.standard_delivery_time),
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ActorProfile;

/// 搜索条件，空集合或缺省值表示该维度不做约束
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub free_text_term: Option<String>,
    pub languages: BTreeSet<String>,
    pub video_types: BTreeSet<String>,
    pub tones: BTreeSet<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub max_delivery_time: Option<i32>,
    pub sort_key: SortKey,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Relevance,
    #[serde(alias = "rating")]
    RatingDesc,
    #[serde(alias = "price-low")]
    PriceAsc,
    #[serde(alias = "price-high")]
    PriceDesc,
    #[serde(alias = "delivery-time")]
    DeliveryAsc,
}

/// 可单独移除的过滤维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterDimension {
    Language,
    VideoType,
    Tone,
    MinPrice,
    MaxPrice,
    MaxDeliveryTime,
}

/// 移除单个过滤条件的请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveFilterRequest {
    #[serde(rename = "type")]
    pub dimension: FilterDimension,
    pub value: Option<String>,
}

impl FilterCriteria {
    /// 自由文本为空且无任何过滤维度
    pub fn is_unconstrained(&self) -> bool {
        self.term().is_none()
            && self.languages.is_empty()
            && self.video_types.is_empty()
            && self.tones.is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.max_delivery_time.is_none()
    }

    pub fn term(&self) -> Option<&str> {
        self.free_text_term.as_deref().filter(|t| !t.is_empty())
    }

    pub fn has_active_filters(&self) -> bool {
        !self.languages.is_empty()
            || !self.video_types.is_empty()
            || !self.tones.is_empty()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.max_delivery_time.is_some()
    }

    pub fn remove_filter(&mut self, dimension: FilterDimension, value: Option<&str>) {
        match dimension {
            FilterDimension::Language => remove_tag(&mut self.languages, value),
            FilterDimension::VideoType => remove_tag(&mut self.video_types, value),
            FilterDimension::Tone => remove_tag(&mut self.tones, value),
            FilterDimension::MinPrice => self.min_price = None,
            FilterDimension::MaxPrice => self.max_price = None,
            FilterDimension::MaxDeliveryTime => self.max_delivery_time = None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn remove_tag(tags: &mut BTreeSet<String>, value: Option<&str>) {
    match value {
        Some(value) => {
            tags.remove(value);
        }
        None => tags.clear(),
    }
}

/// 过滤侧边栏可选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub languages: Vec<String>,
    pub video_types: Vec<String>,
    pub tones: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub max_delivery_time: Option<i32>,
}

/// 搜索结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub generation: u64,
    pub total: usize,
    pub results: Vec<ActorProfile>,
}

/// 对比视图中的一行
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub rating: f64,
    pub review_count: i32,
    pub base_price: f64,
    pub standard_delivery_time: i32,
    pub languages: Vec<String>,
    pub video_types: Vec<String>,
    pub tones: Vec<String>,
}

impl From<&ActorProfile> for ComparisonRow {
    fn from(actor: &ActorProfile) -> Self {
        Self {
            id: actor.id.clone(),
            name: actor.name.clone(),
            avatar_url: actor.avatar_url.clone(),
            rating: actor.rating,
            review_count: actor.review_count,
            base_price: actor.base_price,
            standard_delivery_time: actor.standard_delivery_time,
            languages: actor.languages.clone(),
            video_types: actor.video_types.clone(),
            tones: actor.tones.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_aliases() {
        let key: SortKey = serde_json::from_str("\"price-low\"").unwrap();
        assert_eq!(key, SortKey::PriceAsc);
        let key: SortKey = serde_json::from_str("\"rating-desc\"").unwrap();
        assert_eq!(key, SortKey::RatingDesc);
        let key: SortKey = serde_json::from_str("\"delivery-time\"").unwrap();
        assert_eq!(key, SortKey::DeliveryAsc);
    }

    #[test]
    fn test_criteria_defaults_from_empty_json() {
        let criteria: FilterCriteria = serde_json::from_str("{}").unwrap();
        assert!(criteria.is_unconstrained());
        assert_eq!(criteria.sort_key, SortKey::Relevance);
    }

    #[test]
    fn test_remove_filter() {
        let mut criteria: FilterCriteria = serde_json::from_str(
            r#"{"languages": ["English", "Mandarin"], "minPrice": 100, "maxDeliveryTime": 3}"#,
        )
        .unwrap();

        criteria.remove_filter(FilterDimension::Language, Some("English"));
        assert_eq!(criteria.languages.len(), 1);
        criteria.remove_filter(FilterDimension::MinPrice, None);
        assert!(criteria.min_price.is_none());
        assert!(criteria.has_active_filters());

        criteria.reset();
        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn test_empty_term_is_unconstrained() {
        let criteria = FilterCriteria {
            free_text_term: Some(String::new()),
            ..Default::default()
        };
        assert!(criteria.is_unconstrained());
    }
}

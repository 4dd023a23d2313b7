use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{ActorProfile, FilterOptions};

/// 搜索建议中除可选项之外的固定短语
const SUGGESTION_PHRASES: [&str; 7] = [
    "Corporate Spokesperson",
    "Tech Explainer",
    "Product Demonstration",
    "Educational Content",
    "Marketing Video",
    "Training Video",
    "Multilingual Presenter",
];

const MAX_SUGGESTIONS: usize = 5;

/// 候选数据来源（数据库或测试桩）
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// 按存储顺序返回全部演员
    async fn load_candidates(&self) -> Result<Vec<ActorProfile>>;
}

/// 候选演员目录
///
/// 持有一份不可变快照；会话创建时取走快照，之后目录刷新不影响已有会话。
#[derive(Clone, Default)]
pub struct ActorCatalog {
    snapshot: Arc<RwLock<Arc<Vec<ActorProfile>>>>,
}

impl ActorCatalog {
    pub async fn load(source: &dyn CandidateSource) -> Result<Self> {
        let actors = source.load_candidates().await?;
        tracing::info!("Actor catalog loaded with {} candidates", actors.len());
        Ok(Self {
            snapshot: Arc::new(RwLock::new(Arc::new(actors))),
        })
    }

    /// 重新加载快照
    pub async fn reload(&self, source: &dyn CandidateSource) -> Result<usize> {
        let actors = source.load_candidates().await?;
        let count = actors.len();
        *self.snapshot.write().await = Arc::new(actors);
        tracing::debug!("Actor catalog reloaded: {} candidates", count);
        Ok(count)
    }

    pub async fn snapshot(&self) -> Arc<Vec<ActorProfile>> {
        self.snapshot.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.snapshot.read().await.len()
    }

    pub async fn filter_options(&self) -> FilterOptions {
        filter_options(&self.snapshot().await)
    }
}

/// 汇总候选项中的标签与数值范围
pub fn filter_options(candidates: &[ActorProfile]) -> FilterOptions {
    let mut languages = BTreeSet::new();
    let mut video_types = BTreeSet::new();
    let mut tones = BTreeSet::new();

    for actor in candidates {
        languages.extend(actor.languages.iter().cloned());
        video_types.extend(actor.video_types.iter().cloned());
        tones.extend(actor.tones.iter().cloned());
    }

    let prices = candidates.iter().map(|a| a.base_price);

    FilterOptions {
        languages: languages.into_iter().collect(),
        video_types: video_types.into_iter().collect(),
        tones: tones.into_iter().collect(),
        min_price: prices.clone().reduce(f64::min),
        max_price: prices.reduce(f64::max),
        max_delivery_time: candidates.iter().map(|a| a.standard_delivery_time).max(),
    }
}

/// 输入少于两个字符时不给建议
pub fn suggestions(term: &str, options: &FilterOptions) -> Vec<String> {
    if term.chars().count() < 2 {
        return Vec::new();
    }

    let needle = term.to_lowercase();
    let mut seen = BTreeSet::new();

    options
        .languages
        .iter()
        .chain(options.video_types.iter())
        .chain(options.tones.iter())
        .map(String::as_str)
        .chain(SUGGESTION_PHRASES.iter().copied())
        .filter(|option| option.to_lowercase().contains(&needle))
        .filter(|option| seen.insert(*option))
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::search_engine::tests::actor;

    struct FixedSource(Vec<ActorProfile>);

    #[async_trait]
    impl CandidateSource for FixedSource {
        async fn load_candidates(&self) -> Result<Vec<ActorProfile>> {
            Ok(self.0.clone())
        }
    }

    fn candidates() -> Vec<ActorProfile> {
        vec![
            actor("1", "Emma Johnson", 150.0, 4.8, 3, &["English", "Spanish"]),
            actor("2", "Marcus Chen", 175.0, 4.9, 4, &["English", "Mandarin"]),
        ]
    }

    #[test]
    fn test_filter_options() {
        let options = filter_options(&candidates());
        assert_eq!(options.languages, vec!["English", "Mandarin", "Spanish"]);
        assert_eq!(options.min_price, Some(150.0));
        assert_eq!(options.max_price, Some(175.0));
        assert_eq!(options.max_delivery_time, Some(4));
    }

    #[test]
    fn test_filter_options_empty() {
        let options = filter_options(&[]);
        assert!(options.languages.is_empty());
        assert_eq!(options.min_price, None);
    }

    #[test]
    fn test_suggestions() {
        let options = filter_options(&candidates());
        assert!(suggestions("e", &options).is_empty());
        assert_eq!(suggestions("man", &options), vec!["Mandarin"]);
        let hits = suggestions("ex", &options);
        assert_eq!(hits, vec!["Explainer", "Tech Explainer"]);
        assert!(suggestions("e ", &options).len() <= MAX_SUGGESTIONS);
    }

    #[tokio::test]
    async fn test_snapshot_survives_reload() {
        let catalog = ActorCatalog::load(&FixedSource(candidates())).await.unwrap();
        let before = catalog.snapshot().await;

        let mut grown = candidates();
        grown.push(actor("3", "Sophia Rodriguez", 125.0, 4.7, 3, &["Portuguese"]));
        assert_eq!(catalog.reload(&FixedSource(grown)).await.unwrap(), 3);

        assert_eq!(before.len(), 2);
        assert_eq!(catalog.len().await, 3);
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::error::Result;

use super::repository::RepositoryMetadata;
use super::script::VideoScript;

pub const README_EXCERPT_CHARS: usize = 200;
pub const ELLIPSIS: &str = "...";

// Not fetched from GitHub
pub const PLACEHOLDER_COMMIT_COUNT: u64 = 234;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ProjectInsights {
    pub goal: String,
    pub pain_points: Vec<String>,
    pub solution: String,
    pub key_features: Vec<String>,
    pub tech_stack: Vec<String>,
    pub target_audience: String,
    pub market_position: String,
    pub competitive_advantage: String,
    pub complexity_level: String,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RepoStats {
    pub stars: u64,
    pub forks: u64,
    pub contributors: u64,
    pub commits: u64,
    pub languages: BTreeSet<String>,
    pub last_update: String,
    #[serde(alias = "readme")]
    pub readme_excerpt: String,
}

impl RepoStats {
    pub fn from_repository(metadata: &RepositoryMetadata, readme: &str) -> Self {
        Self {
            stars: metadata.stargazers_count,
            forks: metadata.forks_count,
            contributors: metadata.subscribers_count,
            commits: PLACEHOLDER_COMMIT_COUNT,
            languages: metadata.language.iter().cloned().collect(),
            last_update: metadata.last_update(),
            readme_excerpt: readme_excerpt(readme),
        }
    }
}

pub fn readme_excerpt(readme: &str) -> String {
    match readme.char_indices().nth(README_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}{}", &readme[..cut], ELLIPSIS),
        None => readme.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub insights: ProjectInsights,
    #[serde(default)]
    pub stats: RepoStats,
}

// Kept as the model produced it; the proxy only adds `stats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawNarration {
    pub analysis_result: Map<String, Value>,
    pub generated_script: Value,
}

impl RawNarration {
    pub fn with_stats(mut self, stats: &RepoStats) -> Result<Self> {
        self.analysis_result
            .insert("stats".to_string(), serde_json::to_value(stats)?);
        Ok(self)
    }

    pub fn script(&self) -> Option<VideoScript> {
        VideoScript::deserialize(&self.generated_script).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NarrationResponse {
    pub analysis_result: AnalysisResult,
    pub generated_script: VideoScript,
}

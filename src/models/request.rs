use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

pub const DEFAULT_DURATION_SECS: u32 = 90;
pub const MIN_DURATION_SECS: u32 = 30;
pub const MAX_DURATION_SECS: u32 = 180;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalTone {
    #[default]
    Enthusiastic,
    Professional,
    Inspirational,
    Humorous,
    Informative,
}

impl EmotionalTone {
    pub const ALL: [EmotionalTone; 5] = [
        EmotionalTone::Enthusiastic,
        EmotionalTone::Professional,
        EmotionalTone::Inspirational,
        EmotionalTone::Humorous,
        EmotionalTone::Informative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionalTone::Enthusiastic => "enthusiastic",
            EmotionalTone::Professional => "professional",
            EmotionalTone::Inspirational => "inspirational",
            EmotionalTone::Humorous => "humorous",
            EmotionalTone::Informative => "informative",
        }
    }
}

impl std::fmt::Display for EmotionalTone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionalTone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown emotional tone: {}", s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    #[default]
    Dynamic,
    Moderate,
    Steady,
    Slow,
}

impl Pacing {
    pub const ALL: [Pacing; 4] = [Pacing::Dynamic, Pacing::Moderate, Pacing::Steady, Pacing::Slow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pacing::Dynamic => "dynamic",
            Pacing::Moderate => "moderate",
            Pacing::Steady => "steady",
            Pacing::Slow => "slow",
        }
    }
}

impl std::fmt::Display for Pacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pacing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pacing| pacing.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown pacing: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptPreferences {
    pub duration_secs: u32,
    pub emotional_tone: EmotionalTone,
    pub pacing: Pacing,
}

impl ScriptPreferences {
    pub fn new(duration_secs: u32, emotional_tone: EmotionalTone, pacing: Pacing) -> Self {
        Self {
            duration_secs: duration_secs.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS),
            emotional_tone,
            pacing,
        }
    }
}

impl Default for ScriptPreferences {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            emotional_tone: EmotionalTone::default(),
            pacing: Pacing::default(),
        }
    }
}

// Preferences that are missing or unrecognised fall back to their defaults,
// so only the URL can make a request invalid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default, deserialize_with = "lenient_url")]
    pub github_url: Option<String>,
    #[serde(default = "default_duration", deserialize_with = "lenient_duration")]
    pub custom_duration: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub custom_emotional_tone: EmotionalTone,
    #[serde(default, deserialize_with = "lenient")]
    pub custom_pacing: Pacing,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_SECS
}

fn lenient_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(url) => Some(url),
        _ => None,
    })
}

fn lenient_duration<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(secs
        .and_then(|s| u32::try_from(s).ok())
        .unwrap_or(DEFAULT_DURATION_SECS))
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().unwrap_or_default(),
        _ => T::default(),
    })
}

impl AnalysisRequest {
    pub fn new(github_url: impl Into<String>, preferences: ScriptPreferences) -> Self {
        Self {
            github_url: Some(github_url.into()),
            custom_duration: preferences.duration_secs,
            custom_emotional_tone: preferences.emotional_tone,
            custom_pacing: preferences.pacing,
        }
    }

    pub fn preferences(&self) -> ScriptPreferences {
        ScriptPreferences {
            duration_secs: self.custom_duration,
            emotional_tone: self.custom_emotional_tone,
            pacing: self.custom_pacing,
        }
    }
}

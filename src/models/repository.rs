use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryMetadata {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    #[serde(default)]
    pub subscribers_count: u64,
    pub updated_at: DateTime<Utc>,
    pub owner: RepositoryOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryOwner {
    pub login: String,
}

impl RepositoryMetadata {
    pub fn last_update(&self) -> String {
        self.updated_at.format("%-m/%-d/%Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_metadata() {
        let json = r#"{
            "name": "widget",
            "description": null,
            "stargazers_count": 10,
            "forks_count": 2,
            "subscribers_count": 1,
            "updated_at": "2024-01-01T00:00:00Z",
            "owner": {"login": "acme"}
        }"#;
        let metadata: RepositoryMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.description, None);
        assert_eq!(metadata.language, None);
        assert_eq!(metadata.last_update(), "1/1/2024");
    }
}

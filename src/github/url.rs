use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::models::RepositoryRef;

fn repo_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"github\.com/([a-zA-Z0-9_-]+)/([a-zA-Z0-9_-]+)")
            .expect("repository URL pattern is valid")
    })
}

// Unanchored: `https://github.com/acme/widget/tree/main` yields `acme/widget`
pub fn parse_repository_url(url: &str) -> Result<RepositoryRef> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::MissingUrl);
    }

    let captures = repo_url_regex()
        .captures(url)
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;

    Ok(RepositoryRef {
        owner: captures[1].to_string(),
        name: captures[2].to_string(),
    })
}

// src/github/models.rs
// =============================================================================
// Data shapes returned by the GitHub REST API.
//
// Field names on the Rust side describe what the value is; #[serde(rename)]
// maps them onto GitHub's JSON keys. Both structs are immutable snapshots of
// what the API returned at fetch time.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /users/{username}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub avatar_url: String,
    #[serde(rename = "html_url")]
    pub profile_url: String,
    #[serde(rename = "name", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "public_repos")]
    pub public_repo_count: u64,
    #[serde(rename = "followers")]
    pub follower_count: u64,
    #[serde(rename = "following")]
    pub following_count: u64,
}

impl Profile {
    /// Display name, or the login when the user never set one.
    pub fn name_or_login(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.login)
    }
}

/// One entry of `GET /users/{username}/repos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    #[serde(rename = "html_url")]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "language", default)]
    pub primary_language: Option<String>,
    #[serde(rename = "stargazers_count")]
    pub star_count: u64,
    #[serde(rename = "forks_count")]
    pub fork_count: u64,
    #[serde(rename = "updated_at")]
    pub last_updated_at: DateTime<Utc>,
}

/// A user's profile together with all of their repositories.
/// This is what gets cached and what a successful fetch carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileBundle {
    pub profile: Profile,
    pub repositories: Vec<Repository>,
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_deserialize_github_user() {
        let profile: Profile = serde_json::from_value(profile_json("octocat")).unwrap();
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.profile_url, "https://github.com/octocat");
        assert_eq!(profile.display_name.as_deref(), Some("The Octocat"));
        assert_eq!(profile.bio, None);
        assert_eq!(profile.public_repo_count, 8);
        assert_eq!(profile.follower_count, 100);
    }

    #[test]
    fn test_deserialize_github_repo() {
        let repo: Repository = serde_json::from_value(repo_json(15)).unwrap();
        assert_eq!(repo.name, "repo-15");
        assert_eq!(repo.primary_language.as_deref(), Some("Rust"));
        assert_eq!(repo.star_count, 1);
        assert_eq!(repo.fork_count, 0);
        assert_eq!(repo.last_updated_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_name_falls_back_to_login() {
        let mut p = profile("octocat");
        assert_eq!(p.name_or_login(), "octocat");
        p.display_name = Some("Mona".to_string());
        assert_eq!(p.name_or_login(), "Mona");
    }
}

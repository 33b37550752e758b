// src/insight/digest.rs
// =============================================================================
// Compact profile summary sent to the text-generation service.
//
// The digest is: display name (or login), bio, the names of the most-starred
// repositories and the most common primary languages. Only this goes over
// the wire, never the full repository list.
// =============================================================================

use std::collections::HashMap;

use crate::config::{TOP_LANGUAGES, TOP_REPOS};
use crate::github::{ProfileBundle, Repository};

pub const SYSTEM_PROMPT: &str = "You are an expert tech talent analyst. Your goal is to provide a concise, \
insightful summary of a developer's profile based on their GitHub data. You must respond with only a valid \
JSON object that conforms to the provided schema, and nothing else.";

const NO_BIO: &str = "Not provided";

/// The `limit` most-starred repositories, ties in original order.
pub fn top_repos_by_stars(repos: &[Repository], limit: usize) -> Vec<&Repository> {
    let mut sorted: Vec<&Repository> = repos.iter().collect();
    sorted.sort_by(|a, b| b.star_count.cmp(&a.star_count));
    sorted.truncate(limit);
    sorted
}

/// The `limit` most frequent primary languages.
///
/// Repositories without a language are skipped. Equal counts are ordered by
/// first appearance so the digest is deterministic.
pub fn top_languages(repos: &[Repository], limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (index, language) in repos
        .iter()
        .filter_map(|r| r.primary_language.as_deref())
        .enumerate()
    {
        counts.entry(language).or_insert((0, index)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(language, (count, first_seen))| (language, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(language, _, _)| language.to_string())
        .collect()
}

/// Builds the user prompt for one profile.
pub fn build_user_query(bundle: &ProfileBundle) -> String {
    let profile = &bundle.profile;
    let bio = profile
        .bio
        .as_deref()
        .filter(|bio| !bio.trim().is_empty())
        .unwrap_or(NO_BIO);

    let top_repos = top_repos_by_stars(&bundle.repositories, TOP_REPOS)
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let languages = top_languages(&bundle.repositories, TOP_LANGUAGES).join(", ");

    format!(
        "Analyze the developer profile for \"{name}\" (Bio: {bio}). Their top repositories are {top_repos} \
and their primary languages are {languages}. Based on this, provide a \"Developer Insight\" summary. \
Identify their likely area of expertise, key technologies, and potential strengths.",
        name = profile.name_or_login(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fixtures::{profile, repo};

    fn with_language(mut r: Repository, language: Option<&str>) -> Repository {
        r.primary_language = language.map(str::to_string);
        r
    }

    #[test]
    fn test_top_repos_by_stars() {
        let repos: Vec<Repository> = (0..15).map(|i| repo(i, &format!("r{i}"), i * 3 % 11, 0, 1)).collect();
        let top = top_repos_by_stars(&repos, 10);
        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].star_count >= w[1].star_count));
        assert_eq!(top[0].star_count, 10);
    }

    #[test]
    fn test_top_languages_counts_and_skips_missing() {
        let repos = vec![
            with_language(repo(1, "a", 0, 0, 1), Some("Go")),
            with_language(repo(2, "b", 0, 0, 1), Some("Rust")),
            with_language(repo(3, "c", 0, 0, 1), None),
            with_language(repo(4, "d", 0, 0, 1), Some("Rust")),
            with_language(repo(5, "e", 0, 0, 1), Some("Shell")),
        ];
        assert_eq!(top_languages(&repos, 5), vec!["Rust", "Go", "Shell"]);
        assert_eq!(top_languages(&repos, 1), vec!["Rust"]);
        assert!(top_languages(&[], 5).is_empty());
    }

    #[test]
    fn test_user_query_fallbacks() {
        let bundle = ProfileBundle {
            profile: profile("octocat"),
            repositories: vec![
                with_language(repo(1, "linguist", 2, 0, 1), Some("Ruby")),
                with_language(repo(2, "hello-world", 9, 0, 1), Some("Ruby")),
            ],
        };
        let query = build_user_query(&bundle);
        assert!(query.starts_with("Analyze the developer profile for \"octocat\" (Bio: Not provided)."));
        assert!(query.contains("top repositories are hello-world, linguist and"));
        assert!(query.contains("primary languages are Ruby."));
    }

    #[test]
    fn test_user_query_uses_display_name_and_bio() {
        let mut p = profile("octocat");
        p.display_name = Some("The Octocat".to_string());
        p.bio = Some("Mascot".to_string());
        let query = build_user_query(&ProfileBundle { profile: p, repositories: vec![] });
        assert!(query.contains("\"The Octocat\" (Bio: Mascot)"));
    }
}

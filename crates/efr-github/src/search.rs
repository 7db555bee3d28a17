//! Fuzzy repository search

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::org::Repository;

/// Repositories matching `pattern`, best match first.
///
/// Without a pattern every repository is returned sorted by name. Equal
/// scores are ordered by name.
pub fn fuzzy_filter(repos: &[Repository], pattern: Option<&str>) -> Vec<Repository> {
    let pattern = pattern.map(str::trim).filter(|p| !p.is_empty());
    let Some(pattern) = pattern else {
        let mut all = repos.to_vec();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        return all;
    };

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored: Vec<(i64, &Repository)> = repos
        .iter()
        .filter_map(|repo| {
            matcher
                .fuzzy_match(&repo.name, pattern)
                .map(|score| (score, repo))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.name.cmp(&b.1.name)));
    scored.into_iter().map(|(_, repo)| repo.clone()).collect()
}

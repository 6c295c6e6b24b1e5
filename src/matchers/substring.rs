use itertools::Itertools;

use crate::text::fold;
use crate::Matcher;

/// Keeps every candidate whose folded text contains the folded query.
pub struct SubstringMatcher;

impl Matcher for SubstringMatcher {
    fn matches(&self, query: &str, candidates: &[String]) -> Vec<usize> {
        if query.is_empty() {
            return (0..candidates.len()).collect();
        }

        let query = fold(query);

        candidates
            .iter()
            .positions(|candidate| fold(candidate).contains(&query))
            .collect()
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Nodes outside the hovered author's first-observed record cohort are inactive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct GroupHighlight {
    active_group: Option<usize>,
}

impl GroupHighlight {
    pub(in crate::app) fn activate(&mut self, group: usize) {
        self.active_group = Some(group);
    }

    pub(in crate::app) fn clear(&mut self) {
        self.active_group = None;
    }

    pub(in crate::app) fn is_inactive(&self, group: usize) -> bool {
        self.active_group.is_some_and(|active| active != group)
    }
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Render-node indices whose author name fuzzily matches the search box.
///
/// Recomputed only when the trimmed query changes.
#[derive(Default)]
pub(in crate::app) struct SearchMatches {
    query: String,
    matches: Arc<HashSet<usize>>,
}

impl SearchMatches {
    pub(in crate::app) fn refresh<'a>(
        &mut self,
        query: &str,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Arc<HashSet<usize>> {
        let query = query.trim();
        if query == self.query {
            return Arc::clone(&self.matches);
        }

        self.query = query.to_owned();
        self.matches = if query.is_empty() {
            Arc::default()
        } else {
            let matcher = SkimMatcherV2::default();
            Arc::new(
                names
                    .into_iter()
                    .enumerate()
                    .filter(|(_, name)| fuzzy_match_score(&matcher, name, query).is_some())
                    .map(|(index, _)| index)
                    .collect(),
            )
        };
        tracing::debug!(query, matches = self.matches.len(), "author search updated");
        Arc::clone(&self.matches)
    }
}

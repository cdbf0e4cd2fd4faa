//! Fuzzy-suggestion lookup and disambiguation.
//!
//! The resolver only fetches; it never picks a match on the user's behalf. When the service
//! returns at least one match, a [`Disambiguation`] is opened listing every match in service
//! order followed by a "keep original" choice.

use crate::api::{ApiError, InventoryApi};
use crate::transcript::ParsedCandidate;
use medtrack_wire::SuggestionItem;

/// The suggestion service could not be reached or answered garbage.
#[derive(Debug, thiserror::Error)]
#[error("could not fetch suggestions for {query:?}: {source}")]
pub struct SuggestionFetchFailed {
    pub query: String,
    #[source]
    pub source: ApiError,
}

/// Fetches fuzzy matches for a candidate name.
pub struct SuggestionResolver<'a, A: ?Sized> {
    api: &'a A,
}

impl<'a, A> SuggestionResolver<'a, A>
where
    A: InventoryApi + ?Sized,
{
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Look up matches for `candidate_name`.
    ///
    /// The list is returned exactly as the service ordered it, duplicates included.
    pub async fn resolve(
        &self,
        candidate_name: &str,
    ) -> Result<Vec<SuggestionItem>, SuggestionFetchFailed> {
        tracing::debug!(query = candidate_name, "fetching suggestions");
        self.api
            .suggest(candidate_name)
            .await
            .map_err(|source| SuggestionFetchFailed {
                query: candidate_name.to_owned(),
                source,
            })
    }
}

/// One entry of the presented choice set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice<'a> {
    Suggestion(&'a SuggestionItem),
    KeepOriginal(&'a str),
}

impl Choice<'_> {
    /// The medicine name this choice puts into the draft.
    pub fn name(&self) -> &str {
        match self {
            Choice::Suggestion(item) => &item.name,
            Choice::KeepOriginal(name) => name,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Choice::Suggestion(item) => item.name.clone(),
            Choice::KeepOriginal(name) => format!("Keep original: \"{name}\""),
        }
    }
}

/// An open "did you mean" session.
///
/// Can only be constructed with at least one suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Disambiguation {
    suggestions: Vec<SuggestionItem>,
    original_name: String,
    original_quantity: Option<String>,
}

impl Disambiguation {
    /// Open a session for `candidate`, or `None` when there is nothing to choose from.
    pub fn open(suggestions: Vec<SuggestionItem>, candidate: &ParsedCandidate) -> Option<Self> {
        if suggestions.is_empty() {
            return None;
        }
        Some(Self {
            suggestions,
            original_name: candidate.name.clone(),
            original_quantity: candidate.quantity.clone(),
        })
    }

    pub fn suggestions(&self) -> &[SuggestionItem] {
        &self.suggestions
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn original_quantity(&self) -> Option<&str> {
        self.original_quantity.as_deref()
    }

    /// Every suggestion in order, then "keep original".
    pub fn choices(&self) -> Vec<Choice<'_>> {
        self.suggestions
            .iter()
            .map(Choice::Suggestion)
            .chain(std::iter::once(Choice::KeepOriginal(&self.original_name)))
            .collect()
    }

    pub fn choice_count(&self) -> usize {
        self.suggestions.len() + 1
    }

    /// Usage text for the choice at `index`, or `None` if out of range.
    pub fn compose(&self, index: usize) -> Option<String> {
        let name = match self.suggestions.get(index) {
            Some(item) => item.name.as_str(),
            None if index == self.suggestions.len() => self.original_name.as_str(),
            None => return None,
        };
        Some(compose_usage_text(name, self.original_quantity()))
    }
}

/// Join a name and optional quantity into the backend's `"<name> <quantity>"` form.
pub fn compose_usage_text(name: &str, quantity: Option<&str>) -> String {
    match quantity {
        Some(q) if !q.is_empty() => format!("{name} {q}"),
        _ => name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeInventory;
    use crate::transcript::parse;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn resolve_passes_service_order_through() {
        let api = FakeInventory::with_suggestions("lidocane", &["lignocaine", "lidocaine", "lignocaine"]);
        let items = SuggestionResolver::new(&api)
            .resolve("lidocane")
            .await
            .expect("resolve");
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["lignocaine", "lidocaine", "lignocaine"]);
    }

    #[tokio::test]
    async fn resolve_is_idempotent() {
        let api = FakeInventory::with_suggestions("betadin", &["betadine", "betamethasone"]);
        let resolver = SuggestionResolver::new(&api);
        let first = resolver.resolve("betadin").await.expect("first");
        let second = resolver.resolve("betadin").await.expect("second");
        assert_eq!(first, second);
        assert_eq!(api.suggest_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn resolve_reports_fetch_failure() {
        let api = FakeInventory::default();
        api.fail_suggestions.store(true, Ordering::SeqCst);
        let err = SuggestionResolver::new(&api)
            .resolve("saline")
            .await
            .expect_err("should fail");
        assert_eq!(err.query, "saline");
        assert!(matches!(err.source, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn resolve_unknown_name_is_empty() {
        let api = FakeInventory::default();
        let items = SuggestionResolver::new(&api).resolve("zzz").await.expect("resolve");
        assert!(items.is_empty());
    }

    #[test]
    fn disambiguation_requires_suggestions() {
        assert!(Disambiguation::open(vec![], &parse("betadin 5")).is_none());
    }

    #[test]
    fn choices_end_with_keep_original() {
        let items = vec![SuggestionItem {
            id: 0,
            name: "betadine".into(),
        }];
        let session = Disambiguation::open(items, &parse("Betadin, 5")).expect("open");
        let labels: Vec<_> = session.choices().iter().map(Choice::label).collect();
        assert_eq!(labels, ["betadine", "Keep original: \"betadin\""]);
        assert_eq!(session.choice_count(), 2);
    }

    #[test]
    fn compose_recombines_quantity() {
        let items = vec![
            SuggestionItem {
                id: 0,
                name: "betadine".into(),
            },
            SuggestionItem {
                id: 1,
                name: "betamethasone".into(),
            },
        ];
        let candidate = parse("betadin 2.5");
        let session = Disambiguation::open(items, &candidate).expect("open");
        assert_eq!(session.compose(1).as_deref(), Some("betamethasone 2.5"));
        assert_eq!(
            session.compose(2),
            Some(compose_usage_text(&candidate.name, candidate.quantity.as_deref()))
        );
        assert_eq!(session.compose(3), None);
    }

    #[test]
    fn compose_without_quantity_is_just_the_name() {
        assert_eq!(compose_usage_text("lidocaine", None), "lidocaine");
        assert_eq!(compose_usage_text("lidocaine", Some("10")), "lidocaine 10");
    }
}

//! Disambiguation strategies.
//!
//! When a query matches more than one movie, the service hands the matches
//! to a `SelectionStrategy` and proceeds with whatever it picks. The service
//! owns its strategy (it is injected at construction), so nothing in the
//! business logic reaches for a global prompt.

use catalog::Entry;

/// Outcome of asking a strategy to pick one of several matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the matches that were offered
    Chosen(usize),
    /// A choice was attempted but the answer was unusable
    Cancelled,
    /// The strategy does not choose; the ambiguity is reported as an error
    Declined,
}

/// Core trait for resolving an ambiguous query to one entry.
///
/// ## Design Note
/// - Implementations may block (an interactive prompt does)
/// - Returning an index rather than an entry keeps the strategy from
///   smuggling in an entry that was not offered
pub trait SelectionStrategy {
    /// Returns the name of this strategy (for logging/debugging)
    fn name(&self) -> &str;

    /// Pick one of `matches` for `query`.
    ///
    /// # Arguments
    /// * `query` - The trimmed query the user typed
    /// * `matches` - Two or more entries, in catalog enumeration order
    fn choose_one(&mut self, query: &str, matches: &[&Entry]) -> Selection;
}

/// Never picks; every ambiguous query becomes an `Ambiguous` error
///
/// This is the only behaviour allowed when no human is available to ask.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSelection;

impl SelectionStrategy for HeadlessSelection {
    fn name(&self) -> &str {
        "HeadlessSelection"
    }

    fn choose_one(&mut self, _query: &str, _matches: &[&Entry]) -> Selection {
        Selection::Declined
    }
}

impl<S: SelectionStrategy + ?Sized> SelectionStrategy for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn choose_one(&mut self, query: &str, matches: &[&Entry]) -> Selection {
        (**self).choose_one(query, matches)
    }
}

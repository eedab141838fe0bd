//! Ordered first-match dispatch over tag sets.
//!
//! Retailer routing and suggestion-card accent styling both pick one value
//! from a small closed set by scanning tags against an ordered rule list.
//! Both go through this helper so the dispatch semantics cannot drift apart.

/// One rule: matches when any of `tags` appears in the probed tag set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorityRule<T> {
    pub value: T,
    pub tags: Vec<String>,
}

impl<T> PriorityRule<T> {
    pub fn new(value: T, tags: &[&str]) -> Self {
        Self { value, tags: tags.iter().map(|tag| tag.to_ascii_lowercase()).collect() }
    }
}

/// Returns the value of the first rule whose tag set intersects `tags`,
/// or `default` when no rule fires. Comparison is case-insensitive; rule
/// order is the priority order.
pub fn first_match<T: Copy>(tags: &[String], rules: &[PriorityRule<T>], default: T) -> T {
    let lowered: Vec<String> = tags.iter().map(|tag| tag.to_ascii_lowercase()).collect();

    rules
        .iter()
        .find(|rule| rule.tags.iter().any(|tag| lowered.iter().any(|probe| probe == tag)))
        .map(|rule| rule.value)
        .unwrap_or(default)
}

//! Token matching of video titles against a filter query.

/// Split a query into lower-cased, non-empty whitespace tokens.
pub fn tokens(query: &str) -> Vec<String> {
  query.split_whitespace().map(str::to_lowercase).collect()
}

/// Check whether `title` satisfies every token of `query`.
///
/// An empty or whitespace-only query matches everything. Otherwise each token
/// must appear as a case-insensitive substring somewhere in the title; token
/// order does not matter and the title itself is not tokenized.
pub fn matches(title: &str, query: &str) -> bool {
  let tokens = tokens(query);
  if tokens.is_empty() {
    return true;
  }
  let haystack = title.to_lowercase();
  tokens.iter().all(|t| haystack.contains(t.as_str()))
}

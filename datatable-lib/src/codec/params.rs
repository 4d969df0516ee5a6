//! Query parameter maps and URL rewriting.

use std::collections::HashMap;

use url::Url;
use url::form_urlencoded;

/// A string-to-string view of a URL query.
///
/// When a key repeats, the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the query of a URL.
    pub fn from_url(url: &Url) -> Self {
        url.query_pairs().collect()
    }

    /// Parses a raw `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes()).collect()
    }

    /// Returns the value of a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Sets a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Returns `true` if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = HashMap::new();
        for (k, v) in iter {
            params.entry(k.into()).or_insert_with(|| v.into());
        }
        Self { params }
    }
}

/// A set of query parameter changes: `Some` sets a value, `None` deletes
/// the parameter.
///
/// Produced by [`encode`](super::encode). Entries keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryUpdate {
    entries: Vec<(String, Option<String>)>,
}

impl QueryUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `key` should be set to `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.put(key.into(), Some(value.into()));
    }

    /// Records that `key` should be deleted.
    pub fn remove(&mut self, key: impl Into<String>) {
        self.put(key.into(), None);
    }

    fn put(&mut self, key: String, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the change recorded for `key`: `Some(Some(v))` to set,
    /// `Some(None)` to delete, `None` if untouched.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Iterates over the recorded changes in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Returns the parameters this update sets, ignoring deletions.
    pub fn to_params(&self) -> QueryParams {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.clone(), v.clone())))
            .collect()
    }

    /// Applies the update to a URL.
    ///
    /// Parameters the update does not mention are preserved in place. A set
    /// key replaces its first occurrence and drops any repeats; a new key
    /// is appended. Deleted keys are removed entirely.
    pub fn apply_to(&self, url: &Url) -> Url {
        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        for (key, value) in &self.entries {
            match value {
                Some(value) => {
                    let mut seen = false;
                    pairs.retain_mut(|(k, v)| {
                        if k != key {
                            return true;
                        }
                        if seen {
                            return false;
                        }
                        seen = true;
                        v.clone_from(value);
                        true
                    });
                    if !seen {
                        pairs.push((key.clone(), value.clone()));
                    }
                }
                None => pairs.retain(|(k, _)| k != key),
            }
        }

        let mut out = url.clone();
        if pairs.is_empty() {
            out.set_query(None);
        } else {
            out.query_pairs_mut().clear().extend_pairs(pairs);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let params = QueryParams::from_query("?page=2&page=3&sort=title.asc");
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("sort"), Some("title.asc"));
        assert_eq!(params.get("filters"), None);
    }

    #[test]
    fn test_apply_preserves_unrelated_params() {
        let url = Url::parse("https://example.com/tasks?tab=open&page=1&sort=title.asc&page=9").unwrap();
        let mut update = QueryUpdate::new();
        update.set("page", "3");
        update.remove("sort");
        update.set("perPage", "20");

        let out = update.apply_to(&url);
        let pairs: Vec<(String, String)> = out.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("tab".to_string(), "open".to_string()),
                ("page".to_string(), "3".to_string()),
                ("perPage".to_string(), "20".to_string()),
            ]
        );
        assert_eq!(out.path(), "/tasks");
    }

    #[test]
    fn test_apply_removing_everything_drops_query() {
        let url = Url::parse("https://example.com/?sort=title.asc").unwrap();
        let mut update = QueryUpdate::new();
        update.remove("sort");
        assert_eq!(update.apply_to(&url).as_str(), "https://example.com/");
    }

    #[test]
    fn test_later_change_overrides_earlier() {
        let mut update = QueryUpdate::new();
        update.set("sort", "a.asc");
        update.remove("sort");
        assert_eq!(update.get("sort"), Some(None));
        assert_eq!(update.iter().count(), 1);
    }
}

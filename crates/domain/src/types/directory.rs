//! Directory enumeration and hydration types

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of the follower listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPage {
    pub items: Vec<String>,
    pub total_count: usize,
    /// Cursor for the next page. `None` when the server sent none or an empty one.
    pub next_cursor: Option<String>,
}

/// `/cgi-bin/user/get` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListResponse {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub data: Option<UserListData>,
    #[serde(default)]
    pub next_openid: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListData {
    #[serde(default)]
    pub openid: Vec<String>,
}

impl From<UserListResponse> for DirectoryPage {
    fn from(response: UserListResponse) -> Self {
        Self {
            items: response.data.map(|data| data.openid).unwrap_or_default(),
            total_count: response.total,
            next_cursor: response.next_openid.filter(|cursor| !cursor.is_empty()),
        }
    }
}

/// Deduplicated result of one full enumeration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorySnapshot {
    total_count: usize,
    identifiers: Vec<String>,
}

impl DirectorySnapshot {
    /// Build a snapshot, dropping repeated identifiers (first occurrence wins).
    pub fn new(total_count: usize, identifiers: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let identifiers =
            identifiers.into_iter().filter(|id| seen.insert(id.clone())).collect::<Vec<_>>();
        Self { total_count, identifiers }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self { total_count: 0, identifiers: Vec::new() }
    }

    /// Total reported by the server, which may exceed the deduplicated size.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    #[must_use]
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.iter().any(|id| id == identifier)
    }

    /// Ordered, non-overlapping batches of at most `size` identifiers.
    pub fn batches(&self, size: usize) -> impl Iterator<Item = &[String]> {
        self.identifiers.chunks(size.max(1))
    }
}

/// Profile record returned by the hydration endpoint; passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(pub Value);

impl UserRecord {
    #[must_use]
    pub fn openid(&self) -> Option<&str> {
        self.0.get("openid").and_then(Value::as_str)
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Final output of a full synchronization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub records: Vec<UserRecord>,
    pub count: usize,
    pub elapsed_millis: u64,
}

impl AggregationResult {
    #[must_use]
    pub fn new(records: Vec<UserRecord>, elapsed_millis: u64) -> Self {
        let count = records.len();
        Self { records, count, elapsed_millis }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn snapshot_keeps_first_occurrence_order() {
        let ids = ["a", "b", "a", "c", "b"].into_iter().map(String::from);
        let snapshot = DirectorySnapshot::new(5, ids);
        assert_eq!(snapshot.identifiers(), ["a", "b", "c"]);
        assert_eq!(snapshot.total_count(), 5);
        assert!(snapshot.contains("c"));
        assert!(!snapshot.contains("d"));
    }

    #[test]
    fn batches_cover_every_identifier_once() {
        let ids = (0..250).map(|i| format!("id-{i}"));
        let snapshot = DirectorySnapshot::new(250, ids);
        let sizes: Vec<usize> = snapshot.batches(100).map(<[String]>::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
    }

    #[test]
    fn empty_listing_page_has_no_cursor() {
        let response: UserListResponse =
            serde_json::from_value(json!({"total": 0, "count": 0, "next_openid": ""})).unwrap();
        let page = DirectoryPage::from(response);
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn aggregation_count_matches_records() {
        let records = vec![UserRecord(json!({"openid": "a"})), UserRecord(json!({"openid": "b"}))];
        let result = AggregationResult::new(records, 12);
        assert_eq!(result.count, 2);
        assert_eq!(result.records[1].openid(), Some("b"));
    }
}

//! Integration tests for the follower listing model through the crate root.

use serde_json::json;
use wxkit_domain::{DirectoryPage, DirectorySnapshot, UserListData, UserListResponse};

#[test]
fn listing_response_converts_into_page() {
    let response: UserListResponse = serde_json::from_value(json!({
        "total": 3,
        "count": 2,
        "data": {"openid": ["o1", "o2"]},
        "next_openid": "o2"
    }))
    .unwrap();

    let page = DirectoryPage::from(response);
    assert_eq!(page.items, ["o1", "o2"]);
    assert_eq!(page.total_count, 3);
    assert_eq!(page.next_cursor.as_deref(), Some("o2"));
}

#[test]
fn listing_built_by_hand_feeds_a_snapshot() {
    let response = UserListResponse {
        total: 2,
        count: 2,
        data: Some(UserListData { openid: vec!["o1".into(), "o1".into(), "o2".into()] }),
        next_openid: None,
    };

    let page = DirectoryPage::from(response);
    assert_eq!(page.next_cursor, None);

    let snapshot = DirectorySnapshot::new(page.total_count, page.items);
    assert_eq!(snapshot.identifiers(), ["o1", "o2"]);
}

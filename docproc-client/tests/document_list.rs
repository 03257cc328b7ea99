mod common;

use common::{documents, envelope, tag_json, QueryParamAbsent, TestBackend};
use docproc_client::config::PaginationSettings;
use docproc_client::models::PageRequest;
use docproc_client::sync::{LoadOutcome, Refreshable};
use docproc_client::views::DocumentList;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn mount_filter_options(backend: &TestBackend, names: &[&str]) {
    let tags: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, n)| tag_json(i as i64 + 1, n))
        .collect();
    let total = tags.len() as u64;
    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(tags, 0, 1000, total)))
        .mount(&backend.server)
        .await;
}

fn list(backend: &TestBackend) -> DocumentList {
    DocumentList::new(backend.api(), &PaginationSettings::default())
}

#[tokio::test]
async fn next_page_advances_by_limit_and_enables_prev() {
    let backend = TestBackend::start().await;
    mount_filter_options(&backend, &[]).await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(query_param("skip", "0"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(documents(1..6), 0, 5, 12)))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(query_param("skip", "5"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(documents(6..11), 5, 5, 12)))
        .expect(1)
        .mount(&backend.server)
        .await;

    let list = list(&backend);
    list.mount().await;

    let first = list.snapshot();
    assert_eq!(first.items.len(), 5);
    assert!(first.window.has_next);
    assert!(!first.window.has_prev);

    assert_eq!(list.next_page().await, LoadOutcome::Applied);

    let second = list.snapshot();
    assert_eq!(second.window.skip, 5);
    assert!(second.window.has_prev);
    assert!(second.window.has_next);
    assert_eq!(second.items[0].id, 6);
}

#[tokio::test]
async fn last_page_disables_next() {
    let backend = TestBackend::start().await;
    mount_filter_options(&backend, &[]).await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(query_param("skip", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(documents(11..13), 10, 5, 12)))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(query_param("skip", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(documents(6..11), 5, 5, 12)))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(documents(1..6), 0, 5, 12)))
        .mount(&backend.server)
        .await;

    let list = list(&backend);
    list.mount().await;
    list.next_page().await;
    list.next_page().await;

    let last = list.snapshot();
    assert_eq!(last.window.skip, 10);
    assert!(!last.window.has_next);
    assert_eq!(list.next_page().await, LoadOutcome::Skipped);
}

#[tokio::test]
async fn changing_filter_returns_to_first_page() {
    let backend = TestBackend::start().await;
    mount_filter_options(&backend, &["finance"]).await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(query_param("tag", "finance"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(documents(1..3), 0, 5, 2)))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(QueryParamAbsent("tag"))
        .and(query_param("skip", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(documents(6..11), 5, 5, 12)))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(QueryParamAbsent("tag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(documents(1..6), 0, 5, 12)))
        .mount(&backend.server)
        .await;

    let list = list(&backend);
    list.mount().await;
    list.next_page().await;
    assert_eq!(list.snapshot().window.skip, 5);

    list.toggle_tag(Some("finance")).await;

    assert_eq!(list.selected_tag(), Some("finance".to_string()));
    assert_eq!(list.pending_request(), PageRequest { skip: 0, limit: 5 });
    assert_eq!(list.snapshot().items.len(), 2);
    assert_eq!(list.empty_message(), "No documents found with tag \"finance\"");

    list.toggle_tag(Some("finance")).await;
    assert_eq!(list.selected_tag(), None);
}

#[tokio::test]
async fn slower_earlier_filter_never_overwrites_later_one() {
    let backend = TestBackend::start().await;
    mount_filter_options(&backend, &["slow", "fast"]).await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(query_param("tag", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(documents(100..103), 0, 5, 3))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(query_param("tag", "fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(documents(200..201), 0, 5, 1)))
        .mount(&backend.server)
        .await;

    let list = list(&backend);
    let (slow, fast) = tokio::join!(
        list.set_filter(Some("slow".to_string())),
        list.set_filter(Some("fast".to_string()))
    );

    assert_eq!(slow, LoadOutcome::Stale);
    assert_eq!(fast, LoadOutcome::Applied);
    let snapshot = list.snapshot();
    assert_eq!(snapshot.filter.as_deref(), Some("fast"));
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].id, 200);
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn failed_reload_keeps_last_good_page() {
    let backend = TestBackend::start().await;
    mount_filter_options(&backend, &[]).await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(documents(1..4), 0, 5, 3)))
        .up_to_n_times(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&backend.server)
        .await;

    let list = list(&backend);
    list.mount().await;
    list.refresh().await;

    let snapshot = list.snapshot();
    assert_eq!(snapshot.items.len(), 3);
    assert_eq!(
        snapshot.error.as_deref(),
        Some("Request failed: Service Unavailable")
    );
}

#[tokio::test]
async fn removed_filter_tag_resets_to_unfiltered_first_page() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            vec![tag_json(1, "finance"), tag_json(2, "legal")],
            0,
            1000,
            2,
        )))
        .up_to_n_times(1)
        .mount(&backend.server)
        .await;
    mount_filter_options(&backend, &["legal"]).await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(query_param("tag", "finance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(documents(1..2), 0, 5, 1)))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(QueryParamAbsent("tag"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(documents(1..6), 0, 5, 9)))
        .mount(&backend.server)
        .await;

    let list = list(&backend);
    list.mount().await;
    list.set_filter(Some("finance".to_string())).await;
    assert_eq!(list.available_tags().len(), 2);

    list.refresh_tags().await;

    assert_eq!(list.selected_tag(), None);
    let snapshot = list.snapshot();
    assert_eq!(snapshot.window.skip, 0);
    assert_eq!(snapshot.window.total, 9);
    assert_eq!(list.available_tags().len(), 1);
}

#[tokio::test]
async fn filter_match_is_case_sensitive() {
    let backend = TestBackend::start().await;
    mount_filter_options(&backend, &["Finance"]).await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![], 0, 5, 0)))
        .mount(&backend.server)
        .await;

    let list = list(&backend);
    list.mount().await;
    list.set_filter(Some("finance".to_string())).await;
    list.refresh_tags().await;

    assert_eq!(list.selected_tag(), None);
    assert_eq!(
        list.empty_message(),
        "No documents uploaded yet. Upload a PDF to get started."
    );
}

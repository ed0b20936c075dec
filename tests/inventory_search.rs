mod common;

use std::time::Duration;

use activity_tracker::inventory::FETCH_RESULTS_FAILED;
use activity_tracker::{ClientConfig, InventorySearch, InventorySearchClient, SearchParams};

async fn search() -> (InventorySearch, common::RequestLog) {
    common::init_tracing();
    let (base, log) = common::inventory_server().await;
    let client = InventorySearchClient::new(ClientConfig::new(base)).unwrap();
    (InventorySearch::new(client), log)
}

fn names(search: &InventorySearch) -> Vec<String> {
    search.state().results.into_iter().map(|i| i.name).collect()
}

#[tokio::test]
async fn client_passes_query_and_filters() {
    common::init_tracing();
    let (base, log) = common::inventory_server().await;
    let client = InventorySearchClient::new(ClientConfig::new(base)).unwrap();

    let results = client
        .search(&SearchParams {
            q: "shirt".to_string(),
            category: Some("Apparel".to_string()),
            stock_status: Some("InStock".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Dress Shirt");

    let seen = log.lock().unwrap()[0].clone();
    assert_eq!(seen.get("q").map(String::as_str), Some("shirt"));
    assert_eq!(seen.get("category").map(String::as_str), Some("Apparel"));
    assert_eq!(seen.get("stockStatus").map(String::as_str), Some("InStock"));
}

#[tokio::test]
async fn mount_loads_everything() {
    let (mut search, log) = search().await;

    search.mount();
    assert!(search.state().loading);
    search.settle().await;

    let state = search.state();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.results.len(), 5);
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn query_without_filters_returns_server_matches() {
    let (mut search, log) = search().await;

    search.set_query("shirt");
    search.settle().await;

    assert_eq!(names(&search), vec!["T-Shirt", "Dress Shirt", "Shirt Printer"]);
    let seen = log.lock().unwrap()[0].clone();
    assert!(!seen.contains_key("category"));
    assert!(!seen.contains_key("stockStatus"));
}

#[tokio::test]
async fn changing_category_issues_exactly_one_request() {
    let (mut search, log) = search().await;

    search.set_query("shirt");
    search.settle().await;
    assert_eq!(log.lock().unwrap().len(), 1);

    search.set_category(Some("Apparel".to_string()));
    search.settle().await;

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].get("q").map(String::as_str), Some("shirt"));
    assert_eq!(log[1].get("category").map(String::as_str), Some("Apparel"));
    drop(log);

    assert_eq!(names(&search), vec!["T-Shirt", "Dress Shirt"]);
}

#[tokio::test]
async fn unchanged_inputs_do_not_refetch() {
    let (mut search, log) = search().await;

    search.set_stock_status(Some("InStock".to_string()));
    search.settle().await;
    search.set_stock_status(Some("InStock".to_string()));
    search.set_category(None);
    search.set_category(Some(String::new()));
    search.settle().await;

    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(names(&search), vec!["Laptop", "Headphones", "Dress Shirt"]);
}

#[tokio::test]
async fn stale_response_never_overwrites_a_newer_one() {
    let (mut search, log) = search().await;

    search.set_query("slow");
    // Let the slow request reach the server before superseding it
    tokio::time::sleep(Duration::from_millis(50)).await;
    search.set_query("headphones");
    search.settle().await;
    assert_eq!(names(&search), vec!["Headphones"]);

    // Outlive the slow handler; the cancelled request must not land
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(names(&search), vec!["Headphones"]);
    assert!(!search.state().loading);
    let last = log.lock().unwrap().last().cloned().unwrap();
    assert_eq!(last.get("q").map(String::as_str), Some("headphones"));
}

#[tokio::test]
async fn debounce_collapses_rapid_edits() {
    let (search, log) = search().await;
    let mut search = search.with_debounce(Duration::from_millis(100));

    for q in ["s", "sh", "shi", "shir", "shirt"] {
        search.set_query(q);
    }
    search.settle().await;

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].get("q").map(String::as_str), Some("shirt"));
}

#[tokio::test]
async fn failure_keeps_results_and_shows_fixed_message() {
    let (mut search, _log) = search().await;

    search.set_query("laptop");
    search.settle().await;
    assert_eq!(names(&search), vec!["Laptop"]);

    search.set_query("boom");
    search.settle().await;

    let state = search.state();
    assert_eq!(state.error.as_deref(), Some(FETCH_RESULTS_FAILED));
    assert!(!state.loading);
    assert_eq!(names(&search), vec!["Laptop"]);

    search.set_query("laptop");
    search.settle().await;
    assert_eq!(search.state().error, None);
}

#[tokio::test]
async fn subscribers_see_the_final_state() {
    let (mut search, _log) = search().await;
    let mut rx = search.subscribe();

    search.set_query("laptop");
    let state = rx
        .wait_for(|s| !s.loading && !s.results.is_empty())
        .await
        .unwrap()
        .clone();
    assert_eq!(state.results[0].name, "Laptop");
}

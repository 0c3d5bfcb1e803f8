
use insact::{DiscoveryController, DisplaySource, StoryId, ALL_DOMAINS};
use mock_api::{ids, results, story, wait_until, GatedApi};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

fn catalog() -> Vec<insact::Story> {
  vec![story(1, "Health"), story(2, "Finance"), story(3, "Climate"), story(4, "Health")]
}

fn setup() -> (Arc<GatedApi>, DiscoveryController) {
  let api = Arc::new(GatedApi::with_catalog(catalog()));
  let discovery = DiscoveryController::new(api.clone());
  discovery.set_catalog(catalog());
  (api, discovery)
}

#[test]
fn test_example_catalog_domains_and_filter() {
  let api = Arc::new(GatedApi::new());
  let discovery = DiscoveryController::new(api);
  discovery.set_catalog(vec![story(1, "Health"), story(2, "Finance")]);

  assert_eq!(discovery.domains(), ["All", "Finance", "Health"]);
  discovery.filter_by_domain("Finance");
  assert_eq!(ids(&discovery.display_set()), [StoryId::Number(2)]);
}

#[test]
fn test_every_domain_filter_is_an_ordered_subset() {
  let (_api, discovery) = setup();
  let all = catalog();

  for domain in discovery.domains() {
    discovery.filter_by_domain(&domain);
    let shown = discovery.display_set();

    if domain == ALL_DOMAINS {
      assert_eq!(shown, all);
      continue;
    }

    assert!(!shown.is_empty());
    assert!(shown.iter().all(|s| s.domain == domain));
    let expected: Vec<_> = all.iter().filter(|s| s.domain == domain).cloned().collect();
    assert_eq!(shown, expected);
  }
}

#[tokio::test]
async fn test_blank_search_equals_clear_search() {
  let (api, discovery) = setup();
  discovery.filter_by_domain("Health");

  for blank in ["", "   "] {
    discovery.search("carbon").await;
    assert_eq!(discovery.display_source(), DisplaySource::Search("carbon".to_string()));

    discovery.search(blank).await;
    assert_eq!(discovery.search_query(), None);
    assert_eq!(discovery.display_source(), DisplaySource::Domain("Health".to_string()));
    assert_eq!(ids(&discovery.display_set()), [StoryId::Number(1), StoryId::Number(4)]);
  }

  assert_eq!(api.search_calls(), 2);
}

#[tokio::test]
async fn test_domain_filter_beats_active_search() {
  let (api, discovery) = setup();
  let release = api.hold_search("carbon");
  assert!(release.send(Ok(results(&[30, 31]))).is_ok());

  discovery.search("carbon").await;
  assert_eq!(ids(&discovery.display_set()), [StoryId::Number(30), StoryId::Number(31)]);

  discovery.filter_by_domain("Climate");
  assert_eq!(discovery.search_query(), None);
  assert_eq!(ids(&discovery.display_set()), [StoryId::Number(3)]);
}

#[tokio::test]
async fn test_stale_search_response_is_discarded() {
  let (api, discovery) = setup();
  let release_a = api.hold_search("a");
  let release_b = api.hold_search("b");

  let first = tokio::spawn({
    let discovery = discovery.clone();
    async move { discovery.search("a").await }
  });
  let second = tokio::spawn({
    let discovery = discovery.clone();
    async move { discovery.search("b").await }
  });
  wait_until(|| api.search_calls() == 2).await;
  assert!(discovery.is_searching());

  assert!(release_b.send(Ok(results(&[20]))).is_ok());
  second.await.unwrap();
  assert_eq!(ids(&discovery.display_set()), [StoryId::Number(20)]);

  assert!(release_a.send(Ok(results(&[10]))).is_ok());
  first.await.unwrap();

  assert_eq!(ids(&discovery.display_set()), [StoryId::Number(20)]);
  assert_eq!(discovery.search_query().as_deref(), Some("b"));
  assert!(!discovery.is_searching());
}

#[tokio::test]
async fn test_superseded_search_does_not_end_searching() {
  let (api, discovery) = setup();
  let release_a = api.hold_search("a");
  let release_b = api.hold_search("b");

  let first = tokio::spawn({
    let discovery = discovery.clone();
    async move { discovery.search("a").await }
  });
  let second = tokio::spawn({
    let discovery = discovery.clone();
    async move { discovery.search("b").await }
  });
  wait_until(|| api.search_calls() == 2).await;

  assert!(release_a.send(Ok(results(&[10]))).is_ok());
  first.await.unwrap();
  assert!(discovery.is_searching());
  assert!(discovery.display_set().iter().all(|s| s.id != StoryId::Number(10)));

  assert!(release_b.send(Ok(results(&[20]))).is_ok());
  second.await.unwrap();
  assert!(!discovery.is_searching());
  assert_eq!(ids(&discovery.display_set()), [StoryId::Number(20)]);
}

#[tokio::test]
async fn test_late_search_after_domain_filter_is_discarded() {
  let (api, discovery) = setup();
  let release = api.hold_search("carbon");

  let pending = tokio::spawn({
    let discovery = discovery.clone();
    async move { discovery.search("carbon").await }
  });
  wait_until(|| api.search_calls() == 1).await;

  discovery.filter_by_domain("Finance");
  assert!(release.send(Ok(results(&[99]))).is_ok());
  pending.await.unwrap();

  assert_eq!(discovery.search_query(), None);
  assert_eq!(ids(&discovery.display_set()), [StoryId::Number(2)]);
}

#[tokio::test]
async fn test_late_search_after_clear_is_discarded() {
  let (api, discovery) = setup();
  let release = api.hold_search("carbon");

  let pending = tokio::spawn({
    let discovery = discovery.clone();
    async move { discovery.search("carbon").await }
  });
  wait_until(|| api.search_calls() == 1).await;

  discovery.clear_search();
  assert!(!discovery.is_searching());
  assert!(release.send(Ok(results(&[99]))).is_ok());
  pending.await.unwrap();

  assert_eq!(discovery.display_set(), catalog());
}

#[tokio::test]
async fn test_dropped_search_shows_empty_results() {
  let (api, discovery) = setup();
  drop(api.hold_search("carbon"));

  discovery.search("carbon").await;
  assert!(discovery.display_set().is_empty());
  assert_eq!(discovery.search_query().as_deref(), Some("carbon"));
}

#[tokio::test]
async fn test_stale_catalog_load_is_discarded() {
  let api = Arc::new(GatedApi::new());
  let discovery = DiscoveryController::new(api.clone());
  let release_old = api.hold_catalog();
  let release_new = api.hold_catalog();

  let old = tokio::spawn({
    let discovery = discovery.clone();
    async move { discovery.load_catalog().await }
  });
  wait_until(|| api.catalog_calls() == 1).await;
  let new = tokio::spawn({
    let discovery = discovery.clone();
    async move { discovery.load_catalog().await }
  });
  wait_until(|| api.catalog_calls() == 2).await;

  assert!(release_new.send(Ok(vec![story(7, "Energy")])).is_ok());
  new.await.unwrap();
  assert!(release_old.send(Ok(vec![story(8, "Ocean")])).is_ok());
  old.await.unwrap();

  assert_eq!(ids(&discovery.catalog()), [StoryId::Number(7)]);
  assert_eq!(discovery.domains(), ["All", "Energy"]);
}

#[tokio::test]
async fn test_cancelled_search_stops_searching() {
  let (api, discovery) = setup();
  let _release = api.hold_search("carbon");

  let outcome = timeout(Duration::from_millis(20), discovery.search("carbon")).await;
  assert!(outcome.is_err());

  assert!(!discovery.is_searching());
  assert_eq!(discovery.search_query().as_deref(), Some("carbon"));
  assert_eq!(discovery.display_set(), catalog());

  discovery.search("sleep").await;
  assert!(!discovery.is_searching());
  assert!(discovery.display_set().is_empty());
}

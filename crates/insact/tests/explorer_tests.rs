
use insact::{DisplaySource, Explorer, SessionState, StoryId, View};
use mock_api::{enriched, ids, results, story, wait_until, GatedApi};
use std::sync::Arc;

fn setup() -> (Arc<GatedApi>, Explorer) {
  let api = Arc::new(GatedApi::with_catalog(vec![
    story(1, "Health"),
    story(2, "Finance"),
    story(3, "Health"),
  ]));
  let explorer = Explorer::new(api.clone());
  (api, explorer)
}

#[tokio::test]
async fn test_start_loads_catalog_and_domains() {
  let (api, explorer) = setup();
  explorer.start().await;

  assert_eq!(api.catalog_calls(), 1);
  assert_eq!(explorer.discovery().catalog().len(), 3);
  assert_eq!(explorer.discovery().domains(), ["All", "Finance", "Health"]);
  assert_eq!(explorer.view(), View::Discovery);
}

#[tokio::test]
async fn test_failed_catalog_load_leaves_empty_list() {
  let (api, explorer) = setup();
  drop(api.hold_catalog());
  explorer.start().await;

  assert!(explorer.discovery().display_set().is_empty());
  assert_eq!(explorer.discovery().domains(), ["All"]);
}

#[tokio::test]
async fn test_select_from_catalog_opens_detail() {
  let (api, explorer) = setup();
  explorer.start().await;

  assert!(explorer.select(&StoryId::Number(2)).await);
  assert_eq!(explorer.view(), View::Detail);
  assert_eq!(explorer.session().state(), SessionState::Ready);
  assert_eq!(explorer.session().story_id(), Some(StoryId::Number(2)));
  assert_eq!(api.story_calls(), 0);
  assert_eq!(api.enrichment_calls(), 1);
}

#[tokio::test]
async fn test_select_search_result_uses_result_story() {
  let (api, explorer) = setup();
  explorer.start().await;

  let release = api.hold_search("sleep");
  assert!(release.send(Ok(results(&[40]))).is_ok());
  explorer.discovery().search("sleep").await;

  // Search results are not in the catalog and have no enrichment
  assert!(explorer.select(&StoryId::Number(40)).await);
  assert_eq!(api.story_calls(), 0);
  let shown = explorer.session().story().unwrap();
  assert_eq!(shown.story, story(40, "Search"));
  assert!(shown.enrichment.is_none());
}

#[tokio::test]
async fn test_select_unknown_story_fetches_it() {
  let (api, explorer) = setup();
  explorer.start().await;
  api.enriched.lock().unwrap().insert(StoryId::Number(77), enriched(story(77, "Energy")));

  assert!(explorer.select(&StoryId::Number(77)).await);
  assert_eq!(api.story_calls(), 1);
  assert_eq!(explorer.session().story().unwrap().story.domain, "Energy");
}

#[tokio::test]
async fn test_select_missing_story_stays_on_list() {
  let (api, explorer) = setup();
  explorer.start().await;

  assert!(!explorer.select(&StoryId::Text("nope".to_string())).await);
  assert_eq!(api.story_calls(), 1);
  assert_eq!(explorer.view(), View::Discovery);
  assert_eq!(api.enrichment_calls(), 0);
}

#[tokio::test]
async fn test_back_keeps_discovery_state() {
  let (_api, explorer) = setup();
  explorer.start().await;
  explorer.discovery().filter_by_domain("Health");

  assert!(explorer.select(&StoryId::Number(3)).await);
  explorer.session().send_message("tell me more").await;
  assert_eq!(explorer.session().transcript().len(), 2);

  explorer.back();

  assert_eq!(explorer.view(), View::Discovery);
  assert_eq!(explorer.discovery().display_source(), DisplaySource::Domain("Health".to_string()));
  assert_eq!(ids(&explorer.discovery().display_set()), [StoryId::Number(1), StoryId::Number(3)]);
  assert!(explorer.session().transcript().is_empty());
}

#[tokio::test]
async fn test_late_lookup_after_back_does_not_reopen() {
  let (api, explorer) = setup();
  explorer.start().await;
  let release = api.hold_story(StoryId::Number(77));

  let pending = tokio::spawn({
    let explorer = explorer.clone();
    async move { explorer.select(&StoryId::Number(77)).await }
  });
  wait_until(|| api.story_calls() == 1).await;

  assert!(explorer.select(&StoryId::Number(1)).await);
  explorer.back();
  assert_eq!(explorer.view(), View::Discovery);

  assert!(release.send(Ok(story(77, "Energy"))).is_ok());
  assert!(!pending.await.unwrap());

  assert_eq!(explorer.view(), View::Discovery);
  assert!(explorer.session().story().is_none());
  assert_eq!(api.enrichment_calls(), 1);
}

#[tokio::test]
async fn test_late_lookup_does_not_replace_newer_selection() {
  let (api, explorer) = setup();
  explorer.start().await;
  let release = api.hold_story(StoryId::Number(77));

  let pending = tokio::spawn({
    let explorer = explorer.clone();
    async move { explorer.select(&StoryId::Number(77)).await }
  });
  wait_until(|| api.story_calls() == 1).await;

  assert!(explorer.select(&StoryId::Number(2)).await);

  assert!(release.send(Ok(story(77, "Energy"))).is_ok());
  assert!(!pending.await.unwrap());

  assert_eq!(explorer.session().story_id(), Some(StoryId::Number(2)));
  assert_eq!(explorer.session().state(), SessionState::Ready);
}

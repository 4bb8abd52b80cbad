mod common;

use common::{day, sample_popularity, sample_zones, FixedClock, ScriptedSource};
use zone_proto::access::{access_code_for, AccessGate, CODE_KEY, UNLOCKED_KEY};
use zone_proto::catalog::load_catalog;
use zone_proto::controller::{Controller, Status};
use zone_proto::protocol::SortMode;
use zone_proto::render::{Thumbnail, ZoneCard};
use zone_proto::store::{FileStore, KeyValueStore, MemoryStore};

fn controller_at(date: chrono::NaiveDate, store: Box<dyn KeyValueStore>) -> Controller {
    Controller::new(AccessGate::open(Box::new(FixedClock(date)), store))
}

/// What a front end does on refresh: ask for a ticket, then load and apply.
async fn refresh(controller: &mut Controller, source: &ScriptedSource) -> bool {
    let Some(ticket) = controller.begin_refresh() else {
        return false;
    };
    let result = load_catalog(source).await;
    controller.apply_refresh(ticket, result)
}

#[tokio::test]
async fn refresh_while_locked_makes_no_calls() {
    let source = ScriptedSource::new(sample_zones(), sample_popularity());
    let mut controller = controller_at(day(2026, 10, 18), Box::new(MemoryStore::new()));

    assert!(!refresh(&mut controller, &source).await);
    assert_eq!(source.calls(), 0);
    assert_eq!(controller.status(), &Status::Locked);
    assert_eq!(controller.zone_count(), 0);
}

#[tokio::test]
async fn unlock_then_refresh_loads_merged_catalog() {
    let source = ScriptedSource::new(sample_zones(), sample_popularity());
    let today = day(2026, 10, 18);
    let mut controller = controller_at(today, Box::new(MemoryStore::new()));

    let ticket = controller
        .submit_code(&format!(" {} ", access_code_for(today)))
        .expect("code accepted")
        .expect("unlock issues a ticket");
    let result = load_catalog(&source).await;
    assert!(controller.apply_refresh(ticket, result));

    assert_eq!(source.calls(), 3);
    assert_eq!(
        *source.requested_revs.lock().unwrap(),
        ["rev-1".to_string(), "rev-1".to_string()]
    );
    assert_eq!(controller.status(), &Status::Showing(3));

    let gamma = controller.zone(2).expect("gamma loaded");
    assert_eq!(gamma.popularity, 0);
    assert!(gamma.tags.is_empty());
    assert_eq!(gamma.author_label(), "Unknown");

    let cards: Vec<ZoneCard> = controller
        .selection()
        .ordered()
        .filter_map(|i| controller.zone(i))
        .map(ZoneCard::from_zone)
        .collect();
    assert_eq!(cards[0].title, "Beta");
    assert_eq!(cards[0].plays.as_deref(), Some("10 plays"));
    assert_eq!(cards[0].thumbnail, Thumbnail::Image("https://img/2.png".into()));
    assert_eq!(cards[2].title, "Gamma");
    assert_eq!(cards[2].plays, None);
    assert_eq!(cards[2].thumbnail, Thumbnail::Placeholder);
}

#[tokio::test]
async fn missing_revision_aborts_without_touching_data() {
    let good = ScriptedSource::new(sample_zones(), sample_popularity());
    let today = day(2026, 10, 18);
    let mut controller = controller_at(today, Box::new(MemoryStore::new()));
    let ticket = controller.submit_code(&access_code_for(today)).unwrap().unwrap();
    controller.apply_refresh(ticket, load_catalog(&good).await);
    controller.set_sort(SortMode::Newest);

    let broken = ScriptedSource {
        revision: None,
        ..ScriptedSource::new(sample_zones(), sample_popularity())
    };
    assert!(refresh(&mut controller, &broken).await);
    assert_eq!(broken.calls(), 1, "zone and popularity fetches never start");
    assert!(controller.status().is_error());
    assert_eq!(controller.zone_count(), 3);

    let newest: Vec<_> = controller
        .selection()
        .ordered()
        .filter_map(|i| controller.zone(i))
        .map(|z| z.id.clone())
        .collect();
    // All three are featured (popularity order); main is empty.
    assert_eq!(newest, ["2", "1", "3"]);
}

#[tokio::test]
async fn failed_popularity_fetch_keeps_previous_snapshot() {
    let today = day(2026, 10, 18);
    let mut controller = controller_at(today, Box::new(MemoryStore::new()));
    let good = ScriptedSource::new(sample_zones(), sample_popularity());
    let ticket = controller.submit_code(&access_code_for(today)).unwrap().unwrap();
    controller.apply_refresh(ticket, load_catalog(&good).await);
    controller.set_search("a");
    let before = controller.selection().clone();
    let beta_plays = controller.zone(1).map(|z| z.popularity);

    let flaky = ScriptedSource {
        popularity_status: Some(503),
        ..ScriptedSource::new(
            serde_json::json!([{ "id": 9, "name": "Delta", "url": "https://z/9" }]),
            sample_popularity(),
        )
    };
    assert!(refresh(&mut controller, &flaky).await);
    assert_eq!(flaky.calls(), 3, "revision, zones and popularity were all requested");

    match controller.status() {
        Status::Error(reason) => assert!(reason.contains("503"), "{}", reason),
        other => panic!("expected an error status, got {:?}", other),
    }
    assert_eq!(controller.zone_count(), 3);
    assert_eq!(controller.selection(), &before);
    assert_eq!(controller.zone(1).map(|z| z.popularity), beta_plays);
    assert!(controller
        .selection()
        .ordered()
        .filter_map(|i| controller.zone(i))
        .all(|z| z.name != "Delta"));
}

#[tokio::test]
async fn session_file_carries_unlock_across_runs_within_a_week() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let friday = day(2026, 10, 16);

    let mut first = controller_at(friday, Box::new(FileStore::open(&path)));
    first.submit_code(&access_code_for(friday)).unwrap();

    let second = controller_at(day(2026, 10, 18), Box::new(FileStore::open(&path)));
    assert!(!second.is_locked());
    assert_eq!(second.status(), &Status::Loading);

    let next_week = controller_at(day(2026, 10, 19), Box::new(FileStore::open(&path)));
    assert!(next_week.is_locked());
    let store = FileStore::open(&path);
    assert_eq!(store.get(UNLOCKED_KEY), None);
    assert_eq!(store.get(CODE_KEY).as_deref(), Some("2026-43"));
}

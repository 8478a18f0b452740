use localplot_core::{AppEvent, EventBus, EventCategory, EventFilter, LayoutEvent, Point};
use localplot_layout::{
    ArrangeConfig, ArrangeOutcome, ArrangeSession, CancelToken, ItemGroup, ItemStore, Polygon,
};
use parking_lot::Mutex;
use std::sync::Arc;

fn store_with(sizes: &[(f64, f64, f64, f64)]) -> Arc<ItemStore> {
    let store = Arc::new(ItemStore::new());
    for (i, &(x, y, w, h)) in sizes.iter().enumerate() {
        let group = ItemGroup::with_polygons(vec![Polygon::rectangle(x, y, w, h).unwrap()]);
        store.insert_with_group(format!("plot-{}.hpgl", i), group);
    }
    store
}

#[test]
fn test_session_moves_drawings_to_placements() {
    let store = store_with(&[(100.0, 40.0, 10.0, 4.0), (-3.0, 7.0, 6.0, 6.0)]);
    let report = ArrangeSession::new(store.clone(), ArrangeConfig::new(30.0))
        .run()
        .unwrap();

    assert!(report.outcome.is_completed());
    assert_eq!(report.placements.len(), 2);
    for (id, rect) in &report.placements {
        let scene = store.scene_rect(*id).unwrap();
        assert_eq!(scene.min(), Point::new(rect.x, rect.y));
    }
    assert_eq!(report.messages, vec!["Finished arranging files.".to_string()]);
}

#[test]
fn test_session_relays_to_event_bus() {
    let store = store_with(&[(0.0, 0.0, 5.0, 5.0), (0.0, 0.0, 3.0, 2.0)]);
    let bus = EventBus::new();
    let seen: Arc<Mutex<Vec<AppEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    bus.subscribe(
        EventFilter::Categories(vec![EventCategory::Layout]),
        move |event| sink.lock().push(event),
    );

    ArrangeSession::new(store, ArrangeConfig::new(30.0))
        .with_event_bus(&bus)
        .run()
        .unwrap();

    let seen = seen.lock();
    assert!(matches!(
        seen.first(),
        Some(AppEvent::Layout(LayoutEvent::ArrangeStarted { entries: 2 }))
    ));
    let placed = seen
        .iter()
        .filter(|e| matches!(e, AppEvent::Layout(LayoutEvent::Placed { .. })))
        .count();
    assert_eq!(placed, 2);
    assert!(matches!(
        seen.last(),
        Some(AppEvent::Layout(LayoutEvent::ArrangeFinished { .. }))
    ));
}

#[test]
fn test_cancelled_session_leaves_drawings_alone() {
    let store = store_with(&[(12.0, 34.0, 5.0, 5.0)]);
    let cancel = CancelToken::new();
    cancel.cancel();

    let report = ArrangeSession::new(store.clone(), ArrangeConfig::new(30.0))
        .with_cancel_token(cancel)
        .run()
        .unwrap();

    assert_eq!(report.outcome, ArrangeOutcome::Cancelled { placed: 0 });
    assert!(report.placements.is_empty());
    assert_eq!(report.messages, vec!["Cancelling auto arrange.".to_string()]);
    let id = store.ids()[0];
    assert_eq!(store.scene_rect(id).unwrap().min(), Point::new(12.0, 34.0));
}

#[test]
fn test_session_rejects_invalid_config() {
    let store = store_with(&[(0.0, 0.0, 1.0, 1.0)]);
    assert!(ArrangeSession::new(store, ArrangeConfig::new(-5.0))
        .run()
        .is_err());
}

use localplot_core::{Rect, StatusLevel};
use localplot_layout::{
    ArrangeConfig, ArrangeEvent, ArrangeJob, ArrangeOutcome, ArrangeState, CancelToken,
    EntryGuard, EntryId, ItemGroup, ItemStore, Polygon, RectPacker, ShelfHeuristic, ShelfPacker,
    SortOrder,
};
use parking_lot::Mutex;
use std::sync::Arc;

fn drawing(w: f64, h: f64) -> ItemGroup {
    ItemGroup::with_polygons(vec![Polygon::rectangle(0.0, 0.0, w, h).unwrap()])
}

fn store_with(sizes: &[(&str, f64, f64)]) -> (Arc<ItemStore>, Vec<EntryId>) {
    let store = Arc::new(ItemStore::new());
    let ids = sizes
        .iter()
        .map(|&(name, w, h)| store.insert_with_group(name, drawing(w, h)))
        .collect();
    (store, ids)
}

fn placements(events: &[ArrangeEvent]) -> Vec<(EntryId, Rect)> {
    events
        .iter()
        .filter_map(|e| match e {
            ArrangeEvent::PlacementComputed { entry, rect } => Some((*entry, *rect)),
            _ => None,
        })
        .collect()
}

fn finished_count(events: &[ArrangeEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ArrangeEvent::Finished(_)))
        .count()
}

/// Delegates to a shelf packer and raises the cancel flag after `after` inserts
struct CancellingPacker {
    inner: ShelfPacker,
    token: CancelToken,
    after: usize,
    inserts: usize,
}

impl RectPacker for CancellingPacker {
    fn init(&mut self, width: f64, height: f64, allow_rotation: bool) {
        self.inner.init(width, height, allow_rotation);
    }

    fn insert(&mut self, width: f64, height: f64, heuristic: ShelfHeuristic) -> Option<Rect> {
        let rect = self.inner.insert(width, height, heuristic);
        self.inserts += 1;
        if self.inserts == self.after {
            self.token.cancel();
        }
        rect
    }
}

/// Delegates to a shelf packer and takes another entry's lock on its first insert
struct LockingPacker {
    inner: ShelfPacker,
    store: Arc<ItemStore>,
    target: EntryId,
    held: Option<EntryGuard>,
}

impl RectPacker for LockingPacker {
    fn init(&mut self, width: f64, height: f64, allow_rotation: bool) {
        self.inner.init(width, height, allow_rotation);
    }

    fn insert(&mut self, width: f64, height: f64, heuristic: ShelfHeuristic) -> Option<Rect> {
        if self.held.is_none() {
            self.held = self.store.try_lock_group(self.target).ok();
        }
        self.inner.insert(width, height, heuristic)
    }
}

/// Always answers with the same rectangle
struct FixedPacker(Rect);

impl RectPacker for FixedPacker {
    fn init(&mut self, _: f64, _: f64, _: bool) {}

    fn insert(&mut self, _: f64, _: f64, _: ShelfHeuristic) -> Option<Rect> {
        Some(self.0)
    }
}

#[test]
fn test_arrange_is_deterministic() {
    let sizes = [
        ("a.hpgl", 30.0, 12.0),
        ("b.hpgl", 8.0, 40.0),
        ("c.hpgl", 15.0, 15.0),
        ("d.hpgl", 22.0, 5.0),
    ];
    let run = || {
        let (store, _) = store_with(&sizes);
        let (job, mut events) = ArrangeJob::new(store, ArrangeConfig::new(50.0)).unwrap();
        let outcome = job.run();
        let rects: Vec<Rect> = placements(&events.drain_blocking())
            .into_iter()
            .map(|(_, r)| r)
            .collect();
        (outcome, rects)
    };

    assert_eq!(run(), run());
}

#[test]
fn test_placements_stay_on_sheet_without_overlap() {
    let (store, ids) = store_with(&[
        ("a.hpgl", 30.0, 12.0),
        ("b.hpgl", 8.0, 40.0),
        ("c.hpgl", 15.0, 15.0),
        ("d.hpgl", 22.0, 5.0),
        ("e.hpgl", 3.0, 3.0),
    ]);
    let (job, mut events) = ArrangeJob::new(store, ArrangeConfig::new(50.0)).unwrap();
    let outcome = job.run();
    let events = events.drain_blocking();
    let placed = placements(&events);

    let (count, sheet) = match outcome {
        ArrangeOutcome::Completed { placed, sheet } => (placed, sheet),
        other => panic!("expected completion, got {:?}", other),
    };
    assert_eq!(count, ids.len());
    assert_eq!(placed.iter().map(|(id, _)| *id).collect::<Vec<_>>(), ids);
    for (i, (_, a)) in placed.iter().enumerate() {
        assert!(sheet.contains_rect(a), "{} outside {}", a, sheet);
        for (_, b) in &placed[i + 1..] {
            assert!(!a.intersects(b), "{} overlaps {}", a, b);
        }
    }
}

#[test]
fn test_bin_height_is_sum_of_longest_sides() {
    let (store, _) = store_with(&[("a.hpgl", 4.0, 10.0), ("b.hpgl", 6.0, 2.0)]);
    let (job, _events) = ArrangeJob::new(store, ArrangeConfig::new(50.0)).unwrap();
    match job.run() {
        ArrangeOutcome::Completed { sheet, .. } => {
            assert_eq!(sheet, Rect::new(0.0, 0.0, 16.0, 50.0));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_sort_order_changes_placements() {
    let arrange = |order: SortOrder| {
        let (store, ids) = store_with(&[("z-wide.hpgl", 6.0, 2.0), ("a-square.hpgl", 5.0, 5.0)]);
        let config = ArrangeConfig::new(10.0).with_sort_order(order);
        let (job, mut events) = ArrangeJob::new(store, config).unwrap();
        assert!(job.run().is_completed());
        let placed = placements(&events.drain_blocking());
        let rect_of = |id: EntryId| placed.iter().find(|(e, _)| *e == id).map(|(_, r)| *r);
        (rect_of(ids[0]).unwrap(), rect_of(ids[1]).unwrap())
    };

    let (wide_loaded, square_loaded) = arrange(SortOrder::LoadOrder);
    let (wide_named, square_named) = arrange(SortOrder::Name);
    assert_ne!(wide_loaded, wide_named);
    assert_ne!(square_loaded, square_named);
}

#[test]
fn test_cancel_mid_run_keeps_earlier_placements() {
    let (store, ids) = store_with(&[
        ("a.hpgl", 5.0, 5.0),
        ("b.hpgl", 5.0, 5.0),
        ("c.hpgl", 5.0, 5.0),
        ("d.hpgl", 5.0, 5.0),
    ]);
    let token = CancelToken::new();
    let packer = CancellingPacker {
        inner: ShelfPacker::default(),
        token: token.clone(),
        after: 2,
        inserts: 0,
    };
    let (job, mut events) = ArrangeJob::with_packer(store, ArrangeConfig::new(20.0), packer).unwrap();
    let outcome = job.with_cancel_token(token).run();

    assert_eq!(outcome, ArrangeOutcome::Cancelled { placed: 2 });
    let events = events.drain_blocking();
    let placed: Vec<EntryId> = placements(&events).into_iter().map(|(id, _)| id).collect();
    assert_eq!(placed, ids[..2].to_vec());
    assert_eq!(
        events[events.len() - 2],
        ArrangeEvent::Status {
            message: "Cancelling auto arrange.".to_string(),
            level: StatusLevel::Warning,
        }
    );
    assert_eq!(finished_count(&events), 1);
}

#[test]
fn test_cancel_before_start() {
    let (store, _) = store_with(&[("a.hpgl", 5.0, 5.0)]);
    let (job, mut events) = ArrangeJob::new(store, ArrangeConfig::new(20.0)).unwrap();
    job.cancel_token().cancel();
    assert_eq!(job.run(), ArrangeOutcome::Cancelled { placed: 0 });
    assert!(placements(&events.drain_blocking()).is_empty());
}

#[test]
fn test_cancel_during_sizing_places_nothing() {
    let (store, _) = store_with(&[
        ("a.hpgl", 5.0, 5.0),
        ("b.hpgl", 5.0, 5.0),
        ("c.hpgl", 5.0, 5.0),
        ("d.hpgl", 5.0, 5.0),
    ]);
    let token = CancelToken::new();
    let trigger = token.clone();
    let (job, mut events) = ArrangeJob::new(store, ArrangeConfig::new(20.0)).unwrap();
    let job = job
        .with_cancel_token(token)
        .with_progress(Box::new(move |done, _| {
            if done == 2 {
                trigger.cancel();
            }
        }));

    assert_eq!(job.run(), ArrangeOutcome::Cancelled { placed: 0 });
    let events = events.drain_blocking();
    assert!(placements(&events).is_empty());
    assert_eq!(finished_count(&events), 1);
}

#[test]
fn test_progress_counts_both_passes() {
    let (store, _) = store_with(&[
        ("a.hpgl", 5.0, 5.0),
        ("b.hpgl", 3.0, 2.0),
        ("c.hpgl", 1.0, 4.0),
    ]);
    let seen: Arc<Mutex<Vec<(u64, u64)>>> = Arc::default();
    let sink = seen.clone();
    let (job, _events) = ArrangeJob::new(store, ArrangeConfig::new(20.0)).unwrap();
    let job = job.with_progress(Box::new(move |done, total| sink.lock().push((done, total))));

    assert!(job.run().is_completed());
    let expected: Vec<(u64, u64)> = (1..=6).map(|done| (done, 6)).collect();
    assert_eq!(*seen.lock(), expected);
}

#[test]
fn test_locked_entry_aborts_without_placements() {
    let (store, ids) = store_with(&[
        ("a.hpgl", 5.0, 5.0),
        ("b.hpgl", 5.0, 5.0),
        ("c.hpgl", 5.0, 5.0),
    ]);
    let held = store.try_lock_group(ids[1]).unwrap();

    let (job, mut events) = ArrangeJob::new(store.clone(), ArrangeConfig::new(20.0)).unwrap();
    let outcome = job.run();
    assert_eq!(outcome, ArrangeOutcome::LockContention { entry: ids[1] });

    let events = events.drain_blocking();
    assert!(placements(&events).is_empty());
    assert_eq!(finished_count(&events), 1);

    // The job released everything it took.
    drop(held);
    for id in ids {
        assert!(store.try_lock_group(id).is_ok());
    }
}

#[test]
fn test_entry_locked_during_packing_keeps_earlier_placements() {
    let (store, ids) = store_with(&[
        ("a.hpgl", 5.0, 5.0),
        ("b.hpgl", 5.0, 5.0),
        ("c.hpgl", 5.0, 5.0),
    ]);
    let packer = LockingPacker {
        inner: ShelfPacker::default(),
        store: store.clone(),
        target: ids[2],
        held: None,
    };
    let (job, mut events) =
        ArrangeJob::with_packer(store.clone(), ArrangeConfig::new(20.0), packer).unwrap();

    assert_eq!(job.run(), ArrangeOutcome::LockContention { entry: ids[2] });
    let events = events.drain_blocking();
    let placed: Vec<EntryId> = placements(&events).into_iter().map(|(id, _)| id).collect();
    assert_eq!(placed, ids[..2].to_vec());
    assert_eq!(finished_count(&events), 1);

    // The packer went away with the job, and its lock with it.
    assert!(store.try_lock_group(ids[2]).is_ok());
}

#[test]
fn test_unmeasurable_entry_finishes_as_invalid() {
    let store = Arc::new(ItemStore::new());
    let wide = store.insert_with_group(
        "wide.hpgl",
        ItemGroup::with_polygons(vec![
            Polygon::from_coords(&[(-1e308, 0.0), (1e308, 10.0)]).unwrap(),
        ]),
    );
    let (job, mut events) = ArrangeJob::new(store, ArrangeConfig::new(20.0)).unwrap();
    let handle = job.spawn().unwrap();

    let events = events.drain_blocking();
    let outcome = handle.join().unwrap();
    assert_eq!(outcome, ArrangeOutcome::InvalidEntryState { entry: wide });
    assert_eq!(finished_count(&events), 1);
    assert_eq!(events.last(), Some(&ArrangeEvent::Finished(outcome)));
}

#[test]
fn test_overflowing_sheet_length_is_invalid() {
    let (store, ids) = store_with(&[("a.hpgl", 1e308, 1.0), ("b.hpgl", 1e308, 1.0)]);
    let (job, mut events) = ArrangeJob::new(store, ArrangeConfig::new(20.0)).unwrap();

    assert_eq!(
        job.run(),
        ArrangeOutcome::InvalidEntryState { entry: ids[1] }
    );
    let events = events.drain_blocking();
    assert!(placements(&events).is_empty());
    assert_eq!(finished_count(&events), 1);
}

#[test]
fn test_entry_without_group_is_invalid() {
    let store = Arc::new(ItemStore::new());
    store.insert_with_group("a.hpgl", drawing(5.0, 5.0));
    let missing = store.insert("still-loading.hpgl");

    let (job, mut events) = ArrangeJob::new(store, ArrangeConfig::new(20.0)).unwrap();
    assert_eq!(
        job.run(),
        ArrangeOutcome::InvalidEntryState { entry: missing }
    );
    let events = events.drain_blocking();
    match &events[0] {
        ArrangeEvent::Status { level, .. } => assert_eq!(*level, StatusLevel::Error),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_too_large_entry_does_not_fit() {
    let (store, ids) = store_with(&[("a.hpgl", 3.0, 3.0), ("huge.hpgl", 8.0, 8.0)]);
    let (job, mut events) = ArrangeJob::new(store, ArrangeConfig::new(5.0)).unwrap();
    assert_eq!(
        job.run(),
        ArrangeOutcome::DoesNotFit {
            entry: ids[1],
            width: 8.0,
            height: 8.0,
        }
    );
    assert_eq!(placements(&events.drain_blocking()).len(), 1);
}

#[test]
fn test_packer_rect_is_transposed() {
    let (store, ids) = store_with(&[("a.hpgl", 10.0, 3.0)]);
    let packer = FixedPacker(Rect::new(2.0, 5.0, 10.0, 3.0));
    let (job, mut events) = ArrangeJob::with_packer(store, ArrangeConfig::new(50.0), packer).unwrap();
    job.run();

    assert_eq!(
        events.recv_blocking(),
        Some(ArrangeEvent::PlacementComputed {
            entry: ids[0],
            rect: Rect::new(5.0, 2.0, 3.0, 10.0),
        })
    );
}

#[test]
fn test_spawned_job_reports_on_handle() {
    let (store, _) = store_with(&[("a.hpgl", 5.0, 5.0), ("b.hpgl", 2.0, 9.0)]);
    let (job, mut events) = ArrangeJob::new(store, ArrangeConfig::new(20.0)).unwrap();
    let handle = job.spawn().unwrap();

    let events = events.drain_blocking();
    let outcome = handle.join().unwrap();
    assert!(outcome.is_completed());
    assert_eq!(events.last(), Some(&ArrangeEvent::Finished(outcome)));
    assert_eq!(placements(&events).len(), 2);
}

#[test]
fn test_handle_state_is_terminal_after_finish() {
    let (store, _) = store_with(&[("a.hpgl", 5.0, 5.0)]);
    let (job, mut events) = ArrangeJob::new(store, ArrangeConfig::new(20.0)).unwrap();
    let handle = job.spawn().unwrap();
    events.drain_blocking();
    assert_eq!(handle.state(), ArrangeState::Completed);
    handle.join().unwrap();
}

#[tokio::test]
async fn test_events_can_be_awaited() {
    let (store, _) = store_with(&[("a.hpgl", 5.0, 5.0), ("b.hpgl", 4.0, 1.0)]);
    let (job, mut events) = ArrangeJob::new(store, ArrangeConfig::new(20.0)).unwrap();
    let handle = job.spawn().unwrap();

    let mut received = Vec::new();
    while let Some(event) = events.recv().await {
        received.push(event);
    }
    assert_eq!(placements(&received).len(), 2);
    assert_eq!(finished_count(&received), 1);
    assert!(handle.join().unwrap().is_completed());
}

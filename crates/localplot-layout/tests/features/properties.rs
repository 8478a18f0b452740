use localplot_core::Rect;
use localplot_layout::{
    ArrangeConfig, ArrangeEvent, ArrangeJob, ArrangeOutcome, ItemGroup, ItemStore, Polygon,
    ShelfHeuristic, SortOrder,
};
use proptest::prelude::*;
use std::sync::Arc;

const SHEET_WIDTH: f64 = 60.0;

fn any_heuristic() -> impl Strategy<Value = ShelfHeuristic> {
    prop_oneof![
        Just(ShelfHeuristic::NextFit),
        Just(ShelfHeuristic::FirstFit),
        Just(ShelfHeuristic::BestAreaFit),
        Just(ShelfHeuristic::WorstAreaFit),
        Just(ShelfHeuristic::BestHeightFit),
        Just(ShelfHeuristic::BestWidthFit),
        Just(ShelfHeuristic::WorstWidthFit),
    ]
}

fn any_sort_order() -> impl Strategy<Value = SortOrder> {
    prop_oneof![
        Just(SortOrder::LoadOrder),
        Just(SortOrder::Name),
        Just(SortOrder::LargestFirst),
    ]
}

fn arrange(sizes: &[(f64, f64)], config: ArrangeConfig) -> (ArrangeOutcome, Vec<Rect>) {
    let store = Arc::new(ItemStore::new());
    for (i, &(w, h)) in sizes.iter().enumerate() {
        let group = ItemGroup::with_polygons(vec![Polygon::rectangle(0.0, 0.0, w, h).unwrap()]);
        store.insert_with_group(format!("drawing-{:02}.hpgl", i), group);
    }
    let (job, mut events) = ArrangeJob::new(store, config).unwrap();
    let outcome = job.run();
    let rects = events
        .drain_blocking()
        .into_iter()
        .filter_map(|e| match e {
            ArrangeEvent::PlacementComputed { rect, .. } => Some(rect),
            _ => None,
        })
        .collect();
    (outcome, rects)
}

proptest! {
    #[test]
    fn prop_every_drawing_is_placed_apart(
        sizes in prop::collection::vec((0.5f64..50.0, 0.5f64..50.0), 1..20),
        heuristic in any_heuristic(),
        order in any_sort_order(),
        rotate in any::<bool>(),
        spacing in 0.0f64..2.0,
    ) {
        let config = ArrangeConfig::new(SHEET_WIDTH)
            .with_heuristic(heuristic)
            .with_sort_order(order)
            .with_rotation(rotate)
            .with_spacing(spacing);
        let (outcome, rects) = arrange(&sizes, config);

        let sheet = match outcome {
            ArrangeOutcome::Completed { placed, sheet } => {
                prop_assert_eq!(placed, sizes.len());
                sheet
            }
            other => return Err(TestCaseError::fail(format!("not completed: {:?}", other))),
        };
        prop_assert_eq!(rects.len(), sizes.len());

        let bounds = sheet.inset(-1e-3);
        for (i, a) in rects.iter().enumerate() {
            prop_assert!(bounds.contains_rect(a), "{} outside {}", a, sheet);
            for b in &rects[i + 1..] {
                prop_assert!(!a.intersects(b), "{} overlaps {}", a, b);
            }
        }
    }

    #[test]
    fn prop_arrange_is_repeatable(
        sizes in prop::collection::vec((0.5f64..50.0, 0.5f64..50.0), 0..12),
        heuristic in any_heuristic(),
    ) {
        let config = ArrangeConfig::new(SHEET_WIDTH).with_heuristic(heuristic);
        prop_assert_eq!(arrange(&sizes, config.clone()), arrange(&sizes, config));
    }
}

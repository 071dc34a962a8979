//! Property-based invariant tests for chain plans and chain propagation.
//!
//! 1. A plan never lists a tile twice and never lists the pivot.
//! 2. Offsets strictly grow along every upstream path, and every upstream
//!    precedes its follower.
//! 3. A reflow plan populates only the moving side, with tiles still laid out.
//! 4. Link damping is the base ratio plus `offset * additional`.
//! 5. After a step, every follower chases its upstream's current position.
//! 6. A dismiss always removes its tile and leaves every survivor at rest.

use std::time::Duration;

use proptest::prelude::*;
use recents_core::{Axis, ReadingDirection, Spring, SpringParams};
use recents_layout::{
    ChainDirection, ElementLocator, LayoutStore, TileId, TileLayout, Viewport,
};
use recents_motion::testing::{RecordingSink, run_until_idle};
use recents_motion::{
    ChainBuilder, ChainPlan, Choreographer, Completion, DragRelease, MotionConfig, SpringChain,
    Upstream, link_params,
};

const MS_16: Duration = Duration::from_millis(16);
const W: f64 = 300.0;
const H: f64 = 500.0;

fn direction_strategy() -> impl Strategy<Value = ReadingDirection> {
    prop_oneof![
        Just(ReadingDirection::LeftToRight),
        Just(ReadingDirection::RightToLeft),
    ]
}

fn viewport_strategy() -> impl Strategy<Value = Viewport> {
    (600.0f64..1_600.0, 0.0f64..3_000.0, 0.0f64..60.0, direction_strategy()).prop_map(
        |(extent, scroll, spacing, direction)| {
            Viewport::new(extent)
                .with_scroll(scroll)
                .with_page_spacing(spacing)
                .with_direction(direction)
        },
    )
}

/// A carousel or a grid, plus a tile id that may or may not be laid out.
fn layout_strategy() -> impl Strategy<Value = (TileLayout, u32)> {
    let carousel = (1u32..12, viewport_strategy()).prop_flat_map(|(count, viewport)| {
        (
            Just(TileLayout::uniform_carousel(count, W, H, viewport)),
            0..count,
        )
    });
    let grid = (0u32..3, 0u32..6, viewport_strategy())
        .prop_filter("grid needs a tile", |(large, columns, _)| large + columns > 0)
        .prop_flat_map(|(large, columns, viewport)| {
            (
                Just(TileLayout::uniform_grid(large, columns, W, H, viewport)),
                0..large + 2 * columns,
            )
        });
    prop_oneof![carousel, grid]
}

fn params_strategy() -> impl Strategy<Value = SpringParams> {
    (100.0f64..1_500.0, 0.4f64..1.2).prop_map(|(k, zeta)| {
        SpringParams::new(k, zeta).expect("strategy yields valid parameters")
    })
}

fn check_structure(plan: &ChainPlan, pivot: TileId) -> Result<(), TestCaseError> {
    let mut seen = vec![pivot];
    for direction in ChainDirection::BOTH {
        let side = plan.side(direction);
        for (index, link) in side.iter().enumerate() {
            prop_assert!(!seen.contains(&link.tile), "{} listed twice", link.tile);
            seen.push(link.tile);
            match link.upstream {
                Upstream::Root => prop_assert!(link.offset >= 1),
                Upstream::Link(up) => {
                    prop_assert!(up < index, "upstream {} after link {}", up, index);
                    prop_assert!(side[up].offset < link.offset);
                }
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn settle_plan_is_well_formed((layout, pivot) in layout_strategy()) {
        let pivot = TileId::new(pivot);
        let plan = ChainBuilder::new(&layout).settle_plan(pivot);
        check_structure(&plan, pivot)?;
        // Every other tile reacts, on one side or the other, except those
        // sharing the pivot's grid column.
        prop_assert!(plan.len() < layout.len());
        for link in plan.toward_start.iter().chain(&plan.toward_end) {
            prop_assert_eq!(link.visible, layout.is_on_screen(link.tile, 0.0));
        }
    }

    #[test]
    fn reflow_plan_is_well_formed((mut layout, victim) in layout_strategy()) {
        let victim = TileId::new(victim);
        let removal = layout.remove_tile(victim).expect("victim is laid out");
        prop_assert!(!layout.contains(victim));

        let plan = ChainBuilder::new(&layout).reflow_plan(&removal);
        check_structure(&plan, victim)?;
        let idle_side = match removal.gap.moving {
            ChainDirection::TowardStart => &plan.toward_end,
            ChainDirection::TowardEnd => &plan.toward_start,
        };
        prop_assert!(idle_side.is_empty());
        for link in plan.side(removal.gap.moving) {
            prop_assert!(layout.contains(link.tile));
        }
    }

    #[test]
    fn link_damping_grows_linearly(
        params in params_strategy(),
        offset in 0u32..20,
        additional in 0.0f64..0.2,
    ) {
        let linked = link_params(params, offset, additional);
        prop_assert_eq!(linked.stiffness(), params.stiffness());
        let expected = params.damping_ratio() + f64::from(offset) * additional;
        prop_assert!((linked.damping_ratio() - expected).abs() < 1e-12);
    }

    #[test]
    fn followers_chase_their_upstream(
        (layout, pivot) in layout_strategy(),
        params in params_strategy(),
        seed in -3_000.0f64..3_000.0,
        frames in 1usize..40,
    ) {
        let plan = ChainBuilder::new(&layout).settle_plan(TileId::new(pivot));
        let mut chain = SpringChain::from_plan(
            Axis::Secondary,
            Spring::resting(params, 0.0),
            &plan,
            |planned| Spring::resting(link_params(params, planned.offset, 0.05), 0.0),
            |_| false,
        );
        chain.root_mut().launch(seed);
        for _ in 0..frames {
            chain.step(MS_16);
            for link in chain.links() {
                let upstream = match link.upstream() {
                    Upstream::Root => chain.root().position(),
                    Upstream::Link(index) => chain.links()[index].value(),
                };
                prop_assert_eq!(link.target(), upstream);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn dismiss_always_completes(
        (layout, pivot) in layout_strategy(),
        velocity in -4_000.0f64..4_000.0,
        distance in prop_oneof![-600.0f64..-150.0, 150.0f64..600.0],
    ) {
        let pivot = TileId::new(pivot);
        let survivors: Vec<TileId> = layout
            .tiles()
            .iter()
            .map(|tile| tile.id)
            .filter(|&id| id != pivot)
            .collect();
        let mut engine =
            Choreographer::new(layout, RecordingSink::new(), MotionConfig::default()).unwrap();
        let handle = engine
            .release(DragRelease::new(pivot, distance).dismissing().with_velocity(velocity))
            .unwrap();

        prop_assert!(run_until_idle(&mut engine, 5_000).is_some());
        prop_assert!(handle.is_finished());
        prop_assert_eq!(engine.sink().removals(), vec![pivot]);
        prop_assert!(!engine.layout().contains(pivot));
        prop_assert!(
            engine
                .sink()
                .completions()
                .contains(&(handle.id(), Completion::Dismissed))
        );
        for tile in survivors {
            prop_assert_eq!(engine.offset(tile, Axis::Primary), 0.0);
            prop_assert_eq!(engine.offset(tile, Axis::Secondary), 0.0);
        }
    }
}

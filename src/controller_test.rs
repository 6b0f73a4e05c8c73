#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::{ZOOM_MAX, ZOOM_MIN};
use crate::fake::{FakeDocument, NodeId, SLIDE_RECT};
use crate::geometry::Rect;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn flags() -> InputFlags {
    InputFlags::default()
}

fn center() -> Point {
    SLIDE_RECT.center()
}

/// A deck of `slides` top-level slides with the first marked present, and an armed controller.
fn armed(slides: usize) -> (FakeDocument, Vec<NodeId>, ViewportController<NodeId>) {
    let doc = FakeDocument::new();
    let ids = doc.show_deck(slides);
    doc.set_present(ids[0], true);
    let mut controller = ViewportController::new();
    assert!(controller.arm(&doc));
    (doc, ids, controller)
}

fn zoom_in(doc: &FakeDocument, controller: &mut ViewportController<NodeId>, at: Point) -> Handled {
    controller.on_wheel(doc, at, WheelDelta::vertical(-100.0), flags())
}

// =============================================================
// Slide resolution
// =============================================================

#[test]
fn resolve_prefers_present_top_level_slide() {
    let doc = FakeDocument::new();
    let ids = doc.show_deck(3);
    doc.set_present(ids[1], true);
    let root = doc.root().unwrap_or(ids[0]);
    assert_eq!(resolve_current_slide(&doc, &root), Some(ids[1]));
}

#[test]
fn resolve_falls_back_to_first_slide() {
    let doc = FakeDocument::new();
    let ids = doc.show_deck(3);
    let root = doc.root().unwrap_or(ids[0]);
    assert_eq!(resolve_current_slide(&doc, &root), Some(ids[0]));
}

#[test]
fn resolve_prefers_present_nested_slide() {
    let doc = FakeDocument::new();
    let ids = doc.show_deck(2);
    doc.set_present(ids[1], true);
    let nested = doc.add_nested(ids[1], 3);
    doc.set_present(nested[2], true);
    let root = doc.root().unwrap_or(ids[0]);
    assert_eq!(resolve_current_slide(&doc, &root), Some(nested[2]));
}

#[test]
fn resolve_ignores_nested_without_present() {
    let doc = FakeDocument::new();
    let ids = doc.show_deck(1);
    doc.add_nested(ids[0], 2);
    let root = doc.root().unwrap_or(ids[0]);
    assert_eq!(resolve_current_slide(&doc, &root), Some(ids[0]));
}

#[test]
fn resolve_empty_deck_is_none() {
    let doc = FakeDocument::new();
    doc.show_deck(0);
    let Some(root) = doc.root() else {
        panic!("deck should have a root");
    };
    assert_eq!(resolve_current_slide(&doc, &root), None);
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn arm_without_root_stays_disarmed() {
    let doc = FakeDocument::new();
    let mut controller: ViewportController<NodeId> = ViewportController::new();
    assert!(!controller.arm(&doc));
    assert!(!controller.is_armed());
}

#[test]
fn arm_binds_root_and_current_slide() {
    let (doc, ids, controller) = armed(2);
    assert!(controller.is_armed());
    assert_eq!(controller.root().copied(), doc.root());
    assert_eq!(controller.slide(), Some(&ids[0]));
    assert!(controller.transform().is_identity());
}

#[test]
fn arm_twice_is_noop() {
    let (doc, ids, mut controller) = armed(2);
    zoom_in(&doc, &mut controller, Point::new(500.0, 300.0));
    let before = controller.transform();
    doc.navigate_to(ids[1]);
    assert!(controller.arm(&doc));
    assert_eq!(controller.transform(), before);
    assert_eq!(controller.slide(), Some(&ids[0]));
}

#[test]
fn disarm_resets_and_clears_styles() {
    let (doc, ids, mut controller) = armed(1);
    zoom_in(&doc, &mut controller, Point::new(100.0, 100.0));
    controller.on_pointer_down(&doc, Point::new(10.0, 10.0), Button::Primary, flags());
    controller.on_pointer_move(&doc, Point::new(30.0, 50.0));
    assert!(doc.has_styles(ids[0]));
    assert!(doc.body_has_class(PANNING_CLASS));

    controller.disarm(&doc);

    assert!(!controller.is_armed());
    assert!(controller.transform().is_identity());
    assert_eq!(controller.pointer(), PointerState::Idle);
    assert_eq!(controller.slide(), None);
    assert!(!doc.has_styles(ids[0]));
    assert!(!doc.body_has_class(PANNING_CLASS));
}

#[test]
fn disarm_when_disarmed_is_noop() {
    let doc = FakeDocument::new();
    let mut controller: ViewportController<NodeId> = ViewportController::new();
    controller.disarm(&doc);
    assert!(!controller.is_armed());
}

#[test]
fn disarmed_controller_ignores_input() {
    let doc = FakeDocument::new();
    doc.show_deck(1);
    let mut controller: ViewportController<NodeId> = ViewportController::new();
    assert_eq!(zoom_in(&doc, &mut controller, center()), Handled::IGNORED);
    assert_eq!(
        controller.on_pointer_down(&doc, center(), Button::Primary, flags()),
        Handled::IGNORED
    );
    assert_eq!(controller.on_context_menu(&doc, flags()), Handled::IGNORED);
    assert!(controller.transform().is_identity());
}

// =============================================================
// Zoom
// =============================================================

#[test]
fn wheel_at_center_zooms_without_translation() {
    let (doc, ids, mut controller) = armed(1);
    let handled = zoom_in(&doc, &mut controller, Point::new(400.0, 300.0));

    assert_eq!(handled, Handled::CONSUMED);
    let t = controller.transform();
    assert!(approx_eq(t.scale, 1.1));
    assert_eq!(t.translate_x, 0.0);
    assert_eq!(t.translate_y, 0.0);
    assert_eq!(doc.style(ids[0], StyleProperty::Translate).as_deref(), Some("0px 0px"));
    assert_eq!(
        doc.style(ids[0], StyleProperty::TransformOrigin).as_deref(),
        Some(TRANSFORM_ORIGIN_CENTER)
    );
    assert!(doc.style(ids[0], StyleProperty::Scale).is_some());
}

#[test]
fn wheel_keeps_point_under_cursor_fixed_across_steps() {
    let (doc, ids, mut controller) = armed(1);
    let cursor = Point::new(650.0, 120.0);

    // Content point under the cursor, measured from the layout center.
    let layout_center = SLIDE_RECT.center();
    let content = cursor.offset_from(layout_center);

    for delta in [-100.0, -100.0, -240.0, 60.0, -30.0] {
        controller.on_wheel(&doc, cursor, WheelDelta::vertical(delta), flags());
        let t = controller.transform();
        let screen_x = layout_center.x + t.translate_x + content.x * t.scale;
        let screen_y = layout_center.y + t.translate_y + content.y * t.scale;
        assert!(approx_eq(screen_x, cursor.x), "x drifted to {screen_x}");
        assert!(approx_eq(screen_y, cursor.y), "y drifted to {screen_y}");
    }
    assert!(doc.has_styles(ids[0]));
}

#[test]
fn wheel_zoom_saturates_at_bounds() {
    let (doc, _ids, mut controller) = armed(1);
    for _ in 0..100 {
        controller.on_wheel(&doc, Point::new(300.0, 200.0), WheelDelta::vertical(-400.0), flags());
    }
    assert_eq!(controller.transform().scale, ZOOM_MAX);
    for _ in 0..200 {
        controller.on_wheel(&doc, Point::new(300.0, 200.0), WheelDelta::vertical(400.0), flags());
    }
    assert_eq!(controller.transform().scale, ZOOM_MIN);
}

#[test]
fn wheel_with_zoom_disabled_is_ignored() {
    let (doc, ids, mut controller) = armed(1);
    let no_zoom = InputFlags { zoom_enabled: false, ..flags() };
    let handled = controller.on_wheel(&doc, center(), WheelDelta::vertical(-100.0), no_zoom);
    assert_eq!(handled, Handled::IGNORED);
    assert!(controller.transform().is_identity());
    assert!(!doc.has_styles(ids[0]));
}

#[test]
fn wheel_without_slide_is_swallowed_without_effect() {
    let doc = FakeDocument::new();
    doc.show_deck(0);
    let mut controller: ViewportController<NodeId> = ViewportController::new();
    assert!(controller.arm(&doc));
    assert_eq!(controller.slide(), None);

    assert_eq!(zoom_in(&doc, &mut controller, center()), Handled::CONSUMED);
    assert!(controller.transform().is_identity());
}

#[test]
fn wheel_at_max_scale_does_not_rewrite_styles() {
    let (doc, ids, mut controller) = armed(1);
    for _ in 0..60 {
        zoom_in(&doc, &mut controller, center());
    }
    doc.fail_writes(true);
    // Saturated: no change, so no write is attempted and nothing is logged as failed.
    assert_eq!(zoom_in(&doc, &mut controller, center()), Handled::CONSUMED);
    doc.fail_writes(false);
    assert_eq!(doc.style(ids[0], StyleProperty::Scale).as_deref(), Some("10"));
}

// =============================================================
// Pan
// =============================================================

#[test]
fn drag_pans_by_exact_pointer_delta() {
    let (doc, ids, mut controller) = armed(1);
    let down = controller.on_pointer_down(&doc, Point::new(100.0, 100.0), Button::Primary, flags());
    assert_eq!(down, Handled::CONSUMED);
    assert!(controller.pointer().is_panning());
    assert!(doc.body_has_class(PANNING_CLASS));

    controller.on_pointer_move(&doc, Point::new(130.0, 90.0));
    controller.on_pointer_move(&doc, Point::new(175.0, 160.0));
    controller.on_pointer_up(&doc);

    let t = controller.transform();
    assert_eq!(t.translate_x, 75.0);
    assert_eq!(t.translate_y, 60.0);
    assert_eq!(t.scale, 1.0);
    assert!(!controller.pointer().is_panning());
    assert!(!doc.body_has_class(PANNING_CLASS));
    assert_eq!(doc.style(ids[0], StyleProperty::Translate).as_deref(), Some("75px 60px"));
}

#[test]
fn pan_rate_is_independent_of_zoom() {
    let (doc, _ids, mut controller) = armed(1);
    for _ in 0..5 {
        zoom_in(&doc, &mut controller, center());
    }
    let before = controller.transform();
    controller.on_pointer_down(&doc, Point::new(0.0, 0.0), Button::Primary, flags());
    controller.on_pointer_move(&doc, Point::new(40.0, -25.0));
    let after = controller.transform();
    assert!(approx_eq(after.translate_x - before.translate_x, 40.0));
    assert!(approx_eq(after.translate_y - before.translate_y, -25.0));
    assert_eq!(after.scale, before.scale);
}

#[test]
fn move_without_press_does_nothing() {
    let (doc, ids, mut controller) = armed(1);
    controller.on_pointer_move(&doc, Point::new(300.0, 300.0));
    assert!(controller.transform().is_identity());
    assert!(!doc.has_styles(ids[0]));
}

#[test]
fn secondary_and_middle_press_do_not_pan() {
    let (doc, _ids, mut controller) = armed(1);
    for button in [Button::Secondary, Button::Middle] {
        let handled = controller.on_pointer_down(&doc, Point::new(1.0, 1.0), button, flags());
        assert_eq!(handled, Handled::IGNORED);
        assert!(!controller.pointer().is_panning());
    }
}

#[test]
fn press_with_pan_disabled_is_ignored() {
    let (doc, _ids, mut controller) = armed(1);
    let no_pan = InputFlags { pan_enabled: false, ..flags() };
    let handled = controller.on_pointer_down(&doc, Point::new(1.0, 1.0), Button::Primary, no_pan);
    assert_eq!(handled, Handled::IGNORED);
    assert!(!controller.pointer().is_panning());
    assert!(!doc.body_has_class(PANNING_CLASS));
}

#[test]
fn release_without_drag_is_harmless() {
    let (doc, _ids, mut controller) = armed(1);
    assert_eq!(controller.on_pointer_up(&doc), Handled::IGNORED);
    assert_eq!(controller.pointer(), PointerState::Idle);
}

#[test]
fn pan_without_slide_tracks_baseline_only() {
    let doc = FakeDocument::new();
    doc.show_deck(0);
    let mut controller: ViewportController<NodeId> = ViewportController::new();
    controller.arm(&doc);
    controller.on_pointer_down(&doc, Point::new(0.0, 0.0), Button::Primary, flags());
    controller.on_pointer_move(&doc, Point::new(50.0, 50.0));
    assert!(controller.transform().is_identity());
    assert_eq!(
        controller.pointer(),
        PointerState::Panning { last_screen: Point::new(50.0, 50.0) }
    );
}

// =============================================================
// Reset
// =============================================================

#[test]
fn context_menu_resets_transform() {
    let (doc, ids, mut controller) = armed(1);
    zoom_in(&doc, &mut controller, Point::new(600.0, 450.0));
    controller.on_pointer_down(&doc, Point::new(0.0, 0.0), Button::Primary, flags());
    controller.on_pointer_move(&doc, Point::new(20.0, 20.0));

    assert_eq!(controller.on_context_menu(&doc, flags()), Handled::CONSUMED);

    assert!(controller.transform().is_identity());
    assert!(!controller.pointer().is_panning());
    assert!(!doc.has_styles(ids[0]));
    assert!(!doc.body_has_class(PANNING_CLASS));
}

#[test]
fn context_menu_with_pan_and_zoom_disabled_is_ignored() {
    let (doc, _ids, mut controller) = armed(1);
    zoom_in(&doc, &mut controller, Point::new(600.0, 450.0));
    let off = InputFlags { pan_enabled: false, zoom_enabled: false, key_remap_enabled: false };
    assert_eq!(controller.on_context_menu(&doc, off), Handled::IGNORED);
    assert!(!controller.transform().is_identity());
}

#[test]
fn context_menu_with_only_pan_enabled_resets() {
    let (doc, _ids, mut controller) = armed(1);
    let pan_only = InputFlags { zoom_enabled: false, ..flags() };
    assert_eq!(controller.on_context_menu(&doc, pan_only), Handled::CONSUMED);
}

#[test]
fn reset_survives_refused_writes() {
    let (doc, _ids, mut controller) = armed(1);
    zoom_in(&doc, &mut controller, Point::new(600.0, 450.0));
    doc.fail_writes(true);
    controller.reset(&doc);
    assert!(controller.transform().is_identity());
}

// =============================================================
// Slide changes
// =============================================================

#[test]
fn slide_change_resets_old_slide_and_binds_new_one() {
    let (doc, ids, mut controller) = armed(3);
    zoom_in(&doc, &mut controller, Point::new(500.0, 100.0));
    assert!(doc.has_styles(ids[0]));

    doc.navigate_to(ids[2]);
    controller.on_slide_changed(&doc);

    assert!(!doc.has_styles(ids[0]));
    assert_eq!(controller.slide(), Some(&ids[2]));
    assert!(controller.transform().is_identity());

    zoom_in(&doc, &mut controller, center());
    assert!(doc.has_styles(ids[2]));
    assert!(!doc.has_styles(ids[0]));
}

#[test]
fn slide_change_mid_drag_ends_drag() {
    let (doc, ids, mut controller) = armed(2);
    controller.on_pointer_down(&doc, Point::new(0.0, 0.0), Button::Primary, flags());
    controller.on_pointer_move(&doc, Point::new(10.0, 10.0));

    doc.navigate_to(ids[1]);
    controller.on_slide_changed(&doc);

    assert!(!controller.pointer().is_panning());
    assert!(!doc.body_has_class(PANNING_CLASS));
    controller.on_pointer_move(&doc, Point::new(90.0, 90.0));
    assert!(controller.transform().is_identity());
}

#[test]
fn slide_change_picks_nested_vertical_slide() {
    let (doc, ids, mut controller) = armed(2);
    let nested = doc.add_nested(ids[1], 2);
    doc.navigate_to(ids[1]);
    doc.set_present(nested[1], true);
    controller.on_slide_changed(&doc);
    assert_eq!(controller.slide(), Some(&nested[1]));
}

#[test]
fn engine_ready_binds_first_marked_slide() {
    let doc = FakeDocument::new();
    let ids = doc.show_deck(3);
    let mut controller = ViewportController::new();
    controller.arm(&doc);
    // Before the engine marks a slide, the first one is used.
    assert_eq!(controller.slide(), Some(&ids[0]));

    doc.set_present(ids[1], true);
    controller.on_slide_changed(&doc);
    assert_eq!(controller.slide(), Some(&ids[1]));
}

#[test]
fn slide_change_when_disarmed_is_noop() {
    let doc = FakeDocument::new();
    doc.show_deck(2);
    let mut controller: ViewportController<NodeId> = ViewportController::new();
    controller.on_slide_changed(&doc);
    assert!(!controller.is_armed());
    assert_eq!(controller.slide(), None);
}

#[test]
fn zoom_uses_visual_rect_of_moved_slide() {
    let (doc, ids, mut controller) = armed(1);
    doc.set_rect(ids[0], Rect::new(200.0, 100.0, 400.0, 300.0));
    // Center of the moved slide is (400, 250).
    zoom_in(&doc, &mut controller, Point::new(400.0, 250.0));
    let t = controller.transform();
    assert_eq!(t.translate_x, 0.0);
    assert_eq!(t.translate_y, 0.0);
}

// Integration tests for the scrollbar renderer against a recording canvas.
mod common;

use bowpad_config::Rgb;
use bowpad_docscroll::{
    Category, CustomDrawReply, CustomDrawRequest, DrawStage, IdentityLines, OverviewSettings,
    PixelPoint, PixelRect, ScrollBarKind, ScrollItem, ScrollOverviewRenderer, ScrollPalette,
    VisibleLineMap,
};

use common::{DrawOp, RecordingCanvas};

const RED: Rgb = Rgb::new(255, 0, 0);
const BLUE: Rgb = Rgb::new(0, 0, 255);
const GREEN: Rgb = Rgb::new(0, 255, 0);

fn request(bar: ScrollBarKind, item: ScrollItem, rect: PixelRect, hot: bool) -> CustomDrawRequest {
    CustomDrawRequest {
        stage: DrawStage::ItemPrePaint,
        bar,
        item,
        rect,
        hot,
    }
}

fn page(rect: PixelRect) -> CustomDrawRequest {
    request(ScrollBarKind::Vertical, ScrollItem::PageRegion, rect, false)
}

// ── Overview strip ─────────────────────────────────────────────────────

#[test]
fn test_strip_columns_and_marker() {
    let mut renderer = ScrollOverviewRenderer::default();
    let index = renderer.annotations_mut();
    index.set_total_lines(100);
    index.add_line_color(Category::Bookmark, 10, RED);
    index.add_line_color(Category::SearchMatch, 50, BLUE);
    renderer.set_current_position(20, GREEN);

    let strip = PixelRect::new(0, 0, 12, 100);
    let mut canvas = RecordingCanvas::default();
    let reply = renderer.handle_custom_draw(&page(strip), &IdentityLines, &mut canvas);

    assert_eq!(reply, CustomDrawReply::SkipDefault);
    let track = ScrollPalette::default().track;
    assert_eq!(
        canvas.rects(),
        vec![
            (strip, track),
            (PixelRect::new(0, 10, 4, 12), RED),
            (PixelRect::new(8, 50, 12, 52), BLUE),
            (PixelRect::new(0, 20, 12, 22), GREEN),
        ]
    );
}

#[test]
fn test_adjacent_same_color_rows_are_merged() {
    let mut renderer = ScrollOverviewRenderer::default();
    let index = renderer.annotations_mut();
    index.set_total_lines(1000);
    // lines 0, 5 and 9 land on pixel row 0
    for line in [0, 5, 9, 30] {
        index.add_line_color(Category::SelectionMatch, line, RED);
    }
    // row 4 is adjacent to row 3 but has a different color
    index.add_line_color(Category::SelectionMatch, 40, BLUE);
    // row 5 is adjacent to row 4 and has the same color
    index.add_line_color(Category::SelectionMatch, 50, BLUE);

    let mut canvas = RecordingCanvas::default();
    renderer.handle_custom_draw(&page(PixelRect::new(0, 0, 9, 100)), &IdentityLines, &mut canvas);

    let column: Vec<(i32, Rgb)> = canvas.rects()[1..]
        .iter()
        .filter(|(r, _)| r.left == 3)
        .map(|(r, c)| (r.top, *c))
        .collect();
    assert_eq!(column, vec![(0, RED), (3, RED), (4, BLUE)]);
}

#[test]
fn test_folded_annotations_draw_once_at_header() {
    let mut renderer = ScrollOverviewRenderer::default();
    let index = renderer.annotations_mut();
    index.set_total_lines(10);
    for line in [2, 3, 4] {
        index.add_line_color(Category::SearchMatch, line, RED);
    }
    let folds = VisibleLineMap::with_folds(10, &[(1, 4)]);

    let mut canvas = RecordingCanvas::default();
    renderer.handle_custom_draw(&page(PixelRect::new(0, 0, 3, 70)), &folds, &mut canvas);

    let marks: Vec<PixelRect> = canvas
        .rects()
        .into_iter()
        .filter(|(_, c)| *c == RED)
        .map(|(r, _)| r)
        .collect();
    assert_eq!(marks, vec![PixelRect::new(2, 10, 3, 12)]);
    assert_eq!(renderer.annotations().visible_lines(), 7);
}

#[test]
fn test_marker_is_drawn_last() {
    let mut renderer = ScrollOverviewRenderer::default();
    renderer.annotations_mut().set_total_lines(10);
    for category in Category::ALL {
        renderer.annotations_mut().add_line_color(category, 5, RED);
    }
    renderer.set_current_position(5, GREEN);

    let mut canvas = RecordingCanvas::default();
    renderer.handle_custom_draw(&page(PixelRect::new(0, 0, 30, 100)), &IdentityLines, &mut canvas);
    assert_eq!(
        canvas.ops.last(),
        Some(&DrawOp::Rect(PixelRect::new(0, 50, 30, 52), GREEN))
    );
}

#[test]
fn test_empty_document_paints_track_and_marker_only() {
    let mut renderer = ScrollOverviewRenderer::default();
    let mut canvas = RecordingCanvas::default();
    renderer.handle_custom_draw(&page(PixelRect::new(0, 0, 12, 50)), &IdentityLines, &mut canvas);
    assert_eq!(canvas.ops.len(), 2);
}

// ── Protocol replies ───────────────────────────────────────────────────

#[test]
fn test_inserted_buttons_use_default_drawing() {
    let mut renderer = ScrollOverviewRenderer::default();
    let mut canvas = RecordingCanvas::default();
    let req = request(
        ScrollBarKind::InsertedButtons,
        ScrollItem::Other,
        PixelRect::new(0, 0, 10, 10),
        false,
    );
    assert_eq!(
        renderer.handle_custom_draw(&req, &IdentityLines, &mut canvas),
        CustomDrawReply::DoDefault
    );
    assert!(canvas.ops.is_empty());
}

#[test]
fn test_pre_paint_skips_without_drawing() {
    let mut renderer = ScrollOverviewRenderer::default();
    let mut canvas = RecordingCanvas::default();
    let mut req = page(PixelRect::new(0, 0, 10, 10));
    req.stage = DrawStage::PrePaint;
    assert_eq!(
        renderer.handle_custom_draw(&req, &IdentityLines, &mut canvas),
        CustomDrawReply::SkipDefault
    );
    assert!(canvas.ops.is_empty());
}

#[test]
fn test_gripper_filled_with_gripper_color() {
    let palette = ScrollPalette::light();
    let mut renderer = ScrollOverviewRenderer::new(OverviewSettings::default(), palette.clone());
    let mut canvas = RecordingCanvas::default();
    let rect = PixelRect::new(100, 100, 117, 117);
    let mut req = request(ScrollBarKind::Gripper, ScrollItem::Other, rect, false);
    req.stage = DrawStage::PostPaint;
    renderer.handle_custom_draw(&req, &IdentityLines, &mut canvas);
    assert_eq!(canvas.ops, vec![DrawOp::Rect(rect, palette.gripper)]);
}

#[test]
fn test_canvas_failure_is_swallowed() {
    let mut renderer = ScrollOverviewRenderer::default();
    renderer.annotations_mut().set_total_lines(10);
    renderer.annotations_mut().add_line_color(Category::Bookmark, 1, RED);
    let mut canvas = RecordingCanvas::failing_after(1);
    let reply = renderer.handle_custom_draw(&page(PixelRect::new(0, 0, 12, 40)), &IdentityLines, &mut canvas);
    assert_eq!(reply, CustomDrawReply::SkipDefault);
    assert_eq!(canvas.ops.len(), 1);
    // the index was still brought up to date
    assert!(!renderer.annotations().is_dirty());
}

// ── Arrows and thumbs ──────────────────────────────────────────────────

#[test]
fn test_vertical_down_arrow_points_down() {
    let mut renderer = ScrollOverviewRenderer::default();
    let mut canvas = RecordingCanvas::default();
    let rect = PixelRect::new(0, 200, 16, 216);
    renderer.handle_custom_draw(
        &request(ScrollBarKind::Vertical, ScrollItem::LineRightDown, rect, false),
        &IdentityLines,
        &mut canvas,
    );
    let palette = ScrollPalette::default();
    assert_eq!(
        canvas.ops,
        vec![
            DrawOp::Rect(rect, palette.track),
            DrawOp::Triangle(
                [
                    PixelPoint::new(8, 214),
                    PixelPoint::new(2, 202),
                    PixelPoint::new(14, 202),
                ],
                palette.thumb_cold,
            ),
        ]
    );
}

#[test]
fn test_horizontal_left_arrow_points_left() {
    let mut renderer = ScrollOverviewRenderer::default();
    let mut canvas = RecordingCanvas::default();
    let rect = PixelRect::new(0, 0, 16, 16);
    renderer.handle_custom_draw(
        &request(ScrollBarKind::Horizontal, ScrollItem::LineLeftUp, rect, false),
        &IdentityLines,
        &mut canvas,
    );
    match &canvas.ops[1] {
        DrawOp::Triangle(points, _) => assert_eq!(points[0], PixelPoint::new(2, 8)),
        other => panic!("expected a triangle, got {other:?}"),
    }
}

#[test]
fn test_hot_thumb_animates_towards_hot_color() {
    let palette = ScrollPalette::dark();
    let mut renderer = ScrollOverviewRenderer::new(OverviewSettings::default(), palette.clone());
    let rect = PixelRect::new(0, 40, 16, 80);
    let req = request(ScrollBarKind::Vertical, ScrollItem::Thumb, rect, true);

    let mut canvas = RecordingCanvas::default();
    renderer.handle_custom_draw(&req, &IdentityLines, &mut canvas);
    match &canvas.ops[0] {
        DrawOp::Thumb(r, color, stroke) => {
            assert_eq!(*r, PixelRect::new(2, 42, 14, 78));
            assert_eq!(*color, palette.thumb_cold);
            assert_eq!(stroke.fill_alpha, 100);
        }
        other => panic!("expected a thumb, got {other:?}"),
    }

    assert!(renderer.tick(0.15));
    assert!(!renderer.tick(0.15));

    let mut canvas = RecordingCanvas::default();
    renderer.handle_custom_draw(&req, &IdentityLines, &mut canvas);
    assert!(matches!(&canvas.ops[0], DrawOp::Thumb(_, c, _) if *c == palette.thumb_hot));
}

#[test]
fn test_without_animation_colors_snap() {
    let settings = OverviewSettings {
        animations_available: false,
        ..OverviewSettings::default()
    };
    let palette = ScrollPalette::dark();
    let mut renderer = ScrollOverviewRenderer::new(settings, palette.clone());
    let rect = PixelRect::new(0, 0, 40, 16);
    let mut canvas = RecordingCanvas::default();
    renderer.handle_custom_draw(
        &request(ScrollBarKind::Horizontal, ScrollItem::Thumb, rect, true),
        &IdentityLines,
        &mut canvas,
    );
    assert_eq!(canvas.ops, vec![DrawOp::Rect(rect, palette.thumb_hot)]);
    assert!(!renderer.tick(0.016));
}

//! The literal scenarios from the design doc's testable-properties
//! section (S1-S6), driven end to end through `Context` against an
//! `ImageSurface`.

use raster2d::core::{Context, Status};
use raster2d::surface::{Format, ImageSurface, Surface};
use raster2d::tessellation::FillRule;
use std::rc::Rc;

fn pixel(surface: &ImageSurface, x: i32, y: i32) -> (u8, u8, u8, u8) {
    let image = surface.acquire_source_image().unwrap();
    let offset = (y * image.stride + x * 4) as usize;
    (image.data[offset + 2], image.data[offset + 1], image.data[offset], image.data[offset + 3])
}

#[test]
fn s1_fill_a_red_unit_square() {
    let surface = Rc::new(ImageSurface::create(Format::ARGB32, 10, 10));
    let mut cx = Context::new(surface.clone());
    cx.set_source_rgb(1.0, 0.0, 0.0);
    cx.rectangle(0.0, 0.0, 10.0, 10.0);
    cx.fill();
    assert_eq!(cx.status(), Status::Success);
    for y in 0..10 {
        for x in 0..10 {
            assert_eq!(pixel(&surface, x, y), (255, 0, 0, 255), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn s2_stroke_a_diagonal_with_butt_caps() {
    let surface = Rc::new(ImageSurface::create(Format::ARGB32, 10, 10));
    let mut cx = Context::new(surface.clone());
    cx.set_source_rgb(0.0, 0.0, 0.0);
    cx.set_line_width(2.0);
    cx.move_to(0.0, 0.0);
    cx.line_to(9.0, 9.0);
    cx.stroke();
    assert_eq!(cx.status(), Status::Success);
    // On-diagonal pixels are fully inked.
    assert_eq!(pixel(&surface, 4, 4).3, 255);
    // A corner far from the diagonal band is untouched.
    assert_eq!(pixel(&surface, 9, 0).3, 0);
    // Pixels straddling the stroke's edge are antialiased to a fractional
    // alpha rather than snapping to 0 or 255 — the "roughly 2 · cos(45°)"
    // band the scenario describes. The stroke's perpendicular half-width is
    // 1, so its edge runs along x - y = sqrt(2) ~= 1.414; pixel (6, 4),
    // whose cell spans x - y in [1, 3), straddles that boundary.
    let edge_alpha = pixel(&surface, 6, 4).3;
    assert!(edge_alpha > 0 && edge_alpha < 255, "expected a fractional alpha at the stroke edge, got {edge_alpha}");
}

#[test]
fn s3_even_odd_vs_winding_overlapping_squares() {
    let build = |surface: &Rc<ImageSurface>, rule: FillRule| {
        let mut cx = Context::new(surface.clone());
        cx.set_source_rgb(1.0, 1.0, 1.0);
        cx.set_fill_rule(rule);
        cx.rectangle(0.0, 0.0, 6.0, 6.0);
        cx.rectangle(3.0, 3.0, 6.0, 6.0);
        cx.fill();
        cx
    };

    let even_odd_surface = Rc::new(ImageSurface::create(Format::ARGB32, 10, 10));
    build(&even_odd_surface, FillRule::EvenOdd);
    // Intersection is a hole under even-odd.
    assert_eq!(pixel(&even_odd_surface, 4, 4).3, 0);
    // Symmetric difference is opaque.
    assert_eq!(pixel(&even_odd_surface, 1, 1).3, 255);
    assert_eq!(pixel(&even_odd_surface, 7, 7).3, 255);

    let winding_surface = Rc::new(ImageSurface::create(Format::ARGB32, 10, 10));
    build(&winding_surface, FillRule::Winding);
    // The union, including the intersection, is opaque under winding.
    assert_eq!(pixel(&winding_surface, 4, 4).3, 255);
}

#[test]
fn s4_dash_round_trip() {
    let surface = Rc::new(ImageSurface::create(Format::ARGB32, 10, 10));
    let mut cx = Context::new(surface.clone());
    cx.set_source_rgb(0.0, 0.0, 0.0);
    cx.set_line_width(1.0);
    cx.set_dash(vec![2.0, 2.0], 0.0);
    // Centerline at y=0.5 so the half-width-0.5 band covers [0, 1), landing
    // cleanly on row 0's pixel centers rather than straddling the edge.
    cx.move_to(0.0, 0.5);
    cx.line_to(10.0, 0.5);
    cx.stroke();
    assert_eq!(cx.status(), Status::Success);
    // First "on" dash covers x in [0, 2).
    assert_eq!(pixel(&surface, 1, 0).3, 255);
    // First gap covers x in [2, 4).
    assert_eq!(pixel(&surface, 2, 0).3, 0);
    // Second "on" dash covers x in [4, 6).
    assert_eq!(pixel(&surface, 5, 0).3, 255);
}

#[test]
fn s5_save_restore_with_clip() {
    let surface = Rc::new(ImageSurface::create(Format::ARGB32, 10, 10));
    let mut cx = Context::new(surface.clone());
    cx.save();
    cx.rectangle(0.0, 0.0, 5.0, 5.0);
    cx.clip();
    cx.set_source_rgb(1.0, 0.0, 0.0);
    cx.paint();
    cx.restore();
    cx.set_source_rgb(0.0, 0.0, 1.0);
    cx.paint();
    assert_eq!(cx.status(), Status::Success);
    // Restoring the clip means the second (unclipped) blue paint covers
    // the whole surface, painted over the red square underneath.
    assert_eq!(pixel(&surface, 1, 1), (0, 0, 255, 255));
    assert_eq!(pixel(&surface, 8, 8), (0, 0, 255, 255));
}

#[test]
fn s6_invalid_restore() {
    let surface = Rc::new(ImageSurface::create(Format::ARGB32, 10, 10));
    let mut cx = Context::new(surface.clone());
    cx.restore();
    assert_eq!(cx.status(), Status::InvalidRestore);
    cx.set_source_rgb(1.0, 0.0, 0.0);
    cx.paint();
    assert_eq!(pixel(&surface, 0, 0), (0, 0, 0, 0));
    assert_eq!(cx.status(), Status::InvalidRestore);
}

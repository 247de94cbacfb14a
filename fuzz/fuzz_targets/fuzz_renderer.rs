#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pasture::{Color, Renderer};

/// One drawing call.
#[derive(Arbitrary, Debug)]
enum Op {
    Set { x: i32, y: i32, depth: f32 },
    Line { x0: f32, y0: f32, x1: f32, y1: f32 },
    Rect { x: f32, y: f32, w: i8, h: i8 },
    Circle { x: f32, y: f32, r: u8 },
    Camera { x: f32, y: f32 },
    Clear,
}

/// Structured input for renderer fuzzing.
#[derive(Arbitrary, Debug)]
struct RenderInput {
    /// Frame width (capped).
    width: u8,
    /// Frame height (capped).
    height: u8,
    /// Calls to replay.
    ops: Vec<Op>,
}

/// Keep float coordinates near the frame so lines stay short.
fn near(v: f32) -> f32 {
    if v.is_finite() { v.clamp(-512.0, 512.0) } else { 0.0 }
}

fuzz_target!(|input: RenderInput| {
    let (w, h) = (u32::from(input.width % 64), u32::from(input.height % 64));
    let mut r = Renderer::new(w, h);
    let color = Color::rgb(1, 2, 3);

    for op in input.ops.iter().take(256) {
        match *op {
            Op::Set { x, y, depth } => r.set(x, y, color, depth),
            Op::Line { x0, y0, x1, y1 } => {
                r.line(near(x0), near(y0), near(x1), near(y1), color, 0.0);
            }
            Op::Rect { x, y, w, h } => {
                r.rectfill(near(x), near(y), i32::from(w), i32::from(h), color, 0.0);
            }
            Op::Circle { x, y, r: radius } => r.circfill(near(x), near(y), f32::from(radius), color, 0.0),
            Op::Camera { x, y } => r.camera(near(x), near(y)),
            Op::Clear => r.clear(),
        }
    }

    assert_eq!(r.pixels().len(), (w * h * 4) as usize);
    assert_eq!(r.depth().len(), (w * h) as usize);
});

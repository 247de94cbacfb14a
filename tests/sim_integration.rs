//! Integration tests: generated maps driven through the simulation and
//! drawn into the renderer, with and without atlases loaded from disk.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use glam::UVec2;
use image::{Rgba, RgbaImage};
use pasture::{
    AssetError, Color, GeneratorConfig, MoveInput, Renderer, SimConfig, Simulation, SpriteAtlas,
    generate_seeded,
};

const VIEW: UVec2 = UVec2::new(128, 96);
const DT: f32 = 1.0 / 60.0;

fn simulation(seed: u64) -> Simulation {
    let map = generate_seeded(64, 64, &GeneratorConfig::default(), seed).unwrap();
    Simulation::new(map, SimConfig::default(), seed)
}

/// Walk a square: right, down, left, up, a second each.
fn walk(frame: u32) -> MoveInput {
    match (frame / 60) % 4 {
        0 => MoveInput::from_keys(false, true, false, false),
        1 => MoveInput::from_keys(false, false, false, true),
        2 => MoveInput::from_keys(true, false, false, false),
        _ => MoveInput::from_keys(false, false, true, false),
    }
}

/// Write a sprite sheet where every frame is the same 16×16 block.
fn write_atlas(dir: &Path, sprites: &[(&str, usize)]) -> (std::path::PathBuf, std::path::PathBuf) {
    let png = dir.join("sprites.png");
    let meta = dir.join("sprites.json");
    RgbaImage::from_pixel(16, 16, Rgba([90, 60, 40, 255]))
        .save(&png)
        .unwrap();

    let sprites: serde_json::Map<String, serde_json::Value> = sprites
        .iter()
        .map(|&(name, frames)| (name.to_string(), serde_json::json!(vec!["block"; frames])))
        .collect();
    let json = serde_json::json!({
        "frames": { "block": { "frame": { "x": 0, "y": 0, "w": 16, "h": 16 } } },
        "sprites": sprites,
        "palette": { "timberwolf": [1, 2, 3, 255] },
    });
    fs::write(&meta, json.to_string()).unwrap();
    (png, meta)
}

#[test]
fn test_long_walk_keeps_invariants() {
    let mut sim = simulation(11);
    let mut renderer = Renderer::new(VIEW.x, VIEW.y);
    let sheep = sim.sheep().count();

    for frame in 0..1200 {
        sim.update(DT, walk(frame), VIEW);
        if frame % 30 == 0 {
            renderer.clear();
            sim.draw(&mut renderer).unwrap();
        }

        assert_eq!(sim.sheep().count(), sheep);
        assert!(sim.onscreen_sheep().count() <= sheep);
        assert!(sim.grass().len() <= sim.grass().capacity());
        assert!(sim.player().pos.is_finite());
        assert!(sim.critters().iter().all(|c| !c.is_expired()));
    }
    assert!((sim.elapsed() - 1200.0 * DT).abs() < 1e-2);
}

#[test]
fn test_same_seed_same_frames() {
    let mut a = simulation(5);
    let mut b = simulation(5);
    let mut ra = Renderer::new(VIEW.x, VIEW.y);
    let mut rb = Renderer::new(VIEW.x, VIEW.y);

    for frame in 0..240 {
        a.update(DT, walk(frame), VIEW);
        b.update(DT, walk(frame), VIEW);
        ra.clear();
        rb.clear();
        a.draw(&mut ra).unwrap();
        b.draw(&mut rb).unwrap();
        assert_eq!(ra.pixels(), rb.pixels(), "frame {frame} differs");
    }
    assert_eq!(a.player().pos, b.player().pos);
    assert_eq!(a.critters().len(), b.critters().len());
}

#[test]
fn test_draw_with_loaded_atlas() {
    let dir = tempfile::tempdir().unwrap();
    let (png, meta) = write_atlas(
        dir.path(),
        &[("player", 6), ("sheep", 6), ("birb", 4), ("wall", 2)],
    );
    let atlas = SpriteAtlas::load(&png, &meta).unwrap();

    let mut sim = simulation(21);
    let mut renderer = Renderer::new(VIEW.x, VIEW.y);
    renderer.set_sprites(Some(Arc::new(atlas)));

    let palette = sim.palette_for(&renderer);
    assert_eq!(palette.timberwolf, Color::rgba(1, 2, 3, 255));
    renderer.set_clear_color(palette.timberwolf);

    for frame in 0..120 {
        sim.update(DT, walk(frame), VIEW);
        renderer.clear();
        sim.draw(&mut renderer).unwrap();
    }

    // Every sprite is the same solid block
    let block = Color::rgb(90, 60, 40);
    let drawn = (0..VIEW.y)
        .flat_map(|y| (0..VIEW.x).map(move |x| (x, y)))
        .filter(|&(x, y)| renderer.pixel(x, y) == Some(block))
        .count();
    assert!(drawn > 0);
}

#[test]
fn test_atlas_without_player_sprite_fails_draw() {
    let dir = tempfile::tempdir().unwrap();
    let (png, meta) = write_atlas(dir.path(), &[("sheep", 6), ("birb", 4), ("wall", 2)]);
    let atlas = SpriteAtlas::load(&png, &meta).unwrap();

    let mut sim = simulation(3);
    let mut renderer = Renderer::new(VIEW.x, VIEW.y);
    renderer.set_sprites(Some(Arc::new(atlas)));
    sim.update(DT, MoveInput::NONE, VIEW);

    let err = sim.draw(&mut renderer).unwrap_err();
    assert!(
        matches!(&err, AssetError::MissingSprite { name } if name == "player"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_missing_atlas_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let (png, _) = write_atlas(dir.path(), &[("player", 6)]);
    let err = SpriteAtlas::load(&png, dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, AssetError::Io(_)));
}

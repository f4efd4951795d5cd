pub mod runner;

pub use runner::WorldRunner;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<WorldRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut WorldRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Create the world. `config_json` may be empty for defaults.
#[wasm_bindgen]
pub fn world_init(config_json: &str) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let mut runner = WorldRunner::default();
    let ok = config_json.trim().is_empty() || runner.init(config_json);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("drift: initialized");
    ok
}

#[wasm_bindgen]
pub fn world_configure(config_json: &str) -> bool {
    with_runner(|r| r.init(config_json)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn world_tick(dt: f64) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn world_spawn_box(
    kind: u32,
    collides_mask: u32,
    policy: u32,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    vx: f64,
    vy: f64,
) -> u32 {
    with_runner(|r| r.spawn_box(kind, collides_mask, policy, x, y, w, h, vx, vy)).unwrap_or(0)
}

#[wasm_bindgen]
pub fn world_despawn(id: u32) -> bool {
    with_runner(|r| r.despawn(id)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn world_clear() {
    with_runner(|r| r.clear());
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_snapshots_ptr() -> *const f32 {
    with_runner(|r| r.snapshots_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_snapshot_count() -> u32 {
    with_runner(|r| r.snapshot_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_snapshots() -> u32 {
    with_runner(|r| r.max_snapshots()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_entity_count() -> u32 {
    with_runner(|r| r.entity_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_collision_count() -> u32 {
    with_runner(|r| r.collision_count()).unwrap_or(0)
}

/// Ids removed during the last tick, copied into a fresh JS array.
#[wasm_bindgen]
pub fn get_removed_ids() -> js_sys::Uint32Array {
    with_runner(|r| js_sys::Uint32Array::from(r.removed_ids()))
        .unwrap_or_else(|| js_sys::Uint32Array::new_with_length(0))
}

#[wasm_bindgen]
pub fn get_world_width() -> f64 {
    with_runner(|r| r.world_width()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_world_height() -> f64 {
    with_runner(|r| r.world_height()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_alpha() -> f64 {
    with_runner(|r| r.alpha()).unwrap_or(0.0)
}

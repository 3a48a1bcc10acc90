use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use serde::Serialize;
use std::cell::RefCell;
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use controller::{FetchError, MapConfig, MapController, MapStatus};
use foundation::math::Vec2;
use foundation::time::Time;
use runtime::{RepeatingTask, Scheduler, TaskControl};
use scene::WheelMode;

mod clock;
mod dom;
mod pulse;

use clock::PageClock;
use dom::MapDom;

struct Viewer {
    controller: MapController,
    dom: MapDom,
}

struct PageState {
    viewer: Option<Viewer>,
    scheduler: Scheduler,
    clock: PageClock,
}

thread_local! {
    static STATE: RefCell<PageState> = RefCell::new(PageState {
        viewer: None,
        scheduler: Scheduler::new(),
        clock: PageClock::new(),
    });
}

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    status: &'a str,
    shapes: usize,
    skipped: usize,
    selected: Option<&'a str>,
    scale: f64,
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

/// Current page time on the `performance.now()` timeline, the one
/// `requestAnimationFrame` stamps frames with.
fn page_now_ms() -> Option<f64> {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
}

/// Current page time; without a performance timer the clock stays put.
fn observe_now() -> Time {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        match page_now_ms() {
            Some(ms) => s.clock.observe(ms),
            None => s.clock.now(),
        }
    })
}

/// Brings the map clock up to the page clock, runs `f` on the mounted map,
/// then pushes the resulting changes to the DOM.
fn with_viewer(f: impl FnOnce(&mut MapController)) -> Result<(), JsValue> {
    let now = observe_now();
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let Some(v) = s.viewer.as_mut() else {
            return Ok(());
        };
        v.controller.advance(now);
        f(&mut v.controller);
        v.dom.apply_events(&mut v.controller)?;
        let now = v.controller.now();
        v.dom.render_frame(&v.controller, now)
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Builds the map inside `#<container_id>` and starts fetching the
/// boundary dataset. `config_json` overrides fields of the default
/// configuration.
#[wasm_bindgen]
pub fn init_map(container_id: &str, config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => MapConfig::from_json_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => MapConfig::default(),
    };
    let registry = registry::builtin::space_programs().map_err(|e| JsValue::from_str(&e.to_string()))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let Some(container) = document.get_element_by_id(container_id) else {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "#{container_id} not found; skipping world map init."
        )));
        return Ok(());
    };

    let url = config.dataset_url.clone();
    let mut controller = MapController::new(Arc::new(registry), config);
    controller.advance(observe_now());
    let dom = MapDom::mount(document, &container, &controller)?;
    STATE.with(|state| {
        state.borrow_mut().viewer = Some(Viewer { controller, dom });
    });

    spawn_local(async move {
        let fetched = fetch_dataset(&url).await;
        let result = with_viewer(|map| {
            if let Ok(count) = map.load_dataset(fetched.as_deref().map_err(Clone::clone)) {
                log(&format!("world map: {count} countries drawn"));
            }
        });
        if let Err(err) = result {
            log(&format!("world map render error: {err:?}"));
        }
    });
    Ok(())
}

async fn fetch_dataset(url: &str) -> Result<String, FetchError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| FetchError(e.to_string()))?;
    if !resp.ok() {
        return Err(FetchError(format!("HTTP {}", resp.status())));
    }
    resp.text().await.map_err(|e| FetchError(e.to_string()))
}

/// Pointer entered the country path carrying `data-index = index`.
/// Coordinates are relative to the map container.
#[wasm_bindgen]
pub fn pointer_enter(index: usize, x: f64, y: f64) -> Result<(), JsValue> {
    with_viewer(|map| map.pointer_enter(index, Vec2::new(x, y)))
}

#[wasm_bindgen]
pub fn pointer_move(x: f64, y: f64) -> Result<(), JsValue> {
    with_viewer(|map| map.pointer_move(Vec2::new(x, y)))
}

#[wasm_bindgen]
pub fn pointer_leave(index: usize) -> Result<(), JsValue> {
    with_viewer(|map| map.pointer_leave(index))
}

#[wasm_bindgen]
pub fn click(index: usize) -> Result<(), JsValue> {
    with_viewer(|map| map.click(index))
}

/// Wheel zoom; `x`/`y` in viewBox units, `delta_mode` as in `WheelEvent`.
#[wasm_bindgen]
pub fn wheel(x: f64, y: f64, delta_y: f64, delta_mode: u32, ctrl_key: bool) -> Result<(), JsValue> {
    with_viewer(|map| map.wheel(Vec2::new(x, y), delta_y, WheelMode::from_dom(delta_mode), ctrl_key))
}

/// Drag pan by a delta in viewBox units.
#[wasm_bindgen]
pub fn drag(dx: f64, dy: f64) -> Result<(), JsValue> {
    with_viewer(|map| map.drag(Vec2::new(dx, dy)))
}

/// Index of the country under a viewBox point.
#[wasm_bindgen]
pub fn pick(x: f64, y: f64) -> Option<u32> {
    STATE.with(|state| {
        let s = state.borrow();
        let v = s.viewer.as_ref()?;
        v.controller.shape_at(Vec2::new(x, y)).map(|i| i as u32)
    })
}

/// Advances the page clock (call once per animation frame with the
/// `requestAnimationFrame` timestamp) and returns whether the map is still
/// animating.
#[wasm_bindgen]
pub fn frame(now_ms: f64) -> Result<bool, JsValue> {
    let frame = STATE.with(|state| state.borrow_mut().clock.frame(now_ms));

    // Task bodies may call back into the page; run them without holding STATE.
    let mut scheduler = STATE.with(|state| std::mem::take(&mut state.borrow_mut().scheduler));
    scheduler.tick(frame);
    STATE.with(|state| state.borrow_mut().scheduler = scheduler);

    with_viewer(|_| {})?;
    Ok(STATE.with(|state| {
        state
            .borrow()
            .viewer
            .as_ref()
            .is_some_and(|v| v.controller.is_animating())
    }))
}

/// Pulses the opacity of the first element matching `selector` until the
/// element leaves the document or the page is torn down.
#[wasm_bindgen]
pub fn start_scroll_pulse(selector: &str) -> Result<bool, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let Some(element) = document.query_selector(selector)? else {
        return Ok(false);
    };
    let started = observe_now();
    let task = RepeatingTask::new("scroll-pulse", 0.0, move |frame| {
        if !element.is_connected() {
            return TaskControl::Stop;
        }
        let opacity = pulse::pulse_opacity(frame.time.0 - started.0);
        match element.set_attribute("style", &format!("opacity:{opacity:.3}")) {
            Ok(()) => TaskControl::Continue,
            Err(_) => TaskControl::Stop,
        }
    });
    STATE.with(|state| state.borrow_mut().scheduler.add_task(task, started));
    Ok(true)
}

/// Stops every repeating task; call from `pagehide`/`beforeunload`.
#[wasm_bindgen]
pub fn teardown() -> usize {
    let stopped = STATE.with(|state| state.borrow_mut().scheduler.teardown());
    if stopped > 0 {
        log(&format!("stopped {stopped} page tasks"));
    }
    stopped
}

/// JSON summary of the map state, for debugging from the console.
#[wasm_bindgen]
pub fn map_status() -> String {
    STATE.with(|state| {
        let s = state.borrow();
        let Some(v) = s.viewer.as_ref() else {
            return "null".to_string();
        };
        let map = &v.controller;
        let status = match map.status() {
            MapStatus::Pending => "pending",
            MapStatus::Ready => "ready",
            MapStatus::Fallback { .. } => "fallback",
        };
        let report = StatusReport {
            status,
            shapes: map.shapes().len(),
            skipped: map.skipped().len(),
            selected: map
                .selected()
                .and_then(|i| map.shape(i))
                .and_then(|shape| shape.record.as_ref())
                .map(|r| r.name.as_str()),
            scale: map.view().k,
        };
        serde_json::to_string(&report).unwrap_or_else(|_| "null".to_string())
    })
}

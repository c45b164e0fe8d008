//! Browser-facing wrapper around `RouteMapState`.
//!
//! Inputs and outputs cross the boundary as JSON strings. Selection goes
//! through the host: `click` hands the request to a host callback that
//! returns a promise, and the graph is only updated once that promise
//! resolves.

use crate::logging::log;
use crate::overlay::MapViewport;
use crate::selection::{ClickModifiers, SelectionRequest};
use crate::state::{RouteMapState, ViewEvent};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Failed to serialize: {e}")))
}

fn from_json<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Failed to parse {what}: {e}")))
}

#[wasm_bindgen]
pub struct RouteMapVisual {
    state: Rc<RefCell<RouteMapState>>,
}

impl Default for RouteMapVisual {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl RouteMapVisual {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        Self {
            state: Rc::new(RefCell::new(RouteMapState::new())),
        }
    }

    /// Rebuild from a data update. Returns the build generation.
    ///
    /// # Errors
    ///
    /// Returns an error if either document fails to parse
    pub fn update(&self, table_json: &str, settings_json: &str) -> Result<f64, JsValue> {
        let generation = self
            .state
            .borrow_mut()
            .update_from_json(table_json, settings_json)
            .map_err(|e| JsValue::from_str(&e))?;
        #[allow(clippy::cast_precision_loss)]
        Ok(generation as f64)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn arcs(&self) -> Result<String, JsValue> {
        to_json(&self.state.borrow().arc_descriptors())
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn markers(&self) -> Result<String, JsValue> {
        to_json(&self.state.borrow().marker_descriptors())
    }

    /// Labels and arrowheads after a map event (`reset`, `zoomStart`,
    /// `zoomEnd`, `moveEnd`)
    ///
    /// # Errors
    ///
    /// Returns an error if the event or viewport cannot be parsed
    #[wasm_bindgen(js_name = viewChanged)]
    pub fn view_changed(&self, event: &str, viewport_json: &str) -> Result<String, JsValue> {
        let event: ViewEvent = from_json(&format!("\"{event}\""), "view event")?;
        let viewport: MapViewport = from_json(viewport_json, "viewport")?;
        let overlay = self.state.borrow_mut().view_changed(event, viewport);
        to_json(&overlay)
    }

    /// Viewport fitting every arc, or `null` when there are none
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    #[wasm_bindgen(js_name = fitView)]
    pub fn fit_view(&self, width: f64, height: f64, padding: f64, max_zoom: f64) -> Result<String, JsValue> {
        to_json(&self.state.borrow().fit_view(width, height, padding, max_zoom))
    }

    /// Handle a click on a marker (`kind = "marker"`), an arc (`"arc"`) or the
    /// map background (anything else).
    ///
    /// `host_select` receives the request JSON and returns a promise. The
    /// returned promise resolves to the JSON list of visual changes, which is
    /// empty when the click needs no host call.
    pub fn click(
        &self,
        kind: &str,
        key: &str,
        multi_select: bool,
        default_prevented: bool,
        host_select: js_sys::Function,
    ) -> js_sys::Promise {
        let mut modifiers = ClickModifiers::empty();
        modifiers.set(ClickModifiers::MULTI_SELECT, multi_select);
        modifiers.set(ClickModifiers::DEFAULT_PREVENTED, default_prevented);

        let request = {
            let state = self.state.borrow();
            match kind {
                "marker" => state.marker_clicked(key, modifiers),
                "arc" => state.arc_clicked(key, modifiers),
                _ => state.background_clicked(modifiers),
            }
        };

        let state = Rc::clone(&self.state);
        future_to_promise(async move {
            let Some(request) = request else {
                return Ok(JsValue::from_str("[]"));
            };
            let deltas = confirm_and_commit(&state, &request, &host_select).await?;
            Ok(JsValue::from_str(&deltas))
        })
    }
}

async fn confirm_and_commit(
    state: &Rc<RefCell<RouteMapState>>,
    request: &SelectionRequest,
    host_select: &js_sys::Function,
) -> Result<String, JsValue> {
    let request_json = JsValue::from_str(&to_json(request)?);
    let promise: js_sys::Promise = host_select
        .call1(&JsValue::NULL, &request_json)?
        .dyn_into()
        .map_err(|_| JsValue::from_str("Host selection did not return a promise"))?;

    if let Err(err) = JsFuture::from(promise).await {
        web_sys::console::warn_1(&JsValue::from_str("Host rejected selection request"));
        return Err(err);
    }

    let deltas = state.borrow_mut().commit(request);
    log!("Committed selection: {} visual changes", deltas.len());
    to_json(&deltas)
}

//! WASM bindings for the cropper session.
//!
//! The host wires pointer and slider events to a `Cropper` instance and
//! passes `onSave` / `onCancel` callbacks at construction. `onSave` receives
//! the avatar as a `data:` URL.
//!
//! # Example
//!
//! ```typescript
//! import { Cropper, probe_image_size } from '@avatar-crop/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const [w, h] = probe_image_size(bytes);
//! const cropper = new Cropper({ outputSize: 200 }, w, h,
//!   (url) => setAvatar(url),
//!   () => closeModal());
//!
//! el.onpointerdown = (e) => cropper.beginDrag(e.clientX, e.clientY);
//! el.onpointermove = (e) => { cropper.updateDrag(e.clientX, e.clientY); redraw(cropper.previewTransform()); };
//! el.onpointerup = () => cropper.endDrag();
//! slider.oninput = () => cropper.setZoom(parseFloat(slider.value));
//!
//! saveButton.onclick = async () => {
//!   const ticket = cropper.beginConfirm();
//!   const source = new Uint8Array(await (await fetch(url)).arrayBuffer());
//!   try { cropper.finishConfirm(ticket, source); } catch (e) { showError(e); }
//! };
//! ```
//!
//! `onSave` and `onCancel` run after the cropper has released its state, so
//! they may read from or call back into the cropper.

use std::cell::RefCell;

use avatar_crop_core::{
    decode, ConfirmOutcome, CropError, CropHandler, CropSession, CropperConfig, DecodeTicket,
    EncodedImage, Point,
};
use js_sys::Function;
use wasm_bindgen::prelude::*;

/// Session result waiting to be handed to JS.
enum Outcome {
    Saved(EncodedImage),
    Cancelled,
}

/// Holds the session result until the session borrow is released.
#[derive(Default)]
struct Outbox {
    pending: Option<Outcome>,
}

impl CropHandler for Outbox {
    fn on_save(&mut self, image: EncodedImage) {
        self.pending = Some(Outcome::Saved(image));
    }

    fn on_cancel(&mut self) {
        self.pending = Some(Outcome::Cancelled);
    }
}

/// The host's `onSave` / `onCancel` functions.
struct JsCallbacks {
    on_save: Function,
    on_cancel: Function,
}

impl JsCallbacks {
    fn deliver(&self, outcome: Outcome) {
        let result = match outcome {
            Outcome::Saved(image) => {
                let url = JsValue::from_str(&image.to_data_url());
                self.on_save.call1(&JsValue::NULL, &url)
            }
            Outcome::Cancelled => self.on_cancel.call0(&JsValue::NULL),
        };

        if let Err(err) = result {
            web_sys::console::error_2(&JsValue::from_str("Cropper callback threw:"), &err);
        }
    }
}

/// Interactive circular cropper for one source image.
#[wasm_bindgen(js_name = Cropper)]
pub struct JsCropper {
    session: RefCell<CropSession<Outbox>>,
    callbacks: JsCallbacks,
}

#[wasm_bindgen(js_class = Cropper)]
impl JsCropper {
    /// Open a cropper.
    ///
    /// # Arguments
    /// * `config` - Partial config object, or `undefined` for defaults
    /// * `source_width`, `source_height` - Upright source dimensions
    /// * `on_save` - Called once with the avatar `data:` URL
    /// * `on_cancel` - Called once if the user cancels
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        source_width: u32,
        source_height: u32,
        on_save: Function,
        on_cancel: Function,
    ) -> Result<JsCropper, JsValue> {
        let config = parse_config(config)?;
        let session = CropSession::open(config, source_width, source_height, Outbox::default())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(JsCropper {
            session: RefCell::new(session),
            callbacks: JsCallbacks { on_save, on_cancel },
        })
    }

    #[wasm_bindgen(js_name = beginDrag)]
    pub fn begin_drag(&self, x: f64, y: f64) {
        self.session.borrow_mut().begin_drag(Point::new(x, y));
    }

    #[wasm_bindgen(js_name = updateDrag)]
    pub fn update_drag(&self, x: f64, y: f64) {
        self.session.borrow_mut().update_drag(Point::new(x, y));
    }

    #[wasm_bindgen(js_name = endDrag)]
    pub fn end_drag(&self) {
        self.session.borrow_mut().end_drag();
    }

    /// Set the zoom; clamped to the configured range.
    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&self, value: f64) {
        self.session.borrow_mut().set_zoom(value);
    }

    #[wasm_bindgen(js_name = zoomBy)]
    pub fn zoom_by(&self, delta: f64) {
        self.session.borrow_mut().zoom_by(delta);
    }

    pub fn reset(&self) {
        self.session.borrow_mut().reset();
    }

    #[wasm_bindgen(getter, js_name = offsetX)]
    pub fn offset_x(&self) -> f64 {
        self.session.borrow().state().offset_x
    }

    #[wasm_bindgen(getter, js_name = offsetY)]
    pub fn offset_y(&self) -> f64 {
        self.session.borrow().state().offset_y
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.session.borrow().state().scale
    }

    #[wasm_bindgen(getter, js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.session.borrow().state().is_dragging
    }

    #[wasm_bindgen(getter, js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.session.borrow().is_open()
    }

    /// Full crop state as a plain object.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.session.borrow().state())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current pan bounds as `{ minX, maxX, minY, maxY }`.
    pub fn bounds(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.borrow().cropper().bounds())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Placement of the preview layer: `{ left, top, width, height, scale }`.
    #[wasm_bindgen(js_name = previewTransform)]
    pub fn preview_transform(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.borrow().preview_transform())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Snapshot the crop state before fetching the source asynchronously.
    ///
    /// Returns `undefined` if the cropper is already closed.
    #[wasm_bindgen(js_name = beginConfirm)]
    pub fn begin_confirm(&self) -> Option<JsDecodeTicket> {
        self.session
            .borrow_mut()
            .begin_confirm()
            .map(|inner| JsDecodeTicket { inner })
    }

    /// Finish a confirmation once the source bytes have arrived.
    ///
    /// Returns `true` if `onSave` was called, `false` if the result was
    /// ignored because the cropper closed or a newer confirm started.
    /// Throws if the source cannot be decoded; the cropper stays open.
    #[wasm_bindgen(js_name = finishConfirm)]
    pub fn finish_confirm(&self, ticket: &JsDecodeTicket, source: &[u8]) -> Result<bool, JsValue> {
        saved(self.with_session(|session| session.finish_confirm(&ticket.inner, source)))
    }

    /// Confirm with source bytes already in memory.
    pub fn confirm(&self, source: &[u8]) -> Result<bool, JsValue> {
        saved(self.with_session(|session| session.confirm(source)))
    }

    /// Confirm with a `data:image/...;base64,` source URL.
    #[wasm_bindgen(js_name = confirmDataUrl)]
    pub fn confirm_data_url(&self, url: &str) -> Result<bool, JsValue> {
        if !self.is_open() {
            return Ok(false);
        }
        let bytes = decode::decode_data_url(url).map_err(CropError::from);
        saved(bytes.and_then(|bytes| self.with_session(|session| session.confirm(&bytes))))
    }

    /// Close without saving; calls `onCancel` the first time.
    pub fn cancel(&self) {
        self.with_session(|session| session.cancel());
    }
}

impl JsCropper {
    /// Run `f` on the session, then deliver any outcome it produced once the
    /// borrow has ended.
    fn with_session<T>(&self, f: impl FnOnce(&mut CropSession<Outbox>) -> T) -> T {
        let (result, outcome) = {
            let mut session = self.session.borrow_mut();
            let result = f(&mut session);
            (result, session.handler_mut().pending.take())
        };

        if let Some(outcome) = outcome {
            self.callbacks.deliver(outcome);
        }
        result
    }
}

/// Pending confirmation returned by `Cropper.beginConfirm()`.
#[wasm_bindgen(js_name = DecodeTicket)]
pub struct JsDecodeTicket {
    inner: DecodeTicket,
}

#[wasm_bindgen(js_class = DecodeTicket)]
impl JsDecodeTicket {
    /// Zoom captured at confirm time.
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.state().scale
    }
}

fn parse_config(value: JsValue) -> Result<CropperConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(CropperConfig::default());
    }

    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid cropper config: {}", e)))
}

fn saved(result: Result<ConfirmOutcome, CropError>) -> Result<bool, JsValue> {
    match result {
        Ok(outcome) => Ok(is_saved(outcome)),
        Err(err) => {
            let message = JsValue::from_str(&err.to_string());
            web_sys::console::warn_1(&message);
            Err(message)
        }
    }
}

fn is_saved(outcome: ConfirmOutcome) -> bool {
    outcome == ConfirmOutcome::Saved
}

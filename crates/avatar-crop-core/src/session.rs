//! Cropper session: lifecycle, callbacks and async decode results.
//!
//! A [`CropSession`] wraps a [`Cropper`] with the host's [`CropHandler`] and
//! tracks whether the cropper is still open. Confirmation is split in two so
//! the host can fetch or decode the source asynchronously:
//!
//! 1. [`begin_confirm`](CropSession::begin_confirm) snapshots the crop state
//!    into a [`DecodeTicket`]
//! 2. [`finish_confirm`](CropSession::finish_confirm) decodes, renders and
//!    encodes, then calls `on_save` and closes the session
//!
//! A ticket that arrives after the session closed, or after a newer
//! `begin_confirm`, is ignored. Decode failures leave the session open.

use tracing::{info, warn};

use crate::config::CropperConfig;
use crate::cropper::{CropState, Cropper, PreviewTransform};
use crate::decode::decode_image;
use crate::encode::{encode_avatar, EncodedImage};
use crate::geometry::Point;
use crate::render::render_circular_crop;
use crate::CropError;

/// Receives the outcome of a session.
pub trait CropHandler {
    /// Called once with the encoded avatar.
    fn on_save(&mut self, image: EncodedImage);

    /// Called once when the user cancels.
    fn on_cancel(&mut self);
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Open,
    Saved,
    Cancelled,
}

/// Pending confirmation, handed out by [`CropSession::begin_confirm`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeTicket {
    generation: u64,
    state: CropState,
}

impl DecodeTicket {
    /// Crop state captured when the user confirmed.
    pub fn state(&self) -> &CropState {
        &self.state
    }
}

/// Result of [`CropSession::finish_confirm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// `on_save` was called and the session is closed.
    Saved,
    /// The ticket targeted a closed session or was superseded.
    Ignored,
}

/// One open cropper and the handler that receives its result.
pub struct CropSession<H: CropHandler> {
    config: CropperConfig,
    cropper: Cropper,
    handler: H,
    status: SessionStatus,
    generation: u64,
}

impl<H: CropHandler> CropSession<H> {
    /// Open a session for a source image of the given upright dimensions.
    pub fn open(
        config: CropperConfig,
        source_width: u32,
        source_height: u32,
        handler: H,
    ) -> Result<Self, CropError> {
        let cropper = Cropper::new(&config, source_width, source_height)?;

        Ok(Self {
            config,
            cropper,
            handler,
            status: SessionStatus::Open,
            generation: 0,
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn cropper(&self) -> &Cropper {
        &self.cropper
    }

    pub fn state(&self) -> &CropState {
        self.cropper.state()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the session and return the handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    pub fn begin_drag(&mut self, pointer: Point) {
        if self.is_open() {
            self.cropper.begin_drag(pointer);
        }
    }

    pub fn update_drag(&mut self, pointer: Point) {
        if self.is_open() {
            self.cropper.update_drag(pointer);
        }
    }

    pub fn end_drag(&mut self) {
        if self.is_open() {
            self.cropper.end_drag();
        }
    }

    pub fn set_zoom(&mut self, value: f64) {
        if self.is_open() {
            self.cropper.set_zoom(value);
        }
    }

    pub fn zoom_by(&mut self, delta: f64) {
        if self.is_open() {
            self.cropper.zoom_by(delta);
        }
    }

    pub fn reset(&mut self) {
        if self.is_open() {
            self.cropper.reset();
        }
    }

    pub fn preview_transform(&self) -> PreviewTransform {
        self.cropper.preview_transform()
    }

    /// Start confirming. Returns `None` if the session is closed.
    ///
    /// Any earlier ticket becomes stale.
    pub fn begin_confirm(&mut self) -> Option<DecodeTicket> {
        if !self.is_open() {
            return None;
        }

        self.generation += 1;
        Some(DecodeTicket {
            generation: self.generation,
            state: *self.cropper.state(),
        })
    }

    /// Finish a confirmation with the source bytes.
    ///
    /// # Errors
    ///
    /// Returns `CropError::Decode` if the source cannot be decoded,
    /// `CropError::SourceMismatch` if its upright dimensions differ from the
    /// ones the session was opened with, and `CropError::Encode` if the output
    /// cannot be encoded. The session stays open and `on_save` is not called.
    pub fn finish_confirm(
        &mut self,
        ticket: &DecodeTicket,
        source: &[u8],
    ) -> Result<ConfirmOutcome, CropError> {
        if !self.is_open() || ticket.generation != self.generation {
            warn!(
                status = ?self.status,
                ticket = ticket.generation,
                current = self.generation,
                "ignoring decode result for closed or superseded confirm"
            );
            return Ok(ConfirmOutcome::Ignored);
        }

        let image = decode_image(source).map_err(|e| {
            warn!(error = %e, "source decode failed, cropper stays open");
            CropError::from(e)
        })?;

        let viewport = self.cropper.viewport();
        if (image.width, image.height) != (viewport.source_width, viewport.source_height) {
            warn!(
                expected_width = viewport.source_width,
                expected_height = viewport.source_height,
                width = image.width,
                height = image.height,
                "decoded source size differs from the opened size, cropper stays open"
            );
            return Err(CropError::SourceMismatch {
                expected_width: viewport.source_width,
                expected_height: viewport.source_height,
                width: image.width,
                height: image.height,
            });
        }

        let avatar = render_circular_crop(
            &image,
            viewport,
            &ticket.state,
            self.config.output_size,
            self.config.filter,
        )?;
        let encoded = encode_avatar(&avatar, self.config.format, self.config.matte)?;

        info!(
            bytes = encoded.bytes.len(),
            mime = encoded.mime_type,
            "avatar crop saved"
        );
        self.status = SessionStatus::Saved;
        self.handler.on_save(encoded);

        Ok(ConfirmOutcome::Saved)
    }

    /// Confirm with bytes that are already in memory.
    pub fn confirm(&mut self, source: &[u8]) -> Result<ConfirmOutcome, CropError> {
        match self.begin_confirm() {
            Some(ticket) => self.finish_confirm(&ticket, source),
            None => Ok(ConfirmOutcome::Ignored),
        }
    }

    /// Close without producing an image. Calls `on_cancel` the first time only.
    pub fn cancel(&mut self) {
        if !self.is_open() {
            return;
        }

        self.status = SessionStatus::Cancelled;
        info!("avatar crop cancelled");
        self.handler.on_cancel();
    }
}

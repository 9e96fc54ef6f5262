//! The canvas session state machine.
//!
//! The session coordinates the upload lifecycle and the interaction mode:
//!
//! ```text
//!            file selected              decode ok
//!  ┌───────┐ ──────────────► ┌─────────┐ ────────► ┌───────┐
//!  │ Empty │                 │ Loading │           │ Ready │
//!  └───────┘ ◄────────────── └─────────┘           └───────┘
//!              decode failed                  ▲        │ new file
//!                                             └────────┘ (back to Loading)
//! ```
//!
//! Within `Ready` the interaction mode cycles between `Idle`, `Drawing` and
//! `Typing`; drawing and typing are mutually exclusive.

use log::{info, warn};

use crate::geometry::{self, FitResult};
use crate::intake::LoadedImage;
use crate::scene::Surface;

/// Upload lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No image selected yet
    Empty,
    /// A decode for the given intake generation is in flight
    Loading { generation: u64 },
    /// A background is committed and the canvas is interactive
    Ready,
}

impl SessionState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &SessionState) -> bool {
        match (self, new_state) {
            // A new selection interrupts anything, including an earlier load
            (_, SessionState::Loading { .. }) => true,
            // A load either commits or fails
            (SessionState::Loading { .. }, SessionState::Ready) => true,
            (SessionState::Loading { .. }, SessionState::Empty) => true,
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SessionState::Empty)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready)
    }
}

/// Pointer interaction mode while the session is `Ready`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    /// Pointer selects and drags existing elements
    #[default]
    Idle,
    /// Pointer drags draw free-hand strokes
    Drawing,
    /// A text overlay is active; committing it places a text element
    Typing,
}

/// The interactive annotation session: upload lifecycle, interaction mode,
/// and the fit bookkeeping for the committed background.
pub struct CanvasSession {
    state: SessionState,
    mode: InteractionMode,
    target_length_px: f32,
    background_fit: Option<FitResult>,
}

impl CanvasSession {
    pub fn new(target_length_px: f32) -> Self {
        Self {
            state: SessionState::Empty,
            mode: InteractionMode::Idle,
            target_length_px,
            background_fit: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn target_length_px(&self) -> f32 {
        self.target_length_px
    }

    pub fn background_fit(&self) -> Option<FitResult> {
        self.background_fit
    }

    pub fn is_drawing(&self) -> bool {
        self.mode == InteractionMode::Drawing
    }

    pub fn is_typing(&self) -> bool {
        self.mode == InteractionMode::Typing
    }

    /// A file was selected; the decode for `generation` is now in flight.
    pub fn begin_loading(&mut self, generation: u64) {
        let next = SessionState::Loading { generation };
        debug_assert!(self.state.can_transition_to(&next));
        self.state = next;
        self.mode = InteractionMode::Idle;
    }

    /// The current decode finished: fit the image into the target bound,
    /// push dimensions and background to the surface, enter `Ready`.
    pub fn commit_background(
        &mut self,
        image: LoadedImage,
        surface: &mut dyn Surface,
    ) -> Option<FitResult> {
        let SessionState::Loading { generation } = self.state else {
            warn!("ignoring background commit outside the Loading state");
            return None;
        };

        let fitted = geometry::fit(
            self.target_length_px,
            image.width() as f32,
            image.height() as f32,
        );
        surface.set_dimensions(fitted.width, fitted.height);
        surface.set_background(image, fitted);

        info!(
            "session ready (generation {generation}): canvas {}x{}",
            fitted.width, fitted.height
        );
        self.background_fit = Some(fitted);
        self.state = SessionState::Ready;
        self.mode = InteractionMode::Idle;
        Some(fitted)
    }

    /// The current decode failed; fall back to the empty state.
    pub fn fail_loading(&mut self) {
        if !self.state.is_loading() {
            warn!("ignoring decode failure outside the Loading state");
            return;
        }
        self.state = SessionState::Empty;
        self.mode = InteractionMode::Idle;
        self.background_fit = None;
    }

    /// Toggle free-hand drawing. Entering drawing leaves typing: the two
    /// modes are mutually exclusive.
    pub fn toggle_drawing(&mut self) {
        if !self.state.is_ready() {
            warn!("ignoring drawing toggle while not ready");
            return;
        }
        self.mode = match self.mode {
            InteractionMode::Drawing => InteractionMode::Idle,
            _ => InteractionMode::Drawing,
        };
    }

    /// Toggle the text overlay. Entering typing leaves drawing.
    pub fn toggle_typing(&mut self) {
        if !self.state.is_ready() {
            warn!("ignoring typing toggle while not ready");
            return;
        }
        self.mode = match self.mode {
            InteractionMode::Typing => InteractionMode::Idle,
            _ => InteractionMode::Typing,
        };
    }

    /// The text overlay committed its content; return to idle.
    pub fn leave_typing(&mut self) {
        if self.mode == InteractionMode::Typing {
            self.mode = InteractionMode::Idle;
        }
    }

    /// Discard all annotations, keep the background. The fit is recomputed
    /// from the surface's natural size on every clear; `fit` is idempotent,
    /// so the visible dimensions never change.
    pub fn clear(&mut self, surface: &mut dyn Surface) {
        if !self.state.is_ready() {
            warn!("ignoring clear while not ready");
            return;
        }

        surface.clear_annotations();
        if let Some((width, height)) = surface.background_size() {
            let fitted = geometry::fit(self.target_length_px, width as f32, height as f32);
            surface.set_dimensions(fitted.width, fitted.height);
            self.background_fit = Some(fitted);
        }
        self.mode = InteractionMode::Idle;
    }
}

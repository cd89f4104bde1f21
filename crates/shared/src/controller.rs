//! Owns one map instance: the loaded document, values, viewport and
//! interaction state. Every mutation ends in exactly one redraw pushed to
//! the observer, so the view never has to poll.

use tracing::{debug, warn};

use crate::document::{BoundaryDocument, FeatureId};
use crate::models::{MapData, ValueIndex};
use crate::projection::ViewTransform;
use crate::render::{render, Scene, Variant};
use crate::selection::InteractionState;
use crate::status::StatusBar;

/// What the view draws. `scene` is `None` until a document and a usable
/// viewport are both available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub scene: Option<Scene>,
    pub status: StatusBar,
}

/// Receives a frame after every state change.
pub trait SceneObserver {
    fn on_frame(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame)> SceneObserver for F {
    fn on_frame(&mut self, frame: &Frame) {
        self(frame)
    }
}

pub struct MapController<O> {
    variant: Variant,
    observer: O,
    document: Option<BoundaryDocument>,
    values: Option<ValueIndex>,
    viewport: Option<(f64, f64)>,
    interaction: InteractionState,
    frame: Frame,
    torn_down: bool,
}

impl<O: SceneObserver> MapController<O> {
    pub fn new(variant: Variant, observer: O) -> Self {
        MapController {
            variant,
            observer,
            document: None,
            values: None,
            viewport: None,
            interaction: InteractionState::new(variant.selection_mode()),
            frame: Frame::default(),
            torn_down: false,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn document(&self) -> Option<&BoundaryDocument> {
        self.document.as_ref()
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// The last frame handed to the observer.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// A failed load leaves the map empty; the error is logged, not shown.
    /// On success, selected and hovered ids that still name a feature of
    /// the new document are kept.
    pub fn document_loaded(&mut self, result: Result<BoundaryDocument, String>) {
        if self.torn_down {
            return;
        }
        match result {
            Ok(document) => {
                debug!(
                    features = document.feature_count(),
                    collections = document.collections().len(),
                    "boundary document loaded"
                );
                self.interaction.retain(|id| document.feature(id).is_some());
                self.document = Some(document);
            }
            Err(e) => {
                warn!("boundary document failed to load: {e}");
                self.document = None;
                self.interaction.clear();
            }
        }
        self.redraw();
    }

    /// Values only shade the heat variant; a failure leaves regions unshaded.
    pub fn values_loaded(&mut self, result: Result<MapData, String>) {
        if self.torn_down {
            return;
        }
        match result {
            Ok(data) => self.values = Some(data.value_index()),
            Err(e) => {
                warn!("map values failed to load: {e}");
                self.values = None;
            }
        }
        self.redraw();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if self.torn_down || self.viewport == Some((width, height)) {
            return;
        }
        self.viewport = Some((width, height));
        self.redraw();
    }

    pub fn pointer_enter(&mut self, id: FeatureId) {
        if self.accepts(id) && self.interaction.pointer_enter(id) {
            self.redraw();
        }
    }

    pub fn pointer_leave(&mut self, id: FeatureId) {
        if self.accepts(id) && self.interaction.pointer_leave(id) {
            self.redraw();
        }
    }

    pub fn click(&mut self, id: FeatureId) {
        if self.accepts(id) {
            self.interaction.click(id);
            self.redraw();
        }
    }

    /// After teardown every call is a no-op and the observer is never
    /// invoked again.
    pub fn teardown(&mut self) {
        self.torn_down = true;
    }

    fn accepts(&self, id: FeatureId) -> bool {
        !self.torn_down
            && self
                .document
                .as_ref()
                .is_some_and(|d| d.feature(id).is_some())
    }

    fn redraw(&mut self) {
        self.frame = self.build_frame();
        self.observer.on_frame(&self.frame);
    }

    fn build_frame(&self) -> Frame {
        let Some(document) = &self.document else {
            return Frame::default();
        };
        let status = StatusBar::compute(document, &self.interaction);
        let scene = self.viewport.and_then(|(w, h)| {
            let transform = ViewTransform::fit(&document.bounds()?, w, h)?;
            Some(render(
                document,
                &transform,
                &self.interaction,
                self.variant,
                self.values.as_ref(),
            ))
        });
        Frame { scene, status }
    }
}

use crate::canvas::bridge::{ClearListener, HandwritingPayload};
use crate::canvas::export::{encode_png, to_data_url};
use crate::canvas::history::SnapshotHistory;
use crate::canvas::model::{Color, Point, ShapeKind, Stroke, Tool};
use crate::canvas::raster::{draw_dot, draw_segment, CanvasSnapshot, DirtyRect};
use crate::canvas::settings::CanvasSettings;
use crate::canvas::shapes::{ShapeId, ShapeLayer};
use crate::canvas::style::StyleState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Idle,
    Drawing,
}

/// Undo unit: the bitmap plus the shape overlay as they were before a
/// mutating operation.
#[derive(Debug, Clone, PartialEq)]
struct Checkpoint {
    raster: CanvasSnapshot,
    shapes: ShapeLayer,
}

/// Freehand drawing surface with pen/eraser strokes, shape overlays and
/// snapshot-based undo.
///
/// The surface starts unmounted. Until [`DrawingSurface::mount`] provides a
/// bitmap every operation is a silent no-op. Mutating operations are refused
/// while a stroke is in progress.
pub struct DrawingSurface {
    background: Color,
    history_limit: Option<usize>,
    palette: Vec<Color>,
    style: StyleState,
    bitmap: Option<CanvasSnapshot>,
    shapes: ShapeLayer,
    history: SnapshotHistory<Checkpoint>,
    active_stroke: Option<Stroke>,
    clear_listener: Option<Box<dyn ClearListener>>,
}

impl DrawingSurface {
    pub fn new(settings: &CanvasSettings) -> Self {
        Self {
            background: settings.background,
            history_limit: settings.history_limit,
            palette: settings.palette.clone(),
            style: StyleState::from_settings(settings),
            bitmap: None,
            shapes: ShapeLayer::default(),
            history: SnapshotHistory::new(settings.history_limit),
            active_stroke: None,
            clear_listener: None,
        }
    }

    /// Builds a surface already mounted at the configured canvas size.
    pub fn mounted(settings: &CanvasSettings) -> Self {
        let mut surface = Self::new(settings);
        surface.mount(settings.width, settings.height);
        surface
    }

    pub fn with_clear_listener(mut self, listener: Box<dyn ClearListener>) -> Self {
        self.clear_listener = Some(listener);
        self
    }

    pub fn set_clear_listener(&mut self, listener: Option<Box<dyn ClearListener>>) {
        self.clear_listener = listener;
    }

    /// Allocates a blank bitmap and resets history and shapes.
    pub fn mount(&mut self, width: u32, height: u32) {
        self.bitmap = Some(CanvasSnapshot::new(width, height, self.background));
        self.shapes.clear();
        self.history = SnapshotHistory::new(self.history_limit);
        self.active_stroke = None;
        tracing::debug!(width, height, "drawing surface mounted");
    }

    pub fn unmount(&mut self) {
        self.bitmap = None;
        self.shapes.clear();
        self.history.clear();
        self.active_stroke = None;
        tracing::debug!("drawing surface unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.bitmap.is_some()
    }

    /// Re-mounts at a new size keeping the overlapping top-left region.
    /// History is discarded since old checkpoints no longer match the bitmap.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let Some(old) = self.bitmap.take() else {
            return false;
        };
        if self.active_stroke.take().is_some() {
            tracing::warn!("resize interrupted an active stroke");
        }
        let mut resized = CanvasSnapshot::new(width, height, self.background);
        resized.copy_overlap_from(&old);
        self.bitmap = Some(resized);
        self.history.clear();
        true
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.bitmap.as_ref().map(|b| (b.width(), b.height()))
    }

    pub fn state(&self) -> SurfaceState {
        if self.active_stroke.is_some() {
            SurfaceState::Drawing
        } else {
            SurfaceState::Idle
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.state() == SurfaceState::Drawing
    }

    pub fn style(&self) -> &StyleState {
        &self.style
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Raster layer only, without shape overlays.
    pub fn snapshot(&self) -> Option<&CanvasSnapshot> {
        self.bitmap.as_ref()
    }

    pub fn shapes(&self) -> &ShapeLayer {
        &self.shapes
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active_stroke.as_ref()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        self.is_mounted() && !self.is_drawing() && !self.history.is_empty()
    }

    /// Starts a stroke at `point` with the current effective style.
    ///
    /// The pre-stroke state is pushed to history first, so a single undo
    /// removes the whole stroke. A dot is drawn immediately so a click without
    /// movement still leaves a mark.
    pub fn begin_stroke(&mut self, point: Point) -> bool {
        if self.is_drawing() || !self.style.tool().is_freehand() {
            return false;
        }
        let checkpoint = match self.checkpoint() {
            Some(checkpoint) => checkpoint,
            None => return false,
        };
        self.history.push(checkpoint);

        let style = self.style.effective_style();
        let stroke = Stroke::begin(self.style.tool(), style, point);
        if let Some(bitmap) = self.bitmap.as_mut() {
            draw_dot(bitmap, point, style);
        }
        tracing::debug!(tool = %stroke.tool(), x = point.x, y = point.y, "stroke started");
        self.active_stroke = Some(stroke);
        true
    }

    /// Appends `point` and rasterizes the segment from the previous point.
    pub fn extend_stroke(&mut self, point: Point) -> Option<DirtyRect> {
        let stroke = self.active_stroke.as_mut()?;
        let bitmap = self.bitmap.as_mut()?;
        let previous = stroke.push(point)?;
        draw_segment(bitmap, previous, point, stroke.style())
    }

    /// Finalizes the active stroke. Returns `false` when no stroke was active.
    pub fn end_stroke(&mut self) -> bool {
        match self.active_stroke.take() {
            Some(stroke) => {
                tracing::debug!(points = stroke.points().len(), "stroke finished");
                true
            }
            None => false,
        }
    }

    pub fn set_tool(&mut self, tool: Tool) -> bool {
        if self.refuse_while_drawing("set_tool") {
            return false;
        }
        if !matches!(tool, Tool::Select | Tool::Shape(_)) {
            self.shapes.deselect();
        }
        self.style.set_tool(tool);
        true
    }

    pub fn set_color(&mut self, color: Color) -> bool {
        if self.refuse_while_drawing("set_color") {
            return false;
        }
        self.style.set_color(color);
        true
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Sets the pen color to the palette entry at `index`.
    pub fn pick_palette_color(&mut self, index: usize) -> bool {
        match self.palette.get(index).copied() {
            Some(color) => self.set_color(color),
            None => false,
        }
    }

    pub fn set_width(&mut self, width: f32) -> bool {
        if self.refuse_while_drawing("set_width") {
            return false;
        }
        self.style.set_width(width);
        true
    }

    /// Restores the state saved before the most recent stroke, clear or shape
    /// insertion.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        let Some(checkpoint) = self.history.pop() else {
            return false;
        };
        self.bitmap = Some(checkpoint.raster);
        self.shapes = checkpoint.shapes;
        tracing::debug!(remaining = self.history.len(), "undo applied");
        true
    }

    /// Fills the canvas with the background color and drops all shapes. One
    /// undo brings the previous content back.
    pub fn clear(&mut self) -> bool {
        if self.refuse_while_drawing("clear") {
            return false;
        }
        let Some(checkpoint) = self.checkpoint() else {
            return false;
        };
        self.history.push(checkpoint);
        if let Some(bitmap) = self.bitmap.as_mut() {
            bitmap.fill(self.background);
        }
        self.shapes.clear();
        if let Some(listener) = self.clear_listener.as_ref() {
            listener.on_clear();
        }
        tracing::debug!("canvas cleared");
        true
    }

    /// Inserts a shape at its default centered position with the current pen
    /// style and makes it the active selection.
    pub fn insert_shape(&mut self, kind: ShapeKind) -> Option<ShapeId> {
        if self.refuse_while_drawing("insert_shape") {
            return None;
        }
        let size = self.size()?;
        let checkpoint = self.checkpoint()?;
        self.history.push(checkpoint);

        self.style.set_tool(Tool::Shape(kind));
        let style = self.style.effective_style();
        Some(self.shapes.insert(kind, size, style))
    }

    pub fn select_at(&mut self, point: Point) -> Option<ShapeId> {
        if !self.is_mounted() || self.is_drawing() {
            return None;
        }
        self.shapes.select_at(point)
    }

    pub fn deselect(&mut self) {
        self.shapes.deselect();
    }

    pub fn move_selection(&mut self, dx: f32, dy: f32) -> bool {
        !self.is_drawing() && self.shapes.move_active(dx, dy)
    }

    pub fn set_text(&mut self, content: &str) -> bool {
        !self.is_drawing() && self.shapes.set_active_text(content)
    }

    pub fn delete_selection(&mut self) -> bool {
        if self.is_drawing() || self.shapes.active().is_none() {
            return false;
        }
        let Some(checkpoint) = self.checkpoint() else {
            return false;
        };
        self.history.push(checkpoint);
        self.shapes.remove_active().is_some()
    }

    /// Raster layer with shape outlines flattened on top. Never mutates the surface.
    pub fn composed(&self) -> Option<CanvasSnapshot> {
        let mut composed = self.bitmap.clone()?;
        self.shapes.flatten_into(&mut composed);
        Some(composed)
    }

    pub fn export_png(&self) -> Option<Vec<u8>> {
        let composed = self.composed()?;
        match encode_png(&composed) {
            Ok(png) => Some(png),
            Err(err) => {
                tracing::warn!(?err, "canvas export failed");
                None
            }
        }
    }

    /// PNG data URL of the current canvas, or `None` when nothing can be encoded.
    pub fn export_image(&self) -> Option<String> {
        self.export_png().map(|png| to_data_url(&png))
    }

    pub fn save_payload(&self) -> Option<HandwritingPayload> {
        Some(HandwritingPayload {
            hand_writing_img: self.export_image()?,
            annotations: self.shapes.text_annotations(),
        })
    }

    fn checkpoint(&self) -> Option<Checkpoint> {
        Some(Checkpoint {
            raster: self.bitmap.clone()?,
            shapes: self.shapes.clone(),
        })
    }

    fn refuse_while_drawing(&self, operation: &str) -> bool {
        if self.is_drawing() {
            tracing::warn!(operation, "ignored while a stroke is in progress");
            return true;
        }
        false
    }
}

impl std::fmt::Debug for DrawingSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingSurface")
            .field("size", &self.size())
            .field("state", &self.state())
            .field("style", &self.style)
            .field("history_len", &self.history.len())
            .field("shapes", &self.shapes.len())
            .finish()
    }
}

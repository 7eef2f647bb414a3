use serde::Serialize;

use crate::canvas::model::{Point, ShapeKind, StrokeStyle};
use crate::canvas::raster::{
    draw_ellipse_outline, draw_rect_outline, draw_segment, CanvasSnapshot,
};

pub const DEFAULT_SHAPE_EXTENT: f32 = 100.0;
pub const DEFAULT_TEXT: &str = "텍스트를 입력하세요";
pub const DEFAULT_FONT_SIZE: f32 = 20.0;
/// Extra slop around thin shapes so they stay clickable.
const HIT_TOLERANCE: f32 = 4.0;

pub type ShapeId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
    Line { dx: f32, dy: f32 },
    Text {
        content: String,
        font_size: f32,
        editing: bool,
    },
}

/// A pre-positioned vector object layered over the raster surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeObject {
    pub id: ShapeId,
    pub origin: Point,
    pub style: StrokeStyle,
    pub geometry: ShapeGeometry,
}

impl ShapeObject {
    pub fn kind(&self) -> ShapeKind {
        match self.geometry {
            ShapeGeometry::Rect { .. } => ShapeKind::Rect,
            ShapeGeometry::Circle { .. } => ShapeKind::Circle,
            ShapeGeometry::Line { .. } => ShapeKind::Line,
            ShapeGeometry::Text { .. } => ShapeKind::Text,
        }
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Point, Point) {
        let o = self.origin;
        match &self.geometry {
            ShapeGeometry::Rect { width, height } => (o, o.offset(*width, *height)),
            ShapeGeometry::Circle { radius } => (o, o.offset(radius * 2.0, radius * 2.0)),
            ShapeGeometry::Line { dx, dy } => {
                let end = o.offset(*dx, *dy);
                (
                    Point::new(o.x.min(end.x), o.y.min(end.y)),
                    Point::new(o.x.max(end.x), o.y.max(end.y)),
                )
            }
            ShapeGeometry::Text {
                content, font_size, ..
            } => {
                // Rough advance of 0.6em per character; no font metrics are available.
                let advance = content.chars().count().max(1) as f32 * font_size * 0.6;
                (o, o.offset(advance, *font_size))
            }
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        let pad = self.style.width * 0.5 + HIT_TOLERANCE;
        let (min, max) = self.bounds();
        point.x >= min.x - pad
            && point.x <= max.x + pad
            && point.y >= min.y - pad
            && point.y <= max.y + pad
    }

    pub fn text_annotation(&self) -> Option<TextAnnotation> {
        match &self.geometry {
            ShapeGeometry::Text {
                content, font_size, ..
            } => Some(TextAnnotation {
                content: content.clone(),
                x: self.origin.x,
                y: self.origin.y,
                font_size: *font_size,
                color: self.style.color.to_hex(),
            }),
            _ => None,
        }
    }

    fn rasterize(&self, snapshot: &mut CanvasSnapshot) {
        let o = self.origin;
        match &self.geometry {
            ShapeGeometry::Rect { width, height } => {
                draw_rect_outline(snapshot, o, *width, *height, self.style);
            }
            ShapeGeometry::Circle { radius } => {
                draw_ellipse_outline(
                    snapshot,
                    o.offset(*radius, *radius),
                    *radius,
                    *radius,
                    self.style,
                );
            }
            ShapeGeometry::Line { dx, dy } => {
                draw_segment(snapshot, o, o.offset(*dx, *dy), self.style);
            }
            ShapeGeometry::Text { .. } => {}
        }
    }
}

/// Text objects travel next to the exported bitmap since glyphs are not
/// rasterized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    pub content: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeLayer {
    shapes: Vec<ShapeObject>,
    active: Option<ShapeId>,
    next_id: ShapeId,
}

impl ShapeLayer {
    /// Inserts a shape at its default position for a canvas of `canvas_size`
    /// and makes it the active object. Text starts in edit mode.
    pub fn insert(
        &mut self,
        kind: ShapeKind,
        canvas_size: (u32, u32),
        style: StrokeStyle,
    ) -> ShapeId {
        let cx = canvas_size.0 as f32 / 2.0;
        let cy = canvas_size.1 as f32 / 2.0;
        let half = DEFAULT_SHAPE_EXTENT / 2.0;
        let (origin, geometry) = match kind {
            ShapeKind::Rect => (
                Point::new(cx - half, cy - half),
                ShapeGeometry::Rect {
                    width: DEFAULT_SHAPE_EXTENT,
                    height: DEFAULT_SHAPE_EXTENT,
                },
            ),
            ShapeKind::Circle => (
                Point::new(cx - half, cy - half),
                ShapeGeometry::Circle { radius: half },
            ),
            ShapeKind::Line => (
                Point::new(cx - half, cy),
                ShapeGeometry::Line {
                    dx: DEFAULT_SHAPE_EXTENT,
                    dy: 0.0,
                },
            ),
            ShapeKind::Text => (
                Point::new(cx - half, cy - DEFAULT_FONT_SIZE / 2.0),
                ShapeGeometry::Text {
                    content: DEFAULT_TEXT.to_owned(),
                    font_size: DEFAULT_FONT_SIZE,
                    editing: true,
                },
            ),
        };

        self.finish_editing();
        let id = self.next_id;
        self.next_id += 1;
        self.shapes.push(ShapeObject {
            id,
            origin,
            style,
            geometry,
        });
        self.active = Some(id);
        id
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeObject> {
        self.shapes.iter()
    }

    pub fn get(&self, id: ShapeId) -> Option<&ShapeObject> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    pub fn active(&self) -> Option<&ShapeObject> {
        self.active.and_then(|id| self.get(id))
    }

    fn active_mut(&mut self) -> Option<&mut ShapeObject> {
        let id = self.active?;
        self.shapes.iter_mut().find(|shape| shape.id == id)
    }

    /// Activates the top-most shape under `point`, or deselects when nothing is hit.
    pub fn select_at(&mut self, point: Point) -> Option<ShapeId> {
        self.finish_editing();
        self.active = self
            .shapes
            .iter()
            .rev()
            .find(|shape| shape.contains(point))
            .map(|shape| shape.id);
        self.active
    }

    pub fn deselect(&mut self) {
        self.finish_editing();
        self.active = None;
    }

    pub fn move_active(&mut self, dx: f32, dy: f32) -> bool {
        match self.active_mut() {
            Some(shape) => {
                shape.origin = shape.origin.offset(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Replaces the content of the active text object. Ignored for other shapes.
    pub fn set_active_text(&mut self, text: &str) -> bool {
        match self.active_mut().map(|shape| &mut shape.geometry) {
            Some(ShapeGeometry::Text {
                content, editing, ..
            }) => {
                *content = text.to_owned();
                *editing = true;
                true
            }
            _ => false,
        }
    }

    pub fn finish_editing(&mut self) {
        if let Some(ShapeGeometry::Text { editing, .. }) =
            self.active_mut().map(|shape| &mut shape.geometry)
        {
            *editing = false;
        }
    }

    pub fn remove_active(&mut self) -> Option<ShapeObject> {
        let id = self.active.take()?;
        let index = self.shapes.iter().position(|shape| shape.id == id)?;
        Some(self.shapes.remove(index))
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.active = None;
    }

    pub fn flatten_into(&self, snapshot: &mut CanvasSnapshot) {
        for shape in &self.shapes {
            shape.rasterize(snapshot);
        }
    }

    pub fn text_annotations(&self) -> Vec<TextAnnotation> {
        self.shapes
            .iter()
            .filter_map(ShapeObject::text_annotation)
            .collect()
    }
}

use crate::canvas::model::{Color, Point, StrokeStyle};

/// Smallest brush radius that still covers the pixel containing the point.
const MIN_BRUSH_RADIUS: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DirtyRect {
    pub fn from_points(a: Point, b: Point, pad: f32) -> Self {
        let min_x = (a.x.min(b.x) - pad).floor() as i32;
        let max_x = (a.x.max(b.x) + pad).ceil() as i32;
        let min_y = (a.y.min(b.y) - pad).floor() as i32;
        let max_y = (a.y.max(b.y) + pad).ceil() as i32;
        Self {
            x: min_x,
            y: min_y,
            width: max_x.saturating_sub(min_x).saturating_add(1).max(1),
            height: max_y.saturating_sub(min_y).saturating_add(1).max(1),
        }
    }

    pub fn union(self, other: DirtyRect) -> DirtyRect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = self
            .x
            .saturating_add(self.width)
            .max(other.x.saturating_add(other.width));
        let max_y = self
            .y
            .saturating_add(self.height)
            .max(other.y.saturating_add(other.height));
        DirtyRect {
            x: min_x,
            y: min_y,
            width: max_x.saturating_sub(min_x).max(1),
            height: max_y.saturating_sub(min_y).max(1),
        }
    }

    pub fn clamp(self, width: u32, height: u32) -> Option<DirtyRect> {
        let max_w = width.min(i32::MAX as u32) as i32;
        let max_h = height.min(i32::MAX as u32) as i32;
        let x0 = self.x.clamp(0, max_w);
        let y0 = self.y.clamp(0, max_h);
        let x1 = self.x.saturating_add(self.width).clamp(0, max_w);
        let y1 = self.y.saturating_add(self.height).clamp(0, max_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(DirtyRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// Full RGBA8 raster capture of the drawing surface. Used both as the live
/// bitmap and as the undo checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSnapshot {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl CanvasSnapshot {
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        let mut snapshot = Self {
            width,
            height,
            pixels: vec![0; len],
        };
        snapshot.fill(fill);
        snapshot
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn rgba_pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some(Color::rgba(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ))
    }

    pub fn fill(&mut self, color: Color) {
        let rgba = color.to_rgba_array();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn is_uniform(&self, color: Color) -> bool {
        let rgba = color.to_rgba_array();
        self.pixels.chunks_exact(4).all(|px| px == rgba)
    }

    pub fn count_color(&self, color: Color) -> usize {
        let rgba = color.to_rgba_array();
        self.pixels.chunks_exact(4).filter(|px| *px == rgba).count()
    }

    /// Number of pixels that differ from `other`. Snapshots of different sizes
    /// differ everywhere.
    pub fn diff_count(&self, other: &CanvasSnapshot) -> usize {
        if self.width != other.width || self.height != other.height {
            return (self.width as usize * self.height as usize)
                .max(other.width as usize * other.height as usize);
        }
        self.pixels
            .chunks_exact(4)
            .zip(other.pixels.chunks_exact(4))
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Copies the region both snapshots share, anchored at the top-left corner.
    pub fn copy_overlap_from(&mut self, other: &CanvasSnapshot) {
        let width = self.width.min(other.width) as usize;
        let height = self.height.min(other.height);
        for y in 0..height {
            let dst = self.index(0, y);
            let src = other.index(0, y);
            self.pixels[dst..dst + width * 4].copy_from_slice(&other.pixels[src..src + width * 4]);
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }
}

/// Filled circle of radius `width / 2`, used for the pointer-down mark.
pub fn draw_dot(
    snapshot: &mut CanvasSnapshot,
    center: Point,
    style: StrokeStyle,
) -> Option<DirtyRect> {
    draw_segment(snapshot, center, center, style)
}

/// Rasterizes every pixel whose center lies within `width / 2` of segment
/// `start..end`. Consecutive segments overlap in discs, giving round caps and
/// joins.
pub fn draw_segment(
    snapshot: &mut CanvasSnapshot,
    start: Point,
    end: Point,
    style: StrokeStyle,
) -> Option<DirtyRect> {
    if snapshot.is_empty() {
        return None;
    }
    let radius = brush_radius(style.width);
    let clip = DirtyRect::from_points(start, end, radius + 1.0)
        .clamp(snapshot.width, snapshot.height)?;
    let radius_sq = radius * radius;
    let color = style.color.to_rgba_array();

    for y in clip.y..(clip.y + clip.height) {
        for x in clip.x..(clip.x + clip.width) {
            let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if point_segment_distance_sq(center, start, end) <= radius_sq {
                snapshot.set_pixel(x, y, color);
            }
        }
    }
    Some(clip)
}

pub fn draw_polyline(
    snapshot: &mut CanvasSnapshot,
    points: &[Point],
    style: StrokeStyle,
) -> Option<DirtyRect> {
    match points {
        [] => None,
        [only] => draw_dot(snapshot, *only, style),
        _ => points
            .windows(2)
            .filter_map(|segment| draw_segment(snapshot, segment[0], segment[1], style))
            .reduce(DirtyRect::union),
    }
}

pub fn draw_rect_outline(
    snapshot: &mut CanvasSnapshot,
    origin: Point,
    width: f32,
    height: f32,
    style: StrokeStyle,
) -> Option<DirtyRect> {
    let top_left = origin;
    let top_right = origin.offset(width, 0.0);
    let bottom_right = origin.offset(width, height);
    let bottom_left = origin.offset(0.0, height);
    draw_polyline(
        snapshot,
        &[top_left, top_right, bottom_right, bottom_left, top_left],
        style,
    )
}

pub fn draw_ellipse_outline(
    snapshot: &mut CanvasSnapshot,
    center: Point,
    radius_x: f32,
    radius_y: f32,
    style: StrokeStyle,
) -> Option<DirtyRect> {
    let rx = radius_x.abs().max(1.0);
    let ry = radius_y.abs().max(1.0);
    let circumference = std::f32::consts::TAU * rx.max(ry);
    let steps = (circumference / 2.0).max(12.0) as usize;

    let points: Vec<Point> = (0..=steps)
        .map(|step| {
            let t = (step as f32 / steps as f32) * std::f32::consts::TAU;
            Point::new(center.x + rx * t.cos(), center.y + ry * t.sin())
        })
        .collect();
    draw_polyline(snapshot, &points, style)
}

fn brush_radius(width: f32) -> f32 {
    if width.is_finite() {
        (width * 0.5).max(MIN_BRUSH_RADIUS)
    } else {
        MIN_BRUSH_RADIUS
    }
}

fn point_segment_distance_sq(point: Point, start: Point, end: Point) -> f32 {
    let vx = end.x - start.x;
    let vy = end.y - start.y;
    let wx = point.x - start.x;
    let wy = point.y - start.y;
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        return wx * wx + wy * wy;
    }
    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let dx = point.x - (start.x + vx * t);
    let dy = point.y - (start.y + vy * t);
    dx * dx + dy * dy
}

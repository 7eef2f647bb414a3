use crate::canvas::model::{Point, Tool};
use crate::canvas::surface::DrawingSurface;

/// Raw pointer position as delivered by the host, in client coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerSource {
    Mouse { client_x: f32, client_y: f32 },
    Touch { touches: Vec<(f32, f32)> },
}

impl PointerSource {
    pub fn mouse(client_x: f32, client_y: f32) -> Self {
        Self::Mouse { client_x, client_y }
    }

    pub fn touch(client_x: f32, client_y: f32) -> Self {
        Self::Touch {
            touches: vec![(client_x, client_y)],
        }
    }

    /// Client coordinates of the mouse, or of the first touch point.
    pub fn client_position(&self) -> Option<(f32, f32)> {
        match self {
            PointerSource::Mouse { client_x, client_y } => Some((*client_x, *client_y)),
            PointerSource::Touch { touches } => touches.first().copied(),
        }
    }
}

/// Canvas element bounds in client coordinates. Hosts must pass a fresh value
/// with every event since the canvas may scroll or resize.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

pub fn to_canvas_point(source: &PointerSource, rect: BoundingRect) -> Option<Point> {
    let (x, y) = source.client_position()?;
    Some(Point::new(x - rect.left, y - rect.top))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputOutcome {
    /// The host should suppress default scroll/zoom handling for this event.
    pub prevent_default: bool,
    /// Canvas pixels or shapes changed and a repaint is due.
    pub changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Z,
    Delete,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Undo,
    DeleteSelection,
    Deselect,
}

/// Routes pointer and key events to a [`DrawingSurface`]. Tracks the drag
/// anchor used when moving a selected shape.
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    drag_anchor: Option<Point>,
}

impl PointerInput {
    pub fn handle_pointer(
        &mut self,
        surface: &mut DrawingSurface,
        phase: PointerPhase,
        source: &PointerSource,
        rect: BoundingRect,
    ) -> InputOutcome {
        match phase {
            PointerPhase::Up | PointerPhase::Leave => {
                self.drag_anchor = None;
                InputOutcome {
                    prevent_default: false,
                    changed: surface.end_stroke(),
                }
            }
            PointerPhase::Down | PointerPhase::Move => {
                let Some(point) = to_canvas_point(source, rect) else {
                    return InputOutcome::default();
                };
                match surface.style().tool() {
                    Tool::Pen | Tool::Eraser => self.handle_freehand(surface, phase, point),
                    Tool::Select | Tool::Shape(_) => self.handle_selection(surface, phase, point),
                }
            }
        }
    }

    fn handle_freehand(
        &mut self,
        surface: &mut DrawingSurface,
        phase: PointerPhase,
        point: Point,
    ) -> InputOutcome {
        let changed = match phase {
            PointerPhase::Down => surface.begin_stroke(point),
            _ => surface.extend_stroke(point).is_some(),
        };
        InputOutcome {
            prevent_default: surface.is_mounted(),
            changed,
        }
    }

    fn handle_selection(
        &mut self,
        surface: &mut DrawingSurface,
        phase: PointerPhase,
        point: Point,
    ) -> InputOutcome {
        match phase {
            PointerPhase::Down => {
                let previous = surface.shapes().active().map(|shape| shape.id);
                let selected = surface.select_at(point);
                self.drag_anchor = selected.is_some().then_some(point);
                InputOutcome {
                    prevent_default: selected.is_some(),
                    changed: selected != previous,
                }
            }
            _ => {
                let Some(anchor) = self.drag_anchor else {
                    return InputOutcome::default();
                };
                let moved = surface.move_selection(point.x - anchor.x, point.y - anchor.y);
                if moved {
                    self.drag_anchor = Some(point);
                }
                InputOutcome {
                    prevent_default: true,
                    changed: moved,
                }
            }
        }
    }

    pub fn handle_key_event(
        &mut self,
        surface: &mut DrawingSurface,
        event: KeyEvent,
    ) -> Option<InputCommand> {
        match (event.key, event.modifiers) {
            (KeyCode::Z, KeyModifiers { ctrl: true, shift: false }) => {
                surface.undo().then_some(InputCommand::Undo)
            }
            (KeyCode::Delete, _) => surface
                .delete_selection()
                .then_some(InputCommand::DeleteSelection),
            (KeyCode::Escape, _) => {
                self.drag_anchor = None;
                surface.deselect();
                Some(InputCommand::Deselect)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::model::{Color, ShapeKind};
    use crate::canvas::settings::CanvasSettings;

    fn surface() -> DrawingSurface {
        let settings = CanvasSettings {
            width: 100,
            height: 100,
            ..CanvasSettings::default()
        };
        DrawingSurface::mounted(&settings)
    }

    fn rect() -> BoundingRect {
        BoundingRect {
            left: 20.0,
            top: 40.0,
            width: 100.0,
            height: 100.0,
        }
    }

    #[test]
    fn mouse_and_touch_map_to_the_same_canvas_point() {
        let mouse = to_canvas_point(&PointerSource::mouse(30.0, 55.0), rect());
        let touch = to_canvas_point(
            &PointerSource::Touch {
                touches: vec![(30.0, 55.0), (90.0, 90.0)],
            },
            rect(),
        );
        assert_eq!(mouse, Some(Point::new(10.0, 15.0)));
        assert_eq!(mouse, touch);
    }

    #[test]
    fn empty_touch_list_is_ignored() {
        let mut input = PointerInput::default();
        let mut surface = surface();
        let outcome = input.handle_pointer(
            &mut surface,
            PointerPhase::Down,
            &PointerSource::Touch { touches: vec![] },
            rect(),
        );
        assert_eq!(outcome, InputOutcome::default());
        assert!(!surface.is_drawing());
    }

    #[test]
    fn bounding_rect_is_read_per_event() {
        let mut input = PointerInput::default();
        let mut surface = surface();
        surface.set_color(Color::rgb(255, 0, 0));

        input.handle_pointer(
            &mut surface,
            PointerPhase::Down,
            &PointerSource::mouse(30.0, 50.0),
            rect(),
        );
        let scrolled = BoundingRect {
            top: 0.0,
            ..rect()
        };
        input.handle_pointer(
            &mut surface,
            PointerPhase::Move,
            &PointerSource::mouse(30.0, 50.0),
            scrolled,
        );
        input.handle_pointer(
            &mut surface,
            PointerPhase::Up,
            &PointerSource::mouse(30.0, 50.0),
            scrolled,
        );

        let stroke_end = surface.snapshot().unwrap().pixel(10, 50);
        assert_eq!(stroke_end, Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn leave_ends_the_stroke_like_up() {
        let mut input = PointerInput::default();
        let mut surface = surface();
        let down = input.handle_pointer(
            &mut surface,
            PointerPhase::Down,
            &PointerSource::touch(30.0, 50.0),
            rect(),
        );
        assert!(down.prevent_default);
        assert!(surface.is_drawing());

        let leave = input.handle_pointer(
            &mut surface,
            PointerPhase::Leave,
            &PointerSource::touch(30.0, 50.0),
            rect(),
        );
        assert!(leave.changed);
        assert!(!surface.is_drawing());
    }

    #[test]
    fn select_tool_drags_shapes() {
        let mut input = PointerInput::default();
        let mut surface = surface();
        let id = surface.insert_shape(ShapeKind::Rect).unwrap();
        surface.set_tool(Tool::Select);

        let origin = surface.shapes().get(id).unwrap().origin;
        let frame = BoundingRect::default();
        input.handle_pointer(
            &mut surface,
            PointerPhase::Down,
            &PointerSource::mouse(50.0, 50.0),
            frame,
        );
        input.handle_pointer(
            &mut surface,
            PointerPhase::Move,
            &PointerSource::mouse(60.0, 45.0),
            frame,
        );
        input.handle_pointer(
            &mut surface,
            PointerPhase::Up,
            &PointerSource::mouse(60.0, 45.0),
            frame,
        );

        assert_eq!(surface.shapes().get(id).unwrap().origin, origin.offset(10.0, -5.0));
        assert_eq!(surface.history_len(), 1);
    }

    #[test]
    fn select_down_reports_change_only_when_selection_changes() {
        let mut input = PointerInput::default();
        let mut surface = surface();
        surface.insert_shape(ShapeKind::Line).unwrap();
        surface.set_tool(Tool::Select);
        let frame = BoundingRect::default();

        let on_active = input.handle_pointer(
            &mut surface,
            PointerPhase::Down,
            &PointerSource::mouse(50.0, 50.0),
            frame,
        );
        assert!(on_active.prevent_default);
        assert!(!on_active.changed);

        let miss = input.handle_pointer(
            &mut surface,
            PointerPhase::Down,
            &PointerSource::mouse(50.0, 90.0),
            frame,
        );
        assert!(miss.changed);
        assert!(surface.shapes().active().is_none());

        let miss_again = input.handle_pointer(
            &mut surface,
            PointerPhase::Down,
            &PointerSource::mouse(50.0, 90.0),
            frame,
        );
        assert_eq!(miss_again, InputOutcome::default());
    }

    #[test]
    fn ctrl_z_undoes_last_stroke() {
        let mut input = PointerInput::default();
        let mut surface = surface();
        let frame = BoundingRect::default();
        input.handle_pointer(
            &mut surface,
            PointerPhase::Down,
            &PointerSource::mouse(5.0, 5.0),
            frame,
        );
        input.handle_pointer(
            &mut surface,
            PointerPhase::Up,
            &PointerSource::mouse(5.0, 5.0),
            frame,
        );

        let command = input.handle_key_event(
            &mut surface,
            KeyEvent {
                key: KeyCode::Z,
                modifiers: KeyModifiers {
                    ctrl: true,
                    shift: false,
                },
            },
        );
        assert_eq!(command, Some(InputCommand::Undo));
        assert!(surface.snapshot().unwrap().is_uniform(Color::WHITE));

        let again = input.handle_key_event(
            &mut surface,
            KeyEvent {
                key: KeyCode::Z,
                modifiers: KeyModifiers {
                    ctrl: true,
                    shift: false,
                },
            },
        );
        assert_eq!(again, None);
    }
}

use crate::coords::Rect;
use crate::web::ViewEvent;

use super::types::{
    InputEvent, KeyState, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
    ScrollDelta,
};

/// Pixels forwarded to the embedded view per discrete wheel notch.
pub const SCROLL_PIXELS_PER_NOTCH: f32 = 32.0;

/// Routes window input events to the embedded web view.
///
/// The view occupies a rectangular region of the window; pointer events are
/// only forwarded while the pointer is inside that region, with one
/// exception: once a left-button press starts inside the region, motion and
/// release keep flowing to the view even if the pointer leaves it
/// (drag-capture). In that case coordinates are clamped to the view bounds
/// so the view never sees out-of-range positions.
///
/// Key-repeat events are dropped entirely; the embedded view synthesizes its
/// own repeats from down/up pairs.
#[derive(Debug)]
pub struct ViewRouter {
    region: Rect,
    pointer: (f32, f32),
    dragging: bool,
}

impl ViewRouter {
    pub fn new(region: Rect) -> Self {
        Self {
            region,
            pointer: (0.0, 0.0),
            dragging: false,
        }
    }

    /// Repositions the view region (e.g. after a window resize).
    pub fn set_region(&mut self, region: Rect) {
        self.region = region;
    }

    pub fn region(&self) -> Rect {
        self.region
    }

    /// True while a left-button drag that started inside the region is live.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Translates one window event into the view's native event, if the
    /// routing policy forwards it.
    pub fn route(&mut self, ev: &InputEvent) -> Option<ViewEvent> {
        match ev {
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer = (*x, *y);
                let inside = self.region.contains(*x, *y);

                if !inside && !self.dragging {
                    return None;
                }

                let (vx, vy) = self.view_coords(*x, *y, !inside);
                Some(ViewEvent::MouseMoved { x: vx, y: vy })
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, .. }) => {
                self.pointer = (*x, *y);
                let inside = self.region.contains(*x, *y);

                // Presses outside the region belong to other panels.
                if *state == MouseButtonState::Pressed && !inside {
                    return None;
                }

                if *button == MouseButton::Left {
                    self.dragging = *state == MouseButtonState::Pressed;
                }

                let (vx, vy) = self.view_coords(*x, *y, !inside);
                Some(match state {
                    MouseButtonState::Pressed => ViewEvent::MouseDown {
                        x: vx,
                        y: vy,
                        button: *button,
                    },
                    MouseButtonState::Released => ViewEvent::MouseUp {
                        x: vx,
                        y: vy,
                        button: *button,
                    },
                })
            }

            InputEvent::Scroll { delta, .. } => {
                let (px, py) = self.pointer;
                if !self.region.contains(px, py) {
                    return None;
                }

                let (dx, dy) = match delta {
                    ScrollDelta::Notches { x, y } => {
                        (x * SCROLL_PIXELS_PER_NOTCH, y * SCROLL_PIXELS_PER_NOTCH)
                    }
                    ScrollDelta::Pixels { x, y } => (*x, *y),
                };
                Some(ViewEvent::ScrollByPixel {
                    dx: dx as i32,
                    dy: dy as i32,
                })
            }

            InputEvent::Key { key, state, modifiers, code, repeat } => {
                // Key-repeats are filtered; the view never sees them.
                if *repeat {
                    return None;
                }

                Some(match state {
                    KeyState::Pressed => ViewEvent::KeyDown {
                        key: *key,
                        code: *code,
                        modifiers: *modifiers,
                    },
                    KeyState::Released => ViewEvent::KeyUp {
                        key: *key,
                        code: *code,
                        modifiers: *modifiers,
                    },
                })
            }

            InputEvent::Text(text) => Some(ViewEvent::Char { text: text.clone() }),

            InputEvent::Focused(true) => Some(ViewEvent::FocusGained),
            InputEvent::Focused(false) => Some(ViewEvent::FocusLost),

            InputEvent::ModifiersChanged(_) | InputEvent::PointerLeft => None,
        }
    }

    /// Window space → view-local space, clamping out-of-region coordinates
    /// to `[0, w-1] × [0, h-1]` when requested (drag-capture case).
    fn view_coords(&self, x: f32, y: f32, clamp: bool) -> (i32, i32) {
        let (lx, ly) = self.region.to_local(x, y);
        let mut vx = lx as i32;
        let mut vy = ly as i32;

        if clamp {
            vx = vx.clamp(0, (self.region.w as i32 - 1).max(0));
            vy = vy.clamp(0, (self.region.h as i32 - 1).max(0));
        }

        (vx, vy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, Modifiers};

    fn router() -> ViewRouter {
        // View occupies the right half of a 1280x720 window.
        ViewRouter::new(Rect::new(640.0, 0.0, 640.0, 720.0))
    }

    fn press(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn release(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Released,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    // ── region gating ─────────────────────────────────────────────────────

    #[test]
    fn move_outside_region_is_not_forwarded() {
        let mut r = router();
        assert_eq!(r.route(&moved(10.0, 10.0)), None);
    }

    #[test]
    fn move_inside_region_is_remapped_to_view_space() {
        let mut r = router();
        assert_eq!(
            r.route(&moved(700.0, 30.0)),
            Some(ViewEvent::MouseMoved { x: 60, y: 30 })
        );
    }

    #[test]
    fn press_outside_region_is_not_forwarded() {
        let mut r = router();
        assert_eq!(r.route(&press(10.0, 10.0)), None);
        assert!(!r.is_dragging());
    }

    // ── drag-capture ──────────────────────────────────────────────────────

    #[test]
    fn press_inside_starts_drag_capture() {
        let mut r = router();
        assert!(r.route(&press(700.0, 100.0)).is_some());
        assert!(r.is_dragging());
    }

    #[test]
    fn drag_move_outside_is_forwarded_clamped() {
        let mut r = router();
        r.route(&press(700.0, 100.0));

        // Pointer far outside the region on both axes.
        let ev = r.route(&moved(5000.0, -300.0));
        assert_eq!(ev, Some(ViewEvent::MouseMoved { x: 639, y: 0 }));
    }

    #[test]
    fn drag_release_outside_is_forwarded_clamped_and_ends_capture() {
        let mut r = router();
        r.route(&press(700.0, 100.0));

        let ev = r.route(&release(-50.0, 10_000.0));
        assert_eq!(
            ev,
            Some(ViewEvent::MouseUp {
                x: 0,
                y: 719,
                button: MouseButton::Left,
            })
        );
        assert!(!r.is_dragging());

        // After release, out-of-region motion stops flowing again.
        assert_eq!(r.route(&moved(5000.0, 5000.0)), None);
    }

    // ── scroll ────────────────────────────────────────────────────────────

    #[test]
    fn scroll_is_scaled_by_notch_constant() {
        let mut r = router();
        r.route(&moved(700.0, 100.0));

        let ev = r.route(&InputEvent::Scroll {
            delta: ScrollDelta::Notches { x: 0.0, y: -2.0 },
            modifiers: Modifiers::default(),
        });
        assert_eq!(ev, Some(ViewEvent::ScrollByPixel { dx: 0, dy: -64 }));
    }

    #[test]
    fn scroll_outside_region_is_dropped() {
        let mut r = router();
        r.route(&moved(10.0, 10.0));

        let ev = r.route(&InputEvent::Scroll {
            delta: ScrollDelta::Notches { x: 0.0, y: 1.0 },
            modifiers: Modifiers::default(),
        });
        assert_eq!(ev, None);
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn key_repeat_is_filtered() {
        let mut r = router();
        let ev = r.route(&InputEvent::Key {
            key: Key::A,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            code: 30,
            repeat: true,
        });
        assert_eq!(ev, None);
    }

    #[test]
    fn key_press_and_release_are_forwarded() {
        let mut r = router();
        let down = r.route(&InputEvent::Key {
            key: Key::Enter,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            code: 28,
            repeat: false,
        });
        assert!(matches!(down, Some(ViewEvent::KeyDown { key: Key::Enter, .. })));

        let up = r.route(&InputEvent::Key {
            key: Key::Enter,
            state: KeyState::Released,
            modifiers: Modifiers::default(),
            code: 28,
            repeat: false,
        });
        assert!(matches!(up, Some(ViewEvent::KeyUp { key: Key::Enter, .. })));
    }

    // ── focus / text ──────────────────────────────────────────────────────

    #[test]
    fn focus_change_maps_to_view_focus() {
        let mut r = router();
        assert_eq!(r.route(&InputEvent::Focused(true)), Some(ViewEvent::FocusGained));
        assert_eq!(r.route(&InputEvent::Focused(false)), Some(ViewEvent::FocusLost));
    }

    #[test]
    fn text_commit_maps_to_char() {
        let mut r = router();
        assert_eq!(
            r.route(&InputEvent::Text("é".to_string())),
            Some(ViewEvent::Char { text: "é".to_string() })
        );
    }
}

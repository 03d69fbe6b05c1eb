use super::types::{Gesture, PointerEvent};

/// Maximum pointer travel, in pixels, for a press/release to count as a tap.
pub const DEFAULT_TAP_SLOP: f32 = 8.0;

/// Pixels per wheel "line".
pub const WHEEL_LINE_PIXELS: f32 = 20.0;

#[derive(Debug, Copy, Clone)]
struct Press {
    origin: (f32, f32),
    last: (f32, f32),
    dragging: bool,
}

/// Turns raw pointer events into pans and taps.
///
/// A press becomes a drag once it leaves the slop radius; the first pan then
/// carries the whole travel since the press, so no movement is lost. A release
/// before that point is a tap at the press location.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    slop: f32,
    press: Option<Press>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_TAP_SLOP)
    }
}

impl GestureRecognizer {
    pub fn new(slop: f32) -> Self {
        Self { slop, press: None }
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<Gesture> {
        match event {
            PointerEvent::Pressed { x, y } => {
                self.press = Some(Press {
                    origin: (x, y),
                    last: (x, y),
                    dragging: false,
                });
                None
            }

            PointerEvent::Moved { x, y } => {
                let slop = self.slop;
                let press = self.press.as_mut()?;
                if !press.dragging {
                    let (ox, oy) = press.origin;
                    if (x - ox).hypot(y - oy) <= slop {
                        return None;
                    }
                    press.dragging = true;
                }
                let (lx, ly) = press.last;
                press.last = (x, y);
                Some(Gesture::Pan { dx: x - lx, dy: y - ly })
            }

            PointerEvent::Released { .. } => {
                let press = self.press.take()?;
                if press.dragging {
                    None
                } else {
                    let (x, y) = press.origin;
                    Some(Gesture::Tap { x, y })
                }
            }

            PointerEvent::Wheel { dx, dy } => {
                if dx == 0.0 && dy == 0.0 {
                    None
                } else {
                    Some(Gesture::Pan { dx, dy })
                }
            }

            PointerEvent::Cancelled => {
                self.press = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(r: &mut GestureRecognizer, events: &[PointerEvent]) -> Vec<Gesture> {
        events.iter().filter_map(|e| r.handle(*e)).collect()
    }

    // ── taps ──────────────────────────────────────────────────────────────

    #[test]
    fn press_release_in_place_is_a_tap() {
        let mut r = GestureRecognizer::default();
        let out = feed(
            &mut r,
            &[
                PointerEvent::Pressed { x: 10.0, y: 20.0 },
                PointerEvent::Released { x: 10.0, y: 20.0 },
            ],
        );
        assert_eq!(out, vec![Gesture::Tap { x: 10.0, y: 20.0 }]);
        assert!(!r.is_pressed());
    }

    #[test]
    fn jitter_within_slop_still_taps() {
        let mut r = GestureRecognizer::default();
        let out = feed(
            &mut r,
            &[
                PointerEvent::Pressed { x: 100.0, y: 100.0 },
                PointerEvent::Moved { x: 103.0, y: 104.0 },
                PointerEvent::Released { x: 103.0, y: 104.0 },
            ],
        );
        assert_eq!(out, vec![Gesture::Tap { x: 100.0, y: 100.0 }]);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut r = GestureRecognizer::default();
        assert_eq!(r.handle(PointerEvent::Released { x: 0.0, y: 0.0 }), None);
    }

    // ── pans ──────────────────────────────────────────────────────────────

    #[test]
    fn drag_emits_pans_and_no_tap() {
        let mut r = GestureRecognizer::default();
        let out = feed(
            &mut r,
            &[
                PointerEvent::Pressed { x: 0.0, y: 0.0 },
                PointerEvent::Moved { x: 4.0, y: 0.0 },
                PointerEvent::Moved { x: 20.0, y: 0.0 },
                PointerEvent::Moved { x: 25.0, y: -5.0 },
                PointerEvent::Released { x: 25.0, y: -5.0 },
            ],
        );
        assert_eq!(
            out,
            vec![
                Gesture::Pan { dx: 20.0, dy: 0.0 },
                Gesture::Pan { dx: 5.0, dy: -5.0 },
            ]
        );
    }

    #[test]
    fn hover_without_press_does_nothing() {
        let mut r = GestureRecognizer::default();
        assert_eq!(r.handle(PointerEvent::Moved { x: 500.0, y: 500.0 }), None);
    }

    #[test]
    fn wheel_is_a_pan() {
        let mut r = GestureRecognizer::default();
        assert_eq!(
            r.handle(PointerEvent::Wheel { dx: 0.0, dy: -40.0 }),
            Some(Gesture::Pan { dx: 0.0, dy: -40.0 })
        );
        assert_eq!(r.handle(PointerEvent::Wheel { dx: 0.0, dy: 0.0 }), None);
    }

    #[test]
    fn cancel_abandons_press() {
        let mut r = GestureRecognizer::default();
        let out = feed(
            &mut r,
            &[
                PointerEvent::Pressed { x: 0.0, y: 0.0 },
                PointerEvent::Cancelled,
                PointerEvent::Released { x: 0.0, y: 0.0 },
            ],
        );
        assert!(out.is_empty());
    }
}

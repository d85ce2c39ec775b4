//! Adapts egui pointer input into measurement pointer events.
//!
//! egui reports mouse and touch input through the same primary pointer, so
//! one adapter covers both. Positions are relative to the page's top-left
//! corner.

use pdf_measure_core::{PointerEvent, ScreenPoint};

/// Pointer input observed in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerFrame {
    /// Pointer position over the page, or `None` when it is elsewhere
    pub position: Option<ScreenPoint>,
    /// Primary button went down this frame
    pub pressed: bool,
    /// Primary button went up this frame, wherever the pointer is
    pub released: bool,
}

/// Turns per-frame pointer snapshots into discrete events
#[derive(Debug, Default)]
pub struct PointerAdapter {
    last: Option<ScreenPoint>,
}

impl PointerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events for this frame, in the order they should be handled
    pub fn events(&mut self, frame: PointerFrame) -> Vec<PointerEvent> {
        let mut events = Vec::new();

        match frame.position {
            Some(position) => {
                if self.last != Some(position) {
                    events.push(PointerEvent::Move(position));
                }
                if frame.pressed {
                    events.push(PointerEvent::Down(position));
                }
            }
            None if self.last.is_some() => events.push(PointerEvent::Leave),
            None => {}
        }
        if frame.released {
            events.push(PointerEvent::Up);
        }

        self.last = frame.position;
        events
    }

    /// Forget the last position, e.g. after the page was replaced
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> PointerFrame {
        PointerFrame {
            position: Some(ScreenPoint::new(x, y)),
            ..PointerFrame::default()
        }
    }

    #[test]
    fn test_move_only_when_position_changes() {
        let mut adapter = PointerAdapter::new();
        assert_eq!(
            adapter.events(at(5.0, 5.0)),
            vec![PointerEvent::Move(ScreenPoint::new(5.0, 5.0))]
        );
        assert!(adapter.events(at(5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_click_sequence() {
        let mut adapter = PointerAdapter::new();
        adapter.events(at(5.0, 5.0));

        let press = PointerFrame {
            pressed: true,
            ..at(5.0, 5.0)
        };
        assert_eq!(
            adapter.events(press),
            vec![PointerEvent::Down(ScreenPoint::new(5.0, 5.0))]
        );

        let quick_click = PointerFrame {
            pressed: true,
            released: true,
            ..at(9.0, 9.0)
        };
        assert_eq!(
            adapter.events(quick_click),
            vec![
                PointerEvent::Move(ScreenPoint::new(9.0, 9.0)),
                PointerEvent::Down(ScreenPoint::new(9.0, 9.0)),
                PointerEvent::Up,
            ]
        );
    }

    #[test]
    fn test_leave_once_and_release_anywhere() {
        let mut adapter = PointerAdapter::new();
        adapter.events(at(1.0, 1.0));

        assert_eq!(
            adapter.events(PointerFrame::default()),
            vec![PointerEvent::Leave]
        );
        assert!(adapter.events(PointerFrame::default()).is_empty());

        let released_outside = PointerFrame {
            released: true,
            ..PointerFrame::default()
        };
        assert_eq!(adapter.events(released_outside), vec![PointerEvent::Up]);
    }

    #[test]
    fn test_press_outside_page_is_ignored() {
        let mut adapter = PointerAdapter::new();
        let press = PointerFrame {
            pressed: true,
            ..PointerFrame::default()
        };
        assert!(adapter.events(press).is_empty());
    }

    #[test]
    fn test_reset() {
        let mut adapter = PointerAdapter::new();
        adapter.events(at(1.0, 1.0));
        adapter.reset();
        assert!(adapter.events(PointerFrame::default()).is_empty());
    }
}

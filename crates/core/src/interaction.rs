//! Pointer-driven measurement interaction
//!
//! A small state machine turns pointer events into store mutations:
//! - pressing on an existing endpoint drags it
//! - pressing anywhere else starts a measurement, and the next press
//!   finishes it (hit-testing is skipped while a measurement is open)
//! - releasing the pointer anywhere ends a drag
//! - leaving the surface only hides the magnifier
//!
//! Mouse and touch sources are both adapted into [`PointerEvent`] by the shell.

use crate::measurement::{CommitOutcome, Endpoint, MeasurementStore};
use crate::transform::{CoordinateTransform, PageCoordinate, ScreenPoint};

/// Default hit radius around endpoints, in screen pixels
pub const DEFAULT_HIT_TOLERANCE: f32 = 10.0;

/// Toolkit-independent pointer input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary button pressed on the drawing surface
    Down(ScreenPoint),
    /// Pointer moved over the drawing surface
    Move(ScreenPoint),
    /// Primary button released, anywhere
    Up,
    /// Pointer left the drawing surface
    Leave,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    /// First point placed, waiting for the second
    Creating { pending: PageCoordinate },
    /// Moving one endpoint of an existing measurement
    Dragging { index: usize, endpoint: Endpoint },
}

/// Endpoint found under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub index: usize,
    pub endpoint: Endpoint,
}

/// Find the first endpoint within `tolerance` screen pixels of `cursor`.
///
/// Measurements are scanned in creation order, `p1` before `p2`, so the
/// oldest measurement wins when endpoints overlap.
pub fn hit_test(
    store: &MeasurementStore,
    transform: &CoordinateTransform,
    cursor: ScreenPoint,
    tolerance: f32,
) -> Option<Hit> {
    store.iter().enumerate().find_map(|(index, measurement)| {
        [Endpoint::P1, Endpoint::P2]
            .into_iter()
            .find(|&endpoint| {
                let screen = transform.to_screen(measurement.endpoint(endpoint));
                screen.distance_to(&cursor) <= tolerance
            })
            .map(|endpoint| Hit { index, endpoint })
    })
}

/// Pointer cursor the shell should display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    /// Hovering an endpoint that can be dragged
    Grab,
    /// Dragging an endpoint
    Grabbing,
}

/// What the magnifier should do after an event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MagnifierUpdate {
    /// Leave it as is
    Keep,
    /// Show it centered on this cursor position
    Follow(ScreenPoint),
    Hide,
}

/// Side effects the shell should apply after an event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionOutcome {
    /// The overlay needs repainting
    pub redraw: bool,
    /// Index of a measurement committed by this event
    pub committed: Option<usize>,
    pub cursor: CursorHint,
    pub magnifier: MagnifierUpdate,
}

impl InteractionOutcome {
    pub(crate) fn new(cursor: CursorHint) -> Self {
        Self {
            redraw: false,
            committed: None,
            cursor,
            magnifier: MagnifierUpdate::Keep,
        }
    }
}

/// Owns the interaction state and is the only writer to the store while
/// handling pointer input.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    tolerance: f32,
    /// Cursor position for the rubber-band preview while creating
    ghost: Option<PageCoordinate>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(DEFAULT_HIT_TOLERANCE)
    }
}

impl InteractionController {
    pub fn new(tolerance: f32) -> Self {
        Self {
            state: InteractionState::Idle,
            tolerance,
            ghost: None,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Rubber-band end point, only while creating
    pub fn ghost(&self) -> Option<PageCoordinate> {
        match self.state {
            InteractionState::Creating { .. } => self.ghost,
            _ => None,
        }
    }

    /// Process one pointer event
    pub fn handle(
        &mut self,
        event: PointerEvent,
        store: &mut MeasurementStore,
        transform: &CoordinateTransform,
    ) -> InteractionOutcome {
        match event {
            PointerEvent::Down(cursor) => self.on_down(cursor, store, transform),
            PointerEvent::Move(cursor) => self.on_move(cursor, store, transform),
            PointerEvent::Up => self.on_up(),
            PointerEvent::Leave => {
                let mut outcome = InteractionOutcome::new(self.resting_cursor());
                outcome.magnifier = MagnifierUpdate::Hide;
                outcome
            }
        }
    }

    fn on_down(
        &mut self,
        cursor: ScreenPoint,
        store: &mut MeasurementStore,
        transform: &CoordinateTransform,
    ) -> InteractionOutcome {
        let point = transform.to_page(cursor);

        match self.state {
            InteractionState::Creating { .. } => {
                let mut outcome = InteractionOutcome::new(CursorHint::Default);
                if let CommitOutcome::Committed(index) = store.begin_or_commit(point) {
                    log::debug!("Committed measurement {}", index);
                    outcome.committed = Some(index);
                }
                self.state = InteractionState::Idle;
                self.ghost = None;
                outcome.redraw = true;
                outcome
            }
            InteractionState::Dragging { index, .. } => {
                // The release was lost (e.g. outside the window); finish the
                // drag and treat this as a fresh press.
                log::debug!("Drag on measurement {} ended by a new press", index);
                self.state = InteractionState::Idle;
                self.on_down(cursor, store, transform)
            }
            InteractionState::Idle => {
                if let Some(hit) = hit_test(store, transform, cursor, self.tolerance) {
                    log::debug!("Dragging {:?} of measurement {}", hit.endpoint, hit.index);
                    self.state = InteractionState::Dragging {
                        index: hit.index,
                        endpoint: hit.endpoint,
                    };
                    return InteractionOutcome::new(CursorHint::Grabbing);
                }

                let mut outcome = InteractionOutcome::new(CursorHint::Default);
                match store.begin_or_commit(point) {
                    CommitOutcome::Started => {
                        self.state = InteractionState::Creating { pending: point };
                        self.ghost = Some(point);
                    }
                    // A pending point left behind outside the state machine
                    // completes here, keeping store and state consistent.
                    CommitOutcome::Committed(index) => {
                        outcome.committed = Some(index);
                        self.ghost = None;
                    }
                }
                outcome.redraw = true;
                outcome
            }
        }
    }

    fn on_move(
        &mut self,
        cursor: ScreenPoint,
        store: &mut MeasurementStore,
        transform: &CoordinateTransform,
    ) -> InteractionOutcome {
        let point = transform.to_page(cursor);

        let mut outcome = match self.state {
            InteractionState::Dragging { index, endpoint } => {
                store.update_endpoint(index, endpoint, point);
                let mut outcome = InteractionOutcome::new(CursorHint::Grabbing);
                outcome.redraw = true;
                outcome
            }
            InteractionState::Creating { .. } => {
                self.ghost = Some(point);
                let mut outcome = InteractionOutcome::new(self.hover_cursor(store, transform, cursor));
                outcome.redraw = true;
                outcome
            }
            InteractionState::Idle => {
                InteractionOutcome::new(self.hover_cursor(store, transform, cursor))
            }
        };
        outcome.magnifier = MagnifierUpdate::Follow(cursor);
        outcome
    }

    fn on_up(&mut self) -> InteractionOutcome {
        if let InteractionState::Dragging { index, .. } = self.state {
            log::debug!("Finished dragging measurement {}", index);
            self.state = InteractionState::Idle;
            let mut outcome = InteractionOutcome::new(CursorHint::Default);
            outcome.redraw = true;
            return outcome;
        }
        InteractionOutcome::new(self.resting_cursor())
    }

    /// Abandon a measurement in progress; returns whether one was pending.
    ///
    /// Has no effect while dragging.
    pub fn cancel(&mut self, store: &mut MeasurementStore) -> bool {
        match self.state {
            InteractionState::Creating { .. } => {
                store.cancel_pending();
                self.state = InteractionState::Idle;
                self.ghost = None;
                log::debug!("Cancelled pending measurement");
                true
            }
            _ => false,
        }
    }

    /// Return to idle after the store was cleared or replaced
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.ghost = None;
    }

    fn hover_cursor(
        &self,
        store: &MeasurementStore,
        transform: &CoordinateTransform,
        cursor: ScreenPoint,
    ) -> CursorHint {
        if hit_test(store, transform, cursor, self.tolerance).is_some() {
            CursorHint::Grab
        } else {
            CursorHint::Default
        }
    }

    fn resting_cursor(&self) -> CursorHint {
        match self.state {
            InteractionState::Dragging { .. } => CursorHint::Grabbing,
            _ => CursorHint::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(x: f32, y: f32) -> ScreenPoint {
        ScreenPoint::new(x, y)
    }

    fn page(x: f32, y: f32) -> PageCoordinate {
        PageCoordinate::new(x, y)
    }

    /// Store with one measurement from (10,10) to (100,10)
    fn setup(zoom: f32) -> (InteractionController, MeasurementStore, CoordinateTransform) {
        let mut store = MeasurementStore::new();
        store.begin_or_commit(page(10.0, 10.0));
        store.begin_or_commit(page(100.0, 10.0));
        (
            InteractionController::default(),
            store,
            CoordinateTransform::new(zoom).unwrap(),
        )
    }

    #[test]
    fn test_creation_sequence() {
        let mut controller = InteractionController::default();
        let mut store = MeasurementStore::new();
        let transform = CoordinateTransform::new(2.0).unwrap();

        let outcome = controller.handle(PointerEvent::Down(screen(20.0, 40.0)), &mut store, &transform);
        assert!(outcome.redraw);
        assert_eq!(
            controller.state(),
            InteractionState::Creating {
                pending: page(10.0, 20.0)
            }
        );
        assert_eq!(store.pending(), Some(page(10.0, 20.0)));

        let outcome = controller.handle(PointerEvent::Down(screen(220.0, 40.0)), &mut store, &transform);
        assert_eq!(outcome.committed, Some(0));
        assert_eq!(controller.state(), InteractionState::Idle);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().p1(), page(10.0, 20.0));
        assert_eq!(store.get(0).unwrap().p2(), page(110.0, 20.0));

        // A further single click opens a new measurement instead of completing one
        controller.handle(PointerEvent::Down(screen(300.0, 300.0)), &mut store, &transform);
        assert_eq!(store.len(), 1);
        assert_eq!(store.pending(), Some(page(150.0, 150.0)));
    }

    #[test]
    fn test_creating_ignores_hits() {
        let (mut controller, mut store, transform) = setup(1.0);

        controller.handle(PointerEvent::Down(screen(50.0, 200.0)), &mut store, &transform);
        // Second press lands exactly on an existing endpoint: it still commits
        let outcome = controller.handle(PointerEvent::Down(screen(10.0, 10.0)), &mut store, &transform);
        assert_eq!(outcome.committed, Some(1));
        assert_eq!(store.get(1).unwrap().p2(), page(10.0, 10.0));
        assert_eq!(store.get(0).unwrap().p1(), page(10.0, 10.0));
    }

    #[test]
    fn test_rubber_band_follows_cursor() {
        let mut controller = InteractionController::default();
        let mut store = MeasurementStore::new();
        let transform = CoordinateTransform::default();

        controller.handle(PointerEvent::Down(screen(0.0, 0.0)), &mut store, &transform);
        assert_eq!(controller.ghost(), Some(page(0.0, 0.0)));

        let outcome = controller.handle(PointerEvent::Move(screen(30.0, 40.0)), &mut store, &transform);
        assert!(outcome.redraw);
        assert_eq!(outcome.magnifier, MagnifierUpdate::Follow(screen(30.0, 40.0)));
        assert_eq!(controller.ghost(), Some(page(30.0, 40.0)));
        assert!(matches!(controller.state(), InteractionState::Creating { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_drag_sequence() {
        let (mut controller, mut store, transform) = setup(2.0);

        // p1 of measurement 0 is at (20, 20) on screen
        let outcome = controller.handle(PointerEvent::Down(screen(24.0, 18.0)), &mut store, &transform);
        assert_eq!(outcome.cursor, CursorHint::Grabbing);
        assert_eq!(
            controller.state(),
            InteractionState::Dragging {
                index: 0,
                endpoint: Endpoint::P1
            }
        );
        assert_eq!(store.pending(), None);

        controller.handle(PointerEvent::Move(screen(60.0, 80.0)), &mut store, &transform);
        let outcome = controller.handle(PointerEvent::Up, &mut store, &transform);
        assert!(outcome.redraw);
        assert_eq!(controller.state(), InteractionState::Idle);

        let m = store.get(0).unwrap();
        assert_eq!(m.p1(), page(30.0, 40.0));
        assert_eq!(m.p2(), page(100.0, 10.0));
    }

    #[test]
    fn test_drag_second_endpoint() {
        let (mut controller, mut store, transform) = setup(1.0);

        controller.handle(PointerEvent::Down(screen(100.0, 10.0)), &mut store, &transform);
        controller.handle(PointerEvent::Move(screen(120.0, 60.0)), &mut store, &transform);
        controller.handle(PointerEvent::Up, &mut store, &transform);

        let m = store.get(0).unwrap();
        assert_eq!(m.p1(), page(10.0, 10.0));
        assert_eq!(m.p2(), page(120.0, 60.0));
    }

    #[test]
    fn test_hit_tolerance_boundary() {
        let (_, store, transform) = setup(1.0);

        assert!(hit_test(&store, &transform, screen(20.0, 10.0), 10.0).is_some());
        assert!(hit_test(&store, &transform, screen(20.1, 10.0), 10.0).is_none());
        assert!(hit_test(&store, &transform, screen(55.0, 10.0), 10.0).is_none());
    }

    #[test]
    fn test_hit_tolerance_is_in_screen_pixels() {
        let (_, store, transform) = setup(4.0);
        // p1 is at (40, 40) on screen; 8 screen px away is a hit at any zoom
        assert!(hit_test(&store, &transform, screen(48.0, 40.0), 10.0).is_some());
        assert!(hit_test(&store, &transform, screen(52.0, 40.0), 10.0).is_none());
    }

    #[test]
    fn test_hit_tie_break_prefers_oldest() {
        let mut store = MeasurementStore::new();
        store.begin_or_commit(page(50.0, 50.0));
        store.begin_or_commit(page(200.0, 50.0));
        store.begin_or_commit(page(300.0, 300.0));
        store.begin_or_commit(page(53.0, 50.0));
        let transform = CoordinateTransform::default();

        let hit = hit_test(&store, &transform, screen(52.0, 50.0), 10.0);
        assert_eq!(
            hit,
            Some(Hit {
                index: 0,
                endpoint: Endpoint::P1
            })
        );
    }

    #[test]
    fn test_hit_prefers_p1_within_measurement() {
        let mut store = MeasurementStore::new();
        store.begin_or_commit(page(0.0, 0.0));
        store.begin_or_commit(page(4.0, 0.0));
        let transform = CoordinateTransform::default();

        let hit = hit_test(&store, &transform, screen(3.0, 0.0), 10.0).unwrap();
        assert_eq!(hit.endpoint, Endpoint::P1);
    }

    #[test]
    fn test_hit_test_is_deterministic() {
        let (_, store, transform) = setup(1.5);
        let first = hit_test(&store, &transform, screen(150.0, 15.0), 10.0);
        for _ in 0..10 {
            assert_eq!(hit_test(&store, &transform, screen(150.0, 15.0), 10.0), first);
        }
        assert!(first.is_some());
    }

    #[test]
    fn test_hover_cursor() {
        let (mut controller, mut store, transform) = setup(1.0);

        let outcome = controller.handle(PointerEvent::Move(screen(12.0, 12.0)), &mut store, &transform);
        assert_eq!(outcome.cursor, CursorHint::Grab);
        assert!(!outcome.redraw);

        let outcome = controller.handle(PointerEvent::Move(screen(300.0, 300.0)), &mut store, &transform);
        assert_eq!(outcome.cursor, CursorHint::Default);
    }

    #[test]
    fn test_leave_keeps_state() {
        let (mut controller, mut store, transform) = setup(1.0);

        controller.handle(PointerEvent::Down(screen(10.0, 10.0)), &mut store, &transform);
        let outcome = controller.handle(PointerEvent::Leave, &mut store, &transform);
        assert_eq!(outcome.magnifier, MagnifierUpdate::Hide);
        assert!(matches!(controller.state(), InteractionState::Dragging { .. }));

        // Release outside the surface still ends the drag
        controller.handle(PointerEvent::Up, &mut store, &transform);
        assert_eq!(controller.state(), InteractionState::Idle);

        controller.handle(PointerEvent::Down(screen(200.0, 200.0)), &mut store, &transform);
        controller.handle(PointerEvent::Leave, &mut store, &transform);
        assert!(matches!(controller.state(), InteractionState::Creating { .. }));

        controller.handle(PointerEvent::Down(screen(250.0, 200.0)), &mut store, &transform);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_up_outside_drag_is_noop() {
        let mut controller = InteractionController::default();
        let mut store = MeasurementStore::new();
        let transform = CoordinateTransform::default();

        controller.handle(PointerEvent::Down(screen(5.0, 5.0)), &mut store, &transform);
        let outcome = controller.handle(PointerEvent::Up, &mut store, &transform);
        assert!(!outcome.redraw);
        assert!(matches!(controller.state(), InteractionState::Creating { .. }));
    }

    #[test]
    fn test_press_while_dragging_restarts() {
        let (mut controller, mut store, transform) = setup(1.0);

        controller.handle(PointerEvent::Down(screen(10.0, 10.0)), &mut store, &transform);
        // Release was never seen; next press is handled as if idle
        controller.handle(PointerEvent::Down(screen(400.0, 400.0)), &mut store, &transform);
        assert!(matches!(controller.state(), InteractionState::Creating { .. }));
    }

    #[test]
    fn test_cancel_pending() {
        let mut controller = InteractionController::default();
        let mut store = MeasurementStore::new();
        let transform = CoordinateTransform::default();

        assert!(!controller.cancel(&mut store));

        controller.handle(PointerEvent::Down(screen(5.0, 5.0)), &mut store, &transform);
        assert!(controller.cancel(&mut store));
        assert_eq!(controller.state(), InteractionState::Idle);
        assert_eq!(store.pending(), None);
        assert_eq!(controller.ghost(), None);
    }

    #[test]
    fn test_clear_then_click_creates() {
        let (mut controller, mut store, transform) = setup(1.0);

        controller.handle(PointerEvent::Down(screen(300.0, 300.0)), &mut store, &transform);
        store.clear_all();
        controller.reset();

        // Where an endpoint used to be, a click now starts a new measurement
        controller.handle(PointerEvent::Down(screen(10.0, 10.0)), &mut store, &transform);
        assert_eq!(
            controller.state(),
            InteractionState::Creating {
                pending: page(10.0, 10.0)
            }
        );
        assert!(store.is_empty());
    }
}

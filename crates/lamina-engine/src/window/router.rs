use crate::input::{Action, InputTable, Key, Modifiers, MouseButton, RawEvent};
use crate::overlay::CaptureIntent;

pub(crate) type ResizeCallback = Box<dyn FnMut(u32, u32)>;
pub(crate) type KeyCallback = Box<dyn FnMut(Key, Action, Modifiers)>;
pub(crate) type CursorCallback = Box<dyn FnMut(f64, f64)>;
pub(crate) type MouseButtonCallback = Box<dyn FnMut(MouseButton, Action, Modifiers, f64, f64)>;
pub(crate) type ScrollCallback = Box<dyn FnMut(f64, f64)>;

/// Converts a top-left y coordinate into the bottom-left origin handed to
/// callers: `y = height - y_top - 1`, so y 0 is the bottom pixel row.
fn flip_y(height: u32, y_top: f64) -> f64 {
    f64::from(height) - y_top - 1.0
}

/// The routing core of a surface.
///
/// Owns the cached size, the last scroll offsets, the close flags, the input
/// table, and the registered callback lists. `route` applies one event:
/// polled state always updates, while callback fan-out is suppressed for
/// input classes the overlay captures. Resizes are never suppressed and
/// update the cached size before any callback runs, so flips and queries
/// inside the same pump already see the new height.
///
/// No platform types appear here; everything is testable headless.
pub(crate) struct EventRouter {
    width: u32,
    height: u32,
    scroll: (f64, f64),
    running: bool,
    close_requested: bool,
    table: InputTable,

    resize_callbacks: Vec<ResizeCallback>,
    key_callbacks: Vec<KeyCallback>,
    cursor_callbacks: Vec<CursorCallback>,
    button_callbacks: Vec<MouseButtonCallback>,
    scroll_callbacks: Vec<ScrollCallback>,
}

impl EventRouter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scroll: (0.0, 0.0),
            running: true,
            close_requested: false,
            table: InputTable::default(),
            resize_callbacks: Vec::new(),
            key_callbacks: Vec::new(),
            cursor_callbacks: Vec::new(),
            button_callbacks: Vec::new(),
            scroll_callbacks: Vec::new(),
        }
    }

    /// Applies one event under the given capture intent.
    pub fn route(&mut self, ev: RawEvent, intent: CaptureIntent) {
        match ev {
            RawEvent::Resized { width, height } => {
                self.width = width;
                self.height = height;
                for cb in &mut self.resize_callbacks {
                    cb(width, height);
                }
            }

            RawEvent::Key { key, action } => {
                self.table.apply_key(key, action);
                if !intent.keyboard {
                    let modifiers = self.table.modifiers();
                    for cb in &mut self.key_callbacks {
                        cb(key, action, modifiers);
                    }
                }
            }

            RawEvent::CursorMoved { x, y } => {
                self.table.set_cursor(x, y);
                if !intent.pointer {
                    let y = flip_y(self.height, y);
                    for cb in &mut self.cursor_callbacks {
                        cb(x, y);
                    }
                }
            }

            RawEvent::MouseButton { button, action } => {
                self.table.apply_button(button, action);
                if !intent.pointer {
                    let modifiers = self.table.modifiers();
                    let (x, y) = self.table.cursor();
                    let y = flip_y(self.height, y);
                    for cb in &mut self.button_callbacks {
                        cb(button, action, modifiers, x, y);
                    }
                }
            }

            RawEvent::Scroll { x, y } => {
                self.scroll = (x, y);
                if !intent.pointer {
                    for cb in &mut self.scroll_callbacks {
                        cb(x, y);
                    }
                }
            }

            RawEvent::ModifiersChanged(m) => self.table.set_modifiers(m),

            RawEvent::Focused(f) => self.table.set_focused(f),

            RawEvent::CloseRequested => self.close_requested = true,
        }
    }

    // ── registration ──────────────────────────────────────────────────────

    pub fn on_resize(&mut self, callback: ResizeCallback) {
        self.resize_callbacks.push(callback);
    }

    pub fn on_key(&mut self, callback: KeyCallback) {
        self.key_callbacks.push(callback);
    }

    pub fn on_cursor_move(&mut self, callback: CursorCallback) {
        self.cursor_callbacks.push(callback);
    }

    pub fn on_mouse_button(&mut self, callback: MouseButtonCallback) {
        self.button_callbacks.push(callback);
    }

    pub fn on_scroll(&mut self, callback: ScrollCallback) {
        self.scroll_callbacks.push(callback);
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Last-known cursor position, bottom-left origin.
    pub fn cursor_position(&self) -> (f64, f64) {
        let (x, y) = self.table.cursor();
        (x, flip_y(self.height, y))
    }

    /// Last-seen scroll offsets.
    pub fn scroll_offset(&self) -> (f64, f64) {
        self.scroll
    }

    pub fn key_action(&self, key: Key) -> Action {
        self.table.key_action(key)
    }

    pub fn mouse_action(&self, button: MouseButton) -> Action {
        self.table.mouse_action(button)
    }

    pub fn modifiers(&self) -> Modifiers {
        self.table.modifiers()
    }

    pub fn focused(&self) -> bool {
        self.table.focused()
    }

    pub fn begin_interval(&mut self) {
        self.table.begin_interval();
    }

    // ── lifecycle flags ───────────────────────────────────────────────────

    /// Cooperative close: clears the running flag. Observed by the loop at
    /// the next iteration boundary; nothing is torn down here.
    pub fn close(&mut self) {
        self.running = false;
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn should_close(&self) -> bool {
        self.close_requested || !self.running
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn captured(keyboard: bool, pointer: bool) -> CaptureIntent {
        CaptureIntent { keyboard, pointer }
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_updates_cached_size() {
        let mut router = EventRouter::new(800, 600);
        router.route(RawEvent::Resized { width: 1024, height: 768 }, CaptureIntent::none());
        assert_eq!(router.size(), (1024, 768));
    }

    #[test]
    fn resize_fires_callbacks_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut router = EventRouter::new(800, 600);

        let l = log.clone();
        router.on_resize(Box::new(move |w, h| l.borrow_mut().push(format!("a:{w}x{h}"))));
        let l = log.clone();
        router.on_resize(Box::new(move |w, h| l.borrow_mut().push(format!("b:{w}x{h}"))));

        router.route(RawEvent::Resized { width: 640, height: 480 }, CaptureIntent::none());
        assert_eq!(*log.borrow(), vec!["a:640x480", "b:640x480"]);
    }

    #[test]
    fn resize_is_never_suppressed_by_capture() {
        let count = Rc::new(RefCell::new(0));
        let mut router = EventRouter::new(800, 600);

        let c = count.clone();
        router.on_resize(Box::new(move |_, _| *c.borrow_mut() += 1));

        router.route(RawEvent::Resized { width: 100, height: 100 }, captured(true, true));
        assert_eq!(*count.borrow(), 1);
        assert_eq!(router.size(), (100, 100));
    }

    #[test]
    fn cursor_flip_uses_the_latest_height() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut router = EventRouter::new(800, 600);

        let s = seen.clone();
        router.on_cursor_move(Box::new(move |x, y| s.borrow_mut().push((x, y))));

        // Shrink first; the flip after it must use the new height.
        router.route(RawEvent::Resized { width: 800, height: 100 }, CaptureIntent::none());
        router.route(RawEvent::CursorMoved { x: 5.0, y: 10.0 }, CaptureIntent::none());
        assert_eq!(*seen.borrow(), vec![(5.0, 89.0)]);
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn key_callbacks_fire_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut router = EventRouter::new(800, 600);

        let l = log.clone();
        router.on_key(Box::new(move |k, a, _| l.borrow_mut().push(format!("first {k} {a:?}"))));
        let l = log.clone();
        router.on_key(Box::new(move |k, a, _| l.borrow_mut().push(format!("second {k} {a:?}"))));

        router.route(
            RawEvent::Key { key: Key::E, action: Action::Press },
            CaptureIntent::none(),
        );
        assert_eq!(*log.borrow(), vec!["first E Press", "second E Press"]);
    }

    #[test]
    fn keyboard_capture_suppresses_key_callbacks() {
        let count = Rc::new(RefCell::new(0));
        let mut router = EventRouter::new(800, 600);

        let c = count.clone();
        router.on_key(Box::new(move |_, _, _| *c.borrow_mut() += 1));

        router.route(
            RawEvent::Key { key: Key::A, action: Action::Press },
            captured(true, false),
        );
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn key_state_updates_even_under_capture() {
        let mut router = EventRouter::new(800, 600);
        router.route(
            RawEvent::Key { key: Key::A, action: Action::Press },
            captured(true, true),
        );
        assert_eq!(router.key_action(Key::A), Action::Press);
    }

    #[test]
    fn pointer_capture_does_not_block_keys() {
        let count = Rc::new(RefCell::new(0));
        let mut router = EventRouter::new(800, 600);

        let c = count.clone();
        router.on_key(Box::new(move |_, _, _| *c.borrow_mut() += 1));

        router.route(
            RawEvent::Key { key: Key::A, action: Action::Press },
            captured(false, true),
        );
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn key_callbacks_see_current_modifiers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut router = EventRouter::new(800, 600);

        let s = seen.clone();
        router.on_key(Box::new(move |_, _, m| s.borrow_mut().push(m)));

        let ctrl = Modifiers { ctrl: true, ..Default::default() };
        router.route(RawEvent::ModifiersChanged(ctrl), CaptureIntent::none());
        router.route(
            RawEvent::Key { key: Key::S, action: Action::Press },
            CaptureIntent::none(),
        );
        assert_eq!(*seen.borrow(), vec![ctrl]);
    }

    // ── cursor ────────────────────────────────────────────────────────────

    #[test]
    fn cursor_query_reports_bottom_left_origin() {
        let mut router = EventRouter::new(800, 600);
        router.route(RawEvent::CursorMoved { x: 100.0, y: 10.0 }, CaptureIntent::none());
        assert_eq!(router.cursor_position(), (100.0, 589.0));
    }

    #[test]
    fn cursor_callbacks_get_the_same_flip_as_the_query() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut router = EventRouter::new(800, 600);

        let s = seen.clone();
        router.on_cursor_move(Box::new(move |x, y| s.borrow_mut().push((x, y))));

        router.route(RawEvent::CursorMoved { x: 100.0, y: 10.0 }, CaptureIntent::none());
        assert_eq!(*seen.borrow(), vec![router.cursor_position()]);
    }

    #[test]
    fn pointer_capture_suppresses_cursor_callbacks_but_not_the_cache() {
        let count = Rc::new(RefCell::new(0));
        let mut router = EventRouter::new(800, 600);

        let c = count.clone();
        router.on_cursor_move(Box::new(move |_, _| *c.borrow_mut() += 1));

        router.route(RawEvent::CursorMoved { x: 42.0, y: 0.0 }, captured(false, true));
        assert_eq!(*count.borrow(), 0);
        assert_eq!(router.cursor_position(), (42.0, 599.0));
    }

    // ── mouse buttons ─────────────────────────────────────────────────────

    #[test]
    fn button_callbacks_get_position_and_modifiers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut router = EventRouter::new(800, 100);

        let s = seen.clone();
        router.on_mouse_button(Box::new(move |b, a, m, x, y| {
            s.borrow_mut().push((b, a, m, x, y));
        }));

        let shift = Modifiers { shift: true, ..Default::default() };
        router.route(RawEvent::ModifiersChanged(shift), CaptureIntent::none());
        router.route(RawEvent::CursorMoved { x: 40.0, y: 30.0 }, CaptureIntent::none());
        router.route(
            RawEvent::MouseButton { button: MouseButton::Left, action: Action::Press },
            CaptureIntent::none(),
        );

        assert_eq!(
            *seen.borrow(),
            vec![(MouseButton::Left, Action::Press, shift, 40.0, 69.0)]
        );
    }

    #[test]
    fn button_state_updates_even_under_capture() {
        let mut router = EventRouter::new(800, 600);
        router.route(
            RawEvent::MouseButton { button: MouseButton::Right, action: Action::Press },
            captured(true, true),
        );
        assert_eq!(router.mouse_action(MouseButton::Right), Action::Press);
    }

    // ── scroll ────────────────────────────────────────────────────────────

    #[test]
    fn scroll_callbacks_fire_when_not_captured() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut router = EventRouter::new(800, 600);

        let s = seen.clone();
        router.on_scroll(Box::new(move |x, y| s.borrow_mut().push((x, y))));

        router.route(RawEvent::Scroll { x: 0.0, y: -1.0 }, CaptureIntent::none());
        assert_eq!(*seen.borrow(), vec![(0.0, -1.0)]);
    }

    #[test]
    fn scroll_cache_updates_even_under_capture() {
        let count = Rc::new(RefCell::new(0));
        let mut router = EventRouter::new(800, 600);

        let c = count.clone();
        router.on_scroll(Box::new(move |_, _| *c.borrow_mut() += 1));

        router.route(RawEvent::Scroll { x: 2.0, y: 3.0 }, captured(false, true));
        assert_eq!(*count.borrow(), 0);
        assert_eq!(router.scroll_offset(), (2.0, 3.0));
    }

    // ── focus ─────────────────────────────────────────────────────────────

    #[test]
    fn focus_query_follows_the_platform_reports() {
        let mut router = EventRouter::new(800, 600);
        assert!(!router.focused());

        router.route(RawEvent::Focused(true), CaptureIntent::none());
        assert!(router.focused());

        router.route(RawEvent::Focused(false), CaptureIntent::none());
        assert!(!router.focused());
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut router = EventRouter::new(800, 600);
        router.route(
            RawEvent::Key { key: Key::W, action: Action::Press },
            CaptureIntent::none(),
        );
        router.route(RawEvent::Focused(false), CaptureIntent::none());

        router.begin_interval();
        assert_eq!(router.key_action(Key::W), Action::Release);
    }

    // ── close ─────────────────────────────────────────────────────────────

    #[test]
    fn fresh_router_does_not_want_to_close() {
        let router = EventRouter::new(800, 600);
        assert!(!router.should_close());
    }

    #[test]
    fn platform_close_request_sets_should_close() {
        let mut router = EventRouter::new(800, 600);
        router.route(RawEvent::CloseRequested, CaptureIntent::none());
        assert!(router.should_close());
    }

    #[test]
    fn cooperative_close_sets_should_close() {
        let mut router = EventRouter::new(800, 600);
        router.close();
        assert!(router.should_close());
    }
}

//! Transient overlays that close on the first pointer-down outside them.
//!
//! A [`PointerHub`] stands in for the document-level pointer listener list.
//! An [`OutsideDismiss`] registers with it only while its panel is open.

use crate::sync::listeners::{ListenerSet, Subscription};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock, Weak};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Boundary test for a live on-screen region.
pub trait Region: Send + Sync {
    fn contains(&self, point: Point) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl Region for Rect {
    fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// A region that contains nothing, for overlays whose panel is the trigger.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nowhere;

impl Region for Nowhere {
    fn contains(&self, _point: Point) -> bool {
        false
    }
}

/// Global pointer-down listener registry.
#[derive(Clone, Default)]
pub struct PointerHub {
    listeners: ListenerSet<Point>,
}

static GLOBAL_HUB: OnceLock<PointerHub> = OnceLock::new();

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static PointerHub {
        GLOBAL_HUB.get_or_init(PointerHub::new)
    }

    /// Deliver a pointer-down at `at`; returns how many listeners saw it.
    pub fn pointer_down(&self, at: Point) -> usize {
        self.listeners.emit(&at)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn listen<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Point) + Send + Sync + 'static,
    {
        self.listeners.add(listener)
    }
}

struct DismissState {
    open: bool,
    trigger: Arc<dyn Region>,
    panel: Arc<dyn Region>,
    listener: Option<Subscription>,
}

struct DismissInner {
    hub: PointerHub,
    state: Mutex<DismissState>,
}

impl DismissInner {
    fn on_pointer_down(&self, at: Point) {
        let released = {
            let mut state = self.state.lock();
            if !state.open || state.trigger.contains(at) || state.panel.contains(at) {
                return;
            }
            state.open = false;
            state.listener.take()
        };
        drop(released);
        tracing::debug!(x = at.x, y = at.y, "Overlay dismissed by outside pointer-down");
    }
}

/// Open/closed state of one overlay plus its outside-click listener.
///
/// The hub listener exists exactly while the overlay is open; dropping the
/// `OutsideDismiss` removes it.
pub struct OutsideDismiss {
    inner: Arc<DismissInner>,
}

impl OutsideDismiss {
    pub fn new(hub: PointerHub, trigger: impl Region + 'static, panel: impl Region + 'static) -> Self {
        Self {
            inner: Arc::new(DismissInner {
                hub,
                state: Mutex::new(DismissState {
                    open: false,
                    trigger: Arc::new(trigger),
                    panel: Arc::new(panel),
                    listener: None,
                }),
            }),
        }
    }

    /// Update bounds after layout changes.
    pub fn set_regions(&self, trigger: impl Region + 'static, panel: impl Region + 'static) {
        let mut state = self.inner.state.lock();
        state.trigger = Arc::new(trigger);
        state.panel = Arc::new(panel);
    }

    pub fn is_open(&self) -> bool {
        self.inner.state.lock().open
    }

    pub fn is_listening(&self) -> bool {
        self.inner.state.lock().listener.is_some()
    }

    /// Idempotent.
    pub fn open(&self) {
        let mut state = self.inner.state.lock();
        if state.open {
            return;
        }
        state.open = true;

        let weak: Weak<DismissInner> = Arc::downgrade(&self.inner);
        state.listener = Some(self.inner.hub.listen(move |at| {
            if let Some(inner) = weak.upgrade() {
                inner.on_pointer_down(*at);
            }
        }));
    }

    pub fn close(&self) {
        let released = {
            let mut state = self.inner.state.lock();
            state.open = false;
            state.listener.take()
        };
        drop(released);
    }

    /// Focusing the trigger reopens the overlay when it still has content.
    /// Returns whether the overlay is open afterwards.
    pub fn focus_trigger(&self, has_content: bool) -> bool {
        if has_content {
            self.open();
        }
        self.is_open()
    }
}

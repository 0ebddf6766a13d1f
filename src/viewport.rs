//! Window size tracking and the layout breakpoint derived from it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Content switches to the narrow layout at or below this logical width.
pub const COMPACT_MAX_WIDTH: u32 = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Content takes 80% of the window width.
    Wide,
    /// Content takes the full window width.
    Compact,
}

impl Layout {
    pub fn for_width(width: u32) -> Self {
        if width > COMPACT_MAX_WIDTH {
            Self::Wide
        } else {
            Self::Compact
        }
    }

    pub fn content_ratio(self) -> f32 {
        match self {
            Self::Wide => 0.8,
            Self::Compact => 1.0,
        }
    }
}

type Listener = Rc<RefCell<dyn FnMut(Dimensions)>>;

#[derive(Default)]
struct Inner {
    current: Dimensions,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Tracks the display surface size for the UI thread.
///
/// Starts at `{0, 0}` until a surface reports its size.
#[derive(Clone, Default)]
pub struct ViewportTracker {
    inner: Rc<RefCell<Inner>>,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial(dimensions: Dimensions) -> Self {
        let tracker = Self::new();
        tracker.inner.borrow_mut().current = dimensions;
        tracker
    }

    pub fn current(&self) -> Dimensions {
        self.inner.borrow().current
    }

    pub fn layout(&self) -> Layout {
        Layout::for_width(self.current().width)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Registers `callback` for every subsequent resize. The listener lives as
    /// long as the returned [`Subscription`].
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Dimensions) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(RefCell::new(callback))));
        Subscription {
            id,
            tracker: Rc::downgrade(&self.inner),
        }
    }

    /// Records a new surface size and notifies each listener once.
    pub fn resize(&self, dimensions: Dimensions) {
        let snapshot: Vec<(u64, Listener)> = {
            let mut inner = self.inner.borrow_mut();
            inner.current = dimensions;
            inner.listeners.clone()
        };

        for (id, listener) in snapshot {
            // A listener removed by an earlier callback in this pass is skipped.
            let live = self.inner.borrow().listeners.iter().any(|(l, _)| *l == id);
            if !live {
                continue;
            }
            // A re-entrant resize from inside this listener does not call it again.
            if let Ok(mut callback) = listener.try_borrow_mut() {
                callback(dimensions);
            }
        }
    }
}

/// Handle to a resize listener. Unregisters on [`Subscription::unsubscribe`] or drop.
pub struct Subscription {
    id: u64,
    tracker: Weak<RefCell<Inner>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.tracker.upgrade() else {
            return;
        };
        // The listener is dropped after the borrow ends; its captures may hold
        // subscriptions of their own.
        let removed = {
            let mut inner = inner.borrow_mut();
            inner
                .listeners
                .iter()
                .position(|(id, _)| *id == self.id)
                .map(|index| inner.listeners.remove(index))
        };
        drop(removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn headless_tracker_reports_zero() {
        let tracker = ViewportTracker::new();
        assert_eq!(tracker.current(), Dimensions::new(0, 0));
        assert_eq!(tracker.layout(), Layout::Compact);
    }

    #[test]
    fn current_reports_initial_dimensions_before_resize() {
        let tracker = ViewportTracker::with_initial(Dimensions::new(1280, 800));
        assert_eq!(tracker.current(), Dimensions::new(1280, 800));
        assert_eq!(tracker.layout(), Layout::Wide);
    }

    #[test]
    fn subscriber_fires_once_per_resize_until_unsubscribed() {
        let tracker = ViewportTracker::with_initial(Dimensions::new(1024, 768));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let subscription = tracker.subscribe(move |dims| sink.borrow_mut().push(dims));

        tracker.resize(Dimensions::new(480, 640));
        assert_eq!(*seen.borrow(), vec![Dimensions::new(480, 640)]);
        assert_eq!(tracker.current(), Dimensions::new(480, 640));

        subscription.unsubscribe();
        assert_eq!(tracker.listener_count(), 0);

        tracker.resize(Dimensions::new(900, 700));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(tracker.current(), Dimensions::new(900, 700));
    }

    #[test]
    fn dropping_subscription_releases_listener() {
        let tracker = ViewportTracker::new();
        let hits = Rc::new(Cell::new(0));
        {
            let hits = Rc::clone(&hits);
            let _subscription = tracker.subscribe(move |_| hits.set(hits.get() + 1));
            assert_eq!(tracker.listener_count(), 1);
        }
        assert_eq!(tracker.listener_count(), 0);
        tracker.resize(Dimensions::new(10, 10));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn callback_may_subscribe_during_resize() {
        let tracker = ViewportTracker::new();
        let nested = Rc::new(RefCell::new(Vec::new()));

        let handle = tracker.clone();
        let store = Rc::clone(&nested);
        let _outer = tracker.subscribe(move |_| {
            store.borrow_mut().push(handle.subscribe(|_| {}));
        });

        tracker.resize(Dimensions::new(1, 1));
        assert_eq!(tracker.listener_count(), 2);
    }

    #[test]
    fn subscription_outliving_tracker_is_harmless() {
        let tracker = ViewportTracker::new();
        let subscription = tracker.subscribe(|_| {});
        drop(tracker);
        subscription.unsubscribe();
    }

    #[test]
    fn breakpoint_is_exclusive_at_500() {
        assert_eq!(Layout::for_width(500), Layout::Compact);
        assert_eq!(Layout::for_width(501), Layout::Wide);
        assert!((Layout::Wide.content_ratio() - 0.8).abs() < f32::EPSILON);
        assert!((Layout::Compact.content_ratio() - 1.0).abs() < f32::EPSILON);
    }
}

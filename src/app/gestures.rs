use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use gtk4::prelude::*;
use gtk4::{DrawingArea, EventSequenceState, GestureDrag};

use crate::browser::BrowserSession;
use crate::gesture::ReleaseOutcome;

use super::card::PhotoPrefetcher;

#[derive(Clone)]
pub(super) struct SwipeGestureContext {
    pub(super) session: Rc<RefCell<BrowserSession>>,
    pub(super) card: DrawingArea,
    pub(super) prefetcher: PhotoPrefetcher,
    pub(super) ticker_running: Rc<Cell<bool>>,
    pub(super) frame_interval: Duration,
}

pub(super) fn connect_swipe_gesture(context: SwipeGestureContext) {
    let swipe_gesture = GestureDrag::new();
    swipe_gesture.set_button(gtk4::gdk::BUTTON_PRIMARY);

    let begin_context = context.clone();
    swipe_gesture.connect_drag_begin(move |gesture, _, _| {
        handle_swipe_begin(&begin_context, gesture);
    });

    let update_context = context.clone();
    swipe_gesture.connect_drag_update(move |_, offset_x, offset_y| {
        handle_swipe_update(&update_context, offset_x, offset_y);
    });

    let end_context = context.clone();
    swipe_gesture.connect_drag_end(move |_, offset_x, offset_y| {
        handle_swipe_end(&end_context, offset_x, offset_y);
    });

    let resize_session = context.session.clone();
    context.card.connect_resize(move |_, width, _| {
        resize_session
            .borrow_mut()
            .set_screen_width(f64::from(width));
    });

    context.card.add_controller(swipe_gesture);
}

fn handle_swipe_begin(context: &SwipeGestureContext, gesture: &GestureDrag) {
    let granted = context.session.borrow_mut().begin_drag();
    match granted {
        Ok(()) => {
            gesture.set_state(EventSequenceState::Claimed);
            context.card.queue_draw();
        }
        Err(err) => {
            tracing::debug!(?err, "swipe refused");
            gesture.set_state(EventSequenceState::Denied);
        }
    }
}

fn handle_swipe_update(context: &SwipeGestureContext, offset_x: f64, offset_y: f64) {
    let visual = context.session.borrow_mut().drag_to(offset_x, offset_y);
    if visual.is_some() {
        context.card.queue_draw();
    }
}

fn handle_swipe_end(context: &SwipeGestureContext, offset_x: f64, offset_y: f64) {
    let released = context
        .session
        .borrow_mut()
        .release(offset_x, offset_y, Instant::now());
    match released {
        Ok(ReleaseOutcome::Committed { direction, index }) => {
            tracing::debug!(?direction, index, "swipe committed");
            context.prefetcher.sync();
        }
        Ok(ReleaseOutcome::Cancelled) => {
            tracing::debug!(offset_x, "swipe cancelled");
        }
        Err(err) => {
            tracing::debug!(?err, "release ignored");
            return;
        }
    }
    ensure_settle_ticker(context);
    context.card.queue_draw();
}

/// Drives the settle animation on the main loop until the engine is idle.
/// At most one ticker runs at a time.
fn ensure_settle_ticker(context: &SwipeGestureContext) {
    if context.ticker_running.replace(true) {
        return;
    }

    let session = context.session.clone();
    let card = context.card.clone();
    let ticker_running = context.ticker_running.clone();
    gtk4::glib::timeout_add_local(context.frame_interval, move || {
        let completion = session.borrow_mut().tick(Instant::now());
        card.queue_draw();
        if let Some(completion) = completion {
            tracing::trace!(?completion, "card settled");
        }
        if session.borrow().is_animating() {
            gtk4::glib::ControlFlow::Continue
        } else {
            ticker_running.set(false);
            gtk4::glib::ControlFlow::Break
        }
    });
}

//! Touch dispatch
//!
//! A press is offered to every target of the current screen in touch-list
//! order; all targets under the point are hit, not just the topmost one.
//! Invisible and greyed-out targets are skipped. A target runs its touch
//! handler once per press, or on every sample if it is draggable.
//!
//! On release every target hit by the touch runs its release handler
//! exactly once. Long presses are deadlines checked on every tick.

use alloc::vec::Vec;
use embedded_graphics::prelude::*;
use log::debug;

use crate::screens::context::Ctx;
use crate::ui::core::{Trigger, WidgetId};

/// Offer a touch sample (first contact or drag) to the current screen
pub(crate) fn press(ctx: &mut Ctx<'_>, point: Point) {
    let now = ctx.session.now;
    let timing = ctx.session.timing;
    for id in targets(ctx) {
        if ctx.session.is_pending() {
            // A callback asked to leave this screen
            debug!("Navigation pending, abandoning touch list");
            break;
        }
        let long_press = ctx.screen.has_callback(id, Trigger::LongPress);
        let Some(target) = ctx.screen.touch_mut(id) else {
            continue;
        };
        let base = target.base();
        if !base.visible || base.greyed || !base.bounds.contains(point) {
            continue;
        }
        let state = target.touch_state_mut();
        state.was_touched = true;
        if state.busy && !state.can_drag {
            continue;
        }
        if !state.busy {
            state.busy = true;
            if long_press {
                state.long_press_at = Some(now + timing.long_press);
            }
        }
        let response = target.touched(point, now, &timing);
        ctx.respond(id, response);
    }
}

/// The panel is no longer touched
pub(crate) fn release(ctx: &mut Ctx<'_>) {
    for id in targets(ctx) {
        let Some(target) = ctx.screen.touch_mut(id) else {
            continue;
        };
        let state = target.touch_state_mut();
        if !state.was_touched {
            continue;
        }
        state.reset();
        let response = target.untouched();
        ctx.respond(id, response);
        ctx.fire(id, Trigger::Release);
    }
}

/// Expire lit colours and fire due long presses
pub(crate) fn tick(ctx: &mut Ctx<'_>) {
    let now = ctx.session.now;
    for id in targets(ctx) {
        if ctx.session.is_pending() {
            break;
        }
        let Some(target) = ctx.screen.touch_mut(id) else {
            continue;
        };
        let expired = target.poll(now);
        let state = target.touch_state_mut();
        let long_press = match state.long_press_at {
            Some(at) if state.busy && now >= at => {
                state.long_press_at = None;
                true
            }
            _ => false,
        };
        if expired {
            ctx.refresh(id);
        }
        if long_press {
            debug!("Long press on {:?}", id);
            ctx.fire(id, Trigger::LongPress);
        }
    }
}

fn targets(ctx: &Ctx<'_>) -> Vec<WidgetId> {
    ctx.screen.touch_list.clone()
}

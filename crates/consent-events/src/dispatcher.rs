//! Synchronous listener fan-out.
//!
//! Listeners are shared handles ([`Listener`]); registering the same handle
//! twice registers it twice, and `off` compares handles by identity. The
//! dispatcher never holds a borrow of its lists while a listener runs, so a
//! listener may register, unregister or trigger further dispatches.

use std::cell::RefCell;
use std::rc::Rc;

use crate::channel::Channel;

/// A registered callback, invoked with the dispatch context and the affected
/// category identifier.
pub type Listener<C> = Rc<dyn Fn(&C, &str)>;

/// Wrap a closure as a [`Listener`].
pub fn listener<C, F>(f: F) -> Listener<C>
where
    C: ?Sized,
    F: Fn(&C, &str) + 'static,
{
    Rc::new(f)
}

/// Per-channel listener lists.
pub struct EventDispatcher<C: ?Sized> {
    channels: RefCell<[Vec<Listener<C>>; 3]>,
}

impl<C: ?Sized> EventDispatcher<C> {
    /// Create a dispatcher with no registrations.
    pub fn new() -> Self {
        Self {
            channels: RefCell::new([Vec::new(), Vec::new(), Vec::new()]),
        }
    }

    /// Register `listener` on `channel`.
    pub fn on(&self, channel: Channel, listener: Listener<C>) {
        self.channels.borrow_mut()[channel.index()].push(listener);
    }

    /// Remove the first registration of `listener` on `channel`.
    ///
    /// Returns whether a registration was removed.
    pub fn off(&self, channel: Channel, listener: &Listener<C>) -> bool {
        let mut channels = self.channels.borrow_mut();
        let listeners = &mut channels[channel.index()];

        match listeners.iter().position(|l| same_listener(l, listener)) {
            Some(pos) => {
                listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Invoke every listener registered on `channel`, in registration order.
    ///
    /// Registrations made while dispatching take effect from the next
    /// dispatch. A listener removed by an earlier one in the same dispatch is
    /// skipped. Returns how many listeners were invoked. Panics raised by a
    /// listener propagate to the caller.
    pub fn dispatch(&self, channel: Channel, ctx: &C, id: &str) -> usize {
        let snapshot: Vec<Listener<C>> = self.channels.borrow()[channel.index()].clone();
        let mut invoked = 0;

        for listener in &snapshot {
            if !self.is_registered(channel, listener) {
                continue;
            }
            listener(ctx, id);
            invoked += 1;
        }

        invoked
    }

    fn is_registered(&self, channel: Channel, listener: &Listener<C>) -> bool {
        self.channels.borrow()[channel.index()]
            .iter()
            .any(|l| same_listener(l, listener))
    }

    /// Number of registrations on `channel`.
    pub fn listener_count(&self, channel: Channel) -> usize {
        self.channels.borrow()[channel.index()].len()
    }
}

impl<C: ?Sized> Default for EventDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity comparison on the listener allocation.
fn same_listener<C: ?Sized>(a: &Listener<C>, b: &Listener<C>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

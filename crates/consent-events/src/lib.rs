//! # Consent Kernel Events
//!
//! Publish/subscribe for grant changes over a closed set of channels.
//!
//! ## Overview
//!
//! Every applied grant change produces two notifications, in order:
//!
//! ```text
//! set_grant(id, true)   ->  update(id), grant(id)
//! set_grant(id, false)  ->  update(id), revoke(id)
//! ```
//!
//! Dispatch is synchronous and single-threaded. Listeners run on the
//! caller's stack, in registration order, and may re-enter the code that
//! dispatched them.
//!
//! ## Usage
//!
//! ```rust
//! use std::cell::Cell;
//! use consent_events::{listener, Channel, EventDispatcher};
//!
//! let dispatcher = EventDispatcher::new();
//! let on_update = listener(|hits: &Cell<u32>, _id: &str| hits.set(hits.get() + 1));
//!
//! dispatcher.on(Channel::Update, on_update.clone());
//! let hits = Cell::new(0);
//! dispatcher.dispatch(Channel::Update, &hits, "analytics");
//! dispatcher.off(Channel::Update, &on_update);
//! dispatcher.dispatch(Channel::Update, &hits, "analytics");
//!
//! assert_eq!(hits.get(), 1);
//! ```

pub mod channel;
pub mod dispatcher;

pub use channel::{Channel, UnknownChannel};
pub use dispatcher::{listener, EventDispatcher, Listener};

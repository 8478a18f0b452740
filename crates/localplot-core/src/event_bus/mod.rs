//! # Event Bus Module
//!
//! Publish/subscribe distribution of application events. The arrange job
//! talks to its caller over a dedicated channel; the caller relays what the
//! user should see (status lines, applied placements) onto this bus, where
//! console and log views subscribe.
//!
//! ```rust,ignore
//! use localplot_core::event_bus::{event_bus, AppEvent, EventCategory, EventFilter, LayoutEvent};
//!
//! let subscription = event_bus().subscribe(
//!     EventFilter::Categories(vec![EventCategory::Layout]),
//!     |event| println!("{}", event.description()),
//! );
//!
//! event_bus().publish(AppEvent::Layout(LayoutEvent::ArrangeStarted { entries: 3 }));
//! event_bus().unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;

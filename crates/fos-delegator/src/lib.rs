//! fOS Delegator - synthetic event delegation
//!
//! Instead of attaching a native listener to every interactive node, a
//! [`Delegator`] attaches one capture listener per event name to a root node
//! and re-derives bubbling in user code:
//!
//! 1. Global handlers for the event name run once, with `current_target`
//!    set to the root.
//! 2. Starting at the native target, the nearest node with handlers for the
//!    event (or catch-all handlers) is found and its handlers run, named
//!    handlers before catch-all ones.
//! 3. Unless a handler called [`ProxyEvent::stop_bubbling`], the walk resumes
//!    at that node's parent.
//!
//! Handlers can be registered on any node, including nodes not yet attached
//! to the document, without touching native listeners.
//!
//! # Example
//! ```rust
//! use fos_delegator::{Delegator, DelegatorConfig, Handler};
//! use fos_dom::{Document, Event};
//!
//! let mut doc = Document::default();
//! let body = doc.body();
//! let button = doc.append_element(body, "button").unwrap();
//!
//! let mut delegator = Delegator::for_document(&mut doc, &DelegatorConfig::manual()).unwrap();
//! delegator.listen_to(doc.tree_mut(), "click").unwrap();
//! delegator.add_event_listener(body, "click", Handler::from_fn(move |ev| {
//!     assert_eq!(ev.current_target(), body);
//!     assert_eq!(ev.target, button);
//!     Ok(())
//! }));
//!
//! doc.tree().dispatch_event(&mut Event::new("click", button)).unwrap();
//! ```

mod config;
mod delegator;
mod handler;
mod proxy_event;
mod store;

pub use config::{DelegatorConfig, COMMON_EVENTS};
pub use delegator::Delegator;
pub use handler::{EventHandler, Handler, HandlerResult};
pub use proxy_event::ProxyEvent;
pub use store::{DataSet, EventKey, Listener};

use fos_dom::DomError;

/// Delegator errors
#[derive(Debug, thiserror::Error)]
pub enum DelegatorError {
    #[error("cannot unlisten to {event}: it was never listened to")]
    CannotUnlisten { event: String },
    
    #[error(transparent)]
    Dom(#[from] DomError),
}

//! Delegated event handlers
//!
//! A handler is either a plain callback or an object implementing
//! [`EventHandler`]. The shape is fixed when the [`Handler`] is built, so
//! dispatch never has to probe it. Identity is the underlying `Rc`
//! allocation: clones of a `Handler` are the same handler.

use std::fmt;
use std::rc::Rc;

use crate::ProxyEvent;

/// Result returned by every handler
pub type HandlerResult = anyhow::Result<()>;

type Callback = dyn Fn(&mut ProxyEvent<'_>) -> HandlerResult;

/// Object-style handler, the counterpart of a `handleEvent` method
pub trait EventHandler {
    fn handle_event(&self, event: &mut ProxyEvent<'_>) -> HandlerResult;
}

/// A registered handler value
#[derive(Clone)]
pub enum Handler {
    /// Plain callback
    Callback(Rc<Callback>),
    /// Object with a callback method
    Object(Rc<dyn EventHandler>),
}

impl Handler {
    /// Wrap a closure
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut ProxyEvent<'_>) -> HandlerResult + 'static,
    {
        Self::Callback(Rc::new(f))
    }
    
    /// Wrap a shared handler object
    ///
    /// Passing clones of the same `Rc` yields the same handler identity.
    pub fn from_object<H: EventHandler + 'static>(object: Rc<H>) -> Self {
        Self::Object(object)
    }
    
    /// Invoke with one event argument
    pub fn call(&self, event: &mut ProxyEvent<'_>) -> HandlerResult {
        match self {
            Self::Callback(f) => f(event),
            Self::Object(object) => object.handle_event(event),
        }
    }
    
    /// Identity comparison
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
    
    fn addr(&self) -> *const () {
        match self {
            Self::Callback(f) => Rc::as_ptr(f).cast::<()>(),
            Self::Object(object) => Rc::as_ptr(object).cast::<()>(),
        }
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Callback(_) => "Callback",
            Self::Object(_) => "Object",
        };
        f.debug_tuple(kind).field(&self.addr()).finish()
    }
}

impl<H: EventHandler + 'static> From<Rc<H>> for Handler {
    fn from(object: Rc<H>) -> Self {
        Self::from_object(object)
    }
}

/// Add `handler` to `list` unless already present; returns whether it was added
pub(crate) fn insert_unique(list: &mut Vec<Handler>, handler: Handler) -> bool {
    if list.contains(&handler) {
        return false;
    }
    list.push(handler);
    true
}

/// Remove `handler` from `list`; returns whether it was present
pub(crate) fn remove_handler(list: &mut Vec<Handler>, handler: &Handler) -> bool {
    match list.iter().position(|h| h == handler) {
        Some(index) => {
            list.remove(index);
            true
        }
        None => false,
    }
}

/// Invoke `handlers` in order, stopping at the first error
pub(crate) fn call_all(handlers: &[Handler], event: &mut ProxyEvent<'_>) -> HandlerResult {
    for handler in handlers {
        handler.call(event)?;
    }
    Ok(())
}

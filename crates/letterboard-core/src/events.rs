//! Listener bookkeeping for the platform event source.
//!
//! The board never touches listeners itself. Platform code binds one
//! listener per [`EventKind`] through an [`EventBinder`] and keeps them in
//! a [`Subscriptions`] so they can all be detached again on teardown.

/// Events the playground listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Submit,
}

impl EventKind {
    /// Name of the matching DOM event.
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventKind::PointerDown => "mousedown",
            EventKind::PointerMove => "mousemove",
            EventKind::PointerUp => "mouseup",
            EventKind::Submit => "submit",
        }
    }
}

/// Something listeners can be attached to and detached from.
pub trait EventBinder<L> {
    type Error;

    fn bind(&mut self, kind: EventKind, listener: &L) -> Result<(), Self::Error>;

    fn unbind(&mut self, kind: EventKind, listener: &L) -> Result<(), Self::Error>;
}

/// Every listener bound so far, in binding order.
#[derive(Debug)]
pub struct Subscriptions<L> {
    entries: Vec<(EventKind, L)>,
}

impl<L> Default for Subscriptions<L> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<L> Subscriptions<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `listener` and keep it alive until [`Self::unbind_all`].
    pub fn subscribe<B: EventBinder<L>>(
        &mut self,
        binder: &mut B,
        kind: EventKind,
        listener: L,
    ) -> Result<(), B::Error> {
        binder.bind(kind, &listener)?;
        self.entries.push((kind, listener));
        Ok(())
    }

    /// Detach and drop every listener. Safe to call more than once.
    ///
    /// Every listener is dropped even if some unbinds fail; the first
    /// failure is returned.
    pub fn unbind_all<B: EventBinder<L>>(&mut self, binder: &mut B) -> Result<(), B::Error> {
        let mut first_err = None;
        for (kind, listener) in self.entries.drain(..) {
            if let Err(e) = binder.unbind(kind, &listener) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Call-depth guarding for nested macro invocations.
//!
//! A [`CallStack`] lives for one top-level render and records the names of the
//! macros currently executing. [`CallDepthGuard::enter`] refuses to go deeper
//! than the configured limit; on overflow it reports the whole chain, drains
//! the stack and fails. A successful `enter` returns a guard that restores the
//! stack when dropped, whether the body rendered or failed.

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::{Location, VellumError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStack {
    names: Vec<String>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Executing macro names, outermost first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.names.pop()
    }

    /// Pops everything.
    pub fn drain(&mut self) {
        while self.pop().is_some() {}
    }

    /// `outer->middle->inner`
    pub fn chain(&self) -> String {
        self.names.join("->")
    }

    fn unwind_to(&mut self, depth: usize) {
        self.names.truncate(depth);
    }
}

/// Holds one frame of the call stack for the duration of a macro body.
#[must_use = "the frame is popped as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CallDepthGuard {
    stack: Rc<RefCell<CallStack>>,
    entry_depth: usize,
}

impl CallDepthGuard {
    /// Pushes `frame` unless the stack already holds `limit` frames.
    /// `None` means unlimited; see [`MacroConfig::depth_limit`].
    ///
    /// [`MacroConfig::depth_limit`]: crate::config::MacroConfig::depth_limit
    pub fn enter(
        stack: &Rc<RefCell<CallStack>>,
        frame: &str,
        limit: Option<usize>,
        location: &Location,
    ) -> Result<Self, VellumError> {
        let mut frames = stack.borrow_mut();
        let entry_depth = frames.depth();

        if let Some(max_depth) = limit.filter(|max| entry_depth >= *max) {
            let message = format!(
                "Max calling depth of {max_depth} was exceeded in macro '{frame}' with Call Stack:{} at {location}",
                frames.chain()
            );
            tracing::error!(frame, max_depth, %location, "{message}");
            // the stack is broken at this point; leave nothing behind for
            // whatever renders next
            frames.drain();
            return Err(VellumError::RecursionLimit { message });
        }

        frames.push(frame);
        drop(frames);
        Ok(Self {
            stack: Rc::clone(stack),
            entry_depth,
        })
    }
}

impl Drop for CallDepthGuard {
    fn drop(&mut self) {
        // An overflow further down may already have drained past us.
        if let Ok(mut frames) = self.stack.try_borrow_mut() {
            frames.unwind_to(self.entry_depth);
        }
    }
}

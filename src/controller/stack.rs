//! StackViewController: LIFO navigation with one visible controller.
//!
//! The visible controller is the stack's only child; everything pushed before
//! it waits, detached, in a suspended LIFO. Push and pop are async and run one
//! at a time behind an internal lock.
//!
//! A push is a two-stage rendezvous: the returned future completes once the
//! pushed controller is loaded, focused and announced, and yields a
//! [`Dismissal`] that completes when that same controller is later popped.

use std::any::Any;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::future::{join_all, LocalBoxFuture};
use tokio::sync::{oneshot, Mutex};
use tracing::debug;

use crate::context::Ui;
use crate::controller::{Controller, ControllerRef, ViewController};
use crate::error::Result;
use crate::event::Emitter;

// ---------------------------------------------------------------------------
// Dismissal
// ---------------------------------------------------------------------------

/// Completes when a pushed controller is popped off its stack.
///
/// Also completes if the stack is dropped first.
#[derive(Debug)]
#[must_use = "a dismissal does nothing unless awaited"]
pub struct Dismissal {
    rx: Option<oneshot::Receiver<()>>,
}

impl Dismissal {
    fn pending(rx: oneshot::Receiver<()>) -> Self {
        Self { rx: Some(rx) }
    }

    /// A dismissal that is already complete.
    pub fn settled() -> Self {
        Self { rx: None }
    }
}

impl Future for Dismissal {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match self.rx.as_mut() {
            None => Poll::Ready(()),
            Some(rx) => match Pin::new(rx).poll(cx) {
                Poll::Ready(_) => {
                    self.rx = None;
                    Poll::Ready(())
                }
                Poll::Pending => Poll::Pending,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// NavigationController
// ---------------------------------------------------------------------------

/// The push/pop surface consumed by presentation layers.
pub trait NavigationController {
    fn push_view_controller(&self, next: ControllerRef) -> LocalBoxFuture<'_, Result<Dismissal>>;

    fn pop_view_controller(&self) -> LocalBoxFuture<'_, Result<Option<ControllerRef>>>;
}

// ---------------------------------------------------------------------------
// StackViewController
// ---------------------------------------------------------------------------

pub struct StackViewController {
    base: ViewController,
    suspended: RefCell<Vec<ControllerRef>>,
    waiters: RefCell<Vec<(ControllerRef, oneshot::Sender<()>)>>,
    nav_lock: Mutex<()>,
    /// Fires with the pushed controller once it is loaded and focused.
    pub on_push: Emitter<ControllerRef>,
    /// Fires with the controller that left the stack.
    pub on_pop: Emitter<ControllerRef>,
}

impl StackViewController {
    /// Build an empty stack.
    pub fn new(ui: &Ui, classes: &[&str]) -> Rc<Self> {
        let mut all = classes.to_vec();
        all.push("stack-view-controller");
        ViewController::build(ui, &all, |base, _| Self {
            base,
            suspended: RefCell::new(Vec::new()),
            waiters: RefCell::new(Vec::new()),
            nav_lock: Mutex::new(()),
            on_push: Emitter::new("StackViewController.onPush"),
            on_pop: Emitter::new("StackViewController.onPop"),
        })
    }

    /// The visible controller.
    pub fn current_view_controller(&self) -> Option<ControllerRef> {
        self.base.child(0)
    }

    /// Number of controllers on the stack, the visible one included.
    pub fn count(&self) -> usize {
        self.base.child_count() + self.suspended.borrow().len()
    }

    /// Whether nothing is on the stack.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Number of controllers waiting under the visible one.
    pub fn suspended_count(&self) -> usize {
        self.suspended.borrow().len()
    }

    /// Show `next` on top, suspending the current top.
    ///
    /// Completes once `next` is loaded, focused and announced through
    /// `on_push`. The returned [`Dismissal`] completes when `next` is popped.
    /// A controller that cannot be attached (this stack or one of its
    /// ancestors) yields an already settled dismissal.
    pub async fn push_view_controller(&self, next: ControllerRef) -> Result<Dismissal> {
        let _guard = self.nav_lock.lock().await;

        // A suspended controller moves back to the top instead of being
        // in both places.
        self.suspended.borrow_mut().retain(|c| !c.is(&*next));
        if self.base.append_child(Rc::clone(&next)).is_none() {
            return Ok(Dismissal::settled());
        }
        while self.base.child_count() > 1 {
            if let Some(previous) = self.base.remove_child_at_index(0) {
                self.suspended.borrow_mut().push(previous);
            }
        }

        let (tx, rx) = oneshot::channel();
        self.waiters.borrow_mut().push((Rc::clone(&next), tx));

        self.base.load().await?;
        self.base.focus();
        debug!(depth = self.count(), "stack push");
        self.on_push.emit(&next);

        Ok(Dismissal::pending(rx))
    }

    /// Remove the visible controller and restore the one under it.
    ///
    /// Returns the removed controller, or `None` when the stack is empty.
    pub async fn pop_view_controller(&self) -> Result<Option<ControllerRef>> {
        let _guard = self.nav_lock.lock().await;
        self.pop_locked().await
    }

    async fn pop_locked(&self) -> Result<Option<ControllerRef>> {
        let Some(current) = self.current_view_controller() else {
            return Ok(None);
        };

        current.unload().await?;
        self.base.remove_child(&*current);

        let next = self.suspended.borrow_mut().pop();
        if let Some(next) = next {
            self.base.append_child(next);
            self.base.load().await?;
            self.base.focus();
        }

        debug!(depth = self.count(), "stack pop");
        self.dismiss(&current);
        self.on_pop.emit(&current);
        Ok(Some(current))
    }

    /// Remove `child` from the stack. On the visible controller this is a
    /// pop; a suspended controller is unloaded, dropped from the LIFO and
    /// announced. Returns whether `child` was on the stack.
    pub async fn remove_child(&self, child: &ControllerRef) -> Result<bool> {
        let _guard = self.nav_lock.lock().await;

        if self.current_view_controller().is_some_and(|top| top.is(&**child)) {
            return self.pop_locked().await.map(|popped| popped.is_some());
        }

        let position = self.suspended.borrow().iter().position(|c| c.is(&**child));
        let Some(position) = position else {
            return Ok(false);
        };
        let removed = self.suspended.borrow_mut().remove(position);
        let unloaded = removed.unload().await;
        self.dismiss(&removed);
        self.on_pop.emit(&removed);
        unloaded.map(|_| true)
    }

    /// Empty the stack, unloading the visible controller and every suspended
    /// one, and announcing each through `on_pop`, top first.
    ///
    /// Every controller is announced even if an unload fails; the first
    /// failure is returned afterwards.
    pub async fn remove_all_children(&self) -> Result<Vec<ControllerRef>> {
        let _guard = self.nav_lock.lock().await;

        let mut removed = self.base.remove_all_children();
        removed.extend(self.suspended.borrow_mut().drain(..).rev());

        let results = join_all(removed.iter().map(|c| c.unload())).await;

        debug!(count = removed.len(), "stack cleared");
        for controller in &removed {
            self.dismiss(controller);
            self.on_pop.emit(controller);
        }
        results.into_iter().collect::<Result<Vec<()>>>()?;
        Ok(removed)
    }

    /// Settle every dismissal handed out for `controller`.
    fn dismiss(&self, controller: &ControllerRef) {
        let settled: Vec<oneshot::Sender<()>> = {
            let mut waiters = self.waiters.borrow_mut();
            let (matched, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut *waiters)
                .into_iter()
                .partition(|(c, _)| c.is(&**controller));
            *waiters = rest;
            matched.into_iter().map(|(_, tx)| tx).collect()
        };
        for tx in settled {
            let _ = tx.send(());
        }
    }
}

impl NavigationController for StackViewController {
    fn push_view_controller(&self, next: ControllerRef) -> LocalBoxFuture<'_, Result<Dismissal>> {
        Box::pin(StackViewController::push_view_controller(self, next))
    }

    fn pop_view_controller(&self) -> LocalBoxFuture<'_, Result<Option<ControllerRef>>> {
        Box::pin(StackViewController::pop_view_controller(self))
    }
}

impl Controller for StackViewController {
    fn base(&self) -> &ViewController {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

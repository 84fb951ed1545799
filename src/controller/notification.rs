//! NotificationViewController: timed banners shown one at a time.
//!
//! Pushed notifications wait in a FIFO. A single driver task, started on the
//! first push, shows them in order on an inner stack, each for its duration.
//! A new push cuts the current banner short unless that banner is important.
//! The view is visible only while a banner is shown.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::debug;

use crate::context::Ui;
use crate::controller::{BodyViewController, Controller, StackViewController, ViewController};
use crate::error::Result;
use crate::task;
use crate::view::View;

/// A banner waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notification {
    pub text: String,
    pub title: Option<String>,
    /// How long to show it; the configured default when `None`.
    pub duration: Option<Duration>,
    /// Important banners are never cut short by later ones.
    pub important: bool,
}

impl Notification {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

pub struct NotificationViewController {
    base: ViewController,
    this: Weak<Self>,
    stack: Rc<StackViewController>,
    queue: RefCell<VecDeque<Notification>>,
    current: RefCell<Option<Notification>>,
    running: Cell<bool>,
    wake: Notify,
}

impl NotificationViewController {
    pub fn new(ui: &Ui, classes: &[&str]) -> Rc<Self> {
        let mut all = classes.to_vec();
        all.push("notification-view-controller");

        ViewController::build(ui, &all, |base, this| {
            let stack = StackViewController::new(ui, &[]);
            base.view().set_hidden(true);
            base.append_child(stack.clone());

            let view = base.view().downgrade();
            stack.on_push.on(move |_| {
                if let Some(view) = view.upgrade() {
                    view.set_visible(true);
                }
            });

            let view = base.view().downgrade();
            let weak_stack = Rc::downgrade(&stack);
            stack.on_pop.on(move |banner| {
                banner.base().view().dispose();
                let empty = weak_stack.upgrade().is_none_or(|s| s.is_empty());
                if let (true, Some(view)) = (empty, view.upgrade()) {
                    view.set_hidden(true);
                }
            });

            Self {
                base,
                this: this.clone(),
                stack,
                queue: RefCell::new(VecDeque::new()),
                current: RefCell::new(None),
                running: Cell::new(false),
                wake: Notify::new(),
            }
        })
    }

    pub fn stack_view_controller(&self) -> &Rc<StackViewController> {
        &self.stack
    }

    /// The banner on screen.
    pub fn current_notification(&self) -> Option<Notification> {
        self.current.borrow().clone()
    }

    /// Banners waiting behind the current one.
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Queue `notification`, starting the driver if it is idle.
    ///
    /// Must be called inside a `tokio::task::LocalSet`.
    pub fn push_notification(&self, notification: Notification) {
        debug!(text = %notification.text, important = notification.important, "notification queued");
        self.queue.borrow_mut().push_back(notification);

        if !self.running.get() {
            let Some(this) = self.this.upgrade() else {
                return;
            };
            self.running.set(true);
            task::spawn("notifications", async move {
                let result = this.drive().await;
                this.running.set(false);
                result
            });
            return;
        }

        let preempt = self
            .current
            .borrow()
            .as_ref()
            .is_some_and(|current| !current.important);
        if preempt {
            self.wake.notify_waiters();
        }
    }

    /// Queue an important banner for `err`, titled `title` or `#_error`.
    pub fn push_error(
        &self,
        err: &dyn std::error::Error,
        title: Option<&str>,
        duration: Option<Duration>,
    ) {
        self.push_notification(Notification {
            text: err.to_string(),
            title: Some(title.unwrap_or("#_error").to_owned()),
            duration,
            important: true,
        });
    }

    async fn drive(&self) -> Result<()> {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(next) = next else {
                *self.current.borrow_mut() = None;
                self.stack.pop_view_controller().await?;
                if self.queue.borrow().is_empty() {
                    return Ok(());
                }
                continue;
            };

            let duration = next
                .duration
                .unwrap_or(self.base.ui().config().notification_duration);
            let important = next.important;
            let banner = self.banner(&next);
            *self.current.borrow_mut() = Some(next);

            self.stack.pop_view_controller().await?;
            let _shown = self.stack.push_view_controller(banner).await?;

            if !important && !self.queue.borrow().is_empty() {
                continue;
            }
            if important {
                tokio::time::sleep(duration).await;
            } else {
                tokio::select! {
                    () = tokio::time::sleep(duration) => {}
                    () = self.wake.notified() => debug!("notification preempted"),
                }
            }
        }
    }

    fn banner(&self, notification: &Notification) -> Rc<BodyViewController> {
        let ui = self.base.ui();
        let banner = BodyViewController::new(ui, &["notification-body-view-controller"]);
        banner
            .title_bar()
            .set_title(notification.title.clone().unwrap_or_default());
        banner.footer_bar().set_hidden(true);
        let label = View::label(ui, &["text"], notification.text.clone());
        banner.content_view().append_child(&label);
        banner
    }
}

impl Controller for NotificationViewController {
    fn base(&self) -> &ViewController {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for NotificationViewController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationViewController")
            .field("current", &self.current.borrow())
            .field("pending", &self.queue.borrow().len())
            .finish()
    }
}

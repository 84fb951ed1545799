//! PopupViewController: modal dialogs presented on an inner stack.
//!
//! The popup is hidden until something is pushed and hides again when its
//! stack empties. The close button and the Escape key pop the top dialog.
//! Dialogs built here (`push_message`, `query_*`) are disposed from the DOM
//! once popped; controllers pushed directly are left alone.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};

use futures::future::LocalBoxFuture;
use tracing::debug;

use crate::context::Ui;
use crate::controller::{
    BodyViewController, Controller, ControllerRef, Dismissal, NavigationController,
    StackViewController, ViewController,
};
use crate::dom::NodeId;
use crate::error::Result;
use crate::task;
use crate::view::View;

/// Button texts offered by [`PopupViewController::query_boolean`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryBooleanKind {
    #[default]
    YesNo,
    DoneContinue,
}

impl QueryBooleanKind {
    /// `(yes, no)` button texts.
    fn texts(self) -> (&'static str, &'static str) {
        match self {
            QueryBooleanKind::YesNo => ("#_yes", "#_no"),
            QueryBooleanKind::DoneContinue => ("#_done", "#_continue"),
        }
    }
}

/// The outcome of a query dialog.
///
/// Completes when the dialog is popped, with the value the user chose, or
/// `None` if the dialog was popped by something other than its own buttons.
#[must_use = "an answer does nothing unless awaited"]
pub struct Answer<T> {
    dismissal: Dismissal,
    value: Rc<RefCell<Option<T>>>,
}

impl<T> Future for Answer<T> {
    type Output = Option<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        match Pin::new(&mut this.dismissal).poll(cx) {
            Poll::Ready(()) => Poll::Ready(this.value.borrow_mut().take()),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> fmt::Debug for Answer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Answer").field("dismissal", &self.dismissal).finish()
    }
}

pub struct PopupViewController {
    base: ViewController,
    this: Weak<Self>,
    stack: Rc<StackViewController>,
    close_button: View,
    dialogs: RefCell<Vec<ControllerRef>>,
}

impl PopupViewController {
    pub fn new(ui: &Ui, classes: &[&str]) -> Rc<Self> {
        let mut all = classes.to_vec();
        all.push("popup-view-controller");

        ViewController::build(ui, &all, |base, this| {
            let stack = StackViewController::new(ui, &[]);
            let close_container = View::new(ui, &["close-button-container"]);
            let close_button = View::new(ui, &["close"]);

            base.view().set_hidden(true);
            base.append_child(stack.clone());

            close_container.append_child(&close_button);
            stack.view().append_child(&close_container);
            stack.view().set_propagate_clicks(false);
            stack.view().set_propagate_keys(false);

            close_button.set_clickable(true);
            close_button.set_propagate_clicks(false);

            let popup = this.clone();
            close_button.on_click(move |_| Self::spawn_pop(&popup));
            let popup = this.clone();
            stack.view().on_escape_key(move |_| Self::spawn_pop(&popup));

            let view = base.view().downgrade();
            let weak_stack = Rc::downgrade(&stack);
            stack.on_push.on(move |_| {
                if let Some(view) = view.upgrade() {
                    view.set_visible(true);
                }
                if let Some(stack) = weak_stack.upgrade() {
                    stack.focus();
                }
            });

            let popup = this.clone();
            stack.on_pop.on(move |popped| {
                if let Some(popup) = popup.upgrade() {
                    popup.popped(popped);
                }
            });

            Self {
                base,
                this: this.clone(),
                stack,
                close_button,
                dialogs: RefCell::new(Vec::new()),
            }
        })
    }

    pub fn stack_view_controller(&self) -> &Rc<StackViewController> {
        &self.stack
    }

    pub fn close_button(&self) -> &View {
        &self.close_button
    }

    /// Present `next` on top of whatever is shown.
    pub async fn push_view_controller(&self, next: ControllerRef) -> Result<Dismissal> {
        self.stack.push_view_controller(next).await
    }

    /// Close the top dialog.
    pub async fn pop_view_controller(&self) -> Result<Option<ControllerRef>> {
        self.stack.pop_view_controller().await
    }

    /// Show `text` with a single "ok" button. The dismissal completes when
    /// the message is closed.
    pub async fn push_message(&self, text: &str, title: &str) -> Result<Dismissal> {
        let ui = self.base.ui();
        let dialog = self.dialog(&["message-view-controller"], title);

        let label = View::label(ui, &["text"], text);
        let done = View::button(ui, &["done"], "#_ok");
        done.set_tab_index(Some(1));

        dialog.content_view().append_child(&label);
        dialog.footer_bar().append_child(&done);

        for trigger in Trigger::ALL {
            let popup = self.this.clone();
            trigger.listen(&done, move |_| Self::spawn_pop(&popup));
        }

        self.push_dialog(dialog).await
    }

    /// Show `err` as a message titled `title`, or `#_error`.
    pub async fn push_error(
        &self,
        err: &dyn std::error::Error,
        title: Option<&str>,
    ) -> Result<Dismissal> {
        self.push_message(&err.to_string(), title.unwrap_or("#_error"))
            .await
    }

    /// Ask a yes/no question.
    ///
    /// Enter or a click on "yes" answers `true`; "no", or Escape on either
    /// button, answers `false`.
    pub async fn query_boolean(
        &self,
        text: &str,
        title: &str,
        kind: QueryBooleanKind,
    ) -> Result<Answer<bool>> {
        let ui = self.base.ui();
        let dialog = self.dialog(&["message"], title);
        let (yes_text, no_text) = kind.texts();

        let label = View::label(ui, &["text"], text);
        let yes = View::button(ui, &["yes"], yes_text);
        let no = View::button(ui, &["no"], no_text);
        yes.set_tab_index(Some(1));
        no.set_tab_index(Some(2));

        dialog.content_view().append_child(&label);
        dialog.footer_bar().append_child(&no);
        dialog.footer_bar().append_child(&yes);

        let value = Rc::new(RefCell::new(None));
        for trigger in Trigger::ALL {
            let answer = trigger != Trigger::Escape;
            self.answer_when(&yes, trigger, &value, move || Some(Some(answer)));
            self.answer_when(&no, trigger, &value, || Some(Some(false)));
        }

        let dismissal = self.push_dialog(dialog).await?;
        Ok(Answer { dismissal, value })
    }

    /// Ask for a line of text.
    ///
    /// "ok" stays disabled while the field is empty. Enter in the field or on
    /// "ok" answers the text; Escape or "cancel" answers `None`.
    pub async fn query_string(&self, text: &str, title: &str) -> Result<Answer<String>> {
        let ui = self.base.ui();
        let dialog = self.dialog(&["message"], title);

        let label = View::label(ui, &["text"], text);
        let field = View::text_field(ui, &["input"]);
        let ok = View::button(ui, &["ok"], "#_ok");
        let cancel = View::button(ui, &["cancel"], "#_cancel");
        ok.set_tab_index(Some(1));
        ok.set_disabled(true);
        cancel.set_tab_index(Some(2));

        dialog.content_view().append_child(&label);
        dialog.content_view().append_child(&field);
        dialog.footer_bar().append_child(&cancel);
        dialog.footer_bar().append_child(&ok);

        let weak_ok = ok.downgrade();
        field.on_changed(move |text| {
            if let Some(ok) = weak_ok.upgrade() {
                ok.set_disabled(text.is_empty());
            }
        });

        let value = Rc::new(RefCell::new(None));
        for (target, trigger) in [
            (&field, Trigger::Enter),
            (&ok, Trigger::Enter),
            (&ok, Trigger::Click),
        ] {
            let field = field.downgrade();
            self.answer_when(target, trigger, &value, move || {
                let text = field.upgrade()?.text().unwrap_or_default();
                (!text.is_empty()).then_some(Some(text))
            });
        }
        for (target, trigger) in [
            (&field, Trigger::Escape),
            (&ok, Trigger::Escape),
            (&cancel, Trigger::Enter),
            (&cancel, Trigger::Escape),
            (&cancel, Trigger::Click),
        ] {
            self.answer_when(target, trigger, &value, || Some(None));
        }

        let dismissal = self.push_dialog(dialog).await?;
        field.focus();
        Ok(Answer { dismissal, value })
    }

    fn dialog(&self, classes: &[&str], title: &str) -> Rc<BodyViewController> {
        let dialog = BodyViewController::new(self.base.ui(), classes);
        dialog.title_bar().set_title(title);
        dialog.view().set_propagate_keys(false);
        dialog
    }

    async fn push_dialog(&self, dialog: Rc<BodyViewController>) -> Result<Dismissal> {
        let dialog: ControllerRef = dialog;
        self.dialogs.borrow_mut().push(Rc::clone(&dialog));
        self.stack.push_view_controller(dialog).await
    }

    /// Register a listener on `target` that pops when `decide` returns
    /// `Some`, storing the decided value first.
    fn answer_when<T: 'static>(
        &self,
        target: &View,
        trigger: Trigger,
        value: &Rc<RefCell<Option<T>>>,
        decide: impl Fn() -> Option<Option<T>> + 'static,
    ) {
        let popup = self.this.clone();
        let value = Rc::downgrade(value);
        trigger.listen(target, move |_| {
            let Some(decided) = decide() else {
                return;
            };
            if let Some(value) = value.upgrade() {
                *value.borrow_mut() = decided;
            }
            Self::spawn_pop(&popup);
        });
    }

    fn popped(&self, popped: &ControllerRef) {
        if self.stack.is_empty() {
            self.base.view().set_hidden(true);
        }
        let owned = {
            let mut dialogs = self.dialogs.borrow_mut();
            let position = dialogs.iter().position(|d| d.is(&**popped));
            position.map(|p| dialogs.remove(p))
        };
        if let Some(dialog) = owned {
            debug!("popup dialog disposed");
            dialog.base().view().dispose();
        }
    }

    fn spawn_pop(popup: &Weak<Self>) {
        let Some(popup) = popup.upgrade() else {
            return;
        };
        task::spawn("popup pop", async move {
            popup.pop_view_controller().await.map(|_| ())
        });
    }
}

/// The inputs a dialog button reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Enter,
    Escape,
    Click,
}

impl Trigger {
    const ALL: [Trigger; 3] = [Trigger::Enter, Trigger::Escape, Trigger::Click];

    fn listen(self, view: &View, f: impl Fn(&NodeId) + 'static) {
        match self {
            Trigger::Enter => view.on_enter_key(f),
            Trigger::Escape => view.on_escape_key(f),
            Trigger::Click => view.on_click(f),
        };
    }
}

impl NavigationController for PopupViewController {
    fn push_view_controller(&self, next: ControllerRef) -> LocalBoxFuture<'_, Result<Dismissal>> {
        Box::pin(PopupViewController::push_view_controller(self, next))
    }

    fn pop_view_controller(&self) -> LocalBoxFuture<'_, Result<Option<ControllerRef>>> {
        Box::pin(PopupViewController::pop_view_controller(self))
    }
}

impl Controller for PopupViewController {
    fn base(&self) -> &ViewController {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for PopupViewController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupViewController")
            .field("view", self.base.view())
            .field("depth", &self.stack.count())
            .finish()
    }
}

//! App struct: configuration, lifecycle, input loop.
//!
//! [`App`] is the composition root. It owns the [`Ui`], mounts the root
//! controller into the body with the root popup and notification layers as its
//! last children, and drives the tree through `prepare → init → load → start`.
//! Input is queued with [`App::handle_input`] and dispatched with
//! [`App::handle_events`].

use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info};

use crate::context::{Parameter, Preparer, Ui};
use crate::controller::{
    ControllerRef, LifecycleTracker, NotificationViewController, Phase,
    PopupViewController, ViewController,
};
use crate::error::Result;
use crate::event::{from_crossterm, Emitter, EventDispatcher, InputEvent};

/// Name of the parameter that toggles debug mode.
pub const PARAMETER_DEBUG: &str = "debug";

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Optional application title.
    pub title: Option<String>,
    /// How long a notification stays up when it does not set its own duration.
    pub notification_duration: Duration,
    /// Placeholder title for menu entries whose pane has no title.
    pub missing_title: String,
    /// Default of the `debug` parameter.
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            notification_duration: Duration::from_secs(3),
            missing_title: "_missing_title_".to_owned(),
            debug: false,
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the default notification duration (builder).
    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration = duration;
        self
    }

    /// Set the placeholder menu title (builder).
    pub fn with_missing_title(mut self, title: impl Into<String>) -> Self {
        self.missing_title = title.into();
        self
    }

    /// Enable debug mode by default (builder).
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn missing_title(&self) -> &str {
        &self.missing_title
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The application: UI context, root controller tree, and input queue.
pub struct App {
    ui: Ui,
    root: Rc<ViewController>,
    popup: Rc<PopupViewController>,
    notifications: Rc<NotificationViewController>,
    preparer: Preparer,
    dispatcher: EventDispatcher,
    lifecycle: LifecycleTracker,
    running: bool,
    /// Fires once the tree has loaded during [`App::boot`].
    pub on_loaded: Emitter<()>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let ui = Ui::new(config);
        let root = ViewController::create(&ui, &["root-view-controller"]);
        let popup = PopupViewController::new(&ui, &["root-popup-view-controller"]);
        let notifications =
            NotificationViewController::new(&ui, &["root-notification-view-controller"]);

        root.append_child(popup.clone());
        root.append_child(notifications.clone());
        ui.body().append_child(root.view());

        Self {
            ui,
            root,
            popup,
            notifications,
            preparer: Preparer::new(),
            dispatcher: EventDispatcher::new(),
            lifecycle: LifecycleTracker::new(),
            running: true,
            on_loaded: Emitter::new("App.onLoaded"),
        }
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn root(&self) -> &Rc<ViewController> {
        &self.root
    }

    /// The root popup layer.
    pub fn popup(&self) -> &Rc<PopupViewController> {
        &self.popup
    }

    /// The root notification layer.
    pub fn notifications(&self) -> &Rc<NotificationViewController> {
        &self.notifications
    }

    pub fn preparer(&self) -> &Preparer {
        &self.preparer
    }

    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    /// Whether the `debug` parameter is on.
    pub fn is_debug(&self) -> bool {
        self.preparer
            .get(PARAMETER_DEBUG)
            .is_some_and(|value| value == "true")
    }

    /// Mount `controller` under the root, below the popup and notification
    /// layers.
    pub fn append_child(&self, controller: ControllerRef) -> Option<usize> {
        self.root.append_child(Rc::clone(&controller))?;
        // Re-append the overlays so they stay last.
        self.root.append_child(self.popup.clone());
        self.root.append_child(self.notifications.clone());
        self.root.index_of(&*controller)
    }

    // -- lifecycle ---------------------------------------------------------------

    /// Let every controller register its parameters.
    pub async fn prepare(&mut self) -> Result<()> {
        self.lifecycle.check(Phase::Prepared)?;
        self.preparer.add(Parameter::new(
            PARAMETER_DEBUG,
            "enables/disables debug mode",
            self.ui.config().debug,
        ));
        self.root.prepare(&self.preparer).await?;
        self.lifecycle.advance(Phase::Prepared)
    }

    pub async fn init(&mut self) -> Result<()> {
        self.lifecycle.check(Phase::Initialized)?;
        self.root.init().await?;
        self.lifecycle.advance(Phase::Initialized)
    }

    pub async fn load(&mut self) -> Result<()> {
        self.lifecycle.check(Phase::Loaded)?;
        self.root.load().await?;
        self.lifecycle.advance(Phase::Loaded)?;
        self.on_loaded.emit(&());
        Ok(())
    }

    pub async fn start(&mut self) -> Result<()> {
        self.lifecycle.check(Phase::Started)?;
        self.root.start().await?;
        self.lifecycle.advance(Phase::Started)
    }

    pub async fn unload(&mut self) -> Result<()> {
        self.lifecycle.check(Phase::Unloaded)?;
        self.root.unload().await?;
        self.lifecycle.advance(Phase::Unloaded)
    }

    /// Unload and load the tree again.
    pub async fn reload(&mut self) -> Result<()> {
        self.unload().await?;
        self.load().await
    }

    /// Run `prepare`, `init`, `load` and `start`, in that order.
    pub async fn boot(&mut self) -> Result<()> {
        self.prepare().await?;
        self.init().await?;
        self.load().await?;
        self.start().await?;
        info!(
            title = self.ui.config().title.as_deref().unwrap_or_default(),
            debug = self.is_debug(),
            "app started"
        );
        Ok(())
    }

    // -- input -------------------------------------------------------------------

    /// Queue an input event. Ctrl+C requests quit instead.
    pub fn handle_input(&mut self, event: InputEvent) {
        if let InputEvent::Key(key) = &event {
            if key.is_interrupt() {
                debug!("interrupt");
                self.running = false;
                return;
            }
        }
        self.dispatcher.push(event);
    }

    /// Convert and queue a terminal event. Events with no counterpart are
    /// dropped.
    pub fn handle_terminal_event(&mut self, event: crossterm::event::Event) {
        let converted = from_crossterm(event, &self.ui.dom());
        if let Some(event) = converted {
            self.handle_input(event);
        }
    }

    /// Dispatch every queued event. Returns how many were processed.
    pub fn handle_events(&mut self) -> usize {
        let events = self.dispatcher.drain();
        for event in &events {
            let deliveries = EventDispatcher::route(&mut self.ui.dom_mut(), event);
            for delivery in deliveries {
                delivery.deliver();
            }
        }
        events.len()
    }

    /// Number of queued, undispatched events.
    pub fn pending_events(&self) -> usize {
        self.dispatcher.pending_count()
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }

    pub fn request_quit(&mut self) {
        self.running = false;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

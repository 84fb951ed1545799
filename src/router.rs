//! In-memory router: named routes, current route, history.
//!
//! A route is a name plus an optional numeric index and query parameters,
//! rendered as `/name/index?key=value`. Unknown names fall back to the first
//! registered route. The router lives in the process-wide [`Ui`](crate::Ui)
//! context, so every method takes `&self`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::{Result, UiError};
use crate::event::{Emitter, ListenerId};

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    name: String,
    index: Option<u64>,
    params: BTreeMap<String, String>,
}

impl Route {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
            params: BTreeMap::new(),
        }
    }

    /// Set the index (builder).
    pub fn with_index(mut self, index: Option<u64>) -> Self {
        self.index = index;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> Option<u64> {
        self.index
    }

    pub fn has(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// A parameter parsed as a number.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key)?.parse().ok()
    }

    /// A parameter read as a flag: present, non-empty, and not `false`/`0`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .is_some_and(|v| !v.is_empty() && v != "false" && v != "0")
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.params.insert(key.into(), value.to_string());
    }

    pub fn delete(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    /// Whether two routes point at the same place, ignoring parameters.
    pub fn same_place(&self, other: &Route) -> bool {
        self.name == other.name && self.index == other.index
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name)?;
        if let Some(index) = self.index {
            write!(f, "/{index}")?;
        }
        for (i, (key, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Route registry plus the current route and its history.
#[derive(Debug)]
pub struct Router {
    routes: RefCell<Vec<String>>,
    route: RefCell<Route>,
    history: RefCell<Vec<Route>>,
    /// Fires whenever the current route changes or is reloaded.
    pub on_route_changed: Emitter<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: RefCell::new(Vec::new()),
            route: RefCell::new(Route::new("index")),
            history: RefCell::new(Vec::new()),
            on_route_changed: Emitter::new("Router.onRouteChanged"),
        }
    }

    /// Register a route name. Registering the same name twice is a no-op.
    pub fn add_route(&self, name: impl Into<String>) {
        let name = name.into();
        let mut routes = self.routes.borrow_mut();
        if !routes.contains(&name) {
            routes.push(name);
        }
    }

    /// Register a route name and a listener that only runs when that route
    /// becomes current.
    pub fn add_route_with(&self, name: impl Into<String>, listener: impl Fn(&Route) + 'static) -> ListenerId {
        let name = name.into();
        self.add_route(name.clone());
        self.on_route_changed.on(move |route| {
            if route.name == name {
                listener(route);
            }
        })
    }

    /// Registered route names, in registration order.
    pub fn routes(&self) -> Vec<String> {
        self.routes.borrow().clone()
    }

    /// The current route.
    pub fn route(&self) -> Route {
        self.route.borrow().clone()
    }

    /// The current route's index.
    pub fn index(&self) -> Option<u64> {
        self.route.borrow().index
    }

    pub fn history_len(&self) -> usize {
        self.history.borrow().len()
    }

    /// Switch to `name` (falling back to the first route if unknown).
    ///
    /// No-op if that is already the current place. The previous route goes
    /// onto the history.
    pub fn change_route(&self, name: &str, index: Option<u64>) -> Result<()> {
        let next = self.find_route(Some(name), index)?;
        if next.same_place(&self.route.borrow()) {
            return Ok(());
        }
        self.replace(next, true);
        Ok(())
    }

    /// Resolve and switch to a path such as `/detail/3?tab=info`.
    pub fn navigate_path(&self, path: &str) -> Result<()> {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let mut parts = path.trim_start_matches('/').split('/');
        let name = parts.next().filter(|s| !s.is_empty());
        let index = parts.next().and_then(|s| s.parse().ok());
        let mut next = self.find_route(name, index)?;
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            next.set(key, value);
        }
        if next == *self.route.borrow() {
            return Ok(());
        }
        self.replace(next, true);
        Ok(())
    }

    /// Go back to the previous route, or to the first route when there is no
    /// history.
    pub fn back(&self) -> Result<()> {
        let previous = self.history.borrow_mut().pop();
        match previous {
            Some(route) => self.replace(route, false),
            None => {
                let first = self.find_route(None, None)?;
                if first.same_place(&self.route.borrow()) {
                    return Ok(());
                }
                self.replace(first, false);
            }
        }
        Ok(())
    }

    /// Announce the current route again.
    pub fn reload(&self) {
        let route = self.route();
        self.on_route_changed.emit(&route);
    }

    /// Set a parameter on the current route. Does not announce a change.
    pub fn set_param(&self, key: impl Into<String>, value: impl ToString) {
        self.route.borrow_mut().set(key, value);
    }

    pub fn param(&self, key: &str) -> Option<String> {
        self.route.borrow().get(key).map(str::to_owned)
    }

    pub fn delete_param(&self, key: &str) -> Option<String> {
        self.route.borrow_mut().delete(key)
    }

    fn find_route(&self, name: Option<&str>, index: Option<u64>) -> Result<Route> {
        let routes = self.routes.borrow();
        let found = name
            .and_then(|n| routes.iter().find(|r| r.as_str() == n))
            .or_else(|| routes.first())
            .ok_or(UiError::NoRoutes)?;
        Ok(Route::new(found.clone()).with_index(index))
    }

    fn replace(&self, next: Route, remember: bool) {
        let previous = std::mem::replace(&mut *self.route.borrow_mut(), next.clone());
        if remember {
            self.history.borrow_mut().push(previous);
        }
        debug!(route = %next, "route changed");
        self.on_route_changed.emit(&next);
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

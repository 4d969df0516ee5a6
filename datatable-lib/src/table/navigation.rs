//! Navigation layer interface.

use std::sync::Mutex;
use std::sync::PoisonError;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::error::NavigationError;

/// How a URL replacement should behave.
///
/// The defaults describe an in-place update: no new history entry, no
/// scroll reset, focus kept, and data depending on the URL reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateOptions {
    pub replace_state: bool,
    pub no_scroll: bool,
    pub keep_focus: bool,
    pub invalidate_all: bool,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            replace_state: true,
            no_scroll: true,
            keep_focus: true,
            invalidate_all: true,
        }
    }
}

/// The routing layer the controller synchronizes with.
///
/// `replace` is called from the controller's synchronization task, hence
/// `Send + Sync`.
pub trait Navigator: Send + Sync {
    /// Returns the URL currently shown.
    fn current_url(&self) -> Url;

    /// Navigates to `url` without a full page load.
    fn replace(&self, url: Url, options: NavigateOptions) -> Result<(), NavigationError>;
}

/// A navigator that keeps the URL in memory and records every navigation.
///
/// Useful for server-side rendering, tests and headless tools.
///
/// # Example
///
/// ```
/// use datatable_lib::table::{MemoryNavigator, NavigateOptions, Navigator};
/// use url::Url;
///
/// let navigator = MemoryNavigator::new(Url::parse("https://example.com/tasks").unwrap());
/// let next = Url::parse("https://example.com/tasks?page=2").unwrap();
/// navigator.replace(next.clone(), NavigateOptions::default()).unwrap();
///
/// assert_eq!(navigator.current_url(), next);
/// assert_eq!(navigator.navigation_count(), 1);
/// ```
#[derive(Debug)]
pub struct MemoryNavigator {
    url: Mutex<Url>,
    history: Mutex<Vec<(Url, NavigateOptions)>>,
}

impl MemoryNavigator {
    /// Creates a navigator showing `url`.
    pub fn new(url: Url) -> Self {
        Self {
            url: Mutex::new(url),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Returns every navigation so far, oldest first.
    pub fn navigations(&self) -> Vec<(Url, NavigateOptions)> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns the number of navigations so far.
    pub fn navigation_count(&self) -> usize {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Navigator for MemoryNavigator {
    fn current_url(&self) -> Url {
        self.url.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn replace(&self, url: Url, options: NavigateOptions) -> Result<(), NavigationError> {
        *self.url.lock().unwrap_or_else(PoisonError::into_inner) = url.clone();
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((url, options));
        Ok(())
    }
}

//! State updates: a replacement value or a function of the previous value.

use std::fmt;

/// An update to one field of the table state.
///
/// Rendering engines report changes either as the new value or as a
/// function of the old one (toggling a sort, bumping a page). Both go
/// through the same path in the controller.
///
/// # Example
///
/// ```
/// use datatable_lib::table::{PaginationState, StateUpdate};
///
/// let next_page = StateUpdate::update(|p: &PaginationState| PaginationState {
///     page_index: p.page_index + 1,
///     ..*p
/// });
/// let current = PaginationState::default();
/// assert_eq!(next_page.apply(&current).page_index, 1);
/// ```
pub enum StateUpdate<T> {
    /// Replace the value.
    Set(T),
    /// Compute the value from the previous one.
    Update(Box<dyn FnOnce(&T) -> T>),
}

impl<T> StateUpdate<T> {
    /// Creates an updater from a function of the previous value.
    pub fn update(f: impl FnOnce(&T) -> T + 'static) -> Self {
        StateUpdate::Update(Box::new(f))
    }

    /// Produces the new value given the current one.
    pub fn apply(self, current: &T) -> T {
        match self {
            StateUpdate::Set(value) => value,
            StateUpdate::Update(f) => f(current),
        }
    }
}

impl<T> From<T> for StateUpdate<T> {
    fn from(value: T) -> Self {
        StateUpdate::Set(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for StateUpdate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateUpdate::Set(value) => f.debug_tuple("Set").field(value).finish(),
            StateUpdate::Update(_) => f.write_str("Update(..)"),
        }
    }
}

//! Optimistic updates with rollback.

use std::future::Future;

/// A locally held value that is changed before a remote write confirms it.
///
/// [`Optimistic::update`] applies a change immediately, hands a copy of the
/// changed value to the remote call, and then either adopts the value the
/// remote returns or restores the value held before the change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Optimistic<T> {
    value: T,
}

impl<T: Clone> Optimistic<T> {
    /// Wraps the current value.
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// The value as currently displayed.
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Unwraps the value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Applies `change` locally, then reconciles with `confirm`.
    ///
    /// # Errors
    ///
    /// Returns the error from `confirm`. The local value is reverted first.
    pub async fn update<E, F, Fut>(
        &mut self,
        change: impl FnOnce(&mut T),
        confirm: F,
    ) -> Result<&T, E>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let snapshot = self.value.clone();
        change(&mut self.value);

        match confirm(self.value.clone()).await {
            Ok(confirmed) => {
                self.value = confirmed;
                Ok(&self.value)
            }
            Err(error) => {
                self.value = snapshot;
                Err(error)
            }
        }
    }
}

//! Explicit present/absent marker for partial updates.

/// One field of a partial update.
///
/// `Keep` leaves the stored value untouched; `Set` replaces it. Keeping this
/// separate from `Option` means a field whose own domain is optional
/// (`Option<String>` description, for example) still has an unambiguous
/// "not mentioned" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Borrow the new value, if any.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Keep => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Set(value) => Patch::Set(f(value)),
            Self::Keep => Patch::Keep,
        }
    }

    /// Overwrite `target` when the patch carries a value.
    pub fn apply_to(self, target: &mut T) {
        if let Self::Set(value) = self {
            *target = value;
        }
    }

    /// Overwrite an optional `target` when the patch carries a value.
    pub fn apply_to_option(self, target: &mut Option<T>) {
        if let Self::Set(value) = self {
            *target = Some(value);
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Set(value),
            None => Self::Keep,
        }
    }
}

//! Field-level patches for partial updates
//!
//! A [`Patch`] records whether the caller supplied a field at all. Optional
//! columns are patched with `Patch<Option<T>>`, which keeps three states
//! apart:
//!
//! - `Patch::Keep` - field omitted, column untouched
//! - `Patch::Set(None)` - field supplied as null/empty, column cleared
//! - `Patch::Set(Some(v))` - field supplied with a value
//!
//! # Example
//!
//! ```
//! use taskboard_shared::models::patch::Patch;
//!
//! let mut description = Some("draft".to_string());
//!
//! Patch::Keep.apply_to(&mut description);
//! assert_eq!(description.as_deref(), Some("draft"));
//!
//! Patch::Set(None).apply_to(&mut description);
//! assert_eq!(description, None);
//! ```

/// A single field change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field was not supplied
    Keep,

    /// Field was supplied with this value
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> Patch<T> {
    /// Returns true if the caller supplied this field
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    /// Borrows the supplied value, if any
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Keep => None,
            Patch::Set(value) => Some(value),
        }
    }

    /// Transforms the supplied value, keeping `Keep` as is
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Keep => Patch::Keep,
            Patch::Set(value) => Patch::Set(f(value)),
        }
    }

    /// Writes the supplied value into `slot`
    ///
    /// Returns true if `slot` was written.
    pub fn apply_to(&self, slot: &mut T) -> bool
    where
        T: Clone,
    {
        match self {
            Patch::Keep => false,
            Patch::Set(value) => {
                *slot = value.clone();
                true
            }
        }
    }
}

/// Normalizes optional free text: blank strings mean "no value"
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_leaves_slot_untouched() {
        let mut slot = 7;
        assert!(!Patch::Keep.apply_to(&mut slot));
        assert_eq!(slot, 7);
    }

    #[test]
    fn test_set_none_clears_optional_slot() {
        let mut slot = Some("text".to_string());
        assert!(Patch::Set(None).apply_to(&mut slot));
        assert!(slot.is_none());
    }

    #[test]
    fn test_map_preserves_keep() {
        let patch: Patch<i32> = Patch::Keep;
        assert_eq!(patch.map(|v| v * 2), Patch::Keep);
        assert_eq!(Patch::Set(2).map(|v| v * 2), Patch::Set(4));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("x".to_string())), Some("x".to_string()));
    }
}

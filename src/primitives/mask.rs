//! Masking transforms: what a slot shows for a digit.

use std::fmt;
use std::rc::Rc;

/// Default glyph for obscured digits.
pub const OBSCURE_CHAR: char = '•';

/// Maps one digit to the text drawn in its slot.
///
/// Two transforms compare equal only if they share the same function, so a
/// reactive `mask` prop re-renders when swapped for a new transform.
#[derive(Clone)]
pub struct MaskingTransform(Rc<dyn Fn(char) -> String>);

impl MaskingTransform {
    /// Show digits as typed.
    pub fn identity() -> Self {
        Self::custom(|c| c.to_string())
    }

    /// Show every digit as `•`.
    pub fn obscured() -> Self {
        Self::obscured_with(OBSCURE_CHAR)
    }

    pub fn obscured_with(glyph: char) -> Self {
        Self::custom(move |_| glyph.to_string())
    }

    pub fn custom(f: impl Fn(char) -> String + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn apply(&self, c: char) -> String {
        (self.0)(c)
    }
}

impl Default for MaskingTransform {
    fn default() -> Self {
        Self::obscured()
    }
}

impl PartialEq for MaskingTransform {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MaskingTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MaskingTransform").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_shows_digit() {
        assert_eq!(MaskingTransform::identity().apply('4'), "4");
    }

    #[test]
    fn test_obscured_hides_digit() {
        let mask = MaskingTransform::obscured();
        for c in '0'..='9' {
            assert_eq!(mask.apply(c), "•");
        }
    }

    #[test]
    fn test_custom_glyph() {
        assert_eq!(MaskingTransform::obscured_with('*').apply('9'), "*");
        let shifted = MaskingTransform::custom(|c| format!("<{c}>"));
        assert_eq!(shifted.apply('1'), "<1>");
    }

    #[test]
    fn test_equality_is_identity() {
        let a = MaskingTransform::identity();
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, MaskingTransform::identity());
    }
}

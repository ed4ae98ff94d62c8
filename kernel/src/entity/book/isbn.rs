use std::fmt::{Display, Formatter};

use vodca::{AsRefln, Fromln};

use crate::entity::common::bounded;
use crate::KernelError;

/// Natural key of a book. Always stored trimmed and never empty, so the unique
/// constraint only ever applies to real values.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln)]
pub struct Isbn(String);

impl Isbn {
    pub const MAX_LENGTH: usize = 50;

    pub fn new(isbn: impl Into<String>) -> Self {
        Self(isbn.into())
    }

    /// Blank input means "no ISBN" and yields `None`.
    pub fn parse(isbn: impl Into<String>) -> error_stack::Result<Option<Self>, KernelError> {
        let isbn = isbn.into();
        let trimmed = isbn.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        bounded("isbn", trimmed.to_string(), Self::MAX_LENGTH).map(|isbn| Some(Self(isbn)))
    }
}

impl Display for Isbn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod test {
    use super::Isbn;

    #[test]
    fn parse_trims_and_drops_blank() {
        let parsed = Isbn::parse("  978-3-16-148410-0 ").unwrap();
        assert_eq!(parsed, Some(Isbn::new("978-3-16-148410-0")));
        assert_eq!(Isbn::parse("   ").unwrap(), None);
        assert_eq!(Isbn::parse("").unwrap(), None);
    }

    #[test]
    fn parse_keeps_case() {
        let parsed = Isbn::parse("abc-X").unwrap();
        assert_eq!(parsed, Some(Isbn::new("abc-X")));
        assert_ne!(parsed, Some(Isbn::new("ABC-X")));
    }

    #[test]
    fn parse_rejects_overlong() {
        assert!(Isbn::parse("9".repeat(Isbn::MAX_LENGTH + 1)).is_err());
    }
}

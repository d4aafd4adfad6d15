//! Guess parsing and validation
//!
//! Raw player input ("1 4 9 16 25 36 49" or "1,4,9,16,25,36,49") is turned
//! into a strongly-typed [`Guess`] here, before it ever reaches a session.

use std::fmt;
use thiserror::Error;

/// A validated guess: exactly the expected number of non-negative integers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Guess {
    values: Vec<i64>,
}

/// Error type for malformed guesses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessFormatError {
    #[error("Please enter exactly {expected} numbers, got {got}")]
    WrongArity { expected: usize, got: usize },
    #[error("'{0}' is not a whole number")]
    NotAnInteger(String),
    #[error("Numbers must not be negative, got {0}")]
    Negative(i64),
}

impl Guess {
    /// Parse a guess from whitespace- or comma-separated integers
    ///
    /// # Errors
    /// Returns `GuessFormatError` if:
    /// - A token is not an integer
    /// - A value is negative
    /// - The number of values is not `arity`
    ///
    /// # Examples
    /// ```
    /// use numericle::core::Guess;
    ///
    /// let guess = Guess::parse("1 4, 9 16 25 36 49", 7).unwrap();
    /// assert_eq!(guess.values(), &[1, 4, 9, 16, 25, 36, 49]);
    ///
    /// assert!(Guess::parse("1 2 3", 7).is_err());
    /// assert!(Guess::parse("1 2 x 4 5 6 7", 7).is_err());
    /// ```
    pub fn parse(input: &str, arity: usize) -> Result<Self, GuessFormatError> {
        let values = input
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<i64>()
                    .map_err(|_| GuessFormatError::NotAnInteger(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_values(values, arity)
    }

    /// Validate an already-numeric guess
    ///
    /// # Errors
    /// Returns `GuessFormatError` on wrong arity or a negative value.
    pub fn from_values(values: Vec<i64>, arity: usize) -> Result<Self, GuessFormatError> {
        if values.len() != arity {
            return Err(GuessFormatError::WrongArity {
                expected: arity,
                got: values.len(),
            });
        }

        if let Some(&negative) = values.iter().find(|&&v| v < 0) {
            return Err(GuessFormatError::Negative(negative));
        }

        Ok(Self { values })
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.values.iter().map(ToString::to_string).collect();
        write!(f, "{}", joined.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_spaces() {
        let guess = Guess::parse("1 2 3 4 5 6 7", 7).unwrap();
        assert_eq!(guess.values(), &[1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn parse_mixed_separators_and_padding() {
        let guess = Guess::parse("  1,2 ,3\t4  5,,6 7 ", 7).unwrap();
        assert_eq!(guess.values(), &[1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn parse_wrong_arity() {
        assert_eq!(
            Guess::parse("1 2 3 4 5 6", 7),
            Err(GuessFormatError::WrongArity {
                expected: 7,
                got: 6
            })
        );
        assert_eq!(
            Guess::parse("", 7),
            Err(GuessFormatError::WrongArity {
                expected: 7,
                got: 0
            })
        );
    }

    #[test]
    fn parse_non_integer() {
        assert_eq!(
            Guess::parse("1 2 3.5 4 5 6 7", 7),
            Err(GuessFormatError::NotAnInteger("3.5".to_string()))
        );
        assert!(Guess::parse("one two", 2).is_err());
    }

    #[test]
    fn parse_negative() {
        assert_eq!(
            Guess::parse("1 -2 3", 3),
            Err(GuessFormatError::Negative(-2))
        );
    }

    #[test]
    fn display_round_trips() {
        let guess = Guess::parse("1,4,9", 3).unwrap();
        assert_eq!(guess.to_string(), "1 4 9");
        assert_eq!(Guess::parse(&guess.to_string(), 3).unwrap(), guess);
    }
}

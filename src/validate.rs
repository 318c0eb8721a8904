//! Syntax checking of expression text without evaluating it.

use log::debug;

use crate::parse::{self, SyntaxError};

/// Checks whether text is a well-formed dice expression. The expression is lexed and parsed but never evaluated, so
/// no randomness is consumed no matter how many dice it contains.
///
/// # Errors
/// If the text isn't a well-formed expression, an error variant is returned with the position and reason.
///
/// # Examples
/// ```
/// use dice_algebra::validate;
///
/// assert!(validate("(1d4+1)*2").is_ok());
/// assert!(validate("d20").is_ok());
///
/// let err = validate("2d-6").unwrap_err();
/// assert_eq!(err.position(), 2);
/// ```
pub fn validate(text: &str) -> Result<(), SyntaxError> {
	parse::parse_str(text).map(|_expr| ()).inspect_err(|err| debug!("rejected {text:?}: {err}"))
}

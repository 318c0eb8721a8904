//! Lexing of raw expression text into [`Token`]s.

use std::fmt;

use chumsky::prelude::*;

/// Classified lexical unit of a dice expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Token {
	/// Run of decimal digits (never negative, `-` is always its own token)
	Number(i32),

	/// Dice operator (`d` or `D`)
	Dice,

	/// `+`
	Plus,

	/// `-`
	Minus,

	/// `*`
	Star,

	/// `/`
	Slash,

	/// `(`
	LParen,

	/// `)`
	RParen,

	/// Synthetic marker placed after the last real token
	End,
}

impl Token {
	/// Gets a short human-readable name for the kind of token, for use in error messages.
	#[must_use]
	pub const fn kind_str(&self) -> &'static str {
		match self {
			Self::Number(..) => "number",
			Self::Dice => "'d'",
			Self::Plus => "'+'",
			Self::Minus => "'-'",
			Self::Star => "'*'",
			Self::Slash => "'/'",
			Self::LParen => "'('",
			Self::RParen => "')'",
			Self::End => "end of input",
		}
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Number(val) => write!(f, "{val}"),
			_ => f.write_str(self.kind_str()),
		}
	}
}

/// [`Token`] along with the byte offset in the source text at which it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Spanned {
	/// Token that was lexed
	pub token: Token,

	/// Byte offset of the token's first character
	pub position: usize,
}

/// Error that can occur during [`tokenize()`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LexError {
	/// Character that isn't part of dice notation
	#[error("unexpected character {found:?} at position {position}")]
	UnexpectedChar {
		/// Byte offset of the character
		position: usize,

		/// Character that was found
		found: char,
	},

	/// Digit run too large to represent as a value
	#[error("number at position {position} is too large")]
	NumberTooLarge {
		/// Byte offset of the number's first digit
		position: usize,
	},
}

impl LexError {
	/// Gets the byte offset in the source text that the error points to.
	#[must_use]
	pub const fn position(&self) -> usize {
		match self {
			Self::UnexpectedChar { position, .. } | Self::NumberTooLarge { position } => *position,
		}
	}
}

/// Generates a lexer that turns expression text into a list of tokens paired with their positions (without the
/// trailing [`Token::End`]). Whitespace is skipped entirely. A digit run that doesn't fit in a value is lexed as `None`
/// so that it can be reported at its first digit.
fn lexer<'src>() -> impl Parser<'src, &'src str, Vec<(Option<Token>, usize)>, extra::Err<Rich<'src, char>>> + Clone {
	// Parser for numbers, taking every consecutive digit so that "007" is a single token
	let number = any()
		.filter(char::is_ascii_digit)
		.repeated()
		.at_least(1)
		.collect::<String>()
		.map(|digits| digits.parse().ok().map(Token::Number));

	// Parser for operators and grouping symbols
	let symbol = choice((
		just('d').or(just('D')).to(Token::Dice),
		just('+').to(Token::Plus),
		just('-').to(Token::Minus),
		just('*').to(Token::Star),
		just('/').to(Token::Slash),
		just('(').to(Token::LParen),
		just(')').to(Token::RParen),
	));

	number
		.or(symbol.map(Some))
		.map_with(|token, e| {
			let span: SimpleSpan = e.span();
			(token, span.start)
		})
		.padded()
		.repeated()
		.collect()
		.padded()
		.then_ignore(end())
}

/// Converts expression text into an ordered list of tokens, always terminated by a [`Token::End`] positioned at the
/// end of the text.
///
/// # Errors
/// If the text contains a character that isn't part of dice notation, or a number that is too large to be
/// represented, an error variant is returned.
///
/// # Examples
/// ```
/// use dice_algebra::lex::{tokenize, Token};
///
/// let tokens = tokenize("2d6 - 3")?;
/// let kinds: Vec<_> = tokens.iter().map(|spanned| spanned.token).collect();
/// assert_eq!(
/// 	kinds,
/// 	[Token::Number(2), Token::Dice, Token::Number(6), Token::Minus, Token::Number(3), Token::End]
/// );
/// assert_eq!(tokens[3].position, 4);
/// # Ok::<(), dice_algebra::lex::LexError>(())
/// ```
pub fn tokenize(text: &str) -> Result<Vec<Spanned>, LexError> {
	let lexed = lexer().parse(text).into_result().map_err(|errs| {
		let position = errs.first().map_or(0, |err| err.span().start);
		unexpected_char(text, position)
	})?;

	let mut tokens = lexed
		.into_iter()
		.map(|(token, position)| {
			token
				.map(|token| Spanned { token, position })
				.ok_or(LexError::NumberTooLarge { position })
		})
		.collect::<Result<Vec<_>, _>>()?;

	tokens.push(Spanned {
		token: Token::End,
		position: text.len(),
	});
	Ok(tokens)
}

/// Builds the error for a character the lexer couldn't consume.
fn unexpected_char(text: &str, position: usize) -> LexError {
	let found = text
		.get(position..)
		.and_then(|rest| rest.chars().next())
		.unwrap_or_default();
	LexError::UnexpectedChar { position, found }
}

//! Recursive-descent parsing of [`Token`]s into an [`Expr`] tree.
//!
//! Grammar, highest precedence last:
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/') unary)*
//! unary := '-' unary | dice
//! dice  := atom ('d' atom)? | 'd' atom
//! atom  := number | '(' expr ')'
//! ```

use std::{fmt, str::FromStr};

use log::debug;

use crate::{
	expr::Expr,
	lex::{self, LexError, Spanned, Token},
};

/// Maximum depth of the expression tree. Parentheses, negations and every chained binary operator count towards it.
pub const MAX_DEPTH: usize = 256;

type PResult<T = Expr> = Result<T, ParseError>;

/// Something the parser would have accepted in place of the token it found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Expected {
	/// Number literal
	Number,

	/// Dice operator
	Dice,

	/// Negation
	Minus,

	/// Opening parenthesis
	LParen,

	/// Closing parenthesis
	RParen,

	/// Any binary operator
	Operator,

	/// End of input
	End,
}

impl Expected {
	/// Everything that can start an expression
	pub const EXPR_START: &'static [Self] = &[Self::Number, Self::Dice, Self::Minus, Self::LParen];

	/// Everything that can be a dice operand
	pub const ATOM_START: &'static [Self] = &[Self::Number, Self::LParen];
}

impl fmt::Display for Expected {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Number => "number",
			Self::Dice => "'d'",
			Self::Minus => "'-'",
			Self::LParen => "'('",
			Self::RParen => "')'",
			Self::Operator => "operator",
			Self::End => "end of input",
		})
	}
}

/// Error that can occur during [`parse()`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("error at position {position}: {kind}")]
#[non_exhaustive]
pub struct ParseError {
	/// What went wrong
	pub kind: ParseErrorKind,

	/// Byte offset of the offending token
	pub position: usize,
}

/// Specific type of [`ParseError`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
	/// Token that doesn't fit the grammar at its position
	UnexpectedToken {
		/// Token that was found
		found: Token,

		/// What could have been there instead
		expected: Vec<Expected>,
	},

	/// Expression tree deeper than [`MAX_DEPTH`]
	TooDeep,
}

impl fmt::Display for ParseErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UnexpectedToken { found, expected } => {
				write!(f, "unexpected {}, expected ", found.kind_str())?;
				fmt_expected(expected, f)
			}
			Self::TooDeep => write!(f, "expression is more than {MAX_DEPTH} levels deep"),
		}
	}
}

/// Writes a list of expectations as "a", "a or b", or "a, b, or c".
fn fmt_expected(expected: &[Expected], f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match expected {
		[] => Ok(()),
		[a] => write!(f, "{a}"),
		[a, b] => write!(f, "{a} or {b}"),
		[init @ .., last] => {
			for exp in init {
				write!(f, "{exp}, ")?;
			}
			write!(f, "or {last}")
		}
	}
}

/// Parser over a lexed list of tokens
#[derive(Debug)]
pub struct Parser<'t> {
	/// Tokens being parsed
	tokens: &'t [Spanned],

	/// Index of the next token to consume
	cursor: usize,

	/// Current nesting depth
	depth: usize,
}

impl<'t> Parser<'t> {
	/// Creates a parser for the given tokens. They are normally produced by [`lex::tokenize()`], but a missing
	/// trailing [`Token::End`] is tolerated.
	#[must_use]
	pub const fn new(tokens: &'t [Spanned]) -> Self {
		Self {
			tokens,
			cursor: 0,
			depth: 0,
		}
	}

	/// Parses a complete expression, requiring that every token is consumed.
	///
	/// # Errors
	/// If the tokens don't form a valid expression, an error variant is returned for the first offending token.
	pub fn parse(mut self) -> PResult {
		let expr = self.parse_expr()?;
		match self.peek().token {
			Token::End => Ok(expr),
			_ => self.unexpected(&[Expected::Operator, Expected::End]),
		}
	}

	/// Gets the next token without consuming it.
	fn peek(&self) -> Spanned {
		self.tokens.get(self.cursor).copied().unwrap_or_else(|| Spanned {
			token: Token::End,
			position: self.tokens.last().map_or(0, |last| last.position),
		})
	}

	/// Consumes the next token.
	fn advance(&mut self) -> Spanned {
		let next = self.peek();
		if self.cursor < self.tokens.len() {
			self.cursor = self.cursor.saturating_add(1);
		}
		next
	}

	/// Consumes the next token if it is of the given kind.
	fn eat(&mut self, token: Token) -> bool {
		let matches = self.peek().token == token;
		if matches {
			self.advance();
		}
		matches
	}

	/// Fails at the next token with the given expectations.
	fn unexpected<T>(&self, expected: &[Expected]) -> PResult<T> {
		let next = self.peek();
		Err(ParseError {
			kind: ParseErrorKind::UnexpectedToken {
				found: next.token,
				expected: expected.to_vec(),
			},
			position: next.position,
		})
	}

	/// Accounts for one more level of the expression tree, failing if [`MAX_DEPTH`] would be exceeded.
	fn deepen(&mut self) -> PResult<()> {
		if self.depth >= MAX_DEPTH {
			return Err(ParseError {
				kind: ParseErrorKind::TooDeep,
				position: self.peek().position,
			});
		}

		self.depth = self.depth.saturating_add(1);
		Ok(())
	}

	/// Runs a parsing step one level deeper in the expression tree.
	fn nested(&mut self, step: impl FnOnce(&mut Self) -> PResult) -> PResult {
		let outer = self.depth;
		self.deepen()?;
		let result = step(self);
		self.depth = outer;
		result
	}

	/// Parses a sum or difference of terms.
	fn parse_expr(&mut self) -> PResult {
		let outer = self.depth;
		let mut lhs = self.parse_term()?;

		loop {
			let op = match self.peek().token {
				Token::Plus => Expr::Add as fn(_, _) -> _,
				Token::Minus => Expr::Sub as fn(_, _) -> _,
				_ => break,
			};

			// Each operator in a left-associative chain wraps everything before it in one more node
			self.deepen()?;
			self.advance();
			let rhs = self.parse_term()?;
			lhs = op(Box::new(lhs), Box::new(rhs));
		}

		self.depth = outer;
		Ok(lhs)
	}

	/// Parses a product or quotient of unary expressions.
	fn parse_term(&mut self) -> PResult {
		let outer = self.depth;
		let mut lhs = self.parse_unary()?;

		loop {
			let op = match self.peek().token {
				Token::Star => Expr::Mul as fn(_, _) -> _,
				Token::Slash => Expr::Div as fn(_, _) -> _,
				_ => break,
			};

			self.deepen()?;
			self.advance();
			let rhs = self.parse_unary()?;
			lhs = op(Box::new(lhs), Box::new(rhs));
		}

		self.depth = outer;
		Ok(lhs)
	}

	/// Parses any number of negations applied to a dice term or atom.
	fn parse_unary(&mut self) -> PResult {
		if self.eat(Token::Minus) {
			self.nested(|parser| Ok(Expr::Neg(Box::new(parser.parse_unary()?))))
		} else {
			self.parse_dice()
		}
	}

	/// Parses a dice term, or a lone atom when no dice operator follows.
	fn parse_dice(&mut self) -> PResult {
		// A bare "d6" rolls a single die
		let count = if self.peek().token == Token::Dice {
			Expr::Num(1)
		} else {
			self.parse_atom(Expected::EXPR_START)?
		};

		if self.eat(Token::Dice) {
			let sides = self.parse_atom(Expected::ATOM_START)?;
			Ok(Expr::Dice {
				count: Box::new(count),
				sides: Box::new(sides),
			})
		} else {
			Ok(count)
		}
	}

	/// Parses a number or parenthesized expression. `expected` is reported if neither is found.
	fn parse_atom(&mut self, expected: &[Expected]) -> PResult {
		match self.peek().token {
			Token::Number(val) => {
				self.advance();
				Ok(Expr::Num(val))
			}
			Token::LParen => {
				self.advance();
				let inner = self.nested(Self::parse_expr)?;
				if self.eat(Token::RParen) {
					Ok(inner)
				} else {
					self.unexpected(&[Expected::Operator, Expected::RParen])
				}
			}
			_ => self.unexpected(expected),
		}
	}
}

/// Parses a lexed list of tokens into an expression.
///
/// # Errors
/// If the tokens don't form a valid expression, an error variant is returned for the first offending token.
pub fn parse(tokens: &[Spanned]) -> Result<Expr, ParseError> {
	Parser::new(tokens).parse()
}

/// Lexes and parses expression text.
///
/// # Errors
/// If the text can't be lexed or parsed, an error variant is returned describing the first problem found.
///
/// # Examples
/// ```
/// use dice_algebra::{parse::parse_str, Expr};
///
/// let expr = parse_str("(1d4 + 1) * 2")?;
/// assert_eq!(
/// 	expr,
/// 	Expr::Mul(
/// 		Box::new(Expr::Add(Box::new(Expr::dice(1, 4)), Box::new(Expr::Num(1)))),
/// 		Box::new(Expr::Num(2)),
/// 	)
/// );
/// # Ok::<(), dice_algebra::parse::SyntaxError>(())
/// ```
pub fn parse_str(text: &str) -> Result<Expr, SyntaxError> {
	let tokens = lex::tokenize(text)?;
	let expr = parse(&tokens)?;
	debug!("parsed {text:?} as {expr}");
	Ok(expr)
}

/// Error that can occur while turning expression text into an [`Expr`], either during lexing or parsing
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyntaxError {
	/// Text contains something that isn't dice notation
	#[error("lex error: {0}")]
	Lex(#[from] LexError),

	/// Tokens don't form a valid expression
	#[error("parse error: {0}")]
	Parse(#[from] ParseError),
}

impl SyntaxError {
	/// Gets the byte offset in the source text that the error points to.
	#[must_use]
	pub const fn position(&self) -> usize {
		match self {
			Self::Lex(err) => err.position(),
			Self::Parse(err) => err.position,
		}
	}
}

impl FromStr for Expr {
	type Err = SyntaxError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse_str(s)
	}
}

//! AST-like data structures for full mathematical dice expressions.

use std::fmt;

/// Generates an implementation of [`HasOpType`] for an enum type.
/// This is very tightly coupled with the expected variants:
/// `Num`, `Dice`, `Neg`, `Add`, `Sub`, `Mul`, and `Div`.
macro_rules! op_type_impl {
	($name:ty) => {
		impl HasOpType for $name {
			fn op_type(&self) -> OpType {
				match self {
					Self::Num(..) => OpType::Value,
					Self::Dice { .. } => OpType::Dice,
					Self::Neg(..) => OpType::Unary,
					Self::Add(..) | Self::Sub(..) => OpType::Additive,
					Self::Mul(..) | Self::Div(..) => OpType::Multiplicative,
				}
			}
		}
	};
}

/// Individual elements of a full mathematical dice expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Expr {
	/// Standalone integer
	Num(i32),

	/// Roll of `count` dice, each with `sides` sides, summed together
	Dice {
		/// Number of dice to roll
		count: Box<Self>,

		/// Number of sides for each die
		sides: Box<Self>,
	},

	/// Negation of an expression (makes the result of it negative)
	Neg(Box<Self>),

	/// Sum of two expressions
	Add(Box<Self>, Box<Self>),

	/// Difference of two expressions
	Sub(Box<Self>, Box<Self>),

	/// Product of two expressions
	Mul(Box<Self>, Box<Self>),

	/// Integer quotient of two expressions (truncated toward zero)
	Div(Box<Self>, Box<Self>),
}

op_type_impl!(Expr);

impl Expr {
	/// Creates a dice term with a literal count and number of sides.
	///
	/// # Examples
	/// ```
	/// use dice_algebra::Expr;
	///
	/// assert_eq!(Expr::dice(3, 6).to_string(), "3d6");
	/// ```
	#[must_use]
	pub fn dice(count: i32, sides: i32) -> Self {
		Self::Dice {
			count: Box::new(Self::Num(count)),
			sides: Box::new(Self::Num(sides)),
		}
	}

	/// Checks whether the expression is deterministic (will always yield the same value with every evaluation).
	/// A [`Self::Num`] will always return `true`, a [`Self::Dice`] will return `false` unless its count is a zero
	/// literal or its sides are a one literal (and its other operand is deterministic), and all unary and binary
	/// expressions forward the check to their children.
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		match self {
			Self::Num(..) => true,
			Self::Dice { count, sides } => {
				let fixed = matches!(count.as_ref(), Self::Num(0)) || matches!(sides.as_ref(), Self::Num(1));
				fixed && count.is_deterministic() && sides.is_deterministic()
			}
			Self::Neg(x) => x.is_deterministic(),
			Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) => {
				a.is_deterministic() && b.is_deterministic()
			}
		}
	}

	/// Counts the dice terms in the expression, including ones nested inside other dice terms' operands.
	#[must_use]
	pub fn dice_terms(&self) -> usize {
		match self {
			Self::Num(..) => 0,
			Self::Dice { count, sides } => count.dice_terms().saturating_add(sides.dice_terms()).saturating_add(1),
			Self::Neg(x) => x.dice_terms(),
			Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) => {
				a.dice_terms().saturating_add(b.dice_terms())
			}
		}
	}
}

impl Describe for Expr {
	/// Builds a full usable expression string from the expressions. Operations are grouped with parentheses only
	/// when precedence or associativity requires it, so all strings output from this re-parse to an equal tree.
	///
	/// `list_limit` does not affect the output of this implementation in any way since there are no possible lists of
	/// elements included, so it is always safe to pass `None`.
	fn describe(&self, _list_limit: Option<usize>) -> String {
		match self {
			Self::Num(x) => x.to_string(),
			Self::Dice { count, sides } => {
				format!("{}d{}", describe_dice_operand(count), describe_dice_operand(sides))
			}

			Self::Neg(x) => {
				if x.op_type() >= OpType::Unary && !matches!(x.as_ref(), Self::Num(val) if *val < 0) {
					format!("-{}", x.describe(None))
				} else {
					format!("-({})", x.describe(None))
				}
			}

			Self::Add(a, b) => self.describe_binary_expr('+', a, b),
			Self::Sub(a, b) => self.describe_binary_expr('-', a, b),
			Self::Mul(a, b) => self.describe_binary_expr('*', a, b),
			Self::Div(a, b) => self.describe_binary_expr('/', a, b),
		}
	}
}

impl Expr {
	/// Builds a description for a binary expression, wrapping the left side in parentheses when it binds looser than
	/// self and the right side when it binds looser or equally (operators are left-associative).
	fn describe_binary_expr(&self, op: char, a: &Self, b: &Self) -> String {
		let op_type = self.op_type();
		let lhs = if a.op_type() < op_type {
			paren_wrap(a.describe(None))
		} else {
			a.describe(None)
		};
		let rhs = if b.op_type() <= op_type {
			paren_wrap(b.describe(None))
		} else {
			b.describe(None)
		};
		format!("{lhs} {op} {rhs}")
	}
}

/// Describes an operand of a dice term, which must be a plain non-negative number or be parenthesized.
fn describe_dice_operand(operand: &Expr) -> String {
	match operand {
		Expr::Num(val) if *val >= 0 => val.to_string(),
		_ => paren_wrap(operand.describe(None)),
	}
}

impl fmt::Display for Expr {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output of this implementation is equivalent to [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Operation type for an individual expression, ordered from loosest to tightest binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[expect(clippy::exhaustive_enums, reason = "Mirrors the grammar's precedence levels")]
pub enum OpType {
	/// Additive operation (sum or difference)
	Additive,

	/// Multiplicative operation (product or quotient)
	Multiplicative,

	/// Unary operation
	Unary,

	/// Dice roll
	Dice,

	/// Single value, no operation
	Value,
}

/// Trait that offers [`OpType`]-related information
pub trait HasOpType {
	/// Gets the type of this expression.
	fn op_type(&self) -> OpType;

	/// Checks whether this expression is a single value.
	fn is_value(&self) -> bool {
		self.op_type() == OpType::Value
	}

	/// Checks whether this expression is a dice roll.
	fn is_dice(&self) -> bool {
		self.op_type() == OpType::Dice
	}

	/// Checks whether this expression is a unary operation.
	fn is_unary(&self) -> bool {
		self.op_type() == OpType::Unary
	}

	/// Checks whether this expression is a binary (additive or multiplicative) operation.
	fn is_binary(&self) -> bool {
		matches!(self.op_type(), OpType::Additive | OpType::Multiplicative)
	}
}

/// Trait to allow creation of expanded descriptions with an optional max number of individual listed results where
/// applicable
pub trait Describe {
	/// Builds a detailed string with additional information about non-deterministic elements.
	/// Anything that can have a different result between multiple evaluations or multiple results should list all of
	/// the specific individual results that occurred (ideally, up to `list_limit` of them).
	#[must_use]
	fn describe(&self, list_limit: Option<usize>) -> String;
}

/// Wraps a string in parentheses.
#[must_use]
pub(crate) fn paren_wrap(mut text: String) -> String {
	text.insert(0, '(');
	text.push(')');
	text
}

//! Evaluation of [`Expr`] trees into a total and a log of every die rolled.

use std::fmt;

use log::{debug, trace};

use crate::{
	expr::{Describe, Expr},
	random::RandomSource,
};

/// Result of evaluating an expression
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct Evaluation {
	/// Final value of the expression
	pub total: i32,

	/// Every individual die result, in the order they were drawn
	pub rolls: Vec<i32>,
}

impl Describe for Evaluation {
	/// Builds a string listing every individual roll followed by the total, like `[3, 5, 1] = 9`.
	///
	/// If `list_limit` is specified and there are more rolls than it, the list of rolls will be truncated and
	/// appended with "X more..." (where X is the remaining roll count past the max).
	///
	/// # Examples
	/// ```
	/// use dice_algebra::{expr::Describe, random::Iter, Engine};
	///
	/// let mut engine = Engine::builder().expression("4d6 + 2").build();
	/// let evaluation = engine.roll_with(&mut Iter::new([6, 2, 1, 4]))?;
	/// assert_eq!(evaluation.describe(None), "[6, 2, 1, 4] = 15");
	/// assert_eq!(evaluation.describe(Some(2)), "[6, 2, 2 more...] = 15");
	/// # Ok::<(), dice_algebra::engine::Error>(())
	/// ```
	fn describe(&self, list_limit: Option<usize>) -> String {
		let list_limit = list_limit.unwrap_or(usize::MAX);
		let truncated_rolls = self.rolls.len().saturating_sub(list_limit);

		format!(
			"[{}{}] = {}",
			self.rolls
				.iter()
				.take(list_limit)
				.map(ToString::to_string)
				.collect::<Vec<_>>()
				.join(", "),
			if truncated_rolls > 0 {
				format!(", {truncated_rolls} more...")
			} else {
				String::new()
			},
			self.total
		)
	}
}

impl fmt::Display for Evaluation {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output of this implementation is equivalent to [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Error that can occur during evaluation. Evaluation aborts at the first error and keeps no partial result.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
	/// Right side of a division evaluated to zero
	#[error("division by zero")]
	DivisionByZero,

	/// Dice term with fewer than one side
	#[error("dice must have at least 1 side, not {0}")]
	DiceSidesNotPositive(i32),

	/// Dice term with a negative count
	#[error("can't roll a negative number of dice ({0})")]
	DiceCountNegative(i32),

	/// Integer overflow (likely during calculation of a sum or product)
	#[error("integer overflow")]
	Overflow,

	/// Rolling a dice term would take the total number of dice rolled past the configured ceiling
	#[error("too many dice rolled (limit is {limit})")]
	TooManyDice {
		/// Maximum number of dice allowed per evaluation
		limit: u32,
	},
}

/// Walks expression trees, drawing one value from its [`RandomSource`] per die.
///
/// # Examples
/// ```
/// use dice_algebra::{eval::{EvalError, Evaluator}, random::Max, Expr};
///
/// let expr: Expr = "2d6 * 3".parse()?;
/// let evaluation = Evaluator::new(Max).evaluate(&expr)?;
/// assert_eq!(evaluation.total, 36);
/// assert_eq!(evaluation.rolls, [6, 6]);
///
/// let err = Evaluator::new(Max).max_dice(10).evaluate(&"4d6 + 8d6".parse::<Expr>()?);
/// assert_eq!(err, Err(EvalError::TooManyDice { limit: 10 }));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator<R: RandomSource> {
	/// Where die values come from
	source: R,

	/// Maximum number of dice a single evaluation may roll
	max_dice: Option<u32>,
}

impl<R: RandomSource> Evaluator<R> {
	/// Creates an evaluator with no dice ceiling.
	#[must_use]
	pub const fn new(source: R) -> Self {
		Self {
			source,
			max_dice: None,
		}
	}

	/// Sets the maximum number of dice that a single evaluation may roll.
	#[must_use]
	pub const fn max_dice(mut self, limit: u32) -> Self {
		self.max_dice = Some(limit);
		self
	}

	/// Consumes the evaluator, returning its source.
	#[must_use]
	pub fn into_source(self) -> R {
		self.source
	}

	/// Evaluates an expression. Children of binary operations are evaluated left before right, so the roll log is
	/// reproducible given a seeded source.
	///
	/// # Errors
	/// If there is an integer overflow, division by zero, invalid dice term, or the dice ceiling is exceeded, an
	/// error variant is returned. Any values already drawn from the source are discarded.
	pub fn evaluate(&mut self, expr: &Expr) -> Result<Evaluation, EvalError> {
		let mut rolls = Vec::new();
		let total = self.walk(expr, &mut rolls)?;
		debug!("evaluated {expr} to {total} with {} rolls", rolls.len());
		Ok(Evaluation { total, rolls })
	}

	/// Evaluates a single node post-order, appending any dice rolled to `rolls`.
	fn walk(&mut self, expr: &Expr, rolls: &mut Vec<i32>) -> Result<i32, EvalError> {
		match expr {
			Expr::Num(x) => Ok(*x),
			Expr::Dice { count, sides } => {
				let count = self.walk(count, rolls)?;
				let sides = self.walk(sides, rolls)?;
				self.roll_dice(count, sides, rolls)
			}

			Expr::Neg(x) => self.walk(x, rolls)?.checked_neg().ok_or(EvalError::Overflow),

			Expr::Add(a, b) => self.walk(a, rolls)?.checked_add(self.walk(b, rolls)?).ok_or(EvalError::Overflow),
			Expr::Sub(a, b) => self.walk(a, rolls)?.checked_sub(self.walk(b, rolls)?).ok_or(EvalError::Overflow),
			Expr::Mul(a, b) => self.walk(a, rolls)?.checked_mul(self.walk(b, rolls)?).ok_or(EvalError::Overflow),
			Expr::Div(a, b) => {
				let dividend = self.walk(a, rolls)?;
				let divisor = self.walk(b, rolls)?;
				if divisor == 0 {
					return Err(EvalError::DivisionByZero);
				}

				// i32::MIN / -1 is the only other way for this to fail
				dividend.checked_div(divisor).ok_or(EvalError::Overflow)
			}
		}
	}

	/// Rolls `count` dice with `sides` sides, appending each result to `rolls` and returning their sum.
	fn roll_dice(&mut self, count: i32, sides: i32, rolls: &mut Vec<i32>) -> Result<i32, EvalError> {
		if sides < 1 {
			return Err(EvalError::DiceSidesNotPositive(sides));
		}
		let count = u32::try_from(count).map_err(|_err| EvalError::DiceCountNegative(count))?;

		if let Some(limit) = self.max_dice {
			let rolled = u32::try_from(rolls.len()).unwrap_or(u32::MAX);
			if rolled.saturating_add(count) > limit {
				return Err(EvalError::TooManyDice { limit });
			}
		}

		let start = rolls.len();
		let mut sum: i32 = 0;
		for _ in 0..count {
			let val = self.source.uniform(1, sides);
			rolls.push(val);
			sum = sum.checked_add(val).ok_or(EvalError::Overflow)?;
		}

		trace!("rolled {count}d{sides}: {:?} = {sum}", &rolls[start..]);
		Ok(sum)
	}
}

/// Evaluates an expression with no dice ceiling.
///
/// # Errors
/// If there is an integer overflow, division by zero, or invalid dice term, an error variant is returned.
///
/// # Examples
/// ```
/// use dice_algebra::{eval::evaluate, random::Val, Expr};
///
/// let evaluation = evaluate(&Expr::dice(3, 6), &mut Val(2))?;
/// assert_eq!(evaluation.total, 6);
/// # Ok::<(), dice_algebra::eval::EvalError>(())
/// ```
pub fn evaluate(expr: &Expr, source: &mut impl RandomSource) -> Result<Evaluation, EvalError> {
	Evaluator::new(source).evaluate(expr)
}

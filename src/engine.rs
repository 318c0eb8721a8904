//! Stateful engine that owns one expression's lifecycle, from raw text through parsing to its latest evaluation.

use std::{fmt, mem};

use log::debug;

#[cfg(feature = "fastrand")]
use crate::random::FastRand;
use crate::{
	eval::{EvalError, Evaluation, Evaluator},
	expr::Expr,
	parse::{self, SyntaxError},
	random::RandomSource,
};

/// Lifecycle of an [`Engine`]'s expression
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum EngineState {
	/// No expression has been set
	#[default]
	Empty,

	/// Expression is well-formed but hasn't been rolled since it was set
	Parsed(Expr),

	/// Expression has been rolled at least once, with the result of the latest roll
	Evaluated(Expr, Evaluation),

	/// Expression couldn't be parsed
	Invalid(SyntaxError),
}

/// Error from calling [`Engine`] operations out of sequence
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
	/// Roll attempted without a valid expression set
	#[error("no valid expression has been set")]
	NotParsed,

	/// Result requested before the expression was rolled
	#[error("the expression hasn't been rolled yet")]
	NoResult,
}

/// Any error that can occur while going from expression text to a result
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// Expression text is malformed
	#[error(transparent)]
	Syntax(#[from] SyntaxError),

	/// Expression is well-formed but couldn't be evaluated
	#[error("evaluation error: {0}")]
	Eval(#[from] EvalError),

	/// Engine was used out of sequence
	#[error(transparent)]
	Engine(#[from] EngineError),
}

/// Owns a single dice expression and the result of its latest roll.
///
/// Setting an expression always discards any previous result, so [`Self::result()`] is only ever the outcome of
/// rolling the current expression.
///
/// # Examples
/// ```
/// use dice_algebra::{engine::EngineError, Engine};
///
/// let mut engine = Engine::builder().seed(42).build();
/// assert!(engine.set_expression("1d20 + 5"));
/// assert_eq!(engine.result(), Err(EngineError::NoResult));
///
/// let total = engine.roll()?.total;
/// assert!((6..=25).contains(&total));
/// assert_eq!(engine.result(), Ok(total));
///
/// assert!(!engine.set_expression("1d20 +"));
/// assert!(engine.roll().is_err());
/// # Ok::<(), dice_algebra::engine::Error>(())
/// ```
pub struct Engine {
	/// Text of the current expression
	text: Option<String>,

	/// Where the current expression is in its lifecycle
	state: EngineState,

	/// Source used by [`Self::roll()`]
	source: Box<dyn RandomSource + Send>,

	/// Maximum number of dice a single roll may use
	max_dice: Option<u32>,
}

impl Engine {
	/// Creates an empty engine that rolls with an entropy-seeded [`FastRand`] source.
	/// Requires the `fastrand` feature (enabled by default).
	#[cfg(feature = "fastrand")]
	#[must_use]
	pub fn new() -> Self {
		Self::with_source(FastRand::default())
	}

	/// Creates an empty engine that rolls with the given source.
	#[must_use]
	pub fn with_source(source: impl RandomSource + Send + 'static) -> Self {
		Self {
			text: None,
			state: EngineState::Empty,
			source: Box::new(source),
			max_dice: None,
		}
	}

	/// Creates a new engine builder.
	#[must_use]
	#[inline]
	pub fn builder() -> EngineBuilder {
		EngineBuilder::default()
	}

	/// Lexes and parses expression text in one go, rolls it with an entropy-seeded source, and returns its total.
	/// Requires the `fastrand` feature (enabled by default).
	///
	/// # Errors
	/// If the text isn't a well-formed expression or its evaluation fails, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dice_algebra::Engine;
	///
	/// assert_eq!(Engine::evaluate("(2 + 3) * 4")?, 20);
	/// assert!(Engine::evaluate("6 / 0").is_err());
	/// # Ok::<(), dice_algebra::engine::Error>(())
	/// ```
	#[cfg(feature = "fastrand")]
	pub fn evaluate(text: &str) -> Result<i32, Error> {
		let mut engine = Self::new();
		engine.try_set_expression(text)?;
		engine.roll()?;
		Ok(engine.result()?)
	}

	/// Sets the expression, parsing it immediately and discarding any previous result.
	/// Returns whether the expression is well-formed.
	pub fn set_expression(&mut self, text: impl Into<String>) -> bool {
		self.try_set_expression(text).is_ok()
	}

	/// Sets the expression, parsing it immediately and discarding any previous result.
	///
	/// # Errors
	/// If the expression isn't well-formed, the engine is left [invalid] and the syntax error is returned.
	///
	/// [invalid]: EngineState::Invalid
	pub fn try_set_expression(&mut self, text: impl Into<String>) -> Result<(), SyntaxError> {
		let text = text.into();
		let parsed = parse::parse_str(&text);
		self.text = Some(text);

		match parsed {
			Ok(expr) => {
				self.state = EngineState::Parsed(expr);
				Ok(())
			}
			Err(err) => {
				debug!("engine set to invalid expression: {err}");
				self.state = EngineState::Invalid(err.clone());
				Err(err)
			}
		}
	}

	/// Gets the text of the current expression, if one has been set (valid or not).
	#[must_use]
	pub fn expression(&self) -> Option<&str> {
		self.text.as_deref()
	}

	/// Gets the parsed form of the current expression, if it is valid.
	#[must_use]
	pub const fn expr(&self) -> Option<&Expr> {
		match &self.state {
			EngineState::Parsed(expr) | EngineState::Evaluated(expr, _) => Some(expr),
			EngineState::Empty | EngineState::Invalid(..) => None,
		}
	}

	/// Gets the state of the current expression.
	#[must_use]
	pub const fn state(&self) -> &EngineState {
		&self.state
	}

	/// Checks whether the current expression is well-formed (and therefore rollable).
	#[must_use]
	pub const fn is_valid(&self) -> bool {
		self.expr().is_some()
	}

	/// Gets the reason the current expression couldn't be parsed, if it is invalid.
	#[must_use]
	pub const fn syntax_error(&self) -> Option<&SyntaxError> {
		match &self.state {
			EngineState::Invalid(err) => Some(err),
			_ => None,
		}
	}

	/// Sets the maximum number of dice a single roll may use.
	pub fn set_max_dice(&mut self, limit: Option<u32>) {
		self.max_dice = limit;
	}

	/// Rolls the current expression using the engine's own source, replacing any previous result.
	///
	/// # Errors
	/// If no valid expression is set, [`EngineError::NotParsed`] is returned. If evaluation fails, the engine goes
	/// back to having no result and the evaluation error is returned.
	pub fn roll(&mut self) -> Result<&Evaluation, Error> {
		let expr = self.take_parsed()?;
		let result = evaluator(&mut self.source, self.max_dice).evaluate(&expr);
		self.finish(expr, result)
	}

	/// Rolls the current expression using the given source, replacing any previous result.
	///
	/// # Errors
	/// If no valid expression is set, [`EngineError::NotParsed`] is returned. If evaluation fails, the engine goes
	/// back to having no result and the evaluation error is returned.
	pub fn roll_with(&mut self, source: &mut impl RandomSource) -> Result<&Evaluation, Error> {
		let expr = self.take_parsed()?;
		let result = evaluator(source, self.max_dice).evaluate(&expr);
		self.finish(expr, result)
	}

	/// Gets the total from the latest roll.
	///
	/// # Errors
	/// If the current expression hasn't been rolled, [`EngineError::NoResult`] is returned.
	pub const fn result(&self) -> Result<i32, EngineError> {
		match self.evaluation() {
			Ok(evaluation) => Ok(evaluation.total),
			Err(err) => Err(err),
		}
	}

	/// Gets the full evaluation (total and roll log) from the latest roll.
	///
	/// # Errors
	/// If the current expression hasn't been rolled, [`EngineError::NoResult`] is returned.
	pub const fn evaluation(&self) -> Result<&Evaluation, EngineError> {
		match &self.state {
			EngineState::Evaluated(_, evaluation) => Ok(evaluation),
			_ => Err(EngineError::NoResult),
		}
	}

	/// Takes the parsed expression out of the state in preparation for rolling it.
	fn take_parsed(&mut self) -> Result<Expr, EngineError> {
		match mem::take(&mut self.state) {
			EngineState::Parsed(expr) | EngineState::Evaluated(expr, _) => Ok(expr),
			other => {
				self.state = other;
				Err(EngineError::NotParsed)
			}
		}
	}

	/// Puts the expression back into the state along with the outcome of rolling it.
	fn finish(&mut self, expr: Expr, result: Result<Evaluation, EvalError>) -> Result<&Evaluation, Error> {
		match result {
			Ok(evaluation) => {
				debug!("engine rolled {expr}: {evaluation}");
				self.state = EngineState::Evaluated(expr, evaluation);
				Ok(self.evaluation()?)
			}
			Err(err) => {
				debug!("engine failed to roll {expr}: {err}");
				self.state = EngineState::Parsed(expr);
				Err(err.into())
			}
		}
	}
}

/// Creates an evaluator with an optional dice ceiling.
fn evaluator<R: RandomSource>(source: R, max_dice: Option<u32>) -> Evaluator<R> {
	let evaluator = Evaluator::new(source);
	match max_dice {
		Some(limit) => evaluator.max_dice(limit),
		None => evaluator,
	}
}

#[cfg(feature = "fastrand")]
impl Default for Engine {
	/// Creates an empty engine that rolls with an entropy-seeded [`FastRand`] source.
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Engine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Engine")
			.field("text", &self.text)
			.field("state", &self.state)
			.field("max_dice", &self.max_dice)
			.finish_non_exhaustive()
	}
}

/// Builds an [`Engine`] with its expression and settings in place.
///
/// # Examples
/// ```
/// use dice_algebra::{engine::EngineState, random::Max, Engine};
///
/// let mut engine = Engine::builder().expression("3d6").max_dice(100).build_with(Max);
/// assert!(matches!(engine.state(), EngineState::Parsed(..)));
/// assert_eq!(engine.roll()?.total, 18);
/// # Ok::<(), dice_algebra::engine::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
	/// Expression to set on the engine
	expression: Option<String>,

	/// Dice ceiling
	max_dice: Option<u32>,

	/// Seed for the default source
	#[cfg(feature = "fastrand")]
	seed: Option<u64>,
}

impl EngineBuilder {
	/// Sets the expression the engine starts with.
	#[must_use]
	pub fn expression(mut self, text: impl Into<String>) -> Self {
		self.expression = Some(text.into());
		self
	}

	/// Sets the maximum number of dice a single roll may use.
	#[must_use]
	pub const fn max_dice(mut self, limit: u32) -> Self {
		self.max_dice = Some(limit);
		self
	}

	/// Seeds the engine's default source so that its rolls are reproducible.
	/// Requires the `fastrand` feature (enabled by default).
	#[cfg(feature = "fastrand")]
	#[must_use]
	pub const fn seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	/// Finalizes the engine, rolling with a [`FastRand`] source (seeded if [`Self::seed()`] was used).
	/// Requires the `fastrand` feature (enabled by default).
	#[cfg(feature = "fastrand")]
	#[must_use]
	pub fn build(self) -> Engine {
		let source = self.seed.map_or_else(FastRand::default, FastRand::with_seed);
		self.build_with(source)
	}

	/// Finalizes the engine, rolling with the given source. An invalid expression leaves the engine
	/// [invalid](EngineState::Invalid) rather than failing the build.
	#[must_use]
	pub fn build_with(self, source: impl RandomSource + Send + 'static) -> Engine {
		let mut engine = Engine::with_source(source);
		engine.max_dice = self.max_dice;
		if let Some(text) = self.expression {
			engine.set_expression(text);
		}
		engine
	}
}

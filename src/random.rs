//! Sources of uniformly distributed integers for rolling dice.

use std::{
	iter::Peekable,
	sync::{Mutex, PoisonError},
};

#[cfg(feature = "fastrand")]
use fastrand::Rng;

/// Provides uniformly distributed integers - one per die rolled.
pub trait RandomSource {
	/// Generates an integer with equal probability over the inclusive range `low..=high`.
	/// Callers guarantee that `low <= high`.
	#[must_use]
	fn uniform(&mut self, low: i32, high: i32) -> i32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
	#[inline]
	fn uniform(&mut self, low: i32, high: i32) -> i32 {
		(**self).uniform(low, high)
	}
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
	#[inline]
	fn uniform(&mut self, low: i32, high: i32) -> i32 {
		(**self).uniform(low, high)
	}
}

/// A source shared between threads serializes access through its mutex. Each draw locks separately, so concurrent
/// evaluations interleave their draws; use one source per thread for reproducible results.
impl<R: RandomSource + ?Sized> RandomSource for &Mutex<R> {
	fn uniform(&mut self, low: i32, high: i32) -> i32 {
		// A panic mid-draw can't leave a generator's state invalid, so poisoning is ignored
		self.lock().unwrap_or_else(PoisonError::into_inner).uniform(low, high)
	}
}

/// Generates random values using [fastrand]. Requires the `fastrand` feature (enabled by default).
///
/// # Examples
///
/// ## Default fastrand source
/// ```
/// use dice_algebra::{random::{FastRand, RandomSource}};
///
/// let mut source = FastRand::default();
/// let val = source.uniform(1, 6);
/// assert!((1..=6).contains(&val));
/// ```
///
/// ## Manually seeded fastrand source
/// ```
/// use dice_algebra::{random::{FastRand, RandomSource}};
///
/// let mut a = FastRand::with_seed(0x750c38d574400);
/// let mut b = FastRand::with_seed(0x750c38d574400);
/// assert_eq!(a.uniform(1, 20), b.uniform(1, 20));
/// ```
///
/// ## Custom fastrand source
/// ```
/// use dice_algebra::{random::{FastRand, RandomSource}};
/// use fastrand::Rng;
///
/// let rng = Rng::with_seed(0x750c38d574400);
/// let mut source = FastRand::new(rng);
/// let _ = source.uniform(1, 8);
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone, Default)]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand source that uses the given RNG instance to generate values.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand source that uses a pre-seeded RNG instance to generate values.
	/// Two sources created with the same seed produce the same sequence.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl RandomSource for FastRand {
	/// Generates a value using the [`fastrand::Rng`] the source was created with.
	#[inline]
	fn uniform(&mut self, low: i32, high: i32) -> i32 {
		self.0.i32(low..=high)
	}
}

/// Generates values that are always a specific number, regardless of range.
///
/// # Examples
/// ```
/// use dice_algebra::{random::Val, Engine};
///
/// let mut engine = Engine::builder().expression("4d6").build();
/// let evaluation = engine.roll_with(&mut Val(3))?;
/// assert_eq!(evaluation.rolls, [3, 3, 3, 3]);
/// assert_eq!(evaluation.total, 12);
/// # Ok::<(), dice_algebra::engine::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Val(pub i32);

impl RandomSource for Val {
	/// Generates a value, always the one specific number.
	#[inline]
	fn uniform(&mut self, _low: i32, _high: i32) -> i32 {
		self.0
	}
}

/// Generates values that are always the top of the range.
///
/// # Examples
/// ```
/// use dice_algebra::{random::Max, Engine};
///
/// let mut engine = Engine::builder().expression("2d20 + 1d4").build();
/// assert_eq!(engine.roll_with(&mut Max)?.rolls, [20, 20, 4]);
/// # Ok::<(), dice_algebra::engine::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl RandomSource for Max {
	/// Generates the max value (same as the number of sides when rolling dice).
	#[inline]
	fn uniform(&mut self, _low: i32, high: i32) -> i32 {
		high
	}
}

/// Generates values that are always the bottom of the range.
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Min;

impl RandomSource for Min {
	/// Generates the min value (always 1 when rolling dice).
	#[inline]
	fn uniform(&mut self, low: i32, _high: i32) -> i32 {
		low
	}
}

/// Generates values from an iterator, without regard for the range. Mainly useful for testing purposes.
///
/// # Examples
/// ```
/// use dice_algebra::{random::Iter, Engine};
///
/// let mut source = Iter::new(vec![1, 2, 3, 4, 10]);
/// let mut engine = Engine::builder().expression("5d6").build();
/// assert_eq!(engine.roll_with(&mut source)?.rolls, [1, 2, 3, 4, 10]);
/// assert!(!source.can_roll());
/// # Ok::<(), dice_algebra::engine::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = i32>>(Peekable<I>);

impl<I: Iterator<Item = i32>> Iter<I> {
	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Creates a new source that uses the given iterator to provide values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = i32>> RandomSource for Iter<I> {
	/// Generates the value from the next iteration.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn uniform(&mut self, _low: i32, _high: i32) -> i32 {
		self.0.next().expect("iterator is finished")
	}
}

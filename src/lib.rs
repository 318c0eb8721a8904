#![doc = pretty_readme::docify!("README.md", "https://docs.rs/dice-algebra/latest/dice_algebra/", "./")]
#![expect(
	clippy::tabs_in_doc_comments,
	reason = "Consistency with source, user-configurability & accessibility"
)]
#![deny(macro_use_extern_crate, meta_variable_misuse, unit_bindings)]
#![warn(
	explicit_outlives_requirements,
	missing_docs,
	missing_debug_implementations,
	unreachable_pub,
	unused_qualifications,
	clippy::pedantic,
	clippy::absolute_paths,
	clippy::allow_attributes,
	clippy::allow_attributes_without_reason,
	clippy::arithmetic_side_effects,
	clippy::clone_on_ref_ptr,
	clippy::cognitive_complexity,
	clippy::dbg_macro,
	clippy::empty_enum_variants_with_brackets,
	clippy::empty_structs_with_brackets,
	clippy::exhaustive_enums,
	clippy::exhaustive_structs,
	clippy::exit,
	clippy::expect_used,
	clippy::get_unwrap,
	clippy::if_then_some_else_none,
	clippy::infinite_loop,
	clippy::map_err_ignore,
	clippy::missing_const_for_fn,
	clippy::missing_docs_in_private_items,
	clippy::needless_raw_strings,
	clippy::panic_in_result_fn,
	clippy::print_stderr,
	clippy::print_stdout,
	clippy::redundant_type_annotations,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::same_name_method,
	clippy::semicolon_inside_block,
	clippy::str_to_string,
	clippy::tests_outside_test_module,
	clippy::try_err,
	clippy::unnecessary_self_imports,
	clippy::unneeded_field_pattern,
	clippy::unwrap_in_result,
	clippy::unwrap_used
)]

pub mod engine;
pub mod eval;
pub mod expr;
pub mod lex;
pub mod parse;
pub mod random;
pub mod validate;

pub use engine::Engine;
pub use eval::Evaluation;
pub use expr::Expr;
pub use random::RandomSource;
pub use validate::validate;

/// Evaluates expression text in one go with an entropy-seeded source and returns its total.
/// This is shorthand for [`Engine::evaluate()`] and requires the `fastrand` feature (enabled by default).
///
/// # Errors
/// If the text isn't a well-formed expression or its evaluation fails, an error variant is returned.
///
/// # Examples
/// ```
/// assert_eq!(dice_algebra::evaluate("2+3*4")?, 14);
/// assert_eq!(dice_algebra::evaluate("1d1")?, 1);
/// # Ok::<(), dice_algebra::engine::Error>(())
/// ```
#[cfg(feature = "fastrand")]
#[inline]
pub fn evaluate(text: &str) -> Result<i32, engine::Error> {
	Engine::evaluate(text)
}

#[cfg(test)]
mod tests;

use std::{
	env,
	io::{self, Write},
	process::ExitCode,
};

use ariadne::{Color, Label, Report, ReportKind, Source};
use dice_algebra::{
	expr::Describe,
	lex::LexError,
	parse::{ParseErrorKind, SyntaxError},
	Engine,
};

/// Number of individual rolls to list before truncating
const LIST_LIMIT: usize = 100;

fn main() -> ExitCode {
	pretty_env_logger::init();

	let input = match read_input() {
		Ok(input) => input,
		Err(err) => {
			eprintln!("Unable to read expression: {err}");
			return ExitCode::FAILURE;
		}
	};

	let mut builder = Engine::builder().expression(input.as_str());
	match env_var::<u64>("ROLL_SEED") {
		Ok(Some(seed)) => builder = builder.seed(seed),
		Ok(None) => {}
		Err(msg) => {
			eprintln!("{msg}");
			return ExitCode::FAILURE;
		}
	}
	match env_var::<u32>("ROLL_MAX_DICE") {
		Ok(Some(limit)) => builder = builder.max_dice(limit),
		Ok(None) => {}
		Err(msg) => {
			eprintln!("{msg}");
			return ExitCode::FAILURE;
		}
	}
	let mut engine = builder.build();

	println!("Input: {input}");
	if let Some(err) = engine.syntax_error() {
		report_syntax_error(&input, err);
		return ExitCode::FAILURE;
	}
	if let Some(expr) = engine.expr() {
		println!("Parsed: {expr}");
		println!("Deterministic: {}", expr.is_deterministic());
	}

	match engine.roll() {
		Ok(evaluation) => {
			println!();
			println!("Rolls: {}", evaluation.describe(Some(LIST_LIMIT)));
			println!("Total: {}", evaluation.total);
			ExitCode::SUCCESS
		}
		Err(err) => {
			eprintln!("Evaluation error: {err}");
			ExitCode::FAILURE
		}
	}
}

/// Obtains the expression by combining all args passed to the executable, so that it can be left unquoted even with
/// spaces. Without args, the first line of stdin is used instead.
fn read_input() -> io::Result<String> {
	let args = env::args();
	if args.len() > 1 {
		// The first argument is ignored since it is typically the name of the executable itself
		return Ok(args.skip(1).collect::<Vec<String>>().join(" "));
	}

	let mut lines = io::stdin().lines();

	// If there isn't already input available in stdin, display a prompt for it
	if lines.size_hint().1.is_none() {
		print!("Enter dice expression: ");
		io::stdout().flush()?;
	}

	lines.next().unwrap_or_else(|| Ok(String::new()))
}

/// Reads and parses an optional environment variable.
fn env_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, String> {
	match env::var(name) {
		Ok(val) => val
			.trim()
			.parse()
			.map(Some)
			.map_err(|_err| format!("{name} must be a non-negative integer, not {val:?}")),
		Err(env::VarError::NotPresent) => Ok(None),
		Err(err) => Err(format!("{name}: {err}")),
	}
}

/// Prints a syntax error as a diagnostic pointing at the offending part of the input.
fn report_syntax_error(input: &str, err: &SyntaxError) {
	let start = err.position().min(input.len());
	let end = input[start..]
		.chars()
		.next()
		.map_or(start, |c| start + c.len_utf8());

	let label = match err {
		SyntaxError::Lex(LexError::UnexpectedChar { .. }) => "not part of dice notation".to_owned(),
		SyntaxError::Lex(_) => "number is too large".to_owned(),
		SyntaxError::Parse(err) => match &err.kind {
			ParseErrorKind::UnexpectedToken { .. } => err.kind.to_string(),
			_ => "expression is too deep".to_owned(),
		},
		_ => err.to_string(),
	};

	let printed = Report::build(ReportKind::Error, start..end)
		.with_message(err.to_string())
		.with_label(Label::new(start..end).with_message(label).with_color(Color::Red))
		.finish()
		.eprint(Source::from(input));

	if printed.is_err() {
		eprintln!("Syntax error: {err}");
	}
}

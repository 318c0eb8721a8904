use crate::{
	expr::Expr,
	lex::{tokenize, Token},
	parse::{parse, parse_str, Expected, ParseError, ParseErrorKind, SyntaxError, MAX_DEPTH},
};

fn num(val: i32) -> Box<Expr> {
	Box::new(Expr::Num(val))
}

fn unexpected(text: &str) -> (usize, Token, Vec<Expected>) {
	match parse_str(text) {
		Err(SyntaxError::Parse(ParseError {
			position,
			kind: ParseErrorKind::UnexpectedToken { found, expected },
		})) => (position, found, expected),
		other => panic!("expected an unexpected token error for {text:?}, got {other:?}"),
	}
}

#[test]
fn single_number() {
	assert_eq!(parse_str("42").unwrap(), Expr::Num(42));
}

#[test]
fn dice_term() {
	assert_eq!(parse_str("3d6").unwrap(), Expr::dice(3, 6));
}

#[test]
fn implicit_dice_count() {
	assert_eq!(parse_str("d20").unwrap(), Expr::dice(1, 20));
	assert_eq!(parse_str("D20").unwrap(), parse_str("1d20").unwrap());
}

#[test]
fn zero_count_and_zero_sides_parse() {
	assert_eq!(parse_str("0d6").unwrap(), Expr::dice(0, 6));
	assert_eq!(parse_str("2d0").unwrap(), Expr::dice(2, 0));
}

#[test]
fn multiplication_binds_tighter() {
	assert_eq!(
		parse_str("2+3*4").unwrap(),
		Expr::Add(num(2), Box::new(Expr::Mul(num(3), num(4))))
	);
}

#[test]
fn parentheses_group() {
	assert_eq!(
		parse_str("(2+3)*4").unwrap(),
		Expr::Mul(Box::new(Expr::Add(num(2), num(3))), num(4))
	);
}

#[test]
fn operators_are_left_associative() {
	assert_eq!(
		parse_str("10-4-3").unwrap(),
		Expr::Sub(Box::new(Expr::Sub(num(10), num(4))), num(3))
	);
	assert_eq!(
		parse_str("20/5/2").unwrap(),
		Expr::Div(Box::new(Expr::Div(num(20), num(5))), num(2))
	);
}

#[test]
fn dice_binds_tighter_than_arithmetic() {
	assert_eq!(
		parse_str("2d6*3").unwrap(),
		Expr::Mul(Box::new(Expr::dice(2, 6)), num(3))
	);
	assert_eq!(
		parse_str("1d20+5").unwrap(),
		Expr::Add(Box::new(Expr::dice(1, 20)), num(5))
	);
}

#[test]
fn negation_applies_to_whole_dice_term() {
	assert_eq!(parse_str("-2d6").unwrap(), Expr::Neg(Box::new(Expr::dice(2, 6))));
	assert_eq!(parse_str("--3").unwrap(), Expr::Neg(Box::new(Expr::Neg(num(3)))));
	assert_eq!(parse_str("5--3").unwrap(), Expr::Sub(num(5), Box::new(Expr::Neg(num(3)))));
}

#[test]
fn parenthesized_dice_operands() {
	assert_eq!(
		parse_str("(1+1)d(2*3)").unwrap(),
		Expr::Dice {
			count: Box::new(Expr::Add(num(1), num(1))),
			sides: Box::new(Expr::Mul(num(2), num(3))),
		}
	);
	assert_eq!(
		parse_str("2d(-6)").unwrap(),
		Expr::Dice {
			count: num(2),
			sides: Box::new(Expr::Neg(num(6))),
		}
	);
}

#[test]
fn nested_grouping() {
	assert_eq!(
		parse_str("((2d6 + 1)) * 3").unwrap(),
		Expr::Mul(Box::new(Expr::Add(Box::new(Expr::dice(2, 6)), num(1))), num(3))
	);
}

#[test]
fn negative_dice_sides_rejected() {
	let (position, found, expected) = unexpected("2d-6");
	assert_eq!(position, 2);
	assert_eq!(found, Token::Minus);
	assert_eq!(expected, Expected::ATOM_START);
}

#[test]
fn trailing_operator_rejected() {
	let (position, found, expected) = unexpected("2d6+");
	assert_eq!(position, 4);
	assert_eq!(found, Token::End);
	assert_eq!(expected, Expected::EXPR_START);
}

#[test]
fn unbalanced_parentheses_rejected() {
	let (position, found, expected) = unexpected("(1+2");
	assert_eq!(position, 4);
	assert_eq!(found, Token::End);
	assert_eq!(expected, [Expected::Operator, Expected::RParen]);

	let (position, found, _) = unexpected("1+2)");
	assert_eq!(position, 3);
	assert_eq!(found, Token::RParen);
}

#[test]
fn trailing_input_rejected() {
	let (position, found, expected) = unexpected("2d6 3");
	assert_eq!(position, 4);
	assert_eq!(found, Token::Number(3));
	assert_eq!(expected, [Expected::Operator, Expected::End]);

	assert_eq!(unexpected("2d6d8").1, Token::Dice);
	assert_eq!(unexpected("2(3)").1, Token::LParen);
}

#[test]
fn empty_input_rejected() {
	assert_eq!(unexpected(""), (0, Token::End, Expected::EXPR_START.to_vec()));
	assert_eq!(unexpected("()").1, Token::RParen);
	assert_eq!(unexpected("dd6").1, Token::Dice);
}

#[test]
fn lex_errors_pass_through() {
	assert!(matches!(parse_str("3#4"), Err(SyntaxError::Lex(..))));
	assert_eq!(parse_str("3#4").unwrap_err().position(), 1);
}

#[test]
fn error_messages() {
	assert_eq!(
		parse_str("2d-6").unwrap_err().to_string(),
		"parse error: error at position 2: unexpected '-', expected number or '('"
	);
	assert_eq!(
		parse_str("2d6+").unwrap_err().to_string(),
		"parse error: error at position 4: unexpected end of input, expected number, 'd', '-', or '('"
	);
}

#[test]
fn deep_nesting_rejected() {
	let ok = format!("{}1{}", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1));
	assert_eq!(parse_str(&ok).unwrap(), Expr::Num(1));

	let too_deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
	assert!(matches!(
		parse_str(&too_deep),
		Err(SyntaxError::Parse(ParseError {
			kind: ParseErrorKind::TooDeep,
			..
		}))
	));

	let negations = format!("{}1", "-".repeat(MAX_DEPTH + 1));
	assert!(parse_str(&negations).is_err());
}

#[test]
fn long_operator_chains_limited() {
	let ok = format!("1{}", "+1".repeat(MAX_DEPTH));
	assert!(parse_str(&ok).is_ok());

	let too_long = format!("1{}", "+1".repeat(MAX_DEPTH + 1));
	assert_eq!(
		parse_str(&too_long),
		Err(SyntaxError::Parse(ParseError {
			kind: ParseErrorKind::TooDeep,
			position: 1 + 2 * MAX_DEPTH,
		}))
	);

	let products = format!("2{}", "*1".repeat(20_000));
	assert!(matches!(
		parse_str(&products),
		Err(SyntaxError::Parse(ParseError {
			kind: ParseErrorKind::TooDeep,
			..
		}))
	));
}

#[test]
fn chains_and_nesting_share_depth() {
	let half = MAX_DEPTH / 2;
	let ok = format!("{}1{}{}", "(".repeat(half), "+1".repeat(half - 1), ")".repeat(half));
	assert!(parse_str(&ok).is_ok());

	let too_deep = format!("{}1{}{}", "(".repeat(half), "+1".repeat(half + 1), ")".repeat(half));
	assert!(matches!(
		parse_str(&too_deep),
		Err(SyntaxError::Parse(ParseError {
			kind: ParseErrorKind::TooDeep,
			..
		}))
	));

	// Separate terms of a sum don't accumulate depth from each other
	let terms = vec!["(1*2*3*4)"; MAX_DEPTH / 2].join("+");
	assert!(parse_str(&terms).is_ok());
}

#[test]
fn tokens_without_end_marker() {
	let mut tokens = tokenize("1 + 2").unwrap();
	tokens.pop();
	assert_eq!(parse(&tokens).unwrap(), Expr::Add(num(1), num(2)));
	assert!(parse(&[]).is_err());
}

#[test]
fn from_str() {
	let expr: Expr = "4d8 + 4".parse().unwrap();
	assert_eq!(expr, Expr::Add(Box::new(Expr::dice(4, 8)), num(4)));
}

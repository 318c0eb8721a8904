use crate::lex::{tokenize, LexError, Spanned, Token};

fn kinds(text: &str) -> Vec<Token> {
	tokenize(text).unwrap().into_iter().map(|spanned| spanned.token).collect()
}

#[test]
fn basic_dice() {
	assert_eq!(kinds("3d6"), [Token::Number(3), Token::Dice, Token::Number(6), Token::End]);
}

#[test]
fn uppercase_dice() {
	assert_eq!(kinds("2D20"), kinds("2d20"));
}

#[test]
fn all_symbols() {
	assert_eq!(
		kinds("+-*/()"),
		[
			Token::Plus,
			Token::Minus,
			Token::Star,
			Token::Slash,
			Token::LParen,
			Token::RParen,
			Token::End
		]
	);
}

#[test]
fn whitespace_is_skipped() {
	assert_eq!(kinds("  1 d\t4 +\n2 "), kinds("1d4+2"));
}

#[test]
fn empty_input_is_only_end() {
	assert_eq!(
		tokenize("").unwrap(),
		[Spanned {
			token: Token::End,
			position: 0
		}]
	);
	assert_eq!(
		tokenize("   ").unwrap(),
		[Spanned {
			token: Token::End,
			position: 3
		}]
	);
}

#[test]
fn negative_numbers_lex_as_minus() {
	assert_eq!(kinds("-3"), [Token::Minus, Token::Number(3), Token::End]);
	assert_eq!(kinds("5-3")[1..], kinds("-3")[..]);
}

#[test]
fn maximal_digit_runs() {
	assert_eq!(kinds("007"), [Token::Number(7), Token::End]);
	assert_eq!(kinds("1234567"), [Token::Number(1_234_567), Token::End]);
}

#[test]
fn positions_are_byte_offsets() {
	let positions: Vec<_> = tokenize("10 + d8").unwrap().into_iter().map(|spanned| spanned.position).collect();
	assert_eq!(positions, [0, 3, 5, 6, 7]);
}

#[test]
fn unexpected_character() {
	assert_eq!(
		tokenize("3#4"),
		Err(LexError::UnexpectedChar {
			position: 1,
			found: '#'
		})
	);
	assert_eq!(
		tokenize("1d6 + x"),
		Err(LexError::UnexpectedChar {
			position: 6,
			found: 'x'
		})
	);
}

#[test]
fn unexpected_multibyte_character() {
	let err = tokenize("2 × 3").unwrap_err();
	assert_eq!(
		err,
		LexError::UnexpectedChar {
			position: 2,
			found: '×'
		}
	);
}

#[test]
fn number_too_large() {
	assert_eq!(tokenize("2147483647").unwrap()[0].token, Token::Number(i32::MAX));
	assert_eq!(tokenize("1 + 2147483648"), Err(LexError::NumberTooLarge { position: 4 }));
	assert_eq!(tokenize("99999999999"), Err(LexError::NumberTooLarge { position: 0 }));
}

#[test]
fn number_too_large_before_more_tokens() {
	assert_eq!(tokenize("1d6 + 99999999999 + 2"), Err(LexError::NumberTooLarge { position: 6 }));
	assert_eq!(tokenize("(99999999999)d6"), Err(LexError::NumberTooLarge { position: 1 }));
	assert_eq!(
		tokenize("2d6 + 99999999999 + 88888888888"),
		Err(LexError::NumberTooLarge { position: 6 })
	);
}

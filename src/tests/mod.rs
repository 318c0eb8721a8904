mod lex;
mod parse;

use crate::{lexer::prelude::{LexicalError, Token}, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    NoPrefixFunction {
        token: Token,
    },
    UnexpectedToken {
        token: Token,
        expected: String,
    },
    UnexpectedEof,
    LexError {
        error: LexicalError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    pub fn details(&self) -> (String, Vec<String>) {
        match &self.error {
            ParseErrorType::NoPrefixFunction { token } => {
                (format!("no parse prefix function for `{}` found", token.as_literal()), vec![])
            },
            ParseErrorType::UnexpectedToken { token, expected } => {
                let got = match token {
                    Token::Int(_) => "an Int".to_string(),
                    Token::Float(_) => "a Float".to_string(),
                    Token::String(_) => "a String".to_string(),
                    Token::Ident(_) => "an Identifier".to_string(),
                    _ if token.is_keyword() => format!("the keyword `{}`", token.as_literal()),
                    _ => format!("`{}`", token.as_literal())
                };

                (format!("expected next item to be `{expected}`, got {got} instead"), vec![])
            },
            ParseErrorType::UnexpectedEof => {
                ("unexpected end of file".to_string(), vec![])
            },
            ParseErrorType::LexError { error } => error.details()
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (message, extra) = self.details();

        write!(f, "{message}")?;

        for line in extra {
            write!(f, "\n{line}")?;
        }

        Ok(())
    }
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}

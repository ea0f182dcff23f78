use crate::{lexer::prelude::{LexResult, Lexer, Spanned, Token}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType, parse_error};
use super::ast::{Block, Expression};

pub trait Parse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Option<Spanned>,
    pub next_token: Option<Spanned>,
    pub comments: Vec<SrcSpan>,
    pub errors: Vec<ParseError>,

    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: None,
            next_token: None,
            comments: vec![],
            errors: vec![],

            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    /// Parses the whole token stream into a program block. Parse errors do
    /// not stop the parser; they accumulate in `self.errors` and parsing
    /// resumes at the next statement boundary.
    pub fn parse(&mut self) -> Block {
        Block::parse_program(self)
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    pub fn next_token(&mut self) -> Option<Spanned> {
        let t = self.current_token.take();
        let mut next = None;

        loop {
            match self.tokens.next() {
                Some(Ok((start, Token::Comment, end))) => {
                    self.comments.push(SrcSpan { start, end })
                },
                Some(Err(err)) => {
                    self.errors.push(ParseError {
                        error: ParseErrorType::LexError { error: err },
                        span: err.location
                    });
                },
                Some(Ok(tok)) => {
                    next = Some(tok);

                    break;
                },
                None => {
                    break;
                }
            }
        }

        self.current_token = self.next_token.take();
        self.next_token = next.take();

        t
    }

    /// Skips forward to the next statement boundary after a parse error.
    pub fn synchronize(&mut self) {
        loop {
            match &self.current_token {
                None | Some((_, Token::Eof, _)) => return,
                Some((_, Token::Semicolon, _)) => {
                    self.step();
                    return;
                },
                Some(_) => self.step()
            }
        }
    }

    pub fn current_precedence(&self) -> Precedence {
        match &self.current_token {
            Some((_, token, _)) => Precedence::from(token),
            None => Precedence::Lowest
        }
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        match self.current_token.take() {
            Some((start, tok, end)) if tok == token => {
                self.step();
                Ok((start, end))
            },
            Some(t) => {
                let (start, tok, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: tok,
                        expected: token.as_literal(),
                    },
                    SrcSpan { start, end }
                )
            },
            None => {
                parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                )
            }
        }
    }

    pub fn expect_ident(&mut self) -> Result<(u32, String, u32), ParseError> {
        match self.current_token.take() {
            Some((start, Token::Ident(value), end)) => {
                self.step();
                Ok((start, value, end))
            },
            Some(t) => {
                let (start, tok, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: tok,
                        expected: "an identifier".into(),
                    },
                    SrcSpan { start, end }
                )
            },
            None => {
                parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                )
            }
        }
    }

    /// Parses a comma separated expression list up to (and including) the
    /// closing `end` token. The opening token must already be consumed.
    pub fn parse_expression_list(
        &mut self,
        end: Token
    ) -> Result<(Vec<Expression>, u32), ParseError> {
        if matches!(&self.current_token, Some((_, tok, _)) if *tok == end) {
            let (_, end_pos) = self.expect_one(end)?;
            return Ok((vec![], end_pos));
        }

        let mut items = vec![Expression::parse(self, None)?];

        while matches!(&self.current_token, Some((_, Token::Comma, _))) {
            self.step();
            items.push(Expression::parse(self, None)?);
        }

        let (_, end_pos) = self.expect_one(end)?;

        Ok((items, end_pos))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Assign,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index
}

impl From<&Token> for Precedence {
    fn from(value: &Token) -> Self {
        match value {
            Token::Assign | Token::PlusAssign | Token::MinusAssign |
            Token::AsteriskAssign | Token::SlashAssign => Self::Assign,
            Token::Equal | Token::NotEqual => Self::Equals,
            Token::LessThan | Token::GreaterThan |
            Token::LessThanOrEqual | Token::GreaterThanOrEqual => Self::LessGreater,
            Token::Plus | Token::Minus | Token::Or => Self::Sum,
            Token::Asterisk | Token::Slash | Token::Power | Token::And => Self::Product,
            Token::LParen => Self::Call,
            Token::LBracket => Self::Index,
            _ => Self::Lowest,
        }
    }
}

/// Parses a source string into a program block and the list of parse errors
/// encountered along the way. The block is best effort: statements that
/// failed to parse are left out. Callers should refuse to evaluate when the
/// error list is not empty.
pub fn parse(src: &str) -> (Block, Vec<ParseError>) {
    let lexer = Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)));
    let mut parser = Parser::new(lexer);
    let program = parser.parse();

    (program, parser.errors)
}

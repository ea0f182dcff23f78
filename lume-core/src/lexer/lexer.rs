use super::error::{LexicalError, LexicalErrorType};
use super::token::Token;
use crate::utils::prelude::SrcSpan;

pub type Spanned = (u32, Token, u32);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

pub fn str_to_keyword(word: &str) -> Option<Token> {
    Some(match word {
        "fn" => Token::Function,
        "if" => Token::If,
        "else" => Token::Else,
        "return" => Token::Return,
        "true" => Token::True,
        "false" => Token::False,
        _ => return None
    })
}

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
    position: u32,
    next_position: u32,
    ch: Option<char>,
    next_ch: Option<char>,
    input: T,
    eof_emitted: bool,
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
    pub fn new(input: T) -> Self {
        let mut lexer = Self {
            position: 0,
            next_position: 0,
            ch: None,
            next_ch: None,
            input,
            eof_emitted: false,
        };

        lexer.next_char();
        lexer.next_char();

        lexer
    }

    pub fn next_token(&mut self) -> LexResult {
        while matches!(self.ch, Some(c) if c.is_ascii_whitespace()) {
            self.next_char();
        }

        let span = match self.ch {
            Some(ch) => match ch {
                '(' => self.eat_one_char(Token::LParen),
                ')' => self.eat_one_char(Token::RParen),
                '{' => self.eat_one_char(Token::LBrace),
                '}' => self.eat_one_char(Token::RBrace),
                '[' => self.eat_one_char(Token::LBracket),
                ']' => self.eat_one_char(Token::RBracket),
                ',' => self.eat_one_char(Token::Comma),
                ';' => self.eat_one_char(Token::Semicolon),
                '=' => match self.next_ch {
                    Some('=') => self.eat_two_chars(Token::Equal),
                    _ => self.eat_one_char(Token::Assign)
                },
                '!' => match self.next_ch {
                    Some('=') => self.eat_two_chars(Token::NotEqual),
                    _ => self.eat_one_char(Token::Bang)
                },
                '<' => match self.next_ch {
                    Some('=') => self.eat_two_chars(Token::LessThanOrEqual),
                    _ => self.eat_one_char(Token::LessThan)
                },
                '>' => match self.next_ch {
                    Some('=') => self.eat_two_chars(Token::GreaterThanOrEqual),
                    _ => self.eat_one_char(Token::GreaterThan)
                },
                '+' => match self.next_ch {
                    Some('=') => self.eat_two_chars(Token::PlusAssign),
                    _ => self.eat_one_char(Token::Plus)
                },
                '-' => match self.next_ch {
                    Some('=') => self.eat_two_chars(Token::MinusAssign),
                    _ => self.eat_one_char(Token::Minus)
                },
                '*' => match self.next_ch {
                    Some('*') => self.eat_two_chars(Token::Power),
                    Some('=') => self.eat_two_chars(Token::AsteriskAssign),
                    _ => self.eat_one_char(Token::Asterisk)
                },
                '/' => match self.next_ch {
                    Some('/') => return Ok(self.lex_comment()),
                    Some('=') => self.eat_two_chars(Token::SlashAssign),
                    _ => self.eat_one_char(Token::Slash)
                },
                '&' => match self.next_ch {
                    Some('&') => self.eat_two_chars(Token::And),
                    _ => return self.eat_error(LexicalErrorType::LoneAmpersand)
                },
                '|' => match self.next_ch {
                    Some('|') => self.eat_two_chars(Token::Or),
                    _ => return self.eat_error(LexicalErrorType::LonePipe)
                },
                '"' => return self.lex_string(),
                'a'..='z' | 'A'..='Z' | '_' => return Ok(self.lex_ident()),
                '0'..='9' => return self.lex_number(),
                _ => return self.eat_error(LexicalErrorType::UnrecognizedToken { tok: ch })
            },
            None => self.eat_one_char(Token::Eof)
        };

        Ok(span)
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.ch;

        self.ch = self.next_ch;
        self.position = self.next_position;

        match self.input.next() {
            Some((pos, next)) => {
                self.next_ch = Some(next);
                self.next_position = pos;
            },
            None => {
                self.next_ch = None;
                self.next_position = self.position
                    + self.ch.map_or(0, |c| c.len_utf8() as u32);
            }
        }

        ch
    }

    fn eat_one_char(&mut self, token: Token) -> Spanned {
        let start = self.position;
        self.next_char();
        let end = self.position;

        (start, token, end)
    }

    fn eat_two_chars(&mut self, token: Token) -> Spanned {
        let start = self.position;
        self.next_char();
        self.next_char();
        let end = self.position;

        (start, token, end)
    }

    fn eat_error(&mut self, error: LexicalErrorType) -> LexResult {
        let start = self.position;
        self.next_char();
        let end = self.position;

        Err(LexicalError {
            error,
            location: SrcSpan { start, end }
        })
    }

    fn lex_ident(&mut self) -> Spanned {
        let start = self.position;
        let mut ident = String::new();

        while let Some(ch) = self.ch {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(self.next_char().unwrap());
            } else {
                break;
            }
        }

        let end = self.position;

        match str_to_keyword(&ident) {
            Some(token) => (start, token, end),
            None => (start, Token::Ident(ident), end)
        }
    }

    fn lex_number(&mut self) -> LexResult {
        let start = self.position;

        if self.ch == Some('0') && matches!(self.next_ch, Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')) {
            return self.lex_radix_number(start);
        }

        let mut value = String::new();
        let mut is_float = false;

        while let Some(ch) = self.ch {
            match ch {
                '0'..='9' => value.push(self.next_char().unwrap()),
                '.' if matches!(self.next_ch, Some('0'..='9')) => {
                    if is_float {
                        self.next_char();
                        return Err(LexicalError {
                            error: LexicalErrorType::MultipleFloatingPoints,
                            location: SrcSpan::from(start, self.position)
                        });
                    }

                    is_float = true;
                    value.push(self.next_char().unwrap());
                },
                'e' | 'E' => {
                    is_float = true;
                    value.push(self.next_char().unwrap());

                    if matches!(self.ch, Some('+' | '-')) {
                        value.push(self.next_char().unwrap());
                    }

                    if !matches!(self.ch, Some('0'..='9')) {
                        return Err(LexicalError {
                            error: LexicalErrorType::MissingDigitsAfterExponent,
                            location: SrcSpan::from(start, self.position)
                        });
                    }
                },
                _ => break
            }
        }

        let end = self.position;

        let token = if is_float {
            match value.parse::<f64>() {
                Ok(value) => Token::Float(value),
                Err(_) => return Err(LexicalError {
                    error: LexicalErrorType::DigitOutOfRadix,
                    location: SrcSpan::from(start, end)
                })
            }
        } else {
            match value.parse::<i64>() {
                Ok(value) => Token::Int(value),
                Err(_) => return Err(LexicalError {
                    error: LexicalErrorType::IntegerOverflow,
                    location: SrcSpan::from(start, end)
                })
            }
        };

        Ok((start, token, end))
    }

    fn lex_radix_number(&mut self, start: u32) -> LexResult {
        self.next_char();
        let radix = match self.next_char() {
            Some('x' | 'X') => 16,
            Some('o' | 'O') => 8,
            _ => 2,
        };

        let mut value = String::new();

        while let Some(ch) = self.ch {
            if ch.is_ascii_alphanumeric() {
                value.push(self.next_char().unwrap());
            } else {
                break;
            }
        }

        let end = self.position;

        match i64::from_str_radix(&value, radix) {
            Ok(value) => Ok((start, Token::Int(value), end)),
            Err(err) => Err(LexicalError {
                error: match err.kind() {
                    std::num::IntErrorKind::PosOverflow => LexicalErrorType::IntegerOverflow,
                    _ => LexicalErrorType::DigitOutOfRadix
                },
                location: SrcSpan::from(start, end)
            })
        }
    }

    fn lex_string(&mut self) -> LexResult {
        let start = self.position;
        self.next_char();

        let mut value = String::new();

        loop {
            match self.ch {
                Some('"') => {
                    self.next_char();
                    break;
                },
                Some('\\') => {
                    let escape_start = self.position;
                    self.next_char();

                    match self.ch {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        Some(escape) => {
                            self.next_char();
                            return Err(LexicalError {
                                error: LexicalErrorType::UnknownEscapeCharacter { escape },
                                location: SrcSpan::from(escape_start, self.position)
                            });
                        },
                        None => return Err(LexicalError {
                            error: LexicalErrorType::UnterminatedString,
                            location: SrcSpan::from(start, self.position)
                        })
                    }

                    self.next_char();
                },
                Some(_) => value.push(self.next_char().unwrap()),
                None => return Err(LexicalError {
                    error: LexicalErrorType::UnterminatedString,
                    location: SrcSpan::from(start, self.position)
                })
            }
        }

        let end = self.position;

        Ok((start, Token::String(value), end))
    }

    fn lex_comment(&mut self) -> Spanned {
        let start = self.position;

        while !matches!(self.ch, Some('\n') | None) {
            self.next_char();
        }

        let end = self.position;

        (start, Token::Comment, end)
    }
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
    type Item = LexResult;

    // Yields the Eof token exactly once, then fuses.
    fn next(&mut self) -> Option<Self::Item> {
        if self.eof_emitted {
            return None;
        }

        let token = self.next_token();

        if matches!(token, Ok((_, Token::Eof, _))) {
            self.eof_emitted = true;
        }

        Some(token)
    }
}

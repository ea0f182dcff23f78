use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedToken { tok: char },
    DigitOutOfRadix,
    IntegerOverflow,
    MultipleFloatingPoints,
    MissingDigitsAfterExponent,
    UnterminatedString,
    UnknownEscapeCharacter { escape: char },
    LoneAmpersand,
    LonePipe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan
}

impl LexicalError {
    pub fn details(&self) -> (String, Vec<String>) {
        match self.error {
            LexicalErrorType::UnrecognizedToken { tok } => {
                (format!("Unrecognized character `{tok}`"), vec![])
            },
            LexicalErrorType::DigitOutOfRadix => {
                ("Digit is not valid in this radix".to_string(), vec![])
            },
            LexicalErrorType::IntegerOverflow => {
                ("Integer literal does not fit in 64 bits".to_string(), vec![])
            },
            LexicalErrorType::MultipleFloatingPoints => {
                ("Number has more than one floating point".to_string(), vec![])
            },
            LexicalErrorType::MissingDigitsAfterExponent => {
                ("Missing digits after exponent".to_string(), vec![])
            },
            LexicalErrorType::UnterminatedString => {
                ("String is missing its closing `\"`".to_string(), vec![])
            },
            LexicalErrorType::UnknownEscapeCharacter { escape } => {
                (format!("Unknown escape character `\\{escape}`"), vec![])
            },
            LexicalErrorType::LoneAmpersand => {
                ("Found a single `&`".to_string(), vec!["Logical and is spelled `&&`.".to_string()])
            },
            LexicalErrorType::LonePipe => {
                ("Found a single `|`".to_string(), vec!["Logical or is spelled `||`.".to_string()])
            },
        }
    }
}

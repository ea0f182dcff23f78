use std::fmt::Display;
use std::rc::Rc;

use crate::{
    lexer::prelude::{LexResult, Token},
    parser::prelude::{parse_error, InfixParse, Parse, ParseError, ParseErrorType, Parser, Precedence},
    utils::prelude::SrcSpan
};

// block -> { <statement> {; <statement>} }
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl Block {
    /// Parses statements up to the end of the token stream. Used for the
    /// program root; braced blocks go through the `Parse` impl instead.
    pub fn parse_program<T: Iterator<Item = LexResult>>(parser: &mut Parser<T>) -> Self {
        let start = match &parser.current_token {
            Some((start, _, _)) => *start,
            None => 0
        };
        let mut end = start;
        let mut statements = vec![];

        loop {
            match &parser.current_token {
                None | Some((_, Token::Eof, _)) => break,
                Some(_) => match Statement::parse(parser, None) {
                    Ok(statement) => {
                        end = statement.location().end;
                        statements.push(statement);
                    },
                    Err(error) => {
                        parser.errors.push(error);
                        parser.synchronize();
                    }
                }
            }
        }

        Self {
            statements,
            location: SrcSpan { start, end }
        }
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Block {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::LBrace)?;

        let mut statements = vec![];

        loop {
            match &parser.current_token {
                Some((_, Token::RBrace, _)) => break,
                None | Some((_, Token::Eof, _)) => return parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start, end: start + 1 }
                ),
                Some(_) => statements.push(Statement::parse(parser, None)?)
            }
        }

        let (_, end) = parser.expect_one(Token::RBrace)?;

        Ok(Self {
            statements,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}", statements.join("; "))
    }
}

// statement -> <return> | <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(Expression),
    Return(Return),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Statement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let statement = match &parser.current_token {
            Some((_, Token::Return, _)) => Self::Return(Return::parse(parser, None)?),
            Some(_) => {
                let expression = Expression::parse(parser, None)?;

                if matches!(parser.current_token, Some((_, Token::Semicolon, _))) {
                    parser.step();
                }

                Self::Expression(expression)
            },
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        Ok(statement)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expression(expression) => write!(f, "{expression}"),
            Self::Return(ret) => write!(f, "{ret}")
        }
    }
}

impl Statement {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Expression(expression) => expression.location(),
            Self::Return(ret) => ret.location
        }
    }
}

// return -> return <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Return {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Return)?;

        let value = Expression::parse(parser, None)?;
        let end = value.location().end;

        if matches!(parser.current_token, Some((_, Token::Semicolon, _))) {
            parser.step();
        }

        Ok(Self {
            value: Box::new(value),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Return {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "return {}", self.value)
    }
}

// expression -> <identifier> | <primitive> | <prefix> | <infix> | <assignment>
//             | <if> | <function> | <call> | <list> | <index> | ( <expression> )
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Primitive(Primitive),
    Prefix(Prefix),
    Infix(Infix),
    Assignment(Assignment),
    If(If),
    Function(Function),
    Call(Call),
    List(List),
    Index(Index),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Expression {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let mut expression = match &parser.current_token {
            Some((start, token, end)) => match token {
                Token::Ident(_) => {
                    let ident = parser.expect_ident()?;

                    Self::Identifier(Identifier::from(ident))
                },
                Token::Int(_)
                | Token::Float(_)
                | Token::String(_)
                | Token::True
                | Token::False => Self::Primitive(Primitive::parse(parser, None)?),
                Token::Minus | Token::Bang => Self::Prefix(Prefix::parse(parser, None)?),
                Token::LParen => {
                    parser.expect_one(Token::LParen)?;

                    let expression = Expression::parse(parser, None)?;

                    parser.expect_one(Token::RParen)?;

                    expression
                },
                Token::If => Self::If(If::parse(parser, None)?),
                Token::Function => Self::Function(Function::parse(parser, None)?),
                Token::LBracket => Self::List(List::parse(parser, None)?),
                token => return parse_error(
                    ParseErrorType::NoPrefixFunction { token: token.clone() },
                    SrcSpan { start: *start, end: *end }
                )
            },
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        let min_precedence = precedence.unwrap_or(Precedence::Lowest);

        while !matches!(parser.current_token, Some((_, Token::Semicolon, _)))
            && min_precedence < parser.current_precedence()
        {
            expression = match &parser.current_token {
                Some((_, token, _)) => match token {
                    token if token.is_assignment() => {
                        Self::Assignment(Assignment::parse(parser, expression, precedence)?)
                    },
                    Token::Plus | Token::Minus | Token::Asterisk | Token::Slash |
                    Token::Equal | Token::NotEqual |
                    Token::LessThan | Token::GreaterThan |
                    Token::LessThanOrEqual | Token::GreaterThanOrEqual |
                    Token::And | Token::Or => {
                        Self::Infix(Infix::parse(parser, expression, precedence)?)
                    },
                    Token::LParen => Self::Call(Call::parse(parser, expression, precedence)?),
                    Token::LBracket => Self::Index(Index::parse(parser, expression, precedence)?),
                    // Power has a precedence entry but no infix parser; the
                    // stray token is reported by the next prefix dispatch.
                    _ => break
                },
                None => break
            };
        }

        Ok(expression)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(identifier) => write!(f, "{identifier}"),
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Prefix(prefix) => write!(f, "{prefix}"),
            Self::Infix(infix) => write!(f, "{infix}"),
            Self::Assignment(assignment) => write!(f, "{assignment}"),
            Self::If(conditional) => write!(f, "{conditional}"),
            Self::Function(function) => write!(f, "{function}"),
            Self::Call(call) => write!(f, "{call}"),
            Self::List(list) => write!(f, "{list}"),
            Self::Index(index) => write!(f, "{index}")
        }
    }
}

impl Expression {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Identifier(identifier) => identifier.location,
            Self::Primitive(primitive) => primitive.location(),
            Self::Prefix(prefix) => prefix.location,
            Self::Infix(infix) => infix.location,
            Self::Assignment(assignment) => assignment.location,
            Self::If(conditional) => conditional.location,
            Self::Function(function) => function.location,
            Self::Call(call) => call.location,
            Self::List(list) => list.location,
            Self::Index(index) => index.location
        }
    }
}

// identifier -> <letter | _> { <letter> | <digit> | _ }
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<(u32, String, u32)> for Identifier {
    fn from(value: (u32, String, u32)) -> Self {
        Identifier {
            value: value.1,
            location: SrcSpan { start: value.0, end: value.2 }
        }
    }
}

// primitive -> <int> | <float> | <string> | <bool>
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Int {
        value: i64,
        location: SrcSpan
    },
    Float {
        value: f64,
        location: SrcSpan
    },
    String {
        value: String,
        location: SrcSpan
    },
    Bool {
        value: bool,
        location: SrcSpan
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Primitive {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        match parser.next_token() {
            Some((start, token, end)) => {
                let location = SrcSpan { start, end };

                match token {
                    Token::Int(value) => Ok(Self::Int { value, location }),
                    Token::Float(value) => Ok(Self::Float { value, location }),
                    Token::String(value) => Ok(Self::String { value, location }),
                    Token::True => Ok(Self::Bool { value: true, location }),
                    Token::False => Ok(Self::Bool { value: false, location }),
                    token => parse_error(
                        ParseErrorType::NoPrefixFunction { token },
                        location
                    )
                }
            },
            None => parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int { value, .. } => write!(f, "{value}"),
            Self::Float { value, .. } => write!(f, "{value:?}"),
            Self::String { value, .. } => write!(f, "\"{}\"", escape_string(value)),
            Self::Bool { value, .. } => write!(f, "{value}")
        }
    }
}

impl Primitive {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Int { location, .. } |
            Self::Float { location, .. } |
            Self::String { location, .. } |
            Self::Bool { location, .. } => *location
        }
    }
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            _ => escaped.push(ch)
        }
    }

    escaped
}

// prefix -> (- | !) <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
    pub operator: Token,
    pub operand: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Prefix {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, operator, _) = match parser.next_token() {
            Some(token) => token,
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        let operand = Expression::parse(parser, Some(Precedence::Prefix))?;
        let end = operand.location().end;

        Ok(Self {
            operator,
            operand: Box::new(operand),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}{})", self.operator.as_literal(), self.operand)
    }
}

// infix -> <expression> <operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Infix {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Infix {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = parser.current_precedence();
        let start = left.location().start;

        let operator = match parser.next_token() {
            Some((_, token, _)) if token.is_operator() => token,
            Some((start, token, end)) => return parse_error(
                ParseErrorType::UnexpectedToken {
                    token,
                    expected: "an operator".into(),
                },
                SrcSpan { start, end }
            ),
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        // Same precedence for the right operand keeps every operator left
        // associative.
        let right = Expression::parse(parser, Some(precedence))?;
        let end = right.location().end;

        Ok(Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Infix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator.as_literal(), self.right)
    }
}

// assignment -> <expression> (= | += | -= | *= | /=) <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Box<Expression>,
    pub operator: Token,
    pub value: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Assignment {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = parser.current_precedence();
        let start = left.location().start;

        let operator = match parser.next_token() {
            Some((_, token, _)) if token.is_assignment() => token,
            Some((start, token, end)) => return parse_error(
                ParseErrorType::UnexpectedToken {
                    token,
                    expected: "an assignment operator".into(),
                },
                SrcSpan { start, end }
            ),
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        let value = Expression::parse(parser, Some(precedence))?;
        let end = value.location().end;

        Ok(Self {
            target: Box::new(left),
            operator,
            value: Box::new(value),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.target, self.operator.as_literal(), self.value)
    }
}

// if -> if <expression> <block> [else (<if> | <block>)]
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Box<Expression>,
    pub consequence: Block,
    pub alternative: Option<Alternative>,
    pub location: SrcSpan
}

#[derive(Debug, Clone, PartialEq)]
pub enum Alternative {
    Block(Block),
    If(Box<If>),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for If {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::If)?;

        let condition = Expression::parse(parser, None)?;
        let consequence = Block::parse(parser, None)?;

        let mut end = consequence.location.end;

        let alternative = match &parser.current_token {
            Some((_, Token::Else, _)) => {
                parser.step();

                match &parser.current_token {
                    Some((_, Token::If, _)) => {
                        let nested = If::parse(parser, None)?;
                        end = nested.location.end;

                        Some(Alternative::If(Box::new(nested)))
                    },
                    _ => {
                        let block = Block::parse(parser, None)?;
                        end = block.location.end;

                        Some(Alternative::Block(block))
                    }
                }
            },
            _ => None
        };

        Ok(Self {
            condition: Box::new(condition),
            consequence,
            alternative,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for If {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if {} {{ {} }}", self.condition, self.consequence)?;

        match &self.alternative {
            Some(Alternative::If(nested)) => write!(f, " else {nested}"),
            Some(Alternative::Block(block)) => write!(f, " else {{ {block} }}"),
            None => Ok(())
        }
    }
}

// function -> fn ( [<identifier> {, <identifier>}] ) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub params: Vec<Identifier>,
    pub body: Rc<Block>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Function {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Function)?;

        parser.expect_one(Token::LParen)?;

        let params = Self::parse_params(parser)?;

        let body = Block::parse(parser, None)?;
        let end = body.location.end;

        Ok(Self {
            params,
            body: Rc::new(body),
            location: SrcSpan { start, end }
        })
    }
}

impl Function {
    fn parse_params<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>
    ) -> Result<Vec<Identifier>, ParseError> {
        if matches!(parser.current_token, Some((_, Token::RParen, _))) {
            parser.step();
            return Ok(vec![]);
        }

        let mut params = vec![Identifier::from(parser.expect_ident()?)];

        while matches!(parser.current_token, Some((_, Token::Comma, _))) {
            parser.step();
            params.push(Identifier::from(parser.expect_ident()?));
        }

        parser.expect_one(Token::RParen)?;

        Ok(params)
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.params.iter()
            .map(|param| param.to_string())
            .collect::<Vec<String>>();

        write!(f, "fn({}) {{ {} }}", params.join(", "), self.body)
    }
}

// call -> <expression> ( [<expression> {, <expression>}] )
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Call {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let start = left.location().start;

        parser.expect_one(Token::LParen)?;

        let (arguments, end) = parser.parse_expression_list(Token::RParen)?;

        Ok(Self {
            function: Box::new(left),
            arguments,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arguments = self.arguments.iter()
            .map(|argument| argument.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}({})", self.function, arguments.join(", "))
    }
}

// list -> [ [<expression> {, <expression>}] ]
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub elements: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for List {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::LBracket)?;

        let (elements, end) = parser.parse_expression_list(Token::RBracket)?;

        Ok(Self {
            elements,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let elements = self.elements.iter()
            .map(|element| element.to_string())
            .collect::<Vec<String>>();

        write!(f, "[{}]", elements.join(", "))
    }
}

// index -> <expression> [ <expression> ]
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub container: Box<Expression>,
    pub index: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Index {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let start = left.location().start;

        parser.expect_one(Token::LBracket)?;

        let index = Expression::parse(parser, None)?;

        let (_, end) = parser.expect_one(Token::RBracket)?;

        Ok(Self {
            container: Box::new(left),
            index: Box::new(index),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}[{}])", self.container, self.index)
    }
}

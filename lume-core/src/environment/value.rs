use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use crate::parser::prelude::{Block, Identifier};

use super::environment::Environment;

pub const TRUE: Value = Value::Boolean { value: true };
pub const FALSE: Value = Value::Boolean { value: false };
pub const NULL: Value = Value::Null;

#[derive(Debug, Clone)]
pub enum Value {
    Integer {
        value: i64
    },
    Float {
        value: f64,
    },
    String {
        value: String,
    },
    Boolean {
        value: bool
    },
    Null,
    List {
        elements: Rc<RefCell<Vec<Value>>>
    },
    Function {
        params: Vec<String>,
        body: Rc<Block>,
        env: Rc<RefCell<Environment>>
    },
    Builtin {
        name: &'static str,
        func: fn(Vec<Value>) -> Value
    },
    ReturnValue {
        value: Box<Value>
    },
    Error {
        message: String
    },
}

impl Value {
    pub fn function(
        params: &[Identifier],
        body: Rc<Block>,
        env: Rc<RefCell<Environment>>
    ) -> Self {
        Self::Function {
            params: params.iter().map(|param| param.value.clone()).collect(),
            body,
            env
        }
    }

    pub fn list(elements: Vec<Value>) -> Self {
        Self::List { elements: Rc::new(RefCell::new(elements)) }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }

    pub fn kind(&self) -> ValueType {
        match self {
            Self::Integer { .. } => ValueType::Integer,
            Self::Float { .. } => ValueType::Float,
            Self::String { .. } => ValueType::String,
            Self::Boolean { .. } => ValueType::Boolean,
            Self::Null => ValueType::Null,
            Self::List { .. } => ValueType::List,
            Self::Function { .. } => ValueType::Function,
            Self::Builtin { .. } => ValueType::Builtin,
            Self::ReturnValue { .. } => ValueType::ReturnValue,
            Self::Error { .. } => ValueType::Error
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Every value is truthy except `false` and `null`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean { value: false } | Self::Null)
    }
}

// Equality is structural; functions compare by identity of their body and
// environments never take part, so value comparison cannot loop through a
// closure capture cycle.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer { value: left }, Self::Integer { value: right }) => left == right,
            (Self::Float { value: left }, Self::Float { value: right }) => left == right,
            (Self::String { value: left }, Self::String { value: right }) => left == right,
            (Self::Boolean { value: left }, Self::Boolean { value: right }) => left == right,
            (Self::Null, Self::Null) => true,
            (Self::List { elements: left }, Self::List { elements: right }) => {
                Rc::ptr_eq(left, right) || *left.borrow() == *right.borrow()
            },
            (Self::Function { body: left, .. }, Self::Function { body: right, .. }) => {
                Rc::ptr_eq(left, right)
            },
            (Self::Builtin { func: left, .. }, Self::Builtin { func: right, .. }) => {
                left == right
            },
            (Self::ReturnValue { value: left }, Self::ReturnValue { value: right }) => {
                left == right
            },
            (Self::Error { message: left }, Self::Error { message: right }) => left == right,
            _ => false
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer { value } => write!(f, "{value}"),
            Value::Float { value } => write!(f, "{value:?}"),
            Value::String { value } => write!(f, "{value}"),
            Value::Boolean { value } => write!(f, "{value}"),
            Value::Null => write!(f, "null"),
            Value::List { elements } => {
                let elements = elements.borrow().iter()
                    .map(|element| element.to_string())
                    .collect::<Vec<String>>();

                write!(f, "[{}]", elements.join(", "))
            },
            Value::Function { params, body, .. } => {
                write!(f, "fn({}) {{ {} }}", params.join(", "), body)
            },
            Value::Builtin { name, .. } => write!(f, "builtin function {name}"),
            Value::ReturnValue { value } => write!(f, "{value}"),
            Value::Error { message } => write!(f, "error: {message}")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Float,
    String,
    Boolean,
    Null,
    List,
    Function,
    Builtin,
    ReturnValue,
    Error
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Integer => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Boolean => "bool",
            Self::Null => "null",
            Self::List => "list",
            Self::Function => "fn",
            Self::Builtin => "builtin",
            Self::ReturnValue => "return",
            Self::Error => "error"
        };

        write!(f, "{name}")
    }
}

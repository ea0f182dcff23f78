#[cfg(test)]
mod tests;

pub mod builtins;

use std::{cell::RefCell, rc::Rc};

use crate::{
    environment::prelude::{Environment, Value, FALSE, NULL, TRUE},
    lexer::prelude::Token,
    parser::prelude::{
        Alternative, Assignment, Block, Call, Expression, If, Index, Infix,
        Prefix, Primitive, Statement
    }
};

/// A fresh top level environment with the builtin functions bound.
pub fn new_root_env() -> Rc<RefCell<Environment>> {
    let mut env = Environment::new();

    for (name, func) in builtins::builtins() {
        env.set(name.to_string(), Value::Builtin { name, func });
    }

    Rc::new(RefCell::new(env))
}

/// Evaluates a block of statements in order and yields the value of the last
/// one. A `ReturnValue` or `Error` stops the block immediately and is
/// propagated as is; unwrapping happens at the call boundary only.
pub fn eval(block: &Block, env: Rc<RefCell<Environment>>) -> Value {
    let mut result = NULL;

    for statement in &block.statements {
        result = eval_statement(statement, env.clone());

        if matches!(result, Value::ReturnValue { .. } | Value::Error { .. }) {
            return result;
        }
    }

    result
}

fn eval_statement(statement: &Statement, env: Rc<RefCell<Environment>>) -> Value {
    match statement {
        Statement::Expression(expression) => eval_expression(expression, env),
        Statement::Return(ret) => {
            let value = eval_expression(&ret.value, env);

            if value.is_error() {
                return value;
            }

            Value::ReturnValue { value: Box::new(value) }
        }
    }
}

fn eval_expression(expression: &Expression, env: Rc<RefCell<Environment>>) -> Value {
    match expression {
        Expression::Identifier(ident) => {
            let value = env.borrow().get(&ident.value);

            value.unwrap_or_else(|| {
                Value::error(format!("identifier not found: {}", ident.value))
            })
        },
        Expression::Primitive(primitive) => match primitive {
            Primitive::Int { value, .. } => Value::Integer { value: *value },
            Primitive::Float { value, .. } => Value::Float { value: *value },
            Primitive::String { value, .. } => Value::String { value: value.clone() },
            Primitive::Bool { value, .. } => Value::Boolean { value: *value }
        },
        Expression::Prefix(prefix) => eval_prefix(prefix, env),
        Expression::Infix(infix) => eval_infix(infix, env),
        Expression::Assignment(assignment) => eval_assignment(assignment, env),
        Expression::If(conditional) => eval_if(conditional, env),
        Expression::Function(function) => {
            Value::function(&function.params, function.body.clone(), env)
        },
        Expression::Call(call) => eval_call(call, env),
        Expression::List(list) => {
            let mut elements = Vec::with_capacity(list.elements.len());

            for element in &list.elements {
                let value = eval_expression(element, env.clone());

                if value.is_error() {
                    return value;
                }

                elements.push(value);
            }

            Value::list(elements)
        },
        Expression::Index(index) => eval_index(index, env)
    }
}

fn eval_prefix(prefix: &Prefix, env: Rc<RefCell<Environment>>) -> Value {
    let operand = eval_expression(&prefix.operand, env);

    if operand.is_error() {
        return operand;
    }

    match &prefix.operator {
        Token::Minus => match operand {
            Value::Integer { value } => Value::Integer { value: value.wrapping_neg() },
            Value::Float { value } => Value::Float { value: -value },
            operand => Value::error(
                format!("unsupported operator '-' for type {}", operand.kind())
            )
        },
        Token::Bang => {
            if operand.is_truthy() { FALSE } else { TRUE }
        },
        operator => Value::error(
            format!("unknown unary operator '{}'", operator.as_literal())
        )
    }
}

fn eval_infix(infix: &Infix, env: Rc<RefCell<Environment>>) -> Value {
    match &infix.operator {
        // Boolean operators short circuit on a decisive boolean left operand
        // and never evaluate the right one in that case.
        Token::And => {
            let left = eval_expression(&infix.left, env.clone());

            if left.is_error() || left == FALSE {
                return left;
            }

            let right = eval_expression(&infix.right, env);

            if right.is_error() {
                return right;
            }

            Value::Boolean { value: left.is_truthy() && right.is_truthy() }
        },
        Token::Or => {
            let left = eval_expression(&infix.left, env.clone());

            if left.is_error() || left == TRUE {
                return left;
            }

            let right = eval_expression(&infix.right, env);

            if right.is_error() {
                return right;
            }

            Value::Boolean { value: left.is_truthy() || right.is_truthy() }
        },
        operator => {
            let left = eval_expression(&infix.left, env.clone());

            if left.is_error() {
                return left;
            }

            let right = eval_expression(&infix.right, env);

            if right.is_error() {
                return right;
            }

            apply_binary(operator, left, right)
        }
    }
}

/// The binary operator kernel shared by infix expressions and compound
/// assignments. Operands must already be plain values, never errors.
fn apply_binary(operator: &Token, left: Value, right: Value) -> Value {
    if left.kind() != right.kind() {
        return Value::error(format!(
            "invalid operation {left} {} {right} (mismatched types {} and {})",
            operator.as_literal(), left.kind(), right.kind()
        ));
    }

    match (left, right) {
        (
            Value::Integer { value: left },
            Value::Integer { value: right }
        ) => match operator {
            Token::Plus => Value::Integer { value: left.wrapping_add(right) },
            Token::Minus => Value::Integer { value: left.wrapping_sub(right) },
            Token::Asterisk => Value::Integer { value: left.wrapping_mul(right) },
            Token::Slash => {
                if right == 0 {
                    Value::error("division by zero")
                } else {
                    Value::Integer { value: left.wrapping_div(right) }
                }
            },
            Token::LessThan => Value::Boolean { value: left < right },
            Token::LessThanOrEqual => Value::Boolean { value: left <= right },
            Token::GreaterThan => Value::Boolean { value: left > right },
            Token::GreaterThanOrEqual => Value::Boolean { value: left >= right },
            Token::Equal => Value::Boolean { value: left == right },
            Token::NotEqual => Value::Boolean { value: left != right },
            operator => Value::error(
                format!("unsupported operator '{}' for type int", operator.as_literal())
            )
        },
        (
            Value::Float { value: left },
            Value::Float { value: right }
        ) => match operator {
            Token::Plus => Value::Float { value: left + right },
            Token::Minus => Value::Float { value: left - right },
            Token::Asterisk => Value::Float { value: left * right },
            // IEEE 754: float division by zero yields an infinity or NaN.
            Token::Slash => Value::Float { value: left / right },
            Token::LessThan => Value::Boolean { value: left < right },
            Token::LessThanOrEqual => Value::Boolean { value: left <= right },
            Token::GreaterThan => Value::Boolean { value: left > right },
            Token::GreaterThanOrEqual => Value::Boolean { value: left >= right },
            Token::Equal => Value::Boolean { value: left == right },
            Token::NotEqual => Value::Boolean { value: left != right },
            operator => Value::error(
                format!("unsupported operator '{}' for type float", operator.as_literal())
            )
        },
        (
            Value::String { value: left },
            Value::String { value: right }
        ) => match operator {
            Token::Plus => Value::String { value: format!("{left}{right}") },
            Token::Equal => Value::Boolean { value: left == right },
            Token::NotEqual => Value::Boolean { value: left != right },
            operator => Value::error(
                format!("unsupported operator '{}' for type string", operator.as_literal())
            )
        },
        // Equality is structural for every remaining kind; lists compare
        // element wise and functions by body identity.
        (left, right) => match operator {
            Token::Equal => Value::Boolean { value: left == right },
            Token::NotEqual => Value::Boolean { value: left != right },
            operator => Value::error(
                format!("unsupported operator '{}' for type {}", operator.as_literal(), left.kind())
            )
        }
    }
}

fn eval_if(conditional: &If, env: Rc<RefCell<Environment>>) -> Value {
    let condition = eval_expression(&conditional.condition, env.clone());

    if condition.is_error() {
        return condition;
    }

    if condition.is_truthy() {
        eval(&conditional.consequence, env)
    } else {
        match &conditional.alternative {
            Some(Alternative::Block(block)) => eval(block, env),
            Some(Alternative::If(nested)) => eval_if(nested, env),
            None => NULL
        }
    }
}

fn eval_call(call: &Call, env: Rc<RefCell<Environment>>) -> Value {
    let callee = eval_expression(&call.function, env.clone());

    if callee.is_error() {
        return callee;
    }

    let mut arguments = Vec::with_capacity(call.arguments.len());

    for argument in &call.arguments {
        let value = eval_expression(argument, env.clone());

        if value.is_error() {
            return value;
        }

        arguments.push(value);
    }

    match callee {
        Value::Function { params, body, env: captured } => {
            if params.len() != arguments.len() {
                return Value::error(format!(
                    "wrong number of arguments: expected {}, got {}",
                    params.len(), arguments.len()
                ));
            }

            let mut scope = Environment::enclosed(captured);

            for (param, argument) in params.into_iter().zip(arguments) {
                scope.set(param, argument);
            }

            match eval(&body, Rc::new(RefCell::new(scope))) {
                Value::ReturnValue { value } => *value,
                result => result
            }
        },
        Value::Builtin { func, .. } => func(arguments),
        callee => Value::error(format!("not a function: {}", callee.kind()))
    }
}

fn eval_index(index: &Index, env: Rc<RefCell<Environment>>) -> Value {
    let container = eval_expression(&index.container, env.clone());

    if container.is_error() {
        return container;
    }

    let idx = eval_expression(&index.index, env);

    if idx.is_error() {
        return idx;
    }

    match (container, idx) {
        (Value::List { elements }, Value::Integer { value }) => {
            let elements = elements.borrow();

            match usize::try_from(value).ok().and_then(|idx| elements.get(idx)) {
                Some(element) => element.clone(),
                None => Value::error("index out of range")
            }
        },
        (Value::String { value }, Value::Integer { value: idx }) => {
            match usize::try_from(idx).ok().and_then(|idx| value.chars().nth(idx)) {
                Some(ch) => Value::String { value: ch.to_string() },
                None => Value::error("index out of range")
            }
        },
        (container, idx) => Value::error(format!(
            "unsupported operator '[]' for types {} and {}",
            container.kind(), idx.kind()
        ))
    }
}

fn eval_assignment(assignment: &Assignment, env: Rc<RefCell<Environment>>) -> Value {
    let value = eval_expression(&assignment.value, env.clone());

    if value.is_error() {
        return value;
    }

    match assignment.target.as_ref() {
        Expression::Identifier(ident) => {
            let value = match compound_operator(&assignment.operator) {
                Some(operator) => {
                    let current = match env.borrow().get(&ident.value) {
                        Some(current) => current,
                        None => return Value::error(
                            format!("identifier not found: {}", ident.value)
                        )
                    };

                    let combined = apply_binary(&operator, current, value);

                    if combined.is_error() {
                        return combined;
                    }

                    combined
                },
                None => value
            };

            let mut scope = env.borrow_mut();

            // Mutate the nearest existing binding, or bind in the innermost
            // scope when the name is new.
            if !scope.assign(&ident.value, value.clone()) {
                scope.set(ident.value.clone(), value.clone());
            }

            value
        },
        Expression::Index(target) => {
            let container = eval_expression(&target.container, env.clone());

            if container.is_error() {
                return container;
            }

            let idx = eval_expression(&target.index, env);

            if idx.is_error() {
                return idx;
            }

            match (container, idx) {
                (Value::List { elements }, Value::Integer { value: idx }) => {
                    let mut elements = elements.borrow_mut();

                    let slot = match usize::try_from(idx).ok().and_then(|idx| elements.get_mut(idx)) {
                        Some(slot) => slot,
                        None => return Value::error("index out of range")
                    };

                    let value = match compound_operator(&assignment.operator) {
                        Some(operator) => {
                            let combined = apply_binary(&operator, slot.clone(), value);

                            if combined.is_error() {
                                return combined;
                            }

                            combined
                        },
                        None => value
                    };

                    *slot = value.clone();

                    value
                },
                (container, _) => Value::error(
                    format!("cannot assign to index of type {}", container.kind())
                )
            }
        },
        target => Value::error(format!("cannot assign to {target}"))
    }
}

fn compound_operator(operator: &Token) -> Option<Token> {
    match operator {
        Token::PlusAssign => Some(Token::Plus),
        Token::MinusAssign => Some(Token::Minus),
        Token::AsteriskAssign => Some(Token::Asterisk),
        Token::SlashAssign => Some(Token::Slash),
        _ => None
    }
}

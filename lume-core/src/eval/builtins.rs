use crate::environment::prelude::{Value, NULL};

/// The builtin functions bound into every root environment.
pub fn builtins() -> [(&'static str, fn(Vec<Value>) -> Value); 5] {
    [
        ("len", len),
        ("print", print),
        ("println", println),
        ("type", type_of),
        ("append", append),
    ]
}

fn len(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return Value::error(format!(
            "wrong number of arguments: expected 1, got {}",
            args.len()
        ));
    }

    match &args[0] {
        Value::String { value } => Value::Integer { value: value.chars().count() as i64 },
        Value::List { elements } => Value::Integer { value: elements.borrow().len() as i64 },
        value => Value::error(format!("unsupported argument of type {} for len", value.kind()))
    }
}

fn print(args: Vec<Value>) -> Value {
    let rendered = args.iter()
        .map(|value| value.to_string())
        .collect::<Vec<String>>();

    print!("{}", rendered.join(" "));

    NULL
}

fn println(args: Vec<Value>) -> Value {
    let rendered = args.iter()
        .map(|value| value.to_string())
        .collect::<Vec<String>>();

    println!("{}", rendered.join(" "));

    NULL
}

fn type_of(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return Value::error(format!(
            "wrong number of arguments: expected 1, got {}",
            args.len()
        ));
    }

    Value::String { value: args[0].kind().to_string() }
}

fn append(args: Vec<Value>) -> Value {
    match args.split_first() {
        Some((Value::List { elements }, rest)) => {
            let mut appended = elements.borrow().clone();
            appended.extend(rest.iter().cloned());

            Value::list(appended)
        },
        Some((value, _)) => Value::error(
            format!("unsupported argument of type {} for append", value.kind())
        ),
        None => Value::error("wrong number of arguments: expected at least 1, got 0")
    }
}

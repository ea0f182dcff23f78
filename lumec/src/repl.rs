use std::io::Write;

use lume_core::{
    environment::prelude::Value,
    eval::{eval, new_root_env},
    parser::prelude::parse
};

const PROMPT: &str = ">> ";

pub fn start() -> std::io::Result<()> {
    let stdin = std::io::stdin();
    let env = new_root_env();

    loop {
        let mut input = String::from("");

        print!("{}", PROMPT);
        std::io::stdout().flush()?;

        if stdin.read_line(&mut input)? == 0 {
            return Ok(());
        }

        if let Some('\n') = input.chars().next_back() {
            input.pop();
        }
        if let Some('\r') = input.chars().next_back() {
            input.pop();
        }

        match input.as_str() {
            "" => {},
            ".exit" => return Ok(()),
            _ => {
                let (program, errors) = parse(&input);

                if !errors.is_empty() {
                    for error in &errors {
                        println!("Parse error: {error}");
                    }

                    continue;
                }

                match eval(&program, env.clone()) {
                    Value::Null => {},
                    value => println!("{value}")
                }
            }
        }
    }
}

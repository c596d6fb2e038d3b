//! Host process helpers: time-ms, system, exit.

use crate::env::Env;
use crate::error::{EvalError, ARITY_AT_LEAST_ONE};
use crate::value::Value;
use std::process::{self, Command};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

fn time_ms(_args: &[Value]) -> Result<Value, EvalError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| Value::Int(elapsed.as_millis() as i64))
        .map_err(|err| EvalError::runtime_error("time-ms", err.to_string()))
}

/// Flatten arguments into shell words: strings split on spaces, symbols pass
/// through, sequences recurse.
fn flatten_words(name: &str, args: &[Value], out: &mut Vec<String>) -> Result<(), EvalError> {
    for arg in args {
        match arg {
            Value::Str(s) => out.extend(s.split(' ').map(str::to_string)),
            Value::Sym(s) => out.push(s.clone()),
            seq @ (Value::List(..) | Value::Vector(..)) => {
                flatten_words(name, seq.seq().unwrap_or(&[]), out)?;
            }
            other => return Err(EvalError::type_error(name, "string, symbol, or sequence", other)),
        }
    }
    Ok(())
}

fn chomp(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

fn system(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("system", ARITY_AT_LEAST_ONE, 0));
    }
    let mut words = Vec::new();
    flatten_words("system", args, &mut words)?;
    let joined = words.join(" ");

    let output = Command::new("/bin/bash")
        .arg("-c")
        .arg(&joined)
        .output()
        .map_err(|err| EvalError::runtime_error("system", err.to_string()))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    let combined = chomp(combined);

    if !output.status.success() {
        return Err(EvalError::runtime_error(
            "system",
            format!("command failed ({}): {}", output.status, combined),
        ));
    }
    Ok(Value::Str(combined))
}

fn exit(_args: &[Value]) -> Result<Value, EvalError> {
    println!("Bye !");
    process::exit(0);
}

pub fn register(env: &Arc<Env>) {
    env.set("time-ms", Value::native("time-ms", time_ms));
    env.set("system", Value::native("system", system));
    env.set("exit", Value::native("exit", exit));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_ms_is_positive_int() {
        assert!(matches!(time_ms(&[]), Ok(Value::Int(n)) if n > 0));
    }

    #[test]
    fn test_flatten_words() {
        let mut words = Vec::new();
        flatten_words(
            "system",
            &[
                Value::Str("echo hi".into()),
                Value::sym("there"),
                Value::list(vec![Value::Str("x".into())]),
            ],
            &mut words,
        )
        .unwrap();
        assert_eq!(words, ["echo", "hi", "there", "x"]);
    }

    #[test]
    fn test_system_echo() {
        let result = system(&[Value::Str("echo hello".into())]).unwrap();
        assert!(matches!(result, Value::Str(s) if s == "hello"));
    }
}

//! String and printing operations.
//!
//! `str`/`println` render in display mode with no separator; `pr-str`/`prn`
//! render readably, space-separated, so the reader can take the text back.

use crate::env::Env;
use crate::error::{EvalError, ARITY_ONE, ARITY_TWO};
use crate::printer::pr_seq;
use crate::reader;
use crate::value::Value;
use std::fs;
use std::sync::Arc;

fn str_arg<'a>(name: &str, args: &'a [Value], position: usize) -> Result<&'a str, EvalError> {
    match args.get(position) {
        Some(Value::Str(s)) => Ok(s),
        Some(other) => Err(EvalError::type_error(name, "string", other)),
        None => Err(EvalError::arity_error(name, (position + 1).to_string(), args.len())),
    }
}

fn read_string(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("read-string", ARITY_ONE, args.len()));
    }
    reader::read_str(str_arg("read-string", args, 0)?)
}

fn slurp(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("slurp", ARITY_ONE, args.len()));
    }
    let path = str_arg("slurp", args, 0)?;
    fs::read_to_string(path)
        .map(Value::Str)
        .map_err(|err| EvalError::runtime_error("slurp", format!("{}: {}", path, err)))
}

fn string_split(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("string-split", ARITY_TWO, args.len()));
    }
    let text = str_arg("string-split", args, 0)?;
    let separator = str_arg("string-split", args, 1)?;
    Ok(Value::list(
        text.split(separator)
            .map(|part| Value::Str(part.to_string()))
            .collect(),
    ))
}

fn readline(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("readline", ARITY_ONE, args.len()));
    }
    crate::readline::read_line(str_arg("readline", args, 0)?).map(Value::Str)
}

pub fn register(env: &Arc<Env>) {
    env.set(
        "str",
        Value::native("str", |args| Ok(Value::Str(pr_seq(args, false, "", "", "")))),
    );
    env.set(
        "pr-str",
        Value::native("pr-str", |args| {
            Ok(Value::Str(pr_seq(args, true, "", "", " ")))
        }),
    );
    env.set(
        "prn",
        Value::native("prn", |args| {
            println!("{}", pr_seq(args, true, "", "", " "));
            Ok(Value::Nil)
        }),
    );
    env.set(
        "println",
        Value::native("println", |args| {
            println!("{}", pr_seq(args, false, "", "", ""));
            Ok(Value::Nil)
        }),
    );
    env.set("read-string", Value::native("read-string", read_string));
    env.set("slurp", Value::native("slurp", slurp));
    env.set("string-split", Value::native("string-split", string_split));
    env.set("readline", Value::native("readline", readline));
}

//! Hashmap operations.
//!
//! Keys are always strings (keywords included), enforced at construction and
//! lookup. `assoc` and `dissoc` return fresh maps; `update` writes through
//! the shared reference in place, so the change is visible to every alias.

use crate::env::Env;
use crate::error::{EvalError, ARITY_AT_LEAST_TWO, ARITY_ONE, ARITY_THREE, ARITY_TWO};
use crate::value::{map_entries_from, Value};
use std::collections::HashMap;
use std::sync::Arc;

fn entries_snapshot(name: &str, value: &Value) -> Result<HashMap<String, Value>, EvalError> {
    match value {
        Value::Map(entries, _) => Ok(entries.read().unwrap().clone()),
        other => Err(EvalError::type_error(name, "map", other)),
    }
}

fn key_arg<'a>(name: &str, value: &'a Value) -> Result<&'a str, EvalError> {
    match value {
        Value::Str(key) => Ok(key),
        other => Err(EvalError::type_error(name, "string key", other)),
    }
}

fn hash_map(args: &[Value]) -> Result<Value, EvalError> {
    map_entries_from(args)
        .map(Value::map)
        .map_err(|message| EvalError::runtime_error("hash-map", message))
}

fn assoc(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 3 || args.len() % 2 != 1 {
        return Err(EvalError::arity_error(
            "assoc",
            "a map plus an even number of",
            args.len(),
        ));
    }
    let mut entries = entries_snapshot("assoc", &args[0])?;
    for pair in args[1..].chunks(2) {
        entries.insert(key_arg("assoc", &pair[0])?.to_string(), pair[1].clone());
    }
    Ok(Value::map(entries))
}

fn dissoc(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("dissoc", ARITY_AT_LEAST_TWO, args.len()));
    }
    let mut entries = entries_snapshot("dissoc", &args[0])?;
    for key in &args[1..] {
        entries.remove(key_arg("dissoc", key)?);
    }
    Ok(Value::map(entries))
}

fn get(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("get", ARITY_TWO, args.len()));
    }
    match &args[0] {
        Value::Nil => Ok(Value::Nil),
        Value::Map(entries, _) => {
            let key = key_arg("get", &args[1])?;
            Ok(entries.read().unwrap().get(key).cloned().unwrap_or(Value::Nil))
        }
        other => Err(EvalError::type_error("get", "map", other)),
    }
}

fn contains_q(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("contains?", ARITY_TWO, args.len()));
    }
    match &args[0] {
        Value::Nil => Ok(Value::Bool(false)),
        Value::Map(entries, _) => {
            let key = key_arg("contains?", &args[1])?;
            Ok(Value::Bool(entries.read().unwrap().contains_key(key)))
        }
        other => Err(EvalError::type_error("contains?", "map", other)),
    }
}

fn keys(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("keys", ARITY_ONE, args.len()));
    }
    let entries = entries_snapshot("keys", &args[0])?;
    Ok(Value::list(entries.keys().map(|k| Value::Str(k.clone())).collect()))
}

fn vals(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("vals", ARITY_ONE, args.len()));
    }
    let entries = entries_snapshot("vals", &args[0])?;
    Ok(Value::list(entries.values().cloned().collect()))
}

/// Writes one key in place and returns the same map value. Not safe to race
/// from multiple tasks; `assoc` is the persistent alternative.
fn update(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 3 {
        return Err(EvalError::arity_error("update", ARITY_THREE, args.len()));
    }
    match &args[0] {
        Value::Nil => Ok(Value::Nil),
        Value::Map(entries, _) => {
            let key = key_arg("update", &args[1])?;
            entries.write().unwrap().insert(key.to_string(), args[2].clone());
            Ok(args[0].clone())
        }
        other => Err(EvalError::type_error("update", "map", other)),
    }
}

pub fn register(env: &Arc<Env>) {
    env.set("hash-map", Value::native("hash-map", hash_map));
    env.set(
        "map?",
        Value::native("map?", |args| {
            Ok(Value::Bool(matches!(args.first(), Some(Value::Map(..)))))
        }),
    );
    env.set("assoc", Value::native("assoc", assoc));
    env.set("dissoc", Value::native("dissoc", dissoc));
    env.set("get", Value::native("get", get));
    env.set("contains?", Value::native("contains?", contains_q));
    env.set("keys", Value::native("keys", keys));
    env.set("vals", Value::native("vals", vals));
    env.set("update", Value::native("update", update));
}

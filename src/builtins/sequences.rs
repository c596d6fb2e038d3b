//! Sequence operations shared by lists and vectors.
//!
//! Both containers expose the same sequence view; the distinction survives
//! only in the predicates and in the `conj` rule (list prepends, vector
//! appends). `map` always returns a list, whatever the input container.

use crate::env::Env;
use crate::error::{EvalError, ARITY_AT_LEAST_TWO, ARITY_ONE, ARITY_TWO};
use crate::eval;
use crate::value::Value;
use std::sync::Arc;

fn seq_slice<'a>(name: &str, value: &'a Value) -> Result<&'a [Value], EvalError> {
    value
        .seq()
        .ok_or_else(|| EvalError::type_error(name, "sequence", value))
}

fn cons(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("cons", ARITY_TWO, args.len()));
    }
    let tail = seq_slice("cons", &args[1])?;
    let mut out = Vec::with_capacity(tail.len() + 1);
    out.push(args[0].clone());
    out.extend_from_slice(tail);
    Ok(Value::list(out))
}

fn concat(args: &[Value]) -> Result<Value, EvalError> {
    let mut out = Vec::new();
    for arg in args {
        out.extend_from_slice(seq_slice("concat", arg)?);
    }
    Ok(Value::list(out))
}

fn first(args: &[Value]) -> Result<Value, EvalError> {
    match args.first() {
        None | Some(Value::Nil) => Ok(Value::Nil),
        Some(seq) => Ok(seq_slice("first", seq)?.first().cloned().unwrap_or(Value::Nil)),
    }
}

fn rest(args: &[Value]) -> Result<Value, EvalError> {
    match args.first() {
        None | Some(Value::Nil) => Ok(Value::list(Vec::new())),
        Some(seq) => {
            let items = seq_slice("rest", seq)?;
            Ok(Value::list(items.get(1..).unwrap_or(&[]).to_vec()))
        }
    }
}

fn nth(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("nth", ARITY_TWO, args.len()));
    }
    let items = seq_slice("nth", &args[0])?;
    let index = match &args[1] {
        Value::Int(n) => *n,
        other => return Err(EvalError::type_error("nth", "int", other)),
    };
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i).cloned())
        .ok_or(EvalError::IndexOutOfRange { index })
}

fn count(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("count", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Nil => Ok(Value::Int(0)),
        Value::Map(entries, _) => Ok(Value::Int(entries.read().unwrap().len() as i64)),
        seq => Ok(Value::Int(seq_slice("count", seq)?.len() as i64)),
    }
}

fn empty_q(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("empty?", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Nil => Ok(Value::Bool(true)),
        seq => Ok(Value::Bool(seq_slice("empty?", seq)?.is_empty())),
    }
}

/// nil for empty input; vectors and strings convert to lists, lists pass
/// through.
fn seq(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("seq", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Nil => Ok(Value::Nil),
        Value::List(items, _) if items.is_empty() => Ok(Value::Nil),
        list @ Value::List(..) => Ok(list.clone()),
        Value::Vector(items, _) => {
            if items.is_empty() {
                Ok(Value::Nil)
            } else {
                Ok(Value::list(items.as_slice().to_vec()))
            }
        }
        Value::Str(s) => {
            if s.is_empty() {
                Ok(Value::Nil)
            } else {
                Ok(Value::list(
                    s.chars().map(|c| Value::Str(c.to_string())).collect(),
                ))
            }
        }
        other => Err(EvalError::type_error("seq", "string or sequence", other)),
    }
}

fn conj(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("conj", ARITY_AT_LEAST_TWO, args.len()));
    }
    match &args[0] {
        Value::List(items, _) => {
            let mut out: Vec<Value> = args[1..].iter().rev().cloned().collect();
            out.extend_from_slice(items);
            Ok(Value::list(out))
        }
        Value::Vector(items, _) => {
            let mut out = items.as_slice().to_vec();
            out.extend_from_slice(&args[1..]);
            Ok(Value::vector(out))
        }
        other => Err(EvalError::type_error("conj", "sequence", other)),
    }
}

fn do_map(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("map", ARITY_TWO, args.len()));
    }
    let items = seq_slice("map", &args[1])?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(eval::apply(&args[0], vec![item.clone()])?);
    }
    Ok(Value::list(out))
}

fn apply(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("apply", ARITY_AT_LEAST_TWO, args.len()));
    }
    let mut spread: Vec<Value> = args[1..args.len() - 1].to_vec();
    spread.extend_from_slice(seq_slice("apply", &args[args.len() - 1])?);
    eval::apply(&args[0], spread)
}

pub fn register(env: &Arc<Env>) {
    env.set("list", Value::native("list", |args| Ok(Value::list(args.to_vec()))));
    env.set(
        "list?",
        Value::native("list?", |args| {
            Ok(Value::Bool(matches!(args.first(), Some(Value::List(..)))))
        }),
    );
    env.set(
        "vector",
        Value::native("vector", |args| Ok(Value::vector(args.to_vec()))),
    );
    env.set(
        "vector?",
        Value::native("vector?", |args| {
            Ok(Value::Bool(matches!(args.first(), Some(Value::Vector(..)))))
        }),
    );
    env.set(
        "sequential?",
        Value::native("sequential?", |args| {
            Ok(Value::Bool(args.first().is_some_and(|v| v.seq().is_some())))
        }),
    );
    env.set("cons", Value::native("cons", cons));
    env.set("concat", Value::native("concat", concat));
    env.set("first", Value::native("first", first));
    env.set("rest", Value::native("rest", rest));
    env.set("nth", Value::native("nth", nth));
    env.set("count", Value::native("count", count));
    env.set("empty?", Value::native("empty?", empty_q));
    env.set("seq", Value::native("seq", seq));
    env.set("conj", Value::native("conj", conj));
    env.set("map", Value::native("map", do_map));
    env.set("apply", Value::native("apply", apply));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::pr_str;

    fn ints(ns: &[i64]) -> Vec<Value> {
        ns.iter().map(|n| Value::Int(*n)).collect()
    }

    #[test]
    fn test_cons_prepends() {
        let result = cons(&[Value::Int(1), Value::list(ints(&[2, 3]))]).unwrap();
        assert_eq!(pr_str(&result, true), "(1 2 3)");
    }

    #[test]
    fn test_cons_first_rest_duality() {
        let original = Value::vector(ints(&[1, 2, 3]));
        let head = first(std::slice::from_ref(&original)).unwrap();
        let tail = rest(std::slice::from_ref(&original)).unwrap();
        let rebuilt = cons(&[head, tail]).unwrap();
        assert!(Value::equal(&original, &rebuilt));
    }

    #[test]
    fn test_first_and_rest_on_nil_and_empty() {
        assert!(matches!(first(&[Value::Nil]), Ok(Value::Nil)));
        assert!(matches!(first(&[Value::list(vec![])]), Ok(Value::Nil)));
        let tail = rest(&[Value::Nil]).unwrap();
        assert_eq!(tail.seq().unwrap().len(), 0);
    }

    #[test]
    fn test_nth_bounds() {
        let seq = Value::list(ints(&[10, 20]));
        assert!(matches!(nth(&[seq.clone(), Value::Int(1)]), Ok(Value::Int(20))));
        assert!(matches!(
            nth(&[seq.clone(), Value::Int(2)]),
            Err(EvalError::IndexOutOfRange { index: 2 })
        ));
        assert!(matches!(
            nth(&[seq, Value::Int(-1)]),
            Err(EvalError::IndexOutOfRange { index: -1 })
        ));
    }

    #[test]
    fn test_conj_list_prepends_vector_appends() {
        let list = conj(&[Value::list(ints(&[1, 2])), Value::Int(3), Value::Int(4)]).unwrap();
        assert_eq!(pr_str(&list, true), "(4 3 1 2)");

        let vector = conj(&[Value::vector(ints(&[1, 2])), Value::Int(3), Value::Int(4)]).unwrap();
        assert_eq!(pr_str(&vector, true), "[1 2 3 4]");
    }

    #[test]
    fn test_seq_conversions() {
        assert!(matches!(seq(&[Value::Nil]), Ok(Value::Nil)));
        assert!(matches!(seq(&[Value::list(vec![])]), Ok(Value::Nil)));
        let from_vec = seq(&[Value::vector(ints(&[1]))]).unwrap();
        assert!(matches!(&from_vec, Value::List(..)));
        let from_str = seq(&[Value::Str("ab".into())]).unwrap();
        assert_eq!(pr_str(&from_str, true), "(\"a\" \"b\")");
    }

    #[test]
    fn test_concat_requires_sequences() {
        assert!(matches!(
            concat(&[Value::Int(1)]),
            Err(EvalError::TypeMismatch { .. })
        ));
        let joined = concat(&[Value::list(ints(&[1])), Value::vector(ints(&[2]))]).unwrap();
        assert_eq!(pr_str(&joined, true), "(1 2)");
    }
}

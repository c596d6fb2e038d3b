//! Type predicates and symbol/keyword coercions.
//!
//! Keywords are prefix-tagged strings, so `string?` has to exclude them
//! explicitly while `keyword?` checks only the prefix.

use crate::env::Env;
use crate::error::{EvalError, ARITY_ONE};
use crate::value::Value;
use std::sync::Arc;

fn predicate(
    env: &Arc<Env>,
    name: &'static str,
    test: fn(&Value) -> bool,
) {
    env.set(
        name,
        Value::native(name, move |args| {
            if args.len() != 1 {
                return Err(EvalError::arity_error(name, ARITY_ONE, args.len()));
            }
            Ok(Value::Bool(test(&args[0])))
        }),
    );
}

fn symbol(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("symbol", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Str(name) => Ok(Value::Sym(name.clone())),
        other => Err(EvalError::type_error("symbol", "string", other)),
    }
}

fn keyword(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("keyword", ARITY_ONE, args.len()));
    }
    match &args[0] {
        kw if kw.is_keyword() => Ok(kw.clone()),
        Value::Str(name) => Ok(Value::keyword(name)),
        other => Err(EvalError::type_error("keyword", "string", other)),
    }
}

pub fn register(env: &Arc<Env>) {
    predicate(env, "nil?", |v| matches!(v, Value::Nil));
    predicate(env, "true?", |v| matches!(v, Value::Bool(true)));
    predicate(env, "symbol?", |v| matches!(v, Value::Sym(_)));
    predicate(env, "string?", |v| matches!(v, Value::Str(_)) && !v.is_keyword());
    predicate(env, "keyword?", Value::is_keyword);
    predicate(env, "number?", |v| matches!(v, Value::Int(_) | Value::Float(_)));
    predicate(env, "fn?", |v| {
        matches!(v, Value::Fn(_)) || matches!(v, Value::Closure(c) if !c.is_macro)
    });
    predicate(env, "macro?", |v| matches!(v, Value::Closure(c) if c.is_macro));
    env.set("symbol", Value::native("symbol", symbol));
    env.set("keyword", Value::native("keyword", keyword));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_is_string_and_keyword() {
        let kw = Value::keyword("k");
        assert!(kw.is_keyword());
        // string? excludes keywords even though the variant is Str
        assert!(matches!(&kw, Value::Str(_)));
    }

    #[test]
    fn test_keyword_coercion_is_idempotent() {
        let kw = keyword(&[Value::Str("k".into())]).unwrap();
        let again = keyword(&[kw.clone()]).unwrap();
        assert!(Value::equal(&kw, &again));
    }

    #[test]
    fn test_symbol_from_string() {
        assert!(matches!(
            symbol(&[Value::Str("abc".into())]),
            Ok(Value::Sym(s)) if s == "abc"
        ));
        assert!(symbol(&[Value::Int(1)]).is_err());
    }
}

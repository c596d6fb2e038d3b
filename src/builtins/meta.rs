//! Metadata attachment: with-meta, meta.
//!
//! Metadata is out-of-band: it rides on lists, vectors, maps, and both
//! function kinds without affecting equality or evaluation.

use crate::env::Env;
use crate::error::{EvalError, ARITY_ONE, ARITY_TWO};
use crate::value::{Closure, NativeFn, Value};
use std::sync::Arc;

fn with_meta(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("with-meta", ARITY_TWO, args.len()));
    }
    let meta = Some(Arc::new(args[1].clone()));
    match &args[0] {
        Value::List(items, _) => Ok(Value::List(Arc::clone(items), meta)),
        Value::Vector(items, _) => Ok(Value::Vector(Arc::clone(items), meta)),
        Value::Map(entries, _) => Ok(Value::Map(Arc::clone(entries), meta)),
        Value::Fn(native) => Ok(Value::Fn(NativeFn {
            meta,
            ..native.clone()
        })),
        Value::Closure(closure) => Ok(Value::Closure(Closure {
            meta,
            ..closure.clone()
        })),
        other => Err(EvalError::type_error(
            "with-meta",
            "collection or function",
            other,
        )),
    }
}

fn meta(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("meta", ARITY_ONE, args.len()));
    }
    let attached = match &args[0] {
        Value::List(_, meta) | Value::Vector(_, meta) | Value::Map(_, meta) => meta,
        Value::Fn(native) => &native.meta,
        Value::Closure(closure) => &closure.meta,
        other => return Err(EvalError::type_error("meta", "collection or function", other)),
    };
    Ok(attached.as_ref().map(|m| (**m).clone()).unwrap_or(Value::Nil))
}

pub fn register(env: &Arc<Env>) {
    env.set("with-meta", Value::native("with-meta", with_meta));
    env.set("meta", Value::native("meta", meta));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_roundtrip_on_list() {
        let list = Value::list(vec![Value::Int(1)]);
        let tagged = with_meta(&[list.clone(), Value::Str("m".into())]).unwrap();
        assert!(matches!(meta(&[tagged.clone()]), Ok(Value::Str(s)) if s == "m"));
        // metadata never affects equality
        assert!(Value::equal(&list, &tagged));
        // the original is untouched
        assert!(matches!(meta(&[list]), Ok(Value::Nil)));
    }

    #[test]
    fn test_meta_on_scalar_rejected() {
        assert!(matches!(
            with_meta(&[Value::Int(1), Value::Nil]),
            Err(EvalError::TypeMismatch { .. })
        ));
    }
}

// ABOUTME: Evaluator module - trampolined tree-walk with special forms and macros

use crate::env::Env;
use crate::error::{EvalError, ARITY_AT_LEAST_ONE, ARITY_ONE, ARITY_TWO, ARITY_TWO_OR_THREE};
use crate::value::{Closure, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

/// Main evaluation function. The loop rewrites `ast` and `env` in place for
/// the tail-position forms (`let`, `do`, `if`, `quasiquote`, closure
/// application) instead of recursing, so self-tail-recursive programs run in
/// constant host-stack depth.
pub fn eval(mut ast: Value, mut env: Arc<Env>) -> Result<Value, EvalError> {
    loop {
        if !matches!(ast, Value::List(..)) {
            return eval_ast(&ast, &env);
        }

        ast = macroexpand(ast, &env)?;
        let items = match &ast {
            Value::List(items, _) => Arc::clone(items),
            _ => return eval_ast(&ast, &env),
        };
        if items.is_empty() {
            return Ok(ast);
        }

        let head = match &items[0] {
            Value::Sym(name) => name.as_str(),
            _ => "",
        };
        match head {
            "def" => {
                if items.len() != 3 {
                    return Err(EvalError::arity_error("def", ARITY_TWO, items.len() - 1));
                }
                let name = sym_name(&items[1], "def")?;
                let value = eval(items[2].clone(), env.clone())?;
                return Ok(env.set(name, value));
            }
            "let" => {
                if items.len() != 3 {
                    return Err(EvalError::arity_error("let", ARITY_TWO, items.len() - 1));
                }
                let bindings = items[1]
                    .seq()
                    .ok_or_else(|| EvalError::type_error("let", "binding sequence", &items[1]))?;
                if bindings.len() % 2 == 1 {
                    return Err(EvalError::arity_error(
                        "let",
                        "an even number of binding",
                        bindings.len(),
                    ));
                }
                let let_env = Env::with_outer(env.clone());
                for pair in bindings.chunks(2) {
                    let name = sym_name(&pair[0], "let")?;
                    let bound = eval(pair[1].clone(), let_env.clone())?;
                    let_env.set(name, bound);
                }
                ast = items[2].clone();
                env = let_env;
            }
            "quote" => {
                if items.len() != 2 {
                    return Err(EvalError::arity_error("quote", ARITY_ONE, items.len() - 1));
                }
                return Ok(items[1].clone());
            }
            "quasiquote" => {
                if items.len() != 2 {
                    return Err(EvalError::arity_error(
                        "quasiquote",
                        ARITY_ONE,
                        items.len() - 1,
                    ));
                }
                ast = quasiquote(&items[1]);
            }
            "defmacro" => {
                if items.len() != 3 {
                    return Err(EvalError::arity_error("defmacro", ARITY_TWO, items.len() - 1));
                }
                let name = sym_name(&items[1], "defmacro")?;
                match eval(items[2].clone(), env.clone())? {
                    Value::Closure(mut closure) => {
                        closure.is_macro = true;
                        return Ok(env.set(name, Value::Closure(closure)));
                    }
                    other => return Err(EvalError::type_error("defmacro", "function", &other)),
                }
            }
            "macroexpand" => {
                if items.len() != 2 {
                    return Err(EvalError::arity_error(
                        "macroexpand",
                        ARITY_ONE,
                        items.len() - 1,
                    ));
                }
                return macroexpand(items[1].clone(), &env);
            }
            "try" => {
                if items.len() < 2 {
                    return Err(EvalError::arity_error("try", ARITY_AT_LEAST_ONE, 0));
                }
                return match eval(items[1].clone(), env.clone()) {
                    Ok(value) => Ok(value),
                    Err(err) => {
                        let catch = items.get(2).and_then(|form| form.seq());
                        match catch {
                            Some(clause)
                                if clause.len() == 3
                                    && matches!(&clause[0], Value::Sym(s) if s == "catch") =>
                            {
                                let name = sym_name(&clause[1], "catch")?;
                                let payload = match err {
                                    EvalError::Raised(value) => value,
                                    other => Value::Str(other.to_string()),
                                };
                                let catch_env = Env::with_outer(env.clone());
                                catch_env.set(name, payload);
                                eval(clause[2].clone(), catch_env)
                            }
                            _ => Err(err),
                        }
                    }
                };
            }
            "do" => {
                if items.len() == 1 {
                    return Ok(Value::Nil);
                }
                for form in &items[1..items.len() - 1] {
                    eval(form.clone(), env.clone())?;
                }
                ast = items[items.len() - 1].clone();
            }
            "if" => {
                if items.len() < 3 || items.len() > 4 {
                    return Err(EvalError::arity_error(
                        "if",
                        ARITY_TWO_OR_THREE,
                        items.len() - 1,
                    ));
                }
                let condition = eval(items[1].clone(), env.clone())?;
                if condition.is_truthy() {
                    ast = items[2].clone();
                } else if items.len() == 4 {
                    ast = items[3].clone();
                } else {
                    return Ok(Value::Nil);
                }
            }
            "fn" => {
                if items.len() != 3 {
                    return Err(EvalError::arity_error("fn", ARITY_TWO, items.len() - 1));
                }
                return Ok(Value::Closure(Closure {
                    params: Arc::new(items[1].clone()),
                    body: Arc::new(items[2].clone()),
                    env: env.clone(),
                    is_macro: false,
                    meta: None,
                }));
            }
            _ => {
                let evaluated = eval_ast(&ast, &env)?;
                let parts = match &evaluated {
                    Value::List(parts, _) => parts,
                    _ => return Err(EvalError::NotCallable),
                };
                let args = parts[1..].to_vec();
                match parts[0].clone() {
                    Value::Closure(closure) => {
                        let params = closure_params(&closure)?;
                        env = Env::bind(closure.env.clone(), params, args)?;
                        ast = (*closure.body).clone();
                    }
                    Value::Fn(native) => return (native.func)(&args),
                    _ => return Err(EvalError::NotCallable),
                }
            }
        }
    }
}

/// Structural evaluation for non-special forms: symbols resolve, sequences
/// and maps evaluate element-wise, everything else is itself.
fn eval_ast(ast: &Value, env: &Arc<Env>) -> Result<Value, EvalError> {
    match ast {
        Value::Sym(name) => env.get(name),
        Value::List(items, _) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                out.push(eval(item.clone(), env.clone())?);
            }
            Ok(Value::list(out))
        }
        Value::Vector(items, _) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                out.push(eval(item.clone(), env.clone())?);
            }
            Ok(Value::vector(out))
        }
        Value::Map(entries, _) => {
            let snapshot: Vec<(String, Value)> = entries
                .read()
                .unwrap()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            let mut out = HashMap::with_capacity(snapshot.len());
            for (key, form) in snapshot {
                out.insert(key, eval(form, env.clone())?);
            }
            Ok(Value::map(out))
        }
        _ => Ok(ast.clone()),
    }
}

/// Syntactic quasiquote rewrite; the evaluator loops on the result.
fn quasiquote(ast: &Value) -> Value {
    let items = match ast.seq() {
        Some(items) if !items.is_empty() => items,
        _ => return Value::list(vec![Value::sym("quote"), ast.clone()]),
    };
    if matches!(&items[0], Value::Sym(s) if s == "unquote") {
        return items.get(1).cloned().unwrap_or(Value::Nil);
    }
    if let Some(inner) = items[0].seq() {
        if matches!(inner.first(), Some(Value::Sym(s)) if s == "splice-unquote") {
            return Value::list(vec![
                Value::sym("concat"),
                inner.get(1).cloned().unwrap_or(Value::Nil),
                quasiquote(&Value::list(items[1..].to_vec())),
            ]);
        }
    }
    Value::list(vec![
        Value::sym("cons"),
        quasiquote(&items[0]),
        quasiquote(&Value::list(items[1..].to_vec())),
    ])
}

fn as_macro_call(ast: &Value, env: &Arc<Env>) -> Option<Closure> {
    let items = match ast {
        Value::List(items, _) => items,
        _ => return None,
    };
    let name = match items.first() {
        Some(Value::Sym(name)) => name,
        _ => return None,
    };
    let frame = env.find(name)?;
    match frame.get(name) {
        Ok(Value::Closure(closure)) if closure.is_macro => Some(closure),
        _ => None,
    }
}

/// Repeatedly replace the form with its macro expansion while the head
/// resolves to a macro. Macro arguments are passed unevaluated.
pub fn macroexpand(mut ast: Value, env: &Arc<Env>) -> Result<Value, EvalError> {
    while let Some(closure) = as_macro_call(&ast, env) {
        let items = match &ast {
            Value::List(items, _) => Arc::clone(items),
            _ => break,
        };
        ast = apply_closure(&closure, items[1..].to_vec())?;
    }
    Ok(ast)
}

fn closure_params(closure: &Closure) -> Result<&[Value], EvalError> {
    closure
        .params
        .seq()
        .ok_or_else(|| EvalError::type_error("fn", "parameter sequence", &closure.params))
}

fn apply_closure(closure: &Closure, args: Vec<Value>) -> Result<Value, EvalError> {
    let env = Env::bind(closure.env.clone(), closure_params(closure)?, args)?;
    eval((*closure.body).clone(), env)
}

/// Apply a function value to already-evaluated arguments. This is the entry
/// used by built-ins (`apply`, `map`, `swap!`) and by macro expansion.
pub fn apply(f: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
    match f {
        Value::Closure(closure) => apply_closure(closure, args),
        Value::Fn(native) => (native.func)(&args),
        _ => Err(EvalError::NotCallable),
    }
}

/// Apply in a freshly spawned task, returning `Nil` immediately. The task's
/// result and any error it raises are discarded; binding errors still
/// surface in the caller because the frame is built before spawning.
pub fn apply_spawn(f: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
    match f {
        Value::Closure(closure) => {
            let env = Env::bind(closure.env.clone(), closure_params(closure)?, args)?;
            let body = Arc::clone(&closure.body);
            thread::spawn(move || {
                let _ = eval((*body).clone(), env);
            });
            Ok(Value::Nil)
        }
        Value::Fn(native) => {
            let func = Arc::clone(&native.func);
            thread::spawn(move || {
                let _ = func(&args);
            });
            Ok(Value::Nil)
        }
        _ => Err(EvalError::NotCallable),
    }
}

fn sym_name<'a>(form: &'a Value, function: &str) -> Result<&'a str, EvalError> {
    match form {
        Value::Sym(name) => Ok(name),
        other => Err(EvalError::type_error(function, "symbol", other)),
    }
}

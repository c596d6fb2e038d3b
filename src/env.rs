// ABOUTME: Environment module for managing variable bindings and scopes

use crate::error::EvalError;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A frame of symbol bindings linked to an optional parent. Lookup walks the
/// parent chain; writes always land in the current frame. Frames are shared
/// across tasks by closures, so the binding table sits behind a lock.
#[derive(Debug)]
pub struct Env {
    bindings: RwLock<HashMap<String, Value>>,
    outer: Option<Arc<Env>>,
}

impl Env {
    /// Creates a new top-level environment with no parent
    pub fn new() -> Arc<Self> {
        Arc::new(Env {
            bindings: RwLock::new(HashMap::new()),
            outer: None,
        })
    }

    /// Creates a new child environment chained to `outer`
    pub fn with_outer(outer: Arc<Env>) -> Arc<Self> {
        Arc::new(Env {
            bindings: RwLock::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Creates an invocation frame binding `params` to `args` positionally.
    /// The pseudo-parameter `&` collects the remaining arguments into a list
    /// bound to the parameter that follows it.
    pub fn bind(outer: Arc<Env>, params: &[Value], args: Vec<Value>) -> Result<Arc<Self>, EvalError> {
        let env = Env::with_outer(outer);
        for (i, param) in params.iter().enumerate() {
            let name = match param {
                Value::Sym(name) => name,
                other => return Err(EvalError::type_error("fn", "symbol parameter", other)),
            };
            if name == "&" {
                let rest_name = match params.get(i + 1) {
                    Some(Value::Sym(name)) => name,
                    _ => {
                        return Err(EvalError::type_error(
                            "fn",
                            "symbol after '&'",
                            params.get(i + 1).unwrap_or(&Value::Nil),
                        ))
                    }
                };
                let rest = args.get(i..).unwrap_or(&[]).to_vec();
                env.set(rest_name, Value::list(rest));
                return Ok(env);
            }
            match args.get(i) {
                Some(value) => {
                    env.set(name, value.clone());
                }
                None => {
                    let fixed = params
                        .iter()
                        .take_while(|p| !matches!(p, Value::Sym(s) if s == "&"))
                        .count();
                    return Err(EvalError::arity_error("fn", fixed.to_string(), args.len()));
                }
            }
        }
        Ok(env)
    }

    /// Binds `name` in THIS frame (never an ancestor) and returns the value
    pub fn set(&self, name: &str, value: Value) -> Value {
        self.bindings
            .write()
            .unwrap()
            .insert(name.to_string(), value.clone());
        value
    }

    /// Returns the nearest frame (self included) that defines `name`
    pub fn find(self: &Arc<Self>, name: &str) -> Option<Arc<Env>> {
        if self.bindings.read().unwrap().contains_key(name) {
            return Some(self.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.find(name))
    }

    /// Resolves `name` against this frame and its ancestors
    pub fn get(&self, name: &str) -> Result<Value, EvalError> {
        if let Some(value) = self.bindings.read().unwrap().get(name) {
            return Ok(value.clone());
        }
        match &self.outer {
            Some(outer) => outer.get(name),
            None => Err(EvalError::UnboundSymbol(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let env = Env::new();
        env.set("x", Value::Int(42));
        assert!(matches!(env.get("x"), Ok(Value::Int(42))));
    }

    #[test]
    fn test_unbound_symbol() {
        let env = Env::new();
        assert!(matches!(
            env.get("missing"),
            Err(EvalError::UnboundSymbol(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_shadowing_leaves_parent_untouched() {
        let parent = Env::new();
        parent.set("x", Value::Int(1));

        let child = Env::with_outer(parent.clone());
        child.set("x", Value::Int(2));

        assert!(matches!(child.get("x"), Ok(Value::Int(2))));
        assert!(matches!(parent.get("x"), Ok(Value::Int(1))));
    }

    #[test]
    fn test_find_locates_defining_frame() {
        let parent = Env::new();
        parent.set("x", Value::Int(1));
        let child = Env::with_outer(parent.clone());

        let found = child.find("x").unwrap();
        assert!(Arc::ptr_eq(&found, &parent));
        assert!(child.find("y").is_none());
    }

    #[test]
    fn test_bind_positional() {
        let params = vec![Value::sym("a"), Value::sym("b")];
        let env = Env::bind(Env::new(), &params, vec![Value::Int(1), Value::Int(2)]).unwrap();
        assert!(matches!(env.get("a"), Ok(Value::Int(1))));
        assert!(matches!(env.get("b"), Ok(Value::Int(2))));
    }

    #[test]
    fn test_bind_rest_parameter() {
        let params = vec![Value::sym("a"), Value::sym("&"), Value::sym("rest")];
        let env = Env::bind(
            Env::new(),
            &params,
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
        )
        .unwrap();
        assert!(matches!(env.get("a"), Ok(Value::Int(1))));
        let rest = env.get("rest").unwrap();
        let items = rest.seq().unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_bind_rest_parameter_empty() {
        let params = vec![Value::sym("&"), Value::sym("rest")];
        let env = Env::bind(Env::new(), &params, vec![]).unwrap();
        let rest = env.get("rest").unwrap();
        assert_eq!(rest.seq().unwrap().len(), 0);
    }

    #[test]
    fn test_bind_too_few_arguments() {
        let params = vec![Value::sym("a"), Value::sym("b")];
        let result = Env::bind(Env::new(), &params, vec![Value::Int(1)]);
        assert!(matches!(result, Err(EvalError::Arity { .. })));
    }
}

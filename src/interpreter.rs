// ABOUTME: Initial-environment construction and read-eval-print plumbing

use crate::builtins::register_builtins;
use crate::env::Env;
use crate::error::{EvalError, ARITY_ONE};
use crate::eval::eval;
use crate::printer::pr_str;
use crate::reader::read_str;
use crate::value::Value;
use std::sync::Arc;

/// Source-level definitions evaluated at startup. These are part of the core
/// language surface, not a library the user opts into.
const BOOTSTRAP: &[&str] = &[
    r#"(def *host-language* "rust")"#,
    "(def not (fn (a) (if a false true)))",
    r#"(def load-file (fn (f) (eval (read-string (str "(do " (slurp f) ")")))))"#,
    r#"(defmacro cond (fn (& xs) (if (> (count xs) 0) (list 'if (first xs) (if (> (count xs) 1) (nth xs 1) (throw "odd number of forms to cond")) (cons 'cond (rest (rest xs)))))))"#,
    "(def *gensym-counter* (atom 0))",
    r#"(def gensym (fn [] (symbol (str "G__" (swap! *gensym-counter* (fn [x] (+ 1 x)))))))"#,
    "(defmacro or (fn (& xs) (if (empty? xs) nil (if (= 1 (count xs)) (first xs) (let (condvar (gensym)) `(let (~condvar ~(first xs)) (if ~condvar ~condvar (or ~@(rest xs)))))))))",
    "(defmacro defn (fn [name args body] `(def ~name (fn ~args ~body))))",
    "(defn curry [func args] (fn [arg] (apply func (cons args (list arg)))))",
];

/// An interpreter instance: the top-level environment with every native
/// built-in, `eval`, `*ARGV*`, and the bootstrap definitions installed.
pub struct Interpreter {
    env: Arc<Env>,
}

impl Interpreter {
    pub fn new() -> Result<Self, EvalError> {
        let env = Env::new();
        register_builtins(&env);

        // eval re-enters the evaluator against the top-level environment,
        // not the caller's frame
        let top_level = env.clone();
        env.set(
            "eval",
            Value::native("eval", move |args: &[Value]| {
                if args.len() != 1 {
                    return Err(EvalError::arity_error("eval", ARITY_ONE, args.len()));
                }
                eval(args[0].clone(), top_level.clone())
            }),
        );
        env.set("*ARGV*", Value::list(Vec::new()));

        let interpreter = Interpreter { env };
        for form in BOOTSTRAP {
            interpreter.eval_str(form)?;
        }
        Ok(interpreter)
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    /// Bind `*ARGV*` to the given strings.
    pub fn set_argv<I>(&self, args: I)
    where
        I: IntoIterator<Item = String>,
    {
        let argv = args.into_iter().map(Value::Str).collect();
        self.env.set("*ARGV*", Value::list(argv));
    }

    /// Read one form and evaluate it against the top-level environment.
    pub fn eval_str(&self, source: &str) -> Result<Value, EvalError> {
        eval(read_str(source)?, self.env.clone())
    }

    /// Read-eval-print: the REPL body.
    pub fn rep(&self, source: &str) -> Result<String, EvalError> {
        Ok(pr_str(&self.eval_str(source)?, true))
    }

    /// Evaluate `(load-file "path")`. The call is built as a value so the
    /// path never passes through the reader.
    pub fn load_file(&self, path: &str) -> Result<Value, EvalError> {
        let call = Value::list(vec![Value::sym("load-file"), Value::Str(path.to_string())]);
        eval(call, self.env.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_defines_core_surface() {
        let interpreter = Interpreter::new().unwrap();
        for name in ["not", "load-file", "cond", "gensym", "or", "defn", "curry", "eval"] {
            assert!(
                interpreter.env().get(name).is_ok(),
                "bootstrap missing {}",
                name
            );
        }
    }

    #[test]
    fn test_rep_prints_readably() {
        let interpreter = Interpreter::new().unwrap();
        assert_eq!(interpreter.rep("(str \"a\" 1)").unwrap(), "\"a1\"");
        assert_eq!(interpreter.rep("(+ 1 2)").unwrap(), "3");
    }

    #[test]
    fn test_eval_builtin_uses_top_level_env() {
        let interpreter = Interpreter::new().unwrap();
        // the let-bound x must not leak into the eval'd form's environment
        let result = interpreter.eval_str("(do (def x 1) (let (x 2) (eval 'x)))");
        assert!(matches!(result, Ok(Value::Int(1))));
    }

    #[test]
    fn test_set_argv() {
        let interpreter = Interpreter::new().unwrap();
        interpreter.set_argv(["a".to_string(), "b".to_string()]);
        assert_eq!(interpreter.rep("(count *ARGV*)").unwrap(), "2");
        assert_eq!(interpreter.rep("(first *ARGV*)").unwrap(), "\"a\"");
    }
}

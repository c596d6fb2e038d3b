// ABOUTME: Tests for the bootstrap library evaluated at startup

use parrot::error::EvalError;
use parrot::interpreter::Interpreter;
use std::fs;

fn setup() -> Interpreter {
    Interpreter::new().unwrap()
}

#[test]
fn test_not() {
    let interp = setup();
    assert_eq!(interp.rep("(not nil)").unwrap(), "true");
    assert_eq!(interp.rep("(not false)").unwrap(), "true");
    assert_eq!(interp.rep("(not 0)").unwrap(), "false");
}

#[test]
fn test_cond_falls_through() {
    let interp = setup();
    assert_eq!(interp.rep("(cond false 1 true 2)").unwrap(), "2");
    assert_eq!(interp.rep("(cond false 1 false 2)").unwrap(), "nil");
    assert_eq!(interp.rep("(cond (= 1 1) \"yes\")").unwrap(), "\"yes\"");
}

#[test]
fn test_cond_odd_count_throws() {
    let interp = setup();
    assert!(matches!(
        interp.eval_str("(cond true)"),
        Err(EvalError::Raised(_))
    ));
}

#[test]
fn test_or_short_circuits() {
    let interp = setup();
    assert_eq!(interp.rep("(or)").unwrap(), "nil");
    assert_eq!(interp.rep("(or false nil 3)").unwrap(), "3");
    assert_eq!(interp.rep("(or 1 2)").unwrap(), "1");

    // later forms are not evaluated once one is truthy
    interp.rep("(def hits (atom 0))").unwrap();
    interp
        .rep("(or true (swap! hits (fn [x] (+ x 1))))")
        .unwrap();
    assert_eq!(interp.rep("(deref hits)").unwrap(), "0");
}

#[test]
fn test_or_does_not_capture_user_bindings() {
    let interp = setup();
    interp.rep("(def condvar 42)").unwrap();
    assert_eq!(interp.rep("(or false condvar)").unwrap(), "42");
}

#[test]
fn test_gensym_yields_distinct_symbols() {
    let interp = setup();
    assert_eq!(interp.rep("(symbol? (gensym))").unwrap(), "true");
    assert_eq!(interp.rep("(= (gensym) (gensym))").unwrap(), "false");
}

#[test]
fn test_defn_and_curry() {
    let interp = setup();
    interp.rep("(defn add2 [a b] (+ a b))").unwrap();
    assert_eq!(interp.rep("(add2 3 4)").unwrap(), "7");
    assert_eq!(interp.rep("((curry add2 10) 5)").unwrap(), "15");
}

#[test]
fn test_load_file() {
    let interp = setup();
    let path = std::env::temp_dir().join(format!("parrot_load_{}.lisp", std::process::id()));
    fs::write(&path, "(def from-file 41)\n(def answer (+ from-file 1))\n").unwrap();

    interp
        .load_file(&path.to_string_lossy())
        .expect("load-file should evaluate the script");
    assert_eq!(interp.rep("answer").unwrap(), "42");

    let _ = fs::remove_file(&path);
}

#[test]
fn test_load_file_missing_path_errors() {
    let interp = setup();
    assert!(interp.load_file("/no/such/parrot/script.lisp").is_err());
}

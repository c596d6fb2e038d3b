//! Concurrency primitives: go, makeChan, closeChan, send, receive, sleep.
//!
//! `go` applies a function in a freshly spawned task and returns nil at
//! once; there is no join, and the task's result or error is discarded.
//! Channels are bounded queues; capacity 0 is a synchronous rendezvous.

use crate::env::Env;
use crate::error::{EvalError, ARITY_AT_LEAST_TWO, ARITY_ONE, ARITY_TWO, ARITY_ZERO_OR_ONE};
use crate::eval;
use crate::value::{Channel, Value};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn chan_arg<'a>(name: &str, value: &'a Value) -> Result<&'a Channel, EvalError> {
    match value {
        Value::Chan(chan) => Ok(chan),
        other => Err(EvalError::type_error(name, "channel", other)),
    }
}

/// `(go f arg1 .. argN last-seq)` applies `f` to the leading args plus the
/// spread of the final sequence, like `apply`, but in a new task.
fn go(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("go", ARITY_AT_LEAST_TWO, args.len()));
    }
    let mut spread: Vec<Value> = args[1..args.len() - 1].to_vec();
    let last = &args[args.len() - 1];
    spread.extend_from_slice(
        last.seq()
            .ok_or_else(|| EvalError::type_error("go", "sequence", last))?,
    );
    eval::apply_spawn(&args[0], spread)
}

fn make_chan(args: &[Value]) -> Result<Value, EvalError> {
    let capacity = match args {
        [] => 0,
        [Value::Int(n)] if *n >= 0 => *n as usize,
        [Value::Int(_)] => {
            return Err(EvalError::runtime_error(
                "makeChan",
                "capacity must be non-negative",
            ))
        }
        [other] => return Err(EvalError::type_error("makeChan", "int", other)),
        _ => return Err(EvalError::arity_error("makeChan", ARITY_ZERO_OR_ONE, args.len())),
    };
    Ok(Value::Chan(Channel::with_capacity(capacity)))
}

fn close_chan(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("closeChan", ARITY_ONE, args.len()));
    }
    chan_arg("closeChan", &args[0])?.close();
    Ok(Value::Nil)
}

fn send(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("send", ARITY_TWO, args.len()));
    }
    chan_arg("send", &args[0])?.send(args[1].clone())?;
    Ok(Value::Nil)
}

fn receive(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("receive", ARITY_ONE, args.len()));
    }
    Ok(chan_arg("receive", &args[0])?.receive())
}

fn sleep(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("sleep", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Int(millis) => {
            if *millis > 0 {
                thread::sleep(Duration::from_millis(*millis as u64));
            }
            Ok(Value::Nil)
        }
        other => Err(EvalError::type_error("sleep", "int", other)),
    }
}

pub fn register(env: &Arc<Env>) {
    env.set("go", Value::native("go", go));
    env.set("makeChan", Value::native("makeChan", make_chan));
    env.set("closeChan", Value::native("closeChan", close_chan));
    env.set("send", Value::native("send", send));
    env.set("receive", Value::native("receive", receive));
    env.set("sleep", Value::native("sleep", sleep));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_send_receive() {
        let chan = make_chan(&[Value::Int(2)]).unwrap();
        send(&[chan.clone(), Value::Int(1)]).unwrap();
        send(&[chan.clone(), Value::Int(2)]).unwrap();
        assert!(matches!(receive(std::slice::from_ref(&chan)), Ok(Value::Int(1))));
        assert!(matches!(receive(&[chan]), Ok(Value::Int(2))));
    }

    #[test]
    fn test_send_on_closed_channel_fails() {
        let chan = make_chan(&[Value::Int(1)]).unwrap();
        close_chan(std::slice::from_ref(&chan)).unwrap();
        assert!(matches!(
            send(&[chan, Value::Int(1)]),
            Err(EvalError::ChannelClosed)
        ));
    }

    #[test]
    fn test_receive_on_closed_empty_channel_is_nil() {
        let chan = make_chan(&[Value::Int(1)]).unwrap();
        close_chan(std::slice::from_ref(&chan)).unwrap();
        assert!(matches!(receive(&[chan]), Ok(Value::Nil)));
    }

    #[test]
    fn test_negative_capacity_rejected() {
        assert!(make_chan(&[Value::Int(-1)]).is_err());
    }

    #[test]
    fn test_go_requires_trailing_sequence() {
        let f = Value::native("f", |_| Ok(Value::Nil));
        assert!(matches!(
            go(&[f, Value::Int(1)]),
            Err(EvalError::TypeMismatch { .. })
        ));
    }
}

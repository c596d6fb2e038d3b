// ABOUTME: Value types representing Parrot data structures and expressions

use crate::env::Env;
use crate::error::EvalError;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

/// Prefix code point marking a string as a keyword. Keywords are ordinary
/// strings under predicate tests; only printing and `keyword?` look at the
/// prefix.
pub const KEYWORD_PREFIX: char = '\u{29e}';

/// Signature every native (host-implemented) function satisfies. Registering
/// a built-in is inserting a name and one of these into the environment.
pub type NativeFunc = dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync;

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Sym(String),
    List(Arc<Vec<Value>>, Option<Arc<Value>>),
    Vector(Arc<Vec<Value>>, Option<Arc<Value>>),
    Map(Arc<RwLock<HashMap<String, Value>>>, Option<Arc<Value>>),
    Fn(NativeFn),
    Closure(Closure),
    Atom(Arc<Mutex<Value>>),
    Chan(Channel),
}

/// Host-implemented function plus its display name and metadata.
#[derive(Clone)]
pub struct NativeFn {
    pub name: String,
    pub func: Arc<NativeFunc>,
    pub meta: Option<Arc<Value>>,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").field("name", &self.name).finish()
    }
}

/// User-defined function produced by `fn` / `defmacro`, capturing its
/// definition environment.
#[derive(Debug, Clone)]
pub struct Closure {
    pub params: Arc<Value>,
    pub body: Arc<Value>,
    pub env: Arc<Env>,
    pub is_macro: bool,
    pub meta: Option<Arc<Value>>,
}

/// Bounded FIFO queue for inter-task value transfer. The sender lives behind
/// a closable slot: dropping it is what closes the queue.
#[derive(Debug, Clone)]
pub struct Channel {
    sender: Arc<Mutex<Option<Sender<Value>>>>,
    receiver: Receiver<Value>,
}

impl Channel {
    /// Capacity 0 is a synchronous rendezvous.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Channel {
            sender: Arc::new(Mutex::new(Some(sender))),
            receiver,
        }
    }

    /// Blocks while the queue is full. Fails once the channel is closed.
    pub fn send(&self, value: Value) -> Result<(), EvalError> {
        let sender = match self.sender.lock().unwrap().as_ref() {
            Some(sender) => sender.clone(),
            None => return Err(EvalError::ChannelClosed),
        };
        sender.send(value).map_err(|_| EvalError::ChannelClosed)
    }

    /// Blocks while the queue is empty. A closed, drained channel yields
    /// `Nil`.
    pub fn receive(&self) -> Value {
        self.receiver.recv().unwrap_or(Value::Nil)
    }

    pub fn close(&self) {
        self.sender.lock().unwrap().take();
    }

    pub fn same_channel(&self, other: &Channel) -> bool {
        Arc::ptr_eq(&self.sender, &other.sender)
    }
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Arc::new(items), None)
    }

    pub fn vector(items: Vec<Value>) -> Value {
        Value::Vector(Arc::new(items), None)
    }

    pub fn map(entries: HashMap<String, Value>) -> Value {
        Value::Map(Arc::new(RwLock::new(entries)), None)
    }

    pub fn sym(name: &str) -> Value {
        Value::Sym(name.to_string())
    }

    pub fn keyword(name: &str) -> Value {
        Value::Str(format!("{}{}", KEYWORD_PREFIX, name))
    }

    pub fn native<F>(name: &str, func: F) -> Value
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Value::Fn(NativeFn {
            name: name.to_string(),
            func: Arc::new(func),
            meta: None,
        })
    }

    /// Shared sequence view: lists and vectors expose the same payload.
    pub fn seq(&self) -> Option<&[Value]> {
        match self {
            Value::List(items, _) | Value::Vector(items, _) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, Value::Str(s) if s.starts_with(KEYWORD_PREFIX))
    }

    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(s) if s.starts_with(KEYWORD_PREFIX) => "keyword",
            Value::Str(_) => "string",
            Value::Sym(_) => "symbol",
            Value::List(..) => "list",
            Value::Vector(..) => "vector",
            Value::Map(..) => "map",
            Value::Fn(_) => "function",
            Value::Closure(c) => {
                if c.is_macro {
                    "macro"
                } else {
                    "function"
                }
            }
            Value::Atom(_) => "atom",
            Value::Chan(_) => "channel",
        }
    }

    /// Structural equality for composites, identity for atoms and channels.
    /// Lists and vectors compare element-wise against each other; every other
    /// cross-variant pair is unequal.
    pub fn equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Float(x), Value::Float(y)) => x == y,
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::Sym(x), Value::Sym(y)) => x == y,
            (Value::List(..) | Value::Vector(..), Value::List(..) | Value::Vector(..)) => {
                let (xs, ys) = (a.seq().unwrap_or(&[]), b.seq().unwrap_or(&[]));
                xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| Value::equal(x, y))
            }
            (Value::Map(x, _), Value::Map(y, _)) => {
                if Arc::ptr_eq(x, y) {
                    return true;
                }
                let (xs, ys) = (x.read().unwrap(), y.read().unwrap());
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .all(|(k, v)| ys.get(k).is_some_and(|w| Value::equal(v, w)))
            }
            (Value::Atom(x), Value::Atom(y)) => Arc::ptr_eq(x, y),
            (Value::Chan(x), Value::Chan(y)) => x.same_channel(y),
            _ => false,
        }
    }
}

/// Build map entries from a flat key/value sequence. Keys must be strings
/// (keywords included); callers wrap the message into their own error kind.
pub fn map_entries_from(items: &[Value]) -> Result<HashMap<String, Value>, String> {
    if items.len() % 2 == 1 {
        return Err("odd number of forms in map construction".to_string());
    }
    let mut entries = HashMap::with_capacity(items.len() / 2);
    for pair in items.chunks(2) {
        match &pair[0] {
            Value::Str(key) => {
                entries.insert(key.clone(), pair[1].clone());
            }
            other => {
                return Err(format!("map key must be a string, got {}", other.type_name()));
            }
        }
    }
    Ok(entries)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::printer::pr_str(self, true))
    }
}

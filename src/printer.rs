// ABOUTME: Deterministic textual rendering of values, readable and display modes

use crate::value::{Value, KEYWORD_PREFIX};

/// Render a slice of values joined between `start` and `end`. The printing
/// built-ins differ only in mode and join text, so they all funnel through
/// here.
pub fn pr_seq(items: &[Value], readably: bool, start: &str, end: &str, join: &str) -> String {
    let rendered: Vec<String> = items.iter().map(|item| pr_str(item, readably)).collect();
    format!("{}{}{}", start, rendered.join(join), end)
}

/// Render one value. Readable mode re-quotes strings so the reader can take
/// the output back; display mode emits raw string text.
pub fn pr_str(value: &Value, readably: bool) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Str(s) => {
            if let Some(name) = s.strip_prefix(KEYWORD_PREFIX) {
                format!(":{}", name)
            } else if readably {
                format!("\"{}\"", escape(s))
            } else {
                s.clone()
            }
        }
        Value::Sym(name) => name.clone(),
        Value::List(items, _) => pr_seq(items, readably, "(", ")", " "),
        Value::Vector(items, _) => pr_seq(items, readably, "[", "]", " "),
        Value::Map(entries, _) => {
            let entries = entries.read().unwrap();
            let rendered: Vec<String> = entries
                .iter()
                .map(|(key, val)| {
                    format!(
                        "{} {}",
                        pr_str(&Value::Str(key.clone()), readably),
                        pr_str(val, readably)
                    )
                })
                .collect();
            format!("{{{}}}", rendered.join(" "))
        }
        Value::Closure(c) => format!("(fn {} {})", pr_str(&c.params, true), pr_str(&c.body, true)),
        Value::Fn(f) => format!("<function {}>", f.name),
        Value::Atom(cell) => format!("(atom {})", pr_str(&cell.lock().unwrap(), true)),
        Value::Chan(_) => "<channel>".to_string(),
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

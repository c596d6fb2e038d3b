// ABOUTME: Reader module - nom tokenizer plus a recursive-descent form parser

use nom::{
    branch::alt,
    bytes::complete::{escaped, tag, take_while, take_while1},
    character::complete::{anychar, char, none_of, one_of},
    combinator::{opt, recognize, value},
    multi::many0,
    IResult, Parser,
};

use crate::error::EvalError;
use crate::value::{map_entries_from, Value};

// ============================================================================
// Tokenizer
// ============================================================================

/// Characters that terminate a symbol/number token. `~`, `^`, and `@` only
/// act as specials at the start of a token, so they are legal mid-symbol.
fn is_token_char(c: char) -> bool {
    !c.is_whitespace() && !"[]{}()'\"`,;".contains(c)
}

/// Commas count as whitespace; `;` comments run to end of line.
fn ws(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            value((), take_while1(|c: char| c.is_whitespace() || c == ',')),
            line_comment,
        ))),
    )
    .parse(input)
}

fn line_comment(input: &str) -> IResult<&str, ()> {
    let (input, _) = char(';')(input)?;
    let (input, _) = take_while(|c| c != '\n')(input)?;
    Ok((input, ()))
}

/// A double-quoted literal, quotes included. Any character may follow a
/// backslash; unrecognized escapes are resolved later, verbatim.
fn string_token(input: &str) -> IResult<&str, &str> {
    recognize((
        char('"'),
        opt(escaped(none_of("\\\""), '\\', anychar)),
        char('"'),
    ))
    .parse(input)
}

fn token(input: &str) -> IResult<&str, String> {
    let (input, _) = ws(input)?;
    let (input, tok) = alt((
        tag("~@"),
        recognize(one_of("[]{}()'`~^@")),
        string_token,
        take_while1(is_token_char),
    ))
    .parse(input)?;
    Ok((input, tok.to_string()))
}

fn tokenize(input: &str) -> Result<Vec<String>, EvalError> {
    let (rest, tokens) = many0(token)
        .parse(input)
        .map_err(|err| EvalError::Parse(format!("tokenizer failure: {:?}", err)))?;
    let rest = ws(rest).map(|(rest, _)| rest).unwrap_or(rest);
    if rest.starts_with('"') {
        return Err(EvalError::Parse("expected '\"', got EOF".to_string()));
    }
    if !rest.is_empty() {
        return Err(EvalError::Parse(format!(
            "unexpected character {:?} in input",
            rest.chars().next().unwrap_or(' ')
        )));
    }
    Ok(tokens)
}

// ============================================================================
// Form parser
// ============================================================================

struct TokenCursor {
    tokens: Vec<String>,
    position: usize,
}

impl TokenCursor {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.position).map(String::as_str)
    }

    fn next(&mut self) -> Option<String> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }
}

/// Parse one value from source text. `EmptyInput` when the tokenizer found
/// nothing; tokens past the first complete form are ignored.
pub fn read_str(input: &str) -> Result<Value, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::EmptyInput);
    }
    read_form(&mut TokenCursor { tokens, position: 0 })
}

fn read_form(r: &mut TokenCursor) -> Result<Value, EvalError> {
    let token = r
        .peek()
        .ok_or_else(|| EvalError::Parse("unexpected end of input".to_string()))?
        .to_string();
    match token.as_str() {
        "'" => read_wrapped(r, "quote"),
        "`" => read_wrapped(r, "quasiquote"),
        "~" => read_wrapped(r, "unquote"),
        "~@" => read_wrapped(r, "splice-unquote"),
        "@" => read_wrapped(r, "deref"),
        "^" => {
            r.next();
            let meta = read_form(r)?;
            let form = read_form(r)?;
            Ok(Value::list(vec![Value::sym("with-meta"), form, meta]))
        }
        "(" => Ok(Value::list(read_seq(r, ")")?)),
        "[" => Ok(Value::vector(read_seq(r, "]")?)),
        "{" => {
            let items = read_seq(r, "}")?;
            let entries = map_entries_from(&items).map_err(EvalError::Parse)?;
            Ok(Value::map(entries))
        }
        ")" | "]" | "}" => Err(EvalError::Parse(format!("unexpected '{}'", token))),
        _ => read_atom(r),
    }
}

fn read_wrapped(r: &mut TokenCursor, name: &str) -> Result<Value, EvalError> {
    r.next();
    let form = read_form(r)?;
    Ok(Value::list(vec![Value::sym(name), form]))
}

fn read_seq(r: &mut TokenCursor, end: &str) -> Result<Vec<Value>, EvalError> {
    r.next();
    let mut items = Vec::new();
    loop {
        match r.peek() {
            None => return Err(EvalError::Parse(format!("expected '{}', got EOF", end))),
            Some(token) if token == end => break,
            Some(_) => {}
        }
        items.push(read_form(r)?);
    }
    r.next();
    Ok(items)
}

fn read_atom(r: &mut TokenCursor) -> Result<Value, EvalError> {
    let token = r
        .next()
        .ok_or_else(|| EvalError::Parse("unexpected end of input".to_string()))?;
    if is_number_token(&token) {
        if let Ok(n) = token.parse::<i64>() {
            return Ok(Value::Int(n));
        }
        return token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| EvalError::Parse(format!("cannot parse number '{}'", token)));
    }
    if let Some(body) = token.strip_prefix('"') {
        let body = body.strip_suffix('"').unwrap_or(body);
        return Ok(Value::Str(unescape(body)));
    }
    if let Some(name) = token.strip_prefix(':') {
        return Ok(Value::keyword(name));
    }
    match token.as_str() {
        "nil" => Ok(Value::Nil),
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        _ => Ok(Value::Sym(token)),
    }
}

/// Optional sign, optional integer digits, then either remaining digits or a
/// dot followed by at least one digit. Everything else is a symbol.
fn is_number_token(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    match digits.split_once('.') {
        Some((int_part, frac_part)) => {
            !frac_part.is_empty()
                && int_part.bytes().all(|b| b.is_ascii_digit())
                && frac_part.bytes().all(|b| b.is_ascii_digit())
        }
        None => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

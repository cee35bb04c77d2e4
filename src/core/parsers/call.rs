//! Call-extent scanning for Python source.
//!
//! Finds the closing parenthesis of a call and splits its top-level
//! arguments, skipping over string literals, `#` comments and nested
//! brackets.

/// A top-level call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArg {
    /// Argument text with comments removed and whitespace trimmed.
    pub text: String,
    /// Byte offset where the raw argument starts.
    pub start: usize,
}

impl CallArg {
    /// `Some((name, value))` for `name=value` arguments.
    pub fn keyword(&self) -> Option<(&str, &str)> {
        let eq = self.text.find('=')?;
        let (name, rest) = self.text.split_at(eq);
        let value = &rest[1..];
        if value.starts_with('=') {
            return None;
        }
        let name = name.trim_end();
        let is_ident = !name.is_empty()
            && name.chars().all(|c| c.is_alphanumeric() || c == '_')
            && !name.starts_with(|c: char| c.is_ascii_digit());
        is_ident.then(|| (name, value.trim()))
    }
}

/// The scanned extent of a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExtent {
    /// Offset of the opening `(`.
    pub open: usize,
    /// Offset of the matching `)`.
    pub close: usize,
    pub args: Vec<CallArg>,
    /// Offset of the last byte inside the parens that is neither whitespace
    /// nor part of a comment.
    pub last_significant: Option<usize>,
}

impl CallExtent {
    pub fn positional(&self) -> impl Iterator<Item = &CallArg> {
        self.args.iter().filter(|arg| arg.keyword().is_none())
    }

    pub fn keyword(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .filter_map(CallArg::keyword)
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    Str { quote: u8, triple: bool },
    Comment,
}

/// Scan the call whose `(` is at `open`. Returns `None` if the call is not
/// terminated before the end of `text`.
pub fn scan_call(text: &str, open: usize) -> Option<CallExtent> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }

    let mut state = State::Code;
    let mut depth = 0usize;
    let mut args = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut current_start = open + 1;
    let mut last_significant = None;
    let mut i = open + 1;

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            State::Comment => {
                if b == b'\n' {
                    state = State::Code;
                    current.push(b);
                }
            }
            State::Str { quote, triple } => {
                current.push(b);
                if !b.is_ascii_whitespace() {
                    last_significant = Some(i);
                }
                if b == b'\\' {
                    if let Some(&next) = bytes.get(i + 1) {
                        current.push(next);
                        last_significant = Some(i + 1);
                        i += 2;
                        continue;
                    }
                } else if b == quote {
                    if !triple {
                        state = State::Code;
                    } else if bytes.get(i + 1) == Some(&quote) && bytes.get(i + 2) == Some(&quote) {
                        current.extend_from_slice(&[quote, quote]);
                        last_significant = Some(i + 2);
                        state = State::Code;
                        i += 3;
                        continue;
                    }
                }
            }
            State::Code => match b {
                b'#' => state = State::Comment,
                b'"' | b'\'' => {
                    let triple = bytes.get(i + 1) == Some(&b) && bytes.get(i + 2) == Some(&b);
                    last_significant = Some(i);
                    if triple {
                        current.extend_from_slice(&[b, b, b]);
                        last_significant = Some(i + 2);
                        state = State::Str { quote: b, triple };
                        i += 3;
                        continue;
                    }
                    current.push(b);
                    state = State::Str { quote: b, triple };
                }
                b'(' | b'[' | b'{' => {
                    depth += 1;
                    current.push(b);
                    last_significant = Some(i);
                }
                b')' | b']' | b'}' => {
                    if depth == 0 {
                        if b != b')' {
                            return None;
                        }
                        push_arg(&mut args, &current, current_start);
                        return Some(CallExtent {
                            open,
                            close: i,
                            args,
                            last_significant,
                        });
                    }
                    depth -= 1;
                    current.push(b);
                    last_significant = Some(i);
                }
                b',' if depth == 0 => {
                    push_arg(&mut args, &current, current_start);
                    current.clear();
                    current_start = i + 1;
                    last_significant = Some(i);
                }
                _ => {
                    current.push(b);
                    if !b.is_ascii_whitespace() {
                        last_significant = Some(i);
                    }
                }
            },
        }
        i += 1;
    }

    None
}

fn push_arg(args: &mut Vec<CallArg>, raw: &[u8], start: usize) {
    let text = String::from_utf8_lossy(raw).trim().to_string();
    if !text.is_empty() {
        args.push(CallArg { text, start });
    }
}

/// Value of a string literal such as `"User"` or `'users.id'`.
///
/// Prefixed (`f"..."`, `r"..."`) and implicitly concatenated literals are not
/// treated as plain strings.
pub fn string_literal(text: &str) -> Option<&str> {
    let text = text.trim();
    let quote = text.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let inner = text.strip_prefix(quote)?.strip_suffix(quote)?;
    (!inner.contains(quote)).then_some(inner)
}

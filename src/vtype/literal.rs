// Wed Oct 14 2026 - Alex

use super::VTypeError;
use serde_json::{Map, Number, Value};

const MAX_DEPTH: usize = 256;

/// Parser for literal data written in Python syntax: dicts, lists, tuples,
/// strings, numbers, `None`, `True` and `False`. The JSON spellings
/// `null`, `true` and `false` are accepted too, so JSON input parses as well.
pub struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    depth: usize,
}

impl LiteralParser {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            depth: 0,
        }
    }

    pub fn with_first_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Parses a whole input consisting of exactly one literal.
    pub fn parse_document(mut self) -> Result<Value, VTypeError> {
        let value = self.parse_value()?;
        self.skip_whitespace(true);
        if let Some(c) = self.peek() {
            return Err(self.error(format!("unexpected `{}` after value", c)));
        }
        Ok(value)
    }

    /// Parses the right-hand side of an assignment statement. The literal
    /// must be followed by the end of the statement.
    pub fn parse_assigned_value(mut self) -> Result<Value, VTypeError> {
        let value = self.parse_value()?;
        self.skip_whitespace(false);
        match self.peek() {
            None | Some('\n') | Some(';') => Ok(value),
            Some(c) => Err(self.error(format!("unexpected `{}` after value", c))),
        }
    }

    fn parse_value(&mut self) -> Result<Value, VTypeError> {
        self.skip_whitespace(self.depth > 0);

        let c = self.peek().ok_or_else(|| self.error("unexpected end of input"))?;
        match c {
            '{' => self.nested(Self::parse_dict),
            '[' => self.nested(Self::parse_list),
            '(' => self.nested(Self::parse_tuple),
            '\'' | '"' => self.parse_strings(false),
            '-' | '+' => {
                self.advance();
                self.skip_whitespace(false);
                self.parse_number(c == '-')
            }
            c if c.is_ascii_digit() => self.parse_number(false),
            '.' if matches!(self.peek_at(1), Some(d) if d.is_ascii_digit()) => self.parse_number(false),
            c if c.is_alphabetic() || c == '_' => self.parse_word(),
            c => Err(self.error(format!("unexpected `{}`", c))),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Result<Value, VTypeError>) -> Result<Value, VTypeError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_dict(&mut self) -> Result<Value, VTypeError> {
        self.expect('{')?;
        let mut map = Map::new();

        loop {
            self.skip_whitespace(true);
            if self.eat('}') {
                break;
            }

            let key = dict_key(self.parse_value()?);
            self.skip_whitespace(true);
            self.expect(':')?;
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace(true);
            if self.eat(',') {
                continue;
            }
            self.expect('}')?;
            break;
        }

        Ok(Value::Object(map))
    }

    fn parse_list(&mut self) -> Result<Value, VTypeError> {
        self.expect('[')?;
        let items = self.parse_items(']', Vec::new())?;
        Ok(Value::Array(items))
    }

    fn parse_tuple(&mut self) -> Result<Value, VTypeError> {
        self.expect('(')?;
        self.skip_whitespace(true);
        if self.eat(')') {
            return Ok(Value::Array(Vec::new()));
        }

        let first = self.parse_value()?;
        self.skip_whitespace(true);
        if self.eat(')') {
            // Parentheses around a single value group it, they do not make a tuple.
            return Ok(first);
        }
        self.expect(',')?;

        let items = self.parse_items(')', vec![first])?;
        Ok(Value::Array(items))
    }

    fn parse_items(&mut self, close: char, mut items: Vec<Value>) -> Result<Vec<Value>, VTypeError> {
        loop {
            self.skip_whitespace(true);
            if self.eat(close) {
                break;
            }

            items.push(self.parse_value()?);

            self.skip_whitespace(true);
            if self.eat(',') {
                continue;
            }
            self.expect(close)?;
            break;
        }
        Ok(items)
    }

    fn parse_word(&mut self) -> Result<Value, VTypeError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        if matches!(self.peek(), Some('\'') | Some('"')) && is_string_prefix(&word) {
            let raw = word.contains(['r', 'R']);
            return self.parse_strings(raw);
        }

        match word.as_str() {
            "None" | "null" => Ok(Value::Null),
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            _ => Err(self.error(format!("unexpected identifier `{}`", word))),
        }
    }

    /// Parses one string literal plus any adjacent ones, which concatenate.
    fn parse_strings(&mut self, raw: bool) -> Result<Value, VTypeError> {
        let mut text = self.parse_string(raw)?;

        loop {
            let save = (self.pos, self.line);
            self.skip_whitespace(self.depth > 0);

            match self.peek() {
                Some('\'') | Some('"') => text.push_str(&self.parse_string(false)?),
                Some(c) if c.is_alphabetic() => {
                    let start = self.pos;
                    while matches!(self.peek(), Some(c) if c.is_alphabetic()) {
                        self.advance();
                    }
                    let word: String = self.chars[start..self.pos].iter().collect();
                    if is_string_prefix(&word) && matches!(self.peek(), Some('\'') | Some('"')) {
                        let raw = word.contains(['r', 'R']);
                        text.push_str(&self.parse_string(raw)?);
                    } else {
                        (self.pos, self.line) = save;
                        break;
                    }
                }
                _ => {
                    (self.pos, self.line) = save;
                    break;
                }
            }
        }

        Ok(Value::String(text))
    }

    fn parse_string(&mut self, raw: bool) -> Result<String, VTypeError> {
        let quote = self.advance().ok_or_else(|| self.error("unexpected end of input"))?;
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.advance();
            self.advance();
        }

        let mut text = String::new();
        loop {
            let c = self.advance().ok_or_else(|| self.error("unterminated string"))?;

            if c == quote {
                if !triple {
                    break;
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.advance();
                    self.advance();
                    break;
                }
                text.push(c);
                continue;
            }

            match c {
                '\n' if !triple => return Err(self.error("newline in string")),
                '\\' if raw => {
                    text.push('\\');
                    if let Some(next) = self.advance() {
                        text.push(next);
                    }
                }
                '\\' => self.parse_escape(&mut text)?,
                c => text.push(c),
            }
        }

        Ok(text)
    }

    fn parse_escape(&mut self, text: &mut String) -> Result<(), VTypeError> {
        let c = self.advance().ok_or_else(|| self.error("unterminated string"))?;
        match c {
            '\n' => {}
            '\\' => text.push('\\'),
            '\'' => text.push('\''),
            '"' => text.push('"'),
            'n' => text.push('\n'),
            't' => text.push('\t'),
            'r' => text.push('\r'),
            '0' => text.push('\0'),
            'a' => text.push('\u{07}'),
            'b' => text.push('\u{08}'),
            'f' => text.push('\u{0c}'),
            'v' => text.push('\u{0b}'),
            'x' => text.push(self.parse_code_point(2)?),
            'u' => text.push(self.parse_code_point(4)?),
            'U' => text.push(self.parse_code_point(8)?),
            other => {
                text.push('\\');
                text.push(other);
            }
        }
        Ok(())
    }

    fn parse_code_point(&mut self, digits: usize) -> Result<char, VTypeError> {
        let mut value = 0u32;
        for _ in 0..digits {
            let digit = self.advance()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid escape sequence"))?;
            value = value * 16 + digit;
        }
        char::from_u32(value).ok_or_else(|| self.error("invalid code point"))
    }

    fn parse_number(&mut self, negative: bool) -> Result<Value, VTypeError> {
        let radix = match (self.peek(), self.peek_at(1)) {
            (Some('0'), Some('x' | 'X')) => 16,
            (Some('0'), Some('o' | 'O')) => 8,
            (Some('0'), Some('b' | 'B')) => 2,
            _ => 10,
        };

        if radix != 10 {
            self.advance();
            self.advance();
            let digits = self.take_while(|c| c.is_digit(radix) || c == '_');
            self.eat_long_suffix();
            return self.integer(&digits, radix, negative);
        }

        let mut text = self.take_while(|c| c.is_ascii_digit() || c == '_');
        let mut is_float = false;

        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            if text.is_empty() {
                text.push('0');
            }
            text.push('.');
            text.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.advance();
            text.push('e');
            if let Some(sign @ ('-' | '+')) = self.peek() {
                self.advance();
                text.push(sign);
            }
            text.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }

        if is_float {
            let value: f64 = text.replace('_', "").parse()
                .map_err(|_| self.error(format!("invalid number `{}`", text)))?;
            let value = if negative { -value } else { value };
            return Number::from_f64(value)
                .map(Value::Number)
                .ok_or_else(|| self.error("number out of range"));
        }

        self.eat_long_suffix();
        // Python 2 reads a leading zero as octal: `0777`.
        let radix = if text.len() > 1 && text.starts_with('0') { 8 } else { 10 };
        self.integer(&text, radix, negative)
    }

    fn integer(&self, digits: &str, radix: u32, negative: bool) -> Result<Value, VTypeError> {
        let digits = digits.replace('_', "");
        let magnitude = u64::from_str_radix(&digits, radix)
            .map_err(|_| self.error(format!("invalid integer `{}`", digits)))?;

        if !negative {
            return Ok(Value::from(magnitude));
        }
        if magnitude > i64::MAX as u64 + 1 {
            return Err(self.error("integer out of range"));
        }
        Ok(Value::from((magnitude as i128).wrapping_neg() as i64))
    }

    fn eat_long_suffix(&mut self) {
        if matches!(self.peek(), Some('L' | 'l')) {
            self.advance();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.advance();
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Skips blanks, comments and line continuations. Newlines are only
    /// skipped when `newlines` is set, i.e. inside brackets.
    fn skip_whitespace(&mut self, newlines: bool) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\x0c' => {
                    self.advance();
                }
                '\n' if newlines => {
                    self.advance();
                }
                '\\' if self.peek_at(1) == Some('\n') => {
                    self.advance();
                    self.advance();
                }
                '#' => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), VTypeError> {
        if self.eat(expected) {
            return Ok(());
        }
        match self.peek() {
            Some(c) => Err(self.error(format!("expected `{}`, found `{}`", expected, c))),
            None => Err(self.error(format!("expected `{}`, found end of input", expected))),
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> VTypeError {
        VTypeError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }
}

fn is_string_prefix(word: &str) -> bool {
    word.len() <= 2 && !word.is_empty() && word.chars().all(|c| matches!(c, 'r' | 'R' | 'u' | 'U' | 'b' | 'B'))
}

fn dict_key(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(source: &str) -> Result<Value, VTypeError> {
        LiteralParser::new(source).parse_document()
    }

    #[test]
    fn test_vtype_shapes() {
        let source = r#"{
            '_LIST_ENTRY' : [ 0x10, {
                'Flink' : [ 0x0, ['pointer64', ['_LIST_ENTRY']]], # forward
                'Blink' : [ 0x8, ['pointer64', ['_LIST_ENTRY']]],
            } ],
            'flags': (1, 2L, -3),
            "empty": (),
            'grouped': (5),
        }"#;

        assert_eq!(parse(source).unwrap(), json!({
            "_LIST_ENTRY": [16, {
                "Flink": [0, ["pointer64", ["_LIST_ENTRY"]]],
                "Blink": [8, ["pointer64", ["_LIST_ENTRY"]]],
            }],
            "flags": [1, 2, -3],
            "empty": [],
            "grouped": 5,
        }));
    }

    #[test]
    fn test_keywords_and_keys() {
        assert_eq!(parse("[None, True, False, null, true]").unwrap(), json!([null, true, false, null, true]));
        assert_eq!(parse("{0: 'A', 0x10: 'B'}").unwrap(), json!({"0": "A", "16": "B"}));
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse(r"'a\tb\x41\'c'").unwrap(), json!("a\tbA'c"));
        assert_eq!(parse(r"r'C:\path'").unwrap(), json!(r"C:\path"));
        assert_eq!(parse("'abc' \"def\"").unwrap(), json!("abcdef"));
        assert_eq!(parse("'''multi\nline'''").unwrap(), json!("multi\nline"));
        assert!(parse("'unterminated").is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse("0xffffffff81000000").unwrap(), json!(0xffffffff81000000u64));
        assert_eq!(parse("-0x10").unwrap(), json!(-16));
        assert_eq!(parse("0o17").unwrap(), json!(15));
        assert_eq!(parse("1.5e2").unwrap(), json!(150.0));
        assert!(parse("0x1ffffffffffffffff").is_err());
    }

    #[test]
    fn test_python2_numbers() {
        assert_eq!(parse("0777").unwrap(), json!(511));
        assert_eq!(parse("-010L").unwrap(), json!(-8));
        assert_eq!(parse("0").unwrap(), json!(0));
        assert_eq!(parse("00").unwrap(), json!(0));
        assert!(matches!(parse("089"), Err(VTypeError::Syntax { .. })));
        assert_eq!(parse(".5").unwrap(), json!(0.5));
        assert_eq!(parse("[-.25, 0.5]").unwrap(), json!([-0.25, 0.5]));
    }

    #[test]
    fn test_parses_json() {
        let source = r#"{"task_struct": [3264, {"pid": [1188, ["int"]]}], "ok": true}"#;
        assert_eq!(parse(source).unwrap(), json!({"task_struct": [3264, {"pid": [1188, ["int"]]}], "ok": true}));
    }

    #[test]
    fn test_rejects_code() {
        assert!(matches!(parse("open('x')"), Err(VTypeError::Syntax { .. })));
        assert!(matches!(parse("[1, 2] + [3]"), Err(VTypeError::Syntax { .. })));
    }

    #[test]
    fn test_error_reports_line() {
        let err = parse("{\n'a': 1,\n'b' 2}").unwrap_err();
        assert_eq!(err, VTypeError::Syntax { line: 3, message: "expected `:`, found `2`".to_string() });
    }
}

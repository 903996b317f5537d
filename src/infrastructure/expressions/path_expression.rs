//! Property-path expressions over messages

use std::sync::Arc;

use serde_json::Value;

use crate::domain::error::{EvaluationError, ExpressionSyntaxError};
use crate::domain::models::Message;
use crate::domain::ports::{Expression, ExpressionParser};

/// One navigation step of a path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `.name`
    Property(String),
    /// `[0]`
    Index(usize),
    /// `['name']` or `["name"]`
    Key(String),
}

/// Property path over the message root object `{ payload, headers }`
///
/// `payload`, `payload.features[0]`, `headers['content-type']`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    source: String,
    root: String,
    segments: Vec<Segment>,
}

impl PathExpression {
    /// First identifier, `payload` or `headers` for well-formed paths
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Steps after the root
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Expression for PathExpression {
    fn source_text(&self) -> &str {
        &self.source
    }

    fn evaluate(&self, message: &Message) -> Result<Value, EvaluationError> {
        let root = message.to_root();
        let mut path = String::from("message");
        let mut current = root.get(&self.root).ok_or_else(|| EvaluationError::PropertyNotFound {
            path: path.clone(),
            property: self.root.clone(),
        })?;
        path.clone_from(&self.root);

        let null = Value::Null;
        for segment in &self.segments {
            current = match (segment, current) {
                (Segment::Property(name), Value::Object(map)) => {
                    map.get(name).ok_or_else(|| EvaluationError::PropertyNotFound {
                        path: path.clone(),
                        property: name.clone(),
                    })?
                }
                (Segment::Key(key), Value::Object(map)) => map.get(key).unwrap_or(&null),
                (Segment::Index(index), Value::Array(items)) => {
                    items.get(*index).ok_or_else(|| EvaluationError::IndexOutOfBounds {
                        path: path.clone(),
                        index: *index,
                        len: items.len(),
                    })?
                }
                (segment, other) => {
                    return Err(EvaluationError::TypeMismatch {
                        path,
                        accessor: accessor_text(segment),
                        found: kind_of(other),
                    });
                }
            };
            path.push_str(&accessor_text(segment));
        }

        Ok(current.clone())
    }
}

fn accessor_text(segment: &Segment) -> String {
    match segment {
        Segment::Property(name) => format!(".{name}"),
        Segment::Index(index) => format!("[{index}]"),
        Segment::Key(key) => format!("['{key}']"),
    }
}

/// Parser for [`PathExpression`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct PathExpressionParser;

impl PathExpressionParser {
    /// Create a parser
    pub const fn new() -> Self {
        Self
    }

    /// Parse into the concrete expression type
    pub fn parse_path(&self, source: &str) -> Result<PathExpression, ExpressionSyntaxError> {
        Cursor::new(source).parse()
    }
}

impl ExpressionParser for PathExpressionParser {
    fn parse(&self, source: &str) -> Result<Arc<dyn Expression>, ExpressionSyntaxError> {
        Ok(Arc::new(self.parse_path(source)?))
    }
}

struct Cursor<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> ExpressionSyntaxError {
        ExpressionSyntaxError {
            expression: self.source.to_string(),
            position: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ExpressionSyntaxError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of expression"))),
        }
    }

    fn parse(mut self) -> Result<PathExpression, ExpressionSyntaxError> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(self.error("expression is empty"));
        }

        let root = self.identifier()?;
        let mut segments = Vec::new();

        loop {
            match self.peek() {
                None => break,
                Some('.') => {
                    self.pos += 1;
                    segments.push(Segment::Property(self.identifier()?));
                }
                Some('[') => {
                    self.pos += 1;
                    segments.push(self.bracket()?);
                }
                Some(c) if c.is_whitespace() => {
                    self.skip_whitespace();
                    if let Some(c) = self.peek() {
                        return Err(self.error(format!("unexpected character '{c}'")));
                    }
                }
                Some(c) => return Err(self.error(format!("unexpected character '{c}'"))),
            }
        }

        Ok(PathExpression {
            source: self.source.to_string(),
            root,
            segments,
        })
    }

    fn identifier(&mut self) -> Result<String, ExpressionSyntaxError> {
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
            Some(c) => return Err(self.error(format!("expected identifier, found '{c}'"))),
            None => return Err(self.error("expected identifier, found end of expression")),
        }

        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.pos += 1;
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn bracket(&mut self) -> Result<Segment, ExpressionSyntaxError> {
        self.skip_whitespace();
        let segment = match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.pos += 1;
                Segment::Key(self.quoted(quote)?)
            }
            Some(c) if c.is_ascii_digit() => Segment::Index(self.integer()?),
            Some(c) => return Err(self.error(format!("expected index or quoted key, found '{c}'"))),
            None => return Err(self.error("unterminated '['")),
        };
        self.skip_whitespace();
        self.expect(']')?;
        Ok(segment)
    }

    fn quoted(&mut self, quote: char) -> Result<String, ExpressionSyntaxError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == quote {
                let text = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                return Ok(text);
            }
            self.pos += 1;
        }
        Err(self.error("unterminated string literal"))
    }

    fn integer(&mut self) -> Result<usize, ExpressionSyntaxError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits.parse().map_err(|_| {
            self.pos = start;
            self.error(format!("index '{digits}' is too large"))
        })
    }
}

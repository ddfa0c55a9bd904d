//! Pull parser producing the shared token vocabulary for one JSON document.

use std::io::Read;

use crate::error::Result;
use crate::recognizer::{Token, TokenParser};

/// Token parser over a single JSON document.
///
/// The document is validated up front with `serde_json` and flattened into
/// an event sequence; `next_token` then replays it in document order
/// (`preserve_order` keeps object fields as written). Empty input parses to
/// an empty token stream rather than an error, so a recognizer can be asked
/// to build a parser over a drained source.
pub struct JsonTokenParser {
    tokens: std::vec::IntoIter<Token>,
}

impl JsonTokenParser {
    /// Parse a complete document held in memory.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        if data.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Self {
                tokens: Vec::new().into_iter(),
            });
        }
        let value: serde_json::Value = serde_json::from_slice(data)?;
        let mut tokens = Vec::new();
        flatten(&value, &mut tokens);
        Ok(Self {
            tokens: tokens.into_iter(),
        })
    }

    /// Parse a document from a reader, draining it to end-of-input.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_slice(&data)
    }
}

impl TokenParser for JsonTokenParser {
    fn next_token(&mut self) -> Result<Option<Token>> {
        Ok(self.tokens.next())
    }
}

fn flatten(value: &serde_json::Value, out: &mut Vec<Token>) {
    match value {
        serde_json::Value::Null => out.push(Token::NullValue),
        serde_json::Value::Bool(b) => out.push(Token::BoolValue(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                out.push(Token::IntValue(i));
            } else {
                // u64 beyond i64 range and fractions both land here
                out.push(Token::FloatValue(n.as_f64().unwrap_or(f64::NAN)));
            }
        }
        serde_json::Value::String(s) => out.push(Token::StringValue(s.clone())),
        serde_json::Value::Array(items) => {
            out.push(Token::StartArray);
            for item in items {
                flatten(item, out);
            }
            out.push(Token::EndArray);
        }
        serde_json::Value::Object(fields) => {
            out.push(Token::StartObject);
            for (name, field) in fields {
                out.push(Token::FieldName(name.clone()));
                flatten(field, out);
            }
            out.push(Token::EndObject);
        }
    }
}

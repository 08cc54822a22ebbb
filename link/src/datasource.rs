//! Datasource extraction from schema text.
//!
//! Only the `datasource <name> { ... }` block is understood here. Everything
//! else in the schema (models, enums, generators) is skipped by brace
//! balancing, so this never needs a full schema parser.

use crate::error::{DataProxyError, InvalidDatasourceReason, Result};
use reqwest::Url;
use std::collections::HashMap;

/// Host and credential of the remote query engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Equals,
    Comma,
    Other(char),
}

/// Value on the right-hand side of a datasource assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasourceValue {
    Literal(String),
    Env(String),
    /// Any other function call, e.g. `uuid()`.
    Call(String),
    Array,
    Ident(String),
}

/// A parsed `datasource` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasourceBlock {
    pub name: String,
    pub assignments: Vec<(String, DatasourceValue)>,
}

impl DatasourceBlock {
    pub fn get(&self, key: &str) -> Option<&DatasourceValue> {
        self.assignments.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The `provider` string literal, if any.
    pub fn provider(&self) -> Option<&str> {
        match self.get("provider") {
            Some(DatasourceValue::Literal(p)) => Some(p.as_str()),
            _ => None,
        }
    }
}

fn malformed() -> DataProxyError {
    InvalidDatasourceReason::NoDatasourceBlock.into()
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {},
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            },
            '"' => {
                let mut value = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                value.push(escaped);
                            }
                        },
                        '"' => {
                            closed = true;
                            break;
                        },
                        c => value.push(c),
                    }
                }
                if !closed {
                    return Err(malformed());
                }
                tokens.push(Token::Str(value));
            },
            '{' => tokens.push(Token::LBrace),
            '}' => tokens.push(Token::RBrace),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '[' => tokens.push(Token::LBracket),
            ']' => tokens.push(Token::RBracket),
            '=' => tokens.push(Token::Equals),
            ',' => tokens.push(Token::Comma),
            c if c.is_alphanumeric() || c == '_' => {
                let mut ident = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' || next == '-' || next == '.' {
                        ident.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            },
            other => tokens.push(Token::Other(other)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            _ => Err(malformed()),
        }
    }

    /// Walk top-level declarations and collect every datasource block.
    fn datasource_blocks(&mut self) -> Result<Vec<DatasourceBlock>> {
        let mut blocks = Vec::new();
        let mut depth = 0usize;

        while let Some(token) = self.next() {
            match token {
                Token::Ident(kw) if depth == 0 && kw == "datasource" => {
                    let name = match self.next() {
                        Some(Token::Ident(name)) => name,
                        _ => return Err(malformed()),
                    };
                    self.expect(Token::LBrace)?;
                    blocks.push(DatasourceBlock {
                        name,
                        assignments: self.block_body()?,
                    });
                },
                Token::LBrace => depth += 1,
                Token::RBrace => depth = depth.checked_sub(1).ok_or_else(malformed)?,
                _ => {},
            }
        }

        if depth != 0 {
            return Err(malformed());
        }
        Ok(blocks)
    }

    fn block_body(&mut self) -> Result<Vec<(String, DatasourceValue)>> {
        let mut assignments = Vec::new();
        loop {
            match self.next() {
                Some(Token::RBrace) => return Ok(assignments),
                Some(Token::Ident(key)) => {
                    self.expect(Token::Equals)?;
                    assignments.push((key, self.value()?));
                },
                _ => return Err(malformed()),
            }
        }
    }

    fn value(&mut self) -> Result<DatasourceValue> {
        match self.next() {
            Some(Token::Str(s)) => Ok(DatasourceValue::Literal(s)),
            Some(Token::LBracket) => {
                self.skip_until_closing(Token::LBracket, Token::RBracket)?;
                Ok(DatasourceValue::Array)
            },
            Some(Token::Ident(ident)) => {
                if self.peek() != Some(&Token::LParen) {
                    return Ok(DatasourceValue::Ident(ident));
                }
                self.next();
                if ident == "env" {
                    if let (Some(Token::Str(var)), Some(Token::RParen)) =
                        (self.peek().cloned(), self.tokens.get(self.pos + 1).cloned())
                    {
                        self.pos += 2;
                        return Ok(DatasourceValue::Env(var));
                    }
                    return Err(malformed());
                }
                self.skip_until_closing(Token::LParen, Token::RParen)?;
                Ok(DatasourceValue::Call(ident))
            },
            _ => Err(malformed()),
        }
    }

    fn skip_until_closing(&mut self, open: Token, close: Token) -> Result<()> {
        let mut depth = 1usize;
        while let Some(token) = self.next() {
            if token == open {
                depth += 1;
            } else if token == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            } else if token == Token::LBrace || token == Token::RBrace {
                break;
            }
        }
        Err(malformed())
    }
}

/// Parse the single `datasource` block of a schema.
pub fn parse_datasource(schema_text: &str) -> Result<DatasourceBlock> {
    let mut parser = Parser {
        tokens: tokenize(schema_text)?,
        pos: 0,
    };
    let mut blocks = parser.datasource_blocks()?;
    if blocks.len() != 1 {
        return Err(malformed());
    }
    Ok(blocks.remove(0))
}

/// Where `env("...")` indirections are looked up.
///
/// The process environment wins over the overlay, so a deployment can
/// always override what the hosting application passed in.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    overlay: HashMap<String, String>,
}

impl EnvSource {
    pub fn new(overlay: HashMap<String, String>) -> Self {
        Self { overlay }
    }

    pub fn get(&self, name: &str) -> Option<String> {
        std::env::var(name)
            .ok()
            .or_else(|| self.overlay.get(name).cloned())
    }
}

/// Resolve the raw datasource URL, following an `env(...)` indirection.
pub fn resolve_datasource_url(block: &DatasourceBlock, env: &EnvSource) -> Result<String> {
    match block.get("url") {
        Some(DatasourceValue::Literal(url)) => Ok(url.clone()),
        Some(DatasourceValue::Env(var)) => match env.get(var) {
            Some(url) if !url.trim().is_empty() => Ok(url.trim().to_string()),
            _ => Err(InvalidDatasourceReason::MissingUrl.into()),
        },
        _ => Err(InvalidDatasourceReason::MissingUrl.into()),
    }
}

/// Validate a `prisma://` URL and pull out host and API key.
pub fn parse_connection_url(raw: &str) -> Result<ConnectionTarget> {
    let url = Url::parse(raw).map_err(|_| InvalidDatasourceReason::UnparsableUrl)?;

    if url.scheme() != "prisma" {
        return Err(InvalidDatasourceReason::WrongProtocol(url.scheme().to_string()).into());
    }

    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) if !host.is_empty() => format!("{}:{}", host, port),
        (Some(host), None) if !host.is_empty() => host.to_string(),
        _ => return Err(InvalidDatasourceReason::MissingHost.into()),
    };

    let api_key = url
        .query_pairs()
        .find(|(key, _)| key == "api_key")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or(InvalidDatasourceReason::MissingApiKey)?;

    Ok(ConnectionTarget { host, api_key })
}

/// Resolve host and API key from schema text.
pub fn resolve_connection_target(schema_text: &str, env: &EnvSource) -> Result<ConnectionTarget> {
    let block = parse_datasource(schema_text)?;
    let url = resolve_datasource_url(&block, env)?;
    parse_connection_url(&url)
}

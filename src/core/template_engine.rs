// src/core/template_engine.rs
//! Page template engine.
//!
//! Understands the subset of Go template syntax that resume pages use:
//! field output (`{{.Name}}`, `{{.A.B}}`, `{{.}}`, `{{$.Name}}`), `if` and
//! `range` blocks with optional `else`, `{{/* comments */}}` and the `{{-`
//! / `-}}` whitespace trim markers. Output is HTML-escaped.

use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace};

use crate::core::FsOps;
use crate::error::SiteError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("line {line}: unclosed action, missing '}}}}'")]
    UnclosedAction { line: usize },

    #[error("line {line}: unclosed comment")]
    UnclosedComment { line: usize },

    #[error("line {line}: unexpected {{{{{keyword}}}}}")]
    Unexpected { keyword: &'static str, line: usize },

    #[error("line {line}: {{{{{keyword}}}}} block is never closed with {{{{end}}}}")]
    Unterminated { keyword: &'static str, line: usize },

    #[error("line {line}: unsupported action '{action}'")]
    UnknownAction { action: String, line: usize },

    #[error("line {line}: invalid field reference '{field}'")]
    InvalidField { field: String, line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("field '{field}' is not present in the data")]
    MissingField { field: String },

    #[error("cannot read field '{field}' from a {kind} value")]
    CannotIndex { field: String, kind: &'static str },

    #[error("cannot range over '{field}', a {kind} value")]
    NotIterable { field: String, kind: &'static str },
}

// ===== Template Model =====

#[derive(Debug, Clone, PartialEq)]
struct FieldPath {
    from_root: bool,
    segments: Vec<String>,
    source: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Field(FieldPath),
    If {
        cond: FieldPath,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    Range {
        list: FieldPath,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

/// Load and parse a template file
pub fn load_template(path: &Path) -> Result<Template, SiteError> {
    if !path.exists() {
        return Err(SiteError::Template {
            path: path.to_path_buf(),
            message: "file not found".to_string(),
        });
    }

    let source = FsOps::read_file_safe(path).map_err(|e| SiteError::Template {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let template = Template::parse(&source).map_err(|e| SiteError::template(path, e))?;
    debug!("Parsed template {} ({} bytes)", path.display(), source.len());
    Ok(template)
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let tokens = tokenize(source)?;
        let mut parser = Parser {
            tokens: tokens.into_iter(),
        };
        let (nodes, stop) = parser.parse_block()?;
        match stop {
            None => Ok(Self { nodes }),
            Some((Stop::End, line)) => Err(TemplateError::Unexpected {
                keyword: "end",
                line,
            }),
            Some((Stop::Else, line)) => Err(TemplateError::Unexpected {
                keyword: "else",
                line,
            }),
        }
    }

    pub fn render(&self, data: &Value) -> Result<String, RenderError> {
        let mut out = String::new();
        render_nodes(&self.nodes, data, data, &mut out)?;
        Ok(out)
    }
}

// ===== Lexing =====

#[derive(Debug)]
enum Token {
    Text(String),
    Action { body: String, line: usize },
}

fn tokenize(source: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut line = 1;
    let mut trim_next = false;

    while let Some(start) = rest.find("{{") {
        let mut text = &rest[..start];
        if trim_next {
            text = text.trim_start();
        }
        let after_open = &rest[start + 2..];
        let trim_before = after_open.starts_with("- ")
            || after_open.starts_with("-\n")
            || after_open.starts_with("-\t");
        if trim_before {
            text = text.trim_end();
        }
        if !text.is_empty() {
            tokens.push(Token::Text(text.to_string()));
        }
        line += rest[..start].matches('\n').count();

        let inner_start = if trim_before { 1 } else { 0 };
        let inner = &after_open[inner_start..];

        let (body, consumed) = if inner.trim_start().starts_with("/*") {
            let open = inner.find("/*").map(|i| i + 2).unwrap_or(0);
            let close = inner[open..]
                .find("*/")
                .map(|i| open + i)
                .ok_or(TemplateError::UnclosedComment { line })?;
            let tail = &inner[close + 2..];
            let end = tail
                .find("}}")
                .ok_or(TemplateError::UnclosedAction { line })?;
            (None, close + 2 + end)
        } else {
            let end = inner
                .find("}}")
                .ok_or(TemplateError::UnclosedAction { line })?;
            (Some(&inner[..end]), end)
        };

        let raw = &inner[..consumed];
        trim_next = raw.ends_with(" -") || raw.ends_with("\n-") || raw.ends_with("\t-");
        if let Some(body) = body {
            let body = if trim_next {
                &body[..body.len() - 1]
            } else {
                body
            };
            tokens.push(Token::Action {
                body: body.trim().to_string(),
                line,
            });
        }

        line += raw.matches('\n').count();
        rest = &inner[consumed + 2..];
    }

    let tail = if trim_next { rest.trim_start() } else { rest };
    if !tail.is_empty() {
        tokens.push(Token::Text(tail.to_string()));
    }
    Ok(tokens)
}

// ===== Parsing =====

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stop {
    End,
    Else,
}

struct Parser {
    tokens: std::vec::IntoIter<Token>,
}

impl Parser {
    /// Parse nodes until `{{end}}`, `{{else}}` or end of input
    fn parse_block(&mut self) -> Result<(Vec<Node>, Option<(Stop, usize)>), TemplateError> {
        let mut nodes = Vec::new();

        while let Some(token) = self.tokens.next() {
            let (body, line) = match token {
                Token::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Token::Action { body, line } => (body, line),
            };

            match keyword(&body) {
                ("end", "") => return Ok((nodes, Some((Stop::End, line)))),
                ("else", "") => return Ok((nodes, Some((Stop::Else, line)))),
                ("if", arg) => {
                    let cond = parse_field(arg, line)?;
                    let (then, otherwise) = self.parse_branches("if", line)?;
                    nodes.push(Node::If {
                        cond,
                        then,
                        otherwise,
                    });
                }
                ("range", arg) => {
                    let list = parse_field(arg, line)?;
                    let (body, otherwise) = self.parse_branches("range", line)?;
                    nodes.push(Node::Range {
                        list,
                        body,
                        otherwise,
                    });
                }
                _ if body.starts_with('.') || body.starts_with('$') => {
                    nodes.push(Node::Field(parse_field(&body, line)?));
                }
                _ => {
                    return Err(TemplateError::UnknownAction {
                        action: body.clone(),
                        line,
                    });
                }
            }
        }

        Ok((nodes, None))
    }

    fn parse_branches(
        &mut self,
        keyword: &'static str,
        line: usize,
    ) -> Result<(Vec<Node>, Vec<Node>), TemplateError> {
        let (first, stop) = self.parse_block()?;
        match stop {
            Some((Stop::End, _)) => Ok((first, Vec::new())),
            Some((Stop::Else, _)) => {
                let (second, stop) = self.parse_block()?;
                match stop {
                    Some((Stop::End, _)) => Ok((first, second)),
                    Some((Stop::Else, else_line)) => Err(TemplateError::Unexpected {
                        keyword: "else",
                        line: else_line,
                    }),
                    None => Err(TemplateError::Unterminated { keyword, line }),
                }
            }
            None => Err(TemplateError::Unterminated { keyword, line }),
        }
    }
}

fn keyword(body: &str) -> (&str, &str) {
    match body.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (body, ""),
    }
}

fn parse_field(text: &str, line: usize) -> Result<FieldPath, TemplateError> {
    let invalid = || TemplateError::InvalidField {
        field: text.to_string(),
        line,
    };

    let (from_root, path) = match text.strip_prefix('$') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let segments = match path {
        "" if from_root => Vec::new(),
        "." => Vec::new(),
        _ => {
            let rest = path.strip_prefix('.').ok_or_else(invalid)?;
            let segments: Vec<String> = rest.split('.').map(str::to_string).collect();
            let valid = segments.iter().all(|s| {
                !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
            });
            if !valid {
                return Err(invalid());
            }
            segments
        }
    };

    Ok(FieldPath {
        from_root,
        segments,
        source: text.to_string(),
    })
}

// ===== Rendering =====

fn render_nodes(
    nodes: &[Node],
    root: &Value,
    dot: &Value,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Field(path) => {
                let value = resolve(path, root, dot)?;
                out.push_str(&escape_html(&display_value(value)));
            }
            Node::If {
                cond,
                then,
                otherwise,
            } => {
                let branch = if is_truthy(resolve(cond, root, dot)?) {
                    then
                } else {
                    otherwise
                };
                render_nodes(branch, root, dot, out)?;
            }
            Node::Range {
                list,
                body,
                otherwise,
            } => {
                let items: Vec<&Value> = match resolve(list, root, dot)? {
                    Value::Array(items) => items.iter().collect(),
                    Value::Object(map) => map.values().collect(),
                    Value::Null => Vec::new(),
                    other => {
                        return Err(RenderError::NotIterable {
                            field: list.source.clone(),
                            kind: kind_of(other),
                        })
                    }
                };
                trace!("Ranging over {} ({} items)", list.source, items.len());

                if items.is_empty() {
                    render_nodes(otherwise, root, dot, out)?;
                }
                for item in items {
                    render_nodes(body, root, item, out)?;
                }
            }
        }
    }
    Ok(())
}

fn resolve<'a>(path: &FieldPath, root: &'a Value, dot: &'a Value) -> Result<&'a Value, RenderError> {
    let mut current = if path.from_root { root } else { dot };
    for segment in &path.segments {
        current = match current {
            Value::Object(map) => map.get(segment).ok_or_else(|| RenderError::MissingField {
                field: path.source.clone(),
            })?,
            other => {
                return Err(RenderError::CannotIndex {
                    field: path.source.clone(),
                    kind: kind_of(other),
                })
            }
        };
    }
    Ok(current)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(display_value).collect::<Vec<_>>().join(" ")
        ),
        Value::Object(map) => format!(
            "map[{}]",
            map.iter()
                .map(|(k, v)| format!("{}:{}", k, display_value(v)))
                .collect::<Vec<_>>()
                .join(" ")
        ),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

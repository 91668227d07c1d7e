//! Template parser.
//!
//! Supports plain text with substitutions and comments:
//!
//! ```text
//! Good {{ part_of_day | default("day") }}, {{ user.name | title }}!
//! {# comments are dropped #}
//! ```
//!
//! Grammar (informal):
//! ```text
//! template = (TEXT | "{{" expr "}}" | "{#" ANY "#}")*
//! expr     = primary ("|" filter)*
//! primary  = PATH | QUOTED_STRING | NUMBER
//! filter   = IDENT ["(" literal ")"]
//! PATH     = IDENT ("." IDENT)*
//! ```

use briefcast_core::TemplateError;
use serde_json::Value;

/// A parsed template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub(crate) nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Expr {
    pub primary: Primary,
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Primary {
    /// Dotted variable path, looked up in the render context.
    Var(String),
    Literal(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Filter {
    Upper,
    Lower,
    Title,
    Trim,
    /// Replaces an undefined or null value.
    Default(Value),
}

impl Filter {
    fn from_parts(name: &str, arg: Option<Value>, offset: usize) -> Result<Self, TemplateError> {
        let has_arg = arg.is_some();
        let no_arg = |filter: Filter| match has_arg {
            false => Ok(filter),
            true => Err(TemplateError::InvalidFilterArgument {
                filter: name.to_string(),
                reason: format!("takes no arguments (at offset {offset})"),
            }),
        };
        match name {
            "upper" => no_arg(Filter::Upper),
            "lower" => no_arg(Filter::Lower),
            "title" => no_arg(Filter::Title),
            "trim" => no_arg(Filter::Trim),
            "default" => arg.map(Filter::Default).ok_or_else(|| {
                TemplateError::InvalidFilterArgument {
                    filter: name.to_string(),
                    reason: format!("requires a fallback value (at offset {offset})"),
                }
            }),
            other => Err(TemplateError::UnknownFilter(other.to_string())),
        }
    }
}

/// Parse template source into a [`Template`].
pub fn parse_template(source: &str) -> Result<Template, TemplateError> {
    let mut nodes = Vec::new();
    let mut text = String::new();
    let mut pos = 0;

    while let Some(ch) = source[pos..].chars().next() {
        let rest = &source[pos..];
        if rest.starts_with("{{") {
            if !text.is_empty() {
                nodes.push(Node::Text(std::mem::take(&mut text)));
            }
            let start = pos + 2;
            let (tokens, end) = tokenize_expr(source, start)?;
            nodes.push(Node::Expr(parse_expr(&tokens, start)?));
            pos = end;
        } else if rest.starts_with("{#") {
            match rest[2..].find("#}") {
                Some(idx) => pos += idx + 4,
                None => return Err(syntax(pos, "unclosed comment")),
            }
        } else {
            text.push(ch);
            pos += ch.len_utf8();
        }
    }

    if !text.is_empty() {
        nodes.push(Node::Text(text));
    }
    Ok(Template { nodes })
}

fn syntax(offset: usize, reason: impl Into<String>) -> TemplateError {
    TemplateError::Syntax {
        offset,
        reason: reason.into(),
    }
}

/// Token types inside `{{ ... }}`.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Literal(Value),
    Pipe,
    LParen,
    RParen,
}

/// Tokenize an expression starting at `start`, up to the closing `}}`.
///
/// Returns the tokens and the offset just past the closing braces.
fn tokenize_expr(source: &str, start: usize) -> Result<(Vec<Token>, usize), TemplateError> {
    let mut tokens = Vec::new();
    let mut chars = source[start..].char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        let offset = start + i;
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '}' => {
                chars.next();
                if matches!(chars.peek(), Some((_, '}'))) {
                    return Ok((tokens, offset + 2));
                }
                return Err(syntax(offset, "expected '}}'"));
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '"' | '\'' => {
                let quote = c;
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some((_, '\\')) => {
                            if let Some((_, escaped)) = chars.next() {
                                s.push(escaped);
                            }
                        }
                        Some((_, ch)) if ch == quote => break,
                        Some((_, ch)) => s.push(ch),
                        None => return Err(syntax(offset, "unterminated string literal")),
                    }
                }
                tokens.push(Token::Literal(Value::String(s)));
            }
            _ if c.is_ascii_digit() || c == '-' => {
                let mut num_str = String::new();
                num_str.push(c);
                chars.next();
                while let Some(&(_, nc)) = chars.peek() {
                    if nc.is_ascii_digit() || nc == '.' {
                        num_str.push(nc);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Literal(parse_number(&num_str, offset)?));
            }
            _ if c.is_alphanumeric() || c == '_' => {
                let mut word = String::new();
                while let Some(&(_, wc)) = chars.peek() {
                    if wc.is_alphanumeric() || wc == '_' || wc == '.' {
                        word.push(wc);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if word.split('.').any(str::is_empty) {
                    return Err(syntax(offset, format!("invalid variable path: {word}")));
                }
                tokens.push(Token::Ident(word));
            }
            _ => return Err(syntax(offset, format!("unexpected character: {c}"))),
        }
    }

    Err(syntax(start, "unclosed expression, expected '}}'"))
}

fn parse_number(num_str: &str, offset: usize) -> Result<Value, TemplateError> {
    if let Ok(n) = num_str.parse::<i64>() {
        return Ok(Value::from(n));
    }
    num_str
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| syntax(offset, format!("invalid number: {num_str}")))
}

fn parse_expr(tokens: &[Token], offset: usize) -> Result<Expr, TemplateError> {
    let (primary, mut rest) = match tokens.split_first() {
        Some((Token::Ident(path), rest)) => (Primary::Var(path.clone()), rest),
        Some((Token::Literal(value), rest)) => (Primary::Literal(value.clone()), rest),
        Some((other, _)) => {
            return Err(syntax(offset, format!("expected value, got {other:?}")));
        }
        None => return Err(syntax(offset, "empty expression")),
    };

    let mut filters = Vec::new();
    while let Some((Token::Pipe, after_pipe)) = rest.split_first() {
        let (filter, remaining) = parse_filter(after_pipe, offset)?;
        filters.push(filter);
        rest = remaining;
    }

    if let Some(token) = rest.first() {
        return Err(syntax(offset, format!("unexpected token: {token:?}")));
    }
    Ok(Expr { primary, filters })
}

fn parse_filter(tokens: &[Token], offset: usize) -> Result<(Filter, &[Token]), TemplateError> {
    let (name, rest) = match tokens.split_first() {
        Some((Token::Ident(name), rest)) => (name, rest),
        other => {
            return Err(syntax(
                offset,
                format!("expected filter name, got {:?}", other.map(|(t, _)| t)),
            ));
        }
    };

    match rest {
        [Token::LParen, Token::Literal(arg), Token::RParen, rest @ ..] => {
            Ok((Filter::from_parts(name, Some(arg.clone()), offset)?, rest))
        }
        [Token::LParen, ..] => Err(syntax(
            offset,
            format!("filter {name} expects a single literal argument"),
        )),
        _ => Ok((Filter::from_parts(name, None, offset)?, rest)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_text_and_substitution() {
        let template = parse_template("Hello {{ name }}!").unwrap();
        assert_eq!(
            template.nodes,
            vec![
                Node::Text("Hello ".into()),
                Node::Expr(Expr {
                    primary: Primary::Var("name".into()),
                    filters: vec![],
                }),
                Node::Text("!".into()),
            ]
        );
    }

    #[test]
    fn parses_filter_chain() {
        let template = parse_template(r#"{{ user.name | default("friend") | upper }}"#).unwrap();
        let Node::Expr(expr) = &template.nodes[0] else {
            panic!("expected expression node");
        };
        assert_eq!(expr.primary, Primary::Var("user.name".into()));
        assert_eq!(
            expr.filters,
            vec![Filter::Default(json!("friend")), Filter::Upper]
        );
    }

    #[test]
    fn drops_comments() {
        let template = parse_template("a{# hidden #}b").unwrap();
        assert_eq!(
            template.nodes,
            vec![Node::Text("a".into()), Node::Text("b".into())]
        );
    }

    #[test]
    fn parses_number_literals() {
        let template = parse_template("{{ 42 }}{{ -1.5 }}").unwrap();
        assert_eq!(template.nodes.len(), 2);
        let Node::Expr(expr) = &template.nodes[1] else {
            panic!("expected expression node");
        };
        assert_eq!(expr.primary, Primary::Literal(json!(-1.5)));
    }

    #[test]
    fn keeps_braces_inside_strings() {
        let template = parse_template(r#"{{ "}}" }}"#).unwrap();
        let Node::Expr(expr) = &template.nodes[0] else {
            panic!("expected expression node");
        };
        assert_eq!(expr.primary, Primary::Literal(json!("}}")));
    }

    #[test]
    fn rejects_malformed_templates() {
        assert!(matches!(
            parse_template("{{ name"),
            Err(TemplateError::Syntax { .. })
        ));
        assert!(matches!(
            parse_template("{{ }}"),
            Err(TemplateError::Syntax { .. })
        ));
        assert!(matches!(
            parse_template("{# never closed"),
            Err(TemplateError::Syntax { .. })
        ));
        assert!(matches!(
            parse_template("{{ a b }}"),
            Err(TemplateError::Syntax { .. })
        ));
        assert!(matches!(
            parse_template("{{ a..b }}"),
            Err(TemplateError::Syntax { .. })
        ));
    }

    #[test]
    fn rejects_bad_filters() {
        assert_eq!(
            parse_template("{{ a | shout }}"),
            Err(TemplateError::UnknownFilter("shout".into()))
        );
        assert!(matches!(
            parse_template("{{ a | default }}"),
            Err(TemplateError::InvalidFilterArgument { .. })
        ));
        assert!(matches!(
            parse_template(r#"{{ a | upper("x") }}"#),
            Err(TemplateError::InvalidFilterArgument { .. })
        ));
    }

    #[test]
    fn single_braces_are_text() {
        let template = parse_template("{ not a template }").unwrap();
        assert_eq!(
            template.nodes,
            vec![Node::Text("{ not a template }".into())]
        );
    }
}

//! Parser for signatures embedded in documentation text.
//!
//! Native extension modules built without reflection metadata describe their
//! callables in the first line of the documentation string:
//!
//! ```text
//! scale(arg0: int, arg1: float) -> int
//!
//! Scale an integer, kinda.
//! ```
//!
//! Overloaded functions use a fixed header followed by numbered blocks:
//!
//! ```text
//! f(*args, **kwargs)
//! Overloaded function.
//!
//! 1. f(a: int) -> int
//!
//! 2. f(a: str) -> str
//! ```
//!
//! # Grammar
//!
//! ```text
//! signature := name '(' (arg (', ' arg)*)? ')' (' -> ' type)? ('\n' ('\n' summary)?)?
//! arg       := arg-name (': ' type)? ('=' default)?
//! type      := type-token ('[' (type (', ' type)*)? ']')?
//! ```
//!
//! Every type token is rewritten through the [`NameMapping`].
//!
//! # Failure policy
//!
//! A signature containing characters the grammar does not expect (C++ template
//! syntax leaking into type names is the usual cause) is not an error: the
//! result degrades to a single `…` parameter with no return type, keeping the
//! summary if one follows the first blank line, and a warning is logged.
//! Input that ends in the middle of an argument list or a bracketed type, or
//! that has no opening parenthesis, breaks the grammar itself and is reported
//! as a [`SignatureError`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::docstring;
use crate::mapping::NameMapping;

static NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]*").unwrap());
static ARG_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[*a-zA-Z0-9_]+").unwrap());
static TYPE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.]+").unwrap());
// No nesting awareness, a default containing `,` or `)` is cut short.
static DEFAULT_VALUE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^,)]+").unwrap());

/// Placeholder parameter name of a signature that could not be parsed.
pub const ELLIPSIS: &str = "…";

static ELLIPSIS_PARAMS: LazyLock<[ParsedParam; 1]> = LazyLock::new(|| {
    [ParsedParam {
        name: ELLIPSIS.to_owned(),
        type_name: None,
        default: None,
    }]
});

/// Structural violation of the signature grammar.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The name is not followed by `(`.
    #[error("Signature {0:?} has no opening parenthesis")]
    MissingParenthesis(String),
    /// Input ended inside an argument list or a bracketed type.
    #[error("Signature {0:?} ends prematurely")]
    UnexpectedEnd(String),
    /// An overload block does not start with the expected `N. name(` marker.
    #[error("Expected overload marker {expected:?} at {found:?}")]
    OverloadMarker {
        /// Marker that should have started the block.
        expected: String,
        /// First line of the text found instead.
        found: String,
    },
    /// An overload block documents a different function.
    #[error("Overload {index} is named {found:?} instead of {expected:?}")]
    OverloadName {
        /// One-based overload number.
        index: usize,
        /// Name from the overload header.
        expected: String,
        /// Name parsed from the block.
        found: String,
    },
}

/// One parameter of a parsed signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedParam {
    /// Parameter name, including `*`/`**` for variadic parameters.
    pub name: String,
    /// Mapped type, if annotated.
    pub type_name: Option<String>,
    /// Default value text, verbatim.
    pub default: Option<String>,
}

/// Shape of a parsed signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureForm {
    /// Every part of the signature was understood.
    Exact {
        params: Vec<ParsedParam>,
        return_type: Option<String>,
    },
    /// The argument list could not be parsed and is shown as `…`.
    Ellipsis,
}

/// Result of parsing one signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedSignature {
    /// Function name, empty for anonymous signatures such as property getters.
    pub name: String,
    /// HTML-escaped first paragraph of the text after the signature.
    pub summary: String,
    pub form: SignatureForm,
}

impl ParsedSignature {
    /// Parameters; a single `…` parameter for degraded signatures.
    #[must_use]
    pub fn params(&self) -> &[ParsedParam] {
        match &self.form {
            SignatureForm::Exact { params, .. } => params,
            SignatureForm::Ellipsis => &ELLIPSIS_PARAMS[..],
        }
    }

    #[must_use]
    pub fn return_type(&self) -> Option<&str> {
        match &self.form {
            SignatureForm::Exact { return_type, .. } => return_type.as_deref(),
            SignatureForm::Ellipsis => None,
        }
    }

    #[must_use]
    pub fn is_ellipsis(&self) -> bool {
        matches!(self.form, SignatureForm::Ellipsis)
    }
}

/// Writes the signature line back in grammar form, without the summary.
impl fmt::Display for ParsedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&param.name)?;
            if let Some(type_name) = &param.type_name {
                write!(f, ": {type_name}")?;
            }
            if let Some(default) = &param.default {
                write!(f, "={default}")?;
            }
        }
        f.write_str(")")?;
        if let Some(return_type) = self.return_type() {
            write!(f, " -> {return_type}")?;
        }
        Ok(())
    }
}

/// Why a parse step stopped.
enum Fault {
    /// Unexpected character; the signature degrades.
    Malformed,
    /// Input ran out.
    Truncated,
}

type Step<T> = Result<T, Fault>;

struct Cursor<'s> {
    rest: &'s str,
}

impl<'s> Cursor<'s> {
    fn new(text: &'s str) -> Self {
        Self { rest: text }
    }

    /// Consume the longest prefix matched by an anchored rule.
    fn take(&mut self, rule: &Regex) -> &'s str {
        let len = rule.find(self.rest).map_or(0, |m| m.end());
        let (matched, rest) = self.rest.split_at(len);
        self.rest = rest;
        matched
    }

    /// Consume a non-empty token, failing according to what follows.
    fn take_token(&mut self, rule: &Regex) -> Step<&'s str> {
        let token = self.take(rule);
        if !token.is_empty() {
            Ok(token)
        } else if self.rest.is_empty() {
            Err(Fault::Truncated)
        } else {
            Err(Fault::Malformed)
        }
    }

    fn eat(&mut self, literal: &str) -> bool {
        match self.rest.strip_prefix(literal) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    /// Consume `literal`, telling a cut-off input from a wrong one.
    fn expect(&mut self, literal: &str) -> Step<()> {
        if self.eat(literal) {
            Ok(())
        } else if literal.starts_with(self.rest) {
            Err(Fault::Truncated)
        } else {
            Err(Fault::Malformed)
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Like [`peek`](Self::peek), but running out of input is a fault.
    fn peek_required(&self) -> Step<char> {
        self.peek().ok_or(Fault::Truncated)
    }
}

fn parse_type(cursor: &mut Cursor<'_>, mapping: &NameMapping) -> Step<String> {
    let token = cursor.take_token(&TYPE_TOKEN)?;
    let mut type_name = mapping.map(token).into_owned();

    if cursor.eat("[") {
        type_name.push('[');
        while cursor.peek_required()? != ']' {
            type_name.push_str(&parse_type(cursor, mapping)?);
            if cursor.peek_required()? == ']' {
                break;
            }
            cursor.expect(", ")?;
            type_name.push_str(", ");
        }
        cursor.expect("]")?;
        type_name.push(']');
    }

    Ok(type_name)
}

/// Everything after the opening parenthesis up to the end of the signature
/// line.
fn parse_arguments_and_return(
    cursor: &mut Cursor<'_>,
    mapping: &NameMapping,
) -> Step<(Vec<ParsedParam>, Option<String>)> {
    let mut params = Vec::new();

    while cursor.peek_required()? != ')' {
        let name = cursor.take_token(&ARG_NAME)?.to_owned();

        let type_name = if cursor.eat(": ") {
            Some(parse_type(cursor, mapping)?)
        } else {
            None
        };

        let default = if cursor.eat("=") {
            Some(cursor.take_token(&DEFAULT_VALUE)?.to_owned())
        } else {
            None
        };

        params.push(ParsedParam {
            name,
            type_name,
            default,
        });

        if cursor.peek_required()? == ')' {
            break;
        }
        cursor.expect(", ")?;
    }
    cursor.expect(")")?;

    let return_type = if cursor.eat(" -> ") {
        Some(parse_type(cursor, mapping)?)
    } else {
        None
    };

    if cursor.peek().is_some_and(|c| c != '\n') {
        return Err(Fault::Malformed);
    }

    Ok((params, return_type))
}

/// Parse a single signature followed by optional documentation.
///
/// ```
/// use refdoc_site::{NameMapping, parse_signature};
///
/// let parsed = parse_signature("thingy(self, count: int=3) -> str\n\nDoes a thing.", &NameMapping::new()).unwrap();
/// assert_eq!(parsed.name, "thingy");
/// assert_eq!(parsed.params().len(), 2);
/// assert_eq!(parsed.return_type(), Some("str"));
/// assert_eq!(parsed.summary, "Does a thing.");
/// ```
pub fn parse_signature(
    text: &str,
    mapping: &NameMapping,
) -> Result<ParsedSignature, SignatureError> {
    let mut cursor = Cursor::new(text);
    let name = cursor.take(&NAME).to_owned();
    if !cursor.eat("(") {
        return Err(SignatureError::MissingParenthesis(first_line(text).to_owned()));
    }

    match parse_arguments_and_return(&mut cursor, mapping) {
        Ok((params, return_type)) => {
            let summary = match cursor.rest.strip_prefix("\n\n") {
                Some(doc) => docstring::summary(Some(doc)),
                None => String::new(),
            };
            Ok(ParsedSignature {
                name,
                summary,
                form: SignatureForm::Exact {
                    params,
                    return_type,
                },
            })
        }
        Err(Fault::Malformed) => {
            tracing::warn!(
                signature = first_line(text),
                "Cannot parse native function signature, showing it as an ellipsis"
            );
            Ok(ParsedSignature {
                name,
                summary: degraded_summary(text),
                form: SignatureForm::Ellipsis,
            })
        }
        Err(Fault::Truncated) => Err(SignatureError::UnexpectedEnd(first_line(text).to_owned())),
    }
}

/// Parse the documentation of a reflection-less function.
///
/// Returns one entry per overload, in overload order, or a single entry for
/// a function without overloads.
pub fn parse_docstring(
    name: &str,
    doc: &str,
    mapping: &NameMapping,
) -> Result<Vec<ParsedSignature>, SignatureError> {
    let header = format!("{name}(*args, **kwargs)\nOverloaded function.\n\n");
    let Some(mut rest) = doc.strip_prefix(header.as_str()) else {
        return Ok(vec![parse_signature(doc, mapping)?]);
    };

    let mut overloads = Vec::new();
    let mut index = 1;
    loop {
        let Some(block) = rest.strip_prefix(&format!("{index}. ")) else {
            return Err(SignatureError::OverloadMarker {
                expected: overload_marker(index, name),
                found: first_line(rest).to_owned(),
            });
        };

        let next = block.find(&overload_marker(index + 1, name));
        let parsed = parse_signature(&block[..next.unwrap_or(block.len())], mapping)?;
        if parsed.name != name {
            return Err(SignatureError::OverloadName {
                index,
                expected: name.to_owned(),
                found: parsed.name,
            });
        }
        overloads.push(parsed);

        match next {
            Some(offset) => {
                rest = &block[offset..];
                index += 1;
            }
            None => return Ok(overloads),
        }
    }
}

fn overload_marker(index: usize, name: &str) -> String {
    format!("{index}. {name}(")
}

fn first_line(text: &str) -> &str {
    text.split('\n').next().unwrap_or_default()
}

/// Summary of a signature that failed to parse: the first paragraph after a
/// blank line following the signature line, if there is one.
fn degraded_summary(text: &str) -> String {
    match text.split_once('\n') {
        Some((_, after)) if after.starts_with('\n') => docstring::summary(Some(after)),
        _ => String::new(),
    }
}

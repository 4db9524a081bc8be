//! Template parsing and Cartesian expansion.
//!
//! A template is a single config line that may reference other variables.
//! Every referenced variable can stand for several values (list-valued
//! variables such as `PATH`), so expanding a template yields one string per
//! combination of values.
//!
//! # Token Grammar
//!
//! - `$$` - a literal `$`
//! - `$name` - reference; `name` is `[A-Za-z_][A-Za-z0-9_]*`
//! - `${name}` - reference; `name` is `.?[A-Za-z_][A-Za-z0-9_.]*`
//!
//! Any other use of `$`, including a trailing `$`, is an error.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use sysenv_lib::template::Template;
//!
//! let candidates = HashMap::from([
//!   ("a".to_string(), vec!["1".to_string(), "2".to_string()]),
//!   ("b".to_string(), vec!["x".to_string()]),
//! ]);
//! let template = Template::parse("$a-${b}-$$").unwrap();
//! assert_eq!(template.expand(&candidates).unwrap(), vec!["1-x-$", "2-x-$"]);
//! ```

use std::collections::{BTreeSet, HashMap};
use std::hash::BuildHasher;
use std::iter::Peekable;
use std::str::CharIndices;

use indexmap::IndexMap;
use thiserror::Error;

/// A token of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
  /// Literal text, copied through unchanged.
  Literal(String),

  /// `$$`, rendered as a single `$`.
  Escape,

  /// `$name` or `${name}`.
  Reference(String),
}

/// Errors that can occur while parsing or expanding a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
  #[error("unrecognized variable definition in '{template}'")]
  Unrecognized { template: String },

  #[error("no candidate values for variable '{name}'")]
  MissingCandidates { name: String },
}

/// Source of candidate values for referenced variables.
pub trait Candidates {
  /// Candidate values for `name`, or `None` if the name is unknown.
  fn candidates(&self, name: &str) -> Option<&[String]>;
}

impl<S: BuildHasher> Candidates for HashMap<String, Vec<String>, S> {
  fn candidates(&self, name: &str) -> Option<&[String]> {
    self.get(name).map(Vec::as_slice)
  }
}

impl<S: BuildHasher> Candidates for IndexMap<String, Vec<String>, S> {
  fn candidates(&self, name: &str) -> Option<&[String]> {
    self.get(name).map(Vec::as_slice)
  }
}

/// A parsed template line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  source: String,
  tokens: Vec<Token>,
}

impl Template {
  /// Parse a template string.
  ///
  /// # Errors
  ///
  /// Returns [`TemplateError::Unrecognized`] naming the template if it contains
  /// a `$` that does not start an escape or a reference.
  pub fn parse(source: &str) -> Result<Self, TemplateError> {
    let unrecognized = || TemplateError::Unrecognized {
      template: source.to_string(),
    };

    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
      if ch != '$' {
        literal.push(ch);
        continue;
      }

      let token = match chars.peek() {
        Some(&(_, '$')) => {
          chars.next();
          Token::Escape
        }
        Some(&(start, c)) if is_name_start(c) => Token::Reference(take_while(source, start, &mut chars, is_name_char)),
        Some(&(_, '{')) => {
          chars.next();
          let name = scan_braced_name(source, &mut chars).ok_or_else(unrecognized)?;
          Token::Reference(name)
        }
        _ => return Err(unrecognized()),
      };

      if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(&mut literal)));
      }
      tokens.push(token);
    }

    if !literal.is_empty() {
      tokens.push(Token::Literal(literal));
    }

    Ok(Self {
      source: source.to_string(),
      tokens,
    })
  }

  /// The original template text.
  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn tokens(&self) -> &[Token] {
    &self.tokens
  }

  /// Distinct referenced names, in order of first appearance.
  pub fn references(&self) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for token in &self.tokens {
      if let Token::Reference(name) = token
        && !names.contains(&name.as_str())
      {
        names.push(name);
      }
    }
    names
  }

  /// Render the template once, substituting from `assignment`.
  ///
  /// Names missing from `assignment` render as the empty string.
  pub fn render(&self, assignment: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(self.source.len());
    for token in &self.tokens {
      match token {
        Token::Literal(text) => out.push_str(text),
        Token::Escape => out.push('$'),
        Token::Reference(name) => out.push_str(assignment.get(name.as_str()).copied().unwrap_or("")),
      }
    }
    out
  }

  /// Expand the template over the Cartesian product of its references' candidates.
  ///
  /// Variables are combined in order of first appearance; the last one varies
  /// fastest. A template without references yields exactly one string.
  ///
  /// # Errors
  ///
  /// Returns [`TemplateError::MissingCandidates`] if a referenced name has no
  /// candidate values. Callers are expected to supply at least one (possibly
  /// empty) value per referenced name.
  pub fn expand(&self, candidates: &impl Candidates) -> Result<Vec<String>, TemplateError> {
    let names = self.references();

    let mut assignments: Vec<Vec<&str>> = vec![Vec::new()];
    for name in &names {
      let values = candidates
        .candidates(name)
        .filter(|values| !values.is_empty())
        .ok_or_else(|| TemplateError::MissingCandidates {
          name: name.to_string(),
        })?;

      let mut next = Vec::with_capacity(assignments.len() * values.len());
      for partial in &assignments {
        for value in values {
          let mut assignment = partial.clone();
          assignment.push(value.as_str());
          next.push(assignment);
        }
      }
      assignments = next;
    }

    Ok(
      assignments
        .iter()
        .map(|values| {
          let assignment: HashMap<&str, &str> = names.iter().copied().zip(values.iter().copied()).collect();
          self.render(&assignment)
        })
        .collect(),
    )
  }
}

/// Parse `template` and return the set of names it references.
pub fn query_references(template: &str) -> Result<BTreeSet<String>, TemplateError> {
  let parsed = Template::parse(template)?;
  Ok(parsed.references().into_iter().map(str::to_string).collect())
}

/// Parse and expand `template` in one step.
pub fn expand(template: &str, candidates: &impl Candidates) -> Result<Vec<String>, TemplateError> {
  Template::parse(template)?.expand(candidates)
}

fn is_name_start(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

fn is_braced_name_char(c: char) -> bool {
  is_name_char(c) || c == '.'
}

/// Consume characters from `start` while `accept` holds and return them.
fn take_while(source: &str, start: usize, chars: &mut Peekable<CharIndices<'_>>, accept: fn(char) -> bool) -> String {
  let mut end = start;
  while let Some(&(pos, c)) = chars.peek() {
    if !accept(c) {
      break;
    }
    end = pos + c.len_utf8();
    chars.next();
  }
  source[start..end].to_string()
}

/// Scan the body of `${...}` after the opening brace, including the closing brace.
fn scan_braced_name(source: &str, chars: &mut Peekable<CharIndices<'_>>) -> Option<String> {
  let &(start, first) = chars.peek()?;
  let mut offset = 0;
  if first == '.' {
    chars.next();
    offset = 1;
  }

  match chars.peek() {
    Some(&(_, c)) if is_name_start(c) => {}
    _ => return None,
  }

  let rest = take_while(source, start + offset, chars, is_braced_name_char);
  match chars.next() {
    Some((_, '}')) => Some(format!("{}{}", &source[start..start + offset], rest)),
    _ => None,
  }
}

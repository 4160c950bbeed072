//! Boolean expression handling: implicit operator insertion and infix to RPN conversion.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref MULTI_SPACE: Regex = Regex::new(r"  +").expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "and" => Some(Operator::And),
            "or" => Some(Operator::Or),
            "not" => Some(Operator::Not),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
        }
    }

    /// Collapse two adjacent operators into one: `not` dominates, then `or`.
    pub fn combine(self, other: Operator) -> Operator {
        if self == other {
            self
        } else if self == Operator::Not || other == Operator::Not {
            Operator::Not
        } else {
            Operator::Or
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpnToken {
    Term(String),
    Op(Operator),
}

impl fmt::Display for RpnToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpnToken::Term(t) => f.write_str(t),
            RpnToken::Op(op) => write!(f, "{op}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub expression: String,
    /// An explicit operator appeared in the query.
    pub boolean_search: bool,
}

impl NormalizedQuery {
    /// Number of space separated items, operators included.
    pub fn word_count(&self) -> usize { self.expression.split(' ').count() }
}

/// Make every pair of adjacent terms carry an operator, inserting `default_op` where none was typed.
///
/// Leading operators are dropped, runs of operators are combined and trailing operators trimmed.
pub fn normalize_query(query: &str, default_op: Operator) -> NormalizedQuery {
    let query = query.to_lowercase();
    let query = MULTI_SPACE.replace_all(query.trim(), " ");
    let query = query.replace("( ", "(").replace(" )", ")");

    let mut out: Vec<String> = Vec::new();
    let mut boolean_search = false;
    for part in query.split(' ').filter(|p| !p.is_empty()) {
        let op = Operator::parse(part);
        boolean_search |= op.is_some();
        let last_op = out.last().and_then(|w| Operator::parse(w));
        match (last_op, op) {
            _ if out.is_empty() => {
                if op.is_none() {
                    out.push(part.to_string());
                }
            }
            (Some(last), Some(cur)) => {
                if let Some(slot) = out.last_mut() {
                    *slot = last.combine(cur).as_str().to_string();
                }
            }
            (None, None) => {
                out.push(default_op.as_str().to_string());
                out.push(part.to_string());
            }
            _ => out.push(part.to_string()),
        }
    }
    while out.last().map_or(false, |w| Operator::parse(w).is_some()) {
        out.pop();
    }

    NormalizedQuery { expression: out.join(" "), boolean_search }
}

fn split_items(expr: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut item = String::new();
    for c in expr.chars() {
        match c {
            ' ' | '(' | ')' => {
                if !item.is_empty() {
                    items.push(std::mem::take(&mut item));
                }
                if c != ' ' {
                    items.push(c.to_string());
                }
            }
            _ => item.push(c),
        }
    }
    if !item.is_empty() {
        items.push(item);
    }
    items
}

/// Shunting-yard with all operators at equal precedence, left associative.
/// `not` is binary: `a not b` excludes `b` from `a`.
pub fn to_rpn(expr: &str) -> Vec<RpnToken> {
    let mut output = Vec::new();
    // None marks an open parenthesis.
    let mut stack: Vec<Option<Operator>> = Vec::new();
    for item in split_items(expr) {
        if let Some(op) = Operator::parse(&item) {
            while let Some(Some(top)) = stack.last() {
                output.push(RpnToken::Op(*top));
                stack.pop();
            }
            stack.push(Some(op));
        } else if item == "(" {
            stack.push(None);
        } else if item == ")" {
            while let Some(Some(top)) = stack.pop() {
                output.push(RpnToken::Op(top));
            }
        } else {
            output.push(RpnToken::Term(item));
        }
    }
    while let Some(entry) = stack.pop() {
        if let Some(op) = entry {
            output.push(RpnToken::Op(op));
        }
    }
    output
}

/// Space separated form, as logged.
pub fn rpn_to_string(rpn: &[RpnToken]) -> String {
    rpn.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
}

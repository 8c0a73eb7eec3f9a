//! Script parser.
//!
//! Grammar:
//!
//! ```text
//! script     := statement (';' statement)* ';'?
//! statement  := 'let' identifier '=' expression
//! expression := term (('+' | '-') term)*
//! term       := integer-literal | identifier
//! ```
//!
//! Literals are non-negative and must fit `i64`; `-` is always the binary
//! operator, never a sign. Whitespace between tokens is insignificant and
//! empty statements (stray semicolons) are skipped.

use crate::config::ScriptLimits;
use crate::script::errors::ScriptError;
use crate::types::state::is_valid_identifier;

/// A single `let` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    /// Assignment target.
    pub target: String,
    /// Right-hand side expression.
    pub expr: Expr,
}

/// An additive expression evaluated strictly left to right.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    /// Leading term.
    pub first: Term,
    /// Remaining operator/term pairs in source order.
    pub rest: Vec<(Op, Term)>,
}

/// A literal or variable reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    /// Non-negative integer literal.
    Literal(i64),
    /// Reference to a bound variable.
    Variable(String),
}

/// Additive operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
}

/// Parses a script into its statements without touching any state.
///
/// Pure syntax check: the mempool runs this before committing to admission,
/// and the interpreter runs it again at execution time.
pub fn parse(source: &str, limits: &ScriptLimits) -> Result<Vec<Statement>, ScriptError> {
    let mut statements = Vec::new();
    for raw in source.split(';') {
        let stmt = raw.trim();
        if stmt.is_empty() {
            continue;
        }
        if statements.len() == limits.max_statements {
            return Err(ScriptError::TooManyStatements {
                max: limits.max_statements,
            });
        }
        statements.push(parse_statement(stmt)?);
    }
    Ok(statements)
}

fn parse_statement(stmt: &str) -> Result<Statement, ScriptError> {
    let rest = stmt
        .strip_prefix("let")
        .ok_or_else(|| ScriptError::InvalidStatement(stmt.to_string()))?;

    // `letx = 1` must not parse; the keyword needs trailing whitespace.
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return Err(ScriptError::InvalidStatement(stmt.to_string()));
    }

    let rest = rest.trim_start();
    let eq = rest
        .find('=')
        .ok_or_else(|| ScriptError::InvalidStatement(stmt.to_string()))?;

    let target = rest[..eq].trim();
    if !is_valid_identifier(target) {
        return Err(ScriptError::InvalidIdentifier(target.to_string()));
    }

    let expr_src = rest[eq + 1..].trim();
    if expr_src.is_empty() {
        return Err(ScriptError::InvalidStatement(stmt.to_string()));
    }

    Ok(Statement {
        target: target.to_string(),
        expr: parse_expr(expr_src)?,
    })
}

enum RawToken<'a> {
    Term(&'a str),
    Op(Op),
}

fn flush_term<'a>(
    tokens: &mut Vec<RawToken<'a>>,
    start: &mut Option<usize>,
    end: usize,
    src: &'a str,
) {
    if let Some(s) = start.take() {
        tokens.push(RawToken::Term(&src[s..end]));
    }
}

fn tokenize(src: &str) -> Vec<RawToken<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in src.char_indices() {
        match c {
            '+' | '-' => {
                flush_term(&mut tokens, &mut start, i, src);
                tokens.push(RawToken::Op(if c == '+' { Op::Add } else { Op::Sub }));
            }
            c if c.is_whitespace() => flush_term(&mut tokens, &mut start, i, src),
            _ => {
                if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }
    flush_term(&mut tokens, &mut start, src.len(), src);

    tokens
}

fn parse_expr(src: &str) -> Result<Expr, ScriptError> {
    let tokens = tokenize(src);
    let mut iter = tokens.into_iter();

    let first = match iter.next() {
        Some(RawToken::Term(tok)) => parse_term(tok)?,
        Some(RawToken::Op(_)) | None => {
            return Err(ScriptError::DanglingOperator(src.to_string()));
        }
    };

    let mut rest = Vec::new();
    loop {
        let op = match iter.next() {
            None => break,
            Some(RawToken::Op(op)) => op,
            Some(RawToken::Term(_)) => {
                return Err(ScriptError::InvalidExpression(src.to_string()));
            }
        };
        let term = match iter.next() {
            Some(RawToken::Term(tok)) => parse_term(tok)?,
            Some(RawToken::Op(_)) | None => {
                return Err(ScriptError::DanglingOperator(src.to_string()));
            }
        };
        rest.push((op, term));
    }

    Ok(Expr { first, rest })
}

fn parse_term(tok: &str) -> Result<Term, ScriptError> {
    if tok.starts_with(|c: char| c.is_ascii_digit()) {
        if !tok.chars().all(|c| c.is_ascii_digit()) {
            return Err(ScriptError::InvalidExpression(tok.to_string()));
        }
        return tok
            .parse::<i64>()
            .map(Term::Literal)
            .map_err(|_| ScriptError::LiteralOutOfRange(tok.to_string()));
    }
    if !is_valid_identifier(tok) {
        return Err(ScriptError::InvalidExpression(tok.to_string()));
    }
    Ok(Term::Variable(tok.to_string()))
}

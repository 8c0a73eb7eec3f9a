//! Script interpreter.
//!
//! Statements run strictly in source order against a single evolving copy of
//! the input state; each assignment is visible to the statements after it.
//! The caller's state is never mutated.

use crate::config::ScriptLimits;
use crate::script::errors::ScriptError;
use crate::script::parser::{parse, Expr, Op, Statement, Term};
use crate::types::state::State;

/// Executes a script against `state`, returning the resulting snapshot.
///
/// Parses first, so a syntactically invalid script fails before any statement
/// evaluates. Deterministic: the same script over the same state always yields
/// the same result.
pub fn execute(source: &str, state: &State, limits: &ScriptLimits) -> Result<State, ScriptError> {
    let statements = parse(source, limits)?;
    run(&statements, state)
}

/// Executes pre-parsed statements against `state`.
pub fn run(statements: &[Statement], state: &State) -> Result<State, ScriptError> {
    let mut next = state.clone();
    for statement in statements {
        let value = eval_expr(&statement.expr, &next)?;
        next.bind(&statement.target, value)
            .map_err(|_| ScriptError::InvalidIdentifier(statement.target.clone()))?;
    }
    Ok(next)
}

fn eval_expr(expr: &Expr, state: &State) -> Result<i64, ScriptError> {
    let mut acc = eval_term(&expr.first, state)?;
    for (op, term) in &expr.rest {
        let rhs = eval_term(term, state)?;
        acc = match op {
            Op::Add => acc.checked_add(rhs),
            Op::Sub => acc.checked_sub(rhs),
        }
        .ok_or_else(|| ScriptError::Overflow(render_term(term)))?;
    }
    Ok(acc)
}

fn eval_term(term: &Term, state: &State) -> Result<i64, ScriptError> {
    match term {
        Term::Literal(value) => Ok(*value),
        Term::Variable(name) => state
            .get(name)
            .ok_or_else(|| ScriptError::UnknownVariable(name.clone())),
    }
}

fn render_term(term: &Term) -> String {
    match term {
        Term::Literal(value) => value.to_string(),
        Term::Variable(name) => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ScriptLimits {
        ScriptLimits::default()
    }

    #[test]
    fn executes_simple_script() {
        let result = execute("let a = 1; let b = a + 2;", &State::new(), &limits()).unwrap();
        assert_eq!(result.get("a"), Some(1));
        assert_eq!(result.get("b"), Some(3));
    }

    #[test]
    fn statements_see_earlier_assignments() {
        let result = execute(
            "let a = 1; let b = a + 1; let c = b + a + 2",
            &State::new(),
            &limits(),
        )
        .unwrap();
        assert_eq!(result.get("c"), Some(5));
    }

    #[test]
    fn evaluation_is_left_to_right_without_precedence() {
        // 10 - 2 + 3 folds as (10 - 2) + 3
        let result = execute("let x = 10 - 2 + 3", &State::new(), &limits()).unwrap();
        assert_eq!(result.get("x"), Some(11));
    }

    #[test]
    fn reads_pre_existing_state() {
        let state: State = [("counter".to_string(), 41i64)].into_iter().collect();
        let result = execute("let counter = counter + 1", &state, &limits()).unwrap();
        assert_eq!(result.get("counter"), Some(42));
    }

    #[test]
    fn rebinding_updates_within_script() {
        let result = execute("let a = 5; let a = a - 7", &State::new(), &limits()).unwrap();
        assert_eq!(result.get("a"), Some(-2));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn unknown_variable_fails() {
        assert_eq!(
            execute("let b = c + 1", &State::new(), &limits()),
            Err(ScriptError::UnknownVariable("c".to_string()))
        );
    }

    #[test]
    fn caller_state_is_never_mutated() {
        let state: State = [("x".to_string(), 1i64)].into_iter().collect();
        let result = execute("let x = x + 1; let y = 2", &state, &limits()).unwrap();
        assert_eq!(state.get("x"), Some(1));
        assert_eq!(state.get("y"), None);
        assert_eq!(result.get("x"), Some(2));
    }

    #[test]
    fn execution_is_deterministic() {
        let state: State = [("seed".to_string(), 7i64)].into_iter().collect();
        let script = "let a = seed + 3; let b = a - seed";
        let first = execute(script, &state, &limits()).unwrap();
        let second = execute(script, &state, &limits()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn addition_overflow_is_an_error() {
        let state: State = [("big".to_string(), i64::MAX)].into_iter().collect();
        assert!(matches!(
            execute("let y = big + 1", &state, &limits()),
            Err(ScriptError::Overflow(_))
        ));
    }

    #[test]
    fn subtraction_overflow_is_an_error() {
        let state: State = [("low".to_string(), i64::MIN)].into_iter().collect();
        assert!(matches!(
            execute("let y = low - 1", &state, &limits()),
            Err(ScriptError::Overflow(_))
        ));
    }

    #[test]
    fn parse_failure_leaves_no_partial_result() {
        // second statement is malformed; nothing should execute
        let state = State::new();
        let result = execute("let a = 1; let b 2", &state, &limits());
        assert!(matches!(result, Err(ScriptError::InvalidStatement(_))));
        assert!(state.is_empty());
    }
}

//! Arithmetic capability backed by a small expression evaluator.
//!
//! The evaluator is deliberately self-contained: the execution fallback
//! path reuses it to answer arithmetic invocations even when this handler
//! is not registered.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ExecutionError;
use crate::registry::CapabilityHandler;
use crate::types::ExecutionContext;
use switchboard_extract::CandidateInvocation;

/// Evaluate an arithmetic expression supporting `+ - * / % ^`, parentheses,
/// unary minus, and decimal numbers.
pub fn evaluate(expression: &str) -> Result<f64, String> {
    let mut parser = Parser {
        chars: expression.chars().filter(|c| !c.is_whitespace()).collect(),
        pos: 0,
    };
    let value = parser.expr()?;
    if parser.pos != parser.chars.len() {
        return Err(format!(
            "unexpected character '{}' at position {}",
            parser.chars[parser.pos], parser.pos
        ));
    }
    if !value.is_finite() {
        return Err("expression did not evaluate to a finite number".to_string());
    }
    Ok(value)
}

/// Render an evaluation result, collapsing integral floats to integers.
pub fn render_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// Pull the expression out of an invocation: `expression` parameter first,
/// payload second.
pub fn expression_of(invocation: &CandidateInvocation) -> Option<String> {
    if let Some(value) = invocation.parameters.get("expression") {
        return Some(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
    }
    invocation.payload.clone()
}

// Recursive-descent parser. Grammar, loosest first:
//   expr   := term (('+' | '-') term)*
//   term   := power (('*' | '/' | '%') power)*
//   power  := unary ('^' power)?          (right-associative)
//   unary  := '-' unary | atom
//   atom   := number | '(' expr ')'
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn expr(&mut self) -> Result<f64, String> {
        let mut acc = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                '+' => {
                    self.bump();
                    acc += self.term()?;
                }
                '-' => {
                    self.bump();
                    acc -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<f64, String> {
        let mut acc = self.power()?;
        while let Some(op) = self.peek() {
            match op {
                '*' => {
                    self.bump();
                    acc *= self.power()?;
                }
                '/' => {
                    self.bump();
                    let rhs = self.power()?;
                    if rhs == 0.0 {
                        return Err("division by zero".to_string());
                    }
                    acc /= rhs;
                }
                '%' => {
                    self.bump();
                    let rhs = self.power()?;
                    if rhs == 0.0 {
                        return Err("modulo by zero".to_string());
                    }
                    acc %= rhs;
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn power(&mut self) -> Result<f64, String> {
        let base = self.unary()?;
        if self.peek() == Some('^') {
            self.bump();
            let exponent = self.power()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn unary(&mut self) -> Result<f64, String> {
        if self.peek() == Some('-') {
            self.bump();
            return Ok(-self.unary()?);
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<f64, String> {
        match self.peek() {
            Some('(') => {
                self.bump();
                let value = self.expr()?;
                if self.bump() != Some(')') {
                    return Err("unbalanced parentheses".to_string());
                }
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
                    self.bump();
                }
                let text: String = self.chars[start..self.pos].iter().collect();
                text.parse::<f64>()
                    .map_err(|_| format!("malformed number '{}'", text))
            }
            Some(c) => Err(format!("unexpected character '{}'", c)),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}

/// Handler for the `calculator` family. Verbs: `calculate`, `evaluate`.
pub struct CalculatorHandler;

#[async_trait]
impl CapabilityHandler for CalculatorHandler {
    async fn invoke(
        &self,
        invocation: &CandidateInvocation,
        _ctx: &ExecutionContext,
    ) -> Result<Value, ExecutionError> {
        let expression = expression_of(invocation)
            .ok_or_else(|| ExecutionError::MissingParameter("expression".to_string()))?;
        let value = evaluate(&expression).map_err(ExecutionError::HandlerFailed)?;
        Ok(render_number(value))
    }
}

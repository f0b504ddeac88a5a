//! Condition parsing and evaluation.
//!
//! A condition is a single binary comparison over one sensor field:
//! `<field> <op> <numeric literal>` with op one of `>`, `<`, `==`, `!=`.
//! Operators are matched in a fixed precedence order (`==`, `!=`, `>`, `<`)
//! so that `=` never splits an `==`/`!=` token and compound operators such as
//! `>=` fail literal parsing instead of silently matching `>`.
//!
//! Evaluation is deterministic and side-effect-free. A field absent from the
//! reading is a non-match, not an error: sensors may legitimately omit a
//! field from a message.

use crate::error::ConditionError;
use crate::rule::Reading;

/// Supported comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `<`
    Lt,
}

impl Operator {
    /// Operator tokens in match precedence order.
    const PRECEDENCE: [(&'static str, Operator); 4] = [
        ("==", Operator::Eq),
        ("!=", Operator::Ne),
        (">", Operator::Gt),
        ("<", Operator::Lt),
    ];

    /// Apply the operator with standard f64 comparison semantics.
    ///
    /// Floating-point equality is used as-is, no epsilon tolerance.
    fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Operator::Eq => lhs == rhs,
            Operator::Ne => lhs != rhs,
            Operator::Gt => lhs > rhs,
            Operator::Lt => lhs < rhs,
        }
    }
}

/// A parsed condition: field, operator, numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    field: String,
    op: Operator,
    value: f64,
}

impl Condition {
    /// Parse a condition string.
    ///
    /// This is the grammar check every backend runs at add-time; a condition
    /// that parses here never fails later at evaluation-time.
    pub fn parse(input: &str) -> Result<Self, ConditionError> {
        for (token, op) in Operator::PRECEDENCE {
            let Some(pos) = input.find(token) else {
                continue;
            };

            let field = input[..pos].trim();
            let literal = input[pos + token.len()..].trim();

            if field.is_empty() {
                return Err(ConditionError::EmptyField(input.to_string()));
            }

            let value: f64 =
                literal
                    .parse()
                    .map_err(|_| ConditionError::NonNumericLiteral {
                        condition: input.to_string(),
                        literal: literal.to_string(),
                    })?;

            return Ok(Self {
                field: field.to_string(),
                op,
                value,
            });
        }

        Err(ConditionError::UnsupportedOperator(input.to_string()))
    }

    /// Evaluate the condition against a reading.
    ///
    /// Returns `false` when the field is absent from the reading.
    pub fn evaluate(&self, reading: &Reading) -> bool {
        match reading.get(&self.field) {
            Some(value) => self.op.apply(*value, self.value),
            None => false,
        }
    }

    /// The sensor field this condition reads.
    pub fn field(&self) -> &str {
        &self.field
    }
}

/// Validate a condition string without keeping the parse result.
///
/// Convenience for backends that store the raw string.
pub fn validate(input: &str) -> Result<(), ConditionError> {
    Condition::parse(input).map(|_| ())
}

//! Rule value object and reading type.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One IoT message: a flat mapping of sensor field name to numeric value.
pub type Reading = HashMap<String, f64>;

/// A rule: one condition expression bound to an action string.
///
/// Immutable after creation. The id is assigned by the storage backend that
/// owns the rule; backends never share rule sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Backend-assigned opaque identifier.
    pub id: String,
    /// Condition expression, e.g. `temperature > 25`.
    pub condition: String,
    /// Action string emitted when the condition matches.
    pub action: String,
}

impl Rule {
    /// Create a rule with a backend-assigned id.
    pub fn new(
        id: impl Into<String>,
        condition: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            condition: condition.into(),
            action: action.into(),
        }
    }
}

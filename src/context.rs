//! Operator context.
//!
//! Write operations record which operator performed them. The operator is
//! passed explicitly per call; there is no ambient "current user" global.

use serde::{Deserialize, Serialize};

use crate::subscription::model::OperatorId;

/// The back-office operator performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Identifier of the operator.
    pub operator_id: OperatorId,
}

impl CurrentUser {
    /// Creates a context for the given operator.
    #[must_use]
    pub fn new(operator_id: OperatorId) -> Self {
        Self { operator_id }
    }
}

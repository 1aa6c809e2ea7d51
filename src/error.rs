use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoapError {
    #[error("Action cost must be within [0, 1], got {0}")]
    InvalidCost(f32),
    #[error("Value must be within [0, 1], got {0}")]
    InvalidValue(f32),
    #[error("Condition keys differ only in case: {0}")]
    DuplicateConditionKey(String),
    #[error("Duplicate action name in planning system: {0}")]
    DuplicateActionName(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GoapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_cost_display() {
        let err = GoapError::InvalidCost(1.5);
        assert_eq!(
            format!("{}", err),
            "Action cost must be within [0, 1], got 1.5"
        );
    }

    #[test]
    fn test_invalid_value_display() {
        let err = GoapError::InvalidValue(-0.5);
        assert_eq!(format!("{}", err), "Value must be within [0, 1], got -0.5");
    }

    #[test]
    fn test_duplicate_condition_key_display() {
        let err = GoapError::DuplicateConditionKey("hasForm".to_string());
        assert_eq!(
            format!("{}", err),
            "Condition keys differ only in case: hasForm"
        );
    }

    #[test]
    fn test_duplicate_action_name_display() {
        let err = GoapError::DuplicateActionName("wait".to_string());
        assert_eq!(
            format!("{}", err),
            "Duplicate action name in planning system: wait"
        );
    }

    #[test]
    fn test_error_trait() {
        let err = GoapError::InvalidCost(2.0);
        let _ = err.source(); // Should be None
    }
}

use super::Constraint;

#[derive(Debug, Clone)]
pub struct ConstraintLength {
    /// The minimum length of the field.
    pub min: Option<u64>,

    /// The maximum length of the field.
    pub max: Option<u64>,
}

impl From<ConstraintLength> for Constraint {
    fn from(length: ConstraintLength) -> Self {
        Constraint::Length(length)
    }
}

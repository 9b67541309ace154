mod length;
pub use length::ConstraintLength;

#[derive(Debug, Clone)]
pub enum Constraint {
    Length(ConstraintLength),
}

impl Constraint {
    pub fn length_less_than(max: u64) -> Self {
        ConstraintLength {
            min: None,
            max: Some(max),
        }
        .into()
    }

    pub fn max_length(&self) -> Option<u64> {
        match self {
            Constraint::Length(length) => length.max,
        }
    }
}

use super::FieldId;

#[derive(Debug, Clone)]
pub struct PrimaryKey {
    /// Fields composing the primary key
    pub fields: Vec<FieldId>,
}

impl PrimaryKey {
    pub fn is_composite(&self) -> bool {
        self.fields.len() > 1
    }
}

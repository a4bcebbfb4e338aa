// vitrina-saga/src/core/step.rs

/// Definition of a saga step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDef {
  pub name: String,
  /// An optional step without handlers is skipped instead of failing the saga.
  pub optional: bool,
}

impl StepDef {
  pub fn new(name: impl Into<String>, optional: bool) -> Self {
    Self {
      name: name.into(),
      optional,
    }
  }
}

use crate::ast::{OutBinding, Value};
use serde::{Deserialize, Serialize};

/// A named procedure or function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcedureParam {
    In(Value),
    Out(OutBinding),
}

/// A stored procedure or function invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcedureCall {
    pub name: String,
    #[serde(default)]
    pub params: Vec<(String, ProcedureParam)>,
}

impl ProcedureCall {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: Vec::new(),
        }
    }

    pub fn input(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params
            .push((name.to_string(), ProcedureParam::In(value.into())));
        self
    }

    pub fn output(mut self, name: &str, binding: OutBinding) -> Self {
        self.params.push((name.to_string(), ProcedureParam::Out(binding)));
        self
    }
}

//! Stored procedure and function calls.

use crate::ast::{OutBinding, ProcedureCall, ProcedureParam, Value};
use crate::error::{OracleError, OracleResult};

/// Name of the bind receiving a function's return value.
pub const RESULT_BIND: &str = "result";

/// A PL/SQL call with named binds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledCall {
    pub sql: String,
    pub inputs: Vec<(String, Value)>,
    pub outputs: Vec<(String, OutBinding)>,
}

fn is_bind_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn split_params(call: &ProcedureCall) -> OracleResult<(String, CompiledCall)> {
    if !call.name.split('.').all(is_bind_name) {
        return Err(OracleError::InvalidIdentifier(call.name.clone()));
    }

    let mut compiled = CompiledCall::default();
    let mut binds = Vec::with_capacity(call.params.len());
    for (name, param) in &call.params {
        if !is_bind_name(name) {
            return Err(OracleError::InvalidIdentifier(name.clone()));
        }
        binds.push(format!(":{}", name));
        match param {
            ProcedureParam::In(value) => compiled.inputs.push((name.clone(), value.clone())),
            ProcedureParam::Out(binding) => compiled.outputs.push((name.clone(), binding.clone())),
        }
    }
    Ok((binds.join(", "), compiled))
}

/// `begin NAME(:a, :b); end;`
pub fn compile_procedure(call: &ProcedureCall) -> OracleResult<CompiledCall> {
    let (binds, mut compiled) = split_params(call)?;
    compiled.sql = format!("begin {}({}); end;", call.name, binds);
    Ok(compiled)
}

/// `begin :result := NAME(:a); end;`
pub fn compile_function(call: &ProcedureCall, returns: OutBinding) -> OracleResult<CompiledCall> {
    let (binds, mut compiled) = split_params(call)?;
    compiled.sql = format!("begin :{} := {}({}); end;", RESULT_BIND, call.name, binds);
    compiled.outputs.insert(0, (RESULT_BIND.to_string(), returns));
    Ok(compiled)
}

use thiserror::Error;

use crate::{CaptureId, ClassId, TypeVarId};

pub type Result<T> = std::result::Result<T, ReflectError>;

/// Failures reported by the resolution engine.
///
/// Everything except [`ReflectError::Unrepresentable`] is a contract
/// violation: the caller skipped a required step (capture conversion, arity
/// validation, populating a variable map) and the engine refuses to guess.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReflectError {
    #[error("cannot erase a {kind}; capture-convert or resolve it first")]
    NotErasable { kind: &'static str },
    #[error("type variable {var} is not bound in the variable map")]
    UnboundVariable { var: TypeVarId },
    #[error("expected {expected} type arguments but {found} were supplied")]
    ArityMismatch {
        class: Option<ClassId>,
        expected: usize,
        found: usize,
    },
    #[error("wildcard used outside a type argument position")]
    UnexpectedWildcard,
    #[error("unrepresentable type: {what}")]
    Unrepresentable { what: String },
}

impl ReflectError {
    pub fn unknown_class(id: ClassId) -> Self {
        ReflectError::Unrepresentable {
            what: format!("no declaration for {id}"),
        }
    }

    pub fn unknown_type_param(id: TypeVarId) -> Self {
        ReflectError::Unrepresentable {
            what: format!("no declaration for {id}"),
        }
    }

    pub fn unknown_capture(id: CaptureId) -> Self {
        ReflectError::Unrepresentable {
            what: format!("{id} was not allocated by this context"),
        }
    }

    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, ReflectError::Unrepresentable { .. })
    }
}

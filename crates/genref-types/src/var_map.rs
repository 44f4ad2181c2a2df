use std::collections::HashMap;

use crate::{ParameterizedType, ReflectError, Result, Type, TypeVarId, WildcardType};

/// A finite substitution from type variables to type expressions.
///
/// Maps are built per resolution and discarded afterwards. Every free
/// variable reachable from a type passed to [`VarMap::resolve`] must be bound;
/// a missing binding is reported as [`ReflectError::UnboundVariable`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VarMap {
    map: HashMap<TypeVarId, Type>,
}

impl VarMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, var: TypeVarId, ty: Type) {
        self.map.insert(var, ty);
    }

    /// Binds `vars[i]` to `types[i]`; both slices must have the same length.
    pub fn bind_all(&mut self, vars: &[TypeVarId], types: &[Type]) -> Result<()> {
        if vars.len() != types.len() {
            return Err(ReflectError::ArityMismatch {
                class: None,
                expected: vars.len(),
                found: types.len(),
            });
        }
        for (var, ty) in vars.iter().zip(types) {
            self.bind(*var, ty.clone());
        }
        Ok(())
    }

    pub fn get(&self, var: TypeVarId) -> Option<&Type> {
        self.map.get(&var)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Substitutes every bound variable in `ty`.
    ///
    /// Plain classes and captures are leaves and come back unchanged. A bound
    /// value is inserted as-is, it is never itself re-substituted.
    pub fn resolve(&self, ty: &Type) -> Result<Type> {
        match ty {
            Type::Class(_) | Type::Capture(_) => Ok(ty.clone()),
            Type::Parameterized(p) => {
                let owner = match &p.owner {
                    Some(owner) => Some(Box::new(self.resolve(owner)?)),
                    None => None,
                };
                Ok(Type::Parameterized(ParameterizedType {
                    class: p.class,
                    args: self.resolve_all(&p.args)?,
                    owner,
                }))
            }
            Type::TypeVar(var) => self
                .map
                .get(var)
                .cloned()
                .ok_or(ReflectError::UnboundVariable { var: *var }),
            Type::Wildcard(w) => Ok(Type::Wildcard(WildcardType {
                upper_bounds: self.resolve_all(&w.upper_bounds)?,
                lower_bounds: self.resolve_all(&w.lower_bounds)?,
            })),
            Type::GenericArray(component) => Ok(Type::array_of(self.resolve(component)?)),
        }
    }

    pub fn resolve_all(&self, types: &[Type]) -> Result<Vec<Type>> {
        types.iter().map(|ty| self.resolve(ty)).collect()
    }
}

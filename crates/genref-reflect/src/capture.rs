//! Capture conversion (JLS 5.1.10).

use genref_types::{ParameterizedType, ReflectError, Result, Type, VarMap};

use crate::Reflector;

impl Reflector<'_> {
    /// Replaces every wildcard argument of a parameterized type (and of its
    /// owner chain) with a fresh capture variable.
    ///
    /// Capture bounds are the declared bounds of the captured parameter, with
    /// sibling parameters substituted, followed by the wildcard's own upper
    /// bounds. Anything that is not a parameterized type comes back unchanged.
    pub fn capture(&mut self, ty: &Type) -> Result<Type> {
        let Type::Parameterized(p) = ty else {
            return Ok(ty.clone());
        };

        let owner = match &p.owner {
            Some(owner) => Some(Box::new(self.capture(owner)?)),
            None => None,
        };

        let def = self.class_def(p.class)?;
        if def.type_params.len() != p.args.len() {
            return Err(ReflectError::ArityMismatch {
                class: Some(p.class),
                expected: def.type_params.len(),
                found: p.args.len(),
            });
        }

        // Bound expressions may mention the enclosing instance's parameters.
        let mut var_map = VarMap::new();
        let mut enclosing = owner.as_deref();
        while let Some(Type::Parameterized(o)) = enclosing {
            let owner_def = self.class_def(o.class)?;
            var_map.bind_all(&owner_def.type_params, &o.args)?;
            enclosing = o.owner.as_deref();
        }

        // Phase one: allocate every capture so sibling bounds can refer to them.
        let mut pending = Vec::new();
        let mut args = Vec::with_capacity(p.args.len());
        for (var, arg) in def.type_params.iter().zip(&p.args) {
            let arg = match arg {
                Type::Wildcard(wildcard) => {
                    let id = self.alloc_capture(*var, wildcard.clone());
                    pending.push(id);
                    Type::Capture(id)
                }
                other => other.clone(),
            };
            var_map.bind(*var, arg.clone());
            args.push(arg);
        }

        // Phase two: finalize bounds now that the map is complete.
        for id in pending {
            let (variable, wildcard) = {
                let capture = self.capture_bounds(id)?;
                (capture.variable, capture.wildcard.clone())
            };
            let declared = var_map.resolve_all(&self.type_param_def(variable)?.upper_bounds)?;
            let upper_bounds = self.merge_capture_bounds(declared, &wildcard.upper_bounds);
            tracing::trace!(
                target: "genref.capture",
                capture = id.arena_index() + 1,
                upper_bounds = upper_bounds.len(),
                lower_bounds = wildcard.lower_bounds.len(),
                "allocated capture variable"
            );
            self.finish_capture(id, upper_bounds, wildcard.lower_bounds)?;
        }

        Ok(Type::Parameterized(ParameterizedType {
            class: p.class,
            args,
            owner,
        }))
    }

    /// Declared bounds followed by the wildcard's bounds, dropping a bare top
    /// type on either side when the other side says something more specific.
    fn merge_capture_bounds(&self, declared: Vec<Type>, wildcard: &[Type]) -> Vec<Type> {
        let object = self.object_type();
        let is_top = |bounds: &[Type]| bounds.is_empty() || bounds == [object.clone()];

        let wildcard_is_top = is_top(wildcard);
        let mut upper = Vec::with_capacity(declared.len() + wildcard.len());
        if !(is_top(declared.as_slice()) && !wildcard_is_top) {
            upper.extend(declared);
        }
        if !wildcard_is_top {
            upper.extend(wildcard.iter().cloned());
        }
        if upper.is_empty() {
            upper.push(object);
        }
        upper
    }
}

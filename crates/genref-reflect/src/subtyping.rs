//! Subtyping and type-argument containment.

use genref_types::{array_component, ReflectError, Result, Type};

use crate::Reflector;

impl Reflector<'_> {
    /// Whether the capture of `sub` is a subtype of `sup`.
    ///
    /// `List<? extends Number>` is a supertype of `List<Integer>`, but
    /// `List<Integer>` is not a supertype of `List<? extends Number>`.
    pub fn is_supertype(&mut self, sup: &Type, sub: &Type) -> Result<bool> {
        match sup {
            Type::Class(_) | Type::Parameterized(_) | Type::GenericArray(_) => {
                let super_class = self.erase(sup)?;
                if let Some(sub_class) = self.erasure_if_available(sub)? {
                    if !self.env.is_assignable_erasure(&super_class, &sub_class) {
                        return Ok(false);
                    }
                    if matches!(sup, Type::Class(_)) {
                        return Ok(true);
                    }
                }

                let captured = self.capture(sub)?;
                let Some(mapped) = self.exact_supertype(&captured, &super_class)? else {
                    return Ok(false);
                };
                match (sup, &mapped) {
                    // Non-generic or raw on either side.
                    (Type::Class(_), _) | (_, Type::Class(_)) => Ok(true),
                    (_, Type::GenericArray(_)) => {
                        match (array_component(sup), array_component(&mapped)) {
                            (Some(sup_component), Some(sub_component)) => {
                                self.is_supertype(&sup_component, &sub_component)
                            }
                            _ => Ok(false),
                        }
                    }
                    (Type::Parameterized(sup_p), Type::Parameterized(sub_p)) => {
                        if sup_p.args.len() != sub_p.args.len() {
                            return Err(ReflectError::ArityMismatch {
                                class: Some(sup_p.class),
                                expected: sup_p.args.len(),
                                found: sub_p.args.len(),
                            });
                        }
                        for (sup_arg, sub_arg) in sup_p.args.iter().zip(&sub_p.args) {
                            if !self.contains(sup_arg, sub_arg)? {
                                return Ok(false);
                            }
                        }
                        match (&sup_p.owner, &sub_p.owner) {
                            (Some(sup_owner), Some(sub_owner)) => {
                                self.is_supertype(sup_owner, sub_owner)
                            }
                            _ => Ok(true),
                        }
                    }
                    _ => Ok(false),
                }
            }
            Type::Capture(id) => {
                if sup == sub {
                    return Ok(true);
                }
                let lower_bounds = self.capture_bounds(*id)?.lower_bounds.clone();
                for lower in &lower_bounds {
                    if self.is_supertype(lower, sub)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Type::TypeVar(_) => {
                if sup == sub {
                    return Ok(true);
                }
                if !matches!(sub, Type::TypeVar(_) | Type::Capture(_)) {
                    return Ok(false);
                }
                for bound in self.direct_supertypes(sub)? {
                    if self.is_supertype(sup, &bound)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Type::Wildcard(_) => Err(ReflectError::UnexpectedWildcard),
        }
    }

    /// Whether type argument `containing` contains `contained` (JLS 4.5.1).
    ///
    /// A wildcard contains every type within its bounds; any other argument
    /// only contains itself.
    pub fn contains(&mut self, containing: &Type, contained: &Type) -> Result<bool> {
        let Type::Wildcard(wildcard) = containing else {
            return Ok(containing == contained);
        };
        for upper in &wildcard.upper_bounds {
            if !self.is_supertype(upper, contained)? {
                return Ok(false);
            }
        }
        for lower in &wildcard.lower_bounds {
            if !self.is_supertype(contained, lower)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

//! Direct and exact supertypes.

use indexmap::IndexSet;

use genref_types::{
    array_component, Class, ClassId, ClassKind, ParameterizedType, ReflectError, Result, Type,
    TypeDisplay, TypeVarId, VarMap, WildcardType,
};

use crate::Reflector;

impl Reflector<'_> {
    /// The direct supertypes of `ty`, with the owning type's arguments
    /// substituted into the declared supertypes.
    ///
    /// For classes the superclass comes first, then interfaces in declaration
    /// order. Type variables and captures yield their upper bounds, arrays the
    /// arrays of their component's supertypes followed by `Object`,
    /// `Cloneable` and `Serializable`.
    pub fn direct_supertypes(&mut self, ty: &Type) -> Result<Vec<Type>> {
        match ty {
            Type::Class(Class::Array(_)) | Type::GenericArray(_) => {
                self.array_direct_supertypes(ty)
            }
            Type::Class(Class::Primitive(_)) => Ok(Vec::new()),
            Type::Class(Class::Named(id)) => self.class_direct_supertypes(*id, ty),
            Type::Parameterized(p) => self.class_direct_supertypes(p.class, ty),
            Type::TypeVar(id) => {
                let bounds = &self.type_param_def(*id)?.upper_bounds;
                if bounds.is_empty() {
                    Ok(vec![self.object_type()])
                } else {
                    Ok(bounds.clone())
                }
            }
            // Only reachable when a wildcard escaped capture, e.g. inside the
            // bound of another variable.
            Type::Wildcard(w) => Ok(w.upper_bounds.clone()),
            Type::Capture(id) => Ok(self.capture_bounds(*id)?.upper_bounds.clone()),
        }
    }

    fn class_direct_supertypes(&mut self, class: ClassId, ty: &Type) -> Result<Vec<Type>> {
        if self.config.memoize_supertypes {
            if let Some(cached) = self.supertype_cache.get(ty) {
                return Ok(cached.clone());
            }
        }

        let def = self.class_def(class)?;
        let mut result = Vec::with_capacity(def.interfaces.len() + 1);
        for declared in def.declared_supertypes() {
            result.push(self.map_type_parameters(declared, ty, &[])?);
        }
        if result.is_empty()
            && def.kind == ClassKind::Interface
            && self.config.implicit_object_supertype
        {
            result.push(self.object_type());
        }

        // Captures are per-query; their entries would never be hit again.
        if self.config.memoize_supertypes && !mentions_capture(ty) {
            self.supertype_cache.insert(ty.clone(), result.clone());
        }
        Ok(result)
    }

    fn array_direct_supertypes(&mut self, array: &Type) -> Result<Vec<Type>> {
        let component = array_component(array).ok_or_else(|| ReflectError::Unrepresentable {
            what: "array type without a component".to_string(),
        })?;

        let mut result = Vec::new();
        if !matches!(component, Type::Class(Class::Primitive(_))) {
            for supertype in self.direct_supertypes(&component)? {
                result.push(Type::array_of(supertype));
            }
        }
        result.extend(
            self.env
                .well_known()
                .array_supertypes()
                .into_iter()
                .map(Type::class),
        );
        Ok(result)
    }

    /// The supertype of `ty` that erases to `target`, with all type arguments
    /// substituted, e.g. `Collection<String>` for `ArrayList<String>` and
    /// `Collection`.
    ///
    /// Searches depth-first in declaration order and returns the first match,
    /// or `None` when `target` is not an ancestor. Callers should
    /// capture-convert `ty` first so wildcards do not leak into the result.
    pub fn exact_supertype(&mut self, ty: &Type, target: &Class) -> Result<Option<Type>> {
        if let Some(class) = self.erasure_if_available(ty)? {
            if class == *target {
                return Ok(Some(ty.clone()));
            }
            if !self.env.is_assignable_erasure(target, &class) {
                return Ok(None);
            }
        }

        for supertype in self.direct_supertypes(ty)? {
            tracing::trace!(
                target: "genref.supertypes",
                from = %TypeDisplay::new(self.env, ty),
                to = %TypeDisplay::new(self.env, &supertype),
                "searching supertype"
            );
            if let Some(found) = self.exact_supertype(&supertype, target)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Erasure of class-like types, `None` for variables, wildcards, captures
    /// and arrays of captures.
    pub(crate) fn erasure_if_available(&self, ty: &Type) -> Result<Option<Class>> {
        match ty {
            Type::Class(_) | Type::Parameterized(_) | Type::GenericArray(_) => {
                match self.erase(ty) {
                    Ok(class) => Ok(Some(class)),
                    Err(ReflectError::NotErasable { .. }) => Ok(None),
                    Err(err) => Err(err),
                }
            }
            Type::TypeVar(_) | Type::Wildcard(_) | Type::Capture(_) => Ok(None),
        }
    }

    /// Substitutes the arguments of `type_and_params` (and of its owner chain)
    /// into `to_map`.
    ///
    /// A raw `type_and_params` erases `to_map` instead. `own_params` are
    /// bound to themselves, for method-level type parameters.
    pub(crate) fn map_type_parameters(
        &self,
        to_map: &Type,
        type_and_params: &Type,
        own_params: &[TypeVarId],
    ) -> Result<Type> {
        let mut var_map = VarMap::new();
        for param in own_params {
            var_map.bind(*param, Type::TypeVar(*param));
        }

        match type_and_params {
            Type::Class(class) => {
                if self.is_missing_type_parameters(class)? {
                    return Ok(Type::Class(self.erase(to_map)?));
                }
            }
            Type::Parameterized(_) => {
                let mut current = Some(type_and_params);
                while let Some(Type::Parameterized(p)) = current {
                    let def = self.class_def(p.class)?;
                    if def.type_params.len() != p.args.len() {
                        return Err(ReflectError::ArityMismatch {
                            class: Some(p.class),
                            expected: def.type_params.len(),
                            found: p.args.len(),
                        });
                    }
                    var_map.bind_all(&def.type_params, &p.args)?;
                    current = p.owner.as_deref();
                }
            }
            other => {
                return Err(ReflectError::Unrepresentable {
                    what: format!(
                        "cannot substitute through {}",
                        TypeDisplay::new(self.env, other)
                    ),
                })
            }
        }
        var_map.resolve(to_map)
    }

    /// True when `class`, or any class enclosing it, declares type
    /// parameters, so that using it without arguments is a raw type.
    pub fn is_missing_type_parameters(&self, class: &Class) -> Result<bool> {
        let Class::Named(id) = class else {
            return Ok(false);
        };
        let mut current = Some(*id);
        while let Some(id) = current {
            let def = self.class_def(id)?;
            if !def.type_params.is_empty() {
                return Ok(true);
            }
            current = def.enclosing;
        }
        Ok(false)
    }

    /// `class` with every type parameter (its own and its enclosing classes')
    /// replaced by `?`; e.g. `Map<?, ?>` for `Map`.
    ///
    /// Arrays recurse into their component; classes without type parameters
    /// come back as plain class types.
    pub fn add_wildcard_parameters(&self, class: &Class) -> Result<Type> {
        match class {
            Class::Array(component) => Ok(Type::array_of(self.add_wildcard_parameters(component)?)),
            Class::Primitive(_) => Ok(Type::Class(class.clone())),
            Class::Named(id) => {
                if !self.is_missing_type_parameters(class)? {
                    return Ok(Type::Class(class.clone()));
                }
                let def = self.class_def(*id)?;
                let wildcard = Type::Wildcard(WildcardType::unbounded(self.env.well_known()));
                let owner = match def.enclosing {
                    Some(enclosing) => Some(Box::new(
                        self.add_wildcard_parameters(&Class::Named(enclosing))?,
                    )),
                    None => None,
                };
                Ok(Type::Parameterized(ParameterizedType {
                    class: *id,
                    args: vec![wildcard; def.type_params.len()],
                    owner,
                }))
            }
        }
    }

    /// The argument `ty` supplies for the class-level type variable `var`.
    ///
    /// With `class StringList implements List<String>`, asking for
    /// `Collection`'s `E` on `StringList` gives `String`. Returns `None` if
    /// `ty` is not a subtype of the declaring class, if it only reaches it
    /// raw, or if `var` is a method-level parameter.
    pub fn type_parameter(&mut self, ty: &Type, var: TypeVarId) -> Result<Option<Type>> {
        let Some(class) = self.type_param_def(var)?.declaring_class else {
            return Ok(None);
        };
        let Some(Type::Parameterized(p)) = self.exact_supertype(ty, &Class::Named(class))? else {
            return Ok(None);
        };
        let def = self.class_def(class)?;
        Ok(def
            .type_params
            .iter()
            .position(|tp| *tp == var)
            .and_then(|idx| p.args.get(idx).cloned()))
    }

    /// The classes and interfaces bounding `ty`, in bound order and without
    /// duplicates.
    ///
    /// For `B` in `class Foo<A extends Number & Iterable<A>, B extends A>`
    /// this is `[Number, Iterable]`; a class or parameterized type gives just
    /// its own erasure.
    pub fn upper_bound_classes(&mut self, ty: &Type) -> Result<Vec<Class>> {
        let mut result = IndexSet::new();
        self.collect_upper_bound_classes(ty, &mut result)?;
        Ok(result.into_iter().collect())
    }

    fn collect_upper_bound_classes(&mut self, ty: &Type, result: &mut IndexSet<Class>) -> Result<()> {
        if matches!(ty, Type::Class(_) | Type::Parameterized(_)) {
            result.insert(self.erase(ty)?);
            return Ok(());
        }
        for supertype in self.direct_supertypes(ty)? {
            self.collect_upper_bound_classes(&supertype, result)?;
        }
        Ok(())
    }
}

fn mentions_capture(ty: &Type) -> bool {
    match ty {
        Type::Capture(_) => true,
        Type::Class(_) | Type::TypeVar(_) => false,
        Type::Parameterized(p) => {
            p.args.iter().any(mentions_capture) || p.owner.as_deref().is_some_and(mentions_capture)
        }
        Type::Wildcard(w) => w
            .upper_bounds
            .iter()
            .chain(&w.lower_bounds)
            .any(mentions_capture),
        Type::GenericArray(component) => mentions_capture(component),
    }
}

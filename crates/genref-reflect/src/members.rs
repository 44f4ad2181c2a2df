//! Exact types of fields, method parameters and return types as seen
//! through a concrete owner type.

use genref_types::{
    erase, lookup_field, lookup_method, Class, ClassId, FieldDef, MethodDef, Result, Type,
    TypeDisplay, TypeVarId,
};

use crate::Reflector;

impl Reflector<'_> {
    /// The type of a member declared on `declaring` with declared type
    /// `member_ty`, when accessed through an instance of `owner`.
    ///
    /// With `class Box<T> { T value; }`, the member type `T` seen through
    /// `Box<String>` is `String`. Through a raw `Box` it is the erasure of the
    /// declared type. Members of `Object` are returned unchanged.
    pub fn exact_member_type(
        &mut self,
        declaring: ClassId,
        member_ty: &Type,
        owner: &Type,
    ) -> Result<Type> {
        if declaring == self.env.well_known().object {
            return Ok(member_ty.clone());
        }
        self.member_type_with_own_params(declaring, member_ty, owner, &[])
    }

    /// Static fields are not instance members and keep their declared type.
    pub fn exact_field_type(
        &mut self,
        declaring: ClassId,
        field: &FieldDef,
        owner: &Type,
    ) -> Result<Type> {
        if field.is_static {
            return Ok(field.ty.clone());
        }
        self.exact_member_type(declaring, &field.ty, owner)
    }

    /// Parameter types of `method`, resolved element-wise.
    pub fn exact_parameter_types(
        &mut self,
        declaring: ClassId,
        method: &MethodDef,
        owner: &Type,
    ) -> Result<Vec<Type>> {
        if method.is_static || declaring == self.env.well_known().object {
            return Ok(method.params.clone());
        }
        let Some(declaring_type) = self.exact_declaring_type(declaring, owner)? else {
            return Ok(method.params.clone());
        };
        method
            .params
            .iter()
            .map(|param| self.map_type_parameters(param, &declaring_type, &method.type_params))
            .collect()
    }

    /// Return type of `method`; `None` for `void`.
    pub fn exact_return_type(
        &mut self,
        declaring: ClassId,
        method: &MethodDef,
        owner: &Type,
    ) -> Result<Option<Type>> {
        let Some(return_type) = &method.return_type else {
            return Ok(None);
        };
        if method.is_static || declaring == self.env.well_known().object {
            return Ok(Some(return_type.clone()));
        }
        self.member_type_with_own_params(declaring, return_type, owner, &method.type_params)
            .map(Some)
    }

    /// [`Reflector::exact_parameter_types`] with leftover type variables
    /// replaced through [`Reflector::resolve_type_variable_with_bound`].
    pub fn parameter_types_with_bounds(
        &mut self,
        declaring: ClassId,
        method: &MethodDef,
        owner: &Type,
    ) -> Result<Vec<Type>> {
        self.exact_parameter_types(declaring, method, owner)?
            .iter()
            .map(|ty| self.resolve_type_variable_with_bound(ty))
            .collect()
    }

    /// [`Reflector::exact_return_type`] with a leftover type variable
    /// replaced through [`Reflector::resolve_type_variable_with_bound`].
    pub fn return_type_with_bounds(
        &mut self,
        declaring: ClassId,
        method: &MethodDef,
        owner: &Type,
    ) -> Result<Option<Type>> {
        match self.exact_return_type(declaring, method, owner)? {
            Some(ty) => self.resolve_type_variable_with_bound(&ty).map(Some),
            None => Ok(None),
        }
    }

    /// Turns a type that still mentions a free type variable into a class.
    ///
    /// A bare variable becomes its bounding class when it has exactly one,
    /// `Object` otherwise. A parameterized type with a variable among its
    /// arguments is erased. Anything else comes back unchanged.
    pub fn resolve_type_variable_with_bound(&mut self, ty: &Type) -> Result<Type> {
        match ty {
            Type::TypeVar(_) => {
                let mut bounds = self.upper_bound_classes(ty)?;
                if bounds.len() == 1 {
                    Ok(Type::Class(bounds.remove(0)))
                } else {
                    Ok(self.object_type())
                }
            }
            Type::Parameterized(p) if p.args.iter().any(|arg| matches!(arg, Type::TypeVar(_))) => {
                Ok(Type::Class(self.erase(ty)?))
            }
            _ => Ok(ty.clone()),
        }
    }

    /// Looks up field `name` on the erasure of `owner` (or above it) and
    /// resolves its type; `None` if there is no such field.
    pub fn exact_field_type_by_name(&mut self, owner: &Type, name: &str) -> Result<Option<Type>> {
        let env = self.env;
        let Some(class) = owner_class(env, owner)? else {
            return Ok(None);
        };
        let Some((declaring, field)) = lookup_field(env, class, name) else {
            return Ok(None);
        };
        self.exact_field_type(declaring, field, owner).map(Some)
    }

    /// Like [`Reflector::exact_field_type_by_name`] for the return type of
    /// the first method called `name`. `Some(None)` is a `void` method.
    pub fn exact_return_type_by_name(
        &mut self,
        owner: &Type,
        name: &str,
    ) -> Result<Option<Option<Type>>> {
        let env = self.env;
        let Some(class) = owner_class(env, owner)? else {
            return Ok(None);
        };
        let Some((declaring, method)) = lookup_method(env, class, name) else {
            return Ok(None);
        };
        self.exact_return_type(declaring, method, owner).map(Some)
    }

    fn member_type_with_own_params(
        &mut self,
        declaring: ClassId,
        member_ty: &Type,
        owner: &Type,
        own_params: &[TypeVarId],
    ) -> Result<Type> {
        match self.exact_declaring_type(declaring, owner)? {
            Some(declaring_type) => self.map_type_parameters(member_ty, &declaring_type, own_params),
            None => Ok(member_ty.clone()),
        }
    }

    /// Capture-converts `owner` and views it as `declaring`.
    fn exact_declaring_type(&mut self, declaring: ClassId, owner: &Type) -> Result<Option<Type>> {
        let captured = self.capture(owner)?;
        let found = self.exact_supertype(&captured, &Class::Named(declaring))?;
        if found.is_none() {
            tracing::debug!(
                target: "genref.members",
                owner = %TypeDisplay::new(self.env, owner),
                declaring = %declaring,
                "owner is not a subtype of the declaring class; member type left unsubstituted"
            );
        }
        Ok(found)
    }
}

fn owner_class(env: &dyn genref_types::TypeEnv, owner: &Type) -> Result<Option<ClassId>> {
    match owner {
        Type::Class(_) | Type::Parameterized(_) => Ok(erase(env, owner)?.as_named()),
        _ => Ok(None),
    }
}

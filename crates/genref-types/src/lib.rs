//! Type model for reflective generic-type resolution.
//!
//! This crate holds the value types shared by the resolution engine
//! (`genref-reflect`) and by hosts that describe their declarations to it:
//! ids, the closed [`Type`] sum type, declarations ([`ClassDef`],
//! [`TypeParamDef`], members), the [`TypeEnv`] data-source trait, an in-memory
//! [`TypeStore`], erasure and the [`VarMap`] substitution.

#![forbid(unsafe_code)]

mod error;
mod format;
mod store;
mod var_map;

use std::collections::{HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::error::{ReflectError, Result};
pub use crate::format::{class_name, type_name, ClassDisplay, TypeDisplay};
pub use crate::store::TypeStore;
pub use crate::var_map::VarMap;

/// Index of a class or interface declaration inside a [`TypeEnv`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(u32);

/// Index of a declared type parameter inside a [`TypeEnv`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVarId(u32);

/// Index of a capture variable allocated by a resolution context.
///
/// Capture ids are only meaningful for the context that allocated them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaptureId(u32);

macro_rules! raw_id {
    ($ty:ident, $prefix:literal) => {
        impl $ty {
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn to_raw(self) -> u32 {
                self.0
            }

            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

raw_id!(ClassId, "class");
raw_id!(TypeVarId, "tvar");
raw_id!(CaptureId, "capture");

impl CaptureId {
    /// The position of this capture in its context's arena.
    pub fn arena_index(self) -> usize {
        self.index()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

/// A nominal descriptor: the runtime-representable class a type erases to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    Named(ClassId),
    Primitive(PrimitiveType),
    Array(Box<Class>),
}

impl Class {
    pub fn array_of(component: Class) -> Class {
        Class::Array(Box::new(component))
    }

    pub fn component(&self) -> Option<&Class> {
        match self {
            Class::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Class::Primitive(_))
    }

    pub fn as_named(&self) -> Option<ClassId> {
        match self {
            Class::Named(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<ClassId> for Class {
    fn from(id: ClassId) -> Self {
        Class::Named(id)
    }
}

/// A generic class applied to type arguments, e.g. `Map<K, V>.Entry<String, Integer>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterizedType {
    pub class: ClassId,
    pub args: Vec<Type>,
    pub owner: Option<Box<Type>>,
}

/// `?`, `? extends A & B` or `? super C`.
///
/// An unbounded wildcard carries the top type as its single upper bound.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WildcardType {
    pub upper_bounds: Vec<Type>,
    pub lower_bounds: Vec<Type>,
}

impl WildcardType {
    pub fn unbounded(well_known: &WellKnownTypes) -> Self {
        Self {
            upper_bounds: vec![Type::class(well_known.object)],
            lower_bounds: Vec::new(),
        }
    }

    pub fn extends(bound: Type) -> Self {
        Self {
            upper_bounds: vec![bound],
            lower_bounds: Vec::new(),
        }
    }

    pub fn super_of(well_known: &WellKnownTypes, bound: Type) -> Self {
        Self {
            upper_bounds: vec![Type::class(well_known.object)],
            lower_bounds: vec![bound],
        }
    }
}

/// A type expression.
///
/// Values are immutable once built; equality is structural, and captures
/// compare by identity through their [`CaptureId`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// A class, interface, primitive or array of those, without type arguments.
    Class(Class),
    Parameterized(ParameterizedType),
    TypeVar(TypeVarId),
    Wildcard(WildcardType),
    /// An array whose component is parameterized or a type variable.
    GenericArray(Box<Type>),
    Capture(CaptureId),
}

impl Type {
    pub fn class(id: ClassId) -> Type {
        Type::Class(Class::Named(id))
    }

    pub fn primitive(prim: PrimitiveType) -> Type {
        Type::Class(Class::Primitive(prim))
    }

    /// Builds `class<args>` without consulting a [`TypeEnv`].
    ///
    /// Use this while declarations are still being registered (self-referential
    /// bounds mention classes that are not defined yet); otherwise prefer
    /// [`Type::checked_parameterized`].
    pub fn parameterized(class: ClassId, args: Vec<Type>) -> Type {
        Type::Parameterized(ParameterizedType {
            class,
            args,
            owner: None,
        })
    }

    /// Like [`Type::parameterized`] for a member class of a parameterized owner.
    pub fn nested(owner: Type, class: ClassId, args: Vec<Type>) -> Type {
        Type::Parameterized(ParameterizedType {
            class,
            args,
            owner: Some(Box::new(owner)),
        })
    }

    /// Builds `class<args>`, verifying the argument count against the declaration.
    pub fn checked_parameterized(
        env: &dyn TypeEnv,
        class: ClassId,
        args: Vec<Type>,
        owner: Option<Type>,
    ) -> Result<Type> {
        let def = env
            .class(class)
            .ok_or_else(|| ReflectError::unknown_class(class))?;
        if def.type_params.len() != args.len() {
            return Err(ReflectError::ArityMismatch {
                class: Some(class),
                expected: def.type_params.len(),
                found: args.len(),
            });
        }
        Ok(Type::Parameterized(ParameterizedType {
            class,
            args,
            owner: owner.map(Box::new),
        }))
    }

    /// An array of `component`: a nominal array for plain classes, a generic
    /// array otherwise.
    pub fn array_of(component: Type) -> Type {
        match component {
            Type::Class(class) => Type::Class(Class::array_of(class)),
            other => Type::GenericArray(Box::new(other)),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Type::Wildcard(_))
    }
}

impl From<Class> for Type {
    fn from(class: Class) -> Self {
        Type::Class(class)
    }
}

/// The component type of an array type, or `None` for anything else.
pub fn array_component(ty: &Type) -> Option<Type> {
    match ty {
        Type::Class(Class::Array(component)) => Some(Type::Class((**component).clone())),
        Type::GenericArray(component) => Some((**component).clone()),
        _ => None,
    }
}

/// Returns the erasure of `ty`.
///
/// Wildcards and captures must be capture-converted or resolved by the caller
/// first; erasing one is reported as [`ReflectError::NotErasable`].
pub fn erase(env: &dyn TypeEnv, ty: &Type) -> Result<Class> {
    match ty {
        Type::Class(class) => Ok(class.clone()),
        Type::Parameterized(p) => Ok(Class::Named(p.class)),
        Type::TypeVar(id) => {
            let tp = env
                .type_param(*id)
                .ok_or_else(|| ReflectError::unknown_type_param(*id))?;
            match tp.upper_bounds.first() {
                Some(bound) => erase(env, bound),
                None => Ok(Class::Named(env.well_known().object)),
            }
        }
        Type::GenericArray(component) => Ok(Class::array_of(erase(env, component)?)),
        Type::Wildcard(_) => Err(ReflectError::NotErasable { kind: "wildcard" }),
        Type::Capture(_) => Err(ReflectError::NotErasable { kind: "capture" }),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    /// Declared bounds; empty means the top type.
    pub upper_bounds: Vec<Type>,
    /// The class declaring this parameter, `None` for method-level parameters.
    pub declaring_class: Option<ClassId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
    pub is_static: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<Type>,
    /// `None` for `void`.
    pub return_type: Option<Type>,
    pub is_static: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.Map$Entry`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    /// The lexically enclosing class for member classes.
    pub enclosing: Option<ClassId>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    /// Declared direct supertypes: the superclass (if any), then interfaces in
    /// declaration order.
    pub fn declared_supertypes(&self) -> impl Iterator<Item = &Type> {
        self.super_class.iter().chain(self.interfaces.iter())
    }
}

/// Classes the engine needs to know about by identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellKnownTypes {
    /// The universal top type.
    pub object: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub integer: ClassId,
}

impl WellKnownTypes {
    /// The supertypes every array type has, in order.
    pub fn array_supertypes(&self) -> [ClassId; 3] {
        [self.object, self.cloneable, self.serializable]
    }
}

/// Declarations supplied by the host reflection layer.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;

    /// Host "is-a" check on erased descriptors.
    ///
    /// The provided implementation walks declared supertypes; hosts with a
    /// native check should override it.
    fn is_assignable_erasure(&self, target: &Class, source: &Class) -> bool {
        assignable_erasure(self, target, source)
    }
}

fn assignable_erasure<E: TypeEnv + ?Sized>(env: &E, target: &Class, source: &Class) -> bool {
    if target == source {
        return true;
    }
    let wk = env.well_known();
    match (target, source) {
        (_, Class::Primitive(_)) | (Class::Primitive(_), _) => false,
        (Class::Named(t), _) if *t == wk.object => true,
        (Class::Named(t), Class::Array(_)) => *t == wk.cloneable || *t == wk.serializable,
        (Class::Array(t), Class::Array(s)) => {
            !t.is_primitive() && !s.is_primitive() && assignable_erasure(env, t, s)
        }
        (Class::Array(_), Class::Named(_)) => false,
        (Class::Named(target), Class::Named(source)) => {
            let mut queue = VecDeque::from([*source]);
            let mut seen = HashSet::new();
            while let Some(current) = queue.pop_front() {
                if current == *target {
                    return true;
                }
                if !seen.insert(current) {
                    continue;
                }
                let Some(def) = env.class(current) else {
                    continue;
                };
                queue.extend(def.declared_supertypes().filter_map(declared_class_id));
            }
            false
        }
    }
}

fn declared_class_id(ty: &Type) -> Option<ClassId> {
    match ty {
        Type::Class(Class::Named(id)) => Some(*id),
        Type::Parameterized(p) => Some(p.class),
        _ => None,
    }
}

/// Finds a field by name on `class` or the nearest class/interface above it.
///
/// Returns the declaring class alongside the field.
pub fn lookup_field<'env>(
    env: &'env dyn TypeEnv,
    class: ClassId,
    name: &str,
) -> Option<(ClassId, &'env FieldDef)> {
    find_member(env, class, |def| def.fields.iter().find(|f| f.name == name))
}

/// Finds the first method called `name` on `class` or above it.
pub fn lookup_method<'env>(
    env: &'env dyn TypeEnv,
    class: ClassId,
    name: &str,
) -> Option<(ClassId, &'env MethodDef)> {
    find_member(env, class, |def| def.methods.iter().find(|m| m.name == name))
}

fn find_member<'env, T>(
    env: &'env dyn TypeEnv,
    class: ClassId,
    find: impl Fn(&'env ClassDef) -> Option<&'env T>,
) -> Option<(ClassId, &'env T)> {
    let mut queue = VecDeque::from([class]);
    let mut seen = HashSet::new();
    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        let Some(def) = env.class(current) else {
            continue;
        };
        if let Some(member) = find(def) {
            return Some((current, member));
        }
        queue.extend(def.declared_supertypes().filter_map(declared_class_id));
    }
    None
}

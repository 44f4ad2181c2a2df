//! Java-like rendering of types for diagnostics and logs.

use std::fmt;

use crate::{Class, ClassId, Type, TypeEnv, WildcardType};

/// Renders a [`Type`] as Java source text, e.g. `java.util.List<? extends java.lang.Number>`.
pub struct TypeDisplay<'a> {
    env: &'a dyn TypeEnv,
    ty: &'a Type,
}

impl<'a> TypeDisplay<'a> {
    pub fn new(env: &'a dyn TypeEnv, ty: &'a Type) -> Self {
        Self { env, ty }
    }
}

/// Renders a [`Class`] descriptor, e.g. `int[]`.
pub struct ClassDisplay<'a> {
    env: &'a dyn TypeEnv,
    class: &'a Class,
}

impl<'a> ClassDisplay<'a> {
    pub fn new(env: &'a dyn TypeEnv, class: &'a Class) -> Self {
        Self { env, class }
    }
}

pub fn type_name(env: &dyn TypeEnv, ty: &Type) -> String {
    TypeDisplay::new(env, ty).to_string()
}

pub fn class_name(env: &dyn TypeEnv, class: &Class) -> String {
    ClassDisplay::new(env, class).to_string()
}

fn binary_name(env: &dyn TypeEnv, id: ClassId) -> String {
    match env.class(id) {
        Some(def) => def.name.clone(),
        None => format!("<unknown {id}>"),
    }
}

impl fmt::Display for ClassDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            Class::Named(id) => f.write_str(&binary_name(self.env, *id)),
            Class::Primitive(prim) => f.write_str(prim.name()),
            Class::Array(component) => {
                write!(f, "{}[]", ClassDisplay::new(self.env, component))
            }
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env = self.env;
        match self.ty {
            Type::Class(class) => fmt::Display::fmt(&ClassDisplay::new(env, class), f),
            Type::Parameterized(p) => {
                let mut name = binary_name(env, p.class);
                if let Some(owner) = &p.owner {
                    write!(f, "{}.", TypeDisplay::new(env, owner))?;
                    let owner_class = match &**owner {
                        Type::Parameterized(o) => Some(o.class),
                        Type::Class(Class::Named(id)) => Some(*id),
                        _ => None,
                    };
                    if let Some(owner_class) = owner_class {
                        let prefix = format!("{}$", binary_name(env, owner_class));
                        if let Some(simple) = name.strip_prefix(&prefix) {
                            name = simple.to_string();
                        }
                    }
                }
                f.write_str(&name)?;
                if !p.args.is_empty() {
                    f.write_str("<")?;
                    for (idx, arg) in p.args.iter().enumerate() {
                        if idx != 0 {
                            f.write_str(", ")?;
                        }
                        fmt::Display::fmt(&TypeDisplay::new(env, arg), f)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Type::TypeVar(id) => match env.type_param(*id) {
                Some(tp) => f.write_str(&tp.name),
                None => write!(f, "<unknown {id}>"),
            },
            Type::Wildcard(w) => fmt_wildcard(env, w, f),
            Type::GenericArray(component) => write!(f, "{}[]", TypeDisplay::new(env, component)),
            Type::Capture(id) => write!(f, "CAP#{}", id.arena_index() + 1),
        }
    }
}

fn fmt_wildcard(env: &dyn TypeEnv, w: &WildcardType, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("?")?;
    let object = Type::class(env.well_known().object);
    if !w.lower_bounds.is_empty() {
        f.write_str(" super ")?;
        return fmt_bounds(env, &w.lower_bounds, f);
    }
    if w.upper_bounds.is_empty() || w.upper_bounds == [object] {
        return Ok(());
    }
    f.write_str(" extends ")?;
    fmt_bounds(env, &w.upper_bounds, f)
}

fn fmt_bounds(env: &dyn TypeEnv, bounds: &[Type], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (idx, bound) in bounds.iter().enumerate() {
        if idx != 0 {
            f.write_str(" & ")?;
        }
        fmt::Display::fmt(&TypeDisplay::new(env, bound), f)?;
    }
    Ok(())
}

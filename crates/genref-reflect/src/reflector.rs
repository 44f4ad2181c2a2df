use std::collections::HashMap;
use std::fmt;

use genref_types::{
    CaptureId, Class, ClassDef, ClassId, ReflectError, Result, Type, TypeEnv, TypeParamDef,
    TypeVarId, WellKnownTypes, WildcardType,
};

use crate::config::ReflectConfig;

/// A capture variable standing in for one wildcard at one argument position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureDef {
    /// The wildcard this capture replaced.
    pub wildcard: WildcardType,
    /// The declared type parameter at the captured position.
    pub variable: TypeVarId,
    /// Never empty.
    pub upper_bounds: Vec<Type>,
    pub lower_bounds: Vec<Type>,
}

/// Per-call resolution context.
///
/// A reflector borrows the host's [`TypeEnv`] and owns everything a resolution
/// allocates: capture variables (an arena indexed by [`CaptureId`]) and the
/// optional supertype memo table. Types containing captures are only
/// meaningful together with the reflector that produced them.
///
/// Every capture conversion (including the ones `is_supertype` and the
/// member resolvers perform internally) appends to the capture arena, which
/// is only emptied by [`Reflector::reset`]. Long-lived reflectors should be
/// reset between independent queries, or replaced by a fresh one per query.
pub struct Reflector<'env> {
    pub(crate) env: &'env dyn TypeEnv,
    pub(crate) config: ReflectConfig,
    captures: Vec<CaptureDef>,
    pub(crate) supertype_cache: HashMap<Type, Vec<Type>>,
}

impl fmt::Debug for Reflector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflector")
            .field("config", &self.config)
            .field("captures", &self.captures)
            .finish_non_exhaustive()
    }
}

impl<'env> Reflector<'env> {
    pub fn new(env: &'env dyn TypeEnv) -> Self {
        Self::with_config(env, ReflectConfig::default())
    }

    pub fn with_config(env: &'env dyn TypeEnv, config: ReflectConfig) -> Self {
        Self {
            env,
            config,
            captures: Vec::new(),
            supertype_cache: HashMap::new(),
        }
    }

    pub fn env(&self) -> &'env dyn TypeEnv {
        self.env
    }

    pub fn config(&self) -> &ReflectConfig {
        &self.config
    }

    pub fn capture_def(&self, id: CaptureId) -> Option<&CaptureDef> {
        self.captures.get(id.arena_index())
    }

    pub fn captures(&self) -> &[CaptureDef] {
        &self.captures
    }

    /// Drop all captures and cached supertypes.
    ///
    /// Types produced before the reset must not be used with this reflector
    /// afterwards.
    pub fn reset(&mut self) {
        self.captures.clear();
        self.supertype_cache.clear();
    }

    /// The erasure of `ty` (see [`genref_types::erase`]).
    pub fn erase(&self, ty: &Type) -> Result<Class> {
        genref_types::erase(self.env, ty)
    }

    pub(crate) fn object_type(&self) -> Type {
        Type::class(self.env.well_known().object)
    }

    pub(crate) fn class_def(&self, id: ClassId) -> Result<&'env ClassDef> {
        self.env
            .class(id)
            .ok_or_else(|| ReflectError::unknown_class(id))
    }

    pub(crate) fn type_param_def(&self, id: TypeVarId) -> Result<&'env TypeParamDef> {
        self.env
            .type_param(id)
            .ok_or_else(|| ReflectError::unknown_type_param(id))
    }

    pub(crate) fn capture_bounds(&self, id: CaptureId) -> Result<&CaptureDef> {
        self.capture_def(id)
            .ok_or_else(|| ReflectError::unknown_capture(id))
    }

    /// Reserve a capture whose bounds are finalized once all siblings exist.
    pub(crate) fn alloc_capture(&mut self, variable: TypeVarId, wildcard: WildcardType) -> CaptureId {
        let idx: u32 = self
            .captures
            .len()
            .try_into()
            .expect("too many capture variables");
        let object = self.object_type();
        self.captures.push(CaptureDef {
            wildcard,
            variable,
            upper_bounds: vec![object],
            lower_bounds: Vec::new(),
        });
        CaptureId::from_raw(idx)
    }

    pub(crate) fn finish_capture(
        &mut self,
        id: CaptureId,
        upper_bounds: Vec<Type>,
        lower_bounds: Vec<Type>,
    ) -> Result<()> {
        let def = self
            .captures
            .get_mut(id.arena_index())
            .ok_or_else(|| ReflectError::unknown_capture(id))?;
        def.upper_bounds = upper_bounds;
        def.lower_bounds = lower_bounds;
        Ok(())
    }
}

impl TypeEnv for Reflector<'_> {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.env.class(id)
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.env.type_param(id)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.env.lookup_class(name)
    }

    fn well_known(&self) -> &WellKnownTypes {
        self.env.well_known()
    }

    fn is_assignable_erasure(&self, target: &Class, source: &Class) -> bool {
        self.env.is_assignable_erasure(target, source)
    }
}

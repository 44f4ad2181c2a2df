use std::collections::HashMap;

use crate::{
    ClassDef, ClassId, ClassKind, FieldDef, MethodDef, PrimitiveType, Type, TypeEnv,
    TypeParamDef, TypeVarId, WellKnownTypes,
};

/// In-memory [`TypeEnv`] populated by the host.
///
/// Class ids can be reserved with [`TypeStore::intern_class_id`] before the
/// class is defined and type parameters can be redefined after allocation, so
/// self-referential declarations (`E extends Enum<E>`) are expressible.
#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: Vec<Option<ClassDef>>,
    class_names: HashMap<String, ClassId>,
    type_params: Vec<TypeParamDef>,
    well_known: WellKnownTypes,
}

impl TypeStore {
    /// Reserve (or look up) the id for `name` without defining the class.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.class_names.get(name) {
            return *id;
        }
        let raw: u32 = self
            .classes
            .len()
            .try_into()
            .expect("too many classes in TypeStore");
        let id = ClassId::from_raw(raw);
        self.classes.push(None);
        self.class_names.insert(name.to_string(), id);
        id
    }

    /// Define (or redefine) the class behind `id`.
    ///
    /// The class's type parameters are marked as declared by it.
    pub fn define_class(&mut self, id: ClassId, def: ClassDef) {
        for tp in &def.type_params {
            if let Some(param) = self.type_params.get_mut(tp.index()) {
                param.declaring_class = Some(id);
            }
        }
        self.class_names.insert(def.name.clone(), id);
        if let Some(slot) = self.classes.get_mut(id.index()) {
            *slot = Some(def);
        }
    }

    /// Intern `def.name` and define it, replacing any previous definition.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    pub fn add_type_param(&mut self, name: impl Into<String>, upper_bounds: Vec<Type>) -> TypeVarId {
        let raw: u32 = self
            .type_params
            .len()
            .try_into()
            .expect("too many type params in TypeStore");
        self.type_params.push(TypeParamDef {
            name: name.into(),
            upper_bounds,
            declaring_class: None,
        });
        TypeVarId::from_raw(raw)
    }

    pub fn define_type_param(&mut self, id: TypeVarId, def: TypeParamDef) {
        if let Some(slot) = self.type_params.get_mut(id.index()) {
            *slot = def;
        }
    }

    /// Exact binary-name lookup, unlike [`TypeEnv::lookup_class`].
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.class_names.get(name).copied()
    }

    /// A store with `java.lang` core types plus the collection interfaces and
    /// classes most hierarchies bottom out in.
    pub fn with_minimal_jdk() -> Self {
        let mut store = TypeStore::default();
        let object = Type::class(store.well_known.object);
        let cloneable = Type::class(store.well_known.cloneable);
        let serializable = Type::class(store.well_known.serializable);
        let int = Type::primitive(PrimitiveType::Int);
        let boolean = Type::primitive(PrimitiveType::Boolean);

        let iterator = store.intern_class_id("java.util.Iterator");
        let iterable = store.intern_class_id("java.lang.Iterable");
        let collection = store.intern_class_id("java.util.Collection");
        let list = store.intern_class_id("java.util.List");
        let set = store.intern_class_id("java.util.Set");
        let random_access = store.intern_class_id("java.util.RandomAccess");
        let abstract_collection = store.intern_class_id("java.util.AbstractCollection");
        let abstract_list = store.intern_class_id("java.util.AbstractList");
        let array_list = store.intern_class_id("java.util.ArrayList");
        let map = store.intern_class_id("java.util.Map");
        let entry = store.intern_class_id("java.util.Map$Entry");
        let hash_map = store.intern_class_id("java.util.HashMap");

        // interface Iterator<E> { E next(); boolean hasNext(); }
        let e = store.add_type_param("E", vec![object.clone()]);
        let mut def = interface("java.util.Iterator", vec![e], vec![]);
        def.methods.push(method("hasNext", vec![], Some(boolean.clone())));
        def.methods.push(method("next", vec![], Some(Type::TypeVar(e))));
        store.define_class(iterator, def);

        // interface Iterable<T> { Iterator<T> iterator(); }
        let t = store.add_type_param("T", vec![object.clone()]);
        let mut def = interface("java.lang.Iterable", vec![t], vec![]);
        def.methods.push(method(
            "iterator",
            vec![],
            Some(Type::parameterized(iterator, vec![Type::TypeVar(t)])),
        ));
        store.define_class(iterable, def);

        // interface Collection<E> extends Iterable<E>
        let e = store.add_type_param("E", vec![object.clone()]);
        let mut def = interface(
            "java.util.Collection",
            vec![e],
            vec![Type::parameterized(iterable, vec![Type::TypeVar(e)])],
        );
        def.methods.push(method("size", vec![], Some(int.clone())));
        def.methods.push(method("add", vec![Type::TypeVar(e)], Some(boolean.clone())));
        store.define_class(collection, def);

        // interface List<E> extends Collection<E>
        let e = store.add_type_param("E", vec![object.clone()]);
        let mut def = interface(
            "java.util.List",
            vec![e],
            vec![Type::parameterized(collection, vec![Type::TypeVar(e)])],
        );
        def.methods.push(method("get", vec![int.clone()], Some(Type::TypeVar(e))));
        def.methods.push(method(
            "set",
            vec![int.clone(), Type::TypeVar(e)],
            Some(Type::TypeVar(e)),
        ));
        store.define_class(list, def);

        // interface Set<E> extends Collection<E>
        let e = store.add_type_param("E", vec![object.clone()]);
        let def = interface(
            "java.util.Set",
            vec![e],
            vec![Type::parameterized(collection, vec![Type::TypeVar(e)])],
        );
        store.define_class(set, def);

        store.define_class(random_access, interface("java.util.RandomAccess", vec![], vec![]));

        // abstract class AbstractCollection<E> implements Collection<E>
        let e = store.add_type_param("E", vec![object.clone()]);
        let def = class(
            "java.util.AbstractCollection",
            vec![e],
            object.clone(),
            vec![Type::parameterized(collection, vec![Type::TypeVar(e)])],
        );
        store.define_class(abstract_collection, def);

        // abstract class AbstractList<E> extends AbstractCollection<E> implements List<E>
        let e = store.add_type_param("E", vec![object.clone()]);
        let mut def = class(
            "java.util.AbstractList",
            vec![e],
            Type::parameterized(abstract_collection, vec![Type::TypeVar(e)]),
            vec![Type::parameterized(list, vec![Type::TypeVar(e)])],
        );
        def.fields.push(field("modCount", int.clone()));
        store.define_class(abstract_list, def);

        // class ArrayList<E> extends AbstractList<E>
        //     implements List<E>, RandomAccess, Cloneable, Serializable
        let e = store.add_type_param("E", vec![object.clone()]);
        let mut def = class(
            "java.util.ArrayList",
            vec![e],
            Type::parameterized(abstract_list, vec![Type::TypeVar(e)]),
            vec![
                Type::parameterized(list, vec![Type::TypeVar(e)]),
                Type::class(random_access),
                cloneable.clone(),
                serializable.clone(),
            ],
        );
        def.fields.push(field(
            "elementData",
            Type::array_of(object.clone()),
        ));
        store.define_class(array_list, def);

        // interface Map<K, V> { V get(Object); V put(K, V); Set<Map.Entry<K, V>> entrySet(); }
        let k = store.add_type_param("K", vec![object.clone()]);
        let v = store.add_type_param("V", vec![object.clone()]);
        let mut def = interface("java.util.Map", vec![k, v], vec![]);
        def.methods.push(method("get", vec![object.clone()], Some(Type::TypeVar(v))));
        def.methods.push(method(
            "put",
            vec![Type::TypeVar(k), Type::TypeVar(v)],
            Some(Type::TypeVar(v)),
        ));
        def.methods.push(method(
            "entrySet",
            vec![],
            Some(Type::parameterized(
                set,
                vec![Type::nested(
                    Type::class(map),
                    entry,
                    vec![Type::TypeVar(k), Type::TypeVar(v)],
                )],
            )),
        ));
        store.define_class(map, def);

        // interface Map.Entry<K, V> { K getKey(); V getValue(); }
        let k = store.add_type_param("K", vec![object.clone()]);
        let v = store.add_type_param("V", vec![object.clone()]);
        let mut def = interface("java.util.Map$Entry", vec![k, v], vec![]);
        def.enclosing = Some(map);
        def.methods.push(method("getKey", vec![], Some(Type::TypeVar(k))));
        def.methods.push(method("getValue", vec![], Some(Type::TypeVar(v))));
        store.define_class(entry, def);

        // class HashMap<K, V> implements Map<K, V>, Cloneable, Serializable
        let k = store.add_type_param("K", vec![object.clone()]);
        let v = store.add_type_param("V", vec![object.clone()]);
        let def = class(
            "java.util.HashMap",
            vec![k, v],
            object,
            vec![
                Type::parameterized(map, vec![Type::TypeVar(k), Type::TypeVar(v)]),
                cloneable,
                serializable,
            ],
        );
        store.define_class(hash_map, def);

        store
    }
}

impl Default for TypeStore {
    /// The `java.lang` core: `Object`, the array marker interfaces,
    /// `Comparable`, `CharSequence`, `Number` and a few boxes, `String` and
    /// `Enum`.
    fn default() -> Self {
        let placeholder = ClassId::from_raw(0);
        let mut store = TypeStore {
            classes: Vec::new(),
            class_names: HashMap::new(),
            type_params: Vec::new(),
            well_known: WellKnownTypes {
                object: placeholder,
                cloneable: placeholder,
                serializable: placeholder,
                string: placeholder,
                number: placeholder,
                integer: placeholder,
            },
        };

        let object_id = store.intern_class_id("java.lang.Object");
        let cloneable_id = store.intern_class_id("java.lang.Cloneable");
        let serializable_id = store.intern_class_id("java.io.Serializable");
        let comparable = store.intern_class_id("java.lang.Comparable");
        let char_sequence = store.intern_class_id("java.lang.CharSequence");
        let number_id = store.intern_class_id("java.lang.Number");
        let integer_id = store.intern_class_id("java.lang.Integer");
        let long_id = store.intern_class_id("java.lang.Long");
        let double_id = store.intern_class_id("java.lang.Double");
        let string_id = store.intern_class_id("java.lang.String");
        let enum_id = store.intern_class_id("java.lang.Enum");
        store.well_known = WellKnownTypes {
            object: object_id,
            cloneable: cloneable_id,
            serializable: serializable_id,
            string: string_id,
            number: number_id,
            integer: integer_id,
        };

        let object = Type::class(object_id);
        let serializable = Type::class(serializable_id);
        let string = Type::class(string_id);
        let int = Type::primitive(PrimitiveType::Int);

        let mut def = ClassDef {
            name: "java.lang.Object".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: None,
            interfaces: vec![],
            enclosing: None,
            fields: vec![],
            methods: vec![],
        };
        def.methods.push(method("hashCode", vec![], Some(int.clone())));
        def.methods.push(method("toString", vec![], Some(string.clone())));
        def.methods.push(method(
            "equals",
            vec![object.clone()],
            Some(Type::primitive(PrimitiveType::Boolean)),
        ));
        store.define_class(object_id, def);

        store.define_class(cloneable_id, interface("java.lang.Cloneable", vec![], vec![]));
        store.define_class(serializable_id, interface("java.io.Serializable", vec![], vec![]));

        // interface Comparable<T> { int compareTo(T); }
        let t = store.add_type_param("T", vec![object.clone()]);
        let mut def = interface("java.lang.Comparable", vec![t], vec![]);
        def.methods.push(method("compareTo", vec![Type::TypeVar(t)], Some(int.clone())));
        store.define_class(comparable, def);

        let mut def = interface("java.lang.CharSequence", vec![], vec![]);
        def.methods.push(method("length", vec![], Some(int.clone())));
        store.define_class(char_sequence, def);

        let mut def = class("java.lang.Number", vec![], object.clone(), vec![serializable.clone()]);
        def.methods.push(method("intValue", vec![], Some(int.clone())));
        store.define_class(number_id, def);

        for (id, name) in [
            (integer_id, "java.lang.Integer"),
            (long_id, "java.lang.Long"),
            (double_id, "java.lang.Double"),
        ] {
            let def = class(
                name,
                vec![],
                Type::class(number_id),
                vec![Type::parameterized(comparable, vec![Type::class(id)])],
            );
            store.define_class(id, def);
        }

        let def = class(
            "java.lang.String",
            vec![],
            object.clone(),
            vec![
                serializable.clone(),
                Type::parameterized(comparable, vec![string.clone()]),
                Type::class(char_sequence),
            ],
        );
        store.define_class(string_id, def);

        // abstract class Enum<E extends Enum<E>> implements Comparable<E>, Serializable
        let e = store.add_type_param("E", vec![object.clone()]);
        store.define_type_param(
            e,
            TypeParamDef {
                name: "E".to_string(),
                upper_bounds: vec![Type::parameterized(enum_id, vec![Type::TypeVar(e)])],
                declaring_class: None,
            },
        );
        let mut def = class(
            "java.lang.Enum",
            vec![e],
            object,
            vec![
                Type::parameterized(comparable, vec![Type::TypeVar(e)]),
                serializable,
            ],
        );
        def.methods.push(method("name", vec![], Some(string)));
        def.methods.push(method("ordinal", vec![], Some(int)));
        store.define_class(enum_id, def);

        store
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())?.as_ref()
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.index())
    }

    /// Binary names resolve directly; simple names fall back to `java.lang`.
    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.class_id(name)
            .or_else(|| self.class_id(&format!("java.lang.{name}")))
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

fn class(name: &str, type_params: Vec<TypeVarId>, super_class: Type, interfaces: Vec<Type>) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Class,
        type_params,
        super_class: Some(super_class),
        interfaces,
        enclosing: None,
        fields: vec![],
        methods: vec![],
    }
}

fn interface(name: &str, type_params: Vec<TypeVarId>, interfaces: Vec<Type>) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Interface,
        type_params,
        super_class: None,
        interfaces,
        enclosing: None,
        fields: vec![],
        methods: vec![],
    }
}

fn method(name: &str, params: Vec<Type>, return_type: Option<Type>) -> MethodDef {
    MethodDef {
        name: name.to_string(),
        type_params: vec![],
        params,
        return_type,
        is_static: false,
    }
}

fn field(name: &str, ty: Type) -> FieldDef {
    FieldDef {
        name: name.to_string(),
        ty,
        is_static: false,
    }
}

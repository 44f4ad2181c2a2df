//! Small class hierarchies shared by the integration tests.
#![allow(dead_code)]

use genref_types::{
    ClassDef, ClassId, ClassKind, FieldDef, MethodDef, Type, TypeEnv, TypeParamDef, TypeStore,
    TypeVarId,
};

/// ```text
/// class Util {
///     static <U> List<U> wrap(U value);
///     static <N extends Number> N first(List<N> values);
///     static <M extends Number & Comparable<M>> M max(M a, M b);
/// }
/// ```
pub fn add_util(store: &mut TypeStore) -> (ClassId, TypeVarId) {
    let object = Type::class(store.well_known().object);
    let list = class_id(store, "java.util.List");
    let u = store.add_type_param("U", vec![object.clone()]);
    let mut def = class_def("com.example.Util", vec![], object, vec![]);
    def.methods.push(MethodDef {
        name: "wrap".to_string(),
        type_params: vec![u],
        params: vec![Type::TypeVar(u)],
        return_type: Some(Type::parameterized(list, vec![Type::TypeVar(u)])),
        is_static: true,
    });

    let number = Type::class(store.well_known().number);
    let comparable = class_id(store, "java.lang.Comparable");
    let n = store.add_type_param("N", vec![number.clone()]);
    def.methods.push(MethodDef {
        name: "first".to_string(),
        type_params: vec![n],
        params: vec![Type::parameterized(list, vec![Type::TypeVar(n)])],
        return_type: Some(Type::TypeVar(n)),
        is_static: true,
    });

    let m = store.add_type_param("M", vec![]);
    store.define_type_param(
        m,
        TypeParamDef {
            name: "M".to_string(),
            upper_bounds: vec![number, Type::parameterized(comparable, vec![Type::TypeVar(m)])],
            declaring_class: None,
        },
    );
    def.methods.push(MethodDef {
        name: "max".to_string(),
        type_params: vec![m],
        params: vec![Type::TypeVar(m), Type::TypeVar(m)],
        return_type: Some(Type::TypeVar(m)),
        is_static: true,
    });
    (store.add_class(def), u)
}

pub fn field(name: &str, ty: Type) -> FieldDef {
    FieldDef {
        name: name.to_string(),
        ty,
        is_static: false,
    }
}

pub fn method(name: &str, params: Vec<Type>, return_type: Option<Type>) -> MethodDef {
    MethodDef {
        name: name.to_string(),
        type_params: vec![],
        params,
        return_type,
        is_static: false,
    }
}

pub fn class_def(
    name: &str,
    type_params: Vec<TypeVarId>,
    super_class: Type,
    interfaces: Vec<Type>,
) -> ClassDef {
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

pub fn class_id(store: &TypeStore, name: &str) -> ClassId {
    store
        .class_id(name)
        .unwrap_or_else(|| panic!("{name} must be defined"))
}

pub struct BoxFixture {
    pub store: TypeStore,
    /// `class Container<T> { T item; void clear(); }`
    pub container: ClassId,
    pub container_t: TypeVarId,
    /// `class Box<T> extends Container<T> { T value; <U> Map<T, U> pairWith(U other); }`
    pub boxed: ClassId,
    pub box_t: TypeVarId,
    pub pair_with_u: TypeVarId,
}

pub fn box_fixture() -> BoxFixture {
    let mut store = TypeStore::with_minimal_jdk();
    let object = Type::class(store.well_known().object);
    let map = class_id(&store, "java.util.Map");

    let container_t = store.add_type_param("T", vec![object.clone()]);
    let mut def = class_def("com.example.Container", vec![container_t], object.clone(), vec![]);
    def.fields.push(field("item", Type::TypeVar(container_t)));
    def.methods.push(method("clear", vec![], None));
    let container = store.add_class(def);

    let box_t = store.add_type_param("T", vec![object.clone()]);
    let pair_with_u = store.add_type_param("U", vec![object.clone()]);
    let mut def = class_def(
        "com.example.Box",
        vec![box_t],
        Type::parameterized(container, vec![Type::TypeVar(box_t)]),
        vec![],
    );
    def.fields.push(field("value", Type::TypeVar(box_t)));
    def.methods.push(MethodDef {
        name: "pairWith".to_string(),
        type_params: vec![pair_with_u],
        params: vec![Type::TypeVar(pair_with_u)],
        return_type: Some(Type::parameterized(
            map,
            vec![Type::TypeVar(box_t), Type::TypeVar(pair_with_u)],
        )),
        is_static: false,
    });
    let boxed = store.add_class(def);

    BoxFixture {
        store,
        container,
        container_t,
        boxed,
        box_t,
        pair_with_u,
    }
}

/// `class Pair<A, B> { A first; B second; List<A> firsts; A[] array; static List<String> NAMES; }`
pub fn add_pair(store: &mut TypeStore) -> (ClassId, TypeVarId, TypeVarId) {
    let object = Type::class(store.well_known().object);
    let list = class_id(store, "java.util.List");
    let a = store.add_type_param("A", vec![object.clone()]);
    let b = store.add_type_param("B", vec![object.clone()]);
    let mut def = class_def("com.example.Pair", vec![a, b], object, vec![]);
    def.fields.push(field("first", Type::TypeVar(a)));
    def.fields.push(field("second", Type::TypeVar(b)));
    def.fields.push(field("firsts", Type::parameterized(list, vec![Type::TypeVar(a)])));
    def.fields.push(field("array", Type::array_of(Type::TypeVar(a))));
    def.fields.push(FieldDef {
        name: "NAMES".to_string(),
        ty: Type::parameterized(list, vec![Type::class(store.well_known().string)]),
        is_static: true,
    });
    let pair = store.add_class(def);
    (pair, a, b)
}

/// `class Outer<T> { class Inner { T value; } }`
pub fn add_outer_inner(store: &mut TypeStore) -> (ClassId, ClassId, TypeVarId) {
    let object = Type::class(store.well_known().object);
    let t = store.add_type_param("T", vec![object.clone()]);
    let outer = store.add_class(class_def("com.example.Outer", vec![t], object.clone(), vec![]));

    let mut def = class_def("com.example.Outer$Inner", vec![], object, vec![]);
    def.enclosing = Some(outer);
    def.fields.push(field("value", Type::TypeVar(t)));
    let inner = store.add_class(def);
    (outer, inner, t)
}

/// `class StringList extends ArrayList<String> {}`
pub fn add_string_list(store: &mut TypeStore) -> ClassId {
    let array_list = class_id(store, "java.util.ArrayList");
    let string = Type::class(store.well_known().string);
    store.add_class(class_def(
        "com.example.StringList",
        vec![],
        Type::parameterized(array_list, vec![string]),
        vec![],
    ))
}

/// `class Foo<A extends Number & Iterable<A>, B extends A> {}`
pub fn add_foo(store: &mut TypeStore) -> (ClassId, TypeVarId, TypeVarId) {
    let object = Type::class(store.well_known().object);
    let number = Type::class(store.well_known().number);
    let iterable = class_id(store, "java.lang.Iterable");

    let a = store.add_type_param("A", vec![object.clone()]);
    store.define_type_param(
        a,
        TypeParamDef {
            name: "A".to_string(),
            upper_bounds: vec![number, Type::parameterized(iterable, vec![Type::TypeVar(a)])],
            declaring_class: None,
        },
    );
    let b = store.add_type_param("B", vec![Type::TypeVar(a)]);
    let foo = store.add_class(class_def("com.example.Foo", vec![a, b], object, vec![]));
    (foo, a, b)
}

/// `class Node<A extends Comparable<B>, B> {}`
pub fn add_node(store: &mut TypeStore) -> (ClassId, TypeVarId, TypeVarId) {
    let object = Type::class(store.well_known().object);
    let comparable = class_id(store, "java.lang.Comparable");
    let a = store.add_type_param("A", vec![object.clone()]);
    let b = store.add_type_param("B", vec![object.clone()]);
    store.define_type_param(
        a,
        TypeParamDef {
            name: "A".to_string(),
            upper_bounds: vec![Type::parameterized(comparable, vec![Type::TypeVar(b)])],
            declaring_class: None,
        },
    );
    let node = store.add_class(class_def("com.example.Node", vec![a, b], object, vec![]));
    (node, a, b)
}

mod fixtures;

use genref_reflect::Reflector;
use genref_types::{CaptureId, ReflectError, Type, TypeEnv, TypeStore, WildcardType};

use fixtures::{add_node, add_outer_inner, class_id};
use pretty_assertions::assert_eq;

fn capture_ids(ty: &Type) -> Vec<CaptureId> {
    let Type::Parameterized(p) = ty else {
        panic!("expected a parameterized type, got {ty:?}");
    };
    p.args
        .iter()
        .map(|arg| match arg {
            Type::Capture(id) => *id,
            other => panic!("expected a capture, got {other:?}"),
        })
        .collect()
}

#[test]
fn extends_wildcard_captures_to_its_bound() {
    let store = TypeStore::with_minimal_jdk();
    let wk = store.well_known().clone();
    let list = class_id(&store, "java.util.List");
    let number = Type::class(wk.number);

    let mut reflector = Reflector::new(&store);
    let captured = reflector
        .capture(&Type::parameterized(
            list,
            vec![Type::Wildcard(WildcardType::extends(number.clone()))],
        ))
        .unwrap();

    let ids = capture_ids(&captured);
    assert_eq!(ids.len(), 1);
    let def = reflector.capture_def(ids[0]).unwrap();
    assert_eq!(def.upper_bounds, vec![number]);
    assert!(def.lower_bounds.is_empty());
    assert_eq!(def.variable, store.class(list).unwrap().type_params[0]);
    assert_eq!(
        genref_types::type_name(&reflector, &captured),
        "java.util.List<CAP#1>"
    );
}

#[test]
fn unbounded_wildcard_takes_the_declared_bound() {
    let mut store = TypeStore::with_minimal_jdk();
    let (foo, _, _) = fixtures::add_foo(&mut store);
    let wk = store.well_known().clone();
    let iterable = class_id(&store, "java.lang.Iterable");
    let unbounded = Type::Wildcard(WildcardType::unbounded(&wk));

    let mut reflector = Reflector::new(&store);
    let captured = reflector
        .capture(&Type::parameterized(foo, vec![unbounded.clone(), unbounded]))
        .unwrap();

    let ids = capture_ids(&captured);
    let a = Type::Capture(ids[0]);
    // A extends Number & Iterable<A>, B extends A
    assert_eq!(
        reflector.capture_def(ids[0]).unwrap().upper_bounds,
        vec![
            Type::class(wk.number),
            Type::parameterized(iterable, vec![a.clone()]),
        ]
    );
    assert_eq!(reflector.capture_def(ids[1]).unwrap().upper_bounds, vec![a]);
}

#[test]
fn self_referential_bound_mentions_the_capture_itself() {
    let store = TypeStore::with_minimal_jdk();
    let wk = store.well_known().clone();
    let enum_id = store.lookup_class("Enum").unwrap();

    let mut reflector = Reflector::new(&store);
    let captured = reflector
        .capture(&Type::parameterized(
            enum_id,
            vec![Type::Wildcard(WildcardType::unbounded(&wk))],
        ))
        .unwrap();

    let ids = capture_ids(&captured);
    assert_eq!(
        reflector.capture_def(ids[0]).unwrap().upper_bounds,
        vec![Type::parameterized(enum_id, vec![Type::Capture(ids[0])])]
    );
}

#[test]
fn sibling_captures_see_each_other() {
    let mut store = TypeStore::with_minimal_jdk();
    let (node, _, _) = add_node(&mut store);
    let wk = store.well_known().clone();
    let comparable = class_id(&store, "java.lang.Comparable");
    let unbounded = Type::Wildcard(WildcardType::unbounded(&wk));

    let mut reflector = Reflector::new(&store);
    let captured = reflector
        .capture(&Type::parameterized(node, vec![unbounded.clone(), unbounded]))
        .unwrap();

    let ids = capture_ids(&captured);
    assert_eq!(ids.len(), 2);
    assert_eq!(
        reflector.capture_def(ids[0]).unwrap().upper_bounds,
        vec![Type::parameterized(comparable, vec![Type::Capture(ids[1])])]
    );
    assert_eq!(
        reflector.capture_def(ids[1]).unwrap().upper_bounds,
        vec![Type::class(wk.object)]
    );
}

#[test]
fn super_wildcard_keeps_lower_bound() {
    let store = TypeStore::with_minimal_jdk();
    let wk = store.well_known().clone();
    let list = class_id(&store, "java.util.List");
    let integer = Type::class(wk.integer);

    let mut reflector = Reflector::new(&store);
    let captured = reflector
        .capture(&Type::parameterized(
            list,
            vec![Type::Wildcard(WildcardType::super_of(&wk, integer.clone()))],
        ))
        .unwrap();

    let def = reflector.capture_def(capture_ids(&captured)[0]).unwrap();
    assert_eq!(def.upper_bounds, vec![Type::class(wk.object)]);
    assert_eq!(def.lower_bounds, vec![integer]);
}

#[test]
fn concrete_arguments_are_left_alone() {
    let store = TypeStore::with_minimal_jdk();
    let wk = store.well_known().clone();
    let map = class_id(&store, "java.util.Map");
    let string = Type::class(wk.string);

    let mut reflector = Reflector::new(&store);
    let ty = Type::parameterized(
        map,
        vec![string.clone(), Type::Wildcard(WildcardType::unbounded(&wk))],
    );
    let Type::Parameterized(captured) = reflector.capture(&ty).unwrap() else {
        panic!("capture must keep the parameterized shape");
    };
    assert_eq!(captured.args[0], string);
    assert!(matches!(captured.args[1], Type::Capture(_)));
    assert_eq!(reflector.captures().len(), 1);
}

#[test]
fn non_parameterized_types_pass_through() {
    let store = TypeStore::with_minimal_jdk();
    let wk = store.well_known().clone();
    let list = class_id(&store, "java.util.List");
    let mut reflector = Reflector::new(&store);

    for ty in [
        Type::class(wk.string),
        Type::class(list),
        Type::array_of(Type::class(wk.integer)),
        Type::array_of(Type::parameterized(
            list,
            vec![Type::Wildcard(WildcardType::unbounded(&wk))],
        )),
    ] {
        assert_eq!(reflector.capture(&ty).unwrap(), ty);
    }
    assert!(reflector.captures().is_empty());
}

#[test]
fn owner_chain_is_captured_first() {
    let mut store = TypeStore::with_minimal_jdk();
    let (outer, inner, _) = add_outer_inner(&mut store);
    let wk = store.well_known().clone();

    let mut reflector = Reflector::new(&store);
    let ty = Type::nested(
        Type::parameterized(outer, vec![Type::Wildcard(WildcardType::unbounded(&wk))]),
        inner,
        vec![],
    );
    let Type::Parameterized(captured) = reflector.capture(&ty).unwrap() else {
        panic!("capture must keep the parameterized shape");
    };
    let owner = captured.owner.expect("owner survives capture");
    assert_eq!(capture_ids(&owner).len(), 1);
    assert_eq!(reflector.captures().len(), 1);
}

#[test]
fn arity_mismatch_is_reported() {
    let store = TypeStore::with_minimal_jdk();
    let wk = store.well_known().clone();
    let map = class_id(&store, "java.util.Map");

    let mut reflector = Reflector::new(&store);
    let err = reflector
        .capture(&Type::parameterized(map, vec![Type::class(wk.string)]))
        .unwrap_err();
    assert_eq!(
        err,
        ReflectError::ArityMismatch {
            class: Some(map),
            expected: 2,
            found: 1,
        }
    );
}

#[test]
fn reset_drops_captures() {
    let store = TypeStore::with_minimal_jdk();
    let wk = store.well_known().clone();
    let list = class_id(&store, "java.util.List");

    let mut reflector = Reflector::new(&store);
    reflector
        .capture(&Type::parameterized(
            list,
            vec![Type::Wildcard(WildcardType::unbounded(&wk))],
        ))
        .unwrap();
    assert_eq!(reflector.captures().len(), 1);

    reflector.reset();
    assert!(reflector.captures().is_empty());
}

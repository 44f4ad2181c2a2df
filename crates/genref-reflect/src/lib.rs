//! Reflective generic-type resolution.
//!
//! Given declarations supplied through [`genref_types::TypeEnv`], a
//! [`Reflector`] answers two questions the declared (unsubstituted) types
//! cannot:
//!
//! - what is the exact type of a field, parameter or return value when
//!   accessed through a concrete, possibly parameterized owner type
//!   ([`Reflector::exact_member_type`] and friends), and
//! - is one type a supertype of another once wildcards are captured
//!   ([`Reflector::is_supertype`]).
//!
//! ```
//! use genref_reflect::Reflector;
//! use genref_types::{Type, TypeEnv, TypeStore};
//!
//! let store = TypeStore::with_minimal_jdk();
//! let list = store.class_id("java.util.List").unwrap();
//! let array_list = store.class_id("java.util.ArrayList").unwrap();
//! let string = Type::class(store.well_known().string);
//!
//! let mut reflector = Reflector::new(&store);
//! let owner = Type::parameterized(array_list, vec![string.clone()]);
//! let (declaring, get) = genref_types::lookup_method(&store, array_list, "get").unwrap();
//! assert_eq!(declaring, list);
//! assert_eq!(
//!     reflector.exact_return_type(declaring, get, &owner).unwrap(),
//!     Some(string)
//! );
//! ```

#![forbid(unsafe_code)]

mod capture;
mod config;
mod members;
mod reflector;
mod subtyping;
mod supertypes;

pub use crate::config::{init_tracing, ConfigError, LoggingConfig, ReflectConfig};
pub use crate::reflector::{CaptureDef, Reflector};

pub use genref_types;

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Go type model
//!
//! A structured view of the Go types that appear in interface signatures and
//! struct fields. The symbol extractor builds these from source, the
//! descriptor builder classifies them, and [`fmt::Display`] turns them back
//! into Go syntax for the emitted code.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A Go type expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoType {
    /// Named type, optionally qualified by a package (`string`, `model.User`)
    Named {
        package: Option<String>,
        name: String,
    },
    /// `*T`
    Pointer { elem: Box<GoType> },
    /// `[]T`
    Slice { elem: Box<GoType> },
    /// `[N]T`
    Array { len: String, elem: Box<GoType> },
    /// `map[K]V`
    Map { key: Box<GoType>, value: Box<GoType> },
    /// Interface literal (`interface{}`, `interface{ Foo() }`)
    Interface { text: String },
    /// Any other type expression, kept verbatim (func, chan, generics)
    Other { text: String },
    /// Type could not be determined (e.g. a field of an external struct)
    Unknown,
}

impl GoType {
    /// Unqualified named type
    pub fn named(name: impl Into<String>) -> Self {
        GoType::Named {
            package: None,
            name: name.into(),
        }
    }

    /// Package-qualified named type
    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        GoType::Named {
            package: Some(package.into()),
            name: name.into(),
        }
    }

    pub fn pointer(elem: GoType) -> Self {
        GoType::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: GoType) -> Self {
        GoType::Slice {
            elem: Box::new(elem),
        }
    }

    pub fn map(key: GoType, value: GoType) -> Self {
        GoType::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// `map[string]interface{}`
    pub fn string_map() -> Self {
        GoType::map(
            GoType::named("string"),
            GoType::Interface {
                text: "interface{}".to_string(),
            },
        )
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, GoType::Pointer { .. })
    }

    /// Slices and fixed-size arrays
    pub fn is_array(&self) -> bool {
        matches!(self, GoType::Slice { .. } | GoType::Array { .. })
    }

    pub fn is_map(&self) -> bool {
        matches!(self, GoType::Map { .. })
    }

    /// Plain `string` (not `*string`, not a named string type)
    pub fn is_string(&self) -> bool {
        self.is_builtin("string")
    }

    pub fn is_error(&self) -> bool {
        self.is_builtin("error")
    }

    /// `[]byte` / `[]uint8`
    pub fn is_byte_slice(&self) -> bool {
        match self {
            GoType::Slice { elem } => elem.is_builtin("byte") || elem.is_builtin("uint8"),
            _ => false,
        }
    }

    /// Interface literals and the `any` alias
    pub fn is_interface(&self) -> bool {
        matches!(self, GoType::Interface { .. }) || self.is_builtin("any")
    }

    /// Unqualified named type with the given name
    pub fn is_builtin(&self, builtin: &str) -> bool {
        matches!(self, GoType::Named { package: None, name } if name == builtin)
    }

    /// Predeclared scalar types (numbers, strings, bools, runes, bytes)
    pub fn is_scalar(&self) -> bool {
        match self {
            GoType::Named {
                package: None,
                name,
            } => SCALARS.contains(&name.as_str()),
            _ => false,
        }
    }

    /// Check whether this is the named type `package.name`
    pub fn is_qualified(&self, pkg: &str, type_name: &str) -> bool {
        matches!(
            self,
            GoType::Named { package: Some(p), name } if p == pkg && name == type_name
        )
    }

    /// Package of the innermost named type, looking through pointers,
    /// slices, arrays and map values
    pub fn package(&self) -> Option<&str> {
        match self.base() {
            GoType::Named { package, .. } => package.as_deref(),
            _ => None,
        }
    }

    /// Name of the innermost named type
    pub fn type_name(&self) -> Option<&str> {
        match self.base() {
            GoType::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Strip pointer, slice, array and map-value wrappers
    pub fn base(&self) -> &GoType {
        match self {
            GoType::Pointer { elem } | GoType::Slice { elem } | GoType::Array { elem, .. } => {
                elem.base()
            }
            GoType::Map { value, .. } => value.base(),
            other => other,
        }
    }

    /// Strip pointer wrappers only
    pub fn deref(&self) -> &GoType {
        match self {
            GoType::Pointer { elem } => elem.deref(),
            other => other,
        }
    }

    /// Types bound by `for k, v := range x` when `x` has this type
    pub fn range_types(&self) -> Option<(GoType, GoType)> {
        match self.deref() {
            GoType::Slice { elem } | GoType::Array { elem, .. } => {
                Some((GoType::named("int"), (**elem).clone()))
            }
            GoType::Map { key, value } => Some(((**key).clone(), (**value).clone())),
            t if t.is_string() => Some((GoType::named("int"), GoType::named("rune"))),
            _ => None,
        }
    }

    /// Every package referenced anywhere in this type
    pub fn packages(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_packages(&mut out);
        out
    }

    fn collect_packages<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            GoType::Named {
                package: Some(p), ..
            } => {
                if !out.contains(&p.as_str()) {
                    out.push(p);
                }
            }
            GoType::Pointer { elem } | GoType::Slice { elem } | GoType::Array { elem, .. } => {
                elem.collect_packages(out)
            }
            GoType::Map { key, value } => {
                key.collect_packages(out);
                value.collect_packages(out);
            }
            _ => {}
        }
    }

    /// Replace named leaves for which `f` returns a substitute
    pub fn substitute<F>(&self, f: &F) -> GoType
    where
        F: Fn(&GoType) -> Option<GoType>,
    {
        if let Some(replacement) = f(self) {
            return replacement;
        }
        match self {
            GoType::Pointer { elem } => GoType::pointer(elem.substitute(f)),
            GoType::Slice { elem } => GoType::slice(elem.substitute(f)),
            GoType::Array { len, elem } => GoType::Array {
                len: len.clone(),
                elem: Box::new(elem.substitute(f)),
            },
            GoType::Map { key, value } => GoType::map(key.substitute(f), value.substitute(f)),
            other => other.clone(),
        }
    }
}

const SCALARS: &[&str] = &[
    "bool", "string", "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16",
    "uint32", "uint64", "uintptr", "float32", "float64", "complex64", "complex128", "byte",
    "rune",
];

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoType::Named {
                package: Some(p),
                name,
            } => write!(f, "{p}.{name}"),
            GoType::Named {
                package: None,
                name,
            } => f.write_str(name),
            GoType::Pointer { elem } => write!(f, "*{elem}"),
            GoType::Slice { elem } => write!(f, "[]{elem}"),
            GoType::Array { len, elem } => write!(f, "[{len}]{elem}"),
            GoType::Map { key, value } => write!(f, "map[{key}]{value}"),
            GoType::Interface { text } | GoType::Other { text } => f.write_str(text),
            GoType::Unknown => f.write_str("<unknown>"),
        }
    }
}

/// A named, typed parameter or result of a Go method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name; empty for unnamed results
    pub name: String,
    /// Declared type
    pub ty: GoType,
    /// Declared as `...T` (the type is stored as `[]T`)
    #[serde(default)]
    pub variadic: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: GoType) -> Self {
        Self {
            name: name.into(),
            ty,
            variadic: false,
        }
    }

    /// Builder method: mark as variadic
    pub fn with_variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn is_array(&self) -> bool {
        self.ty.is_array()
    }

    pub fn is_pointer(&self) -> bool {
        self.ty.is_pointer()
    }

    pub fn package(&self) -> Option<&str> {
        self.ty.package()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.ty.type_name()
    }

    /// Type as written in a Go parameter list
    pub fn signature_type(&self) -> String {
        match (&self.ty, self.variadic) {
            (GoType::Slice { elem }, true) => format!("...{elem}"),
            (ty, _) => ty.to_string(),
        }
    }
}

/// Field layout of a struct known to the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructShape {
    pub name: String,
    /// Go field names and types
    pub fields: Vec<Param>,
}

impl StructShape {
    pub fn new(name: impl Into<String>, fields: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Param> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Struct shapes indexed by their Go type, used to validate `@param.Field`
/// paths in templates
#[derive(Debug, Clone, Default)]
pub struct StructRegistry {
    shapes: HashMap<GoType, StructShape>,
}

impl StructRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ty: GoType, shape: StructShape) {
        self.shapes.insert(ty, shape);
    }

    /// Find the shape of `ty`, looking through pointers
    pub fn lookup(&self, ty: &GoType) -> Option<&StructShape> {
        self.shapes.get(ty.deref())
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

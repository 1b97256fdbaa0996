// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Go type expressions → [`GoType`]

use sqlgen_ir::{GoType, Param};
use tree_sitter::Node;

pub(crate) fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

fn field_type(node: Node<'_>, field: &str, source: &str) -> GoType {
    node.child_by_field_name(field)
        .map(|n| go_type(n, source))
        .unwrap_or(GoType::Unknown)
}

/// Convert a type node of the Go grammar
pub fn go_type(node: Node<'_>, source: &str) -> GoType {
    match node.kind() {
        "type_identifier" => GoType::named(text(node, source)),
        "qualified_type" => {
            let package = node.child_by_field_name("package").map(|n| text(n, source));
            let name = node.child_by_field_name("name").map(|n| text(n, source));
            match (package, name) {
                (Some(package), Some(name)) => GoType::qualified(package, name),
                _ => other(node, source),
            }
        }
        "pointer_type" => match last_named_child(node) {
            Some(elem) => GoType::pointer(go_type(elem, source)),
            None => other(node, source),
        },
        "slice_type" => GoType::slice(field_type(node, "element", source)),
        "array_type" | "implicit_length_array_type" => GoType::Array {
            len: node
                .child_by_field_name("length")
                .map(|n| text(n, source).to_string())
                .unwrap_or_else(|| "...".to_string()),
            elem: Box::new(field_type(node, "element", source)),
        },
        "map_type" => GoType::map(
            field_type(node, "key", source),
            field_type(node, "value", source),
        ),
        "interface_type" => GoType::Interface {
            text: if node.named_child_count() == 0 {
                "interface{}".to_string()
            } else {
                collapse(text(node, source))
            },
        },
        "parenthesized_type" => match last_named_child(node) {
            Some(inner) => go_type(inner, source),
            None => other(node, source),
        },
        _ => other(node, source),
    }
}

fn last_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).last()
}

fn other(node: Node<'_>, source: &str) -> GoType {
    GoType::Other {
        text: collapse(text(node, source)),
    }
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Expand a `parameter_list` into one [`Param`] per declared name
pub fn parameter_list(list: Node<'_>, source: &str) -> Vec<Param> {
    let mut params = Vec::new();
    let mut cursor = list.walk();
    for decl in list.named_children(&mut cursor) {
        let variadic = match decl.kind() {
            "parameter_declaration" => false,
            "variadic_parameter_declaration" => true,
            _ => continue,
        };
        let mut ty = field_type(decl, "type", source);
        if variadic {
            ty = GoType::slice(ty);
        }

        let mut name_cursor = decl.walk();
        let names: Vec<&str> = decl
            .children_by_field_name("name", &mut name_cursor)
            .map(|n| text(n, source))
            .collect();

        let make = |name: &str| {
            let param = Param::new(name, ty.clone());
            if variadic { param.with_variadic() } else { param }
        };
        if names.is_empty() {
            params.push(make(""));
        } else {
            params.extend(names.into_iter().map(make));
        }
    }
    params
}

/// A method result: either a parenthesised list or a single bare type
pub fn results(node: Node<'_>, source: &str) -> Vec<Param> {
    if node.kind() == "parameter_list" {
        parameter_list(node, source)
    } else {
        vec![Param::new("", go_type(node, source))]
    }
}

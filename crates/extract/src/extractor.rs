// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Go declaration extractor
//!
//! Parses a Go file with the tree-sitter Go grammar and walks the top-level
//! declarations. Only the pieces the generator consumes are read: the
//! package clause, imports, interfaces (with method doc comments) and
//! structs.

use std::path::Path;

use sqlgen_ir::{GoFile, GoType, Import, InterfaceDecl, MethodSignature, StructDecl, StructField};
use tracing::debug;
use tree_sitter::{Node, Parser, Tree};

use crate::comments::{join_doc, strip_markers};
use crate::error::{ExtractError, ExtractResult};
use crate::types::{go_type, parameter_list, results, text};

/// Reusable Go parser
pub struct GoExtractor {
    parser: Parser,
}

impl GoExtractor {
    pub fn new() -> ExtractResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| ExtractError::Language(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Extract the declarations of a Go source file on disk
    pub fn extract_file(&mut self, path: impl AsRef<Path>) -> ExtractResult<GoFile> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ExtractError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.extract(&source)
    }

    /// Extract the declarations of Go source text
    pub fn extract(&mut self, source: &str) -> ExtractResult<GoFile> {
        let tree = self.parser.parse(source, None).ok_or(ExtractError::ParseFailed)?;
        check_syntax(&tree, source)?;

        let root = tree.root_node();
        let mut file = GoFile::default();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "package_clause" => {
                    if let Some(name) = first_named(node, "package_identifier") {
                        file.package = text(name, source).to_string();
                    }
                }
                "import_declaration" => collect_imports(node, source, &mut file.imports),
                "type_declaration" => collect_types(node, source, &mut file),
                _ => {}
            }
        }

        debug!(
            package = %file.package,
            interfaces = file.interfaces.len(),
            structs = file.structs.len(),
            "extracted Go declarations"
        );
        Ok(file)
    }
}

/// Report the first `ERROR` or `MISSING` node in document order
fn check_syntax(tree: &Tree, source: &str) -> ExtractResult<()> {
    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }
    let node = first_error(root).unwrap_or(root);
    let pos = node.start_position();
    let snippet: String = text(node, source)
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(40)
        .collect();
    Err(ExtractError::Syntax {
        line: pos.row + 1,
        column: pos.column + 1,
        snippet,
    })
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn first_named<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|n| n.kind() == kind)
}

fn collect_imports(node: Node<'_>, source: &str, imports: &mut Vec<Import>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => imports.extend(import_spec(child, source)),
            "import_spec_list" => collect_imports(child, source, imports),
            _ => {}
        }
    }
}

fn import_spec(node: Node<'_>, source: &str) -> Option<Import> {
    let path = node.child_by_field_name("path")?;
    let path = text(path, source).trim_matches(|c| c == '"' || c == '`');
    let alias = node
        .child_by_field_name("name")
        .map(|n| text(n, source).to_string());
    Some(Import {
        alias,
        path: path.to_string(),
    })
}

fn collect_types(node: Node<'_>, source: &str, file: &mut GoFile) {
    let mut cursor = node.walk();
    for spec in node.named_children(&mut cursor) {
        if spec.kind() != "type_spec" {
            continue;
        }
        let (Some(name), Some(ty)) = (
            spec.child_by_field_name("name"),
            spec.child_by_field_name("type"),
        ) else {
            continue;
        };
        let name = text(name, source).to_string();
        match ty.kind() {
            "interface_type" => file.interfaces.push(InterfaceDecl {
                methods: interface_methods(ty, source),
                name,
            }),
            "struct_type" => file.structs.push(StructDecl {
                fields: struct_fields(ty, source),
                name,
            }),
            _ => {}
        }
    }
}

/// Methods of an interface with the comment block directly above each
fn interface_methods(node: Node<'_>, source: &str) -> Vec<MethodSignature> {
    let mut methods = Vec::new();
    let mut doc: Vec<String> = Vec::new();
    // Row where the last comment of the pending block ends
    let mut doc_end: Option<usize> = None;
    // Row where the previous non-comment element ends
    let mut prev_end: Option<usize> = None;

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let start = child.start_position().row;
        match child.kind() {
            "comment" => {
                // trailing comment of the previous element
                if prev_end == Some(start) {
                    continue;
                }
                if doc_end.is_some_and(|end| end + 1 < start) {
                    doc.clear();
                }
                doc.extend(strip_markers(text(child, source)));
                doc_end = Some(child.end_position().row);
            }
            "method_elem" | "method_spec" => {
                let adjacent = doc_end.is_some_and(|end| end + 1 == start);
                let doc_text = if adjacent { join_doc(&doc) } else { String::new() };
                if let Some(method) = method_signature(child, source, doc_text) {
                    methods.push(method);
                }
                doc.clear();
                doc_end = None;
                prev_end = Some(child.end_position().row);
            }
            _ => {
                doc.clear();
                doc_end = None;
                prev_end = Some(child.end_position().row);
            }
        }
    }
    methods
}

fn method_signature(node: Node<'_>, source: &str, doc: String) -> Option<MethodSignature> {
    let name = text(node.child_by_field_name("name")?, source).to_string();
    let params = node
        .child_by_field_name("parameters")
        .map(|p| parameter_list(p, source))
        .unwrap_or_default();
    let results = node
        .child_by_field_name("result")
        .map(|r| results(r, source))
        .unwrap_or_default();
    Some(MethodSignature {
        name,
        doc,
        params,
        results,
    })
}

fn struct_fields(node: Node<'_>, source: &str) -> Vec<StructField> {
    let Some(list) = first_named(node, "field_declaration_list") else {
        return Vec::new();
    };
    let mut fields = Vec::new();
    let mut cursor = list.walk();
    for decl in list.named_children(&mut cursor) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        let Some(ty_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let tag = decl.child_by_field_name("tag").map(|t| {
            text(t, source)
                .trim_matches(|c| c == '`' || c == '"')
                .to_string()
        });

        let mut name_cursor = decl.walk();
        let names: Vec<String> = decl
            .children_by_field_name("name", &mut name_cursor)
            .map(|n| text(n, source).to_string())
            .collect();

        if names.is_empty() {
            // embedded field, named after its type
            let mut ty = go_type(ty_node, source);
            let mut star_cursor = decl.walk();
            if decl.children(&mut star_cursor).any(|c| c.kind() == "*") {
                ty = GoType::pointer(ty);
            }
            let name = ty.type_name().unwrap_or_default().to_string();
            fields.push(StructField {
                name,
                ty,
                tag,
                embedded: true,
            });
        } else {
            let ty = go_type(ty_node, source);
            fields.extend(names.into_iter().map(|name| StructField {
                name,
                ty: ty.clone(),
                tag: tag.clone(),
                embedded: false,
            }));
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> GoFile {
        GoExtractor::new().unwrap().extract(source).unwrap()
    }

    #[test]
    fn test_package_and_imports() {
        let file = extract(
            "package iface\n\nimport (\n\t\"time\"\n\tm \"example.com/app/model\"\n)\n\nimport \"gorm.io/gen\"\n",
        );
        assert_eq!(file.package, "iface");
        assert_eq!(file.imports.len(), 3);
        assert_eq!(file.import_path("m"), Some("example.com/app/model"));
        assert_eq!(file.import_path("gen"), Some("gorm.io/gen"));
    }

    #[test]
    fn test_grouped_and_variadic_params() {
        let file = extract(
            "package p\n\ntype Q interface {\n\tF(a, b string, rest ...int) (int64, error)\n}\n",
        );
        let method = &file.interface("Q").unwrap().methods[0];
        let names: Vec<&str> = method.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "rest"]);
        assert!(method.params[2].variadic);
        assert_eq!(method.params[2].ty.to_string(), "[]int");
        assert_eq!(method.results.len(), 2);
        assert!(method.results[1].ty.is_error());
    }

    #[test]
    fn test_single_bare_result() {
        let file = extract("package p\n\ntype Q interface {\n\tCount() int\n}\n");
        let method = &file.interfaces[0].methods[0];
        assert!(method.params.is_empty());
        assert_eq!(method.results[0].ty, GoType::named("int"));
    }

    #[test]
    fn test_doc_requires_adjacent_comment() {
        let file = extract(
            "package p\n\ntype Q interface {\n\t// detached\n\n\tA()\n\t// attached\n\t// two lines\n\tB()\n\tC() // trailing\n\tD()\n}\n",
        );
        let methods = &file.interfaces[0].methods;
        assert_eq!(methods[0].doc, "");
        assert_eq!(methods[1].doc, "attached\ntwo lines");
        assert_eq!(methods[2].doc, "");
        assert_eq!(methods[3].doc, "");
    }

    #[test]
    fn test_composite_types() {
        let file = extract(
            "package p\n\ntype S struct {\n\tA map[string][]*model.User\n\tB [4]byte\n\tC interface{}\n\tD func() error\n}\n",
        );
        let fields = &file.structs[0].fields;
        assert_eq!(fields[0].ty.to_string(), "map[string][]*model.User");
        assert_eq!(fields[1].ty.to_string(), "[4]byte");
        assert!(fields[2].ty.is_interface());
        assert!(matches!(fields[3].ty, GoType::Other { .. }));
    }
}

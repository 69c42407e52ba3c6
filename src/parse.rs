use serde::Serialize;
use sha2::{Digest, Sha256};
use tree_sitter::{Node, Parser};

/// Kind of a top-level type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// An annotation written on a type declaration, e.g. `@Entity` or
/// `@jakarta.persistence.Entity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    name: String,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The annotation name exactly as written in the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The final, unqualified segment of the name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// A top-level type declared by a source file.
///
/// `name` is fully qualified: the file's package followed by the declared
/// simple name. Nested types are not enumerated.
#[derive(Debug, Clone, Serialize)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    pub annotations: Vec<Annotation>,
}

/// Extracts every top-level type declaration from a Java source, in
/// declaration order. An empty or types-free source yields an empty list.
///
/// Returns `None` only when the grammar itself fails to produce a syntax
/// tree; syntactically broken sources still contribute whatever
/// declarations remain recognizable.
pub fn parse_declarations(source: &str) -> Option<Vec<TypeDeclaration>> {
    if source.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let bytes = source.as_bytes();

    let mut package = String::new();
    let mut declarations = Vec::new();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        let kind = match child.kind() {
            "package_declaration" => {
                package = extract_package(&child, bytes);
                continue;
            }
            "class_declaration" => TypeKind::Class,
            "interface_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            "record_declaration" => TypeKind::Record,
            "annotation_type_declaration" => TypeKind::Annotation,
            _ => continue,
        };

        if let Some(declaration) = extract_declaration(&child, bytes, &package, kind) {
            declarations.push(declaration);
        }
    }

    Some(declarations)
}

/// SHA-256 fingerprint of a source, hex encoded.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

fn extract_package(node: &Node, source: &[u8]) -> String {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "scoped_identifier" || child.kind() == "identifier" {
            return node_text(&child, source).to_string();
        }
    }
    String::new()
}

fn extract_declaration(
    node: &Node,
    source: &[u8],
    package: &str,
    kind: TypeKind,
) -> Option<TypeDeclaration> {
    let name_node = node.child_by_field_name("name")?;
    let simple_name = node_text(&name_node, source);
    if simple_name.is_empty() {
        return None;
    }

    let name = if package.is_empty() {
        simple_name.to_string()
    } else {
        format!("{package}.{simple_name}")
    };

    Some(TypeDeclaration {
        name,
        kind,
        annotations: extract_annotations(node, source),
    })
}

fn extract_annotations(node: &Node, source: &[u8]) -> Vec<Annotation> {
    let mut annotations = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "modifiers" {
            continue;
        }
        let mut modifier_cursor = child.walk();
        for modifier in child.children(&mut modifier_cursor) {
            if !matches!(modifier.kind(), "marker_annotation" | "annotation") {
                continue;
            }
            if let Some(name_node) = modifier.child_by_field_name("name") {
                let name = node_text(&name_node, source);
                if !name.is_empty() {
                    annotations.push(Annotation::new(name));
                }
            }
        }
    }

    annotations
}

fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::error::MappingError;
use crate::parse::{self, TypeDeclaration};

/// A candidate source file together with the type declarations it carries.
///
/// The ordered set of units returned by [`scan`] is the explicit record of
/// every file brought into the scanned symbol space, whether or not it
/// declared anything.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub file: PathBuf,
    pub declarations: Vec<TypeDeclaration>,
}

/// A class identifier and the file that declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    pub class_name: String,
    pub source_file: PathBuf,
}

/// Walks the include roots and parses every candidate file.
///
/// Candidates are regular files whose name ends with `extension`
/// (case-insensitive), visited in name-sorted traversal order. Each
/// candidate is canonicalized, dropped if any canonical exclude root occurs
/// in its canonical path, and parsed at most once even when reachable from
/// several include roots.
///
/// Fails with [`MappingError::PathRequired`] on an empty include set and
/// [`MappingError::InvalidDirectory`] on a root that is not a directory.
pub fn scan(
    include: &[PathBuf],
    exclude: &[PathBuf],
    extension: &str,
) -> Result<Vec<SourceUnit>, MappingError> {
    if include.is_empty() {
        return Err(MappingError::PathRequired);
    }

    let exclude_roots = canonical_exclude_roots(exclude);
    let mut units = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for root in include {
        if !root.is_dir() {
            return Err(MappingError::InvalidDirectory { path: root.clone() });
        }
        walk_root(root, &exclude_roots, extension, &mut seen, &mut units)?;
    }

    debug!(files = units.len(), "scan pass complete");
    Ok(units)
}

/// Flattens scanned units into class records, preserving file visit order
/// and declaration order within each file.
pub fn class_records(units: &[SourceUnit]) -> Vec<ClassRecord> {
    units
        .iter()
        .flat_map(|unit| {
            unit.declarations.iter().map(|declaration| ClassRecord {
                class_name: declaration.name.clone(),
                source_file: unit.file.clone(),
            })
        })
        .collect()
}

fn walk_root(
    root: &Path,
    exclude_roots: &[String],
    extension: &str,
    seen: &mut HashSet<PathBuf>,
    units: &mut Vec<SourceUnit>,
) -> Result<(), MappingError> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    for entry in builder.build() {
        let entry = entry.map_err(|source| MappingError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        if !matches_extension(path, extension) {
            continue;
        }

        let canonical = fs::canonicalize(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if is_excluded(&canonical, exclude_roots) {
            trace!(file = %canonical.display(), "candidate under an exclude root, skipped");
            continue;
        }
        if !seen.insert(canonical.clone()) {
            // Already brought in through another include root.
            continue;
        }

        let source = fs::read_to_string(&canonical).map_err(|source| MappingError::Io {
            path: canonical.clone(),
            source,
        })?;
        let declarations =
            parse::parse_declarations(&source).ok_or_else(|| MappingError::UnparsableSource {
                path: canonical.clone(),
            })?;

        trace!(
            file = %canonical.display(),
            declarations = declarations.len(),
            "candidate file included"
        );
        units.push(SourceUnit {
            file: canonical,
            declarations,
        });
    }

    Ok(())
}

/// Case-insensitive suffix match; the file name must be longer than the
/// extension itself.
fn matches_extension(path: &Path, extension: &str) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.len() > extension.len()
        && name
            .to_ascii_lowercase()
            .ends_with(&extension.to_ascii_lowercase())
}

fn canonical_exclude_roots(exclude: &[PathBuf]) -> Vec<String> {
    let mut roots = Vec::new();
    for path in exclude {
        match fs::canonicalize(path) {
            Ok(canonical) => roots.push(normalize(&canonical)),
            Err(_) => {
                warn!(path = %path.display(), "exclude path does not resolve, ignored");
            }
        }
    }
    roots
}

fn is_excluded(candidate: &Path, exclude_roots: &[String]) -> bool {
    if exclude_roots.is_empty() {
        return false;
    }
    let current = normalize(candidate);
    exclude_roots.iter().any(|root| current.contains(root.as_str()))
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "entity_finder_test_{}_{}_{}",
            std::process::id(),
            nanos,
            name
        ))
    }

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn scan_without_paths_fails() {
        let err = scan(&[], &[], ".java").unwrap_err();
        assert!(matches!(err, MappingError::PathRequired));
    }

    #[test]
    fn scan_with_missing_directory_fails() {
        let missing = temp_dir("missing").join("nope");
        let err = scan(&[missing.clone()], &[], ".java").unwrap_err();
        match err {
            MappingError::InvalidDirectory { path } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn scan_finds_nested_files_in_sorted_order() {
        let base = temp_dir("sorted");
        write_file(
            &base.join("b/Late.java"),
            "package b; class Late {}",
        );
        write_file(
            &base.join("a/Early.java"),
            "package a; class Early {}",
        );
        write_file(&base.join("Top.java"), "class Top {}");
        write_file(&base.join("notes.txt"), "not a candidate");

        let units = scan(&[base.clone()], &[], ".java").unwrap();
        let names: Vec<String> = class_records(&units)
            .into_iter()
            .map(|r| r.class_name)
            .collect();
        assert_eq!(names, vec!["Top", "a.Early", "b.Late"]);

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn scan_extension_match_is_case_insensitive() {
        let base = temp_dir("case");
        write_file(&base.join("Upper.JAVA"), "class Upper {}");

        let units = scan(&[base.clone()], &[], ".java").unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].declarations[0].name, "Upper");

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn scan_skips_files_under_exclude_roots() {
        let base = temp_dir("exclude");
        write_file(
            &base.join("User.java"),
            "package m; class User {}",
        );
        write_file(
            &base.join("internal/Secret.java"),
            "package m.internal; class Secret {}",
        );

        let units = scan(&[base.clone()], &[base.join("internal")], ".java").unwrap();
        let names: Vec<String> = class_records(&units)
            .into_iter()
            .map(|r| r.class_name)
            .collect();
        assert_eq!(names, vec!["m.User"]);

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn scan_missing_exclude_root_is_ignored() {
        let base = temp_dir("exclude_missing");
        write_file(&base.join("Kept.java"), "class Kept {}");

        let units = scan(&[base.clone()], &[base.join("gone")], ".java").unwrap();
        assert_eq!(units.len(), 1);

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn scan_includes_each_file_once_across_overlapping_roots() {
        let base = temp_dir("overlap");
        write_file(
            &base.join("sub/Only.java"),
            "package sub; class Only {}",
        );

        let units = scan(&[base.clone(), base.join("sub")], &[], ".java").unwrap();
        assert_eq!(units.len(), 1);

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn scan_counts_declaration_free_files_as_included() {
        let base = temp_dir("empty_unit");
        write_file(&base.join("package-info.java"), "");

        let units = scan(&[base.clone()], &[], ".java").unwrap();
        assert_eq!(units.len(), 1);
        assert!(units[0].declarations.is_empty());

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn repeated_scans_yield_identical_sequences() {
        let base = temp_dir("determinism");
        write_file(&base.join("x/A.java"), "package x; class A {}");
        write_file(&base.join("x/B.java"), "package x; class B {}");
        write_file(&base.join("y/C.java"), "package y; class C {}");

        let first = class_records(&scan(&[base.clone()], &[], ".java").unwrap());
        let second = class_records(&scan(&[base.clone()], &[], ".java").unwrap());
        assert_eq!(first, second);

        let _ = fs::remove_dir_all(base);
    }
}

//! Field path resolution against a catalog.

use fleetql_core::utils::bracket_list;
use fleetql_core::{FieldCatalog, FieldKind};

use super::bound::FieldRef;
use crate::DiagnosticKind;

/// Why a path does not resolve, and which segment is to blame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    pub kind: DiagnosticKind,
    /// Index of the first offending segment. The error covers it and
    /// everything after it.
    pub segment: usize,
    pub detail: Option<String>,
}

impl PathError {
    fn new(kind: DiagnosticKind, segment: usize, detail: impl Into<String>) -> Self {
        Self {
            kind,
            segment,
            detail: Some(detail.into()),
        }
    }
}

/// Resolve dotted `segments` down to a leaf or a map key.
pub fn resolve_path(catalog: &FieldCatalog, segments: &[String]) -> Result<FieldRef, PathError> {
    let mut chain = Vec::with_capacity(segments.len());
    let mut current = catalog;
    let mut i = 0;

    loop {
        let segment = &segments[i];
        let Some(descriptor) = current.get(segment) else {
            return Err(if i == 0 {
                PathError::new(DiagnosticKind::UnknownField, i, segment.as_str())
            } else {
                PathError::new(
                    DiagnosticKind::UnknownSubField,
                    i,
                    format!(
                        "`{segment}` is not a sub-field of `{}`; supported sub-fields: {}",
                        path_text(&segments[..i]),
                        bracket_list(current.names())
                    ),
                )
            });
        };
        chain.push(descriptor.clone());
        let rest = &segments[i + 1..];

        match descriptor.kind() {
            FieldKind::Simple | FieldKind::Enumerated(_) | FieldKind::Timestamp => {
                if rest.is_empty() {
                    return Ok(FieldRef::new(chain, None));
                }
                return Err(PathError::new(
                    DiagnosticKind::SubFieldOnLeaf,
                    i + 1,
                    format!("`{}` cannot be followed by `{}`", path_text(&segments[..=i]), rest[0]),
                ));
            }
            FieldKind::Map { default_key } => {
                return match rest {
                    [] => match default_key {
                        Some(key) => Ok(FieldRef::new(chain, Some(key.clone()))),
                        None => Err(PathError::new(
                            DiagnosticKind::MissingSubField,
                            i,
                            format!(
                                "use `{}.<key>` to filter by a key",
                                path_text(&segments[..=i])
                            ),
                        )),
                    },
                    [key] => Ok(FieldRef::new(chain, Some(key.clone()))),
                    _ => Err(PathError::new(
                        DiagnosticKind::MapKeyTooDeep,
                        i + 2,
                        format!("`{}` keys are a single segment", path_text(&segments[..=i])),
                    )),
                };
            }
            FieldKind::SubEntity(sub) => {
                if rest.is_empty() {
                    return Err(PathError::new(
                        DiagnosticKind::MissingSubField,
                        i,
                        format!(
                            "`{}` supports {}",
                            path_text(&segments[..=i]),
                            bracket_list(sub.names())
                        ),
                    ));
                }
                current = sub;
            }
            FieldKind::Collection {
                catalog: sub,
                default_field,
            } => {
                if rest.is_empty() {
                    return match default_field {
                        Some(default) => {
                            chain.push(sub.ensure_field(default).clone());
                            Ok(FieldRef::new(chain, None))
                        }
                        None => Err(PathError::new(
                            DiagnosticKind::MissingSubField,
                            i,
                            format!(
                                "`{}` supports {}",
                                path_text(&segments[..=i]),
                                bracket_list(sub.names())
                            ),
                        )),
                    };
                }
                current = sub;
            }
        }
        i += 1;
    }
}

fn path_text(segments: &[String]) -> String {
    segments.join(".")
}

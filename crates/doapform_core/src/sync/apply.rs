//! Record-to-form apply.
//!
//! # Responsibility
//! - Repopulate form fields and repeatable rows from a record.
//! - Route developer-role back-references into developer rows.
//!
//! # Invariants
//! - Applying the same record twice yields the same form.
//! - On error the target form is left untouched.
//! - Re-capturing an applied record reproduces it, including contributor
//!   order.

use crate::form::{DeveloperRow, FormState, TestSuiteRow};
use crate::model::description::{ProjectDescription, Subject};
use crate::model::vocab::{
    local_name, DeveloperRole, ProjectField, DC_ISSUED, FIELD_ID_MARKER, FOAF_NAME,
    THIS_DOCUMENT,
};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ApplyResult<T> = Result<T, ApplyError>;

/// Lookup failures while mapping a record back onto the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// Project predicate has no corresponding form field.
    UnknownField { predicate: String, field_id: String },
    /// Primary-topic property is neither `dc:issued` nor a role reference.
    UnexpectedPrimaryTopicProperty(String),
}

impl Display for ApplyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField {
                predicate,
                field_id,
            } => write!(
                f,
                "no form field `{field_id}` for project predicate `{predicate}`"
            ),
            Self::UnexpectedPrimaryTopicProperty(predicate) => {
                write!(f, "unexpected primary topic property `{predicate}`")
            }
        }
    }
}

impl Error for ApplyError {}

/// One developer-role back-reference found in the record.
#[derive(Debug, Clone, Copy)]
struct RoleRef<'a> {
    role: DeveloperRole,
    uri: &'a str,
}

/// Writes `description` into `form`, replacing its previous content.
///
/// # Errors
/// - `ApplyError::UnknownField` when a project predicate maps to no
///   recognized form field.
/// - `ApplyError::UnexpectedPrimaryTopicProperty` for unmapped primary-topic
///   properties.
pub fn apply_state_to_form(
    description: &ProjectDescription,
    form: &mut FormState,
) -> ApplyResult<()> {
    let mut staged = form.clone();
    staged.clear_project_fields();
    staged.clear_rows();

    let mut primary_refs = Vec::new();
    if let Some(primary) = &description.primary_topic {
        for property in &primary.properties {
            if property.predicate == DC_ISSUED {
                staged.issued = Some(property.value.clone());
                continue;
            }
            match DeveloperRole::from_predicate(&property.predicate) {
                Some(role) => primary_refs.push(RoleRef {
                    role,
                    uri: property.value.as_str(),
                }),
                None => {
                    return Err(ApplyError::UnexpectedPrimaryTopicProperty(
                        property.predicate.clone(),
                    ))
                }
            }
        }
    }

    let mut project_refs = Vec::new();
    for property in &description.project.properties {
        if let Some(role) = DeveloperRole::from_predicate(&property.predicate) {
            project_refs.push(RoleRef {
                role,
                uri: property.value.as_str(),
            });
            continue;
        }
        let field_id = format!("{FIELD_ID_MARKER}{}", local_name(&property.predicate));
        let field = ProjectField::from_field_id(&field_id).ok_or_else(|| {
            ApplyError::UnknownField {
                predicate: property.predicate.clone(),
                field_id: field_id.clone(),
            }
        })?;
        staged.set_project_field(field, property.value.as_str());
    }
    if staged.project_field(ProjectField::Uri).is_empty() {
        if let Some(uri) = subject_project_uri(description) {
            staged.set_project_field(ProjectField::Uri, uri);
        }
    }

    staged.developers =
        restore_developer_rows(primary_refs, project_refs, &description.contributors);
    staged.testsuites = description
        .testsuites
        .iter()
        .map(|suite| TestSuiteRow::restored(suite.file.as_str(), suite.manifest.as_str()))
        .collect();

    debug!(
        "event=apply_built module=sync status=ok developers={} testsuites={}",
        staged.developers.len(),
        staged.testsuites.len()
    );
    *form = staged;
    Ok(())
}

/// Project URI carried only by subject ids, for documents without `doap:uri`.
fn subject_project_uri(description: &ProjectDescription) -> Option<&str> {
    description
        .primary_topic
        .as_ref()
        .map(|primary| primary.value.as_str())
        .filter(|uri| !uri.is_empty())
        .or_else(|| Some(description.project.id.as_str()).filter(|id| *id != THIS_DOCUMENT))
}

/// Interleaves primary-topic and project role references into rows.
///
/// Capture keeps the per-subject order of role properties and creates a
/// contributor subject on the first named row of each URI. Rows are planned
/// so that the named rows appear in contributor order; every other row stays
/// unnamed.
fn restore_developer_rows(
    primary_refs: Vec<RoleRef<'_>>,
    project_refs: Vec<RoleRef<'_>>,
    contributors: &[Subject],
) -> Vec<DeveloperRow> {
    let referenced: HashSet<&str> = primary_refs
        .iter()
        .chain(project_refs.iter())
        .map(|role_ref| role_ref.uri)
        .collect();
    let pending: Vec<&Subject> = contributors
        .iter()
        .filter(|subject| {
            let kept = referenced.contains(subject.id.as_str());
            if !kept {
                warn!(
                    "event=apply_contributor_dropped module=sync status=error reason=no_role_reference"
                );
            }
            kept
        })
        .collect();

    let mut planner = RowPlanner {
        primary: &primary_refs,
        project: &project_refs,
        contributors: &pending,
        memo: HashMap::new(),
    };
    match planner.plan() {
        Some(rows) => rows,
        None => {
            warn!(
                "event=apply_contributor_order module=sync status=error reason=unordered_contributors"
            );
            fallback_rows(&primary_refs, &project_refs, &pending)
        }
    }
}

/// One planning move: emit the head of a chain, named or not.
#[derive(Debug, Clone, Copy)]
struct Step {
    from_primary: bool,
    named: bool,
}

/// Search over interleavings of the two role chains.
///
/// State is `(primary position, project position, contributors placed)`;
/// chains are a handful of rows long, so the memo stays tiny.
struct RowPlanner<'r, 'a> {
    primary: &'r [RoleRef<'a>],
    project: &'r [RoleRef<'a>],
    contributors: &'r [&'r Subject],
    memo: HashMap<(usize, usize, usize), bool>,
}

impl RowPlanner<'_, '_> {
    fn plan(&mut self) -> Option<Vec<DeveloperRow>> {
        if !self.feasible(0, 0, 0) {
            return None;
        }
        let (mut p, mut q, mut k) = (0, 0, 0);
        let mut rows = Vec::with_capacity(self.primary.len() + self.project.len());
        while p < self.primary.len() || q < self.project.len() {
            let step = self
                .steps(p, q, k)
                .into_iter()
                .find(|step| {
                    let (np, nq, nk) = advance(*step, p, q, k);
                    self.feasible(np, nq, nk)
                })?;
            let role_ref = if step.from_primary {
                self.primary[p]
            } else {
                self.project[q]
            };
            let name = if step.named {
                self.contributors[k].property_value(FOAF_NAME).unwrap_or("")
            } else {
                ""
            };
            rows.push(DeveloperRow::new(role_ref.uri, name, role_ref.role));
            (p, q, k) = advance(step, p, q, k);
        }
        Some(rows)
    }

    fn feasible(&mut self, p: usize, q: usize, k: usize) -> bool {
        if p == self.primary.len() && q == self.project.len() {
            return k == self.contributors.len();
        }
        if let Some(known) = self.memo.get(&(p, q, k)) {
            return *known;
        }
        let reachable = self.steps(p, q, k).into_iter().any(|step| {
            let (np, nq, nk) = advance(step, p, q, k);
            self.feasible(np, nq, nk)
        });
        self.memo.insert((p, q, k), reachable);
        reachable
    }

    /// Legal moves in preference order: named before unnamed, primary first.
    fn steps(&self, p: usize, q: usize, k: usize) -> Vec<Step> {
        let expected = self.contributors.get(k).map(|subject| subject.id.as_str());
        let primary_head = self.primary.get(p);
        let project_head = self.project.get(q);
        let mut steps = Vec::with_capacity(4);
        if primary_head.is_some_and(|head| Some(head.uri) == expected) {
            steps.push(Step { from_primary: true, named: true });
        }
        if project_head.is_some_and(|head| Some(head.uri) == expected) {
            steps.push(Step { from_primary: false, named: true });
        }
        if primary_head.is_some() {
            steps.push(Step { from_primary: true, named: false });
        }
        if project_head.is_some() {
            steps.push(Step { from_primary: false, named: false });
        }
        steps
    }
}

fn advance(step: Step, p: usize, q: usize, k: usize) -> (usize, usize, usize) {
    let k = if step.named { k + 1 } else { k };
    if step.from_primary {
        (p + 1, q, k)
    } else {
        (p, q + 1, k)
    }
}

/// Primary chain then project chain, naming the first row of each contributor.
fn fallback_rows(
    primary_refs: &[RoleRef<'_>],
    project_refs: &[RoleRef<'_>],
    contributors: &[&Subject],
) -> Vec<DeveloperRow> {
    let mut named: HashSet<&str> = HashSet::new();
    primary_refs
        .iter()
        .chain(project_refs.iter())
        .map(|role_ref| {
            let name = contributors
                .iter()
                .find(|subject| subject.id == role_ref.uri)
                .filter(|_| named.insert(role_ref.uri))
                .and_then(|subject| subject.property_value(FOAF_NAME))
                .unwrap_or("");
            DeveloperRow::new(role_ref.uri, name, role_ref.role)
        })
        .collect()
}

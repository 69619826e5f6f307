//! Pure operations over a program's requirement tree.
//!
//! None of these functions mutate the stored tree. Views such as a
//! track-filtered tree are returned as new values.

use std::borrow::Cow;
use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::RequirementNode;

/// Placeholder id for nodes that have neither a name nor an English label.
const UNNAMED: &str = "—";

const PATH_MARKERS_HE: [&str; 2] = ["מסלול", "נתיב"];
const ELECTIVE_MARKER_HE: &str = "בחירה";

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// Stable id of a node: its `name`, falling back to the English label.
#[must_use]
pub fn requirement_id(node: &RequirementNode) -> Option<&str> {
    non_empty(node.name.as_ref()).or_else(|| non_empty(node.en.as_ref()))
}

/// Display label: Hebrew, then English, then `fallback`.
#[must_use]
pub fn requirement_label<'a>(node: &'a RequirementNode, fallback: &'a str) -> &'a str {
    non_empty(node.he.as_ref())
        .or_else(|| non_empty(node.en.as_ref()))
        .unwrap_or(fallback)
}

/// Whether a node is a selectable track ("path").
///
/// A Hebrew label decides on its own; the English label is only consulted
/// when there is no Hebrew one.
#[must_use]
pub fn is_path_node(node: &RequirementNode) -> bool {
    if let Some(he) = node.he.as_deref() {
        return PATH_MARKERS_HE.iter().any(|marker| he.contains(marker))
            || he.to_lowercase().contains("path");
    }
    node.en
        .as_deref()
        .is_some_and(|en| en.to_lowercase().contains("path"))
}

/// Whether a node is an elective pool shared by every track.
#[must_use]
pub fn is_elective_node(node: &RequirementNode) -> bool {
    if let Some(he) = node.he.as_deref() {
        return he.contains(ELECTIVE_MARKER_HE);
    }
    node.en
        .as_deref()
        .is_some_and(|en| en.to_lowercase().contains("elective"))
}

/// A selectable track under the tree root.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PathOption {
    pub id: String,
    pub label: String,
}

/// Track-like children of `root`.
pub fn path_nodes(root: &RequirementNode) -> impl Iterator<Item = &RequirementNode> {
    root.children().iter().filter(|node| is_path_node(node))
}

/// Selectable tracks of `root`. Track nodes without an id are skipped.
#[must_use]
pub fn path_options(root: &RequirementNode) -> Vec<PathOption> {
    path_nodes(root)
        .filter_map(|node| {
            let id = requirement_id(node)?;
            Some(PathOption {
                id: id.to_string(),
                label: requirement_label(node, id).to_string(),
            })
        })
        .collect()
}

/// Restrict the tree to one track.
///
/// When `path` names one of the root's track children, the result keeps the
/// root's own fields and replaces its children with that track's children
/// followed by the root's elective pools. Every other case (no tracks, no
/// `path`, unknown `path`) returns the root unchanged.
#[must_use]
pub fn filter_by_path<'a>(
    root: &'a RequirementNode,
    path: Option<&str>,
) -> Cow<'a, RequirementNode> {
    let (Some(path), Some(_)) = (path, root.nested.as_ref()) else {
        return Cow::Borrowed(root);
    };
    let Some(selected) = path_nodes(root).find(|node| requirement_id(node) == Some(path)) else {
        return Cow::Borrowed(root);
    };

    let nested = selected
        .children()
        .iter()
        .chain(root.children().iter().filter(|node| is_elective_node(node)))
        .cloned()
        .collect();

    Cow::Owned(RequirementNode {
        nested: Some(nested),
        ..root.clone()
    })
}

/// Number of distinct non-empty course codes anywhere under `node`.
#[must_use]
pub fn count_unique_courses(node: &RequirementNode) -> usize {
    let mut codes = HashSet::new();
    collect_codes(node, &mut codes);
    codes.len()
}

fn collect_codes<'a>(node: &'a RequirementNode, codes: &mut HashSet<&'a str>) {
    codes.extend(
        node.courses()
            .iter()
            .map(String::as_str)
            .filter(|code| !code.is_empty()),
    );
    for child in node.children() {
        collect_codes(child, codes);
    }
}

/// A requirement that lists courses directly, labeled by its ancestry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RequirementGroup {
    /// Ancestor labels and the node's own label, joined by spaces.
    pub path: String,
    /// The node's own course codes, de-duplicated in listed order.
    pub courses: Vec<String>,
    /// Distinct course codes in the node's whole subtree.
    pub total_courses: usize,
}

/// Depth-first list of every node under `root` that lists course codes.
///
/// The root itself is the container being viewed and is not labeled or
/// emitted.
#[must_use]
pub fn collect_groups(root: &RequirementNode) -> Vec<RequirementGroup> {
    let mut groups = Vec::new();
    let mut ancestors = Vec::new();
    for child in root.children() {
        collect_groups_from(child, &mut ancestors, &mut groups);
    }
    groups
}

fn collect_groups_from<'a>(
    node: &'a RequirementNode,
    ancestors: &mut Vec<&'a str>,
    groups: &mut Vec<RequirementGroup>,
) {
    let id = requirement_id(node).unwrap_or(UNNAMED);
    ancestors.push(requirement_label(node, id));

    if !node.courses().is_empty() {
        let mut seen = HashSet::new();
        let courses = node
            .courses()
            .iter()
            .filter(|code| !code.is_empty() && seen.insert(code.as_str()))
            .cloned()
            .collect();
        groups.push(RequirementGroup {
            path: ancestors.join(" "),
            courses,
            total_courses: count_unique_courses(node),
        });
    }

    for child in node.children() {
        collect_groups_from(child, ancestors, groups);
    }
    ancestors.pop();
}

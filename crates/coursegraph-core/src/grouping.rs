//! Prerequisite requirement groups.
//!
//! Prerequisite edges sharing a requirement group id form an OR-set: any one
//! of the member courses satisfies the group. Distinct groups of the same
//! course are ANDed. Groups are derived from the flat edge list on demand and
//! keep the order in which their ids first appear.

use crate::{CourseCode, PrerequisiteItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementKind {
    /// Single member; the course itself is required.
    Required,
    /// Several members; at least one of them is required.
    OneOf,
}

impl RequirementKind {
    pub fn heading(self) -> &'static str {
        match self {
            RequirementKind::Required => "Required:",
            RequirementKind::OneOf => "One of the following:",
        }
    }

    pub fn explanation(self) -> &'static str {
        match self {
            RequirementKind::Required => "You must take this course",
            RequirementKind::OneOf => "You must take at least one of these courses",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementGroup {
    pub group_id: i64,
    pub courses: Vec<CourseCode>,
}

impl RequirementGroup {
    pub fn kind(&self) -> RequirementKind {
        if self.courses.len() > 1 {
            RequirementKind::OneOf
        } else {
            RequirementKind::Required
        }
    }
}

/// Partition prerequisite edges into requirement groups, first-seen order.
pub fn group_prerequisites(items: &[PrerequisiteItem]) -> Vec<RequirementGroup> {
    let mut groups: Vec<RequirementGroup> = Vec::new();
    for item in items {
        match groups
            .iter_mut()
            .find(|g| g.group_id == item.requirement_group_id)
        {
            Some(group) => group.courses.push(item.prerequisite_course_code.clone()),
            None => groups.push(RequirementGroup {
                group_id: item.requirement_group_id,
                courses: vec![item.prerequisite_course_code.clone()],
            }),
        }
    }
    groups
}

/// Groups paired with whether an "AND" separator follows them.
pub fn with_separators(
    groups: &[RequirementGroup],
) -> impl Iterator<Item = (&RequirementGroup, bool)> {
    let last = groups.len().saturating_sub(1);
    groups.iter().enumerate().map(move |(i, g)| (g, i < last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: &str, group: i64) -> PrerequisiteItem {
        PrerequisiteItem {
            prerequisite_course_code: CourseCode::parse(code).unwrap(),
            requirement_group_id: group,
        }
    }

    fn codes(group: &RequirementGroup) -> Vec<&str> {
        group.courses.iter().map(CourseCode::as_str).collect()
    }

    #[test]
    fn or_groups_are_anded_in_first_seen_order() {
        let groups = group_prerequisites(&[item("A", 1), item("B", 1), item("C", 2)]);
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].group_id, 1);
        assert_eq!(codes(&groups[0]), ["A", "B"]);
        assert_eq!(groups[0].kind(), RequirementKind::OneOf);

        assert_eq!(groups[1].group_id, 2);
        assert_eq!(codes(&groups[1]), ["C"]);
        assert_eq!(groups[1].kind(), RequirementKind::Required);

        let separators: Vec<bool> = with_separators(&groups).map(|(_, and)| and).collect();
        assert_eq!(separators, [true, false]);
    }

    #[test]
    fn interleaved_groups_keep_first_appearance() {
        let groups = group_prerequisites(&[item("X", 7), item("Y", 3), item("Z", 7)]);
        let ids: Vec<i64> = groups.iter().map(|g| g.group_id).collect();
        assert_eq!(ids, [7, 3]);
        assert_eq!(codes(&groups[0]), ["X", "Z"]);
    }

    #[test]
    fn no_edges_means_no_groups() {
        let groups = group_prerequisites(&[]);
        assert!(groups.is_empty());
        assert_eq!(with_separators(&groups).count(), 0);
    }

    #[test]
    fn kind_text() {
        assert_eq!(RequirementKind::OneOf.heading(), "One of the following:");
        assert_eq!(
            RequirementKind::Required.explanation(),
            "You must take this course"
        );
    }
}

use crate::model::{Control, ControlStatus, Technician};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupBy {
    #[default]
    Status,
    Assignee,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Status(ControlStatus),
    Assignee(String),
    Unassigned,
    All,
}

impl GroupKey {
    /// Column heading. Assignees are resolved against `technicians`; an id with
    /// no technician behind it is shown as is.
    pub fn title(&self, technicians: &[Technician]) -> String {
        match self {
            GroupKey::Status(status) => status.label().to_string(),
            GroupKey::Assignee(id) => technicians
                .iter()
                .find(|t| &t.id == id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| format!("Unknown ({id})")),
            GroupKey::Unassigned => "Unassigned".to_string(),
            GroupKey::All => "All Controls".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlGroup<'a> {
    pub key: GroupKey,
    pub controls: Vec<&'a Control>,
}

/// Partitions `controls` into board columns, each sorted by `order`.
///
/// Status grouping always yields the three status columns, empty or not.
/// Assignee grouping yields the technicians that have controls in list order,
/// then ids that no longer resolve to a technician, then `Unassigned`.
pub fn group_controls<'a>(
    controls: impl IntoIterator<Item = &'a Control>,
    technicians: &[Technician],
    group_by: GroupBy,
) -> Vec<ControlGroup<'a>> {
    let mut sorted: Vec<&'a Control> = controls.into_iter().collect();
    sorted.sort_by_key(|c| c.order);

    match group_by {
        GroupBy::None => vec![ControlGroup {
            key: GroupKey::All,
            controls: sorted,
        }],
        GroupBy::Status => ControlStatus::ALL
            .iter()
            .map(|status| ControlGroup {
                key: GroupKey::Status(*status),
                controls: sorted
                    .iter()
                    .copied()
                    .filter(|c| c.status == *status)
                    .collect(),
            })
            .collect(),
        GroupBy::Assignee => {
            let mut keys: Vec<GroupKey> = technicians
                .iter()
                .map(|t| GroupKey::Assignee(t.id.clone()))
                .collect();
            let dangling: BTreeSet<&str> = sorted
                .iter()
                .filter_map(|c| c.assignee())
                .filter(|id| !technicians.iter().any(|t| t.id == *id))
                .collect();
            keys.extend(dangling.into_iter().map(|id| GroupKey::Assignee(id.to_string())));
            keys.push(GroupKey::Unassigned);

            keys.into_iter()
                .map(|key| {
                    let controls = sorted
                        .iter()
                        .copied()
                        .filter(|c| match (&key, c.assignee()) {
                            (GroupKey::Assignee(id), Some(assignee)) => id == assignee,
                            (GroupKey::Unassigned, None) => true,
                            _ => false,
                        })
                        .collect();
                    ControlGroup { key, controls }
                })
                .filter(|group| !group.controls.is_empty())
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ControlDraft;

    fn control(id: &str, order: i64, status: ControlStatus, assignee: Option<&str>) -> Control {
        let mut control = Control::from_draft(id, ControlDraft::new(id, id));
        control.order = order;
        control.status = status;
        control.assignee_id = assignee.map(str::to_string);
        control
    }

    fn ids(group: &ControlGroup<'_>) -> Vec<String> {
        group.controls.iter().map(|c| c.id.clone()).collect()
    }

    fn technicians() -> Vec<Technician> {
        ["t1", "t2", "t3"]
            .iter()
            .map(|id| Technician {
                id: id.to_string(),
                name: format!("Tech {id}"),
                email: String::new(),
                agent_id: String::new(),
            })
            .collect()
    }

    #[test]
    fn status_columns_are_fixed_and_sorted_by_order() {
        let controls = vec![
            control("a", 3, ControlStatus::InProgress, None),
            control("b", 1, ControlStatus::InProgress, None),
            control("c", 2, ControlStatus::Complete, None),
        ];
        let groups = group_controls(&controls, &[], GroupBy::Status);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].key, GroupKey::Status(ControlStatus::InProgress));
        assert_eq!(ids(&groups[0]), ["b", "a"]);
        assert!(groups[1].controls.is_empty());
        assert_eq!(ids(&groups[2]), ["c"]);
    }

    #[test]
    fn ties_keep_their_relative_position() {
        let controls = vec![
            control("first", 1, ControlStatus::InReview, None),
            control("second", 1, ControlStatus::InReview, None),
            control("zero", 0, ControlStatus::InReview, None),
        ];
        let groups = group_controls(&controls, &[], GroupBy::None);
        assert_eq!(ids(&groups[0]), ["zero", "first", "second"]);
    }

    #[test]
    fn assignee_buckets_follow_technicians_then_dangling_then_unassigned() {
        let controls = vec![
            control("a", 0, ControlStatus::InProgress, Some("t2")),
            control("b", 1, ControlStatus::InProgress, None),
            control("c", 2, ControlStatus::InProgress, Some("gone")),
            control("d", 3, ControlStatus::InProgress, Some("t1")),
            control("e", 4, ControlStatus::InProgress, Some("")),
        ];
        let technicians = technicians();
        let groups = group_controls(&controls, &technicians, GroupBy::Assignee);
        let keys: Vec<String> = groups.iter().map(|g| g.key.title(&technicians)).collect();

        assert_eq!(keys, ["Tech t1", "Tech t2", "Unknown (gone)", "Unassigned"]);
        assert_eq!(ids(&groups[3]), ["b", "e"]);
    }
}

use chrono::NaiveDate;

use super::*;
use crate::error::PlannerError;

fn date(s: &str) -> NaiveDate {
    parse_date("date", s).unwrap()
}

fn assert_capacity_consistent(sprint: &Sprint) {
    for member in &sprint.team_snapshot {
        let sum: Hours = member.tasks.iter().map(|t| t.time).sum();
        assert_eq!(member.filled_capacity, sum, "member {}", member.member_id);
        assert_eq!(member.max_capacity, f64::from(sprint.total_working_days) * HOURS_PER_WORKING_DAY);
        for task in &member.tasks {
            assert_eq!(task.assigned_to_member_id, member.member_id);
        }
    }
}

struct Fixture {
    planner: Planner<MemoryStore>,
    ada: TeamMember,
    bob: TeamMember,
    sprint: Sprint,
}

fn fixture() -> Fixture {
    let mut planner = Planner::new(MemoryStore::new());
    let ada = planner.add_member("Ada", "🦊").unwrap();
    let bob = planner.add_member("Bob", "🐻").unwrap();
    let sprint = planner
        .create_sprint("Sprint 1", date("2024-01-01"), date("2024-01-07"))
        .unwrap();
    Fixture { planner, ada, bob, sprint }
}

#[test]
fn test_add_task_updates_filled_capacity() {
    let Fixture { mut planner, ada, sprint, .. } = fixture();
    assert_eq!(sprint.team_snapshot[0].max_capacity, 40.0);

    let task = planner
        .add_task(&sprint.sprint_id, &ada.id, "Design review", "Acme", 6.5)
        .unwrap();
    assert_eq!(task.assigned_to_member_id, ada.id);

    let sprint = planner.get_sprint(&sprint.sprint_id).unwrap();
    let member = sprint.member(&ada.id).unwrap();
    assert_eq!(member.filled_capacity, 6.5);
    assert_eq!(member.tasks, vec![task]);
}

#[test]
fn test_task_mutation_sequence_keeps_invariants() {
    let Fixture { mut planner, ada, bob, sprint } = fixture();
    let id = sprint.sprint_id.as_str();

    let t1 = planner.add_task(id, &ada.id, "Build API", "Acme", 8.0).unwrap();
    let t2 = planner.add_task(id, &bob.id, "Write docs", "Globex", 4.0).unwrap();
    let t3 = planner.add_task(id, &ada.id, "Fix bug", "Globex", 2.5).unwrap();
    assert_capacity_consistent(&planner.get_sprint(id).unwrap());

    planner
        .update_task(id, &t1.task_id, TaskUpdate { time: Some(12.0), ..TaskUpdate::default() })
        .unwrap();
    planner
        .update_task(
            id,
            &t2.task_id,
            TaskUpdate {
                description: Some("Write guides".to_string()),
                client_name: Some("Initech".to_string()),
                time: None,
            },
        )
        .unwrap();
    let sprint = planner.get_sprint(id).unwrap();
    assert_capacity_consistent(&sprint);
    assert_eq!(sprint.member(&ada.id).unwrap().filled_capacity, 14.5);
    assert_eq!(sprint.member(&bob.id).unwrap().tasks[0].client_name, "Initech");

    planner.remove_task(id, &t3.task_id).unwrap();
    planner.remove_task(id, &t2.task_id).unwrap();
    let sprint = planner.get_sprint(id).unwrap();
    assert_capacity_consistent(&sprint);
    assert_eq!(sprint.member(&ada.id).unwrap().filled_capacity, 12.0);
    assert_eq!(sprint.member(&bob.id).unwrap().filled_capacity, 0.0);
}

#[test]
fn test_list_tasks_order_is_snapshot_then_insertion() {
    let Fixture { mut planner, ada, bob, sprint } = fixture();
    let id = sprint.sprint_id.as_str();

    let b1 = planner.add_task(id, &bob.id, "b1", "Acme", 1.0).unwrap();
    let a1 = planner.add_task(id, &ada.id, "a1", "Acme", 1.0).unwrap();
    let b2 = planner.add_task(id, &bob.id, "b2", "Acme", 1.0).unwrap();
    let a2 = planner.add_task(id, &ada.id, "a2", "Acme", 1.0).unwrap();

    let listed = planner.list_tasks(id).unwrap();
    assert_eq!(listed, vec![a1, a2, b1, b2]);
    assert_eq!(planner.list_tasks(id).unwrap(), listed);
}

#[test]
fn test_add_task_validation_leaves_capacity_untouched() {
    let Fixture { mut planner, ada, sprint, .. } = fixture();
    let id = sprint.sprint_id.as_str();
    planner.add_task(id, &ada.id, "Existing", "Acme", 3.0).unwrap();

    for (description, client, time) in [("Work", "Acme", 0.0), ("Work", "Acme", -2.0), ("Work", "", 1.0), ("", "Acme", 1.0)] {
        assert!(matches!(
            planner.add_task(id, &ada.id, description, client, time),
            Err(PlannerError::Validation(_))
        ));
    }

    let sprint = planner.get_sprint(id).unwrap();
    assert_eq!(sprint.member(&ada.id).unwrap().filled_capacity, 3.0);
    assert_eq!(sprint.member(&ada.id).unwrap().tasks.len(), 1);
}

#[test]
fn test_not_found_references() {
    let Fixture { mut planner, ada, sprint, .. } = fixture();
    let id = sprint.sprint_id.as_str();

    assert!(matches!(
        planner.add_task("sprint-missing", &ada.id, "Work", "Acme", 1.0),
        Err(PlannerError::NotFound { kind: "sprint", .. })
    ));
    assert!(matches!(
        planner.add_task(id, "ghost", "Work", "Acme", 1.0),
        Err(PlannerError::NotFound { kind: "member", .. })
    ));
    assert!(matches!(
        planner.remove_task(id, "ghost-task"),
        Err(PlannerError::NotFound { kind: "task", .. })
    ));
    assert!(matches!(
        planner.list_tasks("sprint-missing"),
        Err(PlannerError::NotFound { kind: "sprint", .. })
    ));
}

#[test]
fn test_rejected_update_and_remove_leave_capacity_untouched() {
    let Fixture { mut planner, ada, sprint, .. } = fixture();
    let id = sprint.sprint_id.as_str();
    let task = planner.add_task(id, &ada.id, "Existing", "Acme", 4.0).unwrap();
    let before = planner.get_sprint(id).unwrap();

    for time in [0.0, -1.0] {
        assert!(matches!(
            planner.update_task(id, &task.task_id, TaskUpdate { time: Some(time), ..TaskUpdate::default() }),
            Err(PlannerError::Validation(_))
        ));
    }
    assert!(matches!(
        planner.update_task("sprint-missing", &task.task_id, TaskUpdate { time: Some(2.0), ..TaskUpdate::default() }),
        Err(PlannerError::NotFound { kind: "sprint", .. })
    ));
    assert!(matches!(
        planner.update_task(id, "ghost-task", TaskUpdate { time: Some(2.0), ..TaskUpdate::default() }),
        Err(PlannerError::NotFound { kind: "task", .. })
    ));
    assert!(matches!(
        planner.remove_task("sprint-missing", &task.task_id),
        Err(PlannerError::NotFound { kind: "sprint", .. })
    ));

    let after = planner.get_sprint(id).unwrap();
    assert_eq!(after, before);
    assert_eq!(after.member(&ada.id).unwrap().filled_capacity, 4.0);
}

#[test]
fn test_member_added_after_sprint_cannot_take_tasks() {
    let Fixture { mut planner, sprint, .. } = fixture();
    let late = planner.add_member("Late", "🐢").unwrap();
    assert!(matches!(
        planner.add_task(&sprint.sprint_id, &late.id, "Work", "Acme", 1.0),
        Err(PlannerError::NotFound { kind: "member", .. })
    ));
}

#[test]
fn test_removed_roster_member_keeps_sprint_tasks() {
    let Fixture { mut planner, ada, sprint, .. } = fixture();
    planner.add_task(&sprint.sprint_id, &ada.id, "Work", "Acme", 5.0).unwrap();
    planner.remove_member(&ada.id).unwrap();

    // Snapshot membership is frozen, so the task stays editable
    let task = planner.list_tasks(&sprint.sprint_id).unwrap().remove(0);
    let updated = planner
        .update_task(&sprint.sprint_id, &task.task_id, TaskUpdate { time: Some(7.0), ..TaskUpdate::default() })
        .unwrap();
    assert_eq!(updated.time, 7.0);
}

#[test]
fn test_failed_write_leaves_persisted_sprint_untouched() {
    let Fixture { mut planner, ada, sprint, .. } = fixture();
    let id = sprint.sprint_id.as_str();
    planner.add_task(id, &ada.id, "Work", "Acme", 2.0).unwrap();
    let before = planner.get_sprint(id).unwrap();

    planner.store_mut().set_fail_writes(true);
    assert!(matches!(
        planner.add_task(id, &ada.id, "More", "Acme", 3.0),
        Err(PlannerError::Storage(_))
    ));
    planner.store_mut().set_fail_writes(false);

    assert_eq!(planner.get_sprint(id).unwrap(), before);
}

#[test]
fn test_weekend_sprint_accepts_tasks_over_capacity() {
    let mut planner = Planner::new(MemoryStore::new());
    let ada = planner.add_member("Ada", "🦊").unwrap();
    let sprint = planner
        .create_sprint("Weekend", date("2024-01-06"), date("2024-01-07"))
        .unwrap();

    planner.add_task(&sprint.sprint_id, &ada.id, "Hotfix", "Acme", 3.0).unwrap();
    let sprint = planner.get_sprint(&sprint.sprint_id).unwrap();
    let member = sprint.member(&ada.id).unwrap();
    assert_eq!(member.max_capacity, 0.0);
    assert_eq!(member.filled_capacity, 3.0);
    assert!(member.is_over_allocated());
}

#[test]
fn test_dashboard_end_to_end() {
    let Fixture { mut planner, ada, bob, sprint } = fixture();
    let id = sprint.sprint_id.as_str();

    planner.add_task(id, &ada.id, "Build", "Acme", 30.0).unwrap();
    planner.add_task(id, &ada.id, "Test", "Globex", 10.0).unwrap();
    planner.add_task(id, &bob.id, "Docs", "Acme", 20.0).unwrap();

    let metrics = planner.dashboard().unwrap();

    assert_eq!(metrics.client_workloads[0].client_name, "Acme");
    assert_eq!(metrics.client_workloads[0].total_hours, 50.0);
    assert_eq!(metrics.client_workloads[1].client_name, "Globex");

    assert_eq!(metrics.member_workloads[0].member_id, ada.id);
    assert_eq!(metrics.member_workloads[0].percentage, 100.0);
    assert_eq!(metrics.member_workloads[1].member_id, bob.id);
    assert_eq!(metrics.member_workloads[1].percentage, 50.0);
    assert_eq!(metrics.average_percentage, 75.0);
}

#[test]
fn test_dashboard_skips_unreadable_sprint() {
    let Fixture { mut planner, ada, sprint, .. } = fixture();
    planner.add_task(&sprint.sprint_id, &ada.id, "Build", "Acme", 8.0).unwrap();
    planner.store_mut().write_record("sprint-corrupt", b"not a sprint").unwrap();

    let metrics = planner.dashboard().unwrap();
    assert_eq!(metrics.client_workloads.len(), 1);
    assert_eq!(metrics.client_workloads[0].percentage, 100.0);
}

#[test]
fn test_file_store_planner_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();

    let (sprint_id, ada_id) = {
        let mut planner = Planner::new(FileStore::new(dir.path()));
        let ada = planner.add_member("Ada", "🦊").unwrap();
        let sprint = planner
            .create_sprint("Persisted", date("2024-03-04"), date("2024-03-15"))
            .unwrap();
        planner.add_task(&sprint.sprint_id, &ada.id, "Plan", "Acme", 16.0).unwrap();
        (sprint.sprint_id, ada.id)
    };

    let planner = Planner::new(FileStore::new(dir.path()));
    let sprint = planner.get_sprint(&sprint_id).unwrap();
    assert_eq!(sprint.total_working_days, 10);
    assert_eq!(sprint.member(&ada_id).unwrap().filled_capacity, 16.0);
    assert_eq!(sprint.member(&ada_id).unwrap().utilization(), 20.0);
    assert_eq!(planner.list_sprints().unwrap().len(), 1);
}

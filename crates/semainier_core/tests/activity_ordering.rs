use semainier_core::db::open_db_in_memory;
use semainier_core::model::activity::{unscheduled_due_date, Activity};
use semainier_core::model::container::{List, Sublist};
use semainier_core::repo::container_repo::{ContainerRepository, SqliteContainerRepository};
use semainier_core::{ActivityRepository, SqliteActivityRepository};
use std::collections::HashSet;

fn positions(repo: &SqliteActivityRepository<'_>, list: &List) -> Vec<i64> {
    repo.list_container(list.uuid, None)
        .unwrap()
        .iter()
        .map(|activity| activity.position)
        .collect()
}

#[test]
fn creates_keep_the_container_dense() {
    let conn = open_db_in_memory().unwrap();
    let containers = SqliteContainerRepository::new(&conn);
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let list = List::new("inbox");
    containers.create_list(&list).unwrap();

    for title in ["first", "second", "third"] {
        repo.create_activity(&Activity::new(title, list.uuid)).unwrap();
    }

    let items = repo.list_container(list.uuid, None).unwrap();
    assert_eq!(items.len(), 3);
    let unique: HashSet<i64> = items.iter().map(|item| item.position).collect();
    assert_eq!(unique, (1..=3).collect::<HashSet<i64>>());
}

#[test]
fn fresh_creates_surface_at_the_top() {
    let conn = open_db_in_memory().unwrap();
    let containers = SqliteContainerRepository::new(&conn);
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let list = List::new("inbox");
    containers.create_list(&list).unwrap();

    repo.create_activity(&Activity::new("older", list.uuid)).unwrap();
    repo.create_activity(&Activity::new("newer", list.uuid)).unwrap();

    // A new row enters at position 0 and the reindex pass sorts by current
    // position, so the latest creation lands at position 1.
    let items = repo.list_container(list.uuid, None).unwrap();
    assert_eq!(items[0].title, "newer");
    assert_eq!(items[0].position, 1);
    assert_eq!(items[1].title, "older");
    assert_eq!(items[1].position, 2);
}

#[test]
fn delete_leaves_stale_order_until_next_mutation() {
    let conn = open_db_in_memory().unwrap();
    let containers = SqliteContainerRepository::new(&conn);
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let list = List::new("inbox");
    containers.create_list(&list).unwrap();

    for title in ["c", "b", "a"] {
        repo.create_activity(&Activity::new(title, list.uuid)).unwrap();
    }
    // Creation order reversed by the at-top rule: a=1, b=2, c=3.
    let items = repo.list_container(list.uuid, None).unwrap();
    assert_eq!(positions(&repo, &list), vec![1, 2, 3]);

    // Delete the middle item; positions go stale but keep relative order.
    repo.delete_activity(items[1].uuid).unwrap();
    assert_eq!(positions(&repo, &list), vec![1, 3]);

    // The next structural mutation re-normalizes to a dense sequence.
    repo.create_activity(&Activity::new("d", list.uuid)).unwrap();
    assert_eq!(positions(&repo, &list), vec![1, 2, 3]);
}

#[test]
fn duplicate_is_appended_then_reindexed() {
    let conn = open_db_in_memory().unwrap();
    let containers = SqliteContainerRepository::new(&conn);
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let list = List::new("inbox");
    containers.create_list(&list).unwrap();

    repo.create_activity(&Activity::new("beta", list.uuid)).unwrap();
    let items = repo.list_container(list.uuid, None).unwrap();
    let source = items[0].clone();

    let clone = repo.duplicate_activity(source.uuid).unwrap();
    assert_ne!(clone.uuid, source.uuid);
    assert_eq!(clone.title, "beta");
    assert_eq!(clone.position, 2, "clone lands at the container tail");
    assert_eq!(clone.due_date, unscheduled_due_date());
    assert!(!clone.is_completed);

    let items = repo.list_container(list.uuid, None).unwrap();
    assert_eq!(positions(&repo, &list), vec![1, 2]);
    assert_eq!(items[0].uuid, source.uuid);
    assert_eq!(items[1].uuid, clone.uuid);
}

#[test]
fn sublist_scope_is_ordered_independently() {
    let conn = open_db_in_memory().unwrap();
    let containers = SqliteContainerRepository::new(&conn);
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let list = List::new("projects");
    containers.create_list(&list).unwrap();
    let sublist = Sublist::new(list.uuid, "phase 1");
    containers.create_sublist(&sublist).unwrap();

    repo.create_activity(&Activity::new("root level", list.uuid)).unwrap();
    let mut scoped = Activity::new("scoped", list.uuid);
    scoped.sublist_uuid = Some(sublist.uuid);
    repo.create_activity(&scoped).unwrap();
    let mut scoped_two = Activity::new("scoped two", list.uuid);
    scoped_two.sublist_uuid = Some(sublist.uuid);
    repo.create_activity(&scoped_two).unwrap();

    // Root container and sublist container each carry their own 1..N.
    assert_eq!(positions(&repo, &list), vec![1]);
    let scoped_positions: Vec<i64> = repo
        .list_container(list.uuid, Some(sublist.uuid))
        .unwrap()
        .iter()
        .map(|item| item.position)
        .collect();
    assert_eq!(scoped_positions, vec![1, 2]);
}

#[test]
fn reindex_container_restores_density_after_deletes() {
    let conn = open_db_in_memory().unwrap();
    let containers = SqliteContainerRepository::new(&conn);
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let list = List::new("inbox");
    containers.create_list(&list).unwrap();
    for title in ["one", "two", "three", "four"] {
        repo.create_activity(&Activity::new(title, list.uuid)).unwrap();
    }

    let items = repo.list_container(list.uuid, None).unwrap();
    repo.delete_activity(items[0].uuid).unwrap();
    repo.delete_activity(items[2].uuid).unwrap();
    assert_eq!(positions(&repo, &list), vec![2, 4]);

    repo.reindex_container(list.uuid, None).unwrap();
    assert_eq!(positions(&repo, &list), vec![1, 2]);
}

#[test]
fn deleting_a_sublist_cascades_to_its_activities() {
    let conn = open_db_in_memory().unwrap();
    let containers = SqliteContainerRepository::new(&conn);
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let list = List::new("projects");
    containers.create_list(&list).unwrap();
    let sublist = Sublist::new(list.uuid, "phase 1");
    containers.create_sublist(&sublist).unwrap();

    let mut scoped = Activity::new("doomed", list.uuid);
    scoped.sublist_uuid = Some(sublist.uuid);
    repo.create_activity(&scoped).unwrap();
    repo.create_activity(&Activity::new("survivor", list.uuid)).unwrap();

    containers.delete_sublist(sublist.uuid).unwrap();

    assert!(repo.get_activity(scoped.uuid).unwrap().is_none());
    assert_eq!(repo.list_container(list.uuid, None).unwrap().len(), 1);
}

#[test]
fn deleting_a_list_cascades_to_everything_it_owns() {
    let conn = open_db_in_memory().unwrap();
    let containers = SqliteContainerRepository::new(&conn);
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let list = List::new("projects");
    containers.create_list(&list).unwrap();
    let sublist = Sublist::new(list.uuid, "phase 1");
    containers.create_sublist(&sublist).unwrap();

    let root = Activity::new("root", list.uuid);
    repo.create_activity(&root).unwrap();
    let mut scoped = Activity::new("scoped", list.uuid);
    scoped.sublist_uuid = Some(sublist.uuid);
    repo.create_activity(&scoped).unwrap();

    containers.delete_list(list.uuid).unwrap();

    assert!(repo.get_activity(root.uuid).unwrap().is_none());
    assert!(repo.get_activity(scoped.uuid).unwrap().is_none());
}

#[test]
fn sublist_of_another_list_is_rejected_by_schema() {
    let conn = open_db_in_memory().unwrap();
    let containers = SqliteContainerRepository::new(&conn);
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let list_a = List::new("a");
    let list_b = List::new("b");
    containers.create_list(&list_a).unwrap();
    containers.create_list(&list_b).unwrap();
    let sublist_of_b = Sublist::new(list_b.uuid, "b-phase");
    containers.create_sublist(&sublist_of_b).unwrap();

    let mut crossed = Activity::new("crossed", list_a.uuid);
    crossed.sublist_uuid = Some(sublist_of_b.uuid);
    assert!(repo.create_activity(&crossed).is_err());
}

mod common;

use common::{connection, RecordingSession};
use cql_mapper::message_functions::column_spec::ColumnSpec;
use cql_mapper::session::Page;
use cql_mapper::value_functions::column_type::ColumnType;
use cql_mapper::value_functions::cql_value::CqlValue;
use uuid::Uuid;

fn migrations_page(rows: &[(&str, i32)]) -> Page {
    Page::new(
        vec![
            ColumnSpec::new("id", ColumnType::Uuid),
            ColumnSpec::new("migration", ColumnType::Varchar),
            ColumnSpec::new("batch", ColumnType::Int),
        ],
        rows.iter()
            .enumerate()
            .map(|(i, (name, batch))| {
                vec![
                    CqlValue::Uuid(Uuid::from_u128(i as u128 + 1)),
                    CqlValue::from(*name),
                    CqlValue::Int(*batch),
                ]
            })
            .collect(),
        None,
    )
}

fn aggregate_page(value: CqlValue) -> Page {
    Page::new(
        vec![ColumnSpec::new("aggregate", ColumnType::Int)],
        vec![vec![value]],
        None,
    )
}

#[test]
fn repository_table_uses_id_and_batch_as_key() {
    let mut connection = connection(RecordingSession::new());
    connection.migrations().create_repository().unwrap();

    assert_eq!(
        connection.session().queries(),
        vec!["create table \"migrations\" (\"id\" uuid, \"migration\" varchar, \"batch\" int, primary key ((\"id\"), \"batch\"))".to_string()]
    );
}

#[test]
fn log_inserts_a_fresh_uuid() {
    let mut connection = connection(RecordingSession::new());
    connection.migrations().log("2024_01_01_create_users", 2).unwrap();
    connection.migrations().log("2024_01_02_create_orders", 2).unwrap();

    let executed = &connection.session().executed;
    assert_eq!(
        executed[0].0.query,
        "insert into \"migrations\" (\"batch\", \"id\", \"migration\") values (?, ?, ?)"
    );
    let values = &executed[0].0.values;
    assert_eq!(values[0], CqlValue::Int(2));
    assert_eq!(values[2], CqlValue::from("2024_01_01_create_users"));

    let first_id = values[1].as_uuid().unwrap();
    let second_id = executed[1].0.values[1].as_uuid().unwrap();
    assert_eq!(first_id.get_version_num(), 4);
    assert_ne!(first_id, second_id);
}

#[test]
fn ran_migrations_are_sorted_by_batch() {
    let mut session = RecordingSession::new();
    session.respond(migrations_page(&[("c", 3), ("a", 1), ("b", 2), ("a2", 1)]));
    let mut connection = connection(session);

    assert_eq!(
        connection.migrations().get_ran().unwrap(),
        vec!["a", "a2", "b", "c"]
    );
}

#[test]
fn get_migrations_takes_newest_batches_first() {
    let mut session = RecordingSession::new();
    session.respond(migrations_page(&[("a", 1), ("c", 3), ("b", 2)]));
    let mut connection = connection(session);

    let rows = connection.migrations().get_migrations(2).unwrap();
    let names: Vec<&str> = rows
        .iter()
        .filter_map(|row| row.get("migration").and_then(|v| v.as_text()))
        .collect();
    assert_eq!(names, vec!["c", "b"]);

    let (statement, _) = &connection.session().executed[0];
    assert_eq!(
        statement.query,
        "select * from \"migrations\" where \"batch\" >= ? ALLOW FILTERING"
    );
    assert_eq!(statement.values, vec![CqlValue::Int(1)]);
}

#[test]
fn batch_numbers_come_from_max_aggregate() {
    let mut session = RecordingSession::new();
    session
        .respond(aggregate_page(CqlValue::Int(4)))
        .respond(aggregate_page(CqlValue::Null));
    let mut connection = connection(session);

    assert_eq!(connection.migrations().get_next_batch_number().unwrap(), 5);
    assert_eq!(connection.migrations().get_last_batch_number().unwrap(), 0);
    assert_eq!(
        connection.session().queries()[0],
        "select max(\"batch\") as aggregate from \"migrations\" limit 1"
    );
}

#[test]
fn last_batch_filters_by_batch_number() {
    let mut session = RecordingSession::new();
    session
        .respond(aggregate_page(CqlValue::Int(2)))
        .respond(migrations_page(&[("b", 2), ("b2", 2)]));
    let mut connection = connection(session);

    let rows = connection.migrations().get_last().unwrap();
    assert_eq!(rows.len(), 2);
    let (statement, _) = &connection.session().executed[1];
    assert_eq!(
        statement.query,
        "select * from \"migrations\" where \"batch\" = ? ALLOW FILTERING"
    );
    assert_eq!(statement.values, vec![CqlValue::Int(2)]);
}

#[test]
fn migration_batches_map_names() {
    let mut session = RecordingSession::new();
    session.respond(migrations_page(&[("a", 1), ("b", 2)]));
    let mut connection = connection(session);

    let batches = connection.migrations().get_migration_batches().unwrap();
    assert_eq!(batches.get("a"), Some(&1));
    assert_eq!(batches.get("b"), Some(&2));
}

#[test]
fn delete_looks_up_full_key_first() {
    let mut session = RecordingSession::new();
    session.respond(migrations_page(&[("create_users", 3)]));
    let mut connection = connection(session);

    connection.migrations().delete("create_users").unwrap();

    let executed = &connection.session().executed;
    assert_eq!(executed.len(), 2);
    assert_eq!(
        executed[0].0.query,
        "select \"id\", \"batch\" from \"migrations\" where \"migration\" = ? ALLOW FILTERING"
    );
    assert_eq!(
        executed[1].0.query,
        "delete from \"migrations\" where \"id\" = ? and \"batch\" = ?"
    );
    assert_eq!(
        executed[1].0.values,
        vec![CqlValue::Uuid(Uuid::from_u128(1)), CqlValue::Int(3)]
    );
}

#[test]
fn repository_exists_checks_system_schema() {
    let mut connection = connection(RecordingSession::new());
    assert!(!connection.migrations().repository_exists().unwrap());
    connection.migrations().delete_repository().unwrap();
    assert_eq!(
        connection.session().queries()[1],
        "drop table if exists \"migrations\""
    );
}

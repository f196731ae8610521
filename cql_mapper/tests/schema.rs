mod common;

use common::{connection, RecordingSession};
use cql_mapper::error::{ErrorType, ALREADY_EXISTS_CODE};
use cql_mapper::message_functions::column_spec::ColumnSpec;
use cql_mapper::query_functions::query_builder::Direction;
use cql_mapper::schema_functions::keyspace_conflict::{KeyspaceConflict, KeyspaceStatus};
use cql_mapper::schema_functions::primary_key::PrimaryKey;
use cql_mapper::schema_functions::schema_type::SchemaType;
use cql_mapper::session::Page;
use cql_mapper::value_functions::column_type::ColumnType;
use cql_mapper::value_functions::cql_value::CqlValue;
use proptest::prelude::*;

fn quote(column: &str) -> String {
    format!("\"{}\"", column)
}

fn names_page(column: &str, names: &[&str]) -> Page {
    Page::new(
        vec![ColumnSpec::new(column, ColumnType::Varchar)],
        names.iter().map(|n| vec![CqlValue::from(*n)]).collect(),
        None,
    )
}

#[test]
fn missing_partition_key_never_reaches_the_session() {
    let mut connection = connection(RecordingSession::new());
    let result = connection.schema().create("events", |table| {
        table.uuid("id");
        table.text("payload");
        table.clustering_key(&["id"]);
    });

    match result {
        Err(ErrorType::MissingPartitionKey { table }) => assert_eq!(table, "events"),
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(connection.session().fetches(), 0);
}

#[test]
fn create_runs_table_then_indexes() {
    let mut connection = connection(RecordingSession::new());
    connection
        .schema()
        .create("events", |table| {
            table.uuid("tenant");
            table.timestamp("created_at");
            table.set_collection("tags", SchemaType::Text);
            table.primary(&["tenant"], &["created_at"]);
            table.with_options(|options| {
                options
                    .order_by("created_at", Direction::Desc)
                    .attribute("gc_grace_seconds", "0");
            });
            table.index(&["tags"], None);
        })
        .unwrap();

    assert_eq!(
        connection.session().queries(),
        vec![
            "create table \"events\" (\"tenant\" uuid, \"created_at\" timestamp, \"tags\" set<text>, primary key ((\"tenant\"), \"created_at\")) with clustering order by (\"created_at\" desc) AND gc_grace_seconds=0".to_string(),
            "CREATE INDEX \"events_tags_index\" ON \"events\" (\"tags\")".to_string(),
        ]
    );
}

#[test]
fn alter_adds_one_column_per_statement() {
    let mut connection = connection(RecordingSession::new());
    connection
        .schema()
        .table("users", |table| {
            table.string("nickname");
            table.int("age");
            table.drop_column(&["a", "b"]);
        })
        .unwrap();

    assert_eq!(
        connection.session().queries(),
        vec![
            "alter table \"users\" add \"nickname\" varchar".to_string(),
            "alter table \"users\" add \"age\" int".to_string(),
            "alter table \"users\" drop (\"a\", \"b\")".to_string(),
        ]
    );
}

#[test]
fn has_table_and_listing_use_system_schema() {
    let mut session = RecordingSession::new();
    session
        .respond(names_page("table_name", &["users"]))
        .respond(names_page("column_name", &["id", "email"]));
    let mut connection = connection(session);

    assert!(connection.schema().has_table("users").unwrap());
    assert_eq!(
        connection.schema().get_column_listing("users").unwrap(),
        vec!["id".to_string(), "email".to_string()]
    );
    let (statement, _) = &connection.session().executed[0];
    assert_eq!(
        statement.values,
        vec![CqlValue::from("users"), CqlValue::from("shop")]
    );

    // Sin filas la tabla no existe
    assert!(!connection.schema().has_table("ghost").unwrap());
}

#[test]
fn drop_all_tables_drops_each_listed_table() {
    let mut session = RecordingSession::new();
    session.respond(names_page("table_name", &["users", "orders"]));
    let mut connection = connection(session);

    connection.schema().drop_all_tables().unwrap();

    let queries = connection.session().queries();
    assert_eq!(queries.len(), 3);
    assert_eq!(queries[1], "drop table if exists \"users\"");
    assert_eq!(queries[2], "drop table if exists \"orders\"");
}

#[test]
fn existing_keyspace_can_be_kept() {
    let mut session = RecordingSession::new();
    session.fail(ALREADY_EXISTS_CODE, "Cannot add existing keyspace \"shop\"");
    let mut connection = connection(session);

    let mut asked = None;
    let status = connection
        .schema()
        .create_keyspace_or_resolve("shop", |name| {
            asked = Some(name.to_string());
            KeyspaceConflict::Keep
        })
        .unwrap();

    assert_eq!(status, KeyspaceStatus::Kept);
    assert_eq!(asked.as_deref(), Some("shop"));
    assert_eq!(connection.session().fetches(), 1);
}

#[test]
fn existing_keyspace_can_be_recreated() {
    let mut session = RecordingSession::new();
    session.fail(0x2200, "Cannot add existing keyspace \"shop\"");
    let mut connection = connection(session);

    let status = connection
        .schema()
        .create_keyspace_or_resolve("shop", |_| KeyspaceConflict::DropAndRecreate)
        .unwrap();

    assert_eq!(status, KeyspaceStatus::Recreated);
    let queries = connection.session().queries();
    assert_eq!(queries.len(), 3);
    assert!(queries[0].starts_with("CREATE KEYSPACE \"shop\""));
    assert_eq!(queries[1], "DROP KEYSPACE \"shop\"");
    assert!(queries[2].starts_with("CREATE KEYSPACE \"shop\""));
}

#[test]
fn other_keyspace_errors_propagate_without_asking() {
    let mut session = RecordingSession::new();
    session.fail(0x2100, "User has no CREATE permission");
    let mut connection = connection(session);

    let result = connection
        .schema()
        .create_keyspace_or_resolve("shop", |_| panic!("resolver must not run"));

    match result {
        Err(ErrorType::Server { code, message }) => {
            assert_eq!(code, 0x2100);
            assert_eq!(message, "User has no CREATE permission");
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(connection.session().fetches(), 1);
}

#[test]
fn fresh_keyspace_is_created() {
    let mut connection = connection(RecordingSession::new());
    let status = connection
        .schema()
        .create_keyspace_or_resolve("shop", |_| KeyspaceConflict::Keep)
        .unwrap();
    assert_eq!(status, KeyspaceStatus::Created);
    assert_eq!(
        connection.session().queries()[0],
        "CREATE KEYSPACE \"shop\" WITH replication = {'class': 'NetworkTopologyStrategy', 'datacenter1': 3} AND durable_writes = true"
    );
}

fn column_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9_]{0,8}", 0..4)
}

proptest! {
    #[test]
    fn primary_key_clause_shape(
        partition in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 1..4),
        clustering in column_names(),
    ) {
        let partition_refs: Vec<&str> = partition.iter().map(String::as_str).collect();
        let clustering_refs: Vec<&str> = clustering.iter().map(String::as_str).collect();
        let clause = PrimaryKey::new(&partition_refs, &clustering_refs)
            .compile("t", quote)
            .unwrap();

        let partition_group: Vec<String> = partition.iter().map(|c| quote(c)).collect();
        let mut expected = format!("primary key (({})", partition_group.join(", "));
        for column in &clustering {
            expected.push_str(", ");
            expected.push_str(&quote(column));
        }
        expected.push(')');
        prop_assert_eq!(clause, expected);
    }

    #[test]
    fn empty_partition_key_always_fails(clustering in column_names()) {
        let clustering_refs: Vec<&str> = clustering.iter().map(String::as_str).collect();
        let result = PrimaryKey::new(&[], &clustering_refs).compile("t", quote);
        let is_missing_key = matches!(result, Err(ErrorType::MissingPartitionKey { .. }));
        prop_assert!(is_missing_key);
    }
}

mod common;

use common::{connection, int_page, RecordingSession};
use cql_mapper::config::ConnectionConfig;
use cql_mapper::connection::{Connection, MAX_BATCH_STATEMENTS};
use cql_mapper::error::ErrorType;
use cql_mapper::grammar::CqlGrammar;
use cql_mapper::message_functions::column_spec::ColumnSpec;
use cql_mapper::message_functions::consistency::Consistency;
use cql_mapper::query_functions::{query_builder::QueryBuilder, statement::Record};
use cql_mapper::session::Page;
use cql_mapper::value_functions::column_type::ColumnType;
use cql_mapper::value_functions::cql_value::CqlValue;
use std::io::Write;

fn user(id: i32, name: &str) -> Record {
    let mut record = Record::new();
    record.insert("id".to_string(), CqlValue::Int(id));
    record.insert("name".to_string(), CqlValue::from(name));
    record
}

#[test]
fn single_insert_with_ttl_goes_as_query() {
    let mut connection = connection(RecordingSession::new());
    let query = QueryBuilder::table("users").ttl(60);
    connection.insert(&query, &[user(1, "ana")]).unwrap();

    let session = connection.session();
    assert!(session.batches.is_empty());
    let (statement, options) = &session.executed[0];
    assert_eq!(
        statement.query,
        "insert into \"users\" (\"id\", \"name\") values (?, ?) using ttl 60"
    );
    assert_eq!(
        statement.values,
        vec![CqlValue::Int(1), CqlValue::from("ana")]
    );
    assert_eq!(options.page_size, None);
    assert_eq!(options.consistency, Some(Consistency::LocalOne));
}

#[test]
fn zero_ttl_is_left_out() {
    let mut connection = connection(RecordingSession::new());
    let query = QueryBuilder::table("users").ttl(0);
    connection.insert(&query, &[user(1, "ana")]).unwrap();
    assert!(!connection.session().queries()[0].contains("using ttl"));
}

#[test]
fn several_rows_go_as_one_batch() {
    let mut connection = connection(RecordingSession::new());
    let query = QueryBuilder::table("users");
    connection
        .insert(&query, &[user(1, "ana"), user(2, "beto"), user(3, "carla")])
        .unwrap();

    let session = connection.session();
    assert_eq!(session.fetches(), 0);
    assert_eq!(session.batches.len(), 1);
    let batch = &session.batches[0];
    assert_eq!(batch.len(), 3);
    assert_eq!(batch[2].values, vec![CqlValue::Int(3), CqlValue::from("carla")]);
}

#[test]
fn inserts_beyond_batch_limit_fail_before_io() {
    let mut connection = connection(RecordingSession::new());
    let rows: Vec<Record> = (0..=MAX_BATCH_STATEMENTS as i32)
        .map(|id| user(id, "x"))
        .collect();

    match connection.insert(&QueryBuilder::table("users"), &rows) {
        Err(ErrorType::InvalidQuery(message)) => assert!(message.contains("65536 rows")),
        other => panic!("unexpected result {:?}", other),
    }
    assert!(connection.session().batches.is_empty());
    assert_eq!(connection.session().fetches(), 0);
}

#[test]
fn update_binds_values_before_wheres() {
    let mut connection = connection(RecordingSession::new());
    let query = QueryBuilder::table("users").where_eq("id", 7).ttl(30);
    let mut values = Record::new();
    values.insert("name".to_string(), CqlValue::from("eva"));
    connection.update(&query, &values).unwrap();

    let (statement, _) = &connection.session().executed[0];
    assert_eq!(
        statement.query,
        "update \"users\" using ttl 30 set \"name\" = ? where \"id\" = ?"
    );
    assert_eq!(statement.values, vec![CqlValue::from("eva"), CqlValue::Int(7)]);
}

#[test]
fn delete_and_first() {
    let mut session = RecordingSession::new();
    session.respond(int_page(&[42], None));
    let mut connection = connection(session);

    let query = QueryBuilder::table("numbers").where_eq("bucket", 1);
    let row = connection.first(&query).unwrap().unwrap();
    assert_eq!(row.get("n"), Some(&CqlValue::Int(42)));

    connection.delete(&query).unwrap();
    assert_eq!(
        connection.session().queries(),
        vec![
            "select * from \"numbers\" where \"bucket\" = ? limit 1".to_string(),
            "delete from \"numbers\" where \"bucket\" = ?".to_string(),
        ]
    );
}

#[test]
fn count_reads_the_aggregate_column() {
    let mut session = RecordingSession::new();
    session.respond(Page::new(
        vec![ColumnSpec::new("aggregate", ColumnType::Bigint)],
        vec![vec![CqlValue::Bigint(12)]],
        None,
    ));
    let mut connection = connection(session);

    let query = QueryBuilder::table("users").allow_filtering(true);
    assert_eq!(connection.count(&query).unwrap(), 12);
    assert_eq!(
        connection.session().queries()[0],
        "select count(*) as aggregate from \"users\" ALLOW FILTERING"
    );
}

#[test]
fn or_where_fails_before_io() {
    let mut connection = connection(RecordingSession::new());
    let query = QueryBuilder::table("users")
        .where_eq("id", 1)
        .or_where("id", 2);
    assert!(matches!(
        connection.get(&query),
        Err(ErrorType::UnsupportedFeature(_))
    ));
    assert_eq!(connection.session().fetches(), 0);
}

#[test]
fn transactions_fail_without_io() {
    let mut connection = connection(RecordingSession::new());
    assert!(matches!(
        connection.begin_transaction(),
        Err(ErrorType::TransactionsNotSupported)
    ));
    assert!(matches!(
        connection.transaction(|c| c.statement("truncate \"users\"", vec![])),
        Err(ErrorType::TransactionsNotSupported)
    ));
    assert_eq!(connection.session().fetches(), 0);
}

#[test]
fn server_errors_propagate_unmodified() {
    let mut session = RecordingSession::new();
    session.fail(0x2200, "Undefined column name nope");
    let mut connection = connection(session);

    let query = QueryBuilder::table("users").select(&["nope"]);
    match connection.get(&query) {
        Err(ErrorType::Server { code, message }) => {
            assert_eq!(code, 0x2200);
            assert_eq!(message, "Undefined column name nope");
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn raw_select_fetches_every_page() {
    let mut session = RecordingSession::new();
    session
        .respond(int_page(&[1, 2], Some(b"t")))
        .respond(int_page(&[3], None));
    let mut connection = connection(session);

    let collection = connection
        .select("select \"n\" from \"numbers\" where \"bucket\" = ?", vec![CqlValue::Int(1)])
        .unwrap();
    assert_eq!(collection.len(), 3);
    assert_eq!(connection.session().fetches(), 2);
}

#[test]
fn table_prefix_from_config() {
    let mut config = common::config();
    config.prefix = "app_".to_string();
    let mut connection: Connection<RecordingSession, CqlGrammar> =
        Connection::new(RecordingSession::new(), &config);

    connection.delete(&QueryBuilder::table("users")).unwrap();
    assert_eq!(connection.session().queries()[0], "delete from \"app_users\"");
}

#[test]
fn config_file_is_loaded_and_validated() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "host": "10.0.0.1, 10.0.0.2:9043",
            "keyspace": "shop",
            "consistency": "LOCAL_QUORUM",
            "page_size": 100,
            "timeout": 3,
            "replication": {{ "class": "SimpleStrategy", "replication_factor": 1 }}
        }}"#
    )
    .unwrap();

    let config = ConnectionConfig::from_json_file(file.path()).unwrap();
    assert_eq!(
        config.contact_addresses(),
        vec!["10.0.0.1:9042".to_string(), "10.0.0.2:9043".to_string()]
    );
    assert_eq!(config.consistency, Consistency::LocalQuorum);
    assert_eq!(config.default_page_size(), 100);
    assert_eq!(config.migrations, "migrations");

    let mut connection = Connection::new(RecordingSession::new(), &config);
    connection.get(&QueryBuilder::table("users")).unwrap();
    let (_, options) = &connection.session().executed[0];
    assert_eq!(options.page_size, Some(100));
    assert_eq!(options.consistency, Some(Consistency::LocalQuorum));
}

#[test]
fn config_without_keyspace_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "host": "127.0.0.1" }}"#).unwrap();
    assert!(matches!(
        ConnectionConfig::from_json_file(file.path()),
        Err(ErrorType::InvalidConfig(_))
    ));
}

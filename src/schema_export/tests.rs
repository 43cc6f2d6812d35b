use crate::error::SchemaGenError;
use crate::schema_export::{export_all, export_dialect, output_path, Dialect};
use crate::types::{
    ColumnDef, ColumnType, EntityDef, ForeignKeyDef, SchemaCatalog, SchemaSource, SequenceDef,
    UniqueConstraintDef,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn sample_source() -> SchemaSource {
    let mut users = EntityDef::new("users".to_string());
    users.add_column(ColumnDef::new("id".to_string(), ColumnType::BigInt).not_null());
    users.add_column(ColumnDef::new("email".to_string(), ColumnType::Varchar(Some(255))).not_null());
    users.add_column(ColumnDef::new(
        "created_at".to_string(),
        ColumnType::Timestamp,
    ));
    users.set_primary_key(vec!["id".to_string()]);
    users.add_unique_constraint(UniqueConstraintDef {
        name: "uq_users_email".to_string(),
        columns: vec!["email".to_string()],
    });

    let mut posts = EntityDef::new("posts".to_string());
    posts.add_column(ColumnDef::new("id".to_string(), ColumnType::BigInt).not_null());
    posts.add_column(ColumnDef::new("author_id".to_string(), ColumnType::BigInt).not_null());
    posts.set_primary_key(vec!["id".to_string()]);
    posts.add_foreign_key(ForeignKeyDef {
        name: "fk_posts_author".to_string(),
        column: "author_id".to_string(),
        referenced_table: "users".to_string(),
    });

    let mut source = SchemaSource::new("org.transitap.core".to_string());
    source.add_entity(users);
    source.add_entity(posts);
    source.add_sequence(SequenceDef {
        name: "post_seq".to_string(),
    });
    source
}

fn sample_catalog() -> SchemaCatalog {
    let mut catalog = SchemaCatalog::new();
    catalog.add_source(sample_source());
    catalog
}

fn assert_no_drop_statements(script: &str) {
    for line in script.lines() {
        assert!(!line.contains("drop table"), "leftover drop table: {}", line);
        assert!(
            !line.contains("drop sequence"),
            "leftover drop sequence: {}",
            line
        );
        assert!(
            !line.contains("drop constraint"),
            "leftover drop constraint: {}",
            line
        );
        assert!(
            !line.contains("drop foreign key"),
            "leftover drop foreign key: {}",
            line
        );
    }
}

#[test]
fn test_output_path_naming() {
    assert_eq!(
        output_path(Dialect::Postgres, "a.b.c", None),
        Path::new("ddl_postgres_a_b_c.sql")
    );
    assert_eq!(
        output_path(Dialect::Mysql, "a.b.c", Some(Path::new("/tmp/out"))),
        Path::new("/tmp/out/ddl_mysql_a_b_c.sql")
    );
}

#[test]
fn test_export_dialect_writes_cleaned_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let source = sample_source();

    let path = export_dialect(&source, Dialect::Postgres, Some(temp_dir.path())).unwrap();
    assert_eq!(
        path.file_name().unwrap(),
        "ddl_postgres_org_transitap_core.sql"
    );

    let script = fs::read_to_string(&path).unwrap();
    assert_no_drop_statements(&script);
    assert!(script.contains("create table users ("));
    assert!(script.contains("create sequence post_seq start with 1 increment by 1;"));
    assert!(script.contains(
        "alter table posts \n    add constraint fk_posts_author \n    foreign key (author_id) \n    references users;"
    ));
    assert!(
        script.contains("alter table users \n    add constraint uq_users_email unique (email);")
    );
}

#[test]
fn test_export_all_writes_one_artifact_per_dialect() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = sample_catalog();

    let summary = export_all(&catalog, "org.transitap.core", Some(temp_dir.path())).unwrap();
    assert!(summary.is_successful());
    assert_eq!(summary.outcomes.len(), 3);

    for name in [
        "ddl_postgres_org_transitap_core.sql",
        "ddl_oracle_org_transitap_core.sql",
        "ddl_mysql_org_transitap_core.sql",
    ] {
        let path = temp_dir.path().join(name);
        assert!(path.exists(), "missing artifact {}", name);
        assert_no_drop_statements(&fs::read_to_string(&path).unwrap());
    }
}

#[test]
fn test_mysql_timestamp_override_does_not_leak_across_dialects() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = sample_catalog();

    export_all(&catalog, "org.transitap.core", Some(temp_dir.path())).unwrap();

    let mysql = fs::read_to_string(
        temp_dir.path().join("ddl_mysql_org_transitap_core.sql"),
    )
    .unwrap();
    let postgres = fs::read_to_string(
        temp_dir.path().join("ddl_postgres_org_transitap_core.sql"),
    )
    .unwrap();
    let oracle = fs::read_to_string(
        temp_dir.path().join("ddl_oracle_org_transitap_core.sql"),
    )
    .unwrap();

    assert!(mysql.contains("created_at datetime(3)"));
    assert!(postgres.contains("created_at timestamp"));
    assert!(oracle.contains("created_at timestamp"));
    assert!(!postgres.contains("datetime(3)"));
    assert!(!oracle.contains("datetime(3)"));
}

#[test]
fn test_unknown_namespace_fails_before_any_dialect() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = sample_catalog();

    let err = export_all(&catalog, "org.unknown", Some(temp_dir.path())).unwrap_err();
    assert!(matches!(err, SchemaGenError::Configuration { .. }));
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_per_dialect_failure_does_not_stop_remaining_dialects() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = sample_catalog();

    // An output directory that does not exist fails every write, but each
    // dialect is still attempted and reported separately
    let missing = temp_dir.path().join("no_such_dir");
    let summary = export_all(&catalog, "org.transitap.core", Some(&missing)).unwrap();

    assert!(!summary.is_successful());
    assert_eq!(summary.outcomes.len(), 3);
    for outcome in &summary.outcomes {
        assert!(outcome.result.is_err());
    }
}

#[test]
fn test_rerun_overwrites_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = sample_catalog();

    export_all(&catalog, "org.transitap.core", Some(temp_dir.path())).unwrap();
    let summary = export_all(&catalog, "org.transitap.core", Some(temp_dir.path())).unwrap();
    assert!(summary.is_successful());

    // Still exactly one artifact per dialect
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 3);
}

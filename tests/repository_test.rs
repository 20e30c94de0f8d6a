//! Repository behavior against a recording fake execution interface.

use async_trait::async_trait;
use dbrepo::db::{Database, Row, SqlParam};
use dbrepo::error::{DbError, DbResult};
use dbrepo::repo::{RepoHooks, Repository};
use serde::Deserialize;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct User {
    id: i64,
    login: String,
    perfil: i64,
}

fn scan_user(row: &Row) -> DbResult<User> {
    dbrepo::decode_row(row)
}

fn user_values(user: &User) -> Vec<SqlParam> {
    vec![
        user.id.into(),
        user.login.clone().into(),
        user.perfil.into(),
    ]
}

fn user_id(user: &User) -> SqlParam {
    user.id.into()
}

fn short_values(user: &User) -> Vec<SqlParam> {
    vec![user.id.into()]
}

/// Fake execution interface recording every statement it receives.
#[derive(Default)]
struct FakeDb {
    statements: Mutex<Vec<(String, Vec<SqlParam>)>>,
    rows: Mutex<Vec<Row>>,
}

impl FakeDb {
    fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            statements: Mutex::new(Vec::new()),
            rows: Mutex::new(rows),
        }
    }

    fn recorded(&self) -> Vec<(String, Vec<SqlParam>)> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl Database for FakeDb {
    async fn close(&self) -> DbResult<()> {
        Ok(())
    }

    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }

    async fn query(&self, sql: &str, params: &[SqlParam]) -> DbResult<Vec<Row>> {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn query_row(&self, sql: &str, params: &[SqlParam]) -> DbResult<Option<Row>> {
        Ok(self.query(sql, params).await?.into_iter().next())
    }

    async fn exec(&self, sql: &str, params: &[SqlParam]) -> DbResult<u64> {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        Ok(1)
    }
}

fn user_row(id: i64, login: &str, perfil: i64) -> Row {
    let mut row = Row::new();
    row.insert("id".to_string(), serde_json::json!(id));
    row.insert("login".to_string(), serde_json::json!(login));
    row.insert("perfil".to_string(), serde_json::json!(perfil));
    row
}

fn user_fields() -> Vec<String> {
    vec!["id".to_string(), "login".to_string(), "perfil".to_string()]
}

fn repo(fake: &Arc<FakeDb>) -> Repository<User> {
    Repository::new(fake.clone(), "users", user_fields(), scan_user)
        .with_values(user_values)
        .with_id_value(user_id)
}

struct RejectingBeforeInsert;

#[async_trait]
impl RepoHooks<User> for RejectingBeforeInsert {
    async fn before_insert(&self, _entity: &User) -> DbResult<()> {
        Err(DbError::hook("BeforeInsert", "rejected by policy"))
    }
}

struct FailingAfterInsert;

#[async_trait]
impl RepoHooks<User> for FailingAfterInsert {
    async fn after_insert(&self, _entity: &User) -> DbResult<()> {
        Err(DbError::hook("AfterInsert", "notification failed"))
    }
}

#[tokio::test]
async fn test_find_all_on_empty_table_is_ok() {
    let fake = Arc::new(FakeDb::default());
    let users = repo(&fake).find_all().await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_find_by_id_missing_is_not_found() {
    let fake = Arc::new(FakeDb::default());
    let err = repo(&fake).find_by_id(42i64).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_find_by_id_scans_row() {
    let fake = Arc::new(FakeDb::with_rows(vec![user_row(7, "alice", 1)]));
    let user = repo(&fake).find_by_id(7i64).await.unwrap();
    assert_eq!(
        user,
        User {
            id: 7,
            login: "alice".to_string(),
            perfil: 1
        }
    );

    let recorded = fake.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(
        recorded[0].0,
        "SELECT id, login, perfil FROM users WHERE users.id = ?"
    );
    assert_eq!(recorded[0].1, vec![SqlParam::Int(7)]);
}

#[tokio::test]
async fn test_find_passes_predicate_and_params() {
    let fake = Arc::new(FakeDb::with_rows(vec![user_row(1, "a", 2)]));
    let users = repo(&fake)
        .find("perfil = ?", &[SqlParam::Int(2)])
        .await
        .unwrap();
    assert_eq!(users.len(), 1);

    let recorded = fake.recorded();
    assert_eq!(
        recorded[0].0,
        "SELECT id, login, perfil FROM users WHERE perfil = ?"
    );
    assert_eq!(recorded[0].1, vec![SqlParam::Int(2)]);
}

#[tokio::test]
async fn test_insert_binds_one_value_per_field() {
    let fake = Arc::new(FakeDb::default());
    let user = User {
        id: 1,
        login: "bob".to_string(),
        perfil: 3,
    };
    repo(&fake).insert(&user).await.unwrap();

    let recorded = fake.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(
        recorded[0].0,
        "INSERT INTO users (id, login, perfil) VALUES (?, ?, ?)"
    );
    assert_eq!(recorded[0].1.len(), 3);
}

#[tokio::test]
async fn test_update_appends_identity_as_last_bind() {
    let fake = Arc::new(FakeDb::default());
    let user = User {
        id: 9,
        login: "carol".to_string(),
        perfil: 5,
    };
    repo(&fake).update(&user).await.unwrap();

    let recorded = fake.recorded();
    assert_eq!(
        recorded[0].0,
        "UPDATE users SET id = ?, login = ?, perfil = ? WHERE id = ?"
    );
    assert_eq!(recorded[0].1.len(), 4);
    assert_eq!(recorded[0].1[3], SqlParam::Int(9));
}

#[tokio::test]
async fn test_delete_binds_id() {
    let fake = Arc::new(FakeDb::default());
    repo(&fake).delete(4i64).await.unwrap();

    let recorded = fake.recorded();
    assert_eq!(recorded[0].0, "DELETE FROM users WHERE id = ?");
    assert_eq!(recorded[0].1, vec![SqlParam::Int(4)]);
}

#[tokio::test]
async fn test_failing_before_hook_prevents_statement() {
    let fake = Arc::new(FakeDb::default());
    let repo = repo(&fake).with_hooks(Box::new(RejectingBeforeInsert));
    let user = User {
        id: 1,
        login: "bob".to_string(),
        perfil: 3,
    };

    let err = repo.insert(&user).await.unwrap_err();
    assert!(matches!(err, DbError::Hook { .. }));
    // no statement reached the execution interface
    assert!(fake.recorded().is_empty());
}

#[tokio::test]
async fn test_failing_after_hook_reported_after_statement_ran() {
    let fake = Arc::new(FakeDb::default());
    let repo = repo(&fake).with_hooks(Box::new(FailingAfterInsert));
    let user = User {
        id: 1,
        login: "bob".to_string(),
        perfil: 3,
    };

    let err = repo.insert(&user).await.unwrap_err();
    assert!(matches!(err, DbError::Hook { .. }));
    // the statement already executed; callers must treat the operation as
    // possibly committed
    assert_eq!(fake.recorded().len(), 1);
}

#[tokio::test]
async fn test_insert_without_values_extractor_is_configuration_error() {
    let fake = Arc::new(FakeDb::default());
    let repo: Repository<User> = Repository::new(fake.clone(), "users", user_fields(), scan_user);
    let user = User {
        id: 1,
        login: "bob".to_string(),
        perfil: 3,
    };

    let err = repo.insert(&user).await.unwrap_err();
    assert!(matches!(err, DbError::Configuration { .. }));
    assert!(fake.recorded().is_empty());
}

#[tokio::test]
async fn test_values_arity_mismatch_is_configuration_error() {
    let fake = Arc::new(FakeDb::default());
    let repo: Repository<User> = Repository::new(fake.clone(), "users", user_fields(), scan_user)
        .with_values(short_values);
    let user = User {
        id: 1,
        login: "bob".to_string(),
        perfil: 3,
    };

    let err = repo.insert(&user).await.unwrap_err();
    assert!(matches!(err, DbError::Configuration { .. }));
    assert!(fake.recorded().is_empty());
}

#[tokio::test]
async fn test_update_without_identity_extractor_is_configuration_error() {
    let fake = Arc::new(FakeDb::default());
    let repo: Repository<User> = Repository::new(fake.clone(), "users", user_fields(), scan_user)
        .with_values(user_values);
    let user = User {
        id: 1,
        login: "bob".to_string(),
        perfil: 3,
    };

    let err = repo.update(&user).await.unwrap_err();
    assert!(matches!(err, DbError::Configuration { .. }));
    assert!(fake.recorded().is_empty());
}

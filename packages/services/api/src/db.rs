//! 문서 저장소
//!
//! Mongo 스타일의 컬렉션 인터페이스를 SQLite 한 테이블 위에 구현합니다.
//! 모든 문서는 JSON 본문으로 저장되며, 컬렉션별 스키마는 없습니다.
//!
//! ```text
//! documents(collection, id, body(json), created_at, updated_at)
//! ```
//!
//! 동등 조건 필터는 `json_extract`로 SQL에 내려보냅니다. 전문 검색 같은
//! 인덱스 최적화는 다루지 않습니다.

use std::str::FromStr;

use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// 저장된 문서 한 건
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub body: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl Document {
    /// 본문에서 문자열 필드 조회
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.body.get(name).and_then(Value::as_str)
    }

    /// `_id`와 타임스탬프를 포함한 응답용 JSON으로 변환
    pub fn into_json(self) -> Value {
        let mut body = self.body;
        if let Value::Object(map) = &mut body {
            map.insert("_id".to_string(), Value::String(self.id));
            map.insert("created_at".to_string(), Value::String(self.created_at));
            map.insert("updated_at".to_string(), Value::String(self.updated_at));
        }
        body
    }
}

/// 목록 조회 정렬
#[derive(Debug, Clone, Copy)]
pub enum Order {
    CreatedAsc,
    CreatedDesc,
    UpdatedDesc,
}

impl Order {
    fn sql(self) -> &'static str {
        match self {
            Order::CreatedAsc => " ORDER BY created_at ASC",
            Order::CreatedDesc => " ORDER BY created_at DESC",
            Order::UpdatedDesc => " ORDER BY updated_at DESC",
        }
    }
}

/// 문서 저장소
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// 연결 및 스키마 초기화
    pub async fn connect(db_url: &str) -> anyhow::Result<Self> {
        if let Some(path) = db_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);
        // 메모리 DB는 연결마다 별도 인스턴스가 되므로 단일 연결로 제한
        let max_connections = if db_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            );"#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// 문서 삽입, 생성된 id 반환
    pub async fn insert(&self, collection: &str, body: &Value) -> sqlx::Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO documents(collection,id,body,created_at,updated_at) \
             VALUES (?1,?2,?3,?4,?5)",
        )
        .bind(collection)
        .bind(&id)
        .bind(body.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    /// id로 단건 조회
    pub async fn get(&self, collection: &str, id: &str) -> sqlx::Result<Option<Document>> {
        let row = sqlx::query(
            "SELECT id,body,created_at,updated_at FROM documents \
             WHERE collection=?1 AND id=?2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(doc_from_row))
    }

    /// 필드 동등 조건으로 단건 조회
    pub async fn find_one_by(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> sqlx::Result<Option<Document>> {
        let mut docs = self
            .list(collection, &[(field, value.clone())], Order::CreatedAsc, 1)
            .await?;
        Ok(docs.pop())
    }

    /// 목록 조회
    ///
    /// `filters`는 본문 최상위 필드에 대한 동등 조건입니다.
    pub async fn list(
        &self,
        collection: &str,
        filters: &[(&str, Value)],
        order: Order,
        limit: i64,
    ) -> sqlx::Result<Vec<Document>> {
        let mut sql =
            String::from("SELECT id,body,created_at,updated_at FROM documents WHERE collection=?1");
        for (i, (field, _)) in filters.iter().enumerate() {
            sql.push_str(&format!(
                " AND json_extract(body, '$.{}') = ?{}",
                field,
                i + 2
            ));
        }
        sql.push_str(order.sql());
        sql.push_str(&format!(" LIMIT ?{}", filters.len() + 2));

        let mut query = sqlx::query(&sql).bind(collection);
        for (_, value) in filters {
            query = bind_value(query, value);
        }
        let rows = query.bind(limit).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(doc_from_row).collect())
    }

    /// 조건에 맞는 문서 수
    pub async fn count_by(
        &self,
        collection: &str,
        filters: &[(&str, Value)],
    ) -> sqlx::Result<i64> {
        let mut sql = String::from("SELECT COUNT(*) AS n FROM documents WHERE collection=?1");
        for (i, (field, _)) in filters.iter().enumerate() {
            sql.push_str(&format!(
                " AND json_extract(body, '$.{}') = ?{}",
                field,
                i + 2
            ));
        }

        let mut query = sqlx::query(&sql).bind(collection);
        for (_, value) in filters {
            query = bind_value(query, value);
        }
        let row = query.fetch_one(&self.pool).await?;
        Ok(row.try_get("n").unwrap_or(0))
    }

    /// 본문 얕은 병합 업데이트 (updated_at 갱신)
    ///
    /// 대상 문서가 없으면 `false`를 반환합니다.
    pub async fn merge(&self, collection: &str, id: &str, patch: &Value) -> sqlx::Result<bool> {
        let Some(doc) = self.get(collection, id).await? else {
            return Ok(false);
        };

        let mut body = doc.body;
        if let (Value::Object(base), Value::Object(patch)) = (&mut body, patch) {
            for (k, v) in patch {
                base.insert(k.clone(), v.clone());
            }
        }

        let res = sqlx::query(
            "UPDATE documents SET body=?1, updated_at=?2 WHERE collection=?3 AND id=?4",
        )
        .bind(body.to_string())
        .bind(Utc::now().to_rfc3339())
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    /// 문서 삭제
    pub async fn delete(&self, collection: &str, id: &str) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM documents WHERE collection=?1 AND id=?2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// 존재하는 컬렉션 이름 목록 (헬스체크용)
    pub async fn collections(&self) -> sqlx::Result<Vec<String>> {
        let rows = sqlx::query("SELECT DISTINCT collection FROM documents ORDER BY collection")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| r.try_get::<String, _>("collection").unwrap_or_default())
            .collect())
    }
}

fn doc_from_row(row: &SqliteRow) -> Document {
    let body_text: String = row.try_get("body").unwrap_or_default();
    Document {
        id: row.try_get("id").unwrap_or_default(),
        body: serde_json::from_str(&body_text).unwrap_or(Value::Null),
        created_at: row.try_get("created_at").unwrap_or_default(),
        updated_at: row.try_get("updated_at").unwrap_or_default(),
    }
}

/// JSON 값을 SQLite 비교 가능한 값으로 바인딩
///
/// SQLite의 `json_extract`는 불리언을 1/0 정수로 돌려주므로 그에 맞춥니다.
fn bind_value<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>,
    value: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>> {
    match value {
        Value::String(s) => query.bind(s.as_str()),
        Value::Bool(b) => query.bind(if *b { 1i64 } else { 0i64 }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else {
                query.bind(n.as_f64().unwrap_or(0.0))
            }
        }
        other => query.bind(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn store() -> Store {
        Store::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = store().await;
        let id = store
            .insert("book", &json!({"title": "Dune", "year": 1965}))
            .await
            .unwrap();

        let doc = store.get("book", &id).await.unwrap().unwrap();
        assert_eq!(doc.field_str("title"), Some("Dune"));

        let json = doc.into_json();
        assert_eq!(json["_id"], json!(id));
        assert!(json["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = store().await;
        assert!(store.get("book", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_one_by_field() {
        let store = store().await;
        store
            .insert("libraryuser", &json!({"email": "a@example.com"}))
            .await
            .unwrap();

        let found = store
            .find_one_by("libraryuser", "email", &json!("a@example.com"))
            .await
            .unwrap();
        assert!(found.is_some());

        let missing = store
            .find_one_by("libraryuser", "email", &json!("b@example.com"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_limit() {
        let store = store().await;
        for i in 0..5 {
            store
                .insert("book", &json!({"genre": "scifi", "n": i}))
                .await
                .unwrap();
        }
        store
            .insert("book", &json!({"genre": "fantasy", "n": 99}))
            .await
            .unwrap();

        let scifi = store
            .list("book", &[("genre", json!("scifi"))], Order::CreatedAsc, 100)
            .await
            .unwrap();
        assert_eq!(scifi.len(), 5);

        let limited = store
            .list("book", &[], Order::CreatedAsc, 3)
            .await
            .unwrap();
        assert_eq!(limited.len(), 3);
    }

    #[tokio::test]
    async fn test_boolean_filter() {
        let store = store().await;
        store
            .insert("book", &json!({"title": "A", "featured": true}))
            .await
            .unwrap();
        store
            .insert("book", &json!({"title": "B", "featured": false}))
            .await
            .unwrap();

        let featured = store
            .list("book", &[("featured", json!(true))], Order::CreatedAsc, 10)
            .await
            .unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].field_str("title"), Some("A"));
    }

    #[tokio::test]
    async fn test_merge_updates_body_and_timestamp() {
        let store = store().await;
        let id = store
            .insert("borrow", &json!({"status": "borrowed", "book_id": "b1"}))
            .await
            .unwrap();

        let matched = store
            .merge("borrow", &id, &json!({"status": "returned"}))
            .await
            .unwrap();
        assert!(matched);

        let doc = store.get("borrow", &id).await.unwrap().unwrap();
        assert_eq!(doc.field_str("status"), Some("returned"));
        assert_eq!(doc.field_str("book_id"), Some("b1"));

        let missing = store
            .merge("borrow", "nope", &json!({"status": "returned"}))
            .await
            .unwrap();
        assert!(!missing);
    }

    #[tokio::test]
    async fn test_count_by() {
        let store = store().await;
        for _ in 0..3 {
            store
                .insert("borrow", &json!({"user_id": "u1", "status": "borrowed"}))
                .await
                .unwrap();
        }
        store
            .insert("borrow", &json!({"user_id": "u1", "status": "returned"}))
            .await
            .unwrap();

        let active = store
            .count_by(
                "borrow",
                &[("user_id", json!("u1")), ("status", json!("borrowed"))],
            )
            .await
            .unwrap();
        assert_eq!(active, 3);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = store().await;
        let id = store.insert("book", &json!({"title": "A"})).await.unwrap();

        assert!(store.delete("book", &id).await.unwrap());
        assert!(!store.delete("book", &id).await.unwrap());
        assert!(store.get("book", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_collections_listing() {
        let store = store().await;
        store.insert("book", &json!({})).await.unwrap();
        store.insert("activity", &json!({})).await.unwrap();

        let names = store.collections().await.unwrap();
        assert_eq!(names, vec!["activity".to_string(), "book".to_string()]);
    }
}

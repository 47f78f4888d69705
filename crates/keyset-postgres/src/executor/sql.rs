//! Rendering of range queries into parameterised PostgreSQL statements.

use std::fmt::{self, Write};

use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Text, Timestamptz, Uuid};
use keyset_core::{RangeQuery, Value};

/// A rendered statement and the values for its `$n` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    sql: String,
    binds: Vec<Value>,
}

impl SqlStatement {
    /// Returns the statement text.
    #[inline]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the bound values in placeholder order.
    #[inline]
    pub fn binds(&self) -> &[Value] {
        &self.binds
    }

    /// Builds a diesel query with every value bound under its SQL type.
    pub(crate) fn into_query(self) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
        let mut query = diesel::sql_query(self.sql).into_boxed::<Pg>();

        for value in self.binds {
            query = match value {
                Value::BigInt(v) => query.bind::<BigInt, _>(v),
                Value::Timestamp(v) => query.bind::<Timestamptz, _>(jiff_diesel::Timestamp::from(v)),
                Value::Text(v) => query.bind::<Text, _>(v),
                Value::Uuid(v) => query.bind::<Uuid, _>(v),
            };
        }

        query
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Renders `query` as a row fetch.
///
/// `default_table` is used when the query is not scoped to a relation.
pub fn render_select(query: &RangeQuery, default_table: &str) -> SqlStatement {
    let mut statement = SqlStatement {
        sql: String::from("SELECT * FROM "),
        binds: Vec::with_capacity(query.predicates().len()),
    };

    push_identifier(&mut statement.sql, query.table().unwrap_or(default_table));
    push_where(&mut statement, query);

    if let Some((field, order)) = query.order() {
        statement.sql.push_str(" ORDER BY ");
        push_identifier(&mut statement.sql, field.as_str());
        statement.sql.push(' ');
        statement.sql.push_str(order.as_sql());
    }

    push_limit(&mut statement.sql, query);
    statement
}

/// Renders `query` as a row count.
///
/// A limited query counts a sub-select, so the server stops scanning once the
/// limit is reached. Ordering does not affect a count and is not rendered.
pub fn render_count(query: &RangeQuery, default_table: &str) -> SqlStatement {
    let mut statement = SqlStatement {
        sql: String::from("SELECT COUNT(*) AS count FROM "),
        binds: Vec::with_capacity(query.predicates().len()),
    };

    let limited = query.limit().is_some();
    if limited {
        statement.sql.push_str("(SELECT 1 FROM ");
    }

    push_identifier(&mut statement.sql, query.table().unwrap_or(default_table));
    push_where(&mut statement, query);

    if limited {
        push_limit(&mut statement.sql, query);
        statement.sql.push_str(") AS probe");
    }

    statement
}

fn push_where(statement: &mut SqlStatement, query: &RangeQuery) {
    for (index, predicate) in query.predicates().iter().enumerate() {
        statement
            .sql
            .push_str(if index == 0 { " WHERE " } else { " AND " });
        push_identifier(&mut statement.sql, predicate.field.as_str());

        statement.binds.push(predicate.value.clone());
        let _ = write!(
            statement.sql,
            " {} ${}",
            predicate.operator.as_sql(),
            statement.binds.len()
        );
    }
}

fn push_limit(sql: &mut String, query: &RangeQuery) {
    if let Some(limit) = query.limit() {
        let _ = write!(sql, " LIMIT {limit}");
    }
}

/// Appends a possibly schema-qualified identifier, quoting every part.
fn push_identifier(sql: &mut String, identifier: &str) {
    for (index, part) in identifier.split('.').enumerate() {
        if index > 0 {
            sql.push('.');
        }

        sql.push('"');
        sql.push_str(&part.replace('"', "\"\""));
        sql.push('"');
    }
}

#[cfg(test)]
mod tests {
    use keyset_core::{Cursor, CursorMode, Direction, FieldName, Operator, Paginator, SortOrder};

    use super::*;

    fn field(name: &str) -> FieldName {
        FieldName::new(name).unwrap()
    }

    #[test]
    fn select_renders_predicates_order_and_limit() {
        let query = RangeQuery::new()
            .with_predicate(field("owner_id"), Operator::Equal, 7_i64)
            .with_predicate(field("id"), Operator::LessThan, 8_i64)
            .with_order(field("id"), SortOrder::Descending)
            .with_limit(4);

        let statement = render_select(&query, "events");
        assert_eq!(
            statement.sql(),
            r#"SELECT * FROM "events" WHERE "owner_id" = $1 AND "id" < $2 ORDER BY "id" DESC LIMIT 4"#
        );
        assert_eq!(statement.binds(), &[Value::BigInt(7), Value::BigInt(8)]);
    }

    #[test]
    fn select_without_clauses() {
        let statement = render_select(&RangeQuery::new(), "events");
        assert_eq!(statement.sql(), r#"SELECT * FROM "events""#);
        assert!(statement.binds().is_empty());
    }

    #[test]
    fn explicit_table_overrides_default() {
        let query = RangeQuery::new().with_table("audit.events");
        let statement = render_select(&query, "events");
        assert_eq!(statement.sql(), r#"SELECT * FROM "audit"."events""#);
    }

    #[test]
    fn quotes_are_escaped_in_identifiers() {
        let mut sql = String::new();
        push_identifier(&mut sql, r#"odd"name"#);
        assert_eq!(sql, r#""odd""name""#);
    }

    #[test]
    fn limited_count_uses_a_sub_select() {
        let query = RangeQuery::new()
            .with_table("events")
            .with_predicate(field("id"), Operator::GreaterThan, 7_i64)
            .with_order(field("id"), SortOrder::Ascending)
            .with_limit(1);

        let statement = render_count(&query, "ignored");
        assert_eq!(
            statement.sql(),
            r#"SELECT COUNT(*) AS count FROM (SELECT 1 FROM "events" WHERE "id" > $1 LIMIT 1) AS probe"#
        );
        assert_eq!(statement.binds(), &[Value::BigInt(7)]);
    }

    #[test]
    fn unlimited_count_counts_the_relation() {
        let query = RangeQuery::new().with_predicate(field("kind"), Operator::Equal, "click");

        let statement = render_count(&query, "events");
        assert_eq!(
            statement.sql(),
            r#"SELECT COUNT(*) AS count FROM "events" WHERE "kind" = $1"#
        );
        assert_eq!(statement.binds(), &[Value::Text("click".to_owned())]);
    }

    #[test]
    fn paginator_queries_render_as_keyset_sql() {
        let paginator = Paginator::new(CursorMode::Time, "created_at")
            .unwrap()
            .with_order(SortOrder::Ascending)
            .with_direction(Direction::Back)
            .with_limit(20)
            .unwrap()
            .with_raw_cursor(Some(1_700_000_000_000_000_000))
            .unwrap();

        let page = render_select(&paginator.page_query(), "events");
        assert_eq!(
            page.sql(),
            r#"SELECT * FROM "events" WHERE "created_at" < $1 ORDER BY "created_at" DESC LIMIT 21"#
        );

        let boundary = Cursor::decode(1_600_000_000_000_000_000, CursorMode::Time).unwrap();
        let probe = render_count(&paginator.probe_query("events".into(), boundary), "events");
        assert_eq!(
            probe.sql(),
            r#"SELECT COUNT(*) AS count FROM (SELECT 1 FROM "events" WHERE "created_at" > $1 LIMIT 1) AS probe"#
        );
        assert!(matches!(probe.binds(), [Value::Timestamp(_)]));
    }
}

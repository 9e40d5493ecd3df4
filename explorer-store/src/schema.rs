//! Static table layout per resource kind.
//!
//! Table and column identifiers come only from these descriptors, never from
//! request input. `validate_schemas` runs when a SQL store opens.

use explorer_core::error::{ExplorerError, Result};
use explorer_core::types::ResourceKind;

/// SQL affinity of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    /// TEXT
    Text,
    /// REAL
    Real,
    /// INTEGER
    Integer,
}

impl ColumnType {
    /// SQL type name.
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Real => "REAL",
            ColumnType::Integer => "INTEGER",
        }
    }
}

/// One normalized field column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    /// Column identifier
    pub name: &'static str,
    /// Column type
    pub ty: ColumnType,
    /// Whether NULL is allowed
    pub nullable: bool,
}

const fn col(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty, nullable: false }
}

const fn opt(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty, nullable: true }
}

/// Layout of one kind's table.
///
/// Every table also has `id INTEGER PRIMARY KEY` and `created_at INTEGER`
/// (Unix milliseconds); dependent kinds add `location_id TEXT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSchema {
    /// Resource kind stored in this table
    pub kind: ResourceKind,
    /// Table identifier
    pub table: &'static str,
    /// Column locating a group (`search_query` or `location_id`)
    pub key_column: &'static str,
    /// Normalized field columns, in record field order
    pub columns: &'static [Column],
}

/// Column holding the owning location on dependent tables.
pub const LOCATION_ID_COLUMN: &str = "location_id";

/// Column holding the write timestamp.
pub const CREATED_AT_COLUMN: &str = "created_at";

use ColumnType::{Integer, Real, Text};

/// All table layouts, one per kind.
pub static SCHEMAS: [TableSchema; 6] = [
    TableSchema {
        kind: ResourceKind::Location,
        table: "locations",
        key_column: "search_query",
        columns: &[
            col("search_query", Text),
            col("formatted_query", Text),
            col("latitude", Real),
            col("longitude", Real),
        ],
    },
    TableSchema {
        kind: ResourceKind::Weather,
        table: "weathers",
        key_column: LOCATION_ID_COLUMN,
        columns: &[col("forecast", Text), col("time", Text)],
    },
    TableSchema {
        kind: ResourceKind::Event,
        table: "events",
        key_column: LOCATION_ID_COLUMN,
        columns: &[
            col("link", Text),
            col("name", Text),
            col("event_date", Text),
            opt("summary", Text),
        ],
    },
    TableSchema {
        kind: ResourceKind::Movie,
        table: "movies",
        key_column: LOCATION_ID_COLUMN,
        columns: &[
            col("title", Text),
            opt("overview", Text),
            col("average_votes", Real),
            col("total_votes", Integer),
            opt("image_url", Text),
            col("popularity", Real),
            opt("released_on", Text),
        ],
    },
    TableSchema {
        kind: ResourceKind::Trail,
        table: "trails",
        key_column: LOCATION_ID_COLUMN,
        columns: &[
            col("name", Text),
            opt("location", Text),
            col("length", Real),
            col("stars", Real),
            col("star_votes", Integer),
            opt("summary", Text),
            col("trail_url", Text),
            opt("conditions", Text),
            opt("condition_date", Text),
            opt("condition_time", Text),
        ],
    },
    TableSchema {
        kind: ResourceKind::Yelp,
        table: "yelps",
        key_column: LOCATION_ID_COLUMN,
        columns: &[
            col("name", Text),
            opt("image_url", Text),
            opt("price", Text),
            col("rating", Real),
            col("url", Text),
        ],
    },
];

/// Returns the layout for `kind`.
pub fn schema_for(kind: ResourceKind) -> &'static TableSchema {
    // SCHEMAS is ordered like ResourceKind::ALL
    let index = match kind {
        ResourceKind::Location => 0,
        ResourceKind::Weather => 1,
        ResourceKind::Event => 2,
        ResourceKind::Movie => 3,
        ResourceKind::Trail => 4,
        ResourceKind::Yelp => 5,
    };
    &SCHEMAS[index]
}

impl TableSchema {
    /// True when the key column is one of the normalized fields.
    pub fn keyed_by_field(&self) -> bool {
        self.columns.iter().any(|c| c.name == self.key_column)
    }

    /// Columns in SELECT order: id, fields, [location_id], created_at.
    pub fn select_columns(&self) -> Vec<&'static str> {
        let mut names = vec!["id"];
        names.extend(self.columns.iter().map(|c| c.name));
        if !self.keyed_by_field() {
            names.push(LOCATION_ID_COLUMN);
        }
        names.push(CREATED_AT_COLUMN);
        names
    }

    /// Columns in INSERT order: fields, [location_id], created_at.
    pub fn insert_columns(&self) -> Vec<&'static str> {
        self.select_columns().into_iter().skip(1).collect()
    }

    /// `CREATE TABLE` and `CREATE INDEX` statements.
    pub fn ddl(&self) -> Vec<String> {
        let mut defs = vec!["id INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
        for c in self.columns {
            let null = if c.nullable { "" } else { " NOT NULL" };
            defs.push(format!("{} {}{}", c.name, c.ty.sql(), null));
        }
        if !self.keyed_by_field() {
            defs.push(format!("{} TEXT NOT NULL", LOCATION_ID_COLUMN));
        }
        defs.push(format!("{} INTEGER NOT NULL", CREATED_AT_COLUMN));

        vec![
            format!("CREATE TABLE IF NOT EXISTS {} ({})", self.table, defs.join(", ")),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
                self.table, self.key_column, self.table, self.key_column
            ),
        ]
    }

    /// `SELECT ... WHERE key = ?1 ORDER BY id`.
    pub fn select_sql(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} = ?1 ORDER BY id",
            self.select_columns().join(", "),
            self.table,
            self.key_column
        )
    }

    /// `INSERT INTO ... VALUES (?1, ...)`.
    pub fn insert_sql(&self) -> String {
        let columns = self.insert_columns();
        let params: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            params.join(", ")
        )
    }

    /// `DELETE FROM ... WHERE key = ?1`.
    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} = ?1", self.table, self.key_column)
    }

    /// Checks identifiers and column uniqueness.
    pub fn validate(&self) -> Result<()> {
        let invalid = |what: &str, name: &str| {
            ExplorerError::ConstraintViolation(format!(
                "{} schema: invalid {} identifier '{}'",
                self.kind, what, name
            ))
        };

        if !is_identifier(self.table) {
            return Err(invalid("table", self.table));
        }
        if !is_identifier(self.key_column) {
            return Err(invalid("key column", self.key_column));
        }

        let mut seen = std::collections::HashSet::new();
        for c in self.columns {
            if !is_identifier(c.name) {
                return Err(invalid("column", c.name));
            }
            if matches!(c.name, "id" | CREATED_AT_COLUMN | LOCATION_ID_COLUMN) {
                return Err(ExplorerError::ConstraintViolation(format!(
                    "{} schema: '{}' is a reserved column",
                    self.kind, c.name
                )));
            }
            if !seen.insert(c.name) {
                return Err(ExplorerError::ConstraintViolation(format!(
                    "{} schema: duplicate column '{}'",
                    self.kind, c.name
                )));
            }
        }

        if self.kind.is_location() != self.keyed_by_field() {
            return Err(ExplorerError::ConstraintViolation(format!(
                "{} schema: key column '{}' does not match the kind's addressing",
                self.kind, self.key_column
            )));
        }

        Ok(())
    }
}

/// Validates every layout and checks there is exactly one per kind.
pub fn validate_schemas() -> Result<()> {
    for (schema, kind) in SCHEMAS.iter().zip(ResourceKind::ALL) {
        if schema.kind != kind {
            return Err(ExplorerError::ConstraintViolation(format!(
                "schema table out of order: found {} where {} was expected",
                schema.kind, kind
            )));
        }
        schema.validate()?;
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_lowercase() || c == '_')
        && !name.starts_with('_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_valid() {
        validate_schemas().unwrap();
    }

    #[test]
    fn test_schema_for_every_kind() {
        for kind in ResourceKind::ALL {
            assert_eq!(schema_for(kind).kind, kind);
        }
    }

    #[test]
    fn test_location_select_has_no_location_id() {
        let cols = schema_for(ResourceKind::Location).select_columns();
        assert_eq!(
            cols,
            vec!["id", "search_query", "formatted_query", "latitude", "longitude", "created_at"]
        );
    }

    #[test]
    fn test_weather_statements() {
        let schema = schema_for(ResourceKind::Weather);
        assert_eq!(
            schema.select_sql(),
            "SELECT id, forecast, time, location_id, created_at FROM weathers WHERE location_id = ?1 ORDER BY id"
        );
        assert_eq!(
            schema.insert_sql(),
            "INSERT INTO weathers (forecast, time, location_id, created_at) VALUES (?1, ?2, ?3, ?4)"
        );
        assert_eq!(schema.delete_sql(), "DELETE FROM weathers WHERE location_id = ?1");
    }

    #[test]
    fn test_ddl_creates_key_index() {
        let ddl = schema_for(ResourceKind::Trail).ddl();
        assert!(ddl[0].starts_with("CREATE TABLE IF NOT EXISTS trails"));
        assert!(ddl[0].contains("location_id TEXT NOT NULL"));
        assert!(ddl[0].contains("summary TEXT,"));
        assert_eq!(
            ddl[1],
            "CREATE INDEX IF NOT EXISTS idx_trails_location_id ON trails(location_id)"
        );
    }

    #[test]
    fn test_validate_rejects_bad_identifier() {
        let schema = TableSchema {
            kind: ResourceKind::Weather,
            table: "weathers; DROP TABLE locations",
            key_column: LOCATION_ID_COLUMN,
            columns: &[],
        };
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_and_reserved() {
        const DUP: &[Column] = &[col("name", ColumnType::Text), col("name", ColumnType::Text)];
        let schema = TableSchema {
            kind: ResourceKind::Event,
            table: "events",
            key_column: LOCATION_ID_COLUMN,
            columns: DUP,
        };
        assert!(schema.validate().is_err());

        const RESERVED: &[Column] = &[col("created_at", ColumnType::Integer)];
        let schema = TableSchema { columns: RESERVED, ..schema };
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_addressing() {
        let schema = TableSchema {
            kind: ResourceKind::Location,
            table: "locations",
            key_column: LOCATION_ID_COLUMN,
            columns: &[],
        };
        assert!(schema.validate().is_err());
    }
}

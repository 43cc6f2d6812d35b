use crate::error::{SchemaGenError, SchemaGenResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Catalog of schema sources available for export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaCatalog {
    /// Registered schema sources
    pub sources: Vec<SchemaSource>,
}

/// A named group of entity definitions that is exported as one schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSource {
    /// Dot-separated namespace identifying this source (e.g. "org.transitap.core")
    pub namespace: String,
    /// Entity definitions belonging to this source
    pub entities: Vec<EntityDef>,
    /// Named sequences used by this source's entities
    #[serde(default)]
    pub sequences: Vec<SequenceDef>,
}

/// Definition of one entity backed by a database table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    /// Table name
    pub table: String,
    /// Column definitions, in declaration order
    pub columns: Vec<ColumnDef>,
    /// Column names that make up the primary key
    #[serde(default)]
    pub primary_key: Vec<String>,
    /// Foreign key definitions
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDef>,
    /// Unique constraint definitions
    #[serde(default)]
    pub unique_constraints: Vec<UniqueConstraintDef>,
}

/// Definition of one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Portable column type, mapped per dialect at generation time
    pub column_type: ColumnType,
    /// Whether the column allows NULL values
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Default value as a SQL literal
    #[serde(default)]
    pub default_value: Option<String>,
}

fn default_nullable() -> bool {
    true
}

/// Portable column types supported by the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Variable character with optional length
    Varchar(Option<u32>),
    /// Unlimited text
    Text,
    /// Integer (32-bit)
    Integer,
    /// Big integer (64-bit)
    BigInt,
    /// Double-precision floating point
    Double,
    /// Numeric with optional precision and scale
    Numeric(Option<u32>, Option<u32>),
    /// Boolean
    Boolean,
    /// Timestamp
    Timestamp,
    /// Calendar date
    Date,
    /// Binary large object
    Blob,
}

/// Parameter-free discriminant of a portable column type.
///
/// Override tables key on the kind, so "every timestamp column" can be
/// remapped without enumerating lengths or precisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Varchar,
    Text,
    Integer,
    BigInt,
    Double,
    Numeric,
    Boolean,
    Timestamp,
    Date,
    Blob,
}

/// Foreign key relationship definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyDef {
    /// Foreign key constraint name
    pub name: String,
    /// Local column name
    pub column: String,
    /// Referenced table name
    pub referenced_table: String,
}

/// Unique constraint definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueConstraintDef {
    /// Constraint name
    pub name: String,
    /// Columns covered by the constraint
    pub columns: Vec<String>,
}

/// Named sequence definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceDef {
    /// Sequence name
    pub name: String,
}

impl SchemaCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Load a catalog from a JSON file.
    ///
    /// A missing or unparseable catalog is a configuration error: nothing
    /// can be exported without one.
    pub fn load(path: &Path) -> SchemaGenResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            SchemaGenError::configuration(format!(
                "could not read catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            SchemaGenError::configuration(format!(
                "could not parse catalog {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Add a schema source to the catalog
    pub fn add_source(&mut self, source: SchemaSource) {
        self.sources.push(source);
    }

    /// Resolve a namespace to its schema source
    pub fn resolve(&self, namespace: &str) -> SchemaGenResult<&SchemaSource> {
        self.sources
            .iter()
            .find(|s| s.namespace == namespace)
            .ok_or_else(|| {
                SchemaGenError::configuration(format!(
                    "no schema source registered for namespace {}",
                    namespace
                ))
            })
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaSource {
    /// Create a new schema source
    pub fn new(namespace: String) -> Self {
        Self {
            namespace,
            entities: Vec::new(),
            sequences: Vec::new(),
        }
    }

    /// Add an entity definition
    pub fn add_entity(&mut self, entity: EntityDef) {
        self.entities.push(entity);
    }

    /// Add a sequence definition
    pub fn add_sequence(&mut self, sequence: SequenceDef) {
        self.sequences.push(sequence);
    }
}

impl EntityDef {
    /// Create a new entity definition
    pub fn new(table: String) -> Self {
        Self {
            table,
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            unique_constraints: Vec::new(),
        }
    }

    /// Add a column to the entity
    pub fn add_column(&mut self, column: ColumnDef) {
        self.columns.push(column);
    }

    /// Set the primary key columns
    pub fn set_primary_key(&mut self, columns: Vec<String>) {
        self.primary_key = columns;
    }

    /// Add a foreign key relationship
    pub fn add_foreign_key(&mut self, foreign_key: ForeignKeyDef) {
        self.foreign_keys.push(foreign_key);
    }

    /// Add a unique constraint
    pub fn add_unique_constraint(&mut self, constraint: UniqueConstraintDef) {
        self.unique_constraints.push(constraint);
    }
}

impl ColumnDef {
    /// Create a new column definition
    pub fn new(name: String, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            nullable: true,
            default_value: None,
        }
    }

    /// Set the column as not nullable
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Set a default value for the column
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

impl ColumnType {
    /// Parameter-free kind of this type
    pub fn kind(&self) -> TypeKind {
        match self {
            ColumnType::Varchar(_) => TypeKind::Varchar,
            ColumnType::Text => TypeKind::Text,
            ColumnType::Integer => TypeKind::Integer,
            ColumnType::BigInt => TypeKind::BigInt,
            ColumnType::Double => TypeKind::Double,
            ColumnType::Numeric(_, _) => TypeKind::Numeric,
            ColumnType::Boolean => TypeKind::Boolean,
            ColumnType::Timestamp => TypeKind::Timestamp,
            ColumnType::Date => TypeKind::Date,
            ColumnType::Blob => TypeKind::Blob,
        }
    }
}

//! Renders the raw schema-creation script for one dialect.
//!
//! Output follows the exporter convention consumed by the cleanup filter:
//! every statement block's lines are followed by exactly one blank line,
//! keywords are lowercase, and drop artifacts come before the creation
//! statements they would tear down.

use crate::types::{ColumnDef, EntityDef, SchemaSource, SequenceDef};
use chrono::Utc;

use super::dialect::{Dialect, GenerationContext};

/// Renders raw DDL scripts from a schema source
pub struct DdlRenderer {
    /// Context this renderer generates for; one renderer per dialect run
    context: GenerationContext,
}

impl DdlRenderer {
    /// Create a renderer for one generation context
    pub fn new(context: GenerationContext) -> Self {
        Self { context }
    }

    /// Render the complete raw script for a schema source.
    ///
    /// Statement order: drop-constraint blocks, drop-table statements,
    /// drop-sequence statements, create-table blocks, create-sequence
    /// statements, alter-add unique and foreign key blocks.
    pub fn render(&self, source: &SchemaSource) -> String {
        let dialect = self.context.dialect();
        let mut blocks: Vec<Vec<String>> = Vec::new();

        blocks.push(self.header_block(source));

        for entity in &source.entities {
            for fk in &entity.foreign_keys {
                blocks.push(self.drop_constraint_block(&entity.table, &fk.name));
            }
        }

        for entity in &source.entities {
            blocks.push(vec![self.drop_table_statement(&entity.table)]);
        }

        if dialect.supports_sequences() {
            for sequence in &source.sequences {
                blocks.push(vec![format!("drop sequence {};", sequence.name)]);
            }
        }

        for entity in &source.entities {
            blocks.push(self.create_table_block(entity));
        }

        if dialect.supports_sequences() {
            for sequence in &source.sequences {
                blocks.push(vec![self.create_sequence_statement(sequence)]);
            }
        }

        for entity in &source.entities {
            for unique in &entity.unique_constraints {
                blocks.push(vec![
                    format!("alter table {} ", entity.table),
                    format!(
                        "    add constraint {} unique ({});",
                        unique.name,
                        unique.columns.join(", ")
                    ),
                ]);
            }
        }

        for entity in &source.entities {
            for fk in &entity.foreign_keys {
                blocks.push(vec![
                    format!("alter table {} ", entity.table),
                    format!("    add constraint {} ", fk.name),
                    format!("    foreign key ({}) ", fk.column),
                    format!("    references {};", fk.referenced_table),
                ]);
            }
        }

        let mut script = String::new();
        for block in blocks {
            for line in block {
                script.push_str(&line);
                script.push('\n');
            }
            script.push('\n');
        }
        script
    }

    fn header_block(&self, source: &SchemaSource) -> Vec<String> {
        vec![
            format!(
                "-- schema creation script for {} ({})",
                source.namespace,
                self.context.dialect().name()
            ),
            format!(
                "-- generated on {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ),
        ]
    }

    fn drop_constraint_block(&self, table: &str, constraint: &str) -> Vec<String> {
        let drop_clause = match self.context.dialect() {
            Dialect::Mysql => format!("    drop foreign key {};", constraint),
            _ => format!("    drop constraint {};", constraint),
        };
        vec![format!("alter table {} ", table), drop_clause]
    }

    fn drop_table_statement(&self, table: &str) -> String {
        match self.context.dialect() {
            Dialect::Postgres => format!("drop table {} cascade;", table),
            Dialect::Oracle => format!("drop table {} cascade constraints;", table),
            Dialect::Mysql => format!("drop table if exists {};", table),
            Dialect::Hsql => format!("drop table {} if exists;", table),
        }
    }

    fn create_table_block(&self, entity: &EntityDef) -> Vec<String> {
        let mut body: Vec<String> = entity
            .columns
            .iter()
            .map(|column| format!("    {}", self.column_sql(column)))
            .collect();
        if !entity.primary_key.is_empty() {
            body.push(format!("    primary key ({})", entity.primary_key.join(", ")));
        }

        let last = body.len().saturating_sub(1);
        for (i, line) in body.iter_mut().enumerate() {
            if i != last {
                line.push(',');
            }
        }

        let mut block = vec![format!("create table {} (", entity.table)];
        block.extend(body);
        block.push(match self.context.dialect() {
            Dialect::Mysql => ") engine=InnoDB;".to_string(),
            _ => ");".to_string(),
        });
        block
    }

    fn column_sql(&self, column: &ColumnDef) -> String {
        let mut sql = format!("{} {}", column.name, self.context.sql_type(&column.column_type));
        if let Some(default) = &column.default_value {
            sql.push_str(&format!(" default {}", default));
        }
        if !column.nullable {
            sql.push_str(" not null");
        }
        sql
    }

    fn create_sequence_statement(&self, sequence: &SequenceDef) -> String {
        format!(
            "create sequence {} start with 1 increment by 1;",
            sequence.name
        )
    }
}

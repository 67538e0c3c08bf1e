//! Built-in Tables
//!
//! Every document contains these system tables, regardless of user content.
//! They hold document-wide info and the metadata about user tables, columns,
//! views, sections, ACL rules and attachments.
//!
//! Order matters: tables and columns keep stable ordinal positions that the
//! storage layout depends on. Append new entries; never reorder, remove or
//! reuse an existing one. Deprecated columns stay in place. Changing this
//! catalog requires bumping [`SCHEMA_VERSION`](crate::SCHEMA_VERSION) and a
//! migration.

use crate::actions::{AddTable, ColumnDecl, SchemaAction};

/// Metadata table listing user tables.
pub const TABLES_META: &str = "_grist_Tables";

/// Metadata table listing the columns of all user tables.
pub const COLUMNS_META: &str = "_grist_Tables_column";

/// A column declaration in the built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinColumn {
    pub id: &'static str,
    pub col_type: &'static str,
    pub is_formula: bool,
    pub formula: &'static str,
}

impl BuiltinColumn {
    /// A data column with an empty formula.
    pub const fn new(id: &'static str, col_type: &'static str) -> Self {
        Self {
            id,
            col_type,
            is_formula: false,
            formula: "",
        }
    }

    /// Keep it a data column, with `formula` computing the default for new rows.
    pub const fn default_formula(self, formula: &'static str) -> Self {
        Self { formula, ..self }
    }

    /// Make it a formula column.
    pub const fn formula(self, formula: &'static str) -> Self {
        Self {
            formula,
            is_formula: true,
            ..self
        }
    }
}

/// A built-in table: its id and ordered columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinTable {
    pub table_id: &'static str,
    pub columns: &'static [BuiltinColumn],
}

impl BuiltinTable {
    pub fn column(&self, col_id: &str) -> Option<&BuiltinColumn> {
        self.columns.iter().find(|c| c.id == col_id)
    }

    pub fn to_action(&self) -> AddTable {
        AddTable {
            table_id: self.table_id.to_string(),
            columns: self.columns.iter().map(ColumnDecl::from).collect(),
        }
    }
}

const fn col(id: &'static str, col_type: &'static str) -> BuiltinColumn {
    BuiltinColumn::new(id, col_type)
}

/// The full catalog, in declaration order.
pub static BUILTIN_TABLES: &[BuiltinTable] = &[
    // Document-wide metadata, a single record with id=1.
    BuiltinTable {
        table_id: "_grist_DocInfo",
        columns: &[
            col("docId", "Text"), // deprecated, kept for layout
            col("peers", "Text"), // deprecated, superseded by _grist_ACLPrincipals
            col("basketId", "Text"),
            col("schemaVersion", "Int"),
            col("timezone", "Text"),
        ],
    },
    // User tables only; built-in tables are never listed here.
    BuiltinTable {
        table_id: TABLES_META,
        columns: &[
            col("tableId", "Text"),
            col("primaryViewId", "Ref:_grist_Views"),
            col("summarySourceTable", "Ref:_grist_Tables"),
            col("onDemand", "Bool"),
        ],
    },
    BuiltinTable {
        table_id: COLUMNS_META,
        columns: &[
            col("parentId", "Ref:_grist_Tables"),
            col("parentPos", "PositionNumber"),
            col("colId", "Text"),
            col("type", "Text"),
            col("widgetOptions", "Text"),
            col("isFormula", "Bool"),
            col("formula", "Text"),
            col("label", "Text"),
            col("untieColIdFromLabel", "Bool"),
            col("summarySourceCol", "Ref:_grist_Tables_column"),
            col("displayCol", "Ref:_grist_Tables_column"),
            col("visibleCol", "Ref:_grist_Tables_column"),
        ],
    },
    // Deprecated import options.
    BuiltinTable {
        table_id: "_grist_Imports",
        columns: &[
            col("tableRef", "Ref:_grist_Tables"),
            col("origFileName", "Text"),
            col("parseFormula", "Text").formula("grist.parseImport(rec, table._engine)"),
            col("delimiter", "Text").default_formula("','"),
            col("doublequote", "Bool").default_formula("True"),
            col("escapechar", "Text"),
            col("quotechar", "Text").default_formula("'\"'"),
            col("skipinitialspace", "Bool"),
            col("encoding", "Text").default_formula("'utf8'"),
            col("hasHeaders", "Bool"),
        ],
    },
    // Deprecated external database credentials.
    BuiltinTable {
        table_id: "_grist_External_database",
        columns: &[
            col("host", "Text"),
            col("port", "Int"),
            col("username", "Text"),
            col("dialect", "Text"),
            col("database", "Text"),
            col("storage", "Text"),
        ],
    },
    // Deprecated.
    BuiltinTable {
        table_id: "_grist_External_table",
        columns: &[
            col("tableRef", "Ref:_grist_Tables"),
            col("databaseRef", "Ref:_grist_External_database"),
            col("tableName", "Text"),
        ],
    },
    BuiltinTable {
        table_id: "_grist_TableViews",
        columns: &[
            col("tableRef", "Ref:_grist_Tables"),
            col("viewRef", "Ref:_grist_Views"),
        ],
    },
    // Deprecated.
    BuiltinTable {
        table_id: "_grist_TabItems",
        columns: &[
            col("tableRef", "Ref:_grist_Tables"),
            col("viewRef", "Ref:_grist_Views"),
        ],
    },
    BuiltinTable {
        table_id: "_grist_TabBar",
        columns: &[
            col("viewRef", "Ref:_grist_Views"),
            col("tabPos", "PositionNumber"),
        ],
    },
    // Page tree: nesting is implied by the change in indentation between
    // consecutive pages in pagePos order.
    BuiltinTable {
        table_id: "_grist_Pages",
        columns: &[
            col("viewRef", "Ref:_grist_Views"),
            col("indentation", "Int"),
            col("pagePos", "PositionNumber"),
        ],
    },
    BuiltinTable {
        table_id: "_grist_Views",
        columns: &[
            col("name", "Text"),
            col("type", "Text"),
            col("layoutSpec", "Text"),
        ],
    },
    // One row per view section; each section type uses a subset of the columns.
    BuiltinTable {
        table_id: "_grist_Views_section",
        columns: &[
            col("tableRef", "Ref:_grist_Tables"),
            col("parentId", "Ref:_grist_Views"),
            col("parentKey", "Text"), // section type: list, detail, single, ...
            col("title", "Text"),
            col("defaultWidth", "Int").default_formula("100"),
            col("borderWidth", "Int").default_formula("1"),
            col("theme", "Text"),
            col("options", "Text"),
            col("chartType", "Text"),
            col("layoutSpec", "Text"),
            col("filterSpec", "Text"), // deprecated since version 15
            col("sortColRefs", "Text"),
            col("linkSrcSectionRef", "Ref:_grist_Views_section"),
            col("linkSrcColRef", "Ref:_grist_Tables_column"),
            col("linkTargetColRef", "Ref:_grist_Tables_column"),
            col("embedId", "Text"), // deprecated since version 12
        ],
    },
    BuiltinTable {
        table_id: "_grist_Views_section_field",
        columns: &[
            col("parentId", "Ref:_grist_Views_section"),
            col("parentPos", "PositionNumber"),
            col("colRef", "Ref:_grist_Tables_column"),
            col("width", "Int"),
            col("widgetOptions", "Text"),
            col("displayCol", "Ref:_grist_Tables_column"),
            col("visibleCol", "Ref:_grist_Tables_column"),
            col("filter", "Text"), // JSON: {"included": [...]} or {"excluded": [...]}
        ],
    },
    BuiltinTable {
        table_id: "_grist_Validations",
        columns: &[
            col("formula", "Text"),
            col("name", "Text"),
            col("tableRef", "Int"),
        ],
    },
    BuiltinTable {
        table_id: "_grist_REPL_Hist",
        columns: &[
            col("code", "Text"),
            col("outputText", "Text"),
            col("errorText", "Text"),
        ],
    },
    BuiltinTable {
        table_id: "_grist_Attachments",
        columns: &[
            col("fileIdent", "Text"), // checksum of the contents
            col("fileName", "Text"),
            col("fileType", "Text"), // MIME type
            col("fileSize", "Int"),
            col("imageHeight", "Int"),
            col("imageWidth", "Int"),
            col("timeUploaded", "DateTime"),
        ],
    },
    BuiltinTable {
        table_id: "_grist_ACLRules",
        columns: &[
            col("resource", "Ref:_grist_ACLResources"),
            col("permissions", "Int"), // bitmap
            col("principals", "Text"), // JSON array of _grist_ACLPrincipals refs
            col("aclFormula", "Text"),
            col("aclColumn", "Ref:_grist_Tables_column"),
        ],
    },
    BuiltinTable {
        table_id: "_grist_ACLResources",
        columns: &[
            col("tableId", "Text"),
            col("colIds", "Text"), // comma-separated, or empty
        ],
    },
    BuiltinTable {
        table_id: "_grist_ACLPrincipals",
        columns: &[
            col("type", "Text"), // user, group or instance
            col("userEmail", "Text"),
            col("userName", "Text"),
            col("groupName", "Text"),
            col("instanceId", "Text"),
        ],
    },
    BuiltinTable {
        table_id: "_grist_ACLMemberships",
        columns: &[
            col("parent", "Ref:_grist_ACLPrincipals"),
            col("child", "Ref:_grist_ACLPrincipals"),
        ],
    },
];

/// The catalog as `AddTable` actions, in declaration order.
pub fn schema_create_actions() -> Vec<SchemaAction> {
    BUILTIN_TABLES
        .iter()
        .map(|t| SchemaAction::AddTable(t.to_action()))
        .collect()
}

pub fn builtin_table(table_id: &str) -> Option<&'static BuiltinTable> {
    BUILTIN_TABLES.iter().find(|t| t.table_id == table_id)
}

pub fn is_builtin_table(table_id: &str) -> bool {
    builtin_table(table_id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_order_is_stable() {
        let ids: Vec<&str> = BUILTIN_TABLES.iter().map(|t| t.table_id).collect();
        assert_eq!(
            ids,
            vec![
                "_grist_DocInfo",
                "_grist_Tables",
                "_grist_Tables_column",
                "_grist_Imports",
                "_grist_External_database",
                "_grist_External_table",
                "_grist_TableViews",
                "_grist_TabItems",
                "_grist_TabBar",
                "_grist_Pages",
                "_grist_Views",
                "_grist_Views_section",
                "_grist_Views_section_field",
                "_grist_Validations",
                "_grist_REPL_Hist",
                "_grist_Attachments",
                "_grist_ACLRules",
                "_grist_ACLResources",
                "_grist_ACLPrincipals",
                "_grist_ACLMemberships",
            ]
        );
    }

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for table in BUILTIN_TABLES {
            assert!(seen.insert(table.table_id), "duplicate table {}", table.table_id);
            let mut cols = HashSet::new();
            for c in table.columns {
                assert!(cols.insert(c.id), "duplicate column {}.{}", table.table_id, c.id);
            }
        }
    }

    #[test]
    fn test_metadata_tables_describe_their_rows() {
        let tables = builtin_table(TABLES_META).unwrap();
        assert_eq!(tables.columns[0].id, "tableId");

        let columns = builtin_table(COLUMNS_META).unwrap();
        let ids: Vec<&str> = columns.columns.iter().map(|c| c.id).collect();
        assert_eq!(
            &ids[..7],
            &["parentId", "parentPos", "colId", "type", "widgetOptions", "isFormula", "formula"]
        );
        assert_eq!(columns.column("parentId").unwrap().col_type, "Ref:_grist_Tables");
    }

    #[test]
    fn test_formula_and_default_columns() {
        let imports = builtin_table("_grist_Imports").unwrap();

        let parse = imports.column("parseFormula").unwrap();
        assert!(parse.is_formula);
        assert_eq!(parse.formula, "grist.parseImport(rec, table._engine)");

        let quote = imports.column("quotechar").unwrap();
        assert!(!quote.is_formula);
        assert_eq!(quote.formula, "'\"'");

        let origin = imports.column("origFileName").unwrap();
        assert_eq!((origin.is_formula, origin.formula), (false, ""));

        let section = builtin_table("_grist_Views_section").unwrap();
        assert_eq!(section.column("defaultWidth").unwrap().formula, "100");
    }

    #[test]
    fn test_create_actions_match_catalog() {
        let actions = schema_create_actions();
        assert_eq!(actions.len(), BUILTIN_TABLES.len());
        assert_eq!(actions, schema_create_actions());

        let SchemaAction::AddTable(first) = &actions[0];
        assert_eq!(first.table_id, "_grist_DocInfo");
        assert_eq!(first.columns.len(), 5);
        assert_eq!(first.columns[3].id, "schemaVersion");
        assert_eq!(first.columns[3].col_type, "Int");
    }

    #[test]
    fn test_is_builtin_table() {
        assert!(is_builtin_table("_grist_Pages"));
        assert!(!is_builtin_table("Orders"));
        assert!(!is_builtin_table("_grist_Action"));
    }
}

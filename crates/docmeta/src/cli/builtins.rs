//! Builtins command - show the built-in table catalog

use anyhow::Result;
use clap::Args;
use docmeta_schema::{builtin_table, schema_create_actions, SchemaTable, BUILTIN_TABLES};

use crate::cli::output::describe_formula;
use crate::cli::{print_table, HelpfulError};

/// Arguments for the `builtins` command
#[derive(Debug, Args)]
pub struct BuiltinsArgs {
    /// Show the columns of one built-in table (e.g. _grist_Tables_column)
    #[arg(long)]
    pub table: Option<String>,

    /// Print the AddTable actions that create the whole catalog (JSON)
    #[arg(long, conflicts_with = "table")]
    pub actions: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: BuiltinsArgs) -> Result<()> {
    if args.actions {
        println!("{}", serde_json::to_string_pretty(&schema_create_actions())?);
        return Ok(());
    }

    if let Some(table_id) = &args.table {
        let builtin =
            builtin_table(table_id).ok_or_else(|| HelpfulError::unknown_builtin_table(table_id))?;
        let table = SchemaTable::from(&builtin.to_action());

        if args.json {
            println!("{}", serde_json::to_string_pretty(&table)?);
            return Ok(());
        }

        println!("Table: {}", table.table_id);
        let rows: Vec<Vec<String>> = table
            .columns
            .values()
            .enumerate()
            .map(|(pos, col)| {
                vec![
                    pos.to_string(),
                    col.col_id.clone(),
                    col.col_type.clone(),
                    describe_formula(col.is_formula, &col.formula),
                ]
            })
            .collect();
        print_table(&["#", "column", "type", "formula"], rows);
        return Ok(());
    }

    if args.json {
        let listing: Vec<serde_json::Value> = BUILTIN_TABLES
            .iter()
            .map(|t| serde_json::json!({ "tableId": t.table_id, "columns": t.columns.len() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = BUILTIN_TABLES
        .iter()
        .map(|t| vec![t.table_id.to_string(), t.columns.len().to_string()])
        .collect();
    print_table(&["table", "columns"], rows);
    println!("{} built-in tables", BUILTIN_TABLES.len());
    Ok(())
}

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tabula_lib::engine::{FilterClause, SortKey};

use crate::input::ColumnSpec;

/// Command-line arguments for tabula
#[derive(Parser, Debug)]
#[command(version, about = "Sort, filter, page and summarize JSON rows")]
pub struct Args {
    /// Config file (JSON). Defaults to config.json in the platform config directory
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long = "debug", action, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter, sort and page rows, printing one page as JSON
    Query(QueryArgs),
    /// Print column statistics
    Stats(StatsArgs),
    /// Print group sizes for a column
    Group(GroupArgs),
    /// Inspect or change a persisted column layout
    Layout(LayoutArgs),
}

/// Rows and column definitions shared by the row commands
#[derive(ClapArgs, Debug)]
pub struct RowsArgs {
    /// JSON file holding an array of objects
    #[arg(long = "input", short = 'i')]
    pub input: PathBuf,

    /// Column as `id[:type]`; repeat for each column. Inferred from the rows when omitted
    #[arg(long = "column", short = 'c')]
    pub columns: Vec<ColumnSpec>,
}

#[derive(ClapArgs, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub rows: RowsArgs,

    /// Filter clause as `column:operator:value`, e.g. `amount:gte:100`
    #[arg(long = "filter", short = 'f')]
    pub filters: Vec<FilterClause>,

    /// Case-insensitive search across filterable columns
    #[arg(long = "search", short = 's')]
    pub search: Option<String>,

    /// Sort key as `column[:asc|desc]`; earlier keys take priority
    #[arg(long = "sort")]
    pub sort: Vec<SortKey>,

    /// Page number, starting at 1
    #[arg(long = "page", default_value_t = 1)]
    pub page: usize,

    /// Rows per page (default: from config)
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,
}

#[derive(ClapArgs, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub rows: RowsArgs,

    /// Compute statistics per group of this column
    #[arg(long = "by")]
    pub by: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct GroupArgs {
    #[command(flatten)]
    pub rows: RowsArgs,

    /// Column to group by
    #[arg(long = "by")]
    pub by: String,
}

#[derive(ClapArgs, Debug)]
pub struct LayoutArgs {
    /// Storage key of the grid
    #[arg(long = "key", short = 'k')]
    pub key: String,

    /// Current column ids in default order, comma separated
    #[arg(long = "columns", value_delimiter = ',', required = true)]
    pub columns: Vec<String>,

    /// Layout database (default: layouts.db in the platform data directory)
    #[arg(long = "db")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub action: LayoutAction,
}

#[derive(Subcommand, Debug)]
pub enum LayoutAction {
    /// Print the stored layout with resolved widths
    Show,
    /// Change a column's width by a delta in pixels
    Resize {
        column: String,
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
    /// Move a column onto another column's position
    Reorder { column: String, target: String },
    /// Move a column to an index
    Move { column: String, index: usize },
    /// Restore the default layout and delete the stored record
    Reset,
}

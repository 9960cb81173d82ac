//! Subcommand implementations
//!
//! Every command writes one pretty-printed JSON document to `out`.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tabula_lib::GridConfig;
use tabula_lib::engine::{DataView, Page, column_stats, group, group_stats};
use tabula_lib::layout::LayoutManager;
use tabula_lib::model::{ColumnDef, Record, duplicate_column_ids, find_column};
use tabula_lib::store::SqliteStore;

use crate::cli::{Command, GroupArgs, LayoutAction, LayoutArgs, QueryArgs, RowsArgs, StatsArgs};
use crate::error::CliError;
use crate::input;
use crate::paths;

pub async fn run(command: Command, config: &GridConfig, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Command::Query(args) => query(args, config, out),
        Command::Stats(args) => stats(args, out),
        Command::Group(args) => group_sizes(args, out),
        Command::Layout(args) => layout(args, config, out).await,
    }
}

fn emit(out: &mut impl Write, value: &impl Serialize) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", text)?;
    Ok(())
}

fn load(args: &RowsArgs) -> Result<(Vec<Record>, Vec<ColumnDef<Record>>), CliError> {
    let rows = input::load_rows(&args.input)?;
    let columns = input::columns(&args.columns, &rows);
    duplicate_column_ids(&columns);
    Ok((rows, columns))
}

// =============================================================================
// Row commands
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryOutput<'a> {
    filtered_count: usize,
    #[serde(flatten)]
    page: Page<&'a Record>,
}

fn query(args: QueryArgs, config: &GridConfig, out: &mut impl Write) -> Result<(), CliError> {
    let (rows, columns) = load(&args.rows)?;
    let page_size = args.page_size.unwrap_or(config.page_size);

    let mut view = DataView::with_config(&columns, config)
        .filters(args.filters)
        .sort(args.sort)
        .page(args.page, page_size);
    if let Some(search) = args.search {
        view = view.search(search);
    }

    let result = view.apply(&rows);
    log::info!(
        "query matched {} of {} rows, page {}/{}",
        result.filtered_count,
        rows.len(),
        result.page.page(),
        result.page.total_pages()
    );

    emit(
        out,
        &QueryOutput {
            filtered_count: result.filtered_count,
            page: result.page,
        },
    )
}

fn stats(args: StatsArgs, out: &mut impl Write) -> Result<(), CliError> {
    let (rows, columns) = load(&args.rows)?;
    let mut result = serde_json::Map::new();

    let Some(by) = args.by else {
        for column in &columns {
            result.insert(column.id.clone(), serde_json::to_value(column_stats(&rows, column))?);
        }
        return emit(out, &result);
    };

    if find_column(&columns, &by).is_none() {
        return Err(CliError::UnknownColumn(by));
    }
    let groups = group(&rows, &by, &columns);
    for column in columns.iter().filter(|c| c.id != by) {
        let mut per_group = serde_json::Map::new();
        for (key, stats) in group_stats(&groups, column) {
            per_group.insert(key, serde_json::to_value(stats)?);
        }
        result.insert(column.id.clone(), per_group.into());
    }
    emit(out, &result)
}

#[derive(Serialize)]
struct GroupSize {
    key: String,
    count: usize,
}

fn group_sizes(args: GroupArgs, out: &mut impl Write) -> Result<(), CliError> {
    let (rows, columns) = load(&args.rows)?;
    let sizes: Vec<GroupSize> = group(&rows, &args.by, &columns)
        .iter()
        .map(|g| GroupSize {
            key: g.key.clone(),
            count: g.len(),
        })
        .collect();
    emit(out, &sizes)
}

// =============================================================================
// Layout command
// =============================================================================

#[derive(Serialize)]
struct ColumnOutput<'a> {
    id: &'a str,
    width: u32,
}

async fn layout(args: LayoutArgs, config: &GridConfig, out: &mut impl Write) -> Result<(), CliError> {
    let db = match args.db {
        Some(path) => path,
        None => default_db()?,
    };
    let store = Arc::new(SqliteStore::open(&db).await?);

    let mut manager = LayoutManager::new(args.key, args.columns, store).with_config(config);
    manager.load().await;

    match args.action {
        LayoutAction::Show => {}
        LayoutAction::Resize { column, delta } => {
            if manager.resize(&column, delta).await.is_none() {
                return Err(CliError::UnknownColumn(column));
            }
        }
        LayoutAction::Reorder { column, target } => {
            for id in [&column, &target] {
                if manager.layout().position(id).is_none() {
                    return Err(CliError::UnknownColumn(id.clone()));
                }
            }
            manager.reorder(&column, &target).await;
        }
        LayoutAction::Move { column, index } => {
            if manager.layout().position(&column).is_none() {
                return Err(CliError::UnknownColumn(column));
            }
            manager.move_to(&column, index).await;
        }
        LayoutAction::Reset => manager.reset().await,
    }

    let columns: Vec<ColumnOutput> = manager
        .order()
        .iter()
        .map(|id| ColumnOutput {
            id,
            width: manager.width(id),
        })
        .collect();
    emit(out, &columns)
}

fn default_db() -> Result<PathBuf, CliError> {
    let path = paths::layouts_db().ok_or(CliError::NoDataDir)?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| CliError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    Ok(path)
}

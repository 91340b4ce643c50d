//! Table contract and the request driver shared by every table.

use serde_json::Map;
use toaster_index::{Database, OrderBy, Page, Predicate, Queryset};
use tracing::debug;

use crate::column::Column;
use crate::context::{Extra, TableContext};
use crate::filter::{FilterActionInfo, FilterInfo, TableFilter};
use crate::request::{TableRequest, TableResponse};
use crate::{Error, Result};

pub const DEFAULT_EMPTY_STATE: &str = "Sorry - no data found";

/// A dashboard table: a base queryset, filters over it and the columns
/// rendering each row.
///
/// Setup runs queryset → filters → columns, so filters and renderers can
/// rely on what `setup_queryset` stored in [`Extra`].
pub trait ToasterTable {
    type Row;

    /// Registry name.
    fn name(&self) -> &'static str;

    fn title(&self, ctx: &TableContext) -> String;

    /// Column key, `-` prefixed for descending.
    fn default_orderby(&self) -> &'static str;

    fn empty_state(&self, _ctx: &TableContext) -> String {
        DEFAULT_EMPTY_STATE.to_string()
    }

    /// Queryset columns searched by free text.
    fn search_fields(&self) -> &'static [&'static str];

    fn setup_queryset(
        &self,
        db: &Database,
        ctx: &TableContext,
        extra: &mut Extra,
    ) -> Result<Queryset<Self::Row>>;

    fn setup_filters(&self, _ctx: &TableContext, _extra: &Extra) -> Vec<TableFilter> {
        Vec::new()
    }

    fn setup_columns(&self, ctx: &TableContext) -> Vec<Column<Self::Row>>;

    /// Load related data for the rows of the page being rendered.
    fn decorate(&self, _db: &Database, _rows: &mut [Self::Row]) -> Result<()> {
        Ok(())
    }
}

struct Prepared<R> {
    queryset: Queryset<R>,
    filters: Vec<TableFilter>,
    columns: Vec<Column<R>>,
    extra: Extra,
}

fn prepare<T: ToasterTable>(
    table: &T,
    db: &Database,
    ctx: &TableContext,
    search: &[&str],
) -> Result<Prepared<T::Row>> {
    let mut extra = Extra::for_context(ctx);
    let mut queryset = table.setup_queryset(db, ctx, &mut extra)?;
    let filters = table.setup_filters(ctx, &extra);
    let columns = table.setup_columns(ctx);

    for term in search {
        queryset = queryset.filter(Predicate::contains_any(table.search_fields(), term));
    }

    Ok(Prepared {
        queryset,
        filters,
        columns,
        extra,
    })
}

/// Resolve a sort key against the table's orderable columns.
///
/// The default key is always accepted; when no column claims it, it names a
/// queryset column directly.
fn resolve_order<R>(columns: &[Column<R>], key: &str, default: &str) -> Result<OrderBy> {
    let (descending, field) = match key.strip_prefix('-') {
        Some(field) => (true, field),
        None => (false, key),
    };

    let column = columns
        .iter()
        .find(|c| c.key() == field)
        .and_then(|c| c.order_column());

    let order_column = match column {
        Some(column) => column.to_string(),
        None if field == default.trim_start_matches('-') => field.to_string(),
        None => return Err(Error::InvalidOrder(key.to_string())),
    };

    Ok(OrderBy {
        column: order_column,
        descending,
    })
}

fn find_filter<'a>(filters: &'a [TableFilter], name: &str) -> Result<&'a TableFilter> {
    filters
        .iter()
        .find(|f| f.name() == name)
        .ok_or_else(|| Error::UnknownFilter(name.to_string()))
}

/// Run a table request and render one page.
pub fn get_data<T: ToasterTable>(
    table: &T,
    db: &Database,
    ctx: &TableContext,
    request: &TableRequest,
) -> Result<TableResponse> {
    let Prepared {
        mut queryset,
        filters,
        columns,
        extra,
    } = prepare(table, db, ctx, &request.search_terms())?;

    for selection in request.effective_filters() {
        let action = find_filter(&filters, &selection.filter)?.action(&selection.action)?;
        let value = selection
            .value
            .as_deref()
            .or(request.filter_value.as_deref());
        queryset = queryset.filter(action.predicate(value, ctx.today)?);
    }

    let default_orderby = table.default_orderby();
    let orderby = request.orderby.as_deref().unwrap_or(default_orderby);
    queryset = queryset.order_by(vec![resolve_order(&columns, orderby, default_orderby)?]);

    let page = Page::new(request.page, request.limit);
    let total = queryset.count(db.conn())?;
    let mut rows = queryset.fetch(db.conn(), Some(page))?;
    table.decorate(db, &mut rows)?;

    debug!(
        table = table.name(),
        total,
        page = page.number,
        rows = rows.len(),
        "table data"
    );

    let rendered = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| (c.key().to_string(), c.render(row, &extra)))
                .collect::<Map<_, _>>()
        })
        .collect();

    Ok(TableResponse {
        table: table.name().to_string(),
        title: table.title(ctx),
        empty_state: table.empty_state(ctx),
        default_orderby: default_orderby.to_string(),
        orderby: orderby.to_string(),
        columns: columns.iter().map(Column::descriptor).collect(),
        total,
        page: page.number,
        limit: page.limit,
        rows: rendered,
    })
}

/// Row counts for each action of one filter over the searched queryset.
pub fn filter_info<T: ToasterTable>(
    table: &T,
    db: &Database,
    ctx: &TableContext,
    filter_name: &str,
    search: Option<&str>,
) -> Result<FilterInfo> {
    let terms: Vec<&str> = search.map(|s| s.split_whitespace().collect()).unwrap_or_default();
    let prepared = prepare(table, db, ctx, &terms)?;
    let filter = find_filter(&prepared.filters, filter_name)?;

    let mut filter_actions = Vec::new();
    for action in filter.actions() {
        let count = if action.takes_value() {
            None
        } else {
            let predicate = action.predicate(None, ctx.today)?;
            Some(prepared.queryset.clone().filter(predicate).count(db.conn())?)
        };
        filter_actions.push(FilterActionInfo {
            action_name: action.name().to_string(),
            title: action.title().to_string(),
            action_type: action.action_type(),
            count,
        });
    }

    Ok(FilterInfo {
        name: filter.name().to_string(),
        title: filter.title().to_string(),
        filter_actions,
    })
}

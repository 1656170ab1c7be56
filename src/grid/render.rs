use super::columns::ColumnDescriptor;
use super::controller::PagedGrid;
use super::pagination::PageStrip;
use super::source::PageSource;
use super::state::BodyState;

/// Maximum column width before truncation
const MAX_COLUMN_WIDTH: usize = 40;

const SKELETON_WIDTH: usize = 8;

pub const NO_RESULTS: &str = "No results.";

/// Render the grid as a plain-text table with the page strip underneath
pub fn render_grid<R, S>(grid: &PagedGrid<R, S>) -> String
where
    R: Send,
    S: PageSource<R>,
{
    let columns: Vec<&ColumnDescriptor<R>> = grid.visible_columns().collect();
    let action_labels = grid.actions().iter().map(|a| a.label).collect::<Vec<_>>();

    let mut header: Vec<String> = columns.iter().map(|c| c.label.to_string()).collect();
    if !action_labels.is_empty() {
        header.push("Actions".to_string());
    }

    let rows: Vec<Vec<String>> = match grid.body() {
        BodyState::Rows(items) => items
            .iter()
            .map(|item| {
                let mut cells: Vec<String> = columns.iter().map(|c| truncate(&c.cell(item), MAX_COLUMN_WIDTH)).collect();
                if !action_labels.is_empty() {
                    let enabled = grid
                        .actions()
                        .iter()
                        .filter(|a| a.is_enabled(item))
                        .map(|a| a.label)
                        .collect::<Vec<_>>()
                        .join(" | ");
                    cells.push(enabled);
                }
                cells
            })
            .collect(),
        BodyState::Loading => vec![vec!["░".repeat(SKELETON_WIDTH); header.len()]],
        BodyState::Empty => Vec::new(),
    };

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format_row(&header, &widths));
    out.push('\n');
    out.push_str(&separator(&widths));
    out.push('\n');

    if matches!(grid.body(), BodyState::Empty) {
        // the empty-state row spans every column
        let total: usize = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
        out.push_str(&center(NO_RESULTS, total.max(NO_RESULTS.len())));
        out.push('\n');
    } else {
        for row in &rows {
            out.push_str(&format_row(row, &widths));
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&render_strip(&grid.strip()));
    out.push('\n');
    out.push_str(&status_line(grid));
    out
}

/// `Previous  … 4 [5] 6 …  Next`; disabled ends are parenthesised
pub fn render_strip(strip: &PageStrip) -> String {
    let mut parts = Vec::new();
    parts.push(if strip.can_previous { "Previous".to_string() } else { "(Previous)".to_string() });
    if strip.leading_ellipsis {
        parts.push("…".to_string());
    }
    for page in &strip.pages {
        if *page == strip.current {
            parts.push(format!("[{}]", page + 1));
        } else {
            parts.push((page + 1).to_string());
        }
    }
    if strip.trailing_ellipsis {
        parts.push("…".to_string());
    }
    parts.push(if strip.can_next { "Next".to_string() } else { "(Next)".to_string() });
    parts.join(" ")
}

fn status_line<R, S>(grid: &PagedGrid<R, S>) -> String
where
    R: Send,
    S: PageSource<R>,
{
    let state = grid.state();
    let mut line = if state.total_pages() == 0 {
        format!("No pages · {} per page", state.page_size())
    } else {
        format!(
            "Page {} of {} · {} per page",
            state.page_index() + 1,
            state.total_pages(),
            state.page_size()
        )
    };
    if !state.filter_text().is_empty() {
        line.push_str(&format!(" · filter: '{}'", state.filter_text()));
    }
    line
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" │ ")
        .trim_end()
        .to_string()
}

fn separator(widths: &[usize]) -> String {
    widths.iter().map(|w| "─".repeat(*w)).collect::<Vec<_>>().join("─┼─")
}

fn center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.chars().count()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn truncate(value: &str, max_width: usize) -> String {
    if value.chars().count() <= max_width {
        value.to_string()
    } else {
        let take = max_width.saturating_sub(1);
        format!("{}…", value.chars().take(take).collect::<String>())
    }
}

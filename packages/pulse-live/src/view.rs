//! Terminal rendering

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use pulse_core::format::{Tone, ValueText};
use pulse_core::live::{LiveRow, SessionSource};

use crate::state::AppState;

const HEADER: [&str; 8] = ["Ticker", "Name", "Price", "Chg", "Chg%", "Day", "Month", "YTD"];

fn tone_color(tone: Tone) -> Option<Color> {
    match tone {
        Tone::Gain => Some(Color::Green),
        Tone::Loss => Some(Color::Red),
        Tone::None => None,
    }
}

fn value_cell(value: &ValueText) -> Cell {
    let cell = Cell::new(&value.text).set_alignment(CellAlignment::Right);
    match tone_color(value.tone) {
        Some(color) => cell.fg(color),
        None => cell,
    }
}

fn row_cells(row: &LiveRow, ranked: bool) -> Vec<Cell> {
    let mut ticker = row.symbol.clone();
    if row.is_stale() {
        ticker.push('*');
    }

    let mut cells = Vec::with_capacity(HEADER.len() + 1);
    if ranked {
        let rank = row.rank.map(|r| r.to_string()).unwrap_or_default();
        cells.push(Cell::new(rank).set_alignment(CellAlignment::Right));
    }
    cells.push(Cell::new(ticker));
    cells.push(Cell::new(&row.name));
    cells.push(Cell::new(&row.text.price).set_alignment(CellAlignment::Right));
    cells.push(value_cell(&row.text.change));
    cells.push(value_cell(&row.text.change_pct));
    cells.push(value_cell(&row.text.day));
    cells.push(value_cell(&row.text.month));
    cells.push(value_cell(&row.text.ytd));
    cells
}

/// Render one table of rows
pub fn render_table(rows: &[LiveRow], ranked: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header: Vec<&str> = Vec::with_capacity(HEADER.len() + 1);
    if ranked {
        header.push("#");
    }
    header.extend(HEADER);
    table.set_header(header);

    for row in rows {
        table.add_row(row_cells(row, ranked));
    }
    table
}

/// Banner line: session and index levels
pub fn render_banner(state: &AppState) -> String {
    let banner = &state.banner;
    let mut line = banner.session().label().to_string();
    if banner.source() == SessionSource::Heuristic {
        line.push_str(" (est.)");
    }
    for index in banner.indices() {
        line.push_str("  |  ");
        line.push_str(&index.label());
    }
    if banner.is_stale() {
        line.push_str("  [stale]");
    }
    line
}

/// Full screen: banner, leaderboard, watchlist, status
pub fn render(state: &AppState) -> String {
    format!(
        "{}\n\nTop {} by {} return ({} instruments, built {})\n{}\n\nWatchlist\n{}\n{}",
        render_banner(state),
        state.board.leaderboard().len(),
        state.rank_horizon.label(),
        state.universe_count,
        state.generated_at.format("%Y-%m-%d %H:%M UTC"),
        render_table(state.board.leaderboard(), true),
        render_table(state.board.watchlist(), false),
        state.status_line(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pulse_core::{Baselines, Horizon, InstrumentMetrics, Publication, PublishedRow, TrackerConfig};

    fn state() -> AppState {
        let metrics = InstrumentMetrics {
            symbol: "NVDA".to_string(),
            name: "NVIDIA Corporation".to_string(),
            price: 1234.5,
            change: Some(-10.0),
            change_fraction: Some(-0.008),
            day: Some(-0.008),
            month: Some(0.25),
            ytd: None,
            baselines: Baselines {
                previous_close: Some(1244.5),
                month: Some(987.6),
                ytd: None,
            },
        };
        let publication = Publication {
            generated_at: Utc::now(),
            rank_horizon: Horizon::Month,
            top_n: 10,
            universe_count: 13,
            leaderboard: vec![PublishedRow::from_metrics(&metrics, Some(1))],
            watchlist: vec![PublishedRow::from_metrics(&metrics, None)],
        };
        AppState::new(&publication, &TrackerConfig::default(), Utc::now())
    }

    #[test]
    fn test_render_contains_rows() {
        let screen = render(&state());

        assert!(screen.contains("Top 1 by Month return (13 instruments"));
        assert!(screen.contains("NVDA"));
        assert!(screen.contains("1,234.50"));
        assert!(screen.contains("+25.00%"));
        assert!(screen.contains("-0.80%"));
        assert!(screen.contains(pulse_core::format::PLACEHOLDER));
        assert!(screen.contains("Watchlist"));
    }

    #[test]
    fn test_stale_rows_flagged() {
        let mut state = state();
        let generation = state.begin_tick();
        state.quotes_failed(generation, &["NVDA".to_string()], "timeout");

        let screen = render(&state);
        assert!(screen.contains("NVDA*"));
        assert!(screen.contains("Stale (timeout)"));
    }

    #[test]
    fn test_banner_before_quotes_is_estimated() {
        let line = render_banner(&state());
        assert!(line.contains("(est.)"));
    }
}

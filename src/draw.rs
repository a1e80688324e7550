use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::components::pager::PaginationBar;
use crate::components::theme::{
    ThemeColor, faction_style, rank_change_label, rank_medal, resolve, tier_style,
};
use crate::components::tier_legend::{LEGEND_HEIGHT, LEGEND_WIDTH, TierLegend};
use crate::state::app_state::UpdateOrigin;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::view::SortField;
use crate::ui::layout::LayoutAreas;
use leaderboard_api::{EloBadge, Player, RankChange};

const HELP_TEXT: &[(&str, &str)] = &[
    ("h / l  ←/→", "previous / next page"),
    ("g / G", "first / last page"),
    ("p", "cycle page size (10, 20, 50)"),
    ("j / k  ↑/↓", "move selection"),
    ("Enter", "player details"),
    ("1-5", "sort by rank, elo, wins, losses, clan"),
    ("f", "cycle region filter"),
    ("/", "search by name (Enter/Esc to finish)"),
    ("c", "clear search"),
    ("r", "reload page"),
    ("t", "rank tier legend"),
    ("F", "toggle full screen"),
    ("\"", "toggle log pane"),
    ("?", "toggle help"),
    ("q", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);
    let visible = app.visible_rows().to_vec();
    app.state.view.clamp_selection(visible.len());

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_header(f, layout.header, app);
        }
        draw_table(f, layout.table, app, &visible);
        if let Some(pagination) = app.state.leaderboard.pagination() {
            f.render_widget(
                PaginationBar { pagination, showing: visible.len() },
                layout.pager,
            );
        }
        draw_status(f, layout.status, app);
        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        if app.state.detail_open
            && let Some(player) = visible
                .get(app.state.view.selected)
                .and_then(|idx| app.state.leaderboard.players().get(*idx))
        {
            draw_detail_popup(f, f.area(), player);
        }
        if app.state.show_tiers {
            let highlight = visible
                .get(app.state.view.selected)
                .and_then(|idx| app.state.leaderboard.players().get(*idx))
                .map(|p| EloBadge::for_elo(p.elo));
            let area = centered_rect(LEGEND_WIDTH, LEGEND_HEIGHT, f.area());
            f.render_widget(Clear, area);
            f.render_widget(TierLegend { highlight }, area);
        }
        if app.state.show_help {
            draw_help_popup(f, f.area());
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.state.view;
    let block = default_border(Color::White).title(Span::styled(" Duel Leaderboard ", resolve(ThemeColor::Accent)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let search_style = if view.searching {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let mut search = view.filter.search.clone();
    if view.searching {
        search.push('▏');
    } else if search.is_empty() {
        search.push_str("(press /)");
    }

    let line = Line::from(vec![
        Span::styled("Search: ", resolve(ThemeColor::Dim)),
        Span::styled(search, search_style),
        Span::styled("   Region: ", resolve(ThemeColor::Dim)),
        Span::raw(view.filter.region.label()),
        Span::styled("   Sort: ", resolve(ThemeColor::Dim)),
        Span::raw(format!(
            "{} {}",
            view.filter.sort_field.label(),
            view.filter.sort_direction.arrow()
        )),
        Span::styled("   Source: ", resolve(ThemeColor::Dim)),
        Span::raw(app.state.source_label.as_str()),
    ]);
    f.render_widget(Paragraph::new(line), inner);
}

fn draw_table(f: &mut Frame, area: Rect, app: &App, visible: &[usize]) {
    let block = default_border(Color::White);

    if !app.state.leaderboard.is_loaded() {
        let (msg, style) = match app.state.last_error.as_deref() {
            Some(err) => (
                format!("Could not load leaderboard\n\n{err}\n\npress r to retry"),
                resolve(ThemeColor::Error),
            ),
            None => ("Loading leaderboard...".to_string(), resolve(ThemeColor::Dim)),
        };
        draw_placeholder(f, area, block, &msg, style);
        return;
    }

    if visible.is_empty() {
        draw_placeholder(
            f,
            area,
            block,
            "No players match the current filters",
            resolve(ThemeColor::Dim),
        );
        return;
    }

    let sort = &app.state.view.filter;
    let header_cells = [
        ("Rank", Some(SortField::Rank)),
        ("±", None),
        ("Player", None),
        ("Tier", None),
        ("ELO", Some(SortField::Elo)),
        ("W", Some(SortField::Wins)),
        ("L", Some(SortField::Losses)),
        ("W/L", None),
        ("Clan", Some(SortField::Clan)),
        ("Region", None),
        ("Class", None),
    ]
    .into_iter()
    .map(|(title, field)| match field {
        Some(field) if field == sort.sort_field => {
            Cell::from(format!("{title} {}", sort.sort_direction.arrow()))
                .style(resolve(ThemeColor::Accent))
        }
        _ => Cell::from(title),
    });
    let header = Row::new(header_cells).style(resolve(ThemeColor::Header));

    let players = app.state.leaderboard.players();
    let rows = visible.iter().filter_map(|idx| players.get(*idx)).map(player_row);

    let widths = [
        Constraint::Length(7),
        Constraint::Length(5),
        Constraint::Fill(2),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(resolve(ThemeColor::Highlight))
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(app.state.view.selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn player_row(player: &Player) -> Row<'static> {
    let rank = match rank_medal(player.rank) {
        Some(medal) => format!("{medal} {}", player.rank),
        None => format!("#{}", player.rank),
    };
    let (change, change_style) = rank_change_label(player.rank_change());

    Row::new(vec![
        Cell::from(rank),
        Cell::from(Span::styled(change, change_style)),
        Cell::from(Span::styled(player.name.clone(), faction_style(player.faction))),
        Cell::from(Span::styled(player.rank_tier.label(), tier_style(player.rank_tier))),
        Cell::from(player.elo.to_string()),
        Cell::from(player.wins.to_string()),
        Cell::from(player.losses.to_string()),
        Cell::from(format!("{:.2}", player.win_loss_ratio())),
        Cell::from(player.clan.clone()),
        Cell::from(player.region.label()),
        Cell::from(player.main_class.label()),
    ])
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let live = &app.state.live;
    let live_style = match (live.enabled, live.state.is_open()) {
        (true, true) => resolve(ThemeColor::Up),
        (true, false) => Style::default().fg(Color::Yellow),
        (false, _) => resolve(ThemeColor::Dim),
    };

    let mut spans = vec![
        Span::styled(" live: ", resolve(ThemeColor::Dim)),
        Span::styled(live.label(), live_style),
    ];
    if live.enabled && live.snapshots_applied > 0 {
        let unit = if live.snapshots_applied == 1 { "push" } else { "pushes" };
        spans.push(Span::styled(
            format!(" ({} {unit})", live.snapshots_applied),
            resolve(ThemeColor::Dim),
        ));
    }

    if let Some(updated) = app.state.leaderboard.updated_at.as_deref() {
        let origin = match app.state.leaderboard.origin {
            Some(UpdateOrigin::Live) => " (push)",
            _ => "",
        };
        spans.push(Span::styled(
            format!("   updated {updated}{origin}"),
            resolve(ThemeColor::Dim),
        ));
    }

    match app.state.last_error.as_deref() {
        Some(err) if app.state.leaderboard.is_loaded() => {
            spans.push(Span::styled(format!("   {err}"), resolve(ThemeColor::Error)));
        }
        _ => spans.push(Span::styled(
            "   ?=help  q=quit",
            resolve(ThemeColor::Dim),
        )),
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_detail_popup(f: &mut Frame, area: Rect, player: &Player) {
    let popup = centered_rect(44, 16, area);
    f.render_widget(Clear, popup);

    let block = default_border(Color::White)
        .title(Span::styled(format!(" {} ", player.name), faction_style(player.faction)));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let clan = if player.clan.is_empty() { "None" } else { player.clan.as_str() };
    let peak = player
        .peak_elo
        .map(|elo| elo.to_string())
        .unwrap_or_else(|| "-".to_string());
    let change = match player.rank_change() {
        RankChange::Up(n) => format!("up {n} (was #{})", player.previous_rank),
        RankChange::Down(n) => format!("down {n} (was #{})", player.previous_rank),
        RankChange::Same => "no change".to_string(),
    };
    let badge = EloBadge::for_elo(player.elo);

    let rows = [
        ("Rank", format!("#{}", player.rank)),
        ("Rank change", change),
        ("Tier", player.rank_tier.label().to_string()),
        ("ELO", format!("{} ({})", player.elo, badge.label())),
        ("Peak ELO", peak),
        ("Wins", player.wins.to_string()),
        ("Losses", player.losses.to_string()),
        ("W/L ratio", format!("{:.2}", player.win_loss_ratio())),
        ("Region", player.region.label().to_string()),
        ("Clan", clan.to_string()),
        ("Level", player.level.to_string()),
        ("Class", player.main_class.label().to_string()),
        ("Faction", player.faction.label().to_string()),
    ];
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<12}"), resolve(ThemeColor::Dim)),
                Span::raw(value),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup = centered_rect(52, HELP_TEXT.len() as u16 + 2, area);
    f.render_widget(Clear, popup);

    let lines: Vec<Line> = HELP_TEXT
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:<12}"), resolve(ThemeColor::Header)),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(default_border(Color::White).title(" Help ")),
        popup,
    );
}

fn draw_placeholder(f: &mut Frame, area: Rect, block: Block, msg: &str, style: Style) {
    let inner = block.inner(area);
    f.render_widget(block, area);
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(msg.lines().count() as u16),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(
        Paragraph::new(msg)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        middle,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(3), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

/// Fixed-size rect centred in `area`, shrunk to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use leaderboard_api::mock::MockSource;
    use tui::backend::TestBackend;

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        draw(&mut terminal, app, LoadingState::default());
        let buffer = terminal.backend().buffer().clone();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn error_panel_offers_retry_before_first_load() {
        let mut app = App::new(AppSettings::default());
        app.state.last_error = Some("backend down".into());
        let text = screen(&mut app);
        assert!(text.contains("press r to retry"), "{text}");
    }

    #[test]
    fn loaded_page_lists_players() {
        let mut app = App::new(AppSettings::default());
        let request = app.request_current_page();
        let crate::state::messages::NetworkRequest::LoadPage { request_id, .. } = request;
        app.on_page_loaded(request_id, MockSource::new().page(1, 10).unwrap());

        let text = screen(&mut app);
        assert!(text.contains("Player 1"), "{text}");
        assert!(text.contains("[1]"), "{text}");
        assert!(!text.contains("press r to retry"));
    }

    #[test]
    fn status_line_counts_applied_pushes() {
        let mut app = App::new(AppSettings::default());
        app.state.live.enabled = true;
        assert!(!screen(&mut app).contains("push"));

        app.on_live_snapshot(MockSource::new().page(1, 10).unwrap());
        app.on_live_snapshot(MockSource::new().page(2, 10).unwrap());
        app.on_live_snapshot(MockSource::new().page(1, 10).unwrap());

        let text = screen(&mut app);
        assert!(text.contains("(2 pushes)"), "{text}");
    }

    #[test]
    fn centered_rect_fits_inside_small_areas() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered_rect(44, 16, area);
        assert_eq!(rect, area);
    }
}

use leaderboard_api::EloBadge;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Widget};

use crate::components::theme::{ThemeColor, badge_color, resolve};

pub const LEGEND_WIDTH: u16 = 34;
pub const LEGEND_HEIGHT: u16 = EloBadge::ALL.len() as u16 + 2;

/// Popup listing the ELO badge ladder; `highlight` marks the selected
/// player's badge.
#[derive(Default)]
pub struct TierLegend {
    pub highlight: Option<EloBadge>,
}

impl Widget for TierLegend {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(resolve(ThemeColor::Dim))
            .title(" Rank tiers ");
        let inner = block.inner(area);
        block.render(area, buf);

        for (row, badge) in EloBadge::ALL.iter().enumerate() {
            let y = inner.y + row as u16;
            if y >= inner.bottom() {
                break;
            }
            let mut name_style = Style::default().fg(badge_color(*badge));
            if self.highlight == Some(*badge) {
                name_style = name_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            let line = Line::from(vec![
                Span::styled("● ", Style::default().fg(badge_color(*badge))),
                Span::styled(format!("{:<12}", badge.label()), name_style),
                Span::styled(badge.range_label(), resolve(ThemeColor::Dim)),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_badge() {
        let area = Rect::new(0, 0, LEGEND_WIDTH, LEGEND_HEIGHT);
        let mut buf = Buffer::empty(area);
        TierLegend { highlight: Some(EloBadge::Gold) }.render(area, &mut buf);

        let rows: Vec<String> = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect())
            .collect();
        for badge in EloBadge::ALL {
            assert!(
                rows.iter().any(|r| r.contains(badge.label())),
                "{} missing",
                badge.label()
            );
        }
        assert!(rows.iter().any(|r| r.contains("2000+ ELO")));
    }
}

use tui::layout::{Constraint, Layout, Rect, Size};

pub const HEADER_HEIGHT: u16 = 3;
const LOG_PANE_HEIGHT: u16 = 8;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub header: Rect,
    pub table: Rect,
    pub pager: Rect,
    pub status: Rect,
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let header_height = if full_screen { 0 } else { HEADER_HEIGHT };
        let logs_height = if show_logs { LOG_PANE_HEIGHT } else { 0 };

        let [header, table, pager, status, logs] = Layout::vertical([
            Constraint::Length(header_height),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(logs_height),
        ])
        .areas(area);

        LayoutAreas {
            header,
            table,
            pager,
            status,
            logs: show_logs.then_some(logs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_drops_the_header() {
        let mut layout = LayoutAreas::new(Size::new(100, 40));
        assert_eq!(layout.header.height, HEADER_HEIGHT);
        layout.update(Rect::new(0, 0, 100, 40), true, false);
        assert_eq!(layout.header.height, 0);
        assert_eq!(layout.table.height, 38);
        assert!(layout.logs.is_none());
    }

    #[test]
    fn log_pane_sits_below_the_status_line() {
        let mut layout = LayoutAreas::new(Size::new(100, 40));
        layout.update(Rect::new(0, 0, 100, 40), false, true);
        let logs = layout.logs.expect("log pane requested");
        assert_eq!(logs.height, LOG_PANE_HEIGHT);
        assert_eq!(logs.y, layout.status.bottom());
    }
}

use leaderboard_api::Pagination;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::Widget;

use crate::components::theme::{ThemeColor, resolve};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    Gap,
}

/// Page buttons for `current` out of `total`: the first page, the last page
/// and the neighbours of `current`. Each run of hidden pages collapses into
/// one gap.
pub fn page_slots(current: u32, total: u32) -> Vec<PageSlot> {
    let mut slots = Vec::new();
    for page in 1..=total {
        let shown = page == 1 || page == total || page.abs_diff(current) <= 1;
        if shown {
            slots.push(PageSlot::Page(page));
        } else if slots.last() != Some(&PageSlot::Gap) {
            slots.push(PageSlot::Gap);
        }
    }
    slots
}

/// One-line pager: prev/next arrows, page buttons and a summary.
pub struct PaginationBar<'a> {
    pub pagination: &'a Pagination,
    /// Players left on this page after filtering.
    pub showing: usize,
}

impl Widget for PaginationBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let p = self.pagination;
        let enabled = Style::default();
        let disabled = resolve(ThemeColor::Dim);

        let mut spans = vec![Span::styled(
            "◀ prev ",
            if p.has_prev() { enabled } else { disabled },
        )];
        for slot in page_slots(p.page, p.total_pages) {
            match slot {
                PageSlot::Page(n) if n == p.page => spans.push(Span::styled(
                    format!("[{n}]"),
                    resolve(ThemeColor::Accent).add_modifier(Modifier::REVERSED),
                )),
                PageSlot::Page(n) => spans.push(Span::raw(format!(" {n} "))),
                PageSlot::Gap => spans.push(Span::styled(" … ", disabled)),
            }
        }
        spans.push(Span::styled(
            " next ▶",
            if p.has_next() { enabled } else { disabled },
        ));
        spans.push(Span::styled(
            format!(
                "   page {} of {} · showing {} of {} players · {}/page",
                p.page,
                p.total_pages.max(1),
                self.showing,
                p.total,
                p.page_size
            ),
            disabled,
        ));

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

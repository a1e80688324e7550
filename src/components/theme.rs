use leaderboard_api::{EloBadge, Faction, RankChange, RankTier};
use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeColor {
    Accent,
    Header,
    Dim,
    Up,
    Down,
    Highlight,
    Error,
}

pub fn resolve(color: ThemeColor) -> Style {
    match color {
        ThemeColor::Accent => Style::default().fg(Color::Rgb(255, 70, 85)).add_modifier(Modifier::BOLD),
        ThemeColor::Header => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ThemeColor::Dim => Style::default().fg(Color::Indexed(240)),
        ThemeColor::Up => Style::default().fg(Color::Green),
        ThemeColor::Down => Style::default().fg(Color::Red),
        ThemeColor::Highlight => Style::default()
            .bg(Color::Indexed(236))
            .add_modifier(Modifier::BOLD),
        ThemeColor::Error => Style::default().fg(Color::Red),
    }
}

pub fn tier_style(tier: RankTier) -> Style {
    let color = match tier {
        RankTier::Grandmaster => Color::Rgb(255, 70, 85),
        RankTier::Diamond => Color::Rgb(34, 211, 238),
        RankTier::Gold => Color::Rgb(255, 215, 0),
        RankTier::Bronze => Color::Rgb(180, 83, 9),
    };
    Style::default().fg(color)
}

pub fn badge_color(badge: EloBadge) -> Color {
    match badge {
        EloBadge::Grandmaster => Color::Rgb(0xFF, 0x46, 0x55),
        EloBadge::Master => Color::Rgb(0xFF, 0x8C, 0x00),
        EloBadge::Diamond => Color::Rgb(0x22, 0xD3, 0xEE),
        EloBadge::Platinum => Color::Rgb(0x10, 0xB9, 0x81),
        EloBadge::Gold => Color::Rgb(0xFF, 0xD7, 0x00),
        EloBadge::Silver => Color::Rgb(0x94, 0xA3, 0xB8),
        EloBadge::Bronze => Color::Rgb(0xB4, 0x53, 0x09),
    }
}

pub fn faction_style(faction: Faction) -> Style {
    match faction {
        Faction::Mason => Style::default().fg(Color::Rgb(0xC4, 0x1E, 0x3A)),
        Faction::Agatha => Style::default().fg(Color::Rgb(0x00, 0x66, 0xCC)),
    }
}

/// Medal shown next to the top three ranks.
pub fn rank_medal(rank: u32) -> Option<&'static str> {
    match rank {
        1 => Some("👑"),
        2 => Some("🥈"),
        3 => Some("🥉"),
        _ => None,
    }
}

pub fn rank_change_label(change: RankChange) -> (String, Style) {
    match change {
        RankChange::Up(n) => (format!("▲{n}"), resolve(ThemeColor::Up)),
        RankChange::Down(n) => (format!("▼{n}"), resolve(ThemeColor::Down)),
        RankChange::Same => ("-".to_string(), resolve(ThemeColor::Dim)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medals_only_for_the_podium() {
        assert!(rank_medal(1).is_some());
        assert!(rank_medal(3).is_some());
        assert_eq!(rank_medal(4), None);
    }

    #[test]
    fn rank_change_labels() {
        assert_eq!(rank_change_label(RankChange::Up(3)).0, "▲3");
        assert_eq!(rank_change_label(RankChange::Down(1)).0, "▼1");
        assert_eq!(rank_change_label(RankChange::Same).0, "-");
    }
}

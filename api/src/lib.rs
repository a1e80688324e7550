pub mod client;
pub mod mock;
pub mod source;
pub mod wire;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Domain types, independent of the backend wire format
// ---------------------------------------------------------------------------

/// One page of the leaderboard, as held in memory by the viewer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeaderboardPage {
    pub players: Vec<Player>,
    pub pagination: Pagination,
}

impl LeaderboardPage {
    /// Decode a primary-endpoint body (also the live snapshot shape).
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: wire::WirePage = serde_json::from_str(text)?;
        Ok(raw.into_page())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(total: u64, page: u32, page_size: u32) -> Self {
        Self {
            total,
            page,
            page_size,
            total_pages: total_pages(total, page_size),
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// `ceil(total / page_size)`, zero when the page size is zero.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size)).min(u64::from(u32::MAX)) as u32
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub avatar: String,
    pub rank: u32,
    pub previous_rank: u32,
    pub elo: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_elo: Option<i32>,
    pub wins: u32,
    pub losses: u32,
    pub clan: String,
    pub region: Region,
    pub level: u32,
    pub main_class: MainClass,
    pub faction: Faction,
    pub rank_tier: RankTier,
}

impl Player {
    pub fn rank_change(&self) -> RankChange {
        match self.previous_rank.cmp(&self.rank) {
            std::cmp::Ordering::Greater => RankChange::Up(self.previous_rank - self.rank),
            std::cmp::Ordering::Less => RankChange::Down(self.rank - self.previous_rank),
            std::cmp::Ordering::Equal => RankChange::Same,
        }
    }

    pub fn win_loss_ratio(&self) -> f64 {
        f64::from(self.wins) / f64::from(self.losses.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankChange {
    Up(u32),
    Down(u32),
    Same,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Region {
    #[default]
    #[serde(rename = "EU")]
    Eu,
    #[serde(rename = "NA")]
    Na,
    #[serde(rename = "ASIA")]
    Asia,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Eu, Region::Na, Region::Asia];

    pub fn label(&self) -> &'static str {
        match self {
            Region::Eu => "EU",
            Region::Na => "NA",
            Region::Asia => "ASIA",
        }
    }

    /// Case-insensitive; the backend sends both `"EU"` and `"eu"`.
    pub fn parse(s: &str) -> Option<Self> {
        Region::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    #[default]
    Mason,
    Agatha,
}

impl Faction {
    pub fn label(&self) -> &'static str {
        match self {
            Faction::Mason => "Mason",
            Faction::Agatha => "Agatha",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mason" => Some(Faction::Mason),
            "agatha" => Some(Faction::Agatha),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum MainClass {
    #[default]
    Knight,
    Vanguard,
    Footman,
    Archer,
}

impl MainClass {
    pub const ALL: [MainClass; 4] = [
        MainClass::Knight,
        MainClass::Vanguard,
        MainClass::Footman,
        MainClass::Archer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MainClass::Knight => "Knight",
            MainClass::Vanguard => "Vanguard",
            MainClass::Footman => "Footman",
            MainClass::Archer => "Archer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        MainClass::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
    }
}

/// Coarse bucket assigned upstream. The viewer never recomputes it for a
/// record that carries one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RankTier {
    Grandmaster,
    Diamond,
    Gold,
    #[default]
    Bronze,
}

impl RankTier {
    pub fn label(&self) -> &'static str {
        match self {
            RankTier::Grandmaster => "Grandmaster",
            RankTier::Diamond => "Diamond",
            RankTier::Gold => "Gold",
            RankTier::Bronze => "Bronze",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [RankTier::Grandmaster, RankTier::Diamond, RankTier::Gold, RankTier::Bronze]
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
    }

    /// Backend thresholds, used only when a record arrives without a tier.
    pub fn from_elo(elo: i32) -> Self {
        match elo {
            e if e >= 2000 => RankTier::Grandmaster,
            e if e >= 1800 => RankTier::Diamond,
            e if e >= 1600 => RankTier::Gold,
            _ => RankTier::Bronze,
        }
    }
}

/// Seven-step display badge shown in the tier legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EloBadge {
    Grandmaster,
    Master,
    Diamond,
    Platinum,
    Gold,
    Silver,
    Bronze,
}

impl EloBadge {
    pub const ALL: [EloBadge; 7] = [
        EloBadge::Grandmaster,
        EloBadge::Master,
        EloBadge::Diamond,
        EloBadge::Platinum,
        EloBadge::Gold,
        EloBadge::Silver,
        EloBadge::Bronze,
    ];

    pub fn for_elo(elo: i32) -> Self {
        EloBadge::ALL
            .into_iter()
            .find(|b| b.floor().is_some_and(|floor| elo >= floor))
            .unwrap_or(EloBadge::Bronze)
    }

    /// Inclusive lower bound; Bronze has none.
    pub fn floor(&self) -> Option<i32> {
        match self {
            EloBadge::Grandmaster => Some(2000),
            EloBadge::Master => Some(1800),
            EloBadge::Diamond => Some(1600),
            EloBadge::Platinum => Some(1400),
            EloBadge::Gold => Some(1200),
            EloBadge::Silver => Some(1000),
            EloBadge::Bronze => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EloBadge::Grandmaster => "Grandmaster",
            EloBadge::Master => "Master",
            EloBadge::Diamond => "Diamond",
            EloBadge::Platinum => "Platinum",
            EloBadge::Gold => "Gold",
            EloBadge::Silver => "Silver",
            EloBadge::Bronze => "Bronze",
        }
    }

    /// Human range, e.g. "1800-2000 ELO".
    pub fn range_label(&self) -> String {
        match (self.floor(), self.ceiling()) {
            (Some(lo), None) => format!("{lo}+ ELO"),
            (Some(lo), Some(hi)) => format!("{lo}-{hi} ELO"),
            (None, Some(hi)) => format!("<{hi} ELO"),
            (None, None) => "ELO".to_string(),
        }
    }

    fn ceiling(&self) -> Option<i32> {
        let idx = EloBadge::ALL.iter().position(|b| b == self)?;
        idx.checked_sub(1).and_then(|above| EloBadge::ALL[above].floor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(100, 10), 10);
        assert_eq!(total_pages(101, 10), 11);
        assert_eq!(total_pages(5, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn pagination_prev_next_bounds() {
        let first = Pagination::new(100, 1, 10);
        assert!(!first.has_prev());
        assert!(first.has_next());
        let last = Pagination::new(100, 10, 10);
        assert!(last.has_prev());
        assert!(!last.has_next());
    }

    #[test]
    fn region_parse_ignores_case() {
        assert_eq!(Region::parse("eu"), Some(Region::Eu));
        assert_eq!(Region::parse("Asia"), Some(Region::Asia));
        assert_eq!(Region::parse("OCE"), None);
    }

    #[test]
    fn rank_change_direction() {
        let mut p = Player { rank: 3, previous_rank: 5, ..Default::default() };
        assert_eq!(p.rank_change(), RankChange::Up(2));
        p.previous_rank = 1;
        assert_eq!(p.rank_change(), RankChange::Down(2));
        p.previous_rank = 3;
        assert_eq!(p.rank_change(), RankChange::Same);
    }

    #[test]
    fn win_loss_ratio_guards_zero_losses() {
        let p = Player { wins: 12, losses: 0, ..Default::default() };
        assert_eq!(p.win_loss_ratio(), 12.0);
        let p = Player { wins: 9, losses: 4, ..Default::default() };
        assert_eq!(format!("{:.2}", p.win_loss_ratio()), "2.25");
    }

    #[test]
    fn elo_badge_thresholds() {
        assert_eq!(EloBadge::for_elo(2000), EloBadge::Grandmaster);
        assert_eq!(EloBadge::for_elo(1999), EloBadge::Master);
        assert_eq!(EloBadge::for_elo(1400), EloBadge::Platinum);
        assert_eq!(EloBadge::for_elo(1000), EloBadge::Silver);
        assert_eq!(EloBadge::for_elo(999), EloBadge::Bronze);
        assert_eq!(EloBadge::for_elo(-50), EloBadge::Bronze);
    }

    #[test]
    fn elo_badge_range_labels() {
        assert_eq!(EloBadge::Grandmaster.range_label(), "2000+ ELO");
        assert_eq!(EloBadge::Master.range_label(), "1800-2000 ELO");
        assert_eq!(EloBadge::Bronze.range_label(), "<1000 ELO");
    }

    #[test]
    fn rank_tier_from_backend_thresholds() {
        assert_eq!(RankTier::from_elo(2050), RankTier::Grandmaster);
        assert_eq!(RankTier::from_elo(1850), RankTier::Diamond);
        assert_eq!(RankTier::from_elo(1600), RankTier::Gold);
        assert_eq!(RankTier::from_elo(1599), RankTier::Bronze);
    }
}

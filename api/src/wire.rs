/// Backend wire types: serde shapes for the leaderboard endpoints.
/// These map to the clean domain types via `into_page` / `into_player`.
///
/// The backend is loose about encodings: numbers sometimes arrive as strings,
/// regions in lowercase, and the legacy endpoint names players `player`.
use crate::{Faction, LeaderboardPage, MainClass, Pagination, Player, RankTier, Region};
use log::warn;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Primary endpoint  (/api/leaderboard) and live snapshots
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct WirePage {
    #[serde(default)]
    pub players: Vec<WirePlayer>,
    pub pagination: WirePagination,
}

impl WirePage {
    pub fn into_page(self) -> LeaderboardPage {
        let pagination = self.pagination.into_pagination();
        LeaderboardPage {
            players: map_players(self.players),
            pagination,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct WirePagination {
    #[serde(default)]
    pub total: Option<Num>,
    #[serde(default)]
    pub page: Option<Num>,
    #[serde(default)]
    pub page_size: Option<Num>,
    #[serde(default)]
    pub total_pages: Option<Num>,
}

impl WirePagination {
    fn into_pagination(self) -> Pagination {
        let total = self.total.and_then(|n| n.as_u64()).unwrap_or(0);
        let page = self.page.and_then(|n| n.as_u32()).unwrap_or(1).max(1);
        let page_size = self.page_size.and_then(|n| n.as_u32()).unwrap_or(0);
        let total_pages = self
            .total_pages
            .and_then(|n| n.as_u32())
            .unwrap_or_else(|| crate::total_pages(total, page_size));
        Pagination { total, page, page_size, total_pages }
    }
}

// ---------------------------------------------------------------------------
// Legacy endpoint  (/leaderboard/{page})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct LegacyPage {
    #[serde(default)]
    pub players: Vec<WirePlayer>,
}

impl LegacyPage {
    pub fn into_players(self) -> Vec<Player> {
        map_players(self.players)
    }
}

// ---------------------------------------------------------------------------
// Shared player record
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WirePlayer {
    pub id: Option<Num>,
    pub name: Option<String>,
    /// Legacy key for the display name.
    pub player: Option<String>,
    pub avatar: Option<String>,
    pub rank: Option<Num>,
    pub previous_rank: Option<Num>,
    pub elo: Option<Num>,
    pub peak_elo: Option<Num>,
    pub wins: Option<Num>,
    pub losses: Option<Num>,
    pub clan: Option<String>,
    pub region: Option<String>,
    pub level: Option<Num>,
    pub main_class: Option<String>,
    pub faction: Option<String>,
    pub rank_tier: Option<String>,
}

impl WirePlayer {
    /// `None` when the record has no usable rank or an unknown region.
    pub fn into_player(self) -> Option<Player> {
        let rank = self.rank.as_ref().and_then(Num::as_u32).filter(|r| *r > 0)?;
        let region = Region::parse(self.region.as_deref()?)?;
        let elo = self.elo.as_ref().and_then(Num::as_i32).unwrap_or(0);
        let rank_tier = self
            .rank_tier
            .as_deref()
            .and_then(RankTier::parse)
            .unwrap_or_else(|| RankTier::from_elo(elo));

        Some(Player {
            id: self.id.as_ref().and_then(Num::as_u64).unwrap_or(u64::from(rank)),
            name: self.name.or(self.player).unwrap_or_default(),
            avatar: self.avatar.unwrap_or_default(),
            rank,
            previous_rank: self
                .previous_rank
                .as_ref()
                .and_then(Num::as_u32)
                .unwrap_or(rank),
            elo,
            peak_elo: self.peak_elo.as_ref().and_then(Num::as_i32),
            wins: self.wins.as_ref().and_then(Num::as_u32).unwrap_or(0),
            losses: self.losses.as_ref().and_then(Num::as_u32).unwrap_or(0),
            clan: self.clan.unwrap_or_default(),
            region,
            level: self.level.as_ref().and_then(Num::as_u32).unwrap_or(0),
            main_class: self
                .main_class
                .as_deref()
                .and_then(MainClass::parse)
                .unwrap_or_default(),
            faction: self
                .faction
                .as_deref()
                .and_then(Faction::parse)
                .unwrap_or_default(),
            rank_tier,
        })
    }
}

fn map_players(raw: Vec<WirePlayer>) -> Vec<Player> {
    raw.into_iter()
        .filter_map(|p| {
            let label = p.name.clone().or_else(|| p.player.clone()).unwrap_or_default();
            let mapped = p.into_player();
            if mapped.is_none() {
                warn!("dropping player record {label:?}: missing rank or unknown region");
            }
            mapped
        })
        .collect()
}

/// A JSON number or a numeric string.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Num {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Num {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Num::Int(n) => Some(*n),
            Num::Float(f) if f.is_finite() => Some(f.round() as i64),
            Num::Float(_) => None,
            Num::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_i64().and_then(|n| u64::try_from(n).ok())
    }

    pub fn as_u32(&self) -> Option<u32> {
        self.as_i64().and_then(|n| u32::try_from(n).ok())
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|n| i32::try_from(n).ok())
    }
}

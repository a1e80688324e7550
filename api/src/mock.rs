use crate::client::{ApiError, ApiResult};
use crate::source::LeaderboardSource;
use crate::{Faction, LeaderboardPage, MainClass, Pagination, Player, RankTier, Region};

const CLANS: [&str; 4] = ["VEN", "KLA", "FCA", "NOX"];

/// In-memory leaderboard of generated players.
///
/// Attributes that the demo backend rolled at random are picked from the
/// player index instead, so pages are reproducible.
#[derive(Debug, Clone)]
pub struct MockSource {
    players: Vec<Player>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::with_len(100)
    }
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_len(len: usize) -> Self {
        Self {
            players: (0..len).map(generate_player).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Slice one page, same arithmetic as the backend.
    pub fn page(&self, page: u32, page_size: u32) -> ApiResult<LeaderboardPage> {
        if page == 0 || page_size == 0 {
            return Err(ApiError::InvalidRequest(format!(
                "page and page size must be positive (page={page}, page_size={page_size})"
            )));
        }
        let start = (page as usize - 1).saturating_mul(page_size as usize);
        let end = start.saturating_add(page_size as usize).min(self.players.len());
        let players = self.players.get(start..end).map(<[Player]>::to_vec).unwrap_or_default();

        Ok(LeaderboardPage {
            players,
            pagination: Pagination::new(self.players.len() as u64, page, page_size),
        })
    }
}

impl LeaderboardSource for MockSource {
    async fn fetch_page(&self, page: u32, page_size: u32) -> ApiResult<LeaderboardPage> {
        self.page(page, page_size)
    }

    fn describe(&self) -> String {
        format!("mock ({} players)", self.players.len())
    }
}

fn generate_player(i: usize) -> Player {
    let idx = i as u32;
    let rank = idx + 1;
    Player {
        id: u64::from(rank),
        name: format!("Player {rank}"),
        avatar: String::new(),
        rank,
        previous_rank: rank + 1,
        elo: 2000 - (idx as i32 * 10),
        peak_elo: Some(2100 - (idx as i32 * 8)),
        wins: 100u32.saturating_sub(idx),
        losses: idx / 2,
        clan: CLANS[(i * 7 + 3) % CLANS.len()].to_string(),
        region: Region::ALL[(i * 5 + 1) % Region::ALL.len()],
        level: 100 - ((i * 13) % 50) as u32,
        main_class: MainClass::ALL[(i * 3 + 1) % MainClass::ALL.len()],
        faction: if (i * 11) % 2 == 0 { Faction::Mason } else { Faction::Agatha },
        rank_tier: match i {
            0..5 => RankTier::Grandmaster,
            5..20 => RankTier::Diamond,
            20..50 => RankTier::Gold,
            _ => RankTier::Bronze,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_satisfy_pagination_invariants() {
        let source = MockSource::new();
        for page_size in [1u32, 7, 10, 20, 50, 100, 150] {
            let total_pages = crate::total_pages(source.len() as u64, page_size);
            for page in 1..=total_pages {
                let result = source.page(page, page_size).unwrap();
                let p = result.pagination;
                assert_eq!(p.total, 100);
                assert_eq!(p.total_pages, 100u64.div_ceil(u64::from(page_size)) as u32);
                assert!(u64::from((page - 1) * page_size) < p.total);
                assert!(!result.players.is_empty());
                assert!(result.players.len() <= page_size as usize);
            }
        }
    }

    #[test]
    fn first_page_is_ranked_one_to_ten() {
        let page = MockSource::new().page(1, 10).unwrap();
        let ranks: Vec<u32> = page.players.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = MockSource::new().page(11, 10).unwrap();
        assert!(page.players.is_empty());
        assert_eq!(page.pagination.total_pages, 10);
    }

    #[test]
    fn zero_arguments_are_rejected() {
        assert!(MockSource::new().page(0, 10).is_err());
        assert!(MockSource::new().page(1, 0).is_err());
    }

    #[test]
    fn tiers_follow_position() {
        let source = MockSource::new();
        let all = source.page(1, 100).unwrap().players;
        assert_eq!(all[4].rank_tier, RankTier::Grandmaster);
        assert_eq!(all[5].rank_tier, RankTier::Diamond);
        assert_eq!(all[49].rank_tier, RankTier::Gold);
        assert_eq!(all[50].rank_tier, RankTier::Bronze);
    }

    #[test]
    fn generated_data_covers_every_region() {
        let all = MockSource::new().page(1, 100).unwrap().players;
        for region in Region::ALL {
            assert!(all.iter().any(|p| p.region == region), "no players in {region:?}");
        }
    }
}

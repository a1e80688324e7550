use leaderboard_api::{Player, Region};
use std::cmp::Ordering;

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZES: [u32; 3] = [10, 20, 50];
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// ---------------------------------------------------------------------------
// Sort / filter vocabulary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Rank,
    Elo,
    Wins,
    Losses,
    Clan,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Rank,
        SortField::Elo,
        SortField::Wins,
        SortField::Losses,
        SortField::Clan,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Rank => "Rank",
            SortField::Elo => "ELO",
            SortField::Wins => "Wins",
            SortField::Losses => "Losses",
            SortField::Clan => "Clan",
        }
    }

    /// Direction used when the field is first selected: best-first for the
    /// numeric stats, top-of-table for rank, A→Z for clan.
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortField::Rank | SortField::Clan => SortDirection::Asc,
            SortField::Elo | SortField::Wins | SortField::Losses => SortDirection::Desc,
        }
    }

    /// Natural ascending order of the field's value.
    fn compare(&self, a: &Player, b: &Player) -> Ordering {
        match self {
            SortField::Rank => a.rank.cmp(&b.rank),
            SortField::Elo => a.elo.cmp(&b.elo),
            SortField::Wins => a.wins.cmp(&b.wins),
            SortField::Losses => a.losses.cmp(&b.losses),
            SortField::Clan => fold_case(&a.clan).cmp(fold_case(&b.clan)),
        }
    }
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegionFilter {
    #[default]
    All,
    Only(Region),
}

impl RegionFilter {
    pub fn label(&self) -> &'static str {
        match self {
            RegionFilter::All => "All Regions",
            RegionFilter::Only(region) => region.label(),
        }
    }

    /// All → EU → NA → ASIA → All
    pub fn next(self) -> Self {
        match self {
            RegionFilter::All => RegionFilter::Only(Region::ALL[0]),
            RegionFilter::Only(region) => {
                let idx = Region::ALL.iter().position(|r| *r == region).unwrap_or(0);
                Region::ALL
                    .get(idx + 1)
                    .map(|r| RegionFilter::Only(*r))
                    .unwrap_or(RegionFilter::All)
            }
        }
    }

    pub fn matches(&self, player: &Player) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(region) => player.region == *region,
        }
    }
}

/// Everything the visible list depends on besides the player data itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub search: String,
    pub region: RegionFilter,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

/// Indices into `players`, filtered and ordered for display.
///
/// Works on the loaded page only. Ties keep their input order.
pub fn derive_visible(players: &[Player], filter: &ViewFilter) -> Vec<usize> {
    let needle = filter.search.trim().to_lowercase();

    let mut rows: Vec<usize> = players
        .iter()
        .enumerate()
        .filter(|(_, p)| filter.region.matches(p))
        .filter(|(_, p)| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .map(|(idx, _)| idx)
        .collect();

    rows.sort_by(|&a, &b| {
        filter
            .sort_direction
            .apply(filter.sort_field.compare(&players[a], &players[b]))
    });
    rows
}

// ---------------------------------------------------------------------------
// Memoized derivation
// ---------------------------------------------------------------------------

/// Caches `derive_visible` keyed on the data revision and the filter.
#[derive(Debug, Default)]
pub struct VisibleRows {
    key: Option<(u64, ViewFilter)>,
    rows: Vec<usize>,
    computations: u64,
}

impl VisibleRows {
    pub fn get(&mut self, revision: u64, players: &[Player], filter: &ViewFilter) -> &[usize] {
        let fresh = matches!(&self.key, Some((rev, f)) if *rev == revision && f == filter);
        if !fresh {
            self.rows = derive_visible(players, filter);
            self.key = Some((revision, filter.clone()));
            self.computations += 1;
        }
        &self.rows
    }

    pub fn computations(&self) -> u64 {
        self.computations
    }
}

// ---------------------------------------------------------------------------
// View state controller
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ViewState {
    pub page: u32,
    pub page_size: u32,
    pub filter: ViewFilter,
    /// Cursor into the visible rows.
    pub selected: usize,
    /// True while keystrokes go to the search box.
    pub searching: bool,
    visible: VisibleRows,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            filter: ViewFilter::default(),
            selected: 0,
            searching: false,
            visible: VisibleRows::default(),
        }
    }

    /// Returns true when the page actually changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.page {
            return false;
        }
        self.page = page;
        self.selected = 0;
        true
    }

    /// A new page size always restarts from page 1 so the old offset can
    /// never point past the end.
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        let page_size = page_size.max(1);
        if page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        self.page = 1;
        self.selected = 0;
        true
    }

    pub fn next_page_size(&self) -> u32 {
        let idx = PAGE_SIZES.iter().position(|s| *s == self.page_size);
        match idx {
            Some(i) => PAGE_SIZES[(i + 1) % PAGE_SIZES.len()],
            None => PAGE_SIZES[0],
        }
    }

    /// Same field flips the direction; a new field starts at its default.
    pub fn select_sort(&mut self, field: SortField) {
        if self.filter.sort_field == field {
            self.filter.sort_direction = self.filter.sort_direction.flipped();
        } else {
            self.filter.sort_field = field;
            self.filter.sort_direction = field.default_direction();
        }
        self.selected = 0;
    }

    pub fn cycle_region(&mut self) {
        self.filter.region = self.filter.region.next();
        self.selected = 0;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.filter.search.push(c);
        self.selected = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.filter.search.pop();
        self.selected = 0;
    }

    pub fn clear_search(&mut self) {
        self.filter.search.clear();
        self.selected = 0;
    }

    pub fn visible(&mut self, revision: u64, players: &[Player]) -> &[usize] {
        self.visible.get(revision, players, &self.filter)
    }

    pub fn derivations(&self) -> u64 {
        self.visible.computations()
    }

    pub fn select_next(&mut self, visible_len: usize) {
        if self.selected + 1 < visible_len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self, visible_len: usize) {
        self.selected = self.selected.min(visible_len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaderboard_api::mock::MockSource;

    fn player(rank: u32, name: &str, elo: i32, region: Region, clan: &str) -> Player {
        Player {
            id: u64::from(rank),
            name: name.to_string(),
            rank,
            previous_rank: rank,
            elo,
            wins: 100 - rank,
            losses: rank,
            clan: clan.to_string(),
            region,
            ..Default::default()
        }
    }

    fn sample() -> Vec<Player> {
        vec![
            player(1, "KnightSlayer", 2050, Region::Eu, "VEN"),
            player(2, "ShieldBearer", 1980, Region::Na, "KLA"),
            player(3, "Archibald", 1990, Region::Asia, "nox"),
            player(4, "BladeRunner", 1700, Region::Eu, "FCA"),
            player(5, "WarriorKing", 1700, Region::Na, "VEN"),
        ]
    }

    fn names(players: &[Player], rows: &[usize]) -> Vec<String> {
        rows.iter().map(|&i| players[i].name.clone()).collect()
    }

    fn filter(field: SortField, direction: SortDirection) -> ViewFilter {
        ViewFilter { sort_field: field, sort_direction: direction, ..Default::default() }
    }

    #[test]
    fn region_filter_keeps_only_that_region() {
        let players = MockSource::new().page(1, 100).unwrap().players;
        for region in Region::ALL {
            let f = ViewFilter { region: RegionFilter::Only(region), ..Default::default() };
            let rows = derive_visible(&players, &f);
            assert!(!rows.is_empty());
            assert!(rows.iter().all(|&i| players[i].region == region));
        }
        let all = derive_visible(&players, &ViewFilter::default());
        assert_eq!(all.len(), players.len());
    }

    #[test]
    fn search_is_case_insensitive_and_trimmed() {
        let players = sample();
        for needle in ["knight", "KNIGHT", "  Knight  "] {
            let f = ViewFilter { search: needle.to_string(), ..Default::default() };
            assert_eq!(names(&players, &derive_visible(&players, &f)), vec!["KnightSlayer"]);
        }
    }

    #[test]
    fn blank_search_matches_everything() {
        let players = sample();
        let f = ViewFilter { search: "   ".to_string(), ..Default::default() };
        assert_eq!(derive_visible(&players, &f).len(), players.len());
    }

    #[test]
    fn search_and_region_combine() {
        let players = sample();
        let f = ViewFilter {
            search: "R".to_string(),
            region: RegionFilter::Only(Region::Na),
            ..Default::default()
        };
        assert_eq!(
            names(&players, &derive_visible(&players, &f)),
            vec!["ShieldBearer", "WarriorKing"]
        );
    }

    #[test]
    fn ascending_means_natural_order_for_every_field() {
        let players = sample();
        let rows = derive_visible(&players, &filter(SortField::Elo, SortDirection::Asc));
        assert_eq!(players[rows[0]].elo, 1700);
        let rows = derive_visible(&players, &filter(SortField::Rank, SortDirection::Asc));
        assert_eq!(players[rows[0]].rank, 1);
        let rows = derive_visible(&players, &filter(SortField::Wins, SortDirection::Asc));
        assert_eq!(players[rows[0]].wins, 95);
        let rows = derive_visible(&players, &filter(SortField::Losses, SortDirection::Asc));
        assert_eq!(players[rows[0]].losses, 1);
        let rows = derive_visible(&players, &filter(SortField::Clan, SortDirection::Asc));
        assert_eq!(players[rows[0]].clan, "FCA");
    }

    #[test]
    fn descending_reverses_the_comparison() {
        let players = sample();
        let rows = derive_visible(&players, &filter(SortField::Elo, SortDirection::Desc));
        assert_eq!(names(&players, &rows)[0], "KnightSlayer");
        let rows = derive_visible(&players, &filter(SortField::Clan, SortDirection::Desc));
        assert_eq!(players[rows[0]].clan, "VEN");
    }

    #[test]
    fn clan_order_ignores_case() {
        let players = sample();
        let rows = derive_visible(&players, &filter(SortField::Clan, SortDirection::Asc));
        let clans: Vec<&str> = rows.iter().map(|&i| players[i].clan.as_str()).collect();
        assert_eq!(clans, vec!["FCA", "KLA", "nox", "VEN", "VEN"]);
    }

    #[test]
    fn clan_compare_folds_case_per_character() {
        let clan = |c: &str| player(1, "a", 1000, Region::Eu, c);
        let cmp = |a: &str, b: &str| SortField::Clan.compare(&clan(a), &clan(b));
        assert_eq!(cmp("ven", "VEN"), Ordering::Equal);
        assert_eq!(cmp("kla", "KLAN"), Ordering::Less);
        assert_eq!(cmp("Ölm", "ark"), "ölm".cmp("ark"));
        assert_eq!(cmp("", "a"), Ordering::Less);
    }

    #[test]
    fn ties_keep_input_order() {
        let players = sample();
        let asc = derive_visible(&players, &filter(SortField::Elo, SortDirection::Asc));
        assert_eq!(names(&players, &asc[..2]), vec!["BladeRunner", "WarriorKing"]);
        let desc = derive_visible(&players, &filter(SortField::Elo, SortDirection::Desc));
        assert_eq!(names(&players, &desc[3..]), vec!["BladeRunner", "WarriorKing"]);
    }

    #[test]
    fn sorting_twice_gives_the_same_order() {
        let players = MockSource::new().page(1, 100).unwrap().players;
        for field in SortField::ALL {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let f = filter(field, direction);
                assert_eq!(derive_visible(&players, &f), derive_visible(&players, &f));
            }
        }
    }

    #[test]
    fn elo_ascending_on_first_page_puts_lowest_first() {
        let page = MockSource::new().page(1, 10).unwrap();
        let rows = derive_visible(&page.players, &filter(SortField::Elo, SortDirection::Asc));
        let lowest = page.players.iter().map(|p| p.elo).min().unwrap();
        assert_eq!(page.players[rows[0]].elo, lowest);
        assert_eq!(page.players[rows[0]].rank, 10);
    }

    #[test]
    fn memo_recomputes_only_when_inputs_change() {
        let players = sample();
        let mut view = ViewState::default();
        view.visible(1, &players);
        view.visible(1, &players);
        assert_eq!(view.derivations(), 1);

        view.select_sort(SortField::Elo);
        view.visible(1, &players);
        assert_eq!(view.derivations(), 2);

        view.visible(2, &players);
        assert_eq!(view.derivations(), 3);

        view.push_search_char('k');
        view.visible(2, &players);
        view.visible(2, &players);
        assert_eq!(view.derivations(), 4);
    }

    #[test]
    fn selecting_sort_fields() {
        let mut view = ViewState::default();
        assert_eq!(view.filter.sort_field, SortField::Rank);
        assert_eq!(view.filter.sort_direction, SortDirection::Asc);

        view.select_sort(SortField::Rank);
        assert_eq!(view.filter.sort_direction, SortDirection::Desc);

        view.select_sort(SortField::Elo);
        assert_eq!(view.filter.sort_field, SortField::Elo);
        assert_eq!(view.filter.sort_direction, SortDirection::Desc);

        view.select_sort(SortField::Elo);
        assert_eq!(view.filter.sort_direction, SortDirection::Asc);

        view.select_sort(SortField::Clan);
        assert_eq!(view.filter.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn page_size_change_resets_page() {
        let mut view = ViewState::default();
        assert!(view.set_page(3));
        assert!(view.set_page_size(20));
        assert_eq!(view.page, 1);
        assert!(!view.set_page_size(20), "same size is not a change");
    }

    #[test]
    fn page_size_cycle_wraps() {
        let mut view = ViewState::new(10);
        assert_eq!(view.next_page_size(), 20);
        view.set_page_size(50);
        assert_eq!(view.next_page_size(), 10);
        let odd = ViewState::new(7);
        assert_eq!(odd.next_page_size(), 10);
    }

    #[test]
    fn region_filter_cycles_through_all_regions() {
        let mut f = RegionFilter::All;
        let mut seen = Vec::new();
        for _ in 0..4 {
            f = f.next();
            seen.push(f);
        }
        assert_eq!(
            seen,
            vec![
                RegionFilter::Only(Region::Eu),
                RegionFilter::Only(Region::Na),
                RegionFilter::Only(Region::Asia),
                RegionFilter::All,
            ]
        );
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut view = ViewState::default();
        view.select_next(2);
        view.select_next(2);
        assert_eq!(view.selected, 1);
        view.clamp_selection(0);
        assert_eq!(view.selected, 0);
        view.select_prev();
        assert_eq!(view.selected, 0);
    }
}

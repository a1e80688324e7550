pub mod pager;
pub mod theme;
pub mod tier_legend;

pub mod criteria;
pub mod engine;
pub mod factors;
pub mod range;
pub mod shortlist;
pub mod weights;

pub use criteria::{infer_regions, Criteria, RegionLabel, DEFAULT_DEAL_TYPE};
pub use engine::{rank_funds, score_fund, ScoredFund};
pub use factors::{Factor, FactorDetail, Subscore, Subscores};
pub use range::coverage_ratio;
pub use shortlist::{
    rationale_summary, select, shortlist, shortlist_from_path, Rationale, ShortlistEntry,
    DEFAULT_TOP_K, SCORE_THRESHOLD,
};
pub use weights::{Weights, WEIGHTS};

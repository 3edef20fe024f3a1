pub mod dataset;
pub mod fund;
pub mod lenient;
pub mod profile;
pub mod range;

pub use dataset::{FundDataset, InputError};
pub use fund::Fund;
pub use profile::CompanyProfile;
pub use range::ValueRange;

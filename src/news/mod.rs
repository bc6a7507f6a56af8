mod aggregator;
mod data_types;
mod fetcher;
mod timestamp;

pub mod prelude {
    pub use super::aggregator::*;
    pub use super::data_types::*;
    pub use super::fetcher::*;
    pub use super::timestamp::parse_display;
}

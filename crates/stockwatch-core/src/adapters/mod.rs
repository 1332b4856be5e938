//! Price source adapters.

mod fixture;
mod yahoo;

pub use fixture::FixtureSource;
pub use yahoo::YahooSource;

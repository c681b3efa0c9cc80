pub mod growth;
pub mod ratios;
pub mod volatility;

pub use volatility::{
    HistoricalVolatility, ProfileBandVolatility, ReturnFrequency, VolatilityEstimator,
};

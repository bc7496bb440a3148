//! Effects produced by aggregator transitions

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the primary query (zones, border flag)
    FetchFishingData { token: u64, location: String },

    /// Issue the secondary query (weather, forecast, marine, alerts)
    FetchWeather { token: u64, location: String },

    /// Push the current view to observers
    PublishView,
}

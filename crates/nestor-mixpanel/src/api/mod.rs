//! Analytics API access
//!
//! Handlers talk to [`AnalyticsClient`]; [`MixpanelClient`] is the
//! production implementation.

pub mod mixpanel;
pub mod types;

use crate::error::Result;
use crate::time_period::TimePeriod;
use async_trait::async_trait;

pub use mixpanel::MixpanelClient;
pub use types::{EngageResponse, PersonRecord, SegmentationResponse, SeriesData};

/// Query for one event's counts over time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsQuery {
    pub event: String,
    pub period: TimePeriod,
}

/// Query for one event's counts broken down by a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPropertiesQuery {
    pub event: String,
    pub property: String,
    pub period: TimePeriod,
}

/// The analytics service as seen by the command handlers
///
/// An `Ok` value may still carry an API-level `error` field; `Err` means the
/// request itself failed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsClient: Send + Sync {
    /// Fetch user profiles
    async fn engage(&self) -> Result<EngageResponse>;

    /// Fetch an event's counts
    async fn events(&self, query: EventsQuery) -> Result<SegmentationResponse>;

    /// Fetch an event's counts split by a property
    async fn event_properties(&self, query: EventPropertiesQuery)
    -> Result<SegmentationResponse>;
}

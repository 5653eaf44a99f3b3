//! Origin Provider Implementations
//!
//! | Provider | Description |
//! |----------|-------------|
//! | [`StaticFeedOrigin`] | Fixed product feed served after a simulated delay |
//! | [`HttpOrigin`] | Fetches JSON documents from an upstream service |

#[cfg(feature = "origin-http")]
pub mod http;
pub mod static_feed;

#[cfg(feature = "origin-http")]
pub use http::HttpOrigin;
pub use static_feed::StaticFeedOrigin;

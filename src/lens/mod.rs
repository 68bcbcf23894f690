//! Lens module
//!
//! Lenses combine business logic with output formatting so the same view can
//! back the CLI or another front end.
//!
//! | Lens | Purpose |
//! |------|---------|
//! | `RouteLens` | Route table across routing-daemon instances |
//! | `BgpSummaryLens` | BGP session summary across instances |
//!
//! Each lens module exports:
//! - A **Lens struct** (e.g., `RouteLens`) - the entry point for all operations
//! - **Args structs** - input arguments for lens methods
//! - **Output types** - return types of the lens
//!
//! ```rust,ignore
//! use routeview::lens::route::{RouteLens, RouteViewArgs};
//! use routeview::lens::bgp::{BgpSummaryArgs, BgpSummaryLens};
//! use routeview::lens::utils::OutputFormat;
//! ```

pub mod utils;

// RouteLens - route table view
pub mod route;

// BgpSummaryLens - BGP session summary and neighbor names
pub mod bgp;

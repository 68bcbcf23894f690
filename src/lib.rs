#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Routeview - route and BGP session views for multi-instance routers
//!
//! Routeview queries one or more routing-daemon instances (one per ASIC
//! namespace on multi-ASIC platforms), folds their answers into a single
//! view, and renders it as routing-daemon style text or JSON. It can be used
//! as both a command-line application and a library.
//!
//! # Architecture
//!
//! - **[`platform`]**: topology document and namespace enumeration
//! - **[`query`]**: routing stack detection and the query executor seam
//! - **[`lens`]**: high-level views
//!   - `route`: parse, filter, merge and render route tables
//!   - `bgp`: aggregate BGP summaries and resolve neighbor names
//! - **[`config`]**: configuration management
//! - **[`error`]**: error kinds shared by the lenses
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use routeview::lens::route::{RouteLens, RouteViewArgs};
//! use routeview::lens::utils::OutputFormat;
//! use routeview::platform::{enumerate, Topology};
//! use routeview::query::{executor_for, routing_stack};
//! use routeview::RouteviewConfig;
//!
//! let config = RouteviewConfig::new(&None)?;
//! let topology = Topology::load(config.topology_file.as_deref())?;
//! let executor = executor_for(routing_stack(config.routing_stack), config.runner());
//!
//! let args = RouteViewArgs::new().with_display("all");
//! let selection = enumerate(&topology.platform(), args.display.as_deref(), None)?;
//! let lens = RouteLens::new(executor.as_ref(), &topology);
//! println!("{}", lens.show(&args, &selection, OutputFormat::Table)?);
//! ```

pub mod config;
pub mod error;
pub mod lens;
pub mod platform;
pub mod query;

pub use crate::config::RouteviewConfig;
pub use crate::error::RouteviewError;
pub use crate::lens::utils::OutputFormat;

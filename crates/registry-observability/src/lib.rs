//! # Registry Observability
//!
//! Structured logging, metrics, and tracing shared across the schema
//! registry's crates.
//!
//! ## Features
//!
//! - Structured logging with configurable levels
//! - Prometheus metrics collection (`registry_operation_total`,
//!   `registry_cache_hit_total`, `registry_publish_total`, ...)
//! - Distributed tracing support
//! - Health check endpoints
//! - Request tracing middleware
//!
//! ## Example
//!
//! ```rust
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use registry_observability::{init_tracing, register_metrics};
//!
//! // Initialize tracing
//! init_tracing("schema-registry", tracing::Level::INFO)?;
//!
//! // Register metrics
//! register_metrics();
//! # Ok(())
//! # }
//! ```

pub mod logging;
pub mod metrics;
pub mod tracing;
pub mod health;
pub mod middleware;

// Re-export main functions and types
pub use logging::{init_tracing, TracingConfig, LogFormat, Logger, LogLevel, LogSampler, PerformanceLogger};
pub use metrics::{register_metrics, MetricsCollector, HTTP_REQUEST_COUNT as REQUEST_COUNT, HTTP_REQUEST_DURATION_SECONDS as REQUEST_DURATION};
pub use tracing::{TraceId, SpanId, SpanBuilder, Span, TracingMiddleware, TraceContext};
#[cfg(feature = "axum")]
pub use health::{HealthChecker, HealthStatus, HealthResponse, HealthCheckerConfig};
pub use middleware::{ObservabilityLayer, RequestContext, RequestMetrics};

// Conditional exports for axum feature
#[cfg(feature = "axum")]
pub use health::create_health_route;
#[cfg(feature = "axum")]
pub use middleware::axum_middleware;

// Re-export prometheus metrics for convenience
pub use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};

//! Core business logic, independent of the HTTP layer.

/// Per-line and aggregate amount computation with exhaustive item validation
pub mod calculator;
/// Invoice creation (atomic), listing, and status transitions
pub mod invoice;
/// Human-readable invoice number generation with uniqueness retry
pub mod invoice_number;
/// Date-range report aggregation and display formatting
pub mod report;
/// Period-windowed sales totals and chart bucketing
pub mod sales;

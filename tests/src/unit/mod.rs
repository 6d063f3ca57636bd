//! Per-operation unit suites driven against the mocked dependency set,
//! in success/failure case tables.

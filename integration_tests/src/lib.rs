//! End-to-end tests for the simulation workspace live in `tests/`.

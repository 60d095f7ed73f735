//! yd-bench: benchmark-only crate; see `benches/`.

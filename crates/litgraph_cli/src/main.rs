//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `litgraph_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("litgraph_core ping={}", litgraph_core::ping());
    println!("litgraph_core version={}", litgraph_core::core_version());
    println!(
        "litgraph_core schema_version={}",
        litgraph_core::db::migrations::latest_version()
    );
}

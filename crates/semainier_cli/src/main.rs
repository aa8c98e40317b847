//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `semainier_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("semainier_core ping={}", semainier_core::ping());
    println!("semainier_core version={}", semainier_core::core_version());
}

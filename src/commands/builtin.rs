//! Baseline game operations exposed to clients.
//!
//! The game itself is a placeholder: these operations exist to exercise the
//! interpreter with every parameter and result kind.

use tracing::info;

use super::registry::{Registry, RegistryBuilder};

/// Number of tiles along each side of the game grid.
pub const DEFAULT_GRID_SIZE: usize = 30;

/// Renders an empty `size` x `size` grid as newline-joined rows of dots.
pub fn render_grid(size: usize) -> String {
    vec![".".repeat(size); size].join("\n")
}

fn login(name: String) -> i64 {
    info!(player = %name, "login");
    0
}

fn logout() {
    info!("logout");
}

/// Registers the baseline operations on `builder`.
pub fn register_builtins(builder: &mut RegistryBuilder, grid_size: usize) {
    builder
        .register("grid", move || render_grid(grid_size))
        .register("add", |a: f64, b: f64| a + b)
        .register("mult", |a: f64, b: f64| a * b)
        .register("sum", |a: i64, b: i64| a.wrapping_add(b))
        .register("product", |a: i64, b: i64| a.wrapping_mul(b))
        .register("login", login)
        .register("logout", logout);
}

/// Builds a registry holding only the baseline operations.
pub fn builtin_registry(grid_size: usize) -> Registry {
    let mut builder = Registry::builder();
    register_builtins(&mut builder, grid_size);
    builder.build()
}

//! Profiling utilities based on the `puffin` crate.
//!
//! Scopes are always compiled in and cost next to nothing until
//! [`set_enabled`] (or [`init_profiling`]) turns them on.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// Turn scope collection on or off.
pub fn set_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
}

/// Mark the end of one render pass.
///
/// Call this once per pass so puffin groups the scopes by pass.
#[inline]
pub fn finish_pass() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(feature = "profiling")]
mod server {
    use std::sync::OnceLock;

    /// Global profiling server instance.
    static PROFILING_SERVER: OnceLock<puffin_http::Server> = OnceLock::new();

    /// Enable scopes and serve them to `puffin_viewer` on `addr`.
    ///
    /// # Example
    /// ```no_run
    /// use lorecraft_core::profiling::init_profiling;
    ///
    /// init_profiling("0.0.0.0:8585");
    /// ```
    pub fn init_profiling(addr: &str) {
        puffin::set_scopes_on(true);

        match puffin_http::Server::new(addr) {
            Ok(server) => {
                tracing::info!("Puffin profiler server started on http://{}", addr);
                let _ = PROFILING_SERVER.set(server);
            }
            Err(e) => {
                tracing::error!("Failed to start puffin server: {}", e);
            }
        }
    }
}

#[cfg(feature = "profiling")]
pub use server::init_profiling;

//! Shared test helpers

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a tracing subscriber once for the whole test binary
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

use std::io::ErrorKind;

use mbx_types::Container;
use tracing::debug;

/// Delete the summary cache next to `container`, if there is one.
///
/// Returns `true` when a file was removed. Failures are logged and
/// otherwise ignored.
pub fn invalidate_sidecar(container: &Container) -> bool {
    let sidecar = container.sidecar_path();
    match std::fs::remove_file(&sidecar) {
        Ok(()) => {
            debug!(path = %sidecar.display(), "removed stale sidecar");
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            debug!(path = %sidecar.display(), error = %e, "could not remove sidecar");
            false
        }
    }
}

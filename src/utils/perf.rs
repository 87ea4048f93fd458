//! Memory measurement and estimation for dense eigenproblems.
//!
//! Peak RSS is read from /proc/self/status on Linux. The dense matrix estimate
//! is used to warn before a very large allocation is attempted.

/// Dense matrices larger than this trigger a warning before the solve.
pub const LARGE_MATRIX_BYTES: u64 = 1 << 30;

/// Bytes needed to store a dense `dimension × dimension` matrix of `f64`.
pub fn dense_matrix_bytes(dimension: usize) -> u64 {
    let n = dimension as u64;
    n.saturating_mul(n)
        .saturating_mul(std::mem::size_of::<f64>() as u64)
}

/// Logs a warning when a dense matrix of this dimension exceeds
/// [`LARGE_MATRIX_BYTES`]. Returns whether it did.
pub fn warn_if_dense_matrix_is_large(dimension: usize) -> bool {
    let bytes = dense_matrix_bytes(dimension);
    let large = bytes > LARGE_MATRIX_BYTES;
    if large {
        log::warn!(
            "Dense {dimension}x{dimension} operator needs {:.2} GiB; the O(N³) eigendecomposition may take minutes.",
            bytes as f64 / (1u64 << 30) as f64
        );
    }
    large
}

/// Reads the peak resident set size (VmHWM) from /proc/self/status on Linux.
///
/// # Returns
/// The peak memory usage in kilobytes (KB), or 0 if the value cannot be read.
#[cfg(target_os = "linux")]
pub fn get_peak_rss_kb() -> u64 {
    let Ok(status) = std::fs::read_to_string("/proc/self/status") else {
        return 0;
    };
    status
        .lines()
        .find(|line| line.starts_with("VmHWM:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

/// Non-Linux fallback; always 0.
#[cfg(not(target_os = "linux"))]
pub fn get_peak_rss_kb() -> u64 {
    use std::sync::Once;
    static WARN_ONCE: Once = Once::new();
    WARN_ONCE.call_once(|| {
        log::warn!("Peak RSS measurement is only supported on Linux; returning 0.");
    });
    0
}

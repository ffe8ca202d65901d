//! Host platform identification.

/// Substrings marking a Windows toolchain in a platform id.
pub const WINDOWS_MARKERS: [&str; 2] = ["mingw", "mswin"];

/// Check whether a platform id names a Windows toolchain (case-insensitive).
pub fn is_windows_platform(platform_id: &str) -> bool {
    let id = platform_id.to_ascii_lowercase();
    WINDOWS_MARKERS.iter().any(|marker| id.contains(marker))
}

/// Platform id of the running host.
///
/// Non-Windows hosts report `<arch>-<os>` (e.g. `x86_64-linux`). Windows
/// hosts report `<arch>-mingw32` for the GNU environment and
/// `<arch>-mswin64` for MSVC.
pub fn host_platform_id() -> String {
    let arch = std::env::consts::ARCH;

    if cfg!(all(target_os = "windows", target_env = "gnu")) {
        format!("{}-mingw32", arch)
    } else if cfg!(target_os = "windows") {
        format!("{}-mswin64", arch)
    } else {
        format!("{}-{}", arch, std::env::consts::OS)
    }
}

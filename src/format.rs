//! Display formatting helpers for cards and the detail view

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Human-readable file size using base-1024 steps and one decimal.
///
/// Zero means "unknown" to the backend, so it formats as an empty string.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return String::new();
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", size, SIZE_UNITS[unit])
}

/// Compact `W×H` resolution, only when both dimensions are known
pub fn format_resolution(width: Option<u32>, height: Option<u32>) -> Option<String> {
    match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Some(format!("{}×{}", w, h)),
        _ => None,
    }
}

/// Long resolution label for the detail view
pub fn format_resolution_long(width: Option<u32>, height: Option<u32>) -> String {
    match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => format!("{} × {} px", w, h),
        _ => "Unknown".to_string(),
    }
}

/// Coarse license verdict shown in the detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseVerdict {
    Free,
    Restricted,
}

impl LicenseVerdict {
    pub fn label(self) -> &'static str {
        match self {
            LicenseVerdict::Free => "✅ Free to use",
            LicenseVerdict::Restricted => "⚠️ Copyrighted",
        }
    }
}

const FREE_LICENSE_MARKERS: [&str; 5] = ["public domain", "cc0", "cc by", "pd", "no restrictions"];

/// Classify a license string; an empty license counts as free
pub fn classify_license(license: Option<&str>) -> LicenseVerdict {
    let license = license.unwrap_or_default().to_lowercase();
    if license.is_empty() || FREE_LICENSE_MARKERS.iter().any(|m| license.contains(m)) {
        LicenseVerdict::Free
    } else {
        LicenseVerdict::Restricted
    }
}

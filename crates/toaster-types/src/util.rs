use chrono::NaiveDateTime;

use crate::Result;

/// Storage format for timestamps; sorts lexicographically in time order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Image file suffixes produced by the build system, longest first so that
/// `wic.gz` wins over `gz`-less `wic`.
const IMAGE_SUFFIXES: &[&str] = &[
    "ext2.bz2", "ext2.gz", "ext2.lzma", "ext3.gz", "ext4.gz", "tar.bz2", "tar.lz4", "tar.xz",
    "tar.gz", "cpio.gz", "cpio.xz", "cpio.lzma", "cpio.lz4", "wic.bz2", "wic.gz", "wic.xz",
    "wic.lzma", "jffs2.sum", "squashfs-lzo", "squashfs-xz", "squashfs-lz4", "hdddirect",
    "multiubi", "squashfs", "elf", "hddimg", "iso", "jffs2", "btrfs", "cpio", "cramfs", "ext2",
    "ext3", "ext4", "qcow2", "tar", "ubi", "ubifs", "vdi", "vmdk", "wic",
];

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    Ok(NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)?)
}

/// Short date used in table cells: `dd/mm/yy HH:MM`.
pub fn format_short_date(ts: &NaiveDateTime) -> String {
    ts.format("%d/%m/%y %H:%M").to_string()
}

/// Render a number of seconds as `HH:MM:SS`.
pub fn sec_to_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds - hours * 3600) / 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds % 60)
}

/// Human readable file size (`512 bytes`, `1.5 KB`, `3.0 MB`).
pub fn filesizeformat(bytes: i64) -> String {
    const UNITS: &[&str] = &["KB", "MB", "GB", "TB", "PB"];

    if bytes.unsigned_abs() < 1024 {
        return format!("{} byte{}", bytes, pluralize(bytes));
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value.abs() < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}

/// English plural suffix for a count.
pub fn pluralize(count: i64) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Whether a VCS reference is a full 40 character commit id.
pub fn is_shaid(reference: &str) -> bool {
    reference.len() == 40 && reference.chars().all(|c| c.is_ascii_hexdigit())
}

/// Truncate to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Known image suffix of an image file name, e.g. `ext4` or `tar.bz2`.
pub fn image_file_suffix(file_name: &str) -> Option<&'static str> {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    IMAGE_SUFFIXES
        .iter()
        .filter(|suffix| {
            base.len() > suffix.len()
                && base.ends_with(*suffix)
                && base.as_bytes()[base.len() - suffix.len() - 1] == b'.'
        })
        .max_by_key(|suffix| suffix.len())
        .copied()
}

/// Sorted, de-duplicated image suffixes joined for display.
pub fn image_file_extensions<'a>(file_names: impl IntoIterator<Item = &'a str>) -> String {
    let mut suffixes: Vec<&str> = file_names.into_iter().filter_map(image_file_suffix).collect();
    suffixes.sort_unstable();
    suffixes.dedup();
    suffixes.join(", ")
}

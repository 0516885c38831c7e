//! Disk-health attribute remap.
//!
//! collectd's smart plugin reports attributes under libatasmart slugs
//! (`power-on-hours`). Dashboards key on smartmontools names, so the label
//! value is translated here. Lookup is exact; unknown slugs pass through
//! unchanged.
//!
//! The summary suffixes produced by the type rewrite (`poweron`, ...) must
//! not map onto an attribute's display name: the plugin reports both, and
//! they would render as duplicate series.

const DISK_HEALTH_ATTRIBUTES: &[(&str, &str)] = &[
    ("raw-read-error-rate", "Raw_Read_Error_Rate"),
    ("throughput-performance", "Throughput_Performance"),
    ("spin-up-time", "Spin_Up_Time"),
    ("start-stop-count", "Start_Stop_Count"),
    ("reallocated-sector-count", "Reallocated_Sector_Ct"),
    ("seek-error-rate", "Seek_Error_Rate"),
    ("power-on-hours", "Power_On_Hours"),
    ("spin-retry-count", "Spin_Retry_Count"),
    ("power-cycle-count", "Power_Cycle_Count"),
    ("power-off-retract-count", "Power-Off_Retract_Count"),
    ("load-cycle-count", "Load_Cycle_Count"),
    ("temperature-celsius-2", "Temperature_Celsius"),
    ("current-pending-sector", "Current_Pending_Sector"),
    ("offline-uncorrectable", "Offline_Uncorrectable"),
    ("udma-crc-error-count", "UDMA_CRC_Error_Count"),
];

/// Canonical display name for a disk-health attribute slug, if known.
pub fn display_name(slug: &str) -> Option<&'static str> {
    DISK_HEALTH_ATTRIBUTES
        .iter()
        .find(|(k, _)| *k == slug)
        .map(|(_, v)| *v)
}


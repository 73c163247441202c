//! Method names understood by the antivirus service.

/// Query whether real-time protection is on. Response body: `ProtectionStatus`.
pub const IS_PROTECTION_ENABLED: &str = "IsProtectionEnabled";
pub const ENABLE_PROTECTION: &str = "EnableProtection";
pub const DISABLE_PROTECTION: &str = "DisableProtection";

/// Start scanning a path. Request body: `ScanRequest`.
pub const START_SCAN: &str = "StartScan";
pub const PAUSE_SCAN: &str = "PauseScan";
pub const RESUME_SCAN: &str = "ResumeScan";
pub const STOP_SCAN: &str = "StopScan";

/// Snapshot of scanner progress. Response body: `ScannerCache`.
pub const GET_SCANNER_CACHE: &str = "GetScannerCache";

/// Out-of-band failure report. Body: `ErrorDetail`.
pub const ERROR: &str = "Error";

/// Every method in the protocol.
pub const ALL: [&str; 9] = [
    IS_PROTECTION_ENABLED,
    ENABLE_PROTECTION,
    DISABLE_PROTECTION,
    START_SCAN,
    PAUSE_SCAN,
    RESUME_SCAN,
    STOP_SCAN,
    GET_SCANNER_CACHE,
    ERROR,
];

/// Methods whose messages never carry a body.
pub const BODYLESS: [&str; 5] = [
    ENABLE_PROTECTION,
    DISABLE_PROTECTION,
    PAUSE_SCAN,
    RESUME_SCAN,
    STOP_SCAN,
];

/// Returns true if `method` is part of the protocol.
pub fn is_known(method: &str) -> bool {
    ALL.iter().any(|known| *known == method)
}

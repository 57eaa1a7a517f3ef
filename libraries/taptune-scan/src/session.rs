//! Reader session state machine
//!
//! Tracks hardware support, scan activity, and permission standing for a
//! tag reader, and folds reader outcomes into a single consistent
//! snapshot that observers can render directly.

use serde::{Deserialize, Serialize};
use taptune_core::ReaderError;

/// Whether the reader hardware is usable on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportState {
    /// Support has not been probed yet
    Unknown,
    /// The reader reported itself usable
    Supported,
    /// The reader is missing or disabled
    Unsupported,
}

/// Whether a scan is currently armed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    /// No scan in progress
    Idle,
    /// The reader is armed and delivering tag reads
    Scanning,
}

/// Standing of the reader permission grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Never asked, or reset after a settings change
    Unknown,
    /// The user granted reader access
    Granted,
    /// The user denied reader access
    Denied,
}

/// Single user-facing summary of the session
///
/// Precedence runs from the most to the least restrictive condition, so
/// a denied permission shows through even while a stale scan flag is
/// still set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Reader hardware is unavailable
    Unsupported,
    /// Reader access was denied
    Denied,
    /// A scan is armed
    Scanning,
    /// Ready to start a scan
    Idle,
}

/// Point-in-time view of the reader session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Hardware support standing
    pub support: SupportState,

    /// Scan activity
    pub scan: ScanState,

    /// Permission standing
    pub permission: PermissionState,

    /// Most recent reader error, if any
    pub last_error: Option<String>,
}

impl SessionSnapshot {
    /// Collapse the snapshot into a single phase
    pub fn phase(&self) -> SessionPhase {
        if self.support == SupportState::Unsupported {
            return SessionPhase::Unsupported;
        }
        if self.permission == PermissionState::Denied {
            return SessionPhase::Denied;
        }
        if self.scan == ScanState::Scanning {
            return SessionPhase::Scanning;
        }
        SessionPhase::Idle
    }
}

/// Reader session state machine
///
/// All transitions are driven by reader outcomes; the session never
/// talks to the hardware itself.
#[derive(Debug, Clone)]
pub struct ReaderSession {
    support: SupportState,
    scan: ScanState,
    permission: PermissionState,
    last_error: Option<String>,
}

impl ReaderSession {
    /// Create a fresh session with nothing probed yet
    pub fn new() -> Self {
        Self {
            support: SupportState::Unknown,
            scan: ScanState::Idle,
            permission: PermissionState::Unknown,
            last_error: None,
        }
    }

    /// Get a snapshot of the current state
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            support: self.support,
            scan: self.scan,
            permission: self.permission,
            last_error: self.last_error.clone(),
        }
    }

    /// Fold in the outcome of a support probe
    ///
    /// A probe failure counts as unsupported; a successful probe clears
    /// any stale error from an earlier attempt.
    pub fn apply_probe(&mut self, outcome: Result<bool, ReaderError>) {
        match outcome {
            Ok(true) => {
                self.support = SupportState::Supported;
                self.last_error = None;
            }
            Ok(false) => {
                self.support = SupportState::Unsupported;
            }
            Err(err) => {
                self.support = SupportState::Unsupported;
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Whether a start attempt is currently worthwhile
    pub fn can_start(&self) -> bool {
        self.support == SupportState::Supported
            && self.permission != PermissionState::Denied
            && self.scan != ScanState::Scanning
    }

    /// Fold in the outcome of a start attempt
    pub fn apply_start_outcome(&mut self, outcome: Result<(), ReaderError>) {
        match outcome {
            Ok(()) => {
                self.scan = ScanState::Scanning;
                self.permission = PermissionState::Granted;
                self.last_error = None;
            }
            // The reader was already armed from before; treat it as ours
            Err(ReaderError::AlreadyScanning) => {
                self.scan = ScanState::Scanning;
                self.permission = PermissionState::Granted;
                self.last_error = None;
            }
            // Prompt still open; the user may yet grant it
            Err(err @ ReaderError::PermissionPending) => {
                self.last_error = Some(err.to_string());
            }
            Err(err @ ReaderError::PermissionDenied) => {
                self.permission = PermissionState::Denied;
                self.last_error = Some(err.to_string());
            }
            Err(err @ ReaderError::Unsupported) => {
                self.support = SupportState::Unsupported;
                self.last_error = Some(err.to_string());
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Fold in a completed stop
    pub fn apply_stop(&mut self) {
        self.scan = ScanState::Idle;
        self.last_error = None;
    }

    /// Fold in an error delivered mid-scan
    ///
    /// Only a reported stop ends the scan; transient read failures leave
    /// the reader armed for the next tag.
    pub fn apply_reader_error(&mut self, err: &ReaderError) {
        self.last_error = Some(err.to_string());
        if matches!(err, ReaderError::Stopped) {
            self.scan = ScanState::Idle;
        }
    }

    /// Forget a previous denial after the user changed settings
    pub fn permission_changed(&mut self) {
        if self.permission == PermissionState::Denied {
            self.permission = PermissionState::Unknown;
            self.last_error = None;
        }
    }
}

impl Default for ReaderSession {
    fn default() -> Self {
        Self::new()
    }
}

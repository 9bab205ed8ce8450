// src/watch/reconcile.rs
//! Startup check against the channel.
//!
//! After a restart the cache is empty, so the first cycle only records
//! baselines. If the file changed while the process was down, the only
//! evidence is the channel: its last message names the last file posted.

/// The part of a value after its last `/` (the whole value when there is none).
pub fn file_name(value: &str) -> &str {
    value.rsplit('/').next().unwrap_or(value)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileDecision {
    /// Channel unreadable or empty; nothing to compare against.
    NoMessage,
    InSync,
    /// The channel's last file is not the current one: post it.
    Mismatch { file_name: String, acknowledged: String },
}

/// Compare a cached value with the channel's last acknowledgment.
pub fn reconcile(cached: &str, acknowledged: Option<&str>) -> ReconcileDecision {
    let Some(ack) = acknowledged.filter(|a| !a.is_empty()) else {
        return ReconcileDecision::NoMessage;
    };

    let current = file_name(cached);
    if file_name(ack) == current {
        ReconcileDecision::InSync
    } else {
        ReconcileDecision::Mismatch { file_name: s!(current), acknowledged: s!(ack) }
    }
}

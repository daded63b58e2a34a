#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` gives the home directory provisioning crates a stable set of
//! diagnostic targets on top of the [`tracing`] ecosystem. The copy engine
//! emits one event per filesystem entry it touches; collaborators that want to
//! log, audit, or count those events install a `tracing` subscriber and filter
//! on the targets declared here instead of parsing message text.
//!
//! # Design
//!
//! The crate only defines macros. Each macro forwards to the corresponding
//! `tracing` macro with a fixed `target:` so the event stream stays stable
//! even when call sites move between modules:
//!
//! - `treecopy::walk`: directory enumeration (debug level).
//! - `treecopy::copy`: per-entry progress (trace level).
//! - `treecopy::entry`: per-entry failures (warn level). A tree copy does
//!   not stop on the first failed entry, so this target is the only place
//!   where the identity of every failed entry is visible.
//!
//! # Examples
//!
//! Install any `tracing` subscriber and filter on the targets:
//!
//! ```
//! use logging::warn_entry;
//!
//! warn_entry!("failed to copy '/src/skel/.profile': permission denied");
//! ```

/// Emit a directory enumeration trace.
///
/// # Example
/// ```ignore
/// trace_walk!("enumerating {:?}", source_dir);
/// ```
#[macro_export]
macro_rules! trace_walk {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "treecopy::walk", $($arg)*);
    };
}

/// Emit a per-entry copy progress trace.
///
/// # Example
/// ```ignore
/// trace_copy!("copying {:?} -> {:?}", source, destination);
/// ```
#[macro_export]
macro_rules! trace_copy {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "treecopy::copy", $($arg)*);
    };
}

/// Emit a per-entry failure diagnostic.
///
/// The walker records the failure and keeps enumerating siblings, so this
/// event is the durable record of which entry failed and why.
///
/// # Example
/// ```ignore
/// warn_entry!("{}", error);
/// ```
#[macro_export]
macro_rules! warn_entry {
    ($($arg:tt)*) => {
        ::tracing::warn!(target: "treecopy::entry", $($arg)*);
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_expand_without_a_subscriber() {
        crate::trace_walk!("walking {}", "somewhere");
        crate::trace_copy!("copying {} entries", 3);
        crate::warn_entry!("entry failed: {}", "synthetic");
    }
}

//! Effectful invocation shell using Stillwater 0.11.0.
//!
//! The engine and history reader are plain functions over a borrowed
//! ledger. This module is the "imperative shell" around them: a ledger
//! shared between tasks becomes the effect environment, and each
//! invocation is an effect that locks it for the duration of one
//! transaction.
//!
//! Following Stillwater 0.11.0 conventions, invocations are returned as
//! `BoxedEffect` built from the free-standing `from_fn()`/`fail()`
//! constructors.

mod shell;

pub use shell::{invoke, invoke_named, SharedLedger};

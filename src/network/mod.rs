// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Network interception
//!
//! The fetch entry point abstraction, the hook that replaces it, the stream
//! duplicator the hook routes matching responses through, and the relay
//! that forwards captured payloads.

mod duplicator;
mod fetch;
mod hook;
mod relay;

#[cfg(test)]
pub(crate) mod testing;

pub use duplicator::{duplicate, DrainOutcome, Duplicated, PayloadSink};
pub use fetch::Fetch;
pub use hook::InterceptionHook;
pub use relay::{Envelope, Relay};

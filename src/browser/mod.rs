// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Page host environment
//!
//! A [`Page`] owns the fetch entry point its calls go through and the
//! address it is currently showing.

mod location;
mod page;

pub use location::Location;
pub use page::Page;

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod session;
pub mod wheel;

pub use session::{
    AthleteProfile, SessionPayload, StoredSession, TokenExchangeResponse, TokenPayload,
};
pub use wheel::{WheelSettings, WheelSettingsPatch};

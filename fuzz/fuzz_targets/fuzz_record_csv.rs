// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
//! Feed arbitrary bytes to the record parsers

#![no_main]

use gridreach::loader::parse_records;
use gridreach::types::{City, Connection};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing must never panic, whatever the input
    let _ = parse_records::<City, _>(data);
    let _ = parse_records::<Connection, _>(data);
});

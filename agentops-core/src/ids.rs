// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Identifier and clock helpers.

use rand::Rng;

/// Generate an opaque, unique identifier.
///
/// Random bits first, millisecond timestamp last, both hex encoded. Ids are
/// only compared for equality, never parsed.
pub fn generate_id() -> String {
    let random_bits: u64 = rand::thread_rng().gen();
    format!("{:016x}{:x}", random_bits, now_millis())
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_id_is_hex() {
        let id = generate_id();
        assert!(id.len() > 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_now_millis_is_recent() {
        // 2024-01-01T00:00:00Z
        assert!(now_millis() > 1_704_067_200_000);
    }
}

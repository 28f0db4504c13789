//! MAC addresses identifying the NICs of a workstation.
//!
//! Addresses are stored normalized: twelve uppercase hex digits without
//! separators. Construction goes through `normalize`, so every stored
//! address has an even length and splits cleanly into byte pairs.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NicType {
    Ethernet,
    Wireless,
    Other,
}

impl NicType {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            NicType::Ethernet => "ethernet",
            NicType::Wireless => "wireless",
            NicType::Other => "other",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "ethernet" => Some(NicType::Ethernet),
            "wireless" => Some(NicType::Wireless),
            "other" => Some(NicType::Other),
            _ => None,
        }
    }

    /// Helper: parse CLI input (case-insensitive)
    pub fn from_code(code: &str) -> Option<Self> {
        NicType::from_db_str(&code.to_lowercase())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MacAddress {
    pub id: i64,
    pub workstation_id: i64,
    pub address: String,
    pub nic: NicType,
}

impl MacAddress {
    /// Normalize a raw MAC address string.
    ///
    /// Accepts the usual notations (`aa:bb:cc:dd:ee:ff`, `AA-BB-CC-DD-EE-FF`,
    /// `aabb.ccdd.eeff`, bare hex). Returns `None` unless exactly twelve hex
    /// digits remain once separators are stripped.
    pub fn normalize(raw: &str) -> Option<String> {
        let hex: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.' | ' '))
            .collect::<String>()
            .to_uppercase();

        if hex.len() == 12 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(hex)
        } else {
            None
        }
    }

    /// The address with `separator` between each hexadecimal pair.
    pub fn address_with_separators(&self, separator: &str) -> String {
        with_separators(&self.address, separator)
    }
}

/// Join the two-character groups of a normalized address with `separator`.
pub fn with_separators(address: &str, separator: &str) -> String {
    address
        .as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8_lossy(pair).into_owned())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(raw: &str) -> MacAddress {
        MacAddress {
            id: 1,
            workstation_id: 1,
            address: MacAddress::normalize(raw).expect("valid mac"),
            nic: NicType::Ethernet,
        }
    }

    #[test]
    fn normalize_strips_separators_and_uppercases() {
        assert_eq!(
            MacAddress::normalize("00:1a:2b:3c:4d:5e").as_deref(),
            Some("001A2B3C4D5E")
        );
        assert_eq!(
            MacAddress::normalize("00-1A-2B-3C-4D-5E").as_deref(),
            Some("001A2B3C4D5E")
        );
        assert_eq!(
            MacAddress::normalize("001a.2b3c.4d5e").as_deref(),
            Some("001A2B3C4D5E")
        );
    }

    #[test]
    fn normalize_rejects_bad_input() {
        assert!(MacAddress::normalize("00:1a:2b:3c:4d").is_none());
        assert!(MacAddress::normalize("00:1a:2b:3c:4d:5g").is_none());
        assert!(MacAddress::normalize("").is_none());
    }

    #[test]
    fn separators_split_into_six_groups() {
        let m = mac("001A2B3C4D5E");

        for sep in [":", "-", "|"] {
            let formatted = m.address_with_separators(sep);
            assert_eq!(formatted.matches(sep).count(), 5);

            let groups: Vec<&str> = formatted.split(sep).collect();
            assert_eq!(groups.len(), 6);
            assert!(groups.iter().all(|g| g.len() == 2));
        }

        assert_eq!(m.address_with_separators(":"), "00:1A:2B:3C:4D:5E");
    }
}

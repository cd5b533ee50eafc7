//! Logical qubit role derivation.

use serde::{Deserialize, Serialize};

/// Role of a logical qubit, derived from its name.
///
/// "data" and "magic" qubits are born active and have home positions
/// tracked by move-back; the remaining roles are born inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Data,
    Magic,
    Ancilla,
    Syndrome,
    Dummy,
    /// Name did not match any recognized role prefix.
    Other,
}

impl Role {
    /// Derives a role from a logical qubit name by stripping an optional
    /// `"LQ<digits>-"` register prefix, then trailing digits, then a
    /// trailing bracketed index (`"[...]"`), and matching the remainder
    /// against the known role prefixes.
    pub fn from_name(name: &str) -> Self {
        let stripped = strip_register_prefix(name);
        let stripped = strip_bracket_suffix(stripped);
        let base = strip_trailing_digits(stripped);

        match base {
            "data" => Role::Data,
            "magic" => Role::Magic,
            "ancilla" => Role::Ancilla,
            "syndrome" => Role::Syndrome,
            "dummy" => Role::Dummy,
            _ => Role::Other,
        }
    }

    /// True for roles that start active and are tracked by move-back.
    pub fn starts_active(self) -> bool {
        matches!(self, Role::Data | Role::Magic)
    }
}

fn strip_register_prefix(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix("LQ") {
        if let Some(dash) = rest.find('-') {
            let (digits, after_dash) = rest.split_at(dash);
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return &after_dash[1..];
            }
        }
    }
    name
}

fn strip_bracket_suffix(name: &str) -> &str {
    if name.ends_with(']') {
        if let Some(open) = name.rfind('[') {
            return &name[..open];
        }
    }
    name
}

fn strip_trailing_digits(name: &str) -> &str {
    name.trim_end_matches(|c: char| c.is_ascii_digit())
}

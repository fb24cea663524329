//! RISC-V privilege modes.

use std::fmt;

/// RISC-V privilege mode levels.
///
/// The discriminants match the architectural encoding used in `mstatus.MPP`,
/// so modes can be compared directly for delegation decisions (a trap is
/// delegable only when the previous mode is at most Supervisor).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrivilegeMode {
    /// User mode (U), the lowest privilege level.
    User = 0,
    /// Supervisor mode (S), where the guest kernel runs.
    Supervisor = 1,
    /// Machine mode (M), the reset and firmware level.
    Machine = 3,
}

impl PrivilegeMode {
    /// Returns the human-readable name of the mode.
    pub fn name(self) -> &'static str {
        match self {
            PrivilegeMode::User => "User",
            PrivilegeMode::Supervisor => "Supervisor",
            PrivilegeMode::Machine => "Machine",
        }
    }
}

impl fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

//! Run statistics collection and reporting.
//!
//! A small set of counters maintained by the tick loop: retired
//! instructions, traps, and the interrupt subset of those traps. Reported
//! to stderr at the end of a run so the guest console on stdout stays
//! clean.

use std::time::Instant;

/// Counters accumulated over one emulator run.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Number of instruction cycles completed.
    pub instructions_retired: u64,
    /// Number of traps delivered (exceptions and interrupts).
    pub traps_taken: u64,
    /// Number of interrupts delivered.
    pub interrupts_taken: u64,
}

impl SimStats {
    /// Prints the counters and effective emulation speed to stderr.
    pub fn print(&self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let mips = if elapsed > 0.0 {
            self.instructions_retired as f64 / elapsed / 1.0e6
        } else {
            0.0
        };
        eprintln!(
            "instructions: {}  traps: {}  interrupts: {}  ({:.2} MIPS)",
            self.instructions_retired, self.traps_taken, self.interrupts_taken, mips
        );
    }
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            instructions_retired: 0,
            traps_taken: 0,
            interrupts_taken: 0,
        }
    }
}

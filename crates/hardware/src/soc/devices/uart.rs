//! 16550-style UART.
//!
//! A minimal serial port wired to the host terminal: stores to THR go
//! straight to stdout, and a background thread feeds stdin bytes into RHR
//! one at a time. The 256-byte register window is shared between the CPU
//! thread and the reader thread behind a single mutex; a condition variable
//! signals the reader when the guest has consumed the RX byte, and an atomic
//! latch records that an RX interrupt is owed.
//!
//! Register offsets follow the 16550 layout the guest expects. The transmit
//! side never backpressures, so LSR.TX stays set.

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;

use crate::common::Exception;
use crate::common::constants::{UART_BASE, UART_SIZE};

/// Receive holding register (guest reads input bytes here).
pub const UART_RHR: u64 = UART_BASE;

/// Transmit holding register (guest writes output bytes here).
pub const UART_THR: u64 = UART_BASE;

/// Line control register.
pub const UART_LCR: u64 = UART_BASE + 3;

/// Line status register.
pub const UART_LSR: u64 = UART_BASE + 5;

/// LSR bit 0: a received byte is waiting in RHR.
pub const UART_LSR_RX: u8 = 1;

/// LSR bit 5: the transmitter can accept a byte (always set here).
pub const UART_LSR_TX: u8 = 1 << 5;

/// Shared UART register window, one byte per 16550 register.
type Registers = Arc<(Mutex<[u8; UART_SIZE as usize]>, Condvar)>;

/// 16550-style UART with a background stdin reader.
pub struct Uart {
    regs: Registers,
    interrupting: Arc<AtomicBool>,
}

impl Uart {
    /// Creates the UART and spawns the stdin reader thread.
    ///
    /// The reader blocks on one byte of stdin at a time, then waits until
    /// the guest has drained RHR before depositing it. It exits when stdin
    /// reaches end of file.
    pub fn new() -> Self {
        let regs: Registers = Arc::new((Mutex::new([0; UART_SIZE as usize]), Condvar::new()));
        let interrupting = Arc::new(AtomicBool::new(false));

        {
            let (lock, _) = &*regs;
            let mut regs = lock.lock().unwrap_or_else(PoisonError::into_inner);
            regs[(UART_LSR - UART_BASE) as usize] |= UART_LSR_TX;
        }

        let reader_regs = Arc::clone(&regs);
        let reader_interrupting = Arc::clone(&interrupting);
        thread::spawn(move || {
            let mut byte = [0u8; 1];
            let stdin = io::stdin();
            let mut handle = stdin.lock();
            while handle.read_exact(&mut byte).is_ok() {
                let (lock, cvar) = &*reader_regs;
                let mut regs = lock.lock().unwrap_or_else(PoisonError::into_inner);
                while regs[(UART_LSR - UART_BASE) as usize] & UART_LSR_RX == 1 {
                    regs = cvar.wait(regs).unwrap_or_else(PoisonError::into_inner);
                }
                regs[0] = byte[0];
                reader_interrupting.store(true, Ordering::Release);
                regs[(UART_LSR - UART_BASE) as usize] |= UART_LSR_RX;
            }
        });

        Self { regs, interrupting }
    }

    /// Loads `size` bits at the absolute address `addr`.
    ///
    /// Only 8-bit accesses are decoded. Reading RHR wakes the reader thread
    /// and clears LSR.RX; other offsets return the register byte.
    pub fn load(&self, addr: u64, size: u64) -> Result<u64, Exception> {
        if size != 8 {
            return Err(Exception::LoadAccessFault);
        }
        let (lock, cvar) = &*self.regs;
        let mut regs = lock.lock().unwrap_or_else(PoisonError::into_inner);
        match addr {
            UART_RHR => {
                cvar.notify_all();
                regs[(UART_LSR - UART_BASE) as usize] &= !UART_LSR_RX;
                Ok(u64::from(regs[0]))
            }
            _ => Ok(u64::from(regs[(addr - UART_BASE) as usize])),
        }
    }

    /// Stores `size` bits of `value` at the absolute address `addr`.
    ///
    /// Only 8-bit accesses are decoded. A store to THR writes the raw byte
    /// to host stdout and flushes; other offsets update the register byte.
    pub fn store(&mut self, addr: u64, size: u64, value: u64) -> Result<(), Exception> {
        if size != 8 {
            return Err(Exception::StoreAmoAccessFault);
        }
        let (lock, _) = &*self.regs;
        let mut regs = lock.lock().unwrap_or_else(PoisonError::into_inner);
        match addr {
            UART_THR => {
                let mut out = io::stdout().lock();
                let _ = out.write_all(&[value as u8]);
                let _ = out.flush();
            }
            _ => regs[(addr - UART_BASE) as usize] = value as u8,
        }
        Ok(())
    }

    /// Atomically reads and clears the RX interrupt latch.
    pub fn is_interrupting(&self) -> bool {
        self.interrupting.swap(false, Ordering::Acquire)
    }
}

impl Default for Uart {
    fn default() -> Self {
        Self::new()
    }
}

//! System bus.
//!
//! Routes guest-physical loads and stores to the device claiming the
//! address. The five attached components are a closed set, so dispatch is a
//! plain range check in fixed order rather than a device table: CLINT, PLIC,
//! UART, VirtIO, then DRAM for everything at or above `DRAM_BASE`. Anything
//! else is an access fault.
//!
//! The bus also hosts the VirtIO descriptor pump, since serving a disk
//! request needs both the device state and DMA access to guest memory.

use tracing::{error, trace};

use crate::common::Exception;
use crate::common::constants::{
    CLINT_BASE, CLINT_SIZE, DRAM_BASE, PLIC_BASE, PLIC_SIZE, UART_BASE, UART_SIZE, VIRTIO_BASE,
    VIRTIO_SIZE,
};
use crate::soc::devices::virtio::{DESC_NUM, VRING_DESC_SIZE};
use crate::soc::devices::{Clint, Plic, Uart, Virtio};
use crate::soc::memory::Dram;

/// System bus owning DRAM and the four MMIO devices.
pub struct Bus {
    /// Emulated DRAM.
    pub dram: Dram,
    /// CLINT timer block.
    pub clint: Clint,
    /// Platform-level interrupt controller.
    pub plic: Plic,
    /// Serial port.
    pub uart: Uart,
    /// VirtIO block device.
    pub virtio: Virtio,
}

impl Bus {
    /// Creates the bus around preloaded DRAM and VirtIO devices; the CLINT,
    /// PLIC, and UART start at their reset state.
    pub fn new(dram: Dram, virtio: Virtio) -> Self {
        Self {
            dram,
            clint: Clint::new(),
            plic: Plic::new(),
            uart: Uart::new(),
            virtio,
        }
    }

    /// Loads `size` bits at guest-physical `addr`, dispatching by range.
    ///
    /// Addresses outside every mapped range are a load access fault.
    pub fn load(&mut self, addr: u64, size: u64) -> Result<u64, Exception> {
        if (CLINT_BASE..CLINT_BASE + CLINT_SIZE).contains(&addr) {
            return self.clint.load(addr, size);
        }
        if (PLIC_BASE..PLIC_BASE + PLIC_SIZE).contains(&addr) {
            return self.plic.load(addr, size);
        }
        if (UART_BASE..UART_BASE + UART_SIZE).contains(&addr) {
            return self.uart.load(addr, size);
        }
        if (VIRTIO_BASE..VIRTIO_BASE + VIRTIO_SIZE).contains(&addr) {
            return self.virtio.load(addr, size);
        }
        if addr >= DRAM_BASE {
            return self.dram.load(addr, size);
        }
        Err(Exception::LoadAccessFault)
    }

    /// Stores `size` bits of `value` at guest-physical `addr`.
    ///
    /// Addresses outside every mapped range are a store/AMO access fault.
    pub fn store(&mut self, addr: u64, size: u64, value: u64) -> Result<(), Exception> {
        if (CLINT_BASE..CLINT_BASE + CLINT_SIZE).contains(&addr) {
            return self.clint.store(addr, size, value);
        }
        if (PLIC_BASE..PLIC_BASE + PLIC_SIZE).contains(&addr) {
            return self.plic.store(addr, size, value);
        }
        if (UART_BASE..UART_BASE + UART_SIZE).contains(&addr) {
            return self.uart.store(addr, size, value);
        }
        if (VIRTIO_BASE..VIRTIO_BASE + VIRTIO_SIZE).contains(&addr) {
            return self.virtio.store(addr, size, value);
        }
        if addr >= DRAM_BASE {
            return self.dram.store(addr, size, value);
        }
        Err(Exception::StoreAmoAccessFault)
    }

    /// Serves one queued disk request.
    ///
    /// Runs when the CPU observes a pending notify between instructions. A
    /// bus fault while walking the rings means the guest handed the device a
    /// corrupt virtqueue; that is not survivable, so the process terminates.
    pub fn disk_access(&mut self) {
        if let Err(e) = self.try_disk_access() {
            error!(error = %e, "virtqueue DMA transfer failed");
            std::process::exit(1);
        }
    }

    /// Walks the descriptor chain and performs the data transfer.
    fn try_disk_access(&mut self) -> Result<(), Exception> {
        let desc_addr = self.virtio.desc_addr();
        let avail_addr = desc_addr + 0x40;
        let used_addr = desc_addr + 4096;

        // The ring index is read at avail + 1, exactly as the guest driver
        // under test expects it.
        let offset = self.load(avail_addr + 1, 16)?;
        let index = self.load(avail_addr + (offset % DESC_NUM) + 2, 16)?;

        // Head descriptor: buffer address of the request header, and the
        // link to the data descriptor.
        let desc_addr0 = desc_addr + VRING_DESC_SIZE * index;
        let addr0 = self.load(desc_addr0, 64)?;
        let next0 = self.load(desc_addr0 + 14, 16)?;

        // Data descriptor: buffer address, length, and direction flags.
        let desc_addr1 = desc_addr + VRING_DESC_SIZE * next0;
        let addr1 = self.load(desc_addr1, 64)?;
        let len1 = self.load(desc_addr1 + 8, 32)?;
        let flags1 = self.load(desc_addr1 + 12, 16)?;

        // Sector field of the virtio_blk request header.
        let blk_sector = self.load(addr0 + 8, 64)?;

        if flags1 & 2 == 0 {
            trace!(sector = blk_sector, len = len1, "disk write");
            for i in 0..len1 {
                let data = self.load(addr1 + i, 8)?;
                self.virtio.disk_write(blk_sector * 512 + i, data);
            }
        } else {
            trace!(sector = blk_sector, len = len1, "disk read");
            for i in 0..len1 {
                let data = self.virtio.disk_read(blk_sector * 512 + i);
                self.store(addr1 + i, 8, data)?;
            }
        }

        let new_id = self.virtio.new_id();
        self.store(used_addr + 2, 16, new_id % DESC_NUM)
    }
}

//! Mock register interface for testing the drivers without a bus

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;
use device_driver::RegisterInterface;
use i2c_regfield::Addressed;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Records operations performed on the mock interface
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Register read
    Read {
        /// First register address
        address: u8,
        /// Number of bytes read
        len: usize,
    },
    /// Register write
    Write {
        /// First register address
        address: u8,
        /// Bytes written
        data: Vec<u8>,
    },
}

/// Shared state for mock interface (uses interior mutability)
#[derive(Debug, Default)]
struct MockState {
    /// Simulated register file; multi-byte transfers use consecutive addresses
    registers: HashMap<u8, u8>,

    /// Whole registers per address, for devices whose registers are wider than a byte
    words: HashMap<u8, Vec<u8>>,
    word_addressed: bool,

    /// Operations log for verification
    operations: Vec<Operation>,

    /// Failure injection flags
    fail_next_read: bool,
    fail_next_write: bool,
    failing_reads: HashSet<u8>,

    /// Register updates applied once a number of reads at that address have happened
    scheduled: Vec<ScheduledWrite>,
}

#[derive(Debug)]
struct ScheduledWrite {
    address: u8,
    reads_left: usize,
    value: u8,
}

/// Mock interface for testing
#[derive(Clone)]
pub struct MockInterface {
    state: Rc<RefCell<MockState>>,
    device: u8,
}

impl MockInterface {
    /// Create an empty register file for the device at `device`
    pub fn new(device: u8) -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState::default())),
            device,
        }
    }

    /// Create a register file where each address holds a whole multi-byte register
    pub fn word_addressed(device: u8) -> Self {
        let interface = Self::new(device);
        interface.state.borrow_mut().word_addressed = true;
        interface
    }

    /// Set a whole register (word-addressed mode)
    pub fn set_word(&self, address: u8, bytes: &[u8]) {
        self.state
            .borrow_mut()
            .words
            .insert(address, bytes.to_vec());
    }

    /// Get a whole register (word-addressed mode, empty if never written)
    pub fn word(&self, address: u8) -> Vec<u8> {
        self.state
            .borrow()
            .words
            .get(&address)
            .cloned()
            .unwrap_or_default()
    }

    /// Set a register value
    pub fn set_register(&self, address: u8, value: u8) {
        self.state.borrow_mut().registers.insert(address, value);
    }

    /// Set consecutive registers starting at `address`
    pub fn set_registers(&self, address: u8, values: &[u8]) {
        let mut state = self.state.borrow_mut();
        for (offset, &value) in values.iter().enumerate() {
            state
                .registers
                .insert(address.wrapping_add(offset as u8), value);
        }
    }

    /// Get a register value (0 if never written)
    pub fn register(&self, address: u8) -> u8 {
        self.state
            .borrow()
            .registers
            .get(&address)
            .copied()
            .unwrap_or(0)
    }

    /// Set `address` to `value` after `reads` more reads at `address`
    pub fn set_register_after_reads(&self, address: u8, reads: usize, value: u8) {
        self.state.borrow_mut().scheduled.push(ScheduledWrite {
            address,
            reads_left: reads,
            value,
        });
    }

    /// Inject a read failure on the next read operation
    pub fn fail_next_read(&self) {
        self.state.borrow_mut().fail_next_read = true;
    }

    /// Inject a write failure on the next write operation
    pub fn fail_next_write(&self) {
        self.state.borrow_mut().fail_next_write = true;
    }

    /// Fail every read that starts at `address`
    pub fn fail_reads_at(&self, address: u8) {
        self.state.borrow_mut().failing_reads.insert(address);
    }

    /// Get the operations log
    pub fn operations(&self) -> Vec<Operation> {
        self.state.borrow().operations.clone()
    }

    /// Clear the operations log
    pub fn clear_operations(&self) {
        self.state.borrow_mut().operations.clear();
    }

    /// Number of reads that started at `address`
    pub fn read_count(&self, address: u8) -> usize {
        self.state
            .borrow()
            .operations
            .iter()
            .filter(|op| matches!(op, Operation::Read { address: a, .. } if *a == address))
            .count()
    }

    /// Every write that started at `address`, oldest first
    pub fn writes_to(&self, address: u8) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::Write { address: a, data } if *a == address => Some(data.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Mock error type
#[derive(Debug, Clone, PartialEq)]
pub enum MockError {
    /// Simulated communication error
    Communication,
}

impl Addressed for MockInterface {
    fn device_address(&self) -> u8 {
        self.device
    }
}

impl RegisterInterface for MockInterface {
    type Error = MockError;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        // Check for injected failure
        if state.fail_next_read || state.failing_reads.contains(&address) {
            state.fail_next_read = false;
            return Err(MockError::Communication);
        }

        let mut due = Vec::new();
        state.scheduled.retain_mut(|write| {
            if write.address != address {
                return true;
            }
            if write.reads_left == 0 {
                due.push((write.address, write.value));
                return false;
            }
            write.reads_left -= 1;
            true
        });
        for (reg_addr, value) in due {
            state.registers.insert(reg_addr, value);
        }

        if state.word_addressed {
            let word = state.words.get(&address).cloned().unwrap_or_default();
            for (i, byte) in read_data.iter_mut().enumerate() {
                *byte = word.get(i).copied().unwrap_or(0);
            }
        } else {
            for (i, byte) in read_data.iter_mut().enumerate() {
                let reg_addr = address.wrapping_add(i as u8);
                *byte = state.registers.get(&reg_addr).copied().unwrap_or(0);
            }
        }

        state.operations.push(Operation::Read {
            address,
            len: read_data.len(),
        });
        Ok(())
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        // Check for injected failure
        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(MockError::Communication);
        }

        if state.word_addressed {
            state.words.insert(address, write_data.to_vec());
        } else {
            for (i, &byte) in write_data.iter().enumerate() {
                state.registers.insert(address.wrapping_add(i as u8), byte);
            }
        }

        state.operations.push(Operation::Write {
            address,
            data: write_data.to_vec(),
        });
        Ok(())
    }
}

#[cfg(feature = "async")]
impl AsyncRegisterInterface for MockInterface {
    type Error = MockError;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        // Delegate to synchronous implementation
        RegisterInterface::read_register(self, address, size_bits, read_data)
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        // Delegate to synchronous implementation
        RegisterInterface::write_register(self, address, size_bits, write_data)
    }
}

//! Register allocation
//!
//! SAM has single-letter registers. Story variables are global: a name gets a register
//! the first time any passage reads or writes it and keeps it for the rest of the run.
//! Registers below the configured offset are reserved (`A` and `B` hold the menu
//! choice and the menu counter).

use std::collections::HashMap;

/// Registers the runtime provides, `A` to `Z`.
pub const REGISTER_COUNT: usize = 26;

/// Strip the `$` marker and surrounding blanks from a variable name.
pub fn normalize(name: &str) -> &str {
    name.trim().trim_start_matches('$').trim()
}

/// Letter of the register with the given number.
pub fn register_letter(number: usize) -> char {
    u32::try_from(number)
        .ok()
        .and_then(|n| char::from_u32('A' as u32 + n))
        .unwrap_or('?')
}

#[derive(Debug, Clone)]
pub struct VariableAllocator {
    next: usize,
    registers: HashMap<String, char>,
    never_read: Vec<String>,
    never_written: Vec<String>,
    overflowed: Vec<String>,
}

impl VariableAllocator {
    /// Start allocating at register number `first_register`.
    pub fn new(first_register: usize) -> Self {
        VariableAllocator {
            next: first_register,
            registers: HashMap::new(),
            never_read: Vec::new(),
            never_written: Vec::new(),
            overflowed: Vec::new(),
        }
    }

    /// Register for writing `name`, allocating it on first sight.
    pub fn write(&mut self, name: &str) -> char {
        let name = normalize(name);
        let (register, fresh) = self.resolve(name);
        if fresh {
            self.never_read.push(name.to_string());
        }
        self.never_written.retain(|n| n != name);
        register
    }

    /// Register for reading `name`, allocating it on first sight.
    pub fn read(&mut self, name: &str) -> char {
        let name = normalize(name);
        let (register, fresh) = self.resolve(name);
        if fresh {
            self.never_written.push(name.to_string());
        }
        self.never_read.retain(|n| n != name);
        register
    }

    /// Register already assigned to `name`, without allocating.
    pub fn register(&self, name: &str) -> Option<char> {
        self.registers.get(normalize(name)).copied()
    }

    /// Names written but not read so far, in allocation order
    pub fn never_read(&self) -> &[String] {
        &self.never_read
    }

    /// Names read but not written so far, in allocation order
    pub fn never_written(&self) -> &[String] {
        &self.never_written
    }

    /// Names allocated past `Z` since the last call.
    pub fn take_overflowed(&mut self) -> Vec<String> {
        std::mem::take(&mut self.overflowed)
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    fn resolve(&mut self, name: &str) -> (char, bool) {
        if let Some(&register) = self.registers.get(name) {
            return (register, false);
        }
        if self.next >= REGISTER_COUNT {
            self.overflowed.push(name.to_string());
        }
        let register = register_letter(self.next);
        self.next += 1;
        self.registers.insert(name.to_string(), register);
        (register, true)
    }
}

/// Names for the temporary registers that remember whether a conditional link was
/// reached. Requests are served in order; after [reset](TempRegisterPool::reset) the
/// same names are handed out again.
#[derive(Debug, Clone, Default)]
pub struct TempRegisterPool {
    names: Vec<String>,
    next: usize,
}

impl TempRegisterPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self) -> String {
        if self.next >= self.names.len() {
            // `*` cannot start a story variable name, so temps never collide with one
            self.names.push(format!("*temp{}", self.next));
        }
        let name = self.names[self.next].clone();
        self.next += 1;
        name
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// Number of distinct temp names created so far
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_use_order_from_offset() {
        let mut vars = VariableAllocator::new(2);
        assert_eq!(vars.write("$gold"), 'C');
        assert_eq!(vars.read("lamp"), 'D');
        assert_eq!(vars.read("$gold"), 'C');
        assert_eq!(vars.write(" $lamp "), 'D');
        assert_eq!(vars.register("gold"), Some('C'));
        assert_eq!(vars.register("nothing"), None);
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_usage_tracking() {
        let mut vars = VariableAllocator::new(2);
        vars.write("written");
        vars.read("read");
        vars.write("both");
        vars.read("both");
        assert_eq!(vars.never_read(), ["written".to_string()]);
        assert_eq!(vars.never_written(), ["read".to_string()]);
    }

    #[test]
    fn test_overflow_past_z() {
        let mut vars = VariableAllocator::new(24);
        assert_eq!(vars.write("y"), 'Y');
        assert_eq!(vars.write("z"), 'Z');
        vars.write("one_too_many");
        assert_eq!(vars.take_overflowed(), vec!["one_too_many".to_string()]);
        assert!(vars.take_overflowed().is_empty());
    }

    #[test]
    fn test_temp_pool_reuses_names_after_reset() {
        let mut pool = TempRegisterPool::new();
        assert_eq!(pool.acquire(), "*temp0");
        assert_eq!(pool.acquire(), "*temp1");
        pool.reset();
        assert_eq!(pool.acquire(), "*temp0");
        assert_eq!(pool.len(), 2);
    }
}

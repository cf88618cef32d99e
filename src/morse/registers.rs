use std::fmt;
use std::str::FromStr;

/// Number of named registers.
pub const REGISTER_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Ax = 0,
    Bx = 1,
    Cx = 2,
    Dx = 3,
    Sp = 4,
    Ip = 5,
}

impl Register {
    pub const ALL: [Register; REGISTER_COUNT] = [
        Register::Ax,
        Register::Bx,
        Register::Cx,
        Register::Dx,
        Register::Sp,
        Register::Ip,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Register::Ax => "AX",
            Register::Bx => "BX",
            Register::Cx => "CX",
            Register::Dx => "DX",
            Register::Sp => "SP",
            Register::Ip => "IP",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Register {
    type Err = ();

    /// Case-insensitive register lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Register::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Condition flags. `cf` exists for completeness; no instruction sets it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub zf: bool,
    pub sf: bool,
    pub cf: bool,
}

impl Flags {
    /// Set ZF/SF from an unmasked result.
    #[inline]
    pub fn update(&mut self, result: i128) {
        self.zf = result == 0;
        self.sf = result < 0;
    }
}

/// Register file, flags and value stack of one machine.
///
/// `SP` is a push/pop counter: it starts at the configured stack base, drops
/// by one per push and rises by one per pop. It never addresses anything.
#[derive(Debug, Clone)]
pub struct Cpu {
    regs: [u32; REGISTER_COUNT],
    pub flags: Flags,
    pub stack: Vec<i64>,
    pub halted: bool,
    /// IP was advanced past `u32::MAX`. The register keeps `u32::MAX`; the
    /// fetch position is one beyond it, which is past any program.
    ip_overflow: bool,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new(crate::morse::config::DEFAULT_STACK_BASE)
    }
}

impl Cpu {
    pub fn new(stack_base: u32) -> Self {
        let mut regs = [0; REGISTER_COUNT];
        regs[Register::Sp.index()] = stack_base;
        Self {
            regs,
            flags: Flags::default(),
            stack: Vec::new(),
            halted: false,
            ip_overflow: false,
        }
    }

    #[inline]
    pub fn read(&self, r: Register) -> u32 {
        self.regs[r.index()]
    }

    /// Store `value` reduced mod 2^32.
    #[inline]
    pub fn write(&mut self, r: Register, value: i128) {
        self.regs[r.index()] = value as u32;
    }

    /// Fetch position of the next instruction.
    #[inline]
    pub fn ip(&self) -> usize {
        let ip = self.read(Register::Ip) as usize;
        if self.ip_overflow { ip.saturating_add(1) } else { ip }
    }

    #[inline]
    pub fn set_ip(&mut self, ip: usize) {
        self.ip_overflow = false;
        self.write(Register::Ip, ip as i128);
    }

    /// Step IP to the following instruction. The advance is not masked:
    /// going past `u32::MAX` leaves the program instead of wrapping to 0.
    pub fn advance_ip(&mut self) {
        let ip = self.read(Register::Ip);
        match ip.checked_add(1) {
            Some(next) => self.regs[Register::Ip.index()] = next,
            None => self.ip_overflow = true,
        }
    }

    pub fn push(&mut self, value: i64) {
        self.stack.push(value);
        let sp = self.read(Register::Sp);
        self.regs[Register::Sp.index()] = sp.wrapping_sub(1);
    }

    /// Pop the top value; `None` leaves SP untouched.
    pub fn pop(&mut self) -> Option<i64> {
        let v = self.stack.pop()?;
        let sp = self.read(Register::Sp);
        self.regs[Register::Sp.index()] = sp.wrapping_add(1);
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_masked() {
        let mut cpu = Cpu::default();
        cpu.write(Register::Ax, -1);
        assert_eq!(cpu.read(Register::Ax), u32::MAX);
        cpu.write(Register::Bx, 1 << 32);
        assert_eq!(cpu.read(Register::Bx), 0);
        cpu.write(Register::Cx, (1 << 32) + 7);
        assert_eq!(cpu.read(Register::Cx), 7);
    }

    #[test]
    fn initial_state() {
        let cpu = Cpu::default();
        assert_eq!(cpu.read(Register::Sp), 1000);
        assert_eq!(cpu.ip(), 0);
        assert!(!cpu.halted);
        assert_eq!(cpu.flags, Flags::default());
    }

    #[test]
    fn sp_counts_stack_depth() {
        let mut cpu = Cpu::new(10);
        cpu.push(1);
        cpu.push(2);
        assert_eq!(cpu.read(Register::Sp), 8);
        assert_eq!(cpu.pop(), Some(2));
        assert_eq!(cpu.read(Register::Sp), 9);
        assert_eq!(cpu.pop(), Some(1));
        assert_eq!(cpu.pop(), None);
        assert_eq!(cpu.read(Register::Sp), 10);
    }

    #[test]
    fn advancing_ip_past_the_top_does_not_wrap() {
        let mut cpu = Cpu::default();
        cpu.advance_ip();
        assert_eq!(cpu.ip(), 1);

        cpu.write(Register::Ip, -1);
        cpu.advance_ip();
        assert_eq!(cpu.read(Register::Ip), u32::MAX);
        assert_eq!(cpu.ip(), u32::MAX as usize + 1);

        cpu.set_ip(3);
        assert_eq!(cpu.ip(), 3);
    }

    #[test]
    fn register_names_parse_case_insensitively() {
        assert_eq!("ax".parse::<Register>(), Ok(Register::Ax));
        assert_eq!("Ip".parse::<Register>(), Ok(Register::Ip));
        assert!("EX".parse::<Register>().is_err());
    }

    #[test]
    fn flags_follow_unmasked_result() {
        let mut f = Flags::default();
        f.update(-2);
        assert!(f.sf && !f.zf);
        f.update(0);
        assert!(f.zf && !f.sf);
        assert!(!f.cf);
    }
}

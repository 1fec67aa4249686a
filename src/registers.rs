//! NXP PCF85063A register map

/// Register addresses. The chip auto-increments its pointer across a burst,
/// so multi-byte transfers start at the lowest address of a block.
pub mod address {
    pub const CONTROL_1: u8 = 0x00_u8;
    pub const CONTROL_2: u8 = 0x01_u8;
    pub const OFFSET: u8 = 0x02_u8;
    pub const RAM_BYTE: u8 = 0x03_u8;
    pub const SECONDS: u8 = 0x04_u8;
    pub const MINUTES: u8 = 0x05_u8;
    pub const HOURS: u8 = 0x06_u8;
    pub const DAYS: u8 = 0x07_u8;
    pub const WEEKDAYS: u8 = 0x08_u8;
    pub const MONTHS: u8 = 0x09_u8;
    pub const YEARS: u8 = 0x0A_u8;
    pub const SECOND_ALARM: u8 = 0x0B_u8;
    pub const MINUTE_ALARM: u8 = 0x0C_u8;
    pub const HOUR_ALARM: u8 = 0x0D_u8;
    pub const DAY_ALARM: u8 = 0x0E_u8;
    pub const WEEKDAY_ALARM: u8 = 0x0F_u8;
    pub const TIMER_VALUE: u8 = 0x10_u8;
    pub const TIMER_MODE: u8 = 0x11_u8;
}

/// Burst lengths
pub const TIME_LEN: usize = 3_usize;
pub const DATE_LEN: usize = 4_usize;
pub const DATETIME_LEN: usize = TIME_LEN + DATE_LEN;
pub const ALARM_LEN: usize = 5_usize;

/// Control_1
pub mod control_1 {
    pub const EXT_TEST: u8 = 1_u8 << 7;
    pub const STOP: u8 = 1_u8 << 5;
    pub const CIE: u8 = 1_u8 << 2;
    pub const HOUR_MODE_12: u8 = 1_u8 << 1;
    pub const CAP_SEL: u8 = 1_u8 << 0;
    /// Writing this pattern triggers a software reset
    pub const SOFTWARE_RESET: u8 = 0x58_u8;
}

/// Control_2
pub mod control_2 {
    /// Alarm interrupt enable
    pub const AIE: u8 = 1_u8 << 7;
    /// Alarm flag, set when the alarm matched
    pub const AF: u8 = 1_u8 << 6;
    pub const MI: u8 = 1_u8 << 5;
    pub const HMI: u8 = 1_u8 << 4;
    /// Timer flag, set when the countdown reached zero
    pub const TF: u8 = 1_u8 << 3;
    /// CLKOUT frequency select, bits 2:0
    pub const COF_MASK: u8 = 0b0000_0111;
    pub const DEFAULT: u8 = 0x00_u8;
}

/// Offset register
pub mod offset {
    /// Set for coarse mode (one correction every four minutes)
    pub const MODE: u8 = 1_u8 << 7;
    /// Sign bit of the 7-bit two's complement value
    pub const SIGN: u8 = 1_u8 << 6;
    pub const VALUE_MASK: u8 = 0b0111_1111;
}

/// Bits of the time & date registers that carry data. Everything else is a
/// flag or reserved.
pub mod mask {
    /// Bit 7 of the seconds register is the oscillator stop flag
    pub const OSCILLATOR_STOP: u8 = 1_u8 << 7;
    pub const SECONDS: u8 = 0b0111_1111;
    pub const MINUTES: u8 = 0b0111_1111;
    pub const HOURS: u8 = 0b0011_1111;
    pub const DAYS: u8 = 0b0011_1111;
    pub const WEEKDAYS: u8 = 0b0000_0111;
    pub const MONTHS: u8 = 0b0001_1111;
    pub const YEARS: u8 = 0b1111_1111;
}

/// Alarm registers
pub mod alarm {
    /// AEN: set when the field does *not* take part in the alarm match
    pub const DISABLE: u8 = 1_u8 << 7;
    pub const SECOND_MASK: u8 = 0b0111_1111;
    pub const MINUTE_MASK: u8 = 0b0111_1111;
    pub const HOUR_MASK: u8 = 0b0011_1111;
    pub const DAY_MASK: u8 = 0b0011_1111;
    pub const WEEKDAY_MASK: u8 = 0b0000_0111;
}

/// Timer_mode
pub mod timer_mode {
    /// Source clock select, bits 4:3
    pub const TCF_SHIFT: u8 = 3_u8;
    pub const TCF_MASK: u8 = 0b0001_1000;
    /// Timer enable
    pub const TE: u8 = 1_u8 << 2;
    /// Timer interrupt enable
    pub const TIE: u8 = 1_u8 << 1;
    /// Interrupt pulses instead of following the flag
    pub const TI_TP: u8 = 1_u8 << 0;
    /// 1/60 Hz source with the timer disabled. The countdown value only
    /// latches while the timer is off.
    pub const DISABLED: u8 = 0x18_u8;
}

//! Value types passed in and out of the driver

use heapless::String;
use ufmt::{derive::uDebug, uDisplay, uWrite, uwrite, Formatter};

/// I2C address of the PCF85063A (7-bit)
pub const DEFAULT_ADDRESS: u8 = 0x51_u8;
/// The year register only counts 0-99, so years are stored relative to this
pub const DEFAULT_EPOCH: u16 = 1970_u16;
/// Raw alarm value meaning "this field does not take part in the match"
pub const ALARM_DISABLED: u8 = 99_u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub address: u8,
    pub epoch: u16,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            epoch: DEFAULT_EPOCH,
        }
    }
}
impl Config {
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_epoch(mut self, epoch: u16) -> Self {
        self.epoch = epoch;
        self
    }
}

/// 24 hour time of day
#[derive(Debug, uDebug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Time {
    /// 0-23
    pub hours: u8,
    /// 0-59
    pub minutes: u8,
    /// 0-59
    pub seconds: u8,
}
impl Time {
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }
}

#[derive(Debug, uDebug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    /// 0-6, the meaning of each value is up to the user
    pub day_of_week: u8,
    /// 1-31
    pub day: u8,
    /// 1-12
    pub month: u8,
    /// Absolute year, must be within 99 years of the configured epoch
    pub year: u16,
}
impl Default for Date {
    fn default() -> Self {
        Self {
            day_of_week: 0_u8,
            day: 1_u8,
            month: 1_u8,
            year: DEFAULT_EPOCH,
        }
    }
}
impl Date {
    pub fn new(day_of_week: u8, day: u8, month: u8, year: u16) -> Self {
        Self {
            day_of_week,
            day,
            month,
            year,
        }
    }
}

/// Everything the seconds..years burst holds
#[derive(Debug, uDebug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateTime {
    pub date: Date,
    pub time: Time,
}
impl DateTime {
    pub fn new(date: Date, time: Time) -> Self {
        Self { date, time }
    }

    /// `YYYY-MM-DD HH:MM:SS`, with room for a five digit year
    pub fn format(&self) -> String<20> {
        let mut output = String::new();
        // u16 years are at most five digits, so this always fits
        let _ = uwrite!(output, "{}", *self);
        output
    }
}

/// Tens and units digit of each time field, ready for a digit display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeDigits {
    pub hours: (u8, u8),
    pub minutes: (u8, u8),
    pub seconds: (u8, u8),
}
impl From<&Time> for TimeDigits {
    fn from(time: &Time) -> Self {
        Self {
            hours: digits(time.hours),
            minutes: digits(time.minutes),
            seconds: digits(time.seconds),
        }
    }
}

fn digits(x: u8) -> (u8, u8) {
    (x / 10, x % 10)
}

fn write_two_digits<W>(f: &mut Formatter<'_, W>, x: u8) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    let (tens, units) = digits(x);
    uwrite!(f, "{}{}", tens, units)
}

impl uDisplay for Time {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        write_two_digits(f, self.hours)?;
        f.write_str(":")?;
        write_two_digits(f, self.minutes)?;
        f.write_str(":")?;
        write_two_digits(f, self.seconds)
    }
}

impl uDisplay for Date {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(f, "{}-", self.year)?;
        write_two_digits(f, self.month)?;
        f.write_str("-")?;
        write_two_digits(f, self.day)
    }
}

impl uDisplay for DateTime {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(f, "{} {}", self.date, self.time)
    }
}

/// Alarm match fields. `None` leaves a field out of the match, so e.g. only
/// setting `minute` fires once every hour.
#[derive(Debug, uDebug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alarm {
    pub second: Option<u8>,
    pub minute: Option<u8>,
    pub hour: Option<u8>,
    pub day: Option<u8>,
    pub weekday: Option<u8>,
}
impl Alarm {
    /// Build from raw values where [`ALARM_DISABLED`] (or anything above it)
    /// disables the field
    pub fn from_raw(second: u8, minute: u8, hour: u8, day: u8, weekday: u8) -> Self {
        Self {
            second: from_sentinel(second),
            minute: from_sentinel(minute),
            hour: from_sentinel(hour),
            day: from_sentinel(day),
            weekday: from_sentinel(weekday),
        }
    }

    /// Inverse of [`Alarm::from_raw`], in register order
    pub fn to_raw(&self) -> [u8; 5] {
        [
            to_sentinel(self.second),
            to_sentinel(self.minute),
            to_sentinel(self.hour),
            to_sentinel(self.day),
            to_sentinel(self.weekday),
        ]
    }

    pub fn with_second(mut self, second: u8) -> Self {
        self.second = Some(second);
        self
    }

    pub fn with_minute(mut self, minute: u8) -> Self {
        self.minute = Some(minute);
        self
    }

    pub fn with_hour(mut self, hour: u8) -> Self {
        self.hour = Some(hour);
        self
    }

    pub fn with_day(mut self, day: u8) -> Self {
        self.day = Some(day);
        self
    }

    pub fn with_weekday(mut self, weekday: u8) -> Self {
        self.weekday = Some(weekday);
        self
    }
}

pub fn from_sentinel(raw: u8) -> Option<u8> {
    (raw < ALARM_DISABLED).then_some(raw)
}

pub fn to_sentinel(value: Option<u8>) -> u8 {
    value.unwrap_or(ALARM_DISABLED)
}

/// Countdown timer source clock
#[repr(u8)]
#[derive(Debug, uDebug, Clone, Copy, PartialEq, Eq)]
pub enum TimerClock {
    Hz4096 = 0b00,
    Hz64 = 0b01,
    Hz1 = 0b10,
    /// One tick per minute
    Hz1Per60 = 0b11,
}

#[derive(Debug, uDebug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub clock: TimerClock,
    /// Ticks of `clock` until the timer flag is raised
    pub value: u8,
    pub interrupt_enabled: bool,
    /// Pulse the interrupt pin instead of holding it until the flag clears
    pub pulse_mode: bool,
}

#[derive(Debug, uDebug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OffsetMode {
    /// One correction every two hours
    #[default]
    Normal,
    /// One correction every four minutes
    Coarse,
}

/// Oscillator trim. Positive values slow the clock down, negative values speed
/// it up.
#[derive(Debug, uDebug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offset {
    pub mode: OffsetMode,
    /// -64..=63
    pub value: i8,
}
impl Offset {
    pub const MIN: i8 = -64_i8;
    pub const MAX: i8 = 63_i8;

    pub fn new(mode: OffsetMode, value: i8) -> Self {
        Self { mode, value }
    }
}

/// CLKOUT pin frequency
#[repr(u8)]
#[derive(Debug, uDebug, Clone, Copy, PartialEq, Eq)]
pub enum ClockOutput {
    Hz32768 = 0b000,
    Hz16384 = 0b001,
    Hz8192 = 0b010,
    Hz4096 = 0b011,
    Hz2048 = 0b100,
    Hz1024 = 0b101,
    Hz1 = 0b110,
    /// CLKOUT held low
    Off = 0b111,
}

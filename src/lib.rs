//! Driver for the NXP PCF85063A real-time clock
//!
//! ```ignore
//! let mut rtc = pcf85063a::Pcf85063a::new(i2c);
//! rtc.set_datetime(&DateTime::new(Date::new(3, 15, 6, 2024), Time::new(12, 0, 0)))?;
//! let now = rtc.read_time()?;
//! ```
#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod codec;
pub mod error;
pub mod registers;
mod rtc;
pub mod shared;

pub use bus::{I2cBus, I2cError, RegisterBus};
pub use error::{Error, Field};
pub use rtc::RTC;
pub use shared::{
    Alarm, ClockOutput, Config, Date, DateTime, Offset, OffsetMode, Time, TimeDigits, TimerClock,
    TimerConfig, ALARM_DISABLED, DEFAULT_ADDRESS, DEFAULT_EPOCH,
};

/// The driver on an embedded-hal I2C bus
pub type Pcf85063a<I2C> = RTC<I2cBus<I2C>>;

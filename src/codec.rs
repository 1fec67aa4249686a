//! Conversions between the driver's value types and the PCF85063A's register
//! bytes. Nothing in here touches the bus.

use core::ops::RangeInclusive;

use crate::{
    error::Field,
    registers::{alarm, mask, offset, timer_mode, ALARM_LEN, DATETIME_LEN, DATE_LEN, TIME_LEN},
    shared::{Alarm, Date, DateTime, Offset, OffsetMode, Time, TimerConfig},
};

pub const SECOND_RANGE: RangeInclusive<u8> = 0..=59;
pub const MINUTE_RANGE: RangeInclusive<u8> = 0..=59;
pub const HOUR_RANGE: RangeInclusive<u8> = 0..=23;
pub const DAY_RANGE: RangeInclusive<u8> = 1..=31;
pub const WEEKDAY_RANGE: RangeInclusive<u8> = 0..=6;
pub const MONTH_RANGE: RangeInclusive<u8> = 1..=12;
/// Years the chip can count past the epoch
pub const YEAR_SPAN: u16 = 99_u16;

/// Only defined for 0-99; callers range check first
pub fn bcd_encode(x: u8) -> u8 {
    debug_assert!(x < 100);
    ((x / 10) << 4) | (x % 10)
}

pub fn bcd_decode(x: u8) -> u8 {
    (((x & 0b11110000) >> 4) * 10) + (x & 0b00001111)
}

fn check(value: u8, range: RangeInclusive<u8>, field: Field) -> Result<u8, Field> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(field)
    }
}

/// Seconds, minutes, hours, in register order. The oscillator stop flag is
/// written as 0, which clears it.
pub fn encode_time(time: &Time) -> Result<[u8; TIME_LEN], Field> {
    Ok([
        bcd_encode(check(time.seconds, SECOND_RANGE, Field::Second)?),
        bcd_encode(check(time.minutes, MINUTE_RANGE, Field::Minute)?),
        bcd_encode(check(time.hours, HOUR_RANGE, Field::Hour)?),
    ])
}

pub fn decode_time(bytes: &[u8; TIME_LEN]) -> Time {
    Time {
        seconds: bcd_decode(bytes[0] & mask::SECONDS),
        minutes: bcd_decode(bytes[1] & mask::MINUTES),
        hours: bcd_decode(bytes[2] & mask::HOURS),
    }
}

/// Year relative to the epoch, as the year register counts it
pub fn year_offset(year: u16, epoch: u16) -> Result<u8, Field> {
    match year.checked_sub(epoch) {
        Some(offset) if offset <= YEAR_SPAN => Ok(offset as u8),
        _ => Err(Field::Year),
    }
}

/// Days, weekdays, months, years, in register order
pub fn encode_date(date: &Date, epoch: u16) -> Result<[u8; DATE_LEN], Field> {
    Ok([
        bcd_encode(check(date.day, DAY_RANGE, Field::Day)?),
        bcd_encode(check(date.day_of_week, WEEKDAY_RANGE, Field::Weekday)?),
        bcd_encode(check(date.month, MONTH_RANGE, Field::Month)?),
        bcd_encode(year_offset(date.year, epoch)?),
    ])
}

pub fn decode_date(bytes: &[u8; DATE_LEN], epoch: u16) -> Date {
    Date {
        day: bcd_decode(bytes[0] & mask::DAYS),
        day_of_week: bcd_decode(bytes[1] & mask::WEEKDAYS),
        month: bcd_decode(bytes[2] & mask::MONTHS),
        year: epoch.saturating_add(bcd_decode(bytes[3] & mask::YEARS) as u16),
    }
}

pub fn encode_datetime(datetime: &DateTime, epoch: u16) -> Result<[u8; DATETIME_LEN], Field> {
    let time = encode_time(&datetime.time)?;
    let date = encode_date(&datetime.date, epoch)?;
    let mut bytes = [0_u8; DATETIME_LEN];
    bytes[..TIME_LEN].copy_from_slice(&time);
    bytes[TIME_LEN..].copy_from_slice(&date);
    Ok(bytes)
}

pub fn decode_datetime(bytes: &[u8; DATETIME_LEN], epoch: u16) -> DateTime {
    let mut time = [0_u8; TIME_LEN];
    let mut date = [0_u8; DATE_LEN];
    time.copy_from_slice(&bytes[..TIME_LEN]);
    date.copy_from_slice(&bytes[TIME_LEN..]);
    DateTime {
        time: decode_time(&time),
        date: decode_date(&date, epoch),
    }
}

/// Bit 7 of the seconds register is set when the oscillator stopped since the
/// time was last written, i.e. the time can't be trusted
pub fn oscillator_stopped(seconds: u8) -> bool {
    seconds & mask::OSCILLATOR_STOP != 0
}

/// A disabled field is written as 0 with AEN set, an enabled one as BCD with
/// AEN clear
pub fn encode_alarm_field(
    value: Option<u8>,
    range: RangeInclusive<u8>,
    field: Field,
) -> Result<u8, Field> {
    match value {
        Some(value) => Ok(bcd_encode(check(value, range, field)?) & !alarm::DISABLE),
        None => Ok(0x00_u8 | alarm::DISABLE),
    }
}

/// AEN set means disabled, regardless of the other bits
pub fn decode_alarm_field(byte: u8, width: u8) -> Option<u8> {
    if byte & alarm::DISABLE != 0 {
        None
    } else {
        Some(bcd_decode(byte & !alarm::DISABLE & width))
    }
}

pub fn encode_alarm(spec: &Alarm) -> Result<[u8; ALARM_LEN], Field> {
    Ok([
        encode_alarm_field(spec.second, SECOND_RANGE, Field::Second)?,
        encode_alarm_field(spec.minute, MINUTE_RANGE, Field::Minute)?,
        encode_alarm_field(spec.hour, HOUR_RANGE, Field::Hour)?,
        encode_alarm_field(spec.day, DAY_RANGE, Field::Day)?,
        encode_alarm_field(spec.weekday, WEEKDAY_RANGE, Field::Weekday)?,
    ])
}

pub fn decode_alarm(bytes: &[u8; ALARM_LEN]) -> Alarm {
    Alarm {
        second: decode_alarm_field(bytes[0], alarm::SECOND_MASK),
        minute: decode_alarm_field(bytes[1], alarm::MINUTE_MASK),
        hour: decode_alarm_field(bytes[2], alarm::HOUR_MASK),
        day: decode_alarm_field(bytes[3], alarm::DAY_MASK),
        weekday: decode_alarm_field(bytes[4], alarm::WEEKDAY_MASK),
    }
}

/// The value is biased by 128 and then bit 7 is replaced by the mode, which
/// leaves a 7-bit two's complement value in bits 6:0
pub fn encode_offset(trim: &Offset) -> Result<u8, Field> {
    if !(Offset::MIN..=Offset::MAX).contains(&trim.value) {
        return Err(Field::Offset);
    }

    let biased = 128_u8.wrapping_add(trim.value as u8);
    Ok(match trim.mode {
        OffsetMode::Coarse => biased | offset::MODE,
        OffsetMode::Normal => biased & !offset::MODE,
    })
}

pub fn decode_offset(byte: u8) -> Offset {
    // Mode has to be taken before bit 7 is reused for the sign
    let mode = if byte & offset::MODE != 0 {
        OffsetMode::Coarse
    } else {
        OffsetMode::Normal
    };

    let mut value = byte & offset::VALUE_MASK;
    if value & offset::SIGN != 0 {
        value |= 1_u8 << 7;
    }

    Offset {
        mode,
        value: value as i8,
    }
}

/// Timer_mode byte with the timer enabled
pub fn encode_timer_mode(config: &TimerConfig) -> u8 {
    let mut mode = timer_mode::TE;
    if config.interrupt_enabled {
        mode |= timer_mode::TIE;
    }
    if config.pulse_mode {
        mode |= timer_mode::TI_TP;
    }
    mode | (((config.clock as u8) << timer_mode::TCF_SHIFT) & timer_mode::TCF_MASK)
}

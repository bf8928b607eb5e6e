use core::time;

use alloc::string::String;

///Largest integer that is exactly representable as milliseconds in `f64`.
///
///Any delay above it is treated as [Infinite](enum.Delay.html#variant.Infinite).
pub const MAX_SAFE_INTEGER: f64 = 9007199254740991.0;

const NANOS_PER_MILLI: f64 = 1_000_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
///Normalized timer delay.
///
///Every input is coerced the same way the native timer functions coerce their delay argument:
///
///- absent value (`()` or `None`) is `0`;
///- `bool` is `0` or `1`;
///- strings are parsed as numeric literals, anything unparsable is `NaN`;
///- `NaN` and negative values (including negative infinity) are clamped to `0`;
///- positive infinity and anything above [MAX_SAFE_INTEGER](constant.MAX_SAFE_INTEGER.html) is `Infinite`.
pub enum Delay {
    ///Fires after specified duration.
    Finite(time::Duration),
    ///Never fires.
    Infinite,
}

impl Delay {
    ///Immediate delay.
    pub const ZERO: Self = Delay::Finite(time::Duration::from_secs(0));

    ///Coerces number of milliseconds.
    pub fn from_millis_f64(millis: f64) -> Self {
        if millis.is_nan() || millis < 0.0 {
            return Self::ZERO;
        }

        if millis > MAX_SAFE_INTEGER {
            return Delay::Infinite;
        }

        //Below 2^53 integer part is exact
        let whole = millis as u64;
        let nanos = (millis - whole as f64) * NANOS_PER_MILLI;
        Delay::Finite(time::Duration::from_millis(whole) + time::Duration::from_nanos(nanos as u64))
    }

    ///Coerces string using numeric literal rules.
    pub fn parse(text: &str) -> Self {
        Self::from_millis_f64(to_number(text))
    }

    #[inline]
    ///Returns whether timer with this delay would never fire.
    pub const fn is_infinite(&self) -> bool {
        match self {
            Delay::Infinite => true,
            Delay::Finite(_) => false,
        }
    }

    #[inline]
    ///Returns duration, unless delay is infinite.
    pub const fn duration(&self) -> Option<time::Duration> {
        match self {
            Delay::Finite(duration) => Some(*duration),
            Delay::Infinite => None,
        }
    }

    ///Returns delay as milliseconds, with infinite delay being `f64::INFINITY`
    pub fn as_millis_f64(&self) -> f64 {
        match self {
            Delay::Finite(duration) => duration.as_secs() as f64 * 1000.0 + duration.subsec_nanos() as f64 / NANOS_PER_MILLI,
            Delay::Infinite => f64::INFINITY,
        }
    }

    ///Returns number of host-level timers needed to cover this delay.
    ///
    ///Zero delay still takes single timer, while infinite delay takes none, which is reported as `None`.
    pub fn chunks(&self) -> Option<u64> {
        let duration = self.duration()?;
        let chunk = crate::MAX_CHUNK.as_nanos();
        let nanos = duration.as_nanos();
        let count = (nanos + chunk - 1) / chunk;
        Some(core::cmp::max(count, 1) as u64)
    }
}

impl Default for Delay {
    #[inline(always)]
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<()> for Delay {
    #[inline(always)]
    fn from(_: ()) -> Self {
        Self::ZERO
    }
}

impl<T: Into<Delay>> From<Option<T>> for Delay {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::ZERO,
        }
    }
}

impl From<bool> for Delay {
    #[inline]
    fn from(value: bool) -> Self {
        match value {
            true => Delay::Finite(time::Duration::from_millis(1)),
            false => Self::ZERO,
        }
    }
}

impl From<f64> for Delay {
    #[inline(always)]
    fn from(millis: f64) -> Self {
        Self::from_millis_f64(millis)
    }
}

impl From<f32> for Delay {
    #[inline(always)]
    fn from(millis: f32) -> Self {
        Self::from_millis_f64(millis as f64)
    }
}

macro_rules! impl_from_int {
    ($($typ:ty),+) => {
        $(
            impl From<$typ> for Delay {
                #[inline(always)]
                fn from(millis: $typ) -> Self {
                    Self::from_millis_f64(millis as f64)
                }
            }
        )+
    };
}

impl_from_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl From<&str> for Delay {
    #[inline(always)]
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for Delay {
    #[inline(always)]
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<&String> for Delay {
    #[inline(always)]
    fn from(text: &String) -> Self {
        Self::parse(text)
    }
}

impl From<time::Duration> for Delay {
    fn from(duration: time::Duration) -> Self {
        if duration > time::Duration::from_millis(MAX_SAFE_INTEGER as u64) {
            Delay::Infinite
        } else {
            Delay::Finite(duration)
        }
    }
}

fn is_whitespace(ch: char) -> bool {
    //NEL is not whitespace for numeric literals, while BOM is.
    ch == '\u{feff}' || (ch.is_whitespace() && ch != '\u{85}')
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    let mut result = 0.0;
    for ch in digits.chars() {
        match ch.to_digit(radix) {
            Some(digit) => result = result * radix as f64 + digit as f64,
            None => return f64::NAN,
        }
    }
    result
}

fn is_decimal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut idx = 0;

    let skip_digits = |mut idx: usize| {
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        idx
    };

    if idx < bytes.len() && (bytes[idx] == b'+' || bytes[idx] == b'-') {
        idx += 1;
    }

    let int_start = idx;
    idx = skip_digits(idx);
    let mut digits = idx - int_start;

    if idx < bytes.len() && bytes[idx] == b'.' {
        let frac_start = idx + 1;
        idx = skip_digits(frac_start);
        digits += idx - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if idx < bytes.len() && (bytes[idx] == b'e' || bytes[idx] == b'E') {
        idx += 1;
        if idx < bytes.len() && (bytes[idx] == b'+' || bytes[idx] == b'-') {
            idx += 1;
        }
        let exp_start = idx;
        idx = skip_digits(exp_start);
        if idx == exp_start {
            return false;
        }
    }

    idx == bytes.len()
}

///Converts string to number the way native numeric coercion does.
pub(crate) fn to_number(text: &str) -> f64 {
    let text = text.trim_matches(is_whitespace);

    match text {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => (),
    }

    let bytes = text.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => 16,
            b'o' | b'O' => 8,
            b'b' | b'B' => 2,
            _ => 0,
        };

        if radix != 0 {
            return parse_radix(&text[2..], radix);
        }
    }

    match is_decimal(text) {
        true => text.parse().unwrap_or(f64::NAN),
        false => f64::NAN,
    }
}

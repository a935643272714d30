//! Arbitrary precision numbers using dashu
//!
//! Uses dashu-float (DBig) for decimal arithmetic at a fixed working
//! precision. Transcendentals run a few guard digits above the requested
//! precision and are rounded back before they are returned, so chained
//! operations never accumulate more than one rounding per step.

use dashu_float::ops::{Abs, SquareRoot};
use dashu_float::DBig;
use dashu_int::IBig;
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Overflow: result too large")]
    Overflow,

    #[error("Underflow: result too small")]
    Underflow,
}

/// Working precision for calculations (significant decimal digits)
pub const WORKING_PRECISION: u32 = 64;

/// Highest precision π is stored for, guard digits included
pub const MAX_PRECISION: u32 = 400;

/// Largest decimal exponent (either sign) a value may carry
const MAX_EXPONENT: isize = 1_000_000_000;

/// Extra digits carried through series evaluation and angle reduction
const GUARD_DIGITS: usize = 8;

/// Hard stop for Taylor series, well past convergence for reduced angles
const MAX_SERIES_TERMS: i64 = 400;

/// Largest |x| accepted by exp before the result leaves any sane range
const EXP_LIMIT: i64 = 100_000_000;

/// Decimal exponents in `[LOWER_EXP, UPPER_EXP)` render in fixed notation
const LOWER_EXP: isize = -3;
const UPPER_EXP: isize = 5;

const PI_STR: &str = "3.14159265358979323846264338327950288419716939937510582097494459230781640628620899862803482534211706798214808651328230664709384460955058223172535940812848111745028410270193852110555964462294895493038196442881097566593344612847564823378678316527120190914564856692346034861045432664821339360726024914127372458700660631558817488152092096282925409171536436789259036001133053054882046652138414695194151160943305727036575959195309218611738193261179310511854807446237996274956735188575272489122793818301194912";

/// Arbitrary precision decimal number
///
/// Built on dashu-float's DBig. All fallible operations return Results;
/// nothing here panics on user input.
#[derive(Debug, Clone)]
pub struct Number {
    inner: DBig,
}

impl Number {
    // ========== Construction ==========

    /// Ensure a DBig carries the working precision
    fn with_work_precision(val: DBig) -> DBig {
        val.with_precision(WORKING_PRECISION as usize).value()
    }

    fn rounded(val: DBig, precision: u32) -> Self {
        Self { inner: val.with_precision(precision as usize).value() }
    }

    /// Parse a decimal literal exactly: "123", "3.14", ".5", "1.5e-3", "-42".
    /// Also returns the number of mantissa digits.
    fn parse_decimal(text: &str) -> Result<(DBig, usize), NumberError> {
        let err = || NumberError::ParseError(text.to_string());

        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (mantissa, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => {
                let exp: isize = unsigned[pos + 1..].parse().map_err(|_| err())?;
                if exp > MAX_EXPONENT {
                    return Err(NumberError::Overflow);
                }
                if exp < -MAX_EXPONENT {
                    return Err(NumberError::Underflow);
                }
                (&unsigned[..pos], exp)
            }
            None => (unsigned, 0),
        };

        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(err());
        }

        let mut significand: IBig = format!("{}{}", int_part, frac_part)
            .parse()
            .map_err(|_| err())?;
        if negative {
            significand = -significand;
        }
        let scale = exponent
            .checked_sub(frac_part.len() as isize)
            .ok_or(NumberError::Overflow)?;

        let digits = int_part.len() + frac_part.len();
        Ok((DBig::from_parts(significand, scale), digits))
    }

    /// Create from string representation at working precision
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let (inner, _) = Self::parse_decimal(s.trim())?;
        Ok(Self { inner: Self::with_work_precision(inner) })
    }

    /// Parse a source literal keeping every written digit, so a later
    /// `with_precision` above the working precision loses nothing
    pub fn from_literal(s: &str) -> Result<Self, NumberError> {
        let (inner, digits) = Self::parse_decimal(s.trim())?;
        let precision = digits.max(WORKING_PRECISION as usize);
        Ok(Self { inner: inner.with_precision(precision).value() })
    }

    /// Same value carried at `precision` significant digits (rounded when
    /// narrowing)
    pub fn with_precision(&self, precision: u32) -> Self {
        Self::rounded(self.inner.clone(), precision)
    }

    /// Multiplicative identity at this value's precision
    fn one_like(&self) -> Self {
        let digits = self.inner.precision().max(1);
        Self { inner: DBig::ONE.with_precision(digits).value() }
    }

    /// Create from i64 with working precision
    pub fn from_i64(n: i64) -> Self {
        Self { inner: Self::with_work_precision(DBig::from(n)) }
    }

    /// Create from ratio (zero when the denominator is zero)
    pub fn from_ratio(num: i64, den: i64) -> Self {
        if den == 0 {
            return Self::from_i64(0);
        }
        let n = Self::with_work_precision(DBig::from(num));
        let d = Self::with_work_precision(DBig::from(den));
        Self { inner: n / d }
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.inner < DBig::ZERO
    }

    pub fn is_integer(&self) -> bool {
        self.decimal_parts()
            .map_or(true, |(_, digits, exp10)| digits.len() as isize <= exp10 + 1)
    }

    // ========== Basic Arithmetic ==========

    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self { inner: &self.inner - &other.inner }
    }

    /// Unchecked product; callers keep both operands inside the exponent range
    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    /// Product, or `Overflow`/`Underflow` when it would leave the exponent range
    pub fn checked_mul(&self, other: &Self) -> Result<Self, NumberError> {
        if let (Some(a), Some(b)) = (self.exp10(), other.exp10()) {
            Self::check_exponent(a.checked_add(b))?;
        }
        Ok(self.mul(other))
    }

    pub fn neg(&self) -> Self {
        Self { inner: -&self.inner }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        if let (Some(a), Some(b)) = (self.exp10(), other.exp10()) {
            Self::check_exponent(a.checked_sub(b))?;
        }
        Ok(Self { inner: &self.inner / &other.inner })
    }

    /// Integer power by repeated squaring
    pub fn pow(&self, exp: i64) -> Result<Self, NumberError> {
        let mut base = self.clone();
        let mut remaining = exp.unsigned_abs();
        let mut result = self.one_like();

        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.checked_mul(&base)?;
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.checked_mul(&base)?;
            }
        }

        if exp < 0 {
            self.one_like().checked_div(&result)
        } else {
            Ok(result)
        }
    }

    /// Real-valued power: x^y = exp(y * ln(x))
    pub fn pow_real(&self, exp: &Self, precision: u32) -> Result<Self, NumberError> {
        if exp.is_integer() {
            if let Some(e) = exp.to_i64() {
                return self.pow(e);
            }
        }
        if self.is_zero() {
            return if exp.is_negative() {
                Err(NumberError::DivisionByZero)
            } else {
                Ok(Self::from_i64(0))
            };
        }
        if self.is_negative() {
            return Err(NumberError::DomainError(
                "negative base with non-integer exponent".to_string(),
            ));
        }

        let ln_x = self.ln(precision)?;
        ln_x.checked_mul(exp)?.exp(precision)
    }

    // ========== Transcendental Functions ==========

    fn at_precision(&self, digits: usize) -> DBig {
        self.inner.clone().with_precision(digits).value()
    }

    fn epsilon(digits: usize) -> DBig {
        DBig::from_parts(IBig::from(1), -(digits as isize))
    }

    pub fn sqrt(&self, precision: u32) -> Result<Self, NumberError> {
        if self.is_negative() {
            return Err(NumberError::DomainError(
                "square root of negative number".to_string(),
            ));
        }
        if self.is_zero() {
            return Ok(Self::from_i64(0));
        }

        let val = self.at_precision(precision as usize + GUARD_DIGITS);
        Ok(Self::rounded(val.sqrt(), precision))
    }

    /// Natural logarithm
    pub fn ln(&self, precision: u32) -> Result<Self, NumberError> {
        if self.inner <= DBig::ZERO {
            return Err(NumberError::DomainError(
                "logarithm of non-positive number".to_string(),
            ));
        }

        let val = self.at_precision(precision as usize + GUARD_DIGITS);
        Ok(Self::rounded(val.ln(), precision))
    }

    /// Base-10 logarithm
    pub fn log10(&self, precision: u32) -> Result<Self, NumberError> {
        self.log_base(&Self::from_i64(10), precision)
    }

    /// Logarithm in an arbitrary positive base other than 1
    pub fn log_base(&self, base: &Self, precision: u32) -> Result<Self, NumberError> {
        let ln_x = self.ln(precision + GUARD_DIGITS as u32)?;
        let ln_b = base.ln(precision + GUARD_DIGITS as u32)?;
        if ln_b.is_zero() {
            return Err(NumberError::DomainError("logarithm base 1".to_string()));
        }
        let quotient = ln_x.checked_div(&ln_b)?;
        Ok(Self::rounded(quotient.inner, precision))
    }

    /// Exponential function (e^x)
    pub fn exp(&self, precision: u32) -> Result<Self, NumberError> {
        let limit = DBig::from(EXP_LIMIT);
        if self.inner > limit {
            return Err(NumberError::Overflow);
        }
        if self.inner < -limit {
            return Ok(Self::from_i64(0));
        }

        let val = self.at_precision(precision as usize + GUARD_DIGITS);
        Ok(Self::rounded(val.exp(), precision))
    }

    /// Reduce an angle into [-π, π] using enough digits of π to cover
    /// the integer part of the argument. Fails once that needs more digits
    /// of π than are stored.
    fn reduce_angle(&self, digits: usize) -> Result<DBig, NumberError> {
        let magnitude = self.exp10().map_or(0, |exp10| exp10.max(0) as usize);
        let work = digits.saturating_add(magnitude);
        if work.saturating_add(2) > PI_STR.len() {
            return Err(NumberError::DomainError(
                "angle too large to reduce accurately".to_string(),
            ));
        }

        let pi = Self::pi_digits(work);
        let two_pi = &pi + &pi;
        let half = DBig::from_parts(IBig::from(5), -1);
        let x = self.at_precision(work);

        let turns = (&(&x / &two_pi) + &half).floor();
        let reduced = &x - &(&turns * &two_pi);
        Ok(reduced.with_precision(digits).value())
    }

    fn sin_series(x: &DBig, digits: usize) -> DBig {
        let x_squared = x * x;
        let epsilon = Self::epsilon(digits);

        let mut sum = x.clone();
        let mut term = x.clone();
        for k in 1..MAX_SERIES_TERMS {
            let denom = DBig::from((2 * k) * (2 * k + 1));
            term = -&term * &x_squared / denom;
            if Abs::abs(term.clone()) < epsilon {
                break;
            }
            sum = &sum + &term;
        }
        sum
    }

    fn cos_series(x: &DBig, digits: usize) -> DBig {
        let x_squared = x * x;
        let epsilon = Self::epsilon(digits);

        let one = DBig::ONE.with_precision(digits).value();
        let mut sum = one.clone();
        let mut term = one;
        for k in 1..MAX_SERIES_TERMS {
            let denom = DBig::from((2 * k - 1) * (2 * k));
            term = -&term * &x_squared / denom;
            if Abs::abs(term.clone()) < epsilon {
                break;
            }
            sum = &sum + &term;
        }
        sum
    }

    /// Round a trig result back to `precision`, flushing values that sit
    /// below the working resolution to exact zero (sin(π), cos(π/2))
    fn settle_trig(&self, raw: DBig, precision: u32) -> Self {
        let resolution = Self::epsilon((precision as usize).saturating_sub(4));
        let negligible = Abs::abs(raw.clone()) < resolution;
        let input_is_tiny = Abs::abs(self.inner.clone()) < resolution;
        if negligible && !input_is_tiny {
            Self::from_i64(0)
        } else {
            Self::rounded(raw, precision)
        }
    }

    /// Sine (argument in radians)
    pub fn sin(&self, precision: u32) -> Result<Self, NumberError> {
        let digits = precision as usize + GUARD_DIGITS;
        let x = self.reduce_angle(digits)?;
        Ok(self.settle_trig(Self::sin_series(&x, digits), precision))
    }

    /// Cosine (argument in radians)
    pub fn cos(&self, precision: u32) -> Result<Self, NumberError> {
        let digits = precision as usize + GUARD_DIGITS;
        let x = self.reduce_angle(digits)?;
        Ok(self.settle_trig(Self::cos_series(&x, digits), precision))
    }

    /// Tangent (sin/cos)
    pub fn tan(&self, precision: u32) -> Result<Self, NumberError> {
        let cos_x = self.cos(precision)?;
        if cos_x.is_zero() {
            return Err(NumberError::DomainError(
                "tan undefined at odd multiples of π/2".to_string(),
            ));
        }
        let sin_x = self.sin(precision)?;
        sin_x.checked_div(&cos_x)
    }

    // ========== Mathematical Constants ==========

    fn pi_digits(digits: usize) -> DBig {
        let end_pos = (digits + 2).min(PI_STR.len());
        match Self::parse_decimal(&PI_STR[..end_pos]) {
            Ok((pi, _)) => pi.with_precision(digits).value(),
            Err(_) => Self::from_ratio(355, 113).inner,
        }
    }

    /// Pi - from high-precision string constant
    pub fn pi(precision: u32) -> Self {
        Self::rounded(Self::pi_digits(precision as usize + GUARD_DIGITS), precision)
    }

    /// Euler's number e
    pub fn e(precision: u32) -> Self {
        Self::from_i64(1)
            .exp(precision)
            .unwrap_or_else(|_| Self::from_ratio(2718281828, 1000000000))
    }

    /// Degrees to radians
    pub fn to_radians(&self, precision: u32) -> Self {
        let half_turn = Self::from_i64(180);
        let scaled = self.mul(&Self::pi(precision + GUARD_DIGITS as u32));
        match scaled.checked_div(&half_turn) {
            Ok(rad) => Self::rounded(rad.inner, precision),
            Err(_) => scaled,
        }
    }

    // ========== Other Operations ==========

    pub fn abs(&self) -> Self {
        Self { inner: Abs::abs(self.inner.clone()) }
    }

    /// Sign, digit string without trailing zeros and the decimal exponent
    /// of the leading digit. `None` for zero.
    fn decimal_parts(&self) -> Option<(bool, String, isize)> {
        if self.is_zero() {
            return None;
        }

        // DBig stores as significand * 10^exponent
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        let text = significand.to_string();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.as_str()),
        };

        let trimmed = digits.trim_end_matches('0');
        let exponent = exponent + (digits.len() - trimmed.len()) as isize;
        let exp10 = exponent + trimmed.len() as isize - 1;
        Some((negative, trimmed.to_string(), exp10))
    }

    /// Decimal exponent of the leading digit. `None` for zero.
    fn exp10(&self) -> Option<isize> {
        self.decimal_parts().map(|(_, _, exp10)| exp10)
    }

    fn check_exponent(estimate: Option<isize>) -> Result<(), NumberError> {
        match estimate {
            Some(e) if e > MAX_EXPONENT => Err(NumberError::Overflow),
            Some(e) if e < -MAX_EXPONENT => Err(NumberError::Underflow),
            Some(_) => Ok(()),
            None => Err(NumberError::Overflow),
        }
    }

    /// Try to convert to i64
    pub fn to_i64(&self) -> Option<i64> {
        let Some((negative, digits, exp10)) = self.decimal_parts() else {
            return Some(0);
        };
        if exp10 < 0 || digits.len() as isize > exp10 + 1 || exp10 > 18 {
            return None;
        }

        let padded = format!("{}{}", digits, "0".repeat((exp10 + 1) as usize - digits.len()));
        let magnitude: i64 = padded.parse().ok()?;
        Some(if negative { -magnitude } else { magnitude })
    }

    /// Convert to f64 (None when the value leaves f64 range)
    pub fn to_f64(&self) -> Option<f64> {
        let Some((negative, digits, exp10)) = self.decimal_parts() else {
            return Some(0.0);
        };
        let (digits, exp10) = round_digits(&digits, exp10, 17);

        let sign = if negative { "-" } else { "" };
        let literal = if digits.len() > 1 {
            format!("{}{}.{}e{}", sign, &digits[..1], &digits[1..], exp10)
        } else {
            format!("{}{}e{}", sign, digits, exp10)
        };

        let value: f64 = literal.parse().ok()?;
        value.is_finite().then_some(value)
    }

    // ========== Display ==========

    /// Render with N significant figures, rounding half up and dropping
    /// trailing zeros. Fixed notation for decimal exponents in [-3, 5),
    /// otherwise `d.ddde+N`.
    pub fn to_sigfigs(&self, sigfigs: u32) -> String {
        let Some((negative, digits, exp10)) = self.decimal_parts() else {
            return "0".to_string();
        };
        let (digits, exp10) = round_digits(&digits, exp10, sigfigs.max(1) as usize);

        let body = if (LOWER_EXP..UPPER_EXP).contains(&exp10) {
            fixed_notation(&digits, exp10)
        } else {
            scientific_notation(&digits, exp10)
        };

        if negative {
            format!("-{}", body)
        } else {
            body
        }
    }
}

/// Round a digit string to `sigfigs` digits (half up), trimming trailing zeros
fn round_digits(digits: &str, exp10: isize, sigfigs: usize) -> (String, isize) {
    if digits.len() <= sigfigs {
        return (digits.to_string(), exp10);
    }

    let mut kept: Vec<char> = digits.chars().take(sigfigs).collect();
    let mut exp10 = exp10;

    if digits.chars().nth(sigfigs).map_or(false, |c| c >= '5') {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == '9' {
                *d = '0';
            } else {
                *d = char::from(*d as u8 + 1);
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, '1');
            kept.truncate(sigfigs);
            exp10 += 1;
        }
    }

    let text: String = kept.into_iter().collect();
    (text.trim_end_matches('0').to_string(), exp10)
}

fn fixed_notation(digits: &str, exp10: isize) -> String {
    if exp10 < 0 {
        return format!("0.{}{}", "0".repeat((-exp10 - 1) as usize), digits);
    }

    let int_len = exp10 as usize + 1;
    if digits.len() <= int_len {
        format!("{}{}", digits, "0".repeat(int_len - digits.len()))
    } else {
        format!("{}.{}", &digits[..int_len], &digits[int_len..])
    }
}

fn scientific_notation(digits: &str, exp10: isize) -> String {
    let mantissa = if digits.len() > 1 {
        format!("{}.{}", &digits[..1], &digits[1..])
    } else {
        digits.to_string()
    };
    let sign = if exp10 >= 0 { "+" } else { "" };
    format!("{}e{}{}", mantissa, sign, exp10)
}

// ========== Trait Implementations ==========

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sigfigs(WORKING_PRECISION))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.partial_cmp(&other.inner).unwrap_or(std::cmp::Ordering::Equal)
    }
}

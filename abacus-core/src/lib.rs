//! Abacus Core - Fundamental types
//!
//! This crate provides the core types used throughout Abacus:
//! - `Number`: Arbitrary precision decimal numbers
//! - `AbacusError`: Structured evaluation errors
//! - `AngleMode`: Degree/radian interpretation of trig arguments

mod number;
mod error;
mod mode;

pub use number::{Number, NumberError, MAX_PRECISION, WORKING_PRECISION};
pub use error::{AbacusError, ErrorContext, codes};
pub use mode::AngleMode;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, AbacusError, AngleMode};
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: u32 = WORKING_PRECISION;

    mod number_tests {
        use super::*;

        #[test]
        fn test_from_i64() {
            let n = Number::from_i64(42);
            assert_eq!(n.to_i64(), Some(42));
        }

        #[test]
        fn test_from_str_integer() {
            let n = Number::from_str("123").unwrap();
            assert_eq!(n.to_i64(), Some(123));
        }

        #[test]
        fn test_from_str_decimal() {
            let n = Number::from_str("3.14").unwrap();
            assert!(!n.is_integer());
            assert_eq!(n.to_sigfigs(14), "3.14");
        }

        #[test]
        fn test_from_str_leading_dot() {
            let n = Number::from_str(".5").unwrap();
            assert_eq!(n.to_sigfigs(14), "0.5");
        }

        #[test]
        fn test_from_str_scientific() {
            let n = Number::from_str("1.5e2").unwrap();
            assert_eq!(n.to_i64(), Some(150));

            let small = Number::from_str("25E-3").unwrap();
            assert_eq!(small.to_sigfigs(14), "0.025");
        }

        #[test]
        fn test_from_str_rejects_garbage() {
            assert!(Number::from_str("").is_err());
            assert!(Number::from_str(".").is_err());
            assert!(Number::from_str("1x").is_err());
            assert!(Number::from_str("1e").is_err());
        }

        #[test]
        fn test_add_sub_mul() {
            let a = Number::from_i64(10);
            let b = Number::from_i64(32);
            assert_eq!(a.add(&b).to_i64(), Some(42));
            assert_eq!(b.sub(&a).to_i64(), Some(22));
            assert_eq!(Number::from_i64(6).mul(&Number::from_i64(7)).to_i64(), Some(42));
        }

        #[test]
        fn test_decimal_addition_is_exact() {
            let a = Number::from_str("0.1").unwrap();
            let b = Number::from_str("0.2").unwrap();
            assert_eq!(a.add(&b).to_sigfigs(14), "0.3");
        }

        #[test]
        fn test_checked_div() {
            let a = Number::from_i64(84);
            let b = Number::from_i64(2);
            assert_eq!(a.checked_div(&b).unwrap().to_i64(), Some(42));
        }

        #[test]
        fn test_div_by_zero() {
            let a = Number::from_i64(42);
            let b = Number::from_i64(0);
            assert_eq!(a.checked_div(&b), Err(NumberError::DivisionByZero));
        }

        #[test]
        fn test_pow_positive() {
            assert_eq!(Number::from_i64(2).pow(10).unwrap().to_i64(), Some(1024));
        }

        #[test]
        fn test_pow_negative() {
            let result = Number::from_i64(2).pow(-2).unwrap();
            assert_eq!(result.to_sigfigs(14), "0.25");
        }

        #[test]
        fn test_pow_zero_to_negative() {
            assert!(Number::from_i64(0).pow(-1).is_err());
        }

        #[test]
        fn test_pow_large_exponent() {
            // 1.003^300 ≈ 2.456
            let base = Number::from_str("1.003").unwrap();
            let result = base.pow(300).unwrap();
            assert!(result.to_sigfigs(3).starts_with("2.4"), "got {}", result.to_sigfigs(3));
        }

        #[test]
        fn test_pow_real_fractional() {
            let four = Number::from_i64(4);
            let half = Number::from_str("0.5").unwrap();
            assert_eq!(four.pow_real(&half, P).unwrap().to_sigfigs(14), "2");

            let ten = Number::from_i64(10);
            let two_point_five = Number::from_str("2.5").unwrap();
            let result = ten.pow_real(&two_point_five, P).unwrap();
            assert_eq!(result.to_sigfigs(5), "316.23");
        }

        #[test]
        fn test_pow_real_negative_base() {
            let base = Number::from_i64(-8);
            let third = Number::from_ratio(1, 3);
            assert!(base.pow_real(&third, P).is_err());

            let squared = base.pow_real(&Number::from_i64(2), P).unwrap();
            assert_eq!(squared.to_i64(), Some(64));
        }

        #[test]
        fn test_sqrt() {
            assert_eq!(Number::from_i64(4).sqrt(P).unwrap().to_sigfigs(14), "2");
            assert_eq!(Number::from_i64(2).sqrt(P).unwrap().to_sigfigs(14), "1.4142135623731");
        }

        #[test]
        fn test_sqrt_negative() {
            assert!(Number::from_i64(-4).sqrt(P).is_err());
        }

        #[test]
        fn test_ln_and_log10() {
            let ln_10 = Number::from_i64(10).ln(P).unwrap();
            assert_eq!(ln_10.to_sigfigs(14), "2.302585092994");

            let log_1000 = Number::from_i64(1000).log10(P).unwrap();
            assert_eq!(log_1000.to_sigfigs(14), "3");

            assert!(Number::from_i64(0).ln(P).is_err());
            assert!(Number::from_i64(-1).log10(P).is_err());
        }

        #[test]
        fn test_log_base_one() {
            let x = Number::from_i64(5);
            assert!(x.log_base(&Number::from_i64(1), P).is_err());
        }

        #[test]
        fn test_exp_ln_identity() {
            let hundred = Number::from_i64(100);
            let back = hundred.ln(P).unwrap().exp(P).unwrap();
            assert_eq!(back.to_sigfigs(14), "100");
        }

        #[test]
        fn test_exp_overflow() {
            let huge = Number::from_str("1e12").unwrap();
            assert_eq!(huge.exp(P), Err(NumberError::Overflow));
            assert!(huge.neg().exp(P).unwrap().is_zero());
        }

        #[test]
        fn test_sin_radians() {
            let s = Number::from_i64(90).sin(P).unwrap();
            assert_eq!(s.to_sigfigs(14), "0.89399666360056");

            let one = Number::from_i64(1).sin(P).unwrap();
            assert_eq!(one.to_sigfigs(14), "0.8414709848079");
        }

        #[test]
        fn test_sin_of_pi_is_zero() {
            assert!(Number::pi(P).sin(P).unwrap().is_zero());
        }

        #[test]
        fn test_sin_tiny_argument_is_kept() {
            let tiny = Number::from_str("1e-70").unwrap();
            assert!(!tiny.sin(P).unwrap().is_zero());
        }

        #[test]
        fn test_cos() {
            assert_eq!(Number::from_i64(0).cos(P).unwrap().to_sigfigs(14), "1");
            assert_eq!(Number::pi(P).cos(P).unwrap().to_sigfigs(14), "-1");
        }

        #[test]
        fn test_degrees_to_radians() {
            let right_angle = Number::from_i64(90).to_radians(P);
            assert_eq!(right_angle.sin(P).unwrap().to_sigfigs(14), "1");

            let thirty = Number::from_i64(30).to_radians(P);
            assert_eq!(thirty.sin(P).unwrap().to_sigfigs(14), "0.5");
        }

        #[test]
        fn test_tan_undefined_at_half_pi() {
            let half_pi = Number::pi(P).checked_div(&Number::from_i64(2)).unwrap();
            assert!(half_pi.tan(P).is_err());
        }

        #[test]
        fn test_sin_of_huge_angle_is_a_domain_error() {
            let large = Number::from_str("1e200").unwrap();
            assert!(large.sin(P).is_ok());

            let huge = Number::from_str("1e450").unwrap();
            assert!(matches!(huge.sin(P), Err(NumberError::DomainError(_))));
            assert!(huge.cos(P).is_err());
            assert!(huge.tan(P).is_err());
        }

        #[test]
        fn test_trig_at_max_precision() {
            let thirty = Number::from_i64(30).to_radians(MAX_PRECISION);
            let half = thirty.sin(MAX_PRECISION).unwrap();
            assert_eq!(half.to_sigfigs(MAX_PRECISION - 20), "0.5");
        }

        #[test]
        fn test_literal_exponent_out_of_range() {
            assert_eq!(Number::from_str("1e5000000000000000000"), Err(NumberError::Overflow));
            assert_eq!(Number::from_str("1e1000000001"), Err(NumberError::Overflow));
            assert_eq!(Number::from_str("1e-1000000001"), Err(NumberError::Underflow));
            assert!(Number::from_str("1e999999999").is_ok());
        }

        #[test]
        fn test_checked_mul_range() {
            let big = Number::from_str("1e999999999").unwrap();
            assert_eq!(big.checked_mul(&big), Err(NumberError::Overflow));

            let tiny = Number::from_str("1e-999999999").unwrap();
            assert_eq!(tiny.checked_mul(&tiny), Err(NumberError::Underflow));
            assert_eq!(tiny.checked_div(&big), Err(NumberError::Underflow));
            assert_eq!(big.checked_div(&tiny), Err(NumberError::Overflow));

            assert!(big.checked_mul(&Number::from_i64(0)).unwrap().is_zero());
            assert_eq!(big.checked_mul(&tiny).unwrap().to_i64(), Some(1));
        }

        #[test]
        fn test_pow_exponent_overflow() {
            let ten = Number::from_i64(10);
            assert_eq!(ten.pow(5_000_000_000_000_000_000), Err(NumberError::Overflow));
            assert_eq!(ten.pow(-5_000_000_000_000_000_000), Err(NumberError::Overflow));
            assert_eq!(Number::from_i64(1).pow(i64::MAX).unwrap().to_i64(), Some(1));
        }

        #[test]
        fn test_literal_keeps_written_digits() {
            let text = format!("0.{}", "7".repeat(90));
            let literal = Number::from_literal(&text).unwrap();
            assert_eq!(literal.to_sigfigs(100), text);

            let rounded = Number::from_str(&text).unwrap();
            assert_eq!(rounded.to_sigfigs(100).len(), 2 + WORKING_PRECISION as usize);
        }

        #[test]
        fn test_with_precision_rounds() {
            let third = Number::from_i64(1)
                .with_precision(100)
                .checked_div(&Number::from_i64(3))
                .unwrap();
            assert_eq!(third.to_sigfigs(200), format!("0.{}", "3".repeat(100)));
            assert_eq!(third.with_precision(5).to_sigfigs(200), "0.33333");
        }

        #[test]
        fn test_pi_and_e() {
            assert_eq!(Number::pi(P).to_sigfigs(14), "3.1415926535898");
            assert_eq!(Number::e(P).to_sigfigs(14), "2.718281828459");
        }

        #[test]
        fn test_is_zero_and_negative() {
            assert!(Number::from_i64(0).is_zero());
            assert!(!Number::from_i64(1).is_zero());
            assert!(Number::from_i64(-5).is_negative());
            assert!(!Number::from_i64(0).is_negative());
        }

        #[test]
        fn test_abs() {
            assert_eq!(Number::from_i64(-42).abs().to_i64(), Some(42));
            assert_eq!(Number::from_i64(42).abs().to_i64(), Some(42));
        }

        #[test]
        fn test_to_i64_rejects_fractions() {
            assert_eq!(Number::from_str("2.5").unwrap().to_i64(), None);
            assert_eq!(Number::from_str("-7").unwrap().to_i64(), Some(-7));
        }

        #[test]
        fn test_to_f64() {
            assert_eq!(Number::from_str("0.1").unwrap().to_f64(), Some(0.1));
            assert_eq!(Number::from_i64(-3).to_f64(), Some(-3.0));
            assert_eq!(Number::from_i64(0).to_f64(), Some(0.0));
            assert_eq!(Number::from_str("1e400").unwrap().to_f64(), None);
        }
    }

    mod format_tests {
        use super::*;

        #[test]
        fn test_third_has_fourteen_digits() {
            assert_eq!(Number::from_ratio(1, 3).to_sigfigs(14), "0.33333333333333");
            assert_eq!(Number::from_ratio(2, 3).to_sigfigs(14), "0.66666666666667");
        }

        #[test]
        fn test_integers_have_no_decimal_point() {
            assert_eq!(Number::from_i64(4).to_sigfigs(14), "4");
            assert_eq!(Number::from_i64(12345).to_sigfigs(14), "12345");
            assert_eq!(Number::from_i64(0).to_sigfigs(14), "0");
        }

        #[test]
        fn test_large_values_use_exponent() {
            assert_eq!(Number::from_i64(123456).to_sigfigs(14), "1.23456e+5");
            assert_eq!(Number::from_i64(100000).to_sigfigs(14), "1e+5");
            assert_eq!(Number::from_str("6.02214076e23").unwrap().to_sigfigs(4), "6.022e+23");
        }

        #[test]
        fn test_small_values() {
            assert_eq!(Number::from_str("0.001").unwrap().to_sigfigs(14), "0.001");
            assert_eq!(Number::from_str("0.0001").unwrap().to_sigfigs(14), "1e-4");
            assert_eq!(Number::from_str("-2.5e-7").unwrap().to_sigfigs(14), "-2.5e-7");
        }

        #[test]
        fn test_rounding_carries_into_exponent() {
            let n = Number::from_str("99999.999999999999").unwrap();
            assert_eq!(n.to_sigfigs(14), "1e+5");

            let m = Number::from_str("9.99999999999999").unwrap();
            assert_eq!(m.to_sigfigs(14), "10");
        }

        #[test]
        fn test_negative_values() {
            assert_eq!(Number::from_str("-2.5").unwrap().to_sigfigs(14), "-2.5");
            assert_eq!(Number::from_ratio(-1, 3).to_sigfigs(3), "-0.333");
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_error_construction() {
            let err = AbacusError::div_zero();
            assert_eq!(err.code, codes::DIV_ZERO);
        }

        #[test]
        fn test_error_with_context() {
            let err = AbacusError::undefined_var("y")
                .with_formula("y + 1")
                .with_note("from left operand");
            let ctx = err.context.unwrap();
            assert_eq!(ctx.formula, Some("y + 1".to_string()));
            assert_eq!(ctx.notes, vec!["from left operand".to_string()]);
        }

        #[test]
        fn test_error_display() {
            let err = AbacusError::parse_error("unexpected token");
            let display = format!("{}", err);
            assert!(display.contains("PARSE_ERROR"));
        }

        #[test]
        fn test_number_error_conversion() {
            let err: AbacusError = NumberError::DomainError("sqrt".to_string()).into();
            assert_eq!(err.code, codes::DOMAIN_ERROR);
        }
    }

    mod mode_tests {
        use super::*;

        #[test]
        fn test_default_is_degrees() {
            assert_eq!(AngleMode::default(), AngleMode::Deg);
        }

        #[test]
        fn test_parse_and_toggle() {
            assert_eq!("rad".parse::<AngleMode>().unwrap(), AngleMode::Rad);
            assert_eq!("Degrees".parse::<AngleMode>().unwrap(), AngleMode::Deg);
            assert!("grad".parse::<AngleMode>().is_err());
            assert_eq!(AngleMode::Deg.toggled(), AngleMode::Rad);
            assert_eq!(AngleMode::Rad.to_string(), "RAD");
        }
    }
}
